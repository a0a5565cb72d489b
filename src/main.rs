// filepath: src/main.rs

use calloop::EventLoop;
use calloop_wayland_source::WaylandSource;
use log::{info, warn};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::xdg::{window::WindowDecorations, XdgShell},
    shm::{slot::SlotPool, Shm},
};
use std::time::Duration;
use wayland_client::{globals::registry_queue_init, Connection};
use wl_paint::{app::AppData, config::PaintConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting wl-paint");

    let config = PaintConfig::load_from_file().unwrap_or_else(|err| {
        warn!("Failed to load configuration, using defaults: {}", err);
        PaintConfig::default()
    });
    info!("Configuration loaded");

    let conn = Connection::connect_to_env()?;
    let (globals, event_queue) = registry_queue_init(&conn)?;
    let qh = event_queue.handle();

    let compositor = CompositorState::bind(&globals, &qh)?;
    let xdg_shell = XdgShell::bind(&globals, &qh)?;
    let shm = Shm::bind(&globals, &qh)?;
    let seat_state = SeatState::new(&globals, &qh);

    let config = config.sanitized();
    let pool_size = config.pool_size().ok_or("canvas size overflows the buffer pool")?;
    let pool = SlotPool::new(pool_size, &shm)?;

    let surface = compositor.create_surface(&qh);
    let window = xdg_shell.create_window(surface, WindowDecorations::RequestServer, &qh);

    let mut app_data = AppData::new(
        RegistryState::new(&globals),
        OutputState::new(&globals, &qh),
        seat_state,
        compositor,
        shm,
        window,
        pool,
        config,
    )?;

    let mut event_loop: EventLoop<AppData> = EventLoop::try_new()?;
    WaylandSource::new(conn, event_queue)
        .insert(event_loop.handle())
        .map_err(|err| err.error)?;

    info!("Entering event loop");
    while !app_data.should_exit() {
        event_loop.dispatch(Duration::from_millis(100), &mut app_data)?;
    }

    info!("Exiting, configured={}", app_data.is_configured());
    Ok(())
}
