// filepath: src/app.rs
//! Main application logic for wl-paint

use crate::config::PaintConfig;
use crate::export::ImageFormat;
use crate::input::{KeyAction, KeyModifiers, PointerTracker};
use crate::render;
use crate::session::{Notice, PaintEvent, Session};
use log::{debug, info, warn};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::{xdg::window::Window, WaylandSurface},
    shm::{slot::SlotPool, Shm},
};
use wayland_client::protocol::{wl_keyboard, wl_pointer, wl_shm};

pub struct AppData {
    registry_state: RegistryState,
    output_state: OutputState,
    seat_state: SeatState,
    #[allow(dead_code)]
    compositor_state: CompositorState,
    shm_state: Shm,
    window: Window,
    pool: SlotPool,
    configured: bool,
    pointer: Option<wl_pointer::WlPointer>,
    keyboard: Option<wl_keyboard::WlKeyboard>,
    pub(crate) keyboard_mods: KeyModifiers,
    pub(crate) tracker: PointerTracker,
    session: Session,
    save_format: ImageFormat,
    needs_redraw: bool,
    exit: bool,
}

impl AppData {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry_state: RegistryState,
        output_state: OutputState,
        seat_state: SeatState,
        compositor_state: CompositorState,
        shm_state: Shm,
        window: Window,
        pool: SlotPool,
        config: PaintConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Configuring window");
        window.set_title("wl-paint");
        window.set_app_id("wl-paint");
        window.set_min_size(Some((64, 64)));
        window.commit();

        let session = Session::new(&config)?;

        Ok(Self {
            registry_state,
            output_state,
            seat_state,
            compositor_state,
            shm_state,
            window,
            pool,
            configured: false,
            pointer: None,
            keyboard: None,
            keyboard_mods: KeyModifiers::default(),
            tracker: PointerTracker::new(),
            session,
            save_format: config.export.format,
            needs_redraw: true,
            exit: false,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn set_configured(&mut self, configured: bool) {
        self.configured = configured;
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    pub fn request_exit(&mut self) {
        info!("Exit requested");
        self.exit = true;
    }

    pub fn save_format(&self) -> ImageFormat {
        self.save_format
    }

    /// Canvas size the window should use when the compositor leaves it up to us
    pub fn canvas_size(&self) -> (u32, u32) {
        let surface = self.session.surface();
        (surface.width(), surface.height())
    }

    /// Feed an event to the session and react to its response
    pub fn dispatch(&mut self, event: PaintEvent) {
        let response = self.session.handle(event);
        match &response.notice {
            Some(notice @ Notice::SaveFailed(reason)) => {
                warn!("Drawing kept in memory, save can be retried: {}", reason);
                self.window.set_title(notice.title());
            }
            Some(notice) => self.window.set_title(notice.title()),
            None => {}
        }
        if response.redraw {
            self.needs_redraw = true;
        }
    }

    pub fn handle_key_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Paint(event) => self.dispatch(event),
            KeyAction::Quit => self.request_exit(),
        }
    }

    /// Draw if something changed since the last frame
    pub fn flush(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.needs_redraw {
            self.draw()?;
        }
        Ok(())
    }

    pub fn draw(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.configured {
            debug!("draw() called before surface is configured, skipping");
            return Ok(());
        }

        let surface = self.session.surface();
        let width = surface.width();
        let height = surface.height();
        let stride = width * 4;
        debug!("Drawing surface {}x{}", width, height);

        let (buffer, canvas) = self.pool.create_buffer(
            width as i32,
            height as i32,
            stride as i32,
            wl_shm::Format::Argb8888,
        )?;
        render::present(surface, canvas);

        let wl_surface = self.window.wl_surface();
        buffer.attach_to(wl_surface)?;
        wl_surface.damage_buffer(0, 0, width as i32, height as i32);
        wl_surface.commit();

        self.needs_redraw = false;
        Ok(())
    }

    pub fn registry_state(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    pub fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    pub fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    pub fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm_state
    }

    pub fn set_pointer(&mut self, pointer: Option<wl_pointer::WlPointer>) {
        if pointer.is_none() {
            if let Some(event) = self.tracker.leave() {
                self.dispatch(event);
            }
        }
        self.pointer = pointer;
        info!("Pointer set: {:?}", self.pointer.is_some());
    }

    pub fn set_keyboard(&mut self, keyboard: Option<wl_keyboard::WlKeyboard>) {
        self.keyboard = keyboard;
        info!("Keyboard set: {:?}", self.keyboard.is_some());
    }
}
