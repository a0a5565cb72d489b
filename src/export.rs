// filepath: src/export.rs
//! Image export for wl-paint
//!
//! Rasterized canvases are written as PNG or JPEG. The output path always
//! ends with an extension matching the chosen format.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tiny_skia::Pixmap;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("canvas buffer does not match its {width}x{height} size")]
    InvalidBuffer { width: u32, height: u32 },
}

/// Raster formats the canvas can be saved as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Extension appended to output paths
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    /// Every extension recognised as already belonging to this format
    pub fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Png => &["png"],
            Self::Jpeg => &["jpeg", "jpg"],
        }
    }

    /// The other format, used by the alternate save shortcut
    pub fn alternate(self) -> Self {
        match self {
            Self::Png => Self::Jpeg,
            Self::Jpeg => Self::Png,
        }
    }

    fn encoder_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Append the format's extension unless `path` already carries one of its extensions
pub fn resolve_output_path(path: &Path, format: ImageFormat) -> PathBuf {
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            format
                .accepted_extensions()
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false);

    if has_extension {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(format.extension());
        PathBuf::from(name)
    }
}

/// Encode `pixmap` and write it next to `path`, returning the file actually written.
/// Unlike an unconditional append, `out.png` saved as PNG stays `out.png`.
pub fn export_to_file(
    pixmap: &Pixmap,
    path: &Path,
    format: ImageFormat,
) -> Result<PathBuf, ExportError> {
    let output = resolve_output_path(path, format);
    let rgba = to_rgba_image(pixmap)?;

    let result = match format {
        ImageFormat::Png => rgba.save_with_format(&output, format.encoder_format()),
        // JPEG has no alpha channel
        ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(rgba)
            .to_rgb8()
            .save_with_format(&output, format.encoder_format()),
    };

    match result {
        Ok(()) => {
            log::info!("Exported canvas to {}", output.display());
            Ok(output)
        }
        Err(image::ImageError::IoError(source)) => Err(ExportError::Io {
            path: output,
            source,
        }),
        Err(source) => Err(ExportError::Encode {
            path: output,
            source,
        }),
    }
}

/// Demultiply the pixmap into a straight-alpha RGBA image
pub fn to_rgba_image(pixmap: &Pixmap) -> Result<image::RgbaImage, ExportError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let c = pixel.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect::<Vec<u8>>();

    image::RgbaImage::from_raw(width, height, data)
        .ok_or(ExportError::InvalidBuffer { width, height })
}
