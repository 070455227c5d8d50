use std::path::Path;

use image::ImageFormat;
use tracing::debug;

use crate::error::{Result, RibbonError};
use crate::types::TextureData;

/// Load a texture file: read raw bytes and decode for width/height.
///
/// Only PNG and JPEG are accepted, the two image formats core glTF can embed.
pub fn load_texture(path: &Path) -> Result<TextureData> {
    let data = std::fs::read(path).map_err(|e| {
        RibbonError::Input(format!("Failed to read texture {}: {e}", path.display()))
    })?;

    let mime_type = match image::guess_format(&data) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(other) => {
            return Err(RibbonError::Input(format!(
                "Unsupported texture format {other:?} in {}; use PNG or JPEG",
                path.display()
            )));
        }
        Err(e) => {
            return Err(RibbonError::Input(format!(
                "Failed to identify texture {}: {e}",
                path.display()
            )));
        }
    };

    let img = image::load_from_memory(&data).map_err(|e| {
        RibbonError::Input(format!(
            "Failed to decode texture {}: {e}",
            path.display()
        ))
    })?;

    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "Loaded texture"
    );

    Ok(TextureData {
        data,
        mime_type: mime_type.to_string(),
        width: img.width(),
        height: img.height(),
    })
}

/// Texture horizontal scale that shows the texture at its natural aspect ratio.
///
/// The ribbon is `ribbon_width` tall in V, so one undistorted repeat spans
/// `ribbon_width * aspect` world units of arc length. Returns `None` when the
/// ribbon or the image is degenerate.
pub fn fit_horizontal_scale(texture: &TextureData, ribbon_width: f32) -> Option<f32> {
    let span = ribbon_width.abs() * texture.aspect_ratio();
    (span > f32::EPSILON && texture.width > 0 && texture.height > 0).then(|| 1.0 / span)
}
