/// Raw texture image data.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl TextureData {
    /// Width divided by height, or 1.0 for a degenerate image.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// The single material shared by every exported ribbon.
///
/// Ribbons are seen from both sides, so the exported material is always
/// double-sided, and the texture repeats along U as the ribbon grows.
#[derive(Debug, Clone)]
pub struct RibbonMaterial {
    /// Base color factor [r, g, b, a].
    pub base_color: [f32; 4],
    pub texture: Option<TextureData>,
}

impl Default for RibbonMaterial {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            texture: None,
        }
    }
}
