//! WebGPU rendering module
//!
//! `scene` turns the game state into colored/textured triangles in CSS
//! pixels; `pipeline` owns the GPU objects and draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use scene::{PickupArt, build_scene};
pub use vertex::Vertex;

/// Decoded pickup image (tightly packed RGBA8)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupSprite {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PickupSprite {
    /// Validate decoded pixels. A zero-sized or truncated image is treated as
    /// not loaded, so the procedural shrimp keeps being drawn.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if width == 0 || height == 0 || rgba.len() != expected {
            log::warn!(
                "Ignoring pickup sprite: {}x{} with {} bytes",
                width,
                height,
                rgba.len()
            );
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }

    /// Whether the image fits in a texture of at most `max_dimension` texels
    /// per side
    pub fn fits(&self, max_dimension: u32) -> bool {
        self.width <= max_dimension && self.height <= max_dimension
    }
}
