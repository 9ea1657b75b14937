//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in CSS pixel space with color and optional texture lookup.
///
/// `textured` is 0.0 for flat-colored geometry and 1.0 for geometry sampled
/// from the pickup sprite (multiplied by `color`).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub uv: [f32; 2],
    pub textured: f32,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
            uv: [0.0, 0.0],
            textured: 0.0,
        }
    }

    pub const fn textured(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            color: [1.0, 1.0, 1.0, 1.0],
            uv: [u, v],
            textured: 1.0,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4, 2 => Float32x2, 3 => Float32];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Convert an 8-bit sRGB color to the linear values an sRGB surface expects
pub fn srgb(r: u8, g: u8, b: u8, alpha: f32) -> [f32; 4] {
    fn channel(c: u8) -> f32 {
        let c = c as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    [channel(r), channel(g), channel(b), alpha]
}

/// Parse `#RRGGBB` into linear RGBA
pub fn hex(code: &str, alpha: f32) -> [f32; 4] {
    let digits = code.trim_start_matches('#');
    let byte = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0)
    };
    srgb(byte(0), byte(2), byte(4), alpha)
}

/// Colors for game elements (hex values as authored, linear at runtime)
pub mod colors {
    pub const BACKGROUND_TOP: &str = "#071427";
    pub const BACKGROUND_BOTTOM: &str = "#002329";
    pub const PICKUP_BODY: &str = "#FF8F56";
    pub const PICKUP_TAIL: &str = "#E6733E";
    pub const BONUS_BODY: &str = "#FFD93D";
    pub const BONUS_TAIL: &str = "#FFC83D";
    pub const GATE: &str = "#8E6AFF";
    pub const PLAYER: &str = "#FF6B6B";

    /// White overlays
    pub const LANE_BAND_ALPHA: f32 = 0.03;
    pub const DIVIDER_ALPHA: f32 = 0.06;
    pub const OVERLAY_ALPHA: f32 = 0.12;
    pub const SPEED_TRACK_ALPHA: f32 = 0.08;
    pub const SPEED_FILL_ALPHA: f32 = 0.3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(hex("#FFFFFF", 1.0), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(hex("#000000", 0.5), [0.0, 0.0, 0.0, 0.5]);
        let c = hex("#8E6AFF", 1.0);
        assert_eq!(c[2], 1.0);
        assert!(c[0] > c[1]);
    }

    #[test]
    fn test_malformed_hex_falls_back_to_black() {
        assert_eq!(hex("#zz", 1.0), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_vertex_layout_is_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 9 * 4);
    }
}
