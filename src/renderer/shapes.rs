//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in CSS pixel space (origin top
//! left, y down).

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::vertex::Vertex;
use crate::sim::Rect;

fn quad(tl: Vec2, br: Vec2, top: [f32; 4], bottom: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(tl.x, tl.y, top),
        Vertex::new(br.x, tl.y, top),
        Vertex::new(tl.x, br.y, bottom),
        Vertex::new(tl.x, br.y, bottom),
        Vertex::new(br.x, tl.y, top),
        Vertex::new(br.x, br.y, bottom),
    ]
}

/// Filled axis-aligned rectangle
pub fn rect(r: Rect, color: [f32; 4]) -> Vec<Vertex> {
    if r.w <= 0.0 || r.h <= 0.0 {
        return Vec::new();
    }
    quad(Vec2::new(r.x, r.y), Vec2::new(r.right(), r.bottom()), color, color).to_vec()
}

/// Rectangle with a top-to-bottom color gradient
pub fn vertical_gradient(r: Rect, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    quad(Vec2::new(r.x, r.y), Vec2::new(r.right(), r.bottom()), top, bottom).to_vec()
}

/// Filled ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Rectangle with quarter-circle corners. The radius is clamped to half the
/// shorter side.
pub fn rounded_rect(r: Rect, radius: f32, color: [f32; 4], corner_segments: u32) -> Vec<Vertex> {
    let radius = radius.min(r.w / 2.0).min(r.h / 2.0).max(0.0);
    if radius == 0.0 {
        return rect(r, color);
    }

    let mut vertices = Vec::new();
    // Center cross
    vertices.extend(rect(Rect::new(r.x + radius, r.y, r.w - 2.0 * radius, r.h), color));
    vertices.extend(rect(Rect::new(r.x, r.y + radius, radius, r.h - 2.0 * radius), color));
    vertices.extend(rect(
        Rect::new(r.right() - radius, r.y + radius, radius, r.h - 2.0 * radius),
        color,
    ));

    // Corner fans: (center, start angle)
    let corners = [
        (Vec2::new(r.x + radius, r.y + radius), PI),
        (Vec2::new(r.right() - radius, r.y + radius), -FRAC_PI_2),
        (Vec2::new(r.right() - radius, r.bottom() - radius), 0.0),
        (Vec2::new(r.x + radius, r.bottom() - radius), FRAC_PI_2),
    ];
    for (center, start) in corners {
        for i in 0..corner_segments {
            let t1 = start + (i as f32 / corner_segments as f32) * FRAC_PI_2;
            let t2 = start + ((i + 1) as f32 / corner_segments as f32) * FRAC_PI_2;
            vertices.push(Vertex::new(center.x, center.y, color));
            vertices.push(Vertex::new(
                center.x + radius * t1.cos(),
                center.y + radius * t1.sin(),
                color,
            ));
            vertices.push(Vertex::new(
                center.x + radius * t2.cos(),
                center.y + radius * t2.sin(),
                color,
            ));
        }
    }

    vertices
}

/// Vertical dashed line from `top` to `bottom`
pub fn dashed_vline(
    x: f32,
    top: f32,
    bottom: f32,
    width: f32,
    dash: f32,
    gap: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    let mut y = top;
    while y < bottom {
        let len = dash.min(bottom - y);
        vertices.extend(rect(Rect::new(x - width / 2.0, y, width, len), color));
        y += dash + gap;
    }
    vertices
}

/// Quad sampling the whole bound texture
pub fn textured_quad(r: Rect) -> Vec<Vertex> {
    let (l, t, rr, b) = (r.x, r.y, r.right(), r.bottom());
    vec![
        Vertex::textured(l, t, 0.0, 0.0),
        Vertex::textured(rr, t, 1.0, 0.0),
        Vertex::textured(l, b, 0.0, 1.0),
        Vertex::textured(l, b, 0.0, 1.0),
        Vertex::textured(rr, t, 1.0, 0.0),
        Vertex::textured(rr, b, 1.0, 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    fn bounds(vertices: &[Vertex]) -> (f32, f32, f32, f32) {
        vertices.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(x0, y0, x1, y1), v| {
                (
                    x0.min(v.position[0]),
                    y0.min(v.position[1]),
                    x1.max(v.position[0]),
                    y1.max(v.position[1]),
                )
            },
        )
    }

    #[test]
    fn test_rect_is_two_triangles() {
        let v = rect(Rect::new(10.0, 20.0, 30.0, 40.0), WHITE);
        assert_eq!(v.len(), 6);
        assert_eq!(bounds(&v), (10.0, 20.0, 40.0, 60.0));
        assert!(rect(Rect::new(0.0, 0.0, 0.0, 5.0), WHITE).is_empty());
    }

    #[test]
    fn test_rounded_rect_stays_inside_bounds() {
        let v = rounded_rect(Rect::new(0.0, 0.0, 100.0, 50.0), 12.0, WHITE, 6);
        let (x0, y0, x1, y1) = bounds(&v);
        assert!(x0 >= -1e-3 && y0 >= -1e-3);
        assert!(x1 <= 100.0 + 1e-3 && y1 <= 50.0 + 1e-3);
        assert_eq!(v.len() % 3, 0);
    }

    #[test]
    fn test_dashes_cover_range_with_gaps() {
        let v = dashed_vline(50.0, 0.0, 40.0, 2.0, 8.0, 12.0, WHITE);
        // Dashes at 0, 20 (a third would start at 40)
        assert_eq!(v.len(), 12);
        let (_, _, _, y1) = bounds(&v);
        assert_eq!(y1, 28.0);
    }

    #[test]
    fn test_ellipse_extent() {
        let v = ellipse(Vec2::new(0.0, 0.0), Vec2::new(20.0, 10.0), WHITE, 32);
        let (x0, y0, x1, y1) = bounds(&v);
        assert!((x1 - 20.0).abs() < 1e-3 && (x0 + 20.0).abs() < 1e-3);
        assert!(y1 <= 10.0 + 1e-3 && y0 >= -10.0 - 1e-3);
    }

    #[test]
    fn test_textured_quad_uvs() {
        let v = textured_quad(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(v.iter().all(|v| v.textured == 1.0));
        assert_eq!(v[5].uv, [1.0, 1.0]);
    }
}
