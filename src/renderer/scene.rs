//! Scene building
//!
//! Turns a borrowed [`GameState`] into a vertex list in CSS pixels. Pure: the
//! same state always produces the same geometry, and nothing is mutated.
//! Text (score, overlay prompt) is drawn by the page HUD on top of the canvas.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, hex};
use crate::sim::{Entity, EntityKind, GameState, Rect, gate_bars};

/// How shrimp are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickupArt {
    /// The loaded sprite texture
    Sprite,
    /// Ellipse body and triangle tail (sprite missing or still loading)
    #[default]
    Procedural,
}

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const ELLIPSE_SEGMENTS: u32 = 24;
const CORNER_SEGMENTS: u32 = 6;

/// Overlay box behind the prompt, relative to the viewport center
const OVERLAY_SIZE: (f32, f32) = (320.0, 80.0);
/// Speed bar: right inset, top, width, height
const SPEED_BAR: (f32, f32, f32, f32) = (150.0, 14.0, 120.0, 8.0);

fn white(alpha: f32) -> [f32; 4] {
    [WHITE[0], WHITE[1], WHITE[2], alpha]
}

/// Build the full frame for the current state
pub fn build_scene(state: &GameState, art: PickupArt) -> Vec<Vertex> {
    let layout = &state.layout;
    let (w, h) = (layout.width, layout.height);
    let mut vertices = Vec::with_capacity(1024);

    vertices.extend(shapes::vertical_gradient(
        Rect::new(0.0, 0.0, w, h),
        hex(colors::BACKGROUND_TOP, 1.0),
        hex(colors::BACKGROUND_BOTTOM, 1.0),
    ));

    let (band_left, band_right) = layout.band();
    vertices.extend(shapes::rect(
        Rect::new(band_left, 0.0, band_right - band_left, h),
        white(colors::LANE_BAND_ALPHA),
    ));
    for i in 1..crate::consts::LANE_COUNT {
        let x = band_left + layout.lane_width * i as f32;
        vertices.extend(shapes::dashed_vline(
            x,
            0.0,
            h,
            2.0,
            8.0,
            12.0,
            white(colors::DIVIDER_ALPHA),
        ));
    }

    for entity in &state.entities {
        match entity.kind {
            EntityKind::Pickup | EntityKind::BonusPickup => {
                vertices.extend(pickup(entity, art));
            }
            EntityKind::Obstacle { .. } => {
                if let Some(bars) = gate_bars(entity, layout) {
                    let color = hex(colors::GATE, 1.0);
                    for bar in bars {
                        vertices.extend(shapes::rect(bar, color));
                    }
                }
            }
        }
    }

    let player = state.player.bounds();
    vertices.extend(shapes::rounded_rect(
        player,
        (player.h * 0.12).max(10.0),
        hex(colors::PLAYER, 1.0),
        CORNER_SEGMENTS,
    ));

    if !state.is_running() {
        vertices.extend(shapes::rect(
            Rect::new(
                w / 2.0 - OVERLAY_SIZE.0 / 2.0,
                h / 2.0 - OVERLAY_SIZE.1 / 2.0 - 4.0,
                OVERLAY_SIZE.0,
                OVERLAY_SIZE.1,
            ),
            white(colors::OVERLAY_ALPHA),
        ));
    }

    let (inset, top, bar_w, bar_h) = SPEED_BAR;
    vertices.extend(shapes::rect(
        Rect::new(w - inset, top, bar_w, bar_h),
        white(colors::SPEED_TRACK_ALPHA),
    ));
    vertices.extend(shapes::rect(
        Rect::new(w - inset, top, bar_w * state.hud().speed_ratio, bar_h),
        white(colors::SPEED_FILL_ALPHA),
    ));

    vertices
}

fn pickup(entity: &Entity, art: PickupArt) -> Vec<Vertex> {
    let (w, h) = (entity.width, entity.height);
    match art {
        PickupArt::Sprite => shapes::textured_quad(entity.bounds()),
        PickupArt::Procedural => {
            let bonus = entity.kind == EntityKind::BonusPickup;
            let (body, tail) = if bonus {
                (colors::BONUS_BODY, colors::BONUS_TAIL)
            } else {
                (colors::PICKUP_BODY, colors::PICKUP_TAIL)
            };
            let c = entity.pos;
            let mut vertices = shapes::ellipse(
                c,
                Vec2::new(w * 0.45, h * 0.45),
                hex(body, 1.0),
                ELLIPSE_SEGMENTS,
            );
            vertices.extend(shapes::triangle(
                c + Vec2::new(-w * 0.2, 0.0),
                c + Vec2::new(-w * 0.55, -h * 0.25),
                c + Vec2::new(-w * 0.55, h * 0.25),
                hex(tail, 1.0),
            ));
            vertices
        }
    }
}
