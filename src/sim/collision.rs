//! Collision detection against lane-relative geometry
//!
//! Shrimp use a box centered on their position. Gates are two bars hugging
//! the edges of their lane; only the bars are solid.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::Layout;
use super::state::{Entity, EntityKind, GameEvent, GameState};

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap on both axes; touching edges do not count
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// The two solid bars of a gate: left bar first, then right bar
pub fn gate_bars(entity: &Entity, layout: &Layout) -> Option<[Rect; 2]> {
    let EntityKind::Obstacle { bar_width, .. } = entity.kind else {
        return None;
    };
    let half_lane = layout.lane_width / 2.0;
    let top = entity.pos.y - entity.height / 2.0;
    Some([
        Rect::new(entity.pos.x - half_lane, top, bar_width, entity.height),
        Rect::new(
            entity.pos.x + half_lane - bar_width,
            top,
            bar_width,
            entity.height,
        ),
    ])
}

/// What the resolver did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionReport {
    /// Shrimp collected this tick
    pub collected: u32,
    /// Points gained this tick
    pub points: u32,
    /// The runner hit a gate
    pub crashed: bool,
}

/// Check the player against every entity, newest first.
///
/// Collected shrimp are removed and scored. The first gate hit ends the run
/// and stops the scan, so shrimp later in the scan are left alone.
pub fn resolve(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    let player = state.player.bounds();

    for i in (0..state.entities.len()).rev() {
        match state.entities[i].kind {
            EntityKind::Pickup | EntityKind::BonusPickup => {
                if player.intersects(&state.entities[i].bounds()) {
                    let entity = state.entities.remove(i);
                    let points = entity.kind.points();
                    let bonus = entity.kind == EntityKind::BonusPickup;
                    state.score += points;
                    state.events.push(GameEvent::Collected { points, bonus });
                    report.collected += 1;
                    report.points += points;
                    log::debug!("Collected {} (+{}) -> {}", entity.id, points, state.score);
                }
            }
            EntityKind::Obstacle { .. } => {
                let hit = gate_bars(&state.entities[i], &state.layout)
                    .is_some_and(|bars| bars.iter().any(|bar| player.intersects(bar)));
                if hit {
                    state.crash();
                    report.crashed = true;
                    break;
                }
            }
        }
    }

    report
}
