//! Time-gated entity spawner
//!
//! The random draw is split from entity construction so the geometry can be
//! tested with hand-picked rolls.

use glam::Vec2;
use rand::Rng;

use super::layout::Layout;
use super::state::{Entity, EntityKind, GameState};
use crate::consts::*;

/// One random draw: which lane, and a uniform value in [0, 1) picking the kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRoll {
    pub lane: usize,
    pub kind_roll: f32,
}

impl SpawnRoll {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            lane: rng.random_range(0..LANE_COUNT),
            kind_roll: rng.random::<f32>(),
        }
    }
}

/// Gap and bar width for a gate in the given layout.
///
/// The gap always clears the player plus a fixed margin. Bars are floored to
/// whole pixels and never thinner than the minimum bar width.
pub fn gate_dimensions(layout: &Layout) -> (f32, f32) {
    let lane = layout.lane_width;
    let gap = (layout.player_width + GATE_CLEARANCE).max(lane * GATE_MIN_GAP_LANE_SHARE);
    let bar = ((lane - gap) / 2.0).floor().max(GATE_MIN_BAR_WIDTH);
    (gap, bar)
}

/// Build the entity a roll describes, placed above the visible area
pub fn build_entity(roll: SpawnRoll, id: u32, layout: &Layout, speed: f32) -> Entity {
    let lane = roll.lane.min(LANE_COUNT - 1);
    let lane_width = layout.lane_width;

    let (kind, width, height) = if roll.kind_roll < OBSTACLE_THRESHOLD {
        let (gap_width, bar_width) = gate_dimensions(layout);
        (
            EntityKind::Obstacle {
                gap_width,
                bar_width,
            },
            lane_width,
            GATE_MIN_HEIGHT.max(lane_width * GATE_HEIGHT_LANE_SHARE),
        )
    } else if roll.kind_roll < PICKUP_THRESHOLD {
        (
            EntityKind::Pickup,
            PICKUP_MIN_SIZE.0.max(lane_width * PICKUP_LANE_SHARE.0),
            PICKUP_MIN_SIZE.1.max(lane_width * PICKUP_LANE_SHARE.1),
        )
    } else {
        (
            EntityKind::BonusPickup,
            BONUS_MIN_SIZE.0.max(lane_width * BONUS_LANE_SHARE.0),
            BONUS_MIN_SIZE.1.max(lane_width * BONUS_LANE_SHARE.1),
        )
    };

    Entity {
        id,
        kind,
        lane,
        pos: Vec2::new(layout.lane_center(lane), SPAWN_Y),
        width,
        height,
        fall_speed: speed,
    }
}

/// Append at most one entity if the spawn interval has elapsed.
///
/// `run_time_ms` is the time since the run started. Returns the new entity's
/// ID when something spawned.
pub fn maybe_spawn(state: &mut GameState, run_time_ms: f64) -> Option<u32> {
    if !state.is_running() {
        return None;
    }
    if let Some(last) = state.last_spawn_ms {
        if run_time_ms - last < state.spawn_interval_ms {
            return None;
        }
    }
    state.last_spawn_ms = Some(run_time_ms);

    let roll = SpawnRoll::draw(state.rng());
    let id = state.next_entity_id();
    let entity = build_entity(roll, id, &state.layout, state.speed);
    log::debug!("Spawned {:?} #{} in lane {}", entity.kind, id, entity.lane);
    state.entities.push(entity);
    Some(id)
}
