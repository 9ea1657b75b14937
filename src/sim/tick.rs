//! Per-frame simulation tick
//!
//! One tick: apply queued input, spawn, move, cull, slide the runner, resolve
//! collisions. Motion is scaled by the real frame delta against a nominal
//! 60 Hz frame, so the game runs at the same pace at any refresh rate.

use super::collision::{self, CollisionReport};
use super::spawn::maybe_spawn;
use super::state::{Command, GameState};
use crate::consts::*;

/// Input gathered since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Intents in the order they arrived
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Fall speed after `elapsed_ms` of running (non-decreasing, capped)
pub fn speed_for_elapsed(elapsed_ms: f64) -> f32 {
    let steps = (elapsed_ms.max(0.0) / DIFFICULTY_STEP_MS) as f32;
    (BASE_SPEED + steps * SPEED_GAIN_PER_STEP).min(SPEED_CAP)
}

/// Spawn interval after `elapsed_ms` of running (non-increasing, floored).
/// Only completed difficulty steps count.
pub fn spawn_interval_for_elapsed(elapsed_ms: f64) -> f64 {
    let steps = (elapsed_ms.max(0.0) / DIFFICULTY_STEP_MS).floor();
    (BASE_SPAWN_INTERVAL_MS - steps * SPAWN_INTERVAL_STEP_MS).max(SPAWN_INTERVAL_FLOOR_MS)
}

/// Advance the game to host time `now_ms` (a `requestAnimationFrame`
/// timestamp or any other monotonic millisecond clock).
///
/// Returns what the collision pass did, or `None` when the world is frozen.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) -> Option<CollisionReport> {
    for &command in &input.commands {
        state.apply(command, now_ms);
    }

    let dt_ms = match state.last_frame_ms {
        Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_DT_MS),
        None => 0.0,
    };
    state.last_frame_ms = Some(now_ms);

    if !state.is_running() {
        return None;
    }

    let run_time_ms = now_ms - state.started_at_ms;
    maybe_spawn(state, run_time_ms);
    advance(state, dt_ms, run_time_ms);
    Some(collision::resolve(state))
}

/// Difficulty, motion, culling and the lane slide for one frame
fn advance(state: &mut GameState, dt_ms: f64, run_time_ms: f64) {
    state.elapsed_ms = run_time_ms;
    state.speed = speed_for_elapsed(run_time_ms);
    state.spawn_interval_ms = spawn_interval_for_elapsed(run_time_ms);

    let frames = (dt_ms / NOMINAL_FRAME_MS) as f32;
    for entity in &mut state.entities {
        entity.pos.y += entity.fall_speed * frames;
    }

    let floor = state.layout.height;
    state
        .entities
        .retain(|e| e.pos.y < floor + e.height.max(CULL_MARGIN));

    let layout = state.layout;
    state.player.slide_toward_target(&layout);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EntityKind, GameEvent, GamePhase};

    const FRAME: f64 = 16.67;

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed, 1000.0, 800.0);
        let input = TickInput {
            commands: vec![Command::Start],
        };
        tick(&mut state, &input, 0.0);
        state
    }

    #[test]
    fn test_difficulty_curve() {
        assert_eq!(speed_for_elapsed(0.0), BASE_SPEED);
        assert_eq!(spawn_interval_for_elapsed(0.0), 900.0);

        assert!((speed_for_elapsed(10_000.0) - 4.6).abs() < 1e-5);
        assert_eq!(spawn_interval_for_elapsed(10_000.0), 840.0);

        // Interval only drops on completed steps
        assert_eq!(spawn_interval_for_elapsed(19_999.0), 840.0);

        // 150s: interval at the floor, speed still climbing toward the cap
        assert_eq!(spawn_interval_for_elapsed(150_000.0), SPAWN_INTERVAL_FLOOR_MS);
        assert!((speed_for_elapsed(150_000.0) - 13.0).abs() < 1e-4);

        assert_eq!(speed_for_elapsed(300_000.0), SPEED_CAP);
        assert_eq!(speed_for_elapsed(10_000_000.0), SPEED_CAP);
    }

    #[test]
    fn test_curve_is_monotonic() {
        let mut last_speed = 0.0;
        let mut last_interval = f64::MAX;
        for i in 0..400 {
            let t = i as f64 * 1000.0;
            let speed = speed_for_elapsed(t);
            let interval = spawn_interval_for_elapsed(t);
            assert!(speed >= last_speed);
            assert!(interval <= last_interval);
            last_speed = speed;
            last_interval = interval;
        }
    }

    #[test]
    fn test_idle_world_is_frozen() {
        let mut state = GameState::new(1, 1000.0, 800.0);
        for i in 0..100 {
            assert_eq!(tick(&mut state, &TickInput::default(), i as f64 * FRAME), None);
        }
        assert!(state.entities.is_empty());
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_start_spawns_immediately() {
        let state = started(5);
        assert!(state.is_running());
        assert_eq!(state.entities.len(), 1);
        assert_eq!(state.events, vec![GameEvent::Started]);
    }

    #[test]
    fn test_motion_scales_with_frame_delta() {
        let mut state = started(5);
        let before = state.entities[0].pos.y;
        let speed = state.entities[0].fall_speed;
        tick(&mut state, &TickInput::default(), FRAME);
        let after = state.entities[0].pos.y;
        assert!((after - before - speed).abs() < 1e-3);

        // A 200ms stall counts as 40ms
        let before = after;
        tick(&mut state, &TickInput::default(), FRAME + 200.0);
        let moved = state.entities[0].pos.y - before;
        assert!((moved - speed * (40.0 / FRAME) as f32).abs() < 1e-3);
    }

    #[test]
    fn test_entities_culled_below_view() {
        let mut state = started(5);
        state.entities[0].pos.y = state.layout.height + 500.0;
        tick(&mut state, &TickInput::default(), FRAME);
        assert!(state.entities.iter().all(|e| e.pos.y < state.layout.height + 500.0));
    }

    #[test]
    fn test_lane_slide_converges_without_snapping() {
        let mut state = started(5);
        state.entities.clear();
        state.last_spawn_ms = Some(f64::MAX / 4.0);
        let input = TickInput {
            commands: vec![Command::ShiftLeft],
        };
        let start_x = state.player.pos.x;
        tick(&mut state, &input, FRAME);
        let target_x = state.layout.player_x_for_lane(0);
        let first_step = start_x - state.player.pos.x;
        assert!((first_step - (start_x - target_x) * LANE_SLIDE_FACTOR).abs() < 1e-3);
        assert_eq!(state.player.lane, 1);

        for i in 2..60 {
            tick(&mut state, &TickInput::default(), i as f64 * FRAME);
        }
        assert!((state.player.pos.x - target_x).abs() < LANE_SETTLE_EPSILON);
        assert_eq!(state.player.lane, 0);
    }

    #[test]
    fn test_full_run_is_deterministic() {
        let script = |state: &mut GameState| {
            let mut reports = Vec::new();
            for i in 0..2000u32 {
                let mut input = TickInput::default();
                match i % 97 {
                    0 => input.push(Command::ShiftLeft),
                    40 => input.push(Command::ShiftRight),
                    70 => input.push(Command::Start),
                    _ => {}
                }
                reports.push(tick(state, &input, 1000.0 + i as f64 * FRAME));
            }
            reports
        };
        let mut a = GameState::new(99999, 1000.0, 800.0);
        let mut b = GameState::new(99999, 1000.0, 800.0);
        assert_eq!(script(&mut a), script(&mut b));
        assert_eq!(a.entities, b.entities);
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.player, b.player);
    }

    #[test]
    fn test_crash_freezes_world() {
        let mut state = started(5);
        state.entities.clear();
        state.last_spawn_ms = Some(f64::MAX / 4.0);
        state.score = 12;

        let id = state.next_entity_id();
        let mut gate = crate::sim::spawn::build_entity(
            crate::sim::spawn::SpawnRoll {
                lane: 1,
                kind_roll: 0.0,
            },
            id,
            &state.layout,
            BASE_SPEED,
        );
        assert!(matches!(gate.kind, EntityKind::Obstacle { .. }));
        gate.pos.y = state.player.pos.y + state.player.height / 2.0;
        state.entities.push(gate);
        // Runner caught halfway between lanes
        state.player.pos.x -= state.layout.lane_width / 2.0;

        let report = tick(&mut state, &TickInput::default(), FRAME).expect("running");
        assert!(report.crashed);
        assert!(state.is_game_over());
        assert_eq!(state.score, 0);

        let y = state.entities[0].pos.y;
        for i in 2..10 {
            assert_eq!(tick(&mut state, &TickInput::default(), i as f64 * FRAME), None);
        }
        assert_eq!(state.entities[0].pos.y, y);
    }

    #[test]
    fn test_sequential_pickups_across_ticks() {
        let mut state = started(5);
        state.entities.clear();
        state.last_spawn_ms = Some(f64::MAX / 4.0);

        let layout = state.layout;
        for (i, kind_roll) in [0.5_f32, 0.9].into_iter().enumerate() {
            let id = state.next_entity_id();
            let mut shrimp = crate::sim::spawn::build_entity(
                crate::sim::spawn::SpawnRoll { lane: 1, kind_roll },
                id,
                &layout,
                BASE_SPEED,
            );
            // Second shrimp trails far enough behind to land a tick later
            shrimp.pos.y = state.player.pos.y - shrimp.height / 2.0 - 1.0 - i as f32 * 40.0;
            state.entities.push(shrimp);
        }

        let mut t = 0.0;
        while !state.entities.is_empty() && t < 5000.0 {
            t += FRAME;
            tick(&mut state, &TickInput::default(), t);
        }
        assert!(state.entities.is_empty());
        assert_eq!(state.score, PICKUP_POINTS + BONUS_POINTS);
    }
}
