//! Game state and core simulation types
//!
//! The single authoritative owner of everything a run mutates. Renderer and
//! HUD only ever borrow it immutably.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::layout::Layout;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not started yet (or stopped); the world is frozen
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Crashed into a gate; the world is frozen until restart
    GameOver,
}

/// Falling entity types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Shrimp, +1
    Pickup,
    /// Golden shrimp, +3
    BonusPickup,
    /// Two side bars with a passable gap in the middle of the lane
    Obstacle { gap_width: f32, bar_width: f32 },
}

impl EntityKind {
    pub fn is_pickup(&self) -> bool {
        matches!(self, EntityKind::Pickup | EntityKind::BonusPickup)
    }

    /// Score granted when collected (0 for gates)
    pub fn points(&self) -> u32 {
        match self {
            EntityKind::Pickup => PICKUP_POINTS,
            EntityKind::BonusPickup => BONUS_POINTS,
            EntityKind::Obstacle { .. } => 0,
        }
    }
}

/// A falling entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub lane: usize,
    /// Center of the entity (x = lane center, y grows downward)
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Pixels per nominal frame, fixed at spawn
    pub fall_speed: f32,
}

impl Entity {
    /// Hitbox for shrimp (centered on `pos`)
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.width, self.height)
    }
}

/// The player's runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Lane the runner currently occupies
    pub lane: usize,
    /// Lane the runner is sliding toward
    pub target_lane: usize,
    /// Top-left corner of the player box
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Player {
    /// Player centered in `lane` for the given layout
    pub fn in_lane(lane: usize, layout: &Layout) -> Self {
        let lane = lane.min(LANE_COUNT - 1);
        Self {
            lane,
            target_lane: lane,
            pos: Vec2::new(layout.player_x_for_lane(lane), layout.player_y),
            width: layout.player_width,
            height: layout.player_height,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Move the target lane by `delta`, clamped to the outer lanes (never wraps)
    pub fn shift_target(&mut self, delta: isize) {
        let max = (LANE_COUNT - 1) as isize;
        self.target_lane = (self.target_lane as isize + delta).clamp(0, max) as usize;
    }

    /// Slide toward the target lane (geometric decay, never a snap)
    pub fn slide_toward_target(&mut self, layout: &Layout) {
        let target_x = layout.player_x_for_lane(self.target_lane);
        self.pos.x += (target_x - self.pos.x) * LANE_SLIDE_FACTOR;
        if (target_x - self.pos.x).abs() < LANE_SETTLE_EPSILON {
            self.lane = self.target_lane;
        }
    }

    /// Adopt a new layout: resize the box and re-anchor it on the current lane
    pub fn apply_layout(&mut self, layout: &Layout) {
        self.width = layout.player_width;
        self.height = layout.player_height;
        self.pos = Vec2::new(layout.player_x_for_lane(self.lane), layout.player_y);
    }
}

/// Events emitted by the simulation (drained by the host each frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A run began
    Started,
    /// A shrimp was collected
    Collected { points: u32, bonus: bool },
    /// The runner hit a gate; `score` is the score lost
    Crashed { score: u32 },
    /// The run was halted without a crash
    Stopped,
}

/// Intents produced by the input router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Move one lane left; starts the run when not running
    ShiftLeft,
    /// Move one lane right; starts the run when not running
    ShiftRight,
    /// Start when idle or after game over; ignored while running
    Start,
    /// Unconditionally begin a fresh run
    Restart,
    /// Halt the current run without a crash
    Stop,
}

/// Read-only snapshot for the score readout, progress bar and overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub running: bool,
    pub game_over: bool,
    /// Current speed between base (0.0) and cap (1.0)
    pub speed_ratio: f32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the entity RNG
    pub seed: u64,
    rng: Pcg32,
    pub layout: Layout,
    pub player: Player,
    /// Falling entities in spawn order
    pub entities: Vec<Entity>,
    pub score: u32,
    pub phase: GamePhase,
    /// Host timestamp (ms) at which the current run started
    pub started_at_ms: f64,
    /// Host timestamp of the previous frame
    pub last_frame_ms: Option<f64>,
    /// Run time (ms) of the last spawn; `None` spawns on the next running tick
    pub last_spawn_ms: Option<f64>,
    /// Run time (ms) as of the last tick
    pub elapsed_ms: f64,
    /// Current fall speed (px per nominal frame)
    pub speed: f32,
    /// Current minimum time between spawns
    pub spawn_interval_ms: f64,
    /// Pending events for the host
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle game for the given seed and viewport
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let layout = Layout::compute(width, height);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::in_lane(CENTER_LANE, &layout),
            layout,
            entities: Vec::new(),
            score: 0,
            phase: GamePhase::Idle,
            started_at_ms: 0.0,
            last_frame_ms: None,
            last_spawn_ms: None,
            elapsed_ms: 0.0,
            speed: BASE_SPEED,
            spawn_interval_ms: BASE_SPAWN_INTERVAL_MS,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Entity RNG (seeded, never a global source)
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Recompute geometry for a new viewport. Run state is left untouched.
    pub fn relayout(&mut self, width: f32, height: f32) {
        let layout = Layout::compute(width, height);
        if layout != self.layout {
            log::info!(
                "Layout {}x{}: lane width {:.1}",
                layout.width,
                layout.height,
                layout.lane_width
            );
        }
        self.layout = layout;
        self.player.apply_layout(&self.layout);
        for entity in &mut self.entities {
            entity.pos.x = self.layout.lane_center(entity.lane);
        }
    }

    /// Reset everything run-scoped and begin running at `now_ms`
    pub fn start_run(&mut self, now_ms: f64) {
        self.entities.clear();
        self.score = 0;
        self.started_at_ms = now_ms;
        self.elapsed_ms = 0.0;
        self.last_spawn_ms = None;
        self.speed = BASE_SPEED;
        self.spawn_interval_ms = BASE_SPAWN_INTERVAL_MS;
        self.player = Player::in_lane(CENTER_LANE, &self.layout);
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::Started);
        log::info!("Run started");
    }

    /// End the run after hitting a gate
    pub fn crash(&mut self) {
        let lost = self.score;
        self.score = 0;
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::Crashed { score: lost });
        log::info!("Crashed after {:.1}s with {} shrimp", self.elapsed_ms / 1000.0, lost);
    }

    /// Apply an input intent
    pub fn apply(&mut self, command: Command, now_ms: f64) {
        match command {
            Command::ShiftLeft | Command::ShiftRight => {
                if !self.is_running() {
                    self.start_run(now_ms);
                }
                let delta = if command == Command::ShiftLeft { -1 } else { 1 };
                self.player.shift_target(delta);
            }
            Command::Start => {
                if !self.is_running() {
                    self.start_run(now_ms);
                }
            }
            Command::Restart => self.start_run(now_ms),
            Command::Stop => {
                if self.is_running() {
                    self.phase = GamePhase::Idle;
                    self.events.push(GameEvent::Stopped);
                    log::info!("Run stopped with {} shrimp", self.score);
                }
            }
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            running: self.is_running(),
            game_over: self.is_game_over(),
            speed_ratio: ((self.speed - BASE_SPEED) / (SPEED_CAP - BASE_SPEED)).clamp(0.0, 1.0),
        }
    }

    /// Overlay prompt shown while the world is frozen
    pub fn overlay_message(&self) -> Option<&'static str> {
        match self.phase {
            GamePhase::Idle => Some("Tap or press ← → to start"),
            GamePhase::GameOver => Some("Game Over! Press Restart"),
            GamePhase::Running => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> GameState {
        GameState::new(7, 1000.0, 800.0)
    }

    #[test]
    fn test_new_game_is_idle_in_center_lane() {
        let state = game();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.player.lane, CENTER_LANE);
        assert_eq!(state.player.target_lane, CENTER_LANE);
        assert!((state.player.pos.x - 430.0).abs() < 1e-3);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_shift_clamps_without_wrapping() {
        let mut state = game();
        state.apply(Command::ShiftLeft, 0.0);
        state.apply(Command::ShiftLeft, 0.0);
        state.apply(Command::ShiftLeft, 0.0);
        assert_eq!(state.player.target_lane, 0);
        for _ in 0..5 {
            state.apply(Command::ShiftRight, 0.0);
        }
        assert_eq!(state.player.target_lane, LANE_COUNT - 1);
    }

    #[test]
    fn test_shift_starts_idle_run_and_keeps_lane_change() {
        let mut state = game();
        state.apply(Command::ShiftRight, 100.0);
        assert!(state.is_running());
        assert_eq!(state.player.target_lane, 2);
        assert_eq!(state.started_at_ms, 100.0);
        assert_eq!(state.drain_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut state = game();
        state.apply(Command::Start, 0.0);
        state.score = 5;
        state.player.target_lane = 2;
        state.apply(Command::Start, 500.0);
        assert_eq!(state.score, 5);
        assert_eq!(state.player.target_lane, 2);
        assert_eq!(state.started_at_ms, 0.0);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = game();
        state.apply(Command::Start, 0.0);
        state.score = 9;
        state.speed = 12.0;
        state.spawn_interval_ms = 300.0;
        state.player.target_lane = 0;
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            kind: EntityKind::Pickup,
            lane: 0,
            pos: Vec2::new(300.0, 10.0),
            width: 10.0,
            height: 10.0,
            fall_speed: 4.0,
        });

        state.apply(Command::Restart, 2000.0);
        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert!(state.entities.is_empty());
        assert_eq!(state.speed, BASE_SPEED);
        assert_eq!(state.spawn_interval_ms, BASE_SPAWN_INTERVAL_MS);
        assert_eq!(state.player.lane, CENTER_LANE);
        assert_eq!(state.player.target_lane, CENTER_LANE);
        assert_eq!(state.last_spawn_ms, None);
    }

    #[test]
    fn test_start_after_game_over() {
        let mut state = game();
        state.apply(Command::Start, 0.0);
        state.crash();
        assert!(state.is_game_over());
        assert!(!state.is_running());
        state.apply(Command::Start, 10.0);
        assert!(state.is_running());
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_stop_keeps_score() {
        let mut state = game();
        state.apply(Command::Start, 0.0);
        state.score = 4;
        state.drain_events();
        state.apply(Command::Stop, 10.0);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 4);
        assert_eq!(state.drain_events(), vec![GameEvent::Stopped]);

        // Stopping an idle game does nothing
        state.apply(Command::Stop, 20.0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_relayout_keeps_run_state() {
        let mut state = game();
        state.apply(Command::ShiftLeft, 0.0);
        state.score = 3;
        let id = state.next_entity_id();
        state.entities.push(Entity {
            id,
            kind: EntityKind::Pickup,
            lane: 2,
            pos: Vec2::new(state.layout.lane_center(2), 40.0),
            width: 10.0,
            height: 10.0,
            fall_speed: 4.0,
        });
        state.relayout(600.0, 500.0);
        assert_eq!(state.entities.len(), 1);
        assert!((state.entities[0].pos.x - state.layout.lane_center(2)).abs() < 1e-3);
        assert_eq!(state.entities[0].pos.y, 40.0);
        assert!(state.is_running());
        assert_eq!(state.score, 3);
        assert_eq!(state.player.target_lane, 0);
        // Re-anchored on the current lane, not the target lane
        assert!((state.player.pos.x - state.layout.player_x_for_lane(CENTER_LANE)).abs() < 1e-3);
        assert_eq!(state.player.width, state.layout.player_width);
    }

    #[test]
    fn test_hud_speed_ratio() {
        let mut state = game();
        assert_eq!(state.hud().speed_ratio, 0.0);
        state.speed = 12.0;
        assert!((state.hud().speed_ratio - 0.5).abs() < 1e-6);
        state.speed = SPEED_CAP;
        assert_eq!(state.hud().speed_ratio, 1.0);
    }

    #[test]
    fn test_overlay_message() {
        let mut state = game();
        assert_eq!(state.overlay_message(), Some("Tap or press ← → to start"));
        state.apply(Command::Start, 0.0);
        assert_eq!(state.overlay_message(), None);
        state.crash();
        assert_eq!(state.overlay_message(), Some("Game Over! Press Restart"));
    }
}
