//! Shrimp Run - a three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (layout, spawning, motion, collisions)
//! - `renderer`: WebGPU rendering pipeline fed by a pure scene builder
//! - `platform`: Browser input mapping
//! - `audio`: Sound cues for simulation events
//! - `settings`: Player preferences (mute, volumes)

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants (the single built-in difficulty curve)
pub mod consts {
    /// Number of lanes
    pub const LANE_COUNT: usize = 3;
    /// Lane the player starts in
    pub const CENTER_LANE: usize = 1;

    /// Viewport bounds (CSS pixels)
    pub const VIEWPORT_MIN_WIDTH: f32 = 320.0;
    pub const VIEWPORT_MAX_WIDTH: f32 = 1100.0;
    pub const VIEWPORT_MIN_HEIGHT: f32 = 420.0;
    pub const VIEWPORT_MAX_HEIGHT: f32 = 900.0;
    /// Share of the browser window given to the canvas
    pub const WINDOW_WIDTH_SHARE: f32 = 0.92;
    pub const WINDOW_HEIGHT_SHARE: f32 = 0.62;

    /// Share of the viewport width covered by the three lanes
    pub const LANE_BAND_SHARE: f32 = 0.6;

    /// Player box
    pub const PLAYER_VIEWPORT_WIDTH_SHARE: f32 = 0.14;
    pub const PLAYER_LANE_WIDTH_SHARE: f32 = 0.7;
    pub const PLAYER_MIN_HEIGHT: f32 = 28.0;
    pub const PLAYER_VIEWPORT_HEIGHT_SHARE: f32 = 0.12;
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;
    /// Fraction of the remaining distance covered per tick when changing lanes
    pub const LANE_SLIDE_FACTOR: f32 = 0.28;
    /// Distance (px) under which a slide counts as settled
    pub const LANE_SETTLE_EPSILON: f32 = 0.5;

    /// Fall speed in pixels per nominal frame
    pub const BASE_SPEED: f32 = 4.0;
    pub const SPEED_CAP: f32 = 20.0;
    /// Speed gained per difficulty step
    pub const SPEED_GAIN_PER_STEP: f32 = 0.6;
    /// Difficulty step length (ms)
    pub const DIFFICULTY_STEP_MS: f64 = 10_000.0;

    /// Spawn interval curve (ms)
    pub const BASE_SPAWN_INTERVAL_MS: f64 = 900.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 60.0;
    pub const SPAWN_INTERVAL_FLOOR_MS: f64 = 220.0;

    /// Reference frame duration that fall speeds are expressed against
    pub const NOMINAL_FRAME_MS: f64 = 16.67;
    /// Largest frame delta accepted (avoids jumps after a stall)
    pub const MAX_FRAME_DT_MS: f64 = 40.0;

    /// Entities appear above the visible area
    pub const SPAWN_Y: f32 = -80.0;
    /// Entities are culled once this far (at least) below the viewport
    pub const CULL_MARGIN: f32 = 120.0;

    /// Uniform draw thresholds: below OBSTACLE is a gate, below PICKUP a shrimp,
    /// the rest bonus shrimp
    pub const OBSTACLE_THRESHOLD: f32 = 0.25;
    pub const PICKUP_THRESHOLD: f32 = 0.8;

    /// Gate geometry
    pub const GATE_CLEARANCE: f32 = 36.0;
    pub const GATE_MIN_GAP_LANE_SHARE: f32 = 0.5;
    pub const GATE_MIN_BAR_WIDTH: f32 = 8.0;
    pub const GATE_MIN_HEIGHT: f32 = 40.0;
    pub const GATE_HEIGHT_LANE_SHARE: f32 = 0.45;

    /// Shrimp hitboxes
    pub const PICKUP_MIN_SIZE: (f32, f32) = (32.0, 24.0);
    pub const PICKUP_LANE_SHARE: (f32, f32) = (0.5, 0.36);
    pub const BONUS_MIN_SIZE: (f32, f32) = (40.0, 32.0);
    pub const BONUS_LANE_SHARE: (f32, f32) = (0.7, 0.5);

    /// Score per collected shrimp
    pub const PICKUP_POINTS: u32 = 1;
    pub const BONUS_POINTS: u32 = 3;

    /// Horizontal pointer travel (px) that counts as a swipe
    pub const SWIPE_THRESHOLD: f32 = 40.0;
}
