//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied timestamps only (no clock reads)
//! - Seeded RNG only
//! - Stable iteration order (storage order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod layout;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::choose_command;
pub use collision::{CollisionReport, Rect, gate_bars};
pub use layout::{Layout, viewport_for_window};
pub use spawn::{SpawnRoll, build_entity, gate_dimensions, maybe_spawn};
pub use state::{Command, Entity, EntityKind, GameEvent, GamePhase, GameState, Hud, Player};
pub use tick::{TickInput, spawn_interval_for_elapsed, speed_for_elapsed, tick};
