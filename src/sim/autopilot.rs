//! Demo autopilot
//!
//! Picks lane commands the way a cautious player would: stay clear of gates
//! that are about to reach the runner, otherwise chase the nearest shrimp.
//! Used for the attract mode in the browser and the headless native run.

use super::state::{Command, EntityKind, GameState};
use crate::consts::*;

/// How far above the runner (px) a gate counts as a threat
const THREAT_RANGE: f32 = 260.0;

/// Choose the next command, or `None` to keep the current course
pub fn choose_command(state: &GameState) -> Option<Command> {
    if !state.is_running() {
        return Some(Command::Start);
    }

    // Wait for the current slide to land before deciding again
    if state.player.lane != state.player.target_lane {
        return None;
    }

    let runner_top = state.player.pos.y;
    let runner_bottom = runner_top + state.player.height;
    let mut threatened = [false; LANE_COUNT];
    let mut best_pickup: Option<(usize, f32, u32)> = None;

    for entity in &state.entities {
        let top = entity.pos.y - entity.height / 2.0;
        let bottom = entity.pos.y + entity.height / 2.0;
        let distance = runner_top - bottom;
        match entity.kind {
            EntityKind::Obstacle { .. } => {
                if distance < THREAT_RANGE && top < runner_bottom {
                    threatened[entity.lane] = true;
                }
            }
            kind => {
                if distance < 0.0 {
                    continue;
                }
                let better = match best_pickup {
                    None => true,
                    Some((_, d, points)) => {
                        kind.points() > points || (kind.points() == points && distance < d)
                    }
                };
                if better {
                    best_pickup = Some((entity.lane, distance, kind.points()));
                }
            }
        }
    }

    let lane = state.player.lane;
    let target = match best_pickup {
        Some((pickup_lane, _, _)) if !path_blocked(lane, pickup_lane, &threatened) => pickup_lane,
        _ => lane,
    };

    // A one-lane step is only taken if the lane in between is safe
    let next = if target > lane {
        lane + 1
    } else if target < lane {
        lane - 1
    } else {
        lane
    };

    // Moving mid-gate is what crashes the runner, so a threatened lane is held
    if threatened[lane] {
        return None;
    }
    if next != lane && !threatened[next] {
        return Some(if next > lane {
            Command::ShiftRight
        } else {
            Command::ShiftLeft
        });
    }
    None
}

fn path_blocked(from: usize, to: usize, threatened: &[bool; LANE_COUNT]) -> bool {
    let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
    (lo..=hi).filter(|&l| l != from).any(|l| threatened[l])
}
