//! Lane geometry derived from the viewport
//!
//! Everything here is a pure function of the viewport size. Recomputing the
//! layout never touches run state.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Lane centers, lane width and player box size for one viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Viewport width after clamping (CSS pixels)
    pub width: f32,
    /// Viewport height after clamping (CSS pixels)
    pub height: f32,
    /// Left edge of the lane band
    pub lane_left: f32,
    pub lane_width: f32,
    pub lane_centers: [f32; LANE_COUNT],
    pub player_width: f32,
    pub player_height: f32,
    /// Top edge of the player box
    pub player_y: f32,
}

impl Layout {
    /// Compute the layout for a viewport, clamping it to the supported bounds
    pub fn compute(width: f32, height: f32) -> Self {
        let width = clamp_dimension(width, VIEWPORT_MIN_WIDTH, VIEWPORT_MAX_WIDTH);
        let height = clamp_dimension(height, VIEWPORT_MIN_HEIGHT, VIEWPORT_MAX_HEIGHT);

        let band = width * LANE_BAND_SHARE;
        let lane_left = (width - band) / 2.0;
        let lane_width = band / LANE_COUNT as f32;

        let mut lane_centers = [0.0; LANE_COUNT];
        for (i, center) in lane_centers.iter_mut().enumerate() {
            *center = lane_left + lane_width * i as f32 + lane_width / 2.0;
        }

        let player_width =
            (width * PLAYER_VIEWPORT_WIDTH_SHARE).min(lane_width * PLAYER_LANE_WIDTH_SHARE);
        let player_height = PLAYER_MIN_HEIGHT.max(height * PLAYER_VIEWPORT_HEIGHT_SHARE);
        let player_y = height - player_height - PLAYER_BOTTOM_MARGIN;

        Self {
            width,
            height,
            lane_left,
            lane_width,
            lane_centers,
            player_width,
            player_height,
            player_y,
        }
    }

    /// Center of a lane (out-of-range lanes clamp to the nearest edge lane)
    pub fn lane_center(&self, lane: usize) -> f32 {
        self.lane_centers[lane.min(LANE_COUNT - 1)]
    }

    /// Left edge of the player box when centered on a lane
    pub fn player_x_for_lane(&self, lane: usize) -> f32 {
        self.lane_center(lane) - self.player_width / 2.0
    }

    /// Horizontal extent of the lane band
    pub fn band(&self) -> (f32, f32) {
        (self.lane_left, self.lane_left + self.lane_width * LANE_COUNT as f32)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::compute(VIEWPORT_MIN_WIDTH, VIEWPORT_MIN_HEIGHT)
    }
}

/// Canvas size (CSS pixels) for a browser window of the given inner size
pub fn viewport_for_window(inner_width: f32, inner_height: f32) -> (f32, f32) {
    (
        clamp_dimension(
            (inner_width * WINDOW_WIDTH_SHARE).floor(),
            VIEWPORT_MIN_WIDTH,
            VIEWPORT_MAX_WIDTH,
        ),
        clamp_dimension(
            (inner_height * WINDOW_HEIGHT_SHARE).floor(),
            VIEWPORT_MIN_HEIGHT,
            VIEWPORT_MAX_HEIGHT,
        ),
    )
}

// NaN compares false everywhere, so it is mapped to the minimum explicitly
fn clamp_dimension(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
