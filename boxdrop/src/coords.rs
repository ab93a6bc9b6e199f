// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Screen and world coordinates
//!
//! Screen pixels have their origin at the top-left corner with y pointing
//! down. World coordinates are in meters with the origin at the bottom-left
//! corner of the window and y pointing up. The two are related by a fixed
//! pixels-per-meter scale and the current window height.

use std::fmt;

/// A position in window pixels, origin top-left, y down
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    /// Pixels from the left edge
    pub x: f32,
    /// Pixels from the top edge
    pub y: f32,
}

impl PixelPoint {
    /// Create a pixel position
    pub fn new(x: f32, y: f32) -> Self {
        PixelPoint { x, y }
    }
}

/// A position in world meters, origin bottom-left, y up
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPoint {
    /// Meters from the left edge
    pub x: f32,
    /// Meters above the bottom edge
    pub y: f32,
}

impl WorldPoint {
    /// Create a world position
    pub fn new(x: f32, y: f32) -> Self {
        WorldPoint { x, y }
    }

    /// Check if both coordinates are finite
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}m, {:.3}m)", self.x, self.y)
    }
}

/// Current window size and the scale used to map it into the world
///
/// Only the reshape callback mutates this. The visible world extent is
/// derived from the stored size on every call, so it can never lag behind
/// a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenState {
    width: u32,
    height: u32,
    pixels_per_meter: f32,
}

impl ScreenState {
    /// Create a screen state for a window of the given pixel size
    pub fn new(width: u32, height: u32, pixels_per_meter: f32) -> Self {
        ScreenState {
            width,
            height,
            pixels_per_meter,
        }
    }

    /// Window width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Window height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels per world meter
    pub fn pixels_per_meter(&self) -> f32 {
        self.pixels_per_meter
    }

    /// World meters per pixel
    pub fn meters_per_pixel(&self) -> f32 {
        1.0 / self.pixels_per_meter
    }

    /// Record a new window size
    ///
    /// A zero-sized window (minimized) is ignored and the previous size is
    /// kept. Returns whether the size was applied.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    /// Width and height of the visible world, in meters
    pub fn visible_extent(&self) -> [f32; 2] {
        [
            self.width as f32 * self.meters_per_pixel(),
            self.height as f32 * self.meters_per_pixel(),
        ]
    }

    /// Map a pixel position to the world
    pub fn screen_to_world(&self, point: PixelPoint) -> WorldPoint {
        let mpp = self.meters_per_pixel();
        WorldPoint::new(point.x * mpp, (self.height as f32 - point.y) * mpp)
    }

    /// Map a world position to window pixels
    pub fn world_to_screen(&self, point: WorldPoint) -> PixelPoint {
        let ppm = self.pixels_per_meter;
        PixelPoint::new(point.x * ppm, self.height as f32 - point.y * ppm)
    }
}
