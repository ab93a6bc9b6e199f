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
//! Engine configuration
//!
//! [`EngineConfig`] carries everything the facade needs: window setup,
//! pixel scale, frame rate, solver settings and the pixel layout of the
//! spawned boxes and the static platform. [`WorldConfig`] is the
//! meter-space subset handed to the world manager.
//!
//! # Environment Configuration
//!
//! [`EngineConfig::from_env`] applies these overrides on top of the defaults:
//!
//! ```bash
//! export BOXDROP_FPS=120
//! export BOXDROP_PIXELS_PER_METER=32
//! export BOXDROP_WINDOW_SIZE=1024x768
//! ```

use crate::coords::{ScreenState, WorldPoint};
use crate::error::ConfigError;
use std::time::Duration;

/// Environment variable overriding the target frame rate
pub const ENV_FPS: &str = "BOXDROP_FPS";
/// Environment variable overriding the pixels-per-meter scale
pub const ENV_PIXELS_PER_METER: &str = "BOXDROP_PIXELS_PER_METER";
/// Environment variable overriding the window size, as `WIDTHxHEIGHT`
pub const ENV_WINDOW_SIZE: &str = "BOXDROP_WINDOW_SIZE";

/// Timesteps below this lose precision in single-precision solver math
const MIN_TIMESTEP: f32 = 1e-4;
/// Timesteps above this let boxes tunnel through the platform
const MAX_TIMESTEP: f32 = 0.1;

/// How the window is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenMode {
    /// Borderless fullscreen on the current monitor
    FullScreen,
    /// A regular resizable window at the configured size
    Windowed,
}

/// Physics settings in world units (meters, seconds)
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    /// Gravity vector in m/s², y up
    pub gravity: [f32; 2],
    /// Fixed simulation timestep in seconds
    pub timestep: f32,
    /// Velocity solver passes per step
    pub velocity_iterations: usize,
    /// Position correction passes per step
    pub position_iterations: usize,
    /// Density applied to every rectangle collider
    pub density: f32,
    /// Center of the static platform
    pub platform_center: WorldPoint,
    /// Full width and height of the static platform
    pub platform_size: [f32; 2],
}

impl Default for WorldConfig {
    fn default() -> Self {
        EngineConfig::default().world_config()
    }
}

/// Complete engine configuration
///
/// Defaults are a 1280x1024 window, 40 pixels per meter, 60 frames per
/// second, 5 velocity and 5 position iterations, 20x20 pixel boxes and a
/// 30 pixel platform as wide as the window, 50 pixels above the bottom edge.
///
/// # Examples
///
/// ```
/// use boxdrop::config::EngineConfig;
///
/// let config = EngineConfig::default().with_frames_per_second(30);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.timer_period().as_millis(), 33);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Window title
    pub window_title: String,
    /// Nominal window width in pixels
    pub window_width: u32,
    /// Nominal window height in pixels
    pub window_height: u32,
    /// Scale between screen pixels and world meters
    pub pixels_per_meter: f32,
    /// Target frame rate; sets both the timer period and the timestep
    pub frames_per_second: u32,
    /// Gravity vector in m/s², y up
    pub gravity: [f32; 2],
    /// Velocity solver passes per step
    pub velocity_iterations: usize,
    /// Position correction passes per step
    pub position_iterations: usize,
    /// Density applied to every rectangle collider
    pub density: f32,
    /// Size of a box spawned by a click, in pixels
    pub spawn_size_px: [f32; 2],
    /// Width of the static platform in pixels; `None` spans the window width
    pub platform_width_px: Option<f32>,
    /// Height of the static platform, in pixels
    pub platform_height_px: f32,
    /// Distance from the bottom of the nominal window to the platform center, in pixels
    pub platform_offset_px: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            window_title: "boxdrop".to_string(),
            window_width: 1280,
            window_height: 1024,
            pixels_per_meter: 40.0,
            frames_per_second: 60,
            gravity: [0.0, -9.8],
            velocity_iterations: 5,
            position_iterations: 5,
            density: 1.0,
            spawn_size_px: [20.0, 20.0],
            platform_width_px: None,
            platform_height_px: 30.0,
            platform_offset_px: 50.0,
        }
    }
}

impl EngineConfig {
    /// Set the target frame rate
    pub fn with_frames_per_second(mut self, fps: u32) -> Self {
        self.frames_per_second = fps;
        self
    }

    /// Set the pixels-per-meter scale
    pub fn with_pixels_per_meter(mut self, pixels_per_meter: f32) -> Self {
        self.pixels_per_meter = pixels_per_meter;
        self
    }

    /// Set the nominal window size
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set the gravity vector
    pub fn with_gravity(mut self, x: f32, y: f32) -> Self {
        self.gravity = [x, y];
        self
    }

    /// Set the solver iteration counts
    pub fn with_iterations(mut self, velocity: usize, position: usize) -> Self {
        self.velocity_iterations = velocity;
        self.position_iterations = position;
        self
    }

    /// Set a fixed platform width in pixels instead of the window width
    pub fn with_platform_width(mut self, width: f32) -> Self {
        self.platform_width_px = Some(width);
        self
    }

    /// Set the window title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    /// Load defaults and apply `BOXDROP_*` environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Apply overrides fetched through `lookup` on top of the defaults
    ///
    /// `lookup` receives a variable name and returns its value, if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = EngineConfig::default();

        if let Some(value) = lookup(ENV_FPS) {
            config.frames_per_second = value.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_FPS,
                value: value.clone(),
                expected: "a positive integer",
            })?;
        }

        if let Some(value) = lookup(ENV_PIXELS_PER_METER) {
            config.pixels_per_meter = value.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_PIXELS_PER_METER,
                value: value.clone(),
                expected: "a positive number",
            })?;
        }

        if let Some(value) = lookup(ENV_WINDOW_SIZE) {
            let (width, height) = parse_window_size(&value).ok_or_else(|| ConfigError::Env {
                var: ENV_WINDOW_SIZE,
                value: value.clone(),
                expected: "WIDTHxHEIGHT",
            })?;
            config.window_width = width;
            config.window_height = height;
        }

        Ok(config)
    }

    /// Fixed simulation timestep in seconds
    pub fn timestep(&self) -> f32 {
        1.0 / self.frames_per_second as f32
    }

    /// Delay between timer callbacks, `1000 / fps` whole milliseconds
    pub fn timer_period(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.frames_per_second.max(1)))
    }

    /// Screen state for the nominal window size
    pub fn nominal_screen(&self) -> ScreenState {
        ScreenState::new(self.window_width, self.window_height, self.pixels_per_meter)
    }

    /// Size of a spawned box in meters
    pub fn spawn_size(&self) -> [f32; 2] {
        [
            self.spawn_size_px[0] / self.pixels_per_meter,
            self.spawn_size_px[1] / self.pixels_per_meter,
        ]
    }

    /// Size of the static platform in pixels
    pub fn platform_size_px(&self) -> [f32; 2] {
        [
            self.platform_width_px.unwrap_or(self.window_width as f32),
            self.platform_height_px,
        ]
    }

    /// Derive the meter-space world settings
    ///
    /// The platform is laid out against the nominal window: centered
    /// horizontally, `platform_offset_px` above the bottom edge.
    pub fn world_config(&self) -> WorldConfig {
        let ppm = self.pixels_per_meter;
        WorldConfig {
            gravity: self.gravity,
            timestep: self.timestep(),
            velocity_iterations: self.velocity_iterations,
            position_iterations: self.position_iterations,
            density: self.density,
            platform_center: WorldPoint::new(
                self.window_width as f32 / 2.0 / ppm,
                self.platform_offset_px / ppm,
            ),
            platform_size: {
                let [width, height] = self.platform_size_px();
                [width / ppm, height / ppm]
            },
        }
    }

    /// Validate every setting
    ///
    /// Extremely small timesteps lose precision and large ones make the
    /// solver unstable, so the frame rate is checked through the timestep
    /// it produces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frames_per_second == 0 {
            return Err(ConfigError::FrameRate(0));
        }

        let dt = self.timestep();
        if dt < MIN_TIMESTEP {
            return Err(ConfigError::Timestep(
                dt,
                "Timestep is extremely small and may cause precision loss.",
            ));
        }
        if dt > MAX_TIMESTEP {
            return Err(ConfigError::Timestep(
                dt,
                "Timestep is large and may cause instability.",
            ));
        }

        if !(self.pixels_per_meter.is_finite() && self.pixels_per_meter > 0.0) {
            return Err(ConfigError::Scale(self.pixels_per_meter));
        }

        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::WindowSize {
                width: self.window_width,
                height: self.window_height,
            });
        }

        if self.velocity_iterations == 0 {
            return Err(ConfigError::Iterations { name: "velocity" });
        }
        if self.position_iterations == 0 {
            return Err(ConfigError::Iterations { name: "position" });
        }

        if !(self.gravity[0].is_finite() && self.gravity[1].is_finite()) {
            return Err(ConfigError::Gravity(self.gravity[0], self.gravity[1]));
        }

        check_size("spawned box", self.spawn_size_px)?;
        check_size("platform", self.platform_size_px())?;

        Ok(())
    }
}

fn check_size(name: &'static str, size: [f32; 2]) -> Result<(), ConfigError> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if valid(size[0]) && valid(size[1]) {
        Ok(())
    } else {
        Err(ConfigError::BodySize {
            name,
            width: size[0],
            height: size[1],
        })
    }
}

fn parse_window_size(value: &str) -> Option<(u32, u32)> {
    let (width, height) = value.trim().split_once(['x', 'X'])?;
    Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_world_layout() {
        let world = EngineConfig::default().world_config();
        assert_eq!(world.platform_center, WorldPoint::new(16.0, 1.25));
        assert_eq!(world.platform_size, [32.0, 0.75]);
        assert!((world.timestep - 1.0 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn test_timer_period_truncates_to_millis() {
        assert_eq!(EngineConfig::default().timer_period(), Duration::from_millis(16));
    }

    #[test]
    fn test_zero_frame_rate_rejected() {
        let config = EngineConfig::default().with_frames_per_second(0);
        assert_eq!(config.validate(), Err(ConfigError::FrameRate(0)));
    }

    #[test]
    fn test_large_timestep_rejected() {
        let config = EngineConfig::default().with_frames_per_second(5);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("large"));
    }

    #[test]
    fn test_small_timestep_rejected() {
        let config = EngineConfig::default().with_frames_per_second(100_000);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("extremely small"));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = EngineConfig::default().with_iterations(5, 0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::Iterations { name: "position" })
        );
    }

    #[test]
    fn test_non_finite_scale_rejected() {
        let config = EngineConfig::default().with_pixels_per_meter(f32::NAN);
        assert!(matches!(config.validate(), Err(ConfigError::Scale(_))));
    }

    #[test]
    fn test_lookup_overrides() {
        let config = EngineConfig::from_lookup(|var| match var {
            ENV_FPS => Some("30".to_string()),
            ENV_WINDOW_SIZE => Some("800x600".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.frames_per_second, 30);
        assert_eq!((config.window_width, config.window_height), (800, 600));
        assert_eq!(config.pixels_per_meter, 40.0);
    }

    #[test]
    fn test_platform_spans_overridden_window() {
        let config = EngineConfig::from_lookup(|var| match var {
            ENV_WINDOW_SIZE => Some("800x600".to_string()),
            _ => None,
        })
        .unwrap();
        let world = config.world_config();
        let half_width = world.platform_size[0] / 2.0;

        assert_eq!(world.platform_center.x - half_width, 0.0);
        assert_eq!(world.platform_center.x + half_width, 20.0);
        assert_eq!(config.nominal_screen().visible_extent()[0], 20.0);
    }

    #[test]
    fn test_explicit_platform_width_kept() {
        let config = EngineConfig::default()
            .with_window_size(800, 600)
            .with_platform_width(400.0);
        assert_eq!(config.platform_size_px(), [400.0, 30.0]);
        assert_eq!(config.world_config().platform_size, [10.0, 0.75]);
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = EngineConfig::from_lookup(|var| match var {
            ENV_WINDOW_SIZE => Some("wide".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_WINDOW_SIZE, .. }));
    }
}
