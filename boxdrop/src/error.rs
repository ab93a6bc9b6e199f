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
//! Error types
//!
//! Only configuration and graphics setup can fail. Body creation, stepping
//! and rasterizing are infallible; presenting a frame to a real window is
//! the one runtime operation that reports errors.

use thiserror::Error;

/// Problems found while validating or loading an [`EngineConfig`](crate::config::EngineConfig)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Frame rate must be at least one frame per second
    #[error("Invalid frame rate: {0}. Must be positive.")]
    FrameRate(u32),

    /// Simulation timestep outside the range the solver handles well
    #[error("Invalid timestep: {0}s. {1}")]
    Timestep(f32, &'static str),

    /// Pixels-per-meter must be positive and finite
    #[error("Invalid pixels per meter: {0}. Must be positive and finite.")]
    Scale(f32),

    /// Window dimensions must both be non-zero
    #[error("Invalid window size: {width}x{height}. Both dimensions must be non-zero.")]
    WindowSize {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// Solver passes must run at least once
    #[error("Invalid {name} iteration count: 0. Must be at least 1.")]
    Iterations {
        /// Which solver pass was misconfigured
        name: &'static str,
    },

    /// Gravity components must be finite
    #[error("Invalid gravity: ({0}, {1}). Components must be finite.")]
    Gravity(f32, f32),

    /// Body dimensions must be positive and finite
    #[error("Invalid {name} size: {width}x{height}. Must be positive and finite.")]
    BodySize {
        /// Which body size was misconfigured
        name: &'static str,
        /// Width in pixels
        width: f32,
        /// Height in pixels
        height: f32,
    },

    /// An environment override could not be parsed
    #[error("Could not parse {var}={value:?}: expected {expected}")]
    Env {
        /// Environment variable name
        var: &'static str,
        /// Raw value found in the environment
        value: String,
        /// Human-readable description of the expected format
        expected: &'static str,
    },
}

/// Errors surfaced by the engine facade and platforms
#[derive(Error, Debug)]
pub enum EngineError {
    /// The configuration was rejected before any setup happened
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Window, event loop or surface creation failed
    #[error("Error initializing graphics! {0}")]
    Graphics(String),

    /// A rendered frame could not be shown
    #[error("Error presenting frame: {0}")]
    Present(String),

    /// An operation was attempted from the wrong lifecycle state
    #[error("Cannot {operation} while engine is {state}")]
    InvalidState {
        /// The rejected operation
        operation: &'static str,
        /// Name of the state the engine was in
        state: String,
    },
}
