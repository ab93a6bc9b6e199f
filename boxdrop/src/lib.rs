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
//! # boxdrop
//!
//! An interactive 2D rigid-body demo. A static platform spans the bottom of
//! the window; every left click drops a box under the cursor, which falls
//! under gravity and lands on the platform or on other boxes. Escape quits.
//!
//! ## Features
//!
//! - **Rigid Bodies**: `rapier2d` world with fixed-step stepping and tagged
//!   contact notifications
//! - **Coordinate Mapping**: pixel (y-down) to meter (y-up) conversion that
//!   follows window resizes
//! - **Rendering**: rotated quads drawn through a small immediate-mode canvas,
//!   on the GPU with `wgpu` or into a CPU framebuffer
//! - **Platforms**: a `winit` + `wgpu` window (feature `window`) or a
//!   scripted headless loop for tests
//! - **Parallelization**: Optional `rapier2d` parallel solver (feature `parallel`)
//!
//! ## Example
//!
//! ```rust
//! use boxdrop::config::WorldConfig;
//! use boxdrop::world::{BodyKind, CollisionTag, WorldManager};
//!
//! let mut world = WorldManager::initialize(&WorldConfig::default());
//! let id = world.spawn_rectangle(16.0, 10.0, 0.5, 0.5, BodyKind::Dynamic);
//!
//! let start = world.body(id).unwrap().center.y;
//! world.step();
//! assert!(world.body(id).unwrap().center.y < start);
//! assert_eq!(world.count_tagged(CollisionTag::Static), 1);
//! ```

#![warn(missing_docs)]

/// Engine and world configuration
pub mod config;

/// Pixel and world coordinate mapping
pub mod coords;

/// Engine lifecycle facade and callback context
pub mod engine;

/// Error types
pub mod error;

/// Toolkit-neutral input events
pub mod input;

/// Global logging setup
pub mod logging;

/// Windowing platforms
pub mod platform;

/// Frame rendering
pub mod render;

/// Rigid-body world management
pub mod world;

pub use config::{EngineConfig, ScreenMode, WorldConfig};
pub use engine::{Engine, EngineState, RunSummary};
pub use error::{ConfigError, EngineError};
pub use world::{BodyKind, CollisionTag, WorldManager};
