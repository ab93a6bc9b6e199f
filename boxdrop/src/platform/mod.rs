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
//! Windowing platforms
//!
//! A [`Platform`] owns the toolkit: it sets up graphics once, then runs a
//! blocking event loop that forwards every toolkit event to a single
//! [`Callbacks`] receiver. All callbacks run on the event-loop thread, one
//! at a time.
//!
//! # Platforms
//!
//! - [`window::WindowPlatform`]: a real window (feature `window`)
//! - [`headless::HeadlessPlatform`]: scripted events, no window
//!
//! # Callback Contract
//!
//! - `reshape` is delivered once before the first frame and on every resize
//! - `timer` fires every [`Callbacks::timer_period`] and must step then render
//! - `display` redraws without stepping (window exposed or resized)
//! - after every callback the platform checks
//!   [`Callbacks::shutdown_requested`] and leaves the loop if it is set

pub mod headless;
#[cfg(feature = "window")]
pub mod window;

use crate::config::{EngineConfig, ScreenMode};
use crate::coords::ScreenState;
use crate::error::EngineError;
use crate::input::{ButtonState, Key, MouseButton};
use crate::render::Canvas;
use std::time::Duration;

/// Receiver for toolkit callbacks
pub trait Callbacks {
    /// The window now has this size in pixels
    fn reshape(&mut self, width: u32, height: u32);

    /// A mouse button changed state with the cursor at `(x, y)` pixels
    fn mouse(&mut self, button: MouseButton, state: ButtonState, x: f64, y: f64);

    /// A key was pressed with the cursor at `(x, y)` pixels
    fn keyboard(&mut self, key: Key, x: f64, y: f64);

    /// The frame timer fired: step the simulation, then render
    fn timer(&mut self, canvas: &mut dyn Canvas) -> Result<(), EngineError>;

    /// Redraw the current state without stepping
    fn display(&mut self, canvas: &mut dyn Canvas) -> Result<(), EngineError>;

    /// Delay between timer callbacks
    fn timer_period(&self) -> Duration;

    /// Whether the event loop should stop
    fn shutdown_requested(&self) -> bool;
}

/// A windowing toolkit
pub trait Platform {
    /// One-time graphics setup
    ///
    /// Returns the initial window size as a [`ScreenState`].
    fn configure_graphics(
        &mut self,
        mode: ScreenMode,
        config: &EngineConfig,
    ) -> Result<ScreenState, EngineError>;

    /// Run the blocking event loop until shutdown is requested or the window closes
    ///
    /// Returns the number of timer ticks delivered.
    fn run(&mut self, callbacks: &mut dyn Callbacks) -> Result<u64, EngineError>;

    /// Release window resources and restore the display mode
    fn teardown(&mut self) {}

    /// Get the name of this platform for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
