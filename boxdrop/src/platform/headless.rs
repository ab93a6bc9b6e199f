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
//! Scripted platform without a window
//!
//! [`HeadlessPlatform`] replays a queue of [`ScriptedEvent`]s through the
//! same callbacks a real window would deliver, rendering into an in-memory
//! [`Framebuffer`]. The loop ends when shutdown is requested, a
//! [`ScriptedEvent::Close`] is reached, or the script runs out.

use crate::config::{EngineConfig, ScreenMode};
use crate::coords::ScreenState;
use crate::error::EngineError;
use crate::input::{ButtonState, Key, MouseButton};
use crate::platform::{Callbacks, Platform};
use crate::render::Framebuffer;
use std::collections::VecDeque;
use tracing::debug;

/// One scripted toolkit event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptedEvent {
    /// The window was resized
    Reshape(u32, u32),
    /// A mouse button changed state at `(x, y)` pixels
    Mouse(MouseButton, ButtonState, f64, f64),
    /// A key was pressed at the last cursor position
    Key(Key),
    /// The frame timer fired this many times
    Ticks(u32),
    /// The window needs a redraw
    Display,
    /// The window was closed
    Close,
}

/// A platform driven by a script instead of a user
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    script: VecDeque<ScriptedEvent>,
    failure: Option<String>,
    framebuffer: Option<Framebuffer>,
    mode: Option<ScreenMode>,
    cursor: (f64, f64),
    torn_down: bool,
}

impl HeadlessPlatform {
    /// Create a platform with an empty script
    pub fn new() -> Self {
        HeadlessPlatform::default()
    }

    /// Create a platform whose graphics setup fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        HeadlessPlatform {
            failure: Some(message.into()),
            ..HeadlessPlatform::default()
        }
    }

    /// Append an event to the script
    pub fn push(&mut self, event: ScriptedEvent) -> &mut Self {
        self.script.push_back(event);
        self
    }

    /// Append a left click (press and release) at `(x, y)` pixels
    pub fn click(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(ScriptedEvent::Mouse(MouseButton::Left, ButtonState::Pressed, x, y))
            .push(ScriptedEvent::Mouse(MouseButton::Left, ButtonState::Released, x, y))
    }

    /// Append `count` timer ticks
    pub fn ticks(&mut self, count: u32) -> &mut Self {
        self.push(ScriptedEvent::Ticks(count))
    }

    /// Events not yet replayed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// The screen mode requested at configuration, if configured
    pub fn mode(&self) -> Option<ScreenMode> {
        self.mode
    }

    /// The buffer frames were rendered into, if configured
    pub fn framebuffer(&self) -> Option<&Framebuffer> {
        self.framebuffer.as_ref()
    }

    /// Whether teardown has run
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl Platform for HeadlessPlatform {
    fn configure_graphics(
        &mut self,
        mode: ScreenMode,
        config: &EngineConfig,
    ) -> Result<ScreenState, EngineError> {
        if let Some(message) = &self.failure {
            return Err(EngineError::Graphics(message.clone()));
        }

        self.framebuffer = Some(Framebuffer::new(config.window_width, config.window_height));
        self.mode = Some(mode);
        Ok(config.nominal_screen())
    }

    fn run(&mut self, callbacks: &mut dyn Callbacks) -> Result<u64, EngineError> {
        let framebuffer = self
            .framebuffer
            .as_mut()
            .ok_or_else(|| EngineError::Graphics("headless platform was not configured".to_string()))?;

        callbacks.reshape(framebuffer.width(), framebuffer.height());

        let mut ticks = 0;
        while let Some(event) = self.script.pop_front() {
            match event {
                ScriptedEvent::Reshape(width, height) => {
                    if width > 0 && height > 0 {
                        framebuffer.resize(width, height);
                    }
                    callbacks.reshape(width, height);
                }
                ScriptedEvent::Mouse(button, state, x, y) => {
                    self.cursor = (x, y);
                    callbacks.mouse(button, state, x, y);
                }
                ScriptedEvent::Key(key) => {
                    callbacks.keyboard(key, self.cursor.0, self.cursor.1);
                }
                ScriptedEvent::Ticks(count) => {
                    for _ in 0..count {
                        callbacks.timer(&mut *framebuffer)?;
                        ticks += 1;
                        if callbacks.shutdown_requested() {
                            break;
                        }
                    }
                }
                ScriptedEvent::Display => callbacks.display(&mut *framebuffer)?,
                ScriptedEvent::Close => {
                    debug!("scripted close");
                    break;
                }
            }

            if callbacks.shutdown_requested() {
                debug!(remaining = self.script.len(), "shutdown requested");
                break;
            }
        }

        Ok(ticks)
    }

    fn teardown(&mut self) {
        self.torn_down = true;
    }

    fn name(&self) -> &str {
        "headless"
    }
}
