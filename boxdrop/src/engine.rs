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
//! Engine facade
//!
//! [`Engine`] walks a fixed lifecycle:
//!
//! ```text
//! Unconfigured --configure--> Configured --run--> Running --> Terminated
//!        \                                           |
//!         `----------------- Failed(message) <-------'
//! ```
//!
//! Configuration sets up graphics and the world and builds the single
//! [`EngineContext`]. Running hands that context to the platform's event
//! loop, which delivers every callback to it until shutdown is requested or
//! the window closes. Teardown happens explicitly before `run` returns.
//!
//! # Example
//!
//! ```
//! use boxdrop::config::{EngineConfig, ScreenMode};
//! use boxdrop::engine::{Engine, EngineState};
//! use boxdrop::platform::headless::{HeadlessPlatform, ScriptedEvent};
//! use boxdrop::input::Key;
//!
//! let mut platform = HeadlessPlatform::new();
//! platform.click(640.0, 100.0).ticks(30).push(ScriptedEvent::Key(Key::Escape));
//!
//! let mut engine = Engine::new(platform, EngineConfig::default());
//! engine.configure(ScreenMode::Windowed).unwrap();
//! let summary = engine.run().unwrap();
//!
//! assert_eq!(engine.state(), &EngineState::Terminated);
//! assert_eq!(summary.ticks, 30);
//! assert_eq!(summary.bodies_released, 2);
//! ```

use crate::config::{EngineConfig, ScreenMode};
use crate::coords::{PixelPoint, ScreenState};
use crate::error::EngineError;
use crate::input::{key_action, mouse_action, ButtonState, InputAction, Key, MouseButton};
use crate::platform::{Callbacks, Platform};
use crate::render::{render_frame, Canvas};
use crate::world::{BodyKind, ContactListener, WorldManager};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Lifecycle state of an [`Engine`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// Created, nothing set up yet
    Unconfigured,
    /// Graphics and world are ready
    Configured,
    /// Inside the platform event loop
    Running,
    /// The loop ended and resources were released
    Terminated,
    /// Setup or the event loop failed with this message
    Failed(String),
}

impl EngineState {
    /// Short lowercase name of the state
    pub fn name(&self) -> &'static str {
        match self {
            EngineState::Unconfigured => "unconfigured",
            EngineState::Configured => "configured",
            EngineState::Running => "running",
            EngineState::Terminated => "terminated",
            EngineState::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Failed(message) => write!(f, "failed: {}", message),
            other => f.write_str(other.name()),
        }
    }
}

/// Outcome of a completed [`Engine::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames rendered, from both timer ticks and redraws
    pub frames: u64,
    /// Timer ticks delivered by the platform
    pub ticks: u64,
    /// Bodies released at teardown, platform included
    pub bodies_released: usize,
}

/// Everything the toolkit callbacks act on
///
/// One context exists per configured engine. The platform borrows it
/// mutably for the whole event loop.
pub struct EngineContext {
    world: WorldManager,
    screen: ScreenState,
    config: EngineConfig,
    shutdown: bool,
    frames: u64,
}

impl EngineContext {
    /// Build a context around an initialized world
    pub fn new(world: WorldManager, screen: ScreenState, config: EngineConfig) -> Self {
        EngineContext {
            world,
            screen,
            config,
            shutdown: false,
            frames: 0,
        }
    }

    /// The simulated world
    pub fn world(&self) -> &WorldManager {
        &self.world
    }

    /// The simulated world, mutably
    pub fn world_mut(&mut self) -> &mut WorldManager {
        &mut self.world
    }

    /// The current window size and scale
    pub fn screen(&self) -> &ScreenState {
        &self.screen
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Whether Escape was pressed
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown
    }

    fn apply(&mut self, action: InputAction) {
        match action {
            InputAction::SpawnBox(center) => {
                if !center.is_valid() {
                    warn!(%center, "ignoring click at a non-finite position");
                    return;
                }
                let [width, height] = self.config.spawn_size();
                let id = self
                    .world
                    .spawn_rectangle(center.x, center.y, width, height, BodyKind::Dynamic);
                info!(body = %id, %center, bodies = self.world.body_count(), "box dropped");
            }
            InputAction::Shutdown => {
                info!("shutdown requested");
                self.shutdown = true;
            }
        }
    }
}

impl Callbacks for EngineContext {
    fn reshape(&mut self, width: u32, height: u32) {
        if self.screen.resize(width, height) {
            let [extent_x, extent_y] = self.screen.visible_extent();
            debug!(width, height, extent_x, extent_y, "reshaped");
        } else {
            debug!(width, height, "ignoring empty reshape");
        }
    }

    fn mouse(&mut self, button: MouseButton, state: ButtonState, x: f64, y: f64) {
        let cursor = PixelPoint::new(x as f32, y as f32);
        if let Some(action) = mouse_action(button, state, cursor, &self.screen) {
            self.apply(action);
        }
    }

    fn keyboard(&mut self, key: Key, x: f64, y: f64) {
        debug!(?key, x, y, "key pressed");
        if let Some(action) = key_action(key) {
            self.apply(action);
        }
    }

    fn timer(&mut self, canvas: &mut dyn Canvas) -> Result<(), EngineError> {
        self.world.step();
        self.display(canvas)
    }

    fn display(&mut self, canvas: &mut dyn Canvas) -> Result<(), EngineError> {
        render_frame(&self.world, &self.screen, canvas)?;
        self.frames += 1;
        Ok(())
    }

    fn timer_period(&self) -> Duration {
        self.config.timer_period()
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
    }
}

/// The game engine facade
pub struct Engine<P: Platform> {
    platform: P,
    config: EngineConfig,
    state: EngineState,
    listener: Option<Box<dyn ContactListener>>,
    context: Option<EngineContext>,
}

impl<P: Platform> Engine<P> {
    /// Create an unconfigured engine
    pub fn new(platform: P, config: EngineConfig) -> Self {
        Engine {
            platform,
            config,
            state: EngineState::Unconfigured,
            listener: None,
            context: None,
        }
    }

    /// Use a custom contact listener instead of the logging one
    pub fn with_listener(mut self, listener: Box<dyn ContactListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Validate the configuration, set up graphics and create the world
    ///
    /// Only valid while unconfigured. Any failure leaves the engine in
    /// [`EngineState::Failed`].
    pub fn configure(&mut self, mode: ScreenMode) -> Result<(), EngineError> {
        self.expect_state(EngineState::Unconfigured, "configure")?;

        if let Err(err) = self.config.validate() {
            return Err(self.fail(err.into()));
        }

        let screen = match self.platform.configure_graphics(mode, &self.config) {
            Ok(screen) => screen,
            Err(err) => return Err(self.fail(err)),
        };

        let world_config = self.config.world_config();
        let world = match self.listener.take() {
            Some(listener) => WorldManager::with_listener(&world_config, listener),
            None => WorldManager::initialize(&world_config),
        };

        info!(
            platform = self.platform.name(),
            ?mode,
            width = screen.width(),
            height = screen.height(),
            fps = self.config.frames_per_second,
            "engine configured"
        );
        self.context = Some(EngineContext::new(world, screen, self.config.clone()));
        self.state = EngineState::Configured;
        Ok(())
    }

    /// Run the event loop until shutdown, then tear everything down
    ///
    /// Only valid once configured.
    pub fn run(&mut self) -> Result<RunSummary, EngineError> {
        self.expect_state(EngineState::Configured, "run")?;
        let Some(context) = self.context.as_mut() else {
            return Err(self.fail(EngineError::InvalidState {
                operation: "run",
                state: "configured without a context".to_string(),
            }));
        };

        self.state = EngineState::Running;
        let result = self.platform.run(context);

        let bodies_released = context.world.teardown();
        let frames = context.frames;
        self.platform.teardown();

        match result {
            Ok(ticks) => {
                self.state = EngineState::Terminated;
                info!(frames, ticks, bodies_released, "engine terminated");
                Ok(RunSummary {
                    frames,
                    ticks,
                    bodies_released,
                })
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// The failure message, if setup or the event loop failed
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            EngineState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The callback context, once configured
    pub fn context(&self) -> Option<&EngineContext> {
        self.context.as_ref()
    }

    /// The callback context, mutably, once configured
    pub fn context_mut(&mut self) -> Option<&mut EngineContext> {
        self.context.as_mut()
    }

    /// The windowing platform
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The windowing platform, mutably
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    fn expect_state(&self, expected: EngineState, operation: &'static str) -> Result<(), EngineError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidState {
                operation,
                state: self.state.name().to_string(),
            })
        }
    }

    fn fail(&mut self, err: EngineError) -> EngineError {
        error!(%err, state = self.state.name(), "engine failed");
        self.state = EngineState::Failed(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessPlatform, ScriptedEvent};
    use crate::render::Framebuffer;
    use crate::world::CollisionTag;

    fn context() -> EngineContext {
        let config = EngineConfig::default();
        let world = WorldManager::initialize(&config.world_config());
        EngineContext::new(world, config.nominal_screen(), config)
    }

    #[test]
    fn test_state_names() {
        assert_eq!(EngineState::Unconfigured.to_string(), "unconfigured");
        assert_eq!(EngineState::Failed("boom".into()).to_string(), "failed: boom");
        assert_eq!(EngineState::Failed("boom".into()).name(), "failed");
    }

    #[test]
    fn test_left_click_spawns_dynamic_box() {
        let mut ctx = context();
        ctx.mouse(MouseButton::Left, ButtonState::Pressed, 200.0, 224.0);
        ctx.mouse(MouseButton::Left, ButtonState::Released, 200.0, 224.0);
        ctx.mouse(MouseButton::Right, ButtonState::Pressed, 200.0, 224.0);

        assert_eq!(ctx.world().count_tagged(CollisionTag::Dynamic), 1);
        let body = ctx.world().bodies().last().unwrap();
        assert!((body.center.x - 5.0).abs() < 1e-5);
        assert!((body.center.y - 20.0).abs() < 1e-5);
        assert_eq!(body.half_extents, Some([0.25, 0.25]));
    }

    #[test]
    fn test_escape_sets_shutdown() {
        let mut ctx = context();
        ctx.keyboard(Key::Character('a'), 0.0, 0.0);
        assert!(!ctx.shutdown_requested());
        ctx.keyboard(Key::Escape, 0.0, 0.0);
        assert!(ctx.shutdown_requested());
    }

    #[test]
    fn test_timer_steps_and_renders() {
        let mut ctx = context();
        let mut fb = Framebuffer::new(1280, 1024);
        ctx.timer(&mut fb).unwrap();
        ctx.display(&mut fb).unwrap();

        assert_eq!(ctx.world().elapsed_steps(), 1);
        assert_eq!(ctx.frames(), 2);
        assert_eq!(fb.frames(), 2);
    }

    #[test]
    fn test_reshape_ignores_zero_size() {
        let mut ctx = context();
        ctx.reshape(0, 0);
        assert_eq!(ctx.screen().width(), 1280);
        ctx.reshape(640, 512);
        assert_eq!(ctx.screen().width(), 640);
    }

    #[test]
    fn test_run_before_configure_fails() {
        let mut engine = Engine::new(HeadlessPlatform::new(), EngineConfig::default());
        let err = engine.run().unwrap_err();
        assert!(matches!(err, EngineError::InvalidState { operation: "run", .. }));
        assert_eq!(engine.state(), &EngineState::Unconfigured);
    }

    #[test]
    fn test_configure_twice_fails() {
        let mut engine = Engine::new(HeadlessPlatform::new(), EngineConfig::default());
        engine.configure(ScreenMode::Windowed).unwrap();
        assert!(engine.configure(ScreenMode::Windowed).is_err());
        assert_eq!(engine.state(), &EngineState::Configured);
    }

    #[test]
    fn test_graphics_failure_moves_to_failed() {
        let mut engine = Engine::new(HeadlessPlatform::failing("no display"), EngineConfig::default());
        let err = engine.configure(ScreenMode::FullScreen).unwrap_err();

        assert_eq!(err.to_string(), "Error initializing graphics! no display");
        assert_eq!(engine.failure(), Some("Error initializing graphics! no display"));
        assert!(engine.context().is_none());
    }

    #[test]
    fn test_run_after_graphics_failure_never_starts() {
        let mut engine = Engine::new(HeadlessPlatform::failing("no adapter"), EngineConfig::default());
        assert!(engine.configure(ScreenMode::Windowed).is_err());

        let err = engine.run().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidState { operation: "run", ref state } if state == "failed"
        ));
        assert_eq!(engine.failure(), Some("Error initializing graphics! no adapter"));
    }

    #[test]
    fn test_invalid_config_moves_to_failed() {
        let config = EngineConfig::default().with_frames_per_second(0);
        let mut engine = Engine::new(HeadlessPlatform::new(), config);
        assert!(matches!(
            engine.configure(ScreenMode::Windowed),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(engine.state(), EngineState::Failed(_)));
    }

    #[test]
    fn test_escape_terminates_run() {
        let mut platform = HeadlessPlatform::new();
        platform
            .click(640.0, 100.0)
            .ticks(10)
            .push(ScriptedEvent::Key(Key::Escape))
            .ticks(10);

        let mut engine = Engine::new(platform, EngineConfig::default());
        engine.configure(ScreenMode::Windowed).unwrap();
        let summary = engine.run().unwrap();

        assert_eq!(engine.state(), &EngineState::Terminated);
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.frames, 10);
        assert_eq!(summary.bodies_released, 2);
        assert_eq!(engine.platform().remaining(), 1);
        assert!(engine.platform().is_torn_down());
        assert_eq!(engine.context().map(|c| c.world().body_count()), Some(0));
    }
}
