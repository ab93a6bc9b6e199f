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
//! Input handling
//!
//! Platforms translate their native events into these toolkit-neutral
//! types. The mapping from input to an [`InputAction`] is pure, so the
//! engine context only has to apply the result.

use crate::coords::{PixelPoint, ScreenState, WorldPoint};

/// A mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button
    Left,
    /// Secondary button
    Right,
    /// Wheel button
    Middle,
    /// Any other button, by platform code
    Other(u16),
}

/// Whether a button or key went down or up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// Went down
    Pressed,
    /// Went up
    Released,
}

/// A keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// The Escape key
    Escape,
    /// A key that produces a character
    Character(char),
    /// Anything else
    Other,
}

/// What the engine should do in response to an input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Spawn a dynamic box centered at this world point
    SpawnBox(WorldPoint),
    /// Leave the event loop and shut down
    Shutdown,
}

/// Map a mouse event to an action
///
/// Only a left-button press does anything: it spawns a box under the cursor.
pub fn mouse_action(
    button: MouseButton,
    state: ButtonState,
    cursor: PixelPoint,
    screen: &ScreenState,
) -> Option<InputAction> {
    match (button, state) {
        (MouseButton::Left, ButtonState::Pressed) => {
            Some(InputAction::SpawnBox(screen.screen_to_world(cursor)))
        }
        _ => None,
    }
}

/// Map a key press to an action
pub fn key_action(key: Key) -> Option<InputAction> {
    match key {
        Key::Escape => Some(InputAction::Shutdown),
        _ => None,
    }
}
