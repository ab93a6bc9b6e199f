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
//! Frame rendering
//!
//! Rendering is an immediate-mode call sequence against a [`Canvas`]:
//! clear, one filled quad per body, present. Platforms supply the canvas:
//! the window platform batches quads for the GPU, and [`Framebuffer`] is
//! the software rasterizer used without a window.

mod raster;

pub use raster::Framebuffer;

use crate::coords::{PixelPoint, ScreenState};
use crate::error::EngineError;
use crate::world::WorldManager;
use tracing::warn;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Black, the clear color
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// White, the body color
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create a color from its channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Pack as `0x00RRGGBB`
    pub fn to_xrgb(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

/// Immediate-mode drawing target
pub trait Canvas {
    /// Fill the whole target with `color`
    fn clear(&mut self, color: Color);

    /// Fill the convex quad with the given corners, in window pixels
    fn fill_quad(&mut self, corners: &[PixelPoint; 4], color: Color);

    /// Show everything drawn since the last clear
    fn present(&mut self) -> Result<(), EngineError>;
}

/// Draw one frame: clear, every body as a rotated quad, present
///
/// Returns the number of quads drawn. Bodies without a rectangle shape are
/// skipped.
pub fn render_frame(
    world: &WorldManager,
    screen: &ScreenState,
    canvas: &mut dyn Canvas,
) -> Result<usize, EngineError> {
    canvas.clear(Color::BLACK);

    let mut drawn = 0;
    let mut skipped = 0;
    for body in world.bodies() {
        let Some(corners) = body.corners() else {
            skipped += 1;
            continue;
        };
        canvas.fill_quad(&corners.map(|c| screen.world_to_screen(c)), Color::WHITE);
        drawn += 1;
    }

    if skipped > 0 {
        warn!(skipped, "bodies without a rectangle shape were not drawn");
    }

    canvas.present()?;
    Ok(drawn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::world::BodyKind;

    #[derive(Debug, PartialEq)]
    enum Call {
        Clear(Color),
        Quad([PixelPoint; 4]),
        Present,
    }

    #[derive(Default)]
    struct Calls(Vec<Call>);

    impl Canvas for Calls {
        fn clear(&mut self, color: Color) {
            self.0.push(Call::Clear(color));
        }

        fn fill_quad(&mut self, corners: &[PixelPoint; 4], _color: Color) {
            self.0.push(Call::Quad(*corners));
        }

        fn present(&mut self) -> Result<(), EngineError> {
            self.0.push(Call::Present);
            Ok(())
        }
    }

    #[test]
    fn test_color_packing() {
        assert_eq!(Color::WHITE.to_xrgb(), 0x00FF_FFFF);
        assert_eq!(Color::rgb(0x12, 0x34, 0x56).to_xrgb(), 0x0012_3456);
    }

    #[test]
    fn test_frame_call_sequence() {
        let mut world = WorldManager::initialize(&WorldConfig::default());
        world.spawn_rectangle(5.0, 20.0, 0.5, 0.5, BodyKind::Dynamic);
        let screen = ScreenState::new(1280, 1024, 40.0);

        let mut calls = Calls::default();
        let drawn = render_frame(&world, &screen, &mut calls).unwrap();

        assert_eq!(drawn, 2);
        assert_eq!(calls.0.len(), 4);
        assert_eq!(calls.0[0], Call::Clear(Color::BLACK));
        assert_eq!(calls.0[3], Call::Present);
    }

    #[test]
    fn test_box_projected_to_pixels() {
        let mut world = WorldManager::initialize(&WorldConfig::default());
        world.spawn_rectangle(5.0, 20.0, 0.5, 0.5, BodyKind::Dynamic);
        let screen = ScreenState::new(1280, 1024, 40.0);

        let mut calls = Calls::default();
        render_frame(&world, &screen, &mut calls).unwrap();

        let Call::Quad(corners) = &calls.0[2] else {
            panic!("expected a quad, got {:?}", calls.0[2]);
        };
        // bottom-left corner (4.75m, 19.75m) sits at (190px, 1024 - 790px)
        assert!((corners[0].x - 190.0).abs() < 1e-3);
        assert!((corners[0].y - 234.0).abs() < 1e-3);
    }
}
