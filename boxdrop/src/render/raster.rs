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
//! Software quad rasterizer

use crate::coords::PixelPoint;
use crate::error::EngineError;
use crate::render::{Canvas, Color};

/// A CPU pixel buffer in `0x00RRGGBB` format, row-major, origin top-left
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
    frames: u64,
}

impl Framebuffer {
    /// Create a black buffer
    pub fn new(width: u32, height: u32) -> Self {
        Framebuffer {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
            frames: 0,
        }
    }

    /// Buffer width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel rows
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Pixel value at `(x, y)`, if inside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            self.pixels.get(y as usize * self.width as usize + x as usize).copied()
        } else {
            None
        }
    }

    /// Change the buffer size, clearing its contents
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, 0);
    }

    /// Fill every pixel whose center lies inside the convex quad
    ///
    /// Works for either winding. Returns the number of pixels written.
    pub fn fill_convex(&mut self, corners: &[PixelPoint; 4], color: u32) -> usize {
        if self.width == 0 || self.height == 0 {
            return 0;
        }

        let area = signed_area(corners);
        if area == 0.0 || !area.is_finite() {
            return 0;
        }
        let winding = area.signum();

        let (min_x, max_x, min_y, max_y) = corners.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY, f32::INFINITY, f32::NEG_INFINITY),
            |(x0, x1, y0, y1), p| (x0.min(p.x), x1.max(p.x), y0.min(p.y), y1.max(p.y)),
        );
        let x_start = min_x.floor().max(0.0) as u32;
        let y_start = min_y.floor().max(0.0) as u32;
        let x_end = (max_x.ceil().max(0.0) as u32).min(self.width);
        let y_end = (max_y.ceil().max(0.0) as u32).min(self.height);

        let mut written = 0;
        for y in y_start..y_end {
            let cy = y as f32 + 0.5;
            let row = y as usize * self.width as usize;
            for x in x_start..x_end {
                let cx = x as f32 + 0.5;
                if inside(corners, cx, cy, winding) {
                    self.pixels[row + x as usize] = color;
                    written += 1;
                }
            }
        }
        written
    }
}

impl Canvas for Framebuffer {
    fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_xrgb());
    }

    fn fill_quad(&mut self, corners: &[PixelPoint; 4], color: Color) {
        self.fill_convex(corners, color.to_xrgb());
    }

    fn present(&mut self) -> Result<(), EngineError> {
        self.frames += 1;
        Ok(())
    }
}

fn signed_area(corners: &[PixelPoint; 4]) -> f32 {
    (0..4)
        .map(|i| {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        / 2.0
}

fn inside(corners: &[PixelPoint; 4], x: f32, y: f32, winding: f32) -> bool {
    (0..4).all(|i| {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        let edge = (b.x - a.x) * (y - a.y) - (b.y - a.y) * (x - a.x);
        edge * winding >= 0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f32, y0: f32, x1: f32, y1: f32) -> [PixelPoint; 4] {
        [
            PixelPoint::new(x0, y0),
            PixelPoint::new(x1, y0),
            PixelPoint::new(x1, y1),
            PixelPoint::new(x0, y1),
        ]
    }

    #[test]
    fn test_axis_aligned_fill() {
        let mut fb = Framebuffer::new(10, 10);
        let written = fb.fill_convex(&square(2.0, 2.0, 6.0, 5.0), 0xFF);
        assert_eq!(written, 12);
        assert_eq!(fb.pixel(2, 2), Some(0xFF));
        assert_eq!(fb.pixel(5, 4), Some(0xFF));
        assert_eq!(fb.pixel(6, 4), Some(0));
    }

    #[test]
    fn test_winding_does_not_matter() {
        let mut forward = Framebuffer::new(10, 10);
        let mut reverse = Framebuffer::new(10, 10);
        let quad = square(1.0, 1.0, 4.0, 4.0);
        let mut reversed = quad;
        reversed.reverse();

        assert_eq!(forward.fill_convex(&quad, 1), reverse.fill_convex(&reversed, 1));
        assert_eq!(forward.pixels(), reverse.pixels());
    }

    #[test]
    fn test_clipped_to_buffer() {
        let mut fb = Framebuffer::new(4, 4);
        let written = fb.fill_convex(&square(-10.0, -10.0, 10.0, 10.0), 7);
        assert_eq!(written, 16);
        assert!(fb.pixels().iter().all(|&p| p == 7));
    }

    #[test]
    fn test_rotated_quad_center_filled() {
        let mut fb = Framebuffer::new(20, 20);
        let diamond = [
            PixelPoint::new(10.0, 4.0),
            PixelPoint::new(16.0, 10.0),
            PixelPoint::new(10.0, 16.0),
            PixelPoint::new(4.0, 10.0),
        ];
        fb.fill_convex(&diamond, 3);
        assert_eq!(fb.pixel(10, 10), Some(3));
        assert_eq!(fb.pixel(4, 4), Some(0));
    }

    #[test]
    fn test_degenerate_quad_draws_nothing() {
        let mut fb = Framebuffer::new(8, 8);
        let line = square(1.0, 1.0, 5.0, 1.0);
        assert_eq!(fb.fill_convex(&line, 1), 0);
    }

    #[test]
    fn test_canvas_clear_and_present() {
        let mut fb = Framebuffer::new(3, 3);
        fb.clear(Color::WHITE);
        fb.present().unwrap();
        assert!(fb.pixels().iter().all(|&p| p == 0x00FF_FFFF));
        assert_eq!(fb.frames(), 1);
    }

    #[test]
    fn test_resize_clears() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(Color::WHITE);
        fb.resize(3, 1);
        assert_eq!(fb.pixels(), &[0, 0, 0]);
    }
}
