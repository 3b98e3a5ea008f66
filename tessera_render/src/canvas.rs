// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel buffers and the display they are flushed to.

use alloc::vec;
use alloc::vec::Vec;

use tessera_core::area::{Area, Coord};
use tessera_core::color::{Color, ColorDepth};

/// A rectangle of pixels positioned in screen coordinates.
///
/// In direct mode the canvas spans the whole screen. In draw-buffer mode it
/// is re-targeted to each strip before drawing, so writes outside `area`
/// are dropped.
#[derive(Clone, Debug)]
pub struct Canvas {
    area: Area,
    depth: ColorDepth,
    pixels: Vec<Color>,
}

impl Canvas {
    /// A black canvas covering `area`.
    #[must_use]
    pub fn new(area: Area, depth: ColorDepth) -> Self {
        Self {
            area,
            depth,
            pixels: vec![Color::black(depth); area.size() as usize],
        }
    }

    /// Screen area covered by the canvas.
    #[inline]
    #[must_use]
    pub fn area(&self) -> Area {
        self.area
    }

    /// Pixel format.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    /// Moves the canvas over `area` and clears it to black.
    ///
    /// The backing allocation is reused when it is large enough.
    pub fn retarget(&mut self, area: Area) {
        self.area = area;
        self.pixels.clear();
        self.pixels
            .resize(area.size() as usize, Color::black(self.depth));
    }

    /// Fills the whole canvas with one color.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn index(&self, x: Coord, y: Coord) -> Option<usize> {
        let a = &self.area;
        if x < a.x1 || x > a.x2 || y < a.y1 || y > a.y2 {
            return None;
        }
        let w = a.width().unsigned_abs() as usize;
        let row = (y - a.y1).unsigned_abs() as usize;
        let col = (x - a.x1).unsigned_abs() as usize;
        Some(row * w + col)
    }

    /// The pixel at screen position `(x, y)`, if it lies on the canvas.
    #[must_use]
    pub fn pixel(&self, x: Coord, y: Coord) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Mutable access to the pixel at screen position `(x, y)`.
    pub fn pixel_mut(&mut self, x: Coord, y: Coord) -> Option<&mut Color> {
        self.index(x, y).map(|i| &mut self.pixels[i])
    }

    /// One full canvas row at screen row `y`.
    #[must_use]
    pub fn row(&self, y: Coord) -> Option<&[Color]> {
        let start = self.index(self.area.x1, y)?;
        let w = self.area.width().unsigned_abs() as usize;
        Some(&self.pixels[start..start + w])
    }

    /// The part of screen row `y` between `x1` and `x2`, clipped to the canvas.
    pub fn span_mut(&mut self, y: Coord, x1: Coord, x2: Coord) -> Option<&mut [Color]> {
        let x1 = x1.max(self.area.x1);
        let x2 = x2.min(self.area.x2);
        if x1 > x2 {
            return None;
        }
        let start = self.index(x1, y)?;
        let len = (x2 - x1 + 1).unsigned_abs() as usize;
        Some(&mut self.pixels[start..start + len])
    }
}

/// The physical output.
pub trait Display {
    /// Copies `area` (which lies within `canvas.area()`) to the screen.
    fn flush(&mut self, area: &Area, canvas: &Canvas);
}

/// An in-memory full-screen frame buffer.
///
/// Useful as a display for hosts that present the whole buffer themselves,
/// and for tests.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    screen: Canvas,
    flushes: u32,
}

impl FrameBuffer {
    /// A black frame buffer covering `screen`.
    #[must_use]
    pub fn new(screen: Area, depth: ColorDepth) -> Self {
        Self {
            screen: Canvas::new(screen, depth),
            flushes: 0,
        }
    }

    /// The screen contents.
    #[must_use]
    pub fn pixels(&self) -> &Canvas {
        &self.screen
    }

    /// Number of flush calls received.
    #[must_use]
    pub fn flush_count(&self) -> u32 {
        self.flushes
    }
}

impl Display for FrameBuffer {
    fn flush(&mut self, area: &Area, canvas: &Canvas) {
        self.flushes += 1;
        let Some(area) = area.intersect(&self.screen.area()) else {
            return;
        };
        for y in area.y1..=area.y2 {
            let Some(src) = canvas.row(y) else {
                continue;
            };
            let off = (area.x1 - canvas.area().x1).unsigned_abs() as usize;
            let len = area.width().unsigned_abs() as usize;
            if let (Some(dst), Some(src)) = (
                self.screen.span_mut(y, area.x1, area.x2),
                src.get(off..off + len),
            ) {
                dst.copy_from_slice(src);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::color::Rgb;

    #[test]
    fn pixels_outside_the_canvas_are_absent() {
        let c = Canvas::new(Area::new(10, 10, 19, 14), ColorDepth::Rgb565);
        assert!(c.pixel(10, 10).is_some(), "top-left corner");
        assert!(c.pixel(19, 14).is_some(), "bottom-right corner");
        assert!(c.pixel(9, 10).is_none(), "left of canvas");
        assert!(c.pixel(10, 15).is_none(), "below canvas");
    }

    #[test]
    fn span_is_clipped_to_canvas() {
        let mut c = Canvas::new(Area::new(0, 0, 9, 0), ColorDepth::Rgb565);
        assert_eq!(c.span_mut(0, -5, 3).map(|s| s.len()), Some(4), "clipped left");
        assert!(c.span_mut(0, 10, 12).is_none(), "entirely right of canvas");
    }

    #[test]
    fn frame_buffer_copies_flushed_strip() {
        let depth = ColorDepth::Rgb888;
        let red = depth.make(Rgb::RED);
        let mut strip = Canvas::new(Area::new(0, 4, 9, 5), depth);
        strip.clear(red);
        let mut fb = FrameBuffer::new(Area::new(0, 0, 9, 9), depth);
        fb.flush(&Area::new(2, 4, 5, 5), &strip);
        assert_eq!(fb.flush_count(), 1);
        assert_eq!(fb.pixels().pixel(2, 4), Some(red), "inside flushed area");
        assert_eq!(fb.pixels().pixel(5, 5), Some(red), "inside flushed area");
        assert_eq!(fb.pixels().pixel(1, 4), Some(Color::black(depth)), "left of it");
        assert_eq!(fb.pixels().pixel(2, 3), Some(Color::black(depth)), "above it");
    }
}
