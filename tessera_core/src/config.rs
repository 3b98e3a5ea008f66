// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display configuration.

use crate::area::{Area, Coord};
use crate::color::ColorDepth;

/// Static properties of the target display and the refresh machinery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Horizontal resolution in pixels.
    pub hor_res: Coord,
    /// Vertical resolution in pixels.
    pub ver_res: Coord,
    /// Pixel format of the display.
    pub color_depth: ColorDepth,
    /// Size of the virtual draw buffer in pixels. `0` renders straight into a
    /// full-screen frame buffer.
    pub draw_buffer_size: usize,
    /// Capacity of the pending dirty-area queue.
    pub inval_queue_len: usize,
    /// Dots per inch; scales default paddings and radii.
    pub dpi: Coord,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new(320, 240)
    }
}

impl DisplayConfig {
    /// A configuration for a `hor_res` x `ver_res` display with a draw buffer
    /// of one tenth of the screen.
    #[must_use]
    pub fn new(hor_res: Coord, ver_res: Coord) -> Self {
        let pixels = hor_res.max(0).unsigned_abs() as usize * ver_res.max(0).unsigned_abs() as usize;
        Self {
            hor_res,
            ver_res,
            color_depth: ColorDepth::Rgb565,
            draw_buffer_size: pixels / 10,
            inval_queue_len: 32,
            dpi: 100,
        }
    }

    /// The whole screen.
    #[must_use]
    pub fn screen_area(&self) -> Area {
        Area::new(0, 0, self.hor_res - 1, self.ver_res - 1)
    }

    /// Whether rendering goes straight to a full-screen buffer.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.draw_buffer_size == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_buffer_is_a_tenth_of_the_screen() {
        let c = DisplayConfig::default();
        assert_eq!(c.draw_buffer_size, 320 * 24, "one tenth of 320x240");
        assert_eq!(c.screen_area(), Area::new(0, 0, 319, 239));
        assert!(!c.is_direct(), "virtual buffer by default");
    }
}
