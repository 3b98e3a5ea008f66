// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font service.
//!
//! The renderer only needs three answers from a font: the line height, the
//! advance width of a character, and an optional glyph bitmap. Bitmaps are
//! stored row-major, `height()` rows of `ceil(width * bpp / 8)` bytes each,
//! most significant bits first.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::area::Coord;

/// Shared handle to a font.
pub type FontRef = Arc<dyn Font>;

/// A glyph bitmap borrowed from a font.
#[derive(Clone, Copy, Debug)]
pub struct Glyph<'a> {
    /// Bitmap width in pixels (may be narrower than the advance).
    pub width: Coord,
    /// Bits per pixel: 1, 2, 4 or 8.
    pub bpp: u8,
    /// Packed rows.
    pub bitmap: &'a [u8],
}

impl Glyph<'_> {
    /// Bytes per bitmap row.
    #[must_use]
    pub fn stride(&self) -> usize {
        let bits = self.width.max(0).unsigned_abs() as usize * usize::from(self.bpp);
        bits.div_ceil(8)
    }

    /// Whether `bpp` is a depth samples can be unpacked at.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        matches!(self.bpp, 1 | 2 | 4 | 8)
    }

    /// Raw sample at `(x, y)`, in `0..(1 << bpp)`.
    ///
    /// Always 0 for an unsupported depth.
    #[must_use]
    pub fn sample(&self, x: Coord, y: Coord) -> u8 {
        if !self.is_supported() {
            return 0;
        }
        let bpp = usize::from(self.bpp);
        let bit = x.unsigned_abs() as usize * bpp;
        let byte = y.unsigned_abs() as usize * self.stride() + bit / 8;
        let Some(&b) = self.bitmap.get(byte) else {
            return 0;
        };
        let shift = 8 - bpp - (bit % 8);
        let mask = ((1_u16 << bpp) - 1) as u8;
        (b >> shift) & mask
    }
}

/// Glyph metrics and bitmaps.
pub trait Font: fmt::Debug + Send + Sync {
    /// Line height in pixels.
    fn height(&self) -> Coord;

    /// Horizontal advance of `ch`, without letter spacing.
    fn glyph_width(&self, ch: char) -> Coord;

    /// Bitmap for `ch`, or `None` when the glyph has no visible pixels.
    fn glyph(&self, ch: char) -> Option<Glyph<'_>>;
}

/// A monospace font whose visible glyphs are solid blocks.
///
/// Every printable character advances by the same width; spaces advance but
/// draw nothing and control characters have zero width. Handy as a default
/// and for tests that need exact metrics.
#[derive(Clone, Debug)]
pub struct FixedFont {
    advance: Coord,
    height: Coord,
    bitmap: Vec<u8>,
}

impl FixedFont {
    /// Creates a font with the given advance and line height.
    ///
    /// The block is one pixel narrower than the advance so neighboring
    /// glyphs stay apart.
    #[must_use]
    pub fn new(advance: Coord, height: Coord) -> Self {
        let w = (advance - 1).max(1);
        let stride = w.unsigned_abs().div_ceil(8) as usize;
        let rows = height.max(0).unsigned_abs() as usize;
        let mut bitmap = vec![0_u8; stride * rows];
        for row in bitmap.chunks_mut(stride.max(1)) {
            for x in 0..w.unsigned_abs() as usize {
                row[x / 8] |= 0x80 >> (x % 8);
            }
        }
        Self {
            advance,
            height,
            bitmap,
        }
    }

    fn block_width(&self) -> Coord {
        (self.advance - 1).max(1)
    }
}

impl Default for FixedFont {
    fn default() -> Self {
        Self::new(8, 13)
    }
}

impl Font for FixedFont {
    fn height(&self) -> Coord {
        self.height
    }

    fn glyph_width(&self, ch: char) -> Coord {
        if ch.is_control() { 0 } else { self.advance }
    }

    fn glyph(&self, ch: char) -> Option<Glyph<'_>> {
        if ch.is_control() || ch == ' ' {
            return None;
        }
        Some(Glyph {
            width: self.block_width(),
            bpp: 1,
            bitmap: &self.bitmap,
        })
    }
}
