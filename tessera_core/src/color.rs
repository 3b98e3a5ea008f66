// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packed colors at a configurable bit depth.
//!
//! A [`Color`] stores its red, green and blue channels at the native width of
//! its [`ColorDepth`] (for example 5/6/5 bits for [`ColorDepth::Rgb565`]).
//! Colors are built from 8-bit [`Rgb`] values with [`ColorDepth::make`],
//! which quantizes by dropping low bits.
//!
//! Blending goes through [`mix`], an integer linear interpolation with a
//! 9-bit ratio: `256` yields the first color, `0` the second. The division
//! truncates; there is no rounding correction.

use core::fmt;

/// Opacity, `0` (transparent) to `255` (cover).
pub type Opa = u8;

/// Fully transparent.
pub const OPA_TRANSP: Opa = 0;
/// Half transparent.
pub const OPA_50: Opa = 127;
/// Fully opaque.
pub const OPA_COVER: Opa = 255;

/// Upper end of a [`mix`] ratio.
pub const MIX_MAX: u16 = 256;

/// Bit layout of packed colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorDepth {
    /// 1 bit: every channel is either off or on.
    Mono,
    /// 8 bits: R3 G3 B2.
    Rgb332,
    /// 16 bits: R5 G6 B5.
    #[default]
    Rgb565,
    /// 32-bit word: X8 R8 G8 B8.
    Rgb888,
}

impl ColorDepth {
    /// Channel widths in bits as `(red, green, blue)`.
    #[must_use]
    pub const fn channel_bits(self) -> (u32, u32, u32) {
        match self {
            Self::Mono => (1, 1, 1),
            Self::Rgb332 => (3, 3, 2),
            Self::Rgb565 => (5, 6, 5),
            Self::Rgb888 => (8, 8, 8),
        }
    }

    /// Bits per packed pixel.
    #[must_use]
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Mono => 1,
            Self::Rgb332 => 8,
            Self::Rgb565 => 16,
            Self::Rgb888 => 32,
        }
    }

    /// Quantizes an 8-bit-per-channel color to this depth.
    #[must_use]
    pub const fn make(self, rgb: Rgb) -> Color {
        let Rgb(r, g, b) = rgb;
        match self {
            Self::Mono => {
                let on = (r >> 7) | (g >> 7) | (b >> 7);
                Color::from_channels(self, on, on, on)
            }
            Self::Rgb332 => Color::from_channels(self, r >> 5, g >> 5, b >> 6),
            Self::Rgb565 => Color::from_channels(self, r >> 3, g >> 2, b >> 3),
            Self::Rgb888 => Color::from_channels(self, r, g, b),
        }
    }
}

/// An 8-bit-per-channel color, independent of any display depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#FFFFFF`
    pub const WHITE: Self = Self(0xFF, 0xFF, 0xFF);
    /// `#C0C0C0`
    pub const SILVER: Self = Self(0xC0, 0xC0, 0xC0);
    /// `#808080`
    pub const GRAY: Self = Self(0x80, 0x80, 0x80);
    /// `#000000`
    pub const BLACK: Self = Self(0x00, 0x00, 0x00);
    /// `#FF0000`
    pub const RED: Self = Self(0xFF, 0x00, 0x00);
    /// `#800000`
    pub const MAROON: Self = Self(0x80, 0x00, 0x00);
    /// `#FFFF00`
    pub const YELLOW: Self = Self(0xFF, 0xFF, 0x00);
    /// `#808000`
    pub const OLIVE: Self = Self(0x80, 0x80, 0x00);
    /// `#00FF00`
    pub const LIME: Self = Self(0x00, 0xFF, 0x00);
    /// `#008000`
    pub const GREEN: Self = Self(0x00, 0x80, 0x00);
    /// `#00FFFF`
    pub const CYAN: Self = Self(0x00, 0xFF, 0xFF);
    /// `#008080`
    pub const TEAL: Self = Self(0x00, 0x80, 0x80);
    /// `#0000FF`
    pub const BLUE: Self = Self(0x00, 0x00, 0xFF);
    /// `#000080`
    pub const NAVY: Self = Self(0x00, 0x00, 0x80);
    /// `#FF00FF`
    pub const MAGENTA: Self = Self(0xFF, 0x00, 0xFF);
    /// `#800080`
    pub const PURPLE: Self = Self(0x80, 0x00, 0x80);
    /// `#FFA500`
    pub const ORANGE: Self = Self(0xFF, 0xA5, 0x00);

    /// Pixels of this color are skipped when blitting a keyed image.
    pub const TRANSP_KEY: Self = Self::LIME;

    /// Builds a color from a `0xRRGGBB` literal.
    #[must_use]
    pub const fn hex(v: u32) -> Self {
        Self(
            ((v >> 16) & 0xFF) as u8,
            ((v >> 8) & 0xFF) as u8,
            (v & 0xFF) as u8,
        )
    }
}

/// A color at a specific [`ColorDepth`].
///
/// Channels hold native-width values (a 565 red channel ranges `0..=31`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    depth: ColorDepth,
    r: u8,
    g: u8,
    b: u8,
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Color({:?} r={} g={} b={})",
            self.depth, self.r, self.g, self.b
        )
    }
}

impl Color {
    const fn from_channels(depth: ColorDepth, r: u8, g: u8, b: u8) -> Self {
        Self { depth, r, g, b }
    }

    /// Black at the given depth.
    #[must_use]
    pub const fn black(depth: ColorDepth) -> Self {
        Self::from_channels(depth, 0, 0, 0)
    }

    /// The depth this color is packed for.
    #[inline]
    #[must_use]
    pub const fn depth(self) -> ColorDepth {
        self.depth
    }

    /// Native-width channels as `(red, green, blue)`.
    #[inline]
    #[must_use]
    pub const fn channels(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// The packed integer form.
    #[must_use]
    pub const fn full(self) -> u32 {
        let (r, g, b) = (self.r as u32, self.g as u32, self.b as u32);
        match self.depth {
            ColorDepth::Mono => r & 1,
            ColorDepth::Rgb332 => (r << 5) | (g << 2) | b,
            ColorDepth::Rgb565 => (r << 11) | (g << 5) | b,
            ColorDepth::Rgb888 => 0xFF00_0000 | (r << 16) | (g << 8) | b,
        }
    }

    /// Unpacks a packed integer at the given depth.
    #[must_use]
    pub const fn from_full(depth: ColorDepth, full: u32) -> Self {
        match depth {
            ColorDepth::Mono => {
                let on = (full & 1) as u8;
                Self::from_channels(depth, on, on, on)
            }
            ColorDepth::Rgb332 => Self::from_channels(
                depth,
                ((full >> 5) & 0x7) as u8,
                ((full >> 2) & 0x7) as u8,
                (full & 0x3) as u8,
            ),
            ColorDepth::Rgb565 => Self::from_channels(
                depth,
                ((full >> 11) & 0x1F) as u8,
                ((full >> 5) & 0x3F) as u8,
                (full & 0x1F) as u8,
            ),
            ColorDepth::Rgb888 => Self::from_channels(
                depth,
                ((full >> 16) & 0xFF) as u8,
                ((full >> 8) & 0xFF) as u8,
                (full & 0xFF) as u8,
            ),
        }
    }

    /// Expands the channels back to 8 bits by bit replication.
    #[must_use]
    pub const fn to_rgb(self) -> Rgb {
        let (rb, gb, bb) = self.depth.channel_bits();
        Rgb(
            expand_channel(self.r, rb),
            expand_channel(self.g, gb),
            expand_channel(self.b, bb),
        )
    }

    /// Re-packs this color for another depth.
    #[must_use]
    pub const fn to_depth(self, depth: ColorDepth) -> Self {
        if self.depth as u8 == depth as u8 {
            return self;
        }
        depth.make(self.to_rgb())
    }

    /// Perceived brightness, `0..=255`, weighted `(3R + 4G + B) / 8`.
    #[must_use]
    pub const fn brightness(self) -> u8 {
        let Rgb(r, g, b) = self.to_rgb();
        let sum = r as u16 * 3 + b as u16 + g as u16 * 4;
        (sum >> 3) as u8
    }
}

const fn expand_channel(v: u8, bits: u32) -> u8 {
    match bits {
        1 => v * 255,
        2 => v * 85,
        3 => (v << 5) | (v << 2) | (v >> 1),
        5 => (v << 3) | (v >> 2),
        6 => (v << 2) | (v >> 4),
        _ => v,
    }
}

/// Blends `c1` over `c2`.
///
/// Each channel is `(c1 * ratio + c2 * (256 - ratio)) / 256` with truncating
/// division, so `ratio == 256` returns `c1` and `ratio == 0` returns `c2`
/// exactly. At [`ColorDepth::Mono`] the result is `c1` when the ratio is
/// above one half and `c2` otherwise.
///
/// # Panics
///
/// Panics in debug builds if the colors have different depths.
#[must_use]
pub fn mix(c1: Color, c2: Color, ratio: u16) -> Color {
    debug_assert_eq!(c1.depth, c2.depth, "mixing colors of different depth");
    let ratio = ratio.min(MIX_MAX);
    if c1.depth == ColorDepth::Mono {
        return if ratio > 128 { c1 } else { c2 };
    }
    let inv = MIX_MAX - ratio;
    let ch = |a: u8, b: u8| -> u8 {
        let v = (u32::from(a) * u32::from(ratio) + u32::from(b) * u32::from(inv)) >> 8;
        // Both inputs are at most 255, so the weighted mean is too.
        v as u8
    };
    Color::from_channels(c1.depth, ch(c1.r, c2.r), ch(c1.g, c2.g), ch(c1.b, c2.b))
}
