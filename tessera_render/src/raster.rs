// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel-level primitives every shape renderer is built from.
//!
//! All three clip to the mask and to the canvas, so callers may pass areas
//! that reach off screen.

use tessera_core::area::{Area, Point};
use tessera_core::color::{Color, OPA_COVER, OPA_TRANSP, Opa, Rgb, mix};
use tessera_core::font::Font;

use crate::canvas::Canvas;

/// Fills `area ∩ mask` with `color` at opacity `opa`.
pub fn fill(canvas: &mut Canvas, area: &Area, mask: &Area, color: Color, opa: Opa) {
    if opa == OPA_TRANSP {
        return;
    }
    let Some(a) = area.intersect(mask) else {
        return;
    };
    for y in a.y1..=a.y2 {
        let Some(span) = canvas.span_mut(y, a.x1, a.x2) else {
            continue;
        };
        if opa == OPA_COVER {
            span.fill(color);
        } else {
            for px in span {
                *px = mix(color, *px, u16::from(opa));
            }
        }
    }
}

/// Opacity of a raw glyph sample, or `None` for an unsupported depth.
fn sample_opa(bpp: u8, v: u8) -> Option<Opa> {
    const BPP1: [Opa; 2] = [0, 255];
    const BPP2: [Opa; 4] = [0, 85, 170, 255];
    match bpp {
        1 => BPP1.get(usize::from(v)).copied(),
        2 => BPP2.get(usize::from(v)).copied(),
        4 => Some(v.min(15) * 17),
        8 => Some(v),
        _ => None,
    }
}

/// Draws the glyph of `ch` with its top-left corner at `pos`.
///
/// Sample values are mapped to opacity per bit depth and scaled by `opa`;
/// zero samples leave the background untouched.
pub fn letter(
    canvas: &mut Canvas,
    pos: Point,
    mask: &Area,
    font: &dyn Font,
    ch: char,
    color: Color,
    opa: Opa,
) {
    let Some(glyph) = font.glyph(ch) else {
        return;
    };
    if !glyph.is_supported() {
        return;
    }
    let h = font.height();
    let area = Area::from_origin_size(pos.x, pos.y, glyph.width, h);
    let Some(visible) = area.intersect(mask) else {
        return;
    };
    for y in visible.y1..=visible.y2 {
        for x in visible.x1..=visible.x2 {
            let v = glyph.sample(x - pos.x, y - pos.y);
            if v == 0 {
                continue;
            }
            let Some(mut px_opa) = sample_opa(glyph.bpp, v) else {
                return;
            };
            if opa != OPA_COVER {
                px_opa = ((u16::from(px_opa) * u16::from(opa)) >> 8) as Opa;
            }
            if let Some(px) = canvas.pixel_mut(x, y) {
                *px = mix(color, *px, u16::from(px_opa));
            }
        }
    }
}

/// How [`map`] treats the source pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapOptions {
    /// Overall opacity.
    pub opa: Opa,
    /// Skip pixels equal to [`Rgb::TRANSP_KEY`].
    pub chroma_key: bool,
    /// Tint color.
    pub recolor: Color,
    /// Tint strength; `0` disables tinting.
    pub intensity: Opa,
    /// Every source pixel covers a 2x2 block.
    pub upscale: bool,
}

/// Copies one row of source pixels into `area ∩ mask`.
///
/// `area` starts at the first source pixel; with upscaling it is two rows
/// high and twice as wide as `pixels`.
pub fn map(canvas: &mut Canvas, area: &Area, mask: &Area, pixels: &[Color], opts: &MapOptions) {
    let Some(a) = area.intersect(mask) else {
        return;
    };
    let scale = if opts.upscale { 2 } else { 1 };
    let key = canvas.depth().make(Rgb::TRANSP_KEY);
    let plain = !opts.chroma_key && opts.opa == OPA_COVER && opts.intensity == OPA_TRANSP;
    let first = ((a.x1 - area.x1) / scale).unsigned_abs() as usize;

    for y in a.y1..=a.y2 {
        if plain && scale == 1 {
            let len = a.width().unsigned_abs() as usize;
            if let (Some(dst), Some(src)) =
                (canvas.span_mut(y, a.x1, a.x2), pixels.get(first..first + len))
            {
                if dst.len() == src.len() {
                    dst.copy_from_slice(src);
                    continue;
                }
            }
        }
        for x in a.x1..=a.x2 {
            let idx = ((x - area.x1) / scale).unsigned_abs() as usize;
            let Some(&src) = pixels.get(idx) else {
                break;
            };
            if opts.chroma_key && src == key {
                continue;
            }
            let c = if opts.intensity == OPA_TRANSP {
                src
            } else {
                mix(opts.recolor, src, u16::from(opts.intensity))
            };
            if let Some(px) = canvas.pixel_mut(x, y) {
                *px = if opts.opa == OPA_COVER {
                    c
                } else {
                    mix(c, *px, u16::from(opts.opa))
                };
            }
        }
    }
}
