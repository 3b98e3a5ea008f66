// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing interface widgets render through.
//!
//! Widgets never touch pixels. Their draw hook receives a `&mut dyn Painter`
//! and issues the four primitives below; `tessera_render` implements the
//! trait with its software rasterizer, and tests implement it with spies.

use alloc::string::String;

use crate::area::{Area, Point};
use crate::color::Opa;
use crate::style::Style;

/// Label layout options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextFlags {
    /// Parse `#RRGGBB text#` recolor commands.
    pub recolor: bool,
    /// Never wrap; lines only end at newlines.
    pub expand: bool,
    /// Center every line horizontally.
    pub center: bool,
    /// Treat `\n` and `\r` as ordinary characters.
    pub no_break: bool,
}

/// Where an image comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// No image set; a placeholder is drawn.
    #[default]
    None,
    /// A named blob resolved by the image loader.
    File(String),
    /// Text drawn with the label renderer instead of pixels.
    Symbol(String),
}

/// Primitive draw operations, all clipped to `mask`.
pub trait Painter {
    /// Fills and/or strokes a (rounded) rectangle.
    fn draw_rect(&mut self, area: &Area, mask: &Area, style: &Style, opa: Opa);

    /// Draws multi-line text inside `area`.
    fn draw_label(
        &mut self,
        area: &Area,
        mask: &Area,
        style: &Style,
        opa: Opa,
        text: &str,
        flags: TextFlags,
    );

    /// Draws a width-corrected line between two points.
    fn draw_line(&mut self, p1: Point, p2: Point, mask: &Area, style: &Style, opa: Opa);

    /// Blits an image, or a placeholder when it cannot be loaded.
    ///
    /// With `upscale` every source pixel covers a 2x2 block.
    fn draw_image(
        &mut self,
        area: &Area,
        mask: &Area,
        style: &Style,
        opa: Opa,
        src: &ImageSource,
        upscale: bool,
    );
}
