// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The software [`Painter`].

use core::fmt;

use tessera_core::area::{Area, Point};
use tessera_core::color::{Color, ColorDepth, Opa};
use tessera_core::painter::{ImageSource, Painter, TextFlags};
use tessera_core::style::Style;
use tessera_core::trace::{FallbackReason, ImageFallbackEvent, Tracer};

#[cfg(feature = "trace-rich")]
use tessera_core::{node::DrawMode, node::NodeId, trace::NodeDrawnEvent};

use crate::canvas::Canvas;
use crate::image::{self, ImageLoader, ImageTarget};
use crate::raster::{self, MapOptions};
use crate::{line, rect, text};

/// Rasterizes draw requests into a [`Canvas`].
pub struct Renderer<'a, 't> {
    canvas: &'a mut Canvas,
    images: &'a dyn ImageLoader,
    placeholder: &'a Style,
    tracer: &'a mut Tracer<'t>,
    frame_index: u64,
}

impl fmt::Debug for Renderer<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("canvas", &self.canvas.area())
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl<'a, 't> Renderer<'a, 't> {
    /// A renderer drawing into `canvas`.
    ///
    /// File images are opened through `images`; images that fail to load
    /// are replaced by a box in the `placeholder` style.
    pub fn new(
        canvas: &'a mut Canvas,
        images: &'a dyn ImageLoader,
        placeholder: &'a Style,
        tracer: &'a mut Tracer<'t>,
        frame_index: u64,
    ) -> Self {
        Self {
            canvas,
            images,
            placeholder,
            tracer,
            frame_index,
        }
    }

    /// The canvas being drawn into.
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        self.canvas
    }

    #[cfg(feature = "trace-rich")]
    pub(crate) fn node_drawn(&mut self, id: NodeId, mode: DrawMode) {
        self.tracer.node_drawn(&NodeDrawnEvent {
            frame_index: self.frame_index,
            node_index: id.index(),
            mode,
        });
    }
}

impl Painter for Renderer<'_, '_> {
    fn draw_rect(&mut self, area: &Area, mask: &Area, style: &Style, opa: Opa) {
        rect::draw_rect(self.canvas, area, mask, style, opa);
    }

    fn draw_label(
        &mut self,
        area: &Area,
        mask: &Area,
        style: &Style,
        opa: Opa,
        text: &str,
        flags: TextFlags,
    ) {
        text::draw_label(self.canvas, area, mask, style, opa, text, flags);
    }

    fn draw_line(&mut self, p1: Point, p2: Point, mask: &Area, style: &Style, opa: Opa) {
        line::draw_line(self.canvas, p1, p2, mask, style, opa);
    }

    fn draw_image(
        &mut self,
        area: &Area,
        mask: &Area,
        style: &Style,
        opa: Opa,
        src: &ImageSource,
        upscale: bool,
    ) {
        let (images, placeholder) = (self.images, self.placeholder);
        image::draw_image(self, images, placeholder, area, mask, style, opa, src, upscale);
    }
}

impl ImageTarget for Renderer<'_, '_> {
    fn depth(&self) -> ColorDepth {
        self.canvas.depth()
    }

    fn blit_row(&mut self, area: &Area, mask: &Area, pixels: &[Color], opts: &MapOptions) {
        raster::map(self.canvas, area, mask, pixels, opts);
    }

    fn image_fallback(&mut self, area: &Area, reason: FallbackReason) {
        self.tracer.image_fallback(&ImageFallbackEvent {
            frame_index: self.frame_index,
            area: *area,
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::image::{FLAG_TRANSPARENT, MemoryLoader, RawImageHeader};
    use tessera_core::color::{OPA_COVER, Rgb};
    use tessera_core::style::BuiltinStyles;

    const DEPTH: ColorDepth = ColorDepth::Rgb565;

    fn blob(header: RawImageHeader, pixels: &[u16]) -> Vec<u8> {
        let mut v = header.to_bytes().to_vec();
        for p in pixels {
            v.extend_from_slice(&p.to_le_bytes());
        }
        v
    }

    fn rgb565(c: Rgb) -> u16 {
        u16::try_from(DEPTH.make(c).full()).unwrap()
    }

    #[test]
    fn file_image_pixels_land_on_the_canvas() {
        let (red, blue, key) = (rgb565(Rgb::RED), rgb565(Rgb::BLUE), rgb565(Rgb::TRANSP_KEY));
        let header = RawImageHeader {
            width: 3,
            height: 1,
            color_depth: 16,
            flags: FLAG_TRANSPARENT,
        };
        let mut loader = MemoryLoader::new();
        loader.insert("img.bin", blob(header, &[red, key, blue]));

        let styles = BuiltinStyles::new(DEPTH, 100, None);
        let mut canvas = Canvas::new(Area::new(0, 0, 9, 9), DEPTH);
        let mut tracer = Tracer::none();
        let mut r = Renderer::new(&mut canvas, &loader, &styles.plain, &mut tracer, 0);
        let area = Area::new(2, 3, 4, 3);
        let src = ImageSource::File("img.bin".into());
        r.draw_image(&area, &area, &styles.plain, OPA_COVER, &src, false);

        assert_eq!(canvas.pixel(2, 3), Some(DEPTH.make(Rgb::RED)));
        assert_eq!(canvas.pixel(3, 3), Some(Color::black(DEPTH)), "keyed pixel skipped");
        assert_eq!(canvas.pixel(4, 3), Some(DEPTH.make(Rgb::BLUE)));
    }

    #[test]
    fn upscaled_image_draws_blocks_inside_the_mask() {
        let red = rgb565(Rgb::RED);
        let blue = rgb565(Rgb::BLUE);
        let header = RawImageHeader {
            width: 2,
            height: 1,
            color_depth: 16,
            flags: 0,
        };
        let mut loader = MemoryLoader::new();
        loader.insert("img.bin", blob(header, &[red, blue]));

        let styles = BuiltinStyles::new(DEPTH, 100, None);
        let mut canvas = Canvas::new(Area::new(0, 0, 9, 9), DEPTH);
        let mut tracer = Tracer::none();
        let mut r = Renderer::new(&mut canvas, &loader, &styles.plain, &mut tracer, 0);
        let area = Area::new(0, 0, 3, 1);
        let mask = Area::new(1, 0, 9, 9);
        let src = ImageSource::File("img.bin".into());
        r.draw_image(&area, &mask, &styles.plain, OPA_COVER, &src, true);

        let black = Color::black(DEPTH);
        assert_eq!(canvas.pixel(0, 0), Some(black), "outside the mask");
        assert_eq!(canvas.pixel(1, 1), Some(DEPTH.make(Rgb::RED)));
        assert_eq!(canvas.pixel(2, 0), Some(DEPTH.make(Rgb::BLUE)));
        assert_eq!(canvas.pixel(3, 1), Some(DEPTH.make(Rgb::BLUE)));
        assert_eq!(canvas.pixel(4, 0), Some(black), "image is four pixels wide");
    }

    #[test]
    fn missing_image_paints_the_placeholder_body() {
        let styles = BuiltinStyles::new(DEPTH, 100, None);
        let mut canvas = Canvas::new(Area::new(0, 0, 29, 29), DEPTH);
        let mut tracer = Tracer::none();
        let loader = MemoryLoader::new();
        let mut r = Renderer::new(&mut canvas, &loader, &styles.plain, &mut tracer, 0);
        let area = Area::new(5, 5, 24, 24);
        let src = ImageSource::File("nonexistent.bin".into());
        r.draw_image(&area, &area, &styles.pretty, OPA_COVER, &src, false);
        assert_eq!(canvas.pixel(15, 15), Some(styles.plain.body.main_color));
        assert_eq!(canvas.pixel(0, 0), Some(Color::black(DEPTH)));
    }
}
