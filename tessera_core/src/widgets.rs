// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic widgets.
//!
//! These cover the four draw primitives. Richer widgets (buttons, sliders,
//! lists) are compositions of these plus their own state and live outside
//! this crate.

use alloc::string::String;
use alloc::vec::Vec;

use crate::area::{Area, Point};
use crate::node::{DrawMode, NodeView, Signal, Widget, draw_base};
use crate::painter::{ImageSource, Painter, TextFlags};

/// A styled rectangle with no extra data.
#[derive(Clone, Copy, Debug, Default)]
pub struct Plain;

impl Widget for Plain {}

/// Text drawn with the node's text style.
#[derive(Clone, Debug, Default)]
pub struct Label {
    /// The text; `\n` starts a new line.
    pub text: String,
    /// Layout options.
    pub flags: TextFlags,
}

impl Label {
    /// Creates a label with default flags.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flags: TextFlags::default(),
        }
    }
}

impl Widget for Label {
    fn draw(
        &self,
        node: &NodeView<'_>,
        painter: &mut dyn Painter,
        mask: &Area,
        mode: DrawMode,
    ) -> bool {
        match mode {
            DrawMode::CoverCheck => false,
            DrawMode::Main => {
                painter.draw_label(&node.coords, mask, node.style, node.opa, &self.text, self.flags);
                true
            }
            DrawMode::Post => true,
        }
    }

    fn signal(&mut self, signal: &Signal) {
        if *signal == Signal::Cleanup {
            self.text = String::new();
        }
    }
}

/// A bitmap image, or a text symbol in its place.
#[derive(Clone, Debug, Default)]
pub struct Image {
    /// Image source.
    pub source: ImageSource,
    /// Draw every source pixel as a 2x2 block.
    pub upscale: bool,
}

impl Image {
    /// Creates an image widget drawn at its natural size.
    #[must_use]
    pub fn new(source: ImageSource) -> Self {
        Self {
            source,
            upscale: false,
        }
    }

    /// Sets 2x upscaling.
    #[must_use]
    pub fn with_upscale(mut self, upscale: bool) -> Self {
        self.upscale = upscale;
        self
    }
}

impl Widget for Image {
    fn draw(
        &self,
        node: &NodeView<'_>,
        painter: &mut dyn Painter,
        mask: &Area,
        mode: DrawMode,
    ) -> bool {
        match mode {
            DrawMode::CoverCheck => false,
            DrawMode::Main => {
                painter.draw_image(
                    &node.coords,
                    mask,
                    node.style,
                    node.opa,
                    &self.source,
                    self.upscale,
                );
                true
            }
            DrawMode::Post => true,
        }
    }
}

/// A polyline whose points are relative to the node's top-left corner.
#[derive(Clone, Debug, Default)]
pub struct Line {
    /// Vertices.
    pub points: Vec<Point>,
    /// Draw the node's body rectangle behind the line.
    pub with_body: bool,
}

impl Line {
    /// Creates a line through `points`.
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            with_body: false,
        }
    }
}

impl Widget for Line {
    fn draw(
        &self,
        node: &NodeView<'_>,
        painter: &mut dyn Painter,
        mask: &Area,
        mode: DrawMode,
    ) -> bool {
        match mode {
            DrawMode::CoverCheck => false,
            DrawMode::Main => {
                if self.with_body {
                    draw_base(node, painter, mask, mode);
                }
                let origin = node.coords.origin();
                for seg in self.points.windows(2) {
                    let p1 = Point::new(origin.x + seg[0].x, origin.y + seg[0].y);
                    let p2 = Point::new(origin.x + seg[1].x, origin.y + seg[1].y);
                    painter.draw_line(p1, p2, mask, node.style, node.opa);
                }
                true
            }
            DrawMode::Post => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::color::{ColorDepth, Opa};
    use crate::node::NodeId;
    use crate::style::{Style, activated_style};

    #[derive(Debug, Default)]
    struct Calls {
        rects: Vec<Area>,
        lines: Vec<(Point, Point)>,
        labels: Vec<String>,
        images: Vec<(ImageSource, bool)>,
    }

    impl Painter for Calls {
        fn draw_rect(&mut self, area: &Area, _: &Area, _: &Style, _: Opa) {
            self.rects.push(*area);
        }
        fn draw_label(&mut self, _: &Area, _: &Area, _: &Style, _: Opa, text: &str, _: TextFlags) {
            self.labels.push(text.into());
        }
        fn draw_line(&mut self, p1: Point, p2: Point, _: &Area, _: &Style, _: Opa) {
            self.lines.push((p1, p2));
        }
        fn draw_image(
            &mut self,
            _: &Area,
            _: &Area,
            _: &Style,
            _: Opa,
            src: &ImageSource,
            upscale: bool,
        ) {
            self.images.push((src.clone(), upscale));
        }
    }

    fn style(radius: i32) -> Style {
        let mut s = Style::screen(ColorDepth::Rgb565, 100, None);
        s.body.radius = radius;
        s
    }

    fn view(style: &Style) -> NodeView<'_> {
        NodeView {
            id: NodeId::new(0, 0),
            coords: Area::new(10, 10, 59, 39),
            opa: 255,
            style,
        }
    }

    #[test]
    fn plain_cover_check_respects_radius() {
        let s = style(5);
        let v = view(&s);
        let mut p = Calls::default();
        let center = Area::new(20, 20, 40, 30);
        let corner = Area::new(10, 10, 12, 12);
        assert!(Plain.draw(&v, &mut p, &center, DrawMode::CoverCheck), "center covered");
        assert!(!Plain.draw(&v, &mut p, &corner, DrawMode::CoverCheck), "corner not covered");
        assert!(p.rects.is_empty(), "cover check draws nothing");
    }

    #[test]
    fn empty_body_never_covers() {
        let mut s = style(0);
        s.body.empty = true;
        let v = view(&s);
        let mut p = Calls::default();
        assert!(!Plain.draw(&v, &mut p, &Area::new(20, 20, 21, 21), DrawMode::CoverCheck));
    }

    #[test]
    fn line_points_are_relative_to_origin() {
        let s = style(0);
        let v = view(&s);
        let mut p = Calls::default();
        let line = Line::new(vec![Point::new(0, 0), Point::new(5, 5), Point::new(10, 0)]);
        line.draw(&v, &mut p, &v.coords, DrawMode::Main);
        assert_eq!(
            p.lines,
            vec![
                (Point::new(10, 10), Point::new(15, 15)),
                (Point::new(15, 15), Point::new(20, 10))
            ]
        );
        assert!(p.rects.is_empty(), "no body by default");
    }

    #[test]
    fn label_draws_text_and_clears_on_cleanup() {
        let s = activated_style(&style(0));
        let v = view(&s);
        let mut p = Calls::default();
        let mut label = Label::new("hi");
        assert!(!label.draw(&v, &mut p, &v.coords, DrawMode::CoverCheck), "text never covers");
        label.draw(&v, &mut p, &v.coords, DrawMode::Main);
        assert_eq!(p.labels, vec![String::from("hi")]);
        label.signal(&Signal::Cleanup);
        assert!(label.text.is_empty(), "cleanup releases the text");
    }

    #[test]
    fn image_passes_its_upscale_setting() {
        let s = style(0);
        let v = view(&s);
        let mut p = Calls::default();
        let src = ImageSource::File("logo.bin".into());
        Image::new(src.clone()).draw(&v, &mut p, &v.coords, DrawMode::Main);
        Image::new(src.clone())
            .with_upscale(true)
            .draw(&v, &mut p, &v.coords, DrawMode::Main);
        assert_eq!(p.images, vec![(src.clone(), false), (src, true)]);
    }
}
