// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Straight lines with width correction.

use tessera_core::area::{Area, Coord, Point};
use tessera_core::color::Opa;
use tessera_core::style::Style;

use crate::canvas::Canvas;
use crate::raster::fill;

/// `64 / cos(atan(i / 64))`: widens slanted lines so they look as thick as
/// straight ones.
const WIDTH_CORR: [u8; 65] = [
    64, 64, 64, 64, 64, 64, 64, 64, 64, 65, 65, 65, 65, 65, 66, 66, 66, 66, 66, 67, 67, 67, 68,
    68, 68, 69, 69, 69, 70, 70, 71, 71, 72, 72, 72, 73, 73, 74, 74, 75, 75, 76, 77, 77, 78, 78,
    79, 79, 80, 81, 81, 82, 82, 83, 84, 84, 85, 86, 86, 87, 88, 88, 89, 90, 91,
];

fn normalized(x1: Coord, y1: Coord, x2: Coord, y2: Coord) -> Area {
    Area::new(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
}

/// Draws a line from `p1` to `p2` with the line style of `style`.
///
/// Zero width or coincident end points draw nothing.
pub fn draw_line(canvas: &mut Canvas, p1: Point, p2: Point, mask: &Area, style: &Style, opa: Opa) {
    let width = style.line.width;
    if width <= 0 || p1 == p2 {
        return;
    }
    let color = style.line.color;
    let run = |canvas: &mut Canvas, a: Area| fill(canvas, &a, mask, color, opa);

    let w = width - 1;
    if p1.y == p2.y {
        let (half, odd) = (w >> 1, w & 1);
        run(canvas, normalized(p1.x, p1.y - half - odd, p2.x, p1.y + half));
        return;
    }
    if p1.x == p2.x {
        let (half, odd) = (w >> 1, w & 1);
        run(canvas, normalized(p1.x - half, p1.y, p1.x + half + odd, p2.y));
        return;
    }

    let (dx, sx) = ((p2.x - p1.x).abs(), (p2.x - p1.x).signum());
    let (dy, sy) = ((p2.y - p1.y).abs(), (p2.y - p1.y).signum());
    let hor = dx >= dy;
    let slope = if hor { dy * 64 / dx } else { dx * 64 / dy };
    let corr = Coord::from(WIDTH_CORR[slope.clamp(0, 64).unsigned_abs() as usize]);
    let w = (w * corr) >> 6;
    let (half, odd) = (w >> 1, w & 1);

    // Bresenham; each run of pixels on one row (or column) is one fill.
    let mut err = (if dx > dy { dx } else { -dy }) / 2;
    let mut act = p1;
    let mut last = p1;
    while act != p2 {
        if hor && last.y != act.y {
            run(
                canvas,
                normalized(last.x, last.y - half, act.x - sx, last.y + half + odd),
            );
            last = act;
        }
        if !hor && last.x != act.x {
            run(
                canvas,
                normalized(last.x - half, last.y, last.x + half + odd, act.y - sy),
            );
            last = act;
        }
        let e2 = err;
        if e2 > -dx {
            err -= dy;
            act.x += sx;
        }
        if e2 < dy {
            err += dx;
            act.y += sy;
        }
    }
    if hor {
        run(canvas, normalized(last.x, last.y - half, act.x, last.y + half + odd));
    } else {
        run(canvas, normalized(last.x - half, last.y, last.x + half + odd, act.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::color::{Color, ColorDepth, OPA_COVER, Rgb};

    const DEPTH: ColorDepth = ColorDepth::Rgb888;

    fn setup(width: Coord) -> (Canvas, Style) {
        let mut s = Style::screen(DEPTH, 100, None);
        s.line.width = width;
        s.line.color = DEPTH.make(Rgb::RED);
        (Canvas::new(Area::new(0, 0, 19, 19), DEPTH), s)
    }

    fn painted(c: &Canvas, x: Coord, y: Coord) -> bool {
        c.pixel(x, y) != Some(Color::black(DEPTH))
    }

    #[test]
    fn degenerate_lines_draw_nothing() {
        let (mut c, s) = setup(0);
        let mask = c.area();
        draw_line(&mut c, Point::new(0, 0), Point::new(9, 0), &mask, &s, OPA_COVER);
        let (_, s) = setup(3);
        draw_line(&mut c, Point::new(4, 4), Point::new(4, 4), &mask, &s, OPA_COVER);
        assert!((0..20).all(|y| (0..20).all(|x| !painted(&c, x, y))), "canvas untouched");
    }

    #[test]
    fn straight_lines_are_centered_on_the_axis() {
        let (mut c, s) = setup(3);
        let mask = c.area();
        draw_line(&mut c, Point::new(2, 5), Point::new(12, 5), &mask, &s, OPA_COVER);
        assert!(painted(&c, 2, 4) && painted(&c, 12, 6), "three rows thick");
        assert!(!painted(&c, 2, 3) && !painted(&c, 2, 7), "no more than three");

        let (mut c, s) = setup(3);
        draw_line(&mut c, Point::new(5, 12), Point::new(5, 2), &mask, &s, OPA_COVER);
        assert!(painted(&c, 4, 2) && painted(&c, 6, 12), "three columns thick");
        assert!(!painted(&c, 3, 7) && !painted(&c, 7, 7), "no more than three");
    }

    #[test]
    fn diagonal_hits_every_step() {
        let (mut c, s) = setup(1);
        let mask = c.area();
        draw_line(&mut c, Point::new(0, 0), Point::new(9, 9), &mask, &s, OPA_COVER);
        for i in 0..10 {
            assert!(painted(&c, i, i), "({i},{i})");
        }
        assert!(!painted(&c, 1, 0) && !painted(&c, 0, 1), "one pixel wide");
    }

    #[test]
    fn shallow_line_covers_each_column_once() {
        let (mut c, s) = setup(1);
        let mask = c.area();
        draw_line(&mut c, Point::new(0, 0), Point::new(9, 2), &mask, &s, OPA_COVER);
        for x in 0..10 {
            let hits = (0..3).filter(|y| painted(&c, x, *y)).count();
            assert_eq!(hits, 1, "column {x}");
        }
        assert!(painted(&c, 0, 0) && painted(&c, 9, 2), "end points");
    }

    #[test]
    fn steep_line_covers_each_row_once() {
        let (mut c, s) = setup(1);
        let mask = c.area();
        draw_line(&mut c, Point::new(3, 15), Point::new(1, 0), &mask, &s, OPA_COVER);
        for y in 0..16 {
            let hits = (0..5).filter(|x| painted(&c, *x, y)).count();
            assert_eq!(hits, 1, "row {y}");
        }
    }
}
