// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rounded rectangles with a vertical gradient body and a border.
//!
//! The body is a middle band plus four circle-traced corners. Corner rows
//! are buffered and only filled once the circle walk leaves the row, so no
//! row is painted twice. The border is four straight strips inset by the
//! corner size plus two concentric circle walks per corner.

use tessera_core::area::{Area, Coord, Point};
use tessera_core::color::{Color, Opa, mix};
use tessera_core::style::{Style, border_opa};

use crate::canvas::Canvas;
use crate::circle::Circle;
use crate::raster::fill;

/// Draws `area` with the body and border of `style`, clipped to `mask`.
pub fn draw_rect(canvas: &mut Canvas, area: &Area, mask: &Area, style: &Style, opa: Opa) {
    if area.width() < 1 || area.height() < 1 {
        return;
    }
    let body = &style.body;
    if !body.empty {
        main_mid(canvas, area, mask, style, opa);
        if body.radius != 0 {
            main_corner(canvas, area, mask, style, opa);
        }
    }
    if body.border.width != 0 {
        let bopa = border_opa(opa, body.border.opa);
        border_straight(canvas, area, mask, style, bopa);
        if body.radius != 0 {
            border_corner(canvas, area, mask, style, bopa);
        }
    }
}

/// Clamps a corner radius so opposite corners never meet.
///
/// Along each axis a radius of at least half the extent is reduced to half
/// the extent minus one (or zero).
#[must_use]
pub fn radius_correct(radius: Coord, width: Coord, height: Coord) -> Coord {
    let mut r = radius.max(0);
    for half in [width >> 1, height >> 1] {
        if r >= half {
            r = half;
            if r != 0 {
                r -= 1;
            }
        }
    }
    r
}

/// Body color of screen row `y`: `main` near the top, `grad` at the bottom.
fn row_color(area: &Area, y: Coord, main: Color, grad: Color) -> Color {
    if main == grad {
        return main;
    }
    let ratio = (area.y2 - y) * 255 / area.height();
    mix(main, grad, ratio.clamp(0, 255).unsigned_abs() as u16)
}

fn main_mid(canvas: &mut Canvas, area: &Area, mask: &Area, style: &Style, opa: Opa) {
    let body = &style.body;
    let height = area.height();
    let r = radius_correct(body.radius, area.width(), height);
    if r > height / 2 {
        return;
    }
    let (mut y1, mut y2) = (area.y1 + r, area.y2 - r);
    if body.radius != 0 {
        y1 += 1;
        y2 -= 1;
    }
    if body.main_color == body.grad_color {
        let band = Area::new(area.x1, y1, area.x2, y2);
        fill(canvas, &band, mask, body.main_color, opa);
        return;
    }
    for row in y1.max(mask.y1)..=y2.min(mask.y2) {
        let color = row_color(area, row, body.main_color, body.grad_color);
        fill(canvas, &Area::new(area.x1, row, area.x2, row), mask, color, opa);
    }
}

/// Corner origins, `radius` inset from each corner.
struct Origins {
    lt: Point,
    lb: Point,
    rt: Point,
    rb: Point,
}

impl Origins {
    fn new(area: &Area, r: Coord) -> Self {
        Self {
            lt: Point::new(area.x1 + r, area.y1 + r),
            lb: Point::new(area.x1 + r, area.y2 - r),
            rt: Point::new(area.x2 - r, area.y1 + r),
            rb: Point::new(area.x2 - r, area.y2 - r),
        }
    }

    fn span(a: Point, da: Point, b: Point, db: Point) -> Area {
        Area::new(a.x + da.x, a.y + da.y, b.x + db.x, b.y + db.y)
    }

    /// `[mid_bot, edge_bot, mid_top, edge_top]` rows for the circle point.
    fn body_rows(&self, c: &Circle) -> [Area; 4] {
        [
            Self::span(self.lb, c.o4(), self.rb, c.o1()),
            Self::span(self.lb, c.o3(), self.rb, c.o2()),
            Self::span(self.lt, c.o5(), self.rt, c.o8()),
            Self::span(self.lt, c.o6(), self.rt, c.o7()),
        ]
    }
}

fn main_corner(canvas: &mut Canvas, area: &Area, mask: &Area, style: &Style, opa: Opa) {
    let body = &style.body;
    let r = radius_correct(body.radius, area.width(), area.height());
    let o = Origins::new(area, r);
    let paint = |canvas: &mut Canvas, row: &Area| {
        let color = row_color(area, row.y1, body.main_color, body.grad_color);
        fill(canvas, row, mask, color, opa);
    };

    let mut c = Circle::new(r);
    let [mut mid_bot, mut edge_bot, mut mid_top, mut edge_top] = o.body_rows(&c);
    while c.is_running() {
        if edge_top.y1 != o.lt.y + c.o7().y {
            paint(canvas, &edge_top);
        }
        if mid_top.y1 != o.lt.y + c.o8().y {
            paint(canvas, &mid_top);
        }
        if mid_bot.y1 != o.lb.y + c.o4().y {
            paint(canvas, &mid_bot);
        }
        if edge_bot.y1 != o.lb.y + c.o2().y {
            paint(canvas, &edge_bot);
        }
        [mid_bot, edge_bot, mid_top, edge_top] = o.body_rows(&c);
        c.step();
    }

    paint(canvas, &edge_top);
    if edge_top.y1 != mid_top.y1 {
        paint(canvas, &mid_top);
    }
    paint(canvas, &mid_bot);
    if edge_bot.y1 != mid_bot.y1 {
        paint(canvas, &edge_bot);
    }
}

fn border_straight(canvas: &mut Canvas, area: &Area, mask: &Area, style: &Style, opa: Opa) {
    let body = &style.body;
    let color = body.border.color;
    // A width of 1 strokes a single pixel, so offsets use `width - 1`.
    let bw = body.border.width - 1;
    let r = radius_correct(body.radius, area.width(), area.height());
    let (length_corr, mut corner_size) = if r < bw { (bw - r, bw) } else { (0, r) };
    let strip = |canvas: &mut Canvas, x1, y1, x2, y2| {
        fill(canvas, &Area::new(x1, y1, x2, y2), mask, color, opa);
    };
    let Area { x1, y1, x2, y2 } = *area;

    if body.radius == 0 {
        strip(canvas, x1, y1, x2, y1 + bw);
        strip(canvas, x2 - bw, y1 + bw + 1, x2, y2 - bw - 1);
        strip(canvas, x1, y1 + bw + 1, x1 + bw, y2 - bw - 1);
        strip(canvas, x1, y2 - bw, x2, y2);
        return;
    }

    corner_size += 1;
    let (ys, ye) = (y1 + corner_size, y2 - corner_size);
    strip(canvas, x1, ys, x1 + bw, ye);
    strip(canvas, x2 - bw, ys, x2, ye);
    let (xs, xe) = (
        x1 + corner_size - length_corr,
        x2 - corner_size + length_corr,
    );
    strip(canvas, xs, y1, xe, y1 + bw);
    strip(canvas, xs, y2 - bw, xe, y2);

    if length_corr != 0 {
        strip(canvas, x1, y1 + r + 1, x1 + r, y1 + bw);
        strip(canvas, x2 - r, y1 + r + 1, x2, y1 + bw);
        strip(canvas, x1, y2 - bw, x1 + r, y2 - r - 1);
        strip(canvas, x2 - r, y2 - bw, x2, y2 - r - 1);
    }
}

fn border_corner(canvas: &mut Canvas, area: &Area, mask: &Area, style: &Style, opa: Opa) {
    let body = &style.body;
    let color = body.border.color;
    let bw = body.border.width - 1;
    let r = radius_correct(body.radius, area.width(), area.height());
    let o = Origins::new(area, r);
    let span = |canvas: &mut Canvas, x1, y1, x2, y2| {
        fill(canvas, &Area::new(x1, y1, x2, y2), mask, color, opa);
    };

    let mut out = Circle::new(r);
    let mut inner = Circle::new((r - bw).max(0));
    while out.is_running() {
        // Once the inner walk is done, keep the last inner offset.
        let (w1, w2) = if inner.y < inner.x {
            let w = out.x - inner.x;
            (w, w)
        } else {
            let w = out.x - out.y;
            (w, w - 1)
        };

        // Right bottom.
        let p = Point::new(o.rb.x + out.o1().x, o.rb.y + out.o1().y);
        span(canvas, p.x - w2, p.y, p.x, p.y);
        let p = Point::new(o.rb.x + out.o2().x, o.rb.y + out.o2().y);
        span(canvas, p.x, p.y - w1, p.x, p.y);

        // Left bottom.
        let p = Point::new(o.lb.x + out.o3().x, o.lb.y + out.o3().y);
        span(canvas, p.x, p.y - w2, p.x, p.y);
        let p = Point::new(o.lb.x + out.o4().x, o.lb.y + out.o4().y);
        span(canvas, p.x, p.y, p.x + w1, p.y);

        // Left top. The first span would repeat a bottom row on tiny shapes.
        let p = Point::new(o.lt.x + out.o5().x, o.lt.y + out.o5().y);
        if o.lb.y + out.o4().y > p.y {
            span(canvas, p.x, p.y, p.x + w2, p.y);
        }
        let p = Point::new(o.lt.x + out.o6().x, o.lt.y + out.o6().y);
        span(canvas, p.x, p.y, p.x, p.y + w1);

        // Right top.
        let p = Point::new(o.rt.x + out.o7().x, o.rt.y + out.o7().y);
        span(canvas, p.x, p.y, p.x, p.y + w2);
        let p = Point::new(o.rt.x + out.o8().x, o.rt.y + out.o8().y);
        if o.rb.y + out.o1().y > p.y {
            span(canvas, p.x - w1, p.y, p.x, p.y);
        }

        out.step();
        if inner.y < inner.x {
            inner.step();
        }
    }
}
