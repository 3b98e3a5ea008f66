// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangle algebra.
//!
//! An [`Area`] is an axis-aligned rectangle with **inclusive** bounds on both
//! ends, so a single pixel is `Area::new(x, y, x, y)` and
//! `width = x2 - x1 + 1`. Every draw call clips against an `Area` mask, and
//! every clip goes through [`Area::intersect`], which returns `None` when the
//! two rectangles do not overlap.
//!
//! An area whose width or height is below 1 is *invalid*; nothing is ever
//! drawn into it. Callers check [`Area::is_valid`] (or the `Option` returned
//! by `intersect`) before rasterizing.

use core::fmt;

/// Signed pixel coordinate.
pub type Coord = i32;

/// A point in screen pixels.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal position.
    pub x: Coord,
    /// Vertical position.
    pub y: Coord,
}

impl Point {
    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle with inclusive integer bounds.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Area {
    /// Left edge (inclusive).
    pub x1: Coord,
    /// Top edge (inclusive).
    pub y1: Coord,
    /// Right edge (inclusive).
    pub x2: Coord,
    /// Bottom edge (inclusive).
    pub y2: Coord,
}

impl fmt::Debug for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Area({},{} .. {},{})", self.x1, self.y1, self.x2, self.y2)
    }
}

impl Area {
    /// Creates an area from its inclusive corners.
    #[inline]
    #[must_use]
    pub const fn new(x1: Coord, y1: Coord, x2: Coord, y2: Coord) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Creates an area from an origin and a size.
    #[inline]
    #[must_use]
    pub const fn from_origin_size(x: Coord, y: Coord, width: Coord, height: Coord) -> Self {
        Self::new(x, y, x + width - 1, y + height - 1)
    }

    /// Width in pixels (`x2 - x1 + 1`).
    #[inline]
    #[must_use]
    pub const fn width(&self) -> Coord {
        self.x2 - self.x1 + 1
    }

    /// Height in pixels (`y2 - y1 + 1`).
    #[inline]
    #[must_use]
    pub const fn height(&self) -> Coord {
        self.y2 - self.y1 + 1
    }

    /// Number of pixels covered, or 0 for an invalid area.
    #[must_use]
    pub fn size(&self) -> u32 {
        if !self.is_valid() {
            return 0;
        }
        self.width().unsigned_abs() * self.height().unsigned_abs()
    }

    /// Whether the area has at least one pixel.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.width() >= 1 && self.height() >= 1
    }

    /// Keeps `x1` and moves `x2` so the width becomes `w`.
    #[inline]
    pub fn set_width(&mut self, w: Coord) {
        self.x2 = self.x1 + w - 1;
    }

    /// Keeps `y1` and moves `y2` so the height becomes `h`.
    #[inline]
    pub fn set_height(&mut self, h: Coord) {
        self.y2 = self.y1 + h - 1;
    }

    /// Moves the top-left corner to `(x, y)`, keeping the size.
    pub fn set_pos(&mut self, x: Coord, y: Coord) {
        let w = self.width();
        let h = self.height();
        self.x1 = x;
        self.y1 = y;
        self.set_width(w);
        self.set_height(h);
    }

    /// Returns the top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    /// Returns a copy shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn translate(&self, dx: Coord, dy: Coord) -> Self {
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    /// Returns a copy grown by `n` pixels on every side (shrunk if `n < 0`).
    #[inline]
    #[must_use]
    pub const fn expand(&self, n: Coord) -> Self {
        Self::new(self.x1 - n, self.y1 - n, self.x2 + n, self.y2 + n)
    }

    /// Intersection of two areas, or `None` when they are disjoint on either
    /// axis.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        if self.x1 > other.x2 || self.x2 < other.x1 || self.y1 > other.y2 || self.y2 < other.y1 {
            return None;
        }
        let r = Self::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        );
        r.is_valid().then_some(r)
    }

    /// Bounding box of both areas.
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        Self::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// Inclusive point containment.
    #[inline]
    #[must_use]
    pub const fn is_point_on(&self, p: Point) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }

    /// Whether `self` lies completely inside `outer`.
    #[inline]
    #[must_use]
    pub const fn is_in(&self, outer: &Self) -> bool {
        self.x1 >= outer.x1 && self.y1 >= outer.y1 && self.x2 <= outer.x2 && self.y2 <= outer.y2
    }

    /// Whether the two areas share at least one pixel.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.intersect(other).is_some()
    }

    /// Converts to a `kurbo::Rect` with exclusive max edges.
    #[must_use]
    pub fn to_rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x1),
            f64::from(self.y1),
            f64::from(self.x2) + 1.0,
            f64::from(self.y2) + 1.0,
        )
    }

    /// Converts a `kurbo::Rect` to the smallest area covering it.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "pixel coordinates are well within i32 after rounding outward"
    )]
    pub fn from_rect(rect: kurbo::Rect) -> Self {
        let r = rect.abs().expand();
        Self::new(
            r.x0 as Coord,
            r.y0 as Coord,
            r.x1 as Coord - 1,
            r.y1 as Coord - 1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_and_height_are_inclusive() {
        let a = Area::new(0, 0, 99, 49);
        assert_eq!(a.width(), 100, "x2 is inclusive");
        assert_eq!(a.height(), 50, "y2 is inclusive");
        assert_eq!(a.size(), 5000, "size is width * height");

        let px = Area::new(7, 3, 7, 3);
        assert_eq!(px.width(), 1, "single column");
        assert_eq!(px.height(), 1, "single row");
    }

    #[test]
    fn set_width_keeps_origin() {
        let mut a = Area::new(10, 20, 30, 40);
        a.set_width(5);
        a.set_height(1);
        assert_eq!(a, Area::new(10, 20, 14, 20));
    }

    #[test]
    fn intersect_disjoint_is_none() {
        let a = Area::new(0, 0, 9, 9);
        assert!(a.intersect(&Area::new(10, 0, 20, 9)).is_none(), "x disjoint");
        assert!(a.intersect(&Area::new(0, 10, 9, 20)).is_none(), "y disjoint");
        assert!(a.intersect(&Area::new(-5, -5, -1, 3)).is_none(), "left of");
    }

    #[test]
    fn intersect_result_lies_in_both() {
        let a = Area::new(0, 0, 9, 9);
        let b = Area::new(5, -3, 15, 4);
        let r = a.intersect(&b).expect("areas overlap");
        assert_eq!(r, Area::new(5, 0, 9, 4));
        assert!(r.is_in(&a), "intersection inside first operand");
        assert!(r.is_in(&b), "intersection inside second operand");
    }

    #[test]
    fn touching_edges_overlap_by_one_pixel() {
        let a = Area::new(0, 0, 9, 9);
        let b = Area::new(9, 9, 20, 20);
        assert_eq!(a.intersect(&b), Some(Area::new(9, 9, 9, 9)));
    }

    #[test]
    fn join_is_bounding_box() {
        let a = Area::new(0, 0, 4, 4);
        let b = Area::new(10, -2, 12, 3);
        assert_eq!(a.join(&b), Area::new(0, -2, 12, 4));
    }

    #[test]
    fn containment() {
        let a = Area::new(0, 0, 9, 9);
        assert!(a.is_in(&a), "an area contains itself");
        assert!(Area::new(2, 2, 3, 3).is_in(&a), "nested area");
        assert!(!Area::new(2, 2, 10, 3).is_in(&a), "pokes out on the right");
        assert!(a.is_point_on(Point::new(9, 0)), "corner is inclusive");
        assert!(!a.is_point_on(Point::new(10, 0)), "one past the edge");
    }

    #[test]
    fn collapsed_area_is_invalid() {
        let mut a = Area::new(5, 5, 10, 10);
        a.set_width(0);
        assert!(!a.is_valid(), "zero width");
        assert_eq!(a.size(), 0, "invalid areas have no pixels");
    }

    #[test]
    fn kurbo_conversion_rounds_outward() {
        let a = Area::new(1, 2, 10, 20);
        assert_eq!(Area::from_rect(a.to_rect()), a);
        let fractional = kurbo::Rect::new(0.5, 0.5, 3.2, 3.0);
        assert_eq!(Area::from_rect(fractional), Area::new(0, 0, 3, 2));
    }
}
