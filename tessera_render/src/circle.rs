// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Midpoint circle stepping.
//!
//! A [`Circle`] walks one octant, from `(r, 0)` to the 45° point. The eight
//! `oN` accessors mirror the current point into every octant, counted
//! counter-clockwise from the positive x axis with y pointing down.

use tessera_core::area::{Coord, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Circle {
    pub(crate) x: Coord,
    pub(crate) y: Coord,
    tmp: Coord,
}

impl Circle {
    pub(crate) fn new(radius: Coord) -> Self {
        Self {
            x: radius,
            y: 0,
            tmp: 1 - radius,
        }
    }

    /// Whether the walk has not yet passed the 45° point.
    #[inline]
    pub(crate) fn is_running(&self) -> bool {
        self.y <= self.x
    }

    pub(crate) fn step(&mut self) {
        if self.tmp <= 0 {
            self.y += 1;
            self.tmp += 2 * self.y + 1;
        } else {
            self.y += 1;
            self.x -= 1;
            self.tmp += 2 * (self.y - self.x) + 1;
        }
    }

    #[inline]
    pub(crate) fn o1(&self) -> Point {
        Point::new(self.x, self.y)
    }
    #[inline]
    pub(crate) fn o2(&self) -> Point {
        Point::new(self.y, self.x)
    }
    #[inline]
    pub(crate) fn o3(&self) -> Point {
        Point::new(-self.y, self.x)
    }
    #[inline]
    pub(crate) fn o4(&self) -> Point {
        Point::new(-self.x, self.y)
    }
    #[inline]
    pub(crate) fn o5(&self) -> Point {
        Point::new(-self.x, -self.y)
    }
    #[inline]
    pub(crate) fn o6(&self) -> Point {
        Point::new(-self.y, -self.x)
    }
    #[inline]
    pub(crate) fn o7(&self) -> Point {
        Point::new(self.y, -self.x)
    }
    #[inline]
    pub(crate) fn o8(&self) -> Point {
        Point::new(self.x, -self.y)
    }
}
