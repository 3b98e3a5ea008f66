// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pending dirty areas.
//!
//! [`InvalidationQueue`] collects the rectangles registered for repaint since
//! the last refresh. It is deliberately small and bounded: areas are clipped
//! to the screen on entry, an area already covered by a queued one is
//! dropped, and overflowing the capacity collapses the whole queue into one
//! full-screen area. Before repainting, [`join`](InvalidationQueue::join)
//! merges overlapping areas whenever their bounding box is cheaper than
//! drawing both.

use alloc::vec::Vec;

use crate::area::Area;

/// One queued area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidArea {
    /// Screen-clipped dirty rectangle.
    pub area: Area,
    /// Merged into another entry by [`InvalidationQueue::join`].
    pub joined: bool,
}

/// Bounded queue of dirty areas awaiting a refresh.
#[derive(Clone, Debug)]
pub struct InvalidationQueue {
    screen: Area,
    capacity: usize,
    entries: Vec<InvalidArea>,
}

impl InvalidationQueue {
    /// Creates an empty queue for a screen of the given bounds.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(screen: Area, capacity: usize) -> Self {
        assert!(capacity > 0, "invalidation queue needs at least one slot");
        Self {
            screen,
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Registers `area` for repaint.
    ///
    /// Returns `false` when nothing was queued: the area lies off screen or
    /// inside an area that is already pending.
    pub fn push(&mut self, area: &Area) -> bool {
        let Some(clipped) = area.intersect(&self.screen) else {
            return false;
        };
        if self.entries.iter().any(|e| clipped.is_in(&e.area)) {
            return false;
        }
        if self.entries.len() >= self.capacity {
            self.entries.clear();
            self.entries.push(InvalidArea {
                area: self.screen,
                joined: false,
            });
        } else {
            self.entries.push(InvalidArea {
                area: clipped,
                joined: false,
            });
        }
        true
    }

    /// Merges overlapping entries whose bounding box is smaller than the sum
    /// of their sizes. Merged-away entries are flagged `joined`.
    pub fn join(&mut self) {
        let n = self.entries.len();
        for into in 0..n {
            if self.entries[into].joined {
                continue;
            }
            for from in 0..n {
                if from == into || self.entries[from].joined {
                    continue;
                }
                let a = self.entries[into].area;
                let b = self.entries[from].area;
                if !a.overlaps(&b) {
                    continue;
                }
                let joined = a.join(&b);
                if joined.size() < a.size() + b.size() {
                    self.entries[into].area = joined;
                    self.entries[from].joined = true;
                }
            }
        }
    }

    /// Areas still to be repainted (entries not merged away).
    pub fn pending(&self) -> impl Iterator<Item = Area> + '_ {
        self.entries.iter().filter(|e| !e.joined).map(|e| e.area)
    }

    /// All entries, merged or not.
    #[must_use]
    pub fn entries(&self) -> &[InvalidArea] {
        &self.entries
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Joins the queue, returns the areas to repaint, and empties it.
    pub fn take_joined(&mut self) -> Vec<Area> {
        self.join();
        let areas = self.pending().collect();
        self.entries.clear();
        areas
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn queue(cap: usize) -> InvalidationQueue {
        InvalidationQueue::new(Area::new(0, 0, 99, 99), cap)
    }

    #[test]
    fn push_clips_to_screen() {
        let mut q = queue(4);
        assert!(q.push(&Area::new(-10, 90, 10, 120)), "partly on screen");
        assert_eq!(q.pending().collect::<Vec<_>>(), vec![Area::new(0, 90, 10, 99)]);
        assert!(!q.push(&Area::new(200, 200, 210, 210)), "fully off screen");
        assert_eq!(q.len(), 1, "off-screen area not queued");
    }

    #[test]
    fn contained_area_is_deduplicated() {
        let mut q = queue(4);
        assert!(q.push(&Area::new(0, 0, 50, 50)), "first area");
        assert!(!q.push(&Area::new(10, 10, 20, 20)), "inside the first");
        assert!(q.push(&Area::new(40, 40, 60, 60)), "partial overlap is kept");
        assert_eq!(q.len(), 2, "two entries");
    }

    #[test]
    fn overflow_collapses_to_full_screen() {
        let mut q = queue(2);
        q.push(&Area::new(0, 0, 1, 1));
        q.push(&Area::new(10, 10, 11, 11));
        q.push(&Area::new(20, 20, 21, 21));
        assert_eq!(q.pending().collect::<Vec<_>>(), vec![Area::new(0, 0, 99, 99)]);
    }

    #[test]
    fn join_merges_only_when_cheaper() {
        let mut q = queue(8);
        // Heavily overlapping: bounding box 10x12 = 120 < 100 + 100.
        q.push(&Area::new(0, 0, 9, 9));
        q.push(&Area::new(0, 2, 9, 11));
        // Crossing bars: bounding box 30x30 = 900 > 30 + 30.
        q.push(&Area::new(40, 50, 69, 50));
        q.push(&Area::new(55, 35, 55, 64));
        let areas = q.take_joined();
        assert_eq!(
            areas,
            vec![
                Area::new(0, 0, 9, 11),
                Area::new(40, 50, 69, 50),
                Area::new(55, 35, 55, 64)
            ]
        );
        assert!(q.is_empty(), "take_joined empties the queue");
    }
}
