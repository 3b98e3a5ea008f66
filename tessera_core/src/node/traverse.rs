// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child iteration in both z-orders.

use super::id::{NO_NODE, NodeId};
use super::store::NodeStore;

/// Iterates the direct children of a node, topmost first.
///
/// Created by [`NodeStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a NodeStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == NO_NODE {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(self.store.id_at(idx))
    }
}

/// Iterates the direct children of a node, bottommost first.
///
/// This is painting order. Created by
/// [`NodeStore::children_back_to_front`].
#[derive(Debug)]
pub struct ChildrenBackToFront<'a> {
    store: &'a NodeStore,
    current: u32,
}

impl<'a> ChildrenBackToFront<'a> {
    pub(crate) fn new(store: &'a NodeStore, last: u32) -> Self {
        Self {
            store,
            current: last,
        }
    }
}

impl Iterator for ChildrenBackToFront<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == NO_NODE {
            return None;
        }
        let idx = self.current;
        self.current = self.store.prev_sibling[idx as usize];
        Some(self.store.id_at(idx))
    }
}
