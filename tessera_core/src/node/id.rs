// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node handles.

use core::fmt;

/// Link value meaning "no parent", "no child", or "no sibling".
pub const NO_NODE: u32 = u32::MAX;

/// A handle to a node in a [`NodeStore`](super::NodeStore).
///
/// A slot index paired with the slot's generation at allocation time. Freeing
/// a node bumps the generation, so a handle kept past `delete` no longer
/// resolves even after the slot is handed to a new node.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    #[inline]
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self { idx, generation }
    }

    /// Slot index, as reported in trace events.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// How many times the slot was recycled before this node took it.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Returns `true` if `other` names the same slot from a different lifetime.
    #[inline]
    #[must_use]
    pub const fn is_stale_alias_of(self, other: Self) -> bool {
        self.idx == other.idx && self.generation != other.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.idx, self.generation)
    }
}

/// `#index`, matching how trace output names nodes.
impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.idx)
    }
}
