// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and properties.
//!
//! The store is bookkeeping only. It never invalidates or signals; those
//! side effects belong to [`RenderContext`](crate::context::RenderContext),
//! which wraps every mutation.

use alloc::boxed::Box;
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::area::{Area, Coord};
use crate::color::{OPA_COVER, Opa};
use crate::dirty;
use crate::style::StyleRef;

use super::id::{NO_NODE, NodeId};
use super::traverse::{Children, ChildrenBackToFront};
use super::widget::{Vacant, Widget};

/// Per-node boolean flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Receives clicks.
    pub click: bool,
    /// Can be dragged.
    pub drag: bool,
    /// Neither the node nor its subtree is drawn.
    pub hidden: bool,
    /// Moves to the foreground when clicked.
    pub top: bool,
}

/// Struct-of-arrays storage for all nodes.
///
/// Children are kept in z-order: `first_child` is the topmost (newest) child
/// and `next_sibling` walks toward the back.
#[derive(Debug)]
pub struct NodeStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) last_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Properties --
    pub(crate) coords: Vec<Area>,
    pub(crate) ext_size: Vec<Coord>,
    pub(crate) opa: Vec<Opa>,
    pub(crate) flags: Vec<NodeFlags>,
    pub(crate) style: Vec<Option<StyleRef>>,
    pub(crate) widget: Vec<Box<dyn Widget>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            last_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            coords: Vec::new(),
            ext_size: Vec::new(),
            opa: Vec::new(),
            flags: Vec::new(),
            style: Vec::new(),
            widget: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    // -- Allocation API --

    /// Allocates an unlinked node.
    pub(crate) fn alloc(
        &mut self,
        coords: Area,
        style: Option<StyleRef>,
        widget: Box<dyn Widget>,
    ) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = NO_NODE;
            self.first_child[i] = NO_NODE;
            self.last_child[i] = NO_NODE;
            self.next_sibling[i] = NO_NODE;
            self.prev_sibling[i] = NO_NODE;
            self.coords[i] = coords;
            self.ext_size[i] = 0;
            self.opa[i] = OPA_COVER;
            self.flags[i] = NodeFlags::default();
            self.style[i] = style;
            self.widget[i] = widget;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(NO_NODE);
            self.first_child.push(NO_NODE);
            self.last_child.push(NO_NODE);
            self.next_sibling.push(NO_NODE);
            self.prev_sibling.push(NO_NODE);
            self.coords.push(coords);
            self.ext_size.push(0);
            self.opa.push(OPA_COVER);
            self.flags.push(NodeFlags::default());
            self.style.push(style);
            self.widget.push(widget);
            self.generation.push(0);
            idx
        };
        self.id_at(idx)
    }

    /// Frees an unlinked, childless node and returns its widget.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, or the node still has a parent or
    /// children.
    pub(crate) fn free(&mut self, id: NodeId) -> Box<dyn Widget> {
        self.validate(id);
        let i = id.idx as usize;
        assert!(
            self.first_child[i] == NO_NODE,
            "cannot free node with children"
        );
        assert!(self.parent[i] == NO_NODE, "cannot free a linked node");

        self.dirty.remove_key(id.idx);
        self.generation[i] += 1;
        self.style[i] = None;
        self.free_list.push(id.idx);
        core::mem::replace(&mut self.widget[i], Box::new(Vacant))
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Links `child` as the topmost child of `parent`.
    pub(crate) fn link_front(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let (p, c) = (parent.idx, child.idx);
        assert!(
            self.parent[c as usize] == NO_NODE,
            "child already has a parent"
        );

        let head = self.first_child[p as usize];
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = NO_NODE;
        self.next_sibling[c as usize] = head;
        if head == NO_NODE {
            self.last_child[p as usize] = c;
        } else {
            self.prev_sibling[head as usize] = c;
        }
        self.first_child[p as usize] = c;

        let _ = self.dirty.add_dependency(c, p, dirty::STYLE);
    }

    /// Links `child` as the bottommost child of `parent`.
    pub(crate) fn link_back(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let (p, c) = (parent.idx, child.idx);
        assert!(
            self.parent[c as usize] == NO_NODE,
            "child already has a parent"
        );

        let tail = self.last_child[p as usize];
        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = NO_NODE;
        self.prev_sibling[c as usize] = tail;
        if tail == NO_NODE {
            self.first_child[p as usize] = c;
        } else {
            self.next_sibling[tail as usize] = c;
        }
        self.last_child[p as usize] = c;

        let _ = self.dirty.add_dependency(c, p, dirty::STYLE);
    }

    /// Removes `child` from its parent's child list.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node has no parent.
    pub(crate) fn unlink(&mut self, child: NodeId) {
        self.validate(child);
        let c = child.idx;
        let p = self.parent[c as usize];
        assert!(p != NO_NODE, "node has no parent");

        let prev = self.prev_sibling[c as usize];
        let next = self.next_sibling[c as usize];
        if prev == NO_NODE {
            self.first_child[p as usize] = next;
        } else {
            self.next_sibling[prev as usize] = next;
        }
        if next == NO_NODE {
            self.last_child[p as usize] = prev;
        } else {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[c as usize] = NO_NODE;
        self.prev_sibling[c as usize] = NO_NODE;
        self.next_sibling[c as usize] = NO_NODE;

        self.dirty.remove_dependency(c, p, dirty::STYLE);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.parent[id.idx as usize])
    }

    /// Returns the next sibling toward the back, if any.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.next_sibling[id.idx as usize])
    }

    /// Returns the previous sibling toward the front, if any.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.prev_sibling[id.idx as usize])
    }

    /// Iterates the direct children, topmost first.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Iterates the direct children, bottommost first (drawing order).
    #[must_use]
    pub fn children_back_to_front(&self, id: NodeId) -> ChildrenBackToFront<'_> {
        self.validate(id);
        ChildrenBackToFront::new(self, self.last_child[id.idx as usize])
    }

    /// Returns whether `id` is `ancestor` or lies below it.
    #[must_use]
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.validate(id);
        self.validate(ancestor);
        let mut cur = id.idx;
        while cur != NO_NODE {
            if cur == ancestor.idx {
                return true;
            }
            cur = self.parent[cur as usize];
        }
        false
    }

    /// Returns the root of the tree containing `id`.
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.validate(id);
        let mut cur = id.idx;
        while self.parent[cur as usize] != NO_NODE {
            cur = self.parent[cur as usize];
        }
        self.id_at(cur)
    }

    // -- Property getters --

    /// Absolute screen area.
    #[must_use]
    pub fn coords(&self, id: NodeId) -> Area {
        self.validate(id);
        self.coords[id.idx as usize]
    }

    /// Extra margin drawn outside the coordinates.
    #[must_use]
    pub fn ext_size(&self, id: NodeId) -> Coord {
        self.validate(id);
        self.ext_size[id.idx as usize]
    }

    /// Node opacity.
    #[must_use]
    pub fn opa(&self, id: NodeId) -> Opa {
        self.validate(id);
        self.opa[id.idx as usize]
    }

    /// Node flags.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// The node's own style, if it has one.
    #[must_use]
    pub fn style(&self, id: NodeId) -> Option<&StyleRef> {
        self.validate(id);
        self.style[id.idx as usize].as_ref()
    }

    /// The node's widget.
    #[must_use]
    pub fn widget(&self, id: NodeId) -> &dyn Widget {
        self.validate(id);
        &*self.widget[id.idx as usize]
    }

    // -- Property setters (no side effects) --

    pub(crate) fn set_coords(&mut self, id: NodeId, area: Area) {
        self.validate(id);
        self.coords[id.idx as usize] = area;
    }

    pub(crate) fn set_ext_size(&mut self, id: NodeId, ext: Coord) {
        self.validate(id);
        self.ext_size[id.idx as usize] = ext;
    }

    pub(crate) fn set_opa(&mut self, id: NodeId, opa: Opa) {
        self.validate(id);
        self.opa[id.idx as usize] = opa;
    }

    pub(crate) fn flags_mut(&mut self, id: NodeId) -> &mut NodeFlags {
        self.validate(id);
        &mut self.flags[id.idx as usize]
    }

    pub(crate) fn style_mut(&mut self, id: NodeId) -> &mut Option<StyleRef> {
        self.validate(id);
        &mut self.style[id.idx as usize]
    }

    pub(crate) fn widget_mut(&mut self, id: NodeId) -> &mut dyn Widget {
        self.validate(id);
        &mut *self.widget[id.idx as usize]
    }

    /// Shifts the absolute coordinates of `id` and its whole subtree.
    pub(crate) fn shift_subtree(&mut self, id: NodeId, dx: Coord, dy: Coord) {
        self.validate(id);
        let mut stack = alloc::vec![id.idx];
        while let Some(idx) = stack.pop() {
            let i = idx as usize;
            self.coords[i] = self.coords[i].translate(dx, dy);
            let mut child = self.first_child[i];
            while child != NO_NODE {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
        }
    }

    // -- Dirty tracking --

    /// Marks the node's style dirty, along with every descendant.
    pub(crate) fn mark_style(&mut self, id: NodeId) {
        self.validate(id);
        self.dirty.mark_with(id.idx, dirty::STYLE, &EagerPolicy);
    }

    /// Drains the style channel, parents before children.
    pub(crate) fn drain_style(&mut self) -> Vec<NodeId> {
        let affected: Vec<u32> = self
            .dirty
            .drain(dirty::STYLE)
            .affected()
            .deterministic()
            .run()
            .collect();
        affected
            .into_iter()
            .filter(|&idx| idx < self.len && !self.free_list.contains(&idx))
            .map(|idx| self.id_at(idx))
            .collect()
    }

    // -- Internal helpers --

    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId::new(idx, self.generation[idx as usize])
    }

    fn opt_id(&self, idx: u32) -> Option<NodeId> {
        (idx != NO_NODE).then(|| self.id_at(idx))
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::widgets::Plain;

    fn node(store: &mut NodeStore) -> NodeId {
        store.alloc(Area::new(0, 0, 9, 9), None, Box::new(Plain))
    }

    #[test]
    fn alloc_and_free() {
        let mut store = NodeStore::new();
        let id = node(&mut store);
        assert!(store.is_alive(id), "allocated");
        let _ = store.free(id);
        assert!(!store.is_alive(id), "freed");
        assert_eq!(store.live_count(), 0, "no live nodes");
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = NodeStore::new();
        let id1 = node(&mut store);
        let _ = store.free(id1);
        let id2 = node(&mut store);
        assert!(!store.is_alive(id1), "old handle is stale");
        assert!(store.is_alive(id2), "new handle is live");
        assert_eq!(id1.idx, id2.idx, "slot reused");
        assert_ne!(id1.generation, id2.generation, "generation bumped");
    }

    #[test]
    fn link_front_puts_newest_on_top() {
        let mut store = NodeStore::new();
        let parent = node(&mut store);
        let a = node(&mut store);
        let b = node(&mut store);
        let c = node(&mut store);
        store.link_front(parent, a);
        store.link_front(parent, b);
        store.link_back(parent, c);

        assert_eq!(store.children(parent).collect::<Vec<_>>(), vec![b, a, c]);
        assert_eq!(
            store.children_back_to_front(parent).collect::<Vec<_>>(),
            vec![c, a, b]
        );
        assert_eq!(store.prev_sibling(a), Some(b), "b is in front of a");
        assert_eq!(store.next_sibling(a), Some(c), "c is behind a");
    }

    #[test]
    fn unlink_repairs_both_ends() {
        let mut store = NodeStore::new();
        let parent = node(&mut store);
        let a = node(&mut store);
        let b = node(&mut store);
        let c = node(&mut store);
        for n in [a, b, c] {
            store.link_back(parent, n);
        }
        store.unlink(c);
        store.unlink(a);
        assert_eq!(store.children(parent).collect::<Vec<_>>(), vec![b]);
        assert_eq!(
            store.children_back_to_front(parent).collect::<Vec<_>>(),
            vec![b]
        );
        assert_eq!(store.parent(a), None, "a detached");
    }

    #[test]
    fn shift_subtree_moves_descendants() {
        let mut store = NodeStore::new();
        let root = node(&mut store);
        let child = node(&mut store);
        let grandchild = node(&mut store);
        store.link_front(root, child);
        store.link_front(child, grandchild);
        store.shift_subtree(child, 5, -2);
        assert_eq!(store.coords(root), Area::new(0, 0, 9, 9), "root unmoved");
        assert_eq!(store.coords(child), Area::new(5, -2, 14, 7));
        assert_eq!(store.coords(grandchild), Area::new(5, -2, 14, 7));
    }

    #[test]
    fn style_mark_reaches_descendants() {
        let mut store = NodeStore::new();
        let root = node(&mut store);
        let child = node(&mut store);
        let other = node(&mut store);
        store.link_front(root, child);
        store.mark_style(root);
        let drained = store.drain_style();
        assert!(drained.contains(&root), "marked node drained");
        assert!(drained.contains(&child), "descendant drained");
        assert!(!drained.contains(&other), "unrelated node untouched");
        assert!(store.drain_style().is_empty(), "drain consumes marks");
    }

    #[test]
    fn descendant_and_root_queries() {
        let mut store = NodeStore::new();
        let root = node(&mut store);
        let child = node(&mut store);
        let grandchild = node(&mut store);
        store.link_front(root, child);
        store.link_front(child, grandchild);
        assert!(store.is_descendant_of(grandchild, root), "transitive");
        assert!(!store.is_descendant_of(root, child), "not upward");
        assert_eq!(store.root_of(grandchild), root);
    }

    #[test]
    #[should_panic(expected = "cannot free node with children")]
    fn free_with_children_panics() {
        let mut store = NodeStore::new();
        let parent = node(&mut store);
        let child = node(&mut store);
        store.link_front(parent, child);
        let _ = store.free(parent);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn freed_handle_panics_on_coords() {
        let mut store = NodeStore::new();
        let id = node(&mut store);
        let _ = store.free(id);
        let _ = store.coords(id);
    }
}
