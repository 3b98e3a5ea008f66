// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render context: screens, the object tree, and invalidation.
//!
//! [`RenderContext`] owns everything that would otherwise be global state:
//! the node store, the built-in styles, the pending dirty areas, the active
//! screen, and the focused node. Every mutation with a visible effect follows
//! the same sequence: invalidate the old area, mutate, notify, invalidate the
//! new area.
//!
//! Invalidation only records areas. Pixels change when a refresh driver
//! (see `tessera_render::Refresher`) drains the queue.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use crate::area::{Area, Coord};
use crate::color::Opa;
use crate::config::DisplayConfig;
use crate::font::FontRef;
use crate::invalidate::InvalidationQueue;
use crate::node::{Children, NodeFlags, NodeId, NodeStore, Signal, Widget};
use crate::style::{BuiltinStyles, Style, StyleRef, activated_style};

/// Placement of a node relative to a base node.
///
/// `In*` variants place the node inside the base, `Out*` variants place it
/// just outside the named edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Align {
    /// Centered on the base.
    Center,
    /// Inside, top left corner.
    InTopLeft,
    /// Inside, top edge, centered.
    InTopMid,
    /// Inside, top right corner.
    InTopRight,
    /// Inside, bottom left corner.
    InBottomLeft,
    /// Inside, bottom edge, centered.
    InBottomMid,
    /// Inside, bottom right corner.
    InBottomRight,
    /// Inside, left edge, centered.
    InLeftMid,
    /// Inside, right edge, centered.
    InRightMid,
    /// Above, left aligned.
    OutTopLeft,
    /// Above, centered.
    OutTopMid,
    /// Above, right aligned.
    OutTopRight,
    /// Below, left aligned.
    OutBottomLeft,
    /// Below, centered.
    OutBottomMid,
    /// Below, right aligned.
    OutBottomRight,
    /// Left of the base, top aligned.
    OutLeftTop,
    /// Left of the base, centered.
    OutLeftMid,
    /// Left of the base, bottom aligned.
    OutLeftBottom,
    /// Right of the base, top aligned.
    OutRightTop,
    /// Right of the base, centered.
    OutRightMid,
    /// Right of the base, bottom aligned.
    OutRightBottom,
}

impl Align {
    /// Offset of a `w` x `h` node from the top-left corner of a `bw` x `bh`
    /// base.
    #[must_use]
    pub fn offset(self, bw: Coord, bh: Coord, w: Coord, h: Coord) -> (Coord, Coord) {
        let mid_x = bw / 2 - w / 2;
        let mid_y = bh / 2 - h / 2;
        match self {
            Self::Center => (mid_x, mid_y),
            Self::InTopLeft => (0, 0),
            Self::InTopMid => (mid_x, 0),
            Self::InTopRight => (bw - w, 0),
            Self::InBottomLeft => (0, bh - h),
            Self::InBottomMid => (mid_x, bh - h),
            Self::InBottomRight => (bw - w, bh - h),
            Self::InLeftMid => (0, mid_y),
            Self::InRightMid => (bw - w, mid_y),
            Self::OutTopLeft => (0, -h),
            Self::OutTopMid => (mid_x, -h),
            Self::OutTopRight => (bw - w, -h),
            Self::OutBottomLeft => (0, bh),
            Self::OutBottomMid => (mid_x, bh),
            Self::OutBottomRight => (bw - w, bh),
            Self::OutLeftTop => (-w, 0),
            Self::OutLeftMid => (-w, mid_y),
            Self::OutLeftBottom => (-w, bh - h),
            Self::OutRightTop => (bw, 0),
            Self::OutRightMid => (bw, mid_y),
            Self::OutRightBottom => (bw, bh - h),
        }
    }
}

/// Owner of the object tree and its invalidation state.
#[derive(Debug)]
pub struct RenderContext {
    config: DisplayConfig,
    store: NodeStore,
    styles: BuiltinStyles,
    queue: InvalidationQueue,
    screens: Vec<NodeId>,
    active: Option<NodeId>,
    focused: Option<NodeId>,
    style_roots: Vec<NodeId>,
}

impl RenderContext {
    /// Creates a context with one empty screen, already loaded.
    #[must_use]
    pub fn new(config: DisplayConfig, font: Option<FontRef>) -> Self {
        let styles = BuiltinStyles::new(config.color_depth, config.dpi, font);
        let mut ctx = Self {
            queue: InvalidationQueue::new(config.screen_area(), config.inval_queue_len),
            config,
            store: NodeStore::new(),
            styles,
            screens: Vec::new(),
            active: None,
            focused: None,
            style_roots: Vec::new(),
        };
        let scr = ctx.create(None, None, Box::new(crate::widgets::Plain));
        ctx.load_screen(scr);
        ctx
    }

    /// Display configuration.
    #[must_use]
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Built-in style presets.
    #[must_use]
    pub fn styles(&self) -> &BuiltinStyles {
        &self.styles
    }

    /// Read access to the node store.
    #[must_use]
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    // -- Lifecycle --

    /// Creates a node.
    ///
    /// With no parent the node becomes a new, inactive screen covering the
    /// display. Otherwise it becomes the topmost child of `parent`, placed at
    /// the parent's origin with a default size and the plain style. When
    /// `copy` is given, the new node takes its size, relative position,
    /// flags, opacity, and style.
    pub fn create(
        &mut self,
        parent: Option<NodeId>,
        copy: Option<NodeId>,
        widget: Box<dyn Widget>,
    ) -> NodeId {
        let Some(parent) = parent else {
            let scr_style = StyleRef::Shared(self.styles.scr.clone());
            let id = self
                .store
                .alloc(self.config.screen_area(), Some(scr_style), widget);
            self.screens.insert(0, id);
            return id;
        };

        let origin = self.store.coords(parent).origin();
        let dpi = self.config.dpi;
        let area = Area::from_origin_size(origin.x, origin.y, dpi, dpi * 2 / 3);
        let plain = StyleRef::Shared(self.styles.plain.clone());
        let id = self.store.alloc(area, Some(plain), widget);
        self.store.link_front(parent, id);
        self.store.flags_mut(id).click = true;

        if let Some(src) = copy {
            let src_area = self.store.coords(src);
            let mut a = self.store.coords(id);
            a.set_width(src_area.width());
            a.set_height(src_area.height());
            self.store.set_coords(id, a);
            self.store.set_ext_size(id, self.store.ext_size(src));
            self.store.set_opa(id, self.store.opa(src));
            *self.store.flags_mut(id) = self.store.flags(src);
            *self.store.style_mut(id) = self.store.style(src).cloned();
            let (x, y) = self.relative_pos(src);
            self.set_pos(id, x, y);
        }

        self.send_signal(parent, &Signal::ChildChanged);
        self.invalidate(id);
        id
    }

    /// Deletes a node and its whole subtree.
    ///
    /// Each deleted node receives [`Signal::Cleanup`] before it is freed and
    /// the parent receives [`Signal::ChildChanged`] afterwards. Handles to
    /// deleted nodes become stale.
    pub fn delete(&mut self, id: NodeId) {
        self.invalidate(id);
        let parent = self.store.parent(id);
        self.delete_subtree(id);
        match parent {
            Some(p) => self.send_signal(p, &Signal::ChildChanged),
            None => {
                self.screens.retain(|&s| s != id);
                if self.active == Some(id) {
                    self.active = None;
                }
            }
        }
    }

    fn delete_subtree(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.store.children(id).collect();
        for child in children {
            self.delete_subtree(child);
        }
        if self.store.parent(id).is_some() {
            self.store.unlink(id);
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.style_roots.retain(|&r| r != id);
        self.send_signal(id, &Signal::Cleanup);
        drop(self.store.free(id));
    }

    /// Whether `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.store.is_alive(id)
    }

    // -- Screens --

    /// All screens, newest first.
    #[must_use]
    pub fn screens(&self) -> &[NodeId] {
        &self.screens
    }

    /// The screen currently shown, if any.
    #[must_use]
    pub fn active_screen(&self) -> Option<NodeId> {
        self.active
    }

    /// Shows `scr` and schedules a full repaint.
    ///
    /// # Panics
    ///
    /// Panics if `scr` is not a screen.
    pub fn load_screen(&mut self, scr: NodeId) {
        assert!(
            self.store.parent(scr).is_none(),
            "only parentless nodes can be loaded as screens"
        );
        self.active = Some(scr);
        self.invalidate(scr);
    }

    /// The screen a node belongs to.
    #[must_use]
    pub fn screen_of(&self, id: NodeId) -> NodeId {
        self.store.root_of(id)
    }

    // -- Invalidation --

    /// Registers a screen area for repaint.
    pub fn invalidate_area(&mut self, area: &Area) {
        self.queue.push(area);
    }

    /// Registers the visible part of a node for repaint.
    ///
    /// Nodes off the active screen and hidden subtrees are ignored. The
    /// node's area, grown by its extra draw margin, is clipped against every
    /// ancestor; if some ancestor clips it away entirely nothing is
    /// registered.
    pub fn invalidate(&mut self, id: NodeId) {
        if self.active != Some(self.screen_of(id)) || self.store.flags(id).hidden {
            return;
        }
        let mut area = self.store.coords(id).expand(self.store.ext_size(id));
        let mut cur = self.store.parent(id);
        while let Some(p) = cur {
            if self.store.flags(p).hidden {
                return;
            }
            match area.intersect(&self.store.coords(p)) {
                Some(a) => area = a,
                None => return,
            }
            cur = self.store.parent(p);
        }
        self.queue.push(&area);
    }

    /// Pending dirty areas.
    #[must_use]
    pub fn invalidation_queue(&self) -> &InvalidationQueue {
        &self.queue
    }

    /// Joins the pending dirty areas and removes them from the queue.
    pub fn take_invalid_areas(&mut self) -> Vec<Area> {
        self.queue.take_joined()
    }

    /// Sends a signal to a node's widget.
    pub fn send_signal(&mut self, id: NodeId, signal: &Signal) {
        self.store.widget_mut(id).signal(signal);
    }

    // -- Geometry --

    /// Absolute screen area.
    #[must_use]
    pub fn coords(&self, id: NodeId) -> Area {
        self.store.coords(id)
    }

    fn relative_pos(&self, id: NodeId) -> (Coord, Coord) {
        let a = self.store.coords(id);
        match self.store.parent(id) {
            Some(p) => {
                let o = self.store.coords(p).origin();
                (a.x1 - o.x, a.y1 - o.y)
            }
            None => (a.x1, a.y1),
        }
    }

    /// Horizontal position relative to the parent.
    #[must_use]
    pub fn x(&self, id: NodeId) -> Coord {
        self.relative_pos(id).0
    }

    /// Vertical position relative to the parent.
    #[must_use]
    pub fn y(&self, id: NodeId) -> Coord {
        self.relative_pos(id).1
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self, id: NodeId) -> Coord {
        self.store.coords(id).width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self, id: NodeId) -> Coord {
        self.store.coords(id).height()
    }

    /// Moves a node to `(x, y)` relative to its parent, carrying its subtree.
    ///
    /// Does nothing if the position is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the node is a screen.
    pub fn set_pos(&mut self, id: NodeId, x: Coord, y: Coord) {
        let parent = self
            .store
            .parent(id)
            .unwrap_or_else(|| panic!("cannot position screen {id:?}"));
        let origin = self.store.coords(parent).origin();
        let old = self.store.coords(id);
        let dx = origin.x + x - old.x1;
        let dy = origin.y + y - old.y1;
        if dx == 0 && dy == 0 {
            return;
        }

        self.invalidate(id);
        self.store.shift_subtree(id, dx, dy);
        self.send_signal(id, &Signal::CoordsChanged { old });
        self.send_signal(parent, &Signal::ChildChanged);
        self.invalidate(id);
    }

    /// Sets the horizontal position relative to the parent.
    pub fn set_x(&mut self, id: NodeId, x: Coord) {
        let y = self.y(id);
        self.set_pos(id, x, y);
    }

    /// Sets the vertical position relative to the parent.
    pub fn set_y(&mut self, id: NodeId, y: Coord) {
        let x = self.x(id);
        self.set_pos(id, x, y);
    }

    /// Resizes a node, keeping its top-left corner.
    ///
    /// Does nothing if the size is unchanged.
    pub fn set_size(&mut self, id: NodeId, w: Coord, h: Coord) {
        let old = self.store.coords(id);
        if old.width() == w && old.height() == h {
            return;
        }

        self.invalidate(id);
        let mut a = old;
        a.set_width(w);
        a.set_height(h);
        self.store.set_coords(id, a);
        self.send_signal(id, &Signal::CoordsChanged { old });
        if let Some(p) = self.store.parent(id) {
            self.send_signal(p, &Signal::ChildChanged);
        }
        self.invalidate(id);
    }

    /// Sets the width, keeping the height.
    pub fn set_width(&mut self, id: NodeId, w: Coord) {
        let h = self.height(id);
        self.set_size(id, w, h);
    }

    /// Sets the height, keeping the width.
    pub fn set_height(&mut self, id: NodeId, h: Coord) {
        let w = self.width(id);
        self.set_size(id, w, h);
    }

    /// Positions a node relative to `base` (its parent when `None`), then
    /// shifts it by `(dx, dy)`.
    ///
    /// # Panics
    ///
    /// Panics if the node is a screen.
    pub fn align(&mut self, id: NodeId, base: Option<NodeId>, align: Align, dx: Coord, dy: Coord) {
        let parent = self
            .store
            .parent(id)
            .unwrap_or_else(|| panic!("cannot align screen {id:?}"));
        let base = base.unwrap_or(parent);
        let b = self.store.coords(base);
        let a = self.store.coords(id);
        let (ox, oy) = align.offset(b.width(), b.height(), a.width(), a.height());
        let p = self.store.coords(parent).origin();
        self.set_pos(id, ox + dx + b.x1 - p.x, oy + dy + b.y1 - p.y);
    }

    /// Moves a node under a new parent, keeping its relative position.
    ///
    /// # Panics
    ///
    /// Panics if the node is a screen or `parent` lies inside its subtree.
    pub fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        let old_parent = self
            .store
            .parent(id)
            .unwrap_or_else(|| panic!("cannot re-parent screen {id:?}"));
        assert!(
            !self.store.is_descendant_of(parent, id),
            "cannot move {id:?} into its own subtree"
        );

        self.invalidate(id);
        let (x, y) = self.relative_pos(id);
        self.store.unlink(id);
        self.store.link_front(parent, id);
        self.set_pos(id, x, y);
        self.mark_style(id);
        self.send_signal(old_parent, &Signal::ChildChanged);
        self.send_signal(parent, &Signal::ChildChanged);
        self.invalidate(id);
    }

    /// Iterates a node's children, topmost first.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.store.children(id)
    }

    /// The node's parent, `None` for screens.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.store.parent(id)
    }

    /// Brings a node in front of its siblings.
    pub fn move_foreground(&mut self, id: NodeId) {
        let Some(parent) = self.store.parent(id) else {
            return;
        };
        self.store.unlink(id);
        self.store.link_front(parent, id);
        self.send_signal(parent, &Signal::ChildChanged);
        self.invalidate(id);
    }

    /// Sends a node behind its siblings.
    pub fn move_background(&mut self, id: NodeId) {
        let Some(parent) = self.store.parent(id) else {
            return;
        };
        self.store.unlink(id);
        self.store.link_back(parent, id);
        self.send_signal(parent, &Signal::ChildChanged);
        self.invalidate(id);
    }

    /// Sets the extra margin drawn (and invalidated) outside the node.
    pub fn set_ext_size(&mut self, id: NodeId, ext: Coord) {
        self.store.set_ext_size(id, ext);
        self.invalidate(id);
    }

    // -- Appearance --

    /// Node opacity.
    #[must_use]
    pub fn opa(&self, id: NodeId) -> Opa {
        self.store.opa(id)
    }

    /// Sets the node opacity.
    pub fn set_opa(&mut self, id: NodeId, opa: Opa) {
        self.store.set_opa(id, opa);
        self.invalidate(id);
    }

    /// Node flags.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.store.flags(id)
    }

    /// Hides or shows a node and its subtree.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        // Hidden nodes never invalidate, so cover both the old and new state.
        self.invalidate(id);
        self.store.flags_mut(id).hidden = hidden;
        self.invalidate(id);
        if let Some(p) = self.store.parent(id) {
            self.send_signal(p, &Signal::ChildChanged);
        }
    }

    /// Enables or disables click handling.
    pub fn set_click(&mut self, id: NodeId, en: bool) {
        self.store.flags_mut(id).click = en;
    }

    /// Enables or disables dragging.
    pub fn set_drag(&mut self, id: NodeId, en: bool) {
        self.store.flags_mut(id).drag = en;
    }

    /// Enables or disables moving to the foreground on click.
    pub fn set_top(&mut self, id: NodeId, en: bool) {
        self.store.flags_mut(id).top = en;
    }

    /// Gives a node a style, or makes it inherit with `None`.
    ///
    /// A previously isolated copy is dropped. Descendants that inherit are
    /// notified on the next [`refresh_styles`](Self::refresh_styles).
    pub fn set_style(&mut self, id: NodeId, style: Option<StyleRef>) {
        self.invalidate(id);
        *self.store.style_mut(id) = style;
        self.mark_style(id);
    }

    /// Returns the node's own style for mutation, copying it first.
    ///
    /// A shared style is copied into node-owned storage; a node without a
    /// style gets a copy of the style it currently inherits. If the style is
    /// already isolated it is returned unchanged.
    pub fn iso_style(&mut self, id: NodeId) -> &mut Style {
        if self.store.style(id).is_none() {
            let inherited = self.style(id).clone();
            *self.store.style_mut(id) = Some(StyleRef::Owned(Box::new(inherited)));
        }
        self.mark_style(id);
        match self.store.style_mut(id) {
            Some(s) => s.isolate(),
            None => unreachable!("style was set above"),
        }
    }

    /// Schedules a style-change notification for a node and the descendants
    /// inheriting from it.
    pub fn refresh_style(&mut self, id: NodeId) {
        self.mark_style(id);
    }

    fn mark_style(&mut self, id: NodeId) {
        self.store.mark_style(id);
        if !self.style_roots.contains(&id) {
            self.style_roots.push(id);
        }
    }

    /// Delivers pending style changes.
    ///
    /// Every node whose resolved style may have changed is invalidated, sent
    /// [`Signal::StyleChanged`], and invalidated again. Returns how many
    /// nodes were notified.
    pub fn refresh_styles(&mut self) -> usize {
        let roots = core::mem::take(&mut self.style_roots);
        let affected = self.store.drain_style();
        let mut n = 0;
        for id in affected {
            if !roots.contains(&id) && self.store.style(id).is_some() {
                continue;
            }
            self.invalidate(id);
            self.send_signal(id, &Signal::StyleChanged);
            self.invalidate(id);
            n += 1;
        }
        n
    }

    /// The node's own style, if any.
    #[must_use]
    pub fn style_ref(&self, id: NodeId) -> Option<&StyleRef> {
        self.store.style(id)
    }

    /// The style a node draws with.
    ///
    /// A node without a style inherits from the nearest ancestor whose style
    /// is not glass, falling back to the screen preset.
    #[must_use]
    pub fn style(&self, id: NodeId) -> &Style {
        if let Some(s) = self.store.style(id) {
            return s.get();
        }
        let mut cur = self.store.parent(id);
        while let Some(p) = cur {
            if let Some(s) = self.store.style(p) {
                if !s.get().glass {
                    return s.get();
                }
            }
            cur = self.store.parent(p);
        }
        &self.styles.scr
    }

    /// The style used to draw `id` this frame, highlighted if focused.
    #[must_use]
    pub fn draw_style(&self, id: NodeId) -> Cow<'_, Style> {
        let base = self.style(id);
        if self.focused == Some(id) {
            Cow::Owned(activated_style(base))
        } else {
            Cow::Borrowed(base)
        }
    }

    /// The focused node, if any.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Moves the focus highlight.
    pub fn set_focused(&mut self, id: Option<NodeId>) {
        if self.focused == id {
            return;
        }
        if let Some(old) = self.focused {
            self.invalidate(old);
        }
        self.focused = id;
        if let Some(new) = id {
            self.invalidate(new);
        }
    }

    // -- Widget data --

    /// Downcasts a node's widget.
    #[must_use]
    pub fn widget<W: Widget>(&self, id: NodeId) -> Option<&W> {
        let w: &dyn Any = self.store.widget(id);
        w.downcast_ref()
    }

    /// Mutates a node's widget and schedules a repaint.
    ///
    /// Returns `None` without invalidating if the widget is not a `W`.
    pub fn update_widget<W: Widget, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut W) -> R,
    ) -> Option<R> {
        let w: &mut dyn Any = self.store.widget_mut(id);
        let w = w.downcast_mut::<W>()?;
        let r = f(w);
        self.invalidate(id);
        Some(r)
    }
}
