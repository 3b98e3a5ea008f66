// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-node draw and signal capability.

use core::any::Any;
use core::fmt;

use crate::area::Area;
use crate::color::Opa;
use crate::painter::Painter;
use crate::style::Style;

use super::id::NodeId;

/// What a draw call is asked to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawMode {
    /// Draw the node itself, before its children.
    Main,
    /// Draw anything that must appear above the children.
    Post,
    /// Draw nothing; report whether the node opaquely covers the mask.
    CoverCheck,
}

/// Notifications the tree sends to a node's widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// A child was added, removed, moved, resized, or hidden.
    ChildChanged,
    /// The node's own coordinates changed; `old` is the previous area.
    CoordsChanged {
        /// Absolute area before the change.
        old: Area,
    },
    /// The node's resolved style changed.
    StyleChanged,
    /// The node is about to be deleted.
    Cleanup,
}

/// Read-only view of a node handed to [`Widget::draw`].
#[derive(Clone, Copy, Debug)]
pub struct NodeView<'a> {
    /// The node being drawn.
    pub id: NodeId,
    /// Absolute screen area.
    pub coords: Area,
    /// Node opacity.
    pub opa: Opa,
    /// Resolved style (inherited or activated as needed).
    pub style: &'a Style,
}

/// Subtype behavior attached to every node.
///
/// Overrides that want the plain rectangle behavior as well call
/// [`draw_base`] explicitly and then add their own drawing.
pub trait Widget: Any + fmt::Debug {
    /// Draws the node, or in [`DrawMode::CoverCheck`] reports whether it
    /// opaquely covers `mask`. The return value is ignored in the other
    /// modes.
    fn draw(
        &self,
        node: &NodeView<'_>,
        painter: &mut dyn Painter,
        mask: &Area,
        mode: DrawMode,
    ) -> bool {
        draw_base(node, painter, mask, mode)
    }

    /// Reacts to a tree notification.
    fn signal(&mut self, signal: &Signal) {
        _ = signal;
    }
}

/// Base node drawing: a styled rectangle.
///
/// A cover check fails for empty bodies. It also fails when the mask
/// reaches into the rounded corners, which are conservatively treated as
/// transparent.
pub fn draw_base(
    node: &NodeView<'_>,
    painter: &mut dyn Painter,
    mask: &Area,
    mode: DrawMode,
) -> bool {
    match mode {
        DrawMode::CoverCheck => {
            let style = node.style;
            if style.body.empty {
                return false;
            }
            let r = style.body.radius;
            let mut inner = node.coords;
            inner.x1 += r;
            inner.x2 -= r;
            if !mask.is_in(&inner) {
                return false;
            }
            let mut inner = node.coords;
            inner.y1 += r;
            inner.y2 -= r;
            mask.is_in(&inner)
        }
        DrawMode::Main => {
            painter.draw_rect(&node.coords, mask, node.style, node.opa);
            true
        }
        DrawMode::Post => true,
    }
}

/// Occupies freed slots. Never drawn.
#[derive(Debug)]
pub(crate) struct Vacant;

impl Widget for Vacant {
    fn draw(&self, _: &NodeView<'_>, _: &mut dyn Painter, _: &Area, _: DrawMode) -> bool {
        false
    }
}
