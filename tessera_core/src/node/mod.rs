// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Object tree data model.
//!
//! A *node* is a rectangle on a screen. Each node has:
//!
//! - An identity ([`NodeId`]), a generational handle that becomes stale when
//!   the node is deleted so later use panics instead of touching a reused
//!   slot.
//! - Topology: parent, child, and sibling links. Children are ordered by z:
//!   the first child is drawn last, on top of its siblings.
//! - Properties: absolute coordinates, opacity, [`NodeFlags`], an optional
//!   [`StyleRef`](crate::style::StyleRef), and an extra draw margin.
//! - A boxed [`Widget`] carrying subtype data and the draw/signal hooks.
//!
//! Nodes are stored in struct-of-arrays layout. Mutations with visible
//! effects go through [`RenderContext`](crate::context::RenderContext).

mod id;
mod store;
mod traverse;
mod widget;

pub use id::{NO_NODE, NodeId};
pub use store::{NodeFlags, NodeStore};
pub use traverse::{Children, ChildrenBackToFront};
pub use widget::{DrawMode, NodeView, Signal, Widget, draw_base};
