// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Tessera uses [`understory_dirty`] to defer style-change notifications
//! until the next refresh. Every node has a dependency edge on its parent in
//! the [`STYLE`] channel, so marking a node with
//! [`EagerPolicy`](understory_dirty::EagerPolicy) also marks every
//! descendant: nodes without a style of their own inherit it.
//!
//! [`RenderContext::refresh_styles`](crate::context::RenderContext::refresh_styles)
//! drains the channel, sends [`Signal::StyleChanged`](crate::node::Signal)
//! to each affected node, and invalidates it.

use understory_dirty::Channel;

/// A node's style (or an inherited one) changed.
pub const STYLE: Channel = Channel::new(0);
