// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Object tree, styles, and invalidation for an embedded GUI renderer.
//!
//! `tessera_core` holds everything a retained-mode GUI needs before pixels
//! are produced: screen geometry, packed colors, fonts, styles, and a tree of
//! rectangular nodes that records which screen areas became dirty. It is
//! `no_std` compatible (with `alloc`). Nodes live in struct-of-arrays
//! storage behind generational handles.
//!
//! # Architecture
//!
//! ```text
//!   application
//!       │  create / set_pos / set_style / delete ...
//!       ▼
//!   RenderContext ──► NodeStore (topology, coords, styles, widgets)
//!       │
//!       │  invalidate(): clip to ancestors, then queue
//!       ▼
//!   InvalidationQueue ──► take_invalid_areas() ──► refresh driver
//!                                                    │
//!                                 Widget::draw(&mut dyn Painter)
//! ```
//!
//! **[`context`]**: [`RenderContext`](context::RenderContext) wraps every
//! mutation with the invalidate, mutate, notify, invalidate sequence.
//!
//! **[`node`]**: Struct-of-arrays node tree with generational handles, plus
//! the [`Widget`](node::Widget) trait carrying draw and signal hooks.
//!
//! **[`style`]**: Style values, shared presets, and copy-on-write isolation.
//! Style changes propagate to inheriting descendants through [`dirty`].
//!
//! **[`invalidate`]**: The bounded queue of dirty areas and its join step.
//!
//! **[`painter`]**: The four draw primitives widgets issue. The software
//! rasterizer lives in `tessera_render`.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! refresh instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-strip,
//!   per-node, and damage-area events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod area;
pub mod color;
pub mod config;
pub mod context;
pub mod dirty;
pub mod font;
pub mod invalidate;
pub mod node;
pub mod painter;
pub mod style;
pub mod trace;
pub mod widgets;
