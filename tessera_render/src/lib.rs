// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Software rasterizer and screen refresh driver for tessera.
//!
//! This crate turns the dirty areas recorded by a
//! [`RenderContext`](tessera_core::context::RenderContext) into pixels:
//!
//! - [`Refresher`]: joins dirty areas, culls nodes hidden behind opaque
//!   ones, and draws either straight into a full-screen canvas or in strips
//!   that fit a small draw buffer
//! - [`Renderer`]: the [`Painter`](tessera_core::painter::Painter) that
//!   rasterizes widget draw requests into a [`Canvas`]
//! - [`draw_rect`], [`draw_label`], [`draw_line`] and [`image::draw_image`]:
//!   the clipped primitives behind it
//! - [`Display`]: the flush target, with [`FrameBuffer`] as an in-memory
//!   implementation
//! - [`DamageRegion`]: what one refresh pushed to the display
//!
//! # Crate features
//!
//! - `std` (disabled by default): Adds [`image::FsLoader`] for image files
//!   on disk.
//! - `trace` / `trace-rich` (disabled by default): Forwarded to
//!   `tessera_core`; `trace-rich` also emits per-strip and per-node events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod canvas;
mod circle;
mod damage;
pub mod image;
mod line;
pub mod raster;
mod rect;
mod refresh;
mod renderer;
pub mod text;

pub use canvas::{Canvas, Display, FrameBuffer};
pub use damage::DamageRegion;
pub use line::draw_line;
pub use rect::{draw_rect, radius_correct};
pub use refresh::Refresher;
pub use renderer::Renderer;
pub use text::draw_label;
