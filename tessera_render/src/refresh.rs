// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The screen refresh driver.
//!
//! One [`Refresher::refresh`] call turns the pending dirty areas of a
//! [`RenderContext`] into display flushes:
//!
//! 1. Dirty areas are joined and taken from the queue.
//! 2. Each area is drawn either straight into a full-screen canvas (direct
//!    mode) or in horizontal strips that fit the draw buffer.
//! 3. For each area or strip, drawing starts at the topmost node that
//!    opaquely covers it, so nodes hidden behind it are never drawn. Younger
//!    siblings of that node and of each of its ancestors are drawn on top,
//!    and ancestors get their post-children pass.
//! 4. The drawn pixels are flushed to the [`Display`].

use alloc::vec::Vec;

use tessera_core::area::{Area, Coord};
use tessera_core::color::{OPA_COVER, OPA_TRANSP};
use tessera_core::config::DisplayConfig;
use tessera_core::context::RenderContext;
use tessera_core::node::{DrawMode, NodeId, NodeView};
use tessera_core::trace::{
    AreaRefreshedEvent, AreasJoinedEvent, RefreshBeginEvent, RefreshEndEvent, Tracer,
};

#[cfg(feature = "trace-rich")]
use tessera_core::trace::StripFlushedEvent;

use crate::canvas::{Canvas, Display};
use crate::damage::DamageRegion;
use crate::image::ImageLoader;
use crate::renderer::Renderer;

/// Drives repaints of a [`RenderContext`] onto a [`Display`].
#[derive(Debug)]
pub struct Refresher {
    canvas: Canvas,
    direct: bool,
    buffer_size: usize,
    frame_index: u64,
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl Refresher {
    /// A refresher for the display described by `config`.
    ///
    /// Direct mode keeps a full-screen canvas between frames. Otherwise a
    /// draw buffer of `config.draw_buffer_size` pixels is reused per strip.
    #[must_use]
    pub fn new(config: &DisplayConfig) -> Self {
        let direct = config.is_direct();
        let area = if direct {
            config.screen_area()
        } else {
            Area::new(0, 0, -1, -1)
        };
        Self {
            canvas: Canvas::new(area, config.color_depth),
            direct,
            buffer_size: config.draw_buffer_size,
            frame_index: 0,
        }
    }

    /// Number of completed refreshes.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// The draw canvas: the full screen in direct mode, else the last strip.
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Repaints every pending dirty area of `ctx`.
    ///
    /// Style changes are propagated first so that they are visible in this
    /// frame. Without an active screen the queue is still drained but nothing
    /// is drawn.
    pub fn refresh(
        &mut self,
        ctx: &mut RenderContext,
        display: &mut dyn Display,
        images: &dyn ImageLoader,
        tracer: &mut Tracer<'_>,
    ) -> DamageRegion {
        let frame_index = self.frame_index;
        self.frame_index += 1;
        ctx.refresh_styles();

        let pending = ctx.invalidation_queue().len();
        tracer.refresh_begin(&RefreshBeginEvent {
            frame_index,
            pending_areas: count(pending),
        });
        let areas = ctx.take_invalid_areas();
        tracer.areas_joined(&AreasJoinedEvent {
            frame_index,
            before: count(pending),
            after: count(areas.len()),
        });

        let ctx: &RenderContext = ctx;
        let mut drawn = Vec::new();
        let mut pixels = 0_u64;
        if let Some(scr) = ctx.active_screen() {
            for area in &areas {
                let mut frame = Frame {
                    ctx,
                    scr,
                    images,
                    tracer: &mut *tracer,
                    frame_index,
                };
                let strips = if self.direct {
                    frame.direct(&mut self.canvas, display, area)
                } else {
                    frame.strips(&mut self.canvas, self.buffer_size, display, area)
                };
                tracer.area_refreshed(&AreaRefreshedEvent {
                    frame_index,
                    area: *area,
                    strips,
                });
                pixels += u64::from(area.size());
                drawn.push(*area);
            }
        }

        tracer.refresh_end(&RefreshEndEvent {
            frame_index,
            areas: count(drawn.len()),
            pixels,
        });
        #[cfg(feature = "trace-rich")]
        tracer.damage_areas(frame_index, &drawn);

        DamageRegion::from_areas(drawn, &ctx.config().screen_area())
    }
}

/// Per-frame drawing state.
struct Frame<'a, 't> {
    ctx: &'a RenderContext,
    scr: NodeId,
    images: &'a dyn ImageLoader,
    tracer: &'a mut Tracer<'t>,
    frame_index: u64,
}

impl Frame<'_, '_> {
    fn direct(&mut self, canvas: &mut Canvas, display: &mut dyn Display, area: &Area) -> u32 {
        self.part(canvas, area);
        display.flush(area, canvas);
        1
    }

    fn strips(
        &mut self,
        canvas: &mut Canvas,
        buffer_size: usize,
        display: &mut dyn Display,
        area: &Area,
    ) -> u32 {
        let width = area.width().unsigned_abs() as usize;
        let height = area.height().unsigned_abs() as usize;
        let rows = (buffer_size / width.max(1)).clamp(1, height.max(1));
        let rows = Coord::try_from(rows).unwrap_or(Coord::MAX);

        let mut strips = 0;
        let mut y = area.y1;
        while y <= area.y2 {
            let strip = Area::new(area.x1, y, area.x2, (y + rows - 1).min(area.y2));
            canvas.retarget(strip);
            self.part(canvas, &strip);
            display.flush(&strip, canvas);
            strips += 1;
            y = strip.y2 + 1;
        }
        strips
    }

    /// Draws everything visible in `mask` into `canvas`.
    fn part(&mut self, canvas: &mut Canvas, mask: &Area) {
        let ctx = self.ctx;
        let placeholder = &*ctx.styles().plain;
        let mut r = Renderer::new(canvas, self.images, placeholder, self.tracer, self.frame_index);
        let top = top_node(ctx, &mut r, mask, self.scr).unwrap_or(self.scr);
        draw_from(ctx, &mut r, top, mask);
        #[cfg(feature = "trace-rich")]
        self.tracer.strip_flushed(&StripFlushedEvent {
            frame_index: self.frame_index,
            strip: *mask,
            top_node: top.index(),
        });
    }
}

/// The frontmost node that opaquely covers `area`, searching below `id`.
fn top_node(
    ctx: &RenderContext,
    r: &mut Renderer<'_, '_>,
    area: &Area,
    id: NodeId,
) -> Option<NodeId> {
    let store = ctx.store();
    if store.flags(id).hidden || !area.is_in(&store.coords(id)) {
        return None;
    }
    if let Some(found) = store.children(id).find_map(|child| top_node(ctx, r, area, child)) {
        return Some(found);
    }
    if store.opa(id) != OPA_COVER {
        return None;
    }
    draw_node(ctx, r, id, area, DrawMode::CoverCheck).then_some(id)
}

/// Draws `top` and everything in front of it.
fn draw_from(ctx: &RenderContext, r: &mut Renderer<'_, '_>, top: NodeId, mask: &Area) {
    let store = ctx.store();
    draw_subtree(ctx, r, top, mask);
    let mut border = top;
    while let Some(parent) = store.parent(border) {
        let mut younger = store.prev_sibling(border);
        while let Some(sib) = younger {
            draw_subtree(ctx, r, sib, mask);
            younger = store.prev_sibling(sib);
        }
        draw_node(ctx, r, parent, mask, DrawMode::Post);
        border = parent;
    }
}

fn draw_subtree(ctx: &RenderContext, r: &mut Renderer<'_, '_>, id: NodeId, mask: &Area) {
    let store = ctx.store();
    if store.flags(id).hidden {
        return;
    }
    let coords = store.coords(id);
    let Some(ext_mask) = mask.intersect(&coords.expand(store.ext_size(id))) else {
        return;
    };
    let visible = store.opa(id) != OPA_TRANSP;
    if visible {
        draw_node(ctx, r, id, &ext_mask, DrawMode::Main);
    }
    if let Some(inner) = mask.intersect(&coords) {
        for child in store.children_back_to_front(id) {
            let child_area = store.coords(child).expand(store.ext_size(child));
            if let Some(child_mask) = inner.intersect(&child_area) {
                draw_subtree(ctx, r, child, &child_mask);
            }
        }
    }
    if visible {
        draw_node(ctx, r, id, &ext_mask, DrawMode::Post);
    }
}

fn draw_node(
    ctx: &RenderContext,
    r: &mut Renderer<'_, '_>,
    id: NodeId,
    mask: &Area,
    mode: DrawMode,
) -> bool {
    let store = ctx.store();
    let style = ctx.draw_style(id);
    let view = NodeView {
        id,
        coords: store.coords(id),
        opa: store.opa(id),
        style: &style,
    };
    #[cfg(feature = "trace-rich")]
    r.node_drawn(id, mode);
    store.widget(id).draw(&view, r, mask, mode)
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;
    use crate::canvas::FrameBuffer;
    use crate::image::MemoryLoader;
    use tessera_core::color::{Color, ColorDepth};
    use tessera_core::node::{Widget, draw_base};
    use tessera_core::painter::Painter;
    use tessera_core::style::StyleRef;

    type Log = Rc<RefCell<Vec<(&'static str, DrawMode)>>>;

    #[derive(Debug)]
    struct Spy {
        name: &'static str,
        log: Log,
    }

    impl Widget for Spy {
        fn draw(
            &self,
            node: &NodeView<'_>,
            painter: &mut dyn Painter,
            mask: &Area,
            mode: DrawMode,
        ) -> bool {
            self.log.borrow_mut().push((self.name, mode));
            draw_base(node, painter, mask, mode)
        }
    }

    fn config(draw_buffer_size: usize) -> DisplayConfig {
        DisplayConfig {
            draw_buffer_size,
            ..DisplayConfig::new(40, 30)
        }
    }

    struct Harness {
        ctx: RenderContext,
        refresher: Refresher,
        fb: FrameBuffer,
        log: Log,
    }

    impl Harness {
        fn new(draw_buffer_size: usize) -> Self {
            let config = config(draw_buffer_size);
            Self {
                ctx: RenderContext::new(config, None),
                refresher: Refresher::new(&config),
                fb: FrameBuffer::new(config.screen_area(), config.color_depth),
                log: Log::default(),
            }
        }

        fn spy(&mut self, parent: NodeId, name: &'static str, area: Area) -> NodeId {
            let widget = Spy {
                name,
                log: self.log.clone(),
            };
            let id = self.ctx.create(Some(parent), None, Box::new(widget));
            let origin = self.ctx.store().coords(parent).origin();
            self.ctx.set_pos(id, area.x1 - origin.x, area.y1 - origin.y);
            self.ctx.set_size(id, area.width(), area.height());
            id
        }

        fn refresh(&mut self) -> DamageRegion {
            let loader = MemoryLoader::new();
            self.refresher
                .refresh(&mut self.ctx, &mut self.fb, &loader, &mut Tracer::none())
        }

        fn take_log(&self) -> Vec<(&'static str, DrawMode)> {
            core::mem::take(&mut *self.log.borrow_mut())
        }

        fn scr(&self) -> NodeId {
            self.ctx.active_screen().unwrap()
        }
    }

    fn blue_box(h: &mut Harness, area: Area) -> NodeId {
        let scr = h.scr();
        let id = h.spy(scr, "box", area);
        let style: StyleRef = h.ctx.styles().plain_color.clone().into();
        h.ctx.set_style(id, Some(style));
        id
    }

    #[test]
    fn direct_mode_paints_the_frame_buffer() {
        let mut h = Harness::new(0);
        let b = blue_box(&mut h, Area::new(5, 5, 14, 14));
        assert_eq!(h.refresh(), DamageRegion::Full);

        let color = h.ctx.styles().plain_color.body.main_color;
        let white = h.ctx.styles().scr.body.main_color;
        assert_eq!(h.fb.pixels().pixel(7, 7), Some(color));
        assert_eq!(h.fb.pixels().pixel(0, 0), Some(white));
        assert_eq!(h.fb.flush_count(), 1);

        assert!(h.refresh().is_empty(), "nothing pending");
        h.ctx.set_hidden(b, true);
        assert_eq!(
            h.refresh(),
            DamageRegion::Areas(vec![Area::new(5, 5, 14, 14)])
        );
        assert_eq!(h.fb.pixels().pixel(7, 7), Some(white), "hidden box erased");
        assert_eq!(h.refresher.frame_index(), 3);
    }

    #[test]
    fn draw_buffer_splits_into_strips_with_the_same_result() {
        let mut direct = Harness::new(0);
        let mut strips = Harness::new(40 * 8);
        for h in [&mut direct, &mut strips] {
            blue_box(h, Area::new(3, 6, 30, 27));
            h.refresh();
        }
        assert_eq!(strips.fb.flush_count(), 4, "30 rows in strips of 8");
        for y in 0..30 {
            assert_eq!(direct.fb.pixels().row(y), strips.fb.pixels().row(y), "row {y}");
        }
    }

    #[test]
    fn covered_nodes_are_not_drawn() {
        let mut h = Harness::new(0);
        let scr = h.scr();
        h.spy(scr, "back", Area::new(0, 0, 19, 19));
        let front = h.spy(scr, "front", Area::new(0, 0, 19, 19));
        h.refresh();
        h.take_log();

        h.ctx.invalidate(front);
        h.refresh();
        let log = h.take_log();
        assert!(log.iter().all(|(n, _)| *n == "front"), "{log:?}");
        assert_eq!(
            log,
            [
                ("front", DrawMode::CoverCheck),
                ("front", DrawMode::Main),
                ("front", DrawMode::Post),
            ]
        );
    }

    #[test]
    fn hidden_nodes_are_skipped() {
        let mut h = Harness::new(0);
        let scr = h.scr();
        h.spy(scr, "back", Area::new(0, 0, 19, 19));
        let front = h.spy(scr, "front", Area::new(0, 0, 19, 19));
        h.refresh();
        h.take_log();

        h.ctx.set_hidden(front, true);
        h.refresh();
        let log = h.take_log();
        assert!(log.iter().all(|(n, _)| *n == "back"), "{log:?}");
        assert!(log.contains(&("back", DrawMode::Main)));
    }

    #[test]
    fn post_pass_follows_children() {
        let mut h = Harness::new(0);
        let scr = h.scr();
        let parent = h.spy(scr, "parent", Area::new(2, 2, 21, 21));
        h.spy(parent, "child", Area::new(4, 4, 9, 9));
        h.refresh();
        assert_eq!(
            h.take_log(),
            [
                ("parent", DrawMode::Main),
                ("child", DrawMode::Main),
                ("child", DrawMode::Post),
                ("parent", DrawMode::Post),
            ]
        );
    }

    #[test]
    fn younger_siblings_are_drawn_over_the_top_node() {
        let mut h = Harness::new(0);
        let scr = h.scr();
        let back = h.spy(scr, "back", Area::new(0, 0, 29, 29));
        h.spy(scr, "small", Area::new(25, 25, 35, 29));
        h.refresh();
        h.take_log();

        h.ctx.invalidate(back);
        h.refresh();
        let log = h.take_log();
        let main: Vec<_> = log
            .iter()
            .filter(|(_, m)| *m == DrawMode::Main)
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(main, ["back", "small"]);
    }

    #[test]
    fn no_active_screen_draws_nothing() {
        let mut h = Harness::new(0);
        let scr = h.scr();
        h.ctx.delete(scr);
        assert!(h.refresh().is_empty());
        assert_eq!(h.fb.flush_count(), 0);
        assert_eq!(h.fb.pixels().pixel(0, 0), Some(Color::black(ColorDepth::Rgb565)));
    }
}
