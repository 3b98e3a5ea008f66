// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use tessera_core::area::Area;
use tessera_core::node::DrawMode;
use tessera_core::trace::{
    AreaRefreshedEvent, AreasJoinedEvent, FallbackReason, ImageFallbackEvent, NodeDrawnEvent,
    RefreshBeginEvent, RefreshEndEvent, StripFlushedEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    nodes: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            nodes: false,
        }
    }

    /// Also prints one line per node draw call. Off by default.
    #[must_use]
    pub fn with_node_draws(mut self, enabled: bool) -> Self {
        self.nodes = enabled;
        self
    }

    /// Consumes the sink and returns the destination.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

struct Rect(Area);

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let a = &self.0;
        write!(f, "({},{})..({},{})", a.x1, a.y1, a.x2, a.y2)
    }
}

fn mode_name(mode: DrawMode) -> &'static str {
    match mode {
        DrawMode::Main => "main",
        DrawMode::Post => "post",
        DrawMode::CoverCheck => "cover",
    }
}

fn reason_name(reason: FallbackReason) -> &'static str {
    match reason {
        FallbackReason::NoSource => "no source",
        FallbackReason::LoadFailed => "load failed",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_refresh_begin(&mut self, e: &RefreshBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[refresh:begin] frame={} pending={}",
            e.frame_index, e.pending_areas,
        );
    }

    fn on_areas_joined(&mut self, e: &AreasJoinedEvent) {
        let _ = writeln!(
            self.writer,
            "[join] frame={} {} -> {}",
            e.frame_index, e.before, e.after,
        );
    }

    fn on_area_refreshed(&mut self, e: &AreaRefreshedEvent) {
        let _ = writeln!(
            self.writer,
            "[area] frame={} {} strips={}",
            e.frame_index,
            Rect(e.area),
            e.strips,
        );
    }

    fn on_refresh_end(&mut self, e: &RefreshEndEvent) {
        let _ = writeln!(
            self.writer,
            "[refresh:end] frame={} areas={} pixels={}",
            e.frame_index, e.areas, e.pixels,
        );
    }

    fn on_image_fallback(&mut self, e: &ImageFallbackEvent) {
        let _ = writeln!(
            self.writer,
            "[image] frame={} {} placeholder: {}",
            e.frame_index,
            Rect(e.area),
            reason_name(e.reason),
        );
    }

    fn on_strip_flushed(&mut self, e: &StripFlushedEvent) {
        let _ = writeln!(
            self.writer,
            "[strip] frame={} {} top=#{}",
            e.frame_index,
            Rect(e.strip),
            e.top_node,
        );
    }

    fn on_node_drawn(&mut self, e: &NodeDrawnEvent) {
        if !self.nodes {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[node] frame={} #{} {}",
            e.frame_index,
            e.node_index,
            mode_name(e.mode),
        );
    }

    fn on_damage_areas(&mut self, frame_index: u64, areas: &[Area]) {
        let _ = writeln!(
            self.writer,
            "[damage] frame={frame_index} areas={}",
            areas.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_print_area() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_area_refreshed(&AreaRefreshedEvent {
            frame_index: 1,
            area: Area::new(0, 0, 99, 49),
            strips: 3,
        });
        let output = String::from_utf8(sink.into_writer()).unwrap();
        assert_eq!(output, "[area] frame=1 (0,0)..(99,49) strips=3\n");
    }

    #[test]
    fn node_draws_are_opt_in() {
        let event = NodeDrawnEvent {
            frame_index: 2,
            node_index: 7,
            mode: DrawMode::Post,
        };
        let mut quiet = PrettyPrintSink::with_writer(Vec::<u8>::new());
        quiet.on_node_drawn(&event);
        assert!(quiet.into_writer().is_empty(), "suppressed by default");

        let mut loud = PrettyPrintSink::with_writer(Vec::<u8>::new()).with_node_draws(true);
        loud.on_node_drawn(&event);
        let output = String::from_utf8(loud.into_writer()).unwrap();
        assert!(output.contains("#7 post"), "got: {output}");
    }
}
