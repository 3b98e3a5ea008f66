// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the refresh pass.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! refresh driver calls at each stage. All method bodies default to no-ops,
//! so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`StripFlushedEvent`],
//!   [`NodeDrawnEvent`] and damage-area events plus the corresponding
//!   `TraceSink` methods.

use crate::area::Area;
#[cfg(feature = "trace-rich")]
use crate::node::DrawMode;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why an image was replaced by its placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    /// The widget has no image source.
    NoSource,
    /// The source could not be opened or decoded.
    LoadFailed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a refresh pass starts.
#[derive(Clone, Copy, Debug)]
pub struct RefreshBeginEvent {
    /// Monotonic refresh counter.
    pub frame_index: u64,
    /// Queued dirty areas before joining.
    pub pending_areas: u32,
}

/// Emitted after the dirty queue has been joined.
#[derive(Clone, Copy, Debug)]
pub struct AreasJoinedEvent {
    /// Refresh counter.
    pub frame_index: u64,
    /// Areas before joining.
    pub before: u32,
    /// Areas left to repaint.
    pub after: u32,
}

/// Emitted after one dirty area has been repainted and flushed.
#[derive(Clone, Copy, Debug)]
pub struct AreaRefreshedEvent {
    /// Refresh counter.
    pub frame_index: u64,
    /// The repainted area.
    pub area: Area,
    /// Draw-buffer strips it was split into (1 in direct mode).
    pub strips: u32,
}

/// Emitted when a refresh pass ends.
#[derive(Clone, Copy, Debug)]
pub struct RefreshEndEvent {
    /// Refresh counter.
    pub frame_index: u64,
    /// Areas repainted.
    pub areas: u32,
    /// Pixels flushed to the display.
    pub pixels: u64,
}

/// Emitted when an image is drawn as a placeholder.
#[derive(Clone, Copy, Debug)]
pub struct ImageFallbackEvent {
    /// Refresh counter.
    pub frame_index: u64,
    /// Where the image would have been drawn.
    pub area: Area,
    /// Why the placeholder was used.
    pub reason: FallbackReason,
}

/// Emitted for each draw-buffer strip flushed (requires `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct StripFlushedEvent {
    /// Refresh counter.
    pub frame_index: u64,
    /// The strip.
    pub strip: Area,
    /// Slot index of the topmost node covering the strip.
    pub top_node: u32,
}

/// Emitted for each node draw call (requires `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct NodeDrawnEvent {
    /// Refresh counter.
    pub frame_index: u64,
    /// Slot index of the drawn node.
    pub node_index: u32,
    /// Which pass: main, post, or cover check.
    pub mode: DrawMode,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the refresh pass.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a refresh pass starts.
    fn on_refresh_begin(&mut self, e: &RefreshBeginEvent) {
        _ = e;
    }

    /// Called after the dirty queue is joined.
    fn on_areas_joined(&mut self, e: &AreasJoinedEvent) {
        _ = e;
    }

    /// Called after an area is repainted.
    fn on_area_refreshed(&mut self, e: &AreaRefreshedEvent) {
        _ = e;
    }

    /// Called when a refresh pass ends.
    fn on_refresh_end(&mut self, e: &RefreshEndEvent) {
        _ = e;
    }

    /// Called when an image falls back to its placeholder.
    fn on_image_fallback(&mut self, e: &ImageFallbackEvent) {
        _ = e;
    }

    /// Called per flushed strip (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_strip_flushed(&mut self, e: &StripFlushedEvent) {
        _ = e;
    }

    /// Called per node draw (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_drawn(&mut self, e: &NodeDrawnEvent) {
        _ = e;
    }

    /// Called with the areas repainted in a pass (requires `trace-rich`
    /// feature).
    #[cfg(feature = "trace-rich")]
    fn on_damage_areas(&mut self, frame_index: u64, areas: &[Area]) {
        _ = (frame_index, areas);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`RefreshBeginEvent`].
    #[inline]
    pub fn refresh_begin(&mut self, e: &RefreshBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_refresh_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AreasJoinedEvent`].
    #[inline]
    pub fn areas_joined(&mut self, e: &AreasJoinedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_areas_joined(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AreaRefreshedEvent`].
    #[inline]
    pub fn area_refreshed(&mut self, e: &AreaRefreshedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_area_refreshed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RefreshEndEvent`].
    #[inline]
    pub fn refresh_end(&mut self, e: &RefreshEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_refresh_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`ImageFallbackEvent`].
    #[inline]
    pub fn image_fallback(&mut self, e: &ImageFallbackEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_image_fallback(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StripFlushedEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn strip_flushed(&mut self, e: &StripFlushedEvent) {
        if let Some(s) = &mut self.sink {
            s.on_strip_flushed(e);
        }
    }

    /// Emits a [`NodeDrawnEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_drawn(&mut self, e: &NodeDrawnEvent) {
        if let Some(s) = &mut self.sink {
            s.on_node_drawn(e);
        }
    }

    /// Emits the repainted areas (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn damage_areas(&mut self, frame_index: u64, areas: &[Area]) {
        if let Some(s) = &mut self.sink {
            s.on_damage_areas(frame_index, areas);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> RefreshBeginEvent {
        RefreshBeginEvent {
            frame_index: 42,
            pending_areas: 3,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_refresh_begin(&sample_begin());
        sink.on_image_fallback(&ImageFallbackEvent {
            frame_index: 0,
            area: Area::new(0, 0, 9, 9),
            reason: FallbackReason::NoSource,
        });
        sink.on_refresh_end(&RefreshEndEvent {
            frame_index: 42,
            areas: 1,
            pixels: 100,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.refresh_begin(&sample_begin());
        tracer.areas_joined(&AreasJoinedEvent {
            frame_index: 42,
            before: 3,
            after: 2,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            frames: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_refresh_begin(&mut self, e: &RefreshBeginEvent) {
                self.frames.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { frames: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.refresh_begin(&sample_begin());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.frames, &[42]);
    }
}
