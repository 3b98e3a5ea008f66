// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, each stamped with the
//! microseconds elapsed since the recorder was created. [`decode`] reads
//! them back as an iterator of [`Record`].
//!
//! [`on_damage_areas`](TraceSink::on_damage_areas) stores only the count.

use std::time::Instant;

use tessera_core::area::Area;
use tessera_core::node::DrawMode;
use tessera_core::trace::{
    AreaRefreshedEvent, AreasJoinedEvent, FallbackReason, ImageFallbackEvent, NodeDrawnEvent,
    RefreshBeginEvent, RefreshEndEvent, StripFlushedEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_REFRESH_BEGIN: u8 = 1;
const TAG_AREAS_JOINED: u8 = 2;
const TAG_AREA_REFRESHED: u8 = 3;
const TAG_REFRESH_END: u8 = 4;
const TAG_IMAGE_FALLBACK: u8 = 5;
const TAG_STRIP_FLUSHED: u8 = 6;
const TAG_NODE_DRAWN: u8 = 7;
const TAG_DAMAGE_AREAS_COUNT: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug)]
pub struct RecorderSink {
    buf: Vec<u8>,
    start: Instant,
}

impl Default for RecorderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSink {
    /// Creates an empty recorder. Timestamps count from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            start: Instant::now(),
        }
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_area(&mut self, a: &Area) {
        for v in [a.x1, a.y1, a.x2, a.y2] {
            self.write_i32(v);
        }
    }

    /// Tag followed by the timestamp.
    fn begin_record(&mut self, tag: u8) {
        let us = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.write_u8(tag);
        self.write_u64(us);
    }
}

fn mode_code(mode: DrawMode) -> u8 {
    match mode {
        DrawMode::Main => 0,
        DrawMode::Post => 1,
        DrawMode::CoverCheck => 2,
    }
}

fn reason_code(reason: FallbackReason) -> u8 {
    match reason {
        FallbackReason::NoSource => 0,
        FallbackReason::LoadFailed => 1,
    }
}

impl TraceSink for RecorderSink {
    fn on_refresh_begin(&mut self, e: &RefreshBeginEvent) {
        self.begin_record(TAG_REFRESH_BEGIN);
        self.write_u64(e.frame_index);
        self.write_u32(e.pending_areas);
    }

    fn on_areas_joined(&mut self, e: &AreasJoinedEvent) {
        self.begin_record(TAG_AREAS_JOINED);
        self.write_u64(e.frame_index);
        self.write_u32(e.before);
        self.write_u32(e.after);
    }

    fn on_area_refreshed(&mut self, e: &AreaRefreshedEvent) {
        self.begin_record(TAG_AREA_REFRESHED);
        self.write_u64(e.frame_index);
        self.write_area(&e.area);
        self.write_u32(e.strips);
    }

    fn on_refresh_end(&mut self, e: &RefreshEndEvent) {
        self.begin_record(TAG_REFRESH_END);
        self.write_u64(e.frame_index);
        self.write_u32(e.areas);
        self.write_u64(e.pixels);
    }

    fn on_image_fallback(&mut self, e: &ImageFallbackEvent) {
        self.begin_record(TAG_IMAGE_FALLBACK);
        self.write_u64(e.frame_index);
        self.write_area(&e.area);
        self.write_u8(reason_code(e.reason));
    }

    fn on_strip_flushed(&mut self, e: &StripFlushedEvent) {
        self.begin_record(TAG_STRIP_FLUSHED);
        self.write_u64(e.frame_index);
        self.write_area(&e.strip);
        self.write_u32(e.top_node);
    }

    fn on_node_drawn(&mut self, e: &NodeDrawnEvent) {
        self.begin_record(TAG_NODE_DRAWN);
        self.write_u64(e.frame_index);
        self.write_u32(e.node_index);
        self.write_u8(mode_code(e.mode));
    }

    fn on_damage_areas(&mut self, frame_index: u64, areas: &[Area]) {
        self.begin_record(TAG_DAMAGE_AREAS_COUNT);
        self.write_u64(frame_index);
        self.write_u32(u32::try_from(areas.len()).unwrap_or(u32::MAX));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`RefreshBeginEvent`].
    RefreshBegin(RefreshBeginEvent),
    /// An [`AreasJoinedEvent`].
    AreasJoined(AreasJoinedEvent),
    /// An [`AreaRefreshedEvent`].
    AreaRefreshed(AreaRefreshedEvent),
    /// A [`RefreshEndEvent`].
    RefreshEnd(RefreshEndEvent),
    /// An [`ImageFallbackEvent`].
    ImageFallback(ImageFallbackEvent),
    /// A [`StripFlushedEvent`].
    StripFlushed(StripFlushedEvent),
    /// A [`NodeDrawnEvent`].
    NodeDrawn(NodeDrawnEvent),
    /// Damage-area count for a frame.
    DamageAreasCount {
        /// Refresh counter.
        frame_index: u64,
        /// Number of repainted areas.
        count: u32,
    },
}

/// One decoded record.
#[derive(Clone, Debug)]
pub struct Record {
    /// Microseconds since the recorder was created.
    pub at_us: u64,
    /// The event.
    pub event: RecordedEvent,
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`Record`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded records.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.take::<1>()?[0])
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take()?))
    }

    fn read_i32(&mut self) -> Option<i32> {
        Some(i32::from_le_bytes(self.take()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take()?))
    }

    fn read_area(&mut self) -> Option<Area> {
        Some(Area::new(
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
        ))
    }

    fn read_mode(&mut self) -> Option<DrawMode> {
        Some(match self.read_u8()? {
            0 => DrawMode::Main,
            1 => DrawMode::Post,
            _ => DrawMode::CoverCheck,
        })
    }

    fn read_reason(&mut self) -> Option<FallbackReason> {
        Some(match self.read_u8()? {
            0 => FallbackReason::NoSource,
            _ => FallbackReason::LoadFailed,
        })
    }

    fn decode_event(&mut self, tag: u8) -> Option<RecordedEvent> {
        Some(match tag {
            TAG_REFRESH_BEGIN => RecordedEvent::RefreshBegin(RefreshBeginEvent {
                frame_index: self.read_u64()?,
                pending_areas: self.read_u32()?,
            }),
            TAG_AREAS_JOINED => RecordedEvent::AreasJoined(AreasJoinedEvent {
                frame_index: self.read_u64()?,
                before: self.read_u32()?,
                after: self.read_u32()?,
            }),
            TAG_AREA_REFRESHED => RecordedEvent::AreaRefreshed(AreaRefreshedEvent {
                frame_index: self.read_u64()?,
                area: self.read_area()?,
                strips: self.read_u32()?,
            }),
            TAG_REFRESH_END => RecordedEvent::RefreshEnd(RefreshEndEvent {
                frame_index: self.read_u64()?,
                areas: self.read_u32()?,
                pixels: self.read_u64()?,
            }),
            TAG_IMAGE_FALLBACK => RecordedEvent::ImageFallback(ImageFallbackEvent {
                frame_index: self.read_u64()?,
                area: self.read_area()?,
                reason: self.read_reason()?,
            }),
            TAG_STRIP_FLUSHED => RecordedEvent::StripFlushed(StripFlushedEvent {
                frame_index: self.read_u64()?,
                strip: self.read_area()?,
                top_node: self.read_u32()?,
            }),
            TAG_NODE_DRAWN => RecordedEvent::NodeDrawn(NodeDrawnEvent {
                frame_index: self.read_u64()?,
                node_index: self.read_u32()?,
                mode: self.read_mode()?,
            }),
            TAG_DAMAGE_AREAS_COUNT => RecordedEvent::DamageAreasCount {
                frame_index: self.read_u64()?,
                count: self.read_u32()?,
            },
            // unknown tag: stop
            _ => return None,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let at_us = self.read_u64()?;
        let event = self.decode_event(tag)?;
        Some(Record { at_us, event })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::config::DisplayConfig;
    use tessera_core::context::RenderContext;
    use tessera_core::painter::ImageSource;
    use tessera_core::trace::Tracer;
    use tessera_core::widgets::Image;
    use tessera_render::image::MemoryLoader;
    use tessera_render::{FrameBuffer, Refresher};

    fn events(rec: &RecorderSink) -> Vec<RecordedEvent> {
        decode(rec.as_bytes()).map(|r| r.event).collect()
    }

    #[test]
    fn area_and_reason_survive_recording() {
        let mut rec = RecorderSink::new();
        rec.on_image_fallback(&ImageFallbackEvent {
            frame_index: 4,
            area: Area::new(-3, 2, 40, 17),
            reason: FallbackReason::LoadFailed,
        });

        let events = events(&rec);
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::ImageFallback(e) => {
                assert_eq!(e.frame_index, 4);
                assert_eq!(e.area, Area::new(-3, 2, 40, 17));
                assert_eq!(e.reason, FallbackReason::LoadFailed);
            }
            other => panic!("expected ImageFallback, got {other:?}"),
        }
    }

    #[test]
    fn damage_areas_store_the_count() {
        let mut rec = RecorderSink::new();
        rec.on_damage_areas(9, &[Area::new(0, 0, 1, 1), Area::new(5, 5, 6, 6)]);
        match &events(&rec)[..] {
            [RecordedEvent::DamageAreasCount { frame_index, count }] => {
                assert_eq!((*frame_index, *count), (9, 2));
            }
            other => panic!("expected one DamageAreasCount, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_ends_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_refresh_begin(&RefreshBeginEvent {
            frame_index: 0,
            pending_areas: 1,
        });
        rec.on_refresh_end(&RefreshEndEvent {
            frame_index: 0,
            areas: 1,
            pixels: 100,
        });
        let bytes = rec.into_bytes();
        assert_eq!(decode(&bytes).count(), 2);
        assert_eq!(decode(&bytes[..bytes.len() - 1]).count(), 1);
        assert_eq!(decode(&[]).count(), 0);
    }

    #[test]
    fn records_a_real_refresh() {
        let config = DisplayConfig {
            draw_buffer_size: 40 * 10,
            ..DisplayConfig::new(40, 30)
        };
        let mut ctx = RenderContext::new(config, None);
        let scr = ctx.active_screen().unwrap();
        ctx.create(Some(scr), None, Box::new(Image::new(ImageSource::None)));

        let mut rec = RecorderSink::new();
        let mut fb = FrameBuffer::new(config.screen_area(), config.color_depth);
        Refresher::new(&config).refresh(
            &mut ctx,
            &mut fb,
            &MemoryLoader::new(),
            &mut Tracer::new(&mut rec),
        );

        let records: Vec<_> = decode(rec.as_bytes()).collect();
        assert!(
            records.windows(2).all(|w| w[0].at_us <= w[1].at_us),
            "timestamps are monotonic"
        );
        let events: Vec<_> = records.into_iter().map(|r| r.event).collect();
        assert!(matches!(events.first(), Some(RecordedEvent::RefreshBegin(_))));
        assert!(matches!(
            events.iter().rev().nth(1),
            Some(RecordedEvent::RefreshEnd(e)) if e.areas == 1 && e.pixels == 1200
        ));
        assert!(matches!(
            events.last(),
            Some(RecordedEvent::DamageAreasCount { count: 1, .. })
        ));
        let strips = events
            .iter()
            .filter(|e| matches!(e, RecordedEvent::StripFlushed(_)))
            .count();
        assert_eq!(strips, 3, "30 rows in strips of 10");
        assert!(
            events.iter().any(|e| matches!(
                e,
                RecordedEvent::ImageFallback(f) if f.reason == FallbackReason::NoSource
            )),
            "image without source falls back"
        );
    }
}
