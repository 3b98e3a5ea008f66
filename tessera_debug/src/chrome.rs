// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//! Each refresh becomes a duration slice; everything else is an instant
//! event inside it.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use tessera_core::area::Area;

use crate::recorder::{Record, RecordedEvent, decode};

fn area(a: &Area) -> Value {
    json!([a.x1, a.y1, a.x2, a.y2])
}

fn instant(at_us: u64, name: &str, cat: &str, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": at_us,
        "pid": 0,
        "tid": 0,
        "s": "t",
        "args": args,
    })
}

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for Record { at_us, event } in decode(bytes) {
        let value = match event {
            RecordedEvent::RefreshBegin(e) => json!({
                "ph": "B",
                "name": "Refresh",
                "cat": "Refresh",
                "ts": at_us,
                "pid": 0,
                "tid": 0,
                "args": {
                    "frame_index": e.frame_index,
                    "pending_areas": e.pending_areas,
                }
            }),
            RecordedEvent::RefreshEnd(e) => json!({
                "ph": "E",
                "name": "Refresh",
                "cat": "Refresh",
                "ts": at_us,
                "pid": 0,
                "tid": 0,
                "args": {
                    "frame_index": e.frame_index,
                    "areas": e.areas,
                    "pixels": e.pixels,
                }
            }),
            RecordedEvent::AreasJoined(e) => instant(
                at_us,
                "AreasJoined",
                "Refresh",
                json!({
                    "frame_index": e.frame_index,
                    "before": e.before,
                    "after": e.after,
                }),
            ),
            RecordedEvent::AreaRefreshed(e) => instant(
                at_us,
                "AreaRefreshed",
                "Refresh",
                json!({
                    "frame_index": e.frame_index,
                    "area": area(&e.area),
                    "strips": e.strips,
                }),
            ),
            RecordedEvent::ImageFallback(e) => instant(
                at_us,
                "ImageFallback",
                "Image",
                json!({
                    "frame_index": e.frame_index,
                    "area": area(&e.area),
                    "reason": format!("{:?}", e.reason),
                }),
            ),
            RecordedEvent::StripFlushed(e) => instant(
                at_us,
                "StripFlushed",
                "Rich",
                json!({
                    "frame_index": e.frame_index,
                    "strip": area(&e.strip),
                    "top_node": e.top_node,
                }),
            ),
            RecordedEvent::NodeDrawn(e) => instant(
                at_us,
                "NodeDrawn",
                "Rich",
                json!({
                    "frame_index": e.frame_index,
                    "node_index": e.node_index,
                    "mode": format!("{:?}", e.mode),
                }),
            ),
            RecordedEvent::DamageAreasCount { frame_index, count } => instant(
                at_us,
                "DamageAreas",
                "Rich",
                json!({
                    "frame_index": frame_index,
                    "count": count,
                }),
            ),
        };
        events.push(value);
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use tessera_core::trace::{
        AreaRefreshedEvent, RefreshBeginEvent, RefreshEndEvent, TraceSink,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_refresh_begin(&RefreshBeginEvent {
            frame_index: 0,
            pending_areas: 2,
        });
        rec.on_area_refreshed(&AreaRefreshedEvent {
            frame_index: 0,
            area: Area::new(0, 0, 9, 4),
            strips: 1,
        });
        rec.on_refresh_end(&RefreshEndEvent {
            frame_index: 0,
            areas: 1,
            pixels: 50,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "Refresh");

        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "AreaRefreshed");
        assert_eq!(parsed[1]["args"]["area"], json!([0, 0, 9, 4]));

        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["args"]["pixels"], 50);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
