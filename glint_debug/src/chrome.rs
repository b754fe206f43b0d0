// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Display frames become complete (`X`) slices one frame delta long on the
//! "Display" track; matched latency pairs become present → scan-out slices on
//! the "Latency" track; smoothed values become counters.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use glint_core::trace::PredictionKey;

use crate::recorder::{RecordedEvent, decode};

const TID_DISPLAY: u32 = 0;
const TID_PREDICTION: u32 = 1;
const TID_LATENCY: u32 = 2;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Timestamps are the recorded seconds converted to microseconds.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FrameSubmit(e) => {
                events.push(json!({
                    "ph": "X",
                    "name": format!("display {}", e.display_frame_index),
                    "cat": "Display",
                    "ts": us(e.scanout_seconds),
                    "dur": us(e.frame_delta),
                    "pid": 0,
                    "tid": TID_DISPLAY,
                    "args": {
                        "display_frame_index": e.display_frame_index,
                        "app_frame_index": e.app_frame_index,
                        "measured_delta_us": e.measured_delta.map(us),
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "FramePacing",
                    "ts": us(e.scanout_seconds),
                    "pid": 0,
                    "args": {
                        "frame_delta_us": us(e.frame_delta),
                        "app_to_display_ratio": e.app_to_display_frame_ratio,
                    }
                }));
            }
            RecordedEvent::FramePrediction(e) => {
                let (name, requested) = match e.key {
                    PredictionKey::App(i) => ("PredictApp", i),
                    PredictionKey::Display(i) => ("PredictDisplay", i),
                };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Prediction",
                    "ts": us(e.predicted_scanout_seconds),
                    "pid": 0,
                    "tid": TID_PREDICTION,
                    "s": "t",
                    "args": {
                        "requested": requested,
                        "app_frame_index": e.app_frame_index,
                        "display_frame_index": e.display_frame_index,
                    }
                }));
            }
            RecordedEvent::LatencyCycle(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("Cycle{:?}", e.transition),
                    "cat": "Latency",
                    "ts": us(e.seconds),
                    "pid": 0,
                    "tid": TID_LATENCY,
                    "s": "p",
                }));
            }
            RecordedEvent::LatencyMatch(e) => {
                events.push(json!({
                    "ph": "X",
                    "name": format!("readback {}", e.readback_index),
                    "cat": "Latency",
                    "ts": us(e.present_seconds),
                    "dur": us(e.delta_seconds.max(0.0)),
                    "pid": 0,
                    "tid": TID_LATENCY,
                    "args": {
                        "delta_us": us(e.delta_seconds),
                        "recorded": e.recorded,
                    }
                }));
            }
            RecordedEvent::LatencySummary(s) => {
                events.push(json!({
                    "ph": "C",
                    "name": "Latency",
                    "ts": us(s.seconds),
                    "pid": 0,
                    "args": {
                        "render_us": us(s.timings.latency_render),
                        "timewarp_us": us(s.timings.latency_timewarp),
                        "post_present_us": us(s.timings.latency_post_present),
                        "error_render_us": us(s.timings.error_render),
                        "error_timewarp_us": us(s.timings.error_timewarp),
                    }
                }));
                if let Some(v) = s.vsync_to_scanout {
                    events.push(json!({
                        "ph": "C",
                        "name": "VsyncToScanout",
                        "ts": us(s.seconds),
                        "pid": 0,
                        "args": { "us": us(v) }
                    }));
                }
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn us(seconds: f64) -> f64 {
    seconds * 1_000_000.0
}
