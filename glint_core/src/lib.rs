// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame timing prediction and present-to-photon latency measurement.
//!
//! `glint_core` predicts when a rendered frame will reach the display,
//! reconciles an application's frame cadence with the display's vsync
//! cadence, and measures true scan-out latency with a pixel-readback latency
//! tester. It is `no_std` compatible (with `alloc`), performs no I/O, spawns
//! no threads and does not allocate per frame.
//!
//! # Architecture
//!
//! ```text
//!   render loop                         present thread
//!   ───────────                         ──────────────
//!   TimingReader::app_frame_timing(n)   FrameTimingPredictor::submit_display_frame()
//!        ▲                                   │
//!        └──────── LocklessTiming ◄──────────┘
//!
//!   LatencyTester::next_draw_color() ──► paint test quad
//!   LatencyTester::save_draw_color()  ◄── what was drawn, when
//!   LatencyTester::match_record()     ◄── FrameTimeRecordSet from the device
//!   LatencyTester::latency_timings()  ──► OutputLatencyTimings
//! ```
//!
//! **[`timing`]** — [`FrameTimingPredictor`](timing::FrameTimingPredictor),
//! the authoritative [`Timing`](timing::Timing) record and cross-thread
//! [`TimingReader`](timing::TimingReader) handles.
//!
//! **[`latency`]** — [`LatencyTester`](latency::LatencyTester), the
//! two-state color-matching protocol.
//!
//! **[`readback`]** — Device-side records and the color encoding of readback
//! indices.
//!
//! **[`stats`]** — Quickselect median and the rolling
//! [`StatisticsBuffer`](stats::StatisticsBuffer).
//!
//! **[`index_map`]** — App/display frame ratio from recent index pairs.
//!
//! **[`lockless`]** — Single-writer, multi-reader snapshot cell.
//!
//! **[`ring`]** — Fixed-capacity ring buffer shared by the above.
//!
//! **[`clock`]** — Time sources.
//!
//! **[`config`]** — Thresholds and presets.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types,
//! with zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables [`MonotonicClock`](clock::MonotonicClock).
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod clock;
pub mod config;
pub mod index_map;
pub mod latency;
pub mod lockless;
pub mod readback;
pub mod ring;
pub mod stats;
pub mod timing;
pub mod trace;
