// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Times are
//! printed in milliseconds.

use std::io::Write;

use glint_core::latency::CycleTransition;
use glint_core::trace::{
    FramePredictionEvent, FrameSubmitEvent, LatencyCycleEvent, LatencyMatchEvent,
    LatencySummaryEvent, PredictionKey, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(seconds: f64) -> f64 {
    seconds * 1000.0
}

fn transition_name(t: CycleTransition) -> &'static str {
    match t {
        CycleTransition::Started => "started",
        CycleTransition::Completed => "completed",
        CycleTransition::Abandoned => "abandoned",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_submit(&mut self, e: &FrameSubmitEvent) {
        let measured = match e.measured_delta {
            Some(d) => format!("{:.3}ms", ms(d)),
            None => "-".into(),
        };
        let _ = writeln!(
            self.writer,
            "[submit] display={} app={} scanout={:.3}ms delta={:.3}ms ratio={:.2} measured={measured}",
            e.display_frame_index,
            e.app_frame_index,
            ms(e.scanout_seconds),
            ms(e.frame_delta),
            e.app_to_display_frame_ratio,
        );
    }

    fn on_frame_prediction(&mut self, e: &FramePredictionEvent) {
        let key = match e.key {
            PredictionKey::App(i) => format!("app={i}"),
            PredictionKey::Display(i) => format!("display={i}"),
        };
        let _ = writeln!(
            self.writer,
            "[predict] {key} -> display={} at {:.3}ms",
            e.display_frame_index,
            ms(e.predicted_scanout_seconds),
        );
    }

    fn on_latency_cycle(&mut self, e: &LatencyCycleEvent) {
        let _ = writeln!(
            self.writer,
            "[latency:cycle] {} at {:.3}ms",
            transition_name(e.transition),
            ms(e.seconds),
        );
    }

    fn on_latency_match(&mut self, e: &LatencyMatchEvent) {
        let recorded = if e.recorded { "ok" } else { "OUTLIER" };
        let _ = writeln!(
            self.writer,
            "[latency:match] index={} present={:.3}ms scanout={:.3}ms delta={:.3}ms {recorded}",
            e.readback_index,
            ms(e.present_seconds),
            ms(e.scanout_seconds),
            ms(e.delta_seconds),
        );
    }

    fn on_latency_summary(&mut self, s: &LatencySummaryEvent) {
        let vsync = match s.vsync_to_scanout {
            Some(v) => format!("{:.3}ms", ms(v)),
            None => "?".into(),
        };
        let t = &s.timings;
        let _ = writeln!(
            self.writer,
            "[latency:summary] render={:.3}ms timewarp={:.3}ms post_present={:.3}ms \
             err_render={:.3}ms err_timewarp={:.3}ms vsync_to_scanout={vsync}",
            ms(t.latency_render),
            ms(t.latency_timewarp),
            ms(t.latency_post_present),
            ms(t.error_render),
            ms(t.error_timewarp),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::latency::OutputLatencyTimings;

    #[test]
    fn pretty_print_submit() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_submit(&FrameSubmitEvent {
            display_frame_index: 12,
            app_frame_index: 11,
            scanout_seconds: 0.5,
            frame_delta: 0.011,
            app_to_display_frame_ratio: 1.0,
            measured_delta: None,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[submit]"), "got: {output}");
        assert!(output.contains("display=12"), "got: {output}");
        assert!(output.contains("measured=-"), "got: {output}");
    }

    #[test]
    fn pretty_print_outlier_and_summary() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_latency_match(&LatencyMatchEvent {
            readback_index: 3,
            present_seconds: 1.0,
            scanout_seconds: 1.2,
            delta_seconds: 0.2,
            recorded: false,
        });
        sink.on_latency_summary(&LatencySummaryEvent {
            seconds: 1.2,
            timings: OutputLatencyTimings::ZERO,
            vsync_to_scanout: None,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("OUTLIER"), "got: {output}");
        assert!(output.contains("vsync_to_scanout=?"), "got: {output}");
        assert_eq!(output.lines().count(), 2);
    }
}
