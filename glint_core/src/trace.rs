// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for frame pacing and latency measurement.
//!
//! This module provides a [`TraceSink`] trait with one method per event. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! The components never hold a sink. Their mutating operations return report
//! values ([`SubmitReport`], [`MatchReport`], [`SaveOutcome`]) and the caller
//! turns those into events here, at whatever granularity it wants.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`SaveOutcome`]: crate::latency::SaveOutcome

use crate::latency::{CycleTransition, LatencyMatch, MatchReport, OutputLatencyTimings};
use crate::timing::{SubmitReport, Timing};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which counter a prediction was requested for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PredictionKey {
    /// `app_frame_timing(index)`.
    App(u32),
    /// `display_frame_timing(index)`.
    Display(u32),
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a display frame is submitted.
#[derive(Clone, Copy, Debug)]
pub struct FrameSubmitEvent {
    /// Submitted display frame.
    pub display_frame_index: u32,
    /// App frame carried by it.
    pub app_frame_index: u32,
    /// Scan-out start of the display frame.
    pub scanout_seconds: f64,
    /// Smoothed frame delta after the submit.
    pub frame_delta: f64,
    /// App/display ratio after the submit.
    pub app_to_display_frame_ratio: f64,
    /// Delta sample recorded by this submit, if any.
    pub measured_delta: Option<f64>,
}

impl From<&SubmitReport> for FrameSubmitEvent {
    fn from(report: &SubmitReport) -> Self {
        Self {
            display_frame_index: report.timing.display_frame_index,
            app_frame_index: report.timing.app_frame_index,
            scanout_seconds: report.timing.frame_submit_seconds,
            frame_delta: report.timing.frame_delta,
            app_to_display_frame_ratio: report.timing.app_to_display_frame_ratio,
            measured_delta: report.measured_delta,
        }
    }
}

/// Emitted when a caller asks for a projected timing.
#[derive(Clone, Copy, Debug)]
pub struct FramePredictionEvent {
    /// What was asked for.
    pub key: PredictionKey,
    /// Projected app frame.
    pub app_frame_index: u32,
    /// Projected display frame.
    pub display_frame_index: u32,
    /// Projected scan-out start.
    pub predicted_scanout_seconds: f64,
    /// Frame delta used for the projection.
    pub frame_delta: f64,
}

impl FramePredictionEvent {
    /// Creates a `FramePredictionEvent` from the requested key and the
    /// timing that was returned for it.
    #[must_use]
    pub fn new(key: PredictionKey, timing: &Timing) -> Self {
        Self {
            key,
            app_frame_index: timing.app_frame_index,
            display_frame_index: timing.display_frame_index,
            predicted_scanout_seconds: timing.frame_submit_seconds,
            frame_delta: timing.frame_delta,
        }
    }
}

/// Emitted when a latency cycle starts, completes or is abandoned.
#[derive(Clone, Copy, Debug)]
pub struct LatencyCycleEvent {
    /// What happened.
    pub transition: CycleTransition,
    /// When the caller observed it.
    pub seconds: f64,
}

impl LatencyCycleEvent {
    /// Creates the cycle event for `report`, if the report changed the cycle.
    #[must_use]
    pub fn from_report(report: &MatchReport, seconds: f64) -> Option<Self> {
        report.transition.map(|transition| Self {
            transition,
            seconds,
        })
    }
}

/// Emitted for each render sample matched to a scan-out record.
#[derive(Clone, Copy, Debug)]
pub struct LatencyMatchEvent {
    /// Readback index of the pair.
    pub readback_index: u8,
    /// Present time of the render sample.
    pub present_seconds: f64,
    /// Scan-out time reported by the device.
    pub scanout_seconds: f64,
    /// Unclamped present → scan-out delta.
    pub delta_seconds: f64,
    /// Whether the delta entered the statistics.
    pub recorded: bool,
}

impl From<&LatencyMatch> for LatencyMatchEvent {
    fn from(m: &LatencyMatch) -> Self {
        Self {
            readback_index: m.readback_index,
            present_seconds: m.present_seconds,
            scanout_seconds: m.scanout_seconds,
            delta_seconds: m.delta_seconds,
            recorded: m.recorded,
        }
    }
}

/// Periodic snapshot of the latency results.
#[derive(Clone, Copy, Debug)]
pub struct LatencySummaryEvent {
    /// When the snapshot was taken.
    pub seconds: f64,
    /// Latest latencies (all zero when unavailable).
    pub timings: OutputLatencyTimings,
    /// Smoothed vsync → scan-out, if plausible.
    pub vsync_to_scanout: Option<f64>,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from frame pacing and latency measurement.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a display frame is submitted.
    fn on_frame_submit(&mut self, e: &FrameSubmitEvent) {
        _ = e;
    }

    /// Called when a projected timing is handed out.
    fn on_frame_prediction(&mut self, e: &FramePredictionEvent) {
        _ = e;
    }

    /// Called when a latency cycle changes state.
    fn on_latency_cycle(&mut self, e: &LatencyCycleEvent) {
        _ = e;
    }

    /// Called for each newly matched latency pair.
    fn on_latency_match(&mut self, e: &LatencyMatchEvent) {
        _ = e;
    }

    /// Called with a latency results snapshot.
    fn on_latency_summary(&mut self, s: &LatencySummaryEvent) {
        _ = s;
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

    /// Emits a [`FrameSubmitEvent`].
    #[inline]
    pub fn frame_submit(&mut self, e: &FrameSubmitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_submit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FramePredictionEvent`].
    #[inline]
    pub fn frame_prediction(&mut self, e: &FramePredictionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_prediction(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LatencyCycleEvent`].
    #[inline]
    pub fn latency_cycle(&mut self, e: &LatencyCycleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_latency_cycle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LatencyMatchEvent`].
    #[inline]
    pub fn latency_match(&mut self, e: &LatencyMatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_latency_match(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LatencySummaryEvent`].
    #[inline]
    pub fn latency_summary(&mut self, s: &LatencySummaryEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_latency_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits the cycle transition (if any) and every match in `report`.
    #[inline]
    pub fn match_report(&mut self, report: &MatchReport, seconds: f64) {
        for m in report.matches() {
            self.latency_match(&LatencyMatchEvent::from(m));
        }
        if let Some(e) = LatencyCycleEvent::from_report(report, seconds) {
            self.latency_cycle(&e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
