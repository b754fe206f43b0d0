// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`]. Times are stored as raw `f64` bits.

use glint_core::latency::{CycleTransition, OutputLatencyTimings};
use glint_core::trace::{
    FramePredictionEvent, FrameSubmitEvent, LatencyCycleEvent, LatencyMatchEvent,
    LatencySummaryEvent, PredictionKey, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_SUBMIT: u8 = 1;
const TAG_FRAME_PREDICTION: u8 = 2;
const TAG_LATENCY_CYCLE: u8 = 3;
const TAG_LATENCY_MATCH: u8 = 4;
const TAG_LATENCY_SUMMARY: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_bits().to_le_bytes());
    }

    fn write_option_f64(&mut self, v: Option<f64>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_f64(val);
            }
            None => {
                self.write_u8(0);
                self.write_f64(0.0);
            }
        }
    }

    fn write_transition(&mut self, t: CycleTransition) {
        self.write_u8(match t {
            CycleTransition::Started => 0,
            CycleTransition::Completed => 1,
            CycleTransition::Abandoned => 2,
        });
    }

    fn write_key(&mut self, key: PredictionKey) {
        match key {
            PredictionKey::App(i) => {
                self.write_u8(0);
                self.write_u32(i);
            }
            PredictionKey::Display(i) => {
                self.write_u8(1);
                self.write_u32(i);
            }
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_submit(&mut self, e: &FrameSubmitEvent) {
        self.write_u8(TAG_FRAME_SUBMIT);
        self.write_u32(e.display_frame_index);
        self.write_u32(e.app_frame_index);
        self.write_f64(e.scanout_seconds);
        self.write_f64(e.frame_delta);
        self.write_f64(e.app_to_display_frame_ratio);
        self.write_option_f64(e.measured_delta);
    }

    fn on_frame_prediction(&mut self, e: &FramePredictionEvent) {
        self.write_u8(TAG_FRAME_PREDICTION);
        self.write_key(e.key);
        self.write_u32(e.app_frame_index);
        self.write_u32(e.display_frame_index);
        self.write_f64(e.predicted_scanout_seconds);
        self.write_f64(e.frame_delta);
    }

    fn on_latency_cycle(&mut self, e: &LatencyCycleEvent) {
        self.write_u8(TAG_LATENCY_CYCLE);
        self.write_transition(e.transition);
        self.write_f64(e.seconds);
    }

    fn on_latency_match(&mut self, e: &LatencyMatchEvent) {
        self.write_u8(TAG_LATENCY_MATCH);
        self.write_u8(e.readback_index);
        self.write_f64(e.present_seconds);
        self.write_f64(e.scanout_seconds);
        self.write_f64(e.delta_seconds);
        self.write_u8(u8::from(e.recorded));
    }

    fn on_latency_summary(&mut self, s: &LatencySummaryEvent) {
        self.write_u8(TAG_LATENCY_SUMMARY);
        self.write_f64(s.seconds);
        self.write_f64(s.timings.latency_render);
        self.write_f64(s.timings.latency_timewarp);
        self.write_f64(s.timings.latency_post_present);
        self.write_f64(s.timings.error_render);
        self.write_f64(s.timings.error_timewarp);
        self.write_option_f64(s.vsync_to_scanout);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`FrameSubmitEvent`].
    FrameSubmit(FrameSubmitEvent),
    /// A [`FramePredictionEvent`].
    FramePrediction(FramePredictionEvent),
    /// A [`LatencyCycleEvent`].
    LatencyCycle(LatencyCycleEvent),
    /// A [`LatencyMatchEvent`].
    LatencyMatch(LatencyMatchEvent),
    /// A [`LatencySummaryEvent`].
    LatencySummary(LatencySummaryEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
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
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(|b| f64::from_bits(u64::from_le_bytes(b)))
    }

    fn read_option_f64(&mut self) -> Option<Option<f64>> {
        let present = self.read_u8()?;
        let val = self.read_f64()?;
        Some((present != 0).then_some(val))
    }

    fn read_transition(&mut self) -> Option<CycleTransition> {
        Some(match self.read_u8()? {
            0 => CycleTransition::Started,
            1 => CycleTransition::Completed,
            _ => CycleTransition::Abandoned,
        })
    }

    fn read_key(&mut self) -> Option<PredictionKey> {
        let kind = self.read_u8()?;
        let index = self.read_u32()?;
        Some(match kind {
            0 => PredictionKey::App(index),
            _ => PredictionKey::Display(index),
        })
    }

    fn decode_frame_submit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSubmit(FrameSubmitEvent {
            display_frame_index: self.read_u32()?,
            app_frame_index: self.read_u32()?,
            scanout_seconds: self.read_f64()?,
            frame_delta: self.read_f64()?,
            app_to_display_frame_ratio: self.read_f64()?,
            measured_delta: self.read_option_f64()?,
        }))
    }

    fn decode_frame_prediction(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FramePrediction(FramePredictionEvent {
            key: self.read_key()?,
            app_frame_index: self.read_u32()?,
            display_frame_index: self.read_u32()?,
            predicted_scanout_seconds: self.read_f64()?,
            frame_delta: self.read_f64()?,
        }))
    }

    fn decode_latency_cycle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LatencyCycle(LatencyCycleEvent {
            transition: self.read_transition()?,
            seconds: self.read_f64()?,
        }))
    }

    fn decode_latency_match(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LatencyMatch(LatencyMatchEvent {
            readback_index: self.read_u8()?,
            present_seconds: self.read_f64()?,
            scanout_seconds: self.read_f64()?,
            delta_seconds: self.read_f64()?,
            recorded: self.read_u8()? != 0,
        }))
    }

    fn decode_latency_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LatencySummary(LatencySummaryEvent {
            seconds: self.read_f64()?,
            timings: OutputLatencyTimings {
                latency_render: self.read_f64()?,
                latency_timewarp: self.read_f64()?,
                latency_post_present: self.read_f64()?,
                error_render: self.read_f64()?,
                error_timewarp: self.read_f64()?,
            },
            vsync_to_scanout: self.read_option_f64()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME_SUBMIT => self.decode_frame_submit(),
            TAG_FRAME_PREDICTION => self.decode_frame_prediction(),
            TAG_LATENCY_CYCLE => self.decode_latency_cycle(),
            TAG_LATENCY_MATCH => self.decode_latency_match(),
            TAG_LATENCY_SUMMARY => self.decode_latency_summary(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
