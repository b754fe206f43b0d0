// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Present-to-photon latency measurement with a pixel-readback tester.
//!
//! The renderer paints [`LatencyTester::next_draw_color`] into a small test
//! quad each frame and reports what it drew with
//! [`save_draw_color`](LatencyTester::save_draw_color). Independently, the
//! device reports the last few colors it saw on screen; feeding those to
//! [`match_record`](LatencyTester::match_record) pairs render-side samples
//! with scan-out observations. No clock synchronization with the device is
//! needed beyond both sides reporting in the same time base.
//!
//! # Cycle
//!
//! ```text
//!             all-zero record set
//!   ┌────────────────┐ ──────────► ┌──────────┐
//!   │ WaitingForZero │             │ Matching │  issue colors 1..=7,
//!   └────────────────┘ ◄────────── └──────────┘  match runs of ≥ 2
//!          all 7 matched, or newest sample unanswered for 150 ms
//! ```
//!
//! Waiting for an all-zero report guarantees the device is not still showing
//! colors from the previous cycle, so every index seen afterwards belongs to
//! the current one.
//!
//! Mutation is single-threaded: the frame-pacing owner calls every `&mut`
//! method.

use crate::clock::Clock;
use crate::config::LatencyTesterConfig;
use crate::readback::{
    FRAMES_TRACKED, FrameTimeRecord, FrameTimeRecordSet, RECORD_COUNT, readback_index_to_color,
};
use crate::stats::StatisticsBuffer;

/// Number of present → scan-out deltas kept for the median filter.
pub const POST_PRESENT_SAMPLES: usize = 12;

/// Render-side data for one test frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatencySample {
    /// Color painted into the test quad.
    pub draw_color: u8,
    /// When the frame was presented.
    pub present_seconds: f64,
    /// When the IMU was sampled for the render pose.
    pub render_imu_seconds: f64,
    /// When the IMU was sampled for the timewarp pose; 0 if timewarp did not
    /// sample.
    pub timewarp_imu_seconds: f64,
    /// Scan-out time predicted at render time.
    pub render_predicted_scanout_seconds: f64,
    /// Scan-out time predicted at timewarp time.
    pub timewarp_predicted_scanout_seconds: f64,
}

/// Latest measured latencies.
///
/// All values are seconds. The error fields are `actual - predicted`
/// scan-out times, so positive means the frame reached the display later
/// than predicted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OutputLatencyTimings {
    /// Render IMU sample → scan-out.
    pub latency_render: f64,
    /// Timewarp IMU sample → scan-out (0 without timewarp).
    pub latency_timewarp: f64,
    /// Smoothed present → scan-out.
    pub latency_post_present: f64,
    /// Scan-out error of the render-time prediction.
    pub error_render: f64,
    /// Scan-out error of the timewarp-time prediction.
    pub error_timewarp: f64,
}

impl OutputLatencyTimings {
    /// All zeros; the "unavailable" value.
    pub const ZERO: Self = Self {
        latency_render: 0.0,
        latency_timewarp: 0.0,
        latency_post_present: 0.0,
        error_render: 0.0,
        error_timewarp: 0.0,
    };

    /// Resets every field to 0.
    pub fn clear(&mut self) {
        *self = Self::ZERO;
    }

    /// Returns `true` if every field is 0.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Where the tester is in its measurement cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LatencyTesterState {
    /// Idle until the device reports an all-zero record set.
    #[default]
    WaitingForZero,
    /// Test colors are being issued and matched.
    Matching,
}

/// A change of measurement cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CycleTransition {
    /// An all-zero report was seen; test colors will be issued.
    Started,
    /// Every test frame of the cycle was matched.
    Completed,
    /// The cycle timed out waiting for the device.
    Abandoned,
}

/// One render sample paired with the scan-out record that echoed it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LatencyMatch {
    /// Readback index of the pair.
    pub readback_index: u8,
    /// When the render sample was presented.
    pub present_seconds: f64,
    /// When the device saw it.
    pub scanout_seconds: f64,
    /// `scanout_seconds - present_seconds`, before clamping.
    pub delta_seconds: f64,
    /// Whether the delta went into the post-present statistics. Outliers at
    /// or above the rejection threshold do not.
    pub recorded: bool,
}

/// What [`LatencyTester::save_draw_color`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SaveOutcome {
    /// Disabled, or waiting for zero.
    Ignored,
    /// Stored as the sample for `readback_index`.
    Recorded {
        /// Readback index assigned to the sample.
        readback_index: u8,
    },
    /// The cycle is full and still waiting for the device.
    Pending,
    /// The cycle went stale and was dropped.
    Abandoned {
        /// Whether the published latencies were cleared because nothing
        /// in the cycle had matched.
        cleared_outputs: bool,
    },
}

/// What [`LatencyTester::match_record`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MatchReport {
    /// Cycle change caused by this call, if any.
    pub transition: Option<CycleTransition>,
    matches: [LatencyMatch; RECORD_COUNT],
    match_count: usize,
}

impl MatchReport {
    /// Pairs newly matched by this call, in render order.
    #[must_use]
    pub fn matches(&self) -> &[LatencyMatch] {
        &self.matches[..self.match_count]
    }

    fn push(&mut self, m: LatencyMatch) {
        // A run never spans more records than the device reports.
        debug_assert!(self.match_count < RECORD_COUNT, "match run longer than record set");
        if let Some(slot) = self.matches.get_mut(self.match_count) {
            *slot = m;
            self.match_count += 1;
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct HistoryEntry {
    record: FrameTimeRecord,
    matched: bool,
    sample: LatencySample,
}

/// Measures latency by matching issued test colors against readback reports.
///
/// See the [module docs](self) for the protocol.
#[derive(Debug)]
pub struct LatencyTester<C> {
    config: LatencyTesterConfig,
    clock: C,
    enabled: bool,
    state: LatencyTesterState,
    history: [HistoryEntry; FRAMES_TRACKED],
    /// Samples recorded in the current cycle.
    frame_index: usize,
    /// Samples matched in the current cycle.
    match_count: usize,
    /// Scan-out time of the last match; `None` before the first.
    last_match_seconds: Option<f64>,
    outputs: OutputLatencyTimings,
    post_present: StatisticsBuffer<POST_PRESENT_SAMPLES>,
}

impl<C: Clock> LatencyTester<C> {
    /// Creates a tester waiting for its first all-zero report.
    #[must_use]
    pub fn new(config: LatencyTesterConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            enabled: config.enabled,
            state: LatencyTesterState::WaitingForZero,
            history: [HistoryEntry::default(); FRAMES_TRACKED],
            frame_index: 0,
            match_count: 0,
            last_match_seconds: None,
            outputs: OutputLatencyTimings::ZERO,
            post_present: StatisticsBuffer::new(),
        }
    }

    /// Drops all samples and results and waits for zero again.
    pub fn reset(&mut self) {
        self.enabled = self.config.enabled;
        self.state = LatencyTesterState::WaitingForZero;
        self.history = [HistoryEntry::default(); FRAMES_TRACKED];
        self.frame_index = 0;
        self.match_count = 0;
        self.last_match_seconds = None;
        self.outputs.clear();
        self.post_present.clear();
    }

    /// Enables or disables the tester. Disabled, it issues color 0 and
    /// ignores saves and reports.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the tester is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current cycle state.
    #[must_use]
    pub fn state(&self) -> LatencyTesterState {
        self.state
    }

    /// Color to paint into the test quad for the next frame.
    #[must_use]
    pub fn next_draw_color(&self) -> u8 {
        if !self.enabled
            || self.state == LatencyTesterState::WaitingForZero
            || self.frame_index >= FRAMES_TRACKED
        {
            return readback_index_to_color(0);
        }
        readback_index_to_color(slot_readback_index(self.frame_index))
    }

    /// Records what was drawn for the next test frame.
    ///
    /// `sample.draw_color` must be the color [`next_draw_color`] returned.
    /// Once the cycle is full, a sample presented more than the stale
    /// threshold after the newest recorded one abandons the cycle.
    ///
    /// [`next_draw_color`]: Self::next_draw_color
    pub fn save_draw_color(&mut self, sample: &LatencySample) -> SaveOutcome {
        if !self.enabled || self.state == LatencyTesterState::WaitingForZero {
            return SaveOutcome::Ignored;
        }

        if let Some(entry) = self.history.get_mut(self.frame_index) {
            let readback_index = slot_readback_index(self.frame_index);
            debug_assert_eq!(
                sample.draw_color,
                readback_index_to_color(readback_index),
                "draw color does not match the color issued for slot {}",
                self.frame_index
            );
            *entry = HistoryEntry {
                record: FrameTimeRecord {
                    readback_index,
                    time_seconds: sample.present_seconds,
                },
                matched: false,
                sample: *sample,
            };
            self.frame_index += 1;
            return SaveOutcome::Recorded { readback_index };
        }

        let newest = self.history[FRAMES_TRACKED - 1].record.time_seconds;
        if sample.present_seconds <= newest + self.config.stale_cycle_seconds {
            return SaveOutcome::Pending;
        }

        // Nothing matched: whatever is published predates this cycle.
        let cleared_outputs = self.match_count == 0;
        if cleared_outputs {
            self.outputs.clear();
        }
        self.restart_cycle();
        SaveOutcome::Abandoned { cleared_outputs }
    }

    /// Matches the device's latest records against the current cycle.
    ///
    /// A single matching index is treated as coincidence; only runs of two
    /// or more consecutive indices are accepted.
    pub fn match_record(&mut self, records: &FrameTimeRecordSet) -> MatchReport {
        let mut report = MatchReport::default();
        if !self.enabled {
            return report;
        }

        if self.state == LatencyTesterState::WaitingForZero {
            if records.is_all_zeroes() {
                debug_assert_eq!(self.frame_index, 0, "samples left over from previous cycle");
                self.state = LatencyTesterState::Matching;
                self.match_count = 0;
                report.transition = Some(CycleTransition::Started);
            }
            return report;
        }

        for i in 0..self.frame_index {
            let readback_index = self.history[i].record.readback_index;
            debug_assert_ne!(readback_index, 0, "recorded sample without a test color");

            let Some(record_index) = records.find_readback_index(0, readback_index) else {
                continue;
            };

            let history = &self.history;
            let run = 1 + (i + 1..self.frame_index)
                .zip(record_index + 1..RECORD_COUNT)
                .take_while(|&(j, ri)| {
                    records[ri].readback_index == history[j].record.readback_index
                })
                .count();

            if run > 1 {
                for q in 0..run {
                    if !self.history[i + q].matched {
                        self.history[i + q].matched = true;
                        report.push(self.on_record_match(i + q, records[record_index + q]));
                    }
                }
                break;
            }
        }

        if self.match_count == FRAMES_TRACKED {
            self.restart_cycle();
            report.transition = Some(CycleTransition::Completed);
        }
        report
    }

    fn on_record_match(&mut self, slot: usize, scanout: FrameTimeRecord) -> LatencyMatch {
        self.match_count += 1;

        let render = self.history[slot];
        let delta_seconds = scanout.time_seconds - render.record.time_seconds;
        let recorded = delta_seconds < self.config.outlier_reject_seconds;
        if recorded {
            self.post_present.add(delta_seconds.max(0.0));
        }

        let scan = scanout.time_seconds;
        let sample = &render.sample;
        self.last_match_seconds = Some(scan);
        self.outputs.latency_render = scan - sample.render_imu_seconds;
        self.outputs.latency_timewarp = if sample.timewarp_imu_seconds == 0.0 {
            0.0
        } else {
            scan - sample.timewarp_imu_seconds
        };
        self.outputs.error_render = scan - sample.render_predicted_scanout_seconds;
        self.outputs.error_timewarp = scan - sample.timewarp_predicted_scanout_seconds;

        LatencyMatch {
            readback_index: render.record.readback_index,
            present_seconds: render.record.time_seconds,
            scanout_seconds: scan,
            delta_seconds,
            recorded,
        }
    }

    fn restart_cycle(&mut self) {
        self.state = LatencyTesterState::WaitingForZero;
        self.match_count = 0;
        self.frame_index = 0;
    }

    /// Whether a match happened within the availability window.
    #[must_use]
    pub fn is_latency_timing_available(&self) -> bool {
        self.last_match_seconds.is_some_and(|t| {
            self.clock.now_seconds() < t + self.config.availability_window_seconds
        })
    }

    /// Latest latencies, or [`OutputLatencyTimings::ZERO`] if none are
    /// recent enough.
    pub fn latency_timings(&mut self) -> OutputLatencyTimings {
        if !self.is_latency_timing_available() {
            return OutputLatencyTimings::ZERO;
        }
        OutputLatencyTimings {
            latency_post_present: self.post_present.median(),
            ..self.outputs
        }
    }

    /// Smoothed vsync → scan-out delay.
    ///
    /// `None` until enough post-present samples exist, or when the median is
    /// outside the plausible window and the measurement is likely broken.
    pub fn vsync_to_scanout(&mut self) -> Option<f64> {
        if self.post_present.count() < self.config.min_vsync_samples {
            return None;
        }
        let median = self.post_present.median();
        (self.config.vsync_to_scanout_min..=self.config.vsync_to_scanout_max)
            .contains(&median)
            .then_some(median)
    }

    /// The post-present samples collected so far.
    #[must_use]
    pub fn post_present_samples(&self) -> &StatisticsBuffer<POST_PRESENT_SAMPLES> {
        &self.post_present
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "slots are below FRAMES_TRACKED"
)]
fn slot_readback_index(slot: usize) -> u8 {
    (slot + 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn tester(clock: &ManualClock) -> LatencyTester<ManualClock> {
        LatencyTester::new(LatencyTesterConfig::standard(), clock.clone())
    }

    fn start_cycle(t: &mut LatencyTester<ManualClock>) {
        let report = t.match_record(&FrameTimeRecordSet::new());
        assert_eq!(report.transition, Some(CycleTransition::Started));
        assert_eq!(t.state(), LatencyTesterState::Matching);
    }

    /// Saves one test frame presented at `present`, using the issued color.
    fn save(t: &mut LatencyTester<ManualClock>, present: f64) -> SaveOutcome {
        t.save_draw_color(&LatencySample {
            draw_color: t.next_draw_color(),
            present_seconds: present,
            render_imu_seconds: present - 0.010,
            timewarp_imu_seconds: present - 0.002,
            render_predicted_scanout_seconds: present + 0.015,
            timewarp_predicted_scanout_seconds: present + 0.016,
        })
    }

    /// Device report echoing `indices` at `present(i) + delta`.
    fn echo(indices: &[u8], present: impl Fn(u8) -> f64, delta: f64) -> FrameTimeRecordSet {
        let mut set = FrameTimeRecordSet::new();
        for &i in indices {
            set.add_value(i, present(i) + delta);
        }
        set
    }

    fn present_at(i: u8) -> f64 {
        1.0 + f64::from(i) * 0.011
    }

    #[test]
    fn waits_for_zero_before_issuing_colors() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        assert_eq!(t.next_draw_color(), readback_index_to_color(0));
        assert_eq!(save(&mut t, 1.0), SaveOutcome::Ignored);

        let busy = echo(&[3, 4], present_at, 0.0);
        assert_eq!(t.match_record(&busy).transition, None);
        assert_eq!(t.state(), LatencyTesterState::WaitingForZero);

        start_cycle(&mut t);
        assert_eq!(t.next_draw_color(), readback_index_to_color(1));
    }

    #[test]
    fn repeated_zero_report_does_not_reset_cycle() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        start_cycle(&mut t);
        assert_eq!(save(&mut t, present_at(1)), SaveOutcome::Recorded { readback_index: 1 });
        assert_eq!(save(&mut t, present_at(2)), SaveOutcome::Recorded { readback_index: 2 });

        let report = t.match_record(&FrameTimeRecordSet::new());
        assert_eq!(report.transition, None);
        assert!(report.matches().is_empty());
        assert_eq!(t.state(), LatencyTesterState::Matching);
        assert_eq!(t.next_draw_color(), readback_index_to_color(3));
    }

    #[test]
    fn full_cycle_matches_every_frame() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        start_cycle(&mut t);
        for i in 1..=7 {
            assert_eq!(save(&mut t, present_at(i)), SaveOutcome::Recorded { readback_index: i });
        }
        assert_eq!(t.next_draw_color(), readback_index_to_color(0), "cycle is full");

        let first = t.match_record(&echo(&[1, 2, 3, 4], present_at, 0.020));
        assert_eq!(first.transition, None);
        let indices: alloc::vec::Vec<u8> = first.matches().iter().map(|m| m.readback_index).collect();
        assert_eq!(indices, [1, 2, 3, 4]);

        // Index 4 is already matched; only 5..=7 are new.
        let second = t.match_record(&echo(&[4, 5, 6, 7], present_at, 0.020));
        assert_eq!(second.matches().len(), 3);
        assert_eq!(second.transition, Some(CycleTransition::Completed));
        assert_eq!(t.state(), LatencyTesterState::WaitingForZero);

        clock.set(present_at(7) + 0.5);
        let out = t.latency_timings();
        assert!((out.latency_post_present - 0.020).abs() < 1e-9);
        assert!((out.latency_render - 0.030).abs() < 1e-9);
        assert!((out.latency_timewarp - 0.022).abs() < 1e-9);
        assert!((out.error_render - 0.005).abs() < 1e-9);
        assert!((out.error_timewarp - 0.004).abs() < 1e-9);
        let vsync = t.vsync_to_scanout().unwrap();
        assert!((vsync - 0.020).abs() < 1e-9);
    }

    #[test]
    fn single_coincidental_match_is_ignored() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        start_cycle(&mut t);
        for i in 1..=3 {
            save(&mut t, present_at(i));
        }
        let report = t.match_record(&echo(&[0, 0, 2, 5], present_at, 0.020));
        assert!(report.matches().is_empty());
        assert_eq!(t.post_present_samples().count(), 0);
    }

    #[test]
    fn long_delta_is_rejected_from_statistics() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        start_cycle(&mut t);
        save(&mut t, present_at(1));
        save(&mut t, present_at(2));

        let report = t.match_record(&echo(&[1, 2], present_at, 0.1005));
        assert_eq!(report.matches().len(), 2);
        assert!(report.matches().iter().all(|m| !m.recorded));
        assert_eq!(t.post_present_samples().count(), 0);

        // Instantaneous outputs still update.
        clock.set(present_at(2) + 0.2);
        assert!(t.latency_timings().latency_render > 0.1);
    }

    #[test]
    fn negative_delta_is_clamped_to_zero() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        start_cycle(&mut t);
        save(&mut t, present_at(1));
        save(&mut t, present_at(2));

        let report = t.match_record(&echo(&[1, 2], present_at, -0.002));
        assert!(report.matches().iter().all(|m| m.recorded));
        assert!(report.matches()[0].delta_seconds < 0.0);

        assert_eq!(t.post_present.count(), 2);
        let s = t.post_present.stats().unwrap();
        assert_eq!(s.min, 0.0);
        assert_eq!(s.max, 0.0);
    }

    #[test]
    fn vsync_to_scanout_needs_four_samples() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        start_cycle(&mut t);
        for i in 1..=4 {
            save(&mut t, present_at(i));
        }
        t.match_record(&echo(&[0, 0, 1, 2], present_at, 0.012));
        assert_eq!(t.vsync_to_scanout(), None);
        t.match_record(&echo(&[0, 1, 2, 3], present_at, 0.012));
        assert_eq!(t.post_present_samples().count(), 3);
        assert_eq!(t.vsync_to_scanout(), None);
        t.match_record(&echo(&[1, 2, 3, 4], present_at, 0.012));
        let v = t.vsync_to_scanout().unwrap();
        assert!((v - 0.012).abs() < 1e-9);
    }

    #[test]
    fn implausible_vsync_to_scanout_is_unavailable() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        start_cycle(&mut t);
        for i in 1..=4 {
            save(&mut t, present_at(i));
        }
        t.match_record(&echo(&[1, 2, 3, 4], present_at, 0.080));
        assert_eq!(t.post_present_samples().count(), 4);
        assert_eq!(t.vsync_to_scanout(), None);
    }

    #[test]
    fn stale_cycle_is_abandoned() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        start_cycle(&mut t);
        for i in 1..=7 {
            save(&mut t, present_at(i));
        }
        let newest = present_at(7);
        assert_eq!(save(&mut t, newest + 0.100), SaveOutcome::Pending);
        assert_eq!(
            save(&mut t, newest + 0.151),
            SaveOutcome::Abandoned {
                cleared_outputs: true
            }
        );
        assert_eq!(t.state(), LatencyTesterState::WaitingForZero);
        assert_eq!(t.next_draw_color(), readback_index_to_color(0));
        start_cycle(&mut t);
        assert_eq!(t.next_draw_color(), readback_index_to_color(1));
    }

    #[test]
    fn partial_match_keeps_outputs_on_abandon() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        start_cycle(&mut t);
        for i in 1..=7 {
            save(&mut t, present_at(i));
        }
        t.match_record(&echo(&[1, 2], present_at, 0.020));
        assert_eq!(
            save(&mut t, present_at(7) + 0.2),
            SaveOutcome::Abandoned {
                cleared_outputs: false
            }
        );
        clock.set(present_at(7) + 0.2);
        assert!(!t.latency_timings().is_zero());
    }

    #[test]
    fn results_expire_after_two_seconds() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        assert!(!t.is_latency_timing_available(), "nothing matched yet");

        start_cycle(&mut t);
        save(&mut t, present_at(1));
        save(&mut t, present_at(2));
        t.match_record(&echo(&[1, 2], present_at, 0.020));
        let scan = present_at(2) + 0.020;

        clock.set(scan + 1.9);
        assert!(t.is_latency_timing_available());
        assert!(!t.latency_timings().is_zero());

        clock.set(scan + 2.1);
        assert!(!t.is_latency_timing_available());
        assert!(t.latency_timings().is_zero());
    }

    #[test]
    fn timewarp_latency_is_zero_without_timewarp_sample() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        start_cycle(&mut t);
        for i in 1..=2 {
            let present = present_at(i);
            t.save_draw_color(&LatencySample {
                draw_color: t.next_draw_color(),
                present_seconds: present,
                render_imu_seconds: present - 0.010,
                ..LatencySample::default()
            });
        }
        t.match_record(&echo(&[1, 2], present_at, 0.020));
        clock.set(present_at(2));
        assert_eq!(t.latency_timings().latency_timewarp, 0.0);
    }

    #[test]
    fn disabled_tester_is_inert() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        t.set_enabled(false);
        assert!(!t.is_enabled());
        assert_eq!(t.match_record(&FrameTimeRecordSet::new()).transition, None);
        assert_eq!(t.state(), LatencyTesterState::WaitingForZero);
        assert_eq!(t.next_draw_color(), readback_index_to_color(0));

        t.set_enabled(true);
        start_cycle(&mut t);
        t.set_enabled(false);
        assert_eq!(t.next_draw_color(), readback_index_to_color(0));
        assert_eq!(save(&mut t, 1.0), SaveOutcome::Ignored);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let clock = ManualClock::new(0.0);
        let mut t = tester(&clock);
        start_cycle(&mut t);
        save(&mut t, present_at(1));
        save(&mut t, present_at(2));
        t.match_record(&echo(&[1, 2], present_at, 0.020));

        t.reset();
        assert_eq!(t.state(), LatencyTesterState::WaitingForZero);
        assert_eq!(t.post_present_samples().count(), 0);
        assert!(!t.is_latency_timing_available());
        assert!(t.latency_timings().is_zero());
    }
}
