// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame timing prediction.
//!
//! [`FrameTimingPredictor`] owns the authoritative [`Timing`] record: the
//! last display frame that was actually submitted, when it started scan-out,
//! the smoothed vsync-to-vsync delta and the app/display frame ratio. It
//! answers "when will frame N reach the display" by extrapolating forward
//! from that record.
//!
//! # Threads
//!
//! The predictor itself is driven by one frame-pacing owner (the thread that
//! presents). Every mutation republishes the record through a
//! [`LocklessTiming`] cell, and [`TimingReader`] handles read it from any
//! thread without locking:
//!
//! ```text
//!   present thread                       query threads
//!   ──────────────                       ─────────────
//!   submit_display_frame() ──publish──► LocklessTiming ──load──► TimingReader
//!         │                                                     ├ app_frame_timing()
//!         ├ StatisticsBuffer (frame deltas)                     ├ display_frame_timing()
//!         └ FrameIndexReconciler (app:display ratio)            └ latest()
//! ```
//!
//! # Contract
//!
//! App frames are requested in order: the index passed to
//! [`app_frame_timing`](FrameTimingPredictor::app_frame_timing) must be 0 or
//! exactly one past the last submitted app frame. Violations are caller bugs
//! and trip a debug assertion; release builds extrapolate anyway.

use alloc::sync::Arc;

use crate::clock::Clock;
use crate::config::PredictorConfig;
use crate::index_map::FrameIndexReconciler;
use crate::lockless::LocklessTiming;
use crate::stats::StatisticsBuffer;

/// Number of measured frame deltas kept for the median filter.
pub const FRAME_DELTA_SAMPLES: usize = 12;

/// Snapshot of the frame-pacing state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timing {
    /// Seconds between display refreshes (0 with vsync off).
    pub frame_delta: f64,
    /// Application frame this timing describes.
    pub app_frame_index: u32,
    /// Display frame the app frame is expected to hit. Monotonically
    /// increasing.
    pub display_frame_index: u32,
    /// Time at which `display_frame_index` starts (or is predicted to start)
    /// scan-out. 0 until the first submit.
    pub frame_submit_seconds: f64,
    /// Smoothed app frames per display frame.
    pub app_to_display_frame_ratio: f64,
}

impl Timing {
    /// Projects this timing forward to `app_frame_index`.
    ///
    /// The app-frame advance is converted into display frames through
    /// [`app_to_display_frame_ratio`](Self::app_to_display_frame_ratio) and
    /// each display frame adds one [`frame_delta`](Self::frame_delta). If
    /// nothing has been submitted yet, the projection starts from `now()`.
    /// Indices at or behind the current one return `self` unchanged.
    #[must_use]
    pub fn project_app_frame(&self, app_frame_index: u32, now: impl FnOnce() -> f64) -> Self {
        if app_frame_index <= self.app_frame_index {
            return *self;
        }

        let app_frame_delta = app_frame_index - self.app_frame_index;
        // A zeroed default timing has no ratio yet; treat it as 1:1.
        let ratio = if self.app_to_display_frame_ratio > 0.0 {
            self.app_to_display_frame_ratio
        } else {
            1.0
        };
        #[expect(
            clippy::cast_possible_truncation,
            reason = "display frames ahead are small and truncation toward zero is intended"
        )]
        let display_frames_ahead = (f64::from(app_frame_delta) / ratio) as u32;
        let display_frame_index = self.display_frame_index.wrapping_add(display_frames_ahead);

        Self {
            app_frame_index,
            display_frame_index,
            frame_submit_seconds: self.submit_seconds_or(now)
                + f64::from(display_frames_ahead) * self.frame_delta,
            ..*self
        }
    }

    /// Projects this timing forward to `display_frame_index`, keeping the app
    /// frame index. Indices at or behind the current one return `self`
    /// unchanged.
    #[must_use]
    pub fn project_display_frame(
        &self,
        display_frame_index: u32,
        now: impl FnOnce() -> f64,
    ) -> Self {
        if display_frame_index <= self.display_frame_index {
            return *self;
        }

        let display_frames_ahead = display_frame_index - self.display_frame_index;
        Self {
            display_frame_index,
            frame_submit_seconds: self.submit_seconds_or(now)
                + f64::from(display_frames_ahead) * self.frame_delta,
            ..*self
        }
    }

    fn submit_seconds_or(&self, now: impl FnOnce() -> f64) -> f64 {
        if self.frame_submit_seconds == 0.0 {
            now()
        } else {
            self.frame_submit_seconds
        }
    }
}

/// What [`FrameTimingPredictor::submit_display_frame`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubmitReport {
    /// The timing that was published.
    pub timing: Timing,
    /// Per-display-frame delta recorded into the median filter, if any.
    ///
    /// `None` for the first submit, after a skip of two or more display
    /// frames, or when the display index did not advance.
    pub measured_delta: Option<f64>,
}

/// Predicts when frames reach the display.
///
/// See the [module docs](self) for the threading model.
#[derive(Debug)]
pub struct FrameTimingPredictor<C> {
    config: PredictorConfig,
    default_frame_delta: f64,
    last_timing: Timing,
    published: Arc<LocklessTiming>,
    frame_deltas: StatisticsBuffer<FRAME_DELTA_SAMPLES>,
    frame_indices: FrameIndexReconciler,
    clock: C,
    initialized: bool,
}

impl<C: Clock + Clone> FrameTimingPredictor<C> {
    /// Creates a predictor. Call [`initialize`](Self::initialize) before
    /// querying it.
    #[must_use]
    pub fn new(config: PredictorConfig, clock: C) -> Self {
        Self {
            config,
            default_frame_delta: 0.0,
            last_timing: Timing::default(),
            published: Arc::new(LocklessTiming::default()),
            frame_deltas: StatisticsBuffer::new(),
            frame_indices: FrameIndexReconciler::new(),
            clock,
            initialized: false,
        }
    }

    /// Resets all history and publishes `default_timing`.
    ///
    /// `default_timing.frame_delta` becomes the fallback delta used until
    /// enough measurements exist, and whenever the measured median looks
    /// wrong. May be called again at any time to start over.
    pub fn initialize(&mut self, default_timing: Timing) {
        self.frame_deltas.clear();
        self.frame_indices.reset();

        self.last_timing = default_timing;
        self.default_frame_delta = default_timing.frame_delta;
        self.initialized = true;

        self.published.publish(&self.last_timing);
    }

    /// Returns a handle that reads published timings from any thread.
    #[must_use]
    pub fn reader(&self) -> TimingReader<C> {
        TimingReader {
            published: Arc::clone(&self.published),
            clock: self.clock.clone(),
        }
    }

    /// Predicted timing for `app_frame_index`.
    ///
    /// `app_frame_index` must be 0 or the last submitted app frame + 1.
    #[must_use]
    pub fn app_frame_timing(&self, app_frame_index: u32) -> Timing {
        debug_assert!(self.initialized, "timing queried before initialize");
        app_frame_timing_from(&self.published.load(), app_frame_index, &self.clock)
    }

    /// Predicted timing for `display_frame_index`.
    ///
    /// Used by timewarp and late-latching code that follows vsync directly.
    /// Only extrapolates forward; past indices return the last timing.
    #[must_use]
    pub fn display_frame_timing(&self, display_frame_index: u32) -> Timing {
        debug_assert!(self.initialized, "timing queried before initialize");
        self.published
            .load()
            .project_display_frame(display_frame_index, || self.clock.now_seconds())
    }

    /// Records that `display_frame_index` (carrying `app_frame_index`) starts
    /// scan-out at `scanout_start_seconds`, and publishes the updated timing.
    ///
    /// Called once per submitted frame, from the presenting thread only.
    pub fn submit_display_frame(
        &mut self,
        display_frame_index: u32,
        app_frame_index: u32,
        scanout_start_seconds: f64,
    ) -> SubmitReport {
        debug_assert!(self.initialized, "submit before initialize");

        let last = self.last_timing;
        let display_frame_delta = display_frame_index.wrapping_sub(last.display_frame_index);
        debug_assert!(
            display_frame_delta <= u32::MAX / 2,
            "display frame index went backwards: {} -> {display_frame_index}",
            last.display_frame_index
        );

        let mut measured_delta = None;
        // A jump of two or more display frames means frames were skipped;
        // the elapsed time says nothing about a single refresh.
        if last.frame_submit_seconds > 0.0 && display_frame_delta < 2 {
            if display_frame_delta > 0 {
                let delta = (scanout_start_seconds - last.frame_submit_seconds)
                    / f64::from(display_frame_delta);
                self.frame_deltas.add(delta);
                measured_delta = Some(delta);
            }
            self.last_timing.frame_delta = self.frame_delta();
        }

        self.frame_indices.add(display_frame_index, app_frame_index);

        self.last_timing.app_frame_index = app_frame_index;
        self.last_timing.display_frame_index = display_frame_index;
        self.last_timing.frame_submit_seconds = scanout_start_seconds;
        self.last_timing.app_to_display_frame_ratio =
            self.frame_indices.app_to_display_frame_ratio();

        self.published.publish(&self.last_timing);

        SubmitReport {
            timing: self.last_timing,
            measured_delta,
        }
    }

    /// The smoothed vsync-to-vsync delta.
    ///
    /// 0 with vsync off. Otherwise the median of recent measurements once
    /// enough exist, unless that median exceeds the default by more than the
    /// configured tolerance (a dropped frame got averaged in), in which case
    /// the default delta.
    pub fn frame_delta(&mut self) -> f64 {
        if !self.config.vsync_enabled {
            return 0.0;
        }
        if self.frame_deltas.count() < self.config.min_delta_samples {
            return self.default_frame_delta;
        }
        let median = self.frame_deltas.median();
        if median > self.default_frame_delta + self.config.max_delta_over_default {
            self.default_frame_delta
        } else {
            median
        }
    }

    /// Enables or disables vsync-based prediction.
    pub fn set_vsync(&mut self, enabled: bool) {
        self.config.vsync_enabled = enabled;
    }

    /// Last submitted display frame index.
    #[must_use]
    pub fn last_display_frame_index(&self) -> u32 {
        self.last_timing.display_frame_index
    }

    /// Scan-out start of the last submitted display frame.
    #[must_use]
    pub fn last_display_frame_seconds(&self) -> f64 {
        self.last_timing.frame_submit_seconds
    }

    /// The frame-delta samples collected so far.
    #[must_use]
    pub fn frame_delta_samples(&self) -> &StatisticsBuffer<FRAME_DELTA_SAMPLES> {
        &self.frame_deltas
    }
}

/// A cloneable, thread-safe view of a predictor's published timing.
#[derive(Clone, Debug)]
pub struct TimingReader<C> {
    published: Arc<LocklessTiming>,
    clock: C,
}

impl<C: Clock> TimingReader<C> {
    /// The most recently published timing, unprojected.
    #[must_use]
    pub fn latest(&self) -> Timing {
        self.published.load()
    }

    /// Same as [`FrameTimingPredictor::app_frame_timing`].
    #[must_use]
    pub fn app_frame_timing(&self, app_frame_index: u32) -> Timing {
        app_frame_timing_from(&self.published.load(), app_frame_index, &self.clock)
    }

    /// Same as [`FrameTimingPredictor::display_frame_timing`].
    #[must_use]
    pub fn display_frame_timing(&self, display_frame_index: u32) -> Timing {
        self.published
            .load()
            .project_display_frame(display_frame_index, || self.clock.now_seconds())
    }

    /// Frame delta of the published timing.
    #[must_use]
    pub fn frame_delta(&self) -> f64 {
        self.published.load().frame_delta
    }
}

fn app_frame_timing_from(timing: &Timing, app_frame_index: u32, clock: &impl Clock) -> Timing {
    debug_assert!(
        app_frame_index == 0 || app_frame_index == timing.app_frame_index.wrapping_add(1),
        "app frame {app_frame_index} requested after app frame {}",
        timing.app_frame_index
    );
    timing.project_app_frame(app_frame_index, || clock.now_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const HZ90: f64 = 1.0 / 90.0;

    fn default_timing() -> Timing {
        Timing {
            frame_delta: HZ90,
            app_frame_index: 0,
            display_frame_index: 0,
            frame_submit_seconds: 0.0,
            app_to_display_frame_ratio: 1.0,
        }
    }

    fn predictor(clock: &ManualClock) -> FrameTimingPredictor<ManualClock> {
        let mut p = FrameTimingPredictor::new(PredictorConfig::standard(), clock.clone());
        p.initialize(default_timing());
        p
    }

    #[test]
    fn first_frame_projects_one_refresh_ahead() {
        let clock = ManualClock::new(0.0);
        let p = predictor(&clock);
        let t = p.app_frame_timing(1);
        assert_eq!(t.display_frame_index, 1);
        assert_eq!(t.app_frame_index, 1);
        assert!((t.frame_submit_seconds - HZ90).abs() < 1e-12);
    }

    #[test]
    fn unsubmitted_timing_projects_from_now() {
        let clock = ManualClock::new(5.0);
        let p = predictor(&clock);
        let t = p.app_frame_timing(1);
        assert!((t.frame_submit_seconds - (5.0 + HZ90)).abs() < 1e-12);
    }

    #[test]
    fn queries_do_not_mutate_published_state() {
        let clock = ManualClock::new(0.0);
        let p = predictor(&clock);
        let _ = p.app_frame_timing(1);
        let _ = p.display_frame_timing(4);
        assert_eq!(p.reader().latest(), default_timing());
    }

    #[test]
    fn consecutive_submits_record_delta() {
        let clock = ManualClock::new(0.0);
        let mut p = predictor(&clock);

        let first = p.submit_display_frame(5, 5, 0.50);
        assert_eq!(first.measured_delta, None, "nothing submitted before");

        let second = p.submit_display_frame(6, 6, 0.5111);
        let delta = second.measured_delta.unwrap();
        assert!((delta - 0.0111).abs() < 1e-9);
        assert_eq!(p.frame_delta_samples().count(), 1);
    }

    #[test]
    fn skipped_frames_are_not_measured() {
        let clock = ManualClock::new(0.0);
        let mut p = predictor(&clock);
        p.submit_display_frame(1, 1, 1.0);
        let r = p.submit_display_frame(3, 2, 1.0 + 2.0 * HZ90);
        assert_eq!(r.measured_delta, None);
        assert_eq!(p.frame_delta_samples().count(), 0);
    }

    #[test]
    fn repeated_display_index_records_nothing() {
        let clock = ManualClock::new(0.0);
        let mut p = predictor(&clock);
        p.submit_display_frame(1, 1, 1.0);
        let r = p.submit_display_frame(1, 2, 1.001);
        assert_eq!(r.measured_delta, None);
        assert_eq!(p.frame_delta_samples().count(), 0);
    }

    #[test]
    fn submitted_sequence_projects_evenly() {
        let clock = ManualClock::new(0.0);
        let mut p = predictor(&clock);
        let mut previous = f64::NEG_INFINITY;
        for i in 1..=20_u32 {
            let predicted = p.app_frame_timing(i);
            assert!(predicted.frame_submit_seconds > previous);
            if i > 1 {
                let step = predicted.frame_submit_seconds - previous;
                assert!((step - p.frame_delta()).abs() < 1e-9, "step {step}");
            }
            previous = predicted.frame_submit_seconds;
            p.submit_display_frame(
                predicted.display_frame_index,
                i,
                predicted.frame_submit_seconds,
            );
        }
    }

    #[test]
    fn median_replaces_default_after_four_samples() {
        let clock = ManualClock::new(0.0);
        let mut p = predictor(&clock);
        let measured = 0.0110;
        let mut t = 1.0;
        p.submit_display_frame(1, 1, t);
        for i in 2..=4 {
            t += measured;
            p.submit_display_frame(i, i, t);
        }
        // Three samples: still the default.
        assert_eq!(p.frame_delta(), HZ90);

        t += measured;
        p.submit_display_frame(5, 5, t);
        assert!((p.frame_delta() - measured).abs() < 1e-9);
        assert!((p.reader().latest().frame_delta - measured).abs() < 1e-9);
    }

    #[test]
    fn overlong_median_falls_back_to_default() {
        let clock = ManualClock::new(0.0);
        let mut p = predictor(&clock);
        let mut t = 1.0;
        p.submit_display_frame(1, 1, t);
        for i in 2..=8 {
            // 1.5 ms longer than nominal.
            t += HZ90 + 0.0015;
            p.submit_display_frame(i, i, t);
        }
        assert_eq!(p.frame_delta(), HZ90);
    }

    #[test]
    fn vsync_off_has_zero_delta() {
        let clock = ManualClock::new(0.0);
        let mut p = FrameTimingPredictor::new(PredictorConfig::no_vsync(), clock);
        p.initialize(default_timing());
        assert_eq!(p.frame_delta(), 0.0);
        p.set_vsync(true);
        assert_eq!(p.frame_delta(), HZ90);
    }

    #[test]
    fn half_rate_app_skips_display_frames() {
        let clock = ManualClock::new(0.0);
        let mut p = predictor(&clock);
        let mut t = 1.0;
        for app in 1..=6_u32 {
            p.submit_display_frame(app * 2, app, t);
            t += 2.0 * HZ90;
        }
        assert_eq!(p.reader().latest().app_to_display_frame_ratio, 0.5);

        let next = p.app_frame_timing(7);
        assert_eq!(next.display_frame_index, 14);
        let expected = p.last_display_frame_seconds() + 2.0 * next.frame_delta;
        assert!((next.frame_submit_seconds - expected).abs() < 1e-12);
    }

    #[test]
    fn display_frame_timing_only_moves_forward() {
        let clock = ManualClock::new(0.0);
        let mut p = predictor(&clock);
        p.submit_display_frame(10, 10, 2.0);

        let ahead = p.display_frame_timing(13);
        assert_eq!(ahead.display_frame_index, 13);
        assert_eq!(ahead.app_frame_index, 10);
        assert!((ahead.frame_submit_seconds - (2.0 + 3.0 * HZ90)).abs() < 1e-12);

        let behind = p.display_frame_timing(7);
        assert_eq!(behind, p.reader().latest());
        assert_eq!(p.last_display_frame_index(), 10);
    }

    #[test]
    fn reinitialize_clears_history() {
        let clock = ManualClock::new(0.0);
        let mut p = predictor(&clock);
        let mut t = 1.0;
        for i in 1..=8 {
            p.submit_display_frame(i, i, t);
            t += 0.0105;
        }
        assert!(p.frame_delta_samples().count() > 0);

        p.initialize(default_timing());
        assert_eq!(p.frame_delta_samples().count(), 0);
        assert_eq!(p.reader().latest(), default_timing());
        assert_eq!(p.frame_delta(), HZ90);
    }

    #[test]
    fn zero_ratio_default_is_treated_as_one_to_one() {
        let t = Timing {
            frame_delta: 0.01,
            frame_submit_seconds: 1.0,
            ..Timing::default()
        };
        let next = t.project_app_frame(1, || -> f64 { unreachable!("submit time is known") });
        assert_eq!(next.display_frame_index, 1);
        assert!((next.frame_submit_seconds - 1.01).abs() < 1e-12);
    }

    #[test]
    fn reader_is_usable_from_another_thread() {
        let clock = ManualClock::new(0.0);
        let mut p = predictor(&clock);
        p.submit_display_frame(3, 3, 1.0);
        let reader = p.reader();
        let t = std::thread::spawn(move || reader.app_frame_timing(4))
            .join()
            .unwrap();
        assert_eq!(t.app_frame_index, 4);
        assert_eq!(t.display_frame_index, 4);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "display frame index went backwards")]
    fn backwards_display_index_is_a_contract_violation() {
        let clock = ManualClock::new(0.0);
        let mut p = predictor(&clock);
        p.submit_display_frame(10, 10, 1.0);
        p.submit_display_frame(9, 11, 1.011);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "app frame 7 requested after app frame 3")]
    fn skipped_app_frame_is_a_contract_violation() {
        let clock = ManualClock::new(0.0);
        let mut p = predictor(&clock);
        p.submit_display_frame(3, 3, 1.0);
        let _ = p.reader().app_frame_timing(7);
    }
}
