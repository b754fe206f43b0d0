// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable thresholds for the predictor and the latency tester.
//!
//! The defaults were tuned against a 75–90 Hz head-mounted display with a
//! pixel-readback latency tester. They change observable behavior, so adjust
//! them per device rather than re-deriving them.

/// Configuration for [`FrameTimingPredictor`](crate::timing::FrameTimingPredictor).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictorConfig {
    /// Whether presentation is synchronized to vsync. When off, the smoothed
    /// frame delta is always 0.
    pub vsync_enabled: bool,
    /// Measured deltas needed before the median replaces the default delta.
    pub min_delta_samples: usize,
    /// A median frame delta longer than `default + max_delta_over_default`
    /// seconds is assumed to include dropped frames and is ignored.
    pub max_delta_over_default: f64,
}

impl PredictorConfig {
    /// Vsync on, 4 samples, 1 ms tolerance.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            vsync_enabled: true,
            min_delta_samples: 4,
            max_delta_over_default: 0.001,
        }
    }

    /// Same as [`standard`](Self::standard) with vsync disabled.
    #[must_use]
    pub const fn no_vsync() -> Self {
        Self {
            vsync_enabled: false,
            ..Self::standard()
        }
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Configuration for [`LatencyTester`](crate::latency::LatencyTester).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatencyTesterConfig {
    /// Whether the tester issues test colors at all.
    pub enabled: bool,
    /// Present → scan-out deltas at or above this many seconds are dropped
    /// from the smoothed statistics (window drags and similar stalls).
    pub outlier_reject_seconds: f64,
    /// A full cycle whose newest sample has gone unanswered for this long is
    /// abandoned.
    pub stale_cycle_seconds: f64,
    /// Latency results older than this are reported as unavailable.
    pub availability_window_seconds: f64,
    /// Post-present samples required before a vsync → scan-out value is
    /// reported.
    pub min_vsync_samples: usize,
    /// Smallest plausible vsync → scan-out median, in seconds.
    pub vsync_to_scanout_min: f64,
    /// Largest plausible vsync → scan-out median, in seconds.
    pub vsync_to_scanout_max: f64,
}

impl LatencyTesterConfig {
    /// 100 ms outlier cut, 150 ms stale cycles, 2 s availability,
    /// [-20 ms, 60 ms] sanity window.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            enabled: true,
            outlier_reject_seconds: 0.100,
            stale_cycle_seconds: 0.150,
            availability_window_seconds: 2.0,
            min_vsync_samples: 4,
            vsync_to_scanout_min: -0.020,
            vsync_to_scanout_max: 0.060,
        }
    }
}

impl Default for LatencyTesterConfig {
    fn default() -> Self {
        Self::standard()
    }
}
