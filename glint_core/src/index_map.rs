// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! App-frame to display-frame rate reconciliation.
//!
//! An application does not always produce one frame per display refresh: it
//! may deliberately run at half rate, or fall behind and skip refreshes.
//! [`FrameIndexReconciler`] remembers the last few `(display, app)` index
//! pairs reported at submit time and derives how many app frames advance per
//! display frame.

use crate::ring::RingBuffer;

/// Number of `(display, app)` pairs retained.
pub const FRAME_PAIR_CAPACITY: usize = 12;

/// Lowest ratio ever reported.
///
/// A ratio of 0.33 means the app advances one frame every three display
/// frames. Extrapolating further than that on sparse history is less accurate
/// than assuming the app keeps up.
pub const MIN_APP_TO_DISPLAY_RATIO: f64 = 0.33;

/// A display frame index paired with the app frame index submitted for it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FramePair {
    /// Hardware scan-out counter.
    pub display: u32,
    /// Application frame counter.
    pub app: u32,
}

/// Tracks recent frame-index pairs to estimate the app/display frame ratio.
#[derive(Clone, Debug, Default)]
pub struct FrameIndexReconciler {
    pairs: RingBuffer<FramePair, FRAME_PAIR_CAPACITY>,
}

impl FrameIndexReconciler {
    /// Creates an empty reconciler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets all recorded pairs.
    pub fn reset(&mut self) {
        self.pairs.clear();
    }

    /// Records a submitted frame, evicting the oldest pair once full.
    pub fn add(&mut self, display_frame_index: u32, app_frame_index: u32) {
        self.pairs.push(FramePair {
            display: display_frame_index,
            app: app_frame_index,
        });
    }

    /// Number of pairs currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no pairs are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns app frames advanced per display frame over the retained
    /// window.
    ///
    /// Only the oldest and newest pairs are compared; skipped and repeated
    /// frames in between alias badly, so fitting every pair is noisier than
    /// the endpoint delta. Returns 1.0 until three pairs exist or while the
    /// display has advanced by fewer than two frames, and never returns less
    /// than [`MIN_APP_TO_DISPLAY_RATIO`].
    #[must_use]
    pub fn app_to_display_frame_ratio(&self) -> f64 {
        if self.pairs.len() < 3 {
            return 1.0;
        }
        let (Some(oldest), Some(newest)) = (self.pairs.oldest(), self.pairs.newest()) else {
            return 1.0;
        };

        let display_delta = newest.display.wrapping_sub(oldest.display);
        let app_delta = newest.app.wrapping_sub(oldest.app);
        if display_delta < 2 {
            return 1.0;
        }

        let ratio = f64::from(app_delta) / f64::from(display_delta);
        ratio.max(MIN_APP_TO_DISPLAY_RATIO)
    }
}
