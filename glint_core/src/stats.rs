// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rolling-window statistics with a quickselect median.
//!
//! [`StatisticsBuffer`] keeps the `N` most recent samples and answers
//! median/min/max/mean queries. Statistics are recomputed lazily: `add` only
//! marks them stale, and the next query that needs them pays for the
//! recompute.
//!
//! The median is found with [`select_median`], an in-place partial selection
//! over a scratch copy of the window. For an even sample count it returns the
//! *lower* of the two middle elements, never their average.

use crate::ring::RingBuffer;

/// Summary of the samples currently in a [`StatisticsBuffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    /// Smallest retained sample.
    pub min: f64,
    /// Largest retained sample.
    pub max: f64,
    /// Arithmetic mean of the retained samples.
    pub mean: f64,
    /// Lower median of the retained samples.
    pub median: f64,
}

/// Returns the lower median of `values`, partially reordering the slice.
///
/// This is the classic median-of-three quickselect (Numerical Recipes §8.5):
/// it partitions around a pivot until the element at index `(len - 1) / 2` is
/// in its sorted position, in O(n) average time. Ties resolve to the single
/// middle index, so an even-length slice yields the lower of the two middle
/// values.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn select_median(values: &mut [f64]) -> Option<f64> {
    let last = values.len().checked_sub(1)?;
    let median = last / 2;
    let mut low = 0;
    let mut high = last;

    loop {
        if high <= low {
            return Some(values[median]);
        }
        if high == low + 1 {
            if values[low] > values[high] {
                values.swap(low, high);
            }
            return Some(values[median]);
        }

        // Median of low, middle and high ends up in `low`; the largest of the
        // three sits at `high` and bounds the upward scan below.
        let middle = (low + high) / 2;
        if values[middle] > values[high] {
            values.swap(middle, high);
        }
        if values[low] > values[high] {
            values.swap(low, high);
        }
        if values[middle] > values[low] {
            values.swap(middle, low);
        }
        values.swap(middle, low + 1);

        let mut ll = low + 1;
        let mut hh = high;
        loop {
            ll += 1;
            while values[low] > values[ll] {
                ll += 1;
            }
            hh -= 1;
            while values[hh] > values[low] {
                hh -= 1;
            }
            if hh < ll {
                break;
            }
            values.swap(ll, hh);
        }

        // Pivot back into its final position.
        values.swap(low, hh);

        if hh <= median {
            low = ll;
        }
        if hh >= median {
            high = hh - 1;
        }
    }
}

/// A rolling window of up to `N` samples with cached statistics.
///
/// No validation is applied to added values; callers filter outliers before
/// calling [`add`](Self::add).
#[derive(Clone, Debug)]
pub struct StatisticsBuffer<const N: usize> {
    samples: RingBuffer<f64, N>,
    scratch: [f64; N],
    cached: Stats,
    dirty: bool,
}

impl<const N: usize> Default for StatisticsBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> StatisticsBuffer<N> {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: RingBuffer::new(),
            scratch: [0.0; N],
            cached: Stats::default(),
            dirty: false,
        }
    }

    /// Drops all samples and zeroes the cached statistics.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.cached = Stats::default();
        self.dirty = false;
    }

    /// Records a sample, evicting the oldest one once the window is full.
    pub fn add(&mut self, value: f64) {
        self.samples.push(value);
        self.dirty = true;
    }

    /// Number of retained samples.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.samples.len()
    }

    /// Window size.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns `true` once the window holds `N` samples.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    /// Returns the lower median of the window, or 0 when empty.
    pub fn median(&mut self) -> f64 {
        self.refresh();
        self.cached.median
    }

    /// Returns min/max/mean/median, or `None` when no samples are retained.
    pub fn stats(&mut self) -> Option<Stats> {
        if self.samples.is_empty() {
            return None;
        }
        self.refresh();
        Some(self.cached)
    }

    fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        self.cached = Stats::default();

        let live = self.samples.copy_into(&mut self.scratch);
        let Some(median) = select_median(live) else {
            return;
        };

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for value in self.samples.iter() {
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }
        // Rounding in the sum can push the mean a hair outside [min, max]
        // when every sample is equal.
        let mean = (sum / self.samples.len() as f64).clamp(min, max);

        self.cached = Stats {
            min,
            max,
            mean,
            median,
        };

        debug_assert!(
            min <= median && median <= max,
            "median {median} outside [{min}, {max}]"
        );
    }
}
