// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wall-clock time sources.
//!
//! Every time value in this crate is monotonic seconds as `f64`. The core
//! never reads the platform clock directly; components own a [`Clock`] and
//! consult it only where a query needs "now" (projecting from a timing that
//! has never been submitted, or aging out latency results).
//!
//! - [`ManualClock`] — shared, explicitly driven time for tests and
//!   simulations.
//! - [`MonotonicClock`] — `std::time::Instant` based (requires `std`).
//! - Any `Fn() -> f64` closure is also a clock.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

/// A monotonic time source reporting seconds.
pub trait Clock {
    /// Returns the current time in seconds.
    fn now_seconds(&self) -> f64;
}

impl<F: Fn() -> f64> Clock for F {
    #[inline]
    fn now_seconds(&self) -> f64 {
        self()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time value, so a simulation can hand one clone to
/// each component and advance them all at once.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock reading `seconds`.
    #[must_use]
    pub fn new(seconds: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(seconds.to_bits())),
        }
    }

    /// Sets the current time.
    pub fn set(&self, seconds: f64) {
        self.bits.store(seconds.to_bits(), Ordering::Release);
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.set(self.now_seconds() + seconds);
    }
}

impl Clock for ManualClock {
    fn now_seconds(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// Seconds elapsed since the clock was created, read from
/// [`std::time::Instant`].
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    epoch: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Creates a clock whose zero is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for MonotonicClock {
    fn now_seconds(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}
