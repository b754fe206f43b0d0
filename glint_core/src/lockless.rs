// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-writer, multi-reader publication of [`Timing`] snapshots.
//!
//! [`LocklessTiming`] is a sequence-counted double buffer. The writer fills
//! the slot readers are *not* using, then bumps the sequence so that slot
//! becomes current. Readers copy the current slot and re-check the sequence;
//! a snapshot is only discarded if the writer lapped the reader by two full
//! publishes during the copy, which for a five-field copy means the reader
//! was descheduled mid-read.
//!
//! Fields are stored as `AtomicU64` words so no `unsafe` is needed; the
//! sequence counter plus fences provide the all-or-nothing view.
//!
//! ```text
//!   seq:    0        1 (odd)        2        3 (odd)        4
//!           │ write #1 → slot 1 │          │ write #2 → slot 0 │
//!   current slot:  0            1                       0
//! ```

use core::sync::atomic::{AtomicU64, Ordering, fence};

use crate::timing::Timing;

const WORDS: usize = 4;

type Slot = [AtomicU64; WORDS];

fn encode(timing: &Timing) -> [u64; WORDS] {
    [
        timing.frame_delta.to_bits(),
        (u64::from(timing.display_frame_index) << 32) | u64::from(timing.app_frame_index),
        timing.frame_submit_seconds.to_bits(),
        timing.app_to_display_frame_ratio.to_bits(),
    ]
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the index word packs two u32 halves"
)]
fn decode(words: [u64; WORDS]) -> Timing {
    Timing {
        frame_delta: f64::from_bits(words[0]),
        app_frame_index: words[1] as u32,
        display_frame_index: (words[1] >> 32) as u32,
        frame_submit_seconds: f64::from_bits(words[2]),
        app_to_display_frame_ratio: f64::from_bits(words[3]),
    }
}

/// A lock-free cell holding the most recently published [`Timing`].
///
/// Exactly one thread may call [`publish`](Self::publish) at a time; any
/// number of threads may call [`load`](Self::load) concurrently. Readers
/// never block and always observe a complete snapshot.
#[derive(Debug)]
pub struct LocklessTiming {
    /// Even: idle, the slot for `seq / 2` is current. Odd: a publish is in
    /// progress into the other slot.
    seq: AtomicU64,
    slots: [Slot; 2],
}

impl Default for LocklessTiming {
    fn default() -> Self {
        Self::new(Timing::default())
    }
}

impl LocklessTiming {
    /// Creates a cell whose initial snapshot is `initial`.
    #[must_use]
    pub fn new(initial: Timing) -> Self {
        let words = encode(&initial);
        Self {
            seq: AtomicU64::new(0),
            slots: [
                words.map(AtomicU64::new),
                words.map(AtomicU64::new),
            ],
        }
    }

    /// Replaces the current snapshot.
    ///
    /// Must not be called from two threads at once.
    pub fn publish(&self, timing: &Timing) {
        let seq = self.seq.load(Ordering::Relaxed);
        debug_assert!(seq % 2 == 0, "concurrent publish on a single-writer cell");

        let target = &self.slots[slot_for(seq / 2 + 1)];
        // Readers that load the odd value still read the current slot, so
        // this store must carry the writes that filled it.
        self.seq.store(seq + 1, Ordering::Release);
        fence(Ordering::Release);

        for (word, value) in target.iter().zip(encode(timing)) {
            word.store(value, Ordering::Relaxed);
        }

        self.seq.store(seq + 2, Ordering::Release);
    }

    /// Returns the most recently published snapshot.
    #[must_use]
    pub fn load(&self) -> Timing {
        loop {
            let before = self.seq.load(Ordering::Acquire);
            let generation = before / 2;
            let slot = &self.slots[slot_for(generation)];

            let mut words = [0_u64; WORDS];
            for (out, word) in words.iter_mut().zip(slot.iter()) {
                *out = word.load(Ordering::Relaxed);
            }

            fence(Ordering::Acquire);
            let after = self.seq.load(Ordering::Relaxed);

            // The next write into this slot is generation + 2, which starts
            // by moving seq to 2 * generation + 3.
            if after < 2 * generation + 3 {
                return decode(words);
            }
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "only the low bit selects a slot"
)]
const fn slot_for(generation: u64) -> usize {
    (generation & 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(n: u32) -> Timing {
        Timing {
            frame_delta: f64::from(n) * 0.001,
            app_frame_index: n,
            display_frame_index: n.wrapping_mul(2),
            frame_submit_seconds: f64::from(n) * 0.5,
            app_to_display_frame_ratio: 0.5,
        }
    }

    #[test]
    fn load_returns_initial_snapshot() {
        let cell = LocklessTiming::new(timing(3));
        assert_eq!(cell.load(), timing(3));
    }

    #[test]
    fn publish_replaces_snapshot() {
        let cell = LocklessTiming::default();
        assert_eq!(cell.load(), Timing::default());
        for n in 1..5 {
            cell.publish(&timing(n));
            assert_eq!(cell.load(), timing(n));
        }
    }

    #[test]
    fn load_during_publish_returns_previous_snapshot() {
        let cell = LocklessTiming::new(timing(0));
        cell.publish(&timing(1));

        // Freeze a second publish halfway: sequence odd, target slot
        // partially overwritten.
        cell.seq.store(3, Ordering::Release);
        let target = &cell.slots[slot_for(2)];
        target[0].store(f64::to_bits(9.0), Ordering::Relaxed);
        target[1].store(u64::MAX, Ordering::Relaxed);

        assert_eq!(cell.load(), timing(1));
    }

    #[test]
    fn index_packing_keeps_full_range() {
        let t = Timing {
            app_frame_index: u32::MAX,
            display_frame_index: u32::MAX - 1,
            ..Timing::default()
        };
        assert_eq!(decode(encode(&t)), t);
    }

    #[test]
    fn readers_never_see_torn_snapshots() {
        use alloc::sync::Arc;
        use std::thread;

        let cell = Arc::new(LocklessTiming::new(timing(0)));
        let writer = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || {
                for n in 1..=20_000 {
                    cell.publish(&timing(n));
                }
            })
        };

        let readers: alloc::vec::Vec<_> = (0..3)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    let mut last = 0;
                    for _ in 0..20_000 {
                        let t = cell.load();
                        let n = t.app_frame_index;
                        assert_eq!(t, timing(n), "torn snapshot");
                        assert!(n >= last, "snapshots went backwards");
                        last = n;
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(cell.load(), timing(20_000));
    }
}
