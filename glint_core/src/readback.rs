// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel-readback records reported by a latency-testing device.
//!
//! The renderer paints a test quad in one of a few gray levels. Each level
//! encodes a small *readback index*; the device reports which level it saw
//! and when. Index 0 means "no test pattern".
//!
//! ```text
//!   color:   0 ─ 16 ─ 32 ─ 48 ─ 64 ─ … ─ 240 ─ 255
//!   index:   └──0──┘  └──1──┘          └──7──┘
//!            centers at i * 32 + 16, accepted within ±10
//! ```

use core::ops::Index;

/// Gray-level distance between adjacent readback indices.
pub const COLOR_INCREMENT: u8 = 32;

/// Maximum distance (exclusive) from a bucket center for a color to decode.
pub const PIXEL_TEST_THRESHOLD: i16 = 10;

/// Number of distinct readback indices, including 0.
pub const INCREMENT_COUNT: u8 = 8;

/// Test frames issued per latency cycle; every index except 0.
pub const FRAMES_TRACKED: usize = INCREMENT_COUNT as usize - 1;

/// Number of records in a [`FrameTimeRecordSet`].
pub const RECORD_COUNT: usize = 4;

const RECORD_MASK: usize = RECORD_COUNT - 1;

/// Color to paint for `readback_index`.
#[must_use]
pub fn readback_index_to_color(readback_index: u8) -> u8 {
    debug_assert!(
        readback_index < INCREMENT_COUNT,
        "readback index {readback_index} out of range"
    );
    (readback_index % INCREMENT_COUNT) * COLOR_INCREMENT + COLOR_INCREMENT / 2
}

/// Decodes an observed color, or `None` if it falls between buckets.
#[must_use]
pub fn color_to_readback_index(color: u8) -> Option<u8> {
    // Bucket from the raw color; subtracting the half step first would round
    // the low edge of each bucket into the previous one.
    let index = color / COLOR_INCREMENT;
    let offset = i16::from(color) - i16::from(COLOR_INCREMENT / 2);
    let delta = offset - i16::from(index) * i16::from(COLOR_INCREMENT);
    (delta.abs() < PIXEL_TEST_THRESHOLD).then_some(index)
}

/// One observation: a readback index and when it was on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTimeRecord {
    /// Decoded readback index.
    pub readback_index: u8,
    /// Time the pixel was observed, in seconds.
    pub time_seconds: f64,
}

/// The most recent [`RECORD_COUNT`] records from the device.
///
/// Indexing is logical: `set[0]` is the oldest record and
/// `set[RECORD_COUNT - 1]` the newest. A fresh set holds all-zero records,
/// which is also what the device reports when no test pattern is visible.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTimeRecordSet {
    records: [FrameTimeRecord; RECORD_COUNT],
    next_write_index: usize,
}

impl FrameTimeRecordSet {
    /// Creates an all-zero set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the oldest record.
    pub fn add_value(&mut self, readback_index: u8, time_seconds: f64) {
        self.records[self.next_write_index] = FrameTimeRecord {
            readback_index,
            time_seconds,
        };
        self.next_write_index = (self.next_write_index + 1) & RECORD_MASK;
    }

    /// The newest record.
    #[must_use]
    pub fn most_recent(&self) -> FrameTimeRecord {
        self.records[self.next_write_index.wrapping_sub(1) & RECORD_MASK]
    }

    /// Logical position of the first record at or after `start` carrying
    /// `readback_index`.
    #[must_use]
    pub fn find_readback_index(&self, start: usize, readback_index: u8) -> Option<usize> {
        (start..RECORD_COUNT).find(|&i| self[i].readback_index == readback_index)
    }

    /// Returns `true` if every record carries index 0.
    #[must_use]
    pub fn is_all_zeroes(&self) -> bool {
        self.records.iter().all(|r| r.readback_index == 0)
    }

    /// Records from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &FrameTimeRecord> {
        (0..RECORD_COUNT).map(|i| &self[i])
    }
}

impl Index<usize> for FrameTimeRecordSet {
    type Output = FrameTimeRecord;

    fn index(&self, index: usize) -> &FrameTimeRecord {
        &self.records[(self.next_write_index + index) & RECORD_MASK]
    }
}
