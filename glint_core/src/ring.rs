// Copyright 2026 the Glint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-capacity circular buffer.
//!
//! [`RingBuffer`] keeps the `N` most recent values pushed into it. Storage is
//! an inline array, so a buffer never allocates after construction. Both the
//! statistics window and the frame-index reconciler are built on it.

/// A fixed-capacity circular buffer that overwrites its oldest value once
/// full.
///
/// Iteration and [`get`](Self::get) are ordered oldest → newest.
#[derive(Clone, Debug)]
pub struct RingBuffer<T, const N: usize> {
    data: [T; N],
    /// Slot the next push writes to.
    head: usize,
    len: usize,
}

impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default, const N: usize> RingBuffer<T, N> {
    /// Creates an empty buffer.
    ///
    /// # Panics
    ///
    /// Panics if `N` is zero.
    #[must_use]
    pub fn new() -> Self {
        assert!(N > 0, "ring buffer capacity must not be zero");
        Self {
            data: [T::default(); N],
            head: 0,
            len: 0,
        }
    }

    /// Appends a value, overwriting the oldest one if the buffer is full.
    pub fn push(&mut self, value: T) {
        self.data[self.head] = value;
        self.head += 1;
        if self.head == N {
            self.head = 0;
        }
        if self.len < N {
            self.len += 1;
        }
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Returns the value at logical position `index` (0 is the oldest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        Some(self.data[self.physical(index)])
    }

    /// Returns the oldest retained value.
    #[must_use]
    pub fn oldest(&self) -> Option<T> {
        self.get(0)
    }

    /// Returns the most recently pushed value.
    #[must_use]
    pub fn newest(&self) -> Option<T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Copies the retained values into `out`, oldest first, and returns the
    /// filled prefix.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than [`len`](Self::len).
    pub fn copy_into<'a>(&self, out: &'a mut [T]) -> &'a mut [T] {
        for (slot, value) in out[..self.len].iter_mut().zip(self.iter()) {
            *slot = value;
        }
        &mut out[..self.len]
    }

    /// Iterates the retained values oldest → newest.
    pub fn iter(&self) -> impl Iterator<Item = T> {
        (0..self.len).map(|i| self.data[self.physical(i)])
    }

    /// Number of retained values.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been pushed since the last clear.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of retained values.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns `true` once `N` values are retained.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    /// Maps a logical position to an index into `data`.
    fn physical(&self, index: usize) -> usize {
        // `head` is the oldest slot once full; before that, slot 0 is.
        let start = if self.len == N { self.head } else { 0 };
        (start + index) % N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_has_no_ends() {
        let ring = RingBuffer::<u32, 4>::new();
        assert!(ring.is_empty());
        assert_eq!(ring.oldest(), None);
        assert_eq!(ring.newest(), None);
        assert_eq!(ring.capacity(), 4);
    }

    #[test]
    fn fills_then_overwrites_oldest() {
        let mut ring = RingBuffer::<u32, 3>::new();
        ring.push(1);
        ring.push(2);
        assert_eq!(ring.len(), 2);
        assert!(!ring.is_full());
        assert_eq!(ring.oldest(), Some(1));
        assert_eq!(ring.newest(), Some(2));

        ring.push(3);
        ring.push(4);
        ring.push(5);
        assert!(ring.is_full());
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.oldest(), Some(3));
        assert_eq!(ring.newest(), Some(5));

        let mut seen = [0_u32; 3];
        for (slot, v) in seen.iter_mut().zip(ring.iter()) {
            *slot = v;
        }
        assert_eq!(seen, [3, 4, 5]);
    }

    #[test]
    fn clear_resets_positions() {
        let mut ring = RingBuffer::<u32, 2>::new();
        ring.push(7);
        ring.push(8);
        ring.push(9);
        ring.clear();
        assert!(ring.is_empty());
        ring.push(10);
        assert_eq!(ring.oldest(), Some(10));
        assert_eq!(ring.newest(), Some(10));
    }

    #[test]
    fn copy_into_returns_live_prefix() {
        let mut ring = RingBuffer::<f64, 4>::new();
        ring.push(1.5);
        ring.push(-2.0);
        let mut scratch = [0.0; 4];
        let live = ring.copy_into(&mut scratch);
        assert_eq!(live, &[1.5, -2.0]);
    }
}
