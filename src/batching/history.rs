//! Bounded rolling histories for step statistics.
//!
//! A [`RollingWindow`] is an owned ring buffer with a fixed capacity: new
//! entries evict the oldest once the window is full, so memory stays
//! bounded for arbitrarily long runs. It supports reading the most recent
//! `n` entries (for windowed statistics) and an explicit
//! [`clear`](RollingWindow::clear), the only deletion path besides
//! eviction.
use std::collections::VecDeque;

/// Fixed-capacity ring buffer over `Copy` values.
#[derive(Debug, Clone)]
pub struct RollingWindow<T: Copy> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T: Copy> RollingWindow<T> {
    /// Create an empty window holding at most `capacity` entries.
    ///
    /// A zero capacity would make every push a no-op; that is a programmer
    /// error and is guarded by a debug assertion.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "rolling window capacity must be positive");
        Self { buf: VecDeque::with_capacity(capacity), capacity }
    }

    /// Append a value, evicting the oldest entry when the window is full.
    pub fn push(&mut self, value: T) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
    }

    /// Number of retained entries (at most the capacity).
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the window holds no entries.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Iterate the retained entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }

    /// Iterate the most recent `n` entries, oldest of those first.
    ///
    /// Yields fewer than `n` items when the window holds fewer.
    pub fn last_n(&self, n: usize) -> impl Iterator<Item = &T> {
        self.buf.iter().skip(self.buf.len().saturating_sub(n))
    }

    /// Drop every retained entry.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Eviction order at capacity.
    // - `last_n` behavior below and above the retained length.
    // - Clearing.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that pushing beyond capacity evicts the oldest entries.
    //
    // Given
    // -----
    // - A window of capacity 3 receiving the values 1..=5.
    //
    // Expect
    // ------
    // - The window retains exactly [3, 4, 5], oldest first.
    fn push_beyond_capacity_evicts_oldest() {
        // Arrange
        let mut window = RollingWindow::new(3);

        // Act
        for value in 1..=5 {
            window.push(value);
        }

        // Assert
        assert_eq!(window.len(), 3);
        assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    // Purpose
    // -------
    // Check `last_n` for both a partial window and a request larger than
    // the retained length.
    //
    // Given
    // -----
    // - A window of capacity 10 holding [1.0, 2.0, 3.0, 4.0].
    //
    // Expect
    // ------
    // - `last_n(2)` yields [3.0, 4.0]; `last_n(10)` yields all four.
    fn last_n_returns_most_recent_entries() {
        // Arrange
        let mut window = RollingWindow::new(10);
        for value in [1.0, 2.0, 3.0, 4.0] {
            window.push(value);
        }

        // Assert
        assert_eq!(window.last_n(2).copied().collect::<Vec<_>>(), vec![3.0, 4.0]);
        assert_eq!(window.last_n(10).count(), 4);
    }

    #[test]
    // Purpose
    // -------
    // Verify that `clear` drops every entry and leaves the window usable.
    //
    // Given
    // -----
    // - A window with entries, then cleared, then pushed again.
    //
    // Expect
    // ------
    // - Empty after clear; the later push is retained.
    fn clear_empties_the_window() {
        // Arrange
        let mut window = RollingWindow::new(4);
        window.push(7);
        window.push(8);

        // Act
        window.clear();

        // Assert
        assert!(window.is_empty());
        window.push(9);
        assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![9]);
    }
}
