//! Bounded FIFO for Filter Populations
//!
//! ## Overview
//!
//! The outlier filter keeps the last `P` feature frames as its reference
//! population. `P` comes from the estimator configuration, so unlike a
//! const-generic ring buffer the capacity is chosen at runtime. Storage is
//! allocated once at construction and never grows afterwards.
//!
//! ### Memory Layout
//!
//! ```text
//! PopulationBuffer with capacity 5, after 7 pushes (values 0..=6):
//! ┌─────┬─────┬─────┬─────┬─────┐
//! │  5  │  6  │  2  │  3  │  4  │  ← physical slots
//! └─────┴─────┴─────┴─────┴─────┘
//!              ↑
//!              └── write_pos = 2 (oldest entry, overwritten next)
//!
//! Logical view (oldest → newest): [2, 3, 4, 5, 6]
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use magjoint_core::buffer::PopulationBuffer;
//!
//! let mut window = PopulationBuffer::new(3);
//! for value in 0..5 {
//!     window.push(value);
//! }
//!
//! assert!(window.is_full());
//! let values: Vec<i32> = window.iter().copied().collect();
//! assert_eq!(values, vec![2, 3, 4]);
//! ```

/// Fixed-capacity FIFO that overwrites its oldest entry when full
///
/// ## Internal Invariants
///
/// - `data.len() == capacity` for the lifetime of the buffer
/// - `write_pos < capacity`
/// - `len <= capacity`
///
/// ## Thread Safety
///
/// Not synchronised. Each estimator owns its own buffer.
#[derive(Debug, Clone)]
pub struct PopulationBuffer<T> {
    /// Slots, `None` until first written
    data: Vec<Option<T>>,

    /// Index where the next write will occur
    write_pos: usize,

    /// Current number of valid entries
    len: usize,
}

impl<T> PopulationBuffer<T> {
    /// Creates an empty buffer holding at most `capacity` entries
    ///
    /// A zero capacity is rejected upstream by the filter configuration; a
    /// zero-capacity buffer here silently drops every push.
    pub fn new(capacity: usize) -> Self {
        let mut data = Vec::with_capacity(capacity);
        data.resize_with(capacity, || None);

        Self {
            data,
            write_pos: 0,
            len: 0,
        }
    }

    /// Appends an entry, evicting and returning the oldest one when full
    pub fn push(&mut self, value: T) -> Option<T> {
        let capacity = self.capacity();
        if capacity == 0 {
            return Some(value);
        }

        let evicted = self.data[self.write_pos].replace(value);
        self.write_pos = (self.write_pos + 1) % capacity;

        if self.len < capacity {
            self.len += 1;
        }

        evicted
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Most recently pushed entry
    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }

        let idx = if self.write_pos == 0 {
            self.capacity() - 1
        } else {
            self.write_pos - 1
        };

        self.data[idx].as_ref()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> PopulationIter<'_, T> {
        PopulationIter {
            buffer: self,
            index: 0,
        }
    }

    /// Drop all entries, keeping the allocation
    pub fn clear(&mut self) {
        for slot in &mut self.data {
            *slot = None;
        }
        self.write_pos = 0;
        self.len = 0;
    }

    /// Entry by logical index (0 = oldest)
    ///
    /// Until the buffer first fills, logical and physical indices match.
    /// Afterwards the oldest entry sits at `write_pos`.
    fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < self.capacity() {
            index
        } else {
            (self.write_pos + index) % self.capacity()
        };

        self.data[actual_index].as_ref()
    }
}

/// Iterator over buffer contents, oldest first
pub struct PopulationIter<'a, T> {
    buffer: &'a PopulationBuffer<T>,
    index: usize,
}

impl<'a, T> Iterator for PopulationIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a, T> ExactSizeIterator for PopulationIter<'a, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer() {
        let buffer: PopulationBuffer<f64> = PopulationBuffer::new(5);
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 5);
        assert!(buffer.last().is_none());
    }

    #[test]
    fn push_and_retrieve() {
        let mut buffer = PopulationBuffer::new(5);

        assert_eq!(buffer.push(25.0), None);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.last(), Some(&25.0));
    }

    #[test]
    fn overwrite_returns_evicted() {
        let mut buffer = PopulationBuffer::new(3);

        for i in 0..3 {
            assert_eq!(buffer.push(i), None);
        }

        assert_eq!(buffer.push(3), Some(0));
        assert_eq!(buffer.push(4), Some(1));
        assert!(buffer.is_full());

        let values: Vec<i32> = buffer.iter().copied().collect();
        assert_eq!(values, vec![2, 3, 4]);
        assert_eq!(buffer.last(), Some(&4));
    }

    #[test]
    fn iterator_reports_exact_length() {
        let mut buffer = PopulationBuffer::new(4);
        buffer.push(1);
        buffer.push(2);

        let iter = buffer.iter();
        assert_eq!(iter.len(), 2);
    }

    #[test]
    fn clear_resets_order() {
        let mut buffer = PopulationBuffer::new(2);
        buffer.push(1);
        buffer.push(2);
        buffer.push(3);
        buffer.clear();

        assert!(buffer.is_empty());
        buffer.push(7);
        let values: Vec<i32> = buffer.iter().copied().collect();
        assert_eq!(values, vec![7]);
    }

    #[test]
    fn zero_capacity_drops_everything() {
        let mut buffer = PopulationBuffer::new(0);
        assert_eq!(buffer.push(1), Some(1));
        assert!(buffer.is_empty());
        assert!(buffer.is_full());
    }
}
