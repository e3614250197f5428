//! Fixed-capacity FIFO buffer

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default capacity for every bounded buffer in the system
pub const HISTORY_SIZE: usize = 1000;

/// FIFO of at most `capacity` entries; pushing into a full buffer evicts the oldest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// Create an empty history. A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, returning how many old entries were evicted
    pub fn push(&mut self, value: T) -> usize {
        self.entries.push_back(value);
        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Replace the contents with the first `capacity` items of `items`.
    ///
    /// Anything past capacity is dropped from the back, so the oldest items
    /// of an oversized batch win over the newest.
    pub fn replace_keep_front(&mut self, items: impl IntoIterator<Item = T>) {
        self.entries.clear();
        self.entries.extend(items.into_iter().take(self.capacity));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn oldest(&self) -> Option<&T> {
        self.entries.front()
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Iterate oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> BoundedHistory<T> {
    /// Copy the entries out, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

impl<T> Default for BoundedHistory<T> {
    fn default() -> Self {
        Self::new(HISTORY_SIZE)
    }
}

impl<'a, T> IntoIterator for &'a BoundedHistory<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
