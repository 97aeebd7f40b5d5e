//! Fixed-capacity sample histories.
//!
//! Slots are allocated once; `push` overwrites the oldest slot when full.

use crate::Position;

/// Ring buffer that keeps the most recent `capacity` samples in insertion order.
#[derive(Debug, Clone)]
pub struct History<T> {
    slots: Vec<T>,
    head: usize, // next write index
    len: usize,
}

/// Recent position samples, oldest first.
pub type PositionHistory = History<Position>;

/// Recent planar distances to the goal, oldest first.
pub type DistanceHistory = History<f64>;

impl<T: Copy + Default> History<T> {
    /// Creates an empty history. A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![T::default(); capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    /// Appends `value`, evicting the oldest entry when at capacity.
    pub fn push(&mut self, value: T) {
        let capacity = self.slots.len();
        self.slots[self.head] = value;
        self.head = (self.head + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
    }

    /// Entry `index` counted from the oldest (0 = oldest).
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        let capacity = self.slots.len();
        let start = (self.head + capacity - self.len) % capacity;
        Some(self.slots[(start + index) % capacity])
    }

    /// Entry `back` steps behind the newest (0 = newest).
    pub fn get_back(&self, back: usize) -> Option<T> {
        if back >= self.len {
            return None;
        }
        self.get(self.len - 1 - back)
    }

    pub fn first(&self) -> Option<T> {
        self.get(0)
    }

    pub fn last(&self) -> Option<T> {
        self.get_back(0)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        let h: History<f64> = History::new(5);
        assert!(h.is_empty());
        assert_eq!(h.first(), None);
        assert_eq!(h.last(), None);
        assert_eq!(h.capacity(), 5);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut h = History::new(3);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            h.push(v);
            assert!(h.len() <= 3);
        }
        assert!(h.is_full());
        assert_eq!(h.first(), Some(3.0));
        assert_eq!(h.last(), Some(5.0));
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
        assert_eq!(h.get_back(1), Some(4.0));
        assert_eq!(h.get(3), None);
    }

    #[test]
    fn test_partial_fill_order() {
        let mut h = History::new(5);
        h.push(7.0);
        h.push(8.0);
        assert_eq!(h.first(), Some(7.0));
        assert_eq!(h.last(), Some(8.0));
        assert_eq!(h.get_back(2), None);
    }

    #[test]
    fn test_clear_and_zero_capacity() {
        let mut h = History::new(0);
        assert_eq!(h.capacity(), 1);
        h.push(1.0);
        h.push(2.0);
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![2.0]);
        h.clear();
        assert!(h.is_empty());
        h.push(3.0);
        assert_eq!(h.first(), Some(3.0));
    }

    #[test]
    fn test_position_history() {
        let mut h = PositionHistory::new(2);
        h.push(Position::new(0.0, 0.0, 0.0));
        h.push(Position::new(1.0, 0.0, 0.0));
        h.push(Position::new(2.0, 0.0, 1.0));
        assert_eq!(h.first(), Some(Position::new(1.0, 0.0, 0.0)));
        assert_eq!(h.last(), Some(Position::new(2.0, 0.0, 1.0)));
    }
}
