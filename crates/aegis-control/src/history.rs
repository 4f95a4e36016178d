// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fixed-capacity FIFO log used for the degradation history.

use std::collections::VecDeque;

/// A bounded append-only log. When full, pushing evicts the oldest entry,
/// so the log always holds the most recent `capacity` entries.
#[derive(Debug, Clone)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    /// Creates an empty log holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an entry, evicting the oldest one if the log is full.
    pub fn push(&mut self, entry: T) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries the log retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed entry, if any.
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Iterates entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T: Clone> BoundedLog<T> {
    /// Copies the entries out, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retains_most_recent_entries() {
        let mut log = BoundedLog::new(50);
        for i in 0..60 {
            log.push(i);
        }
        assert_eq!(log.len(), 50);
        let snapshot = log.snapshot();
        assert_eq!(snapshot.first(), Some(&10));
        assert_eq!(snapshot.last(), Some(&59));
    }

    #[test]
    fn iterates_oldest_first() {
        let mut log = BoundedLog::new(3);
        log.push("a");
        log.push("b");
        log.push("c");
        let order: Vec<_> = log.iter().copied().collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn latest_tracks_last_push() {
        let mut log = BoundedLog::new(2);
        assert!(log.latest().is_none());
        log.push(1);
        log.push(2);
        log.push(3);
        assert_eq!(log.latest(), Some(&3));
        assert_eq!(log.snapshot(), vec![2, 3]);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut log: BoundedLog<u8> = BoundedLog::new(0);
        assert_eq!(log.capacity(), 1);
        log.push(7);
        log.push(9);
        assert_eq!(log.snapshot(), vec![9]);
    }
}
