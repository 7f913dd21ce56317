//! Bounded undo history

use std::collections::VecDeque;

use crate::undo::Snapshot;

/// Snapshots retained before the oldest is silently dropped.
const CAPACITY: usize = 5;

/// LIFO store of the most recent mutation snapshots. Pushing past
/// capacity evicts the oldest entry; its operation becomes permanent.
#[derive(Debug, Default)]
pub struct UndoHistory {
    snapshots: VecDeque<Snapshot>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self {
            snapshots: VecDeque::with_capacity(CAPACITY),
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.snapshots.len() == CAPACITY {
            if let Some(evicted) = self.snapshots.pop_front() {
                log::debug!("undo history full, dropping oldest ({})", evicted.label());
            }
        }
        self.snapshots.push_back(snapshot);
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop_back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
