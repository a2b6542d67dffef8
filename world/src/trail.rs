//! Bounded trail storage with tail-erase semantics.

use std::collections::VecDeque;

use slither_core::{GridCoord, INITIAL_TRAIL_LENGTH, TRAIL_CAPACITY};

/// Cells a player retains behind its head, newest first.
///
/// The deque holds the retained cells; `retained` is how many the trail may
/// keep before the oldest cell is released. The reported length counts the
/// head as well, so a fresh trail of length two retains a single cell.
#[derive(Clone, Debug)]
pub(crate) struct Trail {
    cells: VecDeque<GridCoord>,
    retained: usize,
}

impl Trail {
    pub(crate) fn new() -> Self {
        Self {
            cells: VecDeque::with_capacity(TRAIL_CAPACITY),
            retained: INITIAL_TRAIL_LENGTH - 1,
        }
    }

    /// Clears the retained cells and restores the initial length.
    pub(crate) fn reset(&mut self) {
        self.cells.clear();
        self.retained = INITIAL_TRAIL_LENGTH - 1;
    }

    /// Total occupied cells, head included.
    pub(crate) fn length(&self) -> usize {
        self.retained + 1
    }

    /// Retains one more cell, up to capacity. Returns whether growth applied;
    /// requests beyond capacity are silently dropped.
    pub(crate) fn grow(&mut self) -> bool {
        if self.length() < TRAIL_CAPACITY {
            self.retained += 1;
            true
        } else {
            false
        }
    }

    /// Records the cell the head just vacated. Returns the oldest retained
    /// cell when the trail is already at its retained limit; that cell is the
    /// one the caller must release from the collision map.
    pub(crate) fn push(&mut self, cell: GridCoord) -> Option<GridCoord> {
        self.cells.push_front(cell);
        if self.cells.len() > self.retained {
            self.cells.pop_back()
        } else {
            None
        }
    }
}
