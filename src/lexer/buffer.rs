use std::collections::VecDeque;

use crate::Position;

/// Capacity used by the scanner. Two slots are enough for every lookahead
/// the scanner performs; the rest is headroom.
pub const BUFFER_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub ch: char,
    /// Position the scanner was at before this character was read.
    pub position: Position,
}

/// Ring buffer of recently read characters supporting un-reading.
///
/// Entries older than the capacity are forgotten; `unread` past them
/// returns `None`.
#[derive(Debug, Clone)]
pub struct Buffer {
    history: VecDeque<Entry>,
    capacity: usize,
    /// Number of entries that have been un-read and will be replayed.
    pending: usize,
}

impl Buffer {
    pub fn new(capacity: usize) -> Self {
        Buffer {
            history: VecDeque::with_capacity(capacity),
            capacity: capacity.max(2),
            pending: 0,
        }
    }

    /// Replays the oldest un-read entry, if any.
    pub fn replay(&mut self) -> Option<Entry> {
        if self.pending == 0 {
            return None;
        }

        let entry = self.history[self.history.len() - self.pending];
        self.pending -= 1;
        Some(entry)
    }

    /// Records a freshly read character.
    pub fn push(&mut self, entry: Entry) {
        debug_assert_eq!(self.pending, 0);
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(entry);
    }

    /// Steps back over the most recently read entry.
    pub fn unread(&mut self) -> Option<Entry> {
        if self.pending >= self.history.len() {
            return None;
        }

        self.pending += 1;
        Some(self.history[self.history.len() - self.pending])
    }
}
