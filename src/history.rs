//! Bounded recall buffer for submitted command lines.
//!
//! Lines are stored oldest-first. Recall moves a cursor that wraps at both
//! ends, so Up/Down cycle through the buffer without ever hitting a dead end.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("history capacity must be greater than zero")]
    ZeroCapacity,
}

#[derive(Debug, Clone)]
pub struct HistoryCache {
    lines: Vec<String>,
    capacity: usize,
    /// `lines.len()` means "one past the newest entry".
    cursor: usize,
}

impl HistoryCache {
    pub fn new(capacity: usize) -> Result<Self, HistoryError> {
        if capacity == 0 {
            return Err(HistoryError::ZeroCapacity);
        }
        Ok(Self {
            lines: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append a line, collapsing a repeat of the newest entry and evicting the
    /// oldest one when full. Either way the cursor parks past the newest entry.
    pub fn insert(&mut self, line: &str) {
        if self.lines.last().is_some_and(|last| last == line) {
            self.cursor = self.lines.len();
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.remove(0);
        }
        self.lines.push(line.to_string());
        self.cursor = self.lines.len();
    }

    /// Step towards older entries, wrapping from the oldest to the newest.
    pub fn recall_previous(&mut self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        self.cursor = match self.cursor {
            0 => self.lines.len() - 1,
            idx => (idx - 1).min(self.lines.len() - 1),
        };
        self.lines[self.cursor].clone()
    }

    /// Step towards newer entries, wrapping from the newest to the oldest.
    pub fn recall_next(&mut self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        self.cursor += 1;
        if self.cursor >= self.lines.len() {
            self.cursor = 0;
        }
        self.lines[self.cursor].clone()
    }
}
