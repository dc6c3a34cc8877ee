//! Bounded transcript of human-readable game lines.
//!
//! The reducer emits a line for published claims and vote results; the
//! transcript keeps the most recent ones for the frontend to render.
//! Old lines fall off the front once the bound is reached.

use std::collections::VecDeque;

/// Default number of transcript lines retained.
pub const DEFAULT_TRANSCRIPT_CAPACITY: usize = 100;

/// A bounded, append-only log of display lines.
#[derive(Debug)]
pub struct Transcript {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Transcript {
    /// Create a transcript retaining at most `capacity` lines.
    pub const fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    /// Append a line, evicting the oldest if at capacity.
    pub fn push(&mut self, line: String) {
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// All retained lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// The `n` most recent lines, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &str> {
        let skip = self.lines.len().saturating_sub(n);
        self.lines.iter().skip(skip).map(String::as_str)
    }

    /// Number of retained lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIPT_CAPACITY)
    }
}
