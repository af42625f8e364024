//! Queue manager
//!
//! Owns track order, the current cursor and the shuffle/repeat policy.
//! Nothing outside this module moves the cursor.
//!
//! ```text
//!   tracks:  [A] [B] [C]
//!                 ^
//!            current_index = 1
//! ```
//!
//! Forward movement honors repeat mode and can run out of tracks; backward
//! movement always wraps.

use crate::error::{PlaybackError, Result};
use crate::types::{RepeatMode, Track};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Outcome of moving the queue cursor
#[derive(Debug, Clone, PartialEq)]
pub struct QueueStep {
    /// Track under the cursor after the move
    pub track: Option<Track>,

    /// The cursor could not advance (end of queue without repeat, or empty queue)
    pub exhausted: bool,
}

impl QueueStep {
    fn empty() -> Self {
        Self {
            track: None,
            exhausted: true,
        }
    }
}

/// Ordered playback queue with a cursor
#[derive(Debug, Clone)]
pub struct Queue {
    tracks: Vec<Track>,

    /// `Some` exactly when `tracks` is non-empty
    current_index: Option<usize>,

    shuffle: bool,
    repeat: RepeatMode,

    rng: StdRng,
}

impl Queue {
    /// Create an empty queue with an entropy-seeded shuffle picker
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty queue whose shuffle picks are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            tracks: Vec::new(),
            current_index: None,
            shuffle: false,
            repeat: RepeatMode::None,
            rng,
        }
    }

    /// Replace the queue wholesale
    ///
    /// An empty list is always accepted and leaves no current track. For a
    /// non-empty list `start_index` must be in bounds, otherwise the queue
    /// is left untouched.
    pub fn load(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        if tracks.is_empty() {
            self.tracks.clear();
            self.current_index = None;
            return Ok(());
        }
        if start_index >= tracks.len() {
            return Err(PlaybackError::InvalidIndex {
                index: start_index,
                len: tracks.len(),
            });
        }
        debug!(len = tracks.len(), start_index, "Queue loaded");
        self.tracks = tracks;
        self.current_index = Some(start_index);
        Ok(())
    }

    /// Move the cursor to `index`
    pub fn jump_to(&mut self, index: usize) -> Result<&Track> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::InvalidIndex {
                index,
                len: self.tracks.len(),
            });
        }
        self.current_index = Some(index);
        Ok(&self.tracks[index])
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.tracks.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Takes effect on the next `next()`/`prev()`
    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Takes effect on the next `next()`/`prev()`
    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Advance the cursor
    ///
    /// - shuffle: uniformly random index, possibly the current one
    /// - repeat One: cursor stays put
    /// - otherwise one step forward; past the end wraps on repeat All,
    ///   else stays on the last track and reports `exhausted`
    pub fn next(&mut self) -> QueueStep {
        let Some(current) = self.current_index else {
            return QueueStep::empty();
        };
        let len = self.tracks.len();

        let (index, exhausted) = if self.shuffle {
            (self.random_index(), false)
        } else if self.repeat == RepeatMode::One {
            (current, false)
        } else if current + 1 < len {
            (current + 1, false)
        } else if self.repeat == RepeatMode::All {
            (0, false)
        } else {
            (len - 1, true)
        };

        self.step_to(index, exhausted)
    }

    /// Move the cursor backward
    ///
    /// Shuffle picks randomly like `next()`. Otherwise the cursor always
    /// wraps from the first track to the last, regardless of repeat mode.
    pub fn prev(&mut self) -> QueueStep {
        let Some(current) = self.current_index else {
            return QueueStep::empty();
        };
        let len = self.tracks.len();

        let index = if self.shuffle {
            self.random_index()
        } else {
            (current + len - 1) % len
        };

        self.step_to(index, false)
    }

    fn random_index(&mut self) -> usize {
        self.rng.gen_range(0..self.tracks.len())
    }

    fn step_to(&mut self, index: usize, exhausted: bool) -> QueueStep {
        debug!(
            from = ?self.current_index,
            to = index,
            exhausted,
            "Queue cursor moved"
        );
        self.current_index = Some(index);
        QueueStep {
            track: self.tracks.get(index).cloned(),
            exhausted,
        }
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}
