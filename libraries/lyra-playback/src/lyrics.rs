//! Timed lyrics and position synchronization
//!
//! A [`LyricTrack`] is sorted once when it is built. Lookups binary-search
//! that order and never re-sort, so the active line for a position costs
//! `O(log n)`.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};

/// A single timestamped lyric line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricLine {
    /// Offset from the start of the track
    pub timestamp_secs: f64,

    /// Display text
    pub text: String,
}

impl LyricLine {
    pub fn new(timestamp_secs: f64, text: impl Into<String>) -> Self {
        Self {
            timestamp_secs,
            text: text.into(),
        }
    }
}

/// Lyric lines sorted non-decreasing by timestamp
///
/// Lines sharing a timestamp keep the order they were given in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<LyricLine>", into = "Vec<LyricLine>")]
pub struct LyricTrack {
    lines: Vec<LyricLine>,
}

impl LyricTrack {
    /// Build a lyric track, sorting lines by timestamp
    ///
    /// Fails if any timestamp is NaN or infinite.
    pub fn new(mut lines: Vec<LyricLine>) -> Result<Self> {
        if let Some(bad) = lines.iter().find(|l| !l.timestamp_secs.is_finite()) {
            return Err(PlaybackError::InvalidLyrics(format!(
                "non-finite timestamp {} for line {:?}",
                bad.timestamp_secs, bad.text
            )));
        }
        // Stable: equal timestamps keep sequence order
        lines.sort_by(|a, b| a.timestamp_secs.total_cmp(&b.timestamp_secs));
        Ok(Self { lines })
    }

    /// Parse LRC text
    ///
    /// Accepts `[mm:ss]`, `[mm:ss.xx]` and `[mm:ss.xxx]` tags, several tags
    /// per line, and skips metadata tags such as `[ar:Artist]`. Lines with
    /// no time tag are ignored.
    pub fn parse_lrc(text: &str) -> Result<Self> {
        let mut lines = Vec::new();

        for (line_no, raw) in text.lines().enumerate() {
            let mut rest = raw.trim();
            let mut stamps = Vec::new();

            while let Some(body) = rest.strip_prefix('[') {
                let Some(end) = body.find(']') else {
                    break;
                };
                let tag = &body[..end];
                rest = &body[end + 1..];

                if tag.starts_with(|c: char| c.is_ascii_digit()) {
                    let secs = parse_time_tag(tag).ok_or_else(|| {
                        PlaybackError::InvalidLyrics(format!(
                            "line {}: bad time tag [{tag}]",
                            line_no + 1
                        ))
                    })?;
                    stamps.push(secs);
                }
            }

            let text = rest.trim();
            for secs in stamps {
                lines.push(LyricLine::new(secs, text));
            }
        }

        Self::new(lines)
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the line active at `position_secs`
    pub fn active_index(&self, position_secs: f64) -> Option<usize> {
        active_line(&self.lines, position_secs)
    }

    pub fn get(&self, index: usize) -> Option<&LyricLine> {
        self.lines.get(index)
    }
}

impl TryFrom<Vec<LyricLine>> for LyricTrack {
    type Error = PlaybackError;

    fn try_from(lines: Vec<LyricLine>) -> Result<Self> {
        Self::new(lines)
    }
}

impl From<LyricTrack> for Vec<LyricLine> {
    fn from(track: LyricTrack) -> Self {
        track.lines
    }
}

/// Index of the last line whose timestamp is at or before `position_secs`
///
/// `lines` must be sorted by timestamp. Returns `None` when the position
/// precedes every line, when `lines` is empty, or when the position is NaN.
/// Duplicate timestamps resolve to the later line.
pub fn active_line(lines: &[LyricLine], position_secs: f64) -> Option<usize> {
    lines
        .partition_point(|line| line.timestamp_secs <= position_secs)
        .checked_sub(1)
}

/// `mm:ss` or `mm:ss.fraction` → seconds
fn parse_time_tag(tag: &str) -> Option<f64> {
    let (minutes, seconds) = tag.split_once(':')?;
    if !minutes.bytes().all(|b| b.is_ascii_digit())
        || !seconds.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        || !seconds.starts_with(|c: char| c.is_ascii_digit())
    {
        return None;
    }
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    if seconds >= 60.0 {
        return None;
    }
    Some(f64::from(minutes) * 60.0 + seconds)
}

/// Tracks the active lyric line as playback position moves
///
/// Caches the last active index so callers can tell when the highlighted
/// line actually changes.
#[derive(Debug, Clone, Default)]
pub struct LyricSync {
    lyrics: Option<LyricTrack>,
    active: Option<usize>,
}

impl LyricSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the lyrics being followed and clear the active line
    pub fn set_lyrics(&mut self, lyrics: Option<LyricTrack>) {
        self.lyrics = lyrics;
        self.active = None;
    }

    pub fn lyrics(&self) -> Option<&LyricTrack> {
        self.lyrics.as_ref()
    }

    /// Recompute the active line for `position_secs`
    ///
    /// Returns `true` when the active index changed.
    pub fn update(&mut self, position_secs: f64) -> bool {
        let active = self
            .lyrics
            .as_ref()
            .and_then(|lyrics| lyrics.active_index(position_secs));
        let changed = active != self.active;
        self.active = active;
        changed
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_line(&self) -> Option<&LyricLine> {
        let index = self.active?;
        self.lyrics.as_ref()?.get(index)
    }
}
