//! Core types for playback management

use crate::error::{PlaybackError, Result};
use crate::lyrics::LyricTrack;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Track information for queue management
///
/// Tracks are immutable once placed in a queue. The engine hands
/// `source_uri` to the transport and never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: String,

    /// Location the transport loads audio from
    pub source_uri: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Catalog duration, used until the transport reports the real one
    #[serde(default)]
    pub duration_hint_secs: Option<f64>,

    /// Timed lyrics for this track
    #[serde(default)]
    pub lyrics: Option<LyricTrack>,
}

impl Track {
    pub fn new(
        id: impl Into<String>,
        source_uri: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_uri: source_uri.into(),
            title: title.into(),
            artist: artist.into(),
            duration_hint_secs: None,
            lyrics: None,
        }
    }

    #[must_use]
    pub fn with_duration_hint(mut self, secs: f64) -> Self {
        self.duration_hint_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn with_lyrics(mut self, lyrics: LyricTrack) -> Self {
        self.lyrics = Some(lyrics);
        self
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackState {
    /// Nothing loaded
    #[default]
    Idle,

    /// Transport is loading the current track
    Loading,

    /// Currently playing
    Playing,

    /// Loaded and paused
    Paused,

    /// Current track reached its end
    Ended,

    /// Transport reported a failure for the current track
    Error,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when queue ends
    #[default]
    None,

    /// Loop current track only
    One,

    /// Loop entire queue
    All,
}

impl RepeatMode {
    /// Next mode in button order: None → All → One → None
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::All,
            Self::All => Self::One,
            Self::One => Self::None,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::One => "one",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

impl FromStr for RepeatMode {
    type Err = PlaybackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "one" => Ok(Self::One),
            "all" => Ok(Self::All),
            other => Err(PlaybackError::InvalidConfig(format!(
                "unknown repeat mode: {other}"
            ))),
        }
    }
}

/// Read-only view of the playback engine, rebuilt on demand for the UI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub position_secs: f64,
    /// `None` until the transport reports metadata for the loaded track
    pub duration_secs: Option<f64>,
    pub volume: f64,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub current_track: Option<Track>,
    pub active_lyric_index: Option<usize>,
    pub queue_index: Option<usize>,
    pub queue_len: usize,
    /// Cause of the last transport failure, present while in `Error`
    pub error: Option<String>,
}

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub initial_volume: f64,

    /// Initial shuffle flag (default: false)
    pub initial_shuffle: bool,

    /// Initial repeat mode (default: None)
    pub initial_repeat: RepeatMode,

    /// Seed for the shuffle picker; entropy-seeded when absent
    pub shuffle_seed: Option<u64>,
}

impl PlaybackConfig {
    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot be clamped into range
    pub fn validate(&self) -> Result<()> {
        if self.initial_volume.is_nan() {
            return Err(PlaybackError::InvalidConfig(format!(
                "initial_volume must be a number, got {}",
                self.initial_volume
            )));
        }
        Ok(())
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            initial_shuffle: false,
            initial_repeat: RepeatMode::None,
            shuffle_seed: None,
        }
    }
}

/// Format seconds as `mm:ss` for position displays
///
/// Negative and non-finite inputs render as `00:00`.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.initial_volume, 1.0);
        assert!(!config.initial_shuffle);
        assert_eq!(config.initial_repeat, RepeatMode::None);
        assert_eq!(config.shuffle_seed, None);
    }

    #[test]
    fn partial_json_config_uses_defaults() {
        let config = PlaybackConfig::from_json(r#"{"initial_repeat": "all"}"#).unwrap();
        assert_eq!(config.initial_repeat, RepeatMode::All);
        assert_eq!(config.initial_volume, 1.0);
        assert!(!config.initial_shuffle);
    }

    #[test]
    fn malformed_json_config_is_rejected() {
        let err = PlaybackConfig::from_json(r#"{"initial_volume": "loud"}"#).unwrap_err();
        assert!(matches!(err, PlaybackError::InvalidConfig(_)));
    }

    #[test]
    fn nan_volume_fails_validation() {
        let config = PlaybackConfig {
            initial_volume: f64::NAN,
            ..PlaybackConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn repeat_cycles_in_button_order() {
        assert_eq!(RepeatMode::None.cycle(), RepeatMode::All);
        assert_eq!(RepeatMode::All.cycle(), RepeatMode::One);
        assert_eq!(RepeatMode::One.cycle(), RepeatMode::None);
    }

    #[test]
    fn repeat_parses_from_string() {
        assert_eq!("ONE".parse::<RepeatMode>().unwrap(), RepeatMode::One);
        assert_eq!("off".parse::<RepeatMode>().unwrap(), RepeatMode::None);
        assert!("sometimes".parse::<RepeatMode>().is_err());
        assert_eq!(RepeatMode::All.to_string(), "all");
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(59.9), "00:59");
        assert_eq!(format_clock(61.0), "01:01");
        assert_eq!(format_clock(3600.0), "60:00");
        assert_eq!(format_clock(-3.0), "00:00");
        assert_eq!(format_clock(f64::NAN), "00:00");
    }

    #[test]
    fn track_builder() {
        let track = Track::new("t1", "/assets/song.mp3", "Song", "Artist").with_duration_hint(200.0);
        assert_eq!(track.id, "t1");
        assert_eq!(track.duration_hint_secs, Some(200.0));
        assert!(track.lyrics.is_none());
    }
}
