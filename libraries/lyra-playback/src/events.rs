//! Playback Events
//!
//! Event-based communication for UI synchronization. The engine queues
//! events as it changes state; the UI drains them with
//! [`PlaybackEngine::drain_events`](crate::PlaybackEngine::drain_events)
//! after each intent or transport notification.

use crate::types::{PlaybackState, RepeatMode};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A different track was loaded
    TrackChanged {
        /// ID of the new (current) track
        track_id: String,
        /// ID of the previously loaded track (if any)
        previous_track_id: Option<String>,
    },

    /// Play head moved
    PositionChanged {
        position_secs: f64,
        /// `None` while the duration is still unknown
        duration_secs: Option<f64>,
    },

    /// Highlighted lyric line changed
    LyricLineChanged {
        /// Index into the current track's lyric lines
        index: Option<usize>,
    },

    /// Volume changed
    VolumeChanged {
        /// Clamped volume (0.0-1.0)
        volume: f64,
    },

    /// Queue replaced or cursor moved
    QueueChanged {
        length: usize,
        current_index: Option<usize>,
    },

    /// Shuffle or repeat changed
    ModesChanged { shuffle: bool, repeat: RepeatMode },

    /// Transport reported a failure
    Error {
        /// Error message
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = PlaybackEvent::StateChanged {
            state: PlaybackState::Playing,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "StateChanged");
        assert_eq!(json["state"], "Playing");
    }

    #[test]
    fn modes_event_uses_lowercase_repeat() {
        let event = PlaybackEvent::ModesChanged {
            shuffle: true,
            repeat: RepeatMode::All,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["repeat"], "all");
        assert_eq!(json["shuffle"], true);
    }
}
