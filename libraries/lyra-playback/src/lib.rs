//! Lyra - Playback Core
//!
//! Platform-agnostic playback management for the Lyra desktop shell.
//!
//! This crate provides:
//! - Queue navigation with shuffle and repeat (None, One, All)
//! - A playback state machine driving one external transport
//! - Load generations so late transport callbacks never leak into a newer track
//! - Position/duration tracking with clamped seek and volume
//! - Lyric synchronization (LRC parsing, `O(log n)` active-line lookup)
//! - An event queue for UI synchronization
//!
//! # Architecture
//!
//! `lyra-playback` does not decode or output audio. The platform provides a
//! [`Transport`] (an `HTMLAudioElement` behind the `wasm` feature, a native
//! player elsewhere) and forwards its notifications as [`TransportEvent`]s.
//!
//! ```text
//!   UI intents ──▶ PlaybackEngine ──commands──▶ Transport
//!        ▲              │   ▲                      │
//!        │              │   └──TransportEvent──────┘
//!        └─drain_events─┘
//! ```
//!
//! # Example: Queue and Playback
//!
//! ```rust
//! use lyra_playback::{
//!     PlaybackConfig, PlaybackEngine, PlaybackState, Result, Track, Transport, TransportEvent,
//!     LoadGeneration,
//! };
//!
//! // A transport that accepts every command
//! struct SilentTransport;
//!
//! impl Transport for SilentTransport {
//!     fn load(&mut self, _uri: &str, _generation: LoadGeneration) -> Result<()> {
//!         Ok(())
//!     }
//!     fn play(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     fn pause(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     fn seek(&mut self, _position_secs: f64) -> Result<()> {
//!         Ok(())
//!     }
//!     fn set_volume(&mut self, _volume: f64) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let mut engine = PlaybackEngine::new(SilentTransport, PlaybackConfig::default())?;
//!
//! engine.load_queue(
//!     vec![
//!         Track::new("1", "/assets/one.mp3", "One", "Artist"),
//!         Track::new("2", "/assets/two.mp3", "Two", "Artist"),
//!     ],
//!     0,
//! )?;
//! engine.play()?;
//!
//! // The platform reports metadata for the current load
//! let generation = engine.generation();
//! engine.handle_event(TransportEvent::metadata_ready(generation, 180.0))?;
//! assert_eq!(engine.state(), PlaybackState::Playing);
//!
//! // UI consumes queued events
//! for event in engine.drain_events() {
//!     println!("{event:?}");
//! }
//! # Ok::<(), lyra_playback::PlaybackError>(())
//! ```
//!
//! # Example: Lyrics
//!
//! ```rust
//! use lyra_playback::LyricTrack;
//!
//! let lyrics = LyricTrack::parse_lrc("[00:00.00]First\n[00:10.00]Second")?;
//! assert_eq!(lyrics.active_index(12.0), Some(1));
//! # Ok::<(), lyra_playback::PlaybackError>(())
//! ```

mod engine;
mod error;
mod events;
mod lyrics;
mod queue;
mod transport;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use lyrics::{active_line, LyricLine, LyricSync, LyricTrack};
pub use queue::{Queue, QueueStep};
pub use transport::{LoadGeneration, Transport, TransportEvent};
pub use types::{
    format_clock, PlaybackConfig, PlaybackSnapshot, PlaybackState, RepeatMode, Track,
};
