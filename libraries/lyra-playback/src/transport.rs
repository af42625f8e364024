//! Transport bridge
//!
//! The transport is whatever actually decodes and plays audio: an
//! `HTMLAudioElement` on the web, a native player on desktop. The engine
//! only commands it through [`Transport`] and listens to it through
//! [`TransportEvent`].
//!
//! Each load carries a [`LoadGeneration`]. Implementations stamp every
//! notification with the generation of the load it belongs to, which lets
//! the engine drop notifications from loads it has already superseded.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag identifying one `load` issued by the engine
///
/// Strictly increasing per engine. Only events carrying the current
/// generation are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct LoadGeneration(u64);

impl LoadGeneration {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl From<u64> for LoadGeneration {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for LoadGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capabilities the engine needs from an external media transport
///
/// Commands return `Err` only for synchronous failures. Asynchronous load
/// failures are reported later as [`TransportEvent::Error`].
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Begin loading `uri`; notifications for it must carry `generation`
    fn load(&mut self, uri: &str, generation: LoadGeneration) -> Result<()>;

    /// Start or resume output
    fn play(&mut self) -> Result<()>;

    /// Pause output, keeping position
    fn pause(&mut self) -> Result<()>;

    /// Move the play head (already clamped by the engine)
    fn seek(&mut self, position_secs: f64) -> Result<()>;

    /// Output volume in `[0, 1]` (already clamped by the engine)
    fn set_volume(&mut self, volume: f64) -> Result<()>;
}

/// Notifications flowing back from the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransportEvent {
    /// Source metadata is available
    MetadataReady {
        generation: LoadGeneration,
        duration_secs: f64,
    },

    /// Play head moved
    TimeUpdate {
        generation: LoadGeneration,
        position_secs: f64,
    },

    /// Source played to its end
    Ended { generation: LoadGeneration },

    /// Source failed to load or play
    Error {
        generation: LoadGeneration,
        cause: String,
    },
}

impl TransportEvent {
    pub fn metadata_ready(generation: LoadGeneration, duration_secs: f64) -> Self {
        Self::MetadataReady {
            generation,
            duration_secs,
        }
    }

    pub fn time_update(generation: LoadGeneration, position_secs: f64) -> Self {
        Self::TimeUpdate {
            generation,
            position_secs,
        }
    }

    pub fn ended(generation: LoadGeneration) -> Self {
        Self::Ended { generation }
    }

    pub fn error(generation: LoadGeneration, cause: impl Into<String>) -> Self {
        Self::Error {
            generation,
            cause: cause.into(),
        }
    }

    /// Generation of the load this event belongs to
    pub fn generation(&self) -> LoadGeneration {
        match self {
            Self::MetadataReady { generation, .. }
            | Self::TimeUpdate { generation, .. }
            | Self::Ended { generation }
            | Self::Error { generation, .. } => *generation,
        }
    }
}
