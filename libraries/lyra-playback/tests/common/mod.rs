//! Shared helpers for integration tests

#![allow(dead_code)]

use lyra_playback::{
    LoadGeneration, LyricLine, LyricTrack, PlaybackConfig, PlaybackEngine, PlaybackError, Result,
    Track, Transport,
};
use std::sync::Once;

static INIT: Once = Once::new();

/// Install a test-writer tracing subscriber once per test binary
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// A command the engine issued to the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Load { uri: String, generation: LoadGeneration },
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
}

/// Transport that records commands and can be told to fail loads
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub commands: Vec<Command>,
    pub fail_loads_with: Option<String>,
}

impl RecordingTransport {
    pub fn loads(&self) -> Vec<(&str, LoadGeneration)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Load { uri, generation } => Some((uri.as_str(), *generation)),
                _ => None,
            })
            .collect()
    }

    pub fn last(&self) -> Option<&Command> {
        self.commands.last()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Transport for RecordingTransport {
    fn load(&mut self, uri: &str, generation: LoadGeneration) -> Result<()> {
        if let Some(cause) = &self.fail_loads_with {
            return Err(PlaybackError::Transport(cause.clone()));
        }
        self.commands.push(Command::Load {
            uri: uri.to_string(),
            generation,
        });
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.commands.push(Command::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.commands.push(Command::Pause);
        Ok(())
    }

    fn seek(&mut self, position_secs: f64) -> Result<()> {
        self.commands.push(Command::Seek(position_secs));
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) -> Result<()> {
        self.commands.push(Command::SetVolume(volume));
        Ok(())
    }
}

pub fn create_track(id: &str) -> Track {
    Track::new(
        id,
        format!("/assets/{id}.mp3"),
        format!("Track {id}"),
        "Test Artist",
    )
}

/// The four-line lyric sheet from the play page mock
pub fn sample_lyrics() -> LyricTrack {
    LyricTrack::new(vec![
        LyricLine::new(0.0, "First line of lyric..."),
        LyricLine::new(10.0, "Second line of lyric..."),
        LyricLine::new(20.0, "Third line of lyric..."),
        LyricLine::new(30.0, "Fourth line of lyric..."),
    ])
    .expect("valid lyrics")
}

pub fn engine() -> PlaybackEngine<RecordingTransport> {
    engine_with(PlaybackConfig::default())
}

pub fn engine_with(config: PlaybackConfig) -> PlaybackEngine<RecordingTransport> {
    init_tracing();
    PlaybackEngine::new(RecordingTransport::default(), config).expect("engine")
}

/// Engine with `[A, B, C]` queued at index 0
pub fn abc_engine() -> PlaybackEngine<RecordingTransport> {
    let mut engine = engine();
    engine
        .load_queue(
            vec![create_track("A"), create_track("B"), create_track("C")],
            0,
        )
        .expect("load queue");
    engine
}
