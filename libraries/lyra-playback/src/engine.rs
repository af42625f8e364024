//! Playback engine - core orchestration
//!
//! Owns the playback state machine and the single transport session.
//! User intents and transport notifications are both applied here, in
//! arrival order, on one control thread.
//!
//! ```text
//!   Idle ──load──▶ Loading ──metadata──▶ Paused ◀──pause/play──▶ Playing
//!                     │                                            │
//!                     └──────────────error──────────┬─────ended────┘
//!                                                   ▼              ▼
//!                                                 Error          Ended ──advance──▶ Loading
//! ```
//!
//! Every load bumps the [`LoadGeneration`]; notifications tagged with an
//! older generation belong to a superseded load and are discarded.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    lyrics::{LyricLine, LyricSync, LyricTrack},
    queue::{Queue, QueueStep},
    transport::{LoadGeneration, Transport, TransportEvent},
    types::{PlaybackConfig, PlaybackSnapshot, PlaybackState, RepeatMode, Track},
};
use tracing::{debug, info, warn};

/// Central playback management
///
/// Orchestrates:
/// - Queue navigation (shuffle, repeat)
/// - Transport commands and notifications
/// - Position/duration tracking
/// - Lyric synchronization
/// - Volume
pub struct PlaybackEngine<T: Transport> {
    transport: T,

    // State
    state: PlaybackState,
    loaded: Option<Track>,
    generation: LoadGeneration,
    position_secs: f64,
    duration_secs: Option<f64>,
    last_error: Option<String>,

    // play() arrived while the transport was still loading
    play_on_ready: bool,

    queue: Queue,
    lyrics: LyricSync,
    volume: f64,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<T: Transport> PlaybackEngine<T> {
    /// Create a playback engine driving `transport`
    ///
    /// Pushes the configured initial volume to the transport.
    pub fn new(mut transport: T, config: PlaybackConfig) -> Result<Self> {
        config.validate()?;

        let mut queue = match config.shuffle_seed {
            Some(seed) => Queue::with_seed(seed),
            None => Queue::new(),
        };
        queue.set_shuffle(config.initial_shuffle);
        queue.set_repeat(config.initial_repeat);

        let volume = config.initial_volume.clamp(0.0, 1.0);
        transport.set_volume(volume)?;

        Ok(Self {
            transport,
            state: PlaybackState::Idle,
            loaded: None,
            generation: LoadGeneration::default(),
            position_secs: 0.0,
            duration_secs: None,
            last_error: None,
            play_on_ready: false,
            queue,
            lyrics: LyricSync::new(),
            volume,
            pending_events: Vec::new(),
        })
    }

    // ===== Queue =====

    /// Replace the queue and load its start track
    ///
    /// The start track is loaded but not played. An empty list stops
    /// playback and leaves the engine idle. An out-of-bounds `start_index`
    /// is rejected with nothing changed.
    pub fn load_queue(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        self.queue.load(tracks, start_index)?;
        self.emit_queue_changed();

        match self.queue.current_track().cloned() {
            Some(track) => self.load(track),
            None => self.stop(),
        }
    }

    /// Skip to the next track according to shuffle/repeat
    ///
    /// Playback continues on the new track if it was active before.
    pub fn next(&mut self) -> Result<QueueStep> {
        let step = self.queue.next();
        self.switch_to(step)
    }

    /// Go back one track (wraps at the start of the queue)
    pub fn prev(&mut self) -> Result<QueueStep> {
        let step = self.queue.prev();
        self.switch_to(step)
    }

    /// Select a specific queue entry
    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        let track = self.queue.jump_to(index)?.clone();
        self.emit_queue_changed();
        let resume = self.is_active();
        self.load(track)?;
        if resume {
            self.play()?;
        }
        Ok(())
    }

    fn switch_to(&mut self, step: QueueStep) -> Result<QueueStep> {
        if self.queue.is_empty() {
            debug!("Queue empty, ignoring navigation");
            return Ok(step);
        }
        self.emit_queue_changed();

        if step.exhausted {
            debug!("Queue exhausted, keeping current track");
            return Ok(step);
        }

        if let Some(track) = step.track.clone() {
            let resume = self.is_active();
            self.load(track)?;
            if resume {
                self.play()?;
            }
        }
        Ok(step)
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.queue.set_shuffle(shuffle);
        self.emit_modes_changed();
    }

    /// Flip shuffle, returning the new flag
    pub fn toggle_shuffle(&mut self) -> bool {
        let shuffle = !self.queue.shuffle();
        self.set_shuffle(shuffle);
        shuffle
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.queue.set_repeat(repeat);
        self.emit_modes_changed();
    }

    /// Step repeat None → All → One → None, returning the new mode
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        let repeat = self.queue.repeat().cycle();
        self.set_repeat(repeat);
        repeat
    }

    // ===== Playback Control =====

    /// Load `track` into the transport
    ///
    /// Supersedes any load still in flight. The engine enters `Loading` and
    /// moves to `Paused` when the transport reports metadata; call
    /// [`play`](Self::play) to start output.
    pub fn load(&mut self, track: Track) -> Result<()> {
        let previous_track_id = self.loaded.as_ref().map(|t| t.id.clone());
        self.generation = self.generation.next();
        self.reset_session();

        info!(
            generation = %self.generation,
            track_id = %track.id,
            uri = %track.source_uri,
            "Loading track"
        );

        let uri = track.source_uri.clone();
        self.set_lyrics_for(track.lyrics.clone());
        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id,
        });
        self.loaded = Some(track);
        self.set_state(PlaybackState::Loading);

        if let Err(err) = self.transport.load(&uri, self.generation) {
            let cause = err.to_string();
            self.fail(cause.clone());
            return Err(PlaybackError::TransportLoad { uri, cause });
        }
        Ok(())
    }

    /// Start or resume playback
    ///
    /// - `Paused`: resumes output
    /// - `Loading`: output starts once the transport reports metadata
    /// - `Ended`: replays the loaded track from the start
    /// - `Idle`: loads the queue's current track and plays it when ready
    ///
    /// A no-op with nothing to play or after a transport error.
    pub fn play(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Paused => {
                self.transport.play()?;
                self.set_state(PlaybackState::Playing);
                Ok(())
            }
            PlaybackState::Loading => {
                self.play_on_ready = true;
                Ok(())
            }
            PlaybackState::Ended => {
                self.transport.seek(0.0)?;
                self.set_position(0.0);
                self.transport.play()?;
                self.set_state(PlaybackState::Playing);
                Ok(())
            }
            PlaybackState::Idle => match self.queue.current_track().cloned() {
                Some(track) => {
                    self.load(track)?;
                    self.play_on_ready = true;
                    Ok(())
                }
                None => {
                    debug!("Nothing to play");
                    Ok(())
                }
            },
            PlaybackState::Error => {
                warn!("Play ignored after transport error; skip or reload the track");
                Ok(())
            }
        }
    }

    /// Pause playback
    ///
    /// While loading, cancels a pending play instead.
    pub fn pause(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Playing => {
                self.transport.pause()?;
                self.set_state(PlaybackState::Paused);
            }
            PlaybackState::Loading => self.play_on_ready = false,
            _ => {}
        }
        Ok(())
    }

    /// Play when paused, ended or idle, pause when playing
    ///
    /// From `Idle` this starts the queue's current track like [`Self::play`].
    pub fn toggle(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Loading if self.play_on_ready => self.pause(),
            _ => self.play(),
        }
    }

    /// Stop playback and unload the current track
    ///
    /// Any load in flight is superseded. The queue is kept.
    pub fn stop(&mut self) -> Result<()> {
        self.generation = self.generation.next();
        let was_loaded = self.loaded.take().is_some();
        self.reset_session();
        self.set_lyrics_for(None);
        self.set_state(PlaybackState::Idle);
        if was_loaded {
            self.transport.pause()?;
        }
        Ok(())
    }

    /// Seek within the loaded track, returning the clamped position
    ///
    /// Clamps to `[0, duration]`, using the track's duration hint until
    /// the transport reports metadata. Does not change the playback state.
    pub fn seek(&mut self, position_secs: f64) -> Result<f64> {
        let Some(track) = &self.loaded else {
            return Err(PlaybackError::NoTrackLoaded);
        };
        let upper = self.duration_secs.or(track.duration_hint_secs);
        let target = clamp_position(position_secs, upper);

        self.transport.seek(target)?;
        self.set_position(target);
        Ok(target)
    }

    /// Set volume, returning the clamped value
    pub fn set_volume(&mut self, volume: f64) -> Result<f64> {
        if volume.is_nan() {
            return Err(PlaybackError::InvalidVolume(volume));
        }
        let volume = volume.clamp(0.0, 1.0);
        self.transport.set_volume(volume)?;
        self.volume = volume;
        self.pending_events.push(PlaybackEvent::VolumeChanged { volume });
        Ok(volume)
    }

    /// Override the lyrics followed for the loaded track
    pub fn set_lyrics(&mut self, lyrics: Option<LyricTrack>) {
        self.set_lyrics_for(lyrics);
        self.refresh_lyrics();
    }

    // ===== Transport Notifications =====

    /// Apply a notification from the transport
    ///
    /// Notifications from superseded loads are discarded, as is anything
    /// the failed session reports once in `Error`. A natural end from
    /// `Playing` or `Paused` advances the queue and keeps playing unless
    /// the queue is exhausted.
    pub fn handle_event(&mut self, event: TransportEvent) -> Result<()> {
        if event.generation() != self.generation || self.loaded.is_none() {
            debug!(
                event_generation = %event.generation(),
                current_generation = %self.generation,
                "Discarding stale transport event"
            );
            return Ok(());
        }
        if self.state == PlaybackState::Error {
            debug!(generation = %self.generation, ?event, "Ignoring event for failed load");
            return Ok(());
        }

        match event {
            TransportEvent::MetadataReady { duration_secs, .. } => {
                self.on_metadata_ready(duration_secs)
            }
            TransportEvent::TimeUpdate { position_secs, .. } => {
                let position = clamp_position(position_secs, self.duration_secs);
                self.set_position(position);
                Ok(())
            }
            TransportEvent::Ended { .. } => {
                if matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
                    self.on_ended()
                } else {
                    debug!(state = ?self.state, "Ignoring end of track outside playback");
                    Ok(())
                }
            }
            TransportEvent::Error { cause, .. } => {
                warn!(generation = %self.generation, %cause, "Transport error");
                self.fail(cause);
                Ok(())
            }
        }
    }

    fn on_metadata_ready(&mut self, duration_secs: f64) -> Result<()> {
        // Live streams report an infinite duration; treat as unknown
        self.duration_secs = (duration_secs.is_finite() && duration_secs >= 0.0)
            .then_some(duration_secs);
        debug!(duration = ?self.duration_secs, "Metadata ready");

        let position = clamp_position(self.position_secs, self.duration_secs);
        self.set_position(position);

        if self.state == PlaybackState::Loading {
            self.set_state(PlaybackState::Paused);
            if std::mem::take(&mut self.play_on_ready) {
                self.transport.play()?;
                self.set_state(PlaybackState::Playing);
            }
        }
        Ok(())
    }

    fn on_ended(&mut self) -> Result<()> {
        if let Some(duration) = self.duration_secs {
            self.set_position(duration);
        }
        self.set_state(PlaybackState::Ended);

        let step = self.queue.next();
        if self.queue.is_empty() {
            return Ok(());
        }
        self.emit_queue_changed();

        if step.exhausted {
            info!("Queue finished");
            return Ok(());
        }
        if let Some(track) = step.track {
            self.load(track)?;
            self.play()?;
        }
        Ok(())
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Track the transport session belongs to
    pub fn current_track(&self) -> Option<&Track> {
        self.loaded.as_ref()
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    /// `None` until the transport reports metadata
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn shuffle(&self) -> bool {
        self.queue.shuffle()
    }

    pub fn repeat(&self) -> RepeatMode {
        self.queue.repeat()
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn active_lyric(&self) -> Option<&LyricLine> {
        self.lyrics.active_line()
    }

    pub fn lyrics(&self) -> Option<&LyricTrack> {
        self.lyrics.lyrics()
    }

    /// Generation the transport must tag notifications with
    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }

    /// Cause of the last transport failure, while in `Error`
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Read-only projection for the UI
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state,
            position_secs: self.position_secs,
            duration_secs: self.duration_secs,
            volume: self.volume,
            shuffle: self.queue.shuffle(),
            repeat: self.queue.repeat(),
            current_track: self.loaded.clone(),
            active_lyric_index: self.lyrics.active_index(),
            queue_index: self.queue.current_index(),
            queue_len: self.queue.len(),
            error: self.last_error.clone(),
        }
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn is_active(&self) -> bool {
        match self.state {
            PlaybackState::Playing | PlaybackState::Ended => true,
            PlaybackState::Loading => self.play_on_ready,
            _ => false,
        }
    }

    fn reset_session(&mut self) {
        self.position_secs = 0.0;
        self.duration_secs = None;
        self.play_on_ready = false;
        self.last_error = None;
    }

    fn fail(&mut self, cause: String) {
        self.play_on_ready = false;
        self.last_error = Some(cause.clone());
        self.set_state(PlaybackState::Error);
        self.pending_events.push(PlaybackEvent::Error { message: cause });
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "State changed");
            self.state = state;
            self.pending_events.push(PlaybackEvent::StateChanged { state });
        }
    }

    fn set_position(&mut self, position_secs: f64) {
        self.position_secs = position_secs;
        self.pending_events.push(PlaybackEvent::PositionChanged {
            position_secs,
            duration_secs: self.duration_secs,
        });
        self.refresh_lyrics();
    }

    fn set_lyrics_for(&mut self, lyrics: Option<LyricTrack>) {
        let had_active = self.lyrics.active_index().is_some();
        self.lyrics.set_lyrics(lyrics);
        if had_active {
            self.pending_events
                .push(PlaybackEvent::LyricLineChanged { index: None });
        }
    }

    fn refresh_lyrics(&mut self) {
        if self.lyrics.update(self.position_secs) {
            self.pending_events.push(PlaybackEvent::LyricLineChanged {
                index: self.lyrics.active_index(),
            });
        }
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
            current_index: self.queue.current_index(),
        });
    }

    fn emit_modes_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::ModesChanged {
            shuffle: self.queue.shuffle(),
            repeat: self.queue.repeat(),
        });
    }
}

/// Clamp into `[0, upper]`; NaN maps to 0
fn clamp_position(position_secs: f64, upper: Option<f64>) -> f64 {
    let position = if position_secs.is_nan() {
        0.0
    } else {
        position_secs.max(0.0)
    };
    match upper {
        Some(upper) => position.min(upper.max(0.0)),
        None => position,
    }
}
