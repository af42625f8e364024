//! WASM-compatible PlaybackEngine wrapper

use super::transport::JsTransport;
use crate::{
    LoadGeneration, LyricTrack, PlaybackConfig, PlaybackEngine, PlaybackError, RepeatMode, Track,
    TransportEvent,
};
use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// WASM-compatible playback engine
///
/// Wraps [`PlaybackEngine`] with a JavaScript-friendly API. After every
/// call, queued playback events are delivered to the `onEvent` callback.
#[wasm_bindgen]
pub struct WasmPlayer {
    inner: PlaybackEngine<JsTransport>,
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player driving `transport`
    ///
    /// `config` is an optional object with `initial_volume`,
    /// `initial_shuffle`, `initial_repeat` and `shuffle_seed`.
    #[wasm_bindgen(constructor)]
    pub fn new(transport: JsValue, config: JsValue) -> Result<WasmPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let config: PlaybackConfig = if config.is_undefined() || config.is_null() {
            PlaybackConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| to_js(PlaybackError::InvalidConfig(e.to_string())))?
        };
        let inner = PlaybackEngine::new(JsTransport::new(transport), config).map_err(to_js)?;

        Ok(Self {
            inner,
            on_event: None,
        })
    }

    /// Register the event listener
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
    }

    // ===== Queue =====

    /// Replace the queue with an array of tracks
    #[wasm_bindgen(js_name = loadQueue)]
    pub fn load_queue(&mut self, tracks: JsValue, start_index: usize) -> Result<(), JsValue> {
        let tracks: Vec<Track> = serde_wasm_bindgen::from_value(tracks)
            .map_err(|e| to_js(PlaybackError::InvalidConfig(e.to_string())))?;
        let result = self.inner.load_queue(tracks, start_index);
        self.finish(result)
    }

    /// Skip forward; returns `true` when the queue is exhausted
    pub fn next(&mut self) -> Result<bool, JsValue> {
        let result = self.inner.next().map(|step| step.exhausted);
        self.finish(result)
    }

    /// Skip backward; returns `true` only for an empty queue
    pub fn prev(&mut self) -> Result<bool, JsValue> {
        let result = self.inner.prev().map(|step| step.exhausted);
        self.finish(result)
    }

    #[wasm_bindgen(js_name = jumpTo)]
    pub fn jump_to(&mut self, index: usize) -> Result<(), JsValue> {
        let result = self.inner.jump_to(index);
        self.finish(result)
    }

    #[wasm_bindgen(js_name = setShuffle)]
    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.inner.set_shuffle(shuffle);
        self.flush();
    }

    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&mut self) -> bool {
        let shuffle = self.inner.toggle_shuffle();
        self.flush();
        shuffle
    }

    /// Set repeat from `"none"`, `"one"` or `"all"`
    #[wasm_bindgen(js_name = setRepeat)]
    pub fn set_repeat(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode: RepeatMode = mode.parse().map_err(to_js)?;
        self.inner.set_repeat(mode);
        self.flush();
        Ok(())
    }

    /// Step repeat none → all → one → none, returning the new mode
    #[wasm_bindgen(js_name = cycleRepeat)]
    pub fn cycle_repeat(&mut self) -> String {
        let mode = self.inner.cycle_repeat();
        self.flush();
        mode.to_string()
    }

    // ===== Playback Control =====

    pub fn play(&mut self) -> Result<(), JsValue> {
        let result = self.inner.play();
        self.finish(result)
    }

    pub fn pause(&mut self) -> Result<(), JsValue> {
        let result = self.inner.pause();
        self.finish(result)
    }

    pub fn toggle(&mut self) -> Result<(), JsValue> {
        let result = self.inner.toggle();
        self.finish(result)
    }

    pub fn stop(&mut self) -> Result<(), JsValue> {
        let result = self.inner.stop();
        self.finish(result)
    }

    /// Seek to seconds, returning the clamped position
    pub fn seek(&mut self, position_secs: f64) -> Result<f64, JsValue> {
        let result = self.inner.seek(position_secs);
        self.finish(result)
    }

    /// Set volume (0.0-1.0), returning the clamped value
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, volume: f64) -> Result<f64, JsValue> {
        let result = self.inner.set_volume(volume);
        self.finish(result)
    }

    /// Replace the current track's lyrics with LRC text (or clear them)
    #[wasm_bindgen(js_name = setLyrics)]
    pub fn set_lyrics(&mut self, lrc: Option<String>) -> Result<(), JsValue> {
        let lyrics = lrc
            .as_deref()
            .map(LyricTrack::parse_lrc)
            .transpose()
            .map_err(to_js)?;
        self.inner.set_lyrics(lyrics);
        self.flush();
        Ok(())
    }

    // ===== State =====

    /// Current `PlaybackSnapshot` as a plain object
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_plain_object(&self.inner.snapshot())
    }

    /// Generation the transport must pass back with notifications
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> f64 {
        self.inner.generation().value() as f64
    }

    // ===== Transport Notifications =====

    #[wasm_bindgen(js_name = onMetadataReady)]
    pub fn metadata_ready(&mut self, generation: f64, duration_secs: f64) -> Result<(), JsValue> {
        self.notify(TransportEvent::metadata_ready(
            to_generation(generation),
            duration_secs,
        ))
    }

    #[wasm_bindgen(js_name = onTimeUpdate)]
    pub fn time_update(&mut self, generation: f64, position_secs: f64) -> Result<(), JsValue> {
        self.notify(TransportEvent::time_update(
            to_generation(generation),
            position_secs,
        ))
    }

    #[wasm_bindgen(js_name = onEnded)]
    pub fn ended(&mut self, generation: f64) -> Result<(), JsValue> {
        self.notify(TransportEvent::ended(to_generation(generation)))
    }

    #[wasm_bindgen(js_name = onError)]
    pub fn error(&mut self, generation: f64, cause: String) -> Result<(), JsValue> {
        self.notify(TransportEvent::error(to_generation(generation), cause))
    }
}

impl WasmPlayer {
    fn notify(&mut self, event: TransportEvent) -> Result<(), JsValue> {
        let result = self.inner.handle_event(event);
        self.finish(result)
    }

    fn finish<T>(&mut self, result: crate::Result<T>) -> Result<T, JsValue> {
        self.flush();
        result.map_err(to_js)
    }

    /// Deliver queued events to the registered listener
    fn flush(&mut self) {
        let events = self.inner.drain_events();
        let Some(callback) = &self.on_event else {
            return;
        };
        for event in events {
            match to_plain_object(&event) {
                Ok(value) => {
                    if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                        tracing::warn!("Event listener threw: {err:?}");
                    }
                }
                Err(err) => tracing::warn!("Failed to serialize {event:?}: {err:?}"),
            }
        }
    }
}

fn to_generation(value: f64) -> LoadGeneration {
    LoadGeneration::new(value as u64)
}

fn to_plain_object<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js(err: PlaybackError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
