//! Transport backed by a JavaScript object

use crate::{LoadGeneration, PlaybackError, Result, Transport};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

/// Forwards transport commands to a JS object
///
/// The object must expose `load(uri, generation)`, `play()`, `pause()`,
/// `seek(seconds)` and `setVolume(volume)`. It reports back through
/// [`WasmPlayer`](super::WasmPlayer)'s notification methods, passing the
/// generation it received in `load`.
pub struct JsTransport {
    target: JsValue,
}

impl JsTransport {
    pub fn new(target: JsValue) -> Self {
        Self { target }
    }

    fn call(&self, method: &str, args: &[JsValue]) -> Result<()> {
        let func = Reflect::get(&self.target, &JsValue::from_str(method)).map_err(js_error)?;
        let func: Function = func.dyn_into().map_err(|_| {
            PlaybackError::Transport(format!("transport has no `{method}` function"))
        })?;
        let args: Array = args.iter().collect();
        func.apply(&self.target, &args).map_err(js_error)?;
        Ok(())
    }
}

impl Transport for JsTransport {
    fn load(&mut self, uri: &str, generation: LoadGeneration) -> Result<()> {
        self.call(
            "load",
            &[
                JsValue::from_str(uri),
                JsValue::from_f64(generation.value() as f64),
            ],
        )
    }

    fn play(&mut self) -> Result<()> {
        self.call("play", &[])
    }

    fn pause(&mut self) -> Result<()> {
        self.call("pause", &[])
    }

    fn seek(&mut self, position_secs: f64) -> Result<()> {
        self.call("seek", &[JsValue::from_f64(position_secs)])
    }

    fn set_volume(&mut self, volume: f64) -> Result<()> {
        self.call("setVolume", &[JsValue::from_f64(volume)])
    }
}

/// Best-effort message for a thrown JS value
fn js_error(value: JsValue) -> PlaybackError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    PlaybackError::Transport(message)
}
