//! WASM bindings for lyra-playback
//!
//! Lets the web UI drive the playback core with an `HTMLAudioElement` (or
//! any object with the same methods) as the transport.

pub mod player;
pub mod transport;

pub use player::WasmPlayer;
pub use transport::JsTransport;
