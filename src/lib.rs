pub mod config;
pub mod dsp; // Oscillators, envelopes, limiting
pub mod engine; // Real-time render entry point
pub mod error;
pub mod io;
pub mod synth; // Voice management and polyphony

pub use config::{EngineConfig, EnvelopeConfig, Modulation, Partial, TonePreset};
#[cfg(feature = "rtrb")]
pub use engine::EngineHandle;
pub use engine::RenderEngine;
pub use error::{ConfigError, EventError, VoiceError};
pub use synth::message::{NoteEvent, NoteKind};
