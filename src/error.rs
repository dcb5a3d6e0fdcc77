use std::fmt;

use crate::synth::{message::NoteEvent, voice::VoiceStatus};

/// Errors raised while validating an [`EngineConfig`](crate::EngineConfig).
///
/// These are fatal: an engine is never built from a configuration that
/// fails validation, and no value is silently clamped into range.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Sample rate must be finite and greater than zero
    InvalidSampleRate(f32),
    /// The voice pool needs at least one voice
    ZeroPolyphony,
    /// Stage time (seconds) must be finite and not negative
    InvalidStageTime { stage: &'static str, seconds: f32 },
    /// Sustain level must lie in 0.0..=1.0
    InvalidSustain(f32),
    /// A tone preset needs at least one partial
    NoPartials,
    /// Partial ratio must be finite and greater than zero
    InvalidRatio { index: usize, ratio: f32 },
    /// Partial weight must be finite and not negative
    InvalidWeight { index: usize, weight: f32 },
    /// Partial weights may not sum above 1.0
    WeightsExceedUnity(f32),
    /// Modulation refers to a partial that does not exist
    ModulationIndex { index: usize, partials: usize },
    /// A partial cannot modulate itself
    SelfModulation(usize),
    /// Modulation depth must be finite and not negative
    InvalidModulationDepth(f32),
    /// Modulation decay (seconds) must be finite and not negative
    InvalidModulationDecay(f32),
    /// Master gain must be finite and greater than zero
    InvalidMasterGain(f32),
    /// The event queue needs room for at least one event
    ZeroEventCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSampleRate(rate) => {
                write!(f, "sample rate must be positive, got {rate}")
            }
            ConfigError::ZeroPolyphony => write!(f, "polyphony must be at least one voice"),
            ConfigError::InvalidStageTime { stage, seconds } => {
                write!(f, "{stage} time must be a non-negative number of seconds, got {seconds}")
            }
            ConfigError::InvalidSustain(level) => {
                write!(f, "sustain level must be within 0.0..=1.0, got {level}")
            }
            ConfigError::NoPartials => write!(f, "tone preset has no partials"),
            ConfigError::InvalidRatio { index, ratio } => {
                write!(f, "partial {index} has invalid frequency ratio {ratio}")
            }
            ConfigError::InvalidWeight { index, weight } => {
                write!(f, "partial {index} has invalid weight {weight}")
            }
            ConfigError::WeightsExceedUnity(sum) => {
                write!(f, "partial weights sum to {sum}, must not exceed 1.0")
            }
            ConfigError::ModulationIndex { index, partials } => {
                write!(
                    f,
                    "modulation refers to partial {index} but the preset has {partials}"
                )
            }
            ConfigError::SelfModulation(index) => {
                write!(f, "partial {index} cannot modulate itself")
            }
            ConfigError::InvalidModulationDepth(depth) => {
                write!(f, "modulation depth must be non-negative, got {depth}")
            }
            ConfigError::InvalidModulationDecay(decay) => {
                write!(f, "modulation decay must be non-negative, got {decay}")
            }
            ConfigError::InvalidMasterGain(gain) => {
                write!(f, "master gain must be positive, got {gain}")
            }
            ConfigError::ZeroEventCapacity => write!(f, "event capacity must be at least one"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised at the event queue boundary.
///
/// A rejected event never reaches the voice pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventError {
    /// MIDI pitch above 127
    PitchOutOfRange(u8),
    /// Velocity outside 0.0..=1.0 (or NaN)
    VelocityOutOfRange(f32),
    /// The queue is full; the event is handed back to the caller
    QueueFull(NoteEvent),
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::PitchOutOfRange(pitch) => {
                write!(f, "pitch {pitch} is outside the MIDI range 0..=127")
            }
            EventError::VelocityOutOfRange(velocity) => {
                write!(f, "velocity {velocity} is outside 0.0..=1.0")
            }
            EventError::QueueFull(event) => {
                write!(f, "event queue is full, dropped {:?} for pitch {}", event.kind, event.pitch)
            }
        }
    }
}

impl std::error::Error for EventError {}

/// Errors raised by a single voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceError {
    /// Only idle voices can be activated
    NotIdle { voice: usize, status: VoiceStatus },
}

impl fmt::Display for VoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceError::NotIdle { voice, status } => {
                write!(f, "voice {voice} cannot be activated while {status:?}")
            }
        }
    }
}

impl std::error::Error for VoiceError {}
