//! Low-level DSP primitives used by the synth layer.
//!
//! These components are allocation-free and realtime-safe, so they can be
//! embedded directly inside voice structs. They stay focused on the
//! per-sample math and leave note bookkeeping to `synth`.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Soft saturation for the master bus.
pub mod limiter;
/// Phase-accumulating oscillators.
pub mod oscillator;

pub use envelope::{EnvelopeGenerator, EnvelopeStage, EnvelopeState};
pub use limiter::Limiter;
pub use oscillator::{Oscillator, Waveform};
