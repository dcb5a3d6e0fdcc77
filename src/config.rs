//! Engine configuration.
//!
//! Everything here is supplied once at construction and never renegotiated
//! while the engine is running. [`EngineConfig::validate`] rejects anything
//! out of range instead of clamping it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::limiter::Limiter, dsp::oscillator::Waveform, error::ConfigError};

/// Default room in the note event queue.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// One oscillator of a tone preset, tuned relative to the note fundamental.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    pub waveform: Waveform,
    /// Frequency as a multiple of the fundamental (1.0 = unison)
    pub ratio: f32,
    /// Mix weight. Weights across a preset sum to at most 1.0.
    pub weight: f32,
}

impl Partial {
    pub fn new(waveform: Waveform, ratio: f32, weight: f32) -> Self {
        Self {
            waveform,
            ratio,
            weight,
        }
    }
}

/// Frequency modulation of one partial by another.
///
/// `depth` is the modulation index: the target's instantaneous frequency is
/// `f_target + depth * velocity * f_source * source_sample`, with the index
/// fading exponentially over `decay` seconds. This is what gives the bright,
/// inharmonic onset of a struck tine. A `decay` of zero holds the index
/// constant.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulation {
    pub source: usize,
    pub target: usize,
    pub depth: f32,
    pub decay: f32,
}

/// Oscillator recipe shared by every voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TonePreset {
    pub partials: Vec<Partial>,
    pub modulation: Option<Modulation>,
}

impl TonePreset {
    /// A single sine partial at full weight, no modulation.
    pub fn sine() -> Self {
        Self {
            partials: vec![Partial::new(Waveform::Sine, 1.0, 1.0)],
            modulation: None,
        }
    }

    /// Struck-tine electric piano.
    ///
    /// The constants are tuned by ear: a tine body, a soft octave, and a
    /// high inharmonic partial that frequency-modulates the body for the
    /// first few hundred milliseconds.
    pub fn electric_piano() -> Self {
        Self {
            partials: vec![
                Partial::new(Waveform::Tine, 1.0, 0.6),
                Partial::new(Waveform::Sine, 2.0, 0.2),
                Partial::new(Waveform::Sine, 14.0, 0.04),
            ],
            modulation: Some(Modulation {
                source: 2,
                target: 0,
                depth: 0.8,
                decay: 0.15,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.partials.is_empty() {
            return Err(ConfigError::NoPartials);
        }

        let mut sum = 0.0;
        for (index, partial) in self.partials.iter().enumerate() {
            if !partial.ratio.is_finite() || partial.ratio <= 0.0 {
                return Err(ConfigError::InvalidRatio {
                    index,
                    ratio: partial.ratio,
                });
            }
            if !partial.weight.is_finite() || partial.weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    index,
                    weight: partial.weight,
                });
            }
            sum += partial.weight;
        }

        // Small tolerance so presets written as thirds still add up.
        if sum > 1.0 + 1e-6 {
            return Err(ConfigError::WeightsExceedUnity(sum));
        }

        if let Some(modulation) = &self.modulation {
            let partials = self.partials.len();
            for index in [modulation.source, modulation.target] {
                if index >= partials {
                    return Err(ConfigError::ModulationIndex { index, partials });
                }
            }
            if modulation.source == modulation.target {
                return Err(ConfigError::SelfModulation(modulation.source));
            }
            if !modulation.depth.is_finite() || modulation.depth < 0.0 {
                return Err(ConfigError::InvalidModulationDepth(modulation.depth));
            }
            if !modulation.decay.is_finite() || modulation.decay < 0.0 {
                return Err(ConfigError::InvalidModulationDecay(modulation.decay));
            }
        }

        Ok(())
    }
}

impl Default for TonePreset {
    fn default() -> Self {
        Self::electric_piano()
    }
}

/// ADSR stage times in seconds and sustain level.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeConfig {
    pub attack: f32,
    pub decay: f32,
    /// Level held while the key is down (0.0 - 1.0)
    pub sustain: f32,
    pub release: f32,
}

impl EnvelopeConfig {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (stage, seconds) in [
            ("attack", self.attack),
            ("decay", self.decay),
            ("release", self.release),
        ] {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(ConfigError::InvalidStageTime { stage, seconds });
            }
        }

        if !(0.0..=1.0).contains(&self.sustain) {
            return Err(ConfigError::InvalidSustain(self.sustain));
        }

        Ok(())
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        // 10ms attack and 100ms release, with a long tine-like decay
        Self::adsr(0.01, 1.2, 0.45, 0.1)
    }
}

/// Everything the engine needs to know at construction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    /// Size of the fixed voice pool
    pub max_polyphony: usize,
    pub tone: TonePreset,
    pub envelope: EnvelopeConfig,
    /// Gain applied to the voice sum before limiting
    pub master_gain: f32,
    pub limiter: Limiter,
    /// Capacity of the note event queue and of the pending-event scheduler
    pub event_capacity: usize,
}

impl EngineConfig {
    pub fn new(sample_rate: f32, max_polyphony: usize) -> Self {
        Self {
            sample_rate,
            max_polyphony,
            ..Self::default()
        }
    }

    pub fn with_tone(mut self, tone: TonePreset) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_envelope(mut self, envelope: EnvelopeConfig) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn with_master_gain(mut self, gain: f32) -> Self {
        self.master_gain = gain;
        self
    }

    pub fn with_limiter(mut self, limiter: Limiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.max_polyphony == 0 {
            return Err(ConfigError::ZeroPolyphony);
        }
        if !self.master_gain.is_finite() || self.master_gain <= 0.0 {
            return Err(ConfigError::InvalidMasterGain(self.master_gain));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        self.envelope.validate()?;
        self.tone.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            max_polyphony: 8,
            tone: TonePreset::default(),
            envelope: EnvelopeConfig::default(),
            // Eight full-scale notes land around tanh(2)
            master_gain: 0.25,
            limiter: Limiter::Tanh,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}
