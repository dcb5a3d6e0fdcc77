use crate::{
    config::{EnvelopeConfig, Modulation, TonePreset},
    dsp::{envelope::EnvelopeGenerator, oscillator::Oscillator},
};

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

#[derive(Debug, Clone)]
struct PartialState {
    osc: Oscillator,
    ratio: f32,
    weight: f32,
    /// Unmodulated frequency for the current note
    frequency: f32,
    /// `weight`, or 0 when this partial would sit above Nyquist
    gain: f32,
}

/// The sound of one voice: a fixed set of partials shaped by one envelope.
///
/// Partials are allocated once at construction. `activate` only rewrites
/// their state, so playing a note never touches the heap.
#[derive(Debug, Clone)]
pub struct ToneModel {
    partials: Box<[PartialState]>,
    modulation: Option<Modulation>,
    envelope: EnvelopeGenerator,
    velocity: f32,
    nyquist: f32,
    sample_rate: f32,

    // Modulation index for the current tick, and its per-tick decay factor
    depth: f32,
    depth_decay: f32,
    modulator_frequency: f32,
}

impl ToneModel {
    /// Build from a validated preset and envelope.
    pub fn new(preset: &TonePreset, envelope: &EnvelopeConfig, sample_rate: f32) -> Self {
        let partials = preset
            .partials
            .iter()
            .map(|partial| PartialState {
                osc: Oscillator::new(partial.waveform, sample_rate),
                ratio: partial.ratio,
                weight: partial.weight,
                frequency: 0.0,
                gain: 0.0,
            })
            .collect();

        let depth_decay = match preset.modulation {
            Some(modulation) if modulation.decay > 0.0 => {
                (-1.0 / (modulation.decay * sample_rate)).exp()
            }
            _ => 1.0,
        };

        Self {
            partials,
            modulation: preset.modulation,
            envelope: EnvelopeGenerator::new(envelope, sample_rate),
            velocity: 0.0,
            nyquist: 0.5 * sample_rate,
            sample_rate,
            depth: 0.0,
            depth_decay,
            modulator_frequency: 0.0,
        }
    }

    /// Start a note: all phases back to 0, envelope back to Attack.
    pub fn activate(&mut self, pitch: u8, velocity: f32) {
        let fundamental = midi_note_to_freq(pitch);

        for partial in self.partials.iter_mut() {
            partial.osc.reset();
            partial.frequency = fundamental * partial.ratio;
            partial.gain = if partial.frequency < self.nyquist {
                partial.weight
            } else {
                0.0
            };
        }

        self.velocity = velocity;
        self.depth = 0.0;
        self.modulator_frequency = 0.0;
        if let Some(modulation) = self.modulation {
            let source = &self.partials[modulation.source];
            // A modulator above Nyquist would only feed aliases into the carrier
            if source.frequency < self.nyquist {
                self.depth = modulation.depth * velocity;
                self.modulator_frequency = source.frequency;
            }
        }
        self.envelope.trigger();
    }

    pub fn release(&mut self) {
        self.envelope.release();
    }

    /// Silence immediately, without a release ramp.
    pub fn reset(&mut self) {
        self.envelope.reset();
        self.depth = 0.0;
    }

    /// Produce one sample: `velocity * level * Σ gain_i * osc_i`.
    pub fn tick(&mut self) -> f32 {
        let level = self.envelope.tick();

        // The modulator runs first so the carrier sees this tick's value.
        let modulator = match self.modulation {
            Some(modulation) => {
                let source = &mut self.partials[modulation.source];
                let sample = source.osc.advance(source.frequency);
                Some((modulation.source, modulation.target, sample))
            }
            None => None,
        };

        let mut sum = 0.0;
        for (index, partial) in self.partials.iter_mut().enumerate() {
            let sample = match modulator {
                Some((source, _, sample)) if source == index => sample,
                Some((_, target, sample)) if target == index => {
                    // Through-zero FM: the carrier may briefly run backwards
                    let deviation = self.depth * self.modulator_frequency * sample;
                    let frequency =
                        (partial.frequency + deviation).clamp(-self.nyquist, self.nyquist);
                    partial.osc.advance(frequency)
                }
                _ => partial.osc.advance(partial.frequency),
            };
            sum += partial.gain * sample;
        }

        self.depth *= self.depth_decay;

        self.velocity * level * sum
    }

    pub fn is_idle(&self) -> bool {
        self.envelope.is_idle()
    }

    pub fn envelope(&self) -> &EnvelopeGenerator {
        &self.envelope
    }

    /// Current modulation index (already scaled by velocity).
    pub fn modulation_depth(&self) -> f32 {
        self.depth
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Upper bound on |tick()| for the current note.
    pub fn peak(&self) -> f32 {
        self.velocity * self.partials.iter().map(|p| p.gain).sum::<f32>()
    }
}
