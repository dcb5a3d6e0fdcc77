use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Phase-Accumulating Oscillator
=============================

The oscillator keeps a single number of state: `phase`, the position within
the current cycle, normalised to [0, 1). Each tick it

  1. reads the waveform at the current phase
  2. advances:  phase += frequency / sample_rate   (wrapped back into [0, 1))

Because the frequency only sets the *increment*, it can change on any tick
(vibrato, FM, pitch bend) without the phase ever jumping. A jump in phase is
a jump in the waveform, and a jump in the waveform is a click.

Waveforms
---------

  Sine   sin(2π · phase)

  Tine   A fixed additive blend approximating a struck tine: strong
         fundamental, a second harmonic, and two weak upper harmonics.

             n:      1     2     3     4
             weight: 1.0   0.4   0.15  0.1

         Harmonics at or above Nyquist are skipped so the blend can never
         alias. The sum is normalised by the total weight so the output
         stays inside [-1, 1].
*/

/// Harmonic number and weight of each component of the tine waveform.
const TINE_HARMONICS: [(f32, f32); 4] = [(1.0, 1.0), (2.0, 0.4), (3.0, 0.15), (4.0, 0.1)];

/// 1 / sum of the tine weights.
const TINE_NORM: f32 = 1.0 / (1.0 + 0.4 + 0.15 + 0.1);

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Tine,
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, sample_rate: f32) -> Self {
        Self {
            waveform,
            phase: 0.0,
            sample_rate,
        }
    }

    pub fn sine(sample_rate: f32) -> Self {
        Self::new(Waveform::Sine, sample_rate)
    }

    pub fn tine(sample_rate: f32) -> Self {
        Self::new(Waveform::Tine, sample_rate)
    }

    /// Return the sample at the current phase, then advance by one tick.
    #[inline]
    pub fn advance(&mut self, frequency: f32) -> f32 {
        let sample = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            Waveform::Tine => self.tine_sample(frequency),
        };

        self.phase = (self.phase + frequency / self.sample_rate).rem_euclid(1.0);
        // rem_euclid rounds tiny negative values up to exactly 1.0
        if self.phase >= 1.0 {
            self.phase = 0.0;
        }

        sample
    }

    #[inline]
    fn tine_sample(&self, frequency: f32) -> f32 {
        let nyquist = 0.5 * self.sample_rate;
        let fundamental = frequency.abs();

        let mut sum = 0.0;
        for &(harmonic, weight) in TINE_HARMONICS.iter() {
            if fundamental * harmonic >= nyquist {
                break;
            }
            sum += weight * (TAU * harmonic * self.phase).sin();
        }

        sum * TINE_NORM
    }

    /// Restart the cycle from phase 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn valid_sine() {
        let frequency = 440.0;
        let mut osc = Oscillator::sine(SAMPLE_RATE);

        let samples: Vec<f32> = (0..128).map(|_| osc.advance(frequency)).collect();

        // sample n should be sin(2pi f n / sr)
        let n = 12;
        let expected = (TAU * frequency * n as f32 / SAMPLE_RATE).sin();
        assert!(
            (samples[n] - expected).abs() < 1e-4,
            "expected {expected}, got {}",
            samples[n]
        );
        assert_eq!(samples[0], 0.0);
    }

    #[test]
    fn output_stays_in_range() {
        for waveform in [Waveform::Sine, Waveform::Tine] {
            for frequency in [20.0, 261.63, 440.0, 3_520.0, 12_000.0, 23_999.0] {
                let mut osc = Oscillator::new(waveform, SAMPLE_RATE);
                for _ in 0..4_800 {
                    let sample = osc.advance(frequency);
                    assert!(
                        (-1.0..=1.0).contains(&sample),
                        "{waveform:?} at {frequency} Hz produced {sample}"
                    );
                }
            }
        }
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut osc = Oscillator::tine(SAMPLE_RATE);
        for frequency in [440.0, -440.0, 17_000.0, -1e-6] {
            for _ in 0..1_000 {
                osc.advance(frequency);
                assert!((0.0..1.0).contains(&osc.phase()), "phase {}", osc.phase());
            }
        }
    }

    #[test]
    fn frequency_change_keeps_phase_continuous() {
        let mut osc = Oscillator::sine(SAMPLE_RATE);
        for _ in 0..100 {
            osc.advance(440.0);
        }

        let before = osc.phase();
        osc.advance(880.0);
        let after = osc.phase();

        let expected = (before + 880.0 / SAMPLE_RATE).rem_euclid(1.0);
        assert!(
            (after - expected).abs() < 1e-6,
            "phase jumped from {before} to {after}, expected {expected}"
        );
    }

    #[test]
    fn tine_drops_harmonics_above_nyquist() {
        // 2nd harmonic of 15 kHz is already above 24 kHz: only the fundamental remains
        let mut tine = Oscillator::tine(SAMPLE_RATE);
        let mut sine = Oscillator::sine(SAMPLE_RATE);

        for _ in 0..256 {
            let t = tine.advance(15_000.0);
            let s = sine.advance(15_000.0);
            assert!((t - s * TINE_NORM).abs() < 1e-5);
        }
    }

    #[test]
    fn reset_restarts_cycle() {
        let mut osc = Oscillator::sine(SAMPLE_RATE);
        for _ in 0..37 {
            osc.advance(1_000.0);
        }
        osc.reset();
        assert_eq!(osc.phase(), 0.0);
        assert_eq!(osc.advance(1_000.0), 0.0);
    }
}
