use crate::{dsp::limiter::Limiter, synth::pool::VoicePool};

/// Sums the sounding voices into one limited output sample.
#[derive(Debug, Clone, Copy)]
pub struct Mixer {
    gain: f32,
    limiter: Limiter,
}

impl Mixer {
    pub fn new(gain: f32, limiter: Limiter) -> Self {
        Self { gain, limiter }
    }

    /// Tick every sounding voice once and return the limited sum.
    ///
    /// Idle voices are skipped, not ticked.
    #[inline]
    pub fn mix(&self, pool: &mut VoicePool) -> f32 {
        let mut sum = 0.0;
        for voice in pool.voices_mut() {
            if !voice.is_idle() {
                sum += voice.tick();
            }
        }
        self.limiter.apply(sum * self.gain)
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn limiter(&self) -> Limiter {
        self.limiter
    }
}
