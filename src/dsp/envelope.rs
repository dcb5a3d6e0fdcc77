use crate::config::EnvelopeConfig;

/*
ADSR Envelope Generator
=======================

A linear ADSR whose state machine is an explicit tagged enum: each stage
carries its own progress counter, so every transition is a `match` arm the
compiler can check.

  Level
    1.0 ┐   ╱╲
        │  ╱  ╲
    S   │ ╱    ╲__________
        │╱                ╲
    0.0 └──────────────────╲──→ ticks
        Attack Decay Sustain Release

  Attack   0 → 1 over `attack_ticks`, then Decay
  Decay    1 → S over `decay_ticks`, then Sustain
  Sustain  hold S until release()           (the only unbounded stage)
  Release  L → 0 over `release_ticks`, then Idle
  Idle     level 0

Release starts from L, the level at the moment of release, whatever stage
we were in. Releasing halfway up the attack ramps down from there instead of
jumping to 1 or to S first.

Stage times are converted to ticks once, at construction:

    ticks = round(seconds * sample_rate)

A stage of zero ticks is crossed on the same tick that enters it, without
dividing by its length. With attack = decay = 0 the first tick after
trigger() already reads the sustain level, and with release = 0 the first
tick after release() reads 0.
*/

/// Which stage the envelope is in, without its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Stage plus per-stage progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvelopeState {
    Idle,
    Attack { elapsed: u32 },
    Decay { elapsed: u32 },
    Sustain,
    Release { elapsed: u32, from: f32 },
}

impl EnvelopeState {
    pub fn stage(&self) -> EnvelopeStage {
        match self {
            EnvelopeState::Idle => EnvelopeStage::Idle,
            EnvelopeState::Attack { .. } => EnvelopeStage::Attack,
            EnvelopeState::Decay { .. } => EnvelopeStage::Decay,
            EnvelopeState::Sustain => EnvelopeStage::Sustain,
            EnvelopeState::Release { .. } => EnvelopeStage::Release,
        }
    }

    /// Ticks spent in the current stage (0 for the untimed stages).
    pub fn elapsed(&self) -> u32 {
        match *self {
            EnvelopeState::Attack { elapsed }
            | EnvelopeState::Decay { elapsed }
            | EnvelopeState::Release { elapsed, .. } => elapsed,
            EnvelopeState::Idle | EnvelopeState::Sustain => 0,
        }
    }
}

#[inline]
fn seconds_to_ticks(seconds: f32, sample_rate: f32) -> u32 {
    // float -> int casts saturate, so absurdly long stages cap at u32::MAX
    (seconds * sample_rate).round() as u32
}

#[derive(Debug, Clone)]
pub struct EnvelopeGenerator {
    attack_ticks: u32,
    decay_ticks: u32,
    sustain: f32,
    release_ticks: u32,

    state: EnvelopeState,
    level: f32,
}

impl EnvelopeGenerator {
    /// Build from a validated configuration.
    pub fn new(config: &EnvelopeConfig, sample_rate: f32) -> Self {
        Self {
            attack_ticks: seconds_to_ticks(config.attack, sample_rate),
            decay_ticks: seconds_to_ticks(config.decay, sample_rate),
            sustain: config.sustain,
            release_ticks: seconds_to_ticks(config.release, sample_rate),
            state: EnvelopeState::Idle,
            level: 0.0,
        }
    }

    /// Gate high: restart the attack from zero.
    pub fn trigger(&mut self) {
        self.level = 0.0;
        self.enter(EnvelopeState::Attack { elapsed: 0 });
    }

    /// Gate low: ramp from the current level to zero.
    ///
    /// Ignored when idle or already releasing.
    pub fn release(&mut self) {
        match self.state {
            EnvelopeState::Idle | EnvelopeState::Release { .. } => {}
            _ => self.enter(EnvelopeState::Release {
                elapsed: 0,
                from: self.level,
            }),
        }
    }

    /// Advance by one tick and return the new level.
    pub fn tick(&mut self) -> f32 {
        loop {
            match self.state {
                EnvelopeState::Idle => {
                    self.level = 0.0;
                    break;
                }

                EnvelopeState::Attack { elapsed } => {
                    if self.attack_ticks == 0 {
                        self.level = 1.0;
                        self.enter(EnvelopeState::Decay { elapsed: 0 });
                        continue;
                    }

                    let elapsed = elapsed + 1;
                    if elapsed >= self.attack_ticks {
                        self.level = 1.0;
                        self.enter(EnvelopeState::Decay { elapsed: 0 });
                    } else {
                        self.level = elapsed as f32 / self.attack_ticks as f32;
                        self.state = EnvelopeState::Attack { elapsed };
                    }
                    break;
                }

                EnvelopeState::Decay { elapsed } => {
                    if self.decay_ticks == 0 {
                        self.level = self.sustain;
                        self.enter(EnvelopeState::Sustain);
                        continue;
                    }

                    let elapsed = elapsed + 1;
                    if elapsed >= self.decay_ticks {
                        self.level = self.sustain;
                        self.enter(EnvelopeState::Sustain);
                    } else {
                        let progress = elapsed as f32 / self.decay_ticks as f32;
                        self.level = 1.0 - (1.0 - self.sustain) * progress;
                        self.state = EnvelopeState::Decay { elapsed };
                    }
                    break;
                }

                EnvelopeState::Sustain => {
                    self.level = self.sustain;
                    break;
                }

                EnvelopeState::Release { elapsed, from } => {
                    let elapsed = elapsed + 1;
                    if elapsed >= self.release_ticks {
                        self.level = 0.0;
                        self.enter(EnvelopeState::Idle);
                    } else {
                        let progress = elapsed as f32 / self.release_ticks as f32;
                        self.level = from * (1.0 - progress);
                        self.state = EnvelopeState::Release { elapsed, from };
                    }
                    break;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    fn enter(&mut self, next: EnvelopeState) {
        log::trace!(
            "envelope {:?} -> {:?} at level {:.3}",
            self.state.stage(),
            next.stage(),
            self.level
        );
        self.state = next;
    }

    /// Drop straight to idle without a release ramp.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.level = 0.0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.state.stage()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, EnvelopeState::Idle)
    }
}
