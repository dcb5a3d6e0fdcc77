use crate::{
    config::{EnvelopeConfig, TonePreset},
    error::VoiceError,
    synth::tone::ToneModel,
};

/// How long a stolen voice takes to fade its old note out.
pub const STEAL_FADE_SECONDS: f32 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceStatus {
    Idle,      // Available for allocation
    Active,    // Key held, envelope in attack/decay/sustain
    Releasing, // Key released, envelope in release
}

/// A single pool slot: one tone model plus lifecycle bookkeeping.
#[derive(Debug, Clone)]
pub struct Voice {
    id: usize,
    status: VoiceStatus,
    pitch: u8,
    velocity: f32,
    /// Ticks since activation
    age: u64,
    tone: ToneModel,

    // Ticks of fade left on the previous note; the new note starts at 0
    fade_remaining: u32,
    fade_ticks: u32,
}

impl Voice {
    pub fn new(id: usize, preset: &TonePreset, envelope: &EnvelopeConfig, sample_rate: f32) -> Self {
        Self {
            id,
            status: VoiceStatus::Idle,
            pitch: 0,
            velocity: 0.0,
            age: 0,
            tone: ToneModel::new(preset, envelope, sample_rate),
            fade_remaining: 0,
            fade_ticks: (STEAL_FADE_SECONDS * sample_rate).round() as u32,
        }
    }

    /// Start a note on an idle voice.
    pub fn activate(&mut self, pitch: u8, velocity: f32) -> Result<(), VoiceError> {
        if self.status != VoiceStatus::Idle {
            return Err(VoiceError::NotIdle {
                voice: self.id,
                status: self.status,
            });
        }

        self.pitch = pitch;
        self.velocity = velocity;
        self.status = VoiceStatus::Active;
        self.age = 0;
        self.tone.activate(pitch, velocity);
        Ok(())
    }

    /// Hand the voice to a new note, whatever its status.
    ///
    /// A sounding voice keeps playing its old note under a linear fade of
    /// [`STEAL_FADE_SECONDS`], then starts the new one from phase 0. Pitch,
    /// velocity and status belong to the new note from this call on, and age
    /// restarts at 0.
    pub fn steal(&mut self, pitch: u8, velocity: f32) {
        let sounding = self.is_sounding();

        self.pitch = pitch;
        self.velocity = velocity;
        self.status = VoiceStatus::Active;
        self.age = 0;

        if !sounding || self.fade_ticks == 0 {
            self.fade_remaining = 0;
            self.tone.activate(pitch, velocity);
        } else if self.fade_remaining == 0 {
            // Stolen again mid-fade: keep fading from where it is
            self.fade_remaining = self.fade_ticks;
        }
    }

    /// Key up. Returns false if the voice was not active.
    pub fn release(&mut self) -> bool {
        if self.status != VoiceStatus::Active {
            return false;
        }

        self.status = VoiceStatus::Releasing;
        // Mid-fade the envelope still belongs to the old note
        if self.fade_remaining == 0 {
            self.tone.release();
        }
        true
    }

    /// Advance one tick.
    ///
    /// Idle voices return 0 without touching their state. A voice whose
    /// envelope finishes on this tick goes back to Idle.
    pub fn tick(&mut self) -> f32 {
        if self.status == VoiceStatus::Idle {
            return 0.0;
        }

        self.age += 1;

        if self.fade_remaining > 0 {
            let gain = self.fade_remaining as f32 / self.fade_ticks as f32;
            let sample = gain * self.tone.tick();
            self.fade_remaining -= 1;
            if self.fade_remaining == 0 || self.tone.is_idle() {
                self.start_pending();
            }
            return sample;
        }

        let sample = self.tone.tick();
        if self.tone.is_idle() {
            self.status = VoiceStatus::Idle;
        }

        sample
    }

    fn start_pending(&mut self) {
        self.fade_remaining = 0;
        self.tone.activate(self.pitch, self.velocity);
        if self.status == VoiceStatus::Releasing {
            self.tone.release();
        }
    }

    /// Cut the voice off immediately and return it to Idle.
    pub fn reset(&mut self) {
        self.tone.reset();
        self.fade_remaining = 0;
        self.status = VoiceStatus::Idle;
    }

    /// True while the previous note is still fading out.
    pub fn is_fading(&self) -> bool {
        self.fade_remaining > 0
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn status(&self) -> VoiceStatus {
        self.status
    }

    pub fn is_idle(&self) -> bool {
        self.status == VoiceStatus::Idle
    }

    /// Active or releasing.
    pub fn is_sounding(&self) -> bool {
        matches!(self.status, VoiceStatus::Active | VoiceStatus::Releasing)
    }

    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn tone(&self) -> &ToneModel {
        &self.tone
    }
}
