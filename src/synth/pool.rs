use crate::{
    config::EngineConfig,
    error::ConfigError,
    synth::{
        message::{NoteEvent, NoteKind},
        voice::{Voice, VoiceStatus},
    },
};

/// Where a note-on landed in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    /// An idle voice was free
    Fresh(usize),
    /// The voice already holding this pitch was restarted
    Retriggered(usize),
    /// A sounding voice playing `previous_pitch` was taken over
    Stolen { slot: usize, previous_pitch: u8 },
}

impl Allocation {
    pub fn slot(&self) -> usize {
        match *self {
            Allocation::Fresh(slot) | Allocation::Retriggered(slot) => slot,
            Allocation::Stolen { slot, .. } => slot,
        }
    }
}

/// Fixed-size voice pool with note-on allocation and note-off routing.
///
/// All voices are built up front and live for as long as the pool. Slots are
/// reused by index; nothing is allocated or freed per note.
///
/// At most one voice is sounding (active or releasing) for any pitch. The
/// pool is never empty: [`VoicePool::new`] rejects zero polyphony.
pub struct VoicePool {
    voices: Box<[Voice]>,
}

impl VoicePool {
    /// Validate `config` and build its `max_polyphony` voices.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let voices = (0..config.max_polyphony)
            .map(|id| Voice::new(id, &config.tone, &config.envelope, config.sample_rate))
            .collect();

        Ok(Self { voices })
    }

    /// Allocate a voice for `pitch`.
    ///
    /// Preference order:
    /// 1. the voice already sounding this pitch (faded out and restarted)
    /// 2. the first idle voice by slot index
    /// 3. the oldest releasing voice
    /// 4. the oldest active voice
    ///
    /// Age ties go to the lowest slot index so allocation is reproducible.
    /// A reused voice fades its old note out before the new one starts, see
    /// [`Voice::steal`].
    pub fn note_on(&mut self, pitch: u8, velocity: f32) -> Allocation {
        let allocation = self.choose(pitch);
        let voice = &mut self.voices[allocation.slot()];

        match allocation {
            Allocation::Fresh(_) => {
                if let Err(err) = voice.activate(pitch, velocity) {
                    log::warn!("note on {pitch} dropped: {err}");
                }
            }
            Allocation::Retriggered(_) | Allocation::Stolen { .. } => voice.steal(pitch, velocity),
        }

        match allocation {
            Allocation::Stolen {
                slot,
                previous_pitch,
            } => log::trace!("voice {slot} stolen from {previous_pitch} for {pitch}"),
            _ => log::debug!("note on {pitch} velocity {velocity:.2} -> voice {}", allocation.slot()),
        }

        allocation
    }

    /// Release the active voice holding `pitch`.
    ///
    /// Returns false (and changes nothing) when no voice is active for that
    /// pitch: it may already be releasing, or have been stolen.
    pub fn note_off(&mut self, pitch: u8) -> bool {
        match self
            .voices
            .iter_mut()
            .find(|v| v.status() == VoiceStatus::Active && v.pitch() == pitch)
        {
            Some(voice) => {
                log::debug!("note off {pitch} -> voice {}", voice.id());
                voice.release()
            }
            None => false,
        }
    }

    /// Route a note event to `note_on` or `note_off`.
    pub fn apply(&mut self, event: &NoteEvent) {
        match event.kind {
            NoteKind::NoteOn => {
                self.note_on(event.pitch, event.velocity);
            }
            NoteKind::NoteOff => {
                self.note_off(event.pitch);
            }
        }
    }

    /// Release every active voice. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        self.voices
            .iter_mut()
            .map(|voice| voice.release())
            .filter(|released| *released)
            .count()
    }

    fn choose(&self, pitch: u8) -> Allocation {
        if let Some(slot) = self
            .voices
            .iter()
            .position(|v| v.is_sounding() && v.pitch() == pitch)
        {
            return Allocation::Retriggered(slot);
        }

        if let Some(slot) = self.voices.iter().position(Voice::is_idle) {
            return Allocation::Fresh(slot);
        }

        // Every voice is sounding here. Releasing beats Active, then the
        // older voice wins; the strict comparison keeps the lowest slot on ties.
        let rank = |voice: &Voice| (voice.status() == VoiceStatus::Releasing, voice.age());
        let slot = (1..self.voices.len()).fold(0, |best, slot| {
            if rank(&self.voices[slot]) > rank(&self.voices[best]) {
                slot
            } else {
                best
            }
        });

        Allocation::Stolen {
            slot,
            previous_pitch: self.voices[slot].pitch(),
        }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub(crate) fn voices_mut(&mut self) -> &mut [Voice] {
        &mut self.voices
    }

    /// The sounding voice for `pitch`, if any.
    pub fn voice_for(&self, pitch: u8) -> Option<&Voice> {
        self.voices
            .iter()
            .find(|v| v.is_sounding() && v.pitch() == pitch)
    }

    /// Number of active or releasing voices.
    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_sounding()).count()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
