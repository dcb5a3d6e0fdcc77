#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::error::EventError;

/// Highest valid MIDI note number.
pub const MAX_PITCH: u8 = 127;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoteKind {
    NoteOn,
    NoteOff,
}

/// A note event stamped in the engine's tick clock.
///
/// Events are `Copy` and consumed exactly once by the voice pool.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NoteEvent {
    pub kind: NoteKind,
    /// MIDI note number (0 - 127)
    pub pitch: u8,
    /// Strike intensity (0.0 - 1.0)
    pub velocity: f32,
    /// Sample tick at which the event takes effect
    pub timestamp: u64,
}

impl NoteEvent {
    pub fn note_on(pitch: u8, velocity: f32, timestamp: u64) -> Self {
        Self {
            kind: NoteKind::NoteOn,
            pitch,
            velocity,
            timestamp,
        }
    }

    pub fn note_off(pitch: u8, timestamp: u64) -> Self {
        Self {
            kind: NoteKind::NoteOff,
            pitch,
            velocity: 0.0,
            timestamp,
        }
    }

    /// Check the event against the MIDI pitch range and unit velocity range.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.pitch > MAX_PITCH {
            return Err(EventError::PitchOutOfRange(self.pitch));
        }
        // NaN fails `contains`
        if !(0.0..=1.0).contains(&self.velocity) {
            return Err(EventError::VelocityOutOfRange(self.velocity));
        }
        Ok(())
    }
}

/// Render-side end of the note event queue.
pub trait EventReceiver {
    fn pop(&mut self) -> Option<NoteEvent>;
}

#[cfg(feature = "rtrb")]
impl EventReceiver for Consumer<NoteEvent> {
    fn pop(&mut self) -> Option<NoteEvent> {
        Consumer::pop(self).ok()
    }
}
