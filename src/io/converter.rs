use crate::{io::midi::MidiEvent, synth::message::NoteEvent};

/// Largest MIDI data byte, full velocity.
const MIDI_VELOCITY_MAX: f32 = 127.0;

/// Convert a MIDI message on `channel_filter` into a note event at `timestamp`.
///
/// A note-on with velocity 0 is a note-off (running-status keyboards send
/// these instead of real note-offs). Messages on other channels and
/// non-note messages yield `None`.
pub fn midi_to_note_event(midi: MidiEvent, channel_filter: u8, timestamp: u64) -> Option<NoteEvent> {
    if midi.channel() != channel_filter {
        return None;
    }

    match midi {
        MidiEvent::NoteOn { key, velocity: 0, .. } => Some(NoteEvent::note_off(key, timestamp)),
        MidiEvent::NoteOn { key, velocity, .. } => Some(NoteEvent::note_on(
            key,
            velocity_to_unit(velocity),
            timestamp,
        )),
        MidiEvent::NoteOff { key, .. } => Some(NoteEvent::note_off(key, timestamp)),
        other => {
            log::debug!("ignoring MIDI message {other:?}");
            None
        }
    }
}

/// Map a 7-bit MIDI velocity onto 0.0..=1.0.
pub fn velocity_to_unit(velocity: u8) -> f32 {
    (velocity as f32 / MIDI_VELOCITY_MAX).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::message::NoteKind;

    #[test]
    fn note_on_scales_velocity() {
        let event = midi_to_note_event(
            MidiEvent::NoteOn {
                channel: 0,
                key: 60,
                velocity: 127,
            },
            0,
            42,
        )
        .unwrap();

        assert_eq!(event.kind, NoteKind::NoteOn);
        assert_eq!(event.pitch, 60);
        assert_eq!(event.velocity, 1.0);
        assert_eq!(event.timestamp, 42);
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        let event = midi_to_note_event(
            MidiEvent::NoteOn {
                channel: 2,
                key: 64,
                velocity: 0,
            },
            2,
            0,
        )
        .unwrap();

        assert_eq!(event.kind, NoteKind::NoteOff);
        assert_eq!(event.pitch, 64);
    }

    #[test]
    fn filters_channel_and_non_note_messages() {
        let other_channel = MidiEvent::NoteOn {
            channel: 1,
            key: 60,
            velocity: 100,
        };
        assert_eq!(midi_to_note_event(other_channel, 0, 0), None);

        let control = MidiEvent::ControlChange {
            channel: 0,
            controller: 23,
            value: 127,
        };
        assert_eq!(midi_to_note_event(control, 0, 0), None);
    }

    #[test]
    fn high_data_bytes_stay_in_range() {
        // Malformed data bytes (bit 7 set) still produce a valid event
        assert_eq!(velocity_to_unit(255), 1.0);
        assert!((velocity_to_unit(64) - 0.504).abs() < 1e-3);
    }
}
