// Purpose - external interfaces, format conversions

pub mod converter;
pub mod midi;

pub use converter::midi_to_note_event;
pub use midi::MidiEvent;
