// Purpose: Voice management, polyphony, note events
// This layer sits above the dsp primitives and manages the voice pool

pub mod message;
pub mod mixer;
pub mod pool;
pub mod tone;
pub mod voice;

pub use message::{EventReceiver, NoteEvent, NoteKind};
pub use mixer::Mixer;
pub use pool::{Allocation, VoicePool};
pub use tone::ToneModel;
pub use voice::{Voice, VoiceStatus};
