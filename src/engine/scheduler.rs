use std::collections::VecDeque;

use crate::synth::message::NoteEvent;

/// Pending note events on the render thread, in timestamp order.
///
/// The buffer is allocated once with a fixed capacity. Each event is inserted
/// after every pending event with the same or an earlier timestamp, so ties
/// keep arrival order. An event stamped earlier than a pending event for the
/// same pitch is moved forward to that event's timestamp: a note-off can never
/// overtake the note-on it follows. Events for other pitches keep their own
/// timestamps.
#[derive(Debug)]
pub struct Scheduler {
    pending: VecDeque<NoteEvent>,
    capacity: usize,
}

impl Scheduler {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add an event to the timeline. A full scheduler hands the event back.
    pub fn enqueue(&mut self, mut event: NoteEvent) -> Result<(), NoteEvent> {
        if self.is_full() {
            return Err(event);
        }

        if let Some(previous) = self.pending.iter().rev().find(|e| e.pitch == event.pitch) {
            event.timestamp = event.timestamp.max(previous.timestamp);
        }

        let index = self
            .pending
            .partition_point(|pending| pending.timestamp <= event.timestamp);
        self.pending.insert(index, event);
        Ok(())
    }

    /// Pop the next event if it is due at or before tick `now`.
    #[inline]
    pub fn pop_due(&mut self, now: u64) -> Option<NoteEvent> {
        match self.pending.front() {
            Some(event) if event.timestamp <= now => self.pending.pop_front(),
            _ => None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.pending.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
