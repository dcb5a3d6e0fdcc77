//! Real-time render entry point.
//!
//! The engine is split across two threads:
//!
//! - the **render thread** (the audio callback) owns the [`RenderEngine`] and
//!   calls [`RenderEngine::render`] once per buffer;
//! - the **control thread** (MIDI, keyboard, sequencer) owns the
//!   [`EngineHandle`] and pushes [`NoteEvent`]s into a bounded lock-free SPSC
//!   queue.
//!
//! At the top of each render call the queue is drained into the
//! [`Scheduler`]. Events are then applied at the tick they are stamped with,
//! so a note that lands mid-buffer starts mid-buffer. Nothing on the render
//! path allocates, locks, or waits on the producer.
//!
//! ```ignore
//! let (mut engine, mut handle) = RenderEngine::with_queue(EngineConfig::default())?;
//!
//! // control thread
//! handle.note_on(60, 0.8)?;
//!
//! // audio callback
//! engine.render(&mut buffer);
//! ```

pub mod scheduler;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, PushError, RingBuffer};

#[cfg(feature = "rtrb")]
use crate::error::EventError;
use crate::{
    config::EngineConfig,
    error::ConfigError,
    synth::{
        message::{EventReceiver, NoteEvent},
        mixer::Mixer,
        pool::VoicePool,
    },
};

pub use scheduler::Scheduler;

pub struct RenderEngine<R: EventReceiver> {
    config: EngineConfig,
    pool: VoicePool,
    mixer: Mixer,
    scheduler: Scheduler,
    rx: R,
    /// Tick of the first frame of the next buffer
    clock: u64,
    /// `clock` as seen by the control thread
    published: Arc<AtomicU64>,
}

impl<R: EventReceiver> RenderEngine<R> {
    /// Validate `config` and pre-allocate every voice.
    pub fn new(config: EngineConfig, rx: R) -> Result<Self, ConfigError> {
        config.validate()?;

        log::info!(
            "engine ready: {} voices, {} partials, {} Hz",
            config.max_polyphony,
            config.tone.partials.len(),
            config.sample_rate
        );

        Ok(Self {
            pool: VoicePool::new(&config)?,
            mixer: Mixer::new(config.master_gain, config.limiter),
            scheduler: Scheduler::new(config.event_capacity),
            rx,
            clock: 0,
            published: Arc::new(AtomicU64::new(0)),
            config,
        })
    }

    /// Fill `out` with the next `out.len()` mono frames.
    pub fn render(&mut self, out: &mut [f32]) {
        self.drain();

        for (offset, sample) in out.iter_mut().enumerate() {
            *sample = self.tick(self.clock + offset as u64);
        }

        self.advance(out.len());
    }

    /// Fill an interleaved buffer, writing the same sample to every channel.
    ///
    /// A trailing partial frame is zeroed. With `channels == 0` there are no
    /// frames: the buffer is zeroed and the clock does not move.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        if channels == 0 {
            out.fill(0.0);
            return;
        }

        self.drain();

        let mut frames = out.chunks_exact_mut(channels);
        let mut rendered = 0;
        for frame in &mut frames {
            let sample = self.tick(self.clock + rendered as u64);
            frame.fill(sample);
            rendered += 1;
        }
        frames.into_remainder().fill(0.0);

        self.advance(rendered);
    }

    /// Render `frame_count` frames into a new buffer.
    ///
    /// Allocates: for offline rendering and tests, not for the audio callback.
    pub fn render_vec(&mut self, frame_count: usize) -> Vec<f32> {
        let mut out = vec![0.0; frame_count];
        self.render(&mut out);
        out
    }

    /// Release every held note on the next tick.
    pub fn all_notes_off(&mut self) {
        let released = self.pool.release_all();
        log::debug!("all notes off: {released} voices released");
    }

    #[inline]
    fn tick(&mut self, now: u64) -> f32 {
        while let Some(event) = self.scheduler.pop_due(now) {
            self.pool.apply(&event);
        }
        self.mixer.mix(&mut self.pool)
    }

    /// Move queued events into the scheduler until it is full.
    ///
    /// Whatever does not fit stays in the queue for the next buffer.
    fn drain(&mut self) {
        while !self.scheduler.is_full() {
            let Some(event) = self.rx.pop() else {
                break;
            };
            if self.scheduler.enqueue(event).is_err() {
                break;
            }
        }
    }

    fn advance(&mut self, frames: usize) {
        self.clock += frames as u64;
        self.published.store(self.clock, Ordering::Release);
    }

    /// Tick of the first frame of the next buffer.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Shared view of the engine clock for producers.
    pub fn clock_source(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.published)
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Events drained from the queue but not yet applied.
    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }
}

#[cfg(feature = "rtrb")]
impl RenderEngine<Consumer<NoteEvent>> {
    /// Build an engine together with the handle that feeds it.
    ///
    /// The queue holds `config.event_capacity` events.
    pub fn with_queue(config: EngineConfig) -> Result<(Self, EngineHandle), ConfigError> {
        config.validate()?;

        let (tx, rx) = RingBuffer::<NoteEvent>::new(config.event_capacity);
        let engine = Self::new(config, rx)?;
        let handle = EngineHandle {
            tx,
            clock: engine.clock_source(),
        };

        Ok((engine, handle))
    }
}

/// Control-thread side of the engine.
///
/// Validates every event before it enters the queue; rejected events never
/// reach the render thread.
#[cfg(feature = "rtrb")]
pub struct EngineHandle {
    tx: Producer<NoteEvent>,
    clock: Arc<AtomicU64>,
}

#[cfg(feature = "rtrb")]
impl EngineHandle {
    /// Queue an event stamped by the caller.
    pub fn send(&mut self, event: NoteEvent) -> Result<(), EventError> {
        if let Err(err) = event.validate() {
            log::warn!("rejected note event: {err}");
            return Err(err);
        }

        match self.tx.push(event) {
            Ok(()) => Ok(()),
            Err(PushError::Full(event)) => {
                let err = EventError::QueueFull(event);
                log::warn!("{err}");
                Err(err)
            }
        }
    }

    /// Note-on at the start of the next buffer.
    pub fn note_on(&mut self, pitch: u8, velocity: f32) -> Result<(), EventError> {
        let event = NoteEvent::note_on(pitch, velocity, self.now());
        self.send(event)
    }

    /// Note-off at the start of the next buffer.
    pub fn note_off(&mut self, pitch: u8) -> Result<(), EventError> {
        let event = NoteEvent::note_off(pitch, self.now());
        self.send(event)
    }

    /// The engine tick at which the next rendered buffer begins.
    pub fn now(&self) -> u64 {
        self.clock.load(Ordering::Acquire)
    }

    /// Free slots in the queue.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }
}
