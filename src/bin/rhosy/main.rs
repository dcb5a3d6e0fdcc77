//! rhosy - plays a short electric piano phrase on the default output device
//!
//! Run with: RUST_LOG=debug cargo run

use std::{thread, time::Duration};

use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SampleFormat,
};
use rhosy::{EngineConfig, EngineHandle, NoteEvent, RenderEngine};

/// (chord, beats held)
const PHRASE: &[(&[u8], f32)] = &[
    (&[50, 57, 60, 65], 2.0), // Dm9 shell
    (&[55, 59, 62, 65], 2.0), // G7
    (&[48, 55, 59, 64], 3.0), // Cmaj7
    (&[45, 55, 60, 64], 1.0), // Am7
];

const BPM: f32 = 84.0;

/// Lead time before the first note so it lands inside a future buffer.
const START_DELAY_SECS: f32 = 0.1;

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let supported = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    if supported.sample_format() != SampleFormat::F32 {
        bail!("output device wants {:?} samples, only f32 is supported", supported.sample_format());
    }

    let sample_rate = supported.sample_rate().0 as f32;
    let channels = supported.channels() as usize;
    log::info!("output: {sample_rate} Hz, {channels} channels");

    let config = EngineConfig::new(sample_rate, 8);
    let (mut engine, mut handle) = RenderEngine::with_queue(config)?;

    // The engine moves into the callback; the handle stays here.
    let stream = device.build_output_stream(
        &supported.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            engine.render_interleaved(data, channels);
        },
        |err| log::warn!("output stream: {err}"),
        None,
    )?;
    stream.play()?;

    let ticks = schedule(&mut handle, sample_rate)?;

    // Let the last chord ring out through its release
    let seconds = ticks as f32 / sample_rate + 1.0;
    thread::sleep(Duration::from_secs_f32(seconds));

    Ok(())
}

/// Queue the whole phrase with exact tick stamps. Returns the end tick
/// relative to now.
fn schedule(handle: &mut EngineHandle, sample_rate: f32) -> Result<u64> {
    let ticks_per_beat = (60.0 / BPM * sample_rate) as u64;
    let start = handle.now() + (START_DELAY_SECS * sample_rate) as u64;

    let mut at = start;
    for &(chord, beats) in PHRASE {
        let end = at + (beats * ticks_per_beat as f32) as u64;

        for (i, &pitch) in chord.iter().enumerate() {
            // Roll the chord slightly, low note first
            let strum = i as u64 * ticks_per_beat / 48;
            handle.send(NoteEvent::note_on(pitch, 0.85 - 0.1 * i as f32, at + strum))?;
        }
        for &pitch in chord {
            handle.send(NoteEvent::note_off(pitch, end))?;
        }

        at = end;
    }

    log::info!("queued {} chords, {} left in queue", PHRASE.len(), handle.slots());
    Ok(at - handle.now())
}
