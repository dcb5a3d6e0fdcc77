#![cfg(feature = "rtrb")]

use std::{thread, time::Duration};

use rhosy::{EngineConfig, EnvelopeConfig, NoteEvent, RenderEngine, TonePreset};

fn gate_config(voices: usize) -> EngineConfig {
    EngineConfig::new(48_000.0, voices).with_envelope(EnvelopeConfig::adsr(0.0, 0.0, 1.0, 0.0))
}

fn render_in_blocks<R: rhosy::synth::EventReceiver>(
    engine: &mut RenderEngine<R>,
    frames: usize,
    block: usize,
) -> Vec<f32> {
    let mut out = vec![0.0; frames];
    for chunk in out.chunks_mut(block) {
        engine.render(chunk);
    }
    out
}

#[test]
fn held_note_sounds_until_note_off() {
    let (mut engine, mut handle) = RenderEngine::with_queue(gate_config(1)).unwrap();
    handle.send(NoteEvent::note_on(69, 1.0, 0)).unwrap();
    handle.send(NoteEvent::note_off(69, 48_000)).unwrap();

    // 256 does not divide 48000, so the note-off lands mid-buffer
    let out = render_in_blocks(&mut engine, 96_000, 256);

    assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
    for (window, samples) in out[..48_000].chunks(480).enumerate() {
        assert!(
            samples.iter().any(|&s| s != 0.0),
            "silent window {window} while the key is held"
        );
    }
    assert!(
        out[48_000..].iter().all(|&s| s == 0.0),
        "zero release must silence at the note-off tick"
    );
    assert_eq!(engine.pool().active_count(), 0);
}

#[test]
fn block_size_does_not_change_output() {
    let events = [
        NoteEvent::note_on(60, 0.9, 3),
        NoteEvent::note_on(64, 0.7, 17),
        NoteEvent::note_on(67, 0.8, 17),
        NoteEvent::note_off(60, 1_000),
        NoteEvent::note_on(72, 1.0, 1_001),
        NoteEvent::note_off(64, 2_222),
        NoteEvent::note_off(67, 2_223),
        NoteEvent::note_off(72, 3_000),
    ];

    let render = |block: usize| {
        let config = EngineConfig::new(48_000.0, 4)
            .with_envelope(EnvelopeConfig::adsr(0.002, 0.05, 0.6, 0.01));
        let (mut engine, mut handle) = RenderEngine::with_queue(config).unwrap();
        for event in events {
            handle.send(event).unwrap();
        }
        render_in_blocks(&mut engine, 4_800, block)
    };

    let reference = render(4_800);
    for block in [1, 16, 64, 333] {
        assert_eq!(render(block), reference, "block size {block} diverged");
    }
}

#[test]
fn dense_chords_stay_in_range() {
    let voices = 8;
    let config = EngineConfig::new(48_000.0, voices);
    let (mut engine, mut handle) = RenderEngine::with_queue(config).unwrap();

    let mut tick = 0;
    for step in 0..24u64 {
        for i in 0..voices as u8 {
            handle
                .send(NoteEvent::note_on(40 + i * 5 + (step % 3) as u8, 1.0, tick))
                .unwrap();
        }
        tick += 200;
    }

    let out = render_in_blocks(&mut engine, 9_600, 128);
    let peak = out.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    assert!(peak > 0.1 && peak <= 1.0, "peak {peak}");
    assert!(engine.pool().active_count() <= voices);
}

#[test]
fn producer_thread_races_render_thread() {
    let config = EngineConfig::new(48_000.0, 4)
        .with_tone(TonePreset::electric_piano())
        .with_envelope(EnvelopeConfig::adsr(0.001, 0.05, 0.5, 0.005));
    let (mut engine, mut handle) = RenderEngine::with_queue(config).unwrap();

    let producer = thread::spawn(move || {
        for i in 0..400u32 {
            let pitch = 48 + (i * 7 % 24) as u8;
            // A full queue is a normal outcome here; keep playing.
            let _ = handle.note_on(pitch, 0.8);
            if i % 2 == 1 {
                let _ = handle.note_off(pitch);
            }
            thread::sleep(Duration::from_micros(50));
        }
    });

    let mut buffer = [0.0f32; 64];
    while !producer.is_finished() {
        engine.render(&mut buffer);
        assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));

        let voices = engine.pool().voices();
        for (i, a) in voices.iter().enumerate() {
            for b in &voices[i + 1..] {
                assert!(!(a.is_sounding() && b.is_sounding() && a.pitch() == b.pitch()));
            }
        }
    }
    producer.join().unwrap();
}
