//! Benchmarks for complete engine render calls.
//!
//! Voices are held in sustain so every tick does full work.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rhosy::{EngineConfig, EnvelopeConfig, RenderEngine};

use crate::BLOCK_SIZES;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &voices in &[1usize, 8, 32] {
        for &size in BLOCK_SIZES {
            let config = EngineConfig::new(48_000.0, voices)
                .with_envelope(EnvelopeConfig::adsr(0.0, 0.0, 0.8, 0.3));
            let (mut engine, mut handle) =
                RenderEngine::with_queue(config).expect("valid bench config");

            for i in 0..voices {
                handle
                    .note_on(36 + i as u8, 0.8)
                    .expect("queue has room for every voice");
            }

            let mut buffer = vec![0.0f32; size];
            engine.render(&mut buffer);

            let id = BenchmarkId::new(format!("{voices}_voices"), size);
            group.bench_with_input(id, &size, |b, _| {
                b.iter(|| engine.render(black_box(&mut buffer)))
            });
        }
    }

    group.finish();
}
