//! Benchmarks for a single voice's tone model.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rhosy::{synth::tone::ToneModel, EnvelopeConfig, TonePreset};

use crate::BLOCK_SIZES;

pub fn bench_tone(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/tone");
    let envelope = EnvelopeConfig::adsr(0.0, 0.0, 1.0, 0.1);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Baseline: one sine partial
        let mut sine = ToneModel::new(&TonePreset::sine(), &envelope, 48_000.0);
        sine.activate(69, 1.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = sine.tick();
                }
                black_box(&buffer);
            })
        });

        // Electric piano: three partials with FM on the body
        let mut piano = ToneModel::new(&TonePreset::electric_piano(), &envelope, 48_000.0);
        piano.activate(69, 1.0);
        group.bench_with_input(BenchmarkId::new("electric_piano", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = piano.tick();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
