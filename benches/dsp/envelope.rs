//! Benchmarks for the ADSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rhosy::{dsp::envelope::EnvelopeGenerator, EnvelopeConfig};

use crate::BLOCK_SIZES;

fn render(env: &mut EnvelopeGenerator, buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = env.tick();
    }
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = EnvelopeGenerator::new(&EnvelopeConfig::adsr(100.0, 0.1, 0.7, 0.3), 48_000.0);
        env.trigger();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| render(&mut env, black_box(&mut buffer)))
        });

        // Sustain phase (holding steady)
        let mut env = EnvelopeGenerator::new(&EnvelopeConfig::adsr(0.0, 0.0, 0.7, 0.3), 48_000.0);
        env.trigger();
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| render(&mut env, black_box(&mut buffer)))
        });

        // Release phase (ramping down)
        let mut env = EnvelopeGenerator::new(&EnvelopeConfig::adsr(0.0, 0.0, 0.7, 100.0), 48_000.0);
        env.trigger();
        env.tick();
        env.release();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| render(&mut env, black_box(&mut buffer)))
        });
    }

    group.finish();
}
