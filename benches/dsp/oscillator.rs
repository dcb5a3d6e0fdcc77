//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rhosy::dsp::oscillator::Oscillator;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - one sin() per sample
        let mut osc = Oscillator::sine(48_000.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.advance(black_box(440.0));
                }
            })
        });

        // Tine - four harmonics, Nyquist check per harmonic
        let mut osc = Oscillator::tine(48_000.0);
        group.bench_with_input(BenchmarkId::new("tine", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = osc.advance(black_box(440.0));
                }
            })
        });
    }

    group.finish();
}
