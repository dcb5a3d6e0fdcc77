//! Real-world scenario benchmarks.
//!
//! Whole render calls through the queue, mixer and limiter, the way the
//! audio callback drives the engine.

mod engine;

pub use engine::bench_engine;
