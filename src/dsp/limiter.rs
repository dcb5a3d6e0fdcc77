//! Soft limiting
//!
//! The mixer sums every sounding voice, so the raw sum can leave [-1, 1] when
//! several notes line up. Hard clipping that sum flattens the peaks and adds
//! harsh odd harmonics. A soft limiter instead bends the transfer curve:
//! nearly linear for quiet input, approaching ±1 asymptotically for loud
//! input.
//!
//! # Transfer Functions
//!
//! Tanh:
//!   f(x) = tanh(x)
//!   - Unity slope at zero, so quiet passages pass through untouched
//!   - Smooth knee, the usual choice for a master bus
//!
//! Rational:
//!   f(x) = x / (1 + |x|)
//!   - Cheaper (no transcendental)
//!   - Softer knee, starts compressing earlier
//!
//! Both map any finite input into [-1, 1].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Limiter {
    #[default]
    Tanh,
    Rational,
}

impl Limiter {
    #[inline]
    pub fn apply(self, sample: f32) -> f32 {
        match self {
            Limiter::Tanh => tanh_limit(sample),
            Limiter::Rational => rational_limit(sample),
        }
    }
}

/// Hyperbolic tangent saturation.
#[inline]
pub fn tanh_limit(sample: f32) -> f32 {
    sample.tanh()
}

/// Rational saturation, x / (1 + |x|).
#[inline]
pub fn rational_limit(sample: f32) -> f32 {
    sample / (1.0 + sample.abs())
}
