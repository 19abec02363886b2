//! Deterministic random streams for layout generation.

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

/// Source of uniformly distributed floats in `[0, 1)`.
///
/// The generator draws every decision from this stream, so two runs fed the
/// same stream produce the same layout.
pub trait UnitRng {
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `[min, max]`.
    fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = f64::from(max - min + 1);
        (min + (self.next_unit() * span).floor() as i32).min(max)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }

    fn pick<T: Copy>(&mut self, options: &[T]) -> T {
        debug_assert!(!options.is_empty());
        let index = ((self.next_unit() * options.len() as f64).floor() as usize)
            .min(options.len() - 1);
        options[index]
    }
}

pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Seeds from free-form text. Plain unsigned integers seed numerically so
    /// `"42"` and `SeededRng::new(42)` agree; anything else is folded first.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.parse::<u64>() {
            Ok(seed) => Self::new(seed),
            Err(_) => Self::new(u64::from(fold_seed(trimmed))),
        }
    }
}

impl UnitRng for SeededRng {
    fn next_unit(&mut self) -> f64 {
        f64::from(self.inner.next_u32()) / 4_294_967_296.0
    }
}

/// Polynomial rolling hash (`h * 31 + unit`) over UTF-16 code units.
pub fn fold_seed(text: &str) -> u32 {
    text.encode_utf16()
        .fold(0_u32, |hash, unit| hash.wrapping_mul(31).wrapping_add(u32::from(unit)))
}
