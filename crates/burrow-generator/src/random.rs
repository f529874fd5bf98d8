use crate::Generator;
use burrow_core::ShortCode;
use jiff::Timestamp;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::ops::Range;

/// Characters a generated code is drawn from.
pub const ALPHABET: &[u8; 52] = b"aAbBcCdDeEfFgGhHiIjJkKlLmMnNoOpPqQrRsStTuUvVwWxXyYzZ";

/// Lengths a generated code may have (2 to 9 characters).
pub const LENGTH_RANGE: Range<usize> = 2..10;

/// Draws random short codes of random length from [`ALPHABET`].
///
/// The generator never looks at the store, so a fresh code may already be
/// taken. Collisions are left to the caller.
#[derive(Debug)]
pub struct RandomGenerator<R = StdRng> {
    rng: Mutex<R>,
}

impl RandomGenerator<StdRng> {
    /// Seeds a [`StdRng`] once from the wall clock.
    pub fn seeded_from_clock() -> Self {
        let nanos = Timestamp::now().as_nanosecond();
        Self::with_seed(nanos as u64)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> RandomGenerator<R> {
    /// Uses the given random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn draw(&self) -> String {
        let mut rng = self.rng.lock();
        let length = rng.gen_range(LENGTH_RANGE);
        (0..length)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl<R: RngCore + Send + 'static> Generator for RandomGenerator<R> {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        ShortCode::new_unchecked(self.draw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn codes_have_valid_length_and_alphabet() {
        let generator = RandomGenerator::with_seed(42);

        for _ in 0..1_000 {
            let code = generator.generate();
            assert!(LENGTH_RANGE.contains(&code.as_str().len()), "{code}");
            assert!(code.as_str().chars().all(|c| c.is_ascii_alphabetic()));
            assert!(ShortCode::new(code.as_str()).is_ok());
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let first = RandomGenerator::with_seed(7);
        let second = RandomGenerator::with_seed(7);

        for _ in 0..32 {
            assert_eq!(first.generate(), second.generate());
        }
    }

    #[test]
    fn covers_the_whole_length_range() {
        let generator = RandomGenerator::with_seed(1);
        let mut seen = [false; 10];

        for _ in 0..2_000 {
            seen[generator.generate().as_str().len()] = true;
        }

        assert!(seen[LENGTH_RANGE].iter().all(|s| *s));
    }

    #[test]
    fn reaches_every_letter() {
        let generator = RandomGenerator::with_seed(3);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..2_000 {
            seen.extend(generator.generate().as_str().chars());
        }

        assert_eq!(seen.len(), ALPHABET.len());
    }

    #[test]
    fn accepts_custom_rng() {
        // A constant source always picks the lowest length and first letter.
        let generator = RandomGenerator::with_rng(StepRng::new(0, 0));
        assert_eq!(generator.generate().as_str(), "aa");
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
