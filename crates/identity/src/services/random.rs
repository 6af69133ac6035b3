use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

/// Length of generated passwords.
pub const PASSWORD_LENGTH: usize = 12;

/// Alphabet for generated passwords: ASCII letters, digits and `_-.`.
pub const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-.";

/// General-purpose randomness for identity generation.
///
/// Wraps a seedable RNG so tests can pin the output. Passwords are NOT
/// drawn from this source; they come from [`secure_password`], which uses
/// the OS CSPRNG, because they are handed to callers as usable credentials.
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Fresh source seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic source for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform pick from a fixed, non-empty table.
    pub fn pick<'a, T>(&mut self, table: &'a [T]) -> &'a T {
        &table[self.rng.gen_range(0..table.len())]
    }

    /// Uniform integer in `[low, high]` inclusive.
    pub fn int_in(&mut self, low: i64, high: i64) -> i64 {
        self.rng.gen_range(low..=high)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a password of `length` symbols from [`PASSWORD_CHARSET`]
/// using the OS cryptographically secure RNG.
pub fn secure_password(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..PASSWORD_CHARSET.len());
            PASSWORD_CHARSET[idx] as char
        })
        .collect()
}
