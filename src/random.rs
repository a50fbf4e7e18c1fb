//! Pluggable randomness for the weighted selector.
//!
//! [`LehmerRandom`] is the deterministic reference stream; seeded runs
//! reproduce the same selection order, which the tests rely on.
//! [`ThreadRandom`] draws from the thread local generator of the `rand`
//! crate for production use.

use rand::Rng;

/// A stream of pseudorandom numbers.
pub trait RandomStream {
    /// A uniformly distributed integer in `[0, n)`.
    fn next_int(&mut self, n: u32) -> u32;

    /// A uniformly distributed number in `[0, 1)`.
    fn next_number(&mut self) -> f64;
}

/// The Lehmer (Park-Miller) multiplicative congruential generator:
/// modulus 2^31 - 1, multiplier 16807, default seed 1.
pub struct LehmerRandom {
    seed: i64,
}

const M: i64 = 2_147_483_647;
const A: i64 = 16807;
const Q: i64 = M / A;
const R: i64 = M % A;

impl LehmerRandom {
    pub fn new() -> Self {
        Self::with_seed(1)
    }

    pub fn with_seed(seed: i64) -> Self {
        Self { seed }
    }

    /// The raw stream value in `[1, M)`, computed with Schrage's method so
    /// the intermediate products stay in range.
    fn next(&mut self) -> i64 {
        self.seed = A * (self.seed % Q) - R * (self.seed / Q);
        if self.seed <= 0 {
            self.seed += M;
        }
        self.seed
    }
}

impl Default for LehmerRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomStream for LehmerRandom {
    fn next_int(&mut self, n: u32) -> u32 {
        (self.next() % n as i64) as u32
    }

    fn next_number(&mut self) -> f64 {
        self.next() as f64 * (1.0 / M as f64)
    }
}

/// A stream backed by the `rand` crate's thread local generator.
#[derive(Default)]
pub struct ThreadRandom {
    rng: rand::rngs::ThreadRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RandomStream for ThreadRandom {
    fn next_int(&mut self, n: u32) -> u32 {
        self.rng.gen_range(0..n)
    }

    fn next_number(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Convenience routines over a [`RandomStream`].
pub struct Randoms {
    stream: Box<dyn RandomStream>,
}

impl Randoms {
    pub fn new(stream: Box<dyn RandomStream>) -> Self {
        Self { stream }
    }

    /// A uniformly distributed integer in `[0, high)`.
    pub fn get_int(&mut self, high: u32) -> u32 {
        self.stream.next_int(high)
    }

    /// A uniformly distributed integer in `[low, high)`.
    pub fn get_in_range(&mut self, low: u32, high: u32) -> u32 {
        low + self.stream.next_int(high - low)
    }

    /// A uniformly distributed number in `[0, high)`.
    pub fn get_number(&mut self, high: f64) -> f64 {
        self.stream.next_number() * high
    }

    /// A uniformly distributed number in `[low, high)`.
    pub fn get_number_in_range(&mut self, low: f64, high: f64) -> f64 {
        low + self.stream.next_number() * (high - low)
    }

    /// True once in `n` draws on average.
    pub fn get_chance(&mut self, n: u32) -> bool {
        self.stream.next_int(n) == 0
    }

    /// True with probability `p`.
    pub fn get_probability(&mut self, p: f64) -> bool {
        self.stream.next_number() < p
    }

    pub fn get_boolean(&mut self) -> bool {
        self.get_chance(2)
    }

    /// A uniformly chosen element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.stream.next_int(items.len() as u32) as usize])
        }
    }
}
