/// Pluggable sources of step directions

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::MAX_DEGREE;

/// Supplies whole-degree directions in `0..=MAX_DEGREE`.
pub trait AngleSource {
    fn next_degree(&mut self) -> u32;
}

/// OS-seeded thread-local RNG; every walk differs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadAngles;

impl AngleSource for ThreadAngles {
    fn next_degree(&mut self) -> u32 {
        rand::thread_rng().gen_range(0..=MAX_DEGREE)
    }
}

/// Seeded RNG for reproducible walks.
#[derive(Debug, Clone)]
pub struct SeededAngles {
    rng: StdRng,
}

impl SeededAngles {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl AngleSource for SeededAngles {
    fn next_degree(&mut self) -> u32 {
        self.rng.gen_range(0..=MAX_DEGREE)
    }
}

/// Cycles through a fixed list of degrees. Values above `MAX_DEGREE` wrap
/// modulo 361 so the range contract still holds.
#[derive(Debug, Clone)]
pub struct FixedAngles {
    degrees: Vec<u32>,
    next: usize,
    draws: usize,
}

impl FixedAngles {
    /// An empty list behaves like `[0]`.
    pub fn new(degrees: Vec<u32>) -> Self {
        let degrees = if degrees.is_empty() { vec![0] } else { degrees };
        Self {
            degrees,
            next: 0,
            draws: 0,
        }
    }

    /// How many directions have been handed out.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl AngleSource for FixedAngles {
    fn next_degree(&mut self) -> u32 {
        let d = self.degrees[self.next] % (MAX_DEGREE + 1);
        self.next = (self.next + 1) % self.degrees.len();
        self.draws += 1;
        d
    }
}
