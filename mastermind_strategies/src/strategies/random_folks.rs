use std::fmt::Display;

use mastermind_rs::{Board, Code, Feedback, Generator, Guesser, Result};
use rand::{rngs::SmallRng, seq::IteratorRandom, SeedableRng};

/// A baseline guesser that fills every position with a uniformly random
/// color, whatever the feedback says.
#[derive(Debug, Clone)]
pub struct RandomFolks {
    rng: SmallRng,
}

impl Default for RandomFolks {
    fn default() -> Self {
        RandomFolks {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl RandomFolks {
    /// Creates a new guesser seeded from entropy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new guesser with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        RandomFolks {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Guesser for RandomFolks {
    fn next_guess(&mut self, board: &Board, _: &Generator, last: Feedback) -> Result<Code> {
        last.check(board)?;
        let colors = board.alphabet();
        Ok((0..board.length())
            .filter_map(|_| colors.iter().choose(&mut self.rng))
            .collect())
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }
}

impl Display for RandomFolks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mastermind_strategies::RandomFolks")
    }
}
