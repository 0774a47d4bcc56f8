//! A single bad guesser to show how they are written.

use std::fmt::Display;

use rand::{rngs::SmallRng, seq::IteratorRandom, SeedableRng};

use crate::{
    code::{Board, Code},
    guesser::{Feedback, Guesser},
    secret::Generator,
    Result,
};

/// A Mastermind guesser that fills the board with one randomly chosen color
/// and never learns anything.
///
/// This exists to show how [`Guesser`](super::Guesser) is implemented and to
/// serve as a floor in comparisons. For real guessers, check out the
/// `mastermind_strategies` crate.
#[derive(Debug, Clone)]
pub struct Boring {
    rng: SmallRng,
}

impl Boring {
    pub fn new() -> Self {
        Boring {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Creates a guesser whose choices are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Boring {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for Boring {
    fn default() -> Self {
        Self::new()
    }
}

impl Guesser for Boring {
    fn next_guess(&mut self, board: &Board, _: &Generator, last: Feedback) -> Result<Code> {
        last.check(board)?;
        let color = board
            .alphabet()
            .iter()
            .choose(&mut self.rng)
            .unwrap_or_else(|| board.alphabet().first());
        Ok(Code::repeated(color, board.length()))
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }
}

impl Display for Boring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mastermind_rs::Boring")
    }
}
