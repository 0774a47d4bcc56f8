use std::fmt::Display;

use mastermind_rs::{
    Board, Code, Feedback, Generator, Guesser, MastermindError, Result, StrategyError,
};
use rand::{
    distributions::{Distribution, WeightedIndex},
    rngs::SmallRng,
    SeedableRng,
};

/// A guesser that samples every guess from the positional color weights of
/// a `mystery-N` generator.
///
/// `Mystery` ignores feedback entirely, including the round number: even
/// the first guess of a round is a weighted draw.
#[derive(Debug, Clone)]
pub struct Mystery {
    variant: u8,
    rows: Vec<WeightedIndex<u32>>,
    colors: usize,
    rng: SmallRng,
}

impl Mystery {
    /// Creates a guesser for `mystery-{variant}`.
    ///
    /// Returns an error if there is no such generator.
    pub fn new(variant: u8) -> Result<Self> {
        Self::with_rng(variant, SmallRng::from_entropy())
    }

    /// Creates a guesser for `mystery-{variant}` with a fixed seed.
    pub fn with_seed(variant: u8, seed: u64) -> Result<Self> {
        Self::with_rng(variant, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(variant: u8, rng: SmallRng) -> Result<Self> {
        let unknown = || -> MastermindError {
            StrategyError::UnrecognizedTag(format!("mystery-{}", variant)).into()
        };
        let table = Generator::mystery_table(variant).ok_or_else(unknown)?;
        let rows = table
            .iter()
            .map(|row| WeightedIndex::new(row.iter().copied()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| unknown())?;

        Ok(Mystery {
            variant,
            rows,
            colors: table[0].len(),
            rng,
        })
    }

    /// Gets which table this guesser samples from.
    pub fn variant(&self) -> u8 {
        self.variant
    }
}

impl Guesser for Mystery {
    fn next_guess(&mut self, board: &Board, _: &Generator, last: Feedback) -> Result<Code> {
        last.check(board)?;
        let colors = board.alphabet();
        if colors.len() != self.colors {
            return Err(StrategyError::UnsupportedShape {
                what: format!("mystery-{} guesses", self.variant),
                length: board.length(),
                colors: colors.len(),
            }
            .into());
        }

        let rows = &self.rows;
        Ok((0..board.length())
            .filter_map(|i| colors.get(rows[i % rows.len()].sample(&mut self.rng)))
            .collect())
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }
}

impl Display for Mystery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mastermind_strategies::Mystery ({})", self.variant)
    }
}
