use std::fmt::Display;

use itertools::Itertools;
use log::debug;
use mastermind_rs::{
    Board, Code, Feedback, Generator, Guesser, Phase, Result, Round, StrategyError,
};
use rand::{rngs::SmallRng, seq::index::sample, SeedableRng};

use crate::util::Search;

/// A guesser for secrets made of only the first two colors.
///
/// The opening guess uses only the first color, and its exact count says
/// how many positions hold the second color. After that `AbColor` places
/// that many second-color pegs at random positions, never trying the same
/// placement twice.
#[derive(Debug, Clone)]
pub struct AbColor {
    rng: SmallRng,
    round: Round<Placement>,
}

#[derive(Debug, Clone, Default)]
struct Placement {
    phase: Phase,
    num_b: usize,
    search: Search,
    previous: Option<Code>,
}

impl Default for AbColor {
    fn default() -> Self {
        AbColor {
            rng: SmallRng::from_entropy(),
            round: Round::new(),
        }
    }
}

impl AbColor {
    /// Creates a new guesser seeded from entropy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new guesser with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        AbColor {
            rng: SmallRng::seed_from_u64(seed),
            round: Round::new(),
        }
    }

    /// Gets where this guesser is in the current round.
    pub fn phase(&self) -> Phase {
        self.round.state().phase
    }

    /// Gets how many positions hold the second color, once it is known.
    pub fn num_b(&self) -> usize {
        self.round.state().num_b
    }
}

impl Guesser for AbColor {
    fn next_guess(&mut self, board: &Board, _: &Generator, last: Feedback) -> Result<Code> {
        let placement = self.round.enter(board, &last)?;
        let colors = board.alphabet();
        let length = board.length();
        let a = colors.first();

        let previous = match placement.previous.take() {
            Some(previous) if !last.is_new_round() => previous,
            _ => {
                let opening = Code::repeated(a, length);
                placement.phase = Phase::Probing;
                placement.search.remember(opening.clone());
                placement.previous = Some(opening.clone());
                return Ok(opening);
            }
        };

        if last.is_solved(board) {
            placement.phase = Phase::Solved;
            placement.previous = Some(previous.clone());
            return Ok(previous);
        }

        if placement.phase == Phase::Probing {
            placement.num_b = length - last.exact;
            placement.phase = Phase::Assembling;
            debug!("secret has {} non-{} position(s)", placement.num_b, a);
        }

        let num_b = placement.num_b;
        let b = match colors.get(1) {
            Some(b) => b,
            None => {
                return Err(StrategyError::UnsupportedShape {
                    what: "ab-color guesses with one color".to_string(),
                    length,
                    colors: colors.len(),
                }
                .into())
            }
        };

        let base = Code::repeated(a, length);
        let place = |positions: &[usize]| {
            positions
                .iter()
                .fold(base.clone(), |code, &position| code.with(position, b))
        };
        let guess = placement.search.next(
            || place(&sample(&mut self.rng, length, num_b).into_vec()),
            || (0..length).combinations(num_b).map(|positions| place(&positions)),
        )?;

        placement.previous = Some(guess.clone());
        Ok(guess)
    }

    fn version(&self) -> &'static str {
        "1.0.1"
    }
}

impl Display for AbColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mastermind_strategies::AbColor")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mastermind_rs::{Color, MastermindError, Secret};

    const TAG: Generator = Generator::AbColor;

    #[test]
    fn places_the_right_number_of_bs() -> Result<()> {
        let board = Board::standard(5, 6)?;
        let mut guesser = AbColor::with_seed(4);
        guesser.next_guess(&board, &TAG, Feedback::start())?;

        let mut seen = Vec::new();
        for round in 1..=10 {
            let guess = guesser.next_guess(&board, &TAG, Feedback::new(3, 0, round))?;
            assert_eq!(guess.count(Color('A')), 3);
            assert_eq!(guess.count(Color('B')), 2);
            assert!(!seen.contains(&guess));
            seen.push(guess);
        }
        assert_eq!(guesser.num_b(), 2);

        // all ten placements are used up
        assert!(matches!(
            guesser.next_guess(&board, &TAG, Feedback::new(3, 0, 11)),
            Err(MastermindError::Strategy {
                kind: StrategyError::SearchExhausted
            })
        ));
        Ok(())
    }

    #[test]
    fn solves_ab_secrets() -> Result<()> {
        let board = Board::standard(6, 6)?;
        for secret in ["ABABAB", "BBBBBA", "AAAAAA", "BAAAAB"] {
            let secret = Secret::new(board.code(secret)?);
            let mut guesser = AbColor::with_seed(1);
            let mut last = Feedback::start();
            let mut solved = false;
            for round in 1..=25 {
                let guess = guesser.next_guess(&board, &TAG, last)?;
                last = secret.score(&guess, round);
                if last.is_solved(&board) {
                    solved = true;
                    break;
                }
            }
            assert!(solved, "did not solve {}", *secret);
        }
        Ok(())
    }

    #[test]
    fn needs_two_colors() -> Result<()> {
        let board = Board::standard(3, 1)?;
        let mut guesser = AbColor::new();
        guesser.next_guess(&board, &TAG, Feedback::start())?;
        assert!(matches!(
            guesser.next_guess(&board, &TAG, Feedback::new(1, 0, 1)),
            Err(MastermindError::Strategy {
                kind: StrategyError::UnsupportedShape { .. }
            })
        ));
        Ok(())
    }
}
