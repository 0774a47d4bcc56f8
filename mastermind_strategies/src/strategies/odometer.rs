use std::fmt::Display;

use log::{debug, trace};
use mastermind_rs::{Board, Code, Feedback, Generator, Guesser, Phase, Result, Round};

/// How many trailing positions an [`Odometer`] turns by default.
pub const DEFAULT_FREE_POSITIONS: usize = 3;

/// A guesser that ignores feedback and walks the last few positions through
/// the alphabet like the wheels of an odometer.
///
/// The first guess of a round uses only the first color. Every later guess
/// copies the previous one and turns the wheels: the last position advances
/// by one color each guess, and when a wheel runs past the end of the
/// alphabet it resets to the first color and carries into the position to
/// its left. When the leftmost free wheel overflows every free position is
/// back at the first color and the walk starts over.
///
/// # Examples
///
/// ```rust
/// # use mastermind_rs::{Board, Feedback, Generator, Guesser};
/// use mastermind_strategies::Odometer;
///
/// let board = Board::standard(4, 2)?;
/// let mut odometer = Odometer::new();
/// let mut guesses = vec![];
/// let mut last = Feedback::start();
/// for round in 1..=5 {
///     guesses.push(odometer.next_guess(&board, &Generator::InsertColors, last)?.to_string());
///     last = Feedback::new(0, 0, round);
/// }
/// assert_eq!(guesses, ["AAAA", "AAAB", "AABA", "AABB", "ABAA"]);
/// #
/// # Ok::<_, mastermind_rs::MastermindError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Odometer {
    free_positions: usize,
    round: Round<Wheels>,
}

#[derive(Debug, Clone, Default)]
struct Wheels {
    phase: Phase,
    /// Alphabet indices, least significant (rightmost position) first.
    cursors: Vec<usize>,
    previous: Option<Code>,
}

impl Default for Odometer {
    fn default() -> Self {
        Odometer {
            free_positions: DEFAULT_FREE_POSITIONS,
            round: Round::new(),
        }
    }
}

impl Odometer {
    /// Creates a new guesser with three free positions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many trailing positions turn.
    ///
    /// The first position never turns, so on a board of length `n` at most
    /// `n - 1` positions are free.
    pub fn free_positions(self, free_positions: usize) -> Self {
        Odometer {
            free_positions,
            ..self
        }
    }

    /// Gets where this guesser is in the current round.
    pub fn phase(&self) -> Phase {
        self.round.state().phase
    }
}

impl Guesser for Odometer {
    fn next_guess(&mut self, board: &Board, _: &Generator, last: Feedback) -> Result<Code> {
        let free = self.free_positions.min(board.length() - 1);
        let wheels = self.round.enter(board, &last)?;
        let colors = board.alphabet();

        let previous = match wheels.previous.take() {
            Some(previous) if !last.is_new_round() => previous,
            _ => {
                let opening = Code::repeated(colors.first(), board.length());
                wheels.cursors = vec![0; free];
                if let Some(first) = wheels.cursors.first_mut() {
                    *first = 1;
                }
                wheels.phase = Phase::Assembling;
                wheels.previous = Some(opening.clone());
                return Ok(opening);
            }
        };

        if last.is_solved(board) {
            wheels.phase = Phase::Solved;
            wheels.previous = Some(previous.clone());
            return Ok(previous);
        }

        // carry overflowed wheels to the left
        for i in 0..wheels.cursors.len() {
            if wheels.cursors[i] >= colors.len() {
                wheels.cursors[i] = 0;
                if let Some(next) = wheels.cursors.get_mut(i + 1) {
                    *next += 1;
                } else {
                    debug!("odometer rolled over after guess {}", last.round);
                }
            }
        }

        let length = board.length();
        let guess = wheels
            .cursors
            .iter()
            .enumerate()
            .fold(previous, |code, (i, &cursor)| {
                code.with(
                    length - 1 - i,
                    colors.get(cursor).unwrap_or_else(|| colors.first()),
                )
            });
        if let Some(first) = wheels.cursors.first_mut() {
            *first += 1;
        }

        trace!("odometer turned to {}", guess);
        wheels.previous = Some(guess.clone());
        Ok(guess)
    }

    fn version(&self) -> &'static str {
        "1.1.0"
    }
}

impl Display for Odometer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mastermind_strategies::Odometer")?;
        if self.free_positions != DEFAULT_FREE_POSITIONS {
            write!(f, " (free: {})", self.free_positions)?;
        }
        Ok(())
    }
}
