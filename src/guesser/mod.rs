//! Tools for defining Mastermind guessers.

use std::fmt::{Debug, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    code::{Board, Code},
    secret::Generator,
    ConfigError, Result,
};

pub mod boring;

/// The information returned after a guess.
///
/// `exact` counts positions where the guess matches the secret. `color_only`
/// counts the remaining guessed colors that appear in the secret at the
/// right multiplicity but in the wrong position. `round` is the number of
/// guesses made so far in the current round; a `round` of zero opens a new
/// round and tells the guesser to forget everything it knows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Feedback {
    pub exact: usize,
    pub color_only: usize,
    pub round: usize,
}

impl Feedback {
    pub fn new(exact: usize, color_only: usize, round: usize) -> Self {
        Feedback {
            exact,
            color_only,
            round,
        }
    }

    /// The feedback passed before the first guess of a round.
    pub fn start() -> Self {
        Self::default()
    }

    /// Returns true if this feedback opens a new round.
    pub fn is_new_round(&self) -> bool {
        self.round == 0
    }

    /// Returns true if this feedback reports a solved code on `board`.
    ///
    /// Feedback that opens a round never counts as solved.
    pub fn is_solved(&self, board: &Board) -> bool {
        !self.is_new_round() && self.exact == board.length()
    }

    /// Returns true if this feedback found none of the guessed colors.
    pub fn is_blank(&self) -> bool {
        self.exact == 0 && self.color_only == 0
    }

    /// Checks that the counts fit on `board`.
    pub fn check(&self, board: &Board) -> Result<()> {
        if self.exact + self.color_only > board.length() {
            Err(ConfigError::InvalidFeedback {
                exact: self.exact,
                color_only: self.color_only,
                length: board.length(),
            }
            .into())
        } else {
            Ok(())
        }
    }
}

impl Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}) #{}", self.exact, self.color_only, self.round)
    }
}

/// Where an adaptive guesser is in a round.
///
/// Every round starts in [`Phase::Start`]. Probing discovers which colors
/// the secret uses, assembling discovers where they go, and a guesser is
/// solved once its own last guess came back with every position exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Phase {
    #[default]
    Start,
    Probing,
    Assembling,
    Solved,
}

/// The per-round memory of a guesser.
///
/// A guesser keeps its state `S` inside a `Round` and calls
/// [`enter()`](Round::enter()) at the top of every
/// [`next_guess()`](Guesser::next_guess()). Feedback that opens a new round
/// replaces the state with `S::default()`; any other feedback must arrive
/// for the same board the round was opened with.
///
/// # Examples
///
/// ```rust
/// # use mastermind_rs::{Board, Feedback, Round};
/// let board = Board::standard(4, 6)?;
/// let mut round: Round<Vec<usize>> = Round::new();
///
/// round.enter(&board, &Feedback::start())?.push(1);
/// round.enter(&board, &Feedback::new(0, 0, 1))?.push(2);
/// assert_eq!(round.state(), &vec![1, 2]);
///
/// // a new round forgets everything
/// round.enter(&board, &Feedback::start())?;
/// assert!(round.state().is_empty());
///
/// // and the board may not change in the middle of one
/// let other = Board::standard(5, 6)?;
/// assert!(round.enter(&other, &Feedback::new(0, 0, 1)).is_err());
/// #
/// # Ok::<_, mastermind_rs::MastermindError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Round<S> {
    board: Option<Board>,
    state: S,
}

impl<S: Default> Round<S> {
    pub fn new() -> Self {
        Round {
            board: None,
            state: S::default(),
        }
    }

    /// Validates the call and returns the state for this round, resetting it
    /// first if `last` opens a new round.
    pub fn enter(&mut self, board: &Board, last: &Feedback) -> Result<&mut S> {
        last.check(board)?;

        if last.is_new_round() {
            self.board = Some(board.clone());
            self.state = S::default();
            return Ok(&mut self.state);
        }

        match &self.board {
            None => Err(ConfigError::RoundNotStarted(last.round).into()),
            Some(started) if started != board => Err(ConfigError::ShapeChanged {
                expected: started.to_string(),
                found: board.to_string(),
            }
            .into()),
            Some(_) => Ok(&mut self.state),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

/// A collection of guesses made in one round, with the feedback each one
/// received.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Attempts {
    inner: Vec<(Code, Feedback)>,
    solved: bool,
}

impl Attempts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a guess and its feedback.
    pub(crate) fn push(&mut self, guess: Code, feedback: Feedback, board: &Board) {
        self.solved = feedback.exact == board.length();
        self.inner.push((guess, feedback));
    }

    /// Returns a slice into the underlying data.
    pub fn inner(&self) -> &[(Code, Feedback)] {
        self.inner.as_slice()
    }

    /// Gets the number of guesses made.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns true if the last guess was exactly right.
    pub fn solved(&self) -> bool {
        self.solved
    }
}

impl Display for Attempts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(((last, _), rest)) = self.inner.split_last() {
            for (guess, _) in rest {
                writeln!(f, "{}", guess)?;
            }
            write!(f, "{}", last)?;
        }
        Ok(())
    }
}

/// Trait defining a Mastermind guesser.
///
/// A guesser is called once per guess. It receives the board, the tag of
/// the generator that produced the secret, and the feedback for its previous
/// guess, and returns its next guess. Everything it learns along the way is
/// its own private state; use a [`Round`] to keep it.
///
/// # How to implement
///
/// The harness uses [`Display`] to name the guesser in reports, so do not
/// use linebreaks there.
///
/// ```rust
/// use std::fmt::Display;
/// use mastermind_rs::{Board, Code, Feedback, Generator, Guesser, Round, Result};
///
/// /// Walks through the alphabet one single-color guess at a time.
/// #[derive(Debug, Default)]
/// struct OneColorAtATime {
///     round: Round<usize>,
/// }
///
/// impl Guesser for OneColorAtATime {
///     fn next_guess(&mut self, board: &Board, _: &Generator, last: Feedback) -> Result<Code> {
///         let next = self.round.enter(board, &last)?;
///         let color = board.alphabet().get(*next).unwrap_or(board.alphabet().first());
///         *next += 1;
///         Ok(Code::repeated(color, board.length()))
///     }
///
///     fn version(&self) -> &'static str {
///         "0.1.0"
///     }
/// }
///
/// impl Display for OneColorAtATime {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "OneColorAtATime")
///     }
/// }
///
/// let board = Board::standard(4, 6)?;
/// let mut guesser = OneColorAtATime::default();
/// let first = guesser.next_guess(&board, &Generator::InsertColors, Feedback::start())?;
/// assert_eq!(first.to_string(), "AAAA");
/// let second = guesser.next_guess(&board, &Generator::InsertColors, Feedback::new(0, 0, 1))?;
/// assert_eq!(second.to_string(), "BBBB");
/// #
/// # Ok::<_, mastermind_rs::MastermindError>(())
/// ```
pub trait Guesser: Display + Debug + Send {
    /// Produces the next guess for the current round.
    ///
    /// `last` is the feedback for this guesser's previous guess, or
    /// [`Feedback::start()`] before the first guess of a round. The returned
    /// code must fit `board`.
    fn next_guess(&mut self, board: &Board, generator: &Generator, last: Feedback)
        -> Result<Code>;

    /// Provides a version for this guesser.
    ///
    /// You should ensure that this changes each time you update the logic of
    /// the guesser in order to produce meaningful comparisons.
    fn version(&self) -> &'static str;
}

impl<G: Guesser + ?Sized> Guesser for Box<G> {
    fn next_guess(
        &mut self,
        board: &Board,
        generator: &Generator,
        last: Feedback,
    ) -> Result<Code> {
        (**self).next_guess(board, generator, last)
    }

    fn version(&self) -> &'static str {
        (**self).version()
    }
}
