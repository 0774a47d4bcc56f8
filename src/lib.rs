#![doc = include_str!("../README.md")]

// Required to rename serde
#[cfg(feature = "serde")]
extern crate serde_crate as serde;

use thiserror::Error;

pub mod code;
pub use code::{Alphabet, Board, Code, Color};

pub mod guesser;
pub use guesser::{Feedback, Guesser, Phase, Round};

pub mod secret;
pub use secret::{Generator, Secret};

pub mod harness;
pub use harness::{Harness, Record};

pub mod perf;
pub use perf::{Perf, Summary};

#[cfg(test)]
pub(crate) mod mock;

/// A convenience alias for results produced by `mastermind_rs`.
pub type Result<T> = std::result::Result<T, MastermindError>;

/// The errors that `mastermind_rs` can produce.
#[derive(Debug, Error)]
pub enum MastermindError {
    #[error("invalid board, code or feedback")]
    Config {
        #[from]
        kind: ConfigError,
    },

    #[error("the strategy could not produce a guess")]
    Strategy {
        #[from]
        kind: StrategyError,
    },

    #[error("general IO error")]
    Printing(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("trouble serializing the report")]
    Json(#[from] serde_json::Error),

    #[error("the test harness encountered an error")]
    Harness {
        #[from]
        kind: HarnessError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A board must have at least one position.
    #[error("the board length must be at least one")]
    ZeroLength,

    /// An alphabet must have at least one color.
    #[error("the color alphabet is empty")]
    EmptyAlphabet,

    /// Every color in an alphabet must be distinct.
    #[error("the color {0} appears more than once in the alphabet")]
    DuplicateColor(char),

    /// The code does not have the board's length or uses foreign colors.
    #[error("\"{0}\" is not a valid code for this board")]
    InvalidCode(String),

    /// The feedback claims more matches than the board has positions.
    #[error("feedback ({exact}, {color_only}) does not fit a board of length {length}")]
    InvalidFeedback {
        exact: usize,
        color_only: usize,
        length: usize,
    },

    /// The board changed in the middle of a round.
    #[error("the round started on a {expected} board but continued on a {found} board")]
    ShapeChanged { expected: String, found: String },

    /// The generator tag changed in the middle of a round.
    #[error("the round started with generator {expected} but continued with {found}")]
    GeneratorChanged { expected: String, found: String },

    /// Feedback for a later guess arrived before any round was opened.
    #[error("feedback for guess {0} arrived before the round was started")]
    RoundNotStarted(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrategyError {
    /// The tag does not name any known secret generator.
    #[error("\"{0}\" is not a known secret generator")]
    UnrecognizedTag(String),

    /// The guesser has no sub-strategy for this generator.
    #[error("the strategy {strategy} cannot play against generator {generator}")]
    UnsupportedGenerator { strategy: String, generator: String },

    /// The board is a shape this strategy or generator cannot handle.
    #[error("{what} cannot handle a board of length {length} with {colors} colors")]
    UnsupportedShape {
        what: String,
        length: usize,
        colors: usize,
    },

    /// Every candidate guess has already been tried this round.
    #[error("every candidate guess has already been tried this round")]
    SearchExhausted,
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("no guessers have been added to the harness")]
    NoGuessersAdded,

    /// A guesser produced a code that does not fit the board it was given.
    #[error("the guesser {guesser} produced the invalid guess \"{guess}\"")]
    InvalidGuess { guesser: String, guess: String },
}
