//! Secret codes, the generators that produce them, and scoring.
//!
//! Guessers never see a [`Secret`]; they only see the [`Generator`] tag and
//! the [`Feedback`] that [`Secret::score()`] produces.

use std::{cmp::min, fmt::Display, ops::Deref, str::FromStr};

use itertools::Itertools;
use rand::{
    distributions::{Distribution, WeightedIndex},
    seq::{index::sample, IteratorRandom, SliceRandom},
    Rng,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    code::{Board, Code, Color},
    guesser::Feedback,
    MastermindError, Result, StrategyError,
};

/// The number of `mystery-N` generators.
pub const MYSTERY_VARIANTS: u8 = 5;

/// The positional color weights behind each `mystery-N` generator.
///
/// Each table has one row per position of a seven-peg board and one column
/// per color of a five-color alphabet.
const MYSTERY_TABLES: [[[u32; 5]; 7]; MYSTERY_VARIANTS as usize] = [
    [
        [60, 10, 10, 10, 10],
        [10, 60, 10, 10, 10],
        [10, 10, 60, 10, 10],
        [10, 10, 10, 60, 10],
        [10, 10, 10, 10, 60],
        [20, 20, 20, 20, 20],
        [60, 10, 10, 10, 10],
    ],
    [
        [40, 40, 10, 5, 5],
        [40, 40, 10, 5, 5],
        [5, 5, 40, 40, 10],
        [5, 5, 40, 40, 10],
        [10, 5, 5, 40, 40],
        [10, 5, 5, 40, 40],
        [40, 40, 10, 5, 5],
    ],
    [
        [90, 5, 5, 0, 0],
        [5, 5, 90, 0, 0],
        [90, 5, 5, 0, 0],
        [5, 5, 90, 0, 0],
        [90, 5, 5, 0, 0],
        [5, 5, 90, 0, 0],
        [90, 5, 5, 0, 0],
    ],
    [
        [0, 0, 0, 30, 70],
        [0, 0, 30, 70, 0],
        [0, 30, 70, 0, 0],
        [30, 70, 0, 0, 0],
        [0, 30, 70, 0, 0],
        [0, 0, 30, 70, 0],
        [0, 0, 0, 30, 70],
    ],
    [
        [35, 25, 20, 15, 5],
        [5, 15, 20, 25, 35],
        [35, 25, 20, 15, 5],
        [5, 15, 20, 25, 35],
        [35, 25, 20, 15, 5],
        [5, 15, 20, 25, 35],
        [35, 25, 20, 15, 5],
    ],
];

/// The families of secret codes, identified by the tag guessers receive.
///
/// Tags parse from kebab-case (`"two-color-alternating"`, `"mystery-3"`) or
/// from the CamelCase names (`"TwoColorAlternating"`, `"Mystery3"`).
///
/// # Examples
///
/// ```rust
/// # use mastermind_rs::Generator;
/// let tag: Generator = "ABColor".parse()?;
/// assert_eq!(tag, Generator::AbColor);
/// assert_eq!(tag.to_string(), "ab-color");
///
/// assert_eq!("mystery-2".parse::<Generator>()?, Generator::Mystery(2));
/// assert!("mystery-9".parse::<Generator>().is_err());
/// #
/// # Ok::<_, mastermind_rs::MastermindError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum Generator {
    /// Every position is an independent uniform draw.
    InsertColors,
    /// Exactly two distinct colors, placed anywhere.
    TwoColor,
    /// Exactly the first two colors of the alphabet, placed anywhere.
    AbColor,
    /// Two distinct colors alternating position by position.
    TwoColorAlternating,
    /// Every color is used at most once.
    OnlyOnce,
    /// The first and last positions share a color.
    FirstLast,
    /// Usually two or three distinct colors.
    UsuallyFewer,
    /// Fewer distinct colors are more likely.
    PreferFewer,
    /// Positional colors drawn from a fixed weight table, `1..=5`.
    Mystery(u8),
}

impl Generator {
    /// Every generator, in a stable order.
    pub fn all() -> Vec<Generator> {
        let mut all = vec![
            Generator::InsertColors,
            Generator::TwoColor,
            Generator::AbColor,
            Generator::TwoColorAlternating,
            Generator::OnlyOnce,
            Generator::FirstLast,
            Generator::UsuallyFewer,
            Generator::PreferFewer,
        ];
        all.extend((1..=MYSTERY_VARIANTS).map(Generator::Mystery));
        all
    }

    /// Gets the positional weight table of a `mystery-N` generator.
    pub fn mystery_table(variant: u8) -> Option<&'static [[u32; 5]; 7]> {
        variant
            .checked_sub(1)
            .and_then(|i| MYSTERY_TABLES.get(i as usize))
    }

    /// Generates a secret for `board`.
    ///
    /// Returns an error if the board is a shape this generator cannot fill,
    /// such as an only-once secret longer than the alphabet.
    pub fn generate<R: Rng + ?Sized>(&self, board: &Board, rng: &mut R) -> Result<Secret> {
        let length = board.length();
        let colors = board.alphabet();
        let unsupported = || -> MastermindError {
            StrategyError::UnsupportedShape {
                what: format!("generator {}", self),
                length,
                colors: colors.len(),
            }
            .into()
        };

        let code = match self {
            Generator::InsertColors => random_fill(&colors.iter().collect_vec(), length, rng),
            Generator::TwoColor | Generator::AbColor => {
                if length < 2 || colors.len() < 2 {
                    return Err(unsupported());
                }
                let pair = if *self == Generator::AbColor {
                    vec![colors.first(), colors.get(1).ok_or_else(unsupported)?]
                } else {
                    let mut pair = colors.iter().choose_multiple(rng, 2);
                    pair.shuffle(rng);
                    pair
                };
                // make sure both colors show up at least once
                let forced = sample(rng, length, 2).into_vec();
                let mut code = random_fill(&pair, length, rng);
                for (color, position) in pair.iter().zip(forced) {
                    code = code.with(position, *color);
                }
                code
            }
            Generator::TwoColorAlternating => {
                if colors.len() < 2 {
                    return Err(unsupported());
                }
                let mut pair = colors.iter().choose_multiple(rng, 2);
                pair.shuffle(rng);
                (0..length).map(|i| pair[i % 2]).collect()
            }
            Generator::OnlyOnce => {
                if colors.len() < length {
                    return Err(unsupported());
                }
                let mut chosen = colors.iter().choose_multiple(rng, length);
                chosen.shuffle(rng);
                Code::new(chosen)
            }
            Generator::FirstLast => {
                let palette = colors.iter().collect_vec();
                let ends = *palette.choose(rng).ok_or_else(unsupported)?;
                random_fill(&palette, length, rng)
                    .with(0, ends)
                    .with(length - 1, ends)
            }
            Generator::UsuallyFewer => {
                let most = min(length, colors.len());
                let distinct = if rng.gen_bool(0.9) {
                    rng.gen_range(2..=3usize).min(most)
                } else {
                    rng.gen_range(1..=most)
                };
                let palette = colors.iter().choose_multiple(rng, distinct);
                random_fill(&palette, length, rng)
            }
            Generator::PreferFewer => {
                let most = min(length, colors.len());
                let weights = (1..=most).map(|k| 1.0 / (k * k) as f64);
                let distinct = WeightedIndex::new(weights)
                    .map_err(|_| unsupported())?
                    .sample(rng)
                    + 1;
                let palette = colors.iter().choose_multiple(rng, distinct);
                random_fill(&palette, length, rng)
            }
            Generator::Mystery(variant) => {
                let table = Self::mystery_table(*variant).ok_or_else(unsupported)?;
                if colors.len() != table[0].len() {
                    return Err(unsupported());
                }
                let rows = table
                    .iter()
                    .map(|row| WeightedIndex::new(row))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|_| unsupported())?;
                (0..length)
                    .map(|i| rows[i % rows.len()].sample(rng))
                    .map(|c| colors.get(c).ok_or_else(unsupported))
                    .collect::<Result<Code>>()?
            }
        };

        Ok(Secret::new(code))
    }
}

/// Fills `length` positions with independent uniform picks from `palette`.
fn random_fill<R: Rng + ?Sized>(palette: &[Color], length: usize, rng: &mut R) -> Code {
    (0..length)
        .filter_map(|_| palette.choose(rng).copied())
        .collect()
}

impl FromStr for Generator {
    type Err = MastermindError;

    fn from_str(tag: &str) -> Result<Self> {
        let normalized: String = tag
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        let generator = match normalized.as_str() {
            "insertcolors" => Generator::InsertColors,
            "twocolor" => Generator::TwoColor,
            "abcolor" => Generator::AbColor,
            "twocoloralternating" => Generator::TwoColorAlternating,
            "onlyonce" => Generator::OnlyOnce,
            "firstlast" => Generator::FirstLast,
            "usuallyfewer" => Generator::UsuallyFewer,
            "preferfewer" => Generator::PreferFewer,
            other => match other.strip_prefix("mystery").map(str::parse::<u8>) {
                Some(Ok(n)) if (1..=MYSTERY_VARIANTS).contains(&n) => Generator::Mystery(n),
                _ => return Err(StrategyError::UnrecognizedTag(tag.to_string()).into()),
            },
        };

        Ok(generator)
    }
}

impl Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::InsertColors => write!(f, "insert-colors"),
            Generator::TwoColor => write!(f, "two-color"),
            Generator::AbColor => write!(f, "ab-color"),
            Generator::TwoColorAlternating => write!(f, "two-color-alternating"),
            Generator::OnlyOnce => write!(f, "only-once"),
            Generator::FirstLast => write!(f, "first-last"),
            Generator::UsuallyFewer => write!(f, "usually-fewer"),
            Generator::PreferFewer => write!(f, "prefer-fewer"),
            Generator::Mystery(n) => write!(f, "mystery-{}", n),
        }
    }
}

/// A hidden code that scores guesses.
///
/// # Examples
///
/// ```rust
/// # use mastermind_rs::{Board, Feedback, Secret};
/// let board = Board::standard(4, 6)?;
/// let secret = Secret::new(board.code("ABBC")?);
///
/// assert_eq!(secret.score(&board.code("BBBB")?, 1), Feedback::new(2, 0, 1));
/// assert_eq!(secret.score(&board.code("BCAB")?, 2), Feedback::new(0, 4, 2));
/// assert_eq!(secret.score(&board.code("ACCA")?, 3), Feedback::new(1, 1, 3));
/// #
/// # Ok::<_, mastermind_rs::MastermindError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Secret {
    code: Code,
}

impl Secret {
    pub fn new(code: Code) -> Self {
        Secret { code }
    }

    /// Scores `guess` against this secret as the `round`-th guess.
    ///
    /// Exact matches take priority; every other guessed color counts as a
    /// color-only match as long as the secret has an unmatched copy of it.
    pub fn score(&self, guess: &Code, round: usize) -> Feedback {
        let exact = guess
            .iter()
            .zip(self.code.iter())
            .filter(|(g, s)| g == s)
            .count();

        let secret_counts = self.code.iter().counts();
        let shared: usize = guess
            .iter()
            .counts()
            .into_iter()
            .map(|(color, n)| min(n, secret_counts.get(color).copied().unwrap_or(0)))
            .sum();

        Feedback::new(exact, shared - exact, round)
    }
}

impl Deref for Secret {
    type Target = Code;

    fn deref(&self) -> &Self::Target {
        &self.code
    }
}

impl Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}
