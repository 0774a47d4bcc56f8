//! Colors, alphabets, boards and codes.

use std::{
    fmt::{Debug, Display},
    ops::Deref,
};

use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// A single peg color.
///
/// Colors are ordered, but strategies should advance through an
/// [`Alphabet`] rather than relying on the order of the underlying symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Color(pub char);

impl Color {
    /// Gets the symbol of this color.
    pub fn symbol(&self) -> char {
        self.0
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered set of distinct colors.
///
/// The order matters: strategies that advance "to the next color" do so in
/// alphabet order.
///
/// # Examples
///
/// ```rust
/// # use mastermind_rs::code::{Alphabet, Color};
/// let colors = Alphabet::standard(4)?;
/// assert_eq!(colors.first(), Color('A'));
/// assert_eq!(colors.after(Color('B')), Some(Color('C')));
/// assert_eq!(colors.after(Color('D')), None);
///
/// assert!(Alphabet::new("ABA".chars()).is_err());
/// #
/// # Ok::<_, mastermind_rs::MastermindError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Alphabet {
    colors: Vec<Color>,
}

impl Alphabet {
    /// Creates an alphabet from an ordered sequence of symbols.
    ///
    /// Returns an error if the sequence is empty or repeats a symbol.
    pub fn new(symbols: impl IntoIterator<Item = char>) -> Result<Self> {
        let colors: Vec<Color> = symbols.into_iter().map(Color).collect();
        if colors.is_empty() {
            return Err(ConfigError::EmptyAlphabet.into());
        }
        if let Some(dup) = colors.iter().duplicates().next() {
            return Err(ConfigError::DuplicateColor(dup.0).into());
        }
        Ok(Alphabet { colors })
    }

    /// Creates the alphabet `A, B, C, ...` with `n` colors.
    pub fn standard(n: usize) -> Result<Self> {
        Self::new(('A'..='Z').take(n))
    }

    /// Gets the first color of the alphabet.
    pub fn first(&self) -> Color {
        self.colors[0]
    }

    /// Gets the color at `index`, if there is one.
    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// Gets the position of `color` in the alphabet.
    pub fn index_of(&self, color: Color) -> Option<usize> {
        self.colors.iter().position(|&c| c == color)
    }

    /// Gets the color that follows `color`, or `None` at the end of the
    /// alphabet (or if `color` is not part of it).
    pub fn after(&self, color: Color) -> Option<Color> {
        self.index_of(color).and_then(|i| self.get(i + 1))
    }

    /// Returns true if `color` is part of the alphabet.
    pub fn contains(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; alphabets cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.colors.iter().copied()
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.colors.iter().join(""))
    }
}

/// The shape of a game: how many positions a code has and which colors it
/// may use.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    length: usize,
    alphabet: Alphabet,
}

impl Board {
    /// Creates a new board.
    ///
    /// Returns an error if `length` is zero.
    pub fn new(length: usize, alphabet: Alphabet) -> Result<Self> {
        if length == 0 {
            return Err(ConfigError::ZeroLength.into());
        }
        Ok(Board { length, alphabet })
    }

    /// Creates a board with `length` positions over [`Alphabet::standard()`].
    pub fn standard(length: usize, colors: usize) -> Result<Self> {
        Self::new(length, Alphabet::standard(colors)?)
    }

    /// The classic Mastermind board: four positions over `A` through `F`.
    pub fn classic() -> Self {
        Board {
            length: 4,
            alphabet: Alphabet {
                colors: ('A'..='F').map(Color).collect(),
            },
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Parses a code and checks that it fits this board.
    pub fn code(&self, code: &str) -> Result<Code> {
        let code = Code::new(code.chars().map(Color));
        self.check(&code)?;
        Ok(code)
    }

    /// Checks that `code` has this board's length and only uses its colors.
    pub fn check(&self, code: &Code) -> Result<()> {
        if code.len() == self.length && code.iter().all(|&c| self.alphabet.contains(c)) {
            Ok(())
        } else {
            Err(ConfigError::InvalidCode(code.to_string()).into())
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x[{}]", self.length, self.alphabet)
    }
}

/// A sequence of colors: either a guess or a secret.
///
/// Codes are values. Every "edit" ([`with()`](Code::with()),
/// [`reversed()`](Code::reversed())) produces a new code and leaves the
/// original untouched.
///
/// # Examples
///
/// ```rust
/// # use mastermind_rs::code::{Code, Color};
/// let all_a = Code::repeated(Color('A'), 4);
/// let edited = all_a.with(1, Color('B'));
///
/// assert_eq!(all_a.to_string(), "AAAA");
/// assert_eq!(edited.to_string(), "ABAA");
/// assert_eq!(edited.reversed().to_string(), "AABA");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Code {
    colors: Vec<Color>,
}

impl Code {
    pub fn new(colors: impl IntoIterator<Item = Color>) -> Self {
        Code {
            colors: colors.into_iter().collect(),
        }
    }

    /// Creates a code of `length` copies of `color`.
    pub fn repeated(color: Color, length: usize) -> Self {
        Code {
            colors: vec![color; length],
        }
    }

    /// Returns a copy of this code with `position` set to `color`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    pub fn with(&self, position: usize, color: Color) -> Self {
        let mut colors = self.colors.clone();
        colors[position] = color;
        Code { colors }
    }

    /// Returns a copy of this code in reverse order.
    pub fn reversed(&self) -> Self {
        Code {
            colors: self.colors.iter().rev().copied().collect(),
        }
    }

    /// Returns a copy of this code rearranged so that position `i` holds
    /// the color at `order[i]`.
    ///
    /// # Panics
    ///
    /// Panics if an index in `order` is out of bounds.
    pub fn permuted(&self, order: &[usize]) -> Self {
        Code {
            colors: order.iter().map(|&i| self.colors[i]).collect(),
        }
    }

    /// Counts how many positions hold `color`.
    pub fn count(&self, color: Color) -> usize {
        self.colors.iter().filter(|&&c| c == color).count()
    }
}

impl Deref for Code {
    type Target = [Color];

    fn deref(&self) -> &Self::Target {
        &self.colors
    }
}

impl FromIterator<Color> for Code {
    fn from_iter<T: IntoIterator<Item = Color>>(iter: T) -> Self {
        Code::new(iter)
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for color in &self.colors {
            write!(f, "{}", color)?;
        }
        Ok(())
    }
}

impl Debug for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Code({})", self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::MastermindError;

    #[test]
    fn alphabet_rejects_bad_input() {
        assert!(matches!(
            Alphabet::new("".chars()),
            Err(MastermindError::Config {
                kind: ConfigError::EmptyAlphabet
            })
        ));
        assert!(matches!(
            Alphabet::new("ABCB".chars()),
            Err(MastermindError::Config {
                kind: ConfigError::DuplicateColor('B')
            })
        ));
    }

    #[test]
    fn board_rejects_zero_length() {
        assert!(matches!(
            Board::standard(0, 6),
            Err(MastermindError::Config {
                kind: ConfigError::ZeroLength
            })
        ));
    }

    #[test]
    fn board_checks_codes() -> Result<()> {
        let board = Board::standard(4, 3)?;
        assert!(board.code("ABCA").is_ok());
        assert!(board.code("ABC").is_err());
        assert!(board.code("ABCD").is_err());
        Ok(())
    }

    #[test]
    fn edits_leave_the_original_alone() {
        let code: Code = "ABCD".chars().map(Color).collect();
        let edited = code.with(0, Color('D'));
        assert_eq!(code.to_string(), "ABCD");
        assert_eq!(edited.to_string(), "DBCD");
        assert_eq!(code.permuted(&[3, 2, 1, 0]), code.reversed());
        assert_eq!(edited.count(Color('D')), 2);
    }

    #[test]
    fn alphabet_order() -> Result<()> {
        let colors = Alphabet::new("QZA".chars())?;
        assert_eq!(colors.first(), Color('Q'));
        assert_eq!(colors.after(Color('Q')), Some(Color('Z')));
        assert_eq!(colors.after(Color('A')), None);
        assert_eq!(colors.after(Color('X')), None);
        assert_eq!(colors.index_of(Color('A')), Some(2));
        assert_eq!(colors.to_string(), "QZA");
        Ok(())
    }
}
