//! Pieces shared by several guessers.

use std::collections::HashSet;

use log::debug;
use mastermind_rs::{Alphabet, Code, Color, Result, StrategyError};

/// How many random draws [`Search`] makes before it falls back to walking
/// the candidates in order.
pub const RANDOM_RETRIES: usize = 64;

/// A cursor that walks through the alphabet, one single-color probe at a
/// time.
///
/// # Examples
///
/// ```rust
/// # use mastermind_rs::{Alphabet, Color};
/// use mastermind_strategies::util::Probe;
///
/// let colors = Alphabet::standard(3)?;
/// let mut probe = Probe::default();
/// assert_eq!(probe.color(&colors), Some(Color('A')));
/// assert_eq!(probe.advance(&colors), Some(Color('B')));
/// assert!(!probe.is_last(&colors));
/// assert_eq!(probe.advance(&colors), Some(Color('C')));
/// assert!(probe.is_last(&colors));
/// assert_eq!(probe.advance(&colors), None);
/// #
/// # Ok::<_, mastermind_rs::MastermindError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Probe {
    index: usize,
}

impl Probe {
    /// Gets the color currently being probed.
    pub fn color(&self, colors: &Alphabet) -> Option<Color> {
        colors.get(self.index)
    }

    /// Moves to the next color and returns it, or `None` once the alphabet
    /// is used up. The cursor never moves past the end.
    pub fn advance(&mut self, colors: &Alphabet) -> Option<Color> {
        if self.index < colors.len() {
            self.index += 1;
        }
        self.color(colors)
    }

    /// Returns true if the current color is the last one in the alphabet.
    pub fn is_last(&self, colors: &Alphabet) -> bool {
        self.index + 1 == colors.len()
    }

    /// Builds the probe code for the current color.
    pub fn code(&self, colors: &Alphabet, length: usize) -> Option<Code> {
        self.color(colors).map(|c| Code::repeated(c, length))
    }
}

/// Hands out candidate guesses without ever repeating one in a round.
///
/// Candidates are drawn at random first. After [`RANDOM_RETRIES`] draws in
/// a row that were all tried already, the search walks an exhaustive list of
/// candidates instead and takes the first untried one. When even that list
/// is used up it fails with [`StrategyError::SearchExhausted`].
#[derive(Clone, Debug, Default)]
pub struct Search {
    tried: HashSet<Code>,
}

impl Search {
    /// Marks `code` as tried.
    pub fn remember(&mut self, code: Code) {
        self.tried.insert(code);
    }

    /// Returns true if `code` was tried already.
    pub fn has_tried(&self, code: &Code) -> bool {
        self.tried.contains(code)
    }

    /// Gets the number of distinct codes tried so far.
    pub fn len(&self) -> usize {
        self.tried.len()
    }

    /// Returns true if nothing was tried yet.
    pub fn is_empty(&self) -> bool {
        self.tried.is_empty()
    }

    /// Finds an untried candidate and marks it as tried.
    pub fn next<S, E, I>(&mut self, mut draw: S, enumerate: E) -> Result<Code>
    where
        S: FnMut() -> Code,
        E: FnOnce() -> I,
        I: IntoIterator<Item = Code>,
    {
        let found = match (0..RANDOM_RETRIES)
            .map(|_| draw())
            .find(|code| !self.tried.contains(code))
        {
            Some(code) => code,
            None => {
                debug!(
                    "random draws keep repeating after {} tries, enumerating instead",
                    self.tried.len()
                );
                enumerate()
                    .into_iter()
                    .find(|code| !self.tried.contains(code))
                    .ok_or(StrategyError::SearchExhausted)?
            }
        };

        self.tried.insert(found.clone());
        Ok(found)
    }
}

/// Iterates over every distinct arrangement of a multiset of colors, in
/// lexicographic order.
///
/// # Examples
///
/// ```rust
/// # use mastermind_rs::Color;
/// use mastermind_strategies::util::Arrangements;
///
/// let arrangements: Vec<String> = Arrangements::new(vec![Color('B'), Color('A'), Color('A')])
///     .map(|code| code.to_string())
///     .collect();
/// assert_eq!(arrangements, ["AAB", "ABA", "BAA"]);
/// ```
#[derive(Clone, Debug)]
pub struct Arrangements {
    next: Option<Vec<Color>>,
}

impl Arrangements {
    /// Starts from the smallest arrangement of `colors`.
    pub fn new(mut colors: Vec<Color>) -> Self {
        colors.sort_unstable();
        Arrangements { next: Some(colors) }
    }
}

impl Iterator for Arrangements {
    type Item = Code;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        // step to the lexicographic successor, if there is one
        let mut successor = current.clone();
        if let Some(pivot) = (1..successor.len())
            .rev()
            .find(|&i| successor[i - 1] < successor[i])
            .map(|i| i - 1)
        {
            let swap = (pivot + 1..successor.len())
                .rev()
                .find(|&j| successor[j] > successor[pivot])
                .unwrap_or(pivot);
            successor.swap(pivot, swap);
            successor[pivot + 1..].reverse();
            self.next = Some(successor);
        }

        Some(Code::new(current))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;
    use mastermind_rs::MastermindError;

    fn colors(s: &str) -> Vec<Color> {
        s.chars().map(Color).collect()
    }

    #[test]
    fn arrangements_are_distinct_and_complete() {
        let all: Vec<Code> = Arrangements::new(colors("AABBC")).collect();
        // 5! / (2! 2! 1!)
        assert_eq!(all.len(), 30);
        assert_eq!(all.iter().unique().count(), 30);
        assert!(all.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(Arrangements::new(colors("CCC")).count(), 1);
        assert_eq!(Arrangements::new(Vec::new()).count(), 1);
    }

    #[test]
    fn search_never_repeats() -> Result<()> {
        let pool = colors("AB");
        let mut search = Search::default();
        let mut seen = Vec::new();
        for _ in 0..2 {
            // a draw that always returns the same code forces the fallback
            let code = search.next(|| Code::new(pool.clone()), || Arrangements::new(pool.clone()))?;
            seen.push(code);
        }
        assert_ne!(seen[0], seen[1]);
        assert_eq!(search.len(), 2);

        assert!(matches!(
            search.next(|| Code::new(pool.clone()), || Arrangements::new(pool.clone())),
            Err(MastermindError::Strategy {
                kind: StrategyError::SearchExhausted
            })
        ));
        Ok(())
    }

    #[test]
    fn remembered_codes_are_skipped() -> Result<()> {
        let mut search = Search::default();
        search.remember(Code::new(colors("AB")));
        let code = search.next(|| Code::new(colors("AB")), || Arrangements::new(colors("AB")))?;
        assert_eq!(code, Code::new(colors("BA")));
        assert!(search.has_tried(&code));
        Ok(())
    }

    #[test]
    fn probe_stops_at_the_end() -> Result<()> {
        let alphabet = Alphabet::standard(2)?;
        let mut probe = Probe::default();
        assert_eq!(probe.code(&alphabet, 3), Some(Code::new(colors("AAA"))));
        probe.advance(&alphabet);
        probe.advance(&alphabet);
        probe.advance(&alphabet);
        assert_eq!(probe.color(&alphabet), None);
        assert!(!probe.is_last(&alphabet));
        Ok(())
    }
}
