use std::{
    collections::{BTreeMap, HashSet},
    fmt::Display,
};

use log::{debug, trace, warn};
use mastermind_rs::{
    Board, Code, Color, Feedback, Generator, Guesser, Phase, Result, Round, StrategyError,
};

/// A guesser for secrets whose first and last positions share a color.
///
/// `FirstLast` deduces the secret one position at a time by editing a
/// baseline guess and watching how the exact count moves. The tied first
/// and last positions are edited together, so a right color there moves the
/// count by two; every interior position moves it by one.
///
/// The count moving up by the slot's width means the new color is right,
/// moving down means the old one was, and staying put means neither was, so
/// the slot moves on to the next color.
///
/// An opening that scores two or more freezes the ends as the first color,
/// but only tentatively: the interior can make up the same count. If the
/// code assembled from the deductions turns out wrong, the ends are walked
/// again. When the tied edits move the count by one, or the ends run out of
/// colors, the ends evidently differ and are deduced one at a time.
///
/// # Examples
///
/// ```rust
/// # use mastermind_rs::{Board, Feedback, Generator, Guesser};
/// use mastermind_strategies::FirstLast;
///
/// let board = Board::standard(4, 6)?;
/// let mut guesser = FirstLast::new();
/// let tag = Generator::FirstLast;
///
/// assert_eq!(guesser.next_guess(&board, &tag, Feedback::start())?.to_string(), "AAAA");
/// // two exact, so the ends are taken to be `A`
/// assert_eq!(guesser.next_guess(&board, &tag, Feedback::new(2, 0, 1))?.to_string(), "ABAA");
/// #
/// # Ok::<_, mastermind_rs::MastermindError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FirstLast {
    round: Round<Deduction>,
}

/// A group of positions that are edited together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Ends,
    First,
    Last,
    Interior(usize),
}

impl Slot {
    fn positions(self, length: usize) -> Vec<usize> {
        match self {
            Slot::Ends if length == 1 => vec![0],
            Slot::Ends => vec![0, length - 1],
            Slot::First => vec![0],
            Slot::Last => vec![length - 1],
            Slot::Interior(i) => vec![i],
        }
    }

    fn width(self, length: usize) -> isize {
        self.positions(length).len() as isize
    }
}

/// An edit in flight: the slot held `from` in the baseline and holds `to` in
/// the guess being scored. The opening guess has no `from`.
#[derive(Debug, Clone, Copy)]
struct Trial {
    slot: Slot,
    from: Option<Color>,
    to: Color,
}

#[derive(Debug, Clone, Default)]
struct Deduction {
    phase: Phase,
    frozen: BTreeMap<usize, Color>,
    ends_tentative: bool,
    ends_split: bool,
    baseline: Option<Code>,
    baseline_exact: usize,
    trial: Option<Trial>,
    tried: HashSet<Code>,
    previous: Option<Code>,
}

impl FirstLast {
    /// Creates a new guesser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets where this guesser is in the current round.
    pub fn phase(&self) -> Phase {
        self.round.state().phase
    }

    /// Gets the positions deduced so far.
    pub fn frozen(&self) -> &BTreeMap<usize, Color> {
        &self.round.state().frozen
    }
}

impl Deduction {
    fn freeze(&mut self, slot: Slot, color: Color, length: usize) {
        debug!("froze {:?} as {}", slot, color);
        for position in slot.positions(length) {
            self.frozen.insert(position, color);
        }
    }

    /// Forgets the ends and deduces them again from the baseline.
    fn reopen_ends(&mut self, length: usize) {
        for position in Slot::Ends.positions(length) {
            self.frozen.remove(&position);
        }
        self.ends_tentative = false;
    }

    /// Learns from the feedback on the trial in flight.
    fn learn(&mut self, trial: Trial, guess: Code, exact: usize, length: usize) {
        let width = trial.slot.width(length);
        let delta = exact as isize - self.baseline_exact as isize;

        match trial.from {
            None => {
                if delta >= width {
                    self.freeze(trial.slot, trial.to, length);
                    self.ends_tentative = true;
                }
                self.baseline = Some(guess);
                self.baseline_exact = exact;
            }
            Some(from) if delta == -width => {
                self.freeze(trial.slot, from, length);
            }
            Some(_) => {
                if delta == width {
                    self.freeze(trial.slot, trial.to, length);
                } else if delta != 0 {
                    debug!(
                        "exact count moved by {} editing {:?}, the ends differ",
                        delta, trial.slot
                    );
                    self.ends_split = true;
                }
                self.baseline = Some(guess);
                self.baseline_exact = exact;
            }
        }
    }

    /// Gets the first slot that still has an unknown position.
    fn open_slot(&self, length: usize) -> Option<Slot> {
        let ends: &[Slot] = if self.ends_split {
            &[Slot::First, Slot::Last]
        } else {
            &[Slot::Ends]
        };
        ends.iter()
            .copied()
            .chain((1..length.saturating_sub(1)).map(Slot::Interior))
            .find(|slot| {
                slot.positions(length)
                    .iter()
                    .any(|p| !self.frozen.contains_key(p))
            })
    }
}

impl Guesser for FirstLast {
    fn next_guess(&mut self, board: &Board, _: &Generator, last: Feedback) -> Result<Code> {
        let deduction = self.round.enter(board, &last)?;
        let colors = board.alphabet();
        let length = board.length();

        let previous = match deduction.previous.take() {
            Some(previous) if !last.is_new_round() => previous,
            _ => {
                let opening = Code::repeated(colors.first(), length);
                deduction.phase = Phase::Probing;
                deduction.trial = Some(Trial {
                    slot: Slot::Ends,
                    from: None,
                    to: colors.first(),
                });
                deduction.previous = Some(opening.clone());
                return Ok(opening);
            }
        };

        if last.is_solved(board) {
            deduction.phase = Phase::Solved;
            deduction.previous = Some(previous.clone());
            return Ok(previous);
        }

        deduction.tried.insert(previous.clone());
        if let Some(trial) = deduction.trial.take() {
            deduction.learn(trial, previous.clone(), last.exact, length);
        }

        let guess = loop {
            let baseline = match &deduction.baseline {
                Some(baseline) => baseline.clone(),
                None => previous.clone(),
            };

            let slot = match deduction.open_slot(length) {
                Some(slot) => slot,
                None => {
                    let assembled: Code = deduction.frozen.values().copied().collect();
                    if !deduction.tried.contains(&assembled) {
                        deduction.phase = Phase::Assembling;
                        break assembled;
                    }
                    if !deduction.ends_tentative {
                        warn!("deduced code {} was already wrong", assembled);
                        deduction.previous = Some(previous);
                        return Err(StrategyError::SearchExhausted.into());
                    }
                    debug!("{} was wrong, walking the ends again", assembled);
                    deduction.reopen_ends(length);
                    deduction.phase = Phase::Probing;
                    continue;
                }
            };

            let positions = slot.positions(length);
            let from = baseline[positions[0]];
            // a single position wraps around, since exactly one color fits it
            let to = if positions.len() == 1 {
                colors
                    .after(from)
                    .or_else(|| colors.get(0))
                    .filter(|&to| to != from)
            } else {
                colors.after(from)
            };

            match to {
                Some(to) => {
                    deduction.trial = Some(Trial {
                        slot,
                        from: Some(from),
                        to,
                    });
                    break positions
                        .iter()
                        .fold(baseline, |code, &position| code.with(position, to));
                }
                None if slot == Slot::Ends => {
                    debug!("ran out of colors for the tied ends, splitting them");
                    deduction.ends_split = true;
                }
                None => {
                    warn!("ran out of colors for {:?}, keeping {}", slot, from);
                    deduction.freeze(slot, from, length);
                }
            }
        };

        trace!("trying {}", guess);
        deduction.previous = Some(guess.clone());
        Ok(guess)
    }

    fn version(&self) -> &'static str {
        "1.1.0"
    }
}

impl Display for FirstLast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mastermind_strategies::FirstLast")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mastermind_rs::Secret;

    const TAG: Generator = Generator::FirstLast;

    fn solve(board: &Board, secret: &str, limit: usize) -> Result<Option<usize>> {
        let secret = Secret::new(board.code(secret)?);
        let mut guesser = FirstLast::new();
        let mut last = Feedback::start();
        for round in 1..=limit {
            let guess = guesser.next_guess(board, &TAG, last)?;
            last = secret.score(&guess, round);
            if last.is_solved(board) {
                return Ok(Some(round));
            }
        }
        Ok(None)
    }

    #[test]
    fn ends_right_moves_on_to_the_interior() -> Result<()> {
        let board = Board::standard(4, 6)?;
        let mut guesser = FirstLast::new();
        guesser.next_guess(&board, &TAG, Feedback::start())?;
        let guess = guesser.next_guess(&board, &TAG, Feedback::new(2, 0, 1))?;
        assert_eq!(guess.to_string(), "ABAA");
        assert_eq!(guesser.frozen().get(&0), Some(&Color('A')));
        assert_eq!(guesser.frozen().get(&3), Some(&Color('A')));
        Ok(())
    }

    #[test]
    fn ends_wrong_advances_both_together() -> Result<()> {
        let board = Board::standard(4, 6)?;
        let mut guesser = FirstLast::new();
        guesser.next_guess(&board, &TAG, Feedback::start())?;
        let guess = guesser.next_guess(&board, &TAG, Feedback::new(1, 0, 1))?;
        assert_eq!(guess.to_string(), "BAAB");
        // no change: neither A nor B
        let guess = guesser.next_guess(&board, &TAG, Feedback::new(1, 0, 2))?;
        assert_eq!(guess.to_string(), "CAAC");
        // up by two: C at both ends
        let guess = guesser.next_guess(&board, &TAG, Feedback::new(3, 0, 3))?;
        assert_eq!(guess.to_string(), "CBAC");
        Ok(())
    }

    #[test]
    fn drop_freezes_the_old_color() -> Result<()> {
        let board = Board::standard(4, 6)?;
        let mut guesser = FirstLast::new();
        guesser.next_guess(&board, &TAG, Feedback::start())?;
        guesser.next_guess(&board, &TAG, Feedback::new(2, 0, 1))?;
        // ABAA scored lower than AAAA, so position 1 is A
        let guess = guesser.next_guess(&board, &TAG, Feedback::new(1, 0, 2))?;
        assert_eq!(guess.to_string(), "AABA");
        assert_eq!(guesser.frozen().get(&1), Some(&Color('A')));
        Ok(())
    }

    #[test]
    fn solves_every_first_last_secret() -> Result<()> {
        let board = Board::standard(4, 6)?;
        for secret in ["AAAA", "ABCA", "FEDF", "CFFC", "BAAB", "EEEE", "DAFD"] {
            assert!(
                solve(&board, secret, 30)?.is_some(),
                "did not solve {}",
                secret
            );
        }
        Ok(())
    }

    #[test]
    fn short_boards() -> Result<()> {
        let board = Board::standard(1, 3)?;
        assert_eq!(solve(&board, "C", 10)?, Some(3));
        let board = Board::standard(2, 3)?;
        assert_eq!(solve(&board, "BB", 10)?, Some(2));
        Ok(())
    }

    #[test]
    fn interior_can_fake_the_ends() -> Result<()> {
        let board = Board::standard(4, 6)?;
        let secret = Secret::new(board.code("BAAB")?);
        let mut guesser = FirstLast::new();
        let mut last = Feedback::start();
        let mut guesses = Vec::new();
        for round in 1..=10 {
            let guess = guesser.next_guess(&board, &TAG, last)?;
            last = secret.score(&guess, round);
            guesses.push(guess.to_string());
            if last.is_solved(&board) {
                break;
            }
        }
        assert_eq!(guesses, ["AAAA", "ABAA", "AABA", "BAAB"]);
        assert_eq!(guesser.phase(), Phase::Probing);
        assert_eq!(guesser.frozen().len(), 2);
        assert_eq!(solve(&board, "CAAC", 10)?, Some(5));
        Ok(())
    }

    #[test]
    fn wrong_guesses_are_never_repeated() -> Result<()> {
        let board = Board::standard(5, 6)?;
        for secret in ["BAAAB", "BCAAB", "FAAAF", "DAEAD"] {
            let code = Secret::new(board.code(secret)?);
            let mut guesser = FirstLast::new();
            let mut last = Feedback::start();
            let mut seen = HashSet::new();
            for round in 1..=40 {
                let guess = guesser.next_guess(&board, &TAG, last)?;
                last = code.score(&guess, round);
                if last.is_solved(&board) {
                    break;
                }
                assert!(seen.insert(guess.clone()), "repeated {} on {}", guess, secret);
            }
            assert!(last.is_solved(&board), "did not solve {}", secret);
        }
        Ok(())
    }

    #[test]
    fn ends_that_differ_are_split() -> Result<()> {
        let board = Board::standard(4, 3)?;
        assert_eq!(solve(&board, "ABCC", 20)?, Some(8));
        assert!(solve(&board, "CBAA", 20)?.is_some());
        Ok(())
    }
}
