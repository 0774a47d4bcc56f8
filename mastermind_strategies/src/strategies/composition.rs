use std::fmt::Display;

use log::{debug, trace};
use mastermind_rs::{Board, Code, Color, Feedback, Generator, Guesser, Phase, Result, Round};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

use crate::util::{Arrangements, Probe, Search};

/// What a [`Composition`] guesser assumes about how often a color repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// The secret uses exactly two colors.
    TwoColor,
    /// Every color shows up at most once.
    OnlyOnce,
    /// Any color may show up any number of times.
    Unconstrained,
}

/// A guesser that first finds out which colors the secret uses and then
/// searches through their arrangements.
///
/// While probing, `Composition` guesses one color at a time. The exact
/// count of a single-color probe is how often that color shows up, so once
/// the counts add up to the length of the board (or only one color is left
/// to account for the rest) the multiset of colors is known. After that it
/// tries random arrangements of the multiset, never repeating a guess, and
/// falls back to walking them in order when random draws keep landing on
/// ones it has tried.
#[derive(Debug, Clone)]
pub struct Composition {
    rule: Rule,
    rng: SmallRng,
    round: Round<Discovery>,
}

#[derive(Debug, Clone, Default)]
struct Discovery {
    phase: Phase,
    probe: Probe,
    found: Vec<Color>,
    search: Search,
    previous: Option<Code>,
}

impl Composition {
    /// Creates a new guesser with the given rule.
    pub fn new(rule: Rule) -> Self {
        Composition {
            rule,
            rng: SmallRng::from_entropy(),
            round: Round::new(),
        }
    }

    /// Creates a new guesser with the given rule and a fixed seed.
    pub fn with_seed(rule: Rule, seed: u64) -> Self {
        Composition {
            rng: SmallRng::seed_from_u64(seed),
            ..Self::new(rule)
        }
    }

    /// The guesser for [`Generator::TwoColor`].
    pub fn two_color() -> Self {
        Self::new(Rule::TwoColor)
    }

    /// The guesser for [`Generator::OnlyOnce`].
    pub fn only_once() -> Self {
        Self::new(Rule::OnlyOnce)
    }

    /// The guesser for [`Generator::UsuallyFewer`].
    pub fn usually_fewer() -> Self {
        Self::new(Rule::Unconstrained)
    }

    /// The guesser for [`Generator::PreferFewer`].
    pub fn prefer_fewer() -> Self {
        Self::new(Rule::Unconstrained)
    }

    /// Gets the rule this guesser assumes about the secret.
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Gets where this guesser is in the current round.
    pub fn phase(&self) -> Phase {
        self.round.state().phase
    }

    /// Gets the colors found so far, with repeats.
    pub fn found(&self) -> &[Color] {
        &self.round.state().found
    }
}

impl Discovery {
    /// Records what a single-color probe of `probed` revealed.
    fn record(&mut self, rule: Rule, probed: Color, last: &Feedback) {
        let times = match rule {
            Rule::OnlyOnce if last.exact == 1 && last.color_only == 0 => 1,
            Rule::OnlyOnce => 0,
            Rule::TwoColor | Rule::Unconstrained => last.exact,
        };
        if times > 0 {
            debug!("secret uses {} {} time(s)", probed, times);
            self.found.extend(std::iter::repeat(probed).take(times));
        }
    }

    fn arrange(&mut self, rng: &mut SmallRng) -> Result<Code> {
        let pool = self.found.clone();
        self.search.next(
            || {
                let mut draw = pool.clone();
                draw.shuffle(&mut *rng);
                Code::new(draw)
            },
            || Arrangements::new(pool.clone()),
        )
    }
}

impl Guesser for Composition {
    fn next_guess(&mut self, board: &Board, _: &Generator, last: Feedback) -> Result<Code> {
        let rule = self.rule;
        let discovery = self.round.enter(board, &last)?;
        let colors = board.alphabet();
        let length = board.length();

        let previous = match discovery.previous.take() {
            Some(previous) if !last.is_new_round() => previous,
            _ => {
                let opening = Code::repeated(colors.first(), length);
                discovery.phase = Phase::Probing;
                discovery.search.remember(opening.clone());
                discovery.previous = Some(opening.clone());
                return Ok(opening);
            }
        };

        if last.is_solved(board) {
            discovery.phase = Phase::Solved;
            discovery.previous = Some(previous.clone());
            return Ok(previous);
        }

        if discovery.phase == Phase::Probing {
            if rule == Rule::OnlyOnce && colors.len() == length {
                // every color shows up exactly once
                discovery.found = colors.iter().collect();
            } else {
                discovery.record(rule, previous[0], &last);
            }

            while discovery.found.len() < length {
                let next = match discovery.probe.advance(colors) {
                    Some(next) => next,
                    None => break,
                };
                if !discovery.probe.is_last(colors) {
                    let probe = Code::repeated(next, length);
                    discovery.search.remember(probe.clone());
                    discovery.previous = Some(probe.clone());
                    return Ok(probe);
                }
                // the last color accounts for whatever is left
                let missing = length - discovery.found.len();
                debug!("inferred {} {} time(s) without probing", next, missing);
                discovery.found.extend(std::iter::repeat(next).take(missing));
            }

            if discovery.found.len() < length {
                let pad = discovery.found.last().copied().unwrap_or_else(|| colors.first());
                discovery.found.resize(length, pad);
            }
            discovery.found.truncate(length);
            discovery.phase = Phase::Assembling;
            debug!(
                "composition is {}, assembling",
                Code::new(discovery.found.iter().copied())
            );
        }

        let guess = discovery.arrange(&mut self.rng)?;
        trace!("arranged {}", guess);
        discovery.previous = Some(guess.clone());
        Ok(guess)
    }

    fn version(&self) -> &'static str {
        "1.2.0"
    }
}

impl Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mastermind_strategies::Composition ({:?})", self.rule)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;
    use itertools::Itertools;
    use mastermind_rs::{MastermindError, Secret, StrategyError};

    fn play(
        guesser: &mut Composition,
        board: &Board,
        secret: &str,
        limit: usize,
    ) -> Result<Vec<Code>> {
        let secret = Secret::new(board.code(secret)?);
        let mut last = Feedback::start();
        let mut guesses = Vec::new();
        for round in 1..=limit {
            let guess = guesser.next_guess(board, &Generator::InsertColors, last)?;
            last = secret.score(&guess, round);
            guesses.push(guess);
            if last.is_solved(board) {
                break;
            }
        }
        Ok(guesses)
    }

    #[test]
    fn counts_colors_from_probes() -> Result<()> {
        let board = Board::standard(4, 6)?;
        let mut guesser = Composition::with_seed(Rule::Unconstrained, 3);
        let tag = Generator::UsuallyFewer;
        guesser.next_guess(&board, &tag, Feedback::start())?;
        assert_eq!(
            guesser.next_guess(&board, &tag, Feedback::new(2, 0, 1))?.to_string(),
            "BBBB"
        );
        assert_eq!(guesser.found(), [Color('A'), Color('A')]);
        assert_eq!(guesser.phase(), Phase::Probing);
        let guess = guesser.next_guess(&board, &tag, Feedback::new(2, 0, 2))?;
        assert_eq!(guesser.phase(), Phase::Assembling);
        assert_eq!(guess.iter().sorted().join(""), "AABB");
        Ok(())
    }

    #[test]
    fn last_color_is_inferred() -> Result<()> {
        let board = Board::standard(4, 3)?;
        let mut guesser = Composition::with_seed(Rule::Unconstrained, 5);
        let guesses = play(&mut guesser, &board, "CBCC", 20)?;
        // probes for A and B only
        assert!(!guesses.iter().any(|g| g.to_string() == "CCCC"));
        assert_eq!(guesses.last().map(|g| g.to_string()), Some("CBCC".into()));
        Ok(())
    }

    #[test]
    fn never_repeats_a_guess() -> Result<()> {
        let board = Board::standard(5, 4)?;
        for (seed, secret) in ["ABCDA", "DDDDA", "CABBA", "BBBBB"].iter().enumerate() {
            let mut guesser = Composition::with_seed(Rule::Unconstrained, seed as u64);
            let guesses = play(&mut guesser, &board, secret, 200)?;
            assert_eq!(guesses.iter().unique().count(), guesses.len());
            assert_eq!(guesses.last().map(|g| g.to_string()), Some(secret.to_string()));
        }
        Ok(())
    }

    #[test]
    fn only_once_skips_probes_on_full_alphabets() -> Result<()> {
        let board = Board::standard(4, 4)?;
        let mut guesser = Composition::with_seed(Rule::OnlyOnce, 11);
        guesser.next_guess(&board, &Generator::OnlyOnce, Feedback::start())?;
        let guess = guesser.next_guess(&board, &Generator::OnlyOnce, Feedback::new(1, 0, 1))?;
        assert_eq!(guesser.phase(), Phase::Assembling);
        assert_eq!(guess.iter().collect::<HashSet<_>>().len(), 4);

        let mut guesser = Composition::with_seed(Rule::OnlyOnce, 2);
        let guesses = play(&mut guesser, &board, "DBAC", 30)?;
        assert_eq!(guesses.last().map(|g| g.to_string()), Some("DBAC".into()));
        Ok(())
    }

    #[test]
    fn only_once_ignores_probes_with_color_matches() -> Result<()> {
        let board = Board::standard(3, 6)?;
        let mut guesser = Composition::with_seed(Rule::OnlyOnce, 0);
        guesser.next_guess(&board, &Generator::OnlyOnce, Feedback::start())?;
        guesser.next_guess(&board, &Generator::OnlyOnce, Feedback::new(1, 0, 1))?;
        guesser.next_guess(&board, &Generator::OnlyOnce, Feedback::new(1, 2, 2))?;
        assert_eq!(guesser.found(), [Color('A')]);
        Ok(())
    }

    #[test]
    fn two_color_solves() -> Result<()> {
        let board = Board::standard(4, 6)?;
        for secret in ["ABAB", "FFEF", "CDDD", "BEEB"] {
            let mut guesser = Composition::with_seed(Rule::TwoColor, 9);
            let guesses = play(&mut guesser, &board, secret, 30)?;
            assert_eq!(guesses.last().map(|g| g.to_string()), Some(secret.into()));
        }
        Ok(())
    }

    #[test]
    fn exhausted_search_is_an_error() -> Result<()> {
        let board = Board::standard(2, 2)?;
        let mut guesser = Composition::with_seed(Rule::Unconstrained, 1);
        let tag = Generator::InsertColors;
        guesser.next_guess(&board, &tag, Feedback::start())?;
        // claims one A, so B is inferred: AB and BA are all that is left
        guesser.next_guess(&board, &tag, Feedback::new(1, 0, 1))?;
        guesser.next_guess(&board, &tag, Feedback::new(0, 2, 2))?;
        assert!(matches!(
            guesser.next_guess(&board, &tag, Feedback::new(0, 2, 3)),
            Err(MastermindError::Strategy {
                kind: StrategyError::SearchExhausted
            })
        ));
        Ok(())
    }
}
