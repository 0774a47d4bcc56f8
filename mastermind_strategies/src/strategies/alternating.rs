use std::{collections::VecDeque, fmt::Display};

use log::debug;
use mastermind_rs::{
    Board, Code, Color, Feedback, Generator, Guesser, Phase, Result, Round, StrategyError,
};

use crate::util::{Probe, Search};

/// A guesser for secrets that alternate between two colors.
///
/// `Alternating` probes one color at a time until two probes have found
/// something, then tries both ways of alternating the two colors. A secret
/// from [`Generator::TwoColorAlternating`] is always one of them.
///
/// If both patterns miss, probing picks up where it stopped, and every
/// color found after that is alternated with each color found before it.
/// No guess is made twice in a round; once the probes and patterns run out
/// the round fails with [`StrategyError::SearchExhausted`].
#[derive(Debug, Clone, Default)]
pub struct Alternating {
    round: Round<Pair>,
}

#[derive(Debug, Clone, Default)]
struct Pair {
    phase: Phase,
    probe: Probe,
    found: Vec<Color>,
    patterns: VecDeque<Code>,
    search: Search,
    previous: Option<Code>,
}

impl Alternating {
    /// Creates a new guesser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets where this guesser is in the current round.
    pub fn phase(&self) -> Phase {
        self.round.state().phase
    }

    /// Gets the colors found so far, in the order they were found.
    pub fn found(&self) -> &[Color] {
        &self.round.state().found
    }
}

/// Alternates `first` and `second`, starting with `first`.
fn pattern(first: Color, second: Color, length: usize) -> Code {
    (0..length)
        .map(|i| if i % 2 == 0 { first } else { second })
        .collect()
}

impl Pair {
    fn record(&mut self, color: Color, length: usize) {
        debug!("secret uses {}", color);
        for &earlier in &self.found {
            self.patterns.push_back(pattern(earlier, color, length));
            self.patterns.push_back(pattern(color, earlier, length));
        }
        self.found.push(color);
    }

    fn next_pattern(&mut self) -> Option<Code> {
        while let Some(code) = self.patterns.pop_front() {
            if !self.search.has_tried(&code) {
                return Some(code);
            }
        }
        None
    }
}

impl Guesser for Alternating {
    fn next_guess(&mut self, board: &Board, _: &Generator, last: Feedback) -> Result<Code> {
        let pair = self.round.enter(board, &last)?;
        let colors = board.alphabet();
        let length = board.length();

        let previous = match pair.previous.take() {
            Some(previous) if !last.is_new_round() => previous,
            _ => {
                pair.phase = Phase::Probing;
                let opening = Code::repeated(colors.first(), length);
                pair.previous = Some(opening.clone());
                return Ok(opening);
            }
        };

        if last.is_solved(board) {
            pair.phase = Phase::Solved;
            pair.previous = Some(previous.clone());
            return Ok(previous);
        }

        pair.search.remember(previous.clone());
        if pair.phase == Phase::Probing {
            let probed = previous[0];
            if !last.is_blank() && !pair.found.contains(&probed) {
                pair.record(probed, length);
            }
        }

        let guess = if let Some(code) = pair.next_pattern() {
            pair.phase = Phase::Assembling;
            code
        } else if let Some(next) = pair.probe.advance(colors) {
            if pair.phase == Phase::Assembling {
                debug!("no pattern of {:?} fits, probing on", pair.found);
            }
            pair.phase = Phase::Probing;
            Code::repeated(next, length)
        } else {
            pair.previous = Some(previous);
            return Err(StrategyError::SearchExhausted.into());
        };

        pair.search.remember(guess.clone());
        pair.previous = Some(guess.clone());
        Ok(guess)
    }

    fn version(&self) -> &'static str {
        "1.1.0"
    }
}

impl Display for Alternating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mastermind_strategies::Alternating")
    }
}
