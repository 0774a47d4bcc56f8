use std::fmt::Display;

use crate::{Board, Code, Feedback, Generator, Guesser, Result, Round};

/// Replays a fixed list of guesses, repeating the last one when it runs out.
#[derive(Debug, Clone)]
pub(crate) struct Mock {
    guesses: Vec<&'static str>,
    round: Round<usize>,
}

impl Mock {
    pub(crate) fn new(guesses: Vec<&'static str>) -> Self {
        Self {
            guesses,
            round: Round::new(),
        }
    }
}

impl Guesser for Mock {
    fn next_guess(&mut self, board: &Board, _: &Generator, last: Feedback) -> Result<Code> {
        let next = self.round.enter(board, &last)?;
        let index = (*next).min(self.guesses.len() - 1);
        *next += 1;
        // not checked against the board
        Ok(Code::new(self.guesses[index].chars().map(crate::Color)))
    }

    fn version(&self) -> &'static str {
        "1.2.4"
    }
}

impl Display for Mock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mock {:?}", self.guesses)
    }
}
