//! The test harness for running Mastermind guessers.
//!
//! The harness plays the part of the round controller: it generates secrets,
//! calls each guesser with the feedback for its previous guess, and stops a
//! round once the secret is found or the guess limit is reached.

use std::ops::Deref;

#[cfg(all(feature = "fancy", not(feature = "parallel")))]
use indicatif::ProgressIterator;
#[cfg(all(feature = "fancy", feature = "parallel"))]
use indicatif::ParallelProgressIterator;
use log::{debug, trace};
use rand::{rngs::SmallRng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    code::Board,
    guesser::{Attempts, Feedback, Guesser},
    perf::{Perf, Summary},
    secret::{Generator, Secret},
    HarnessError, Result,
};

/// Builds a fresh guesser for every round.
pub type Factory = Box<dyn Fn() -> Box<dyn Guesser> + Send + Sync>;

/// A test harness that can run many guessers on many secrets.
///
/// When you want to test your guessers, create a new test harness
/// with [`new()`](Harness::new()). You can then configure it using various
/// methods. Note that these configuration methods consume the existing
/// [`Harness`] and return a new one.
///
/// Guessers keep state between calls, so the harness takes a constructor
/// rather than an instance and builds a fresh guesser for every round.
///
/// # Examples
///
/// ```rust
/// # use mastermind_rs::{harness::Harness, Board, Generator};
/// use mastermind_rs::guesser::boring::Boring;
///
/// let harness = Harness::new()
///     .quiet()
///     .board(Board::standard(2, 3)?)
///     .generator(Generator::InsertColors)
///     .add_guesser(|| Box::new(Boring::new()))
///     .rounds(50);
///
/// let record = harness.run()?;
/// assert_eq!(record[0].num_tried(), 50);
/// #
/// # Ok::<_, mastermind_rs::MastermindError>(())
/// ```
pub struct Harness {
    factories: Vec<Factory>,
    board: Board,
    generator: Generator,
    rounds: usize,
    guess_limit: usize,
    seed: Option<u64>,
    verbose: bool,
}

impl Default for Harness {
    fn default() -> Self {
        Harness {
            factories: Vec::new(),
            board: Board::classic(),
            generator: Generator::InsertColors,
            rounds: 100,
            guess_limit: 100,
            seed: None,
            verbose: false,
        }
    }
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("guessers", &self.factories.len())
            .field("board", &self.board)
            .field("generator", &self.generator)
            .field("rounds", &self.rounds)
            .field("guess_limit", &self.guess_limit)
            .field("seed", &self.seed)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl Harness {
    /// Creates a new test harness with default configuration.
    ///
    /// Defaults:
    /// 1. tests no guessers
    /// 2. quiet mode
    /// 3. plays 100 rounds on the classic board against `insert-colors`
    /// 4. gives up on a round after 100 guesses
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the harness verbose while testing.
    ///
    /// As of right now, this consists of a progress bar and nothing else.
    pub fn verbose(self) -> Self {
        Harness {
            verbose: true,
            ..self
        }
    }

    /// Makes the harness silent while testing.
    pub fn quiet(self) -> Self {
        Harness {
            verbose: false,
            ..self
        }
    }

    /// Sets the board every round is played on.
    pub fn board(self, board: Board) -> Self {
        Harness { board, ..self }
    }

    /// Sets the generator that produces each round's secret.
    pub fn generator(self, generator: Generator) -> Self {
        Harness { generator, ..self }
    }

    /// Sets the number of secrets each guesser plays against.
    pub fn rounds(self, rounds: usize) -> Self {
        Harness { rounds, ..self }
    }

    /// Sets the number of guesses after which a round is lost.
    pub fn guess_limit(self, guess_limit: usize) -> Self {
        Harness {
            guess_limit,
            ..self
        }
    }

    /// Makes the secrets reproducible.
    pub fn seed(self, seed: u64) -> Self {
        Harness {
            seed: Some(seed),
            ..self
        }
    }

    /// Adds a guesser to the harness for testing.
    pub fn add_guesser<F>(self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Guesser> + Send + Sync + 'static,
    {
        let mut factories = self.factories;
        factories.push(Box::new(factory));
        Harness { factories, ..self }
    }

    /// Adds a [`Vec`] of guessers to the harness for testing.
    pub fn add_guessers(self, guessers: Vec<Factory>) -> Self {
        let mut factories = self.factories;
        factories.extend(guessers);
        Harness { factories, ..self }
    }

    /// Runs the harness and produces performances for each guesser.
    ///
    /// The [`Perf`]s will be in the same order as the guessers were added
    /// to the harness, and each lists the secrets in the order they were
    /// generated.
    pub fn run(&self) -> Result<Record> {
        if self.factories.is_empty() {
            return Err(HarnessError::NoGuessersAdded.into());
        }

        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let secrets = (0..self.rounds)
            .map(|_| self.generator.generate(&self.board, &mut rng))
            .collect::<Result<Vec<_>>>()?;

        let rows = self.play_all(&secrets)?;

        let mut perfs: Vec<Perf> = self
            .factories
            .iter()
            .map(|factory| Perf::new(factory().as_ref(), self.guess_limit))
            .collect();
        for (secret, row) in secrets.into_iter().zip(rows) {
            for (perf, attempts) in perfs.iter_mut().zip(row) {
                perf.tries.push((secret.clone(), attempts));
            }
        }

        Ok(Record::new(perfs))
    }

    #[cfg(feature = "parallel")]
    fn play_all(&self, secrets: &[Secret]) -> Result<Vec<Vec<Attempts>>> {
        #[cfg(feature = "fancy")]
        if self.verbose {
            return secrets
                .par_iter()
                .progress_count(secrets.len() as u64)
                .map(|secret| self.run_inner(secret))
                .collect();
        }

        secrets
            .par_iter()
            .map(|secret| self.run_inner(secret))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn play_all(&self, secrets: &[Secret]) -> Result<Vec<Vec<Attempts>>> {
        #[cfg(feature = "fancy")]
        if self.verbose {
            return secrets
                .iter()
                .progress_count(secrets.len() as u64)
                .map(|secret| self.run_inner(secret))
                .collect();
        }

        secrets.iter().map(|secret| self.run_inner(secret)).collect()
    }

    fn run_inner(&self, secret: &Secret) -> Result<Vec<Attempts>> {
        self.factories
            .iter()
            .map(|factory| {
                let mut guesser = factory();
                self.play(guesser.as_mut(), secret)
            })
            .collect()
    }

    /// Plays one round of `guesser` against `secret`.
    pub fn play(&self, guesser: &mut dyn Guesser, secret: &Secret) -> Result<Attempts> {
        let mut attempts = Attempts::new();
        let mut feedback = Feedback::start();

        while attempts.len() < self.guess_limit {
            let guess = guesser.next_guess(&self.board, &self.generator, feedback)?;
            if self.board.check(&guess).is_err() {
                return Err(HarnessError::InvalidGuess {
                    guesser: guesser.to_string(),
                    guess: guess.to_string(),
                }
                .into());
            }

            feedback = secret.score(&guess, attempts.len() + 1);
            trace!("{} guessed {} for {}: {}", guesser, guess, secret, feedback);
            attempts.push(guess, feedback, &self.board);
            if attempts.solved() {
                break;
            }
        }

        debug!(
            "{} {} {} after {} guesses",
            guesser,
            if attempts.solved() { "solved" } else { "missed" },
            secret,
            attempts.len()
        );
        Ok(attempts)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Record {
    perfs: Vec<Perf>,
}

impl Deref for Record {
    type Target = [Perf];

    fn deref(&self) -> &Self::Target {
        &self.perfs
    }
}

impl Record {
    fn new(perfs: Vec<Perf>) -> Self {
        Self { perfs }
    }

    pub fn summaries(&self) -> Vec<Summary<'_>> {
        self.perfs.iter().map(Perf::to_summary).collect()
    }

    pub fn print_report(&self) -> Result<()> {
        for summary in self.summaries() {
            summary.print(Summary::print_options().histogram(true))?;
        }

        Ok(())
    }

    /// Writes every summary as a JSON array.
    #[cfg(feature = "serde")]
    pub fn write_json<W: std::io::Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.summaries())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{mock::Mock, MastermindError};

    #[test]
    fn empty_harness_refuses_to_run() {
        assert!(matches!(
            Harness::new().run(),
            Err(MastermindError::Harness {
                kind: HarnessError::NoGuessersAdded
            })
        ));
    }

    #[test]
    fn scripted_guesser_solves() -> Result<()> {
        let board = Board::standard(2, 2)?;
        let harness = Harness::new().board(board.clone());
        let secret = Secret::new(board.code("BA")?);

        let mut mock = Mock::new(vec!["AA", "AB", "BA", "BB"]);
        let attempts = harness.play(&mut mock, &secret)?;
        assert!(attempts.solved());
        assert_eq!(attempts.len(), 3);
        assert_eq!(attempts.inner()[1].1, Feedback::new(0, 2, 2));
        Ok(())
    }

    #[test]
    fn rounds_stop_at_the_limit() -> Result<()> {
        let board = Board::standard(2, 2)?;
        let harness = Harness::new().board(board.clone()).guess_limit(3);
        let secret = Secret::new(board.code("BB")?);

        let mut mock = Mock::new(vec!["AA"]);
        let attempts = harness.play(&mut mock, &secret)?;
        assert!(!attempts.solved());
        assert_eq!(attempts.len(), 3);
        Ok(())
    }

    #[test]
    fn invalid_guesses_are_reported() -> Result<()> {
        let board = Board::standard(3, 2)?;
        let harness = Harness::new().board(board.clone());
        let secret = Secret::new(board.code("ABA")?);

        let mut mock = Mock::new(vec!["ABC"]);
        assert!(matches!(
            harness.play(&mut mock, &secret),
            Err(MastermindError::Harness {
                kind: HarnessError::InvalidGuess { .. }
            })
        ));
        Ok(())
    }

    #[test]
    fn every_guesser_plays_every_secret() -> Result<()> {
        let record = Harness::new()
            .board(Board::standard(2, 2)?)
            .seed(11)
            .rounds(40)
            .add_guesser(|| Box::new(Mock::new(vec!["AA", "AB", "BA", "BB"])))
            .add_guesser(|| Box::new(Mock::new(vec!["BB", "BA", "AB", "AA"])))
            .run()?;

        assert_eq!(record.len(), 2);
        for perf in record.iter() {
            assert_eq!(perf.num_tried(), 40);
            assert_eq!(perf.num_solved(), 40);
        }
        // both guessers saw the same secrets in the same order
        for ((a, _), (b, _)) in record[0].tries().iter().zip(record[1].tries()) {
            assert_eq!(a, b);
        }
        Ok(())
    }

    #[test]
    fn seeded_runs_repeat() -> Result<()> {
        let run = || {
            Harness::new()
                .seed(5)
                .rounds(10)
                .add_guesser(|| Box::new(Mock::new(vec!["ABCD"])))
                .run()
        };
        let first = run()?;
        let second = run()?;
        let secrets = |r: &Record| r[0].tries().iter().map(|(s, _)| s.clone()).collect::<Vec<_>>();
        assert_eq!(secrets(&first), secrets(&second));
        Ok(())
    }
}
