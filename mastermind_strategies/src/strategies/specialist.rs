use std::fmt::Display;

use log::debug;
use mastermind_rs::{
    Board, Code, ConfigError, Feedback, Generator, Guesser, Result, StrategyError,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{AbColor, Alternating, Composition, FirstLast, Mystery, Rule};

/// A guesser that hands each round to the guesser built for the
/// generator that made the secret.
///
/// At the start of every round `Specialist` looks the generator tag up and
/// builds a fresh sub-guesser for it; every later call in the round goes to
/// that sub-guesser. The tag may not change in the middle of a round.
///
/// | Generator | Sub-guesser |
/// |---|---|
/// | `two-color-alternating` | [`Alternating`] |
/// | `first-last` | [`FirstLast`] |
/// | `two-color` | [`Composition`] with [`Rule::TwoColor`] |
/// | `only-once` | [`Composition`] with [`Rule::OnlyOnce`] |
/// | `usually-fewer`, `prefer-fewer` | [`Composition`] with [`Rule::Unconstrained`] |
/// | `ab-color` | [`AbColor`] |
/// | `mystery-N` | [`Mystery`] |
///
/// There is nothing special to do for `insert-colors`, so that tag is
/// rejected.
///
/// # Examples
///
/// ```rust
/// # use mastermind_rs::{Board, Feedback, Generator, Guesser};
/// use mastermind_strategies::Specialist;
///
/// let board = Board::standard(4, 5)?;
/// let mut specialist = Specialist::with_seed(1);
/// let tag = Generator::TwoColorAlternating;
///
/// assert_eq!(specialist.next_guess(&board, &tag, Feedback::start())?.to_string(), "AAAA");
/// assert_eq!(specialist.next_guess(&board, &tag, Feedback::new(0, 0, 1))?.to_string(), "BBBB");
///
/// assert!(specialist.next_guess(&board, &Generator::InsertColors, Feedback::start()).is_err());
/// #
/// # Ok::<_, mastermind_rs::MastermindError>(())
/// ```
#[derive(Debug)]
pub struct Specialist {
    rng: SmallRng,
    active: Option<(Generator, Box<dyn Guesser>)>,
}

impl Default for Specialist {
    fn default() -> Self {
        Specialist {
            rng: SmallRng::from_entropy(),
            active: None,
        }
    }
}

impl Specialist {
    /// Creates a new guesser seeded from entropy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new guesser with a fixed seed. The seed is passed on to
    /// the randomized sub-guessers, so whole rounds are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Specialist {
            rng: SmallRng::seed_from_u64(seed),
            active: None,
        }
    }

    /// Returns true if there is a sub-guesser for `generator`.
    pub fn supports(generator: &Generator) -> bool {
        !matches!(generator, Generator::InsertColors)
    }

    /// Gets the name of the sub-guesser playing the current round, if any.
    pub fn active(&self) -> Option<String> {
        self.active.as_ref().map(|(_, tactic)| tactic.to_string())
    }

    /// Builds a fresh sub-guesser for `generator`.
    fn tactic_for(&mut self, generator: &Generator) -> Result<Box<dyn Guesser>> {
        let seed = self.rng.gen();
        let tactic: Box<dyn Guesser> = match generator {
            Generator::TwoColorAlternating => Box::new(Alternating::new()),
            Generator::FirstLast => Box::new(FirstLast::new()),
            Generator::TwoColor => Box::new(Composition::with_seed(Rule::TwoColor, seed)),
            Generator::OnlyOnce => Box::new(Composition::with_seed(Rule::OnlyOnce, seed)),
            Generator::UsuallyFewer | Generator::PreferFewer => {
                Box::new(Composition::with_seed(Rule::Unconstrained, seed))
            }
            Generator::AbColor => Box::new(AbColor::with_seed(seed)),
            Generator::Mystery(variant) => Box::new(Mystery::with_seed(*variant, seed)?),
            Generator::InsertColors => {
                return Err(StrategyError::UnsupportedGenerator {
                    strategy: self.to_string(),
                    generator: generator.to_string(),
                }
                .into())
            }
        };
        Ok(tactic)
    }
}

impl Guesser for Specialist {
    fn next_guess(&mut self, board: &Board, generator: &Generator, last: Feedback) -> Result<Code> {
        if last.is_new_round() {
            last.check(board)?;
            self.active = None;
            let tactic = self.tactic_for(generator)?;
            debug!("playing {} with {}", generator, tactic);
            self.active = Some((*generator, tactic));
        }

        match &mut self.active {
            None => Err(ConfigError::RoundNotStarted(last.round).into()),
            Some((started, _)) if *started != *generator => Err(ConfigError::GeneratorChanged {
                expected: started.to_string(),
                found: generator.to_string(),
            }
            .into()),
            Some((_, tactic)) => tactic.next_guess(board, generator, last),
        }
    }

    fn version(&self) -> &'static str {
        "2.0.0"
    }
}

impl Display for Specialist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mastermind_strategies::Specialist")
    }
}
