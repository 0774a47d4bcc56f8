//! Some guessers for use with `mastermind_rs`.
//!
//! Each guesser consists of a single struct, and everything you need to
//! configure it should exist as a method. [`Specialist`] ties the
//! generator-specific guessers together and picks one per round.

mod odometer;
pub use odometer::Odometer;

mod alternating;
pub use alternating::Alternating;

mod first_last;
pub use first_last::FirstLast;

mod composition;
pub use composition::{Composition, Rule};

mod ab_color;
pub use ab_color::AbColor;

mod mystery;
pub use mystery::Mystery;

mod random_folks;
pub use random_folks::RandomFolks;

mod specialist;
pub use specialist::Specialist;
