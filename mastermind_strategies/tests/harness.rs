//! Plays every guesser against secrets from the generators it is built for.

use mastermind_rs::{Board, Generator, Harness, Result};
use mastermind_strategies::{Odometer, RandomFolks, Specialist};

fn specialist_harness(generator: Generator, board: Board) -> Harness {
    Harness::new()
        .board(board)
        .generator(generator)
        .rounds(40)
        .seed(17)
        .add_guesser(|| Box::new(Specialist::with_seed(5)))
}

macro_rules! solves_test {
    ($name:ident, $tag:expr) => {
        #[test]
        fn $name() -> Result<()> {
            let generator: Generator = $tag.parse()?;
            let record = specialist_harness(generator, Board::standard(4, 6)?).run()?;
            let summary = record[0].to_summary();
            assert_eq!(summary.num_tried(), 40);
            assert_eq!(summary.num_solved(), 40, "missed some {} secrets", generator);
            Ok(())
        }
    };
}

solves_test!(solves_two_color_alternating, "two-color-alternating");
solves_test!(solves_first_last, "first-last");
solves_test!(solves_two_color, "two-color");
solves_test!(solves_only_once, "only-once");
solves_test!(solves_usually_fewer, "usually-fewer");
solves_test!(solves_prefer_fewer, "PreferFewer");
solves_test!(solves_ab_color, "ab-color");

#[test]
fn mystery_guesses_stay_on_the_board() -> Result<()> {
    for variant in 1..=5 {
        let record = specialist_harness(Generator::Mystery(variant), Board::standard(7, 5)?)
            .guess_limit(15)
            .run()?;
        assert_eq!(record[0].num_tried(), 40);
    }
    Ok(())
}

#[test]
fn seeded_runs_repeat() -> Result<()> {
    let harness = specialist_harness(Generator::UsuallyFewer, Board::standard(5, 6)?);
    let first = harness.run()?;
    let second = harness.run()?;
    assert_eq!(first[0].tries(), second[0].tries());
    Ok(())
}

#[test]
fn baselines_play_insert_colors() -> Result<()> {
    let record = Harness::new()
        .board(Board::standard(3, 3)?)
        .generator(Generator::InsertColors)
        .rounds(30)
        .seed(3)
        .add_guesser(|| Box::new(Odometer::new()))
        .add_guesser(|| Box::new(RandomFolks::with_seed(8)))
        .run()?;

    assert_eq!(record.len(), 2);
    // the odometer walks every setting of the free positions, so a secret
    // that starts with the first color is always found
    for (secret, attempts) in record[0].tries() {
        if secret.starts_with(&[mastermind_rs::Color('A')]) {
            assert!(attempts.solved(), "missed {}", **secret);
        }
    }
    Ok(())
}

#[test]
fn specialist_refuses_insert_colors() -> Result<()> {
    let result = specialist_harness(Generator::InsertColors, Board::classic()).run();
    assert!(result.is_err());
    Ok(())
}
