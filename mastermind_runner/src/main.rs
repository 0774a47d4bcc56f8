use std::io::{self, Write};

use clap::Parser;
use log::{info, warn};
use mastermind_rs::{Board, Generator, Harness, Record, Result};
use mastermind_strategies::{Odometer, RandomFolks, Specialist};

/// Plays every secret generator against the baseline guessers and the
/// specialist, then reports how each of them did.
#[derive(Parser, Debug)]
#[command(name = "mastermind_runner", version, about)]
struct Cli {
    /// Number of secrets to play per generator
    #[arg(default_value_t = 200)]
    rounds: usize,

    /// Print the summaries as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let Cli { rounds, json } = Cli::parse();

    let mut records = Vec::new();
    for generator in Generator::all() {
        let board = match generator {
            Generator::Mystery(_) => Board::standard(7, 5)?,
            _ => Board::classic(),
        };
        info!("playing {} rounds of {} on {}", rounds, generator, board);

        let mut harness = Harness::new()
            .board(board)
            .generator(generator)
            .rounds(rounds)
            .add_guesser(|| Box::new(Odometer::new()))
            .add_guesser(|| Box::new(RandomFolks::new()));
        if Specialist::supports(&generator) {
            harness = harness.add_guesser(|| Box::new(Specialist::new()));
        } else {
            warn!("no specialist for {}", generator);
        }
        if !json {
            harness = harness.verbose();
        }

        let record = harness.run()?;
        if !json {
            println!("== {} ==", generator);
            record.print_report()?;
        }
        records.push((generator, record));
    }

    if json {
        write_json(&records)?;
    }
    Ok(())
}

fn write_json(records: &[(Generator, Record)]) -> Result<()> {
    let mut out = io::stdout().lock();
    for (generator, record) in records {
        info!("writing {} summaries", generator);
        record.write_json(&mut out)?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_tables() {
        let cli = Cli::try_parse_from(["mastermind_runner"]).unwrap();
        assert_eq!(cli.rounds, 200);
        assert!(!cli.json);
    }

    #[test]
    fn reads_rounds_and_json() {
        let cli = Cli::try_parse_from(["mastermind_runner", "50", "--json"]).unwrap();
        assert_eq!(cli.rounds, 50);
        assert!(cli.json);
    }

    #[test]
    fn rejects_bad_rounds() {
        assert!(Cli::try_parse_from(["mastermind_runner", "lots"]).is_err());
        assert!(Cli::try_parse_from(["mastermind_runner", "--rounds", "5"]).is_err());
    }
}
