//! Evaluating and comparing guessers.

use std::{fmt::Display, io::Write, ops::Deref};

#[cfg(feature = "fancy")]
use comfy_table::{Cell, Color, ColumnConstraint, Row, Table, Width};
#[cfg(feature = "fancy")]
use owo_colors::{AnsiColors, OwoColorize, Stream};
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{guesser::Attempts, secret::Secret, Guesser, Result};

/// The number of rows a [`Histogram`] prints at most.
const HISTOGRAM_ROWS: usize = 10;

/// A record of one guesser's rounds after run by the
/// [test harness](crate::Harness).
///
/// This struct can provide statistics about the attempts on its own, but it
/// is recommended to produce [`Summary`] first to cache the computations.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Perf {
    pub(crate) tries: Vec<(Secret, Attempts)>,
    guesser_name: String,
    guess_limit: usize,
}

impl Perf {
    /// Creates a new empty performance record.
    pub(crate) fn new(guesser: &dyn Guesser, guess_limit: usize) -> Self {
        Perf {
            tries: Vec::new(),
            guesser_name: format!("{} v{}", guesser, guesser.version()),
            guess_limit,
        }
    }

    /// Gets the name of the guesser that produced this performance record.
    pub fn guesser_name(&self) -> &str {
        &self.guesser_name
    }

    /// Gets every secret the guesser played against, with its attempts.
    pub fn tries(&self) -> &[(Secret, Attempts)] {
        &self.tries
    }

    /// Gets the number of rounds played by the guesser.
    pub fn num_tried(&self) -> u32 {
        self.tries.len() as u32
    }

    /// Gets the number of rounds solved by the guesser.
    ///
    /// This function always returns a number less than or equal to
    /// [`num_tried()`](Self::num_tried()).
    pub fn num_solved(&self) -> u32 {
        self.tries
            .iter()
            .filter(|(_, attempts)| attempts.solved())
            .count() as u32
    }

    /// Gets the number of guesses across all rounds.
    pub fn cumulative_guesses(&self) -> u32 {
        self.tries.iter().map(|(_, a)| a.len() as u32).sum()
    }

    /// Gets the number of guesses across all solved rounds.
    pub fn cumulative_guesses_solved(&self) -> u32 {
        self.tries
            .iter()
            .filter(|(_, attempts)| attempts.solved())
            .map(|(_, a)| a.len() as u32)
            .sum()
    }

    /// Gets the most guesses any solved round took, or zero if nothing was
    /// solved.
    pub fn max_guesses_solved(&self) -> u32 {
        self.tries
            .iter()
            .filter(|(_, attempts)| attempts.solved())
            .map(|(_, a)| a.len() as u32)
            .max()
            .unwrap_or(0)
    }

    /// Prints the guesser's summary and then a table showing how many
    /// guesses each secret took.
    #[cfg(feature = "fancy")]
    pub fn print(&self) {
        print!("{}", self);
        let mut table = Table::new();
        if !table.is_tty() {
            table.set_table_width(80);
        } else {
            table.load_preset(comfy_table::presets::UTF8_FULL);
        }
        let widest = self.tries.iter().map(|(s, _)| s.len()).max().unwrap_or(0);
        let columns = (table.get_table_width().unwrap_or(80) as usize / (widest + 4)).max(1);
        for chunk in self.tries.chunks(columns) {
            let mut row = Row::new();
            for (secret, attempts) in chunk {
                let mut cell = Cell::new(format!("{}\n{}", secret, attempts.len()));
                if !attempts.solved() {
                    cell = cell.bg(Color::Red).fg(Color::Black);
                }
                row.add_cell(cell);
            }
            table.add_row(row);
        }
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(widest as u16));
            columns
        ]);
        println!("{}", table);
    }

    /// Converts this performance record to a pre-calculated summary.
    pub fn to_summary(&self) -> Summary {
        let width = bucket_width(self.guess_limit);
        let mut bins = vec![0; (self.guess_limit.max(1) + width - 1) / width];
        let last = bins.len() - 1;

        self.tries
            .iter()
            .filter(|(_, attempts)| attempts.solved())
            .map(|(_, attempts)| (attempts.len().max(1) - 1) / width)
            .for_each(|bin| bins[bin.min(last)] += 1);

        debug_assert_eq!(bins.iter().sum::<u32>(), self.num_solved());

        Summary {
            guesser_name: &self.guesser_name,
            num_tried: self.num_tried(),
            num_solved: self.num_solved(),
            cumulative_guesses: self.cumulative_guesses(),
            cumulative_guesses_solved: self.cumulative_guesses_solved(),
            max_guesses_solved: self.max_guesses_solved(),
            histogram: Histogram { bins, width },
        }
    }
}

impl Display for Perf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_summary())
    }
}

fn bucket_width(guess_limit: usize) -> usize {
    ((guess_limit + HISTOGRAM_ROWS - 1) / HISTOGRAM_ROWS).max(1)
}

/// A summary of a guesser's performance generated by the
/// [test harness](crate::Harness).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize),
    serde(crate = "serde_crate")
)]
pub struct Summary<'a> {
    guesser_name: &'a str,
    num_tried: u32,
    num_solved: u32,
    cumulative_guesses: u32,
    cumulative_guesses_solved: u32,
    max_guesses_solved: u32,
    histogram: Histogram,
}

impl<'a> Summary<'a> {
    /// Gets the name of the guesser that produced this performance record.
    pub fn guesser_name(&self) -> &'a str {
        self.guesser_name
    }

    /// Gets the number of rounds played by the guesser.
    pub fn num_tried(&self) -> u32 {
        self.num_tried
    }

    /// Gets the number of rounds solved by the guesser.
    pub fn num_solved(&self) -> u32 {
        self.num_solved
    }

    /// Gets the fraction of rounds solved by the guesser.
    pub fn frac_solved(&self) -> f32 {
        (self.num_solved as f32) / (self.num_tried as f32)
    }

    /// Gets the number of guesses across all rounds.
    pub fn cumulative_guesses(&self) -> u32 {
        self.cumulative_guesses
    }

    /// Gets the number of guesses across all solved rounds.
    pub fn cumulative_guesses_solved(&self) -> u32 {
        self.cumulative_guesses_solved
    }

    /// Gets the average number of guesses needed to solve a secret.
    ///
    /// This function does not include guesses made in rounds that the
    /// guesser was unable to solve.
    pub fn mean_guesses(&self) -> f32 {
        (self.cumulative_guesses_solved as f32) / (self.num_solved as f32)
    }

    /// Gets the most guesses any solved round took.
    pub fn max_guesses_solved(&self) -> u32 {
        self.max_guesses_solved
    }

    /// Gets the number of rounds the guesser could not solve.
    pub fn num_missed(&self) -> u32 {
        self.num_tried - self.num_solved
    }

    /// Gets the fraction of rounds the guesser could not solve.
    pub fn frac_missed(&self) -> f32 {
        (self.num_missed() as f32) / (self.num_tried as f32)
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    pub fn print(&self, options: SummaryPrintOptions) -> Result<()> {
        let mut stdout = std::io::stdout();

        writeln!(stdout, "{:-^80}", self.guesser_name)?;
        writeln!(stdout, "Ran {} secrets", self.num_tried())?;

        #[cfg(feature = "fancy")]
        {
            let percent = format!("{:.1}%", self.frac_solved() * 100.);
            let solved = self.num_solved;
            writeln!(
                stdout,
                "Guessed {} correctly, or {}, and {} incorrectly",
                solved,
                percent.if_supports_color(Stream::Stdout, |text| {
                    if self.num_missed() == 0 {
                        text.color(AnsiColors::Green)
                    } else if self.frac_solved() < 0.5 {
                        text.color(AnsiColors::Red)
                    } else {
                        text.color(AnsiColors::Yellow)
                    }
                }),
                self.num_missed()
            )?;
        }
        #[cfg(not(feature = "fancy"))]
        {
            writeln!(
                stdout,
                "Guessed {} correctly, or {:.1}%, and {} incorrectly",
                self.num_solved(),
                self.frac_solved() * 100.,
                self.num_missed()
            )?;
        }

        writeln!(
            stdout,
            "Correct guesses took {:.2} attempts on average, {} at worst",
            self.mean_guesses(),
            self.max_guesses_solved,
        )?;

        if options.histogram {
            write!(stdout, "{}", self.histogram)?;
        }

        Ok(())
    }

    pub fn print_options() -> SummaryPrintOptions {
        SummaryPrintOptions::default()
    }
}

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SummaryPrintOptions {
    histogram: bool,
}

impl SummaryPrintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn histogram(self, histogram: bool) -> Self {
        Self { histogram }
    }
}

impl<'a> Display for Summary<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:-^80}", self.guesser_name)?;
        writeln!(f, "Ran {} secrets", self.num_tried())?;

        writeln!(
            f,
            "Guessed {} correctly, or {:.1}%, and {} incorrectly",
            self.num_solved(),
            self.frac_solved() * 100.,
            self.num_missed()
        )?;

        writeln!(
            f,
            "Correct guesses took {:.2} attempts on average, {} at worst",
            self.mean_guesses(),
            self.max_guesses_solved,
        )?;

        Ok(())
    }
}

/// Solved rounds bucketed by how many guesses they took.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize),
    serde(crate = "serde_crate")
)]
pub struct Histogram {
    bins: Vec<u32>,
    width: usize,
}

impl Histogram {
    /// Gets how many guesses each bin spans.
    pub fn width(&self) -> usize {
        self.width
    }
}

impl Deref for Histogram {
    type Target = [u32];

    fn deref(&self) -> &Self::Target {
        &self.bins
    }
}

impl Display for Histogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let max = self.iter().copied().max().unwrap_or(0);
        let labels: Vec<String> = (0..self.bins.len())
            .map(|i| match self.width {
                1 => format!("{}", i + 1),
                w => format!("{}-{}", i * w + 1, (i + 1) * w),
            })
            .collect();
        let label_width = labels.iter().map(String::len).max().unwrap_or(1);
        let digits =
            std::iter::successors(Some(max), |&n| (n >= 10).then(|| n / 10)).count() as u32;
        let count_per_mark =
            (max as f32 / (80. - digits as f32 - label_width as f32 - 5.)).max(1.0);

        for (label, &bin) in labels.iter().zip(self.bins.iter()) {
            write!(f, "{:>label_width$} |", label)?;
            let marks = (bin as f32 / count_per_mark).floor() as usize;
            writeln!(f, "{:■>marks$} ({})", "", bin)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        code::Board,
        guesser::{boring::Boring, Feedback},
    };

    fn perf_with(lengths: &[(usize, bool)], limit: usize) -> Result<Perf> {
        let board = Board::standard(2, 2)?;
        let mut perf = Perf::new(&Boring::with_seed(1), limit);
        for &(len, solved) in lengths {
            let mut attempts = Attempts::new();
            for i in 0..len {
                let exact = if solved && i + 1 == len { 2 } else { 0 };
                attempts.push(board.code("AA")?, Feedback::new(exact, 0, i + 1), &board);
            }
            perf.tries.push((Secret::new(board.code("BB")?), attempts));
        }
        Ok(perf)
    }

    #[test]
    fn summary_counts() -> Result<()> {
        let perf = perf_with(&[(1, true), (3, true), (100, false), (4, true)], 100)?;
        let summary = perf.to_summary();
        assert_eq!(summary.num_tried(), 4);
        assert_eq!(summary.num_solved(), 3);
        assert_eq!(summary.num_missed(), 1);
        assert_eq!(summary.cumulative_guesses(), 108);
        assert_eq!(summary.cumulative_guesses_solved(), 8);
        assert!((summary.mean_guesses() - 8. / 3.).abs() < 1e-6);
        assert_eq!(summary.max_guesses_solved(), 4);
        assert_eq!(summary.guesser_name(), "mastermind_rs::Boring v1.0.0");
        Ok(())
    }

    #[test]
    fn histogram_buckets() -> Result<()> {
        let perf = perf_with(&[(1, true), (10, true), (11, true), (95, true)], 100)?;
        let summary = perf.to_summary();
        let histogram = summary.histogram();
        assert_eq!(histogram.width(), 10);
        assert_eq!(histogram.len(), 10);
        assert_eq!(histogram[0], 2);
        assert_eq!(histogram[1], 1);
        assert_eq!(histogram[9], 1);

        let small = perf_with(&[(1, true), (6, true)], 6)?;
        let small = small.to_summary();
        assert_eq!(small.histogram().width(), 1);
        assert_eq!(&small.histogram()[..], &[1, 0, 0, 0, 0, 1]);
        Ok(())
    }

    #[test]
    fn histogram_lines_fit() -> Result<()> {
        let lengths: Vec<_> = (0..5000).map(|i| (i % 100 + 1, true)).collect();
        let perf = perf_with(&lengths, 100)?;
        let rendered = perf.to_summary().histogram().to_string();
        assert_eq!(rendered.lines().count(), 10);
        assert!(rendered.lines().all(|line| line.chars().count() <= 80));
        Ok(())
    }
}
