#![deny(clippy::all, clippy::cargo, clippy::expect_used, clippy::unwrap_used)]
#![deny(clippy::pedantic, clippy::nursery, unsafe_code)]
#![warn(clippy::unimplemented, clippy::redundant_type_annotations)]

use anyhow::Result;
use std::io::BufRead;

pub mod algo;
pub mod core;
pub mod data;

/// Runs the given problem on the instance read from reader and writes the
/// committed candidates to stdout. Also writes the total weight to stdout.
/// Returns an error if the instance could not be read or is invalid.
///
/// # Errors
/// - If the instance could not be read from the reader.
/// - If the instance fails construction-time validation.
pub fn run_reader(problem: &algo::ProblemRunner, reader: &mut impl BufRead) -> Result<()> {
    let summary = (problem.run)(reader)?;

    println!("{summary}");

    Ok(())
}
