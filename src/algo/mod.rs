mod knapsack;
mod mst;

pub use knapsack::{FractionalKnapsack, SplitPolicy};
pub use mst::Graph;

use crate::data::RunSummary;
use std::io::BufRead;

/// A named entry point that parses one kind of problem instance from a
/// reader and solves it.
pub struct ProblemRunner {
    pub name: &'static str,
    pub run: fn(&mut dyn BufRead) -> anyhow::Result<RunSummary>,
}

/// Every registered problem runner.
#[allow(unsafe_code)]
#[linkme::distributed_slice]
pub static PROBLEMS: [ProblemRunner];

/// Returns the registered runner with the given name.
#[must_use]
pub fn find(name: &str) -> Option<&'static ProblemRunner> {
    PROBLEMS.iter().find(|problem| problem.name == name)
}
