mod run;

pub use run::*;

use crate::core::{Outcome, Weighted};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::io::BufRead;

/// Reads a JSON value from the reader.
///
/// # Errors
/// - If the reader does not hold valid JSON for `T`.
pub fn deserialize<T: DeserializeOwned>(reader: &mut impl BufRead) -> anyhow::Result<T> {
    Ok(serde_json::from_reader(reader)?)
}

/// Serializes a value to a JSON string.
///
/// # Errors
/// - If the value cannot be represented as JSON.
pub fn to_string<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Reads a problem instance together with the optional `expected_weight`
/// fixture field from one JSON reader.
///
/// # Errors
/// - If the reader does not hold valid JSON for `T`.
/// - If the instance fails construction-time validation.
pub fn read_instance<T: DeserializeOwned>(
    reader: &mut (impl BufRead + ?Sized),
) -> anyhow::Result<(T, Option<f64>)> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    let expected = value
        .get("expected_weight")
        .and_then(serde_json::Value::as_f64);
    Ok((serde_json::from_value(value)?, expected))
}

/// Result of solving one instance, ready for printing and checking.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub problem: String,
    pub solved: bool,
    pub total_weight: f64,
    pub expected: Option<f64>,
    pub candidates: serde_json::Value,
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.candidates)?;
        write!(f, "total weight {}", self.total_weight)?;
        if !self.solved {
            write!(f, " (no solution)")?;
        }
        Ok(())
    }
}

/// Builds a [`RunSummary`] from a driver outcome.
///
/// # Errors
/// - If the candidates cannot be represented as JSON.
pub fn summarize<T: Serialize + Weighted>(
    problem: &str,
    outcome: &Outcome<T>,
    expected: Option<f64>,
) -> anyhow::Result<RunSummary> {
    Ok(RunSummary {
        problem: problem.into(),
        solved: outcome.solved(),
        total_weight: outcome.total_weight(),
        expected,
        candidates: serde_json::to_value(outcome.candidates())?,
    })
}
