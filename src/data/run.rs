use crate::algo;
use crate::core::approx_eq;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};
use std::fs::File;
use std::io::BufReader;

/// Report of running a directory of instance files.
#[derive(Debug, Deserialize, Serialize)]
pub struct Report {
    directory: String,
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Create a new report.
    fn new(directory: String) -> Self {
        let entries = Vec::new();
        Self { directory, entries }
    }

    /// Get the directory name.
    #[must_use]
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Get the entries.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Instances: {}", self.directory)?;
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        writeln!(f, "-------------------")
    }
}

/// Report of running a single instance file.
#[non_exhaustive]
#[derive(Debug, Deserialize, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub total_weight: f64,
    pub solved: bool,
    pub time: f64,
}

impl Display for ReportEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{}: total weight {} in {:.2} sec{}",
            self.name,
            self.total_weight,
            self.time,
            if self.solved { "" } else { " (no solution)" }
        )
    }
}

/// Run all instances in the `samples` directory.
/// Print the report to stdout.
///
/// # Arguments
/// - `check` is true, verify expected totals and that every instance solves.
///
/// # Errors
/// - If a file cannot be read.
/// - If no instances are found.
///
/// # Panics
/// - If `check` is true and an instance misses its expected total or does
///   not solve.
pub fn samples(check: bool) -> anyhow::Result<()> {
    run("samples", check).and_then(|report| {
        if report.entries.is_empty() {
            Err(anyhow!("No samples found"))
        } else {
            println!("{report}");
            Ok(())
        }
    })
}

/// Run all instances in the `dir` directory. Files are named
/// `<problem>_<name>.json` and dispatched to the registered runner.
///
/// # Arguments
/// - `check` is true, verify expected totals and that every instance solves.
///
/// # Errors
/// - If a file cannot be read or names an unknown problem.
///
/// # Panics
/// - If `check` is true and an instance misses its expected total or does
///   not solve.
pub fn run(dir: &str, check: bool) -> anyhow::Result<Report> {
    let mut report = Report::new(dir.into());

    for file in std::fs::read_dir(dir)? {
        let file = file?;
        let (name, problem) = parse_filename(&file.file_name())?;
        let runner =
            algo::find(&problem).ok_or_else(|| anyhow!("Unknown problem kind {problem}"))?;

        let mut reader = BufReader::new(File::open(file.path())?);
        let time = std::time::Instant::now();
        let summary = (runner.run)(&mut reader)?;
        let time = time.elapsed().as_secs_f64();

        if check {
            assert!(summary.solved, "No solution found for {name}");
            if let Some(expected) = summary.expected {
                assert!(
                    approx_eq(summary.total_weight, expected),
                    "Wrong total for {name}: {} instead of {expected}",
                    summary.total_weight
                );
            }
        }

        report.entries.push(ReportEntry {
            name,
            total_weight: summary.total_weight,
            solved: summary.solved,
            time,
        });
    }

    Ok(report)
}

fn parse_filename(filename: &std::ffi::OsString) -> anyhow::Result<(String, String)> {
    static NAME_ERR: &str = "Cannot read filename";

    let name = filename.to_str().ok_or_else(|| anyhow!(NAME_ERR))?;
    let stem = name.strip_suffix(".json").ok_or_else(|| anyhow!(NAME_ERR))?;
    let problem = stem.split('_').next().ok_or_else(|| anyhow!(NAME_ERR))?;

    if problem.is_empty() {
        return Err(anyhow!(NAME_ERR));
    }

    Ok((name.into(), problem.into()))
}
