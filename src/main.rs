use clap::{Parser, ValueEnum};
use greedy_solvers::algo::{self, FractionalKnapsack, Graph, ProblemRunner};
use greedy_solvers::core::{Edge, Item};
use greedy_solvers::{data, run_reader};
use rand::prelude::*;
use std::io::Write;
use std::num::NonZero;

#[derive(Copy, Clone, Debug)]
struct Problem(usize, &'static str);

impl From<Problem> for &'static ProblemRunner {
    fn from(value: Problem) -> &'static ProblemRunner {
        &algo::PROBLEMS[value.0]
    }
}

impl ValueEnum for Problem {
    fn value_variants<'a>() -> &'a [Self] {
        static PROBLEMS: std::sync::LazyLock<Vec<Problem>> = std::sync::LazyLock::new(|| {
            let iter = algo::PROBLEMS.iter().enumerate();
            iter.map(|(i, runner)| Problem(i, runner.name)).collect()
        });

        PROBLEMS.as_slice()
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.1))
    }
}

/// Application solving greedy template problems.
#[derive(Debug, Parser)]
enum Application {
    /// Solve an instance read from stdin with one of the registered problems.
    Run { problem: Problem },
    /// Run every instance file in a directory and print a report.
    Bench {
        /// The input directory.
        input: String,
        /// Verify computed totals against the expected_weight fields.
        #[clap(short, long, default_value = "false")]
        check: bool,
    },
    /// Generate random fractional knapsack instances.
    GenKnapsack {
        /// The number of items.
        items: NonZero<usize>,
        /// The maximum item weight.
        #[clap(short = 'w', long, default_value = "10.0")]
        max_weight: f64,
        /// The maximum item value.
        #[clap(short = 'v', long, default_value = "100.0")]
        max_value: f64,
        /// Capacity as a fraction of the total item weight.
        #[clap(short, long, default_value = "0.5")]
        capacity_ratio: f64,
        /// Number of instances to generate.
        #[clap(short, long, default_value = "1")]
        amount: NonZero<u64>,
        /// Path to output the generated instances. If the directory does not exist, it will be created.
        #[clap(short, long, default_value = "output")]
        output: String,
    },
    /// Generate random connected graph instances.
    GenMst {
        /// The number of vertices.
        vertices: NonZero<usize>,
        /// Extra edges beyond the spanning tree, as a fraction of the remaining vertex pairs.
        #[clap(short, long, default_value = "0.3")]
        extra_ratio: f64,
        /// The maximum edge weight.
        #[clap(short = 'w', long, default_value = "10.0")]
        max_weight: f64,
        /// Number of instances to generate.
        #[clap(short, long, default_value = "1")]
        amount: NonZero<u64>,
        /// Path to output the generated instances. If the directory does not exist, it will be created.
        #[clap(short, long, default_value = "output")]
        output: String,
    },
}

fn gen_items(count: usize, max_weight: f64, max_value: f64) -> Vec<Item> {
    let mut rng = thread_rng();
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        let weight = rng.gen_range(max_weight / 100.0..=max_weight);
        let value = rng.gen_range(0.0..=max_value);
        items.push(Item::new(weight, value));
    }
    items
}

/// Grows a random spanning tree first, so every generated graph is
/// connected, then sprinkles extra edges between so-far unconnected pairs.
fn gen_edges(vertices: usize, extra_ratio: f64, max_weight: f64) -> Vec<Edge> {
    let mut rng = thread_rng();
    let mut seen = ahash::HashSet::default();
    let mut edges = Vec::new();

    for vertex in 1..vertices {
        let other = rng.gen_range(0..vertex);
        seen.insert((other, vertex));
        edges.push(Edge::new(other, vertex, rng.gen_range(1.0..=max_weight)));
    }

    let pairs = vertices * (vertices - 1) / 2;
    let extra = ((pairs - (vertices - 1)) as f64 * extra_ratio).ceil() as usize;
    let mut added = 0;
    let mut attempts = 0;
    while added < extra && attempts < pairs * 4 {
        attempts += 1;
        let first = rng.gen_range(0..vertices);
        let second = rng.gen_range(0..vertices);
        if first == second {
            continue;
        }
        let key = (first.min(second), first.max(second));
        if seen.insert(key) {
            edges.push(Edge::new(key.0, key.1, rng.gen_range(1.0..=max_weight)));
            added += 1;
        }
    }

    edges
}

fn write_instances<T: serde::Serialize>(
    output: &str,
    prefix: &str,
    instances: impl Iterator<Item = anyhow::Result<T>>,
) -> anyhow::Result<()> {
    let output = std::path::Path::new(output);
    if !output.try_exists()? {
        std::fs::create_dir_all(output)?;
    }

    for (i, instance) in instances.enumerate() {
        let filename = format!("{prefix}_{i}.json");
        std::fs::File::create(output.join(filename))?
            .write_all(data::to_string(&instance?)?.as_bytes())?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    match Application::parse() {
        Application::Run { problem } => {
            let runner: &ProblemRunner = problem.into();
            run_reader(runner, &mut std::io::stdin().lock())
        }
        Application::Bench { input, check } => {
            println!("{}", data::run(&input, check)?);
            Ok(())
        }
        Application::GenKnapsack {
            items,
            max_weight,
            max_value,
            capacity_ratio,
            amount,
            output,
        } => write_instances(
            &output,
            "knapsack",
            (0..amount.get()).map(|_| {
                let items = gen_items(items.get(), max_weight, max_value);
                let capacity = items.iter().map(|item| item.weight).sum::<f64>() * capacity_ratio;
                Ok(FractionalKnapsack::new(capacity, items)?)
            }),
        ),
        Application::GenMst {
            vertices,
            extra_ratio,
            max_weight,
            amount,
            output,
        } => write_instances(
            &output,
            "mst",
            (0..amount.get()).map(|_| {
                let edges = gen_edges(vertices.get(), extra_ratio, max_weight);
                Ok(Graph::new(vertices.get(), edges)?)
            }),
        ),
    }
}
