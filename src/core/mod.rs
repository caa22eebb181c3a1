mod problem;
mod solution;
mod util;

pub use problem::*;
pub use solution::*;
pub use util::*;

/// Contract every greedy problem realization provides. The driver never
/// inspects elements itself; the four operations carry all problem knowledge.
pub trait Greedy {
    /// The element type the problem selects and commits.
    type Candidate: Clone;

    /// Returns every candidate element in the algorithm's priority order.
    /// The order is materialized once and cached, so repeated calls return
    /// the same slice and never disturb the backing storage.
    fn selection(&self) -> &[Self::Candidate];

    /// Returns whether `element` could legally extend the candidate list
    /// toward a valid solution. Query-only, never mutates.
    fn feasibility(&self, candidates: &[Self::Candidate], element: &Self::Candidate) -> bool;

    /// Commits `element`, or a transformed version of it, into the candidate
    /// list. May insert zero, one, or a modified element; the candidate list
    /// is the only state it touches.
    fn assign(&self, candidates: &mut Vec<Self::Candidate>, element: Self::Candidate);

    /// Returns whether the candidate list is a complete, valid, and optimal
    /// solution. Safe to call at any point, including on an empty list.
    fn solution(&self, candidates: &[Self::Candidate]) -> bool;

    /// Returns the name of the problem.
    fn name(&self) -> &str;
}

/// Runs the greedy loop over a problem: stream the ranked candidates, gate
/// each through `feasibility`, commit with `assign`, and stop as soon as
/// `solution` holds or the stream is exhausted.
///
/// Running the driver twice on the same instance yields identical outcomes.
#[must_use]
pub fn solve<P: Greedy>(problem: &P) -> Outcome<P::Candidate> {
    let mut candidates = Vec::new();
    let mut solved = problem.solution(&candidates);

    if !solved {
        for element in problem.selection() {
            if problem.feasibility(&candidates, element) {
                problem.assign(&mut candidates, element.clone());
            }

            if problem.solution(&candidates) {
                solved = true;
                break;
            }
        }
    }

    Outcome::new(candidates, solved)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::OnceCell;

    /// Toy realization: pick the smallest numbers until the running total
    /// would pass the limit.
    struct SmallestSum {
        limit: u32,
        pool: Vec<u32>,
        ranked: OnceCell<Vec<u32>>,
    }

    impl SmallestSum {
        fn new(limit: u32, pool: Vec<u32>) -> Self {
            let ranked = OnceCell::new();
            Self {
                limit,
                pool,
                ranked,
            }
        }
    }

    impl Greedy for SmallestSum {
        type Candidate = u32;

        fn selection(&self) -> &[u32] {
            self.ranked.get_or_init(|| {
                let mut ranked = self.pool.clone();
                ranked.sort_unstable();
                ranked
            })
        }

        fn feasibility(&self, candidates: &[u32], element: &u32) -> bool {
            candidates.iter().sum::<u32>() + element <= self.limit
        }

        fn assign(&self, candidates: &mut Vec<u32>, element: u32) {
            candidates.push(element);
        }

        fn solution(&self, candidates: &[u32]) -> bool {
            candidates.iter().sum::<u32>() == self.limit
        }

        fn name(&self) -> &str {
            "smallest-sum"
        }
    }

    #[test]
    fn solve_streams_ranked_candidates_until_solution() {
        let problem = SmallestSum::new(6, vec![5, 1, 2, 3, 9]);
        let outcome = solve(&problem);

        assert!(outcome.solved());
        assert_eq!(outcome.candidates(), [1, 2, 3]);
    }

    #[test]
    fn solve_skips_infeasible_elements() {
        let problem = SmallestSum::new(4, vec![3, 3, 1]);
        let outcome = solve(&problem);

        assert!(outcome.solved());
        assert_eq!(outcome.candidates(), [1, 3]);
    }

    #[test]
    fn solve_reports_unsolved_when_stream_runs_dry() {
        let problem = SmallestSum::new(100, vec![1, 2]);
        let outcome = solve(&problem);

        assert!(!outcome.solved());
        assert_eq!(outcome.candidates(), [1, 2]);
    }

    #[test]
    fn solve_recognizes_trivially_complete_problems() {
        let problem = SmallestSum::new(0, Vec::new());
        let outcome = solve(&problem);

        assert!(outcome.solved());
        assert!(outcome.candidates().is_empty());
    }

    #[test]
    fn selection_is_idempotent() {
        let problem = SmallestSum::new(6, vec![5, 1, 2]);

        assert_eq!(problem.selection(), [1, 2, 5]);
        assert_eq!(problem.selection(), [1, 2, 5]);
    }

    #[test]
    fn solve_twice_yields_identical_outcomes() {
        let problem = SmallestSum::new(6, vec![5, 1, 2, 3]);

        assert_eq!(solve(&problem), solve(&problem));
    }
}
