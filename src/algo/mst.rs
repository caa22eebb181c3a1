use crate::core::{Edge, Greedy, InstanceError};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::io::BufRead;

/// Result of walking the graph induced by a set of candidate edges.
struct Traversal {
    visited: Vec<bool>,
    cyclic: bool,
}

/// Walks the candidate edges from `start` with an explicit stack. A back-edge
/// to any visited vertex other than the immediate predecessor is a cycle.
/// `blocked` is pre-marked visited and treated as the start's predecessor.
fn traverse(vertices: usize, edges: &[Edge], start: usize, blocked: Option<usize>) -> Traversal {
    let mut visited = vec![false; vertices];
    if let Some(vertex) = blocked {
        visited[vertex] = true;
    }
    visited[start] = true;

    let mut stack = vec![(start, blocked)];
    while let Some((vertex, parent)) = stack.pop() {
        for edge in edges {
            let next = if edge.node1 == vertex {
                edge.node2
            } else if edge.node2 == vertex {
                edge.node1
            } else {
                continue;
            };

            if visited[next] {
                if Some(next) != parent {
                    return Traversal {
                        visited,
                        cyclic: true,
                    };
                }
            } else {
                visited[next] = true;
                stack.push((next, Some(vertex)));
            }
        }
    }

    Traversal {
        visited,
        cyclic: false,
    }
}

/// An undirected connected graph in edge-list form, solved for its minimum
/// spanning tree Kruskal-style: cheapest edges first, skipping any edge that
/// would close a cycle, until n-1 edges are committed.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(try_from = "GraphInput", into = "GraphInput")]
pub struct Graph {
    vertices: usize,
    edges: Vec<Edge>,
    ranked: OnceCell<Vec<Edge>>,
}

impl Graph {
    /// Creates a new graph over the vertices `0..vertices`.
    ///
    /// Connectivity is assumed, not checked; a disconnected graph never
    /// reaches a solution and the driver stops on stream exhaustion.
    ///
    /// # Errors
    /// - If the graph has no vertices.
    /// - If any edge endpoint is out of range.
    /// - If any edge weight is not finite.
    pub fn new(vertices: usize, edges: Vec<Edge>) -> Result<Self, InstanceError> {
        if vertices == 0 {
            return Err(InstanceError::NoVertices);
        }

        for (index, edge) in edges.iter().enumerate() {
            for vertex in [edge.node1, edge.node2] {
                if vertex >= vertices {
                    return Err(InstanceError::VertexRange {
                        index,
                        vertex,
                        vertices,
                    });
                }
            }
            if !edge.weight.is_finite() {
                return Err(InstanceError::EdgeWeight {
                    index,
                    weight: edge.weight,
                });
            }
        }

        let ranked = OnceCell::new();
        Ok(Self {
            vertices,
            edges,
            ranked,
        })
    }

    /// Returns the number of vertices.
    #[must_use]
    pub const fn vertices(&self) -> usize {
        self.vertices
    }

    /// Returns the edges in construction order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

impl Greedy for Graph {
    type Candidate = Edge;

    fn selection(&self) -> &[Edge] {
        self.ranked.get_or_init(|| {
            let mut ranked = self.edges.clone();
            ranked.sort_unstable_by(|first, second| {
                first
                    .weight
                    .total_cmp(&second.weight)
                    .then_with(|| first.node1.cmp(&second.node1))
                    .then_with(|| first.node2.cmp(&second.node2))
            });
            ranked
        })
    }

    fn feasibility(&self, candidates: &[Edge], element: &Edge) -> bool {
        // A spanning tree holds exactly n-1 edges; a complete one takes no more.
        if candidates.len() >= self.vertices - 1 {
            return false;
        }

        if element.node1 == element.node2 {
            return false;
        }

        !traverse(self.vertices, candidates, element.node2, Some(element.node1)).cyclic
    }

    fn assign(&self, candidates: &mut Vec<Edge>, element: Edge) {
        if !candidates.iter().any(|edge| edge.same_endpoints(&element)) {
            candidates.push(element);
        }
    }

    fn solution(&self, candidates: &[Edge]) -> bool {
        if candidates.len() != self.vertices - 1 {
            return false;
        }

        let walk = traverse(self.vertices, candidates, 0, None);
        !walk.cyclic && walk.visited.iter().all(|&reached| reached)
    }

    fn name(&self) -> &str {
        "mst"
    }
}

/// Serde proxy: the on-disk shape of a graph instance.
#[derive(Clone, Debug, Deserialize, Serialize)]
struct GraphInput {
    vertices: usize,
    edges: Vec<Edge>,
}

impl TryFrom<GraphInput> for Graph {
    type Error = InstanceError;

    fn try_from(input: GraphInput) -> Result<Self, Self::Error> {
        Self::new(input.vertices, input.edges)
    }
}

impl From<Graph> for GraphInput {
    fn from(problem: Graph) -> Self {
        Self {
            vertices: problem.vertices,
            edges: problem.edges,
        }
    }
}

fn run(reader: &mut dyn BufRead) -> anyhow::Result<crate::data::RunSummary> {
    let (problem, expected): (Graph, _) = crate::data::read_instance(reader)?;
    let outcome = crate::core::solve(&problem);
    crate::data::summarize(problem.name(), &outcome, expected)
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::PROBLEMS)]
static INSTANCE: super::ProblemRunner = super::ProblemRunner { name: "mst", run };

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::{approx_eq, solve, total_weight};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn edges(raw: &[(usize, usize, f64)]) -> Vec<Edge> {
        raw.iter().map(|&(a, b, w)| Edge::new(a, b, w)).collect()
    }

    #[test]
    fn picks_the_two_cheap_edges_of_a_triangle() -> anyhow::Result<()> {
        let problem = Graph::new(3, edges(&[(0, 1, 1.0), (1, 2, 2.0), (0, 2, 3.0)]))?;
        let outcome = solve(&problem);

        assert!(outcome.solved());
        assert_eq!(
            outcome.candidates(),
            [Edge::new(0, 1, 1.0), Edge::new(1, 2, 2.0)]
        );
        assert!(approx_eq(outcome.total_weight(), 3.0));

        Ok(())
    }

    #[test]
    fn spans_all_vertices_without_cycles() -> anyhow::Result<()> {
        let problem = Graph::new(
            5,
            edges(&[
                (0, 1, 4.0),
                (1, 2, 1.0),
                (2, 3, 3.0),
                (3, 4, 2.0),
                (0, 4, 5.0),
                (1, 3, 2.5),
            ]),
        )?;
        let outcome = solve(&problem);

        assert!(outcome.solved());
        assert_eq!(outcome.candidates().len(), 4);

        let walk = traverse(5, outcome.candidates(), 0, None);
        assert!(!walk.cyclic);
        assert!(walk.visited.iter().all(|&reached| reached));

        Ok(())
    }

    #[test]
    fn selection_breaks_weight_ties_by_endpoints() -> anyhow::Result<()> {
        let problem = Graph::new(4, edges(&[(2, 3, 1.0), (0, 2, 1.0), (0, 1, 1.0)]))?;

        assert_eq!(
            problem.selection(),
            [
                Edge::new(0, 1, 1.0),
                Edge::new(0, 2, 1.0),
                Edge::new(2, 3, 1.0)
            ]
        );

        Ok(())
    }

    #[test]
    fn rejects_the_edge_that_closes_a_cycle() -> anyhow::Result<()> {
        let problem = Graph::new(3, edges(&[(0, 1, 1.0), (1, 2, 2.0), (0, 2, 3.0)]))?;
        let committed = [Edge::new(0, 1, 1.0), Edge::new(1, 2, 2.0)];

        assert!(!problem.feasibility(&committed, &Edge::new(0, 2, 3.0)));

        Ok(())
    }

    #[test]
    fn rejects_self_loops() -> anyhow::Result<()> {
        let problem = Graph::new(2, edges(&[(0, 0, 1.0), (0, 1, 2.0)]))?;
        let outcome = solve(&problem);

        assert!(outcome.solved());
        assert_eq!(outcome.candidates(), [Edge::new(0, 1, 2.0)]);

        Ok(())
    }

    #[test]
    fn assign_skips_duplicates_in_either_endpoint_order() -> anyhow::Result<()> {
        let problem = Graph::new(3, edges(&[(0, 1, 1.0)]))?;
        let mut candidates = vec![Edge::new(0, 1, 1.0)];

        problem.assign(&mut candidates, Edge::new(0, 1, 1.0));
        problem.assign(&mut candidates, Edge::new(1, 0, 1.0));

        assert_eq!(candidates, [Edge::new(0, 1, 1.0)]);

        Ok(())
    }

    #[test]
    fn single_vertex_graph_is_solved_immediately() -> anyhow::Result<()> {
        let problem = Graph::new(1, Vec::new())?;
        let outcome = solve(&problem);

        assert!(outcome.solved());
        assert!(outcome.candidates().is_empty());

        Ok(())
    }

    #[test]
    fn disconnected_graph_never_reaches_a_solution() -> anyhow::Result<()> {
        let problem = Graph::new(4, edges(&[(0, 1, 1.0), (2, 3, 1.0)]))?;
        let outcome = solve(&problem);

        assert!(!outcome.solved());
        assert_eq!(outcome.candidates().len(), 2);

        Ok(())
    }

    #[test]
    fn solution_rejects_wrong_counts_and_cycles() -> anyhow::Result<()> {
        let problem = Graph::new(
            4,
            edges(&[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0), (2, 3, 1.0)]),
        )?;

        // Too few edges.
        assert!(!problem.solution(&edges(&[(0, 1, 1.0)])));
        // Right count, but cyclic and missing vertex 3.
        assert!(!problem.solution(&edges(&[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)])));
        // A proper spanning tree.
        assert!(problem.solution(&edges(&[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)])));

        Ok(())
    }

    #[test]
    fn construction_rejects_invalid_instances() {
        assert!(matches!(
            Graph::new(0, Vec::new()),
            Err(InstanceError::NoVertices)
        ));
        assert!(matches!(
            Graph::new(2, edges(&[(0, 2, 1.0)])),
            Err(InstanceError::VertexRange {
                index: 0,
                vertex: 2,
                vertices: 2
            })
        ));
        assert!(matches!(
            Graph::new(2, edges(&[(0, 1, f64::INFINITY)])),
            Err(InstanceError::EdgeWeight { index: 0, .. })
        ));
    }

    #[test]
    fn instance_should_serialize() -> anyhow::Result<()> {
        let problem = Graph::new(3, edges(&[(0, 1, 1.0), (1, 2, 2.0)]))?;

        let serialized = crate::data::to_string(&problem)?;
        let mut reader = std::io::Cursor::new(serialized);
        let deserialized: Graph = crate::data::deserialize(&mut reader)?;

        assert_eq!(deserialized.vertices(), problem.vertices());
        assert_eq!(deserialized.edges(), problem.edges());

        Ok(())
    }

    /// Smallest spanning tree total over every n-1 edge subset.
    fn brute_force_minimum(problem: &Graph) -> Option<f64> {
        let count = problem.edges().len();
        let mut best: Option<f64> = None;

        for mask in 0u32..1 << count {
            let subset: Vec<Edge> = problem
                .edges()
                .iter()
                .enumerate()
                .filter(|(index, _)| mask & (1 << index) != 0)
                .map(|(_, &edge)| edge)
                .collect();

            if problem.solution(&subset) {
                let total = total_weight(&subset);
                best = Some(best.map_or(total, |current| current.min(total)));
            }
        }

        best
    }

    fn random_connected_graph(rng: &mut StdRng, vertices: usize, extra: usize) -> Vec<Edge> {
        let mut all = Vec::new();
        for vertex in 1..vertices {
            let other = rng.gen_range(0..vertex);
            all.push(Edge::new(other, vertex, f64::from(rng.gen_range(1..=5))));
        }
        for _ in 0..extra {
            let first = rng.gen_range(0..vertices);
            let second = rng.gen_range(0..vertices);
            if first != second {
                all.push(Edge::new(first, second, f64::from(rng.gen_range(1..=5))));
            }
        }
        all
    }

    #[test]
    fn matches_brute_force_on_small_random_graphs() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(42);

        for round in 0..20_usize {
            let vertices = 3 + round % 4;
            let all = random_connected_graph(&mut rng, vertices, vertices);
            let problem = Graph::new(vertices, all)?;

            let outcome = solve(&problem);
            assert!(outcome.solved());

            let best = brute_force_minimum(&problem);
            assert!(best.is_some_and(|best| approx_eq(outcome.total_weight(), best)));
        }

        Ok(())
    }
}
