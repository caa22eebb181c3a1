use serde::{Deserialize, Serialize};

/// An element of the knapsack problem. Carries its weight and total value.
/// A fractional take is represented by a new item with the reduced weight,
/// never by mutating the original.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Item {
    pub weight: f64,
    pub value: f64,
}

impl Item {
    /// Creates a new item.
    #[must_use]
    pub const fn new(weight: f64, value: f64) -> Self {
        Self { weight, value }
    }

    /// Returns the value carried per unit of weight, the greedy ranking key.
    #[must_use]
    pub fn density(&self) -> f64 {
        self.value / self.weight
    }
}

/// An undirected weighted edge between two vertices of a graph.
/// `(node1, node2)` and `(node2, node1)` denote the same edge.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Edge {
    pub node1: usize,
    pub node2: usize,
    pub weight: f64,
}

impl Edge {
    /// Creates a new edge.
    #[must_use]
    pub const fn new(node1: usize, node2: usize, weight: f64) -> Self {
        Self {
            node1,
            node2,
            weight,
        }
    }

    /// Returns whether both edges connect the same pair of vertices,
    /// regardless of endpoint order.
    #[must_use]
    pub const fn same_endpoints(&self, other: &Self) -> bool {
        (self.node1 == other.node1 && self.node2 == other.node2)
            || (self.node1 == other.node2 && self.node2 == other.node1)
    }
}

/// Error returned when a problem instance is constructed from invalid data.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InstanceError {
    #[error("item {index} has non-positive or non-finite weight {weight}")]
    ItemWeight { index: usize, weight: f64 },
    #[error("item {index} has negative or non-finite value {value}")]
    ItemValue { index: usize, value: f64 },
    #[error("capacity must be finite and non-negative, got {capacity}")]
    Capacity { capacity: f64 },
    #[error("graph must have at least one vertex")]
    NoVertices,
    #[error("edge {index} endpoint {vertex} is out of range for {vertices} vertices")]
    VertexRange {
        index: usize,
        vertex: usize,
        vertices: usize,
    },
    #[error("edge {index} has non-finite weight {weight}")]
    EdgeWeight { index: usize, weight: f64 },
}
