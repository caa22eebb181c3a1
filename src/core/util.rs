use super::{Edge, Item};

/// Tolerance used when comparing accumulated floating-point weights.
pub const WEIGHT_EPS: f64 = 1e-9;

/// Elements that occupy weight in a solution.
pub trait Weighted {
    /// Returns the weight of the element.
    fn weight(&self) -> f64;
}

impl Weighted for Item {
    fn weight(&self) -> f64 {
        self.weight
    }
}

impl Weighted for Edge {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// Returns whether two weights are equal up to [`WEIGHT_EPS`].
#[must_use]
pub fn approx_eq(first: f64, second: f64) -> bool {
    (first - second).abs() <= WEIGHT_EPS
}

/// Sums the weight of all elements in the slice.
#[must_use]
pub fn total_weight<T: Weighted>(elements: &[T]) -> f64 {
    elements.iter().map(Weighted::weight).sum()
}
