use crate::core::{approx_eq, total_weight, Greedy, InstanceError, Item, WEIGHT_EPS};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::io::BufRead;

/// Value carried by the fractional part of a split item.
///
/// [`SplitPolicy::FullValue`] keeps the whole original value on the
/// fractional remainder; [`SplitPolicy::Scaled`] is the classical
/// definition and scales it by the weight fraction taken. Fixtures assume
/// the default unless they say otherwise.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Keep the full original value on the fractional item.
    #[default]
    FullValue,
    /// Scale the value proportionally to the weight taken.
    Scaled,
}

/// The fractional knapsack problem: fill a sack of fixed capacity with the
/// densest items first, splitting the last item if it does not fit whole.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(try_from = "KnapsackInput", into = "KnapsackInput")]
pub struct FractionalKnapsack {
    capacity: f64,
    items: Vec<Item>,
    split: SplitPolicy,
    ranked: OnceCell<Vec<Item>>,
}

impl FractionalKnapsack {
    /// Creates a new instance with the default split policy.
    ///
    /// # Errors
    /// - If the capacity is negative or not finite.
    /// - If any item has a non-positive or non-finite weight.
    /// - If any item has a negative or non-finite value.
    pub fn new(capacity: f64, items: Vec<Item>) -> Result<Self, InstanceError> {
        Self::with_split(capacity, items, SplitPolicy::default())
    }

    /// Creates a new instance with an explicit split policy.
    ///
    /// # Errors
    /// - If the capacity or any item is invalid, see [`Self::new`].
    pub fn with_split(
        capacity: f64,
        items: Vec<Item>,
        split: SplitPolicy,
    ) -> Result<Self, InstanceError> {
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(InstanceError::Capacity { capacity });
        }

        for (index, item) in items.iter().enumerate() {
            if !item.weight.is_finite() || item.weight <= 0.0 {
                return Err(InstanceError::ItemWeight {
                    index,
                    weight: item.weight,
                });
            }
            if !item.value.is_finite() || item.value < 0.0 {
                return Err(InstanceError::ItemValue {
                    index,
                    value: item.value,
                });
            }
        }

        let ranked = OnceCell::new();
        Ok(Self {
            capacity,
            items,
            split,
            ranked,
        })
    }

    /// Returns the sack capacity.
    #[must_use]
    pub const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns the items in construction order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns the split policy.
    #[must_use]
    pub const fn split(&self) -> SplitPolicy {
        self.split
    }

    fn split_value(&self, element: &Item, taken: f64) -> f64 {
        match self.split {
            SplitPolicy::FullValue => element.value,
            SplitPolicy::Scaled => element.value * taken / element.weight,
        }
    }

    /// Checks the candidates against the ranked order: at every position the
    /// weight must not exceed the ranked item's and the value must match the
    /// policy-implied value for the weight taken.
    fn is_valid(&self, candidates: &[Item]) -> bool {
        candidates.iter().zip(self.selection()).all(|(taken, ranked)| {
            if taken.weight > ranked.weight + WEIGHT_EPS {
                return false;
            }

            let expected = if approx_eq(taken.weight, ranked.weight) {
                ranked.value
            } else {
                self.split_value(ranked, taken.weight)
            };
            approx_eq(taken.value, expected)
        })
    }
}

impl Greedy for FractionalKnapsack {
    type Candidate = Item;

    fn selection(&self) -> &[Item] {
        self.ranked.get_or_init(|| {
            let mut ranked = self.items.clone();
            // Stable sort: density ties keep construction order.
            ranked.sort_by(|first, second| second.density().total_cmp(&first.density()));
            ranked
        })
    }

    fn feasibility(&self, candidates: &[Item], _element: &Item) -> bool {
        self.capacity - total_weight(candidates) > WEIGHT_EPS
    }

    fn assign(&self, candidates: &mut Vec<Item>, element: Item) {
        let free = self.capacity - total_weight(candidates);
        if free <= WEIGHT_EPS {
            return;
        }

        if element.weight <= free + WEIGHT_EPS {
            candidates.push(element);
        } else {
            candidates.push(Item::new(free, self.split_value(&element, free)));
        }
    }

    fn solution(&self, candidates: &[Item]) -> bool {
        let total = total_weight(candidates);
        let complete = approx_eq(total, self.capacity)
            || (total < self.capacity && candidates.len() == self.items.len());

        complete && self.is_valid(candidates)
    }

    fn name(&self) -> &str {
        "knapsack"
    }
}

/// Serde proxy: the on-disk shape of a knapsack instance.
#[derive(Clone, Debug, Deserialize, Serialize)]
struct KnapsackInput {
    capacity: f64,
    items: Vec<Item>,
    #[serde(default)]
    split: SplitPolicy,
}

impl TryFrom<KnapsackInput> for FractionalKnapsack {
    type Error = InstanceError;

    fn try_from(input: KnapsackInput) -> Result<Self, Self::Error> {
        Self::with_split(input.capacity, input.items, input.split)
    }
}

impl From<FractionalKnapsack> for KnapsackInput {
    fn from(problem: FractionalKnapsack) -> Self {
        Self {
            capacity: problem.capacity,
            items: problem.items,
            split: problem.split,
        }
    }
}

fn run(reader: &mut dyn BufRead) -> anyhow::Result<crate::data::RunSummary> {
    let (problem, expected): (FractionalKnapsack, _) = crate::data::read_instance(reader)?;
    let outcome = crate::core::solve(&problem);
    crate::data::summarize(problem.name(), &outcome, expected)
}

#[allow(unsafe_code)]
#[linkme::distributed_slice(super::PROBLEMS)]
static INSTANCE: super::ProblemRunner = super::ProblemRunner {
    name: "knapsack",
    run,
};
