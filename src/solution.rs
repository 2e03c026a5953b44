//! The `Solution` summary returned by the drivers.

use crate::primitives::{Length, PointId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub ordered_points: Vec<PointId>,
    pub length: Length,
    /// Number of accepted hill-climb moves.
    pub iterations: usize,
    /// Sum of every accepted move's `improvement`.
    pub total_improvement: Length,
}

impl From<Solution> for (Vec<PointId>, Length) {
    fn from(solution: Solution) -> Self {
        (solution.ordered_points, solution.length)
    }
}
