use crate::primitives::Depth;

/// Options threaded explicitly through `optimize`/
/// `optimize_with_perturbation`, rather than held as process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Fixed tree depth `D` used for Morton key construction and the
    /// quadtree itself. Typically 16-21; deeper trees resolve finer
    /// spatial locality at the cost of more nodes.
    pub max_tree_depth: Depth,
    /// Run [`crate::tour::Tour::verify_cycle`] after every accepted move.
    pub verify: bool,
    /// Log every hill-climb iteration at `info` level instead of `debug`.
    pub print_iterations: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_tree_depth: 18,
            verify: false,
            print_iterations: false,
        }
    }
}

/// Selects which of the two perturbation-search variants seeds the
/// perturbed hill-climb restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerturbationPolicy {
    /// Candidate contributes when the best new edge beats the worst
    /// removed edge (`min` on both sides of the comparison).
    Strict,
    /// Candidate contributes when the worst new edge beats the best
    /// removed edge (`max` on both sides) — accepts moves that lose
    /// length on the tightest edge as long as the worst removed edge is
    /// longer than the best new edge.
    Lax,
}
