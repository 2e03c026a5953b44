//! Library-level error type: only *input* rejection is representable
//! here. Invariant violations (a bug in the core itself) are not
//! recoverable and are raised with an unconditional `panic!` at the
//! point of detection instead — see the fatal-check sites in
//! [`crate::quadtree`] (`segment.rs`'s `add_segment`/`remove_segment`)
//! and [`crate::tour`] (`apply_move`'s adjacency slot bookkeeping).

use thiserror::Error;

use crate::primitives::PointId;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("need at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("point coordinate arrays have mismatched lengths: x has {x}, y has {y}")]
    MismatchedCoordinateArrays { x: usize, y: usize },

    #[error("initial cycle has {actual} points, expected {expected}")]
    MismatchedCycleLength { actual: usize, expected: usize },

    #[error("non-finite coordinate for point {point}: ({x}, {y})")]
    NonFiniteCoordinate { point: PointId, x: f64, y: f64 },

    #[error("normalized coordinate {value} for point {point} is outside [0, 1]")]
    CoordinateOutOfDomain { point: PointId, value: f64 },

    #[error("initial cycle does not visit every point exactly once")]
    InvalidCycle,
}
