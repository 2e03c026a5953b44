//! Quadtree-accelerated V-move local search for the planar TSP.

pub mod config;
pub mod distance;
pub mod domain;
pub mod error;
pub mod fileio;
pub mod hillclimb;
pub mod morton;
pub mod perturb;
pub mod primitives;
pub mod quadtree;
pub mod solution;
pub mod tour;
pub mod vmove;

pub use config::{OptimizerConfig, PerturbationPolicy};
pub use error::Error;
pub use primitives::{Length, PointId};
pub use quadtree::QuadTree;
pub use solution::Solution;
pub use tour::Tour;
pub use vmove::VMove;

use domain::Domain;
use morton::MortonKeyer;
use primitives::MortonKey;

/// Coordinate input: parallel `x`/`y` arrays, one entry per point,
/// indexed by [`PointId`].
#[derive(Debug, Clone)]
pub struct Points {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Validates `points`/`initial_cycle`, builds the quadtree, and
/// hill-climbs to a local optimum.
pub fn optimize(points: &Points, initial_cycle: &[PointId], config: OptimizerConfig) -> Result<Solution, Error> {
    let (keyer, keys, mut tree, calc) = prepare(points, config)?;
    validate_cycle(initial_cycle, points.x.len())?;

    let solution = hillclimb::hill_climb(initial_cycle, &keys, &keyer, &mut tree, &calc, None, &config);
    Ok(solution)
}

/// As [`optimize`], but follows up with perturbation restarts
/// (`perturbation_policy` selects which candidate search seeds them),
/// returning whichever result is shorter.
pub fn optimize_with_perturbation(
    points: &Points,
    initial_cycle: &[PointId],
    perturbation_policy: PerturbationPolicy,
    config: OptimizerConfig,
) -> Result<Solution, Error> {
    let (keyer, keys, mut tree, calc) = prepare(points, config)?;
    validate_cycle(initial_cycle, points.x.len())?;

    let solution = perturb::perturbed_hill_climb(
        initial_cycle,
        &keys,
        &keyer,
        &mut tree,
        &calc,
        perturbation_policy,
        &config,
    );
    Ok(solution)
}

fn prepare(
    points: &Points,
    config: OptimizerConfig,
) -> Result<(MortonKeyer, Vec<MortonKey>, QuadTree, distance::DistanceCalculator), Error> {
    if points.x.len() != points.y.len() {
        return Err(Error::MismatchedCoordinateArrays { x: points.x.len(), y: points.y.len() });
    }
    if points.x.len() < 3 {
        return Err(Error::TooFewPoints(points.x.len()));
    }

    let domain = Domain::from_points(&points.x, &points.y)?;
    let keyer = MortonKeyer::new(config.max_tree_depth);

    let n = points.x.len();
    let mut keys = Vec::with_capacity(n);
    let mut tree = QuadTree::new(domain, config.max_tree_depth, n);
    for p in 0..n as PointId {
        let key = keyer.encode_point(&domain, p, points.x[p as usize], points.y[p as usize])?;
        tree.insert_point(p, &keyer.point_insertion_path(key));
        keys.push(key);
    }

    let calc = distance::DistanceCalculator::new(points.x.clone(), points.y.clone());
    Ok((keyer, keys, tree, calc))
}

fn validate_cycle(cycle: &[PointId], n: usize) -> Result<(), Error> {
    if cycle.len() != n {
        return Err(Error::MismatchedCycleLength { actual: cycle.len(), expected: n });
    }
    let mut seen = vec![false; n];
    for &p in cycle {
        let idx = p as usize;
        if idx >= n || seen[idx] {
            return Err(Error::InvalidCycle);
        }
        seen[idx] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Points {
        Points { x: vec![0.0, 10.0, 10.0, 0.0], y: vec![0.0, 0.0, 10.0, 10.0] }
    }

    #[test]
    fn rejects_too_few_points() {
        let points = Points { x: vec![0.0, 1.0], y: vec![0.0, 1.0] };
        let err = optimize(&points, &[0, 1], OptimizerConfig::default()).unwrap_err();
        assert!(matches!(err, Error::TooFewPoints(2)));
    }

    #[test]
    fn rejects_cycle_with_wrong_length() {
        let err = optimize(&square(), &[0, 1, 2], OptimizerConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MismatchedCycleLength { actual: 3, expected: 4 }));
    }

    #[test]
    fn rejects_cycle_that_is_not_a_permutation() {
        let err = optimize(&square(), &[0, 1, 1, 3], OptimizerConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidCycle));
    }

    #[test]
    fn optimizes_crossed_square_to_uncrossed_optimum() {
        let solution = optimize(&square(), &[0, 2, 1, 3], OptimizerConfig::default()).unwrap();
        assert_eq!(solution.length, 40);
    }

    #[test]
    fn solution_converts_to_cycle_length_tuple() {
        let solution = optimize(&square(), &[0, 1, 2, 3], OptimizerConfig::default()).unwrap();
        let (cycle, length): (Vec<PointId>, Length) = solution.into();
        assert_eq!(length, 40);
        assert_eq!(cycle.len(), 4);
    }
}
