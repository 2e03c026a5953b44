//! A bounded restart mechanism: pins one non-improving-but-plausible
//! edge as permanent and hill-climbs again, keeping the best result
//! found.

use crate::config::{OptimizerConfig, PerturbationPolicy};
use crate::distance::DistanceCalculator;
use crate::hillclimb::hill_climb;
use crate::morton::MortonKeyer;
use crate::primitives::{Length, MortonKey, PointId};
use crate::quadtree::QuadTree;
use crate::solution::Solution;
use crate::tour::Tour;
use crate::vmove::search_perturbations;

/// Hill-climbs to a local optimum, then explores perturbation restarts
/// seeded by `policy`'s candidate search, returning whichever result has
/// the shorter total length.
pub fn perturbed_hill_climb(
    initial_order: &[PointId],
    keys: &[MortonKey],
    keyer: &MortonKeyer,
    tree: &mut QuadTree,
    calc: &DistanceCalculator,
    policy: PerturbationPolicy,
    config: &OptimizerConfig,
) -> Solution {
    let mut best = hill_climb(initial_order, keys, keyer, tree, calc, None, config);

    let n = best.ordered_points.len() as PointId;
    let tour = Tour::from_order(&best.ordered_points);
    let next_lengths: Vec<Length> = (0..n).map(|p| calc.length(p, tour.next(p))).collect();
    let seg_len: Vec<[Length; 2]> = (0..n)
        .map(|p| {
            let adj = tour.adjacents(p);
            [calc.length(p, adj[0]), calc.length(p, adj[1])]
        })
        .collect();

    let mut candidates = Vec::new();
    for p in 0..n {
        search_perturbations(
            tree,
            tree.root(),
            &tour,
            calc,
            p,
            seg_len[p as usize],
            &next_lengths,
            policy,
            &mut candidates,
        );
    }
    tracing::debug!(candidates = candidates.len(), "perturbation candidates found");

    for candidate in &candidates {
        let added = candidate.added_edges(&tour);
        let threshold = next_lengths[candidate.j as usize]
            .min(seg_len[candidate.i as usize][0])
            .min(seg_len[candidate.i as usize][1]);

        for &(a, b) in &added {
            let length = calc.length(a, b);
            if length >= threshold {
                continue;
            }

            let mut perturbed_tour = tour.clone();
            perturbed_tour.apply_move(candidate);
            let perturbed_order = perturbed_tour.current_order();

            let solution = hill_climb(&perturbed_order, keys, keyer, tree, calc, Some((a, b)), config);
            if solution.length < best.length {
                tracing::debug!(from = best.length, to = solution.length, "perturbation restart improved tour");
                best = solution;
            }
        }
    }

    best
}
