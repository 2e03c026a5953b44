//! Repeatedly finds the best V-move over every pivot and applies it
//! until none improves.

use crate::config::OptimizerConfig;
use crate::distance::DistanceCalculator;
use crate::morton::MortonKeyer;
use crate::primitives::{Length, MortonKey, PointId};
use crate::quadtree::{NodeId, QuadTree};
use crate::solution::Solution;
use crate::tour::Tour;
use crate::vmove::{search_best_move, VMove};

/// Runs hill-climbing from `initial_order` until no V-move improves the
/// tour, optionally keeping one edge (`permanent_segment`) fixed
/// throughout — the variant used by a perturbation restart. `tree` is
/// reset and repopulated with `initial_order`'s segments first, so the
/// same tree can be reused across successive calls.
pub fn hill_climb(
    initial_order: &[PointId],
    keys: &[MortonKey],
    keyer: &MortonKeyer,
    tree: &mut QuadTree,
    calc: &DistanceCalculator,
    permanent_segment: Option<(PointId, PointId)>,
    config: &OptimizerConfig,
) -> Solution {
    let n = initial_order.len() as PointId;
    let mut tour = Tour::from_order(initial_order);

    tree.clear_segments();
    for p in 0..n {
        let np = tour.next(p);
        let path = keyer.segment_insertion_path(keys[p as usize], keys[np as usize]);
        tree.add_segment(&path, calc.length(p, np));
    }

    let mut seg_len: Vec<[Length; 2]> = (0..n)
        .map(|p| {
            let adj = tour.adjacents(p);
            [calc.length(p, adj[0]), calc.length(p, adj[1])]
        })
        .collect();

    let mut search_node: Vec<NodeId> = (0..n)
        .map(|p| expand_for(tree, calc, p, seg_len[p as usize]))
        .collect();

    let initial_length = tour.current_length(calc);
    tracing::info!(length = initial_length, "initial tour length");

    let mut total_improvement: Length = 0;
    let mut iterations: usize = 0;

    loop {
        let next_lengths: Vec<Length> = (0..n).map(|p| calc.length(p, tour.next(p))).collect();

        let mut best = VMove::NONE;
        for p in 0..n {
            let old_segments_length = seg_len[p as usize][0] + seg_len[p as usize][1];
            let candidate = search_best_move(
                tree,
                search_node[p as usize],
                &tour,
                calc,
                p,
                old_segments_length,
                &next_lengths,
                permanent_segment,
            );
            best = best.merge(candidate);
        }

        if best.improvement == 0 {
            break;
        }

        let adj_i = tour.adjacents(best.i);
        let k = tour.next(best.j);
        let removed = best.removed_edges(&tour);
        let added = best.added_edges(&tour);

        for &(a, b) in &removed {
            let path = keyer.segment_insertion_path(keys[a as usize], keys[b as usize]);
            tree.remove_segment(&path, calc.length(a, b));
        }
        for &(a, b) in &added {
            let path = keyer.segment_insertion_path(keys[a as usize], keys[b as usize]);
            tree.add_segment(&path, calc.length(a, b));
        }

        tour.apply_move(&best);

        if config.verify {
            tour.verify_cycle().expect("tour integrity check failed after applying a V-move");
        }

        for &p in &[best.i, best.j, k, adj_i[0], adj_i[1]] {
            let adj = tour.adjacents(p);
            seg_len[p as usize] = [calc.length(p, adj[0]), calc.length(p, adj[1])];
        }

        // Re-expand every point's search node. Simpler than tracking
        // exactly which points' bounding radius changed, and still
        // correct since `expand` is idempotent on an unaffected point.
        for p in 0..n {
            search_node[p as usize] = expand_for(tree, calc, p, seg_len[p as usize]);
        }

        total_improvement += best.improvement;
        iterations += 1;

        let current_length = initial_length - total_improvement;
        if config.print_iterations {
            tracing::info!(iterations, improvement = best.improvement, length = current_length, "accepted move");
        } else {
            tracing::debug!(iterations, improvement = best.improvement, length = current_length, "accepted move");
        }
    }

    Solution {
        ordered_points: tour.current_order(),
        length: initial_length - total_improvement,
        iterations,
        total_improvement,
    }
}

fn expand_for(tree: &QuadTree, calc: &DistanceCalculator, point: PointId, seg_len: [Length; 2]) -> NodeId {
    let leaf = tree.leaf_of(point);
    tree.expand(leaf, calc.x(point), calc.y(point), seg_len[0] + seg_len[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    fn build(x: Vec<f64>, y: Vec<f64>) -> (QuadTree, DistanceCalculator, MortonKeyer, Vec<MortonKey>) {
        let domain = Domain::from_points(&x, &y).unwrap();
        let keyer = MortonKeyer::new(12);
        let n = x.len();
        let keys: Vec<MortonKey> = (0..n)
            .map(|p| keyer.encode_point(&domain, p as PointId, x[p], y[p]).unwrap())
            .collect();
        let mut tree = QuadTree::new(domain, 12, n);
        for (p, &key) in keys.iter().enumerate() {
            tree.insert_point(p as PointId, &keyer.point_insertion_path(key));
        }
        let calc = DistanceCalculator::new(x, y);
        (tree, calc, keyer, keys)
    }

    #[test]
    fn square_already_optimal_is_left_unchanged() {
        let (mut tree, calc, keyer, keys) = build(vec![0.0, 10.0, 10.0, 0.0], vec![0.0, 0.0, 10.0, 10.0]);
        let config = OptimizerConfig::default();
        let solution = hill_climb(&[0, 1, 2, 3], &keys, &keyer, &mut tree, &calc, None, &config);
        assert_eq!(solution.length, 40);
        assert_eq!(solution.iterations, 0);
    }

    #[test]
    fn crossed_square_uncrosses_to_optimal_length() {
        let (mut tree, calc, keyer, keys) = build(vec![0.0, 10.0, 10.0, 0.0], vec![0.0, 0.0, 10.0, 10.0]);
        let config = OptimizerConfig::default();
        let solution = hill_climb(&[0, 2, 1, 3], &keys, &keyer, &mut tree, &calc, None, &config);
        assert_eq!(solution.length, 40);
        assert!(solution.iterations <= 2);
    }

    #[test]
    fn permanent_segment_survives_in_the_final_tour() {
        let (mut tree, calc, keyer, keys) = build(
            vec![0.0, 2.0, 2.0, 0.0, 1.0],
            vec![0.0, 0.0, 2.0, 2.0, 1.0],
        );
        let config = OptimizerConfig::default();
        let permanent = (0u32, 4u32);
        let solution = hill_climb(&[0, 4, 1, 2, 3], &keys, &keyer, &mut tree, &calc, Some(permanent), &config);
        let tour = Tour::from_order(&solution.ordered_points);
        let adj0 = tour.adjacents(0);
        assert!(adj0[0] == 4 || adj0[1] == 4);
    }
}
