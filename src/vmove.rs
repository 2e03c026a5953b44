//! `VMove`, the pruned per-pivot search, and the strict/lax perturbation
//! search.
//!
//! A V-move detaches a pivot `i` from its two current neighbors, splices
//! it in between some partner `j` and `j`'s successor, and re-closes the
//! gap left behind by joining `i`'s old neighbors directly. The pruned
//! search below is the whole reason the quadtree exists: for each pivot
//! it only has to look at candidates under a node whose `max_segment_length`
//! and cell margin together rule out any partner that can't possibly beat
//! the current tour, rather than scanning all `N` points per pivot.

use crate::config::PerturbationPolicy;
use crate::distance::DistanceCalculator;
use crate::primitives::{Length, PointId, INVALID_POINT};
use crate::quadtree::{NodeId, QuadTree};
use crate::tour::Tour;

/// The 3-remove / 3-add local move: detach pivot `i`, reattach it
/// between partner `j` and `j`'s successor, and re-close the gap left at
/// `i`. `improvement` is always non-negative; the all-zero value is the
/// identity "no move".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VMove {
    pub i: PointId,
    pub j: PointId,
    pub improvement: Length,
}

impl VMove {
    pub const NONE: VMove = VMove { i: INVALID_POINT, j: INVALID_POINT, improvement: 0 };

    /// Keeps the move with strictly greater improvement; ties keep
    /// `self` (so this also naturally implements pivot-then-traversal
    /// tie-break order when callers merge in that order).
    pub fn merge(self, other: VMove) -> VMove {
        if other.improvement > self.improvement {
            other
        } else {
            self
        }
    }

    /// The three edges this move would remove, as unordered pairs.
    pub fn removed_edges(&self, tour: &Tour) -> [(PointId, PointId); 3] {
        let adj = tour.adjacents(self.i);
        [
            (self.i, adj[0]),
            (self.i, adj[1]),
            (self.j, tour.next(self.j)),
        ]
    }

    /// The three edges this move would add, as unordered pairs.
    pub fn added_edges(&self, tour: &Tour) -> [(PointId, PointId); 3] {
        let adj = tour.adjacents(self.i);
        [
            (self.i, self.j),
            (self.i, tour.next(self.j)),
            (adj[0], adj[1]),
        ]
    }
}

fn edge_eq(edge: (PointId, PointId), other: (PointId, PointId)) -> bool {
    (edge.0 == other.0 && edge.1 == other.1) || (edge.0 == other.1 && edge.1 == other.0)
}

/// Finds the best V-move for pivot `i`, searching `node` and every
/// descendant. `old_segments_length` is `len(i, adj[i][0]) +
/// len(i, adj[i][1])`; `next_lengths[p]` is `len(p, next[p])` for every
/// point `p`. `permanent_segment`, if set, rejects any candidate whose
/// three removed edges would include it — the variant used during a
/// perturbation hill-climb, where one edge is pinned for the duration.
pub fn search_best_move(
    tree: &QuadTree,
    node: NodeId,
    tour: &Tour,
    calc: &DistanceCalculator,
    i: PointId,
    old_segments_length: Length,
    next_lengths: &[Length],
    permanent_segment: Option<(PointId, PointId)>,
) -> VMove {
    let tree_node = tree.node(node);
    let adj_i = tour.adjacents(i);

    let mut best = VMove::NONE;
    for &p in tree_node.points() {
        if p == i || tour.next(p) == i {
            continue;
        }
        let reduction = old_segments_length + next_lengths[p as usize];

        let mut new_total = calc.length(i, p);
        if new_total > reduction {
            continue;
        }
        new_total += calc.length(i, tour.next(p));
        if new_total > reduction {
            continue;
        }
        new_total += calc.length(adj_i[0], adj_i[1]);
        if new_total >= reduction {
            continue;
        }

        if let Some(permanent) = permanent_segment {
            let candidate = VMove { i, j: p, improvement: reduction - new_total };
            let removed = candidate.removed_edges(tour);
            if removed.iter().any(|&edge| edge_eq(edge, permanent)) {
                continue;
            }
        }

        let improvement = reduction - new_total;
        if improvement > best.improvement {
            best = VMove { i, j: p, improvement };
        }
    }

    for child in tree_node_children(tree, node) {
        let child_best = search_best_move(tree, child, tour, calc, i, old_segments_length, next_lengths, permanent_segment);
        best = best.merge(child_best);
    }

    best
}

fn tree_node_children(tree: &QuadTree, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    let n = tree.node(node);
    (0..4u8).filter_map(move |q| n.child(q))
}

/// Collects every perturbation candidate for pivot `i` under `node`
/// (searched exhaustively, since the result seeds independent hill-climb
/// restarts rather than picking a single winner).
pub fn search_perturbations(
    tree: &QuadTree,
    node: NodeId,
    tour: &Tour,
    calc: &DistanceCalculator,
    i: PointId,
    adj_lengths: [Length; 2],
    next_lengths: &[Length],
    policy: PerturbationPolicy,
    out: &mut Vec<VMove>,
) {
    let tree_node = tree.node(node);
    let adj_i = tour.adjacents(i);

    for &p in tree_node.points() {
        if p == i || tour.next(p) == i {
            continue;
        }
        let new_edges = [
            calc.length(i, p),
            calc.length(i, tour.next(p)),
            calc.length(adj_i[0], adj_i[1]),
        ];
        let old_edges = [adj_lengths[0], adj_lengths[1], next_lengths[p as usize]];

        let (lhs, rhs) = match policy {
            PerturbationPolicy::Strict => (
                new_edges.iter().copied().min().unwrap(),
                old_edges.iter().copied().min().unwrap(),
            ),
            PerturbationPolicy::Lax => (
                new_edges.iter().copied().max().unwrap(),
                old_edges.iter().copied().max().unwrap(),
            ),
        };

        if lhs < rhs {
            out.push(VMove { i, j: p, improvement: rhs - lhs });
        }
    }

    for child in tree_node_children(tree, node) {
        search_perturbations(tree, child, tour, calc, i, adj_lengths, next_lengths, policy, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    #[test]
    fn merge_keeps_strictly_greater_improvement() {
        let a = VMove { i: 0, j: 1, improvement: 5 };
        let b = VMove { i: 0, j: 2, improvement: 9 };
        assert_eq!(a.merge(b), b);
        assert_eq!(b.merge(a), b);
    }

    #[test]
    fn merge_keeps_current_on_tie() {
        let a = VMove { i: 0, j: 1, improvement: 5 };
        let b = VMove { i: 0, j: 2, improvement: 5 };
        assert_eq!(a.merge(b), a);
    }

    #[test]
    fn edge_eq_is_order_independent() {
        assert!(edge_eq((1, 2), (2, 1)));
        assert!(!edge_eq((1, 2), (1, 3)));
    }

    /// Square corners, crossed into cycle 0-2-1-3-0 so `next[3] == 0`:
    /// pivot `i = 0`'s partner candidate `p = 3` satisfies `next[p] == i`.
    /// Without the degenerate-candidate guard, `(i, next[p])` collapses
    /// to the zero-length edge `(0, 0)`, understating the new total and
    /// producing a spurious positive `improvement` — exactly the
    /// configuration the guard in `search_best_move` exists to reject.
    fn crossed_square() -> (QuadTree, Tour, DistanceCalculator, Vec<Length>) {
        let x = vec![0.0, 10.0, 10.0, 0.0];
        let y = vec![0.0, 0.0, 10.0, 10.0];
        let domain = Domain::from_points(&x, &y).unwrap();
        let tree = QuadTree::new(domain, 1, x.len());
        let tour = Tour::from_order(&[0, 2, 1, 3]);
        let calc = DistanceCalculator::new(x, y);
        let next_lengths = (0..4u32).map(|p| calc.length(p, tour.next(p))).collect();
        (tree, tour, calc, next_lengths)
    }

    #[test]
    fn search_best_move_skips_partner_whose_next_is_the_pivot() {
        let (mut tree, tour, calc, next_lengths) = crossed_square();
        // Only point 3 (next[3] == 0 == i) is visible to the search.
        tree.insert_point(3, &[]);

        let i = 0;
        let adj_i = tour.adjacents(i);
        let old_segments_length = calc.length(i, adj_i[0]) + calc.length(i, adj_i[1]);

        let best = search_best_move(&tree, tree.root(), &tour, &calc, i, old_segments_length, &next_lengths, None);
        assert_eq!(best, VMove::NONE, "a candidate with next[p] == i must never be returned as a move");
    }

    #[test]
    fn search_best_move_skips_partner_equal_to_the_pivot() {
        let (mut tree, tour, calc, next_lengths) = crossed_square();
        // Only point 0 itself (p == i) is visible to the search.
        tree.insert_point(0, &[]);

        let i = 0;
        let adj_i = tour.adjacents(i);
        let old_segments_length = calc.length(i, adj_i[0]) + calc.length(i, adj_i[1]);

        let best = search_best_move(&tree, tree.root(), &tour, &calc, i, old_segments_length, &next_lengths, None);
        assert_eq!(best, VMove::NONE, "a candidate p == i must never be returned as a move");
    }

    #[test]
    fn search_perturbations_skips_degenerate_partners() {
        let (mut tree, tour, calc, next_lengths) = crossed_square();
        tree.insert_point(3, &[]); // next[3] == 0 == i
        tree.insert_point(0, &[]); // p == i

        let i = 0;
        let adj_i = tour.adjacents(i);
        let adj_lengths = [calc.length(i, adj_i[0]), calc.length(i, adj_i[1])];

        let mut out = Vec::new();
        search_perturbations(&tree, tree.root(), &tour, &calc, i, adj_lengths, &next_lengths, PerturbationPolicy::Lax, &mut out);
        assert!(out.is_empty(), "degenerate candidates must never be collected as perturbation seeds");
    }
}
