//! Arena-indexed point & segment quadtree.
//!
//! The tree is built once per run by inserting every point, then mutated
//! continuously by adding/removing tour segments as the hill-climb moves
//! edges around. Topology (which nodes exist) never changes after point
//! insertion; only `segment_lengths` and `max_segment_length` change.

mod expand;
mod node;
mod segment;

pub use node::{quadrant_offset, Node, NodeId};

use geo::Rect;

use crate::domain::Domain;
use crate::primitives::{Depth, PointId, Quadrant};

/// The root is always at index 0.
const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<Node>,
    domain: Domain,
    max_tree_depth: Depth,
    /// The deepest node reached during each point's insertion, cached
    /// and never invalidated for the run's duration.
    leaf_cache: Vec<NodeId>,
}

impl QuadTree {
    pub fn new(domain: Domain, max_tree_depth: Depth, point_count: usize) -> Self {
        let root = Node::root(domain.root_rect());
        Self {
            nodes: vec![root],
            domain,
            max_tree_depth,
            leaf_cache: vec![ROOT; point_count],
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn leaf_of(&self, point: PointId) -> NodeId {
        self.leaf_cache[point as usize]
    }

    /// Inserts `point` by walking its insertion `path`, creating any
    /// missing child cells idempotently, and appending the point to the
    /// terminal node reached. Caches that terminal node as the point's
    /// leaf.
    pub fn insert_point(&mut self, point: PointId, path: &[Quadrant]) {
        debug_assert_eq!(
            path.len(),
            self.max_tree_depth as usize - 1,
            "insertion path length must match the tree's configured max_tree_depth"
        );
        let mut current = ROOT;
        for &quadrant in path {
            current = self.get_or_create_child(current, quadrant);
        }
        self.nodes[current as usize].points.push(point);
        self.leaf_cache[point as usize] = current;
    }

    /// Allocates the child cell for `quadrant` under `parent` if absent;
    /// a no-op (returning the existing id) if it already exists.
    fn get_or_create_child(&mut self, parent: NodeId, quadrant: Quadrant) -> NodeId {
        if let Some(existing) = self.nodes[parent as usize].children[quadrant as usize] {
            return existing;
        }
        let (qx, qy) = quadrant_offset(quadrant);
        let parent_node = &self.nodes[parent as usize];
        let depth = parent_node.depth + 1;
        let gx = parent_node.gx * 2 + qx;
        let gy = parent_node.gy * 2 + qy;
        let bounds = cell_bounds(&self.domain, depth as u32, gx, gy);

        let child_id = self.nodes.len() as NodeId;
        self.nodes.push(Node {
            bounds,
            depth,
            gx,
            gy,
            parent: Some(parent),
            children: [None; 4],
            points: Vec::new(),
            segment_lengths: Vec::new(),
            max_segment_length: 0,
        });
        self.nodes[parent as usize].children[quadrant as usize] = Some(child_id);
        child_id
    }

    /// Drops every registered segment length across the whole tree,
    /// leaving point topology and leaf caches untouched. Used between
    /// hill-climb restarts, since segments (unlike points) are re-derived
    /// from the current tour at the start of each run.
    pub fn clear_segments(&mut self) {
        for node in &mut self.nodes {
            node.segment_lengths.clear();
            node.max_segment_length = 0;
        }
    }

    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn cell_bounds(domain: &Domain, depth: u32, gx: u64, gy: u64) -> Rect<f64> {
    let xdim = domain.xdim(depth);
    let ydim = domain.ydim(depth);
    let xmin = domain.xmin() + gx as f64 * xdim;
    let ymin = domain.ymin() + gy as f64 * ydim;
    Rect::new((xmin, ymin), (xmin + xdim, ymin + ydim))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morton::MortonKeyer;

    #[test]
    fn inserting_two_points_shares_only_common_prefix_nodes() {
        let domain = Domain::from_points(&[0.0, 10.0], &[0.0, 10.0]).unwrap();
        let keyer = MortonKeyer::new(6);
        let mut tree = QuadTree::new(domain, 6, 2);

        let key_a = keyer.encode_point(&domain, 0, 1.0, 1.0).unwrap();
        let key_b = keyer.encode_point(&domain, 1, 9.0, 9.0).unwrap();
        tree.insert_point(0, &keyer.point_insertion_path(key_a));
        tree.insert_point(1, &keyer.point_insertion_path(key_b));

        assert_ne!(tree.leaf_of(0), tree.leaf_of(1));
        // the two leaves' only shared ancestor is the root, since the
        // points sit in opposite quadrants from the first split.
        assert_eq!(tree.node(tree.root()).depth(), 0);
    }

    #[test]
    fn idempotent_child_creation_does_not_duplicate_nodes() {
        let domain = Domain::from_points(&[0.0, 10.0], &[0.0, 10.0]).unwrap();
        let keyer = MortonKeyer::new(6);
        let mut tree = QuadTree::new(domain, 6, 2);

        let key_a = keyer.encode_point(&domain, 0, 1.0, 1.0).unwrap();
        let key_b = keyer.encode_point(&domain, 1, 1.1, 1.1).unwrap();
        tree.insert_point(0, &keyer.point_insertion_path(key_a));
        let before = tree.node_count();
        tree.insert_point(1, &keyer.point_insertion_path(key_b));
        // the two points are close, so most of the path should be shared
        // and only a handful of new nodes created, not a full new path.
        assert!(tree.node_count() - before < keyer.path_len());
    }
}
