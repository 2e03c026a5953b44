//! Segment registration. Segments are added and removed every hill-climb
//! iteration, so topology is never touched here — only `segment_lengths`
//! and the `max_segment_length` summaries along the path to the root.

use super::{NodeId, QuadTree};
use crate::primitives::{Length, Quadrant};

impl QuadTree {
    /// Walks `path` from the root (creating nothing — every node on the
    /// path must already exist from point insertion), appends `length`
    /// to the terminal node's list, and raises `max_segment_length`
    /// along the whole walk, root included.
    pub fn add_segment(&mut self, path: &[Quadrant], length: Length) {
        let mut current = self.root();
        self.bump_max(current, length);
        for &quadrant in path {
            current = self.child_or_panic(current, quadrant, "add_segment");
            self.bump_max(current, length);
        }
        self.nodes[current as usize].segment_lengths.push(length);
    }

    /// Walks `path`, removes exactly one occurrence of `length` at the
    /// terminal node (panics if absent), then recomputes
    /// `max_segment_length` on the return walk, but only at nodes whose
    /// cached maximum equalled the length just removed.
    pub fn remove_segment(&mut self, path: &[Quadrant], length: Length) {
        let mut current = self.root();
        let mut chain = vec![current];
        for &quadrant in path {
            current = self.child_or_panic(current, quadrant, "remove_segment");
            chain.push(current);
        }

        let terminal = &mut self.nodes[current as usize];
        let position = terminal
            .segment_lengths
            .iter()
            .position(|&l| l == length)
            .unwrap_or_else(|| {
                panic!("remove_segment: length {length} not present at node {current}")
            });
        terminal.segment_lengths.swap_remove(position);

        for node_id in chain.into_iter().rev() {
            if self.nodes[node_id as usize].max_segment_length == length {
                let recomputed = self.recompute_max(node_id);
                self.nodes[node_id as usize].max_segment_length = recomputed;
            }
        }
    }

    fn child_or_panic(&self, parent: NodeId, quadrant: Quadrant, op: &str) -> NodeId {
        self.nodes[parent as usize].children[quadrant as usize]
            .unwrap_or_else(|| panic!("{op}: missing child for quadrant {quadrant} at node {parent}"))
    }

    fn bump_max(&mut self, node: NodeId, length: Length) {
        let n = &mut self.nodes[node as usize];
        if length > n.max_segment_length {
            n.max_segment_length = length;
        }
    }

    fn recompute_max(&self, node: NodeId) -> Length {
        let n = &self.nodes[node as usize];
        let mut max = n.segment_lengths.iter().copied().max().unwrap_or(0);
        for child in n.children.iter().flatten() {
            let child_max = self.nodes[*child as usize].max_segment_length;
            if child_max > max {
                max = child_max;
            }
        }
        max
    }
}
