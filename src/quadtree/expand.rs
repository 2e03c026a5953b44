//! `expand`: walk from a point's cached leaf toward the root until the
//! cell's margin strictly contains a disk of the given radius.
//!
//! This crate implements the **standard** variant: at each node visited,
//! the effective radius tested is `radius + node.max_segment_length`,
//! i.e. the subtree's own worst-case segment length is folded into the
//! margin test rather than left for the caller to add. The "simple"
//! variant (radius used as-is) is not implemented; callers needing a
//! different radius policy should compute it before calling `expand`.

use super::{NodeId, QuadTree};
use crate::primitives::Length;

impl QuadTree {
    /// Returns the first ancestor of `point`'s leaf (inclusive) whose
    /// cell margin contains a disk of radius `radius +
    /// node.max_segment_length` centered at `(x, y)`, or the root if no
    /// such ancestor exists below it.
    pub fn expand(&self, leaf: NodeId, x: f64, y: f64, radius: Length) -> NodeId {
        let mut current = leaf;
        loop {
            let node = &self.nodes[current as usize];
            let effective_radius = radius + node.max_segment_length;
            if margin_contains(node.bounds(), x, y, effective_radius) {
                return current;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }
}

fn margin_contains(bounds: geo::Rect<f64>, x: f64, y: f64, radius: Length) -> bool {
    let min = bounds.min();
    let max = bounds.max();
    let dx = (x - min.x).min(max.x - x);
    let dy = (y - min.y).min(max.y - y);
    let radius = radius as f64;
    dx * dx + dy * dy >= radius * radius
}
