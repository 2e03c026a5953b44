//! A key packs `max_tree_depth - 1` quadrants, two bits each, most
//! significant quadrant first, via the "N" curve mapping
//! `qx(q) = q >> 1`, `qy(q) = q & 1`. That mapping is fixed everywhere:
//! whoever decodes a key must use the same quadrant numbering as whoever
//! built it, since it determines which subtree a point lands in.

use crate::domain::Domain;
use crate::error::Error;
use crate::primitives::{Depth, MortonKey, PointId, Quadrant};

/// Builds and decodes Morton keys for a fixed tree depth.
#[derive(Debug, Clone, Copy)]
pub struct MortonKeyer {
    max_tree_depth: Depth,
}

impl MortonKeyer {
    pub fn new(max_tree_depth: Depth) -> Self {
        assert!(max_tree_depth >= 1, "max_tree_depth must be at least 1");
        Self { max_tree_depth }
    }

    pub fn max_tree_depth(&self) -> Depth {
        self.max_tree_depth
    }

    /// Number of quadrants in a full point-insertion path.
    pub fn path_len(&self) -> usize {
        (self.max_tree_depth - 1) as usize
    }

    /// Encodes a point's normalized coordinates (each in `[0, 1]`, see
    /// [`Domain::normalize`]) into a Morton key.
    pub fn encode(&self, xn: f64, yn: f64) -> MortonKey {
        let bits = self.path_len() as u32;
        let scale = (1u64 << bits) as f64;
        // Coordinates equal to 1.0 would scale to exactly `2^bits`, one
        // past the valid range; clamp into the top cell instead.
        let qx = (xn * scale).floor().clamp(0.0, scale - 1.0) as u64;
        let qy = (yn * scale).floor().clamp(0.0, scale - 1.0) as u64;

        let mut key: MortonKey = 0;
        for level in 0..bits {
            let shift = bits - 1 - level;
            let xbit = (qx >> shift) & 1;
            let ybit = (qy >> shift) & 1;
            let quadrant = (xbit << 1) | ybit;
            key = (key << 2) | quadrant;
        }
        key
    }

    /// Encodes a raw point coordinate pair, normalizing it against
    /// `domain` first.
    pub fn encode_point(&self, domain: &Domain, point: PointId, x: f64, y: f64) -> Result<MortonKey, Error> {
        let (xn, yn) = domain.normalize(point, x, y)?;
        Ok(self.encode(xn, yn))
    }

    /// The full point-insertion path for `key`: `max_tree_depth - 1`
    /// quadrants, most-significant first.
    pub fn point_insertion_path(&self, key: MortonKey) -> Vec<Quadrant> {
        let bits = self.path_len() as u32;
        (0..bits)
            .map(|level| {
                let shift = 2 * (bits - 1 - level);
                ((key >> shift) & 0b11) as Quadrant
            })
            .collect()
    }

    /// The longest common prefix of `keyA`'s and `keyB`'s insertion
    /// paths: the deepest node whose cell still encloses both points.
    /// An empty prefix means "register at the root".
    pub fn segment_insertion_path(&self, key_a: MortonKey, key_b: MortonKey) -> Vec<Quadrant> {
        let path_a = self.point_insertion_path(key_a);
        let path_b = self.point_insertion_path(key_b);
        path_a
            .into_iter()
            .zip(path_b)
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a)
            .collect()
    }
}
