use std::cmp::Ordering;

use tracing::trace;

use crate::freq::FrequencyTable;
use crate::min_pq::{HeapError, MinPq};

/// A node of the prefix-code tree.
///
/// Leaves carry the symbol they encode. Internal nodes always own exactly two
/// children and carry the smallest byte value found among their leaves, which
/// only serves to break frequency ties deterministically.
#[derive(Debug, Clone)]
pub struct HuffNode {
    pub byte: u8,
    pub freq: u64,
    pub left: Option<Box<HuffNode>>,
    pub right: Option<Box<HuffNode>>,
}

impl HuffNode {
    pub fn leaf(byte: u8, freq: u64) -> Self {
        HuffNode {
            byte,
            freq,
            left: None,
            right: None,
        }
    }

    /// Joins two nodes under a new parent; `a` is the smaller of the two and
    /// becomes the left child.
    pub fn merge(a: Self, b: Self) -> Self {
        HuffNode {
            byte: a.byte.min(b.byte),
            freq: a.freq.saturating_add(b.freq),
            left: Some(Box::new(a)),
            right: Some(Box::new(b)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

// Nodes order by (freq, byte). No two live nodes in one queue share that key:
// a byte value belongs to exactly one subtree, so the ordering is total.
impl PartialEq for HuffNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HuffNode {}

impl PartialOrd for HuffNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HuffNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.freq
            .cmp(&other.freq)
            .then_with(|| self.byte.cmp(&other.byte))
    }
}

#[derive(Debug, Clone)]
pub struct HuffTree {
    root: HuffNode,
}

impl HuffTree {
    /// Builds the code tree for every byte with a nonzero count.
    ///
    /// Returns `Ok(None)` when the table is empty. A table with one distinct
    /// byte yields a lone leaf, which has no usable code.
    pub fn build(table: &FrequencyTable) -> Result<Option<Self>, HeapError> {
        let leaves: Vec<HuffNode> = table
            .iter()
            .map(|(byte, freq)| HuffNode::leaf(byte, freq))
            .collect();
        if leaves.is_empty() {
            return Ok(None);
        }

        let mut heap = MinPq::from_vec(leaves);
        while heap.len() > 1 {
            let a = heap.delete_min()?;
            let b = heap.delete_min()?;
            trace!(
                left = a.byte,
                left_freq = a.freq,
                right = b.byte,
                right_freq = b.freq,
                "merging nodes"
            );
            heap.insert(HuffNode::merge(a, b));
        }

        let root = heap.delete_min()?;
        Ok(Some(HuffTree { root }))
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    pub fn weight(&self) -> u64 {
        self.root.freq
    }
}
