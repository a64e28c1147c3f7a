use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::freq::FrequencyTable;
use crate::min_pq::HeapError;
use crate::tree::{HuffNode, HuffTree};

/// A variable-length bit string; `false` is a left edge, `true` a right edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn new() -> Self {
        Code { bits: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn clear(&mut self) {
        self.bits.clear();
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }

    fn extended(&self, bit: bool) -> Code {
        let mut bits = Vec::with_capacity(self.bits.len() + 1);
        bits.extend_from_slice(&self.bits);
        bits.push(bit);
        Code { bits }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl From<&str> for Code {
    fn from(s: &str) -> Self {
        Code {
            bits: s.chars().map(|c| c == '1').collect(),
        }
    }
}

/// Byte -> code mapping derived from a finished tree, plus the reverse index
/// the decoder matches candidate codes against.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
    symbols: HashMap<Code, u8>,
}

impl CodeTable {
    pub fn from_tree(tree: &HuffTree) -> Self {
        let mut codes = BTreeMap::new();
        assign_codes(tree.root(), Code::new(), &mut codes);
        let symbols = codes.iter().map(|(&byte, code)| (code.clone(), byte)).collect();
        CodeTable { codes, symbols }
    }

    /// Builds the tree for `table` and derives its codes. An empty table
    /// gives an empty code table.
    pub fn from_frequencies(table: &FrequencyTable) -> Result<Self, HeapError> {
        Ok(HuffTree::build(table)?
            .map(|tree| Self::from_tree(&tree))
            .unwrap_or_default())
    }

    pub fn get(&self, byte: u8) -> Option<&Code> {
        self.codes.get(&byte)
    }

    /// The byte whose code is exactly `code`.
    pub fn symbol(&self, code: &Code) -> Option<u8> {
        self.symbols.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&byte, code)| (byte, code))
    }
}

fn assign_codes(node: &HuffNode, prefix: Code, codes: &mut BTreeMap<u8, Code>) {
    match (&node.left, &node.right) {
        (Some(left), Some(right)) => {
            assign_codes(left, prefix.extended(false), codes);
            assign_codes(right, prefix.extended(true), codes);
        }
        _ => {
            codes.insert(node.byte, prefix);
        }
    }
}
