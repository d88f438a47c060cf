use bitvec::prelude::*;
use log::trace;
use serde::Serialize;

use crate::freq::FrequencyTable;
use crate::tree::{CodeTree, Node};
use crate::{Symbol, ALPHABET_SIZE};

pub type Code = BitBox<u8, Msb0>;

/// Root-to-leaf path for every symbol that has a leaf. Bit 0 of a code is
/// the edge taken at the root: `0` left, `1` right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    pub fn from_tree(tree: &CodeTree) -> Self {
        fn traverse(node: &Node, path: &mut BitVec<u8, Msb0>, codes: &mut [Option<Code>]) {
            match node {
                Node::Leaf { symbol, .. } => {
                    codes[*symbol as usize] = Some(path.clone().into_boxed_bitslice());
                }
                Node::Internal { left, right, .. } => {
                    path.push(false);
                    traverse(left, path, codes);
                    path.pop();

                    path.push(true);
                    traverse(right, path, codes);
                    path.pop();
                }
            }
        }

        let mut codes = vec![None; ALPHABET_SIZE];
        traverse(tree.root(), &mut BitVec::new(), &mut codes);

        let table = Self { codes };
        trace!(
            "codes: {:?}",
            table
                .iter()
                .map(|(s, c)| (s, code_string(c)))
                .collect::<Vec<_>>()
        );
        table
    }

    pub fn get(&self, symbol: Symbol) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(symbol as usize)?.as_deref()
    }

    /// Assigned codes in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &BitSlice<u8, Msb0>)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| Some((s as Symbol, c.as_deref()?)))
    }

    pub fn max_len(&self) -> usize {
        self.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }

    /// Payload size in bits for input with these frequencies, sentinel
    /// included and padding excluded.
    ///
    /// Symbols counted in `freq` but absent from the table contribute nothing.
    pub fn encoded_bits(&self, freq: &FrequencyTable) -> u64 {
        freq.live()
            .filter_map(|(s, count)| Some(count * self.get(s)?.len() as u64))
            .sum()
    }
}

/// Renders a code as a string of `0`s and `1`s, root edge first.
pub fn code_string(code: &BitSlice<u8, Msb0>) -> String {
    code.iter().by_vals().map(|b| if b { '1' } else { '0' }).collect()
}

/// One symbol's entry in a [`CodeReport`].
#[derive(Debug, Clone, Serialize)]
pub struct SymbolReport {
    pub symbol: Symbol,
    pub count: u64,
    pub code: String,
}

/// Summary of how an input would be coded.
#[derive(Debug, Clone, Serialize)]
pub struct CodeReport {
    pub input_bytes: u64,
    pub distinct_symbols: usize,
    pub tree_depth: usize,
    pub header_bits: u64,
    pub payload_bits: u64,
    /// Whole output file, magic and padding included.
    pub compressed_bytes: u64,
    pub symbols: Vec<SymbolReport>,
}

impl CodeReport {
    pub fn new(freq: &FrequencyTable, tree: &CodeTree) -> Self {
        let table = CodeTable::from_tree(tree);
        let header_bits = crate::header::header_bits(tree);
        let payload_bits = table.encoded_bits(freq);
        let total_bits = u64::from(crate::BITS_PER_INT) + header_bits + payload_bits;

        Self {
            input_bytes: freq.total_bytes(),
            distinct_symbols: freq.live().count(),
            tree_depth: tree.depth(),
            header_bits,
            payload_bits,
            compressed_bytes: total_bits.div_ceil(8),
            symbols: freq
                .live()
                .filter_map(|(symbol, count)| {
                    let code = table.get(symbol)?;
                    Some(SymbolReport {
                        symbol,
                        count,
                        code: code_string(code),
                    })
                })
                .collect(),
        }
    }
}
