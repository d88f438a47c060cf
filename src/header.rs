//! Tree header: the code tree written pre-order, one flag bit per node.
//!
//! An internal node is a `0` followed by its left then right subtree. A leaf
//! is a `1` followed by its symbol in [`SYMBOL_BITS`] bits.

use log::debug;
use std::io::{Read, Write};

use crate::bits::{BitReader, BitWriter};
use crate::error::{HuffError, Result};
use crate::tree::{CodeTree, Node};
use crate::{ALPHABET_SIZE, PSEUDO_EOF, SYMBOL_BITS};

/// No tree over the full alphabet is deeper than this.
const MAX_DEPTH: usize = ALPHABET_SIZE - 1;

pub fn write_header<W: Write>(tree: &CodeTree, out: &mut BitWriter<W>) -> Result<()> {
    fn write_node<W: Write>(node: &Node, out: &mut BitWriter<W>) -> Result<()> {
        match node {
            Node::Leaf { symbol, .. } => {
                out.write_bits(1, 1)?;
                out.write_bits(SYMBOL_BITS, u32::from(*symbol))?;
            }
            Node::Internal { left, right, .. } => {
                out.write_bits(1, 0)?;
                write_node(left, out)?;
                write_node(right, out)?;
            }
        }
        Ok(())
    }

    let start = out.bits_written();
    write_node(tree.root(), out)?;
    debug!("wrote {} header bits", out.bits_written() - start);
    Ok(())
}

/// Reads back a tree written by [`write_header`]. Weights are not stored, so
/// every node of the result has weight zero.
pub fn read_header<R: Read>(input: &mut BitReader<R>) -> Result<CodeTree> {
    fn read_node<R: Read>(
        input: &mut BitReader<R>,
        depth: usize,
        seen: &mut [bool; ALPHABET_SIZE],
    ) -> Result<Node> {
        if depth > MAX_DEPTH {
            return Err(HuffError::MalformedHeader("tree too deep"));
        }

        let flag = input
            .read_bit()?
            .ok_or(HuffError::MalformedHeader("input ended inside the tree"))?;

        if !flag {
            let left = read_node(input, depth + 1, seen)?;
            let right = read_node(input, depth + 1, seen)?;
            return Ok(Node::Internal {
                weight: 0,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        let symbol = input
            .read_bits(SYMBOL_BITS)?
            .ok_or(HuffError::MalformedHeader("input ended inside a symbol"))?;
        if symbol > u32::from(PSEUDO_EOF) {
            return Err(HuffError::MalformedHeader("symbol out of range"));
        }
        if std::mem::replace(&mut seen[symbol as usize], true) {
            return Err(HuffError::MalformedHeader("symbol appears twice"));
        }

        Ok(Node::leaf(symbol as u16, 0))
    }

    let start = input.bits_read();
    let root = read_node(input, 0, &mut [false; ALPHABET_SIZE])?;
    if root.symbol().is_some() {
        return Err(HuffError::MalformedHeader("root is a leaf"));
    }

    let tree = CodeTree::from_root(root);
    debug!(
        "read {} header bits: {} leaves, depth {}",
        input.bits_read() - start,
        tree.leaf_count(),
        tree.depth()
    );
    Ok(tree)
}

/// Exact size of `tree`'s header in bits.
pub fn header_bits(tree: &CodeTree) -> u64 {
    let leaves = tree.leaf_count() as u64;
    // a full binary tree has one fewer internal node than leaves
    (leaves - 1) + leaves * (1 + u64::from(SYMBOL_BITS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CodeTable;
    use crate::freq::FrequencyTable;
    use quickcheck_macros::quickcheck;
    use std::io::Cursor;

    fn header_bytes(tree: &CodeTree) -> Vec<u8> {
        let mut w = BitWriter::new(Vec::new());
        write_header(tree, &mut w).unwrap();
        assert_eq!(w.bits_written(), header_bits(tree));
        w.into_inner().unwrap()
    }

    fn read_bytes(bytes: Vec<u8>) -> Result<CodeTree> {
        read_header(&mut BitReader::new(Cursor::new(bytes)))
    }

    #[test]
    fn aaab_header_layout() {
        let tree = CodeTree::build(&FrequencyTable::from_bytes(b"AAAB"));

        // 0 0 1[066] 1[256] 1[065]
        assert_eq!(
            header_bytes(&tree),
            vec![0b0010_0100, 0b0010_1100, 0b0000_0010, 0b0100_0001]
        );
    }

    #[test]
    fn read_back_same_codes() {
        let freq = FrequencyTable::from_bytes(b"she sells sea shells by the sea shore");
        let tree = CodeTree::build(&freq);

        let read = read_bytes(header_bytes(&tree)).unwrap();

        assert_eq!(CodeTable::from_tree(&read), CodeTable::from_tree(&tree));
        assert_eq!(read.root().weight(), 0);
    }

    #[test]
    fn consumes_exactly_the_header() {
        let tree = CodeTree::build(&FrequencyTable::from_bytes(b"mississippi"));

        let mut w = BitWriter::new(Vec::new());
        write_header(&tree, &mut w).unwrap();
        w.write_bits(5, 0b10110).unwrap();
        let bytes = w.into_inner().unwrap();

        let mut r = BitReader::new(Cursor::new(bytes));
        read_header(&mut r).unwrap();
        assert_eq!(r.bits_read(), header_bits(&tree));
        assert_eq!(r.read_bits(5).unwrap(), Some(0b10110));
    }

    #[quickcheck]
    fn header_self_delimiting(bytes: Vec<u8>, tail: u8) -> bool {
        let tree = CodeTree::build(&FrequencyTable::from_bytes(&bytes));

        let mut w = BitWriter::new(Vec::new());
        write_header(&tree, &mut w).unwrap();
        w.write_bits(8, u32::from(tail)).unwrap();
        let mut r = BitReader::new(Cursor::new(w.into_inner().unwrap()));

        let read = read_header(&mut r).unwrap();
        r.bits_read() == header_bits(&tree)
            && r.read_bits(8).unwrap() == Some(u32::from(tail))
            && CodeTable::from_tree(&read) == CodeTable::from_tree(&tree)
    }

    #[test]
    fn truncated_header() {
        let tree = CodeTree::build(&FrequencyTable::from_bytes(b"mississippi"));
        let bytes = header_bytes(&tree);

        for len in 0..bytes.len() - 1 {
            let err = read_bytes(bytes[..len].to_vec()).unwrap_err();
            assert!(matches!(err, HuffError::MalformedHeader(_)), "{len}: {err}");
        }
    }

    #[test]
    fn rejects_bad_symbols() {
        // 0 1[257] ...
        let err = read_bytes(vec![0b0110_0000, 0b0010_0000, 0]).unwrap_err();
        assert!(matches!(err, HuffError::MalformedHeader("symbol out of range")));

        // 0 1[001] 1[001]
        let err = read_bytes(vec![0b0100_0000, 0b0011_0000, 0b0000_1000]).unwrap_err();
        assert!(matches!(err, HuffError::MalformedHeader("symbol appears twice")));
    }

    #[test]
    fn rejects_leaf_root() {
        // 1[256]
        let err = read_bytes(vec![0b1100_0000, 0]).unwrap_err();
        assert!(matches!(err, HuffError::MalformedHeader("root is a leaf")));
    }

    #[test]
    fn rejects_endless_left_spine() {
        let err = read_bytes(vec![0; 64]).unwrap_err();
        assert!(matches!(err, HuffError::MalformedHeader("tree too deep")));
    }
}
