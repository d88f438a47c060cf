use derivative::Derivative;
use log::debug;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::freq::FrequencyTable;
use crate::{Symbol, PSEUDO_EOF};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        Node::Leaf { symbol, weight }
    }

    pub fn from_children(left: Node, right: Node) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    /// Child reached by following one edge: `false` goes left, `true` right.
    /// Leaves have no children.
    pub fn child(&self, bit: bool) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// Queue entry for the merge. Equal weights are served in creation order.
#[derive(Debug, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    weight: u64,
    order: u64,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    node: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    root: Node,
}

impl CodeTree {
    /// Builds the Huffman tree for `freq`.
    ///
    /// Leaves enter the queue in ascending symbol order, and each merged node
    /// is numbered after every node created before it; among equal weights the
    /// lowest number is taken first. The node taken first becomes the left
    /// child.
    ///
    /// A table with a single live symbol (the sentinel of an empty input) gets
    /// a zero-weight filler leaf for the lowest absent byte, so the root is
    /// always an internal node.
    pub fn build(freq: &FrequencyTable) -> Self {
        let mut order = 0u64;
        let mut pending = |node: Node| {
            order += 1;
            Reverse(Pending {
                weight: node.weight(),
                order,
                node,
            })
        };

        let mut pq: BinaryHeap<_> = freq
            .live()
            .map(|(s, count)| pending(Node::leaf(s, count)))
            .collect();

        if pq.len() < 2 {
            if let Some(filler) = (0..PSEUDO_EOF).find(|&s| freq.get(s) == 0) {
                pq.push(pending(Node::leaf(filler, 0)));
            }
        }

        while pq.len() > 1 {
            let (Some(Reverse(left)), Some(Reverse(right))) = (pq.pop(), pq.pop()) else {
                unreachable!("queue holds at least two nodes");
            };
            pq.push(pending(Node::from_children(left.node, right.node)));
        }

        let root = match pq.pop() {
            Some(Reverse(p)) => p.node,
            None => unreachable!("the sentinel always has a leaf"),
        };

        let tree = Self { root };
        debug!(
            "built tree: {} leaves, depth {}",
            tree.leaf_count(),
            tree.depth()
        );
        tree
    }

    /// Wraps an already-shaped root, as read back from a header.
    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf_depths(node: &Node, depth: usize, out: &mut Vec<(Symbol, usize)>) {
        match node {
            Node::Leaf { symbol, .. } => out.push((*symbol, depth)),
            Node::Internal { left, right, .. } => {
                leaf_depths(left, depth + 1, out);
                leaf_depths(right, depth + 1, out);
            }
        }
    }

    fn depths_of(tree: &CodeTree) -> Vec<(Symbol, usize)> {
        let mut out = Vec::new();
        leaf_depths(tree.root(), 0, &mut out);
        out.sort();
        out
    }

    #[test]
    fn node_from_children() {
        let left = Node::leaf(1, 5);
        let right = Node::leaf(2, 7);

        let n = Node::from_children(left.clone(), right.clone());

        assert_eq!(n.weight(), 12);
        assert_eq!(n.symbol(), None);
        assert_eq!(n.child(false), Some(&left));
        assert_eq!(n.child(true), Some(&right));
        assert_eq!(left.child(true), None);
    }

    #[test]
    fn pending_compares_weight_then_order() {
        let a = Pending {
            weight: 3,
            order: 9,
            node: Node::leaf(1, 3),
        };
        let b = Pending {
            weight: 3,
            order: 9,
            node: Node::leaf(2, 3),
        };
        let c = Pending {
            weight: 3,
            order: 10,
            node: Node::leaf(1, 3),
        };
        let d = Pending {
            weight: 4,
            order: 0,
            node: Node::leaf(1, 4),
        };

        assert_eq!(a, b);
        assert!(a < c);
        assert!(c < d);
    }

    #[test]
    fn aaab_shape() {
        let tree = CodeTree::build(&FrequencyTable::from_bytes(b"AAAB"));

        assert_eq!(depths_of(&tree), vec![(65, 1), (66, 2), (256, 2)]);
        assert_eq!(tree.root().weight(), 5);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn empty_input_gets_filler_leaf() {
        let tree = CodeTree::build(&FrequencyTable::from_bytes(b""));

        assert_eq!(depths_of(&tree), vec![(0, 1), (PSEUDO_EOF, 1)]);
        assert_eq!(tree.root().weight(), 1);
    }

    #[test]
    fn single_byte_value_needs_no_filler() {
        let tree = CodeTree::build(&FrequencyTable::from_bytes(&[0; 10]));

        assert_eq!(depths_of(&tree), vec![(0, 1), (PSEUDO_EOF, 1)]);
        assert_eq!(tree.root().weight(), 11);
    }

    #[test]
    fn build_is_deterministic() {
        let text = b"abracadabra, the quick brown fox jumps over the lazy dog";
        let freq = FrequencyTable::from_bytes(text);

        assert_eq!(CodeTree::build(&freq), CodeTree::build(&freq));
    }

    #[test]
    fn minimal_weighted_path_length() {
        // 1, 1, 2, 4, 8 (+ sentinel 1): a chain is optimal
        let mut bytes = vec![b'a'];
        bytes.extend([b'b'; 2]);
        bytes.extend([b'c'; 4]);
        bytes.extend([b'd'; 8]);
        let freq = FrequencyTable::from_bytes(&bytes);
        let tree = CodeTree::build(&freq);

        let cost: u64 = depths_of(&tree)
            .into_iter()
            .map(|(s, d)| freq.get(s) * d as u64)
            .sum();
        // sentinel 4, a 4, b 3, c 2, d 1
        assert_eq!(cost, 4 + 4 + 2 * 3 + 4 * 2 + 8);
        assert_eq!(tree.leaf_count(), 5);
    }
}
