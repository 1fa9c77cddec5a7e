use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use crate::engine::symbols::Symbol;
use crate::engine::table::{EncodingMap, FrequencyTable};
use crate::error::{CodecError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: Symbol,
        count: u64,
    },
    Internal {
        count: u64,
        zero: Box<HuffmanNode>,
        one: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn count(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { count, .. } | HuffmanNode::Internal { count, .. } => *count,
        }
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            HuffmanNode::Leaf { symbol, .. } => Some(*symbol),
            HuffmanNode::Internal { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    fn merge(zero: HuffmanNode, one: HuffmanNode) -> Result<HuffmanNode> {
        let count = zero
            .count()
            .checked_add(one.count())
            .ok_or(CodecError::CountOverflow)?;
        Ok(HuffmanNode::Internal {
            count,
            zero: Box::new(zero),
            one: Box::new(one),
        })
    }
}

// Heap entry. `seq` is the arrival order: leaves in table order, then each
// merged node as it is pushed. Equal counts pop in arrival order.
struct Queued {
    count: u64,
    seq: usize,
    node: HuffmanNode,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.seq == other.seq
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .count
            .cmp(&self.count)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Huffman tree built by greedy minimum-count merging. The root owns the
/// whole tree; dropping it releases every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Builds the tree for `table`. Of the two nodes removed in each round,
    /// the first becomes the zero-branch and the second the one-branch.
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        let mut heap: BinaryHeap<Queued> = table
            .iter()
            .enumerate()
            .map(|(seq, (symbol, &count))| Queued {
                count,
                seq,
                node: HuffmanNode::Leaf { symbol, count },
            })
            .collect();
        let mut next_seq = heap.len();

        loop {
            let first = heap.pop().ok_or(CodecError::EmptyTable)?;
            let Some(second) = heap.pop() else {
                return Ok(Self { root: first.node });
            };

            let node = HuffmanNode::merge(first.node, second.node)?;
            heap.push(Queued {
                count: node.count(),
                seq: next_seq,
                node,
            });
            next_seq += 1;
        }
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    /// Walks root to leaf: a zero bit takes the zero-branch, a one bit the one-branch.
    pub fn encoding_map(&self) -> EncodingMap {
        fn walk(node: &HuffmanNode, path: &mut Vec<bool>, map: &mut EncodingMap) {
            match node {
                HuffmanNode::Leaf { symbol, .. } => {
                    map.put(*symbol, Codeword(path.clone()));
                }
                HuffmanNode::Internal { zero, one, .. } => {
                    path.push(false);
                    walk(zero, path, map);
                    path.pop();

                    path.push(true);
                    walk(one, path, map);
                    path.pop();
                }
            }
        }

        let mut map = EncodingMap::new();
        walk(&self.root, &mut Vec::new(), &mut map);
        map
    }

    /// Leaf symbols, zero-branch first.
    pub fn leaves(&self) -> Vec<Symbol> {
        fn collect(node: &HuffmanNode, out: &mut Vec<Symbol>) {
            match node {
                HuffmanNode::Leaf { symbol, .. } => out.push(*symbol),
                HuffmanNode::Internal { zero, one, .. } => {
                    collect(zero, out);
                    collect(one, out);
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.root, &mut out);
        out
    }
}

/// A root-to-leaf path. Empty only when the tree is a single leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Codeword(Vec<bool>);

impl Codeword {
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::frequency::analyze_bytes;

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(
            HuffmanTree::build(&FrequencyTable::new()),
            Err(CodecError::EmptyTable)
        ));
    }

    #[test]
    fn overflowing_counts_are_rejected() {
        let table: FrequencyTable = vec![(Symbol::Byte(b'a'), u64::MAX), (Symbol::EndOfStream, 1)]
            .into_iter()
            .collect();
        assert!(matches!(HuffmanTree::build(&table), Err(CodecError::CountOverflow)));
    }

    #[test]
    fn single_entry_is_a_lone_leaf() {
        let tree = HuffmanTree::build(&analyze_bytes(b"")).unwrap();
        assert_eq!(
            tree.root(),
            &HuffmanNode::Leaf { symbol: Symbol::EndOfStream, count: 1 }
        );

        let map = tree.encoding_map();
        assert_eq!(map.len(), 1);
        assert!(map.get(Symbol::EndOfStream).unwrap().is_empty());
    }

    #[test]
    fn two_symbols_get_one_bit_each() {
        let tree = HuffmanTree::build(&analyze_bytes(b"aaa")).unwrap();
        assert_eq!(tree.root().count(), 4);

        let map = tree.encoding_map();
        assert_eq!(map.get(Symbol::Byte(b'a')).unwrap().len(), 1);
        assert_eq!(map.get(Symbol::EndOfStream).unwrap().len(), 1);
        // lower count pops first and takes the zero-branch
        assert_eq!(map.get(Symbol::EndOfStream).unwrap().to_string(), "0");
        assert_eq!(map.get(Symbol::Byte(b'a')).unwrap().to_string(), "1");
    }

    #[test]
    fn equal_counts_merge_in_table_order() {
        // table order is 98, 99, 97, 256, all with count 1
        let tree = HuffmanTree::build(&analyze_bytes(b"abc")).unwrap();
        let map = tree.encoding_map();
        let code = |b: u8| map.get(Symbol::Byte(b)).unwrap().to_string();

        assert_eq!(code(b'b'), "00");
        assert_eq!(code(b'c'), "01");
        assert_eq!(code(b'a'), "10");
        assert_eq!(map.get(Symbol::EndOfStream).unwrap().to_string(), "11");
    }

    #[test]
    fn frequent_symbols_get_shorter_codes() {
        let tree = HuffmanTree::build(&analyze_bytes(b"eeeeeeeeeetttta")).unwrap();
        let map = tree.encoding_map();
        let e = map.get(Symbol::Byte(b'e')).unwrap().len();
        let a = map.get(Symbol::Byte(b'a')).unwrap().len();
        assert!(e < a);
    }

    #[test]
    fn internal_counts_sum_children() {
        fn check(node: &HuffmanNode) {
            if let HuffmanNode::Internal { count, zero, one } = node {
                assert_eq!(*count, zero.count() + one.count());
                check(zero);
                check(one);
            }
        }
        let tree = HuffmanTree::build(&analyze_bytes(b"mississippi river")).unwrap();
        check(tree.root());
        assert_eq!(tree.root().count(), 18);
    }

    #[test]
    fn codewords_are_prefix_free() {
        let tree = HuffmanTree::build(&analyze_bytes(b"the quick brown fox")).unwrap();
        let map = tree.encoding_map();
        let codes: Vec<&Codeword> = map.values().collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{} prefixes {}", a, b);
                }
            }
        }
    }
}
