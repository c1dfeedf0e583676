use std::collections::HashMap;

use log::{debug, trace};

use crate::error::{HuffmanError, Result};
use crate::heap::{HeapNode, MinHeap};
use crate::Symbol;

pub type FreqTable = HashMap<Symbol, u64>;

/// Index of a node inside a [`CodeTree`] arena.
pub type NodeId = usize;

/// A node record in the tree arena.
///
/// Leaves carry a symbol and have no children. Internal nodes produced by
/// [`CodeTree::from_frequencies`] always have both children; trees rebuilt
/// from a container header may be incomplete, which the decoder reports as
/// corruption when a walk steps onto a missing child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub symbol: Option<Symbol>,
    pub weight: u64,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl Node {
    fn leaf(symbol: Symbol, weight: u64) -> Self {
        Node {
            symbol: Some(symbol),
            weight,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct CodeTree {
    nodes: Vec<Node>,
    root: NodeId,
}

pub fn count_frequencies(text: &str) -> FreqTable {
    let mut freq = FreqTable::new();
    for symbol in text.chars() {
        *freq.entry(symbol).or_insert(0) += 1;
    }
    freq
}

impl CodeTree {
    pub fn build(text: &str) -> Result<Self> {
        Self::from_frequencies(&count_frequencies(text))
    }

    /// Builds a Huffman tree by repeatedly merging the two lightest subtrees.
    ///
    /// The first extracted subtree becomes the left child. A table with one
    /// symbol yields a single-leaf tree.
    pub fn from_frequencies(frequencies: &FreqTable) -> Result<Self> {
        debug!(
            "Building Huffman tree from {} unique symbols",
            frequencies.len()
        );

        // HashMap order is random per process; sort so a given text always
        // yields the same tree.
        let mut symbols: Vec<(Symbol, u64)> =
            frequencies.iter().map(|(&s, &w)| (s, w)).collect();
        symbols.sort_unstable_by_key(|&(s, _)| s);

        let mut nodes = Vec::with_capacity(symbols.len() * 2);
        let mut heap = MinHeap::new();
        heap.build_from(symbols.into_iter().map(|(symbol, weight)| {
            nodes.push(Node::leaf(symbol, weight));
            HeapNode::leaf(symbol, weight, nodes.len() - 1)
        }));
        heap.trace_state();

        while heap.len() > 1 {
            let left = heap.extract_min()?;
            let right = heap.extract_min()?;
            let weight = left.weight + right.weight;

            nodes.push(Node {
                symbol: None,
                weight,
                left: Some(left.node),
                right: Some(right.node),
            });
            heap.insert(HeapNode::internal(weight, nodes.len() - 1));
        }

        let root = heap.extract_min()?.node;
        debug!(
            "Tree construction complete: {} nodes, total weight {}",
            nodes.len(),
            nodes[root].weight
        );

        Ok(CodeTree { nodes, root })
    }

    /// A tree holding only an empty root, ready for [`CodeTree::insert_path`].
    pub(crate) fn empty() -> Self {
        CodeTree {
            nodes: vec![Node::default()],
            root: 0,
        }
    }

    /// Places `symbol` at the end of the root-to-leaf path spelled by `code`,
    /// creating internal nodes on demand.
    pub(crate) fn insert_path(&mut self, symbol: Symbol, code: &str) -> Result<()> {
        let token = || format!("{symbol:?}:{code}");
        let mut current = self.root;

        for bit in code.chars() {
            if self.nodes[current].symbol.is_some() {
                return Err(HuffmanError::header(
                    token(),
                    "code runs through another symbol's leaf",
                ));
            }

            let existing = match bit {
                '0' => self.nodes[current].left,
                '1' => self.nodes[current].right,
                other => {
                    return Err(HuffmanError::header(
                        token(),
                        format!("code contains non-binary digit {other:?}"),
                    ));
                }
            };

            current = match existing {
                Some(child) => child,
                None => {
                    self.nodes.push(Node::default());
                    let child = self.nodes.len() - 1;
                    if bit == '0' {
                        self.nodes[current].left = Some(child);
                    } else {
                        self.nodes[current].right = Some(child);
                    }
                    child
                }
            };
        }

        let node = &mut self.nodes[current];
        if node.symbol.is_some() {
            return Err(HuffmanError::header(token(), "duplicate code"));
        }
        if !node.is_leaf() {
            return Err(HuffmanError::header(
                token(),
                "code is a prefix of another code",
            ));
        }

        trace!("Inserted path {:?} -> {:?}", code, symbol);
        node.symbol = Some(symbol);
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of all leaf weights.
    pub fn weight(&self) -> u64 {
        self.nodes[self.root].weight
    }

    /// Follows one edge: `0` goes left, `1` goes right.
    pub fn step(&self, from: NodeId, bit: u8) -> Result<NodeId> {
        let node = &self.nodes[from];
        let next = match bit {
            0 => node.left,
            1 => node.right,
            other => return Err(HuffmanError::InvalidBit(other.to_string())),
        };
        next.ok_or_else(|| {
            HuffmanError::CorruptPayload(format!(
                "bit {bit} leads to a missing child of node {from}"
            ))
        })
    }

    /// Leaves in depth-first order (left before right) with their depth.
    pub fn leaves(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            if node.is_leaf() {
                out.push((id, depth));
                continue;
            }
            if let Some(right) = node.right {
                stack.push((right, depth + 1));
            }
            if let Some(left) = node.left {
                stack.push((left, depth + 1));
            }
        }
        out
    }

    /// Total encoded length in bits: the sum of leaf weight times leaf depth.
    pub fn weighted_path_length(&self) -> u64 {
        self.leaves()
            .into_iter()
            .map(|(id, depth)| self.nodes[id].weight * depth as u64)
            .sum()
    }
}
