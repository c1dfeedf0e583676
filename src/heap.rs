//! Array-backed min-heap used to drive tree construction.
//!
//! For index `i` the children live at `2i + 1` and `2i + 2`, the parent at
//! `(i - 1) / 2`. Equal weights are never swapped, so ties are resolved by
//! insertion and extraction order.

use log::trace;

use crate::error::{HuffmanError, Result};
use crate::tree::NodeId;
use crate::Symbol;

/// One queued subtree: its weight, the arena node it stands for, and the
/// symbol when the subtree is a single leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapNode {
    pub weight: u64,
    pub symbol: Option<Symbol>,
    pub node: NodeId,
}

impl HeapNode {
    pub fn leaf(symbol: Symbol, weight: u64, node: NodeId) -> Self {
        HeapNode {
            weight,
            symbol: Some(symbol),
            node,
        }
    }

    pub fn internal(weight: u64, node: NodeId) -> Self {
        HeapNode {
            weight,
            symbol: None,
            node,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MinHeap {
    elements: Vec<HeapNode>,
}

impl MinHeap {
    pub fn new() -> Self {
        MinHeap {
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn peek(&self) -> Option<&HeapNode> {
        self.elements.first()
    }

    /// Empties the heap, then inserts every entry one by one.
    pub fn build_from<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = HeapNode>,
    {
        self.elements.clear();
        for entry in entries {
            self.insert(entry);
        }
    }

    pub fn insert(&mut self, entry: HeapNode) {
        self.elements.push(entry);
        self.bubble_up(self.elements.len() - 1);
        debug_assert!(self.is_valid());
    }

    pub fn extract_min(&mut self) -> Result<HeapNode> {
        if self.elements.is_empty() {
            return Err(HuffmanError::EmptyQueue);
        }

        let min = self.elements.swap_remove(0);
        self.bubble_down(0);
        debug_assert!(self.is_valid());

        Ok(min)
    }

    /// Lowers the weight of the entry carrying `symbol`.
    ///
    /// Linear lookup. Returns `false` when the symbol is not queued or
    /// `new_weight` is not strictly smaller than the current weight.
    pub fn decrease_priority(&mut self, symbol: Symbol, new_weight: u64) -> bool {
        let Some(index) = self
            .elements
            .iter()
            .position(|e| e.symbol == Some(symbol))
        else {
            trace!("decrease_priority: {:?} not queued", symbol);
            return false;
        };

        if new_weight >= self.elements[index].weight {
            return false;
        }

        self.elements[index].weight = new_weight;
        self.bubble_up(index);
        debug_assert!(self.is_valid());
        true
    }

    /// Checks that no parent is heavier than either of its children.
    pub fn is_valid(&self) -> bool {
        (1..self.elements.len())
            .all(|i| self.elements[(i - 1) / 2].weight <= self.elements[i].weight)
    }

    /// Logs the internal array with each slot's children weights.
    pub fn trace_state(&self) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        if self.elements.is_empty() {
            trace!("heap: (empty)");
            return;
        }
        for (i, entry) in self.elements.iter().enumerate() {
            let left = self.elements.get(2 * i + 1).map(|e| e.weight);
            let right = self.elements.get(2 * i + 2).map(|e| e.weight);
            trace!(
                "heap[{}] symbol {:?} weight {} -> children L:{:?} R:{:?}",
                i, entry.symbol, entry.weight, left, right
            );
        }
    }

    fn bubble_up(&mut self, mut child: usize) {
        while child > 0 {
            let parent = (child - 1) / 2;
            if self.elements[child].weight >= self.elements[parent].weight {
                break;
            }
            self.elements.swap(child, parent);
            child = parent;
        }
    }

    fn bubble_down(&mut self, mut parent: usize) {
        let len = self.elements.len();
        loop {
            let left = 2 * parent + 1;
            let right = left + 1;
            let mut smallest = parent;

            if left < len && self.elements[left].weight < self.elements[smallest].weight {
                smallest = left;
            }
            if right < len && self.elements[right].weight < self.elements[smallest].weight {
                smallest = right;
            }
            if smallest == parent {
                break;
            }

            self.elements.swap(parent, smallest);
            parent = smallest;
        }
    }
}
