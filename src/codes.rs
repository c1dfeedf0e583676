use std::collections::BTreeMap;

use log::{debug, trace};

use crate::error::{HuffmanError, Result};
use crate::tree::{CodeTree, FreqTable, NodeId};
use crate::Symbol;

/// Symbol to `'0'`/`'1'` code string, ordered by symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, String>,
}

fn build_code_table(
    tree: &CodeTree,
    id: NodeId,
    prefix: String,
    table: &mut BTreeMap<Symbol, String>,
) {
    let node = tree.node(id);
    if node.is_leaf() {
        if let Some(symbol) = node.symbol {
            trace!("Assigning code to {:?} : '{}'", symbol, prefix);
            table.insert(symbol, prefix);
        }
        return;
    }
    if let Some(left) = node.left {
        build_code_table(tree, left, format!("{}0", prefix), table);
    }
    if let Some(right) = node.right {
        build_code_table(tree, right, format!("{}1", prefix), table);
    }
}

impl CodeTable {
    /// Walks the tree depth-first, appending `0` per left step and `1` per
    /// right step. A single-leaf tree maps its symbol to the empty code.
    pub fn generate(tree: &CodeTree) -> Self {
        let mut codes = BTreeMap::new();
        build_code_table(tree, tree.root(), String::new(), &mut codes);
        debug!("Code table built with {} entries", codes.len());
        CodeTable { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&str> {
        self.codes.get(&symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c.as_str()))
    }

    /// Concatenates the code of every symbol of `text` in order.
    pub fn encode(&self, text: &str) -> Result<String> {
        let mut bits = String::with_capacity(text.len() * 4);
        for symbol in text.chars() {
            let code = self.get(symbol).ok_or(HuffmanError::UnknownSymbol(symbol))?;
            bits.push_str(code);
        }
        Ok(bits)
    }

    /// Payload size in bits for text with the given symbol counts.
    pub fn encoded_len(&self, frequencies: &FreqTable) -> Result<u64> {
        frequencies
            .iter()
            .map(|(&symbol, &count)| {
                self.get(symbol)
                    .map(|code| code.len() as u64 * count)
                    .ok_or(HuffmanError::UnknownSymbol(symbol))
            })
            .sum()
    }
}

/// Walks `tree` one bit at a time, emitting a symbol at every leaf.
///
/// Bits must be `'0'` or `'1'`. Ending in the middle of a code is reported
/// as a corrupt payload.
pub fn decode(bits: &str, tree: &CodeTree) -> Result<String> {
    let mut decoded = String::new();
    let root = tree.root();
    let mut current = root;

    for c in bits.chars() {
        let bit = match c {
            '0' => 0,
            '1' => 1,
            other => return Err(HuffmanError::InvalidBit(other.to_string())),
        };
        current = tree.step(current, bit)?;

        let node = tree.node(current);
        if node.is_leaf() {
            let symbol = node.symbol.ok_or_else(|| {
                HuffmanError::CorruptPayload(format!("leaf {current} carries no symbol"))
            })?;
            decoded.push(symbol);
            current = root;
        }
    }

    if current != root {
        return Err(HuffmanError::CorruptPayload(
            "bit string ends in the middle of a code".to_string(),
        ));
    }

    Ok(decoded)
}
