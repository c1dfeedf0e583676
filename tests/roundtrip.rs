use std::cmp::Reverse;
use std::collections::BinaryHeap;

use proptest::prelude::*;
use proptest::string::string_regex;

use huffman_text_coding::container::{escape_symbol, unescape_symbol};
use huffman_text_coding::heap::{HeapNode, MinHeap};
use huffman_text_coding::tree::count_frequencies;
use huffman_text_coding::{
    CodeTable, CodeTree, HuffmanError, Separator, compress, decompress,
};

fn usable_separator() -> impl Strategy<Value = Separator> {
    string_regex(r"[^\n:\\01]{1,3}")
        .unwrap()
        .prop_filter_map("separator must be accepted", |s| Separator::new(s).ok())
}

#[derive(Debug, Clone)]
enum HeapOp {
    Insert(u64),
    Extract,
    Decrease(usize, u64),
}

fn heap_op() -> impl Strategy<Value = HeapOp> {
    prop_oneof![
        3 => (0u64..1000).prop_map(HeapOp::Insert),
        2 => Just(HeapOp::Extract),
        2 => (0usize..64, 0u64..1000).prop_map(|(slot, w)| HeapOp::Decrease(slot, w)),
    ]
}

fn slot_symbol(slot: usize) -> char {
    char::from_u32(0x100 + slot as u32).unwrap()
}

/// Cost of an optimal prefix code, computed without the crate's heap.
fn optimal_cost(weights: impl IntoIterator<Item = u64>) -> u64 {
    let mut heap: BinaryHeap<Reverse<u64>> = weights.into_iter().map(Reverse).collect();
    let mut cost = 0;
    while heap.len() > 1 {
        let Reverse(a) = heap.pop().unwrap();
        let Reverse(b) = heap.pop().unwrap();
        cost += a + b;
        heap.push(Reverse(a + b));
    }
    cost
}

#[test]
fn extraction_order_is_ascending() {
    let mut heap = MinHeap::new();
    for (symbol, weight) in [('Z', 50), ('A', 10), ('K', 5), ('B', 30)] {
        heap.insert(HeapNode::leaf(symbol, weight, 0));
    }

    let mut order = Vec::new();
    while !heap.is_empty() {
        order.push(heap.extract_min().unwrap().weight);
    }
    assert_eq!(order, vec![5, 10, 30, 50]);
}

#[test]
fn sample_text_round_trips() {
    let text = "Hello, world! This is a sample text for Huffman compression. \
                The quick brown fox jumps over the lazy dog.\n\
                Huffman encoding is a greedy algorithm that builds optimal prefix codes.\n";
    let separator = Separator::default();
    let packed = compress(text, &separator).unwrap();
    assert_eq!(decompress(&packed, &separator).unwrap(), text);
}

#[test]
fn repeated_text_shrinks() {
    let text = "abababababcabababababd".repeat(100);
    let packed = compress(&text, &Separator::default()).unwrap();
    assert!(packed.len() < text.len() / 2);
}

proptest! {
    #[test]
    fn prop_round_trip_no_nul(text in string_regex(r"(?s)[^\x00]{0,256}").unwrap()) {
        let separator = Separator::default();
        let packed = compress(&text, &separator).unwrap();
        prop_assert_eq!(decompress(&packed, &separator).unwrap(), text);
    }

    #[test]
    fn prop_round_trip_any_separator(
        text in string_regex(r"[a-zA-Z;|,:\\ \t\r\nSEP#żé]{0,128}").unwrap(),
        separator in usable_separator(),
    ) {
        let packed = compress(&text, &separator).unwrap();
        prop_assert_eq!(decompress(&packed, &separator).unwrap(), text);
    }

    #[test]
    fn prop_escape_round_trip(symbol in any::<char>(), separator in usable_separator()) {
        let escaped = escape_symbol(symbol, &separator);
        prop_assert_eq!(unescape_symbol(&escaped, &separator).unwrap(), symbol);
    }

    #[test]
    fn prop_codes_are_prefix_free(text in string_regex(r"[a-h ]{2,200}").unwrap()) {
        let tree = CodeTree::build(&text).unwrap();
        let table = CodeTable::generate(&tree);
        let codes: Vec<&str> = table.iter().map(|(_, code)| code).collect();

        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    prop_assert!(!b.starts_with(a), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn prop_tree_cost_is_optimal(text in string_regex(r"[a-p]{1,300}").unwrap()) {
        let freq = count_frequencies(&text);
        let tree = CodeTree::build(&text).unwrap();
        let table = CodeTable::generate(&tree);

        let expected = optimal_cost(freq.values().copied());
        prop_assert_eq!(tree.weighted_path_length(), expected);
        prop_assert_eq!(table.encoded_len(&freq).unwrap(), expected);
        prop_assert_eq!(table.encode(&text).unwrap().len() as u64, expected);
    }

    #[test]
    fn prop_heap_invariant_holds(ops in prop::collection::vec(heap_op(), 1..200)) {
        let mut heap = MinHeap::new();
        // Weights currently queued, by symbol slot.
        let mut model: Vec<Option<u64>> = Vec::new();

        for op in ops {
            match op {
                HeapOp::Insert(weight) => {
                    let slot = model.len();
                    heap.insert(HeapNode::leaf(slot_symbol(slot), weight, slot));
                    model.push(Some(weight));
                }
                HeapOp::Extract => {
                    let expected = model.iter().flatten().min().copied();
                    match heap.extract_min() {
                        Ok(min) => {
                            prop_assert_eq!(Some(min.weight), expected);
                            model[min.node] = None;
                        }
                        Err(e) => {
                            prop_assert!(matches!(e, HuffmanError::EmptyQueue));
                            prop_assert_eq!(expected, None);
                        }
                    }
                }
                HeapOp::Decrease(slot, weight) => {
                    let current = model.get(slot).copied().flatten();
                    let changed = heap.decrease_priority(slot_symbol(slot), weight);
                    prop_assert_eq!(changed, current.is_some_and(|w| weight < w));
                    if changed {
                        model[slot] = Some(weight);
                    }
                }
            }
            prop_assert!(heap.is_valid());
            prop_assert_eq!(heap.len(), model.iter().flatten().count());
        }
    }
}
