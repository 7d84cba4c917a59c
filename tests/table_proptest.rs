// Table property tests.
//
// Property 1: model equivalence.
//  - Model: std HashMap<Vec<u8>, Vec<u8>>.
//  - Operations: insert, delete, search over a small key space so keys repeat.
//  - Invariant after each step: search result, len() and returned old values match the model;
//    capacity() stays prime.
//
// Property 2: growth keeps every entry.
//  - Insert N distinct keys into a table created with a small capacity.
//  - Invariant: every key is found with its latest value, the load factor never exceeds the
//    grow threshold.
use std::collections::HashMap;

use dhtable::{Table, TableConfig, prime::is_prime, probe::probe_index};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, Vec<u8>),
    Delete(u8),
    Search(u8),
}

fn key(k: u8) -> Vec<u8> {
    format!("key-{k}").into_bytes()
}

fn op_strategy(keys: u8) -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..keys, proptest::collection::vec(any::<u8>(), 0..8)).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (0..keys).prop_map(Op::Delete),
        1 => (0..keys).prop_map(Op::Search),
    ]
}

proptest! {
    #[test]
    fn prop_table_matches_model(
        capacity in 1usize..32,
        ops in proptest::collection::vec(op_strategy(40), 1..400),
    ) {
        let mut table = Table::with_capacity(capacity);
        let mut model: HashMap<Vec<u8>, Vec<u8>> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let old = table.insert(key(k), v.clone());
                    prop_assert_eq!(old, model.insert(key(k), v));
                }
                Op::Delete(k) => {
                    let old = table.delete(&key(k));
                    prop_assert_eq!(old, model.remove(&key(k)));
                }
                Op::Search(k) => {
                    prop_assert_eq!(table.search(&key(k)), model.get(&key(k)).map(Vec::as_slice));
                }
            }

            prop_assert_eq!(table.len(), model.len());
            prop_assert!(is_prime(table.capacity()));
            prop_assert!(table.base_capacity() >= capacity);
        }

        for (k, v) in &model {
            prop_assert_eq!(table.search(k), Some(v.as_slice()));
        }
        prop_assert_eq!(table.iter().count(), model.len());
    }

    #[test]
    fn prop_growth_keeps_entries(n in 1usize..600, capacity in 1usize..16) {
        let mut table = Table::with_capacity(capacity);
        for i in 0..n {
            table.insert(format!("k{i}"), format!("v{i}"));
            prop_assert!(table.load_factor() <= 0.7);
        }
        for i in (0..n).step_by(2) {
            table.insert(format!("k{i}"), "updated");
        }

        prop_assert_eq!(table.len(), n);
        prop_assert!(is_prime(table.capacity()));
        for i in 0..n {
            let expected = if i % 2 == 0 { "updated".to_string() } else { format!("v{i}") };
            prop_assert_eq!(table.search(&format!("k{i}")), Some(expected.as_bytes()));
        }
    }

    #[test]
    fn prop_delete_all_shrinks_to_floor(n in 1usize..300) {
        let mut table = Table::with_config(TableConfig::new().with_base_capacity(8));
        for i in 0..n {
            table.insert(format!("k{i}"), "v");
        }
        for i in 0..n {
            let key = format!("k{i}");
            prop_assert!(table.delete(&key).is_some());
            prop_assert!(table.delete(&key).is_none());
        }

        prop_assert!(table.is_empty());
        prop_assert!(table.base_capacity() >= 8);
        prop_assert!(is_prime(table.capacity()));
    }

    #[test]
    fn prop_probe_sequence_is_permutation(
        key in proptest::collection::vec(any::<u8>(), 0..32),
        size in proptest::sample::select((2usize..2000).filter(|&n| is_prime(n)).collect::<Vec<_>>()),
    ) {
        let mut indices: Vec<usize> = (0..size).map(|attempt| probe_index(&key, size, attempt)).collect();
        indices.sort_unstable();
        prop_assert_eq!(indices, (0..size).collect::<Vec<_>>());
    }
}

#[test]
fn test_colliding_keys_survive_resize() {
    // Keys sharing their whole probe sequence (same start, same step) in the initial 11-slot
    // table.
    let sequence = |k: &[u8]| (probe_index(k, 11, 0), probe_index(k, 11, 1));
    let target = sequence(b"c0");
    let keys: Vec<String> = (0..10_000)
        .map(|i| format!("c{i}"))
        .filter(|k| sequence(k.as_bytes()) == target)
        .take(30)
        .collect();
    assert_eq!(keys.len(), 30);

    let mut table = Table::with_capacity(8);
    for (i, k) in keys.iter().enumerate() {
        table.insert(k.as_str(), i.to_string());
    }

    assert!(table.capacity() > 11);
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(table.search(k), Some(i.to_string().as_bytes()));
    }
}
