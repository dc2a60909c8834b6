// Model-based property tests: arbitrary interleavings of mutations
// checked against a reference map plus an explicit recency sequence.

use std::collections::HashMap;

use proptest::prelude::*;

use crate::structures::digest_trie::node::INDEX_NODE_SIZE;
use crate::structures::digest_trie::payload::RECORD_META;
use crate::structures::digest_trie::{NibbleCache, StoreOutcome};

#[derive(Debug, Clone)]
enum Op {
    Store(u8, Vec<u8>),
    Fetch(u8),
    Peek(u8),
    Remove(u8),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => (any::<u8>(), proptest::collection::vec(any::<u8>(), 0..32))
            .prop_map(|(k, v)| Op::Store(k, v)),
        2 => any::<u8>().prop_map(Op::Fetch),
        1 => any::<u8>().prop_map(Op::Peek),
        2 => any::<u8>().prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

fn model_key(id: u8) -> Vec<u8> {
    format!("pk-{id:03}").into_bytes()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn interleaved_mutations_keep_invariants(ops in proptest::collection::vec(op_strategy(), 1..250)) {
        let mut cache = NibbleCache::new();
        let mut model: HashMap<Vec<u8>, Vec<u8>> = HashMap::new();
        let mut recency: Vec<Vec<u8>> = Vec::new(); // front = most recent

        for op in ops {
            match op {
                Op::Store(id, value) => {
                    let key = model_key(id);
                    let expected = if model.contains_key(&key) {
                        StoreOutcome::Replaced
                    } else {
                        StoreOutcome::Added
                    };
                    prop_assert_eq!(cache.store(&key, &value, 0).unwrap(), expected);
                    model.insert(key.clone(), value);
                    recency.retain(|k| k != &key);
                    recency.insert(0, key);
                }
                Op::Fetch(id) => {
                    let key = model_key(id);
                    match model.get(&key) {
                        Some(v) => {
                            let fetched = cache.fetch(&key).map(|e| e.value.to_vec());
                            prop_assert_eq!(fetched.as_ref(), Some(v));
                            recency.retain(|k| k != &key);
                            recency.insert(0, key);
                        }
                        None => prop_assert!(cache.fetch(&key).is_none()),
                    }
                }
                Op::Peek(id) => {
                    let key = model_key(id);
                    let peeked = cache.peek(&key).map(|e| e.value.to_vec());
                    prop_assert_eq!(peeked.as_ref(), model.get(&key));
                }
                Op::Remove(id) => {
                    let key = model_key(id);
                    prop_assert_eq!(cache.remove(&key), model.remove(&key).is_some());
                    recency.retain(|k| k != &key);
                }
                Op::Clear => {
                    cache.clear();
                    model.clear();
                    recency.clear();
                    prop_assert_eq!(cache.stats().index_size, 0);
                }
            }

            // counters stay exact after every operation
            let s = cache.stats();
            prop_assert_eq!(s.num_keys, model.len() as u64);
            let data: u64 = model.iter().map(|(k, v)| (k.len() + v.len()) as u64).sum();
            prop_assert_eq!(s.data_size, data);
            prop_assert_eq!(s.meta_size, model.len() as u64 * RECORD_META as u64);
            prop_assert_eq!(s.index_size % INDEX_NODE_SIZE, 0);

            // the recency list stays consistent end to end
            let listed: Vec<Vec<u8>> = cache.keys().map(<[u8]>::to_vec).collect();
            prop_assert_eq!(&listed, &recency);
            prop_assert_eq!(cache.first_key().map(<[u8]>::to_vec), recency.first().cloned());
            prop_assert_eq!(cache.last_key().map(<[u8]>::to_vec), recency.last().cloned());
        }

        // everything the model holds must still resolve byte-for-byte
        for (k, v) in &model {
            let peeked = cache.peek(k).map(|e| e.value.to_vec());
            prop_assert_eq!(peeked.as_ref(), Some(v));
        }
    }

    #[test]
    fn key_budget_is_never_exceeded(
        budget in 1u64..8,
        ops in proptest::collection::vec((any::<u8>(), proptest::collection::vec(any::<u8>(), 0..16)), 1..120),
    ) {
        let mut cache = NibbleCache::with_config(
            crate::core::config::CacheConfig::bounded(budget, 0),
        );
        let mut unique = std::collections::HashSet::new();
        for (id, value) in ops {
            let key = model_key(id);
            cache.store(&key, &value, 0).unwrap();
            unique.insert(key);
            prop_assert!(cache.len() <= budget);
        }
        let expected = (unique.len() as u64).min(budget);
        prop_assert_eq!(cache.len(), expected);
    }

    #[test]
    fn byte_budget_is_never_exceeded(
        budget in 64u64..512,
        ops in proptest::collection::vec((any::<u8>(), proptest::collection::vec(any::<u8>(), 0..16)), 1..120),
    ) {
        let mut cache = NibbleCache::with_config(
            crate::core::config::CacheConfig::bounded(0, budget),
        );
        for (id, value) in ops {
            cache.store(&model_key(id), &value, 0).unwrap();
            // a single record wider than the whole budget empties the
            // cache instead of satisfying the bound
            let s = cache.stats();
            prop_assert!(s.total_bytes() <= budget || s.num_keys == 0);
        }
    }
}
