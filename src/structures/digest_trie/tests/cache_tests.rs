// Point-operation tests: store/fetch/peek/has/remove and the accounting
// they must keep exact.

use crate::constants::MAX_KEY_LEN;
use crate::core::error::CacheError;
use crate::structures::digest_trie::payload::RECORD_META;
use crate::structures::digest_trie::{NibbleCache, StoreOutcome};

fn key(i: usize) -> Vec<u8> {
    format!("key-{i:04}").into_bytes()
}

#[test]
fn store_then_fetch_roundtrips_bytes() {
    let mut cache = NibbleCache::new();
    assert_eq!(cache.store(b"alpha", b"payload-1", 0), Ok(StoreOutcome::Added));
    assert_eq!(cache.fetch(b"alpha").map(|e| e.value.to_vec()), Some(b"payload-1".to_vec()));
    assert!(cache.fetch(b"beta").is_none());
}

#[test]
fn second_store_replaces_and_serves_new_value() {
    let mut cache = NibbleCache::new();
    assert_eq!(cache.store(b"k", b"v1", 0), Ok(StoreOutcome::Added));
    assert_eq!(cache.store(b"k", b"v2", 0), Ok(StoreOutcome::Replaced));
    assert_eq!(cache.fetch(b"k").map(|e| e.value.to_vec()), Some(b"v2".to_vec()));
    assert_eq!(cache.len(), 1);
}

#[test]
fn flags_ride_along_with_the_record() {
    let mut cache = NibbleCache::new();
    cache.store(b"flagged", b"v", 0x2A).unwrap();
    assert_eq!(cache.peek(b"flagged").map(|e| e.flags), Some(0x2A));

    // replacement takes the new flags
    cache.store(b"flagged", b"v", 0x07).unwrap();
    assert_eq!(cache.peek(b"flagged").map(|e| e.flags), Some(0x07));
}

#[test]
fn has_and_remove_agree_on_presence() {
    let mut cache = NibbleCache::new();
    cache.store(b"present", b"v", 0).unwrap();
    assert!(cache.has(b"present"));
    assert!(!cache.has(b"absent"));
    assert!(cache.remove(b"present"));
    assert!(!cache.has(b"present"));
    assert!(!cache.remove(b"present"));
    assert!(!cache.remove(b"absent"));
}

#[test]
fn empty_key_and_empty_value_are_legal() {
    let mut cache = NibbleCache::new();
    cache.store(b"", b"value-for-empty-key", 0).unwrap();
    cache.store(b"key-for-empty-value", b"", 0).unwrap();
    assert_eq!(
        cache.peek(b"").map(|e| e.value.to_vec()),
        Some(b"value-for-empty-key".to_vec())
    );
    assert_eq!(cache.peek(b"key-for-empty-value").map(|e| e.value.len()), Some(0));
}

#[test]
fn accounting_tracks_every_byte() {
    let mut cache = NibbleCache::new();
    cache.store(b"one", b"11", 0).unwrap(); // 5 data bytes
    cache.store(b"two", b"2222", 0).unwrap(); // 7 data bytes

    let s = cache.stats();
    assert_eq!(s.num_keys, 2);
    assert_eq!(s.data_size, 12);
    assert_eq!(s.meta_size, 2 * RECORD_META as u64);
    assert_eq!(s.index_size, 0);
    assert_eq!(s.num_indexes, 0);

    // replace adjusts data_size by the value delta only
    cache.store(b"two", b"2", 0).unwrap(); // 4 data bytes
    let s = cache.stats();
    assert_eq!(s.num_keys, 2);
    assert_eq!(s.data_size, 9);
    assert_eq!(s.meta_size, 2 * RECORD_META as u64);

    // remove drops exactly the record's contribution
    assert!(cache.remove(b"one"));
    let s = cache.stats();
    assert_eq!(s.num_keys, 1);
    assert_eq!(s.data_size, 4);
    assert_eq!(s.meta_size, RECORD_META as u64);
}

#[test]
fn oversized_key_is_rejected_leaving_cache_untouched() {
    let mut cache = NibbleCache::new();
    cache.store(b"ok", b"v", 0).unwrap();
    let before = cache.stats();

    let big = vec![0u8; MAX_KEY_LEN + 1];
    assert_eq!(cache.store(&big, b"v", 0), Err(CacheError::KeyTooLong(big.len())));
    assert_eq!(cache.stats(), before);
    assert!(cache.has(b"ok"));
}

#[test]
fn widest_representable_key_still_works() {
    let mut cache = NibbleCache::new();
    let key = vec![0xAB; MAX_KEY_LEN];
    cache.store(&key, b"wide", 0).unwrap();
    assert!(cache.has(&key));
    assert!(cache.remove(&key));
    assert!(!cache.has(&key));
}

#[test]
fn recency_traversal_follows_touch_order() {
    // Goal: the concrete traversal scenario — three inserts, then a fetch
    // reorders the walk
    let mut cache = NibbleCache::new();
    cache.store(b"a", b"1", 0).unwrap();
    cache.store(b"b", b"2", 0).unwrap();
    cache.store(b"c", b"3", 0).unwrap();

    assert_eq!(cache.first_key(), Some(&b"c"[..]));
    assert_eq!(cache.last_key(), Some(&b"a"[..]));

    assert_eq!(cache.fetch(b"a").map(|e| e.value.to_vec()), Some(b"1".to_vec()));
    assert_eq!(cache.first_key(), Some(&b"a"[..]));
    assert_eq!(cache.next_key(b"a"), Some(&b"c"[..]));
    assert_eq!(cache.next_key(b"c"), Some(&b"b"[..]));
    assert_eq!(cache.next_key(b"b"), None);
    assert_eq!(cache.prev_key(b"a"), None);
}

#[test]
fn traversal_on_empty_cache_hits_the_boundary() {
    let cache = NibbleCache::new();
    assert_eq!(cache.first_key(), None);
    assert_eq!(cache.last_key(), None);
    assert_eq!(cache.next_key(b"anything"), None);
    assert_eq!(cache.prev_key(b"anything"), None);
    assert!(cache.is_empty());
    assert_eq!(cache.keys().count(), 0);
}

#[test]
fn many_keys_survive_and_resolve() {
    // Goal: enough keys to force splits across several slots; every key
    // must still resolve to its own value
    let mut cache = NibbleCache::new();
    let count = 500;
    for i in 0..count {
        cache.store(&key(i), format!("value-{i}").as_bytes(), 0).unwrap();
    }
    assert_eq!(cache.len(), count as u64);
    for i in 0..count {
        assert_eq!(
            cache.peek(&key(i)).map(|e| e.value.to_vec()),
            Some(format!("value-{i}").into_bytes()),
            "key {i} lost or corrupted"
        );
    }
}
