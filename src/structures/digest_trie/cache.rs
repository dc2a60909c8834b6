//! Cache facade: digest-routed trie descent, adaptive splitting, recency
//! maintenance, eviction, and exact accounting

use std::fmt;
use std::marker::PhantomData;
use std::ptr;

use super::digest::{digest_key, Digest};
use super::lru::LruList;
use super::node::{IndexNode, Slot, INDEX_NODE_SIZE};
use super::payload::{Payload, RECORD_META};
use super::stats::CacheStats;
use crate::constants::{DIGEST_LEN, MAX_KEY_LEN, MAX_VALUE_LEN};
use crate::core::config::CacheConfig;
use crate::core::error::CacheError;
use crate::debug_log;

/// Outcome of a successful store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The key was not present before.
    Added,
    /// An existing record with the same key bytes was replaced.
    Replaced,
}

/// Borrowed view of a stored value.
///
/// The slice aliases cache-owned memory; the borrow rules keep it valid
/// exactly until the next mutating call. Copy the bytes out to keep them
/// across mutations.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    /// Value bytes.
    pub value: &'a [u8],
    /// Flags byte supplied at store time.
    pub flags: u8,
}

/// Running accounting, updated exactly on every mutation path.
#[derive(Debug, Default)]
struct Counters {
    index_size: u64,
    meta_size: u64,
    data_size: u64,
    num_keys: u64,
    num_evictions: u64,
}

impl Counters {
    #[inline]
    fn total_bytes(&self) -> u64 {
        self.index_size + self.meta_size + self.data_size
    }

    #[inline]
    fn add_record(&mut self, data: u64) {
        self.data_size += data;
        self.meta_size += RECORD_META as u64;
        self.num_keys += 1;
    }

    #[inline]
    fn drop_record(&mut self, data: u64) {
        self.data_size -= data;
        self.meta_size -= RECORD_META as u64;
        self.num_keys -= 1;
    }
}

/// In-memory byte-keyed cache with adaptive trie index and LRU eviction.
///
/// Keys and values are arbitrary byte sequences. Point operations are
/// O(1) amortized; `clear` is O(n) over live records, which is why the
/// sliced variants [`NibbleCache::clear_thick`] and
/// [`NibbleCache::clear_thin`] exist for callers that need to spread the
/// work out.
///
/// The cache is single-threaded: it owns all of its memory exclusively
/// and has no internal synchronization. Separate instances are
/// independent and may live on different threads.
pub struct NibbleCache {
    root: IndexNode,
    lru: LruList,
    counters: Counters,
    config: CacheConfig,
}

// The cache exclusively owns every payload record and index node it
// points at, so handing the whole instance to another thread is sound.
unsafe impl Send for NibbleCache {}

impl NibbleCache {
    /// Unbounded cache with default trie tuning.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Cache with the given budgets and tuning.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            root: *IndexNode::new(),
            lru: LruList::new(),
            counters: Counters::default(),
            config,
        }
    }

    /// Insert or replace the record for `key`.
    ///
    /// Returns [`StoreOutcome::Added`] for a fresh key and
    /// [`StoreOutcome::Replaced`] when a record with the exact same key
    /// bytes existed. On error the cache is structurally unchanged.
    /// Afterwards the record is at the head of the recency list and the
    /// configured budgets are enforced by evicting from the tail.
    pub fn store(&mut self, key: &[u8], value: &[u8], flags: u8) -> Result<StoreOutcome, CacheError> {
        if key.len() > MAX_KEY_LEN {
            return Err(CacheError::KeyTooLong(key.len()));
        }
        if value.len() > MAX_VALUE_LEN {
            return Err(CacheError::ValueTooLong(value.len()));
        }
        let payload = Payload::alloc(key, value, flags)
            .ok_or(CacheError::AllocFailed(RECORD_META + key.len() + value.len()))?;

        let digest = digest_key(key);
        let outcome = Self::store_in(
            &mut self.root,
            &digest,
            0,
            payload.as_ptr(),
            key,
            &mut self.lru,
            &mut self.counters,
            &self.config,
        );
        self.enforce_budgets();
        Ok(outcome)
    }

    /// Exact lookup, promoting the record to the head of the recency list.
    pub fn fetch(&mut self, key: &[u8]) -> Option<Entry<'_>> {
        let p = self.locate(key);
        if p.is_null() {
            return None;
        }
        unsafe {
            self.lru.promote(p);
            Some(Entry {
                value: Payload::value(p),
                flags: (*p).flags,
            })
        }
    }

    /// Exact lookup without touching recency order.
    pub fn peek(&self, key: &[u8]) -> Option<Entry<'_>> {
        let p = self.locate(key);
        if p.is_null() {
            return None;
        }
        unsafe {
            Some(Entry {
                value: Payload::value(p),
                flags: (*p).flags,
            })
        }
    }

    /// Presence check; recency order is untouched.
    pub fn has(&self, key: &[u8]) -> bool {
        !self.locate(key).is_null()
    }

    /// Delete the record with exactly these key bytes.
    ///
    /// Returns `false` when the key is absent.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        let digest = digest_key(key);
        Self::remove_in(&mut self.root, &digest, 0, key, &mut self.lru, &mut self.counters)
    }

    /// Remove everything.
    ///
    /// Resets all accounting except the lifetime eviction counter.
    pub fn clear(&mut self) {
        for slot in self.root.slots.iter_mut() {
            Self::clear_slot(slot, &mut self.lru, &mut self.counters);
        }
        self.lru.reset();
    }

    /// Clear one thick slice of the key space.
    ///
    /// The slice byte is split into two 4-bit symbols. When the root slot
    /// for the first symbol holds a nested index, only the child for the
    /// second symbol is cleared (about 1/256 of the keys) and the nested
    /// index is collapsed if that left it vacant. When the root slot still
    /// holds a flat bucket list, the whole 1/16 slice is cleared and the
    /// second symbol is irrelevant: how much a slice argument selects
    /// depends on the current trie shape.
    pub fn clear_thick(&mut self, slice: u8) {
        let s1 = (slice >> 4) as usize;
        let s2 = (slice & 0x0F) as usize;

        let collapse = if let Slot::Index(child) = &mut self.root.slots[s1] {
            Self::clear_slot(&mut child.slots[s2], &mut self.lru, &mut self.counters);
            child.is_vacant()
        } else {
            Self::clear_slot(&mut self.root.slots[s1], &mut self.lru, &mut self.counters);
            false
        };

        if collapse {
            Self::clear_slot(&mut self.root.slots[s1], &mut self.lru, &mut self.counters);
        }
        tracing::debug!(slice, "cleared thick slice");
    }

    /// Clear one thin slice of the key space (about 1/65536).
    ///
    /// Both bytes are split into 4-bit symbols and descent runs up to four
    /// levels before clearing. A flat bucket list reached early is cleared
    /// whole, mirroring the thick variant's shape dependence.
    pub fn clear_thin(&mut self, char1: u8, char2: u8) {
        let syms = [char1 >> 4, char1 & 0x0F, char2 >> 4, char2 & 0x0F];
        Self::clear_path(&mut self.root, &syms, 0, &mut self.lru, &mut self.counters);
        tracing::debug!(char1, char2, "cleared thin slice");
    }

    /// Key of the most recently touched record.
    pub fn first_key(&self) -> Option<&[u8]> {
        let head = self.lru.head;
        if head.is_null() {
            None
        } else {
            Some(unsafe { Payload::key(head) })
        }
    }

    /// Key of the least recently touched record.
    pub fn last_key(&self) -> Option<&[u8]> {
        let tail = self.lru.tail;
        if tail.is_null() {
            None
        } else {
            Some(unsafe { Payload::key(tail) })
        }
    }

    /// Key of the record one step less recent than `key`'s record.
    ///
    /// Locates the record without promoting it, then follows one recency
    /// link. `None` when `key` is absent or already the least recent.
    pub fn next_key(&self, key: &[u8]) -> Option<&[u8]> {
        let p = self.locate(key);
        if p.is_null() {
            return None;
        }
        let next = unsafe { (*p).lru_next };
        if next.is_null() {
            None
        } else {
            Some(unsafe { Payload::key(next) })
        }
    }

    /// Key of the record one step more recent than `key`'s record.
    pub fn prev_key(&self, key: &[u8]) -> Option<&[u8]> {
        let p = self.locate(key);
        if p.is_null() {
            return None;
        }
        let prev = unsafe { (*p).lru_prev };
        if prev.is_null() {
            None
        } else {
            Some(unsafe { Payload::key(prev) })
        }
    }

    /// Iterate keys in recency order, most recent first.
    ///
    /// The borrow on the cache keeps it immutable for the iterator's
    /// lifetime, so the walk is always over a consistent list.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            cur: self.lru.head,
            _cache: PhantomData,
        }
    }

    /// Number of live records.
    pub fn len(&self) -> u64 {
        self.counters.num_keys
    }

    /// True when no records are live.
    pub fn is_empty(&self) -> bool {
        self.counters.num_keys == 0
    }

    /// Snapshot of the accounting counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            index_size: self.counters.index_size,
            meta_size: self.counters.meta_size,
            data_size: self.counters.data_size,
            num_keys: self.counters.num_keys,
            num_indexes: self.counters.index_size / INDEX_NODE_SIZE,
            num_evictions: self.counters.num_evictions,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------

    /// Walk the trie to the record holding exactly `key`, or null.
    fn locate(&self, key: &[u8]) -> *mut Payload {
        let digest = digest_key(key);
        let mut node = &self.root;
        let mut depth = 0usize;
        loop {
            debug_assert!(depth < DIGEST_LEN);
            match &node.slots[digest[depth] as usize] {
                Slot::Empty => return ptr::null_mut(),
                Slot::Index(child) => {
                    node = child;
                    depth += 1;
                }
                Slot::Bucket(head) => {
                    let mut cur = *head;
                    unsafe {
                        while !cur.is_null() {
                            if Payload::key_matches(cur, key) {
                                return cur;
                            }
                            cur = (*cur).next;
                        }
                    }
                    return ptr::null_mut();
                }
            }
        }
    }

    /// Split threshold for a slot: the base list length staggered by the
    /// slot's own symbol, so sibling slots do not all split at once.
    #[inline]
    fn split_threshold(sym: usize, config: &CacheConfig) -> usize {
        let scatter = if config.reindex_scatter == 0 {
            0
        } else {
            (sym as u8 % config.reindex_scatter) as usize
        };
        config.max_buckets as usize + scatter
    }

    /// Recursive store: descend by digest symbol, then install, replace,
    /// or append, splitting the bucket list when it has grown past its
    /// threshold.
    #[allow(clippy::too_many_arguments)]
    fn store_in(
        node: &mut IndexNode,
        digest: &Digest,
        depth: usize,
        payload: *mut Payload,
        key: &[u8],
        lru: &mut LruList,
        counters: &mut Counters,
        config: &CacheConfig,
    ) -> StoreOutcome {
        debug_assert!(depth < DIGEST_LEN);
        let sym = digest[depth] as usize;

        if let Slot::Index(child) = &mut node.slots[sym] {
            return Self::store_in(child, digest, depth + 1, payload, key, lru, counters, config);
        }

        if node.slots[sym].is_empty() {
            // first record here: a one-element bucket list
            node.slots[sym] = Slot::Bucket(payload);
            unsafe { lru.push_front(payload) };
            counters.add_record(unsafe { Payload::data_size(payload) });
            return StoreOutcome::Added;
        }

        // the slot heads a bucket list: replace in place or append at the tail
        let head = node.slots[sym].bucket_head();
        debug_assert!(!head.is_null());
        let mut prev: *mut Payload = ptr::null_mut();
        let mut cur = head;
        let mut walked = 0usize;
        unsafe {
            loop {
                if Payload::key_matches(cur, key) {
                    // splice the new record in place of the old, keeping
                    // the old record's position in the chain
                    (*payload).next = (*cur).next;
                    if prev.is_null() {
                        node.slots[sym] = Slot::Bucket(payload);
                    } else {
                        (*prev).next = payload;
                    }
                    lru.unlink(cur);
                    lru.push_front(payload);
                    counters.data_size -= Payload::data_size(cur);
                    counters.data_size += Payload::data_size(payload);
                    Payload::free(cur);
                    return StoreOutcome::Replaced;
                }
                if (*cur).next.is_null() {
                    break;
                }
                prev = cur;
                cur = (*cur).next;
                walked += 1;
            }
            (*cur).next = payload;
            lru.push_front(payload);
            counters.add_record(Payload::data_size(payload));
        }
        debug_log!("store: appended at depth={depth} sym={sym} walked={walked}");

        // a list grown past its staggered threshold deepens into a nested
        // index routing on the next digest symbol; the terminal symbol has
        // no next symbol to route on, so its list keeps growing flat
        if walked >= Self::split_threshold(sym, config) && depth + 1 < DIGEST_LEN {
            let mut child = IndexNode::new();
            let mut rec = head;
            unsafe {
                while !rec.is_null() {
                    let follow = (*rec).next;
                    Self::reindex_record(&mut child, rec, depth + 1);
                    rec = follow;
                }
            }
            node.slots[sym] = Slot::Index(child);
            counters.index_size += INDEX_NODE_SIZE;
            tracing::debug!(depth, symbol = sym, "bucket list split into nested index");
        }
        StoreOutcome::Added
    }

    /// Re-route one record into a freshly created index node by its next
    /// digest symbol, appending at the tail of the target list so pre-split
    /// relative order is preserved. Recency links are not touched.
    fn reindex_record(node: &mut IndexNode, record: *mut Payload, depth: usize) {
        let digest = digest_key(unsafe { Payload::key(record) });
        let sym = digest[depth] as usize;
        unsafe { (*record).next = ptr::null_mut() };

        let head = node.slots[sym].bucket_head();
        if head.is_null() {
            node.slots[sym] = Slot::Bucket(record);
            return;
        }
        unsafe {
            let mut cur = head;
            while !(*cur).next.is_null() {
                cur = (*cur).next;
            }
            (*cur).next = record;
        }
    }

    /// Recursive remove: descend by digest symbol, then unlink the exact
    /// match from its chain, its recency list, and the accounting.
    fn remove_in(
        node: &mut IndexNode,
        digest: &Digest,
        depth: usize,
        key: &[u8],
        lru: &mut LruList,
        counters: &mut Counters,
    ) -> bool {
        debug_assert!(depth < DIGEST_LEN);
        let sym = digest[depth] as usize;

        if let Slot::Index(child) = &mut node.slots[sym] {
            return Self::remove_in(child, digest, depth + 1, key, lru, counters);
        }

        let head = node.slots[sym].bucket_head();
        let mut prev: *mut Payload = ptr::null_mut();
        let mut cur = head;
        unsafe {
            while !cur.is_null() {
                if Payload::key_matches(cur, key) {
                    counters.drop_record(Payload::data_size(cur));
                    if prev.is_null() {
                        node.slots[sym] = if (*cur).next.is_null() {
                            Slot::Empty
                        } else {
                            Slot::Bucket((*cur).next)
                        };
                    } else {
                        (*prev).next = (*cur).next;
                    }
                    lru.unlink(cur);
                    Payload::free(cur);
                    return true;
                }
                prev = cur;
                cur = (*cur).next;
            }
        }
        false
    }

    /// Tag-directed destructor: free every record and interior node below
    /// the slot and leave it empty.
    fn clear_slot(slot: &mut Slot, lru: &mut LruList, counters: &mut Counters) {
        match slot.take() {
            Slot::Empty => {}
            Slot::Index(mut child) => {
                for s in child.slots.iter_mut() {
                    Self::clear_slot(s, lru, counters);
                }
                counters.index_size -= INDEX_NODE_SIZE;
            }
            Slot::Bucket(head) => {
                let mut cur = head;
                unsafe {
                    while !cur.is_null() {
                        let follow = (*cur).next;
                        counters.drop_record(Payload::data_size(cur));
                        lru.unlink(cur);
                        Payload::free(cur);
                        cur = follow;
                    }
                }
            }
        }
    }

    /// Descend a fixed symbol path for a thin slice clear, then clear the
    /// reached slot. A bucket list reached before the last symbol covers
    /// the whole remaining sub-slice and is cleared whole.
    fn clear_path(
        node: &mut IndexNode,
        syms: &[u8; 4],
        idx: usize,
        lru: &mut LruList,
        counters: &mut Counters,
    ) {
        let sym = syms[idx] as usize;
        if idx + 1 < syms.len() {
            if let Slot::Index(child) = &mut node.slots[sym] {
                return Self::clear_path(child, syms, idx + 1, lru, counters);
            }
        }
        Self::clear_slot(&mut node.slots[sym], lru, counters);
    }

    /// Evict from the recency tail until every configured budget holds or
    /// the cache is empty.
    fn enforce_budgets(&mut self) {
        let max_keys = self.config.max_keys;
        let max_bytes = self.config.max_bytes;
        if max_keys == 0 && max_bytes == 0 {
            return;
        }

        while (max_keys != 0 && self.counters.num_keys > max_keys)
            || (max_bytes != 0 && self.counters.total_bytes() > max_bytes)
        {
            let tail = self.lru.tail;
            if tail.is_null() {
                break;
            }
            // the tail's key bytes die with the record; copy them out first
            let victim = unsafe { Payload::key(tail) }.to_vec();
            let removed = self.remove(&victim);
            debug_assert!(removed, "recency tail must be reachable by its own key");
            if !removed {
                break;
            }
            self.counters.num_evictions += 1;
            tracing::debug!(key_len = victim.len(), "evicted least recently used record");
        }
    }
}

impl Default for NibbleCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NibbleCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NibbleCache")
            .field("num_keys", &self.counters.num_keys)
            .field("data_size", &self.counters.data_size)
            .field("meta_size", &self.counters.meta_size)
            .field("index_size", &self.counters.index_size)
            .field("num_evictions", &self.counters.num_evictions)
            .finish_non_exhaustive()
    }
}

impl Drop for NibbleCache {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Iterator over keys in recency order, most recent first.
///
/// Created by [`NibbleCache::keys`].
pub struct Keys<'a> {
    cur: *mut Payload,
    _cache: PhantomData<&'a NibbleCache>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.cur.is_null() {
            return None;
        }
        unsafe {
            let key = Payload::key(self.cur);
            self.cur = (*self.cur).lru_next;
            Some(key)
        }
    }
}
