//! Key digest: fixed-width routing symbols for trie descent

use std::hash::Hasher;

use crate::constants::DIGEST_LEN;

/// Ordered routing symbols derived from one key.
///
/// Each element is a 4-bit value indexing one level of the trie, most
/// significant hash bits first.
pub(crate) type Digest = [u8; DIGEST_LEN];

/// Mix function spreading entropy across all 64 hash bits.
#[inline]
fn mix(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Compute a 64-bit hash over raw key bytes with ahash.
#[inline]
fn hash64(key: &[u8]) -> u64 {
    let mut h = ahash::AHasher::default();
    h.write(key);
    h.finish()
}

/// Digest a key into its routing symbols.
///
/// Deterministic and pure. Distinct keys may produce the same digest; the
/// bucket list resolves identity by exact byte comparison, so the digest
/// only has to route well, not collide never.
#[inline]
pub(crate) fn digest_key(key: &[u8]) -> Digest {
    let mut h = mix(hash64(key));
    let mut digest = [0u8; DIGEST_LEN];
    for sym in digest.iter_mut().rev() {
        *sym = (h & 0xF) as u8;
        h >>= 4;
    }
    digest
}
