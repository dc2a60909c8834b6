//! Trie slots and index nodes

use std::mem::size_of;

use super::payload::Payload;
use crate::constants::FANOUT;

/// One child position in an index node.
///
/// A slot is empty, holds a nested index node, or heads a singly-linked
/// bucket list of payload records. The explicit variant replaces the
/// one-byte type tag a punning implementation would overlay on both heap
/// shapes.
pub(crate) enum Slot {
    /// Nothing routed here yet.
    Empty,
    /// Nested index node routing on the next digest symbol.
    Index(Box<IndexNode>),
    /// Head of a bucket list, scanned linearly by exact key.
    Bucket(*mut Payload),
}

impl Slot {
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    /// Take the slot's contents, leaving it empty.
    #[inline]
    pub(crate) fn take(&mut self) -> Slot {
        std::mem::replace(self, Slot::Empty)
    }

    /// Head of the bucket list in this slot, or null when the slot is
    /// empty or holds an index node.
    #[inline]
    pub(crate) fn bucket_head(&self) -> *mut Payload {
        match self {
            Slot::Bucket(p) => *p,
            _ => std::ptr::null_mut(),
        }
    }
}

/// Fixed-fanout interior node: one child slot per digest symbol value.
pub(crate) struct IndexNode {
    /// Children, indexed directly by the 4-bit digest symbol.
    pub slots: [Slot; FANOUT],
}

/// Nominal accounted size of one index node.
pub(crate) const INDEX_NODE_SIZE: u64 = size_of::<IndexNode>() as u64;

impl IndexNode {
    /// Fresh node with every slot empty.
    pub(crate) fn new() -> Box<IndexNode> {
        Box::new(IndexNode {
            slots: std::array::from_fn(|_| Slot::Empty),
        })
    }

    /// True when every child slot is empty.
    pub(crate) fn is_vacant(&self) -> bool {
        self.slots.iter().all(Slot::is_empty)
    }
}
