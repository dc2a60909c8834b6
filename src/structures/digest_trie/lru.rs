//! Intrusive recency list
//!
//! Threads every live payload record through the `lru_prev`/`lru_next`
//! links embedded in the record header: no side table, no per-member
//! allocation, O(1) for every primitive. `head` is the most recently
//! touched record, `tail` the least recently touched and therefore the
//! eviction candidate.

use std::ptr;

use super::payload::Payload;

/// Doubly-linked recency list over payload records.
pub(crate) struct LruList {
    /// Most recently touched record, null when the list is empty.
    pub head: *mut Payload,
    /// Least recently touched record, null when the list is empty.
    pub tail: *mut Payload,
}

impl LruList {
    pub(crate) fn new() -> Self {
        Self {
            head: ptr::null_mut(),
            tail: ptr::null_mut(),
        }
    }

    /// Link a record at the head. The record must not already be a member.
    pub(crate) unsafe fn push_front(&mut self, p: *mut Payload) {
        (*p).lru_prev = ptr::null_mut();
        (*p).lru_next = self.head;
        if !self.head.is_null() {
            (*self.head).lru_prev = p;
        }
        self.head = p;
        if self.tail.is_null() {
            self.tail = p;
        }
    }

    /// Unlink a member record, patching its neighbours and the endpoints.
    pub(crate) unsafe fn unlink(&mut self, p: *mut Payload) {
        if !(*p).lru_prev.is_null() {
            (*(*p).lru_prev).lru_next = (*p).lru_next;
        }
        if !(*p).lru_next.is_null() {
            (*(*p).lru_next).lru_prev = (*p).lru_prev;
        }
        if self.head == p {
            self.head = (*p).lru_next;
        }
        if self.tail == p {
            self.tail = (*p).lru_prev;
        }
    }

    /// Move a member record to the head; no-op when already there.
    pub(crate) unsafe fn promote(&mut self, p: *mut Payload) {
        if self.head == p {
            return;
        }
        self.unlink(p);
        self.push_front(p);
    }

    /// Reset both endpoints. Only valid once every member is unlinked.
    pub(crate) fn reset(&mut self) {
        self.head = ptr::null_mut();
        self.tail = ptr::null_mut();
    }
}
