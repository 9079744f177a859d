//! Monotonic sequences: ledger reference numbers and entity ids.

use crate::RefNumber;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared source of row reference numbers
///
/// Clones share the same underlying counter, so every ledger built from one
/// `RefCounter` draws from a single strictly increasing sequence. Numbers
/// start at 1 and are never reused.
#[derive(Clone, Debug, Default)]
pub struct RefCounter {
    issued: Arc<AtomicU64>,
}

impl RefCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next reference number
    pub fn issue(&self) -> RefNumber {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// The most recently issued number, if any
    pub fn last_issued(&self) -> Option<RefNumber> {
        match self.issued.load(Ordering::SeqCst) {
            0 => None,
            n => Some(n),
        }
    }

    /// True if both handles draw from the same sequence
    pub fn shares_with(&self, other: &RefCounter) -> bool {
        Arc::ptr_eq(&self.issued, &other.issued)
    }
}

/// Prefixed id sequence for one kind of entity (`A1`, `A2`, ...)
#[derive(Clone, Debug)]
pub struct IdAllocator {
    prefix: &'static str,
    next: u32,
}

impl IdAllocator {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
