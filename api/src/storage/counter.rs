use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free ID generator
///
/// `fetch_add` is a single hardware instruction, so any number of threads
/// can call `increment` at once and every caller sees a distinct value.
#[derive(Debug, Default)]
pub struct AtomicCounter {
    value: AtomicU64,
}

impl AtomicCounter {
    pub fn new(initial: u64) -> Self {
        Self {
            value: AtomicU64::new(initial),
        }
    }

    /// Adds 1 and returns the new value. Starting from 0 the first ID is 1.
    pub fn increment(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }

    pub fn set(&self, value: u64) {
        self.value.store(value, Ordering::SeqCst);
    }
}
