//! Trailing-edge debouncers driven by explicit timestamps
//!
//! A call schedules its value for `now + delay`; a later call before that replaces
//! both the value and the deadline. Nothing fires until [`Debouncer::poll`] is
//! called at or after the deadline.

use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(u64, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Schedule `value`; supersedes anything still pending
    pub fn call(&mut self, now_ms: u64, value: T) {
        self.pending = Some((now_ms.saturating_add(self.delay_ms), value));
    }

    /// Take the pending value if its deadline has passed
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match &self.pending {
            Some((due, _)) if *due <= now_ms => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<u64> {
        self.pending.as_ref().map(|(due, _)| *due)
    }
}

/// One independent debounce timer per key
#[derive(Debug, Clone)]
pub struct KeyedDebouncer<K: Ord> {
    delay_ms: u64,
    pending: BTreeMap<K, u64>,
}

impl<K: Ord + Clone> KeyedDebouncer<K> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: BTreeMap::new(),
        }
    }

    pub fn call(&mut self, now_ms: u64, key: K) {
        self.pending.insert(key, now_ms.saturating_add(self.delay_ms));
    }

    /// Keys whose deadline has passed, in key order
    pub fn poll(&mut self, now_ms: u64) -> Vec<K> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now_ms)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &due {
            self.pending.remove(key);
        }
        due
    }

    /// Drop timers whose key is no longer live
    pub fn retain<F>(&mut self, mut live: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.pending.retain(|key, _| live(key));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
