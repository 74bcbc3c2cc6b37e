//! One-shot signal bridging async completions into sequential command code
//!
//! Every page fetch and single-shot lookup creates a fresh signal, hands a
//! clone to the call's continuations, and blocks on [`OneShot::wait`] until
//! one of them resolves it. Resolution is exactly-once: later attempts are
//! rejected so a stray continuation cannot overwrite the first outcome.

use std::sync::{Condvar, Mutex};

pub struct OneShot<T> {
    value: Mutex<Option<T>>,
    resolved: Condvar,
}

impl<T> OneShot<T> {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
            resolved: Condvar::new(),
        }
    }

    /// Resolves the signal, waking the waiter. Returns false if the signal
    /// was already resolved, in which case the new value is discarded.
    pub fn resolve(&self, value: T) -> bool {
        let mut slot = self.value.lock().unwrap();
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        self.resolved.notify_one();
        true
    }

    /// Blocks until the signal is resolved and takes the value. Intended to
    /// be called exactly once; a second wait would block forever.
    pub fn wait(&self) -> T {
        let mut slot = self.value.lock().unwrap();
        loop {
            match slot.take() {
                Some(value) => return value,
                None => slot = self.resolved.wait(slot).unwrap(),
            }
        }
    }
}

impl<T> Default for OneShot<T> {
    fn default() -> Self {
        Self::new()
    }
}
