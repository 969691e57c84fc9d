// src/dirty.rs

//! Mutex-guarded flag marking frame-buffer changes not yet presented.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Set by every mutating draw call, consumed by the presenter.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    dirty: Mutex<bool>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the buffer as changed.
    pub fn mark(&self) {
        *self.lock() = true;
    }

    pub fn is_dirty(&self) -> bool {
        *self.lock()
    }

    /// Holds the flag locked, so a caller can read and clear it together
    /// with other work (the presenter copies the buffer under this guard).
    pub fn lock(&self) -> MutexGuard<'_, bool> {
        self.dirty.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
