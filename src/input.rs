// src/input.rs

//! Bounded, non-blocking key queue fed by the display surface.
//!
//! Writers never block: when the queue is full the new key is dropped.
//! Readers never block either: `read` returns `None` when nothing is pending.

use crate::keys::KeyPress;
use log::trace;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Queue of pending key presses.
#[derive(Debug)]
pub struct InputQueue {
    capacity: Option<usize>,
    pending: Mutex<VecDeque<KeyPress>>,
}

impl InputQueue {
    /// Creates a queue holding at most `capacity` keys; any negative value
    /// means unbounded.
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity: usize::try_from(capacity).ok(),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(-1)
    }

    /// Maximum number of pending keys, or `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Enqueues `key`. Returns `false` if it was dropped because the queue
    /// is full.
    pub fn write(&self, key: KeyPress) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if self.capacity.is_some_and(|cap| pending.len() >= cap) {
            trace!("InputQueue: full, dropping {:?}", key);
            return false;
        }
        pending.push_back(key);
        true
    }

    /// Removes and returns the oldest pending key.
    pub fn read(&self) -> Option<KeyPress> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    /// Discards every pending key.
    pub fn clear(&self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
