//! Keyed one-shot timers driven by an explicit clock.
//!
//! Each key holds at most one deadline, so re-scheduling a key debounces it.
//! Nothing fires on its own: the owner calls [`Timers::take_due`] from its
//! `tick`.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Timers<K> {
    deadlines: Vec<(K, Instant)>,
}

impl<K> Default for Timers<K> {
    fn default() -> Self {
        Self {
            deadlines: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> Timers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `key` to fire at `now + delay`, replacing any earlier deadline
    pub fn schedule(&mut self, key: K, now: Instant, delay: Duration) {
        self.schedule_at(key, now + delay);
    }

    fn schedule_at(&mut self, key: K, at: Instant) {
        match self.deadlines.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = at,
            None => self.deadlines.push((key, at)),
        }
    }

    /// Disarm `key`; returns whether it was pending
    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.deadlines.len();
        self.deadlines.retain(|(k, _)| *k != key);
        self.deadlines.len() != before
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.deadlines.iter().any(|(k, _)| *k == key)
    }

    /// Earliest pending deadline, for hosts that sleep until the next timer
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.iter().map(|(_, at)| *at).min()
    }

    /// Remove and return every key due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(K, Instant)> = Vec::new();
        self.deadlines.retain(|&(key, at)| {
            if at <= now {
                due.push((key, at));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(_, at)| at);
        due.into_iter().map(|(key, _)| key).collect()
    }

    pub fn clear(&mut self) {
        self.deadlines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
