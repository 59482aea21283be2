use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::poker_events::GameEvent;

/// Unbounded inbox. Any thread may push; one node drains it.
#[derive(Default, Debug)]
pub struct EventQueue {
    inner: Mutex<VecDeque<GameEvent>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: GameEvent) {
        self.inner.lock().push_back(event);
    }

    pub fn try_pop(&self) -> Option<GameEvent> {
        self.inner.lock().pop_front()
    }

    /// Takes everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<GameEvent> {
        self.inner.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
