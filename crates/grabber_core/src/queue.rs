use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::action::DeferredAction;
use crate::guard::ReentrancyGuard;

/// FIFO of deferred actions shared between the worker pool and the host
/// thread. Cloning yields another handle to the same queue.
#[derive(Debug, Default, Clone)]
pub struct OutputQueue {
    pending: Arc<Mutex<VecDeque<DeferredAction>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainReport {
    /// Another emission was in progress; nothing ran.
    Busy,
    Drained { executed: usize, failed: usize },
}

impl OutputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, action: DeferredAction) {
        self.lock().push_back(action);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the pending actions, oldest first.
    pub fn snapshot(&self) -> Vec<DeferredAction> {
        self.lock().iter().cloned().collect()
    }

    /// Run every action pending at the moment of the call, oldest first,
    /// while holding `guard`. Actions enqueued meanwhile wait for the next
    /// drain. A panicking action is dropped and the drain carries on.
    pub fn drain(
        &self,
        guard: &ReentrancyGuard,
        mut run: impl FnMut(DeferredAction),
    ) -> DrainReport {
        let Some(_scope) = guard.enter() else {
            return DrainReport::Busy;
        };

        let batch = std::mem::take(&mut *self.lock());
        let mut executed = 0;
        let mut failed = 0;
        for action in batch {
            match catch_unwind(AssertUnwindSafe(|| run(action))) {
                Ok(()) => executed += 1,
                Err(_) => failed += 1,
            }
        }
        DrainReport::Drained { executed, failed }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<DeferredAction>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
