use std::sync::atomic::{AtomicBool, Ordering};

/// Set while the grabber itself is pushing an event back into the host.
///
/// Events that arrive while it is set are the grabber's own re-emissions and
/// must be left to the host's default handling.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    emitting: AtomicBool,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting.load(Ordering::Acquire)
    }

    /// Returns `None` when an emission is already in progress. The flag is
    /// cleared when the returned scope is dropped, including during unwinding.
    pub fn enter(&self) -> Option<EmissionScope<'_>> {
        self.emitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| EmissionScope { guard: self })
    }
}

#[must_use = "the guard is released as soon as the scope is dropped"]
#[derive(Debug)]
pub struct EmissionScope<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for EmissionScope<'_> {
    fn drop(&mut self) {
        self.guard.emitting.store(false, Ordering::Release);
    }
}
