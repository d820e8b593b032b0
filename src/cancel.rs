//! Cancellation for a running search.
//!
//! A solver never gives up on its own. The owner of its lifetime (a page, a
//! task, a [`SolverHandle`](crate::SolverHandle)) raises a [`StopFlag`] and the
//! solver returns [`Error::Cancelled`](crate::Error::Cancelled) before its next
//! attempt. Raising is one-way; a flag cannot be lowered again.
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct StopFlag(AtomicBool);

impl StopFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Request that the search stop. Idempotent.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Checked by the solver once per attempt.
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn raise_is_visible_across_threads() {
        let flag = Arc::new(StopFlag::new());
        assert!(!flag.is_raised());
        let remote = flag.clone();
        std::thread::spawn(move || remote.raise()).join().unwrap();
        assert!(flag.is_raised());
    }

    #[test]
    fn raising_twice_keeps_it_raised() {
        let flag = StopFlag::default();
        flag.raise();
        flag.raise();
        assert!(flag.is_raised());
    }
}
