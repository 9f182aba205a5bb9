//! Counting stubs and call-count assertions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A clonable call counter.
///
/// All clones share one count, so a counter can be moved into setup and
/// teardown closures while the test keeps a handle to assert on.
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    calls: Arc<AtomicUsize>,
}

impl CallCounter {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a call and returns the count before it.
    pub fn call(&self) -> usize {
        self.calls.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Panics unless the counter was never called.
    #[track_caller]
    pub fn assert_not_called(&self) {
        self.assert_called_times(0);
    }

    /// Panics unless the counter was called exactly once.
    #[track_caller]
    pub fn assert_called_once(&self) {
        self.assert_called_times(1);
    }

    /// Panics unless the counter was called exactly twice.
    #[track_caller]
    pub fn assert_called_twice(&self) {
        self.assert_called_times(2);
    }

    /// Panics unless the counter was called exactly `expected` times.
    #[track_caller]
    pub fn assert_called_times(&self, expected: usize) {
        let actual = self.count();
        assert!(
            actual == expected,
            "expected {expected} call(s), but counter was called {actual} time(s)"
        );
    }
}
