//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::Once;

use bracket::{hook_fn, BoxError, Hook};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a fmt subscriber once per test binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Turns a failed check into a hook or test error instead of a panic, so the
/// runner records it.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), BoxError> {
    if condition {
        Ok(())
    } else {
        let message: String = message.into();
        Err(message.into())
    }
}

/// A hook that evaluates `check` every time it runs.
pub fn checking<F>(check: F) -> Hook
where
    F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
{
    hook_fn(move |_cx| {
        let result = check();
        async move { result }
    })
}
