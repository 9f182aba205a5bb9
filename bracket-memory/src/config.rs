//! Runner configuration.
//!
//! Timeouts use `nutype` validation so an out-of-range value can never reach
//! the runner.

use std::time::Duration;

use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Hook timeout in milliseconds.
///
/// Validated to be between 1 millisecond and 10 minutes.
#[nutype(
    validate(greater_or_equal = 1, less_or_equal = 600_000),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct HookTimeoutMs(u64);

impl HookTimeoutMs {
    /// Convert to `Duration` for use with `tokio::time::timeout`.
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.into())
    }
}

/// Test body timeout in milliseconds.
///
/// Validated to be between 1 millisecond and 10 minutes.
#[nutype(
    validate(greater_or_equal = 1, less_or_equal = 600_000),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct TestTimeoutMs(u64);

impl TestTimeoutMs {
    /// Convert to `Duration` for use with `tokio::time::timeout`.
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.into())
    }
}

/// How a suite is run.
///
/// The default has no timeouts and keeps going after failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Limit for every hook invocation
    pub hook_timeout: Option<HookTimeoutMs>,
    /// Limit for every test body
    pub test_timeout: Option<TestTimeoutMs>,
    /// Skip everything after the first failure
    pub bail: bool,
}

impl RunnerConfig {
    /// Sets the hook timeout.
    #[must_use]
    pub const fn with_hook_timeout(mut self, timeout: HookTimeoutMs) -> Self {
        self.hook_timeout = Some(timeout);
        self
    }

    /// Sets the test timeout.
    #[must_use]
    pub const fn with_test_timeout(mut self, timeout: TestTimeoutMs) -> Self {
        self.test_timeout = Some(timeout);
        self
    }

    /// Stops running tests after the first failure.
    #[must_use]
    pub const fn with_bail(mut self, bail: bool) -> Self {
        self.bail = bail;
        self
    }
}
