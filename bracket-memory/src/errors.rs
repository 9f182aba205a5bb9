//! Failures recorded by the runner.

use bracket::{BoxError, FixtureError};
use thiserror::Error;

/// Why a hook or test did not pass.
#[derive(Debug, Error)]
pub enum RunError {
    /// A hook ran past the configured hook timeout.
    #[error("{title} timed out after {timeout_ms}ms")]
    HookTimedOut {
        /// Full hook title
        title: String,
        /// Configured limit
        timeout_ms: u64,
    },

    /// A test body ran past the configured test timeout.
    #[error("test \"{title}\" timed out after {timeout_ms}ms")]
    TestTimedOut {
        /// Test title
        title: String,
        /// Configured limit
        timeout_ms: u64,
    },

    /// A hook returned an error.
    #[error("{title} failed: {source}")]
    Hook {
        /// Full hook title
        title: String,
        /// Error returned by the hook
        #[source]
        source: BoxError,
    },

    /// A test body returned an error.
    #[error("test \"{title}\" failed: {source}")]
    Test {
        /// Test title
        title: String,
        /// Error returned by the body
        #[source]
        source: BoxError,
    },

    /// A hook panicked.
    #[error("{title} panicked: {message}")]
    HookPanicked {
        /// Full hook title
        title: String,
        /// Panic payload, when it was a string
        message: String,
    },

    /// A test body panicked, usually a failed assertion.
    #[error("test \"{title}\" panicked: {message}")]
    TestPanicked {
        /// Test title
        title: String,
        /// Panic payload, when it was a string
        message: String,
    },
}

impl RunError {
    /// True for failures raised by hooks rather than test bodies.
    pub const fn is_hook_failure(&self) -> bool {
        matches!(
            self,
            Self::Hook { .. } | Self::HookTimedOut { .. } | Self::HookPanicked { .. }
        )
    }

    /// True when the hook or body panicked instead of returning.
    pub const fn is_panic(&self) -> bool {
        matches!(self, Self::HookPanicked { .. } | Self::TestPanicked { .. })
    }

    /// True for either kind of timeout.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::HookTimedOut { .. } | Self::TestTimedOut { .. })
    }

    /// The fixture error behind this failure, if a binding raised it.
    ///
    /// Test bodies usually propagate `Fixture::get` errors with `?`, so the
    /// error is looked up through the boxed source.
    pub fn fixture_error(&self) -> Option<&FixtureError> {
        match self {
            Self::Hook { source, .. } | Self::Test { source, .. } => source.downcast_ref(),
            Self::HookTimedOut { .. }
            | Self::TestTimedOut { .. }
            | Self::HookPanicked { .. }
            | Self::TestPanicked { .. } => None,
        }
    }
}
