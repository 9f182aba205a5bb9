//! Error types for bracket.
//!
//! Three kinds of failure can come out of a binding, and they are kept apart
//! so that callers (and host frameworks) can tell them apart:
//!
//! - **Protocol violation**: a sequence yielded zero times on its first
//!   advance, or yielded again on its second advance.
//! - **Setup / teardown failure**: the user-supplied operation failed during
//!   one of the two phases. The original error is kept as the `source`.
//! - **Out-of-scope access**: the accessor was called while the binding had no
//!   value in scope.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use bracket::errors::FixtureError;
//!
//! match fixture.get() {
//!     Ok(value) => use_value(&value),
//!     Err(FixtureError::OutOfScope { .. }) => {
//!         // called from a hook that runs before the fixture is created
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use std::fmt;

use thiserror::Error;

use crate::binder::Phase;
use crate::context::HookName;

/// Boxed error used for user-supplied setup and teardown failures and as the
/// payload of the hook-failure channel.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which half of the two-phase sequence an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequencePhase {
    /// The first advance, run from the before hook.
    Setup,
    /// The second advance, run from the after hook.
    Teardown,
}

impl fmt::Display for SequencePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => f.write_str("setup"),
            Self::Teardown => f.write_str("teardown"),
        }
    }
}

/// Label used in error messages to identify which binding failed.
///
/// Unnamed bindings render as `<anonymous>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FixtureLabel(Option<HookName>);

impl FixtureLabel {
    /// Creates a label from an optional hook name.
    pub const fn new(name: Option<HookName>) -> Self {
        Self(name)
    }

    /// The underlying name, if the binding was named.
    pub const fn name(&self) -> Option<&HookName> {
        self.0.as_ref()
    }
}

impl fmt::Display for FixtureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(name) => write!(f, "{name}"),
            None => f.write_str("<anonymous>"),
        }
    }
}

/// Errors raised by a fixture binding.
///
/// # Error Handling Strategy
///
/// - **ProtocolViolation**: fix the sequence; it must yield exactly once
/// - **SetupFailed / TeardownFailed**: inspect `source`, the user operation failed
/// - **OutOfScope**: the accessor was used from the wrong place (a hook that
///   runs before creation, or code that outlives the test)
///
/// None of these are ever retried by the binder.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The sequence did not yield exactly once.
    #[error("Generator should yield exactly once (fixture {fixture}, during {phase})")]
    ProtocolViolation {
        /// The binding whose sequence misbehaved
        fixture: FixtureLabel,
        /// The advance on which the violation was detected
        phase: SequencePhase,
    },

    /// The setup operation failed.
    #[error("Setup of fixture {fixture} failed: {source}")]
    SetupFailed {
        /// The binding whose setup failed
        fixture: FixtureLabel,
        /// The error reported by the setup operation
        #[source]
        source: BoxError,
    },

    /// The teardown operation failed.
    #[error("Teardown of fixture {fixture} failed: {source}")]
    TeardownFailed {
        /// The binding whose teardown failed
        fixture: FixtureLabel,
        /// The error reported by the teardown operation
        #[source]
        source: BoxError,
    },

    /// The accessor was called while no value was in scope.
    #[error("Fixture {fixture} accessed outside of an active test scope (binding is {phase})")]
    OutOfScope {
        /// The binding that was accessed
        fixture: FixtureLabel,
        /// The phase the binding was in when accessed
        phase: Phase,
    },
}

impl FixtureError {
    /// Returns true for sequence protocol violations.
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::ProtocolViolation { .. })
    }

    /// Returns true for accessor misuse.
    pub const fn is_out_of_scope(&self) -> bool {
        matches!(self, Self::OutOfScope { .. })
    }

    /// The phase a protocol, setup or teardown error belongs to.
    pub const fn sequence_phase(&self) -> Option<SequencePhase> {
        match self {
            Self::ProtocolViolation { phase, .. } => Some(*phase),
            Self::SetupFailed { .. } => Some(SequencePhase::Setup),
            Self::TeardownFailed { .. } => Some(SequencePhase::Teardown),
            Self::OutOfScope { .. } => None,
        }
    }

    /// The label of the binding that raised this error.
    pub const fn fixture(&self) -> &FixtureLabel {
        match self {
            Self::ProtocolViolation { fixture, .. }
            | Self::SetupFailed { fixture, .. }
            | Self::TeardownFailed { fixture, .. }
            | Self::OutOfScope { fixture, .. } => fixture,
        }
    }
}

/// Type alias for fixture results
pub type FixtureResult<T> = Result<T, FixtureError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> FixtureLabel {
        FixtureLabel::new(Some(HookName::try_new(name).unwrap()))
    }

    #[test]
    fn protocol_violation_message_mentions_yield_count() {
        let err = FixtureError::ProtocolViolation {
            fixture: named("db"),
            phase: SequencePhase::Setup,
        };

        let message = err.to_string();
        assert!(message.contains("yield exactly once"));
        assert!(message.contains("db"));
        assert!(message.contains("setup"));
        assert!(err.is_protocol_violation());
        assert!(!err.is_out_of_scope());
    }

    #[test]
    fn out_of_scope_message_mentions_test_scope() {
        let err = FixtureError::OutOfScope {
            fixture: FixtureLabel::default(),
            phase: Phase::Unbound,
        };

        let message = err.to_string();
        assert!(message.contains("outside of an active test scope"));
        assert!(message.contains("<anonymous>"));
        assert_eq!(err.sequence_phase(), None);
    }

    #[test]
    fn setup_failure_keeps_source() {
        let err = FixtureError::SetupFailed {
            fixture: named("server"),
            source: "port already in use".into(),
        };

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("port already in use"));
        assert_eq!(err.sequence_phase(), Some(SequencePhase::Setup));
        assert_eq!(err.fixture(), &named("server"));
    }
}
