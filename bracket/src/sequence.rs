//! The two-phase sequence protocol.
//!
//! A sequence is advanced exactly twice by a binding: the first advance
//! creates the resource and must report [`Step::Yielded`]; the second tears
//! it down and must report [`Step::Complete`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::HookContext;
use crate::errors::BoxError;

/// Outcome of advancing a sequence.
pub enum Step<A> {
    /// The sequence produced its value.
    Yielded(Arc<A>),
    /// The sequence has finished.
    Complete,
}

impl<A> Step<A> {
    /// Convenience constructor for a yielded value.
    pub fn yielded(value: A) -> Self {
        Self::Yielded(Arc::new(value))
    }

    /// Returns true if the sequence has finished.
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl<A> fmt::Debug for Step<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yielded(_) => f.write_str("Yielded(..)"),
            Self::Complete => f.write_str("Complete"),
        }
    }
}

/// A running two-phase sequence.
///
/// Implement this directly when the resource needs full control over both
/// phases; otherwise build a descriptor from a setup/teardown pair.
///
/// # Example
/// ```rust
/// use bracket::{BoxError, HookContext, Step, TwoPhase};
///
/// struct TempDir {
///     created: bool,
/// }
///
/// #[async_trait::async_trait]
/// impl TwoPhase<String> for TempDir {
///     async fn advance(&mut self, _cx: &HookContext) -> Result<Step<String>, BoxError> {
///         if self.created {
///             // remove the directory here
///             Ok(Step::Complete)
///         } else {
///             self.created = true;
///             Ok(Step::yielded("/tmp/fixture".to_string()))
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait TwoPhase<A>: Send {
    /// Runs the sequence up to its next suspension point.
    async fn advance(&mut self, cx: &HookContext) -> Result<Step<A>, BoxError>;
}

#[async_trait]
impl<A, S> TwoPhase<A> for Box<S>
where
    S: TwoPhase<A> + ?Sized,
    A: 'static,
{
    async fn advance(&mut self, cx: &HookContext) -> Result<Step<A>, BoxError> {
        (**self).advance(cx).await
    }
}
