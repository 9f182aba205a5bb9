//! Setup/teardown pairs normalized into a two-phase sequence.
//!
//! Every pair-based descriptor variant (async, sync, callback) ends up as a
//! [`Bracketed`] sequence, so they all share one protocol-compliant state
//! machine: `Fresh -> Yielded -> Finished`.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::context::HookContext;
use crate::errors::BoxError;
use crate::sequence::{Step, TwoPhase};

/// Normalized async setup.
pub type SetupFn<A> =
    Arc<dyn Fn(HookContext) -> BoxFuture<'static, Result<A, BoxError>> + Send + Sync>;

/// Normalized async teardown.
pub type TeardownFn<A> =
    Arc<dyn Fn(HookContext, Arc<A>) -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

enum PairState<A> {
    Fresh,
    Yielded(Arc<A>),
    Finished,
}

pub struct Bracketed<A> {
    setup: SetupFn<A>,
    teardown: Option<TeardownFn<A>>,
    state: PairState<A>,
}

impl<A> Bracketed<A> {
    pub const fn new(setup: SetupFn<A>, teardown: Option<TeardownFn<A>>) -> Self {
        Self {
            setup,
            teardown,
            state: PairState::Fresh,
        }
    }
}

#[async_trait]
impl<A> TwoPhase<A> for Bracketed<A>
where
    A: Send + Sync + 'static,
{
    async fn advance(&mut self, cx: &HookContext) -> Result<Step<A>, BoxError> {
        // A failing phase leaves the sequence finished.
        match std::mem::replace(&mut self.state, PairState::Finished) {
            PairState::Fresh => {
                let value = Arc::new((self.setup)(cx.clone()).await?);
                self.state = PairState::Yielded(Arc::clone(&value));
                Ok(Step::Yielded(value))
            }
            PairState::Yielded(value) => {
                if let Some(teardown) = &self.teardown {
                    teardown(cx.clone(), value).await?;
                }
                Ok(Step::Complete)
            }
            PairState::Finished => Ok(Step::Complete),
        }
    }
}
