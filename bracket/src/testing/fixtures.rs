//! Common test descriptors and sequences.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::HookContext;
use crate::descriptor::ResourceDescriptor;
use crate::errors::BoxError;
use crate::sequence::{Step, TwoPhase};
use crate::testing::assertions::CallCounter;

/// A descriptor yielding `seed`, `seed + 1`, ... on successive creations.
///
/// The setup suspends once before producing its value, so it exercises the
/// asynchronous path of a binding.
pub fn natural_numbers(seed: u64) -> ResourceDescriptor<u64> {
    let next = Arc::new(AtomicU64::new(seed));
    ResourceDescriptor::from_async(move |_cx| {
        let next = Arc::clone(&next);
        async move {
            tokio::task::yield_now().await;
            Ok::<_, BoxError>(next.fetch_add(1, Ordering::SeqCst))
        }
    })
}

/// A descriptor that records creations on `create` and destructions on
/// `destroy`, yielding `"ok"`.
pub fn counted(create: &CallCounter, destroy: &CallCounter) -> ResourceDescriptor<&'static str> {
    let create = create.clone();
    let destroy = destroy.clone();
    ResourceDescriptor::from_async_pair(
        move |_cx| {
            create.call();
            async { Ok::<_, BoxError>("ok") }
        },
        move |_cx, _value| {
            destroy.call();
            async { Ok::<_, BoxError>(()) }
        },
    )
}

/// A sequence that replays a fixed script.
///
/// Each advance pops the next step: `Some(value)` yields, `None` completes.
/// Once the script is exhausted every advance completes. This makes it easy
/// to build sequences that yield zero times or more than once.
#[derive(Debug)]
pub struct Scripted<A> {
    steps: VecDeque<Option<A>>,
    advances: usize,
}

impl<A> Scripted<A> {
    /// Creates a sequence from its steps.
    pub fn new(steps: impl IntoIterator<Item = Option<A>>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            advances: 0,
        }
    }

    /// A well-behaved script: one yield.
    pub fn once(value: A) -> Self {
        Self::new([Some(value)])
    }

    /// Number of times the sequence has been advanced.
    pub const fn advances(&self) -> usize {
        self.advances
    }
}

#[async_trait]
impl<A> TwoPhase<A> for Scripted<A>
where
    A: Send + 'static,
{
    async fn advance(&mut self, _cx: &HookContext) -> Result<Step<A>, BoxError> {
        self.advances += 1;
        Ok(match self.steps.pop_front().flatten() {
            Some(value) => Step::yielded(value),
            None => Step::Complete,
        })
    }
}
