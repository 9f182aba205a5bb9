//! Resource descriptors and their variant constructors.
//!
//! A [`ResourceDescriptor`] is an inert recipe: nothing runs until a binding
//! asks it for a fresh sequence. Every constructor funnels into the same
//! two-phase shape, so a binding never needs to know which calling convention
//! the resource was written in.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;

use crate::callback::{completion, Done};
use crate::context::HookContext;
use crate::errors::BoxError;
use crate::pair::{Bracketed, SetupFn, TeardownFn};
use crate::sequence::TwoPhase;

type Factory<A> = Arc<dyn Fn(&HookContext) -> Box<dyn TwoPhase<A>> + Send + Sync>;

/// Describes how to create and destroy a value of type `A`.
///
/// Descriptors are cheap to clone and may be bound any number of times; each
/// binding drives its own sequence instance.
///
/// # Example
/// ```rust
/// use bracket::ResourceDescriptor;
///
/// let numbers = ResourceDescriptor::from_sync_pair(
///     |_cx| Ok::<_, std::io::Error>(vec![1, 2, 3]),
///     |_cx, _numbers: &Vec<i32>| Ok::<_, std::io::Error>(()),
/// );
/// let _again = numbers.clone();
/// ```
pub struct ResourceDescriptor<A> {
    factory: Factory<A>,
}

impl<A> Clone for ResourceDescriptor<A> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<A> fmt::Debug for ResourceDescriptor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor").finish_non_exhaustive()
    }
}

impl<A> ResourceDescriptor<A>
where
    A: Send + Sync + 'static,
{
    /// Builds a descriptor from a function returning a two-phase sequence.
    pub fn from_sequence<F, S>(make: F) -> Self
    where
        F: Fn(&HookContext) -> S + Send + Sync + 'static,
        S: TwoPhase<A> + 'static,
    {
        let factory: Factory<A> =
            Arc::new(move |cx: &HookContext| -> Box<dyn TwoPhase<A>> { Box::new(make(cx)) });
        Self { factory }
    }

    /// Builds a descriptor from an async setup with no teardown.
    pub fn from_async<F, Fut, E>(setup: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<A, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::from_pair(async_setup(setup), None)
    }

    /// Builds a descriptor from an async setup and teardown.
    ///
    /// The teardown receives the value produced by setup and only runs when
    /// the binding leaves scope.
    pub fn from_async_pair<F, Fut, E, T, TFut, TE>(setup: F, teardown: T) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<A, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
        T: Fn(HookContext, Arc<A>) -> TFut + Send + Sync + 'static,
        TFut: Future<Output = Result<(), TE>> + Send + 'static,
        TE: Into<BoxError> + 'static,
    {
        let teardown: TeardownFn<A> = Arc::new(move |cx, value| {
            teardown(cx, value).map(|r| r.map_err(box_error)).boxed()
        });
        Self::from_pair(async_setup(setup), Some(teardown))
    }

    /// Builds a descriptor from a synchronous setup with no teardown.
    pub fn from_sync<F, E>(setup: F) -> Self
    where
        F: Fn(&HookContext) -> Result<A, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::from_pair(sync_setup(setup), None)
    }

    /// Builds a descriptor from a synchronous setup and teardown.
    pub fn from_sync_pair<F, E, T, TE>(setup: F, teardown: T) -> Self
    where
        F: Fn(&HookContext) -> Result<A, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
        T: Fn(&HookContext, &A) -> Result<(), TE> + Send + Sync + 'static,
        TE: Into<BoxError> + 'static,
    {
        let teardown: TeardownFn<A> = Arc::new(move |cx, value| {
            futures::future::ready(teardown(&cx, &*value).map_err(box_error)).boxed()
        });
        Self::from_pair(sync_setup(setup), Some(teardown))
    }

    /// Builds a descriptor from an error-first callback setup with no teardown.
    pub fn from_callback<F>(setup: F) -> Self
    where
        F: Fn(HookContext, Done<A>) + Send + Sync + 'static,
    {
        Self::from_pair(callback_setup(setup), None)
    }

    /// Builds a descriptor from error-first callback setup and teardown.
    pub fn from_callback_pair<F, T>(setup: F, teardown: T) -> Self
    where
        F: Fn(HookContext, Done<A>) + Send + Sync + 'static,
        T: Fn(HookContext, Arc<A>, Done<()>) + Send + Sync + 'static,
    {
        let teardown: TeardownFn<A> = Arc::new(move |cx, value| {
            let (done, pending) = completion();
            teardown(cx, value, done);
            pending.wait().boxed()
        });
        Self::from_pair(callback_setup(setup), Some(teardown))
    }

    fn from_pair(setup: SetupFn<A>, teardown: Option<TeardownFn<A>>) -> Self {
        Self::from_sequence(move |_cx| Bracketed::new(Arc::clone(&setup), teardown.clone()))
    }

    /// Creates a fresh, unstarted sequence.
    pub fn create(&self, cx: &HookContext) -> Box<dyn TwoPhase<A>> {
        (self.factory)(cx)
    }
}

fn box_error<E: Into<BoxError>>(error: E) -> BoxError {
    error.into()
}

fn async_setup<A, F, Fut, E>(setup: F) -> SetupFn<A>
where
    A: Send + 'static,
    F: Fn(HookContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<A, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    Arc::new(move |cx| setup(cx).map(|r| r.map_err(box_error)).boxed())
}

fn sync_setup<A, F, E>(setup: F) -> SetupFn<A>
where
    A: Send + 'static,
    F: Fn(&HookContext) -> Result<A, E> + Send + Sync + 'static,
    E: Into<BoxError> + 'static,
{
    Arc::new(move |cx| futures::future::ready(setup(&cx).map_err(box_error)).boxed())
}

fn callback_setup<A, F>(setup: F) -> SetupFn<A>
where
    A: Send + 'static,
    F: Fn(HookContext, Done<A>) + Send + Sync + 'static,
{
    Arc::new(move |cx| {
        let (done, pending) = completion();
        setup(cx, done);
        pending.wait().boxed()
    })
}
