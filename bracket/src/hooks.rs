//! The seam between bracket and a host test framework.
//!
//! A host framework exposes four hook points. Bracket only ever registers
//! handlers into them; ordering, serialization and failure reporting stay
//! with the host.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::context::HookContext;
use crate::errors::BoxError;

/// Result of running a hook. An `Err` is a hook failure for the host.
pub type HookResult = Result<(), BoxError>;

/// A registered hook handler.
///
/// Shared so that hosts may keep a handler around for every test it applies
/// to (each-test hooks run many times).
pub type Hook = Arc<dyn Fn(HookContext) -> BoxFuture<'static, HookResult> + Send + Sync>;

/// Wraps an async closure into a [`Hook`].
///
/// ```rust,ignore
/// registry.before_all("log", hook_fn(|cx| async move {
///     tracing::info!(hook = %cx, "running");
///     Ok(())
/// }));
/// ```
pub fn hook_fn<F, Fut>(f: F) -> Hook
where
    F: Fn(HookContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HookResult> + Send + 'static,
{
    Arc::new(move |cx| f(cx).boxed())
}

/// Hook registration points offered by a host test framework.
///
/// `label` is the descriptive name the host shows for the hook; bracket always
/// supplies one.
pub trait HookRegistry {
    /// Registers a hook run once before the tests of the current group.
    fn before_all(&mut self, label: &str, hook: Hook);

    /// Registers a hook run once after the tests of the current group.
    fn after_all(&mut self, label: &str, hook: Hook);

    /// Registers a hook run before every test of the current group.
    fn before_each(&mut self, label: &str, hook: Hook);

    /// Registers a hook run after every test of the current group.
    fn after_each(&mut self, label: &str, hook: Hook);
}

impl<R: HookRegistry + ?Sized> HookRegistry for &mut R {
    fn before_all(&mut self, label: &str, hook: Hook) {
        (**self).before_all(label, hook);
    }

    fn after_all(&mut self, label: &str, hook: Hook) {
        (**self).after_all(label, hook);
    }

    fn before_each(&mut self, label: &str, hook: Hook) {
        (**self).before_each(label, hook);
    }

    fn after_each(&mut self, label: &str, hook: Hook) {
        (**self).after_each(label, hook);
    }
}

/// How long a binding keeps its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Created before the first test of a group, destroyed after the last.
    Group,
    /// Created before and destroyed after every single test.
    EachTest,
}

impl Scope {
    /// Registers a before/after pair at this scope's hook points.
    pub fn register<R>(self, registry: &mut R, labels: (&str, &str), hooks: (Hook, Hook))
    where
        R: HookRegistry + ?Sized,
    {
        let (before_label, after_label) = labels;
        let (before, after) = hooks;
        match self {
            Self::Group => {
                registry.before_all(before_label, before);
                registry.after_all(after_label, after);
            }
            Self::EachTest => {
                registry.before_each(before_label, before);
                registry.after_each(after_label, after);
            }
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Group => f.write_str("group"),
            Self::EachTest => f.write_str("each-test"),
        }
    }
}
