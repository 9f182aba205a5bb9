//! A manual hook registry for driving bindings by hand.
//!
//! [`ManualHost`] records every hook registered with it and runs them only
//! when asked, which makes it possible to step a binding through its
//! lifecycle one hook at a time and observe the phase in between.

use std::fmt;

use crate::context::{HookContext, HookKind};
use crate::hooks::{Hook, HookRegistry, HookResult};

/// A [`HookRegistry`] whose hooks are fired explicitly.
///
/// # Example
/// ```rust,ignore
/// let mut host = ManualHost::new();
/// let db = bind_before_each(&mut host, database());
///
/// host.fire(HookKind::BeforeEach, Some("inserts a row")).await?;
/// db.get()?.insert(row)?;
/// host.fire(HookKind::AfterEach, Some("inserts a row")).await?;
/// ```
#[derive(Default)]
pub struct ManualHost {
    group: Option<String>,
    hooks: Vec<(HookKind, String, Hook)>,
}

impl ManualHost {
    /// Creates an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the group title reported in hook contexts.
    #[must_use]
    pub fn in_group(mut self, title: impl Into<String>) -> Self {
        self.group = Some(title.into());
        self
    }

    /// Labels of the hooks registered for `kind`, in registration order.
    pub fn registered(&self, kind: HookKind) -> Vec<&str> {
        self.hooks
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .map(|(_, label, _)| label.as_str())
            .collect()
    }

    /// Runs every hook of `kind` in registration order, as if for the test
    /// titled `test_title`. Stops at the first failure.
    pub async fn fire(&self, kind: HookKind, test_title: Option<&str>) -> HookResult {
        for (_, label, hook) in self.hooks.iter().filter(|(k, _, _)| *k == kind) {
            let mut cx = HookContext::new(kind, label.as_str());
            if let Some(title) = test_title {
                cx = cx.for_test(title);
            }
            if let Some(group) = &self.group {
                cx = cx.in_group(group.as_str());
            }
            (**hook)(cx).await?;
        }
        Ok(())
    }

    fn push(&mut self, kind: HookKind, label: &str, hook: Hook) {
        self.hooks.push((kind, label.to_string(), hook));
    }
}

impl fmt::Debug for ManualHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks: Vec<_> = self
            .hooks
            .iter()
            .map(|(kind, label, _)| format!("{kind}: {label}"))
            .collect();
        f.debug_struct("ManualHost")
            .field("group", &self.group)
            .field("hooks", &hooks)
            .finish()
    }
}

impl HookRegistry for ManualHost {
    fn before_all(&mut self, label: &str, hook: Hook) {
        self.push(HookKind::BeforeAll, label, hook);
    }

    fn after_all(&mut self, label: &str, hook: Hook) {
        self.push(HookKind::AfterAll, label, hook);
    }

    fn before_each(&mut self, label: &str, hook: Hook) {
        self.push(HookKind::BeforeEach, label, hook);
    }

    fn after_each(&mut self, label: &str, hook: Hook) {
        self.push(HookKind::AfterEach, label, hook);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BoxError;
    use crate::hooks::hook_fn;
    use crate::testing::CallCounter;
    use std::sync::Arc;

    #[tokio::test]
    async fn fire_passes_labels_and_titles() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut host = ManualHost::new().in_group("suite");
        for label in ["one", "two"] {
            let seen = Arc::clone(&seen);
            host.before_each(
                label,
                hook_fn(move |cx| {
                    seen.lock().push((cx.title(), cx.group_title().map(str::to_owned)));
                    async { Ok::<_, BoxError>(()) }
                }),
            );
        }

        host.fire(HookKind::BeforeEach, Some("works")).await.unwrap();
        host.fire(HookKind::AfterEach, Some("works")).await.unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "\"before each\" hook: one for \"works\"");
        assert_eq!(seen[1].0, "\"before each\" hook: two for \"works\"");
        assert_eq!(seen[0].1.as_deref(), Some("suite"));
    }

    #[tokio::test]
    async fn fire_stops_at_first_failure() {
        let later = CallCounter::new();
        let mut host = ManualHost::new();
        host.after_all(
            "fails",
            hook_fn(|_cx| async { Err::<(), BoxError>("nope".into()) }),
        );
        let counter = later.clone();
        host.after_all(
            "never",
            hook_fn(move |_cx| {
                counter.call();
                async { Ok::<_, BoxError>(()) }
            }),
        );

        let err = host.fire(HookKind::AfterAll, None).await.unwrap_err();
        assert_eq!(err.to_string(), "nope");
        later.assert_not_called();
        assert_eq!(host.registered(HookKind::AfterAll), vec!["fails", "never"]);
    }
}
