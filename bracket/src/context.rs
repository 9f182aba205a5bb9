//! Ambient hook context passed to every setup and teardown.
//!
//! Host frameworks build a [`HookContext`] each time they run a hook and hand
//! it to the registered handler. The binder forwards it to the sequence, so a
//! descriptor can introspect which hook is running and for which test.

use std::fmt;
use std::sync::Arc;

use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Label used for a before hook registered without a name.
pub const DEFAULT_BEFORE_LABEL: &str = "beforeFn";

/// Label used for an after hook registered without a name.
pub const DEFAULT_AFTER_LABEL: &str = "afterFn";

/// A descriptive hook name.
///
/// `HookName` values are trimmed, non-empty and at most 255 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct HookName(String);

/// The four hook points a host framework offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    /// Runs once before the tests of a group
    BeforeAll,
    /// Runs once after the tests of a group
    AfterAll,
    /// Runs before every test
    BeforeEach,
    /// Runs after every test
    AfterEach,
}

impl HookKind {
    /// Whether this hook opens a scope (as opposed to closing one).
    pub const fn is_before(self) -> bool {
        matches!(self, Self::BeforeAll | Self::BeforeEach)
    }

    /// The human readable name used in hook titles.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeforeAll => "before all",
            Self::AfterAll => "after all",
            Self::BeforeEach => "before each",
            Self::AfterEach => "after each",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the hook currently running.
///
/// Cheap to clone; all strings are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookContext {
    kind: HookKind,
    label: Arc<str>,
    test_title: Option<Arc<str>>,
    group_title: Option<Arc<str>>,
}

impl HookContext {
    /// Creates a context for a hook of the given kind and label.
    pub fn new(kind: HookKind, label: impl Into<Arc<str>>) -> Self {
        Self {
            kind,
            label: label.into(),
            test_title: None,
            group_title: None,
        }
    }

    /// Sets the title of the test the hook runs for.
    #[must_use]
    pub fn for_test(mut self, title: impl Into<Arc<str>>) -> Self {
        self.test_title = Some(title.into());
        self
    }

    /// Sets the title of the group the hook was registered in.
    #[must_use]
    pub fn in_group(mut self, title: impl Into<Arc<str>>) -> Self {
        self.group_title = Some(title.into());
        self
    }

    /// The hook kind.
    pub const fn kind(&self) -> HookKind {
        self.kind
    }

    /// The label the hook was registered with.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Title of the test this hook runs for, if any.
    pub fn test_title(&self) -> Option<&str> {
        self.test_title.as_deref()
    }

    /// Title of the group the hook belongs to, if any.
    pub fn group_title(&self) -> Option<&str> {
        self.group_title.as_deref()
    }

    /// Human readable hook title, e.g. `"before all" hook: db for "should X"`.
    pub fn title(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HookContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" hook: {}", self.kind, self.label)?;
        if let Some(test) = &self.test_title {
            write!(f, " for \"{test}\"")?;
        }
        Ok(())
    }
}
