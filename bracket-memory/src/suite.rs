//! Suites, groups and tests.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bracket::{BoxError, Hook, HookKind, HookRegistry};
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::config::RunnerConfig;
use crate::report::RunReport;
use crate::runner::Runner;

/// Result of a test body.
pub type TestResult = Result<(), BoxError>;

pub(crate) type TestBody = Arc<dyn Fn(TestContext) -> BoxFuture<'static, TestResult> + Send + Sync>;

/// What a test body knows about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestContext {
    title: Arc<str>,
    title_path: Arc<[String]>,
}

impl TestContext {
    pub(crate) fn new(title_path: Vec<String>) -> Self {
        let title = title_path.last().map_or("", String::as_str).into();
        Self {
            title,
            title_path: title_path.into(),
        }
    }

    /// The test's own title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Group titles from the suite down, ending with the test title.
    pub fn title_path(&self) -> &[String] {
        &self.title_path
    }

    /// All titles joined with spaces.
    pub fn full_title(&self) -> String {
        self.title_path.join(" ")
    }
}

pub(crate) struct TestCase {
    pub(crate) title: String,
    pub(crate) body: TestBody,
}

pub(crate) struct RegisteredHook {
    pub(crate) label: String,
    pub(crate) hook: Hook,
}

/// A `describe` block: hooks, tests and nested groups.
///
/// Hooks registered on a group apply to every test below it. `Group`
/// implements [`HookRegistry`], so bindings attach to it directly:
///
/// ```rust,ignore
/// suite.describe("orders", |g| {
///     let db = bind_before(g, database());
///     g.it("inserts", move |_t| { let db = db.clone(); async move { ... } });
/// });
/// ```
#[derive(Default)]
pub struct Group {
    pub(crate) title: String,
    pub(crate) before_all: Vec<RegisteredHook>,
    pub(crate) after_all: Vec<RegisteredHook>,
    pub(crate) before_each: Vec<RegisteredHook>,
    pub(crate) after_each: Vec<RegisteredHook>,
    pub(crate) tests: Vec<TestCase>,
    pub(crate) children: Vec<Group>,
}

impl Group {
    /// Creates an empty group.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// The group title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Adds a nested group, filled in by `build`.
    pub fn describe(&mut self, title: impl Into<String>, build: impl FnOnce(&mut Self)) -> &mut Self {
        let mut child = Self::new(title);
        build(&mut child);
        self.children.push(child);
        self
    }

    /// Adds a test.
    pub fn it<F, Fut>(&mut self, title: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TestResult> + Send + 'static,
    {
        self.tests.push(TestCase {
            title: title.into(),
            body: Arc::new(move |t| body(t).boxed()),
        });
        self
    }

    /// Number of tests in this group and every group below it.
    pub fn test_count(&self) -> usize {
        self.tests.len() + self.children.iter().map(Self::test_count).sum::<usize>()
    }

    pub(crate) fn first_test_title(&self) -> Option<&str> {
        self.tests
            .first()
            .map(|test| test.title.as_str())
            .or_else(|| self.children.iter().find_map(Self::first_test_title))
    }

    pub(crate) fn hooks(&self, kind: HookKind) -> &[RegisteredHook] {
        match kind {
            HookKind::BeforeAll => &self.before_all,
            HookKind::AfterAll => &self.after_all,
            HookKind::BeforeEach => &self.before_each,
            HookKind::AfterEach => &self.after_each,
        }
    }

    fn push(&mut self, kind: HookKind, label: &str, hook: Hook) {
        let hooks = match kind {
            HookKind::BeforeAll => &mut self.before_all,
            HookKind::AfterAll => &mut self.after_all,
            HookKind::BeforeEach => &mut self.before_each,
            HookKind::AfterEach => &mut self.after_each,
        };
        hooks.push(RegisteredHook {
            label: label.to_string(),
            hook,
        });
    }
}

impl HookRegistry for Group {
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

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = |hooks: &[RegisteredHook]| -> Vec<String> {
            hooks.iter().map(|h| h.label.clone()).collect()
        };
        let tests: Vec<_> = self.tests.iter().map(|t| t.title.as_str()).collect();
        f.debug_struct("Group")
            .field("title", &self.title)
            .field("before_all", &labels(&self.before_all))
            .field("after_all", &labels(&self.after_all))
            .field("before_each", &labels(&self.before_each))
            .field("after_each", &labels(&self.after_each))
            .field("tests", &tests)
            .field("children", &self.children)
            .finish()
    }
}

/// A test suite: a root group plus the configuration it runs with.
#[derive(Debug)]
pub struct Suite {
    root: Group,
    config: RunnerConfig,
}

impl Suite {
    /// Creates a suite with the default configuration.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            root: Group::new(title),
            config: RunnerConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// The root group. Hooks and tests added here apply to the whole suite.
    pub fn root(&mut self) -> &mut Group {
        &mut self.root
    }

    /// Adds a top-level group.
    pub fn describe(&mut self, title: impl Into<String>, build: impl FnOnce(&mut Group)) -> &mut Self {
        self.root.describe(title, build);
        self
    }

    /// Adds a top-level test.
    pub fn it<F, Fut>(&mut self, title: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TestResult> + Send + 'static,
    {
        self.root.it(title, body);
        self
    }

    /// The configuration the suite runs with.
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs every test, one at a time, and reports the outcomes.
    ///
    /// A suite may be run more than once; bindings re-create their values on
    /// every run.
    pub async fn run(&self) -> RunReport {
        Runner::new(self.config).run(&self.root).await
    }
}

impl HookRegistry for Suite {
    fn before_all(&mut self, label: &str, hook: Hook) {
        self.root.before_all(label, hook);
    }

    fn after_all(&mut self, label: &str, hook: Hook) {
        self.root.after_all(label, hook);
    }

    fn before_each(&mut self, label: &str, hook: Hook) {
        self.root.before_each(label, hook);
    }

    fn after_each(&mut self, label: &str, hook: Hook) {
        self.root.after_each(label, hook);
    }
}
