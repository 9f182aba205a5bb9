//! Serialized execution of a group tree.
//!
//! Panics in hooks and test bodies are caught and recorded like returned
//! errors, so the after hooks behind them still release their fixtures.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use bracket::{Hook, HookContext, HookKind};
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::RunnerConfig;
use crate::errors::RunError;
use crate::report::{Outcome, OutcomeKind, RunReport, Status};
use crate::suite::{Group, TestCase, TestContext};

pub struct Runner {
    config: RunnerConfig,
    report: RunReport,
    bailed: bool,
}

fn each_context(kind: HookKind, label: &str, group: &Group, test: &TestCase) -> HookContext {
    HookContext::new(kind, label)
        .in_group(group.title())
        .for_test(test.title.as_str())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

fn extend(path: &[String], title: &str) -> Vec<String> {
    let mut path = path.to_vec();
    if !title.is_empty() {
        path.push(title.to_string());
    }
    path
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            report: RunReport::default(),
            bailed: false,
        }
    }

    pub async fn run(mut self, root: &Group) -> RunReport {
        let span = info_span!("suite", title = %root.title(), tests = root.test_count());
        async move {
            let path = extend(&[], root.title());
            self.run_group(root, &[], path).await;
            let summary = self.report.summary();
            info!(
                passing = summary.passing,
                failing = summary.failing,
                skipped = summary.skipped,
                "run finished"
            );
            self.report
        }
        .instrument(span)
        .await
    }

    /// Runs one group and returns the title of the last test it executed.
    fn run_group<'a>(
        &'a mut self,
        group: &'a Group,
        enclosing: &'a [&'a Group],
        path: Vec<String>,
    ) -> BoxFuture<'a, Option<String>> {
        let span = info_span!("group", title = %group.title());
        async move {
            if group.test_count() == 0 {
                debug!("no tests, skipping group and its hooks");
                return None;
            }
            if self.bailed {
                self.skip_tests(group, &path);
                return None;
            }

            let mut chain = enclosing.to_vec();
            chain.push(group);
            let first = group.first_test_title().map(str::to_owned);
            let mut last = None;

            if self
                .run_hooks(group, HookKind::BeforeAll, first.as_deref(), &path)
                .await
            {
                let mut aborted = false;
                for test in &group.tests {
                    if aborted || self.bailed {
                        self.report
                            .record(Outcome::skipped(extend(&path, &test.title)));
                        continue;
                    }
                    last = Some(test.title.clone());
                    aborted = !self.run_test(test, &chain, &path).await;
                }
                for child in &group.children {
                    let child_path = extend(&path, child.title());
                    if aborted {
                        self.skip_tests(child, &child_path);
                        continue;
                    }
                    if let Some(title) = self.run_group(child, &chain, child_path).await {
                        last = Some(title);
                    }
                }
            } else {
                self.skip_tests(group, &path);
            }

            let after_title = last.clone().or(first);
            self.run_hooks(group, HookKind::AfterAll, after_title.as_deref(), &path)
                .await;
            last
        }
        .instrument(span)
        .boxed()
    }

    /// Runs the group-level hooks of one kind.
    ///
    /// Before hooks stop at the first failure and return false. After hooks
    /// all run regardless.
    async fn run_hooks(
        &mut self,
        group: &Group,
        kind: HookKind,
        test_title: Option<&str>,
        path: &[String],
    ) -> bool {
        let mut ok = true;
        for registered in group.hooks(kind) {
            let mut cx = HookContext::new(kind, registered.label.as_str()).in_group(group.title());
            if let Some(title) = test_title {
                cx = cx.for_test(title);
            }
            if let Err(error) = self.invoke_hook(&cx, &registered.hook).await {
                warn!(hook = %cx, %error, "hook failed");
                self.report.record(Outcome::failed(
                    extend(path, &cx.title()),
                    OutcomeKind::Hook(kind),
                    error,
                ));
                self.note_failure();
                ok = false;
                if kind.is_before() {
                    break;
                }
            }
        }
        ok
    }

    /// Runs one test with its each-test hooks.
    ///
    /// Returns false when a `before each` hook failed, which skips the rest
    /// of the group.
    async fn run_test(&mut self, test: &TestCase, chain: &[&Group], path: &[String]) -> bool {
        let test_path = extend(path, &test.title);
        let span = info_span!("test", title = %test.title);
        async move {
            let mut hook_error = None;
            'before: for group in chain {
                for registered in &group.before_each {
                    let cx = each_context(HookKind::BeforeEach, &registered.label, group, test);
                    if let Err(error) = self.invoke_hook(&cx, &registered.hook).await {
                        hook_error = Some(error);
                        break 'before;
                    }
                }
            }
            let before_ok = hook_error.is_none();

            let outcome = match hook_error {
                Some(error) => {
                    warn!(%error, "before each hook failed, test not run");
                    Outcome::failed(test_path.clone(), OutcomeKind::Test, error)
                }
                None => match self.invoke_test(test, TestContext::new(test_path.clone())).await {
                    Ok(()) => {
                        info!("test passed");
                        Outcome::passed(test_path.clone())
                    }
                    Err(error) => {
                        warn!(%error, "test failed");
                        Outcome::failed(test_path.clone(), OutcomeKind::Test, error)
                    }
                },
            };
            if outcome.status == Status::Failed {
                self.note_failure();
            }
            self.report.record(outcome);

            for group in chain.iter().rev() {
                for registered in &group.after_each {
                    let cx = each_context(HookKind::AfterEach, &registered.label, group, test);
                    if let Err(error) = self.invoke_hook(&cx, &registered.hook).await {
                        warn!(hook = %cx, %error, "hook failed");
                        self.report.record(Outcome::failed(
                            extend(path, &cx.title()),
                            OutcomeKind::Hook(HookKind::AfterEach),
                            error,
                        ));
                        self.note_failure();
                    }
                }
            }
            before_ok
        }
        .instrument(span)
        .await
    }

    async fn invoke_hook(&self, cx: &HookContext, hook: &Hook) -> Result<(), RunError> {
        let title = cx.title();
        debug!(hook = %title, "running hook");
        let (hook, cx) = (Arc::clone(hook), cx.clone());
        let running = AssertUnwindSafe(async move { (*hook)(cx).await }).catch_unwind();
        let finished = match self.config.hook_timeout {
            Some(limit) => tokio::time::timeout(limit.as_duration(), running)
                .await
                .map_err(|_| RunError::HookTimedOut {
                    title: title.clone(),
                    timeout_ms: limit.into(),
                })?,
            None => running.await,
        };
        match finished {
            Ok(result) => result.map_err(|source| RunError::Hook { title, source }),
            Err(payload) => Err(RunError::HookPanicked {
                title,
                message: panic_message(&*payload),
            }),
        }
    }

    async fn invoke_test(&self, test: &TestCase, t: TestContext) -> Result<(), RunError> {
        let title = test.title.clone();
        let body = Arc::clone(&test.body);
        let running = AssertUnwindSafe(async move { (*body)(t).await }).catch_unwind();
        let finished = match self.config.test_timeout {
            Some(limit) => tokio::time::timeout(limit.as_duration(), running)
                .await
                .map_err(|_| RunError::TestTimedOut {
                    title: title.clone(),
                    timeout_ms: limit.into(),
                })?,
            None => running.await,
        };
        match finished {
            Ok(result) => result.map_err(|source| RunError::Test { title, source }),
            Err(payload) => Err(RunError::TestPanicked {
                title,
                message: panic_message(&*payload),
            }),
        }
    }

    fn skip_tests(&mut self, group: &Group, path: &[String]) {
        for test in &group.tests {
            self.report.record(Outcome::skipped(extend(path, &test.title)));
        }
        for child in &group.children {
            let child_path = extend(path, child.title());
            self.skip_tests(child, &child_path);
        }
    }

    fn note_failure(&mut self) {
        if self.config.bail && !self.bailed {
            warn!("bailing out after the first failure");
            self.bailed = true;
        }
    }
}
