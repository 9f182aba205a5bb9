//! Results of a suite run.

use std::fmt;
use std::sync::Arc;

use bracket::{FixtureError, HookKind};
use serde::Serialize;

use crate::errors::RunError;

/// What an outcome was recorded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "hook")]
pub enum OutcomeKind {
    /// A test body
    Test,
    /// A hook outside of any single test's result
    Hook(HookKind),
}

/// Final status of a test or hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Ran and succeeded
    Passed,
    /// Ran and failed
    Failed,
    /// Never ran
    Skipped,
}

/// One recorded result.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Group titles from the suite down, ending with the test or hook title
    pub title_path: Vec<String>,
    /// Test or hook
    pub kind: OutcomeKind,
    /// Final status
    pub status: Status,
    /// Rendered error message for failures
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    error: Option<Arc<RunError>>,
}

impl Outcome {
    pub(crate) const fn passed(title_path: Vec<String>) -> Self {
        Self {
            title_path,
            kind: OutcomeKind::Test,
            status: Status::Passed,
            message: None,
            error: None,
        }
    }

    pub(crate) const fn skipped(title_path: Vec<String>) -> Self {
        Self {
            title_path,
            kind: OutcomeKind::Test,
            status: Status::Skipped,
            message: None,
            error: None,
        }
    }

    pub(crate) fn failed(title_path: Vec<String>, kind: OutcomeKind, error: RunError) -> Self {
        Self {
            title_path,
            kind,
            status: Status::Failed,
            message: Some(error.to_string()),
            error: Some(Arc::new(error)),
        }
    }

    /// The last element of the title path.
    pub fn title(&self) -> &str {
        self.title_path.last().map_or("", String::as_str)
    }

    /// All titles joined with spaces, the way Mocha prints a full title.
    pub fn full_title(&self) -> String {
        self.title_path.join(" ")
    }

    /// The failure, if any.
    pub fn error(&self) -> Option<&RunError> {
        self.error.as_deref()
    }

    /// The fixture error behind the failure, if a binding raised it.
    pub fn fixture_error(&self) -> Option<&FixtureError> {
        self.error().and_then(RunError::fixture_error)
    }

    /// True when the failure was raised by a hook.
    pub fn is_hook_failure(&self) -> bool {
        self.error().is_some_and(RunError::is_hook_failure)
    }
}

/// Ordered record of everything a run did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    outcomes: Vec<Outcome>,
}

impl RunReport {
    pub(crate) fn record(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// Every outcome in execution order.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Outcomes of test bodies only.
    pub fn tests(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.kind == OutcomeKind::Test)
    }

    /// Tests that passed.
    pub fn passed(&self) -> Vec<&Outcome> {
        self.tests()
            .filter(|outcome| outcome.status == Status::Passed)
            .collect()
    }

    /// Tests that failed, including those failed by a `before each` hook.
    pub fn failed(&self) -> Vec<&Outcome> {
        self.tests()
            .filter(|outcome| outcome.status == Status::Failed)
            .collect()
    }

    /// Tests that never ran.
    pub fn skipped(&self) -> Vec<&Outcome> {
        self.tests()
            .filter(|outcome| outcome.status == Status::Skipped)
            .collect()
    }

    /// Every failure raised by a hook.
    pub fn hook_failures(&self) -> Vec<&Outcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_hook_failure())
            .collect()
    }

    /// Looks up a test outcome by its own title.
    pub fn test(&self, title: &str) -> Option<&Outcome> {
        self.tests().find(|outcome| outcome.title() == title)
    }

    /// True when nothing failed.
    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|outcome| outcome.status != Status::Failed)
    }

    /// Pass/fail counts.
    pub fn summary(&self) -> Summary {
        Summary {
            passing: self.passed().len(),
            failing: self.failed().len(),
            skipped: self.skipped().len(),
            hook_failures: self.hook_failures().len(),
        }
    }

    /// Serializes the report.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Counts printed at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Tests that passed
    pub passing: usize,
    /// Tests that failed
    pub failing: usize,
    /// Tests that never ran
    pub skipped: usize,
    /// Failures raised by hooks, including `before each` failures recorded
    /// against the test they blocked
    pub hook_failures: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passing, {} failing, {} skipped",
            self.passing, self.failing, self.skipped
        )?;
        if self.hook_failures > 0 {
            write!(f, " ({} hook failure(s))", self.hook_failures)?;
        }
        Ok(())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            let mark = match outcome.status {
                Status::Passed => "ok",
                Status::Failed => "FAILED",
                Status::Skipped => "skipped",
            };
            write!(f, "{mark}: {}", outcome.full_title())?;
            if let Some(message) = &outcome.message {
                write!(f, " ({message})")?;
            }
            writeln!(f)?;
        }
        write!(f, "{}", self.summary())
    }
}
