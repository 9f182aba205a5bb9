//! In-memory host test framework for bracket fixtures.
//!
//! `bracket-memory` is a small Mocha-shaped runner: a [`Suite`] holds nested
//! [`Group`]s of tests and hooks, runs them one at a time and returns a
//! [`RunReport`]. Each `Group` is a [`bracket::HookRegistry`], so fixtures
//! bind to it exactly as they would to any other host.
//!
//! # Example
//!
//! ```rust
//! use bracket::{bind_before, BoxError};
//! use bracket::testing::natural_numbers;
//! use bracket_memory::Suite;
//!
//! # tokio_test::block_on(async {
//! let mut suite = Suite::new("numbers");
//! suite.describe("group scoped", |g| {
//!     let number = bind_before(g, natural_numbers(100));
//!     for title in ["first", "second"] {
//!         let number = number.clone();
//!         g.it(title, move |_t| {
//!             let value = number.get().map(|n| *n);
//!             async move {
//!                 assert_eq!(value?, 100);
//!                 Ok::<_, BoxError>(())
//!             }
//!         });
//!     }
//! });
//!
//! let report = suite.run().await;
//! assert!(report.is_success());
//! assert_eq!(report.passed().len(), 2);
//! # });
//! ```
//!
//! # Execution Order
//!
//! - a group with no tests below it is skipped, hooks included
//! - `before all` hooks run before a group's first test
//! - `before each` hooks run outermost group first, `after each` innermost first
//! - a group's own tests run before its child groups
//! - `after all` hooks run after everything in the group

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod errors;
pub mod report;
mod runner;
pub mod suite;

pub use config::{HookTimeoutMs, RunnerConfig, TestTimeoutMs};
pub use errors::RunError;
pub use report::{Outcome, OutcomeKind, RunReport, Status, Summary};
pub use suite::{Group, Suite, TestContext, TestResult};
