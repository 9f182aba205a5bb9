//! `bracket` - set-up/tear-down resource lifecycles for test suites
//!
//! This library binds a two-phase resource sequence (create, then destroy) to
//! the before/after hooks of a host test framework. A binding hands back a
//! [`Fixture`] accessor that only yields the value while it is in scope, and
//! enforces that every sequence yields exactly once.
//!
//! # Example
//!
//! ```rust
//! use bracket::testing::ManualHost;
//! use bracket::{bind_before_each, BoxError, HookKind, ResourceDescriptor};
//!
//! # tokio_test::block_on(async {
//! let mut host = ManualHost::new();
//! let buffer = bind_before_each(
//!     &mut host,
//!     ResourceDescriptor::from_sync(|_cx| Ok::<_, BoxError>(Vec::<u8>::with_capacity(64))),
//! );
//!
//! host.fire(HookKind::BeforeEach, Some("writes")).await.unwrap();
//! assert!(buffer.get().unwrap().capacity() >= 64);
//! host.fire(HookKind::AfterEach, Some("writes")).await.unwrap();
//! assert!(buffer.get().is_err());
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod binder;
pub mod callback;
pub mod context;
pub mod descriptor;
pub mod errors;
pub mod hooks;
mod pair;
pub mod sequence;
pub mod testing;

pub use binder::{bind, bind_before, bind_before_each, BindConfig, Fixture, Phase};
pub use callback::{CallbackError, Done};
pub use context::{HookContext, HookKind, HookName, DEFAULT_AFTER_LABEL, DEFAULT_BEFORE_LABEL};
pub use descriptor::ResourceDescriptor;
pub use errors::{BoxError, FixtureError, FixtureLabel, FixtureResult, SequencePhase};
pub use hooks::{hook_fn, Hook, HookRegistry, HookResult, Scope};
pub use sequence::{Step, TwoPhase};
