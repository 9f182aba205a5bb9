//! Testing utilities for bracket fixtures.
//!
//! The utilities are organized into several submodules:
//!
//! - [`assertions`]: counting stubs with call-count assertions
//! - [`fixtures`]: ready-made descriptors and scripted sequences
//! - [`harness`]: a manual hook registry for driving bindings by hand
//! - `generators`: property test generators (feature `testing`)
//!
//! # Example Usage
//!
//! ```rust
//! use bracket::testing::prelude::*;
//! use bracket::{bind_before, HookKind};
//!
//! # tokio_test::block_on(async {
//! let mut host = ManualHost::new();
//! let number = bind_before(&mut host, natural_numbers(100));
//!
//! host.fire(HookKind::BeforeAll, Some("first test")).await.unwrap();
//! assert_eq!(*number.get().unwrap(), 100);
//! host.fire(HookKind::AfterAll, Some("last test")).await.unwrap();
//! assert!(number.get().is_err());
//! # });
//! ```

pub mod assertions;
pub mod fixtures;
#[cfg(feature = "testing")]
pub mod generators;
pub mod harness;

pub use assertions::CallCounter;
pub use fixtures::{counted, natural_numbers, Scripted};
pub use harness::ManualHost;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::assertions::*;
    pub use super::fixtures::*;
    #[cfg(feature = "testing")]
    pub use super::generators::*;
    pub use super::harness::*;
}
