//! Protocol violations raised during a host run are logged as warnings.
//!
//! Kept in its own test binary: `traced_test` installs the global
//! subscriber, which `common::init_tracing` would otherwise claim first.

use bracket::testing::Scripted;
use bracket::{bind_before, bind_before_each, BindConfig, BoxError, HookName, ResourceDescriptor};
use bracket_memory::Suite;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn zero_yields_are_logged_with_the_fixture_name() {
    let mut suite = Suite::new("suite");
    bind_before(
        suite.root(),
        BindConfig::new(ResourceDescriptor::from_sequence(|_cx| {
            Scripted::<u32>::new([None])
        }))
        .named(HookName::try_new("empty pool").unwrap()),
    );
    suite.it("never runs", |_t| async { Ok::<_, BoxError>(()) });

    let report = suite.run().await;

    assert!(!report.is_success());
    assert!(logs_contain("sequence completed without yielding"));
    assert!(logs_contain("empty pool"));
}

#[tokio::test]
#[traced_test]
async fn second_yields_are_logged_when_tearing_down() {
    let mut suite = Suite::new("suite");
    bind_before_each(
        suite.root(),
        ResourceDescriptor::from_sequence(|_cx| Scripted::new([Some(1_u32), Some(2)])),
    );
    suite.it("runs", |_t| async { Ok::<_, BoxError>(()) });

    let report = suite.run().await;

    assert_eq!(report.hook_failures().len(), 1);
    assert!(logs_contain("sequence yielded a second time"));
    assert!(!logs_contain("sequence completed without yielding"));
}
