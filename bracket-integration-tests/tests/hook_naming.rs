//! Hook titles seen by setup and teardown, named and anonymous.

use std::sync::Arc;

use bracket::{bind_before, bind_before_each, BindConfig, BoxError, HookName, ResourceDescriptor};
use bracket_memory::Suite;
use parking_lot::Mutex;

type Titles = Arc<Mutex<Vec<String>>>;

/// A descriptor recording the hook title of every setup and teardown.
fn recording(titles: &Titles) -> ResourceDescriptor<()> {
    let (setup_titles, teardown_titles) = (Arc::clone(titles), Arc::clone(titles));
    ResourceDescriptor::from_async_pair(
        move |cx| {
            setup_titles.lock().push(cx.title());
            async { Ok::<_, BoxError>(()) }
        },
        move |cx, _value| {
            teardown_titles.lock().push(cx.title());
            async { Ok::<_, BoxError>(()) }
        },
    )
}

fn name(value: &str) -> HookName {
    HookName::try_new(value).unwrap()
}

fn two_tests(suite: &mut Suite) {
    suite.it("should X", |_t| async { Ok::<_, BoxError>(()) });
    suite.it("should Y", |_t| async { Ok::<_, BoxError>(()) });
}

#[tokio::test]
async fn named_group_binding_uses_the_name_in_both_hooks() {
    let titles = Titles::default();
    let mut suite = Suite::new("suite");
    bind_before(
        suite.root(),
        BindConfig::new(recording(&titles)).named(name("database")),
    );
    two_tests(&mut suite);

    assert!(suite.run().await.is_success());
    assert_eq!(
        *titles.lock(),
        vec![
            r#""before all" hook: database for "should X""#,
            r#""after all" hook: database for "should Y""#,
        ]
    );
}

#[tokio::test]
async fn named_each_binding_names_every_hook() {
    let titles = Titles::default();
    let mut suite = Suite::new("suite");
    bind_before_each(
        suite.root(),
        BindConfig::new(recording(&titles)).named(name("  session  ")),
    );
    two_tests(&mut suite);

    assert!(suite.run().await.is_success());
    assert_eq!(
        *titles.lock(),
        vec![
            r#""before each" hook: session for "should X""#,
            r#""after each" hook: session for "should X""#,
            r#""before each" hook: session for "should Y""#,
            r#""after each" hook: session for "should Y""#,
        ]
    );
}

#[tokio::test]
async fn anonymous_binding_uses_default_labels() {
    let titles = Titles::default();
    let mut suite = Suite::new("suite");
    bind_before(suite.root(), recording(&titles));
    two_tests(&mut suite);

    assert!(suite.run().await.is_success());
    assert_eq!(
        *titles.lock(),
        vec![
            r#""before all" hook: beforeFn for "should X""#,
            r#""after all" hook: afterFn for "should Y""#,
        ]
    );
}

#[test]
fn blank_names_are_rejected() {
    assert!(HookName::try_new("   ").is_err());
    assert!(HookName::try_new("x".repeat(256)).is_err());
    assert_eq!(name(" db ").to_string(), "db");
}
