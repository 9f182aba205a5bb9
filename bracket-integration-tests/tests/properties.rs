//! Property tests for fixture scoping.

use std::sync::Arc;

use bracket::testing::generators::arb_hook_name;
use bracket::testing::natural_numbers;
use bracket::{bind, bind_before_each, BindConfig, BoxError, Scope};
use bracket_memory::Suite;
use parking_lot::Mutex;
use proptest::prelude::*;

/// Runs `tests` tests against a fixture at `scope`, returning what each saw.
fn observed_values(seed: u64, tests: usize, scope: Scope) -> Vec<u64> {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut suite = Suite::new("property");
        let fixture = bind(suite.root(), scope, natural_numbers(seed));
        for index in 0..tests {
            let (fixture, seen) = (fixture.clone(), Arc::clone(&seen));
            suite.it(format!("test {index}"), move |_t| {
                let result = fixture.get().map(|value| seen.lock().push(*value));
                async move { result.map_err(BoxError::from) }
            });
        }

        let report = suite.run().await;
        assert!(report.is_success(), "{report}");
        let values = seen.lock().clone();
        values
    })
}

proptest! {
    #[test]
    fn each_test_gets_a_fresh_value(seed in 0u64..1_000_000, tests in 1usize..8) {
        let values = observed_values(seed, tests, Scope::EachTest);
        let expected: Vec<u64> = (seed..).take(tests).collect();
        prop_assert_eq!(values, expected);
    }

    #[test]
    fn group_tests_share_one_value(seed in 0u64..1_000_000, tests in 1usize..8) {
        let values = observed_values(seed, tests, Scope::Group);
        prop_assert_eq!(values, vec![seed; tests]);
    }

    #[test]
    fn hook_titles_carry_the_binding_name(name in arb_hook_name()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let titles = rt.block_on(async {
            let titles = Arc::new(Mutex::new(Vec::new()));
            let recorded = Arc::clone(&titles);
            let mut suite = Suite::new("property");
            let descriptor = bracket::ResourceDescriptor::from_sync(move |cx| {
                recorded.lock().push(cx.title());
                Ok::<_, BoxError>(())
            });
            bind_before_each(suite.root(), BindConfig::new(descriptor).named(name.clone()));
            suite.it("should X", |_t| async { Ok::<_, BoxError>(()) });

            assert!(suite.run().await.is_success());
            let titles = titles.lock().clone();
            titles
        });

        prop_assert_eq!(
            titles,
            vec![format!("\"before each\" hook: {name} for \"should X\"")]
        );
    }
}
