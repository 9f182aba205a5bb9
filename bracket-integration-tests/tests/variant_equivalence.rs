//! Every way of building a descriptor behaves the same once bound.

mod common;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bracket::testing::CallCounter;
use bracket::{bind, BoxError, HookContext, ResourceDescriptor, Scope, Step, TwoPhase};
use bracket_memory::Suite;
use common::init_tracing;
use parking_lot::Mutex;

#[derive(Clone, Default)]
struct Probe {
    next: Arc<AtomicU64>,
    create: CallCounter,
    destroy: CallCounter,
}

impl Probe {
    fn produce(&self) -> u64 {
        self.create.call();
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

/// A hand-written two-phase sequence.
struct Direct {
    probe: Probe,
    advanced: bool,
}

#[async_trait]
impl TwoPhase<u64> for Direct {
    async fn advance(&mut self, _cx: &HookContext) -> Result<Step<u64>, BoxError> {
        if self.advanced {
            self.probe.destroy.call();
            return Ok(Step::Complete);
        }
        self.advanced = true;
        Ok(Step::yielded(self.probe.produce()))
    }
}

fn direct(probe: &Probe) -> ResourceDescriptor<u64> {
    let probe = probe.clone();
    ResourceDescriptor::from_sequence(move |_cx| Direct {
        probe: probe.clone(),
        advanced: false,
    })
}

fn async_pair(probe: &Probe) -> ResourceDescriptor<u64> {
    let (setup, teardown) = (probe.clone(), probe.clone());
    ResourceDescriptor::from_async_pair(
        move |_cx| {
            let value = setup.produce();
            async move {
                tokio::task::yield_now().await;
                Ok::<_, BoxError>(value)
            }
        },
        move |_cx, _value| {
            teardown.destroy.call();
            async { Ok::<_, BoxError>(()) }
        },
    )
}

fn sync_pair(probe: &Probe) -> ResourceDescriptor<u64> {
    let (setup, teardown) = (probe.clone(), probe.clone());
    ResourceDescriptor::from_sync_pair(
        move |_cx| Ok::<_, BoxError>(setup.produce()),
        move |_cx, _value: &u64| {
            teardown.destroy.call();
            Ok::<_, BoxError>(())
        },
    )
}

fn callback_pair(probe: &Probe) -> ResourceDescriptor<u64> {
    let (setup, teardown) = (probe.clone(), probe.clone());
    ResourceDescriptor::from_callback_pair(
        move |_cx, done| {
            let value = setup.produce();
            tokio::spawn(async move { done.ok(value) });
        },
        move |_cx, _value, done| {
            teardown.destroy.call();
            done.ok(());
        },
    )
}

#[derive(Debug, PartialEq, Eq)]
struct Observed {
    values: Vec<(String, u64)>,
    created: usize,
    destroyed: usize,
}

async fn observe(scope: Scope, make: fn(&Probe) -> ResourceDescriptor<u64>) -> Observed {
    let probe = Probe::default();
    let values = Arc::new(Mutex::new(Vec::new()));
    let mut suite = Suite::new("variants");
    let fixture = bind(suite.root(), scope, make(&probe));
    for title in ["first", "second", "third"] {
        let (fixture, values) = (fixture.clone(), Arc::clone(&values));
        suite.it(title, move |t| {
            let result = fixture.get().map(|value| {
                values.lock().push((t.title().to_string(), *value));
            });
            async move { result.map_err(BoxError::from) }
        });
    }

    let report = suite.run().await;
    assert!(report.is_success(), "{report}");

    let values = values.lock().clone();
    Observed {
        values,
        created: probe.create.count(),
        destroyed: probe.destroy.count(),
    }
}

fn expected(values: [u64; 3], created: usize) -> Observed {
    Observed {
        values: ["first", "second", "third"]
            .into_iter()
            .map(str::to_string)
            .zip(values)
            .collect(),
        created,
        destroyed: created,
    }
}

const VARIANTS: [(&str, fn(&Probe) -> ResourceDescriptor<u64>); 4] = [
    ("direct", direct),
    ("async", async_pair),
    ("sync", sync_pair),
    ("callback", callback_pair),
];

#[tokio::test]
async fn variants_agree_at_group_scope() {
    init_tracing();
    for (variant, make) in VARIANTS {
        let observed = observe(Scope::Group, make).await;
        assert_eq!(observed, expected([0, 0, 0], 1), "{variant} variant");
    }
}

#[tokio::test]
async fn variants_agree_at_each_test_scope() {
    init_tracing();
    for (variant, make) in VARIANTS {
        let observed = observe(Scope::EachTest, make).await;
        assert_eq!(observed, expected([0, 1, 2], 3), "{variant} variant");
    }
}

#[tokio::test]
async fn setup_only_variants_never_tear_down() {
    let created = CallCounter::new();
    let counter = created.clone();
    let mut suite = Suite::new("setup only");
    let fixture = bind(
        suite.root(),
        Scope::EachTest,
        ResourceDescriptor::from_callback(move |_cx, done| done.ok(counter.call())),
    );
    for title in ["first", "second"] {
        let fixture = fixture.clone();
        suite.it(title, move |_t| {
            let result = fixture.get().map(|_| ()).map_err(BoxError::from);
            async move { result }
        });
    }

    let report = suite.run().await;

    assert!(report.is_success(), "{report}");
    created.assert_called_twice();
    assert!(!fixture.is_active());
}
