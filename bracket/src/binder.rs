//! The lifecycle binder.
//!
//! [`bind`] registers a before/after hook pair with a host framework and
//! returns a [`Fixture`], the accessor for the value the descriptor produces.
//! Each binding owns one state machine:
//!
//! ```text
//! UNBOUND -> CREATING -> ACTIVE -> DESTROYING -> UNBOUND
//! ```
//!
//! The before hook drives `UNBOUND -> CREATING -> ACTIVE`, the after hook
//! drives `ACTIVE -> DESTROYING -> UNBOUND`. Only `ACTIVE` has a value.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::{HookContext, HookName, DEFAULT_AFTER_LABEL, DEFAULT_BEFORE_LABEL};
use crate::descriptor::ResourceDescriptor;
use crate::errors::{BoxError, FixtureError, FixtureLabel, FixtureResult, SequencePhase};
use crate::hooks::{hook_fn, Hook, HookRegistry, Scope};
use crate::sequence::{Step, TwoPhase};

/// Lifecycle phase of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No sequence is running; the accessor fails.
    Unbound,
    /// The first advance is in flight; the accessor fails.
    Creating,
    /// The value is in scope.
    Active,
    /// Scope was cleared and the second advance is in flight; the accessor fails.
    Destroying,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unbound => "unbound",
            Self::Creating => "creating",
            Self::Active => "active",
            Self::Destroying => "destroying",
        };
        f.write_str(name)
    }
}

/// What to bind: a descriptor and an optional hook name.
pub struct BindConfig<A> {
    name: Option<HookName>,
    descriptor: ResourceDescriptor<A>,
}

impl<A> BindConfig<A> {
    /// Creates an unnamed configuration.
    pub const fn new(descriptor: ResourceDescriptor<A>) -> Self {
        Self {
            name: None,
            descriptor,
        }
    }

    /// Names the hooks the binding registers.
    #[must_use]
    pub fn named(mut self, name: HookName) -> Self {
        self.name = Some(name);
        self
    }

    /// The configured hook name.
    pub const fn name(&self) -> Option<&HookName> {
        self.name.as_ref()
    }

    /// The configured descriptor.
    pub const fn descriptor(&self) -> &ResourceDescriptor<A> {
        &self.descriptor
    }
}

impl<A> From<ResourceDescriptor<A>> for BindConfig<A> {
    fn from(descriptor: ResourceDescriptor<A>) -> Self {
        Self::new(descriptor)
    }
}

impl<A> fmt::Debug for BindConfig<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindConfig")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

enum Slot<A> {
    Unbound,
    Creating,
    Active {
        sequence: Box<dyn TwoPhase<A>>,
        value: Arc<A>,
    },
    Destroying,
}

impl<A> Slot<A> {
    const fn phase(&self) -> Phase {
        match self {
            Self::Unbound => Phase::Unbound,
            Self::Creating => Phase::Creating,
            Self::Active { .. } => Phase::Active,
            Self::Destroying => Phase::Destroying,
        }
    }
}

struct Binding<A> {
    label: FixtureLabel,
    scope: Scope,
    slot: Mutex<Slot<A>>,
    generation: AtomicU64,
}

impl<A> Binding<A>
where
    A: Send + Sync + 'static,
{
    async fn enter(&self, descriptor: &ResourceDescriptor<A>, cx: HookContext) -> FixtureResult<()> {
        let previous = std::mem::replace(&mut *self.slot.lock(), Slot::Creating).phase();
        if previous != Phase::Unbound {
            warn!(
                fixture = %self.label,
                scope = %self.scope,
                %previous,
                "before hook ran while the fixture was not unbound"
            );
        }
        debug!(fixture = %self.label, scope = %self.scope, hook = %cx, "creating fixture");

        let mut sequence = descriptor.create(&cx);
        let outcome = sequence.advance(&cx).await;

        match outcome {
            Ok(Step::Yielded(value)) => {
                *self.slot.lock() = Slot::Active { sequence, value };
                let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                debug!(fixture = %self.label, scope = %self.scope, generation, "fixture active");
                Ok(())
            }
            Ok(Step::Complete) => {
                *self.slot.lock() = Slot::Unbound;
                warn!(
                    fixture = %self.label,
                    scope = %self.scope,
                    "sequence completed without yielding; generator should yield exactly once"
                );
                Err(FixtureError::ProtocolViolation {
                    fixture: self.label.clone(),
                    phase: SequencePhase::Setup,
                })
            }
            Err(source) => {
                *self.slot.lock() = Slot::Unbound;
                debug!(fixture = %self.label, error = %source, "fixture setup failed");
                Err(FixtureError::SetupFailed {
                    fixture: self.label.clone(),
                    source,
                })
            }
        }
    }

    async fn exit(&self, cx: HookContext) -> FixtureResult<()> {
        // Leave scope before teardown starts so reads during teardown fail.
        let taken = {
            let mut slot = self.slot.lock();
            match std::mem::replace(&mut *slot, Slot::Destroying) {
                Slot::Active { sequence, value } => Some((sequence, value)),
                other => {
                    *slot = other;
                    None
                }
            }
        };

        let Some((mut sequence, value)) = taken else {
            debug!(
                fixture = %self.label,
                scope = %self.scope,
                hook = %cx,
                "nothing to tear down"
            );
            return Ok(());
        };
        drop(value);
        debug!(fixture = %self.label, scope = %self.scope, hook = %cx, "destroying fixture");

        let outcome = sequence.advance(&cx).await;
        *self.slot.lock() = Slot::Unbound;

        match outcome {
            Ok(Step::Complete) => {
                debug!(fixture = %self.label, scope = %self.scope, "fixture unbound");
                Ok(())
            }
            Ok(Step::Yielded(_)) => {
                warn!(
                    fixture = %self.label,
                    scope = %self.scope,
                    "sequence yielded a second time; generator should yield exactly once"
                );
                Err(FixtureError::ProtocolViolation {
                    fixture: self.label.clone(),
                    phase: SequencePhase::Teardown,
                })
            }
            Err(source) => {
                debug!(fixture = %self.label, error = %source, "fixture teardown failed");
                Err(FixtureError::TeardownFailed {
                    fixture: self.label.clone(),
                    source,
                })
            }
        }
    }
}

/// Accessor for a bound resource.
///
/// Clones share the same binding, so a fixture can be captured by any number
/// of test bodies.
pub struct Fixture<A> {
    binding: Arc<Binding<A>>,
}

impl<A> Clone for Fixture<A> {
    fn clone(&self) -> Self {
        Self {
            binding: Arc::clone(&self.binding),
        }
    }
}

impl<A> fmt::Debug for Fixture<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixture")
            .field("label", &self.binding.label)
            .field("scope", &self.binding.scope)
            .field("phase", &self.phase())
            .field("generation", &self.generation())
            .finish()
    }
}

impl<A> Fixture<A> {
    /// Returns the in-scope value.
    ///
    /// Fails with [`FixtureError::OutOfScope`] before the owning before hook
    /// has completed, and from the moment the owning after hook starts.
    pub fn get(&self) -> FixtureResult<Arc<A>> {
        match &*self.binding.slot.lock() {
            Slot::Active { value, .. } => Ok(Arc::clone(value)),
            other => Err(FixtureError::OutOfScope {
                fixture: self.binding.label.clone(),
                phase: other.phase(),
            }),
        }
    }

    /// Runs `f` against the in-scope value.
    pub fn with<R>(&self, f: impl FnOnce(&A) -> R) -> FixtureResult<R> {
        let value = self.get()?;
        Ok(f(&value))
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.binding.slot.lock().phase()
    }

    /// Whether a value is in scope.
    pub fn is_active(&self) -> bool {
        self.phase() == Phase::Active
    }

    /// Number of times this binding has produced a value.
    pub fn generation(&self) -> u64 {
        self.binding.generation.load(Ordering::SeqCst)
    }

    /// The hook name the binding was registered with.
    pub fn name(&self) -> Option<&HookName> {
        self.binding.label.name()
    }

    /// The scope the binding was registered at.
    pub fn scope(&self) -> Scope {
        self.binding.scope
    }
}

/// Binds a descriptor to a host's hook pair at the given scope.
pub fn bind<A, R>(registry: &mut R, scope: Scope, config: impl Into<BindConfig<A>>) -> Fixture<A>
where
    A: Send + Sync + 'static,
    R: HookRegistry + ?Sized,
{
    let BindConfig { name, descriptor } = config.into();
    let (before_label, after_label) = name.as_ref().map_or(
        (DEFAULT_BEFORE_LABEL, DEFAULT_AFTER_LABEL),
        |name| (name.as_ref(), name.as_ref()),
    );

    let binding = Arc::new(Binding {
        label: FixtureLabel::new(name.clone()),
        scope,
        slot: Mutex::new(Slot::Unbound),
        generation: AtomicU64::new(0),
    });

    let before: Hook = {
        let binding = Arc::clone(&binding);
        hook_fn(move |cx| {
            let binding = Arc::clone(&binding);
            let descriptor = descriptor.clone();
            async move { binding.enter(&descriptor, cx).await.map_err(BoxError::from) }
        })
    };
    let after: Hook = {
        let binding = Arc::clone(&binding);
        hook_fn(move |cx| {
            let binding = Arc::clone(&binding);
            async move { binding.exit(cx).await.map_err(BoxError::from) }
        })
    };

    scope.register(registry, (before_label, after_label), (before, after));
    debug!(fixture = %binding.label, %scope, "fixture bound");

    Fixture { binding }
}

/// Binds a descriptor to the host's group hooks: one value per group.
pub fn bind_before<A, R>(registry: &mut R, config: impl Into<BindConfig<A>>) -> Fixture<A>
where
    A: Send + Sync + 'static,
    R: HookRegistry + ?Sized,
{
    bind(registry, Scope::Group, config)
}

/// Binds a descriptor to the host's per-test hooks: one value per test.
pub fn bind_before_each<A, R>(registry: &mut R, config: impl Into<BindConfig<A>>) -> Fixture<A>
where
    A: Send + Sync + 'static,
    R: HookRegistry + ?Sized,
{
    bind(registry, Scope::EachTest, config)
}
