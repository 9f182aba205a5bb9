//! Property test generators for bracket types.

use proptest::prelude::*;

use crate::context::{HookKind, HookName};

/// Generates valid hook names.
pub fn arb_hook_name() -> impl Strategy<Value = HookName> {
    "[a-zA-Z0-9][a-zA-Z0-9 ._#-]{0,63}".prop_filter_map("Invalid HookName", |s| {
        HookName::try_new(s).ok()
    })
}

/// Generates any hook kind.
pub fn arb_hook_kind() -> impl Strategy<Value = HookKind> {
    prop_oneof![
        Just(HookKind::BeforeAll),
        Just(HookKind::AfterAll),
        Just(HookKind::BeforeEach),
        Just(HookKind::AfterEach),
    ]
}
