//! Property-based invariant tests for core value and binding primitives.
//!
//! 1. A value is blank iff it is `Null` or empty text.
//! 2. A binding's full path always ends with its own path.
//! 3. Slot normalization preserves child count and order.

use formwalk_core::{Binding, Control, ControlKind, NodeId, SlotContent, Value};
use proptest::prelude::*;

struct Leaf(NodeId);

impl Control for Leaf {
    fn id(&self) -> &NodeId {
        &self.0
    }
    fn kind(&self) -> ControlKind {
        ControlKind::Control
    }
    fn is_visible(&self) -> bool {
        true
    }
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        ".{0,12}".prop_map(Value::Text),
    ]
}

proptest! {
    #[test]
    fn blank_iff_null_or_empty_text(v in value_strategy()) {
        let expected = matches!(&v, Value::Null) || v.as_text() == Some("");
        prop_assert_eq!(v.is_blank(), expected);
    }

    #[test]
    fn full_path_ends_with_path(
        path in "[a-z]{1,8}",
        context in proptest::option::of("/[a-z]{1,8}/[0-9]{1,3}"),
    ) {
        let mut binding = Binding::new(path.clone());
        if let Some(ctx) = &context {
            binding = binding.with_context(ctx.clone());
        }
        let full = binding.full_path();
        prop_assert!(full.ends_with(&path));
        match context {
            Some(ctx) => prop_assert_eq!(full, format!("{ctx}/{path}")),
            None => prop_assert_eq!(full, path),
        }
    }

    #[test]
    fn many_slot_preserves_order(n in 0usize..16) {
        let leaves: Vec<Leaf> = (0..n).map(|i| Leaf(NodeId::new(format!("n{i}")))).collect();
        let refs: Vec<&dyn Control> = leaves.iter().map(|l| l as &dyn Control).collect();
        let children = SlotContent::Many(refs).into_children();
        prop_assert_eq!(children.len(), n);
        for (i, child) in children.iter().enumerate() {
            prop_assert_eq!(child.id().as_str(), format!("n{i}"));
        }
    }
}
