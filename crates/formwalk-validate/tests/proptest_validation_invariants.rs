#![forbid(unsafe_code)]

//! Property tests over randomly shaped control trees.

use std::collections::BTreeSet;

use formwalk_core::{Control, ValueState};
use formwalk_harness::{Input, Panel};
use formwalk_validate::{Validator, config::DEFAULT_SLOT_ORDER};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Spec {
    Leaf {
        required: bool,
        enabled: bool,
        visible: bool,
        filled: bool,
        /// Carries an `Error` set outside the validator instead of a warning.
        external: bool,
    },
    Group {
        visible: bool,
        children: Vec<Spec>,
    },
}

fn spec() -> impl Strategy<Value = Spec> {
    let leaf = (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::bool::weighted(0.2),
    )
        .prop_map(|(required, enabled, visible, filled, external)| Spec::Leaf {
            required,
            enabled,
            visible,
            filled,
            external,
        });
    leaf.prop_recursive(4, 48, 6, |inner| {
        (any::<bool>(), prop::collection::vec(inner, 0..6))
            .prop_map(|(visible, children)| Spec::Group { visible, children })
    })
}

/// What a pass should do to a tree built from a [`Spec`].
#[derive(Debug, Default)]
struct Expected {
    /// Records the pass should publish.
    failing: usize,
    /// Leaves no check may touch.
    untouched: BTreeSet<String>,
    /// Leaves that must end the pass showing `Error`.
    errors: BTreeSet<String>,
}

fn build(spec: &Spec, shown: bool, next: &mut usize, expected: &mut Expected) -> Box<dyn Control> {
    *next += 1;
    let id = format!("n{next}");
    match spec {
        Spec::Leaf {
            required,
            enabled,
            visible,
            filled,
            external,
        } => {
            let reached = shown && *visible;
            let checked = reached && *enabled && *required;
            if checked && !filled {
                expected.failing += 1;
                expected.errors.insert(id.clone());
            }
            if *external {
                expected.errors.insert(id.clone());
                if reached {
                    expected.failing += 1;
                }
            } else if !checked {
                expected.untouched.insert(id.clone());
            }
            let value = if *filled { "x" } else { "" };
            let (state, text) = if *external {
                (ValueState::Error, "Rejected upstream")
            } else {
                (ValueState::Warning, "preset")
            };
            Box::new(
                Input::new(id)
                    .required(*required)
                    .enabled(*enabled)
                    .visible(*visible)
                    .value(value)
                    .with_value_state(state, text),
            )
        }
        Spec::Group { visible, children } => {
            let kids = children
                .iter()
                .map(|child| build(child, shown && *visible, next, expected))
                .collect();
            Box::new(Panel::new(id).visible(*visible).slot("items", kids))
        }
    }
}

fn showing(node: &dyn Control, state: ValueState, out: &mut BTreeSet<String>) {
    if node.current_value_state() == state {
        out.insert(node.id().to_string());
    }
    if let Some(container) = node.as_container() {
        for slot in DEFAULT_SLOT_ORDER {
            for child in container.slot(slot).into_children() {
                showing(child, state, out);
            }
        }
    }
}

proptest! {
    #[test]
    fn verdict_matches_failing_leaves(spec in spec()) {
        let mut expected = Expected::default();
        let root = build(&spec, true, &mut 0, &mut expected);

        let mut validator = Validator::new();
        let valid = validator.validate(root.as_ref());
        prop_assert_eq!(valid, expected.failing == 0);
        prop_assert_eq!(validator.ledger().borrow().len(), expected.failing);
        prop_assert_eq!(validator.session().map(|s| s.failures()), Some(expected.failing));
    }

    #[test]
    fn second_pass_changes_nothing(spec in spec()) {
        let root = build(&spec, true, &mut 0, &mut Expected::default());

        let mut validator = Validator::new();
        let first = validator.validate(root.as_ref());
        let records: Vec<_> = validator.ledger().borrow().iter().cloned().collect();

        let second = validator.validate(root.as_ref());
        let again: Vec<_> = validator.ledger().borrow().iter().cloned().collect();
        prop_assert_eq!(first, second);
        prop_assert_eq!(records, again);
    }

    #[test]
    fn unchecked_leaves_keep_their_indicator(spec in spec()) {
        let mut expected = Expected::default();
        let root = build(&spec, true, &mut 0, &mut expected);

        Validator::new().validate(root.as_ref());
        let mut left = BTreeSet::new();
        showing(root.as_ref(), ValueState::Warning, &mut left);
        prop_assert_eq!(left, expected.untouched);
    }

    #[test]
    fn external_errors_are_never_cleared(spec in spec()) {
        let mut expected = Expected::default();
        let root = build(&spec, true, &mut 0, &mut expected);

        let mut validator = Validator::new();
        validator.validate(root.as_ref());
        validator.validate(root.as_ref());
        let mut errors = BTreeSet::new();
        showing(root.as_ref(), ValueState::Error, &mut errors);
        prop_assert_eq!(errors, expected.errors);
        prop_assert_eq!(validator.ledger().borrow().len(), expected.failing);
    }
}
