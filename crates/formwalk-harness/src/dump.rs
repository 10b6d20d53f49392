#![forbid(unsafe_code)]

//! Plain-text rendering of a tree's indicators.
//!
//! One line per node, indented two spaces per level. Nodes with an indicator
//! other than `None` show it in brackets followed by its text; invisible nodes
//! are marked `(hidden)` and their children are left out.

use std::fmt::Write as FmtWrite;

use formwalk_core::{Control, ValueState};

/// Render `root` and everything reachable through `slots`.
#[must_use]
pub fn state_dump(root: &dyn Control, slots: &[&str]) -> String {
    let mut out = String::new();
    dump_node(root, slots, 0, &mut out);
    out
}

fn dump_node(node: &dyn Control, slots: &[&str], depth: usize, out: &mut String) {
    let _ = write!(out, "{:indent$}{}", "", node.id(), indent = depth * 2);
    if !node.is_visible() {
        out.push_str(" (hidden)\n");
        return;
    }
    if let Some(stateful) = node.as_value_stateful() {
        let state = stateful.value_state();
        if state != ValueState::None {
            let _ = write!(out, " [{state:?}]");
            if let Some(text) = stateful.value_state_text() {
                let _ = write!(out, " {text}");
            }
        }
    }
    out.push('\n');

    let Some(container) = node.as_container() else {
        return;
    };
    for slot in slots {
        for child in container.slot(slot).into_children() {
            dump_node(child, slots, depth + 1, out);
        }
    }
}

/// Compare a tree's dump against `expected`, panicking with both on mismatch.
#[track_caller]
pub fn assert_state_dump(root: &dyn Control, slots: &[&str], expected: &str) {
    let actual = state_dump(root, slots);
    if actual != expected {
        let mut diff = String::new();
        for (i, (a, e)) in actual.lines().zip(expected.lines()).enumerate() {
            if a != e {
                let _ = writeln!(diff, "  line {}: expected {e:?}, got {a:?}", i + 1);
            }
        }
        let (a, e) = (actual.lines().count(), expected.lines().count());
        if a != e {
            let _ = writeln!(diff, "  expected {e} lines, got {a}");
        }
        panic!("state dump mismatch\n{diff}--- expected\n{expected}--- actual\n{actual}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{Input, Panel};

    fn tree() -> Panel {
        Panel::new("root")
            .child("items", Input::new("a").with_value_state(ValueState::Warning, "check"))
            .child("items", Panel::new("hidden").visible(false).child("items", Input::new("x")))
            .child("other", Input::new("b"))
    }

    #[test]
    fn dump_follows_slot_order() {
        assert_eq!(
            state_dump(&tree(), &["other", "items"]),
            "root\n  b\n  a [Warning] check\n  hidden (hidden)\n"
        );
    }

    #[test]
    fn unlisted_slots_are_left_out() {
        assert_eq!(state_dump(&tree(), &[]), "root\n");
    }

    #[test]
    #[should_panic(expected = "state dump mismatch")]
    fn mismatch_panics() {
        assert_state_dump(&tree(), &["items"], "root\n");
    }
}
