#![forbid(unsafe_code)]

//! Human label lookup for message context.

use formwalk_core::{Control, ControlKind, LabelFor};

use crate::walk::VisitContext;

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

/// Resolve a human label for `node`.
///
/// Order: the node's own label hint, a sibling label explicitly labelling the
/// node, the first sibling label labelling nothing in particular, then the
/// parent's label hint (a form element's label).
#[must_use]
pub fn context_label(node: &dyn Control, cx: &VisitContext<'_, '_>) -> Option<String> {
    if let Some(hint) = non_empty(node.label_hint()) {
        return Some(hint);
    }

    let labels: Vec<&dyn LabelFor> = cx
        .siblings
        .iter()
        .filter(|s| s.kind() == ControlKind::Label && s.id() != node.id())
        .filter_map(|s| s.as_label())
        .collect();

    let explicit = labels
        .iter()
        .find(|l| l.labelled() == Some(node.id()))
        .map(|l| l.label_text());
    if let Some(text) = non_empty(explicit) {
        return Some(text);
    }

    let loose = labels
        .iter()
        .find(|l| l.labelled().is_none())
        .map(|l| l.label_text());
    if let Some(text) = non_empty(loose) {
        return Some(text);
    }

    non_empty(cx.parent.and_then(|p| p.label_hint()))
}
