#![forbid(unsafe_code)]

//! Depth-first traversal of the control tree.
//!
//! [`walk`] visits a node, then, unless the visitor prunes it, expands the
//! node's child slots in configured order and visits every child. Validation
//! and indicator reset are two visitors over the same walk.

use formwalk_core::{Control, warn};

/// What the walker does after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Visit the node's children.
    Descend,
    /// Do not visit the node's children.
    Prune,
}

/// Where a node sits in the tree.
#[derive(Clone, Copy)]
pub struct VisitContext<'a, 'b> {
    /// Distance from the root; the root is at depth 0.
    pub depth: usize,
    pub parent: Option<&'a dyn Control>,
    /// All children of `parent`, in traversal order, including the node itself.
    pub siblings: &'b [&'a dyn Control],
}

impl<'a> VisitContext<'a, 'static> {
    /// Context of the root node.
    #[must_use]
    pub fn root() -> Self {
        Self {
            depth: 0,
            parent: None,
            siblings: &[],
        }
    }
}

/// Per-node callback for [`walk`].
pub trait Visitor<'a> {
    fn visit(&mut self, node: &'a dyn Control, cx: &VisitContext<'a, '_>) -> Flow;
}

impl<'a, F> Visitor<'a> for F
where
    F: FnMut(&'a dyn Control, &VisitContext<'a, '_>) -> Flow,
{
    fn visit(&mut self, node: &'a dyn Control, cx: &VisitContext<'a, '_>) -> Flow {
        self(node, cx)
    }
}

/// Walk `root` and its descendants.
pub fn walk<'a, V>(root: &'a dyn Control, slots: &[String], visitor: &mut V)
where
    V: Visitor<'a> + ?Sized,
{
    walk_node(root, &VisitContext::root(), slots, visitor);
}

fn walk_node<'a, V>(
    node: &'a dyn Control,
    cx: &VisitContext<'a, '_>,
    slots: &[String],
    visitor: &mut V,
) where
    V: Visitor<'a> + ?Sized,
{
    if visitor.visit(node, cx) == Flow::Prune {
        return;
    }

    let kids = children(node, slots);
    for &child in &kids {
        let child_cx = VisitContext {
            depth: cx.depth + 1,
            parent: Some(node),
            siblings: &kids,
        };
        walk_node(child, &child_cx, slots, visitor);
    }
}

/// Children of `node` across `slots`, in slot order.
///
/// Slots the node does not have are skipped, as are slots holding something
/// other than controls.
#[must_use]
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub fn children<'a>(node: &'a dyn Control, slots: &[String]) -> Vec<&'a dyn Control> {
    let Some(container) = node.as_container() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for slot in slots {
        let content = container.slot(slot);
        if let Some(shape) = content.unsupported() {
            warn!(node = %node.id(), slot = %slot, shape, "unsupported slot content skipped");
        }
        out.extend(content.into_children());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwalk_harness::{Input, Panel};

    fn slots(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn collect(root: &dyn Control, slot_names: &[&str]) -> Vec<(String, usize)> {
        let mut seen = Vec::new();
        let mut visitor = |node: &dyn Control, cx: &VisitContext<'_, '_>| {
            seen.push((node.id().to_string(), cx.depth));
            Flow::Descend
        };
        walk(root, &slots(slot_names), &mut visitor);
        seen
    }

    #[test]
    fn depth_first_in_slot_order() {
        let root = Panel::new("root")
            .slot("content", vec![Box::new(Input::new("a")), Box::new(Input::new("b"))])
            .single("form", Panel::new("form").slot("items", vec![Box::new(Input::new("c"))]));

        let seen = collect(&root, &["items", "content", "form"]);
        let ids: Vec<_> = seen.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["root", "a", "b", "form", "c"]);
        assert_eq!(seen[4].1, 2);
    }

    #[test]
    fn unlisted_slots_are_ignored() {
        let root = Panel::new("root").slot("rows", vec![Box::new(Input::new("a"))]);
        assert_eq!(collect(&root, &["content"]).len(), 1);
        assert_eq!(collect(&root, &["content", "rows"]).len(), 2);
    }

    #[test]
    fn prune_stops_descent() {
        let root = Panel::new("root").slot(
            "content",
            vec![Box::new(Panel::new("inner").slot("content", vec![Box::new(Input::new("leaf"))]))],
        );
        let mut seen = Vec::new();
        let mut visitor = |node: &dyn Control, _: &VisitContext<'_, '_>| {
            seen.push(node.id().to_string());
            if node.id().as_str() == "inner" {
                Flow::Prune
            } else {
                Flow::Descend
            }
        };
        walk(&root, &slots(&["content"]), &mut visitor);
        assert_eq!(seen, ["root", "inner"]);
    }

    #[test]
    fn unsupported_slot_is_skipped() {
        let root = Panel::new("root")
            .opaque("content", "string")
            .slot("items", vec![Box::new(Input::new("a"))]);
        let kids = children(&root, &slots(&["content", "items"]));
        assert_eq!(kids.len(), 1);
    }

    #[test]
    fn siblings_include_every_child() {
        let root = Panel::new("root").slot(
            "content",
            vec![Box::new(Input::new("a")), Box::new(Input::new("b"))],
        );
        let mut sibling_counts = Vec::new();
        let mut visitor = |_: &dyn Control, cx: &VisitContext<'_, '_>| {
            sibling_counts.push(cx.siblings.len());
            Flow::Descend
        };
        walk(&root, &slots(&["content"]), &mut visitor);
        assert_eq!(sibling_counts, [0, 2, 2]);
    }
}
