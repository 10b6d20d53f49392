#![forbid(unsafe_code)]

//! Child slot content.
//!
//! Toolkits are inconsistent about slot shapes: most slots hold a sequence of
//! children, some hold exactly one (a page's form, a form's layout). Both are
//! reported through [`SlotContent`] and normalized with
//! [`SlotContent::into_children`] so the traversal never branches on shape.

use crate::control::Control;

/// What a named child slot currently holds.
pub enum SlotContent<'a> {
    /// The node has no such slot, or it is empty.
    Absent,
    /// A slot holding exactly one child.
    Single(&'a dyn Control),
    /// A slot holding an ordered sequence of children.
    Many(Vec<&'a dyn Control>),
    /// The slot holds something that is not a control (a toolkit-specific
    /// value the validator cannot walk). Carries a short description.
    Unsupported(&'static str),
}

impl<'a> SlotContent<'a> {
    /// Normalize into an ordered list of children.
    ///
    /// `Absent` and `Unsupported` yield an empty list.
    #[must_use]
    pub fn into_children(self) -> Vec<&'a dyn Control> {
        match self {
            Self::Absent | Self::Unsupported(_) => Vec::new(),
            Self::Single(child) => vec![child],
            Self::Many(children) => children,
        }
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Description of an unsupported shape, if this is one.
    #[must_use]
    pub fn unsupported(&self) -> Option<&'static str> {
        match self {
            Self::Unsupported(what) => Some(*what),
            _ => None,
        }
    }
}

impl std::fmt::Debug for SlotContent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Single(child) => f.debug_tuple("Single").field(&child.id()).finish(),
            Self::Many(children) => f
                .debug_tuple("Many")
                .field(&children.iter().map(|c| c.id()).collect::<Vec<_>>())
                .finish(),
            Self::Unsupported(what) => f.debug_tuple("Unsupported").field(what).finish(),
        }
    }
}
