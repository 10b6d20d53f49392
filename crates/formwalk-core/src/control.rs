#![forbid(unsafe_code)]

//! The control tree as seen by the validator.
//!
//! A UI toolkit exposes its nodes through [`Control`]. Everything beyond
//! identity, kind and visibility is an optional facet reached through one of
//! the `as_*` accessors; a node that does not implement a facet simply returns
//! `None`. The validator only ever talks to facets, never to concrete node
//! types.
//!
//! Mutating calls (`set_value_state`, `set_property`) take `&self`: property
//! storage belongs to the toolkit, which is expected to use interior
//! mutability the way retained-mode widget trees usually do.

use std::fmt;

use bitflags::bitflags;

use crate::binding::Binding;
use crate::error::PropertyError;
use crate::slot::SlotContent;
use crate::value::{Value, ValueState};

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Stable identifier of a control.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// ControlKind
// ---------------------------------------------------------------------------

/// Coarse classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// An ordinary control: inputs, selects, texts, panels, layouts.
    Control,
    /// A label describing another control.
    Label,
    /// A group of form elements.
    FormContainer,
    /// A label/fields pair inside a form container.
    FormElement,
    /// Something the validator does not know how to treat. Skipped.
    Foreign,
}

impl ControlKind {
    /// Whether the validator looks at nodes of this kind at all.
    #[must_use]
    pub fn is_recognized(self) -> bool {
        !matches!(self, Self::Foreign)
    }
}

bitflags! {
    /// Summary of the facets a control implements.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u16 {
        const REQUIREABLE    = 0b0000_0001;
        const ENABLEABLE     = 0b0000_0010;
        const BINDABLE       = 0b0000_0100;
        const VALUE_STATEFUL = 0b0000_1000;
        const CONTAINER      = 0b0001_0000;
        const TOKENIZED      = 0b0010_0000;
        const PICKER         = 0b0100_0000;
        const LABEL          = 0b1000_0000;
    }
}

// ---------------------------------------------------------------------------
// Facets
// ---------------------------------------------------------------------------

/// A control that can be marked mandatory.
pub trait Requireable {
    fn is_required(&self) -> bool;
}

/// A control that can be disabled.
pub trait Enableable {
    fn is_enabled(&self) -> bool;
}

/// Named properties, optionally bound to a model.
pub trait Bindable {
    /// Read a property.
    ///
    /// Returns [`PropertyError::NotApplicable`] when this control has no
    /// property of that name.
    fn property(&self, name: &str) -> Result<Value, PropertyError>;

    /// Write a property.
    fn set_property(&self, name: &str, value: Value) -> Result<(), PropertyError>;

    /// Binding of a property, if it is bound.
    fn binding(&self, name: &str) -> Option<&Binding>;
}

/// A control with a visual error indicator and optional indicator text.
pub trait ValueStateful {
    fn value_state(&self) -> ValueState;

    /// Text shown with the indicator. `None` when the control has no text
    /// support or the text is empty.
    fn value_state_text(&self) -> Option<String> {
        None
    }

    /// Set the indicator and its text. Controls without text support ignore
    /// the text.
    fn set_value_state(&self, state: ValueState, text: &str);
}

/// A node with named child slots.
pub trait Container {
    /// Content of the named slot. Unknown names are [`SlotContent::Absent`].
    fn slot(&self, name: &str) -> SlotContent<'_>;
}

/// A control whose value is a set of tokens (multi-value input).
pub trait Tokenized {
    fn token_count(&self) -> usize;
}

/// A control that picks one of a list of items.
pub trait Picker {
    fn item_count(&self) -> usize;

    /// Key of the selected item; empty when nothing is selected.
    fn selected_key(&self) -> String;
}

/// A label control.
pub trait LabelFor {
    /// The control this label explicitly describes, if any.
    fn labelled(&self) -> Option<&NodeId>;

    fn label_text(&self) -> String;
}

// ---------------------------------------------------------------------------
// Control
// ---------------------------------------------------------------------------

/// One node of the control tree.
pub trait Control {
    fn id(&self) -> &NodeId;

    fn kind(&self) -> ControlKind;

    fn is_visible(&self) -> bool;

    /// Human label supplied as node metadata, preferred over sibling labels.
    fn label_hint(&self) -> Option<String> {
        None
    }

    fn as_requireable(&self) -> Option<&dyn Requireable> {
        None
    }

    fn as_enableable(&self) -> Option<&dyn Enableable> {
        None
    }

    fn as_bindable(&self) -> Option<&dyn Bindable> {
        None
    }

    fn as_value_stateful(&self) -> Option<&dyn ValueStateful> {
        None
    }

    fn as_container(&self) -> Option<&dyn Container> {
        None
    }

    fn as_tokenized(&self) -> Option<&dyn Tokenized> {
        None
    }

    fn as_picker(&self) -> Option<&dyn Picker> {
        None
    }

    fn as_label(&self) -> Option<&dyn LabelFor> {
        None
    }

    /// Facets this control implements, derived from the `as_*` accessors.
    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::REQUIREABLE, self.as_requireable().is_some());
        caps.set(Capabilities::ENABLEABLE, self.as_enableable().is_some());
        caps.set(Capabilities::BINDABLE, self.as_bindable().is_some());
        caps.set(
            Capabilities::VALUE_STATEFUL,
            self.as_value_stateful().is_some(),
        );
        caps.set(Capabilities::CONTAINER, self.as_container().is_some());
        caps.set(Capabilities::TOKENIZED, self.as_tokenized().is_some());
        caps.set(Capabilities::PICKER, self.as_picker().is_some());
        caps.set(Capabilities::LABEL, self.as_label().is_some());
        caps
    }

    /// `true` unless the control can be disabled and currently is.
    fn is_effectively_enabled(&self) -> bool {
        self.as_enableable().is_none_or(|e| e.is_enabled())
    }

    /// `true` only when the control can be required and is.
    fn is_marked_required(&self) -> bool {
        self.as_requireable().is_some_and(|r| r.is_required())
    }

    /// Current indicator, [`ValueState::None`] for controls without one.
    fn current_value_state(&self) -> ValueState {
        self.as_value_stateful()
            .map_or(ValueState::None, |s| s.value_state())
    }
}

impl fmt::Debug for dyn Control + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("id", self.id())
            .field("kind", &self.kind())
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Bare {
        id: NodeId,
    }

    impl Control for Bare {
        fn id(&self) -> &NodeId {
            &self.id
        }
        fn kind(&self) -> ControlKind {
            ControlKind::Control
        }
        fn is_visible(&self) -> bool {
            true
        }
    }

    struct Switchable {
        id: NodeId,
        enabled: Cell<bool>,
    }

    impl Enableable for Switchable {
        fn is_enabled(&self) -> bool {
            self.enabled.get()
        }
    }

    impl Requireable for Switchable {
        fn is_required(&self) -> bool {
            true
        }
    }

    impl Control for Switchable {
        fn id(&self) -> &NodeId {
            &self.id
        }
        fn kind(&self) -> ControlKind {
            ControlKind::Control
        }
        fn is_visible(&self) -> bool {
            true
        }
        fn as_enableable(&self) -> Option<&dyn Enableable> {
            Some(self)
        }
        fn as_requireable(&self) -> Option<&dyn Requireable> {
            Some(self)
        }
    }

    #[test]
    fn bare_control_has_no_capabilities() {
        let node = Bare { id: "a".into() };
        assert!(node.capabilities().is_empty());
        assert!(node.is_effectively_enabled());
        assert!(!node.is_marked_required());
        assert_eq!(node.current_value_state(), ValueState::None);
    }

    #[test]
    fn capabilities_follow_accessors() {
        let node = Switchable {
            id: "b".into(),
            enabled: Cell::new(false),
        };
        assert_eq!(
            node.capabilities(),
            Capabilities::ENABLEABLE | Capabilities::REQUIREABLE
        );
        assert!(!node.is_effectively_enabled());
        node.enabled.set(true);
        assert!(node.is_effectively_enabled());
        assert!(node.is_marked_required());
    }

    #[test]
    fn foreign_kind_is_not_recognized() {
        assert!(ControlKind::FormElement.is_recognized());
        assert!(!ControlKind::Foreign.is_recognized());
    }

    #[test]
    fn debug_shows_identity() {
        let node = Bare { id: "field-1".into() };
        let dynamic: &dyn Control = &node;
        let text = format!("{dynamic:?}");
        assert!(text.contains("field-1"));
    }
}
