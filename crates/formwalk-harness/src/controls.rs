#![forbid(unsafe_code)]

//! In-memory controls.
//!
//! Every control keeps its state behind `Cell`/`RefCell` so the validator can
//! write indicators through a shared reference, the same way a live widget
//! tree would be mutated.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::sync::Arc;

use formwalk_core::{
    Bindable, Binding, Container, Control, ControlKind, DataType, Enableable, LabelFor, NodeId,
    Picker, PropertyError, Requireable, SlotContent, Tokenized, Value, ValueState, ValueStateful,
    prop,
};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Indicator state plus its message text.
#[derive(Debug, Default)]
struct Indicator {
    state: Cell<ValueState>,
    text: RefCell<String>,
}

impl Indicator {
    fn set(&self, state: ValueState, text: &str) {
        self.state.set(state);
        *self.text.borrow_mut() = text.to_string();
    }

    fn text(&self) -> Option<String> {
        let text = self.text.borrow();
        (!text.is_empty()).then(|| text.clone())
    }
}

/// Named property values and their bindings.
///
/// Only names defined at build time exist; everything else is
/// `NotApplicable`.
#[derive(Debug, Default)]
struct Properties {
    values: RefCell<BTreeMap<String, Value>>,
    bindings: BTreeMap<String, Binding>,
    unreadable: BTreeMap<String, String>,
}

impl Properties {
    fn define(&mut self, name: &str, value: impl Into<Value>) {
        self.values.get_mut().insert(name.to_string(), value.into());
    }

    fn get(&self, name: &str) -> Result<Value, PropertyError> {
        if let Some(reason) = self.unreadable.get(name) {
            return Err(PropertyError::Unreadable {
                property: name.to_string(),
                reason: reason.clone(),
            });
        }
        self.values
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| PropertyError::not_applicable(name))
    }

    fn set(&self, name: &str, value: Value) -> Result<(), PropertyError> {
        match self.values.borrow_mut().get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(PropertyError::not_applicable(name)),
        }
    }
}

/// State shared by every input-like control.
#[derive(Debug)]
struct Field {
    id: NodeId,
    visible: Cell<bool>,
    enabled: Cell<bool>,
    required: Cell<bool>,
    label_hint: Option<String>,
    props: Properties,
    indicator: Indicator,
}

impl Field {
    fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            visible: Cell::new(true),
            enabled: Cell::new(true),
            required: Cell::new(false),
            label_hint: None,
            props: Properties::default(),
            indicator: Indicator::default(),
        }
    }
}

impl Requireable for Field {
    fn is_required(&self) -> bool {
        self.required.get()
    }
}

impl Enableable for Field {
    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}

impl Bindable for Field {
    fn property(&self, name: &str) -> Result<Value, PropertyError> {
        self.props.get(name)
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), PropertyError> {
        self.props.set(name, value)
    }

    fn binding(&self, name: &str) -> Option<&Binding> {
        self.props.bindings.get(name)
    }
}

impl ValueStateful for Field {
    fn value_state(&self) -> ValueState {
        self.indicator.state.get()
    }

    fn value_state_text(&self) -> Option<String> {
        self.indicator.text()
    }

    fn set_value_state(&self, state: ValueState, text: &str) {
        self.indicator.set(state, text);
    }
}

/// Builders and accessors common to controls wrapping a [`Field`].
macro_rules! field_api {
    ($ty:ident) => {
        impl $ty {
            #[must_use]
            pub fn required(self, required: bool) -> Self {
                self.field.required.set(required);
                self
            }

            #[must_use]
            pub fn enabled(self, enabled: bool) -> Self {
                self.field.enabled.set(enabled);
                self
            }

            #[must_use]
            pub fn visible(self, visible: bool) -> Self {
                self.field.visible.set(visible);
                self
            }

            #[must_use]
            pub fn label_hint(mut self, hint: impl Into<String>) -> Self {
                self.field.label_hint = Some(hint.into());
                self
            }

            /// Bind `property` to `path` without a data type.
            #[must_use]
            pub fn bind(self, property: &str, path: &str) -> Self {
                self.bind_with(property, Binding::new(path))
            }

            /// Bind `property` to `path` with a data type.
            #[must_use]
            pub fn bind_typed(self, property: &str, path: &str, data_type: Arc<dyn DataType>) -> Self {
                self.bind_with(property, Binding::typed(path, data_type))
            }

            #[must_use]
            pub fn bind_with(mut self, property: &str, binding: Binding) -> Self {
                self.field.props.bindings.insert(property.to_string(), binding);
                self
            }

            /// Make reading `property` fail with `reason`.
            #[must_use]
            pub fn unreadable(mut self, property: &str, reason: &str) -> Self {
                self.field
                    .props
                    .unreadable
                    .insert(property.to_string(), reason.to_string());
                self
            }

            /// Preset the indicator, as a server round-trip would.
            #[must_use]
            pub fn with_value_state(self, state: ValueState, text: &str) -> Self {
                self.field.indicator.set(state, text);
                self
            }

            pub fn set_required(&self, required: bool) {
                self.field.required.set(required);
            }

            pub fn set_enabled(&self, enabled: bool) {
                self.field.enabled.set(enabled);
            }

            pub fn set_visible(&self, visible: bool) {
                self.field.visible.set(visible);
            }

            pub fn set_value_state(&self, state: ValueState, text: &str) {
                self.field.indicator.set(state, text);
            }

            #[must_use]
            pub fn value_state(&self) -> ValueState {
                self.field.indicator.state.get()
            }

            /// Indicator text, `None` when empty.
            #[must_use]
            pub fn value_state_text(&self) -> Option<String> {
                self.field.indicator.text()
            }

            /// Current value of a defined property.
            pub fn get(&self, property: &str) -> Result<Value, PropertyError> {
                self.field.props.get(property)
            }
        }
    };
}

fn text_property(props: &Properties, name: &str) -> String {
    props.get(name).map(|v| v.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Single-line text input with `value`, `placeholder`, and `editable`.
#[derive(Debug)]
pub struct Input {
    field: Field,
}

field_api!(Input);

impl Input {
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        let mut field = Field::new(id);
        field.props.define(prop::VALUE, "");
        field.props.define(prop::PLACEHOLDER, "");
        field.props.define(prop::EDITABLE, true);
        Self { field }
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.field.props.define(prop::VALUE, value);
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.field.props.define(prop::PLACEHOLDER, placeholder);
        self
    }

    #[must_use]
    pub fn editable(mut self, editable: bool) -> Self {
        self.field.props.define(prop::EDITABLE, editable);
        self
    }

    /// Replace the displayed value, as typing would.
    pub fn set_value(&self, value: impl Into<Value>) {
        let _ = self.field.props.set(prop::VALUE, value.into());
    }

    #[must_use]
    pub fn current_value(&self) -> String {
        text_property(&self.field.props, prop::VALUE)
    }
}

impl Control for Input {
    fn id(&self) -> &NodeId {
        &self.field.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::Control
    }

    fn is_visible(&self) -> bool {
        self.field.visible.get()
    }

    fn label_hint(&self) -> Option<String> {
        self.field.label_hint.clone()
    }

    fn as_requireable(&self) -> Option<&dyn Requireable> {
        Some(&self.field)
    }

    fn as_enableable(&self) -> Option<&dyn Enableable> {
        Some(&self.field)
    }

    fn as_bindable(&self) -> Option<&dyn Bindable> {
        Some(&self.field)
    }

    fn as_value_stateful(&self) -> Option<&dyn ValueStateful> {
        Some(&self.field)
    }
}

// ---------------------------------------------------------------------------
// MultiInput
// ---------------------------------------------------------------------------

/// Input collecting tokens. Typed text that was not turned into a token does
/// not count as a value.
#[derive(Debug)]
pub struct MultiInput {
    field: Field,
    tokens: RefCell<Vec<String>>,
}

field_api!(MultiInput);

impl MultiInput {
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        let mut field = Field::new(id);
        field.props.define(prop::VALUE, "");
        field.props.define(prop::PLACEHOLDER, "");
        Self {
            field,
            tokens: RefCell::new(Vec::new()),
        }
    }

    /// Text typed but not yet tokenized.
    #[must_use]
    pub fn value(mut self, value: &str) -> Self {
        self.field.props.define(prop::VALUE, value);
        self
    }

    #[must_use]
    pub fn token(self, token: &str) -> Self {
        self.tokens.borrow_mut().push(token.to_string());
        self
    }

    pub fn add_token(&self, token: &str) {
        self.tokens.borrow_mut().push(token.to_string());
    }

    pub fn clear_tokens(&self) {
        self.tokens.borrow_mut().clear();
    }

    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.borrow().clone()
    }
}

impl Tokenized for MultiInput {
    fn token_count(&self) -> usize {
        self.tokens.borrow().len()
    }
}

impl Control for MultiInput {
    fn id(&self) -> &NodeId {
        &self.field.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::Control
    }

    fn is_visible(&self) -> bool {
        self.field.visible.get()
    }

    fn label_hint(&self) -> Option<String> {
        self.field.label_hint.clone()
    }

    fn as_requireable(&self) -> Option<&dyn Requireable> {
        Some(&self.field)
    }

    fn as_enableable(&self) -> Option<&dyn Enableable> {
        Some(&self.field)
    }

    fn as_bindable(&self) -> Option<&dyn Bindable> {
        Some(&self.field)
    }

    fn as_value_stateful(&self) -> Option<&dyn ValueStateful> {
        Some(&self.field)
    }

    fn as_tokenized(&self) -> Option<&dyn Tokenized> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// Select
// ---------------------------------------------------------------------------

/// Picker over a list of item keys, with `selectedKey` and `text`.
#[derive(Debug)]
pub struct Select {
    field: Field,
    items: Vec<String>,
}

field_api!(Select);

impl Select {
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        let mut field = Field::new(id);
        field.props.define(prop::SELECTED_KEY, "");
        field.props.define(prop::TEXT, "");
        Self {
            field,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn items<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn select(mut self, key: &str) -> Self {
        self.field.props.define(prop::SELECTED_KEY, key);
        self
    }

    /// Displayed text, independent of the selection.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.field.props.define(prop::TEXT, text);
        self
    }

    /// Change the selection; an empty key clears it.
    pub fn set_selected(&self, key: &str) {
        let _ = self.field.props.set(prop::SELECTED_KEY, Value::from(key));
    }
}

impl Picker for Select {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn selected_key(&self) -> String {
        text_property(&self.field.props, prop::SELECTED_KEY)
    }
}

impl Control for Select {
    fn id(&self) -> &NodeId {
        &self.field.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::Control
    }

    fn is_visible(&self) -> bool {
        self.field.visible.get()
    }

    fn label_hint(&self) -> Option<String> {
        self.field.label_hint.clone()
    }

    fn as_requireable(&self) -> Option<&dyn Requireable> {
        Some(&self.field)
    }

    fn as_enableable(&self) -> Option<&dyn Enableable> {
        Some(&self.field)
    }

    fn as_bindable(&self) -> Option<&dyn Bindable> {
        Some(&self.field)
    }

    fn as_value_stateful(&self) -> Option<&dyn ValueStateful> {
        Some(&self.field)
    }

    fn as_picker(&self) -> Option<&dyn Picker> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// Read-only text display. Bindable, but without an indicator.
#[derive(Debug)]
pub struct Text {
    id: NodeId,
    visible: Cell<bool>,
    props: Properties,
}

impl Text {
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        let mut props = Properties::default();
        props.define(prop::TEXT, "");
        Self {
            id: id.into(),
            visible: Cell::new(true),
            props,
        }
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.props.define(prop::TEXT, text);
        self
    }

    #[must_use]
    pub fn bind(mut self, property: &str, path: &str) -> Self {
        self.props
            .bindings
            .insert(property.to_string(), Binding::new(path));
        self
    }

    #[must_use]
    pub fn visible(self, visible: bool) -> Self {
        self.visible.set(visible);
        self
    }
}

impl Bindable for Text {
    fn property(&self, name: &str) -> Result<Value, PropertyError> {
        self.props.get(name)
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), PropertyError> {
        self.props.set(name, value)
    }

    fn binding(&self, name: &str) -> Option<&Binding> {
        self.props.bindings.get(name)
    }
}

impl Control for Text {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::Control
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn as_bindable(&self) -> Option<&dyn Bindable> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// Caption, optionally pointing at the control it describes.
#[derive(Debug)]
pub struct Label {
    id: NodeId,
    text: String,
    labelled: Option<NodeId>,
    visible: Cell<bool>,
}

impl Label {
    #[must_use]
    pub fn new(id: impl Into<NodeId>, text: &str) -> Self {
        Self {
            id: id.into(),
            text: text.to_string(),
            labelled: None,
            visible: Cell::new(true),
        }
    }

    #[must_use]
    pub fn labelling(mut self, target: impl Into<NodeId>) -> Self {
        self.labelled = Some(target.into());
        self
    }

    #[must_use]
    pub fn visible(self, visible: bool) -> Self {
        self.visible.set(visible);
        self
    }
}

impl LabelFor for Label {
    fn labelled(&self) -> Option<&NodeId> {
        self.labelled.as_ref()
    }

    fn label_text(&self) -> String {
        self.text.clone()
    }
}

impl Control for Label {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::Label
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn as_label(&self) -> Option<&dyn LabelFor> {
        Some(self)
    }
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Slot {
    Many(Vec<Box<dyn Control>>),
    Single(Box<dyn Control>),
    Opaque(&'static str),
}

/// Generic container with named slots.
///
/// The kind defaults to [`ControlKind::Control`]; the form constructors set
/// the form kinds and the slot names those kinds use.
#[derive(Debug)]
pub struct Panel {
    id: NodeId,
    kind: ControlKind,
    visible: Cell<bool>,
    label: Option<String>,
    slots: Vec<(String, Slot)>,
    indicator: Option<Indicator>,
}

impl Panel {
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            kind: ControlKind::Control,
            visible: Cell::new(true),
            label: None,
            slots: Vec::new(),
            indicator: None,
        }
    }

    /// Container of kind `FormContainer`, holding `formElements`.
    #[must_use]
    pub fn form_container(id: impl Into<NodeId>) -> Self {
        Self::new(id).of_kind(ControlKind::FormContainer)
    }

    /// Container of kind `FormElement`, holding `fields`.
    #[must_use]
    pub fn form_element(id: impl Into<NodeId>) -> Self {
        Self::new(id).of_kind(ControlKind::FormElement)
    }

    #[must_use]
    pub fn of_kind(mut self, kind: ControlKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn visible(self, visible: bool) -> Self {
        self.visible.set(visible);
        self
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    /// Label reported as this container's label hint.
    #[must_use]
    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    fn put(mut self, name: &str, slot: Slot) -> Self {
        match self.slots.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = slot,
            None => self.slots.push((name.to_string(), slot)),
        }
        self
    }

    /// Set a multi-child slot.
    #[must_use]
    pub fn slot(self, name: &str, children: Vec<Box<dyn Control>>) -> Self {
        self.put(name, Slot::Many(children))
    }

    /// Set a single-child slot.
    #[must_use]
    pub fn single(self, name: &str, child: impl Control + 'static) -> Self {
        self.put(name, Slot::Single(Box::new(child)))
    }

    /// Append to a multi-child slot, creating it if needed.
    #[must_use]
    pub fn child(mut self, name: &str, child: impl Control + 'static) -> Self {
        if let Some((_, Slot::Many(children))) = self.slots.iter_mut().find(|(n, _)| n == name) {
            children.push(Box::new(child));
            return self;
        }
        self.put(name, Slot::Many(vec![Box::new(child)]))
    }

    /// A slot holding something that is not a control.
    #[must_use]
    pub fn opaque(self, name: &str, what: &'static str) -> Self {
        self.put(name, Slot::Opaque(what))
    }

    /// Give the panel an indicator, preset to `state`.
    #[must_use]
    pub fn with_value_state(mut self, state: ValueState, text: &str) -> Self {
        let indicator = Indicator::default();
        indicator.set(state, text);
        self.indicator = Some(indicator);
        self
    }

    #[must_use]
    pub fn value_state(&self) -> ValueState {
        self.indicator
            .as_ref()
            .map_or(ValueState::None, |i| i.state.get())
    }
}

impl Container for Panel {
    fn slot(&self, name: &str) -> SlotContent<'_> {
        match self.slots.iter().find(|(n, _)| n == name) {
            None => SlotContent::Absent,
            Some((_, Slot::Many(children))) => {
                SlotContent::Many(children.iter().map(|c| -> &dyn Control { c.as_ref() }).collect())
            }
            Some((_, Slot::Single(child))) => SlotContent::Single(child.as_ref()),
            Some((_, Slot::Opaque(what))) => SlotContent::Unsupported(*what),
        }
    }
}

impl ValueStateful for Indicator {
    fn value_state(&self) -> ValueState {
        self.state.get()
    }

    fn value_state_text(&self) -> Option<String> {
        self.text()
    }

    fn set_value_state(&self, state: ValueState, text: &str) {
        self.set(state, text);
    }
}

impl Control for Panel {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn kind(&self) -> ControlKind {
        self.kind
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn label_hint(&self) -> Option<String> {
        self.label.clone()
    }

    fn as_container(&self) -> Option<&dyn Container> {
        Some(self)
    }

    fn as_value_stateful(&self) -> Option<&dyn ValueStateful> {
        self.indicator.as_ref().map(|i| i as &dyn ValueStateful)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IntegerType;
    use formwalk_core::Capabilities;

    #[test]
    fn input_exposes_its_facets() {
        let input = Input::new("age").required(true);
        let caps = input.capabilities();
        assert!(caps.contains(
            Capabilities::REQUIREABLE
                | Capabilities::ENABLEABLE
                | Capabilities::BINDABLE
                | Capabilities::VALUE_STATEFUL
        ));
        assert!(!caps.contains(Capabilities::CONTAINER));
        assert!(input.is_marked_required());
    }

    #[test]
    fn unknown_property_is_not_applicable() {
        let input = Input::new("a");
        let props = input.as_bindable().unwrap();
        assert_eq!(props.property("value"), Ok(Value::from("")));
        assert!(matches!(
            props.property("selectedKey"),
            Err(PropertyError::NotApplicable { .. })
        ));
        assert!(props.set_property("selectedKey", Value::Null).is_err());
    }

    #[test]
    fn unreadable_property_reports_reason() {
        let input = Input::new("a").unreadable("value", "detached");
        let err = input.get("value").unwrap_err();
        assert!(matches!(err, PropertyError::Unreadable { ref reason, .. } if reason == "detached"));
    }

    #[test]
    fn typed_binding_is_reachable() {
        let input = Input::new("age").bind_typed("value", "/age", IntegerType::new());
        let binding = input.as_bindable().unwrap().binding("value").unwrap();
        assert_eq!(binding.path(), "/age");
        assert_eq!(binding.data_type().map(|t| t.name()), Some("Integer"));
    }

    #[test]
    fn indicator_writes_through_shared_reference() {
        let input = Input::new("a");
        let control: &dyn Control = &input;
        control
            .as_value_stateful()
            .unwrap()
            .set_value_state(ValueState::Warning, "check");
        assert_eq!(input.value_state(), ValueState::Warning);
        assert_eq!(input.value_state_text().as_deref(), Some("check"));
        input.set_value_state(ValueState::None, "");
        assert_eq!(input.value_state_text(), None);
    }

    #[test]
    fn select_reports_selection() {
        let select = Select::new("s").items(["a", "b"]);
        assert_eq!(select.item_count(), 2);
        assert_eq!(select.selected_key(), "");
        select.set_selected("b");
        assert_eq!(select.selected_key(), "b");
    }

    #[test]
    fn multi_input_counts_tokens() {
        let tags = MultiInput::new("t").token("a");
        tags.add_token("b");
        assert_eq!(tags.token_count(), 2);
        tags.clear_tokens();
        assert_eq!(tags.token_count(), 0);
    }

    #[test]
    fn panel_slots_normalize() {
        let panel = Panel::new("p")
            .child("items", Input::new("a"))
            .child("items", Input::new("b"))
            .single("content", Text::new("t"))
            .opaque("header", "string");
        let slots = panel.as_container().unwrap();
        let ids = |content: SlotContent<'_>| {
            content
                .into_children()
                .iter()
                .map(|c| c.id().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(slots.slot("items")), ["a", "b"]);
        assert_eq!(ids(slots.slot("content")), ["t"]);
        assert_eq!(slots.slot("header").unsupported(), Some("string"));
        assert!(slots.slot("missing").is_absent());
    }

    #[test]
    fn panel_indicator_is_optional() {
        let plain = Panel::new("p");
        assert!(plain.as_value_stateful().is_none());
        let flagged = Panel::new("p").with_value_state(ValueState::Error, "bad");
        assert_eq!(flagged.current_value_state(), ValueState::Error);
    }

    #[test]
    fn form_element_label_is_its_hint() {
        let element = Panel::form_element("fe").label("Street");
        assert_eq!(element.kind(), ControlKind::FormElement);
        assert_eq!(element.label_hint().as_deref(), Some("Street"));
    }
}
