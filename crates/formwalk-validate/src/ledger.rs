#![forbid(unsafe_code)]

//! The message ledger.
//!
//! Validation failures are published as [`MessageRecord`]s in a
//! [`MessageLedger`] shared with whatever displays them. The ledger also holds
//! records from other producers ([`Origin::Foreign`]); the validator only ever
//! creates, updates or removes records tagged [`Origin::Engine`].
//!
//! # Invariants
//!
//! 1. **One record per target**: at most one engine record exists for a given
//!    [`MessageTarget`]; a second failure on the same target updates the
//!    existing record in place and keeps its [`MessageId`].
//! 2. **Foreign records are untouched** by refreshes and by
//!    `remove_all_owned_by(Origin::Engine)`.
//! 3. **Insertion order** is preserved across updates and removals.
//!
//! # Refresh cycle
//!
//! A validation pass calls [`MessageLedger::retire_owned`] first, upserts every
//! failure it finds, then calls [`MessageLedger::sweep_retired`]. Records that
//! were not upserted again are dropped; the rest keep their identity. The
//! [`generation`](MessageLedger::generation) counter increments on every sweep.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use formwalk_core::{NodeId, ValueState};

/// Ledger shared between the validator and the message display.
pub type SharedLedger = Rc<RefCell<MessageLedger>>;

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// Stable identifier of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Who produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Produced by the validator.
    Engine,
    /// Produced by anything else.
    Foreign,
}

/// Severity of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Success,
    Information,
}

impl Severity {
    /// Severity matching a control indicator; `None` has no severity.
    #[must_use]
    pub fn from_value_state(state: ValueState) -> Option<Self> {
        match state {
            ValueState::None => None,
            ValueState::Error => Some(Self::Error),
            ValueState::Warning => Some(Self::Warning),
            ValueState::Success => Some(Self::Success),
            ValueState::Information => Some(Self::Information),
        }
    }
}

/// What a record is about: a control, and optionally one of its properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageTarget {
    pub control: NodeId,
    pub property: Option<String>,
}

impl MessageTarget {
    #[must_use]
    pub fn new(control: NodeId, property: Option<String>) -> Self {
        Self { control, property }
    }

    /// Target a property of a control.
    #[must_use]
    pub fn property(control: impl Into<NodeId>, property: impl Into<String>) -> Self {
        Self::new(control.into(), Some(property.into()))
    }

    /// Target a control as a whole.
    #[must_use]
    pub fn control(control: impl Into<NodeId>) -> Self {
        Self::new(control.into(), None)
    }
}

impl fmt::Display for MessageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.property {
            Some(property) => write!(f, "{}/{property}", self.control),
            None => write!(f, "{}", self.control),
        }
    }
}

/// Contents of a record, before the ledger assigns identity and origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub target: MessageTarget,
    pub text: String,
    pub severity: Severity,
    /// Human label of the field, e.g. from a sibling label control.
    pub context_label: Option<String>,
    /// Full data path of the binding involved.
    pub binding_path: Option<String>,
    /// Name of the model the binding belongs to.
    pub model: Option<String>,
}

impl MessageDraft {
    /// An error draft with no label, path or model.
    #[must_use]
    pub fn error(target: MessageTarget, text: impl Into<String>) -> Self {
        Self {
            target,
            text: text.into(),
            severity: Severity::Error,
            context_label: None,
            binding_path: None,
            model: None,
        }
    }

    #[must_use]
    pub fn with_context_label(mut self, label: Option<String>) -> Self {
        self.context_label = label;
        self
    }

    #[must_use]
    pub fn with_binding_path(mut self, path: Option<String>) -> Self {
        self.binding_path = path;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

/// One user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: MessageId,
    pub origin: Origin,
    pub target: MessageTarget,
    pub text: String,
    pub severity: Severity,
    pub context_label: Option<String>,
    pub binding_path: Option<String>,
    pub model: Option<String>,
}

impl MessageRecord {
    fn from_draft(id: MessageId, origin: Origin, draft: MessageDraft) -> Self {
        Self {
            id,
            origin,
            target: draft.target,
            text: draft.text,
            severity: draft.severity,
            context_label: draft.context_label,
            binding_path: draft.binding_path,
            model: draft.model,
        }
    }

    fn absorb(&mut self, draft: MessageDraft) {
        self.text = draft.text;
        self.severity = draft.severity;
        self.context_label = draft.context_label;
        self.binding_path = draft.binding_path;
        self.model = draft.model;
    }
}

// ---------------------------------------------------------------------------
// MessageLedger
// ---------------------------------------------------------------------------

/// Ordered, target-keyed collection of message records.
#[derive(Debug, Default)]
pub struct MessageLedger {
    records: Vec<MessageRecord>,
    /// Engine records by target, as indices into `records`.
    owned: HashMap<MessageTarget, usize>,
    retired: HashSet<MessageId>,
    next_id: u64,
    generation: u64,
}

impl MessageLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger wrapped for sharing.
    #[must_use]
    pub fn shared() -> SharedLedger {
        Rc::new(RefCell::new(Self::new()))
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    fn reindex(&mut self) {
        self.owned = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.origin == Origin::Engine)
            .map(|(i, r)| (r.target.clone(), i))
            .collect();
    }

    /// Insert an engine record, or update the engine record for the same
    /// target in place.
    pub fn upsert(&mut self, draft: MessageDraft) -> MessageId {
        if let Some(&index) = self.owned.get(&draft.target) {
            let record = &mut self.records[index];
            record.absorb(draft);
            let id = record.id;
            self.retired.remove(&id);
            return id;
        }

        let id = self.allocate_id();
        let target = draft.target.clone();
        self.records
            .push(MessageRecord::from_draft(id, Origin::Engine, draft));
        self.owned.insert(target, self.records.len() - 1);
        id
    }

    /// Add a record produced outside the validator. Foreign records are never
    /// deduplicated.
    pub fn add_foreign(&mut self, draft: MessageDraft) -> MessageId {
        let id = self.allocate_id();
        self.records
            .push(MessageRecord::from_draft(id, Origin::Foreign, draft));
        id
    }

    /// Remove every record with the given origin, returning them in order.
    pub fn remove_all_owned_by(&mut self, origin: Origin) -> Vec<MessageRecord> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|r| r.origin == origin);
        self.records = kept;
        for record in &removed {
            self.retired.remove(&record.id);
        }
        self.reindex();
        removed
    }

    /// Mark every engine record as retired. Records upserted again before the
    /// next [`sweep_retired`](Self::sweep_retired) survive it.
    pub fn retire_owned(&mut self) {
        self.retired = self
            .records
            .iter()
            .filter(|r| r.origin == Origin::Engine)
            .map(|r| r.id)
            .collect();
    }

    /// Drop retired records and advance the generation. Returns how many
    /// records were dropped.
    pub fn sweep_retired(&mut self) -> usize {
        let before = self.records.len();
        let retired = std::mem::take(&mut self.retired);
        self.records.retain(|r| !retired.contains(&r.id));
        self.reindex();
        self.generation += 1;
        before - self.records.len()
    }

    /// Engine record for a target.
    #[must_use]
    pub fn get(&self, target: &MessageTarget) -> Option<&MessageRecord> {
        self.owned.get(target).map(|&i| &self.records[i])
    }

    /// Engine records about a control, any property.
    pub fn for_control<'a>(
        &'a self,
        control: &'a NodeId,
    ) -> impl Iterator<Item = &'a MessageRecord> + 'a {
        self.owned_records()
            .filter(move |r| &r.target.control == control)
    }

    /// All records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MessageRecord> {
        self.records.iter()
    }

    /// Engine records in insertion order.
    pub fn owned_records(&self) -> impl Iterator<Item = &MessageRecord> {
        self.records.iter().filter(|r| r.origin == Origin::Engine)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of completed refreshes.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(control: &str, property: Option<&str>, text: &str) -> MessageDraft {
        MessageDraft::error(
            MessageTarget::new(control.into(), property.map(String::from)),
            text,
        )
    }

    #[test]
    fn upsert_same_target_updates_in_place() {
        let mut ledger = MessageLedger::new();
        let first = ledger.upsert(draft("a", Some("value"), "one"));
        let second = ledger.upsert(draft("a", Some("value"), "two"));
        assert_eq!(first, second);
        assert_eq!(ledger.len(), 1);
        let target = MessageTarget::property("a", "value");
        assert_eq!(ledger.get(&target).map(|r| r.text.as_str()), Some("two"));
    }

    #[test]
    fn different_properties_are_different_targets() {
        let mut ledger = MessageLedger::new();
        ledger.upsert(draft("a", Some("value"), "one"));
        ledger.upsert(draft("a", Some("text"), "two"));
        ledger.upsert(draft("a", None, "three"));
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.for_control(&"a".into()).count(), 3);
    }

    #[test]
    fn foreign_records_are_not_deduplicated_or_removed() {
        let mut ledger = MessageLedger::new();
        ledger.add_foreign(draft("a", Some("value"), "server"));
        ledger.add_foreign(draft("a", Some("value"), "server"));
        ledger.upsert(draft("a", Some("value"), "mine"));
        assert_eq!(ledger.len(), 3);

        let removed = ledger.remove_all_owned_by(Origin::Engine);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].text, "mine");
        assert_eq!(ledger.len(), 2);
        assert!(ledger.iter().all(|r| r.origin == Origin::Foreign));
        assert!(ledger.get(&MessageTarget::property("a", "value")).is_none());
    }

    #[test]
    fn refresh_keeps_reasserted_and_drops_the_rest() {
        let mut ledger = MessageLedger::new();
        let kept = ledger.upsert(draft("a", None, "a failed"));
        ledger.upsert(draft("b", None, "b failed"));
        ledger.add_foreign(draft("c", None, "foreign"));

        ledger.retire_owned();
        let again = ledger.upsert(draft("a", None, "a failed again"));
        let dropped = ledger.sweep_retired();

        assert_eq!(dropped, 1);
        assert_eq!(again, kept);
        assert_eq!(ledger.generation(), 1);
        let texts: Vec<_> = ledger.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["a failed again", "foreign"]);
    }

    #[test]
    fn index_survives_removal_of_earlier_records() {
        let mut ledger = MessageLedger::new();
        ledger.upsert(draft("a", None, "a"));
        ledger.upsert(draft("b", None, "b"));
        ledger.retire_owned();
        ledger.upsert(draft("b", None, "b2"));
        ledger.sweep_retired();

        ledger.upsert(draft("b", None, "b3"));
        assert_eq!(ledger.len(), 1);
        assert_eq!(
            ledger.get(&MessageTarget::control("b")).map(|r| r.text.as_str()),
            Some("b3")
        );
    }

    #[test]
    fn severity_maps_from_value_state() {
        assert_eq!(Severity::from_value_state(ValueState::None), None);
        assert_eq!(
            Severity::from_value_state(ValueState::Error),
            Some(Severity::Error)
        );
        assert_eq!(
            Severity::from_value_state(ValueState::Warning),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn target_display() {
        assert_eq!(MessageTarget::property("name", "value").to_string(), "name/value");
        assert_eq!(MessageTarget::control("name").to_string(), "name");
    }
}
