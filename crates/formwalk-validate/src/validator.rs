#![forbid(unsafe_code)]

//! The validator: one pass over a control tree.
//!
//! # Example
//!
//! ```rust
//! use formwalk_harness::{Input, Panel};
//! use formwalk_validate::Validator;
//!
//! let form = Panel::new("form")
//!     .child("content", Input::new("name").required(true))
//!     .child("content", Input::new("city").required(true).value("Utrecht"));
//!
//! let mut validator = Validator::new();
//! assert!(!validator.validate(&form));
//! assert!(!validator.is_valid());
//! assert_eq!(validator.ledger().borrow().len(), 1);
//! ```
//!
//! # Failure Modes
//!
//! | Scenario | Behavior |
//! |----------|----------|
//! | Property not applicable to a control | Rule skipped, no failure |
//! | Unparseable or out-of-range bound value | Node invalid, `Error` indicator, one record |
//! | Slot holding something that is not a control | Slot skipped, warning logged |
//! | Invisible or foreign root | Session completes valid, nothing visited |

use std::collections::HashMap;
use std::rc::Rc;

use formwalk_core::{Control, NodeId, ValueState, debug, debug_span, trace};

use crate::classify::{Classification, Classifier, Strategy};
use crate::config::ValidatorConfig;
use crate::label::context_label;
use crate::ledger::{MessageDraft, MessageLedger, MessageTarget, Severity, SharedLedger};
use crate::session::{NodeOutcome, ValidationSession};
use crate::strategy::{
    Failure, Verdict, check_constraint, check_external_error, check_required,
    external_error_text,
};
use crate::walk::{Flow, VisitContext, Visitor, walk};

/// Validates control trees and publishes failures to a message ledger.
#[derive(Debug)]
pub struct Validator {
    config: ValidatorConfig,
    ledger: SharedLedger,
    session: Option<ValidationSession>,
    /// Nodes whose `Error` indicator this validator set during the last pass,
    /// with the text it wrote.
    flagged: HashMap<NodeId, String>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Validator with default configuration and its own ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    #[must_use]
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self::with_ledger(config, MessageLedger::shared())
    }

    /// Validator publishing into an existing ledger.
    #[must_use]
    pub fn with_ledger(config: ValidatorConfig, ledger: SharedLedger) -> Self {
        Self {
            config,
            ledger,
            session: None,
            flagged: HashMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// The ledger this validator publishes into.
    #[must_use]
    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// The last session, if `validate` ran since construction or the last
    /// `clear_value_state`.
    #[must_use]
    pub fn session(&self) -> Option<&ValidationSession> {
        self.session.as_ref()
    }

    /// `true` only if a pass has completed and nothing failed in it.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.session.as_ref().is_some_and(ValidationSession::is_valid)
    }

    /// Validate `root` and everything below it.
    ///
    /// Replaces the previous session, refreshes this validator's records in the
    /// ledger, and returns the overall verdict. Never fails.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn validate(&mut self, root: &dyn Control) -> bool {
        let span = debug_span!("validate_pass", root = %root.id());
        let _guard = span.enter();

        let previous = std::mem::take(&mut self.flagged);
        let ledger = Rc::clone(&self.ledger);
        let mut ledger = ledger.borrow_mut();
        ledger.retire_owned();

        let mut visitor = ValidateVisitor {
            config: &self.config,
            classifier: Classifier::new(&self.config, &previous),
            ledger: &mut *ledger,
            session: ValidationSession::new(),
            flagged: HashMap::new(),
        };
        walk(root, &self.config.slot_order, &mut visitor);

        let ValidateVisitor {
            mut session,
            flagged,
            ..
        } = visitor;
        session.finish();
        let dropped = ledger.sweep_retired();
        debug!(
            valid = session.is_valid(),
            failures = session.failures(),
            dropped,
            generation = ledger.generation(),
            "validation pass finished"
        );

        self.flagged = flagged;
        self.session = Some(session);
        self.is_valid()
    }

    /// Reset every indicator below `root` to neutral and clear its text.
    ///
    /// The ledger is left alone. The current session is dropped, so
    /// `is_valid()` is `false` until the next `validate`.
    pub fn clear_value_state(&mut self, root: &dyn Control) {
        let span = debug_span!("clear_pass", root = %root.id());
        let _guard = span.enter();

        let mut visitor = ClearVisitor { cleared: 0 };
        walk(root, &self.config.slot_order, &mut visitor);
        debug!(cleared = visitor.cleared, "indicators cleared");

        self.flagged.clear();
        self.session = None;
    }
}

// ---------------------------------------------------------------------------
// Visitors
// ---------------------------------------------------------------------------

struct ValidateVisitor<'v> {
    config: &'v ValidatorConfig,
    classifier: Classifier<'v>,
    ledger: &'v mut MessageLedger,
    session: ValidationSession,
    flagged: HashMap<NodeId, String>,
}

impl ValidateVisitor<'_> {
    fn execute(&self, node: &dyn Control, classification: &Classification) -> Verdict {
        match classification.strategy {
            Strategy::Required => {
                let verdict = check_required(node, self.config);
                let Some(property) = classification.constraint_property.as_deref() else {
                    return verdict;
                };
                if !verdict.passed() {
                    return verdict;
                }
                match check_constraint(node, property) {
                    Verdict::NoOpinion => verdict,
                    layered => layered,
                }
            }
            Strategy::Constraint => match &classification.constraint_property {
                Some(property) => check_constraint(node, property),
                None => Verdict::NoOpinion,
            },
            Strategy::ExternalError => check_external_error(node, self.config),
            Strategy::None => Verdict::NoOpinion,
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn report(&mut self, node: &dyn Control, cx: &VisitContext<'_, '_>, failure: &Failure) {
        let binding = failure
            .property
            .as_deref()
            .and_then(|p| node.as_bindable().and_then(|props| props.binding(p)));
        let severity =
            Severity::from_value_state(node.current_value_state()).unwrap_or(Severity::Error);

        let draft = MessageDraft {
            target: MessageTarget::new(node.id().clone(), failure.property.clone()),
            text: failure.message.clone(),
            severity,
            context_label: context_label(node, cx),
            binding_path: binding.map(|b| b.full_path()),
            model: binding.and_then(|b| b.model()).map(String::from),
        };
        let id = self.ledger.upsert(draft);
        trace!(node = %node.id(), message = id.get(), text = %failure.message, "failure recorded");
        self.session.fail();
    }
}

impl<'a> Visitor<'a> for ValidateVisitor<'_> {
    fn visit(&mut self, node: &'a dyn Control, cx: &VisitContext<'a, '_>) -> Flow {
        if !node.is_visible() || !node.kind().is_recognized() {
            trace!(node = %node.id(), "skipped");
            self.session.record(node.id(), NodeOutcome::Skipped);
            return Flow::Prune;
        }

        let classification = self.classifier.classify(node);
        if classification.strategy == Strategy::None {
            if self.classifier.has_stale_error(node) {
                if let Some(stateful) = node.as_value_stateful() {
                    stateful.set_value_state(ValueState::None, "");
                }
            }
            self.session.record(node.id(), NodeOutcome::Recursed);
            return Flow::Descend;
        }

        // An error set outside the validator stands whatever the structural
        // check says; capture it before the check rewrites the indicator.
        let external = (classification.strategy != Strategy::ExternalError
            && self.classifier.has_external_error(node))
        .then(|| {
            let raw = node
                .as_value_stateful()
                .and_then(|s| s.value_state_text())
                .unwrap_or_default();
            (raw, external_error_text(node, self.config))
        });

        let verdict = self.execute(node, &classification);
        let mut valid = verdict.passed();
        if let Some(failure) = verdict.failure() {
            self.report(node, cx, failure);
            if classification.strategy != Strategy::ExternalError && external.is_none() {
                self.flagged.insert(node.id().clone(), failure.message.clone());
            }
        }
        if let Some((raw, message)) = external {
            if let Some(stateful) = node.as_value_stateful() {
                stateful.set_value_state(ValueState::Error, &raw);
            }
            let failure = Failure {
                property: None,
                message,
            };
            self.report(node, cx, &failure);
            valid = false;
        }

        debug!(
            node = %node.id(),
            strategy = %classification.strategy,
            valid,
            "checked"
        );
        self.session.record(
            node.id(),
            NodeOutcome::Checked {
                strategy: classification.strategy,
                valid,
            },
        );
        Flow::Prune
    }
}

struct ClearVisitor {
    cleared: usize,
}

impl<'a> Visitor<'a> for ClearVisitor {
    fn visit(&mut self, node: &'a dyn Control, _cx: &VisitContext<'a, '_>) -> Flow {
        if let Some(stateful) = node.as_value_stateful() {
            stateful.set_value_state(ValueState::None, "");
            self.cleared += 1;
        }
        Flow::Descend
    }
}
