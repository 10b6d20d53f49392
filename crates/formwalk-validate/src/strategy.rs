#![forbid(unsafe_code)]

//! The three checks: required, constraint, and external error.
//!
//! Each check sets the node's indicator itself (except the external-error
//! check, which never touches it) and returns a [`Verdict`]. Property access
//! failures never turn into validation failures: a check that cannot read what
//! it needs has no opinion.

use formwalk_core::{Control, ValueState, prop, trace};

use crate::config::ValidatorConfig;

/// Why a node failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Property the failure is about; `None` for node-level errors.
    pub property: Option<String>,
    /// Message shown to the user.
    pub message: String,
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Failure),
    /// The check did not apply. Counts as valid.
    NoOpinion,
}

impl Verdict {
    /// `true` for `Valid` and `NoOpinion`.
    #[must_use]
    pub fn passed(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }

    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Invalid(failure) => Some(failure),
            _ => None,
        }
    }
}

fn set_indicator(node: &dyn Control, state: ValueState, text: &str) {
    if let Some(stateful) = node.as_value_stateful() {
        stateful.set_value_state(state, text);
    }
}

fn fail(node: &dyn Control, property: &str, message: String) -> Verdict {
    set_indicator(node, ValueState::Error, &message);
    Verdict::Invalid(Failure {
        property: Some(property.to_string()),
        message,
    })
}

fn pass(node: &dyn Control) -> Verdict {
    set_indicator(node, ValueState::None, "");
    Verdict::Valid
}

fn required_message(node: &dyn Control, config: &ValidatorConfig) -> String {
    if config.placeholder_as_message {
        let placeholder = node
            .as_bindable()
            .and_then(|props| props.property(prop::PLACEHOLDER).ok())
            .filter(|value| !value.is_blank());
        if let Some(placeholder) = placeholder {
            return placeholder.to_string();
        }
    }
    config.messages.required.clone()
}

// ---------------------------------------------------------------------------
// Required
// ---------------------------------------------------------------------------

/// Check that a mandatory field holds a value.
///
/// Multi-token controls are decided by their token count alone. Other controls
/// pass on the first readable, non-blank property in configured order; a
/// picker additionally needs a selected key.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub fn check_required(node: &dyn Control, config: &ValidatorConfig) -> Verdict {
    let first_property = config
        .property_order
        .first()
        .map_or(prop::VALUE, String::as_str);

    if let Some(tokens) = node.as_tokenized() {
        return if tokens.token_count() > 0 {
            pass(node)
        } else {
            fail(node, first_property, required_message(node, config))
        };
    }

    let Some(props) = node.as_bindable() else {
        return Verdict::NoOpinion;
    };

    let mut first_readable: Option<&str> = None;
    for name in &config.property_order {
        let value = match props.property(name) {
            Ok(value) => value,
            Err(err) => {
                trace!(node = %node.id(), error = %err, "required: property skipped");
                continue;
            }
        };
        first_readable.get_or_insert(name.as_str());
        if value.is_blank() {
            continue;
        }

        if let Some(picker) = node.as_picker() {
            if picker.selected_key().is_empty() {
                return fail(node, prop::SELECTED_KEY, config.messages.picker.clone());
            }
        }
        return pass(node);
    }

    match first_readable {
        Some(name) => fail(node, name, required_message(node, config)),
        None => Verdict::NoOpinion,
    }
}

// ---------------------------------------------------------------------------
// Constraint
// ---------------------------------------------------------------------------

/// Run the bound data type's parse-then-validate pipeline on `property`.
///
/// Nodes whose `editable` property reads `false` are skipped.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub fn check_constraint(node: &dyn Control, property: &str) -> Verdict {
    let Some(props) = node.as_bindable() else {
        return Verdict::NoOpinion;
    };
    let Some(data_type) = props.binding(property).and_then(|b| b.data_type()) else {
        return Verdict::NoOpinion;
    };

    let editable = props
        .property(prop::EDITABLE)
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(true);
    if !editable {
        trace!(node = %node.id(), "constraint: not editable, skipped");
        return Verdict::NoOpinion;
    }

    let value = match props.property(property) {
        Ok(value) => value,
        Err(err) => {
            trace!(node = %node.id(), error = %err, "constraint: value unreadable");
            return Verdict::NoOpinion;
        }
    };

    match data_type.check(&value) {
        Ok(_) => pass(node),
        Err(err) => {
            trace!(
                node = %node.id(),
                data_type = data_type.name(),
                error = %err,
                "constraint: rejected"
            );
            fail(node, property, err.message().to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// External error
// ---------------------------------------------------------------------------

/// Text of an externally set error, or the configured fallback.
#[must_use]
pub fn external_error_text(node: &dyn Control, config: &ValidatorConfig) -> String {
    node.as_value_stateful()
        .and_then(|stateful| stateful.value_state_text())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| config.messages.external.clone())
}

/// Accept an error set outside the validator as a failure. The indicator is
/// left exactly as it is.
pub fn check_external_error(node: &dyn Control, config: &ValidatorConfig) -> Verdict {
    if !node.current_value_state().is_error() {
        return Verdict::NoOpinion;
    }
    Verdict::Invalid(Failure {
        property: None,
        message: external_error_text(node, config),
    })
}
