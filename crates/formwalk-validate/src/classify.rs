#![forbid(unsafe_code)]

//! Strategy selection for a single node.

use std::collections::HashMap;
use std::fmt;

use formwalk_core::{Control, NodeId};

use crate::config::ValidatorConfig;

/// The check applied to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Mandatory field must hold a value.
    Required,
    /// Bound value must parse and satisfy its data type.
    Constraint,
    /// The node already carries an error set outside the validator.
    ExternalError,
    /// Not validatable; the traversal expands the node's children instead.
    None,
}

impl Strategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Constraint => "constraint",
            Self::ExternalError => "external_error",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub strategy: Strategy,
    /// First property with a typed binding, when the node is enabled.
    ///
    /// Set for [`Strategy::Constraint`], and for [`Strategy::Required`] when the
    /// mandatory field is also typed: the constraint check then runs after a
    /// passing required check.
    pub constraint_property: Option<String>,
}

impl Classification {
    fn new(strategy: Strategy, constraint_property: Option<String>) -> Self {
        Self {
            strategy,
            constraint_property,
        }
    }
}

/// Decides which strategy applies to a node.
///
/// Precedence, first match wins:
/// 1. required flag set and node enabled → [`Strategy::Required`]
/// 2. typed binding on a known property and node enabled → [`Strategy::Constraint`]
/// 3. indicator already `Error`, set outside the validator → [`Strategy::ExternalError`]
/// 4. otherwise [`Strategy::None`]
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    config: &'a ValidatorConfig,
    engine_flagged: &'a HashMap<NodeId, String>,
}

impl<'a> Classifier<'a> {
    /// `engine_flagged` maps each node whose `Error` indicator the validator set
    /// during the previous pass to the text it wrote. An indicator still
    /// showing exactly that text is the validator's own, not external.
    #[must_use]
    pub fn new(config: &'a ValidatorConfig, engine_flagged: &'a HashMap<NodeId, String>) -> Self {
        Self {
            config,
            engine_flagged,
        }
    }

    #[must_use]
    pub fn classify(&self, node: &dyn Control) -> Classification {
        let enabled = node.is_effectively_enabled();
        let typed = if enabled {
            self.typed_property(node)
        } else {
            None
        };

        if enabled && node.is_marked_required() {
            Classification::new(Strategy::Required, typed)
        } else if typed.is_some() {
            Classification::new(Strategy::Constraint, typed)
        } else if self.has_external_error(node) {
            Classification::new(Strategy::ExternalError, None)
        } else {
            Classification::new(Strategy::None, None)
        }
    }

    /// First property, in configured order, bound with a declared data type.
    #[must_use]
    pub fn typed_property(&self, node: &dyn Control) -> Option<String> {
        let props = node.as_bindable()?;
        self.config
            .property_order
            .iter()
            .find(|name| {
                props
                    .binding(name)
                    .is_some_and(|binding| binding.data_type().is_some())
            })
            .cloned()
    }

    /// Whether the node shows an `Error` that the validator did not set.
    ///
    /// An error written over the validator's own indicator since the last pass
    /// counts as external.
    #[must_use]
    pub fn has_external_error(&self, node: &dyn Control) -> bool {
        node.current_value_state().is_error() && !self.is_engine_written(node)
    }

    /// Whether the node shows an `Error` left over from the validator's own
    /// previous pass, text unchanged.
    #[must_use]
    pub fn has_stale_error(&self, node: &dyn Control) -> bool {
        node.current_value_state().is_error() && self.is_engine_written(node)
    }

    fn is_engine_written(&self, node: &dyn Control) -> bool {
        let Some(written) = self.engine_flagged.get(node.id()) else {
            return false;
        };
        let shown = node
            .as_value_stateful()
            .and_then(|stateful| stateful.value_state_text())
            .unwrap_or_default();
        shown == *written
    }
}
