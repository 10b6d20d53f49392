#![forbid(unsafe_code)]

//! Validator configuration.

use formwalk_core::prop;

/// Property names inspected by the checks, in priority order.
pub const DEFAULT_PROPERTY_ORDER: [&str; 3] = [prop::VALUE, prop::SELECTED_KEY, prop::TEXT];

/// Child slots expanded when a node is not itself validatable, in order.
pub const DEFAULT_SLOT_ORDER: [&str; 11] = [
    "items",
    "content",
    "form",
    "formContainers",
    "formElements",
    "fields",
    "sections",
    "subSections",
    "_grid",
    "cells",
    "_page",
];

/// Fallback message for an empty mandatory field.
pub const REQUIRED_MESSAGE: &str = "Please fill this mandatory field!";

/// Fallback message for a mandatory picker without a selection.
pub const PICKER_MESSAGE: &str = "Please choose an entry!";

/// Fallback message for an error set outside the validator without text.
pub const EXTERNAL_MESSAGE: &str = "Wrong input";

/// Texts used when a check fails and the control offers nothing better.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTexts {
    /// Empty mandatory field. Default: [`REQUIRED_MESSAGE`].
    pub required: String,
    /// Mandatory picker with nothing selected. Default: [`PICKER_MESSAGE`].
    pub picker: String,
    /// External error without its own text. Default: [`EXTERNAL_MESSAGE`].
    pub external: String,
}

impl Default for MessageTexts {
    fn default() -> Self {
        Self {
            required: REQUIRED_MESSAGE.to_string(),
            picker: PICKER_MESSAGE.to_string(),
            external: EXTERNAL_MESSAGE.to_string(),
        }
    }
}

/// Configuration for a [`Validator`](crate::Validator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Properties inspected by the required and constraint checks.
    /// Default: [`DEFAULT_PROPERTY_ORDER`].
    pub property_order: Vec<String>,

    /// Child slots expanded during traversal. Default: [`DEFAULT_SLOT_ORDER`].
    pub slot_order: Vec<String>,

    /// Fallback message texts.
    pub messages: MessageTexts,

    /// Use a non-empty placeholder as the message of an empty mandatory field.
    /// Default: true.
    pub placeholder_as_message: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            property_order: DEFAULT_PROPERTY_ORDER.map(String::from).to_vec(),
            slot_order: DEFAULT_SLOT_ORDER.map(String::from).to_vec(),
            messages: MessageTexts::default(),
            placeholder_as_message: true,
        }
    }
}

impl ValidatorConfig {
    /// Replace the property order.
    #[must_use]
    pub fn with_property_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.property_order = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the slot order.
    #[must_use]
    pub fn with_slot_order<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slot_order = names.into_iter().map(Into::into).collect();
        self
    }

    /// Append a slot to the end of the slot order, unless already present.
    #[must_use]
    pub fn with_slot(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.slot_order.contains(&name) {
            self.slot_order.push(name);
        }
        self
    }

    /// Replace the fallback message texts.
    #[must_use]
    pub fn with_messages(mut self, messages: MessageTexts) -> Self {
        self.messages = messages;
        self
    }

    /// Toggle placeholder text as the required-field message.
    #[must_use]
    pub fn placeholder_as_message(mut self, enabled: bool) -> Self {
        self.placeholder_as_message = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_known_toolkit_layout() {
        let config = ValidatorConfig::default();
        assert_eq!(config.property_order, ["value", "selectedKey", "text"]);
        assert_eq!(config.slot_order.len(), 11);
        assert_eq!(config.slot_order[0], "items");
        assert_eq!(config.slot_order[10], "_page");
        assert!(config.placeholder_as_message);
        assert_eq!(config.messages.required, REQUIRED_MESSAGE);
    }

    #[test]
    fn with_slot_does_not_duplicate() {
        let config = ValidatorConfig::default().with_slot("content").with_slot("rows");
        assert_eq!(config.slot_order.len(), 12);
        assert_eq!(config.slot_order.last().map(String::as_str), Some("rows"));
    }

    #[test]
    fn builders_replace_orders() {
        let config = ValidatorConfig::default()
            .with_property_order(["text"])
            .with_slot_order(Vec::<String>::new())
            .placeholder_as_message(false);
        assert_eq!(config.property_order, ["text"]);
        assert!(config.slot_order.is_empty());
        assert!(!config.placeholder_as_message);
    }
}
