#![forbid(unsafe_code)]

//! Errors raised by controls when a property is read or written.

use std::fmt;

/// Failure to access a named property on a control.
///
/// The engine treats every variant as "this rule does not apply to the node",
/// never as a validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The control has no property with this name.
    NotApplicable {
        /// Property that was requested.
        property: String,
    },
    /// The property exists but cannot be written.
    ReadOnly {
        /// Property that was written.
        property: String,
    },
    /// The property exists but the control refused the access.
    Unreadable {
        /// Property that was requested.
        property: String,
        /// Reason reported by the control.
        reason: String,
    },
}

impl PropertyError {
    /// Shorthand for [`PropertyError::NotApplicable`].
    #[must_use]
    pub fn not_applicable(property: impl Into<String>) -> Self {
        Self::NotApplicable {
            property: property.into(),
        }
    }

    /// Name of the property involved.
    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            Self::NotApplicable { property }
            | Self::ReadOnly { property }
            | Self::Unreadable { property, .. } => property,
        }
    }
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable { property } => {
                write!(f, "property `{property}` does not apply to this control")
            }
            Self::ReadOnly { property } => write!(f, "property `{property}` is read-only"),
            Self::Unreadable { property, reason } => {
                write!(f, "property `{property}` cannot be read: {reason}")
            }
        }
    }
}

impl std::error::Error for PropertyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_property() {
        let err = PropertyError::not_applicable("selectedKey");
        assert_eq!(
            err.to_string(),
            "property `selectedKey` does not apply to this control"
        );
        assert_eq!(err.property(), "selectedKey");
    }

    #[test]
    fn unreadable_carries_reason() {
        let err = PropertyError::Unreadable {
            property: "value".into(),
            reason: "detached".into(),
        };
        assert_eq!(err.to_string(), "property `value` cannot be read: detached");
    }
}
