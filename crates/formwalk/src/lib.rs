#![forbid(unsafe_code)]

//! formwalk public facade crate.
//!
//! Re-exports the capability model and the validator, and offers a small
//! prelude for code that implements controls or runs validation passes.
//!
//! ```
//! use formwalk::prelude::*;
//! use formwalk_harness::{Input, Panel};
//!
//! let form = Panel::new("form").child("items", Input::new("name").required(true));
//! let mut validator = Validator::new();
//! assert!(!validator.validate(&form));
//! ```
//!
//! The `harness` feature re-exports the in-memory controls as
//! `formwalk::harness`.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use formwalk_core::{
    Bindable, Binding, Capabilities, ConstraintError, Container, Control, ControlKind, DataType,
    Enableable, LabelFor, NodeId, ParseError, Picker, PropertyError, Requireable, SlotContent,
    Tokenized, TypeError, Value, ValueState, ValueStateful, prop,
};

// --- Validate re-exports ---------------------------------------------------

pub use formwalk_validate::{
    MessageDraft, MessageId, MessageLedger, MessageRecord, MessageTarget, MessageTexts,
    NodeOutcome, Origin, Severity, SharedLedger, Strategy, ValidationSession, Validator,
    ValidatorConfig,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error for code that reads control properties or runs data types
/// outside a validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A property could not be read or written.
    Property(PropertyError),
    /// A value failed to parse or violated a constraint.
    Type(TypeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(err) => write!(f, "{err}"),
            Self::Type(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Property(err) => Some(err),
            Self::Type(err) => Some(err),
        }
    }
}

impl From<PropertyError> for Error {
    fn from(err: PropertyError) -> Self {
        Self::Property(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Self::Type(err)
    }
}

/// Standard result type for formwalk APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Read `property` from `control` and run it through the property's bound
/// data type, if any.
///
/// Returns the parsed value, or the raw value when the property has no typed
/// binding.
pub fn typed_value(control: &dyn Control, property: &str) -> Result<Value> {
    let props = control
        .as_bindable()
        .ok_or_else(|| PropertyError::not_applicable(property))?;
    let raw = props.property(property)?;
    match props.binding(property).and_then(Binding::data_type) {
        Some(data_type) => Ok(data_type.check(&raw)?),
        None => Ok(raw),
    }
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Control, ControlKind, Error, MessageLedger, MessageTarget, Result, Validator,
        ValidatorConfig, Value, ValueState,
    };

    pub use crate::{core, validate};
}

pub use formwalk_core as core;
#[cfg(feature = "harness")]
pub use formwalk_harness as harness;
pub use formwalk_validate as validate;
