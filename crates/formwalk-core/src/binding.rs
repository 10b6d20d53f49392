#![forbid(unsafe_code)]

//! Data bindings and declared data types.
//!
//! A [`Binding`] ties a control property to a path in a model. When the binding
//! declares a [`DataType`], the displayed value can be parsed into an internal
//! value and checked against the type's constraints. The engine only calls
//! into the type; the parsing and the constraints belong to whoever provides
//! it.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The displayed value could not be parsed by the data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable description, shown to the user as-is.
    pub message: String,
}

impl ParseError {
    /// Create a parse error with the given description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ParseError {}

/// The parsed value violates a constraint of the data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintError {
    /// Human-readable description, shown to the user as-is.
    pub message: String,
    /// Names of the violated constraints (e.g. `"minimum"`).
    pub violated: Vec<String>,
}

impl ConstraintError {
    /// Create a constraint error with the given description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            violated: Vec::new(),
        }
    }

    /// Record the name of a violated constraint.
    #[must_use]
    pub fn with_violated(mut self, constraint: impl Into<String>) -> Self {
        self.violated.push(constraint.into());
        self
    }
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ConstraintError {}

/// Either failure of the parse-then-validate pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    Parse(ParseError),
    Constraint(ConstraintError),
}

impl TypeError {
    /// Description to show next to the field.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Parse(e) => &e.message,
            Self::Constraint(e) => &e.message,
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for TypeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Constraint(e) => Some(e),
        }
    }
}

impl From<ParseError> for TypeError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<ConstraintError> for TypeError {
    fn from(err: ConstraintError) -> Self {
        Self::Constraint(err)
    }
}

// ---------------------------------------------------------------------------
// DataType
// ---------------------------------------------------------------------------

/// A declared data type with parse and constraint logic.
pub trait DataType: fmt::Debug {
    /// Short type name for logs (e.g. `"Integer"`).
    fn name(&self) -> &str;

    /// Convert a displayed value into the internal representation.
    fn parse_value(&self, external: &Value) -> Result<Value, ParseError>;

    /// Check an internal value against the type's constraints.
    fn validate_value(&self, internal: &Value) -> Result<(), ConstraintError>;

    /// Parse, then validate.
    fn check(&self, external: &Value) -> Result<Value, TypeError> {
        let internal = self.parse_value(external)?;
        self.validate_value(&internal)?;
        Ok(internal)
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// Association between a control property and a model path.
#[derive(Debug, Clone)]
pub struct Binding {
    path: String,
    context: Option<String>,
    model: Option<String>,
    data_type: Option<Arc<dyn DataType>>,
}

impl Binding {
    /// Bind to `path` without a declared type.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            context: None,
            model: None,
            data_type: None,
        }
    }

    /// Bind to `path` with a declared type.
    #[must_use]
    pub fn typed(path: impl Into<String>, data_type: Arc<dyn DataType>) -> Self {
        Self::new(path).with_type(data_type)
    }

    /// Set the declared type.
    #[must_use]
    pub fn with_type(mut self, data_type: Arc<dyn DataType>) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Set the binding context path (e.g. `/customers/0`).
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the name of the model the binding belongs to.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Path relative to the context.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Context path, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Model name, if any.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Declared data type, if any.
    #[must_use]
    pub fn data_type(&self) -> Option<&dyn DataType> {
        self.data_type.as_deref()
    }

    /// Full data path: `<context>/<path>`, or just the path without a context.
    #[must_use]
    pub fn full_path(&self) -> String {
        match &self.context {
            Some(ctx) => format!("{ctx}/{}", self.path),
            None => self.path.clone(),
        }
    }
}
