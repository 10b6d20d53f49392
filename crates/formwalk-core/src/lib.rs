#![forbid(unsafe_code)]

//! Core: the control-tree capability model, values, bindings, and logging.

pub mod binding;
pub mod control;
pub mod error;
pub mod logging;
pub mod slot;
pub mod value;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};

pub use binding::{Binding, ConstraintError, DataType, ParseError, TypeError};
pub use control::{
    Bindable, Capabilities, Container, Control, ControlKind, Enableable, LabelFor, NodeId, Picker,
    Requireable, Tokenized, ValueStateful,
};
pub use error::PropertyError;
pub use slot::SlotContent;
pub use value::{Value, ValueState};

/// Well-known property names.
pub mod prop {
    /// Main value of inputs.
    pub const VALUE: &str = "value";
    /// Selected key of pickers.
    pub const SELECTED_KEY: &str = "selectedKey";
    /// Text of texts and labels.
    pub const TEXT: &str = "text";
    /// Whether the user may change the value.
    pub const EDITABLE: &str = "editable";
    /// Hint shown in an empty input.
    pub const PLACEHOLDER: &str = "placeholder";
}
