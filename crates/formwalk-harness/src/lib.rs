#![forbid(unsafe_code)]

//! Test harness for formwalk.
//!
//! - **Controls**: in-memory [`Input`], [`MultiInput`], [`Select`], [`Text`],
//!   [`Label`], and [`Panel`] implementing the capability facets.
//! - **Data types**: [`IntegerType`], [`DateType`], and [`StringType`] for
//!   typed bindings.
//! - **State dumps**: render a tree's indicators as text and compare them
//!   against an expected dump.
//!
//! # Quick Start
//!
//! ```
//! use formwalk_core::ValueState;
//! use formwalk_harness::{Input, Panel, assert_state_dump};
//!
//! let form = Panel::new("form")
//!     .child("content", Input::new("name").with_value_state(ValueState::Error, "taken"));
//! assert_state_dump(&form, &["content"], "form\n  name [Error] taken\n");
//! ```

pub mod controls;
pub mod dump;
pub mod types;

pub use controls::{Input, Label, MultiInput, Panel, Select, Text};
pub use dump::{assert_state_dump, state_dump};
pub use types::{DateType, IntegerType, StringType};
