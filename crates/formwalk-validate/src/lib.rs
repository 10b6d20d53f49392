#![forbid(unsafe_code)]

//! Recursive validation of control trees.
//!
//! A [`Validator`] walks a control tree depth-first. For every visible node it
//! picks one strategy:
//!
//! - **Required**: a mandatory, enabled field must hold a value. When the field
//!   is also bound with a data type, the constraint check runs on top of a
//!   passing required check.
//! - **Constraint**: an enabled field bound with a data type must parse and
//!   satisfy the type.
//! - **External error**: a node whose error indicator was set by someone else
//!   is invalid as it stands.
//!
//! Nodes without a strategy are containers: their child slots are expanded in
//! configured order and the walk continues below them. Failures set the node's
//! indicator and are published to a shared [`MessageLedger`], one record per
//! control and property, updated in place across passes.
//!
//! # Invariants
//!
//! 1. **No revisits**: each node is visited at most once per pass.
//! 2. **Invisible means untouched**: invisible nodes keep their indicator,
//!    produce no record, and their children are not visited.
//! 3. **Idempotence**: two passes over an unchanged tree give the same verdict
//!    and the same set of records.
//! 4. **Foreign records survive**: the validator never removes records it did
//!    not create.

pub mod classify;
pub mod config;
pub mod label;
pub mod ledger;
pub mod session;
pub mod strategy;
pub mod validator;
pub mod walk;

pub use classify::{Classification, Classifier, Strategy};
pub use config::{MessageTexts, ValidatorConfig};
pub use ledger::{
    MessageDraft, MessageId, MessageLedger, MessageRecord, MessageTarget, Origin, Severity,
    SharedLedger,
};
pub use session::{NodeOutcome, ValidationSession};
pub use strategy::{Failure, Verdict};
pub use validator::Validator;
pub use walk::{Flow, VisitContext, Visitor, walk};
