#![forbid(unsafe_code)]

//! State of one validation pass.

use formwalk_core::NodeId;

use crate::classify::Strategy;

/// Where the traversal left a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    /// Invisible or of an unrecognized kind; children not visited.
    Skipped,
    /// A strategy ran.
    Checked { strategy: Strategy, valid: bool },
    /// Not validatable; children were visited.
    Recursed,
}

/// Result of one `validate` call.
///
/// `overall_valid` starts `true` and can only go `false`. `has_run` is set once
/// the traversal returns, and the session is only meaningful after that.
#[derive(Debug, Clone)]
pub struct ValidationSession {
    overall_valid: bool,
    has_run: bool,
    outcomes: Vec<(NodeId, NodeOutcome)>,
    failures: usize,
}

impl Default for ValidationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            overall_valid: true,
            has_run: false,
            outcomes: Vec::new(),
            failures: 0,
        }
    }

    pub(crate) fn record(&mut self, node: &NodeId, outcome: NodeOutcome) {
        self.outcomes.push((node.clone(), outcome));
    }

    pub(crate) fn fail(&mut self) {
        self.overall_valid = false;
        self.failures += 1;
    }

    pub(crate) fn finish(&mut self) {
        self.has_run = true;
    }

    /// `true` once the pass completed with no failure.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.has_run && self.overall_valid
    }

    #[must_use]
    pub fn has_run(&self) -> bool {
        self.has_run
    }

    #[must_use]
    pub fn overall_valid(&self) -> bool {
        self.overall_valid
    }

    /// Number of failures reported, counting each failing check once.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Visited nodes with their outcome, in traversal order.
    #[must_use]
    pub fn outcomes(&self) -> &[(NodeId, NodeOutcome)] {
        &self.outcomes
    }

    /// Outcome of a node, `None` if the traversal never reached it.
    #[must_use]
    pub fn outcome(&self, node: &NodeId) -> Option<NodeOutcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| id == node)
            .map(|(_, outcome)| *outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_not_valid_until_finished() {
        let mut session = ValidationSession::new();
        assert!(session.overall_valid());
        assert!(!session.is_valid());
        session.finish();
        assert!(session.is_valid());
    }

    #[test]
    fn failure_is_sticky() {
        let mut session = ValidationSession::new();
        session.fail();
        session.record(
            &"x".into(),
            NodeOutcome::Checked {
                strategy: Strategy::Required,
                valid: true,
            },
        );
        session.finish();
        assert!(!session.is_valid());
        assert_eq!(session.failures(), 1);
    }

    #[test]
    fn outcome_lookup() {
        let mut session = ValidationSession::new();
        session.record(&"a".into(), NodeOutcome::Recursed);
        session.record(&"b".into(), NodeOutcome::Skipped);
        assert_eq!(session.outcome(&"b".into()), Some(NodeOutcome::Skipped));
        assert_eq!(session.outcome(&"c".into()), None);
        assert_eq!(session.outcomes().len(), 2);
    }
}
