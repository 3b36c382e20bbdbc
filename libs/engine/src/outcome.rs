//! The result reported back to the trigger source after each pass.

use std::time::Duration;

use serde::Serialize;

/// The action the engine took this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Nothing to do, or the pass deliberately skipped mutation.
    None,
    /// The external object was created and its identifier recorded.
    Created,
    /// Drift was corrected on the external object.
    Updated,
    /// The external object is gone and the identifier cleared.
    Deleted,
}

/// Everything the trigger source needs from one reconciliation pass.
/// Serializable so trigger sources can report it over their own wire.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileOutcome {
    /// What the engine did.
    pub action: Action,

    /// Whether the external object exists after this pass.
    pub exists: bool,

    /// Whether the observed state matched the desired state. Always false
    /// immediately after a mutation; the next observe confirms convergence.
    pub up_to_date: bool,

    /// Explicit hint to re-invoke sooner than the default cadence, e.g.
    /// after a one-shot action or while the provider is mid-transition.
    pub requeue_after: Option<Duration>,

    /// Non-fatal problems: best-effort side effects that failed, ineligible
    /// one-shot actions, out-of-band deletions awaiting a caller decision.
    pub warnings: Vec<String>,
}

impl ReconcileOutcome {
    pub(crate) fn new(action: Action, exists: bool, up_to_date: bool) -> Self {
        Self {
            action,
            exists,
            up_to_date,
            requeue_after: None,
            warnings: Vec::new(),
        }
    }

    /// True when the pass converged with nothing left to report.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Action::Created).unwrap(), "\"created\"");
        assert_eq!(serde_json::to_string(&Action::None).unwrap(), "\"none\"");
    }

    #[test]
    fn test_outcome_starts_clean() {
        let outcome = ReconcileOutcome::new(Action::None, true, true);
        assert!(outcome.is_clean());
        assert!(outcome.requeue_after.is_none());
    }
}
