//! GOAP configuration errors.
//!
//! All of these surface during agent setup. Inside the tick loop nothing is
//! fatal: a failed plan is retried next tick and unknown beliefs evaluate as
//! false with a warning.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoapError {
    #[error("belief '{0}' is not registered")]
    UnknownBelief(String),

    #[error("belief '{0}' is already registered")]
    DuplicateBelief(String),

    #[error("action '{0}' is already registered")]
    DuplicateAction(String),

    #[error("goal '{0}' is already registered")]
    DuplicateGoal(String),

    #[error("action '{0}' was built without a strategy")]
    MissingStrategy(String),
}
