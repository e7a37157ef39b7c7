//! Error types for the session loop and decision adapters.

use thiserror::Error;

/// Result type for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors raised while obtaining or validating a decision.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The player asked to stop.
    #[error("decision cancelled")]
    Cancelled,

    /// A scripted player ran out of picks.
    #[error("script exhausted after {0} decisions")]
    ScriptExhausted(usize),

    /// The picked index is not on the page.
    #[error("choice {index} is out of range 1-{available}")]
    OutOfRange {
        /// The 1-based index picked.
        index: usize,
        /// Number of choices on the page.
        available: usize,
    },

    /// Input that is not a choice number.
    #[error("not a choice number: '{0}'")]
    InvalidInput(String),

    /// The pick breaks the page's rules.
    #[error("{0}")]
    Rejected(#[from] gb_story::PickRejection),

    /// Reading input failed.
    #[error("could not read a decision: {0}")]
    Io(#[from] std::io::Error),
}

impl AgentError {
    /// Whether this error ends the session instead of counting as a bad pick.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Cancelled | Self::ScriptExhausted(_) | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupts_versus_rejections() {
        assert!(AgentError::Cancelled.is_interrupt());
        assert!(AgentError::ScriptExhausted(2).is_interrupt());
        assert!(!AgentError::InvalidInput("x".into()).is_interrupt());
        let err = AgentError::OutOfRange {
            index: 4,
            available: 2,
        };
        assert!(!err.is_interrupt());
        assert_eq!(err.to_string(), "choice 4 is out of range 1-2");
    }
}
