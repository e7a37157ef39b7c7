//! Configuration for a gamebook session.

use gb_mechanics::sheet::DEFAULT_HISTORY_LIMIT;
use gb_story::PageId;

/// Largest history bound a session accepts.
pub const MAX_HISTORY_LIMIT: usize = 1000;

/// Consecutive rejected decisions that trip the circuit breaker by default.
pub const DEFAULT_MAX_INVALID_DECISIONS: u32 = 3;

/// Configuration for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// RNG seed for reproducible dice. A random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Decision history entries kept (1-1000).
    pub history_limit: usize,
    /// Rejected decisions in a row before the session aborts (at least 1).
    pub max_invalid_decisions: u32,
    /// Page the story starts on.
    pub start_page: PageId,
    /// Turn cap for cyclic content.
    pub max_turns: Option<u32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            seed: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_invalid_decisions: DEFAULT_MAX_INVALID_DECISIONS,
            start_page: 1,
            max_turns: None,
        }
    }
}

impl AgentConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the history bound (clamped to 1-1000).
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        self
    }

    /// Set the circuit breaker threshold (at least 1).
    pub fn with_max_invalid_decisions(mut self, max: u32) -> Self {
        self.max_invalid_decisions = max.max(1);
        self
    }

    /// Set the starting page.
    pub fn with_start_page(mut self, page: PageId) -> Self {
        self.start_page = page;
        self
    }

    /// Cap the number of turns.
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = Some(turns);
        self
    }

    /// The configured seed, or a fresh one from the thread RNG.
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            let seed = rand::random::<u64>();
            tracing::info!(seed, "no seed configured, drew one");
            seed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = AgentConfig::default();
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.history_limit, 30);
        assert_eq!(cfg.max_invalid_decisions, 3);
        assert_eq!(cfg.start_page, 1);
        assert_eq!(cfg.max_turns, None);
    }

    #[test]
    fn builder_methods() {
        let cfg = AgentConfig::default()
            .with_seed(7)
            .with_history_limit(20)
            .with_max_invalid_decisions(5)
            .with_start_page(4)
            .with_max_turns(50);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.history_limit, 20);
        assert_eq!(cfg.max_invalid_decisions, 5);
        assert_eq!(cfg.start_page, 4);
        assert_eq!(cfg.max_turns, Some(50));
    }

    #[test]
    fn limits_clamped() {
        let cfg = AgentConfig::default()
            .with_history_limit(0)
            .with_max_invalid_decisions(0);
        assert_eq!(cfg.history_limit, 1);
        assert_eq!(cfg.max_invalid_decisions, 1);
        assert_eq!(AgentConfig::default().with_history_limit(5000).history_limit, 1000);
    }

    #[test]
    fn configured_seed_is_kept() {
        assert_eq!(AgentConfig::default().with_seed(99).seed_or_random(), 99);
    }
}
