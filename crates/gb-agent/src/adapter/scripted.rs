use crate::error::{AgentError, AgentResult};

use super::{Decision, DecisionAdapter, DecisionContext};

/// Replays a fixed list of picks.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAdapter {
    picks: Vec<usize>,
    next: usize,
}

impl ScriptedAdapter {
    /// Picks are 1-based choice indices, used in order.
    pub fn new(picks: impl Into<Vec<usize>>) -> Self {
        Self {
            picks: picks.into(),
            next: 0,
        }
    }

    /// Picks not yet used.
    pub fn remaining(&self) -> usize {
        self.picks.len().saturating_sub(self.next)
    }
}

impl DecisionAdapter for ScriptedAdapter {
    fn name(&self) -> &str {
        "scripted"
    }

    fn decide(&mut self, _ctx: &DecisionContext<'_>) -> AgentResult<Decision> {
        let index = *self
            .picks
            .get(self.next)
            .ok_or(AgentError::ScriptExhausted(self.next))?;
        self.next += 1;
        Ok(Decision::new(index, format!("scripted pick {}", self.next)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gb_mechanics::{Character, ScriptedDice};
    use gb_story::{Choice, Page};

    #[test]
    fn replays_then_runs_out() {
        let mut dice = ScriptedDice::default();
        let character = Character::new("Ana", None, 30, &mut dice);
        let page = Page {
            id: 1,
            text: String::new(),
            choices: vec![Choice::goto("On", 2)],
        };
        let ctx = DecisionContext {
            page_id: 1,
            page: &page,
            character: &character,
            last_rejection: None,
        };
        let mut adapter = ScriptedAdapter::new(vec![2, 1]);
        assert_eq!(adapter.decide(&ctx).unwrap().index, 2);
        assert_eq!(adapter.remaining(), 1);
        assert_eq!(adapter.decide(&ctx).unwrap().index, 1);
        assert!(matches!(
            adapter.decide(&ctx),
            Err(AgentError::ScriptExhausted(2))
        ));
    }
}
