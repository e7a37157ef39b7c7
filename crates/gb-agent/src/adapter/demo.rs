use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use gb_story::validate_pick;

use crate::error::AgentResult;

use super::{Decision, DecisionAdapter, DecisionContext};

/// Picks at random among the choices the rules allow.
#[derive(Debug, Clone)]
pub struct DemoAdapter {
    rng: StdRng,
}

impl DemoAdapter {
    /// A demo player with its own seeded RNG.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DecisionAdapter for DemoAdapter {
    fn name(&self) -> &str {
        "demo"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> AgentResult<Decision> {
        let valid: Vec<usize> = ctx
            .page
            .choices
            .iter()
            .enumerate()
            .filter(|(_, c)| validate_pick(c, ctx.character).is_ok())
            .map(|(i, _)| i + 1)
            .collect();
        let decision = match valid.choose(&mut self.rng) {
            Some(&index) => Decision::new(
                index,
                format!("random pick among {} valid choices", valid.len()),
            ),
            None => Decision::new(1, "no valid choice, taking the first"),
        };
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gb_mechanics::{Character, Occupation, ScriptedDice};
    use gb_story::{Choice, Page};
    use serde_json::json;

    #[test]
    fn only_valid_choices_are_picked() {
        let mut dice = ScriptedDice::default();
        let nurse = Character::new("Ana", Some(Occupation::Nurse), 30, &mut dice);
        let page = Page {
            id: 1,
            text: String::new(),
            choices: vec![
                Choice::from_value(&json!({"requires": {"occupation": "Police Officer"}, "goto": 2}))
                    .unwrap(),
                Choice::goto("Walk on", 3),
            ],
        };
        let ctx = DecisionContext {
            page_id: 1,
            page: &page,
            character: &nurse,
            last_rejection: None,
        };
        let mut adapter = DemoAdapter::new(5);
        for _ in 0..20 {
            assert_eq!(adapter.decide(&ctx).unwrap().index, 2);
        }
    }

    #[test]
    fn same_seed_same_picks() {
        let mut dice = ScriptedDice::default();
        let c = Character::new("Ana", None, 30, &mut dice);
        let page = Page {
            id: 1,
            text: String::new(),
            choices: (2..8).map(|p| Choice::goto("Go", p)).collect(),
        };
        let ctx = DecisionContext {
            page_id: 1,
            page: &page,
            character: &c,
            last_rejection: None,
        };
        let mut a = DemoAdapter::new(11);
        let mut b = DemoAdapter::new(11);
        for _ in 0..10 {
            assert_eq!(a.decide(&ctx).unwrap(), b.decide(&ctx).unwrap());
        }
    }
}
