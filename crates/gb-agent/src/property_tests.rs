//! Property tests for the session loop.

use proptest::prelude::*;

use gb_mechanics::{Character, Occupation, ScriptedDice};
use gb_story::{JsonPageRepository, Language};

use crate::adapter::DemoAdapter;
use crate::config::AgentConfig;
use crate::selector::{AdapterSelector, ResolverSelector};
use crate::session::{Session, SessionState, Termination};

const CYCLE: &str = r#"{
    "1": {"text": "Round.", "choices": [{"goto": 2}]},
    "2": {"text": "And round.", "choices": [{"goto": 1}]}
}"#;

fn occupation() -> impl Strategy<Value = Option<Occupation>> {
    prop::option::of(prop::sample::select(Occupation::ALL.to_vec()))
}

fn character(occupation: Option<Occupation>, luck_faces: (u32, u32)) -> Character {
    let mut dice = ScriptedDice::from_faces(vec![luck_faces.0, luck_faces.1]);
    Character::new("Prop", occupation, 30, &mut dice)
}

proptest! {
    #[test]
    fn history_never_exceeds_limit(limit in 1usize..10, turns in 1u32..40) {
        let repo = JsonPageRepository::from_json_str(CYCLE).unwrap();
        let cfg = AgentConfig::default()
            .with_seed(3)
            .with_history_limit(limit)
            .with_max_turns(turns);
        let mut s = Session::new(repo, character(None, (5, 5)), ResolverSelector, cfg);
        let report = s.run();
        prop_assert_eq!(report.termination, Termination::TurnLimit { turns });
        prop_assert_eq!(s.character().history().len(), limit.min(turns as usize));
    }

    #[test]
    fn autonomous_bundled_runs_end(seed in any::<u64>(), occ in occupation(), luck in (1u32..=10, 1u32..=10)) {
        let repo = JsonPageRepository::bundled(Language::En).unwrap();
        let cfg = AgentConfig::default().with_seed(seed).with_max_turns(60);
        let report = Session::new(repo, character(occ, luck), ResolverSelector, cfg).run();
        prop_assert!(report.termination.is_graceful(), "{}", report.termination);
    }

    #[test]
    fn demo_bundled_runs_end(seed in any::<u64>(), occ in occupation()) {
        let repo = JsonPageRepository::bundled(Language::Pt).unwrap();
        let cfg = AgentConfig::default().with_seed(seed).with_max_turns(60);
        let selector = AdapterSelector::new(DemoAdapter::new(seed));
        let mut s = Session::new(repo, character(occ, (4, 4)), selector, cfg);
        let report = s.run();
        prop_assert_eq!(s.state(), SessionState::Terminated);
        prop_assert!(report.termination.is_graceful(), "{}", report.termination);
    }
}
