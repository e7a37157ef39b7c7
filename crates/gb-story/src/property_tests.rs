//! Property tests for choice resolution and execution.

use proptest::prelude::*;
use serde_json::{Value, json};

use gb_mechanics::{Character, Occupation, ScriptedDice};

use crate::choice::{Action, Choice, Destination};
use crate::executor::execute;
use crate::resolver::{ResolutionSource, resolve_choices};

fn occupation() -> impl Strategy<Value = Option<Occupation>> {
    prop::option::of(prop::sample::select(Occupation::ALL.to_vec()))
}

fn character(occupation: Option<Occupation>) -> Character {
    let mut dice = ScriptedDice::from_faces(vec![5, 5]);
    Character::new("Prop", occupation, 30, &mut dice)
}

fn conditional(listed: &[Occupation], with_default: bool) -> Choice {
    let mut paths = serde_json::Map::new();
    for (i, o) in listed.iter().enumerate() {
        paths.insert(o.name().to_string(), json!({"goto": 10 + i}));
    }
    if with_default {
        paths.insert("default".into(), json!({"goto": 99}));
    }
    Choice::from_value(&json!({"conditional_on": "occupation", "paths": Value::Object(paths)}))
        .unwrap()
}

proptest! {
    #[test]
    fn resolution_is_never_conditional(
        occ in occupation(),
        listed in prop::sample::subsequence(Occupation::ALL.to_vec(), 0..=3),
        with_default in any::<bool>(),
        trailing_goto in any::<bool>(),
    ) {
        let mut choices = vec![conditional(&listed, with_default)];
        if trailing_goto {
            choices.push(Choice::goto("Leave", 7));
        }
        let res = resolve_choices(&choices, &character(occ));
        prop_assert!(!res.choice.is_conditional());

        let path_exists = with_default || occ.is_some_and(|o| listed.contains(&o));
        if path_exists {
            prop_assert_eq!(res.source, ResolutionSource::Conditional);
        } else if trailing_goto {
            prop_assert_eq!(res.source, ResolutionSource::Applicable);
            prop_assert_eq!(res.index, Some(2));
        } else {
            prop_assert_eq!(res.source, ResolutionSource::SafeFallback);
        }
    }

    #[test]
    fn listed_occupation_beats_default(occ in prop::sample::select(Occupation::ALL.to_vec())) {
        let choices = [conditional(&Occupation::ALL, true)];
        let res = resolve_choices(&choices, &character(Some(occ)));
        let expected = 10 + Occupation::ALL.iter().position(|o| *o == occ).unwrap_or(0);
        prop_assert_eq!(res.choice.action, Action::Goto(Destination::Page(expected as u32)));
    }

    #[test]
    fn goto_values_classify(n in -1000i64..1000) {
        let dest = Destination::from_value(&json!(n));
        match n {
            0 => prop_assert_eq!(dest, Destination::End),
            n if n > 0 => prop_assert_eq!(dest, Destination::Page(n as u32)),
            _ => prop_assert!(matches!(dest, Destination::Invalid(_))),
        }
    }

    #[test]
    fn goto_never_rolls(page in 1u32..500, current in 1u32..500) {
        let mut c = character(Some(Occupation::Nurse));
        let mut dice = ScriptedDice::from_rolls(&[50]);
        let out = execute(&Choice::goto("Go", page), &mut c, current, &mut dice);
        prop_assert_eq!(out.next_page, page);
        prop_assert_eq!(dice.drawn(), 0);
    }

    #[test]
    fn luck_roll_lands_on_a_listed_outcome_or_stays(roll in 1u32..=100) {
        let mut c = character(None);
        let mut dice = ScriptedDice::from_rolls(&[roll]);
        let choice = Choice::from_value(&json!({
            "luck_roll": true,
            "results": {"3": {"goto": 25}, "2": {"goto": 36}}
        }))
        .unwrap();
        let out = execute(&choice, &mut c, 17, &mut dice);
        // Only a fumble has no listed tier at or below it.
        if roll == 100 {
            prop_assert_eq!(out.next_page, 17);
        } else {
            prop_assert!(out.next_page == 25 || out.next_page == 36);
        }
    }
}
