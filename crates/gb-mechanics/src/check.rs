//! Skill, characteristic, luck and opposed checks.
//!
//! A check resolves its target name against the sheet (skills first, in
//! category order, then characteristics), folds in active bonus/penalty
//! modifiers, rolls d100 and classifies the result into a [`SuccessTier`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dice::{D100Roll, PercentileDice, SuccessTier, Target, roll_d100};
use crate::error::{MechError, MechResult};
use crate::sheet::{Character, Characteristic, SkillCategory};

/// How hard a check is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Roll against the full value.
    #[default]
    Regular,
    /// Roll against the half value.
    Hard,
}

impl Difficulty {
    /// Adjust a target for this difficulty.
    pub fn apply(self, target: Target) -> Target {
        match self {
            Self::Regular => target,
            Self::Hard => target.hard(),
        }
    }
}

impl FromStr for Difficulty {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "regular" => Ok(Self::Regular),
            "hard" => Ok(Self::Hard),
            _ => Err(MechError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => write!(f, "regular"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// A request to roll against a named skill or characteristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    /// Skill or characteristic name.
    pub target: String,
    /// Regular or hard.
    pub difficulty: Difficulty,
    /// Roll an extra tens die and keep the lower.
    pub bonus_dice: bool,
    /// Roll an extra tens die and keep the higher.
    pub penalty_dice: bool,
}

impl CheckRequest {
    /// A regular check with no extra dice.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            difficulty: Difficulty::Regular,
            bonus_dice: false,
            penalty_dice: false,
        }
    }

    /// Set the difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Request a bonus die.
    pub fn with_bonus(mut self) -> Self {
        self.bonus_dice = true;
        self
    }

    /// Request a penalty die.
    pub fn with_penalty(mut self) -> Self {
        self.penalty_dice = true;
        self
    }
}

/// What a check was rolled against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CheckSubject {
    /// A skill found in `category`.
    Skill {
        /// Skill name.
        name: String,
        /// Category the skill was found in.
        category: SkillCategory,
    },
    /// A characteristic.
    Characteristic(Characteristic),
    /// Current luck.
    Luck,
    /// The opposing side of an opposed roll.
    Opponent,
}

impl std::fmt::Display for CheckSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skill { name, .. } => write!(f, "{name}"),
            Self::Characteristic(c) => write!(f, "{c}"),
            Self::Luck => write!(f, "Luck"),
            Self::Opponent => write!(f, "Opponent"),
        }
    }
}

/// The outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// What was rolled against.
    pub subject: CheckSubject,
    /// Difficulty applied to the target.
    pub difficulty: Difficulty,
    /// Thresholds after difficulty.
    pub target: Target,
    /// The dice.
    pub roll: D100Roll,
    /// Classified result.
    pub tier: SuccessTier,
}

impl CheckResult {
    fn new(subject: CheckSubject, difficulty: Difficulty, target: Target, roll: D100Roll) -> Self {
        let tier = target.classify(roll.value);
        tracing::debug!(
            subject = %subject,
            roll = roll.value,
            target = %target,
            tier = tier.level(),
            "check rolled"
        );
        Self {
            subject,
            difficulty,
            target,
            roll,
            tier,
        }
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} vs {} -> {}",
            self.subject, self.roll, self.target, self.tier
        )
    }
}

/// Who came out ahead in an opposed roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpposedOutcome {
    /// The character won.
    Win,
    /// The opponent won.
    Lose,
    /// Same tier and same roll.
    Draw,
}

impl OpposedOutcome {
    /// The key content uses for this outcome.
    pub fn key(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Lose => "lose",
            Self::Draw => "draw",
        }
    }
}

impl std::fmt::Display for OpposedOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Both sides of an opposed roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpposedResult {
    /// The character's check.
    pub actor: CheckResult,
    /// The opponent's check.
    pub opponent: CheckResult,
    /// Who won.
    pub outcome: OpposedOutcome,
}

impl std::fmt::Display for OpposedResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}; {} => {}", self.actor, self.opponent, self.outcome)
    }
}

/// Decide an opposed roll.
///
/// The higher tier wins. On equal tiers the lower roll wins; equal rolls draw.
pub fn opposed_outcome(
    actor_tier: SuccessTier,
    actor_roll: u32,
    opponent_tier: SuccessTier,
    opponent_roll: u32,
) -> OpposedOutcome {
    match actor_tier.cmp(&opponent_tier) {
        std::cmp::Ordering::Greater => OpposedOutcome::Win,
        std::cmp::Ordering::Less => OpposedOutcome::Lose,
        std::cmp::Ordering::Equal => match actor_roll.cmp(&opponent_roll) {
            std::cmp::Ordering::Less => OpposedOutcome::Win,
            std::cmp::Ordering::Greater => OpposedOutcome::Lose,
            std::cmp::Ordering::Equal => OpposedOutcome::Draw,
        },
    }
}

impl Character {
    /// Roll a skill or characteristic check.
    ///
    /// A skill roll consumes one use of each modifier present on that skill.
    /// Requested extra dice and modifier dice combine: a bonus and a penalty
    /// from any source cancel.
    pub fn roll_check<D: PercentileDice + ?Sized>(
        &mut self,
        request: &CheckRequest,
        dice: &mut D,
    ) -> MechResult<CheckResult> {
        let name = request.target.as_str();
        let (subject, base, bonus, penalty) = if let Some((category, score)) = self.find_skill(name)
        {
            let active = self.consume_modifiers(name);
            let subject = CheckSubject::Skill {
                name: name.to_string(),
                category,
            };
            (
                subject,
                score.target(),
                request.bonus_dice || active.net_bonus(),
                request.penalty_dice || active.net_penalty(),
            )
        } else if let Ok(characteristic) = name.parse::<Characteristic>() {
            (
                CheckSubject::Characteristic(characteristic),
                self.characteristic(characteristic).target(),
                request.bonus_dice,
                request.penalty_dice,
            )
        } else {
            return Err(MechError::UnknownRollTarget(name.to_string()));
        };

        let target = request.difficulty.apply(base);
        let roll = roll_d100(dice, bonus, penalty);
        Ok(CheckResult::new(subject, request.difficulty, target, roll))
    }

    /// Roll against current luck.
    pub fn roll_luck<D: PercentileDice + ?Sized>(&self, dice: &mut D) -> CheckResult {
        let target = Target::new(self.luck().current());
        let roll = roll_d100(dice, false, false);
        CheckResult::new(CheckSubject::Luck, Difficulty::Regular, target, roll)
    }

    /// Roll a skill against an opponent's thresholds.
    ///
    /// The character rolls first, then the opponent.
    pub fn opposed_roll<D: PercentileDice + ?Sized>(
        &mut self,
        skill: &str,
        opponent: Target,
        dice: &mut D,
    ) -> MechResult<OpposedResult> {
        let actor = self.roll_check(&CheckRequest::new(skill), dice)?;
        let opponent_roll = roll_d100(dice, false, false);
        let opponent = CheckResult::new(
            CheckSubject::Opponent,
            Difficulty::Regular,
            opponent,
            opponent_roll,
        );
        let outcome = opposed_outcome(
            actor.tier,
            actor.roll.value,
            opponent.tier,
            opponent.roll.value,
        );
        Ok(OpposedResult {
            actor,
            opponent,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::sheet::{ModifierKind, Occupation};

    fn officer() -> Character {
        let mut dice = ScriptedDice::from_faces(vec![4, 6]);
        Character::new("Peter", Some(Occupation::PoliceOfficer), 28, &mut dice)
    }

    #[test]
    fn difficulty_parsing() {
        assert_eq!("normal".parse::<Difficulty>().unwrap(), Difficulty::Regular);
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn hard_halves_both_thresholds() {
        let t = Difficulty::Hard.apply(Target::new(60));
        assert_eq!(t, Target { full: 30, half: 15 });
    }

    #[test]
    fn skill_check_classifies() {
        let mut c = officer();
        let mut dice = ScriptedDice::from_rolls(&[45]);
        let result = c.roll_check(&CheckRequest::new("Fighting"), &mut dice).unwrap();
        assert_eq!(result.tier, SuccessTier::Success);
        assert_eq!(result.to_string(), "Fighting: 45 vs 60/30 -> Success");
        assert!(matches!(
            result.subject,
            CheckSubject::Skill { category: SkillCategory::Combat, .. }
        ));
    }

    #[test]
    fn characteristic_fallback() {
        let mut c = officer();
        let mut dice = ScriptedDice::from_rolls(&[30]);
        let result = c.roll_check(&CheckRequest::new("POW"), &mut dice).unwrap();
        assert_eq!(result.subject, CheckSubject::Characteristic(Characteristic::Pow));
        assert_eq!(result.tier, SuccessTier::Hard);
    }

    #[test]
    fn hard_check_uses_half() {
        let mut c = officer();
        let mut dice = ScriptedDice::from_rolls(&[45]);
        let request = CheckRequest::new("Fighting").with_difficulty(Difficulty::Hard);
        let result = c.roll_check(&request, &mut dice).unwrap();
        assert_eq!(result.target, Target { full: 30, half: 15 });
        assert_eq!(result.tier, SuccessTier::Failure);
    }

    #[test]
    fn unknown_target_is_error() {
        let mut c = officer();
        let mut dice = ScriptedDice::from_rolls(&[45]);
        let err = c
            .roll_check(&CheckRequest::new("Juggling"), &mut dice)
            .unwrap_err();
        assert_eq!(err, MechError::UnknownRollTarget("Juggling".into()));
        assert_eq!(dice.drawn(), 0);
    }

    #[test]
    fn penalty_modifier_applies_and_expires() {
        let mut c = officer();
        c.add_modifier("Fighting", ModifierKind::PenaltyDice, 1);
        // tens 20 and 70, units 3
        let mut dice = ScriptedDice::from_faces(vec![20, 70, 3]);
        let result = c.roll_check(&CheckRequest::new("Fighting"), &mut dice).unwrap();
        assert_eq!(result.roll.value, 73);
        assert!(c.modifiers().is_empty());
    }

    #[test]
    fn cancelled_modifiers_are_both_consumed() {
        let mut c = officer();
        c.add_modifier("Fighting", ModifierKind::PenaltyDice, 1);
        c.add_modifier("Fighting", ModifierKind::BonusDice, 2);
        let mut dice = ScriptedDice::from_faces(vec![20, 70, 3]);
        let result = c.roll_check(&CheckRequest::new("Fighting"), &mut dice).unwrap();
        assert_eq!(result.roll.value, 23);
        assert_eq!(c.modifiers().len(), 1);
    }

    #[test]
    fn luck_check_uses_current_luck() {
        let c = officer();
        let mut dice = ScriptedDice::from_rolls(&[31]);
        let result = c.roll_luck(&mut dice);
        assert_eq!(result.target, Target { full: 60, half: 30 });
        assert_eq!(result.tier, SuccessTier::Success);
    }

    #[test]
    fn opposed_tie_break_on_lower_roll() {
        assert_eq!(
            opposed_outcome(SuccessTier::Success, 45, SuccessTier::Success, 60),
            OpposedOutcome::Win
        );
        assert_eq!(
            opposed_outcome(SuccessTier::Hard, 90, SuccessTier::Success, 2),
            OpposedOutcome::Win
        );
        assert_eq!(
            opposed_outcome(SuccessTier::Failure, 70, SuccessTier::Failure, 70),
            OpposedOutcome::Draw
        );
        assert_eq!(
            opposed_outcome(SuccessTier::Success, 50, SuccessTier::Critical, 1),
            OpposedOutcome::Lose
        );
    }

    #[test]
    fn opposed_roll_actor_then_opponent() {
        let mut c = officer();
        let mut dice = ScriptedDice::from_rolls(&[45, 60]);
        let result = c
            .opposed_roll("Fighting", Target::new(70), &mut dice)
            .unwrap();
        assert_eq!(result.actor.roll.value, 45);
        assert_eq!(result.opponent.roll.value, 60);
        assert_eq!(result.outcome, OpposedOutcome::Win);
    }
}
