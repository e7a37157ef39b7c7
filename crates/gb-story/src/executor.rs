//! Action execution.
//!
//! [`execute`] performs one concrete choice against the character: its
//! effects first, then the roll or jump, then the matching outcome. It never
//! fails. Problems become part of the outcome text and leave the character
//! on the current page.

use gb_mechanics::{
    Character, CheckRequest, CheckResult, EffectsReport, Occupation, OpposedResult,
    PercentileDice,
};

use crate::choice::{Action, Choice, Destination, END_PAGE, MAX_CONDITIONAL_DEPTH, OutcomeResult, PageId, RollAction};

/// The dice rolled while executing a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollRecord {
    /// A skill, characteristic or luck check.
    Check(CheckResult),
    /// An opposed roll.
    Opposed(OpposedResult),
}

impl std::fmt::Display for RollRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Check(c) => write!(f, "{c}"),
            Self::Opposed(o) => write!(f, "{o}"),
        }
    }
}

/// What happened when a choice was executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Narrative and mechanical summary.
    pub text: String,
    /// The page to continue from; 0 ends the story.
    pub next_page: PageId,
    /// The roll, if one was made.
    pub roll: Option<RollRecord>,
    /// Effect batches in the order they were applied.
    pub effects: Vec<EffectsReport>,
    /// The first problem met, if any.
    pub error: Option<String>,
}

impl ActionOutcome {
    /// Whether the story ends here.
    pub fn ends_story(&self) -> bool {
        self.next_page == END_PAGE
    }
}

/// Execute a concrete choice.
pub fn execute<D: PercentileDice + ?Sized>(
    choice: &Choice,
    character: &mut Character,
    current_page: PageId,
    dice: &mut D,
) -> ActionOutcome {
    let mut run = Run {
        lines: Vec::new(),
        next_page: current_page,
        roll: None,
        effects: Vec::new(),
        error: None,
    };
    run.choice(choice, character, dice, 0);

    if run.next_page == current_page && run.error.is_none() {
        tracing::debug!(page = current_page, "staying on the current page");
    }
    ActionOutcome {
        text: run.lines.join(" "),
        next_page: run.next_page,
        roll: run.roll,
        effects: run.effects,
        error: run.error,
    }
}

struct Run {
    lines: Vec<String>,
    next_page: PageId,
    roll: Option<RollRecord>,
    effects: Vec<EffectsReport>,
    error: Option<String>,
}

impl Run {
    fn note(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn fail(&mut self, message: String) {
        tracing::warn!(error = %message, "action problem");
        self.lines.push(format!("[{message}]"));
        self.error.get_or_insert(message);
    }

    fn choice<D: PercentileDice + ?Sized>(
        &mut self,
        choice: &Choice,
        character: &mut Character,
        dice: &mut D,
        depth: usize,
    ) {
        if !choice.effects.is_empty() {
            self.apply_effects(&choice.effects, character);
        }

        match &choice.action {
            Action::SkillRoll(roll) | Action::CharacteristicRoll(roll) => {
                self.roll(roll, character, dice);
            }
            Action::LuckRoll { results } => {
                let check = character.roll_luck(dice);
                self.note(format!("{check}."));
                match results.get_or_lower(check.tier) {
                    Some((tier, result)) => {
                        if tier != check.tier {
                            tracing::debug!(rolled = %check.tier, used = %tier, "luck outcome from lower tier");
                        }
                        self.outcome(result, character);
                    }
                    None => self.note(format!("No outcome for {} or below.", check.tier)),
                }
                self.roll = Some(RollRecord::Check(check));
            }
            Action::OpposedRoll {
                skill,
                opponent,
                outcomes,
            } => match character.opposed_roll(skill, *opponent, dice) {
                Ok(result) => {
                    self.note(format!("{result}."));
                    match outcomes.get(result.outcome) {
                        Some(outcome) => self.outcome(outcome, character),
                        None => self.note(format!("No outcome for {}.", result.outcome)),
                    }
                    self.roll = Some(RollRecord::Opposed(result));
                }
                Err(e) => self.fail(format!("opposed roll failed: {e}")),
            },
            Action::Goto(dest) => self.go(dest),
            Action::ConditionalOnOccupation(paths) => {
                if depth >= MAX_CONDITIONAL_DEPTH {
                    self.fail(format!("conditional nesting deeper than {MAX_CONDITIONAL_DEPTH}"));
                    return;
                }
                match paths.resolve(character.occupation().map(Occupation::name)) {
                    Some(path) => self.choice(path, character, dice, depth + 1),
                    None => self.fail("no path for the current occupation".to_string()),
                }
            }
            Action::SetOccupation { occupation, goto } => {
                match occupation.parse::<Occupation>() {
                    Ok(o) if character.occupation() == Some(o) => {}
                    Ok(o) => {
                        character.set_occupation(o);
                        self.note(format!("You are now a {o}."));
                    }
                    Err(e) => self.fail(e.to_string()),
                }
                if let Some(dest) = goto {
                    self.go(dest);
                }
            }
            Action::None => self.note("No action recognized."),
        }
    }

    fn roll<D: PercentileDice + ?Sized>(&mut self, roll: &RollAction, character: &mut Character, dice: &mut D) {
        let mut request = CheckRequest::new(roll.target.clone()).with_difficulty(roll.difficulty);
        request.bonus_dice = roll.bonus_dice;
        request.penalty_dice = roll.penalty_dice;
        match character.roll_check(&request, dice) {
            Ok(check) => {
                self.note(format!("{check}."));
                match roll.results.get(check.tier) {
                    Some(result) => self.outcome(result, character),
                    None => self.note(format!("No outcome for {}.", check.tier)),
                }
                self.roll = Some(RollRecord::Check(check));
            }
            Err(e) => self.fail(format!("roll failed: {e}")),
        }
    }

    fn outcome(&mut self, result: &OutcomeResult, character: &mut Character) {
        match result {
            OutcomeResult::Page(dest) => self.go(dest),
            OutcomeResult::Detailed {
                text,
                effects,
                goto,
            } => {
                if let Some(text) = text {
                    self.note(text.clone());
                }
                if !effects.is_empty() {
                    self.apply_effects(effects, character);
                }
                if let Some(dest) = goto {
                    self.go(dest);
                }
            }
        }
    }

    fn go(&mut self, dest: &Destination) {
        match dest.page_id() {
            Some(page) => self.next_page = page,
            None => self.fail(format!("rejected goto: {dest}")),
        }
    }

    fn apply_effects(&mut self, effects: &[gb_mechanics::Effect], character: &mut Character) {
        let report = character.apply_effects(effects);
        self.note(format!("{report}."));
        if !report.success() {
            self.error
                .get_or_insert_with(|| format!("{} of {} effects failed", report.failed(), report.processed()));
        }
        self.effects.push(report);
    }
}
