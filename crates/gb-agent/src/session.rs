//! The gamebook session loop.
//!
//! A [`Session`] walks the page graph one turn at a time. Each turn
//! observes the current page, asks its [`ChoiceSelector`] for a concrete
//! choice, executes it against the character and records the result in the
//! character's history and the [`Journal`]. The loop ends on page 0, on a
//! page without choices, when the character dies, when the selector is
//! cancelled, or when too many picks in a row break the rules.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;

use gb_mechanics::sheet::excerpt;
use gb_mechanics::{Character, HistoryEntry, PercentileDice};
use gb_story::{
    ActionOutcome, END_PAGE, Page, PageId, PageRepository, SAFE_FALLBACK_PAGE, execute,
};

use crate::adapter::DecisionContext;
use crate::config::AgentConfig;
use crate::journal::{Journal, JournalEntry};
use crate::selector::{ChoiceSelector, Selection};

/// Characters of page text kept in each history entry.
pub const HISTORY_EXCERPT_CHARS: usize = 200;

/// Where the loop is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Fetching the current page.
    Observing,
    /// Waiting for a concrete choice.
    Deciding,
    /// Executing the choice.
    Acting,
    /// Writing history and moving on.
    Recording,
    /// Finished.
    Terminated,
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Page 0 was reached.
    StoryEnded,
    /// The page had no choices.
    DeadEnd {
        /// The page.
        page: PageId,
    },
    /// The character reached the last damage level.
    CharacterDied {
        /// Page the character died on.
        page: PageId,
    },
    /// Too many rejected picks in a row.
    CircuitBreaker {
        /// Page the picks were made on.
        page: PageId,
        /// Rejections in the streak.
        rejections: u32,
    },
    /// The player or the caller stopped the run.
    Interrupted {
        /// Page at the time.
        page: PageId,
    },
    /// The configured turn cap was hit.
    TurnLimit {
        /// Turns completed.
        turns: u32,
    },
    /// Not even the safe fallback could be taken.
    Unresolvable {
        /// The page.
        page: PageId,
    },
}

impl Termination {
    /// Whether the story itself ended the run.
    pub fn is_graceful(&self) -> bool {
        matches!(
            self,
            Self::StoryEnded | Self::DeadEnd { .. } | Self::CharacterDied { .. }
        )
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoryEnded => write!(f, "the story ended"),
            Self::DeadEnd { page } => write!(f, "page {page} has no choices"),
            Self::CharacterDied { page } => write!(f, "the character died on page {page}"),
            Self::CircuitBreaker { page, rejections } => write!(
                f,
                "circuit breaker after {rejections} rejected decisions on page {page}"
            ),
            Self::Interrupted { page } => write!(f, "interrupted on page {page}"),
            Self::TurnLimit { turns } => write!(f, "turn limit of {turns} reached"),
            Self::Unresolvable { page } => write!(f, "no executable choice on page {page}"),
        }
    }
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Why it ended.
    pub termination: Termination,
    /// The page the session stopped on.
    pub final_page: PageId,
    /// Completed turns.
    pub turns: u32,
    /// Dice seed used.
    pub seed: u64,
    /// One-line character summary at the end.
    pub character: String,
}

/// Hooks for presenting a session as it runs.
///
/// Every method defaults to doing nothing.
pub trait SessionObserver {
    /// A page is about to be decided on.
    fn on_page(&mut self, _page: &Page, _character: &Character) {}

    /// A choice was accepted.
    fn on_selection(&mut self, _selection: &Selection) {}

    /// A pick was refused.
    fn on_rejection(&mut self, _reason: &str, _streak: u32) {}

    /// A choice was executed.
    fn on_outcome(&mut self, _outcome: &ActionOutcome, _character: &Character) {}

    /// The session ended.
    fn on_termination(&mut self, _report: &SessionReport) {}
}

/// A single run through the story.
pub struct Session<R> {
    pages: R,
    character: Character,
    selector: Box<dyn ChoiceSelector>,
    dice: Box<dyn PercentileDice>,
    observer: Option<Box<dyn SessionObserver>>,
    config: AgentConfig,
    seed: u64,
    state: SessionState,
    current_page: PageId,
    turns: u32,
    invalid_streak: u32,
    last_rejection: Option<String>,
    journal: Journal,
    termination: Option<Termination>,
    interrupt: Arc<AtomicBool>,
}

impl<R: PageRepository> Session<R> {
    /// Start a session on `config.start_page`.
    pub fn new(
        pages: R,
        character: Character,
        selector: impl ChoiceSelector + 'static,
        config: AgentConfig,
    ) -> Self {
        let seed = config.seed_or_random();
        let character = character.with_history_limit(config.history_limit);
        let mut journal = Journal::new();
        journal.append(JournalEntry::SessionStart {
            character: character.summary(),
            player: selector.name().to_string(),
            seed,
            start_page: config.start_page,
            timestamp: Utc::now(),
        });
        tracing::info!(
            seed,
            player = selector.name(),
            start_page = config.start_page,
            "session started"
        );

        Self {
            pages,
            character,
            selector: Box::new(selector),
            dice: Box::new(StdRng::seed_from_u64(seed)),
            observer: None,
            current_page: config.start_page,
            config,
            seed,
            state: SessionState::Observing,
            turns: 0,
            invalid_streak: 0,
            last_rejection: None,
            journal,
            termination: None,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the seeded dice.
    pub fn with_dice(mut self, dice: impl PercentileDice + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    /// Attach an observer.
    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// The character.
    pub fn character(&self) -> &Character {
        &self.character
    }

    /// The journal so far.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Current loop state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current page.
    pub fn current_page(&self) -> PageId {
        self.current_page
    }

    /// Completed turns.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Dice seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Why the session ended, once it has.
    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    /// A flag that stops the session before its next turn when set.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// The final report, once the session has ended.
    pub fn report(&self) -> Option<SessionReport> {
        self.termination.clone().map(|termination| SessionReport {
            termination,
            final_page: self.current_page,
            turns: self.turns,
            seed: self.seed,
            character: self.character.summary(),
        })
    }

    /// Run turns until the session ends.
    pub fn run(&mut self) -> SessionReport {
        loop {
            self.step();
            if let Some(report) = self.report() {
                return report;
            }
        }
    }

    /// Run one turn, or one refused decision, and return the new state.
    pub fn step(&mut self) -> SessionState {
        if self.state == SessionState::Terminated {
            return self.state;
        }
        if self.interrupt.load(Ordering::Relaxed) {
            self.terminate(Termination::Interrupted {
                page: self.current_page,
            });
            return self.state;
        }

        // Observe
        self.state = SessionState::Observing;
        if let Some(termination) = self.pre_turn_termination() {
            self.terminate(termination);
            return self.state;
        }
        let page = self.pages.get_page(self.current_page);
        if page.is_terminal() {
            self.terminate(Termination::DeadEnd {
                page: self.current_page,
            });
            return self.state;
        }
        let first_look = self.last_rejection.is_none();
        if let Some(observer) = self.observer.as_mut().filter(|_| first_look) {
            observer.on_page(&page, &self.character);
        }

        // Orient
        tracing::debug!(
            page = self.current_page,
            choices = page.choices.len(),
            character = %self.character.summary(),
            "observed page"
        );

        // Decide
        self.state = SessionState::Deciding;
        let ctx = DecisionContext {
            page_id: self.current_page,
            page: &page,
            character: &self.character,
            last_rejection: self.last_rejection.as_deref(),
        };
        let selection = match self.selector.select(&ctx) {
            Ok(selection) => selection,
            Err(e) if e.is_interrupt() => {
                tracing::info!(reason = %e, "decision source stopped");
                self.terminate(Termination::Interrupted {
                    page: self.current_page,
                });
                return self.state;
            }
            Err(e) => {
                self.reject(&page, e.to_string());
                return self.state;
            }
        };
        if selection.is_safe_fallback()
            && (self.current_page == SAFE_FALLBACK_PAGE || !self.pages.contains(SAFE_FALLBACK_PAGE))
        {
            self.terminate(Termination::Unresolvable {
                page: self.current_page,
            });
            return self.state;
        }
        self.invalid_streak = 0;
        self.last_rejection = None;
        if let Some(observer) = self.observer.as_mut() {
            observer.on_selection(&selection);
        }

        // Act
        self.state = SessionState::Acting;
        let outcome = execute(
            &selection.choice,
            &mut self.character,
            self.current_page,
            &mut *self.dice,
        );
        if let Some(observer) = self.observer.as_mut() {
            observer.on_outcome(&outcome, &self.character);
        }

        // Record
        self.state = SessionState::Recording;
        self.record(&page, &selection, &outcome);

        if self.current_page == END_PAGE {
            self.terminate(Termination::StoryEnded);
        } else if !self.character.is_alive() {
            self.terminate(Termination::CharacterDied {
                page: self.current_page,
            });
        } else {
            self.state = SessionState::Observing;
        }
        self.state
    }

    fn pre_turn_termination(&self) -> Option<Termination> {
        if self.current_page == END_PAGE {
            return Some(Termination::StoryEnded);
        }
        if !self.character.is_alive() {
            return Some(Termination::CharacterDied {
                page: self.current_page,
            });
        }
        match self.config.max_turns {
            Some(max) if self.turns >= max => Some(Termination::TurnLimit { turns: self.turns }),
            _ => None,
        }
    }

    fn record(&mut self, page: &Page, selection: &Selection, outcome: &ActionOutcome) {
        self.turns += 1;
        self.character.record(HistoryEntry {
            page_number: page.id,
            page_text_excerpt: excerpt(&page.text, HISTORY_EXCERPT_CHARS),
            choice_made: selection.choice.label(),
            choice_index: selection.index,
            outcome: Some(outcome.text.clone()),
        });
        self.journal.append(JournalEntry::Turn {
            turn: self.turns,
            page: page.id,
            choice: selection.choice.label(),
            rationale: selection.rationale.clone(),
            roll: outcome.roll.as_ref().map(ToString::to_string),
            outcome: outcome.text.clone(),
            next_page: outcome.next_page,
            timestamp: Utc::now(),
        });
        tracing::info!(
            turn = self.turns,
            from = page.id,
            to = outcome.next_page,
            "page transition"
        );
        self.current_page = outcome.next_page;
    }

    fn reject(&mut self, page: &Page, reason: String) {
        self.invalid_streak += 1;
        let streak = self.invalid_streak;
        tracing::warn!(page = page.id, streak, reason = %reason, "decision rejected");
        self.character.record(HistoryEntry {
            page_number: page.id,
            page_text_excerpt: excerpt(&page.text, HISTORY_EXCERPT_CHARS),
            choice_made: format!("[SYSTEM] rejected: {reason}"),
            choice_index: None,
            outcome: None,
        });
        self.journal.append(JournalEntry::Rejection {
            page: page.id,
            reason: reason.clone(),
            streak,
            timestamp: Utc::now(),
        });
        if let Some(observer) = self.observer.as_mut() {
            observer.on_rejection(&reason, streak);
        }

        if streak >= self.config.max_invalid_decisions {
            tracing::warn!(page = page.id, streak, "circuit breaker tripped");
            self.character.record(HistoryEntry {
                page_number: page.id,
                page_text_excerpt: excerpt(&page.text, HISTORY_EXCERPT_CHARS),
                choice_made: format!("[SYSTEM CIRCUIT BREAKER] {streak} invalid decisions in a row"),
                choice_index: None,
                outcome: None,
            });
            self.journal.append(JournalEntry::CircuitBreaker {
                page: page.id,
                rejections: streak,
                timestamp: Utc::now(),
            });
            self.terminate(Termination::CircuitBreaker {
                page: page.id,
                rejections: streak,
            });
        } else {
            self.last_rejection = Some(reason);
            self.state = SessionState::Deciding;
        }
    }

    fn terminate(&mut self, termination: Termination) {
        tracing::info!(
            reason = %termination,
            page = self.current_page,
            turns = self.turns,
            "session ended"
        );
        self.journal.append(JournalEntry::Termination {
            reason: termination.to_string(),
            page: self.current_page,
            turns: self.turns,
            character: self.character.summary(),
            timestamp: Utc::now(),
        });
        self.state = SessionState::Terminated;
        self.termination = Some(termination);
        if let (Some(report), Some(observer)) = (self.report(), self.observer.as_mut()) {
            observer.on_termination(&report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use gb_mechanics::{Occupation, ScriptedDice};
    use gb_story::{JsonPageRepository, Language};

    use crate::adapter::ScriptedAdapter;
    use crate::selector::{AdapterSelector, ResolverSelector};

    const LINEAR: &str = r#"{
        "1": {"text": "Start.", "choices": [{"text": "Walk in", "goto": 2}]},
        "2": {"text": "A guard blocks the way.", "choices": [
            {"roll": "Fighting", "results": {
                "3": 3,
                "2": {"goto": 3, "outcome_text": "Bruised.", "effects": [{"action": "take_damage", "amount": 1}]}
            }},
            {"requires": {"occupation": "Police Officer"}, "goto": 3}
        ]},
        "3": {"text": "Done.", "choices": [{"text": "Leave", "goto": 0}]}
    }"#;

    fn repo(json: &str) -> JsonPageRepository {
        JsonPageRepository::from_json_str(json).unwrap()
    }

    fn nurse() -> Character {
        let mut dice = ScriptedDice::default();
        Character::new("Ana", Some(Occupation::Nurse), 30, &mut dice)
    }

    fn config() -> AgentConfig {
        AgentConfig::default().with_seed(1)
    }

    #[test]
    fn autonomous_run_reaches_the_end() {
        let mut s = Session::new(repo(LINEAR), nurse(), ResolverSelector, config())
            .with_dice(ScriptedDice::from_rolls(&[20]));
        let report = s.run();
        assert_eq!(report.termination, Termination::StoryEnded);
        assert_eq!(report.final_page, 0);
        assert_eq!(report.turns, 3);
        assert_eq!(s.state(), SessionState::Terminated);

        let history: Vec<_> = s.character().history().iter().collect();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].choice_made, "Walk in");
        assert_eq!(history[1].choice_index, Some(1));
        assert!(history[1].outcome.as_deref().unwrap().contains("Fighting: 20"));
        // Start, three turns, termination.
        assert_eq!(s.journal().len(), 5);
    }

    #[test]
    fn failed_roll_applies_outcome_effects() {
        let mut s = Session::new(repo(LINEAR), nurse(), ResolverSelector, config())
            .with_dice(ScriptedDice::from_rolls(&[90]));
        s.run();
        assert_eq!(s.character().damage_taken(), 1);
    }

    #[test]
    fn circuit_breaker_after_repeated_rejections() {
        let selector = AdapterSelector::new(ScriptedAdapter::new(vec![1, 2, 2, 2]));
        let mut s = Session::new(repo(LINEAR), nurse(), selector, config());
        let report = s.run();
        assert_eq!(
            report.termination,
            Termination::CircuitBreaker {
                page: 2,
                rejections: 3
            }
        );
        assert_eq!(report.turns, 1);

        let made: Vec<_> = s
            .character()
            .history()
            .iter()
            .map(|e| e.choice_made.clone())
            .collect();
        assert_eq!(made.iter().filter(|m| m.starts_with("[SYSTEM] rejected")).count(), 3);
        assert!(made.last().unwrap().starts_with("[SYSTEM CIRCUIT BREAKER]"));
    }

    #[test]
    fn valid_pick_resets_the_streak() {
        let selector = AdapterSelector::new(ScriptedAdapter::new(vec![1, 2, 2, 1, 1]));
        let mut s = Session::new(repo(LINEAR), nurse(), selector, config())
            .with_dice(ScriptedDice::from_rolls(&[20]));
        let report = s.run();
        assert_eq!(report.termination, Termination::StoryEnded);
    }

    #[test]
    fn step_reports_deciding_after_rejection() {
        let selector = AdapterSelector::new(ScriptedAdapter::new(vec![1, 2, 1]));
        let mut s = Session::new(repo(LINEAR), nurse(), selector, config())
            .with_dice(ScriptedDice::from_rolls(&[20]));
        assert_eq!(s.step(), SessionState::Observing);
        assert_eq!(s.step(), SessionState::Deciding);
        assert_eq!(s.current_page(), 2);
        assert_eq!(s.step(), SessionState::Observing);
        assert_eq!(s.current_page(), 3);
    }

    #[test]
    fn exhausted_script_interrupts() {
        let selector = AdapterSelector::new(ScriptedAdapter::new(vec![1]));
        let mut s = Session::new(repo(LINEAR), nurse(), selector, config());
        let report = s.run();
        assert_eq!(report.termination, Termination::Interrupted { page: 2 });
        assert!(!report.termination.is_graceful());
    }

    #[test]
    fn interrupt_flag_stops_before_next_turn() {
        let mut s = Session::new(repo(LINEAR), nurse(), ResolverSelector, config());
        s.step();
        s.interrupt_handle().store(true, Ordering::Relaxed);
        assert_eq!(s.step(), SessionState::Terminated);
        assert_eq!(s.turns(), 1);
        assert_eq!(s.termination(), Some(&Termination::Interrupted { page: 2 }));
    }

    #[test]
    fn death_ends_the_session() {
        let json = r#"{
            "1": {"text": "A trap.", "choices": [
                {"goto": 2, "effects": [{"action": "take_damage", "amount": 4}]}
            ]},
            "2": {"text": "Beyond.", "choices": [{"goto": 0}]}
        }"#;
        let mut s = Session::new(repo(json), nurse(), ResolverSelector, config());
        let report = s.run();
        assert_eq!(report.termination, Termination::CharacterDied { page: 2 });
        assert!(!s.character().is_alive());
    }

    #[test]
    fn missing_page_is_a_dead_end() {
        let json = r#"{"1": {"text": "Off the map.", "choices": [{"goto": 9}]}}"#;
        let mut s = Session::new(repo(json), nurse(), ResolverSelector, config());
        assert_eq!(s.run().termination, Termination::DeadEnd { page: 9 });
    }

    #[test]
    fn turn_limit_stops_cycles() {
        let json = r#"{
            "1": {"text": "Round.", "choices": [{"goto": 2}]},
            "2": {"text": "And round.", "choices": [{"goto": 1}]}
        }"#;
        let cfg = config().with_max_turns(5).with_history_limit(2);
        let mut s = Session::new(repo(json), nurse(), ResolverSelector, cfg);
        let report = s.run();
        assert_eq!(report.termination, Termination::TurnLimit { turns: 5 });
        assert_eq!(s.character().history().len(), 2);
    }

    #[test]
    fn safe_fallback_returns_to_start() {
        let json = r#"{
            "1": {"text": "Start.", "choices": [{"goto": 2}]},
            "2": {"text": "Nothing to do.", "choices": [{"text": "Think"}]}
        }"#;
        let mut s = Session::new(repo(json), nurse(), ResolverSelector, config());
        s.step();
        s.step();
        assert_eq!(s.current_page(), 1);
        let last = s.character().history().last().unwrap();
        assert_eq!(last.choice_made, "Fallback: return to the start");
        assert_eq!(last.choice_index, None);
    }

    #[test]
    fn fallback_on_the_fallback_page_is_unresolvable() {
        let json = r#"{"1": {"text": "Stuck.", "choices": [{"text": "Think"}]}}"#;
        let mut s = Session::new(repo(json), nurse(), ResolverSelector, config());
        assert_eq!(s.run().termination, Termination::Unresolvable { page: 1 });
    }

    #[derive(Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl SessionObserver for Recorder {
        fn on_page(&mut self, page: &Page, _character: &Character) {
            self.0.borrow_mut().push(format!("page {}", page.id));
        }

        fn on_rejection(&mut self, _reason: &str, streak: u32) {
            self.0.borrow_mut().push(format!("rejected {streak}"));
        }

        fn on_termination(&mut self, report: &SessionReport) {
            self.0.borrow_mut().push(format!("end {}", report.turns));
        }
    }

    #[test]
    fn observer_sees_pages_once_per_turn() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let selector = AdapterSelector::new(ScriptedAdapter::new(vec![1, 2, 1, 1]));
        let mut s = Session::new(repo(LINEAR), nurse(), selector, config())
            .with_dice(ScriptedDice::from_rolls(&[20]))
            .with_observer(Recorder(Rc::clone(&events)));
        s.run();
        assert_eq!(
            *events.borrow(),
            vec!["page 1", "page 2", "rejected 1", "page 3", "end 3"]
        );
    }

    #[test]
    fn bundled_story_runs_to_a_graceful_end() {
        for seed in 0..20 {
            let pages = JsonPageRepository::bundled(Language::En).unwrap();
            let mut dice = StdRng::seed_from_u64(seed);
            let officer = Character::new("Peter", Some(Occupation::PoliceOfficer), 35, &mut dice);
            let cfg = AgentConfig::default().with_seed(seed).with_max_turns(100);
            let report = Session::new(pages, officer, ResolverSelector, cfg).run();
            assert!(report.termination.is_graceful(), "seed {seed}: {}", report.termination);
        }
    }

    #[test]
    fn bundled_story_officer_takes_the_badge_path() {
        let pages = JsonPageRepository::bundled(Language::En).unwrap();
        let mut s = Session::new(pages, nurse_as_officer(), ResolverSelector, config());
        s.step();
        s.step();
        assert_eq!(s.current_page(), 3);
    }

    #[test]
    fn bundled_story_lets_the_player_choose_an_occupation() {
        let pages = JsonPageRepository::bundled(Language::En).unwrap();
        let mut dice = ScriptedDice::default();
        let newcomer = Character::new("Ana", None, 30, &mut dice);
        let selector = AdapterSelector::new(ScriptedAdapter::new(vec![3]));
        let mut s = Session::new(pages, newcomer, selector, config());
        s.step();
        assert_eq!(s.character().occupation(), Some(Occupation::Nurse));
        assert_eq!(s.current_page(), 2);
        s.step();
        assert_eq!(
            s.termination(),
            Some(&Termination::Interrupted { page: 2 })
        );
        assert_eq!(s.character().occupation(), Some(Occupation::Nurse));
    }

    fn nurse_as_officer() -> Character {
        let mut c = nurse();
        c.set_occupation(Occupation::PoliceOfficer);
        c
    }
}
