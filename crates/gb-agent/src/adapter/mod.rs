//! Decision adapters.
//!
//! An adapter is an external source of picks: it sees the current page and
//! character and answers with a 1-based choice index plus a rationale. It
//! does not need to know the page rules; [`crate::selector::AdapterSelector`]
//! validates every pick before the session acts on it.

mod console;
mod demo;
mod scripted;

pub use console::ConsoleAdapter;
pub use demo::DemoAdapter;
pub use scripted::ScriptedAdapter;

use gb_mechanics::{Character, History};
use gb_story::{Page, PageId};

use crate::error::AgentResult;

/// What an adapter sees when asked to decide.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    /// The current page number.
    pub page_id: PageId,
    /// The current page.
    pub page: &'a Page,
    /// The character, read-only.
    pub character: &'a Character,
    /// Why the previous pick on this page was refused, if it was.
    pub last_rejection: Option<&'a str>,
}

impl DecisionContext<'_> {
    /// Recent decisions.
    pub fn history(&self) -> &History {
        self.character.history()
    }

    /// Number of choices on the page.
    pub fn choice_count(&self) -> usize {
        self.page.choices.len()
    }
}

/// An adapter's pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// 1-based choice index.
    pub index: usize,
    /// Why this choice.
    pub rationale: String,
}

impl Decision {
    /// A pick with its rationale.
    pub fn new(index: usize, rationale: impl Into<String>) -> Self {
        Self {
            index,
            rationale: rationale.into(),
        }
    }
}

/// A source of choice picks.
pub trait DecisionAdapter {
    /// Short name used in logs and the journal.
    fn name(&self) -> &str;

    /// Pick a choice on the current page.
    fn decide(&mut self, ctx: &DecisionContext<'_>) -> AgentResult<Decision>;
}

impl<A: DecisionAdapter + ?Sized> DecisionAdapter for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> AgentResult<Decision> {
        (**self).decide(ctx)
    }
}
