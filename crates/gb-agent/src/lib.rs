//! Session loop for the gamebook engine.
//!
//! A [`Session`] runs the observe, decide, act, record cycle over a page
//! repository until the story ends. Decisions come from a
//! [`ChoiceSelector`]: either the rule-based [`ResolverSelector`] or an
//! [`AdapterSelector`] wrapping an external [`DecisionAdapter`] whose picks
//! are validated against the same rules. Every turn is written to the
//! character's history and to a [`Journal`].

pub mod adapter;
pub mod config;
pub mod error;
pub mod journal;
pub mod selector;
pub mod session;

#[cfg(test)]
mod property_tests;

pub use adapter::{ConsoleAdapter, Decision, DecisionAdapter, DecisionContext, DemoAdapter, ScriptedAdapter};
pub use config::AgentConfig;
pub use error::{AgentError, AgentResult};
pub use journal::{Journal, JournalEntry};
pub use selector::{AdapterSelector, ChoiceSelector, ResolverSelector, Selection};
pub use session::{Session, SessionObserver, SessionReport, SessionState, Termination};
