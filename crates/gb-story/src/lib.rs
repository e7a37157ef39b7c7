//! Story content and decision resolution for the gamebook engine.
//!
//! Pages are loaded once from JSON into closed [`Choice`] types. The
//! [`resolver`] turns a page's choices plus the character's state into one
//! concrete choice, and the [`executor`] performs it: effects, rolls,
//! outcome lookup and the next page.

pub mod choice;
pub mod error;
pub mod executor;
pub mod page;
pub mod repository;
pub mod resolver;

#[cfg(test)]
mod property_tests;

pub use choice::{
    Action, Choice, DamageRange, Destination, END_PAGE, MAX_CONDITIONAL_DEPTH, OccupationPaths,
    OpposedOutcomes, OutcomeBucket, OutcomeResult, PageId, Requires, RollAction,
};
pub use error::{ContentIssue, IssueKind, StoryError, StoryResult};
pub use executor::{ActionOutcome, RollRecord, execute};
pub use page::Page;
pub use repository::{ContentReport, JsonPageRepository, Language, PageRepository, RepositoryStats};
pub use resolver::{
    PickRejection, Resolution, ResolutionSource, SAFE_FALLBACK_PAGE, resolve_choices,
    safe_fallback, validate_pick,
};
