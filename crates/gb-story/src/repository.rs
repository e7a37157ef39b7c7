//! Page repositories.
//!
//! A [`PageRepository`] hands out pages by number. Missing pages come back
//! empty, which the session treats as the end of the story.
//! [`JsonPageRepository`] loads the `{"<id>": {"text", "choices"}}` format,
//! from a string, a file, or one of the bundled language copies.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::choice::{Action, END_PAGE, PageId};
use crate::error::{ContentIssue, IssueKind, StoryError, StoryResult};
use crate::page::Page;

const BUNDLED_EN: &str = include_str!("../../../data/pages.en.json");
const BUNDLED_PT: &str = include_str!("../../../data/pages.pt.json");

/// Source of story pages.
pub trait PageRepository {
    /// Borrow a page if it exists.
    fn page(&self, id: PageId) -> Option<&Page>;

    /// Fetch a page; a missing id yields an empty page.
    fn get_page(&self, id: PageId) -> Page {
        self.page(id).cloned().unwrap_or_else(|| Page::empty(id))
    }

    /// Whether a page exists.
    fn contains(&self, id: PageId) -> bool {
        self.page(id).is_some()
    }
}

/// Languages with a bundled copy of the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Portuguese.
    Pt,
}

impl Language {
    /// Short code.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Pt => "pt",
        }
    }
}

impl FromStr for Language {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "pt" | "pt-br" | "portuguese" => Ok(Self::Pt),
            _ => Err(StoryError::UnknownLanguage(s.to_string())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Problems found while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentReport {
    /// Every issue, in page order.
    pub issues: Vec<ContentIssue>,
}

impl ContentReport {
    /// Whether nothing was found.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues of one kind.
    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &ContentIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    /// Number of issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Whether there are no issues.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Counts of pages and choice kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryStats {
    /// Pages loaded.
    pub pages: usize,
    /// Pages without choices.
    pub terminal_pages: usize,
    /// Choices loaded.
    pub choices: usize,
    /// Plain jumps.
    pub gotos: usize,
    /// Skill rolls.
    pub skill_rolls: usize,
    /// Characteristic rolls.
    pub characteristic_rolls: usize,
    /// Luck rolls.
    pub luck_rolls: usize,
    /// Opposed rolls.
    pub opposed_rolls: usize,
    /// Occupation-conditional choices.
    pub conditionals: usize,
    /// Occupation confirmations.
    pub set_occupations: usize,
    /// Choices with effects.
    pub with_effects: usize,
    /// Choices with requirements.
    pub with_requires: usize,
}

/// Pages loaded from JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonPageRepository {
    pages: BTreeMap<PageId, Page>,
    report: ContentReport,
}

impl JsonPageRepository {
    /// Parse page data.
    ///
    /// Only a document that is not JSON, or not an object, is an error.
    /// Bad pages and choices are skipped and listed in [`Self::report`].
    pub fn from_json_str(json: &str) -> StoryResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        let obj = value.as_object().ok_or(StoryError::NotAnObject)?;

        let mut issues = Vec::new();
        let mut pages = BTreeMap::new();
        for (key, raw) in obj {
            let Ok(id) = key.trim().parse::<PageId>() else {
                tracing::warn!(key = %key, "skipping page with a non-numeric id");
                issues.push(ContentIssue {
                    page: None,
                    choice: None,
                    kind: IssueKind::SkippedPage,
                    message: format!("'{key}' is not a page number"),
                });
                continue;
            };
            if id == END_PAGE {
                issues.push(ContentIssue {
                    page: Some(id),
                    choice: None,
                    kind: IssueKind::Ignored,
                    message: "page 0 is the end of the story and is never shown".to_string(),
                });
            }
            if let Some(page) = Page::from_value(id, raw, &mut issues) {
                pages.insert(id, page);
            }
        }

        let mut repo = Self {
            pages,
            report: ContentReport::default(),
        };
        issues.extend(repo.dangling_gotos());
        issues.sort_by_key(|i| (i.page, i.choice));
        repo.report = ContentReport { issues };

        tracing::info!(
            pages = repo.pages.len(),
            issues = repo.report.len(),
            "loaded story pages"
        );
        Ok(repo)
    }

    /// Load page data from a file.
    pub fn from_path(path: impl AsRef<Path>) -> StoryResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| StoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The story copy shipped with the engine.
    pub fn bundled(language: Language) -> StoryResult<Self> {
        match language {
            Language::En => Self::from_json_str(BUNDLED_EN),
            Language::Pt => Self::from_json_str(BUNDLED_PT),
        }
    }

    /// Page numbers in ascending order.
    pub fn page_ids(&self) -> impl Iterator<Item = PageId> + '_ {
        self.pages.keys().copied()
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages loaded.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Problems found while loading.
    pub fn report(&self) -> &ContentReport {
        &self.report
    }

    /// Counts of pages and choice kinds.
    pub fn stats(&self) -> RepositoryStats {
        let mut stats = RepositoryStats {
            pages: self.pages.len(),
            ..RepositoryStats::default()
        };
        for page in self.pages.values() {
            if page.is_terminal() {
                stats.terminal_pages += 1;
            }
            for choice in &page.choices {
                stats.choices += 1;
                match &choice.action {
                    Action::Goto(_) => stats.gotos += 1,
                    Action::SkillRoll(_) => stats.skill_rolls += 1,
                    Action::CharacteristicRoll(_) => stats.characteristic_rolls += 1,
                    Action::LuckRoll { .. } => stats.luck_rolls += 1,
                    Action::OpposedRoll { .. } => stats.opposed_rolls += 1,
                    Action::ConditionalOnOccupation(_) => stats.conditionals += 1,
                    Action::SetOccupation { .. } => stats.set_occupations += 1,
                    Action::None => {}
                }
                if !choice.effects.is_empty() {
                    stats.with_effects += 1;
                }
                if choice.requires.is_some() {
                    stats.with_requires += 1;
                }
            }
        }
        stats
    }

    fn dangling_gotos(&self) -> Vec<ContentIssue> {
        let mut out = Vec::new();
        for page in self.pages.values() {
            for (i, choice) in page.choices.iter().enumerate() {
                for target in choice.destinations() {
                    if !self.pages.contains_key(&target) {
                        out.push(ContentIssue {
                            page: Some(page.id),
                            choice: Some(i + 1),
                            kind: IssueKind::DanglingGoto,
                            message: format!("page {target} does not exist"),
                        });
                    }
                }
            }
        }
        out
    }
}

impl PageRepository for JsonPageRepository {
    fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(&id)
    }
}
