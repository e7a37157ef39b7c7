//! Pages.

use serde_json::Value;

use crate::choice::{Choice, PageId};
use crate::error::{ContentIssue, IssueKind, Notes};

/// One numbered page of the story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Page number.
    pub id: PageId,
    /// Narrative text.
    pub text: String,
    /// Options in content order.
    pub choices: Vec<Choice>,
}

impl Page {
    /// A page with no text and no choices, which ends the story.
    pub fn empty(id: PageId) -> Self {
        Self {
            id,
            text: String::new(),
            choices: Vec::new(),
        }
    }

    /// Whether the page offers nothing to do.
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }

    /// Parse a page, recording problems in `issues`.
    ///
    /// Choices that cannot be parsed are skipped; the rest keep their order.
    pub fn from_value(id: PageId, value: &Value, issues: &mut Vec<ContentIssue>) -> Option<Self> {
        let Some(obj) = value.as_object() else {
            issues.push(ContentIssue {
                page: Some(id),
                choice: None,
                kind: IssueKind::SkippedPage,
                message: format!("page must be an object, got {value}"),
            });
            return None;
        };

        let page_issue = |kind, message: String| ContentIssue {
            page: Some(id),
            choice: None,
            kind,
            message,
        };

        if obj.contains_key("effect") {
            tracing::warn!(page = id, "ignoring page-level 'effect' key");
            issues.push(page_issue(
                IssueKind::Ignored,
                "page-level 'effect' is not applied; use choice effects".to_string(),
            ));
        }

        let text = obj
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut choices = Vec::new();
        match obj.get("choices") {
            None | Some(Value::Null) => {}
            Some(Value::Array(raw)) => {
                for (i, raw_choice) in raw.iter().enumerate() {
                    let mut notes = Notes::default();
                    let parsed = Choice::parse(raw_choice, 0, &mut notes);
                    let position = i + 1;
                    if let Err(e) = &parsed {
                        tracing::warn!(page = id, choice = position, error = %e, "skipping choice");
                        notes.push(IssueKind::SkippedChoice, e.clone());
                    }
                    issues.extend(notes.items.into_iter().map(|(kind, message)| ContentIssue {
                        page: Some(id),
                        choice: Some(position),
                        kind,
                        message,
                    }));
                    if let Ok(choice) = parsed {
                        choices.push(choice);
                    }
                }
            }
            Some(other) => {
                tracing::warn!(page = id, "choices is not a list");
                issues.push(page_issue(
                    IssueKind::Ignored,
                    format!("choices must be a list, got {other}"),
                ));
            }
        }

        Some(Self { id, text, choices })
    }
}
