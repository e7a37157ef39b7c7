pub mod check;
pub mod play;

use std::path::Path;

use gb_story::{JsonPageRepository, Language};

/// Load pages from `pages`, or the bundled story for `lang`.
fn load_pages(lang: Language, pages: Option<&Path>) -> Result<JsonPageRepository, String> {
    tracing::debug!(lang = %lang, pages = ?pages, "loading story");
    let repo = match pages {
        Some(path) => JsonPageRepository::from_path(path),
        None => JsonPageRepository::bundled(lang),
    }
    .map_err(|e| e.to_string())?;

    if repo.is_empty() {
        return Err("no pages loaded".into());
    }
    Ok(repo)
}
