//! Author list formatting.
//!
//! Authors are shown as `"<initials> <last name>"`, e.g. `"JQ Smith"`,
//! joined with commas. Long lists collapse to the first author and
//! `" et al"`. The site owner's own name is bolded.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::bibtex::Author;
use crate::latex::clean_latex;

/// Lists longer than this collapse to `"<first author> et al"`.
pub const MAX_LISTED_AUTHORS: usize = 10;

/// Errors that can occur when formatting authors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorError {
    #[error("No authors found in BibTeX entry")]
    Empty,
}

static INITIAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w").unwrap());

/// Formats one author as `"<initials> <last name>"`.
///
/// Initials are the first word character of every word in the cleaned
/// first name, so `"Jean-Pierre Q."` gives `"JPQ"`.
pub fn format_author(author: &Author) -> String {
    let first = clean_latex(&author.first);
    let last = clean_latex(&author.last);

    let initials: String = INITIAL_RE
        .find_iter(&first)
        .map(|m| m.as_str())
        .collect();

    format!("{} {}", initials, last).trim().to_string()
}

/// Formats an author list for display.
///
/// # Arguments
///
/// * `authors` - The authors in source order
/// * `self_name` - The site owner's formatted name (e.g. `"A Orthey"`); a
///   matching author is wrapped in `**...**`
///
/// # Errors
///
/// Returns [`AuthorError::Empty`] if no author has a displayable name.
/// Names that clean to nothing (`{}`) are skipped. A publication without
/// authors is invalid data.
pub fn format_authors(authors: &[Author], self_name: Option<&str>) -> Result<String, AuthorError> {
    let names: Vec<String> = authors
        .iter()
        .map(format_author)
        .filter(|name| !name.is_empty())
        .map(|name| {
            if self_name == Some(name.as_str()) {
                format!("**{}**", name)
            } else {
                name
            }
        })
        .collect();

    if names.is_empty() {
        return Err(AuthorError::Empty);
    }

    if names.len() > MAX_LISTED_AUTHORS {
        return Ok(format!("{} et al", names[0]));
    }

    Ok(names.join(", "))
}
