//! Publication record assembly.
//!
//! Turns one parsed BibTeX entry into the record the site templates read.

use std::cmp::Reverse;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::authors::{format_authors, AuthorError};
use crate::bibtex::{format_bibtex, parse_first_entry, BibEntry, ParseError};
use crate::venue::VenueType;

pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_VENUE: &str = "Unknown Venue";
pub const UNKNOWN_YEAR: &str = "Unknown Year";

/// Venue fields, in order of preference.
const VENUE_FIELDS: &[&str] = &["journal", "booktitle", "publisher", "school", "howpublished"];

/// Errors that can occur while turning one source into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Authors(#[from] AuthorError),
}

/// A display-ready publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicationRecord {
    pub authors: String,
    pub title: String,
    pub venue: String,
    pub year: String,
    #[serde(rename = "type")]
    pub venue_type: VenueType,
    /// Canonical BibTeX text for the "copy citation" button.
    pub bibtex: String,
    /// Site-relative path of the companion PDF.
    pub pdf: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Site-relative path of the PDF that belongs to `<basename>.bib`.
pub fn pdf_path(basename: &str) -> String {
    format!("/papers/{}.pdf", basename)
}

/// Builds a record from a parsed entry.
///
/// # Arguments
///
/// * `entry` - The parsed entry
/// * `basename` - File name of the source without extension
/// * `self_name` - The site owner's formatted name, bolded in the author list
///
/// # Errors
///
/// Returns [`EntryError::Authors`] if the entry has no authors.
pub fn build_record(
    entry: &BibEntry,
    basename: &str,
    self_name: Option<&str>,
) -> Result<PublicationRecord, EntryError> {
    let authors = entry.authors().unwrap_or_default();
    let authors = format_authors(&authors, self_name)?;

    let record = PublicationRecord {
        authors,
        title: non_empty(entry.title()).unwrap_or(UNTITLED).to_string(),
        venue: VENUE_FIELDS
            .iter()
            .find_map(|name| non_empty(entry.get(name)))
            .unwrap_or(UNKNOWN_VENUE)
            .to_string(),
        year: non_empty(entry.year()).unwrap_or(UNKNOWN_YEAR).to_string(),
        venue_type: VenueType::from_entry_type(&entry.entry_type),
        bibtex: format_bibtex(entry),
        pdf: pdf_path(basename),
        youtube: entry.get("youtube").map(str::to_string),
        website: entry.get("web").map(str::to_string),
    };

    debug!(key = %entry.key, record = ?record, "parsed entry");
    Ok(record)
}

/// Parses a BibTeX source and builds a record from its first entry.
pub fn record_from_source(
    source: &str,
    basename: &str,
    self_name: Option<&str>,
) -> Result<PublicationRecord, EntryError> {
    let entry = parse_first_entry(source)?;
    build_record(&entry, basename, self_name)
}

/// Sort key for a year string: its leading digits, or zero if there are none.
///
/// Digit runs too long for a `u64` saturate at `u64::MAX` and sort first.
pub fn year_key(year: &str) -> u64 {
    year.trim_start()
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit))
        })
}

/// Sorts records newest first. Non-numeric years sort last; ties keep their
/// input order.
pub fn sort_by_year(records: &mut [PublicationRecord]) {
    records.sort_by_key(|r| Reverse(year_key(&r.year)));
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
