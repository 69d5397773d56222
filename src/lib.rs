//! pubgen: publication listings from single-entry BibTeX files.
//!
//! This library provides functionality to:
//! - Read the first entry of a BibTeX source
//! - Normalize LaTeX accents in author names and format author lists
//! - Classify venues and re-serialize entries as canonical BibTeX
//! - Build the sorted publication list for a site and check its folders
//! - Render the list as JSON data or a Markdown page

pub mod authors;
pub mod bibtex;
pub mod config;
pub mod consistency;
pub mod generator;
pub mod latex;
pub mod output;
pub mod publication;
pub mod venue;

pub use authors::{format_author, format_authors, AuthorError};
pub use bibtex::{format_bibtex, parse_first_entry, Author, BibEntry, BibField, ParseError};
pub use config::{load_site_config, ConfigFile, Settings};
pub use consistency::{check_folders, ConsistencyError};
pub use generator::{generate, BuildError};
pub use latex::clean_latex;
pub use output::{render_markdown, to_json};
pub use publication::{build_record, sort_by_year, EntryError, PublicationRecord};
pub use venue::VenueType;
