//! Folder consistency checks.
//!
//! Verifies that the BibTeX and papers folders pair up one-to-one before a
//! build: `.bib` files only on one side, `.pdf` files only on the other,
//! identical base names, and base names of the form
//! `YYYY-SurnameFirstAuthor-AcronymVenue`.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

static FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-[A-Za-z]+-[A-Za-z]+$").unwrap());

/// Ways the two folders can disagree.
#[derive(Error, Debug)]
pub enum ConsistencyError {
    #[error("{kind} folder '{}' does not exist or is not a directory", .path.display())]
    MissingFolder { kind: &'static str, path: PathBuf },

    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Number of files mismatch: {bib} .bib files vs {pdf} .pdf files")]
    CountMismatch { bib: usize, pdf: usize },

    #[error("Non-.{expected} file found in {kind} folder: {name}")]
    WrongExtension {
        kind: &'static str,
        expected: &'static str,
        name: String,
    },

    #[error("Filenames don't match between folders (only in bibtex: {only_bib:?}, only in papers: {only_pdf:?})")]
    NameMismatch {
        only_bib: Vec<String>,
        only_pdf: Vec<String>,
    },

    #[error("File '{0}' does not match required format 'YYYY-SurnameFirstAuthor-AcronymJournal'")]
    BadFilename(String),
}

/// Checks that both folders hold matching, well-named files.
///
/// # Returns
///
/// The number of BibTeX/PDF pairs.
pub fn check_folders(bibtex_dir: &Path, papers_dir: &Path) -> Result<usize, ConsistencyError> {
    let bib_files = list_folder(bibtex_dir, "BibTeX")?;
    let pdf_files = list_folder(papers_dir, "Papers")?;

    if bib_files.len() != pdf_files.len() {
        return Err(ConsistencyError::CountMismatch {
            bib: bib_files.len(),
            pdf: pdf_files.len(),
        });
    }

    let bib_stems = stems_with_extension(&bib_files, "bib", "bibtex")?;
    let pdf_stems = stems_with_extension(&pdf_files, "pdf", "papers")?;

    if bib_stems != pdf_stems {
        return Err(ConsistencyError::NameMismatch {
            only_bib: bib_stems.difference(&pdf_stems).cloned().collect(),
            only_pdf: pdf_stems.difference(&bib_stems).cloned().collect(),
        });
    }

    for stem in &bib_stems {
        if !is_valid_basename(stem) {
            return Err(ConsistencyError::BadFilename(stem.clone()));
        }
    }

    debug!(count = bib_stems.len(), "folders are consistent");
    Ok(bib_stems.len())
}

/// Returns true if `stem` follows the `YYYY-Surname-Acronym` convention.
pub fn is_valid_basename(stem: &str) -> bool {
    FILENAME_RE.is_match(stem)
}

fn list_folder(dir: &Path, kind: &'static str) -> Result<Vec<PathBuf>, ConsistencyError> {
    if !dir.is_dir() {
        return Err(ConsistencyError::MissingFolder {
            kind,
            path: dir.to_path_buf(),
        });
    }

    let io_err = |source: std::io::Error| ConsistencyError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        files.push(entry.map_err(io_err)?.path());
    }
    files.sort();
    Ok(files)
}

fn stems_with_extension(
    files: &[PathBuf],
    expected: &'static str,
    kind: &'static str,
) -> Result<BTreeSet<String>, ConsistencyError> {
    let mut stems = BTreeSet::new();

    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let matches = file
            .extension()
            .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(expected));
        if !matches {
            return Err(ConsistencyError::WrongExtension {
                kind,
                expected,
                name,
            });
        }
        if let Some(stem) = file.file_stem() {
            stems.insert(stem.to_string_lossy().to_string());
        }
    }

    Ok(stems)
}
