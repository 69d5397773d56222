//! Batch generation of the publication list.
//!
//! Every `<name>.bib` in the BibTeX folder must have a `<name>.pdf` in the
//! papers folder. Any failure aborts the whole run: a partial publication
//! list is never produced.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::publication::{record_from_source, sort_by_year, EntryError, PublicationRecord};

/// Errors that abort a build.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("BibTeX folder '{}' does not exist or is not a directory", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Requires pdf file {file}, but found none.")]
    MissingDocument { file: String },

    #[error("Error parsing BibTeX file {file}: {source}")]
    Entry { file: String, source: EntryError },
}

/// Builds the sorted publication list for a site.
///
/// # Errors
///
/// Fails on the first source whose PDF is missing or whose entry cannot be
/// turned into a record.
pub fn generate(settings: &Settings) -> Result<Vec<PublicationRecord>, BuildError> {
    let sources = discover_sources(&settings.bibtex_dir)?;
    let mut records = Vec::with_capacity(sources.len());

    for bib_file in &sources {
        let basename = match bib_file.file_stem() {
            Some(stem) => stem.to_string_lossy().to_string(),
            None => continue,
        };

        let pdf_file = settings.papers_dir.join(format!("{}.pdf", basename));
        if !pdf_file.is_file() {
            return Err(BuildError::MissingDocument {
                file: format!("{}.pdf", basename),
            });
        }

        let source = fs::read_to_string(bib_file).map_err(|source| BuildError::Io {
            path: bib_file.clone(),
            source,
        })?;

        let record = record_from_source(&source, &basename, settings.self_name.as_deref())
            .map_err(|source| {
                let file = format!("{}.bib", basename);
                warn!(file = %file, error = %source, "error parsing BibTeX file");
                BuildError::Entry { file, source }
            })?;
        records.push(record);
    }

    sort_by_year(&mut records);
    info!(
        count = records.len(),
        dir = %settings.bibtex_dir.display(),
        "generated publication list"
    );
    Ok(records)
}

/// Lists the `.bib` files in a folder, sorted by name.
pub fn discover_sources(bibtex_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    if !bibtex_dir.is_dir() {
        return Err(BuildError::MissingDirectory(bibtex_dir.to_path_buf()));
    }

    let io_err = |source: std::io::Error| BuildError::Io {
        path: bibtex_dir.to_path_buf(),
        source,
    };

    let mut sources = Vec::new();
    for dir_entry in fs::read_dir(bibtex_dir).map_err(io_err)? {
        let path = dir_entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "bib") {
            sources.push(path);
        }
    }
    sources.sort();

    debug!(count = sources.len(), "discovered BibTeX sources");
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authors::AuthorError;
    use tempfile::TempDir;

    fn site_with(files: &[(&str, &str)]) -> (TempDir, Settings) {
        let site = TempDir::new().unwrap();
        fs::create_dir(site.path().join("bibtex")).unwrap();
        fs::create_dir(site.path().join("papers")).unwrap();
        for (name, content) in files {
            fs::write(site.path().join(name), content).unwrap();
        }
        let settings = Settings::resolve(site.path(), Default::default());
        (site, settings)
    }

    #[test]
    fn test_generate_sorted_records() {
        // Given: two papers with their PDFs
        let (_site, settings) = site_with(&[
            ("bibtex/2019-Doe-RAL.bib", "@article{a, author = {Jane Doe}, year = {2019}}"),
            ("papers/2019-Doe-RAL.pdf", ""),
            ("bibtex/2022-Roe-ICRA.bib", "@inproceedings{b, author = {Rick Roe}, year = {2022}}"),
            ("papers/2022-Roe-ICRA.pdf", ""),
        ]);

        // When: we generate the list
        let records = generate(&settings).unwrap();

        // Then: newest first
        let years: Vec<&str> = records.iter().map(|r| r.year.as_str()).collect();
        assert_eq!(years, vec!["2022", "2019"]);
        assert_eq!(records[0].pdf, "/papers/2022-Roe-ICRA.pdf");
    }

    #[test]
    fn test_generate_missing_pdf_names_file() {
        let (_site, settings) = site_with(&[(
            "bibtex/2020-Doe-IROS.bib",
            "@inproceedings{a, author = {Jane Doe}}",
        )]);

        let err = generate(&settings).unwrap_err();

        assert!(matches!(err, BuildError::MissingDocument { ref file } if file == "2020-Doe-IROS.pdf"));
        assert_eq!(
            err.to_string(),
            "Requires pdf file 2020-Doe-IROS.pdf, but found none."
        );
    }

    #[test]
    fn test_generate_bad_entry_aborts_batch() {
        // Given: one good and one author-less entry
        let (_site, settings) = site_with(&[
            ("bibtex/2019-Doe-RAL.bib", "@article{a, author = {Jane Doe}}"),
            ("papers/2019-Doe-RAL.pdf", ""),
            ("bibtex/2020-Roe-RAL.bib", "@article{b, title = {No authors}}"),
            ("papers/2020-Roe-RAL.pdf", ""),
        ]);

        // When: we generate the list
        let err = generate(&settings).unwrap_err();

        // Then: the whole build fails, naming the file and cause
        match &err {
            BuildError::Entry { file, source } => {
                assert_eq!(file, "2020-Roe-RAL.bib");
                assert_eq!(*source, EntryError::Authors(AuthorError::Empty));
            }
            other => panic!("Expected Entry error, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "Error parsing BibTeX file 2020-Roe-RAL.bib: No authors found in BibTeX entry"
        );
    }

    #[test]
    fn test_generate_ignores_other_files() {
        let (_site, settings) = site_with(&[
            ("bibtex/notes.txt", "not bibtex"),
            ("bibtex/2021-Doe-RAL.bib", "@article{a, author = {Jane Doe}}"),
            ("papers/2021-Doe-RAL.pdf", ""),
        ]);

        let records = generate(&settings).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_generate_empty_folder() {
        let (_site, settings) = site_with(&[]);
        assert!(generate(&settings).unwrap().is_empty());
    }

    #[test]
    fn test_generate_missing_bibtex_folder() {
        let site = TempDir::new().unwrap();
        let settings = Settings::resolve(site.path(), Default::default());

        assert!(matches!(
            generate(&settings),
            Err(BuildError::MissingDirectory(_))
        ));
    }

    #[test]
    fn test_discover_sources_sorted() {
        let (site, _settings) = site_with(&[
            ("bibtex/b.bib", ""),
            ("bibtex/a.bib", ""),
            ("bibtex/c.BIB.txt", ""),
        ]);

        let sources = discover_sources(&site.path().join("bibtex")).unwrap();
        let names: Vec<_> = sources
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.bib", "b.bib"]);
    }
}
