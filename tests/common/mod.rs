//! Shared helpers for integration tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// A conference paper with accented authors and both optional links.
pub const ICRA_BIB: &str = r#"@inproceedings{orthey2023icra,
  author    = {Orthey, Andreas and M{\"u}ller, Jan and Toussaint, Marc},
  title     = {Multilevel Motion Planning},
  booktitle = {IEEE International Conference on Robotics and Automation},
  year      = {2023},
  youtube   = {https://youtu.be/abc},
  web       = {https://example.org/mlmp}
}
"#;

/// A journal article without links.
pub const IJRR_BIB: &str = r#"@article{orthey2021ijrr,
  author  = {Andreas Orthey and Marc Toussaint},
  title   = {Section Patterns},
  journal = {The International Journal of Robotics Research},
  year    = {2021}
}
"#;

/// Creates a site root with empty `bibtex/` and `papers/` folders.
pub fn empty_site() -> TempDir {
    let site = TempDir::new().unwrap();
    fs::create_dir(site.path().join("bibtex")).unwrap();
    fs::create_dir(site.path().join("papers")).unwrap();
    site
}

/// Adds `bibtex/<basename>.bib` and, if `with_pdf`, `papers/<basename>.pdf`.
pub fn add_paper(site: &Path, basename: &str, bib: &str, with_pdf: bool) {
    fs::write(site.join("bibtex").join(format!("{}.bib", basename)), bib).unwrap();
    if with_pdf {
        fs::write(
            site.join("papers").join(format!("{}.pdf", basename)),
            b"%PDF-1.4\n",
        )
        .unwrap();
    }
}

/// A site with the two sample papers and their PDFs.
pub fn sample_site() -> TempDir {
    let site = empty_site();
    add_paper(site.path(), "2021-Orthey-IJRR", IJRR_BIB, true);
    add_paper(site.path(), "2023-Orthey-ICRA", ICRA_BIB, true);
    site
}
