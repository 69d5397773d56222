//! Site configuration.
//!
//! Settings come from an optional `pubgen.toml` in the site root; command
//! line flags override them. Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Config file looked up in the site root when none is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "pubgen.toml";
pub const DEFAULT_BIBTEX_DIR: &str = "bibtex";
pub const DEFAULT_PAPERS_DIR: &str = "papers";

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// On-disk TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// The site owner's name as formatted in author lists, e.g. `"A Orthey"`.
    pub self_name: Option<String>,
    /// BibTeX folder, relative to the site root.
    pub bibtex_dir: Option<PathBuf>,
    /// PDF folder, relative to the site root.
    pub papers_dir: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub self_name: Option<String>,
    pub bibtex_dir: PathBuf,
    pub papers_dir: PathBuf,
}

impl Settings {
    /// Resolves folders against the site root and fills in defaults.
    pub fn resolve(site: &Path, config: ConfigFile) -> Self {
        let bibtex_dir = config
            .bibtex_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BIBTEX_DIR));
        let papers_dir = config
            .papers_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PAPERS_DIR));

        Self {
            self_name: config.self_name.filter(|n| !n.trim().is_empty()),
            bibtex_dir: site.join(bibtex_dir),
            papers_dir: site.join(papers_dir),
        }
    }
}

/// Loads a config file.
pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the config for a site.
///
/// An explicit path must be readable. Without one, `pubgen.toml` in the
/// site root is used if it exists, and defaults otherwise.
pub fn load_site_config(site: &Path, explicit: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    let default_path = site.join(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        load_config(&default_path)
    } else {
        Ok(ConfigFile::default())
    }
}
