//! CLI for pubgen - Build publication listings from BibTeX files.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use pubgen::{
    check_folders, generate, load_site_config, render_markdown, to_json, ConfigFile, Settings,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Build publication listings from single-entry BibTeX files
#[derive(Parser)]
#[command(name = "pubgen")]
#[command(version)]
#[command(after_help = "\
Examples:
  pubgen build --site . -o _data/publications.json
  pubgen build --self-name 'A Orthey' --format markdown -o src/publications.md
  pubgen check --site .")]
struct Cli {
    /// Log progress and cleaned author names to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the sorted publication list
    #[command(after_help = "\
Every bibtex/<name>.bib needs a matching papers/<name>.pdf.
Any bad file aborts the build; no partial list is written.")]
    Build {
        #[command(flatten)]
        site: SiteArgs,

        /// Name to bold in author lists, as formatted (e.g. 'A Orthey')
        #[arg(long)]
        self_name: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that the bibtex and papers folders match up
    Check {
        #[command(flatten)]
        site: SiteArgs,
    },
}

#[derive(clap::Args)]
struct SiteArgs {
    /// Site root containing the bibtex and papers folders
    #[arg(short, long, default_value = ".")]
    site: PathBuf,

    /// Config file (default: <site>/pubgen.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// JSON array for the site's data folder
    Json,
    /// Standalone Markdown publications page
    Markdown,
}

// ---------------------------------------------------------------------------
// AppError — semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10 — config file unreadable / invalid
    Config(String),
    /// Exit 11 — build failed (missing PDF, bad entry)
    Build(String),
    /// Exit 12 — folders inconsistent
    Consistency(String),
    /// Exit 13 — cannot write output
    OutputFile(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 10,
            AppError::Build(_) => 11,
            AppError::Consistency(_) => 12,
            AppError::OutputFile(_) => 13,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => {
                write!(
                    f,
                    "{}\n  hint: keys are self_name, bibtex_dir and papers_dir",
                    msg
                )
            }
            AppError::Build(msg) => {
                write!(
                    f,
                    "{}\n  hint: run 'pubgen check' to compare the bibtex and papers folders",
                    msg
                )
            }
            AppError::Consistency(msg) => write!(f, "{}", msg),
            AppError::OutputFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that the output directory exists and is writable",
                    msg
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "pubgen=debug" } else { "pubgen=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Build {
            site,
            self_name,
            format,
            output,
        } => build_command(&site, self_name, format, output.as_deref()),
        Commands::Check { site } => check_command(&site),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Loads the site config and resolves folders against the site root.
fn resolve_settings(site: &SiteArgs, self_name: Option<String>) -> Result<Settings, AppError> {
    let config: ConfigFile = load_site_config(&site.site, site.config.as_deref())
        .map_err(|e| AppError::Config(e.to_string()))?;
    let mut settings = Settings::resolve(&site.site, config);
    if let Some(name) = self_name {
        settings.self_name = Some(name);
    }
    Ok(settings)
}

/// Build the publication list and write it out.
fn build_command(
    site: &SiteArgs,
    self_name: Option<String>,
    format: Format,
    output: Option<&Path>,
) -> Result<(), AppError> {
    let settings = resolve_settings(site, self_name)?;

    let records = generate(&settings).map_err(|e| AppError::Build(e.to_string()))?;

    let rendered = match format {
        Format::Json => {
            to_json(&records).map_err(|e| AppError::OutputFile(format!("JSON: {}", e)))? + "\n"
        }
        Format::Markdown => render_markdown(&records),
    };

    if let Some(output_path) = output {
        fs::write(output_path, &rendered).map_err(|e| {
            AppError::OutputFile(format!("'{}': {}", output_path.display(), e))
        })?;
        eprintln!(
            "generated {} publication(s), wrote {}",
            records.len(),
            output_path.display()
        );
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{}", rendered)
            .map_err(|e| AppError::OutputFile(format!("stdout: {}", e)))?;
    }

    Ok(())
}

/// Check folder consistency.
fn check_command(site: &SiteArgs) -> Result<(), AppError> {
    let settings = resolve_settings(site, None)?;

    let count = check_folders(&settings.bibtex_dir, &settings.papers_dir)
        .map_err(|e| AppError::Consistency(e.to_string()))?;

    println!("Everything okay. Found {} files.", count);
    Ok(())
}
