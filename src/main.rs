//! Content Lint CLI
//!
//! Validates the structure, format and required files of a content
//! repository against a rule set.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use content_lint::config::{ColorMode, Config, ConfigError, OutputFormat};
use content_lint::output::{write_report, JsonFormatter, OutputFormatter, TextFormatter};
use content_lint::progress::LogProgress;
use content_lint::repo::{self, ClonedRepo};
use content_lint::{Engine, RuleSet};
use std::path::PathBuf;
use std::sync::Arc;

/// Exit code for problems that stop the run before any verdict
const EXIT_FATAL: i32 = 3;

#[derive(Parser)]
#[command(
    name = "content-lint",
    version,
    about = "Validates content repositories against a rule set",
    long_about = "Validates the structure, format and required files of content \
                  repositories such as developer-center blueprints."
)]
struct Cli {
    /// Path or git URL of the content repository
    repo: String,

    /// Rule set file (JSON or YAML); defaults to the built-in blueprint rules
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Treat REPO as a git URL and clone it first
    #[arg(long)]
    remote: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Also write the JSON report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Only list failed and errored rules
    #[arg(short, long)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let (config, ignored) = match load_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(EXIT_FATAL);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(config.output.verbose)),
    )
    .init();

    if let Some(e) = ignored {
        log::warn!("ignoring default config: {}", e);
    }

    match run(cli, config) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(EXIT_FATAL);
        }
    }
}

fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "info"
    } else {
        "warn"
    }
}

/// Load the configuration and apply CLI overrides. A broken default config
/// file is returned alongside the defaults so it can be logged once logging
/// is set up.
fn load_config(cli: &Cli) -> anyhow::Result<(Config, Option<ConfigError>)> {
    let (mut config, ignored) = match &cli.config {
        Some(path) => (
            Config::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None,
        ),
        None => match Config::load_default() {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        },
    };

    config.merge_cli(
        cli.format.map(OutputFormat::from),
        cli.verbose.then_some(true),
        cli.jobs,
        cli.report.clone(),
        cli.no_color,
    );

    Ok((config, ignored))
}

fn run(cli: Cli, config: Config) -> anyhow::Result<i32> {
    match config.output.color {
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Auto => {}
    }

    let rule_set = match &cli.rules {
        Some(path) => RuleSet::load(path)
            .with_context(|| format!("failed to load rules {}", path.display()))?,
        None => RuleSet::blueprint().context("built-in rules are invalid")?,
    };
    log::info!(
        "loaded rule set '{}' ({} rules)",
        rule_set.name,
        rule_set.rule_count()
    );

    // Keeps a temporary checkout alive until the run is over
    let mut _checkout: Option<ClonedRepo> = None;
    let content_root = if cli.remote || repo::is_remote(&cli.repo) {
        let cloned = repo::clone_to_temp(&cli.repo)?;
        let path = cloned.path().to_path_buf();
        _checkout = Some(cloned);
        path
    } else {
        let path = PathBuf::from(&cli.repo);
        if !path.is_dir() {
            bail!("content path {} is not a directory", path.display());
        }
        path
    };

    let engine = Engine::new(config.engine.clone())
        .with_progress(Arc::new(LogProgress))
        .with_repo(&cli.repo);
    let result = engine.evaluate(&content_root, &rule_set)?;

    let formatter: Box<dyn OutputFormatter> = match config.output.format {
        OutputFormat::Text => {
            let mut formatter = TextFormatter::new();
            if config.output.color == ColorMode::Never {
                formatter = formatter.without_color();
            }
            if cli.quiet {
                formatter = formatter.problems_only();
            }
            Box::new(formatter)
        }
        OutputFormat::Json => Box::new(JsonFormatter::new().pretty()),
    };
    print!("{}", formatter.format(&result));
    if config.output.format == OutputFormat::Json {
        println!();
    }

    if let Some(path) = &config.output.report {
        write_report(&result, path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        log::info!("report written to {}", path.display());
    }

    Ok(result.exit_code())
}
