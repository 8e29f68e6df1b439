//! rhusers command-line tool.
//!
//! Reads one search key per line from stdin, resolves each key against the
//! LDAP directory, and writes one row per matching employee to stdout.
//! Unknown keys produce an empty row so output lines up with input.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use dialoguer::Password;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use rhusers_core::config::{AppConfig, TrackerConfig};
use rhusers_core::output::{OutputFormat, RowWriter};
use rhusers_core::{EmployeeMapper, JiraClient, LdapDirectory, Pipeline};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Resolve employee records from LDAP.
#[derive(Parser, Debug)]
#[command(
    name = "rhusers",
    version,
    about = "Resolve employee records from LDAP and print them as CSV/TSV rows"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// LDAP server address (URL or host:port).
    #[arg(short = 's', long)]
    server: Option<String>,

    /// Base DN for search queries.
    #[arg(short = 'b', long)]
    base_dn: Option<String>,

    /// LDAP query string; `{}` is replaced by each input line.
    #[arg(short = 'q', long)]
    query: Option<String>,

    /// Directory profile link template; `{}` is replaced by the user id.
    #[arg(short = 'p', long)]
    profile_url: Option<String>,

    /// Tab-separated output.
    #[arg(short = 't', long)]
    tab: bool,

    /// Spreadsheet output with HYPERLINK formulas.
    #[arg(short = 'g', long)]
    sheets: bool,

    /// Jira base URL; enables the issue-tracker column.
    #[arg(short = 'j', long)]
    tracker_url: Option<String>,

    /// Jira username.
    #[arg(short = 'u', long)]
    tracker_user: Option<String>,

    /// Never prompt for the Jira password.
    #[arg(long)]
    no_prompt: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries the rows.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);
    config.validate().context("invalid configuration")?;

    let mode = config.record_mode();
    debug!(?mode, "record mode selected");

    let tracker = match &config.tracker {
        Some(tracker) => {
            let password = tracker_password(tracker, !cli.no_prompt)?;
            Some(
                JiraClient::new(&tracker.url, &tracker.username, password)
                    .context("failed to create issue tracker client")?,
            )
        }
        None => None,
    };

    let directory = LdapDirectory::connect(&config.directory.url)
        .await
        .context("failed to connect to directory")?;
    let mapper = EmployeeMapper::new(
        directory,
        &config.directory.base_dn,
        &config.directory.query,
    )
    .with_profile_url(config.directory.profile_url.clone());
    let mut pipeline = Pipeline::new(mapper, tracker, mode);

    let mut writer = RowWriter::new(std::io::stdout(), config.output.format);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut count = 0usize;

    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let rows = pipeline
            .process(&line)
            .await
            .with_context(|| format!("failed to resolve '{}'", line))?;
        for row in &rows {
            writer.write_row(row).context("failed to write row")?;
        }
        writer.flush().context("failed to flush output")?;
        count += 1;
    }
    info!(keys = count, "input exhausted");

    if let Err(e) = pipeline.into_mapper().into_directory().disconnect().await {
        warn!(error = %e, "failed to close directory session");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

/// An explicit path must exist; the default path is optional.
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        return AppConfig::load_from_file(path).context("failed to load configuration file");
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            AppConfig::load_from_file(&path).context("failed to load configuration file")
        }
        _ => {
            debug!("no configuration file, using defaults");
            Ok(AppConfig::default())
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rhusers").join("config.toml"))
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(ref server) = cli.server {
        config.directory.url = server.clone();
    }
    if let Some(ref base_dn) = cli.base_dn {
        config.directory.base_dn = base_dn.clone();
    }
    if let Some(ref query) = cli.query {
        config.directory.query = query.clone();
    }
    if let Some(ref profile_url) = cli.profile_url {
        config.directory.profile_url = Some(profile_url.clone());
    }
    if cli.tab {
        config.output.format = OutputFormat::Tsv;
    }
    if cli.sheets {
        config.output.hyperlinks = true;
    }
    if let Some(ref url) = cli.tracker_url {
        match config.tracker {
            Some(ref mut tracker) => tracker.url = url.clone(),
            None => config.tracker = Some(TrackerConfig::new(url.clone())),
        }
    }
    if let Some(ref user) = cli.tracker_user {
        if let Some(ref mut tracker) = config.tracker {
            tracker.username = user.clone();
        }
    }
}

/// Password from the environment, else an interactive prompt when stdin is
/// a terminal, else empty.
fn tracker_password(tracker: &TrackerConfig, prompt: bool) -> Result<String> {
    if let Some(password) = tracker.resolve_password() {
        return Ok(password);
    }

    if prompt && std::io::stdin().is_terminal() {
        let password = Password::new()
            .with_prompt(format!("{} password for {}", tracker.url, tracker.username))
            .allow_empty_password(true)
            .interact()
            .context("failed to read issue tracker password")?;
        return Ok(password);
    }

    warn!(
        env_name = %tracker.password_env,
        "no issue tracker password available, using an empty one"
    );
    Ok(String::new())
}
