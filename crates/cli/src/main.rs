// patfolio CLI - find an inventor's patents, summarize them, publish them to a profile

mod exit_codes;
mod export;
mod manual;
mod publish;
mod report;
mod search;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patfolio_config::{ConfigError, Settings};
use patfolio_profile::ProfileError;
use patfolio_recon::{PatentRecord, PortfolioSummary};
use patfolio_source::SourceError;

use exit_codes::{
    profile_exit_code, source_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_IO_ERROR, EXIT_SUCCESS,
    EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "patfolio")]
#[command(about = "Retrieve an inventor's granted patents, summarize the portfolio, publish it to a profile")]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (default: <config dir>/patfolio/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search PatentsView for an inventor and write the results
    #[command(after_help = "\
Examples:
  patfolio search \"Ashok Raj\"
  patfolio search \"Ashok Raj\" --assignee Intel --list
  patfolio search \"Ashok Raj\" --detail --output out/ashok.json
  patfolio search \"Ashok Raj\" --no-fuzzy --no-files")]
    Search {
        /// Inventor full name, e.g. "Ashok Raj"
        name: String,

        /// Keep only patents whose assignee contains this text
        #[arg(long)]
        assignee: Option<String>,

        /// PatentsView API key (default: the variable named by source.api_key_env)
        #[arg(long)]
        api_key: Option<String>,

        /// Require an exact inventor name match
        #[arg(long)]
        no_fuzzy: bool,

        /// Show number and title for each patent
        #[arg(long, conflicts_with = "detail")]
        list: bool,

        /// Show every field of each patent
        #[arg(long)]
        detail: bool,

        /// Profile-formatted JSON path; `_raw.json` and `.csv` files are written next to it
        #[arg(long, short = 'o', default_value = "patents.json")]
        output: PathBuf,

        /// Print only, write no files
        #[arg(long)]
        no_files: bool,
    },

    /// Upload a saved patent list to the profile
    Publish {
        /// Profile-formatted JSON written by `patfolio search`
        file: PathBuf,

        /// Upload entries even when the profile already lists them
        #[arg(long)]
        no_skip_duplicates: bool,
    },

    /// Authorize access to the profile (OAuth2 authorization code)
    #[command(after_help = "\
Run once without --code to get the authorization URL, then again with the
code from the redirect:
  patfolio login --client-id ID
  patfolio login --client-id ID --client-secret SECRET --code CODE")]
    Login {
        /// OAuth client id (default: profile.client_id)
        #[arg(long)]
        client_id: Option<String>,

        /// OAuth client secret, needed with --code
        #[arg(long, env = "PATFOLIO_CLIENT_SECRET", hide_env_values = true)]
        client_secret: Option<String>,

        /// Authorization code from the redirect URL
        #[arg(long)]
        code: Option<String>,

        /// Redirect URI registered for the app (default: profile.redirect_uri)
        #[arg(long)]
        redirect_uri: Option<String>,

        /// Opaque state echoed back on the redirect
        #[arg(long, default_value = "patent_upload_session")]
        state: String,
    },

    /// Delete the saved profile access token
    Logout,

    /// Print manual search links for an inventor
    Links {
        /// Inventor full name, e.g. "Ashok Raj"
        name: String,

        /// Add an assignee clause to every query
        #[arg(long)]
        assignee: Option<String>,
    },

    /// Write a blank CSV template for entering patents by hand
    Template {
        /// CSV file to create
        #[arg(default_value = "patent_template.csv")]
        file: PathBuf,

        /// Number of empty rows after the example row
        #[arg(long, short = 'n', default_value_t = 10)]
        rows: usize,
    },

    /// Portfolio summary of a saved patent list
    Summary {
        /// Profile-formatted JSON written by `patfolio search`
        file: PathBuf,

        /// Also show number and title for each patent
        #[arg(long, conflicts_with = "detail")]
        list: bool,

        /// Also show every field of each patent
        #[arg(long)]
        detail: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::load(cli.config.as_deref()).map_err(CliError::config)?;

    match cli.command {
        Commands::Search {
            name,
            assignee,
            api_key,
            no_fuzzy,
            list,
            detail,
            output,
            no_files,
        } => search::cmd_search(
            search::SearchArgs {
                name,
                assignee,
                api_key,
                fuzzy: !no_fuzzy,
                view: View::from_flags(list, detail),
                output: (!no_files).then_some(output),
            },
            &settings,
        ),
        Commands::Publish { file, no_skip_duplicates } => {
            publish::cmd_publish(&file, !no_skip_duplicates, &settings)
        }
        Commands::Login {
            client_id,
            client_secret,
            code,
            redirect_uri,
            state,
        } => publish::cmd_login(
            publish::LoginArgs {
                client_id,
                client_secret,
                code,
                redirect_uri,
                state,
            },
            &settings,
        ),
        Commands::Logout => publish::cmd_logout(),
        Commands::Links { name, assignee } => manual::cmd_links(&name, assignee.as_deref()),
        Commands::Template { file, rows } => manual::cmd_template(&file, rows),
        Commands::Summary { file, list, detail } => {
            cmd_summary(&file, View::from_flags(list, detail), &settings)
        }
    }
}

/// Logs go to stderr; reports go to stdout.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// How a patent list is shown before the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    SummaryOnly,
    List,
    Detail,
}

impl View {
    fn from_flags(list: bool, detail: bool) -> Self {
        match (list, detail) {
            (true, _) => View::List,
            (_, true) => View::Detail,
            _ => View::SummaryOnly,
        }
    }
}

// ============================================================================
// summary
// ============================================================================

fn cmd_summary(file: &std::path::Path, view: View, settings: &Settings) -> Result<(), CliError> {
    let vocabulary = settings.vocabulary().map_err(CliError::config)?;
    let payloads = export::read_payloads(file)?;
    if payloads.is_empty() {
        println!("No patents in {}", file.display());
        return Ok(());
    }

    let records: Vec<PatentRecord> = payloads.iter().map(|p| p.to_record()).collect();
    let summary = PortfolioSummary::compute(&records, &vocabulary);

    match view {
        View::List => println!("{}", report::render_list(&payloads)),
        View::Detail => println!("{}", report::render_detail(&payloads)),
        View::SummaryOnly => {}
    }
    print!("{}", report::render_summary(&summary));
    Ok(())
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO_ERROR, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        let hint = Settings::config_path().map(|p| format!("default settings file: {}", p.display()));
        Self { code: EXIT_CONFIG, message: err.to_string(), hint }
    }

    pub fn source(err: SourceError) -> Self {
        let hint = match &err {
            SourceError::SourceUnavailable { .. } => {
                Some("check network access and the API key; PatentsView may be down, retry later".to_string())
            }
            SourceError::Parse(_) => Some("is source.base_url pointing at the PatentsView search API?".to_string()),
            _ => None,
        };
        Self { code: source_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn profile(err: ProfileError) -> Self {
        let hint = match &err {
            ProfileError::NotAuthenticated => Some("run `patfolio login --client-id <ID>` to authorize".to_string()),
            _ => None,
        };
        Self { code: profile_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
