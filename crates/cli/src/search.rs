// patfolio search: collect, reconcile, summarize, export

use std::collections::HashSet;
use std::path::PathBuf;

use patfolio_config::Settings;
use patfolio_profile::PatentPayload;
use patfolio_recon::model::patent_key;
use patfolio_recon::{reconcile, PatentRecord, PortfolioSummary, ReconcileOptions};
use patfolio_source::{ClientConfig, Collector, PatentQuery, SourceClient};

use crate::exit_codes::EXIT_SOURCE_NOT_AUTH;
use crate::export::{self, OutputPaths};
use crate::report;
use crate::{CliError, View};

pub struct SearchArgs {
    pub name: String,
    pub assignee: Option<String>,
    pub api_key: Option<String>,
    pub fuzzy: bool,
    pub view: View,
    /// `None` when no files should be written.
    pub output: Option<PathBuf>,
}

pub fn cmd_search(args: SearchArgs, settings: &Settings) -> Result<(), CliError> {
    if args.name.trim().is_empty() {
        return Err(CliError::args("inventor name is empty"));
    }
    let vocabulary = settings.vocabulary().map_err(CliError::config)?;
    let api_key = resolve_api_key(args.api_key.clone(), &settings.source.api_key_env)?;

    let client = SourceClient::new(ClientConfig {
        base_url: settings.source.base_url.clone(),
        api_key: Some(api_key),
        timeout: settings.source.timeout(),
        retry_backoff: settings.source.retry_backoff(),
    })
    .map_err(CliError::source)?;

    tracing::info!(inventor = %args.name, assignee = ?args.assignee, fuzzy = args.fuzzy, "searching");
    let query = PatentQuery::new(args.name.as_str())
        .with_assignee(args.assignee.clone())
        .with_fuzzy(args.fuzzy);
    let collection = Collector::new(&client)
        .page_size(settings.source.page_size)
        .max_pages(settings.source.max_pages)
        .collect(&query)
        .map_err(CliError::source)?;
    if collection.truncated {
        eprintln!(
            "warning: stopped after {} pages; raise source.max_pages for complete results",
            collection.pages_fetched
        );
    }

    let opts = ReconcileOptions::new(args.name.as_str())
        .with_assignee(args.assignee.clone())
        .with_fuzzy(args.fuzzy);
    let outcome = reconcile(&collection.candidates, &opts).map_err(|e| CliError::args(e.to_string()))?;
    tracing::debug!(stats = ?outcome.stats, "reconciled");

    if outcome.is_no_match() {
        println!("No patents found for {}.", describe(&args));
        return Ok(());
    }

    let payloads: Vec<PatentPayload> = outcome.records.iter().map(PatentPayload::from_record).collect();
    let summary = PortfolioSummary::compute(&outcome.records, &vocabulary);

    match args.view {
        View::List => println!("{}", report::render_list(&payloads)),
        View::Detail => println!("{}", report::render_detail(&payloads)),
        View::SummaryOnly => println!("Found {} unique patents for {}\n", payloads.len(), describe(&args)),
    }
    print!("{}", report::render_summary(&summary));

    if let Some(output) = &args.output {
        let paths = OutputPaths::derive(output);
        let raw = accepted_raw(&collection.raw, &outcome.records);
        export::write_json(&paths.profile, &payloads)?;
        export::write_json(&paths.raw, &raw)?;
        export::write_csv(&paths.csv, &payloads)?;

        println!();
        println!("Profile format: {}", paths.profile.display());
        println!("Raw data:       {}", paths.raw.display());
        println!("CSV:            {}", paths.csv.display());
    }

    Ok(())
}

fn describe(args: &SearchArgs) -> String {
    match &args.assignee {
        Some(a) if !a.trim().is_empty() => format!("inventor {} assigned to {}", args.name.trim(), a.trim()),
        _ => format!("inventor {}", args.name.trim()),
    }
}

/// Upstream objects of the accepted records only, in collection order.
fn accepted_raw<'a>(raw: &'a [serde_json::Value], records: &[PatentRecord]) -> Vec<&'a serde_json::Value> {
    let keys: HashSet<String> = records.iter().map(PatentRecord::key).collect();
    raw.iter()
        .filter(|item| {
            item["patent_id"]
                .as_str()
                .is_some_and(|id| keys.contains(&patent_key(id)))
        })
        .collect()
}

/// Resolve the search API key: flag value > environment variable > error.
fn resolve_api_key(flag: Option<String>, env_var: &str) -> Result<String, CliError> {
    resolve_api_key_with(flag, env_var, |name| std::env::var(name).ok())
}

fn resolve_api_key_with(
    flag: Option<String>,
    env_var: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, CliError> {
    let missing = || CliError {
        code: EXIT_SOURCE_NOT_AUTH,
        message: format!("missing PatentsView API key (use --api-key or set {})", env_var),
        hint: Some("the PatentsView search API rejects requests without a key".into()),
    };

    if let Some(key) = flag {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(missing());
        }
        return Ok(trimmed.to_string());
    }

    lookup(env_var)
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or_else(missing)
}
