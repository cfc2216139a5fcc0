// patfolio publish / login / logout

use std::path::Path;
use std::time::Duration;

use patfolio_config::Settings;
use patfolio_profile::{self as profile, OAuthApp, ProfileClient, Publisher};

use crate::exit_codes::EXIT_PROFILE_PARTIAL;
use crate::export;
use crate::report;
use crate::CliError;

pub fn cmd_publish(file: &Path, skip_duplicates: bool, settings: &Settings) -> Result<(), CliError> {
    let payloads = export::read_payloads(file)?;
    if payloads.is_empty() {
        println!("No patents in {}", file.display());
        return Ok(());
    }

    let client = ProfileClient::from_saved_auth(&settings.profile.api_base).map_err(CliError::profile)?;
    println!("Publishing {} patents from {}", payloads.len(), file.display());

    let upload = Publisher::new(&client)
        .delay(settings.profile.delay())
        .skip_duplicates(skip_duplicates)
        .publish(&payloads)
        .map_err(CliError::profile)?;
    print!("{}", report::render_upload(&upload));

    if upload.has_failures() {
        return Err(CliError {
            code: EXIT_PROFILE_PARTIAL,
            message: format!("{} of {} uploads failed", upload.failed.len(), upload.total()),
            hint: Some("entries already created are kept; rerun to retry the rest".into()),
        });
    }
    Ok(())
}

pub struct LoginArgs {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub state: String,
}

/// Without a code: print the authorization URL. With one: exchange it and
/// save the access token.
pub fn cmd_login(args: LoginArgs, settings: &Settings) -> Result<(), CliError> {
    let client_id = args
        .client_id
        .or_else(|| settings.profile.client_id.clone())
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            CliError::args("missing OAuth client id")
                .with_hint("pass --client-id or set profile.client_id in config.toml")
        })?;
    let redirect_uri = args
        .redirect_uri
        .unwrap_or_else(|| settings.profile.redirect_uri.clone());

    let app = OAuthApp::new(client_id.as_str(), redirect_uri).with_client_secret(args.client_secret);

    let Some(code) = args.code else {
        let url = app.authorization_url(&args.state).map_err(CliError::profile)?;
        println!("Open this URL, approve access, and copy the `code` parameter from the redirect:\n");
        println!("  {}\n", url);
        println!("Then run:\n");
        println!("  patfolio login --client-id {} --client-secret <SECRET> --code <CODE>", client_id);
        return Ok(());
    };

    let http = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| CliError::general(format!("failed to create HTTP client: {}", e)))?;
    let creds = app.exchange_code(&http, &code).map_err(CliError::profile)?;
    let path = profile::save_auth(&creds).map_err(CliError::profile)?;

    println!("Access token saved to {}", path.display());
    if let Some(expires) = creds.expires_at {
        println!("Token expires {}", expires.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}

pub fn cmd_logout() -> Result<(), CliError> {
    profile::delete_auth().map_err(CliError::profile)?;
    println!("Saved profile access token removed");
    Ok(())
}
