use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use patfolio_recon::model::patent_key;

use crate::client::{ProfileClient, RemotePatent};
use crate::error::{ProfileError, Result};
use crate::payload::{validate_all, PatentPayload};

const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Outcome of one publish run. Counts always add up to the input length.
#[derive(Debug, Default)]
pub struct UploadReport {
    /// Numbers of the entries created.
    pub created: Vec<String>,
    /// Numbers of the entries already on the profile.
    pub skipped: Vec<String>,
    /// One [`ProfileError::UploadRejected`] per failed creation.
    pub failed: Vec<ProfileError>,
}

impl UploadReport {
    pub fn total(&self) -> usize {
        self.created.len() + self.skipped.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Lowercase, whitespace-collapsed title used for duplicate detection.
pub fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Identifiers and titles already on the profile.
#[derive(Debug, Default)]
struct ExistingEntries {
    keys: HashSet<String>,
    titles: HashSet<String>,
}

impl ExistingEntries {
    fn from_remote(remote: &[RemotePatent]) -> Self {
        let mut existing = Self::default();
        for patent in remote {
            existing.insert(patent.number.as_deref(), patent.title.as_deref());
        }
        existing
    }

    fn insert(&mut self, number: Option<&str>, title: Option<&str>) {
        if let Some(number) = number.filter(|n| !n.trim().is_empty()) {
            self.keys.insert(patent_key(number));
        }
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            self.titles.insert(normalize_title(title));
        }
    }

    fn contains(&self, payload: &PatentPayload) -> bool {
        self.keys.contains(&patent_key(&payload.number)) || self.titles.contains(&normalize_title(&payload.title))
    }
}

/// Pushes payloads to the profile, skipping entries that already exist.
pub struct Publisher<'a> {
    client: &'a ProfileClient,
    delay: Duration,
    skip_duplicates: bool,
}

impl<'a> Publisher<'a> {
    pub fn new(client: &'a ProfileClient) -> Self {
        Self {
            client,
            delay: DEFAULT_DELAY,
            skip_duplicates: true,
        }
    }

    /// Wait between consecutive creation calls.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn skip_duplicates(mut self, skip: bool) -> Self {
        self.skip_duplicates = skip;
        self
    }

    /// Validate every payload, read the existing entries once, then create
    /// the rest one call at a time. A failed creation is recorded and the
    /// batch continues; nothing is retried or rolled back.
    pub fn publish(&self, payloads: &[PatentPayload]) -> Result<UploadReport> {
        validate_all(payloads)?;

        let profile_id = self.client.profile_id()?;
        let mut existing = if self.skip_duplicates {
            let remote = self.client.list_patents(&profile_id)?;
            tracing::info!(existing = remote.len(), "fetched existing profile patents");
            ExistingEntries::from_remote(&remote)
        } else {
            ExistingEntries::default()
        };

        let mut report = UploadReport::default();
        let mut first_call = true;

        for payload in payloads {
            if self.skip_duplicates && existing.contains(payload) {
                tracing::info!(number = %payload.number, title = %payload.title, "skipping duplicate");
                report.skipped.push(payload.number.clone());
                continue;
            }

            if !first_call {
                thread::sleep(self.delay);
            }
            first_call = false;

            match self.client.create_patent(&profile_id, payload) {
                Ok(()) => {
                    tracing::info!(number = %payload.number, "created profile patent");
                    existing.insert(Some(&payload.number), Some(&payload.title));
                    report.created.push(payload.number.clone());
                }
                Err(e) => {
                    tracing::warn!(number = %payload.number, error = %e, "upload failed");
                    report.failed.push(ProfileError::UploadRejected {
                        number: payload.number.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            created = report.created.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "publish complete"
        );
        Ok(report)
    }
}
