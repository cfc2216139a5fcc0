//! Upload schema for one profile patent entry.

use serde::{Deserialize, Serialize};

use patfolio_recon::{GrantDate, PatentRecord};

use crate::error::{ProfileError, Result};

/// Longest summary the profile API accepts, in characters.
pub const SUMMARY_LIMIT: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    pub name: String,
}

impl Default for Office {
    fn default() -> Self {
        Self { name: "USPTO".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub name: String,
}

/// Creation payload for `POST /people/{id}/patents`. Also the on-disk format
/// of the profile-formatted JSON artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentPayload {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub number: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub office: Office,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<GrantDate>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub inventors: Vec<NamedEntity>,
    #[serde(default)]
    pub assignees: Vec<NamedEntity>,
}

fn default_status() -> String {
    "granted".into()
}

impl PatentPayload {
    pub fn from_record(record: &PatentRecord) -> Self {
        Self {
            title: record.title.clone(),
            summary: record.abstract_text.chars().take(SUMMARY_LIMIT).collect(),
            number: record.number(),
            status: default_status(),
            office: Office::default(),
            date: record.grant_date,
            url: record.url(),
            inventors: named(&record.inventors),
            assignees: named(&record.assignees),
        }
    }

    /// Rebuild a record from a saved payload, for summaries over an
    /// earlier run's output.
    pub fn to_record(&self) -> PatentRecord {
        let mut record = PatentRecord::new(self.number.trim(), self.title.trim());
        record.abstract_text = self.summary.clone();
        record.grant_date = self.date;
        record.inventors = self.inventors.iter().map(|n| n.name.clone()).collect();
        record.assignees = self.assignees.iter().map(|n| n.name.clone()).collect();
        record
    }

    /// Title and number are required by the upload target.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ProfileError::Validation(format!(
                "patent {} is missing required field: title",
                display_number(&self.number)
            )));
        }
        if self.number.trim().is_empty() {
            return Err(ProfileError::Validation(format!(
                "patent '{}' is missing required field: number",
                self.title.trim()
            )));
        }
        Ok(())
    }
}

/// Validate a whole batch, reporting the first bad entry by position.
pub fn validate_all(payloads: &[PatentPayload]) -> Result<()> {
    for (i, payload) in payloads.iter().enumerate() {
        payload
            .validate()
            .map_err(|e| ProfileError::Validation(format!("entry {}: {}", i + 1, e)))?;
    }
    Ok(())
}

fn named(names: &[String]) -> Vec<NamedEntity> {
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(|n| NamedEntity { name: n.to_string() })
        .collect()
}

fn display_number(number: &str) -> &str {
    if number.trim().is_empty() {
        "(no number)"
    } else {
        number.trim()
    }
}
