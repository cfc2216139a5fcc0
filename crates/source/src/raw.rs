//! Upstream patent objects and their conversion into records.

use serde::{Deserialize, Serialize};

use patfolio_recon::matcher::name_tokens;
use patfolio_recon::{GrantDate, PatentRecord};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawInventor {
    #[serde(default)]
    pub inventor_name_first: Option<String>,
    #[serde(default)]
    pub inventor_name_last: Option<String>,
}

impl RawInventor {
    pub fn full_name(&self) -> String {
        let first = self.inventor_name_first.as_deref().unwrap_or("").trim();
        let last = self.inventor_name_last.as_deref().unwrap_or("").trim();
        format!("{} {}", first, last).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAssignee {
    #[serde(default)]
    pub assignee_organization: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPatent {
    #[serde(default)]
    pub patent_id: Option<String>,
    #[serde(default)]
    pub patent_title: Option<String>,
    #[serde(default)]
    pub patent_abstract: Option<String>,
    #[serde(default)]
    pub patent_date: Option<String>,
    #[serde(default)]
    pub inventors: Option<Vec<RawInventor>>,
    #[serde(default)]
    pub assignees: Option<Vec<RawAssignee>>,
}

impl RawPatent {
    /// Convert into a record. `None` when the patent carries no identifier.
    pub fn to_record(&self) -> Option<PatentRecord> {
        let id = self.patent_id.as_deref().map(str::trim).filter(|s| !s.is_empty())?;

        let mut record = PatentRecord::new(id, self.patent_title.as_deref().unwrap_or("").trim());
        record.abstract_text = self.patent_abstract.as_deref().unwrap_or("").trim().to_string();
        record.grant_date = self.patent_date.as_deref().and_then(GrantDate::parse);
        record.inventors = self
            .inventors
            .iter()
            .flatten()
            .map(RawInventor::full_name)
            .filter(|n| !n.is_empty())
            .collect();
        record.assignees = self
            .assignees
            .iter()
            .flatten()
            .filter_map(|a| a.assignee_organization.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Some(record)
    }

    /// Full names of every inventor whose last name equals `last_token`
    /// (already lowercased), in listed order.
    pub fn matched_inventors(&self, last_token: &str) -> Vec<String> {
        self.inventors
            .iter()
            .flatten()
            .filter(|inv| {
                let tokens = name_tokens(inv.inventor_name_last.as_deref().unwrap_or(""));
                tokens.last().map(String::as_str) == Some(last_token)
            })
            .map(RawInventor::full_name)
            .collect()
    }
}
