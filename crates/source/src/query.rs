use serde::Serialize;
use serde_json::json;

use patfolio_recon::matcher::name_tokens;

use crate::error::{Result, SourceError};

/// Fields requested from PatentsView for every patent.
const FIELDS: &[&str] = &[
    "patent_id",
    "patent_title",
    "patent_date",
    "patent_abstract",
    "inventors.inventor_name_first",
    "inventors.inventor_name_last",
    "assignees.assignee_organization",
];

/// The `o` parameter. Field order is fixed so the encoded string is stable.
#[derive(Serialize)]
struct PageOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<&'a str>,
    size: u32,
}

/// One inventor (and optional assignee) search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatentQuery {
    pub inventor: String,
    pub assignee: Option<String>,
    /// Match the first name as a prefix, so `John` also hits `John M.`.
    pub fuzzy: bool,
}

impl PatentQuery {
    pub fn new(inventor: impl Into<String>) -> Self {
        Self {
            inventor: inventor.into(),
            assignee: None,
            fuzzy: true,
        }
    }

    pub fn with_assignee(mut self, assignee: Option<String>) -> Self {
        self.assignee = assignee.filter(|a| !a.trim().is_empty());
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    /// `(first, last)` name tokens as sent upstream. A single-token name is
    /// used for both.
    pub fn name_parts(&self) -> Result<(String, String)> {
        let parts: Vec<&str> = self
            .inventor
            .split_whitespace()
            .map(|t| t.trim_end_matches(['.', ',']))
            .filter(|t| !t.is_empty())
            .collect();
        match (parts.first(), parts.last()) {
            (Some(first), Some(last)) => Ok((first.to_string(), last.to_string())),
            _ => Err(SourceError::InvalidQuery("inventor name is empty".into())),
        }
    }

    /// Lowercased last-name token, used to find which inventor the query hit.
    pub(crate) fn last_token(&self) -> Option<String> {
        name_tokens(&self.inventor).pop()
    }

    /// PatentsView `q` criteria.
    pub fn criteria(&self) -> Result<serde_json::Value> {
        let (first, last) = self.name_parts()?;

        let first_cond = if self.fuzzy {
            json!({ "_begins": { "inventors.inventor_name_first": first } })
        } else {
            json!({ "inventors.inventor_name_first": first })
        };
        let mut conditions = vec![first_cond, json!({ "inventors.inventor_name_last": last })];

        if let Some(ref assignee) = self.assignee {
            conditions.push(json!({
                "_contains": { "assignees.assignee_organization": assignee.trim() }
            }));
        }

        Ok(json!({ "_and": conditions }))
    }

    /// Full query-string parameters for one page. `after` is the last
    /// `patent_id` of the previous page.
    pub fn params(&self, page_size: u32, after: Option<&str>) -> Result<Vec<(&'static str, String)>> {
        let options = PageOptions { after, size: page_size };
        let options = serde_json::to_string(&options)
            .map_err(|e| SourceError::InvalidQuery(format!("cannot encode page options: {}", e)))?;

        Ok(vec![
            ("q", self.criteria()?.to_string()),
            ("f", json!(FIELDS).to_string()),
            ("s", json!([{ "patent_id": "asc" }]).to_string()),
            ("o", options),
        ])
    }
}
