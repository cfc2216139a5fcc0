use std::collections::HashSet;

use patfolio_recon::QueryCandidate;

use crate::client::SourceClient;
use crate::error::{Result, SourceError};
use crate::query::PatentQuery;
use crate::raw::RawPatent;

const DEFAULT_PAGE_SIZE: u32 = 100;
const DEFAULT_MAX_PAGES: u32 = 10;

/// Candidates gathered from one or more queries.
#[derive(Debug, Default)]
pub struct Collection {
    /// One candidate per distinct patent, first occurrence kept.
    pub candidates: Vec<QueryCandidate>,
    /// Upstream objects behind `candidates`, same order.
    pub raw: Vec<serde_json::Value>,
    pub pages_fetched: u32,
    /// True when a query stopped at the page ceiling rather than an empty page.
    pub truncated: bool,
}

/// Pages through the search API and merges results by identifier.
pub struct Collector<'a> {
    client: &'a SourceClient,
    page_size: u32,
    max_pages: u32,
}

impl<'a> Collector<'a> {
    pub fn new(client: &'a SourceClient) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn collect(&self, query: &PatentQuery) -> Result<Collection> {
        self.collect_all(std::slice::from_ref(query))
    }

    /// Run each query in turn. Records already seen (from an earlier page or
    /// an earlier query) are dropped.
    pub fn collect_all(&self, queries: &[PatentQuery]) -> Result<Collection> {
        let mut out = Collection::default();
        let mut seen: HashSet<String> = HashSet::new();

        for query in queries {
            self.collect_query(query, &mut seen, &mut out)?;
        }

        tracing::info!(
            queries = queries.len(),
            pages = out.pages_fetched,
            candidates = out.candidates.len(),
            "collection complete"
        );
        Ok(out)
    }

    fn collect_query(
        &self,
        query: &PatentQuery,
        seen: &mut HashSet<String>,
        out: &mut Collection,
    ) -> Result<()> {
        // Validates the name before any network traffic.
        query.name_parts()?;
        let last_token = query.last_token().unwrap_or_default();

        let mut cursor: Option<String> = None;
        for page in 0..self.max_pages {
            let params = query.params(self.page_size, cursor.as_deref())?;
            let body = self.client.get_patents(&params)?;
            out.pages_fetched += 1;

            let items = page_items(&body)?;
            if items.is_empty() {
                tracing::debug!(page = page + 1, "empty page, stopping");
                return Ok(());
            }
            tracing::debug!(page = page + 1, items = items.len(), "fetched page");

            let mut last_id: Option<String> = None;
            for item in items {
                let raw: RawPatent = match serde_json::from_value(item.clone()) {
                    Ok(raw) => raw,
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping malformed patent object");
                        continue;
                    }
                };
                let Some(record) = raw.to_record() else {
                    tracing::warn!("skipping patent object without patent_id");
                    continue;
                };
                last_id = Some(record.id.clone());

                if !seen.insert(record.key()) {
                    continue;
                }
                let matched = raw.matched_inventors(&last_token);
                out.candidates.push(QueryCandidate::new(record, matched));
                out.raw.push(item.clone());
            }

            match last_id {
                Some(id) => cursor = Some(id),
                None => {
                    tracing::warn!(page = page + 1, "page had no usable identifiers, stopping");
                    return Ok(());
                }
            }
        }

        tracing::warn!(max_pages = self.max_pages, "page ceiling reached, results may be incomplete");
        out.truncated = true;
        Ok(())
    }
}

/// The `patents` array of a page. Missing or `null` counts as empty.
fn page_items(body: &serde_json::Value) -> Result<&[serde_json::Value]> {
    match body.get("patents") {
        None | Some(serde_json::Value::Null) => Ok(&[]),
        Some(serde_json::Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(SourceError::Parse(format!(
            "'patents' is {}, expected array",
            match other {
                serde_json::Value::Object(_) => "an object",
                serde_json::Value::String(_) => "a string",
                serde_json::Value::Number(_) => "a number",
                serde_json::Value::Bool(_) => "a boolean",
                _ => "non-array",
            }
        ))),
    }
}
