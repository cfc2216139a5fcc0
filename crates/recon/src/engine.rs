use std::collections::HashMap;

use serde::Serialize;

use crate::error::{ReconError, Result};
use crate::matcher::{assignee_matches, match_name, NameMatch};
use crate::model::{PatentRecord, QueryCandidate};

/// What the accepted records must match.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub target_name: String,
    /// Hard post-filter: when set, a record must list an assignee containing
    /// this string (case-insensitive) whatever its name match.
    pub assignee: Option<String>,
    pub fuzzy: bool,
}

impl ReconcileOptions {
    pub fn new(target_name: impl Into<String>) -> Self {
        Self {
            target_name: target_name.into(),
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
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub candidates: usize,
    pub accepted_exact: usize,
    pub accepted_fuzzy: usize,
    pub rejected_no_inventors: usize,
    pub rejected_name: usize,
    pub rejected_assignee: usize,
    pub duplicates_merged: usize,
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Accepted records, one per identifier, in first-seen order.
    pub records: Vec<PatentRecord>,
    pub stats: ReconcileStats,
}

impl Reconciliation {
    /// Zero survivors is a valid outcome, not an error.
    pub fn is_no_match(&self) -> bool {
        self.records.is_empty()
    }
}

/// Filter candidates against the target and merge survivors by identifier.
pub fn reconcile(candidates: &[QueryCandidate], opts: &ReconcileOptions) -> Result<Reconciliation> {
    if opts.target_name.trim().is_empty() {
        return Err(ReconError::EmptyTarget);
    }

    let mut stats = ReconcileStats {
        candidates: candidates.len(),
        ..Default::default()
    };
    let mut records: Vec<PatentRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for cand in candidates {
        let record = &cand.record;

        if record.inventors.is_empty() {
            stats.rejected_no_inventors += 1;
            tracing::debug!(id = %record.id, "rejected: no inventor list");
            continue;
        }

        let verdict = candidate_name_match(cand, opts);
        if !verdict.is_accepted() {
            stats.rejected_name += 1;
            tracing::debug!(id = %record.id, "rejected: inventor name mismatch");
            continue;
        }

        if let Some(assignee) = &opts.assignee {
            if !assignee_matches(assignee, &record.assignees) {
                stats.rejected_assignee += 1;
                tracing::debug!(id = %record.id, assignee = %assignee, "rejected: assignee mismatch");
                continue;
            }
        }

        match verdict {
            NameMatch::Exact => stats.accepted_exact += 1,
            NameMatch::Fuzzy => stats.accepted_fuzzy += 1,
            NameMatch::None => {}
        }

        let key = record.key();
        match index.get(&key) {
            Some(&pos) => {
                records[pos].merge_from(record);
                stats.duplicates_merged += 1;
            }
            None => {
                index.insert(key, records.len());
                records.push(record.clone());
            }
        }
    }

    tracing::debug!(
        candidates = stats.candidates,
        accepted = records.len(),
        merged = stats.duplicates_merged,
        "reconciliation complete"
    );

    Ok(Reconciliation { records, stats })
}

/// Best verdict across the names the source matched on, or across every
/// inventor on the record when it reported none.
fn candidate_name_match(cand: &QueryCandidate, opts: &ReconcileOptions) -> NameMatch {
    let matched: Vec<&str> = cand
        .matched_names
        .iter()
        .map(String::as_str)
        .filter(|n| !n.trim().is_empty())
        .collect();
    let names: Vec<&str> = if matched.is_empty() {
        cand.record.inventors.iter().map(String::as_str).collect()
    } else {
        matched
    };

    let mut best = NameMatch::None;
    for name in names {
        match match_name(&opts.target_name, name, opts.fuzzy) {
            NameMatch::Exact => return NameMatch::Exact,
            NameMatch::Fuzzy => best = NameMatch::Fuzzy,
            NameMatch::None => {}
        }
    }
    best
}
