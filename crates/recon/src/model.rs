use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Grant date
// ---------------------------------------------------------------------------

/// Calendar date a patent was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GrantDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl GrantDate {
    /// Parse an ISO `YYYY-MM-DD` date. Returns `None` for anything else,
    /// including calendar-invalid dates.
    pub fn parse(s: &str) -> Option<Self> {
        let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()?;
        Some(Self::from(date))
    }
}

impl From<NaiveDate> for GrantDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for GrantDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// ---------------------------------------------------------------------------
// Patent record
// ---------------------------------------------------------------------------

/// A single normalized patent, keyed by its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub grant_date: Option<GrantDate>,
    #[serde(default)]
    pub inventors: Vec<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
}

impl PatentRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            abstract_text: String::new(),
            grant_date: None,
            inventors: Vec::new(),
            assignees: Vec::new(),
        }
    }

    /// Identity key used for deduplication. `US10157142`, `us10157142` and
    /// `10157142` all refer to the same patent.
    pub fn key(&self) -> String {
        patent_key(&self.id)
    }

    /// Bare patent number without the country prefix.
    pub fn number(&self) -> String {
        let key = self.key();
        match key.strip_prefix("US") {
            Some(rest) => rest.to_string(),
            None => key,
        }
    }

    /// Google Patents page for this record.
    pub fn url(&self) -> String {
        format!("https://patents.google.com/patent/US{}", self.number())
    }

    pub fn grant_year(&self) -> Option<i32> {
        self.grant_date.map(|d| d.year)
    }

    /// Fold a duplicate of the same patent into this record. Fields already
    /// present win; inventor and assignee names missing here are appended in
    /// the order the duplicate lists them.
    pub fn merge_from(&mut self, other: &PatentRecord) {
        if self.title.trim().is_empty() {
            self.title = other.title.clone();
        }
        if self.abstract_text.trim().is_empty() {
            self.abstract_text = other.abstract_text.clone();
        }
        if self.grant_date.is_none() {
            self.grant_date = other.grant_date;
        }
        append_missing(&mut self.inventors, &other.inventors);
        append_missing(&mut self.assignees, &other.assignees);
    }
}

/// Normalize a patent identifier into its deduplication key: uppercase, no
/// whitespace or separators, always carrying the `US` prefix.
pub fn patent_key(id: &str) -> String {
    let compact: String = id
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '-')
        .collect::<String>()
        .to_uppercase();
    if compact.is_empty() || compact.starts_with("US") {
        compact
    } else {
        format!("US{compact}")
    }
}

fn append_missing(into: &mut Vec<String>, from: &[String]) {
    for name in from {
        let norm = crate::matcher::normalize_name(name);
        if !into.iter().any(|n| crate::matcher::normalize_name(n) == norm) {
            into.push(name.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Query candidate
// ---------------------------------------------------------------------------

/// A record returned by a search, together with every inventor whose surname
/// the search matched on. Co-inventors may share the target's surname, so
/// there can be several. Empty when the source could not tell; reconciliation
/// then checks every inventor on the record.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCandidate {
    pub record: PatentRecord,
    pub matched_names: Vec<String>,
}

impl QueryCandidate {
    pub fn new(record: PatentRecord, matched_names: Vec<String>) -> Self {
        Self { record, matched_names }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_date_parse_and_display() {
        let d = GrantDate::parse("2018-12-18").unwrap();
        assert_eq!(d, GrantDate { year: 2018, month: 12, day: 18 });
        assert_eq!(d.to_string(), "2018-12-18");
        assert!(GrantDate::parse("2018-02-30").is_none());
        assert!(GrantDate::parse("").is_none());
        assert!(GrantDate::parse("2018").is_none());
    }

    #[test]
    fn key_normalizes_prefix_and_case() {
        assert_eq!(patent_key("10157142"), "US10157142");
        assert_eq!(patent_key("us10157142"), "US10157142");
        assert_eq!(patent_key("US 10,157,142"), "US10157142");
        assert_eq!(patent_key(""), "");
    }

    #[test]
    fn url_uses_bare_number() {
        let r = PatentRecord::new("US10157142", "Cache thing");
        assert_eq!(r.number(), "10157142");
        assert_eq!(r.url(), "https://patents.google.com/patent/US10157142");
        let r = PatentRecord::new("10157143", "Other thing");
        assert_eq!(r.url(), "https://patents.google.com/patent/US10157143");
    }

    #[test]
    fn merge_keeps_first_and_appends_new_names() {
        let mut a = PatentRecord::new("US1", "Title A");
        a.inventors = vec!["Ashok Raj".into(), "Jane Doe".into()];
        a.assignees = vec!["Intel Corporation".into()];

        let mut b = PatentRecord::new("US1", "Title B");
        b.abstract_text = "An abstract".into();
        b.grant_date = GrantDate::parse("2019-01-01");
        b.inventors = vec!["jane doe".into(), "Bob Roe".into()];
        b.assignees = vec!["Intel Corporation".into(), "Acme".into()];

        a.merge_from(&b);
        assert_eq!(a.title, "Title A");
        assert_eq!(a.abstract_text, "An abstract");
        assert_eq!(a.grant_year(), Some(2019));
        assert_eq!(a.inventors, vec!["Ashok Raj", "Jane Doe", "Bob Roe"]);
        assert_eq!(a.assignees, vec!["Intel Corporation", "Acme"]);
    }
}
