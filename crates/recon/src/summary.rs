use serde::Serialize;

use crate::classify::Vocabulary;
use crate::model::PatentRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Read-only aggregate over an accepted record set. Always recomputed from
/// the records; nothing here is cached or updated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total: usize,
    /// Records carrying a grant date.
    pub dated: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub earliest_number: Option<String>,
    pub latest_number: Option<String>,
    /// Non-empty categories, highest count first; ties keep vocabulary order.
    pub categories: Vec<CategoryCount>,
}

impl PortfolioSummary {
    pub fn compute(records: &[PatentRecord], vocabulary: &Vocabulary) -> Self {
        let years: Vec<i32> = records.iter().filter_map(|r| r.grant_year()).collect();

        let mut counts: Vec<CategoryCount> = vocabulary
            .categories()
            .iter()
            .map(|c| CategoryCount { label: c.label.clone(), count: 0 })
            .collect();
        for record in records {
            for label in vocabulary.classify(record) {
                if let Some(slot) = counts.iter_mut().find(|c| c.label == label) {
                    slot.count += 1;
                }
            }
        }
        counts.retain(|c| c.count > 0);
        // sort_by is stable, so equal counts stay in vocabulary order
        counts.sort_by(|a, b| b.count.cmp(&a.count));

        let numbered: Vec<(u128, &PatentRecord)> = records
            .iter()
            .filter_map(|r| number_value(&r.id).map(|n| (n, r)))
            .collect();
        let earliest = numbered.iter().min_by_key(|(n, _)| *n).map(|(_, r)| r.id.clone());
        let latest = numbered.iter().max_by_key(|(n, _)| *n).map(|(_, r)| r.id.clone());

        Self {
            total: records.len(),
            dated: years.len(),
            first_year: years.iter().copied().min(),
            last_year: years.iter().copied().max(),
            earliest_number: earliest,
            latest_number: latest,
            categories: counts,
        }
    }

    /// Inclusive number of calendar years between first and last grant.
    pub fn year_span(&self) -> Option<u32> {
        match (self.first_year, self.last_year) {
            (Some(first), Some(last)) => Some((last - first) as u32 + 1),
            _ => None,
        }
    }

    /// Average grants per year across the span. Needs at least two dated records.
    pub fn patents_per_year(&self) -> Option<f64> {
        if self.dated < 2 {
            return None;
        }
        self.year_span().map(|span| self.total as f64 / span as f64)
    }

    pub fn count_for(&self, label: &str) -> usize {
        self.categories
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Numeric value of the digits in a patent identifier (`US10157142B2` → 101571422).
fn number_value(id: &str) -> Option<u128> {
    let digits: String = id.chars().filter(|c| c.is_ascii_digit()).take(38).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}
