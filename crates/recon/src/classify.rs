use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ReconError, Result};
use crate::model::PatentRecord;

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// One technology category and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Ordered, immutable category vocabulary.
///
/// Declaration order is significant: it breaks ties when categories are
/// ranked by match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct VocabularyFile {
    #[serde(default)]
    category: Vec<Category>,
}

impl Vocabulary {
    /// Validate and build a vocabulary. Keywords are lowercased here so
    /// classification only lowercases the record text.
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(categories.len());

        for cat in categories {
            let label = cat.label.trim().to_string();
            if label.is_empty() {
                return Err(ReconError::InvalidVocabulary("category label is empty".into()));
            }
            if !seen.insert(label.to_lowercase()) {
                return Err(ReconError::InvalidVocabulary(format!(
                    "duplicate category label '{label}'"
                )));
            }
            let mut keywords = Vec::with_capacity(cat.keywords.len());
            for kw in &cat.keywords {
                let kw = kw.trim().to_lowercase();
                if kw.is_empty() {
                    return Err(ReconError::InvalidVocabulary(format!(
                        "category '{label}' has an empty keyword"
                    )));
                }
                keywords.push(kw);
            }
            normalized.push(Category { label, keywords });
        }

        Ok(Self { categories: normalized })
    }

    /// Parse `[[category]]` tables from TOML.
    ///
    /// ```toml
    /// [[category]]
    /// label = "Machine Learning"
    /// keywords = ["neural", "inference"]
    /// ```
    pub fn from_toml(s: &str) -> Result<Self> {
        let file: VocabularyFile =
            toml::from_str(s).map_err(|e| ReconError::VocabularyParse(e.to_string()))?;
        Self::new(file.category)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Labels whose keywords occur in the record's title or abstract,
    /// in vocabulary order.
    pub fn classify(&self, record: &PatentRecord) -> Vec<&str> {
        let haystack = format!("{} {}", record.title, record.abstract_text).to_lowercase();
        self.categories
            .iter()
            .filter(|cat| cat.keywords.iter().any(|kw| haystack.contains(kw.as_str())))
            .map(|cat| cat.label.as_str())
            .collect()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            categories: vec![
                Category::new(
                    "Memory & Cache Management",
                    &["memory", "cache", "buffer", "storage", "data transfer"],
                ),
                Category::new(
                    "Virtualization & I/O",
                    &["virtualization", "virtual machine", "i/o", "input/output", "translation", "paging"],
                ),
                Category::new(
                    "Error Handling & Machine Check",
                    &["error", "machine check", "fault", "recovery", "exception"],
                ),
                Category::new(
                    "Processor Performance & Interrupts",
                    &["processor", "performance", "interrupt", "cpu", "frequency"],
                ),
                Category::new(
                    "Network Interfaces",
                    &["network", "communication", "cluster", "ethernet"],
                ),
                Category::new(
                    "Machine Learning",
                    &["machine learning", "neural", "inference", "training data"],
                ),
                Category::new(
                    "System Management",
                    &["system management", "firmware", "platform", "bios"],
                ),
            ],
        }
    }
}
