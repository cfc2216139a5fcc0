//! Golden schema test for the profile upload payload.
//!
//! The payload doubles as the saved profile-formatted JSON, so a renamed or
//! dropped field breaks both the upload target and files written by earlier
//! runs.

use patfolio_profile::PatentPayload;
use patfolio_recon::{GrantDate, PatentRecord};

fn golden() -> serde_json::Value {
    let path = "tests/golden/payload.json";
    serde_json::from_str(
        &std::fs::read_to_string(path).unwrap_or_else(|e| panic!("Cannot read {}: {}", path, e)),
    )
    .unwrap_or_else(|e| panic!("Cannot parse {}: {}", path, e))
}

fn record() -> PatentRecord {
    let mut r = PatentRecord::new("US10157142", "Offloading cache flush");
    r.abstract_text = "A processor offloads cache flush operations to a dedicated engine.".into();
    r.grant_date = GrantDate::parse("2018-12-18");
    r.inventors = vec!["Ashok Raj".into(), "Ron Gabor".into()];
    r.assignees = vec!["Intel Corporation".into()];
    r
}

#[test]
fn test_payload_matches_golden() {
    let serialized = serde_json::to_value(PatentPayload::from_record(&record())).unwrap();
    assert_eq!(serialized, golden());
}

#[test]
fn test_golden_loads_back() {
    let payload: PatentPayload = serde_json::from_value(golden()).unwrap();
    assert!(payload.validate().is_ok());
    let back = payload.to_record();
    assert_eq!(back.key(), "US10157142");
    assert_eq!(back.grant_year(), Some(2018));
    assert_eq!(back.assignees, vec!["Intel Corporation"]);
}
