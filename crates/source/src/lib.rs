//! PatentsView search client: the collection stage of the pipeline.
//!
//! Blocking reqwest client (no Tokio runtime required). Issues inventor /
//! assignee queries, follows cursor pagination and hands back one
//! [`QueryCandidate`](patfolio_recon::QueryCandidate) per distinct patent.
//!
//! No matching logic here beyond picking which inventor the query hit;
//! acceptance is decided by `patfolio-recon`.

mod client;
mod collector;
mod error;
mod query;
mod raw;

pub use client::{ClientConfig, SourceClient, DEFAULT_BASE_URL};
pub use collector::{Collection, Collector};
pub use error::{Result, SourceError};
pub use query::PatentQuery;
pub use raw::{RawAssignee, RawInventor, RawPatent};
