//! `patfolio-recon`: patent record reconciliation engine.
//!
//! Pure engine crate: receives query candidates, returns the accepted,
//! deduplicated record set plus a portfolio summary.
//! No network or file IO.

pub mod classify;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod summary;

pub use classify::{Category, Vocabulary};
pub use engine::{reconcile, ReconcileOptions, ReconcileStats, Reconciliation};
pub use error::{ReconError, Result};
pub use model::{GrantDate, PatentRecord, QueryCandidate};
pub use summary::{CategoryCount, PortfolioSummary};
