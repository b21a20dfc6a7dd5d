//! High-level drift tracking API for the Drift Change Ledger (DCL).
//!
//! [`DriftTracker`] wires the content store, change-set ledger, and
//! snapshot builder together behind the definition registry, and exposes
//! the system's entire external surface: report ingestion on the write
//! side, snapshots / diffs / compliance on the read side. No consumer
//! reaches into the ledger or content store directly.

pub mod config;
pub mod error;
pub mod tracker;

pub use config::{DefinitionConfig, PinnedBaseline};
pub use error::TrackerError;
pub use tracker::DriftTracker;
