//! Compliance evaluation for the Drift Change Ledger.
//!
//! Derives a tri-state [`ComplianceStatus`] for a definition from its
//! pinned baseline (if any) and its current snapshot. The status is a pure
//! function of its inputs, re-derived on every query; no transition history
//! is kept.

pub mod evaluator;
pub mod status;

pub use evaluator::ComplianceEvaluator;
pub use status::ComplianceStatus;
