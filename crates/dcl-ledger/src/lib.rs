//! Append-only change-set ledger for the Drift Change Ledger (DCL).
//!
//! This crate is the heart of DCL. It provides:
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - `InMemoryLedger`: per-definition, gap-free versioned streams with
//!   compare-and-append semantics
//! - Content-store reference registration on the append path
//! - `StreamValidator`: after-the-fact stream auditing
//!
//! Every definition owns one stream of change sets, version-numbered from 0
//! with no gaps. Version 0 is always the coverage baseline; versions ≥ 1
//! are drift deltas. The ledger below the head never changes, which is what
//! makes snapshot folds restartable and cacheable.

pub mod error;
pub mod memory;
pub mod traits;
pub mod validation;

pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use traits::{LedgerReader, LedgerWriter};
pub use validation::{StreamValidator, ValidationReport, Violation, ViolationKind};
