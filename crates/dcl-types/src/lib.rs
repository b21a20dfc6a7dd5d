//! Foundation types for the Drift Change Ledger (DCL).
//!
//! This crate provides the core identity, temporal, and change-record types
//! used throughout the DCL system. Every other DCL crate depends on
//! `dcl-types`.
//!
//! # Key Types
//!
//! - [`ContentHash`] — Content-addressed identifier (BLAKE3 hash of a file payload)
//! - [`DefinitionId`] — UUID v7 identifier for a monitored drift definition
//! - [`Timestamp`] — Milliseconds-since-epoch wall-clock timestamp
//! - [`Drift`] — A single per-path change record (added / changed / removed)
//! - [`ChangeSet`] — An immutable, versioned set of drifts for one definition

pub mod changeset;
pub mod content;
pub mod definition;
pub mod drift;
pub mod error;
pub mod temporal;

pub use changeset::{ChangeSet, ChangeSetCategory};
pub use content::ContentHash;
pub use definition::DefinitionId;
pub use drift::{normalize_path, Drift, DriftCategory};
pub use error::TypeError;
pub use temporal::Timestamp;
