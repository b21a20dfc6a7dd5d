//! Reporter-boundary payload for the Drift Change Ledger.
//!
//! The remote detection agent delivers drift as a [`ChangeSetReport`]:
//! change-set metadata plus the content blobs for any hashes the server
//! has not yet loaded. Delivery may be partial — metadata without blobs is
//! accepted and leaves the referenced hashes `Empty` until a follow-up
//! upload arrives. Transport framing, retries, and compression are the
//! agent transport's concern, not this crate's.

pub mod codec;
pub mod error;
pub mod report;

pub use codec::{decode_report, encode_report, MAX_REPORT_SIZE};
pub use error::{ProtocolError, ProtocolResult};
pub use report::{ChangeSetReport, ContentBlob, DriftRecord};
