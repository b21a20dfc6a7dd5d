//! Deduplicated content storage for the Drift Change Ledger.
//!
//! Every file payload referenced by a drift record is stored once, keyed by
//! the BLAKE3 hash of its bytes. Many files across many definitions and
//! versions with identical content share a single entry.
//!
//! An entry exists in one of two states: `Empty` (the hash is referenced by
//! some drift but the bytes have not been uploaded yet) or `Loaded` (bytes
//! are present). The ledger append path creates `Empty` entries via
//! [`ContentStore::register_reference`]; the reporting agent fills them in
//! with [`ContentStore::put`], possibly in a later delivery.
//!
//! # Design Rules
//!
//! 1. A given hash always denotes the same bytes; a `Loaded` payload is
//!    never overwritten.
//! 2. `put` verifies the digest of the offered bytes against the key;
//!    a mismatch is an integrity error, never silently corrected.
//! 3. Re-uploading identical bytes is an idempotent no-op.
//! 4. Concurrent reads are always safe; concurrent puts for the same hash
//!    are first-writer-wins.
//! 5. Entries are never deleted while referenced (purge is a collaborator
//!    concern, out of scope here).

pub mod entry;
pub mod error;
pub mod memory;
pub mod traits;

pub use entry::{ContentEntry, ContentStatus};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryContentStore;
pub use traits::ContentStore;
