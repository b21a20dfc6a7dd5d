use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::ContentHash;
use crate::error::TypeError;

/// The kind of change a drift records for one path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriftCategory {
    /// The path did not exist before and now does.
    Added,
    /// The path existed before and its content changed.
    Changed,
    /// The path existed before and no longer does.
    Removed,
}

impl DriftCategory {
    /// Whether a drift of this category must carry an old content hash.
    pub fn requires_old_hash(&self) -> bool {
        matches!(self, Self::Changed | Self::Removed)
    }

    /// Whether a drift of this category must carry a new content hash.
    pub fn requires_new_hash(&self) -> bool {
        matches!(self, Self::Added | Self::Changed)
    }
}

impl fmt::Display for DriftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Changed => write!(f, "changed"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Normalize a definition-relative path to forward slashes.
///
/// Backslashes become `/`, repeated separators collapse, and leading `./`
/// or `/` prefixes are stripped, so the same endpoint file always folds to
/// the same key regardless of the reporting platform.
pub fn normalize_path(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    let mut out = String::with_capacity(replaced.len());
    for segment in replaced.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(segment);
    }
    out
}

/// A single per-path change record.
///
/// Exactly the hashes its category requires are present: `Added` carries
/// only a new hash, `Removed` only an old hash, `Changed` both. The checked
/// constructors are the only way to build one, so the invariant holds by
/// construction; [`Drift::validate`] re-checks it for deserialized values.
///
/// A drift is owned by exactly one change set and immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drift {
    path: String,
    category: DriftCategory,
    old_hash: Option<ContentHash>,
    new_hash: Option<ContentHash>,
}

impl Drift {
    /// A path that did not exist before.
    pub fn added(path: impl Into<String>, new_hash: ContentHash) -> Self {
        Self {
            path: normalize_path(&path.into()),
            category: DriftCategory::Added,
            old_hash: None,
            new_hash: Some(new_hash),
        }
    }

    /// A path whose content changed.
    pub fn changed(
        path: impl Into<String>,
        old_hash: ContentHash,
        new_hash: ContentHash,
    ) -> Self {
        Self {
            path: normalize_path(&path.into()),
            category: DriftCategory::Changed,
            old_hash: Some(old_hash),
            new_hash: Some(new_hash),
        }
    }

    /// A path that no longer exists.
    pub fn removed(path: impl Into<String>, old_hash: ContentHash) -> Self {
        Self {
            path: normalize_path(&path.into()),
            category: DriftCategory::Removed,
            old_hash: Some(old_hash),
            new_hash: None,
        }
    }

    /// The definition-relative, slash-normalized path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The kind of change.
    pub fn category(&self) -> DriftCategory {
        self.category
    }

    /// The content hash before the change (`Changed` / `Removed`).
    pub fn old_hash(&self) -> Option<ContentHash> {
        self.old_hash
    }

    /// The content hash after the change (`Added` / `Changed`).
    pub fn new_hash(&self) -> Option<ContentHash> {
        self.new_hash
    }

    /// Re-check the category/hash invariant.
    ///
    /// The constructors enforce it; this exists for values that arrived
    /// through deserialization.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.path.is_empty() {
            return Err(TypeError::EmptyPath);
        }
        if self.category.requires_old_hash() && self.old_hash.is_none() {
            return Err(TypeError::MissingHash {
                category: self.category,
                slot: "old",
            });
        }
        if !self.category.requires_old_hash() && self.old_hash.is_some() {
            return Err(TypeError::UnexpectedHash {
                category: self.category,
                slot: "old",
            });
        }
        if self.category.requires_new_hash() && self.new_hash.is_none() {
            return Err(TypeError::MissingHash {
                category: self.category,
                slot: "new",
            });
        }
        if !self.category.requires_new_hash() && self.new_hash.is_some() {
            return Err(TypeError::UnexpectedHash {
                category: self.category,
                slot: "new",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(b: u8) -> ContentHash {
        ContentHash::from_raw([b; 32])
    }

    #[test]
    fn added_carries_only_new_hash() {
        let d = Drift::added("conf/app.xml", hash(1));
        assert_eq!(d.category(), DriftCategory::Added);
        assert_eq!(d.old_hash(), None);
        assert_eq!(d.new_hash(), Some(hash(1)));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn changed_carries_both_hashes() {
        let d = Drift::changed("conf/app.xml", hash(1), hash(2));
        assert_eq!(d.old_hash(), Some(hash(1)));
        assert_eq!(d.new_hash(), Some(hash(2)));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn removed_carries_only_old_hash() {
        let d = Drift::removed("conf/app.xml", hash(2));
        assert_eq!(d.old_hash(), Some(hash(2)));
        assert_eq!(d.new_hash(), None);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn normalize_converts_backslashes() {
        assert_eq!(normalize_path(r"conf\app.xml"), "conf/app.xml");
    }

    #[test]
    fn normalize_strips_leading_dot_and_slash() {
        assert_eq!(normalize_path("./conf/app.xml"), "conf/app.xml");
        assert_eq!(normalize_path("/conf/app.xml"), "conf/app.xml");
    }

    #[test]
    fn normalize_collapses_repeated_separators() {
        assert_eq!(normalize_path("conf//deep///app.xml"), "conf/deep/app.xml");
    }

    #[test]
    fn constructors_normalize_paths() {
        let d = Drift::added(r".\conf\app.xml", hash(1));
        assert_eq!(d.path(), "conf/app.xml");
    }

    #[test]
    fn validate_rejects_malformed_deserialized_drift() {
        // An Added drift carrying an old hash can only arrive via
        // deserialization; validate() must catch it.
        let json = serde_json::json!({
            "path": "a.txt",
            "category": "Added",
            "old_hash": hash(1),
            "new_hash": hash(2),
        });
        let d: Drift = serde_json::from_value(json).unwrap();
        assert_eq!(
            d.validate().unwrap_err(),
            TypeError::UnexpectedHash {
                category: DriftCategory::Added,
                slot: "old"
            }
        );
    }

    #[test]
    fn validate_rejects_missing_required_hash() {
        let json = serde_json::json!({
            "path": "a.txt",
            "category": "Removed",
            "old_hash": null,
            "new_hash": null,
        });
        let d: Drift = serde_json::from_value(json).unwrap();
        assert_eq!(
            d.validate().unwrap_err(),
            TypeError::MissingHash {
                category: DriftCategory::Removed,
                slot: "old"
            }
        );
    }

    #[test]
    fn validate_rejects_empty_path() {
        let d = Drift::added("", hash(1));
        assert_eq!(d.validate().unwrap_err(), TypeError::EmptyPath);
    }

    #[test]
    fn serde_roundtrip() {
        let d = Drift::changed("conf/app.xml", hash(1), hash(2));
        let json = serde_json::to_string(&d).unwrap();
        let parsed: Drift = serde_json::from_str(&json).unwrap();
        assert_eq!(d, parsed);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalize_is_idempotent(path in "[a-z./\\\\]{0,16}") {
            let once = normalize_path(&path);
            prop_assert_eq!(normalize_path(&once), once);
        }

        #[test]
        fn normalized_paths_never_start_or_end_with_separator(
            path in "[a-z./\\\\]{0,16}"
        ) {
            let normalized = normalize_path(&path);
            prop_assert!(!normalized.starts_with('/'));
            prop_assert!(!normalized.ends_with('/'));
            prop_assert!(!normalized.contains("//"));
        }
    }
}
