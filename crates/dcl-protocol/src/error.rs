use dcl_types::TypeError;

/// Errors from payload conversion and the codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The report's drift records do not form a valid change set (missing
    /// hashes for a category, duplicate paths).
    #[error("malformed report: {0}")]
    MalformedReport(#[from] TypeError),

    /// Encoded payload exceeds the size cap.
    #[error("report too large: {size} bytes (max {max})")]
    ReportTooLarge { size: usize, max: usize },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// Result alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
