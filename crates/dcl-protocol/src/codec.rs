use crate::error::{ProtocolError, ProtocolResult};
use crate::report::ChangeSetReport;

/// Upper bound on an encoded report, blobs included.
pub const MAX_REPORT_SIZE: usize = 64 * 1024 * 1024;

/// Encode a report for delivery.
pub fn encode_report(report: &ChangeSetReport) -> ProtocolResult<Vec<u8>> {
    let payload =
        bincode::serialize(report).map_err(|e| ProtocolError::Serialization(e.to_string()))?;
    if payload.len() > MAX_REPORT_SIZE {
        return Err(ProtocolError::ReportTooLarge {
            size: payload.len(),
            max: MAX_REPORT_SIZE,
        });
    }
    Ok(payload)
}

/// Decode a received report. The size cap is enforced before
/// deserialization so an oversized payload is rejected cheaply.
pub fn decode_report(data: &[u8]) -> ProtocolResult<ChangeSetReport> {
    if data.len() > MAX_REPORT_SIZE {
        return Err(ProtocolError::ReportTooLarge {
            size: data.len(),
            max: MAX_REPORT_SIZE,
        });
    }
    bincode::deserialize(data).map_err(|e| ProtocolError::Deserialization(e.to_string()))
}
