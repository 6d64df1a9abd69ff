use crate::models::BatchReport;
use super::FormatError;

/// Serialize a BatchReport to pretty-printed JSON
pub fn to_json(report: &BatchReport) -> Result<String, FormatError> {
    serde_json::to_string_pretty(report).map_err(FormatError::from)
}

/// Serialize a BatchReport to compact JSON
pub fn to_json_compact(report: &BatchReport) -> Result<String, FormatError> {
    serde_json::to_string(report).map_err(FormatError::from)
}
