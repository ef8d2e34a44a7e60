//! JSON export

use crate::record::GazeRecord;
use crate::ExportError;

/// Pretty-printed JSON array, in insertion order
pub fn export_json(records: &[GazeRecord]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Parse a JSON export back into records
pub fn parse_json(text: &str) -> Result<Vec<GazeRecord>, ExportError> {
    Ok(serde_json::from_str(text)?)
}
