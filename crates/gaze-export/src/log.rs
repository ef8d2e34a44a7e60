//! Append-only result log for one run

use std::fs;
use std::path::Path;

use gaze_core::GazeResult;
use tracing::{debug, info};

use crate::record::GazeRecord;
use crate::{export_csv, export_json, ExportError};

/// Results of one run in frame order.
///
/// Created at run start and handed by `&mut` to each frame step, so appends
/// never race. There is no removal or reordering.
#[derive(Debug, Clone, Default)]
pub struct GazeLog {
    records: Vec<GazeRecord>,
}

impl GazeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame result
    pub fn record(&mut self, timestamp: f64, result: GazeResult) {
        debug!(timestamp, result = %result.label(), "Recording gaze result");
        self.records.push(GazeRecord::new(timestamp, result));
    }

    pub fn records(&self) -> &[GazeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        export_json(&self.records)
    }

    pub fn to_csv(&self) -> Result<String, ExportError> {
        export_csv(&self.records)
    }

    /// Write the JSON export to `path`
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        info!("Wrote {} gaze records to {}", self.records.len(), path.display());
        Ok(())
    }

    /// Write the CSV export to `path`
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        fs::write(path, self.to_csv()?)?;
        info!("Wrote {} gaze rows to {}", self.records.len(), path.display());
        Ok(())
    }
}
