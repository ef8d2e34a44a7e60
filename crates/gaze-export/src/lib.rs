//! Gaze Result Export
//!
//! Collects one run's gaze results in order and serializes them once at the
//! end of the run as JSON or CSV.

mod csv;
mod json;
mod log;
mod record;

pub use csv::{export_csv, CSV_HEADER};
pub use json::{export_json, parse_json};
pub use log::GazeLog;
pub use record::{BlendShapeRecord, GazeRecord, GeometricRecord};

use thiserror::Error;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record kind has no tabular form
    #[error("Record {index} is a blend-shape result; CSV export only covers geometric results")]
    NotTabular { index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
