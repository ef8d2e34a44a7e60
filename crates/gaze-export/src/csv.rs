//! CSV export for geometric results

use std::fmt::Write;

use crate::record::GazeRecord;
use crate::ExportError;

/// Flattened field names of a geometric record
pub const CSV_HEADER: &str = "timestamp,leftEyeCenter.x,leftEyeCenter.y,rightEyeCenter.x,rightEyeCenter.y,horizontal,vertical,gazeCenter.x,gazeCenter.y";

/// Header row plus one row per record, each line terminated by `\n`
pub fn export_csv(records: &[GazeRecord]) -> Result<String, ExportError> {
    let mut out = String::with_capacity(CSV_HEADER.len() + records.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for (index, record) in records.iter().enumerate() {
        let GazeRecord::Geometric(r) = record else {
            return Err(ExportError::NotTabular { index });
        };
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "{},{},{},{},{},{},{},{},{}\n",
            r.timestamp,
            r.left_eye_center.x,
            r.left_eye_center.y,
            r.right_eye_center.x,
            r.right_eye_center.y,
            r.horizontal.as_str(),
            r.vertical.as_str(),
            r.gaze_center.x,
            r.gaze_center.y,
        );
    }

    Ok(out)
}
