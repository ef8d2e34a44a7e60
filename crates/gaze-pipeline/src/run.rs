//! Run driver
//!
//! One run owns one [`GazeLog`]. Frames are pulled one at a time and at most
//! one detector call is in flight, so results land in frame order.

use std::sync::Arc;

use eye_crop::{CropError, CropStore, EyeSide};
use gaze_export::GazeLog;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::detector::{EyeLandmarks, Frame, FrameSource, GazeStrategy, StepOutcome};
use crate::gate::FrameGate;
use crate::PipelineError;

/// Counters for one finished run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    /// Frames pulled from the source
    pub frames_seen: u64,
    /// Frames passed to the detector
    pub frames_submitted: u64,
    /// Frames that produced a recorded result
    pub results_recorded: u64,
    /// Frames where the detector found no face
    pub detection_misses: u64,
    /// Results dropped because the run was stopped while inference was in flight
    pub results_discarded: u64,
    /// Eye crops written
    pub crops_written: u64,
    /// Whether the run ended through its stop handle
    pub stopped: bool,
}

/// Everything a run hands back
#[derive(Debug)]
pub struct RunOutput {
    pub summary: RunSummary,
    pub log: GazeLog,
}

/// Stops a run from outside
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Round media time to millisecond precision
fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

/// A single processing pass over one source
pub struct GazeRun<S, G> {
    source: S,
    strategy: G,
    gate: FrameGate,
    crops: Option<CropStore>,
    stop_tx: Arc<watch::Sender<bool>>,
    stop_rx: watch::Receiver<bool>,
}

impl<S: FrameSource, G: GazeStrategy> GazeRun<S, G> {
    pub fn new(source: S, strategy: G, fps: f64) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        Self {
            source,
            strategy,
            gate: FrameGate::new(fps),
            crops: None,
            stop_tx: Arc::new(stop_tx),
            stop_rx,
        }
    }

    /// Save eye crops for frames that carry pixels and landmarks
    pub fn with_crops(mut self, store: CropStore) -> Self {
        self.crops = Some(store);
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            tx: Arc::clone(&self.stop_tx),
        }
    }

    fn stopped(&self) -> bool {
        *self.stop_rx.borrow()
    }

    /// Drive the run until the source ends or the run is stopped
    pub async fn execute(mut self) -> Result<RunOutput, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("gaze_run", %run_id, strategy = self.strategy.name());
        async move {
            let mut summary = RunSummary {
                run_id,
                ..Default::default()
            };
            let mut log = GazeLog::new();

            info!(
                "Run started (min frame interval {:.3}s)",
                self.gate.min_interval()
            );

            while !self.stopped() {
                let next = tokio::select! {
                    biased;
                    Ok(_) = self.stop_rx.wait_for(|stopped| *stopped) => break,
                    next = self.source.next_frame() => next?,
                };
                let Some(frame) = next else {
                    break;
                };
                summary.frames_seen += 1;

                if !self.gate.admit(frame.timestamp) {
                    debug!(sequence = frame.sequence, "Frame skipped by rate gate");
                    continue;
                }
                summary.frames_submitted += 1;

                let outcome = self.strategy.step(&frame).await?;

                if self.stopped() {
                    debug!(sequence = frame.sequence, "Run stopped; discarding in-flight result");
                    if matches!(outcome, StepOutcome::Detected { .. }) {
                        summary.results_discarded += 1;
                    }
                    break;
                }

                match outcome {
                    StepOutcome::Miss => {
                        debug!(sequence = frame.sequence, "No face detected");
                        summary.detection_misses += 1;
                    }
                    StepOutcome::Detected { result, eyes } => {
                        log.record(round_millis(frame.timestamp), result);
                        summary.results_recorded += 1;
                        if let Some(eyes) = eyes {
                            summary.crops_written += self.save_crops(&frame, &eyes)?;
                        }
                    }
                }
            }

            summary.stopped = self.stopped();
            info!(
                frames = summary.frames_seen,
                submitted = summary.frames_submitted,
                recorded = summary.results_recorded,
                misses = summary.detection_misses,
                "Run finished"
            );

            Ok(RunOutput { summary, log })
        }
        .instrument(span)
        .await
    }

    fn save_crops(&self, frame: &Frame, eyes: &EyeLandmarks) -> Result<u64, PipelineError> {
        let (Some(store), Some(pixels)) = (&self.crops, &frame.pixels) else {
            return Ok(0);
        };

        let mut written = 0;
        for (side, eye) in [(EyeSide::Left, &eyes.left_eye), (EyeSide::Right, &eyes.right_eye)] {
            match store.save_eye(pixels, eye, side) {
                Ok(_) => written += 1,
                Err(CropError::OutOfFrame { region, .. }) => {
                    warn!(
                        sequence = frame.sequence,
                        "Skipping {} eye crop outside frame: {:?}",
                        side.as_str(),
                        region
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(written)
    }
}
