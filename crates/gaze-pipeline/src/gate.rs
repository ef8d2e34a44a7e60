//! Frame-rate gate

/// Slack on the interval check. Timestamps are only millisecond accurate and
/// `1 / fps` is rarely exact, so frames recorded at the target rate would
/// otherwise land just short of the interval.
const INTERVAL_TOLERANCE: f64 = 0.0005;

/// Lets a frame through only when at least `1 / fps` seconds of media time
/// (within half a millisecond) have passed since the last admitted frame.
/// The first frame always passes.
#[derive(Debug, Clone)]
pub struct FrameGate {
    min_interval: f64,
    last_admitted: Option<f64>,
}

impl FrameGate {
    pub fn new(fps: f64) -> Self {
        Self {
            min_interval: 1.0 / fps,
            last_admitted: None,
        }
    }

    pub fn min_interval(&self) -> f64 {
        self.min_interval
    }

    /// Check and, if admitted, remember `timestamp`
    pub fn admit(&mut self, timestamp: f64) -> bool {
        match self.last_admitted {
            Some(last) if timestamp - last + INTERVAL_TOLERANCE < self.min_interval => false,
            _ => {
                self.last_admitted = Some(timestamp);
                true
            }
        }
    }
}
