// src/error.rs
use thiserror::Error;

/// Per-frame failures. These never escape the frame loop: callers degrade
/// them to a zero-score result so one bad detection cannot interrupt a
/// live session.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum PoseError {
    #[error("required landmarks missing from the detection frame")]
    InsufficientLandmarks,

    #[error("shoulder width {width:.3} below minimum, subject too far from the camera")]
    SubjectTooFar { width: f64 },
}

/// Session-lifecycle failures. Unlike [`PoseError`] these are surfaced to
/// the caller: a detector that fails to initialize aborts session start,
/// and a lost stream ends its polling loop.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("pose detector failed to initialize: {0}")]
    DetectorInit(String),

    #[error("pose stream interrupted: {0}")]
    StreamInterrupted(String),
}
