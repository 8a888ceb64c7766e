//! Real-time exercise pose scoring and coaching.
//!
//! Per detection frame, a user pose and a reference (guide video) pose are
//! normalized into a body-size-invariant frame, compared into a raw
//! similarity score, smoothed against jitter, adjusted for inactivity or
//! good alignment, and mapped to coaching feedback. Adjusted scores feed a
//! session tracker that produces the final performance report.
//!
//! The crate owns no camera, decoder, UI, or storage: pose frames come in
//! through [`session::PoseSource`] and results leave as
//! [`session::FrameUpdate`] values and a [`performance::PerformanceReport`].

pub mod advice;
pub mod comparison;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod motion;
pub mod performance;
pub mod pose;
pub mod session;
pub mod simulation;
pub mod smoothing;

pub use comparison::{compare_poses, ScoreDetails, SimilarityResult};
pub use config::PipelineConfig;
pub use error::{PoseError, SessionError};
pub use performance::{PerformanceReport, PerformanceTracker};
pub use pose::{normalize_pose, Keypoint, NormalizedPose, PoseFrame};
pub use session::{ExerciseSession, FrameUpdate, PoseSource, SessionController};
