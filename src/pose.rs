// src/pose.rs - keypoint model and body-size-invariant normalization
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::PoseError;

/// Landmark indices in the detector's pose output.
pub mod landmark {
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_ELBOW: usize = 13;
    pub const RIGHT_ELBOW: usize = 14;
    pub const LEFT_WRIST: usize = 15;
    pub const RIGHT_WRIST: usize = 16;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;

    /// Full landmark set produced by the upstream pose model.
    pub const COUNT: usize = 33;
}

/// One detected body joint, in normalized image coordinates (x, y roughly
/// in [0, 1], z depth-relative) with detector visibility in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visibility: f64,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// One pose-detection result: keypoints indexed by [`landmark`] constants.
/// Owned by the frame producer, read-only to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    pub landmarks: Vec<Keypoint>,
}

impl PoseFrame {
    pub fn new(landmarks: Vec<Keypoint>) -> Self {
        Self { landmarks }
    }

    pub fn get(&self, index: usize) -> Option<&Keypoint> {
        self.landmarks.get(index)
    }
}

/// Upper-body pose in a scale/position-invariant frame: origin at the
/// shoulder midpoint, unit length = shoulder width. Recomputed every frame,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPose {
    pub left_shoulder: Keypoint,
    pub right_shoulder: Keypoint,
    pub left_elbow: Keypoint,
    pub right_elbow: Keypoint,
    pub left_wrist: Keypoint,
    pub right_wrist: Keypoint,
}

/// Maps a raw detection frame into the shoulder-anchored frame.
///
/// Fails with [`PoseError::InsufficientLandmarks`] when any consumed
/// keypoint is missing, and [`PoseError::SubjectTooFar`] when the shoulder
/// width (x, y plane) falls below `min_shoulder_width`. Callers must treat
/// either failure as "no usable pose" for this frame.
pub fn normalize_pose(frame: &PoseFrame, min_shoulder_width: f64) -> Result<NormalizedPose, PoseError> {
    let left_shoulder = frame.get(landmark::LEFT_SHOULDER);
    let right_shoulder = frame.get(landmark::RIGHT_SHOULDER);
    let left_elbow = frame.get(landmark::LEFT_ELBOW);
    let right_elbow = frame.get(landmark::RIGHT_ELBOW);
    let left_wrist = frame.get(landmark::LEFT_WRIST);
    let right_wrist = frame.get(landmark::RIGHT_WRIST);
    // Hips are only checked for presence: a frame without the torso in view
    // is not a usable exercise pose.
    let hips = frame.get(landmark::LEFT_HIP).zip(frame.get(landmark::RIGHT_HIP));

    let (Some(left_shoulder), Some(right_shoulder), Some(left_elbow), Some(right_elbow), Some(left_wrist), Some(right_wrist), Some(_)) = (
        left_shoulder,
        right_shoulder,
        left_elbow,
        right_elbow,
        left_wrist,
        right_wrist,
        hips,
    ) else {
        return Err(PoseError::InsufficientLandmarks);
    };

    let shoulder_center = Vector3::new(
        (left_shoulder.x + right_shoulder.x) / 2.0,
        (left_shoulder.y + right_shoulder.y) / 2.0,
        (left_shoulder.z + right_shoulder.z) / 2.0,
    );

    let shoulder_width = ((right_shoulder.x - left_shoulder.x).powi(2)
        + (right_shoulder.y - left_shoulder.y).powi(2))
    .sqrt();

    if shoulder_width < min_shoulder_width {
        return Err(PoseError::SubjectTooFar { width: shoulder_width });
    }

    let normalize = |point: &Keypoint| Keypoint {
        x: (point.x - shoulder_center.x) / shoulder_width,
        y: (point.y - shoulder_center.y) / shoulder_width,
        z: (point.z - shoulder_center.z) / shoulder_width,
        visibility: point.visibility,
    };

    Ok(NormalizedPose {
        left_shoulder: normalize(left_shoulder),
        right_shoulder: normalize(right_shoulder),
        left_elbow: normalize(left_elbow),
        right_elbow: normalize(right_elbow),
        left_wrist: normalize(left_wrist),
        right_wrist: normalize(right_wrist),
    })
}
