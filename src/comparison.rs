// src/comparison.rs - per-frame similarity between user and guide poses
use crate::advice;
use crate::config::PipelineConfig;
use crate::geometry::angle_degrees;
use crate::pose::{landmark, normalize_pose, NormalizedPose, PoseFrame};

/// Per-limb sub-scores or the guard message that replaced them.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreDetails {
    Arms { left_arm: f64, right_arm: f64 },
    Message(&'static str),
    None,
}

impl ScoreDetails {
    pub fn arm_scores(&self) -> Option<(f64, f64)> {
        match self {
            ScoreDetails::Arms { left_arm, right_arm } => Some((*left_arm, *right_arm)),
            _ => None,
        }
    }
}

/// Raw per-frame similarity in [0, 1], before temporal smoothing.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    pub score: f64,
    pub details: ScoreDetails,
}

impl SimilarityResult {
    fn zero(details: ScoreDetails) -> Self {
        Self { score: 0.0, details }
    }
}

/// Arms hanging down (both wrists below their shoulders in image space)
/// means the user is not exercising yet. Missing landmarks count as
/// neutral: the fail-safe default, not an error.
fn is_neutral_pose(frame: &PoseFrame) -> bool {
    let left_shoulder = frame.get(landmark::LEFT_SHOULDER);
    let left_wrist = frame.get(landmark::LEFT_WRIST);
    let right_shoulder = frame.get(landmark::RIGHT_SHOULDER);
    let right_wrist = frame.get(landmark::RIGHT_WRIST);

    let (Some(left_shoulder), Some(left_wrist), Some(right_shoulder), Some(right_wrist)) =
        (left_shoulder, left_wrist, right_shoulder, right_wrist)
    else {
        return true;
    };

    // Image y grows downward.
    left_wrist.y > left_shoulder.y && right_wrist.y > right_shoulder.y
}

fn arm_angle(pose: &NormalizedPose, side: Side) -> f64 {
    match side {
        Side::Left => angle_degrees(
            pose.left_shoulder.position(),
            pose.left_elbow.position(),
            pose.left_wrist.position(),
        ),
        Side::Right => angle_degrees(
            pose.right_shoulder.position(),
            pose.right_elbow.position(),
            pose.right_wrist.position(),
        ),
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

fn arm_score(user_angle: f64, reference_angle: f64, tolerance_degrees: f64) -> f64 {
    (1.0 - (user_angle - reference_angle).abs() / tolerance_degrees).clamp(0.0, 1.0)
}

/// Compares one user frame against the latest guide frame.
///
/// The camera feed is displayed mirrored to the user, so the user's "left
/// arm" is deliberately evaluated from the right-side keypoints and vice
/// versa, while the guide video is read straight. Do not "fix" the
/// cross-mapping: straightening it scores the wrong limb on screen.
///
/// Every failure path degrades to a zero-score result; this function never
/// raises out of the frame loop.
pub fn compare_poses(
    user: &PoseFrame,
    reference: &PoseFrame,
    config: &PipelineConfig,
) -> SimilarityResult {
    if is_neutral_pose(user) {
        return SimilarityResult::zero(ScoreDetails::Message(advice::RAISE_ARMS_PROMPT));
    }

    let (Ok(user), Ok(reference)) = (
        normalize_pose(user, config.min_shoulder_width),
        normalize_pose(reference, config.min_shoulder_width),
    ) else {
        // Detector or framing problem: no score for this frame, not a crash.
        return SimilarityResult::zero(ScoreDetails::None);
    };

    let left_arm_user = arm_angle(&user, Side::Right);
    let left_arm_reference = arm_angle(&reference, Side::Left);
    let right_arm_user = arm_angle(&user, Side::Left);
    let right_arm_reference = arm_angle(&reference, Side::Right);

    let left_arm = arm_score(left_arm_user, left_arm_reference, config.angle_tolerance_degrees);
    let right_arm = arm_score(right_arm_user, right_arm_reference, config.angle_tolerance_degrees);

    // Vertical wrist travel, on the same mirrored sides as the angles.
    let left_travel = (user.right_wrist.y - user.right_shoulder.y).abs();
    let right_travel = (user.left_wrist.y - user.left_shoulder.y).abs();

    if left_travel < config.min_movement && right_travel < config.min_movement {
        return SimilarityResult::zero(ScoreDetails::Message(advice::KEEP_MOVING_PROMPT));
    }

    SimilarityResult {
        score: (left_arm + right_arm) / 2.0,
        details: ScoreDetails::Arms { left_arm, right_arm },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    fn frame_with(points: &[(usize, Keypoint)]) -> PoseFrame {
        let mut landmarks = vec![Keypoint::new(0.5, 0.9, 0.0, 1.0); landmark::COUNT];
        for (index, point) in points {
            landmarks[*index] = *point;
        }
        PoseFrame::new(landmarks)
    }

    /// Symmetric pose with both arms raised; `bend` pushes the wrists
    /// outward so the shoulder-anchored arm angle varies with it.
    fn raised_frame(bend: f64) -> PoseFrame {
        frame_with(&[
            (landmark::LEFT_SHOULDER, Keypoint::new(0.6, 0.5, 0.0, 0.9)),
            (landmark::RIGHT_SHOULDER, Keypoint::new(0.4, 0.5, 0.0, 0.9)),
            (landmark::LEFT_ELBOW, Keypoint::new(0.7, 0.4, 0.0, 0.9)),
            (landmark::RIGHT_ELBOW, Keypoint::new(0.3, 0.4, 0.0, 0.9)),
            (landmark::LEFT_WRIST, Keypoint::new(0.7 + bend, 0.25, 0.0, 0.9)),
            (landmark::RIGHT_WRIST, Keypoint::new(0.3 - bend, 0.25, 0.0, 0.9)),
            (landmark::LEFT_HIP, Keypoint::new(0.58, 0.85, 0.0, 0.9)),
            (landmark::RIGHT_HIP, Keypoint::new(0.42, 0.85, 0.0, 0.9)),
        ])
    }

    fn neutral_frame() -> PoseFrame {
        frame_with(&[
            (landmark::LEFT_SHOULDER, Keypoint::new(0.6, 0.4, 0.0, 0.9)),
            (landmark::RIGHT_SHOULDER, Keypoint::new(0.4, 0.4, 0.0, 0.9)),
            (landmark::LEFT_WRIST, Keypoint::new(0.62, 0.7, 0.0, 0.9)),
            (landmark::RIGHT_WRIST, Keypoint::new(0.38, 0.7, 0.0, 0.9)),
            (landmark::LEFT_HIP, Keypoint::new(0.58, 0.8, 0.0, 0.9)),
            (landmark::RIGHT_HIP, Keypoint::new(0.42, 0.8, 0.0, 0.9)),
        ])
    }

    #[test]
    fn neutral_pose_scores_zero_regardless_of_reference() {
        let config = PipelineConfig::default();
        for bend in [0.0, 0.1, 0.2] {
            let result = compare_poses(&neutral_frame(), &raised_frame(bend), &config);
            assert_eq!(result.score, 0.0);
            assert_eq!(result.details, ScoreDetails::Message(advice::RAISE_ARMS_PROMPT));
        }
    }

    #[test]
    fn missing_landmarks_treated_as_neutral() {
        let config = PipelineConfig::default();
        let empty = PoseFrame::default();
        let result = compare_poses(&empty, &raised_frame(0.0), &config);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.details, ScoreDetails::Message(advice::RAISE_ARMS_PROMPT));
    }

    #[test]
    fn reference_normalization_failure_degrades_to_zero() {
        let config = PipelineConfig::default();
        let mut far_reference = raised_frame(0.0);
        far_reference.landmarks[landmark::LEFT_SHOULDER] = Keypoint::new(0.51, 0.5, 0.0, 0.9);
        far_reference.landmarks[landmark::RIGHT_SHOULDER] = Keypoint::new(0.49, 0.5, 0.0, 0.9);

        let result = compare_poses(&raised_frame(0.0), &far_reference, &config);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.details, ScoreDetails::None);
    }

    #[test]
    fn matching_pose_scores_full_marks() {
        let config = PipelineConfig::default();
        let result = compare_poses(&raised_frame(0.05), &raised_frame(0.05), &config);
        assert!((result.score - 1.0).abs() < 1e-9, "score {}", result.score);
        let (left, right) = result.details.arm_scores().unwrap();
        assert!((left - 1.0).abs() < 1e-9);
        assert!((right - 1.0).abs() < 1e-9);
    }

    #[test]
    fn per_arm_scores_stay_in_unit_range() {
        let config = PipelineConfig::default();
        for bend in [0.0, 0.05, 0.1, 0.2, 0.3] {
            let result = compare_poses(&raised_frame(0.0), &raised_frame(bend), &config);
            if let Some((left, right)) = result.details.arm_scores() {
                assert!((0.0..=1.0).contains(&left));
                assert!((0.0..=1.0).contains(&right));
            }
            assert!((0.0..=1.0).contains(&result.score));
        }
    }

    /// Pins the mirror correction: the user's left-arm score must come from
    /// the user's *right*-side keypoints. A refactor that straightens the
    /// mapping breaks this test.
    #[test]
    fn user_sides_are_cross_mapped() {
        let config = PipelineConfig::default();

        // User: right arm straight up from the shoulder, left arm folded
        // across. Reference: left arm straight up, right arm folded - the
        // mirror image, which must read as a perfect match.
        let user = frame_with(&[
            (landmark::LEFT_SHOULDER, Keypoint::new(0.6, 0.5, 0.0, 0.9)),
            (landmark::RIGHT_SHOULDER, Keypoint::new(0.4, 0.5, 0.0, 0.9)),
            (landmark::LEFT_ELBOW, Keypoint::new(0.72, 0.38, 0.0, 0.9)),
            (landmark::LEFT_WRIST, Keypoint::new(0.6, 0.3, 0.0, 0.9)),
            (landmark::RIGHT_ELBOW, Keypoint::new(0.4, 0.35, 0.0, 0.9)),
            (landmark::RIGHT_WRIST, Keypoint::new(0.4, 0.2, 0.0, 0.9)),
            (landmark::LEFT_HIP, Keypoint::new(0.58, 0.85, 0.0, 0.9)),
            (landmark::RIGHT_HIP, Keypoint::new(0.42, 0.85, 0.0, 0.9)),
        ]);
        let reference = frame_with(&[
            (landmark::LEFT_SHOULDER, Keypoint::new(0.6, 0.5, 0.0, 0.9)),
            (landmark::RIGHT_SHOULDER, Keypoint::new(0.4, 0.5, 0.0, 0.9)),
            (landmark::LEFT_ELBOW, Keypoint::new(0.6, 0.35, 0.0, 0.9)),
            (landmark::LEFT_WRIST, Keypoint::new(0.6, 0.2, 0.0, 0.9)),
            (landmark::RIGHT_ELBOW, Keypoint::new(0.28, 0.38, 0.0, 0.9)),
            (landmark::RIGHT_WRIST, Keypoint::new(0.4, 0.3, 0.0, 0.9)),
            (landmark::LEFT_HIP, Keypoint::new(0.58, 0.85, 0.0, 0.9)),
            (landmark::RIGHT_HIP, Keypoint::new(0.42, 0.85, 0.0, 0.9)),
        ]);

        let mirrored = compare_poses(&user, &reference, &config);
        assert!(mirrored.score > 0.95, "mirrored pair should match, got {}", mirrored.score);

        // Scoring the user against itself as the guide compares straight
        // sides against crossed sides: the match must be clearly worse.
        let straight = compare_poses(&user, &user, &config);
        assert!(
            straight.score < mirrored.score,
            "cross-mapping lost: straight {} vs mirrored {}",
            straight.score,
            mirrored.score
        );
    }

    #[test]
    fn low_wrist_travel_forces_zero() {
        let config = PipelineConfig::default();

        // Wrists barely above the shoulder line: not neutral, but below the
        // minimum exercise travel once normalized.
        let user = frame_with(&[
            (landmark::LEFT_SHOULDER, Keypoint::new(0.6, 0.5, 0.0, 0.9)),
            (landmark::RIGHT_SHOULDER, Keypoint::new(0.4, 0.5, 0.0, 0.9)),
            (landmark::LEFT_ELBOW, Keypoint::new(0.7, 0.49, 0.0, 0.9)),
            (landmark::RIGHT_ELBOW, Keypoint::new(0.3, 0.49, 0.0, 0.9)),
            (landmark::LEFT_WRIST, Keypoint::new(0.75, 0.499, 0.0, 0.9)),
            (landmark::RIGHT_WRIST, Keypoint::new(0.25, 0.499, 0.0, 0.9)),
            (landmark::LEFT_HIP, Keypoint::new(0.58, 0.85, 0.0, 0.9)),
            (landmark::RIGHT_HIP, Keypoint::new(0.42, 0.85, 0.0, 0.9)),
        ]);

        let result = compare_poses(&user, &user, &config);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.details, ScoreDetails::Message(advice::KEEP_MOVING_PROMPT));
    }
}
