// src/motion.rs - frame-to-frame motion tracking and the inactivity penalty
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::pose::PoseFrame;

/// Smoothed score after the inactivity penalty or alignment boost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedScore {
    pub score: f64,
    pub inactivity_secs: f64,
    /// Stillness has outlasted the grace period; advice selection uses this
    /// to override everything else with a "please move" prompt.
    pub inactive: bool,
    pub moving: bool,
}

/// Tracks whether the user is actually moving and bleeds the score away
/// when they stand still too long. Owns the last raw pose and the
/// last-motion timestamp; reset by constructing a new monitor per session.
pub struct MotionMonitor {
    last_pose: Option<PoseFrame>,
    last_motion: Instant,
    motion_threshold: f64,
    grace_secs: f64,
    penalty_rate: f64,
    boost_threshold: f64,
    boost_factor: f64,
}

impl MotionMonitor {
    pub fn new(config: &PipelineConfig, session_start: Instant) -> Self {
        Self {
            last_pose: None,
            last_motion: session_start,
            motion_threshold: config.motion_threshold,
            grace_secs: config.inactivity_grace_secs,
            penalty_rate: config.inactivity_penalty_rate,
            boost_threshold: config.boost_threshold,
            boost_factor: config.alignment_boost,
        }
    }

    /// Folds one frame into the motion state and adjusts the smoothed score.
    ///
    /// Past the grace period the penalty grows linearly and unboundedly with
    /// stillness, floored at zero: `max(0, s - rate * (d - grace) / 100)`.
    /// Otherwise an already-good score (>= boost threshold) is stretched by
    /// the boost factor and clamped to 1. Both formulas are tuned product
    /// behavior; keep them literal.
    pub fn update(&mut self, pose: &PoseFrame, smoothed: f64, now: Instant) -> AdjustedScore {
        let moving = match &self.last_pose {
            Some(last) => mean_displacement(pose, last) > self.motion_threshold,
            // First frame of the session never counts as motion.
            None => false,
        };
        if moving {
            self.last_motion = now;
        }

        let inactivity_secs = now.duration_since(self.last_motion).as_secs_f64();
        let inactive = inactivity_secs > self.grace_secs;

        let score = if inactive {
            (smoothed - self.penalty_rate * (inactivity_secs - self.grace_secs) / 100.0).max(0.0)
        } else if smoothed >= self.boost_threshold {
            (smoothed * self.boost_factor).min(1.0)
        } else {
            smoothed
        };

        self.last_pose = Some(pose.clone());

        AdjustedScore { score, inactivity_secs, inactive, moving }
    }
}

/// Mean absolute per-landmark (x, y) displacement between two frames.
fn mean_displacement(current: &PoseFrame, previous: &PoseFrame) -> f64 {
    if current.landmarks.is_empty() {
        return 0.0;
    }
    let total: f64 = current
        .landmarks
        .iter()
        .zip(&previous.landmarks)
        .map(|(c, p)| (c.x - p.x).abs() + (c.y - p.y).abs())
        .sum();
    total / current.landmarks.len() as f64
}
