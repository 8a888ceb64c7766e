// src/config.rs
use std::time::Duration;

/// Tunable thresholds for the scoring pipeline. The numeric constants are
/// empirically tuned "feel" values carried over from the shipped product;
/// do not simplify the penalty/boost formulas they feed.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Per-arm tolerance band in degrees; beyond this the arm score floors at 0.
    pub angle_tolerance_degrees: f64,
    /// Minimum shoulder width in normalized image units before the subject
    /// is considered too far from the camera.
    pub min_shoulder_width: f64,
    /// Minimum wrist-to-shoulder vertical travel (normalized units) for the
    /// user to count as moving along the exercise path.
    pub min_movement: f64,
    /// Mean per-landmark displacement above which a frame counts as motion.
    pub motion_threshold: f64,
    /// Stillness allowed before the inactivity penalty starts.
    pub inactivity_grace_secs: f64,
    /// Penalty slope: points bled per 100 s of stillness past the grace period.
    pub inactivity_penalty_rate: f64,
    /// Smoothed score at or above which the alignment boost applies.
    pub boost_threshold: f64,
    pub alignment_boost: f64,
    /// Rolling window of raw scores behind the smoothed score.
    pub smoothing_window: usize,
    /// Smoother invocations within this interval return the cached result.
    pub score_debounce: Duration,
    /// Cadence at which adjusted scores are folded into session statistics.
    pub metrics_interval: Duration,
    pub stability_window: usize,
    /// Half-width of the plateau band, in display points (0-100 scale).
    pub stability_band: f64,
    /// Recorded scores considered by the consistency statistic.
    pub consistency_window: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            angle_tolerance_degrees: 30.0,
            min_shoulder_width: 0.1,
            min_movement: 0.1,
            motion_threshold: 0.01,
            inactivity_grace_secs: 2.0,
            inactivity_penalty_rate: 15.0,
            boost_threshold: 0.55,
            alignment_boost: 1.9,  // rewards near-correct form, clamped at 1.0
            smoothing_window: 3,
            score_debounce: Duration::from_millis(100),
            metrics_interval: Duration::from_millis(500),
            stability_window: 5,
            stability_band: 10.0,
            consistency_window: 10,
        }
    }
}
