// src/performance.rs - session aggregation and the final performance report
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::comparison::ScoreDetails;
use crate::config::PipelineConfig;

/// One recorded session score (0-100) with its offset from session start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSample {
    pub elapsed_secs: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreaStat {
    pub score: f64,
    pub message: String,
}

impl AreaStat {
    fn from_score(score: f64) -> Self {
        Self { score, message: area_message(score).to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreaSummary {
    pub left_arm: AreaStat,
    pub right_arm: AreaStat,
}

/// End-of-session summary handed to the results/persistence collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub average_score: f64,
    pub duration: String,
    pub total_repetitions: u32,
    pub peak_performance: f64,
    pub consistency_score: f64,
    pub improvement_rate: i64,
    pub performance_over_time: Vec<ScoreSample>,
    pub areas: AreaSummary,
}

pub fn area_message(score: f64) -> &'static str {
    if score >= 80.0 {
        "Rất tốt, duy trì phong độ"
    } else if score >= 60.0 {
        "Tốt, cần giữ ổn định hơn"
    } else {
        "Cần cải thiện độ chính xác"
    }
}

/// Accumulates adjusted scores over one exercise session.
///
/// Frame-rate independent: incoming scores are buffered and folded into a
/// bucket every `metrics_interval`; five buckets form one recorded score
/// plus one plateau-stability check. Repetition counting is a plateau
/// heuristic (window 5, band 10 points), approximate and tunable, not true
/// repetition detection.
pub struct PerformanceTracker {
    start: Instant,
    scores: Vec<ScoreSample>,
    peak_score: f64,
    consistency: f64,
    total_repetitions: u32,
    frame_buffer: Vec<f64>,
    last_bucket_flush: Instant,
    metrics_interval: Duration,
    stability_buffer: Vec<f64>,
    stability_window: usize,
    stability_band: f64,
    last_stable_score: f64,
    repetition_counted: bool,
    consistency_window: usize,
    last_arm_scores: Option<(f64, f64)>,
    areas: AreaSummary,
}

impl PerformanceTracker {
    pub fn new(config: &PipelineConfig, session_start: Instant) -> Self {
        Self {
            start: session_start,
            scores: Vec::new(),
            peak_score: 0.0,
            consistency: 0.0,
            total_repetitions: 0,
            frame_buffer: Vec::new(),
            last_bucket_flush: session_start,
            metrics_interval: config.metrics_interval,
            stability_buffer: Vec::with_capacity(config.stability_window),
            stability_window: config.stability_window,
            stability_band: config.stability_band,
            last_stable_score: 0.0,
            repetition_counted: false,
            consistency_window: config.consistency_window,
            last_arm_scores: None,
            areas: AreaSummary::default(),
        }
    }

    /// Feeds one adjusted score (unit scale) plus the frame's per-limb
    /// details into the session statistics.
    pub fn update_metrics(&mut self, adjusted: f64, details: &ScoreDetails, now: Instant) {
        if let Some(arms) = details.arm_scores() {
            self.last_arm_scores = Some(arms);
        }

        self.frame_buffer.push(adjusted);
        if now.duration_since(self.last_bucket_flush) < self.metrics_interval {
            return;
        }

        let bucket =
            self.frame_buffer.iter().sum::<f64>() / self.frame_buffer.len() as f64 * 100.0;
        self.frame_buffer.clear();
        self.last_bucket_flush = now;

        self.stability_buffer.push(bucket);
        if self.stability_buffer.len() < self.stability_window {
            return;
        }

        let mean =
            self.stability_buffer.iter().sum::<f64>() / self.stability_buffer.len() as f64;
        let stable = self
            .stability_buffer
            .iter()
            .all(|score| (score - mean).abs() < self.stability_band);

        if stable {
            // One repetition per plateau: the latch holds while the score
            // stays flat and re-arms once it leaves the band.
            if !self.repetition_counted {
                self.total_repetitions += 1;
                self.repetition_counted = true;
            }
            self.last_stable_score = mean;
        } else {
            self.repetition_counted = false;
        }

        self.record_score(mean, now);
        self.stability_buffer.clear();
    }

    fn record_score(&mut self, score: f64, now: Instant) {
        self.scores.push(ScoreSample {
            elapsed_secs: now.duration_since(self.start).as_secs_f64(),
            score,
        });

        if score > self.peak_score {
            self.peak_score = score;
        }

        let recent_start = self.scores.len().saturating_sub(self.consistency_window);
        let recent = &self.scores[recent_start..];
        let mean = recent.iter().map(|s| s.score).sum::<f64>() / recent.len() as f64;
        let variance =
            recent.iter().map(|s| (s.score - mean).powi(2)).sum::<f64>() / recent.len() as f64;
        self.consistency = (100.0 - variance.sqrt()).max(0.0);

        if let Some((left, right)) = self.last_arm_scores {
            self.areas = AreaSummary {
                left_arm: AreaStat::from_score(left * 100.0),
                right_arm: AreaStat::from_score(right * 100.0),
            };
        }
    }

    /// First-third vs last-third trend of the recorded scores, as a rounded
    /// percentage of the starting level. Zero when the session is too young
    /// to have a trend.
    fn improvement_rate(&self) -> i64 {
        if self.scores.len() < 2 {
            return 0;
        }
        let window = (self.scores.len() / 3).clamp(1, 3);
        let first: f64 =
            self.scores[..window].iter().map(|s| s.score).sum::<f64>() / window as f64;
        let last: f64 = self.scores[self.scores.len() - window..]
            .iter()
            .map(|s| s.score)
            .sum::<f64>()
            / window as f64;
        if first == 0.0 {
            return 0;
        }
        ((last - first) / first * 100.0).round() as i64
    }

    pub fn total_repetitions(&self) -> u32 {
        self.total_repetitions
    }

    /// Finalizes the session. Never fails: a session that recorded nothing
    /// reports zeros and an empty time series.
    pub fn generate_report(&self, now: Instant) -> PerformanceReport {
        let average_score = if self.scores.is_empty() {
            0.0
        } else {
            self.scores.iter().map(|s| s.score).sum::<f64>() / self.scores.len() as f64
        };

        PerformanceReport {
            average_score,
            duration: format_duration(now.duration_since(self.start)),
            total_repetitions: self.total_repetitions,
            peak_performance: self.peak_score,
            consistency_score: self.consistency,
            improvement_rate: self.improvement_rate(),
            performance_over_time: self.scores.clone(),
            areas: self.areas.clone(),
        }
    }
}

fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
