// src/smoothing.rs - rolling-window score smoothing with debounce
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::advice;
use crate::comparison::{ScoreDetails, SimilarityResult};
use crate::config::PipelineConfig;

/// One entry of the scrolling feedback list shown next to the score bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeedbackEntry {
    pub message: &'static str,
    pub score: f64,
}

/// De-jittered score for one frame: `score` on the unit scale feeds the
/// monitor and tracker, `display` is the rounded percentage for the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedScore {
    pub score: f64,
    pub display: u32,
    pub feedback: Vec<FeedbackEntry>,
    pub details: ScoreDetails,
}

/// Owns the per-session score history and the debounce cache. One instance
/// per session; a fresh session gets a fresh smoother, nothing is shared
/// process-wide.
pub struct TemporalSmoother {
    history: VecDeque<f64>,
    window: usize,
    debounce: Duration,
    last_update: Option<Instant>,
    cached: Option<SmoothedScore>,
}

impl TemporalSmoother {
    pub fn new(config: &PipelineConfig) -> Self {
        // Pre-filled with zeros: the first real frames are averaged against
        // a silent history, so the score ramps in instead of jumping.
        let mut history = VecDeque::with_capacity(config.smoothing_window);
        history.extend(std::iter::repeat(0.0).take(config.smoothing_window));

        Self {
            history,
            window: config.smoothing_window,
            debounce: config.score_debounce,
            last_update: None,
            cached: None,
        }
    }

    /// Pushes one raw score and returns the mean over the window.
    ///
    /// Invocations within the debounce interval return the cached previous
    /// result unchanged; the raw score of a debounced call is dropped, which
    /// rate-limits both compute and visible score flicker when frames arrive
    /// faster than the detector cadence.
    pub fn update(&mut self, raw: SimilarityResult, now: Instant) -> SmoothedScore {
        if let (Some(last), Some(cached)) = (self.last_update, self.cached.as_ref()) {
            if now.duration_since(last) < self.debounce {
                return cached.clone();
            }
        }

        self.history.push_back(raw.score);
        while self.history.len() > self.window {
            self.history.pop_front();
        }

        let score = self.history.iter().sum::<f64>() / self.history.len() as f64;
        let result = SmoothedScore {
            score,
            display: (score * 100.0).round() as u32,
            feedback: vec![FeedbackEntry {
                message: advice::score_band_message(score),
                score,
            }],
            details: raw.details,
        };

        self.last_update = Some(now);
        self.cached = Some(result.clone());
        result
    }
}
