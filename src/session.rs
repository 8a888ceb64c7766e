// src/session.rs - exercise session lifecycle and the per-frame pipeline loop
use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{info, trace, warn};
use uuid::Uuid;

use crate::advice::{self, AdviceContext};
use crate::comparison::compare_poses;
use crate::config::PipelineConfig;
use crate::error::SessionError;
use crate::motion::MotionMonitor;
use crate::performance::{PerformanceReport, PerformanceTracker};
use crate::pose::PoseFrame;
use crate::smoothing::{FeedbackEntry, TemporalSmoother};

/// One stream of pose detections. Implementations wrap a detector plus its
/// capture device and release both on drop, so every exit path of the
/// session loop tears the stream down.
pub trait PoseSource: Send {
    /// Runs once before the first frame request. A failure here aborts
    /// session start; no pipeline state has been touched yet.
    fn initialize(&mut self) -> impl Future<Output = Result<(), SessionError>> + Send {
        async { Ok(()) }
    }

    /// Resolves with the next detection frame.
    fn next_frame(&mut self) -> impl Future<Output = Result<PoseFrame, SessionError>> + Send;
}

/// Per-frame output handed to the UI layer. The display score is a target
/// value; any animation/interpolation happens outside the core.
#[derive(Debug, Clone)]
pub struct FrameUpdate {
    pub display_score: f64,
    pub feedback: Vec<FeedbackEntry>,
    pub current_advice: &'static str,
}

/// Stop handle for a running session. Stopping is idempotent: repeated
/// calls, or calls after the session already finished, are no-ops.
#[derive(Debug)]
pub struct SessionController {
    stop: watch::Sender<bool>,
}

impl SessionController {
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }
}

/// Rolling frame-processing statistics for the session loop.
struct LoopMetrics {
    frame_times: VecDeque<f32>,
    avg_fps: f32,
    avg_processing_time: f32,
}

impl LoopMetrics {
    fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(30),
            avg_fps: 0.0,
            avg_processing_time: 0.0,
        }
    }

    fn record(&mut self, elapsed: Duration) {
        self.frame_times.push_front(elapsed.as_secs_f32());
        if self.frame_times.len() > 30 {
            self.frame_times.pop_back();
        }
        self.avg_processing_time =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        self.avg_fps = if self.avg_processing_time > 0.0 {
            1.0 / self.avg_processing_time
        } else {
            0.0
        };
    }
}

/// One exercise attempt: drives both pose streams through the scoring
/// pipeline and aggregates the session report.
///
/// Everything runs on one cooperative task: the user and guide streams are
/// interleaved by `select!`, so no state needs locking. The scorer always
/// reads the most recent guide frame; the two streams may tick at
/// independent cadences and staleness up to one guide interval is accepted.
pub struct ExerciseSession {
    id: Uuid,
    config: PipelineConfig,
    smoother: TemporalSmoother,
    last_reference: Option<PoseFrame>,
    updates: mpsc::Sender<FrameUpdate>,
    stop: watch::Receiver<bool>,
    metrics: LoopMetrics,
}

impl ExerciseSession {
    /// Creates a session plus its stop handle and the per-frame update
    /// stream consumed by the UI layer.
    pub fn start(config: PipelineConfig) -> (Self, SessionController, mpsc::Receiver<FrameUpdate>) {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (update_tx, update_rx) = mpsc::channel(64);

        let session = Self {
            id: Uuid::new_v4(),
            smoother: TemporalSmoother::new(&config),
            config,
            last_reference: None,
            updates: update_tx,
            stop: stop_rx,
            metrics: LoopMetrics::new(),
        };
        (session, SessionController { stop: stop_tx }, update_rx)
    }

    /// Runs the session until stopped or the camera stream ends, then
    /// returns the performance report.
    ///
    /// Both sources are initialized first; an init failure aborts before the
    /// motion monitor or tracker exist. A guide-stream error stops guide
    /// polling but keeps scoring against the last known guide pose; a
    /// camera-stream error ends the session gracefully with a report.
    pub async fn run<U, R>(mut self, mut user: U, mut reference: R) -> Result<PerformanceReport, SessionError>
    where
        U: PoseSource,
        R: PoseSource,
    {
        user.initialize().await?;
        reference.initialize().await?;

        let started = Instant::now();
        let mut monitor = MotionMonitor::new(&self.config, started.into_std());
        let mut tracker = PerformanceTracker::new(&self.config, started.into_std());
        let mut stop = self.stop.clone();
        let mut reference_alive = true;

        info!(session = %self.id, "exercise session started");

        loop {
            tokio::select! {
                // Only `true` is ever sent, and a dropped controller also
                // ends the session, so any wakeup here means stop.
                _ = stop.changed() => break,
                frame = reference.next_frame(), if reference_alive => match frame {
                    Ok(frame) => self.last_reference = Some(frame),
                    Err(err) => {
                        warn!(session = %self.id, error = %err, "guide stream lost, holding last known guide pose");
                        reference_alive = false;
                    }
                },
                frame = user.next_frame() => match frame {
                    Ok(frame) => {
                        let frame_started = Instant::now();
                        self.process_user_frame(&frame, &mut monitor, &mut tracker, frame_started.into_std());
                        self.metrics.record(frame_started.elapsed());
                        trace!(
                            session = %self.id,
                            fps = self.metrics.avg_fps,
                            processing = self.metrics.avg_processing_time,
                            "frame processed"
                        );
                    }
                    Err(err) => {
                        warn!(session = %self.id, error = %err, "camera stream lost, ending session");
                        break;
                    }
                },
            }
        }

        let report = tracker.generate_report(Instant::now().into_std());
        info!(
            session = %self.id,
            repetitions = report.total_repetitions,
            average = report.average_score,
            "exercise session finished"
        );
        Ok(report)
        // Sources drop here, releasing camera/detector handles on every
        // exit path.
    }

    fn process_user_frame(
        &mut self,
        frame: &PoseFrame,
        monitor: &mut MotionMonitor,
        tracker: &mut PerformanceTracker,
        now: std::time::Instant,
    ) {
        // Scoring needs both streams; skip until the first guide frame lands.
        let raw = match self.last_reference.as_ref() {
            Some(reference) => compare_poses(frame, reference, &self.config),
            None => return,
        };

        let smoothed = self.smoother.update(raw, now);
        let adjusted = monitor.update(frame, smoothed.score, now);
        tracker.update_metrics(adjusted.score, &smoothed.details, now);

        let (left_arm, right_arm) = match smoothed.details.arm_scores() {
            Some((left, right)) => (Some(left), Some(right)),
            None => (None, None),
        };
        let current_advice = advice::select_advice(&AdviceContext {
            adjusted_score: adjusted.score,
            left_arm,
            right_arm,
            inactive: adjusted.inactive,
        });

        let update = FrameUpdate {
            display_score: adjusted.score * 100.0,
            feedback: smoothed.feedback,
            current_advice,
        };
        // A consumer that stops draining loses updates rather than stalling
        // the frame loop.
        let _ = self.updates.try_send(update);
    }
}
