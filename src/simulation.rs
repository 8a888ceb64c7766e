// src/simulation.rs - deterministic pose sources for demos and tests
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::SessionError;
use crate::pose::{landmark, Keypoint, PoseFrame};
use crate::session::PoseSource;

/// Synthetic detector: full 33-landmark frames with a sinusoidal arm raise
/// plus a whole-body sway. The sway is a pure camera-space translation, so
/// it feeds the motion detector without disturbing the normalized pose.
pub struct SimulatedPoseSource {
    t: f64,
    time_step: f64,
    frame_interval: Duration,
    phase: f64,
    swing_amplitude: f64,
    frozen: Arc<AtomicBool>,
}

impl SimulatedPoseSource {
    /// Guide-video stream: the reference waveform, phase zero.
    pub fn guide(frame_interval: Duration) -> Self {
        Self::with_phase(frame_interval, 0.0)
    }

    /// Camera stream following the guide, lagging by `phase` radians. Phase
    /// zero reproduces the guide exactly; larger phases degrade alignment.
    pub fn follower(frame_interval: Duration, phase: f64) -> Self {
        Self::with_phase(frame_interval, phase)
    }

    fn with_phase(frame_interval: Duration, phase: f64) -> Self {
        Self {
            t: 0.0,
            time_step: 0.033,
            frame_interval,
            phase,
            swing_amplitude: 0.87, // radians of forearm swing either side of vertical
            frozen: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle that freezes the stream mid-session: frames keep arriving at
    /// the same cadence but stop changing, like a user standing still.
    pub fn freeze_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.frozen)
    }

    fn frame(&self) -> PoseFrame {
        let t = self.t;
        let sway_x = 0.15 * (5.0 * t).sin();
        let sway_y = 0.15 * (4.3 * t + 1.0).sin();

        // Forearms rotate about fixed elbows, sweeping between raised-out
        // and raised-in; both arms mirror each other.
        let forearm = 0.18;
        let swing = std::f64::consts::FRAC_PI_2
            + self.swing_amplitude * (0.8 * t + self.phase).sin();
        let wrist_dx = forearm * swing.cos();
        let wrist_dy = forearm * swing.sin();

        let mut landmarks = vec![Keypoint::new(0.5, 0.85, 0.0, 0.8); landmark::COUNT];
        landmarks[landmark::LEFT_SHOULDER] = Keypoint::new(0.6, 0.5, 0.0, 0.95);
        landmarks[landmark::RIGHT_SHOULDER] = Keypoint::new(0.4, 0.5, 0.0, 0.95);
        landmarks[landmark::LEFT_ELBOW] = Keypoint::new(0.72, 0.4, 0.0, 0.9);
        landmarks[landmark::RIGHT_ELBOW] = Keypoint::new(0.28, 0.4, 0.0, 0.9);
        landmarks[landmark::LEFT_WRIST] =
            Keypoint::new(0.72 + wrist_dx, 0.4 - wrist_dy, 0.0, 0.85);
        landmarks[landmark::RIGHT_WRIST] =
            Keypoint::new(0.28 - wrist_dx, 0.4 - wrist_dy, 0.0, 0.85);
        landmarks[landmark::LEFT_HIP] = Keypoint::new(0.58, 0.85, 0.0, 0.9);
        landmarks[landmark::RIGHT_HIP] = Keypoint::new(0.42, 0.85, 0.0, 0.9);

        for point in &mut landmarks {
            point.x += sway_x;
            point.y += sway_y;
        }

        PoseFrame::new(landmarks)
    }
}

impl PoseSource for SimulatedPoseSource {
    async fn next_frame(&mut self) -> Result<PoseFrame, SessionError> {
        tokio::time::sleep(self.frame_interval).await;
        if !self.frozen.load(Ordering::Relaxed) {
            self.t += self.time_step;
        }
        Ok(self.frame())
    }
}
