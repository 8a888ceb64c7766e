// src/main.rs - demo driver: scores a simulated exercise session end to end
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use pose_coach::export::SessionExporter;
use pose_coach::session::ExerciseSession;
use pose_coach::simulation::SimulatedPoseSource;
use pose_coach::PipelineConfig;

const SESSION_SECS: u64 = 20;
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Pose Coach demo session ===");
    println!("Scoring a simulated patient against a simulated guide video");
    println!("for {SESSION_SECS}s at ~30fps.\n");

    let guide = SimulatedPoseSource::guide(FRAME_INTERVAL);
    // Phase lag so the score is good but not perfect.
    let patient = SimulatedPoseSource::follower(FRAME_INTERVAL, 0.5);

    let (session, controller, mut updates) = ExerciseSession::start(PipelineConfig::default());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(SESSION_SECS)).await;
        controller.stop();
    });

    let printer = tokio::spawn(async move {
        let mut frame = 0u64;
        while let Some(update) = updates.recv().await {
            frame += 1;
            if frame % 30 == 0 {
                println!(
                    "score {:5.1}%  advice: {}",
                    update.display_score, update.current_advice
                );
            }
        }
    });

    let report = session.run(patient, guide).await?;
    // The update channel closed with the session; the printer drains and ends.
    printer.await?;

    println!("\n=== Session report ===");
    println!("{}", serde_json::to_string_pretty(&report)?);

    let exporter = SessionExporter::new(SessionExporter::default_output_dir(), None);
    let json_path = exporter.export_report(&report)?;
    let csv_path = exporter.export_csv(&report)?;
    info!(report = %json_path.display(), scores = %csv_path.display(), "session artifacts written");

    Ok(())
}
