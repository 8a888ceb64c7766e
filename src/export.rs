// src/export.rs - session artifacts for the results/persistence layer
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;

use crate::performance::PerformanceReport;

/// Writes one session's artifacts into a timestamped directory:
/// `report.json` with the full performance report and `scores.csv` with the
/// performance-over-time series.
pub struct SessionExporter {
    output_dir: PathBuf,
    session_name: String,
}

impl SessionExporter {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name
            .unwrap_or_else(|| format!("session_{}", Local::now().format("%Y%m%d_%H%M%S")));

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
        }
    }

    pub fn default_output_dir() -> PathBuf {
        directories::UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(|p| p.join("PoseCoach")))
            .unwrap_or_else(|| PathBuf::from("./output"))
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    pub fn export_report(&self, report: &PerformanceReport) -> Result<PathBuf> {
        let path = self.session_dir().join("report.json");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating session directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        Ok(path)
    }

    pub fn export_csv(&self, report: &PerformanceReport) -> Result<PathBuf> {
        let path = self.session_dir().join("scores.csv");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating session directory {}", parent.display()))?;
        }

        let file = File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut writer = Writer::from_writer(file);
        for sample in &report.performance_over_time {
            writer.serialize(sample)?;
        }
        writer.flush()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::{AreaSummary, ScoreSample};

    fn sample_report() -> PerformanceReport {
        PerformanceReport {
            average_score: 72.5,
            duration: "1:40".to_string(),
            total_repetitions: 4,
            peak_performance: 95.0,
            consistency_score: 88.0,
            improvement_rate: 12,
            performance_over_time: vec![
                ScoreSample { elapsed_secs: 2.5, score: 60.0 },
                ScoreSample { elapsed_secs: 5.0, score: 85.0 },
            ],
            areas: AreaSummary::default(),
        }
    }

    #[test]
    fn writes_report_and_csv_into_the_session_dir() {
        let dir = std::env::temp_dir().join(format!("pose_coach_export_{}", std::process::id()));
        let exporter = SessionExporter::new(&dir, Some("unit_test".into()));

        let report = sample_report();
        let json_path = exporter.export_report(&report).unwrap();
        let csv_path = exporter.export_csv(&report).unwrap();

        let json = std::fs::read_to_string(json_path).unwrap();
        assert!(json.contains("\"average_score\": 72.5"));
        assert!(json.contains("\"total_repetitions\": 4"));

        let csv = std::fs::read_to_string(csv_path).unwrap();
        assert!(csv.lines().next().unwrap().contains("elapsed_secs"));
        assert_eq!(csv.lines().count(), 3);

        std::fs::remove_dir_all(dir).ok();
    }
}
