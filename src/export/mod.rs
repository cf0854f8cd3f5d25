//! JSON export for analysis results

use crate::error::{BeatprepError, Result};
use crate::types::{OnsetResult, RhythmResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// JSON output schema version
const SCHEMA_VERSION: &str = "1.0";

/// Top-level JSON output structure
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisJson {
    /// Schema version for forward compatibility
    pub version: String,
    /// beatprep version that generated this file
    pub generator_version: String,
    /// Input file path
    pub path: String,
    /// Algorithm used for analysis
    pub algorithm: String,
    /// Rhythm analysis results (beat tracking algorithms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rhythm: Option<RhythmResult>,
    /// Onset detection results (onset algorithm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onsets: Option<OnsetResult>,
}

impl AnalysisJson {
    pub fn rhythm(path: &Path, algorithm: &str, result: RhythmResult) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            path: path.to_string_lossy().to_string(),
            algorithm: algorithm.to_string(),
            rhythm: Some(result),
            onsets: None,
        }
    }

    pub fn onsets(path: &Path, algorithm: &str, result: OnsetResult) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            path: path.to_string_lossy().to_string(),
            algorithm: algorithm.to_string(),
            rhythm: None,
            onsets: Some(result),
        }
    }
}

/// Write an analysis report to a JSON file
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
/// This prevents data corruption if the write is interrupted.
pub fn write_json(report: &AnalysisJson, output_path: &Path) -> Result<()> {
    // Write to temp file in same directory (ensures same filesystem for atomic rename)
    let temp_path = output_path.with_extension("json.tmp");

    let file = File::create(&temp_path).map_err(|e| BeatprepError::OutputError {
        path: output_path.to_path_buf(),
        reason: format!("Failed to create temp file: {}", e),
    })?;

    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(|e| {
        // Clean up temp file on error
        let _ = std::fs::remove_file(&temp_path);
        BeatprepError::OutputError {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    // Atomic rename: either succeeds completely or fails without modifying target
    std::fs::rename(&temp_path, output_path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        BeatprepError::OutputError {
            path: output_path.to_path_buf(),
            reason: format!("Failed to finalize file: {}", e),
        }
    })?;

    info!("Wrote analysis to {}", output_path.display());

    Ok(())
}

/// Print an analysis report as pretty JSON to stdout
pub fn write_stdout(report: &AnalysisJson) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(report).map_err(|e| BeatprepError::OutputError {
        path: "<stdout>".into(),
        reason: e.to_string(),
    })?;
    writeln!(handle, "{}", json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_reread() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("analysis.json");

        let result = RhythmResult {
            bpm: 128.0,
            confidence: 4.1,
            ticks: vec![0.5, 0.969, 1.438],
            bpm_estimates: vec![128.0, 127.9],
            bpm_intervals: vec![0.469, 0.469],
        };
        let report = AnalysisJson::rhythm(Path::new("track.wav"), "multifeature", result);

        write_json(&report, &out).unwrap();

        let reread: AnalysisJson =
            serde_json::from_reader(File::open(&out).unwrap()).unwrap();
        assert_eq!(reread.algorithm, "multifeature");
        let rhythm = reread.rhythm.unwrap();
        assert_eq!(rhythm.bpm, 128.0);
        assert_eq!(rhythm.ticks.len(), 3);
        assert!(reread.onsets.is_none());
        assert!(!out.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_onset_report_omits_rhythm() {
        let result = OnsetResult {
            onset_rate: 2.0,
            onsets: vec![0.25, 0.75],
        };
        let report = AnalysisJson::onsets(Path::new("track.wav"), "onset", result);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("onset_rate"));
        assert!(!json.contains("\"rhythm\""));
    }

    #[test]
    fn test_write_json_bad_directory() {
        let result = RhythmResult::default();
        let report = AnalysisJson::rhythm(Path::new("x.wav"), "degara", result);
        let err = write_json(&report, Path::new("/nonexistent/dir/out.json")).unwrap_err();
        assert!(matches!(err, BeatprepError::OutputError { .. }));
    }
}
