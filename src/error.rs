//! Unified error types for beatprep
//!
//! Error strategy:
//! - Boundary errors (bad sample rate, empty buffer, degenerate tempo range,
//!   undecodable file): hard failures, returned to the caller immediately.
//! - Analysis failures (tracker produced nothing, internal numerical trouble):
//!   never surface as errors. They are absorbed at the graph-runner and
//!   onset-extractor boundaries and degrade to well-formed zero/empty results,
//!   so one degenerate buffer cannot abort a batch of many calls.

use std::path::PathBuf;
use thiserror::Error;

/// Audio formats the file-based entry points can decode
pub const SUPPORTED_FORMATS: &str = "MP3, WAV, FLAC, AIFF";

/// Top-level error type for beatprep operations
#[derive(Debug, Error)]
pub enum BeatprepError {
    // =========================================================================
    // Boundary validation - the only hard failures on the in-memory paths
    // =========================================================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid tempo range [{min:.1}, {max:.1}]: must be a positive, non-degenerate interval")]
    InvalidTempoRange { min: f64, max: f64 },

    // =========================================================================
    // Internal analysis failures - absorbed at the graph runner / onset
    // extractor boundary, never returned from the public entry points
    // =========================================================================
    #[error("Analysis failed: {0}")]
    AnalysisError(String),

    // =========================================================================
    // File-based entry points
    // =========================================================================
    #[error("Failed to decode audio file '{path}': {reason}\n  Supported formats: {SUPPORTED_FORMATS}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("File not found: '{0}'\n  Tip: Check the path exists and is accessible")]
    FileNotFound(PathBuf),

    // =========================================================================
    // CLI output
    // =========================================================================
    #[error("Cannot write output to '{path}': {reason}")]
    OutputError { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for beatprep operations
pub type Result<T> = std::result::Result<T, BeatprepError>;

impl BeatprepError {
    /// Create a decode error with context about the issue
    pub fn decode_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        BeatprepError::DecodeError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Boundary check: the trackers are tuned for exactly 44.1 kHz input
    pub fn unsupported_sample_rate(got: f64) -> Self {
        BeatprepError::InvalidInput(format!("Expected sample_rate=44100.0, got {:.1}", got))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rate_error_names_expected_rate() {
        let err = BeatprepError::unsupported_sample_rate(48000.0);
        let msg = err.to_string();
        assert!(msg.contains("44100"), "message should name 44100: {}", msg);
        assert!(msg.contains("48000"), "message should name the bad rate: {}", msg);
    }

    #[test]
    fn test_tempo_range_error_display() {
        let err = BeatprepError::InvalidTempoRange {
            min: 208.0,
            max: 40.0,
        };
        assert!(err.to_string().contains("non-degenerate"));
    }
}
