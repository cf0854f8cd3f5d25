//! Core data types for beatprep
//!
//! These types represent the domain model and flow through the analysis graph.

use crate::error::{BeatprepError, Result};
use serde::{Deserialize, Serialize};

/// The only sample rate the beat trackers support.
///
/// Detector frame sizes and envelope hop sizes are tuned for 44.1 kHz; any
/// other rate is rejected at the API boundary before a graph is constructed.
pub const SUPPORTED_SAMPLE_RATE: f64 = 44100.0;

// =============================================================================
// Detector configuration
// =============================================================================

/// Which beat-tracking strategy to run
///
/// `MultiFeature` additionally produces a tracking-confidence score;
/// `Degara` does not (the output simply does not exist for that variant,
/// which is why confidence is an `Option` on the tracker seam).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// Multi-envelope tracking with mutual-agreement confidence (default)
    #[default]
    MultiFeature,
    /// Single-envelope tracking, no confidence output
    Degara,
}

impl DetectionMethod {
    /// Whether this variant produces a confidence output
    pub fn has_confidence(self) -> bool {
        matches!(self, DetectionMethod::MultiFeature)
    }

    /// Name used in logs and the CLI
    pub fn name(self) -> &'static str {
        match self {
            DetectionMethod::MultiFeature => "multifeature",
            DetectionMethod::Degara => "degara",
        }
    }
}

/// Tempo search bounds in BPM, passed by value into the detector configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoRange {
    /// Minimum tempo in BPM
    pub min_bpm: f64,
    /// Maximum tempo in BPM
    pub max_bpm: f64,
}

impl TempoRange {
    /// Create a validated tempo range
    ///
    /// # Errors
    ///
    /// Returns `InvalidTempoRange` unless `0 < min < max`.
    pub fn new(min_bpm: f64, max_bpm: f64) -> Result<Self> {
        if !(min_bpm > 0.0 && max_bpm > min_bpm && max_bpm.is_finite()) {
            return Err(BeatprepError::InvalidTempoRange {
                min: min_bpm,
                max: max_bpm,
            });
        }
        Ok(Self { min_bpm, max_bpm })
    }
}

impl Default for TempoRange {
    /// The plausible human-perceptible range used by the reference extractor
    fn default() -> Self {
        Self {
            min_bpm: 40.0,
            max_bpm: 208.0,
        }
    }
}

// =============================================================================
// Analysis results
// =============================================================================

/// Result of the beat-tracking path: reconciled tempo plus supporting evidence
///
/// Shape is fixed regardless of success: a degenerate analysis yields
/// `bpm == 0.0`, `confidence == 0.0`, and empty sequences, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RhythmResult {
    /// Consensus tempo in BPM (0.0 when fewer than 2 ticks were found)
    pub bpm: f64,
    /// Tracking confidence, ~0..=5.32 for MultiFeature, always 0.0 for Degara
    pub confidence: f64,
    /// Beat timestamps in seconds
    pub ticks: Vec<f64>,
    /// Per-interval instantaneous BPM estimates; raw for the simple-mean
    /// policy, tolerance-filtered inliers for the histogram policy
    pub bpm_estimates: Vec<f64>,
    /// Raw inter-beat periods in seconds (always `len(ticks) - 1` entries
    /// when more than one tick exists)
    pub bpm_intervals: Vec<f64>,
}

/// Result of the onset-detection path, independent of `RhythmResult`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OnsetResult {
    /// Onsets per second over the analyzed buffer (0.0 when none were found)
    pub onset_rate: f64,
    /// Onset timestamps in seconds, ascending
    pub onsets: Vec<f64>,
}
