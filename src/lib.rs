//! beatprep - Beat tracking and tempo analysis for audio files
//!
//! Detects beat positions in mono 44.1 kHz audio, reconciles the inter-beat
//! intervals into a single tempo value, and extracts note-onset times. Two
//! tempo policies are available: a simple mean over all instantaneous
//! estimates, and an octave-aware histogram consensus that is robust to
//! spurious beats.
//!
//! # Architecture
//!
//! - `config`: CLI argument parsing and runtime settings
//! - `audio`: Audio decoding using symphonia (mono, resampled to 44.1 kHz)
//! - `graph`: Source -> tracker -> pool execution with fail-soft harvesting
//! - `tracker`: Beat-tracking strategies behind a common trait
//! - `consensus`: Tempo estimation from tick sequences
//! - `onset`: Onset detection and onset-rate measurement
//! - `metronome`: Audible click-track rendering for auditing results
//! - `export`: JSON output
//!
//! # Example
//!
//! ```no_run
//! use beatprep::types::TempoRange;
//!
//! let samples = vec![0.0f32; 44100 * 10];
//! let result = beatprep::estimate_tempo_multifeature(
//!     &samples,
//!     44100.0,
//!     TempoRange::default(),
//! ).expect("Analysis failed");
//! println!("{:.1} BPM ({} beats)", result.bpm, result.ticks.len());
//! ```

pub mod audio;
pub mod config;
pub mod consensus;
pub mod error;
pub mod export;
pub mod graph;
pub mod metronome;
pub mod onset;
pub mod tracker;
pub mod types;

// Re-export key types at crate root
pub use error::{BeatprepError, Result};
pub use types::{DetectionMethod, OnsetResult, RhythmResult, TempoRange};

use graph::source::SignalSource;
use std::path::Path;
use tracing::info;

/// Validate an input buffer before constructing an analysis graph
///
/// Input shape errors are the caller's fault and fail hard; anything that
/// goes wrong past this point degrades to an empty result instead.
fn validate_input(samples: &[f32], sample_rate: f64) -> Result<()> {
    if samples.is_empty() {
        return Err(BeatprepError::InvalidInput(
            "Audio buffer is empty".to_string(),
        ));
    }
    if sample_rate != types::SUPPORTED_SAMPLE_RATE {
        return Err(BeatprepError::unsupported_sample_rate(sample_rate));
    }
    Ok(())
}

/// Track beats with the multi-feature tracker and average all instantaneous
/// tempo estimates into the final BPM
///
/// The estimate list in the result is raw and unfiltered. Requires mono
/// audio at exactly 44.1 kHz.
///
/// # Errors
///
/// `InvalidInput` for an empty buffer or any sample rate other than 44100.0.
/// Analysis problems never surface as errors; they yield an empty result.
pub fn estimate_tempo_multifeature(
    samples: &[f32],
    sample_rate: f64,
    range: TempoRange,
) -> Result<RhythmResult> {
    validate_input(samples, sample_rate)?;

    let tracker = tracker::create(DetectionMethod::MultiFeature, range);
    let outcome = graph::run(SignalSource::new(samples.to_vec()), tracker.as_ref());
    let consensus = consensus::estimate_mean(&outcome.ticks);

    info!(
        "multifeature: {:.2} BPM, {} ticks, confidence {:.3}",
        consensus.bpm,
        outcome.ticks.len(),
        outcome.confidence
    );

    Ok(RhythmResult {
        bpm: consensus.bpm,
        confidence: outcome.confidence,
        ticks: outcome.ticks,
        bpm_estimates: consensus.estimates,
        bpm_intervals: consensus.intervals,
    })
}

/// Track beats with a selectable method and reconcile tempo via the
/// octave-aware histogram consensus
///
/// `Degara` produces no confidence output, so the result's confidence is
/// 0.0 for that method. The estimate list in the result holds only the
/// inliers that agreed with the histogram mode. Requires mono audio at
/// exactly 44.1 kHz.
///
/// # Errors
///
/// `InvalidInput` for an empty buffer or any sample rate other than 44100.0.
pub fn estimate_tempo_rhythm_extractor(
    samples: &[f32],
    sample_rate: f64,
    range: TempoRange,
    method: DetectionMethod,
) -> Result<RhythmResult> {
    validate_input(samples, sample_rate)?;

    let tracker = tracker::create(method, range);
    let outcome = graph::run(SignalSource::new(samples.to_vec()), tracker.as_ref());
    let consensus = consensus::estimate_histogram(&outcome.ticks);

    info!(
        "rhythm2013 ({}): {:.2} BPM, {} ticks",
        method.name(),
        consensus.bpm,
        outcome.ticks.len()
    );

    Ok(RhythmResult {
        bpm: consensus.bpm,
        confidence: outcome.confidence,
        ticks: outcome.ticks,
        bpm_estimates: consensus.estimates,
        bpm_intervals: consensus.intervals,
    })
}

/// Detect note onsets and the overall onset rate
///
/// Requires mono audio at exactly 44.1 kHz.
///
/// # Errors
///
/// `InvalidInput` for an empty buffer or any sample rate other than 44100.0.
pub fn detect_onsets(samples: &[f32], sample_rate: f64) -> Result<OnsetResult> {
    validate_input(samples, sample_rate)?;
    Ok(onset::extract(samples))
}

/// Decode an audio file and run [`estimate_tempo_multifeature`] on it
pub fn estimate_tempo_multifeature_from_file(
    path: &Path,
    range: TempoRange,
) -> Result<RhythmResult> {
    let samples = audio::decode(path)?;
    estimate_tempo_multifeature(&samples, types::SUPPORTED_SAMPLE_RATE, range)
}

/// Decode an audio file and run [`estimate_tempo_rhythm_extractor`] on it
pub fn estimate_tempo_rhythm_extractor_from_file(
    path: &Path,
    range: TempoRange,
    method: DetectionMethod,
) -> Result<RhythmResult> {
    let samples = audio::decode(path)?;
    estimate_tempo_rhythm_extractor(&samples, types::SUPPORTED_SAMPLE_RATE, range, method)
}

/// Decode an audio file and run [`detect_onsets`] on it
pub fn detect_onsets_from_file(path: &Path) -> Result<OnsetResult> {
    let samples = audio::decode(path)?;
    detect_onsets(&samples, types::SUPPORTED_SAMPLE_RATE)
}
