//! Onset rate extraction
//!
//! Single-shot, stateless: energy-flux novelty with threshold peak picking,
//! packaged as onset timestamps plus onsets-per-second. Matches the fail-soft
//! policy of the graph runner: anything degenerate (silence, short input)
//! yields an empty `OnsetResult`, never an error.

use crate::tracker::envelope::{self, HOP_SIZE};
use crate::types::{OnsetResult, SUPPORTED_SAMPLE_RATE};
use tracing::debug;

/// Peak threshold relative to the loudest flux value, in dB
const THRESHOLD_DB: f32 = -30.0;

const EPSILON: f32 = 1e-10;

/// Detect onsets and the overall onset rate over a mono 44.1 kHz buffer
pub fn extract(signal: &[f32]) -> OnsetResult {
    let novelty = envelope::energy_flux(signal);
    let peaks = pick_peaks(&novelty);

    if peaks.is_empty() {
        return OnsetResult::default();
    }

    let frame_secs = HOP_SIZE as f64 / SUPPORTED_SAMPLE_RATE;
    let onsets: Vec<f64> = peaks.iter().map(|&f| f as f64 * frame_secs).collect();

    let duration_secs = signal.len() as f64 / SUPPORTED_SAMPLE_RATE;
    let onset_rate = onsets.len() as f64 / duration_secs;

    debug!(
        "Detected {} onsets over {:.2}s ({:.2}/s)",
        onsets.len(),
        duration_secs,
        onset_rate
    );

    OnsetResult { onset_rate, onsets }
}

/// Frame indices of local novelty maxima above the relative threshold;
/// peaks in directly adjacent frames collapse to the first one
fn pick_peaks(novelty: &[f32]) -> Vec<usize> {
    if novelty.len() < 3 {
        return Vec::new();
    }

    let max_flux = novelty.iter().copied().fold(0.0f32, f32::max);
    if max_flux <= EPSILON {
        return Vec::new();
    }
    let threshold = max_flux * 10.0f32.powf(THRESHOLD_DB / 20.0);

    let mut peaks = Vec::new();
    for i in 1..novelty.len() - 1 {
        let flux = novelty[i];
        if flux > threshold && flux > novelty[i - 1] && flux >= novelty[i + 1] {
            // Collapse double-fires from overlapping frames
            if peaks.last().map_or(true, |&last: &usize| i > last + 1) {
                peaks.push(i);
            }
        }
    }
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::degara::tests::click_track;

    #[test]
    fn test_onset_rate_matches_click_density() {
        // 120 BPM is 2 clicks per second
        let result = extract(&click_track(120.0, 10.0));
        assert!(!result.onsets.is_empty());
        assert!(
            (result.onset_rate - 2.0).abs() < 0.5,
            "expected ~2 onsets/s, got {:.2}",
            result.onset_rate
        );
    }

    #[test]
    fn test_onsets_are_ascending_seconds() {
        let result = extract(&click_track(100.0, 6.0));
        for pair in result.onsets.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        if let Some(&last) = result.onsets.last() {
            assert!(last < 6.0);
        }
    }

    #[test]
    fn test_silence_yields_empty_result() {
        let result = extract(&vec![0.0f32; 44100 * 3]);
        assert_eq!(result, OnsetResult::default());
    }

    #[test]
    fn test_short_signal_yields_empty_result() {
        let result = extract(&vec![0.5f32; 256]);
        assert_eq!(result, OnsetResult::default());
    }

    #[test]
    fn test_extract_is_deterministic() {
        let signal = click_track(90.0, 5.0);
        assert_eq!(extract(&signal), extract(&signal));
    }
}
