//! Multi-envelope beat tracker with mutual-agreement confidence
//!
//! Runs the grid tracking over several onset-strength envelopes (energy
//! flux, spectral flux, high-frequency content), then keeps the candidate
//! tick sequence that agrees best with the others. The mean pairwise
//! agreement of the winner scales to the reported confidence, making
//! unanimous features score high and a lone dissenting feature score low.

use crate::error::Result;
use crate::tracker::degara::track_envelope;
use crate::tracker::{envelope, BeatTracker, TrackerOutput};
use crate::types::TempoRange;
use tracing::debug;

/// Upper bound of the confidence scale, matching the reference extractor's
/// observed 0..=5.32 range for this method
pub const MAX_CONFIDENCE: f64 = 5.32;

/// Two ticks closer than this (seconds) count as the same beat when scoring
/// agreement between candidate sequences
const AGREEMENT_TOLERANCE_SECS: f64 = 0.07;

/// Beat tracker combining several novelty features
#[derive(Debug, Clone)]
pub struct MultiFeatureTracker {
    range: TempoRange,
}

impl MultiFeatureTracker {
    /// Create a tracker bound to the given tempo search range
    pub fn new(range: TempoRange) -> Self {
        Self { range }
    }
}

impl BeatTracker for MultiFeatureTracker {
    fn track(&self, signal: &[f32]) -> Result<TrackerOutput> {
        let magnitudes = envelope::magnitude_frames(signal);

        let candidates = [
            track_envelope(&envelope::energy_flux(signal), self.range),
            track_envelope(&envelope::spectral_flux(&magnitudes), self.range),
            track_envelope(&envelope::hfc_flux(&magnitudes), self.range),
        ];

        let Some((winner, agreement)) = pick_by_agreement(&candidates) else {
            debug!("multifeature: no feature produced ticks");
            return Ok(TrackerOutput {
                ticks: Vec::new(),
                confidence: Some(0.0),
            });
        };

        let confidence = MAX_CONFIDENCE * agreement;
        debug!(
            "multifeature: {} ticks, agreement {:.3}, confidence {:.2}",
            candidates[winner].len(),
            agreement,
            confidence
        );

        Ok(TrackerOutput {
            ticks: candidates[winner].clone(),
            confidence: Some(confidence),
        })
    }

    fn name(&self) -> &'static str {
        "multifeature"
    }
}

/// Index of the candidate with the highest mean pairwise agreement, plus
/// that agreement in [0, 1]; `None` when every candidate is empty
fn pick_by_agreement(candidates: &[Vec<f64>]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for (i, ticks) in candidates.iter().enumerate() {
        if ticks.is_empty() {
            continue;
        }
        let others: Vec<&Vec<f64>> = candidates
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, t)| t)
            .collect();
        let mean = if others.is_empty() {
            1.0
        } else {
            others.iter().map(|o| agreement(ticks, o)).sum::<f64>() / others.len() as f64
        };
        if best.map_or(true, |(_, b)| mean > b) {
            best = Some((i, mean));
        }
    }

    best
}

/// Fraction of ticks in `a` that have a counterpart in `b` within tolerance
///
/// Both sequences are non-decreasing, so a single merge-style pass suffices.
fn agreement(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let mut matched = 0usize;
    let mut j = 0usize;
    for &tick in a {
        while j + 1 < b.len() && b[j + 1] <= tick {
            j += 1;
        }
        let nearest = if j + 1 < b.len() && (b[j + 1] - tick).abs() < (b[j] - tick).abs() {
            b[j + 1]
        } else {
            b[j]
        };
        if (nearest - tick).abs() < AGREEMENT_TOLERANCE_SECS {
            matched += 1;
        }
    }
    matched as f64 / a.len() as f64
}
