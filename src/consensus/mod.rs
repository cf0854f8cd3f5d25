//! BPM consensus estimation from beat-tick timestamps
//!
//! Two policies convert a tick sequence into a final tempo value:
//!
//! - [`estimate_mean`]: instantaneous BPM per consecutive tick pair, final
//!   tempo = arithmetic mean of all of them.
//! - [`estimate_histogram`]: octave-aware consensus. Beat trackers flip-flop
//!   between a tempo and its double/half, so the raw estimates are halved to
//!   fold both octaves into one histogram bin range, the most-voted integer
//!   bin is doubled back to the true octave, and only the raw estimates
//!   within [`PERIOD_TOLERANCE`] of that mode are averaged. The histogram
//!   mode is robust to outliers but coarse; averaging the inliers recovers
//!   sub-bin precision.
//!
//! Input ticks are assumed non-decreasing (the trackers produce them that
//! way); intervals are computed as-is without re-sorting. Non-finite,
//! negative, or absurdly large halved estimates are skipped by the
//! histogram vote so a pathological tick pair cannot poison the mode, but
//! they still appear in the raw interval/estimate lists.

use tracing::debug;

/// Maximum allowed deviation (BPM) between an individual estimate and the
/// histogram mode for that estimate to count as an inlier. The comparison is
/// strict (`< 5.0`), matching the reference extractor.
pub const PERIOD_TOLERANCE: f64 = 5.0;

/// Highest histogram bin a halved estimate may vote into. Any real tempo
/// sits far below this; a vote above it comes from a near-zero inter-beat
/// interval and is skipped like the non-finite ones, keeping the histogram
/// allocation bounded.
const MAX_BIN: usize = 10_000;

/// Consensus output: final tempo plus the evidence behind it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TempoConsensus {
    /// Final BPM; 0.0 when fewer than 2 ticks exist
    pub bpm: f64,
    /// Per-interval BPM estimates. Raw for [`estimate_mean`],
    /// tolerance-filtered inliers for [`estimate_histogram`].
    pub estimates: Vec<f64>,
    /// Raw inter-beat periods in seconds, one per consecutive tick pair
    pub intervals: Vec<f64>,
}

/// Inter-beat periods and their instantaneous tempos
///
/// Returns `(intervals, estimates)` with `estimates[i] == 60.0 / intervals[i]`
/// and `len == ticks.len() - 1` (both empty for 0 or 1 ticks).
fn intervals_and_estimates(ticks: &[f64]) -> (Vec<f64>, Vec<f64>) {
    if ticks.len() <= 1 {
        return (Vec::new(), Vec::new());
    }
    let intervals: Vec<f64> = ticks.windows(2).map(|w| w[1] - w[0]).collect();
    let estimates: Vec<f64> = intervals.iter().map(|&p| 60.0 / p).collect();
    (intervals, estimates)
}

/// Simple-mean tempo policy
///
/// Final BPM is the arithmetic mean of every instantaneous estimate. The
/// returned estimate list is the raw, unfiltered one.
pub fn estimate_mean(ticks: &[f64]) -> TempoConsensus {
    let (intervals, estimates) = intervals_and_estimates(ticks);
    if estimates.is_empty() {
        return TempoConsensus::default();
    }

    let bpm = estimates.iter().sum::<f64>() / estimates.len() as f64;
    debug!("Mean consensus: {:.2} BPM from {} intervals", bpm, intervals.len());

    TempoConsensus {
        bpm,
        estimates,
        intervals,
    }
}

/// Octave-aware histogram tempo policy
///
/// Halves every estimate, votes into integer-BPM bins, doubles the winning
/// bin back to the true octave, then averages the raw estimates that land
/// strictly within [`PERIOD_TOLERANCE`] of it. If none do (severe tempo
/// instability or a binning edge case) the bin value itself is the answer.
pub fn estimate_histogram(ticks: &[f64]) -> TempoConsensus {
    let (intervals, mut raw) = intervals_and_estimates(ticks);
    if raw.is_empty() {
        return TempoConsensus::default();
    }

    // Fold tempo-doubling ambiguity into a single lower octave before voting
    for e in &mut raw {
        *e /= 2.0;
    }
    let counts = bincount(&raw);
    let closest_bpm = argmax(&counts) as f64 * 2.0;
    for e in &mut raw {
        *e *= 2.0;
    }

    let filtered: Vec<f64> = raw
        .iter()
        .copied()
        .filter(|&e| (closest_bpm - e).abs() < PERIOD_TOLERANCE)
        .collect();

    let bpm = if filtered.is_empty() {
        // Mode disagreed with every individual estimate; fall back to the bin
        debug!("No estimates within tolerance of {:.1} BPM mode", closest_bpm);
        closest_bpm
    } else {
        filtered.iter().sum::<f64>() / filtered.len() as f64
    };

    debug!(
        "Histogram consensus: {:.2} BPM (mode {:.1}, {}/{} inliers)",
        bpm,
        closest_bpm,
        filtered.len(),
        raw.len()
    );

    TempoConsensus {
        bpm,
        estimates: filtered,
        intervals,
    }
}

/// Histogram of values rounded to the nearest non-negative integer
///
/// `counts[i]` is the number of values that round to `i`. Non-finite,
/// negative, and above-[`MAX_BIN`] values cast no vote.
fn bincount(values: &[f64]) -> Vec<usize> {
    let mut counts: Vec<usize> = Vec::new();
    for &v in values {
        if !v.is_finite() || v < 0.0 || v.round() > MAX_BIN as f64 {
            continue;
        }
        let idx = v.round() as usize;
        if idx >= counts.len() {
            counts.resize(idx + 1, 0);
        }
        counts[idx] += 1;
    }
    counts
}

/// Index of the first maximum; 0 for an empty slice
fn argmax(counts: &[usize]) -> usize {
    let mut best = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = i;
        }
    }
    best
}
