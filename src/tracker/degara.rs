//! Single-envelope beat tracker
//!
//! Energy-flux novelty, autocorrelation period within the configured tempo
//! bounds, phase-aligned tick grid. This variant has no confidence output;
//! `TrackerOutput::confidence` is always `None`.

use crate::error::Result;
use crate::tracker::{envelope, period, BeatTracker, TrackerOutput};
use crate::types::TempoRange;
use tracing::debug;

/// Beat tracker driven by a single onset-strength envelope
#[derive(Debug, Clone)]
pub struct DegaraTracker {
    range: TempoRange,
}

impl DegaraTracker {
    /// Create a tracker bound to the given tempo search range
    pub fn new(range: TempoRange) -> Self {
        Self { range }
    }
}

/// Track one envelope onto a periodic tick grid; empty when no periodicity
pub(crate) fn track_envelope(novelty: &[f32], range: TempoRange) -> Vec<f64> {
    if !envelope::has_energy(novelty) {
        return Vec::new();
    }
    let acf = period::autocorrelation(novelty);
    let Some(beat_period) = period::pick_period(&acf, range) else {
        return Vec::new();
    };
    let phase = period::pick_phase(novelty, beat_period);
    period::ticks_on_grid(phase, beat_period, novelty.len())
}

impl BeatTracker for DegaraTracker {
    fn track(&self, signal: &[f32]) -> Result<TrackerOutput> {
        let novelty = envelope::energy_flux(signal);
        let ticks = track_envelope(&novelty, self.range);
        debug!("degara: {} ticks from {} frames", ticks.len(), novelty.len());
        Ok(TrackerOutput {
            ticks,
            confidence: None,
        })
    }

    fn name(&self) -> &'static str {
        "degara"
    }
}
