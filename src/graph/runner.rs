//! Graph execution and result harvesting
//!
//! Wires source -> tracker -> pool, runs to completion synchronously, and
//! extracts the raw results. A tracker producing no ticks (silence, signal
//! too short, pathological input) is a normal outcome, and a tracker error
//! is absorbed here and converted into the same empty outcome, so a single
//! degenerate analysis never crashes a batch of many calls.

use crate::graph::pool::{Pool, CONFIDENCE_KEY, TICKS_KEY};
use crate::graph::source::SignalSource;
use crate::tracker::BeatTracker;
use tracing::{debug, warn};

/// Harvested graph results: "no result" is a typed outcome, not an error
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOutcome {
    /// Beat timestamps in seconds; empty when tracking found nothing
    pub ticks: Vec<f64>,
    /// Tracking confidence; 0.0 when the tracker has no confidence output
    pub confidence: f64,
}

impl RunOutcome {
    /// The fail-soft outcome: empty ticks, zero confidence
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Run the three-stage graph to completion and harvest results
pub fn run(mut source: SignalSource, tracker: &dyn BeatTracker) -> RunOutcome {
    let Some(signal) = source.pull() else {
        return RunOutcome::empty();
    };

    debug!(
        "Running {} tracker on {} samples ({:.2}s)",
        tracker.name(),
        signal.len(),
        signal.len() as f64 / source.sample_rate()
    );

    let mut pool = Pool::new();
    match tracker.track(&signal) {
        Ok(output) => {
            pool.set_real_vec(TICKS_KEY, output.ticks);
            if let Some(confidence) = output.confidence {
                pool.set_real(CONFIDENCE_KEY, confidence);
            }
        }
        Err(e) => {
            warn!(
                "{} tracker failed, returning empty result: {}",
                tracker.name(),
                e
            );
        }
    }

    let ticks = pool
        .real_vec(TICKS_KEY)
        .map(|t| t.to_vec())
        .unwrap_or_default();
    let confidence = pool.real(CONFIDENCE_KEY).unwrap_or(0.0);

    debug!("Harvested {} ticks, confidence {:.3}", ticks.len(), confidence);

    RunOutcome { ticks, confidence }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BeatprepError, Result};
    use crate::tracker::TrackerOutput;

    struct FixedTracker {
        ticks: Vec<f64>,
        confidence: Option<f64>,
    }

    impl BeatTracker for FixedTracker {
        fn track(&self, _signal: &[f32]) -> Result<TrackerOutput> {
            Ok(TrackerOutput {
                ticks: self.ticks.clone(),
                confidence: self.confidence,
            })
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct FailingTracker;

    impl BeatTracker for FailingTracker {
        fn track(&self, _signal: &[f32]) -> Result<TrackerOutput> {
            Err(BeatprepError::AnalysisError("simulated failure".into()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn test_harvests_ticks_and_confidence() {
        let tracker = FixedTracker {
            ticks: vec![0.5, 1.0],
            confidence: Some(3.2),
        };
        let outcome = run(SignalSource::new(vec![0.0; 1024]), &tracker);
        assert_eq!(outcome.ticks, vec![0.5, 1.0]);
        assert_eq!(outcome.confidence, 3.2);
    }

    #[test]
    fn test_absent_confidence_defaults_to_zero() {
        let tracker = FixedTracker {
            ticks: vec![0.5],
            confidence: None,
        };
        let outcome = run(SignalSource::new(vec![0.0; 1024]), &tracker);
        assert_eq!(outcome.confidence, 0.0);
    }

    #[test]
    fn test_tracker_error_degrades_to_empty_outcome() {
        let outcome = run(SignalSource::new(vec![0.0; 1024]), &FailingTracker);
        assert_eq!(outcome, RunOutcome::empty());
    }

    #[test]
    fn test_no_ticks_is_a_normal_outcome() {
        let tracker = FixedTracker {
            ticks: vec![],
            confidence: Some(0.0),
        };
        let outcome = run(SignalSource::new(vec![0.0; 1024]), &tracker);
        assert!(outcome.ticks.is_empty());
        assert_eq!(outcome.confidence, 0.0);
    }
}
