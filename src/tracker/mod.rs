//! Beat-tracking strategies
//!
//! The graph runner depends only on the [`BeatTracker`] trait; the concrete
//! strategies behind it are selected by [`create`] from a closed
//! [`DetectionMethod`] variant. `MultiFeature` carries a confidence output,
//! `Degara` does not - the capability gap is expressed in the type
//! (`TrackerOutput::confidence: Option<f64>`) rather than probed at runtime.

pub mod degara;
pub mod envelope;
pub mod multifeature;
pub mod period;

pub use degara::DegaraTracker;
pub use multifeature::MultiFeatureTracker;

use crate::error::Result;
use crate::types::{DetectionMethod, TempoRange};

/// Raw output of one tracking run
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerOutput {
    /// Beat timestamps in seconds, non-decreasing by construction
    pub ticks: Vec<f64>,
    /// Tracking confidence; `None` for strategies without that output
    pub confidence: Option<f64>,
}

/// Beat-tracking backend
pub trait BeatTracker: Send + Sync {
    /// Track beats over a mono 44.1 kHz signal
    ///
    /// An empty tick list is a normal outcome for silence or short input;
    /// an `Err` signals an internal algorithm failure, which the graph
    /// runner absorbs into the empty outcome.
    fn track(&self, signal: &[f32]) -> Result<TrackerOutput>;

    /// Name of this tracker (for logging)
    fn name(&self) -> &'static str;
}

/// Construct the tracker for a detection method, bound to the tempo range
pub fn create(method: DetectionMethod, range: TempoRange) -> Box<dyn BeatTracker> {
    match method {
        DetectionMethod::MultiFeature => Box::new(MultiFeatureTracker::new(range)),
        DetectionMethod::Degara => Box::new(DegaraTracker::new(range)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_dispatch() {
        let range = TempoRange::default();
        assert_eq!(
            create(DetectionMethod::MultiFeature, range).name(),
            "multifeature"
        );
        assert_eq!(create(DetectionMethod::Degara, range).name(), "degara");
    }
}
