//! Signal source adapter
//!
//! Wraps a fixed-size mono sample buffer as a pull-based source for the
//! analysis graph. The graph consumes the buffer in one pull; there is no
//! re-reading and no copy beyond handing ownership to the runner.

use crate::types::SUPPORTED_SAMPLE_RATE;

/// One-shot pull source over an owned mono sample buffer
#[derive(Debug)]
pub struct SignalSource {
    samples: Option<Vec<f32>>,
    sample_rate: f64,
}

impl SignalSource {
    /// Wrap a sample buffer. Input shape and rate are validated at the API
    /// boundary before a source is ever constructed.
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples: Some(samples),
            sample_rate: SUPPORTED_SAMPLE_RATE,
        }
    }

    /// Sample rate of the wrapped buffer in Hz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Pull the full buffer. Yields `Some` exactly once, then `None`.
    pub fn pull(&mut self) -> Option<Vec<f32>> {
        self.samples.take()
    }

    /// Whether the buffer has already been consumed
    pub fn is_drained(&self) -> bool {
        self.samples.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_yields_buffer_exactly_once() {
        let mut source = SignalSource::new(vec![0.1, 0.2, 0.3]);
        assert!(!source.is_drained());

        let pulled = source.pull().expect("first pull should yield the buffer");
        assert_eq!(pulled, vec![0.1, 0.2, 0.3]);

        assert!(source.is_drained());
        assert!(source.pull().is_none());
    }

    #[test]
    fn test_sample_rate_is_fixed() {
        let source = SignalSource::new(vec![0.0; 8]);
        assert_eq!(source.sample_rate(), 44100.0);
    }
}
