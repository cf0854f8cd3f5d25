//! Beat-period estimation and tick-grid placement
//!
//! Shared by both trackers: the onset envelope's dominant period is found by
//! FFT-accelerated autocorrelation (`ACF = IFFT(|FFT(x)|^2)`) constrained to
//! the lag range implied by the tempo bounds, then the grid phase is chosen
//! as the offset whose comb over the envelope collects the most novelty.

use crate::tracker::envelope::HOP_SIZE;
use crate::types::{TempoRange, SUPPORTED_SAMPLE_RATE};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

const EPSILON: f32 = 1e-10;

/// Autocorrelation of an envelope via FFT
pub fn autocorrelation(envelope: &[f32]) -> Vec<f32> {
    let n = envelope.len();
    if n < 2 {
        return Vec::new();
    }

    // Zero-pad to 2n to avoid circular wrap-around
    let fft_size = (2 * n).next_power_of_two();
    let mut buffer: Vec<Complex<f32>> =
        envelope.iter().map(|&x| Complex::new(x, 0.0)).collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(fft_size).process(&mut buffer);
    for x in &mut buffer {
        *x = *x * x.conj();
    }
    planner.plan_fft_inverse(fft_size).process(&mut buffer);

    let scale = 1.0 / fft_size as f32;
    buffer[..n].iter().map(|x| (x.re * scale).max(0.0)).collect()
}

/// Convert a tempo in BPM to an envelope lag in frames
fn bpm_to_lag(bpm: f64) -> f64 {
    60.0 * SUPPORTED_SAMPLE_RATE / (bpm * HOP_SIZE as f64)
}

/// Convert an envelope lag in frames to a tempo in BPM
pub fn lag_to_bpm(lag: usize) -> f64 {
    60.0 * SUPPORTED_SAMPLE_RATE / (lag as f64 * HOP_SIZE as f64)
}

/// Dominant beat period in frames, within the tempo range
///
/// `None` when the envelope is too short or flat to carry a periodicity.
pub fn pick_period(acf: &[f32], range: TempoRange) -> Option<usize> {
    if acf.is_empty() {
        return None;
    }

    let lag_min = bpm_to_lag(range.max_bpm).ceil() as usize;
    let lag_max = (bpm_to_lag(range.min_bpm).floor() as usize).min(acf.len() - 1);
    if lag_min == 0 || lag_min > lag_max {
        return None;
    }

    let (best_lag, best_value) = acf[lag_min..=lag_max]
        .iter()
        .enumerate()
        .fold((lag_min, 0.0f32), |(bi, bv), (i, &v)| {
            if v > bv {
                (i + lag_min, v)
            } else {
                (bi, bv)
            }
        });

    if best_value <= EPSILON {
        return None;
    }
    Some(best_lag)
}

/// Grid phase (frame offset in `0..period`) that collects the most novelty
pub fn pick_phase(envelope: &[f32], period: usize) -> usize {
    let mut best_phase = 0;
    let mut best_sum = f32::NEG_INFINITY;
    for phase in 0..period.min(envelope.len()) {
        let sum: f32 = envelope.iter().skip(phase).step_by(period).sum();
        if sum > best_sum {
            best_sum = sum;
            best_phase = phase;
        }
    }
    best_phase
}

/// Tick timestamps (seconds) for a phase-aligned periodic grid over
/// `num_frames` envelope frames; strictly increasing by construction
pub fn ticks_on_grid(phase: usize, period: usize, num_frames: usize) -> Vec<f64> {
    let frame_secs = HOP_SIZE as f64 / SUPPORTED_SAMPLE_RATE;
    (phase..num_frames)
        .step_by(period.max(1))
        .map(|frame| frame as f64 * frame_secs)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Envelope with an impulse every `period` frames
    fn pulse_envelope(period: usize, num_frames: usize) -> Vec<f32> {
        let mut envelope = vec![0.0f32; num_frames];
        for frame in envelope.iter_mut().step_by(period) {
            *frame = 1.0;
        }
        envelope
    }

    #[test]
    fn test_acf_finds_pulse_period() {
        // 120 BPM at 44.1 kHz / 512 hop is ~43 frames per beat
        let envelope = pulse_envelope(43, 860);
        let acf = autocorrelation(&envelope);
        let period = pick_period(&acf, TempoRange::default()).unwrap();
        assert!(
            (period as i64 - 43).abs() <= 1,
            "expected period ~43 frames, got {}",
            period
        );
        assert!((lag_to_bpm(period) - 120.0).abs() < 5.0);
    }

    #[test]
    fn test_flat_envelope_has_no_period() {
        let acf = autocorrelation(&vec![0.0f32; 400]);
        assert_eq!(pick_period(&acf, TempoRange::default()), None);
    }

    #[test]
    fn test_short_envelope_has_no_period() {
        let acf = autocorrelation(&[1.0, 0.0, 1.0]);
        assert_eq!(pick_period(&acf, TempoRange::default()), None);
    }

    #[test]
    fn test_phase_alignment() {
        let mut envelope = vec![0.0f32; 200];
        for i in (7..200).step_by(40) {
            envelope[i] = 1.0;
        }
        assert_eq!(pick_phase(&envelope, 40), 7);
    }

    #[test]
    fn test_grid_ticks_are_strictly_increasing() {
        let ticks = ticks_on_grid(7, 43, 860);
        assert!(!ticks.is_empty());
        for pair in ticks.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        // First tick lands on the phase frame
        let frame_secs = 512.0 / 44100.0;
        assert!((ticks[0] - 7.0 * frame_secs).abs() < 1e-12);
    }

    #[test]
    fn test_lag_bpm_round_trip() {
        let lag = 43;
        let bpm = lag_to_bpm(lag);
        assert!((bpm - 120.0).abs() < 3.0);
    }
}
