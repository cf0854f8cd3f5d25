//! Onset-strength envelopes
//!
//! Frame-based novelty functions over the input signal. Each envelope has
//! one value per analysis frame (first frame 0.0, since flux needs a
//! predecessor), so frame indices translate directly to time via
//! `frame * HOP_SIZE / sample_rate`.
//!
//! The Hann window table is the only process-wide shared state in the crate:
//! built lazily behind a `OnceLock` on first use, idempotent and thread-safe,
//! shared by every analysis call thereafter.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::sync::OnceLock;

/// Analysis frame size in samples (about 23 ms at 44.1 kHz)
pub const FRAME_SIZE: usize = 1024;

/// Hop between frames in samples (50% overlap)
pub const HOP_SIZE: usize = 512;

const EPSILON: f32 = 1e-10;

static HANN_WINDOW: OnceLock<Vec<f32>> = OnceLock::new();

/// Shared Hann window table for [`FRAME_SIZE`]-sample frames
///
/// Safe to call from any thread, any number of times; the table is computed
/// exactly once per process.
pub fn hann_window() -> &'static [f32] {
    HANN_WINDOW.get_or_init(|| {
        (0..FRAME_SIZE)
            .map(|i| {
                let x = i as f32 / (FRAME_SIZE - 1) as f32;
                0.5 - 0.5 * (2.0 * std::f32::consts::PI * x).cos()
            })
            .collect()
    })
}

/// Number of full analysis frames in `signal`
pub fn frame_count(signal: &[f32]) -> usize {
    if signal.len() < FRAME_SIZE {
        0
    } else {
        (signal.len() - FRAME_SIZE) / HOP_SIZE + 1
    }
}

/// Energy-flux envelope: half-wave rectified per-frame RMS difference
pub fn energy_flux(signal: &[f32]) -> Vec<f32> {
    let num_frames = frame_count(signal);
    if num_frames < 2 {
        return Vec::new();
    }

    let mut rms = Vec::with_capacity(num_frames);
    for i in 0..num_frames {
        let start = i * HOP_SIZE;
        let frame = &signal[start..start + FRAME_SIZE];
        let sum_sq: f32 = frame.iter().map(|&x| x * x).sum();
        rms.push((sum_sq / FRAME_SIZE as f32).sqrt());
    }

    let mut envelope = Vec::with_capacity(num_frames);
    envelope.push(0.0);
    for i in 1..num_frames {
        envelope.push((rms[i] - rms[i - 1]).max(0.0));
    }
    envelope
}

/// Magnitude spectra of every analysis frame (Hann-windowed, first
/// `FRAME_SIZE / 2 + 1` bins)
pub fn magnitude_frames(signal: &[f32]) -> Vec<Vec<f32>> {
    let num_frames = frame_count(signal);
    if num_frames == 0 {
        return Vec::new();
    }

    let window = hann_window();
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(FRAME_SIZE);

    let mut frames = Vec::with_capacity(num_frames);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); FRAME_SIZE];
    for i in 0..num_frames {
        let start = i * HOP_SIZE;
        for (j, b) in buffer.iter_mut().enumerate() {
            *b = Complex::new(signal[start + j] * window[j], 0.0);
        }
        fft.process(&mut buffer);
        frames.push(buffer[..FRAME_SIZE / 2 + 1].iter().map(|c| c.norm()).collect());
    }
    frames
}

/// Spectral-flux envelope: half-wave rectified bin-wise magnitude difference
pub fn spectral_flux(magnitudes: &[Vec<f32>]) -> Vec<f32> {
    if magnitudes.len() < 2 {
        return Vec::new();
    }
    let mut envelope = Vec::with_capacity(magnitudes.len());
    envelope.push(0.0);
    for i in 1..magnitudes.len() {
        let flux: f32 = magnitudes[i]
            .iter()
            .zip(&magnitudes[i - 1])
            .map(|(&cur, &prev)| (cur - prev).max(0.0))
            .sum();
        envelope.push(flux);
    }
    envelope
}

/// High-frequency-content envelope: half-wave rectified difference of the
/// bin-weighted magnitude sum, emphasizing percussive broadband onsets
pub fn hfc_flux(magnitudes: &[Vec<f32>]) -> Vec<f32> {
    if magnitudes.len() < 2 {
        return Vec::new();
    }
    let hfc: Vec<f32> = magnitudes
        .iter()
        .map(|mags| {
            mags.iter()
                .enumerate()
                .map(|(k, &m)| k as f32 * m)
                .sum::<f32>()
        })
        .collect();

    let mut envelope = Vec::with_capacity(hfc.len());
    envelope.push(0.0);
    for i in 1..hfc.len() {
        envelope.push((hfc[i] - hfc[i - 1]).max(0.0));
    }
    envelope
}

/// Whether an envelope carries any usable novelty at all
pub fn has_energy(envelope: &[f32]) -> bool {
    envelope.iter().copied().fold(0.0f32, f32::max) > EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_signal() -> Vec<f32> {
        // Silence, then a sudden constant signal
        let mut signal = vec![0.0f32; 44100];
        for s in signal.iter_mut().skip(22050) {
            *s = 0.5;
        }
        signal
    }

    #[test]
    fn test_hann_window_shape() {
        let window = hann_window();
        assert_eq!(window.len(), FRAME_SIZE);
        assert!(window[0].abs() < 1e-6);
        assert!((window[FRAME_SIZE / 2] - 1.0).abs() < 0.01);
        // Idempotent: second call returns the same table
        assert!(std::ptr::eq(window.as_ptr(), hann_window().as_ptr()));
    }

    #[test]
    fn test_frame_count() {
        assert_eq!(frame_count(&[]), 0);
        assert_eq!(frame_count(&vec![0.0; FRAME_SIZE - 1]), 0);
        assert_eq!(frame_count(&vec![0.0; FRAME_SIZE]), 1);
        assert_eq!(frame_count(&vec![0.0; FRAME_SIZE + HOP_SIZE]), 2);
    }

    #[test]
    fn test_energy_flux_peaks_at_step() {
        let envelope = energy_flux(&step_signal());
        assert!(has_energy(&envelope));

        let peak_frame = envelope
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        let expected_frame = 22050 / HOP_SIZE;
        assert!(
            (peak_frame as i64 - expected_frame as i64).abs() <= 2,
            "peak at frame {}, expected near {}",
            peak_frame,
            expected_frame
        );
    }

    #[test]
    fn test_energy_flux_silent_is_flat() {
        let envelope = energy_flux(&vec![0.0f32; 44100]);
        assert!(!has_energy(&envelope));
    }

    #[test]
    fn test_spectral_flux_peaks_at_step() {
        let mags = magnitude_frames(&step_signal());
        let envelope = spectral_flux(&mags);
        assert!(has_energy(&envelope));

        let peak_frame = envelope
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        let expected_frame = 22050 / HOP_SIZE;
        assert!((peak_frame as i64 - expected_frame as i64).abs() <= 2);
    }

    #[test]
    fn test_envelopes_share_frame_indexing() {
        let signal = step_signal();
        let mags = magnitude_frames(&signal);
        assert_eq!(energy_flux(&signal).len(), frame_count(&signal));
        assert_eq!(spectral_flux(&mags).len(), frame_count(&signal));
        assert_eq!(hfc_flux(&mags).len(), frame_count(&signal));
    }

    #[test]
    fn test_short_signal_yields_empty_envelope() {
        assert!(energy_flux(&vec![0.5f32; 100]).is_empty());
        assert!(magnitude_frames(&vec![0.5f32; 100]).is_empty());
    }
}
