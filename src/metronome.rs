//! Metronome click-track rendering
//!
//! Renders detected beat positions as audible clicks, optionally mixed over
//! the original audio, and writes the result as a 16-bit WAV. Useful for
//! auditing tracker output by ear.

use crate::error::{BeatprepError, Result};
use crate::types::SUPPORTED_SAMPLE_RATE;
use std::path::Path;
use tracing::info;

/// Click tone frequency in Hz
const CLICK_FREQ: f32 = 1000.0;

/// Click length in seconds
const CLICK_DURATION: f32 = 0.02;

/// Exponential decay constant for the click envelope
const CLICK_DECAY: f32 = 200.0;

/// Gain applied to the original audio when mixing clicks over it
const MIX_GAIN: f32 = 0.6;

/// Synthesize a short decaying sine click
fn click() -> Vec<f32> {
    let sample_rate = SUPPORTED_SAMPLE_RATE as f32;
    let num_samples = (CLICK_DURATION * sample_rate) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate;
            let envelope = (-CLICK_DECAY * t).exp();
            envelope * (2.0 * std::f32::consts::PI * CLICK_FREQ * t).sin()
        })
        .collect()
}

/// Render clicks at the given tick positions (seconds) into a sample buffer
///
/// If `audio` is provided, clicks are mixed over an attenuated copy of it.
/// Otherwise the output is clicks over silence, long enough to cover the
/// last tick.
pub fn render(ticks: &[f64], audio: Option<&[f32]>) -> Vec<f32> {
    let sample_rate = SUPPORTED_SAMPLE_RATE as f32;
    let click = click();

    let mut out: Vec<f32> = match audio {
        Some(samples) => samples.iter().map(|s| s * MIX_GAIN).collect(),
        None => {
            let last = ticks.iter().cloned().fold(0.0_f64, f64::max);
            let len = (last * SUPPORTED_SAMPLE_RATE) as usize + click.len();
            vec![0.0; len]
        }
    };

    for &tick in ticks {
        if !tick.is_finite() || tick < 0.0 {
            continue;
        }
        let start = (tick * sample_rate as f64) as usize;
        for (i, &c) in click.iter().enumerate() {
            if let Some(sample) = out.get_mut(start + i) {
                *sample = (*sample + c).clamp(-1.0, 1.0);
            }
        }
    }

    out
}

/// Write a click track for the given ticks to a 16-bit mono WAV file
pub fn write_wav(ticks: &[f64], audio: Option<&[f32]>, output_path: &Path) -> Result<()> {
    let samples = render(ticks, audio);

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SUPPORTED_SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(output_path, spec).map_err(|e| BeatprepError::OutputError {
            path: output_path.to_path_buf(),
            reason: format!("Failed to create WAV file: {}", e),
        })?;

    for sample in &samples {
        let value = (sample * i16::MAX as f32) as i16;
        writer.write_sample(value).map_err(|e| BeatprepError::OutputError {
            path: output_path.to_path_buf(),
            reason: format!("Failed to write sample: {}", e),
        })?;
    }

    writer.finalize().map_err(|e| BeatprepError::OutputError {
        path: output_path.to_path_buf(),
        reason: format!("Failed to finalize WAV file: {}", e),
    })?;

    info!(
        "Wrote metronome track ({} clicks) to {}",
        ticks.len(),
        output_path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_silence_covers_last_tick() {
        let out = render(&[0.5, 1.0], None);
        let min_len = (1.0 * SUPPORTED_SAMPLE_RATE) as usize;
        assert!(out.len() >= min_len);
    }

    #[test]
    fn test_render_places_click_at_tick() {
        let out = render(&[0.5], None);
        let start = (0.5 * SUPPORTED_SAMPLE_RATE) as usize;
        let window = &out[start..start + 200];
        let peak = window.iter().cloned().fold(0.0_f32, |a, b| a.max(b.abs()));
        assert!(peak > 0.5, "Expected audible click, got peak {}", peak);
        // Silence before the first tick
        assert!(out[..start - 100].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_render_mix_attenuates_audio() {
        let audio = vec![1.0_f32; 44100];
        let out = render(&[], Some(&audio));
        assert_eq!(out.len(), audio.len());
        assert!((out[1000] - MIX_GAIN).abs() < 0.001);
    }

    #[test]
    fn test_render_skips_invalid_ticks() {
        let out = render(&[-1.0, f64::NAN, 0.1], None);
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_write_wav_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clicks.wav");
        write_wav(&[0.25, 0.5], None, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44100);
    }
}
