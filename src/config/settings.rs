//! Runtime configuration settings

use crate::config::cli::Algorithm;
use crate::error::Result;
use crate::types::{DetectionMethod, TempoRange};
use std::path::PathBuf;

/// Runtime settings for the analysis pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// Input audio file
    pub input: PathBuf,
    /// Analysis algorithm
    pub algorithm: Algorithm,
    /// Beat detection method for the rhythm2013 algorithm
    pub method: DetectionMethod,
    /// Tempo search range
    pub tempo_range: TempoRange,
    /// JSON output file (stdout if None)
    pub output: Option<PathBuf>,
    /// Metronome click-track output file
    pub metronome: Option<PathBuf>,
}

impl Settings {
    /// Create settings from CLI arguments
    ///
    /// Validates the tempo range up front so bad bounds fail before any
    /// decoding happens.
    pub fn from_cli(cli: &super::cli::Cli) -> Result<Self> {
        let method = match cli.method.as_str() {
            "degara" => DetectionMethod::Degara,
            _ => DetectionMethod::MultiFeature,
        };

        let tempo_range = TempoRange::new(cli.min_tempo, cli.max_tempo)?;

        Ok(Self {
            input: cli.input.clone(),
            algorithm: cli.algorithm,
            method,
            tempo_range,
            output: cli.output.clone(),
            metronome: cli.metronome.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let cli = crate::config::Cli::parse_from(["beatprep", "track.wav"]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.algorithm, Algorithm::Multifeature);
        assert_eq!(settings.method, DetectionMethod::MultiFeature);
        assert_eq!(settings.tempo_range.min_bpm, 40.0);
        assert_eq!(settings.tempo_range.max_bpm, 208.0);
        assert!(settings.output.is_none());
    }

    #[test]
    fn test_degara_method() {
        let cli = crate::config::Cli::parse_from([
            "beatprep",
            "track.wav",
            "--algorithm",
            "rhythm2013",
            "--method",
            "degara",
        ]);
        let settings = Settings::from_cli(&cli).unwrap();
        assert_eq!(settings.algorithm, Algorithm::Rhythm2013);
        assert_eq!(settings.method, DetectionMethod::Degara);
    }

    #[test]
    fn test_invalid_tempo_range_rejected() {
        let cli = crate::config::Cli::parse_from([
            "beatprep",
            "track.wav",
            "--min-tempo",
            "200",
            "--max-tempo",
            "100",
        ]);
        assert!(Settings::from_cli(&cli).is_err());
    }
}
