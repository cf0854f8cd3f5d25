//! CLI argument parsing and configuration

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Analysis algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Multi-feature beat tracker with per-beat confidence
    Multifeature,
    /// Rhythm extractor with histogram tempo consensus
    Rhythm2013,
    /// Onset detection (onset times and rate, no tempo)
    Onset,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Multifeature => "multifeature",
            Algorithm::Rhythm2013 => "rhythm2013",
            Algorithm::Onset => "onset",
        }
    }
}

/// beatprep - Beat tracking and tempo analysis for audio files
///
/// Detects beat positions, estimates tempo, and finds onsets in audio
/// files. Outputs results as JSON and can render an audible metronome
/// click track for auditing.
#[derive(Parser, Debug)]
#[command(name = "beatprep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Input audio file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Analysis algorithm
    #[arg(short, long, value_enum, default_value = "multifeature")]
    pub algorithm: Algorithm,

    /// Beat detection method for the rhythm2013 algorithm
    #[arg(long, value_parser = ["multifeature", "degara"], default_value = "multifeature")]
    pub method: String,

    /// Minimum tempo in BPM
    #[arg(long, value_name = "BPM", default_value = "40")]
    pub min_tempo: f64,

    /// Maximum tempo in BPM
    #[arg(long, value_name = "BPM", default_value = "208")]
    pub max_tempo: f64,

    /// Write JSON results to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write a metronome click-track WAV mixed over the input audio
    #[arg(long, value_name = "PATH")]
    pub metronome: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Get the log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
