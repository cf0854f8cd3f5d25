//! beatprep CLI entry point

use beatprep::config::{Algorithm, Cli, Settings};
use beatprep::export::{self, AnalysisJson};
use beatprep::{audio, types};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli);

    let settings = match Settings::from_cli(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> beatprep::Result<()> {
    let samples = audio::decode(&settings.input)?;

    let report = match settings.algorithm {
        Algorithm::Multifeature => {
            let result = beatprep::estimate_tempo_multifeature(
                &samples,
                types::SUPPORTED_SAMPLE_RATE,
                settings.tempo_range,
            )?;
            write_metronome(settings, &result.ticks, &samples)?;
            AnalysisJson::rhythm(&settings.input, settings.algorithm.name(), result)
        }
        Algorithm::Rhythm2013 => {
            let result = beatprep::estimate_tempo_rhythm_extractor(
                &samples,
                types::SUPPORTED_SAMPLE_RATE,
                settings.tempo_range,
                settings.method,
            )?;
            write_metronome(settings, &result.ticks, &samples)?;
            AnalysisJson::rhythm(&settings.input, settings.algorithm.name(), result)
        }
        Algorithm::Onset => {
            let result =
                beatprep::detect_onsets(&samples, types::SUPPORTED_SAMPLE_RATE)?;
            write_metronome(settings, &result.onsets, &samples)?;
            AnalysisJson::onsets(&settings.input, settings.algorithm.name(), result)
        }
    };

    match &settings.output {
        Some(path) => export::write_json(&report, path),
        None => export::write_stdout(&report),
    }
}

fn write_metronome(settings: &Settings, ticks: &[f64], samples: &[f32]) -> beatprep::Result<()> {
    if let Some(path) = &settings.metronome {
        beatprep::metronome::write_wav(ticks, Some(samples), path)?;
    }
    Ok(())
}

fn init_logging(cli: &Cli) {
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if cli.quiet { "error" } else { filter };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
