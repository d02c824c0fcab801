//! Cantus command line — render score files to WAV.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{info, warn};

use cantus::audio::write_wav;
use cantus::config::{load_settings, Settings};
use cantus::instrument::Instrument;
use cantus::score::{Score, ScoreError};

#[derive(Parser)]
#[command(name = "cantus")]
#[command(about = "Compile polyphonic music notation to WAV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a score file to WAV
    Render {
        /// Score file (YAML)
        score: PathBuf,

        /// Output WAV file (default: score path with .wav extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render threads (overrides settings; 0 = one per core)
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Parse a score and report its lines without rendering
    Check {
        /// Score file (YAML)
        score: PathBuf,
    },

    /// List the instrument catalogue
    Instruments,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn settings() -> Settings {
    load_settings().unwrap_or_else(|e| {
        warn!("ignoring unreadable settings: {e}");
        Settings::default()
    })
}

fn run(command: Commands) -> Result<(), ScoreError> {
    match command {
        Commands::Render {
            score,
            output,
            threads,
        } => {
            let settings = settings();
            let output = output.unwrap_or_else(|| score.with_extension("wav"));
            render(
                &score,
                &output,
                settings.default_tempo,
                threads.unwrap_or(settings.threads),
            )
        }
        Commands::Check { score } => check(&score, settings().default_tempo),
        Commands::Instruments => {
            for instrument in Instrument::ALL {
                println!("{instrument}");
            }
            Ok(())
        }
    }
}

fn render(score: &Path, output: &Path, default_tempo: f64, threads: usize) -> Result<(), ScoreError> {
    let score = Score::from_file(score, default_tempo)?;
    let mixdown = score.render_with_threads(threads)?;
    if mixdown.is_silent() {
        warn!("writing silence");
    }
    write_wav(output, mixdown.samples())?;
    info!(
        "{}: {} frames, {:.2}s, peak {:.4}",
        output.display(),
        mixdown.frames(),
        mixdown.duration_secs(),
        mixdown.peak()
    );
    Ok(())
}

fn check(path: &Path, default_tempo: f64) -> Result<(), ScoreError> {
    let score = Score::from_file(path, default_tempo)?;
    for line in score.lines() {
        let beats: f64 = line.events().iter().map(|e| e.duration().as_beats()).sum();
        println!(
            "{}: {} events, {} beats at {} bpm",
            line.name(),
            line.events().len(),
            beats,
            line.base_tempo()
        );
    }
    Ok(())
}
