// ABOUTME: Main entry point for the quiz-slides program.
// ABOUTME: Provides the CLI and reports progress and warnings on stdout.

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

use quiz_slides::{Config, DeckObserver, RunOutcome, SlideSummary};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON problem file (default: problems_data.json)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to the output PPTX file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory that relative picture paths are resolved against
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Log pipeline details to stderr (picture warnings are always printed to stdout)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        })
        .parse_env("RUST_LOG")
        .init();

    if let Err(e) = execute(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Prints each slide and its picture warnings while the deck is composed.
struct StdoutProgress;

impl DeckObserver for StdoutProgress {
    fn started(&mut self, slide_count: usize) {
        println!("Generating {} slides...", slide_count);
    }

    fn slide_composed(&mut self, slide: &SlideSummary) {
        for warning in &slide.warnings {
            println!("  Warning: {}", warning);
        }
        println!("  - Slide {} created: problem {}", slide.index, slide.number);
    }
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env().with_overrides(cli.input, cli.output, cli.image_dir);

    if let Some(dir) = &config.image_dir {
        quiz_slides::utils::require_directory(dir)
            .with_context(|| format!("invalid image directory {:?}", dir))?;
    }

    println!("Reading problems from {:?}...", config.input_path);

    let outcome = quiz_slides::run(&config, &mut StdoutProgress)
        .with_context(|| format!("could not build a deck from {:?}", config.input_path))?;

    match outcome {
        RunOutcome::Empty => {
            println!("The JSON file contains no problem data. Nothing to generate.");
        }
        RunOutcome::Generated(report) => {
            if report.warning_count() > 0 {
                println!("{} warning(s) while composing", report.warning_count());
            }
            println!("Successfully wrote {:?}", report.output_path);
        }
    }

    Ok(())
}
