//! gammahull-bench: CLI tool for running the hull pipeline on point files.
//!
//! Reads a whitespace-separated point list, builds the convex and concave
//! hulls, and prints per-stage diagnostics. Useful for:
//!
//! - Comparing sequential and partitioned candidate search
//! - Seeing how γ changes the number of inserted points
//! - Measuring per-stage durations on large point sets
//! - Exporting the hulls as text or as an SVG preview
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin gammahull-bench -- [OPTIONS] <POINTS_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser, ValueEnum};
use gammahull_core::diagnostics::{Clock, HullDiagnostics};
use gammahull_core::{CandidateSearchKind, HullConfig, HullResult, ShapeParameter};
use gammahull_export::{Canvas, SvgMetadata};
use tracing::Level;

/// Convex and γ-controlled concave hulls of a point file.
///
/// Runs the hull pipeline on a point list (one `x y` pair per line) and
/// prints per-stage timing and count diagnostics.
#[derive(Parser)]
#[command(name = "gammahull-bench", version)]
struct Cli {
    /// Path to the input point list.
    points_path: PathBuf,

    /// Concavity parameter γ. Values outside [0, 2] are clamped.
    #[arg(long, default_value_t = HullConfig::DEFAULT_GAMMA, allow_negative_numbers = true)]
    gamma: f64,

    /// Candidate search strategy.
    #[arg(long, value_enum, default_value_t = Search::Auto)]
    search: Search,

    /// Remaining-point count above which `auto` search runs in parallel.
    #[arg(long, default_value_t = HullConfig::DEFAULT_PARALLEL_THRESHOLD, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    parallel_threshold: usize,

    /// Full hull config as a JSON string.
    ///
    /// When provided, `--gamma`, `--search`, and `--parallel-threshold`
    /// are ignored. The JSON must be a valid `HullConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Write the concave hull as a point list to file.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Write the convex hull as a point list to file.
    #[arg(long)]
    convex_output: Option<PathBuf>,

    /// Write an SVG preview to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Worker threads for parallel candidate search (default: one per core).
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    threads: Option<usize>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Candidate search strategy selection.
#[derive(Clone, Copy, ValueEnum)]
enum Search {
    /// Parallel only above the threshold.
    Auto,
    /// Always on the calling thread.
    Sequential,
    /// Always across the worker pool.
    Parallel,
}

impl From<Search> for CandidateSearchKind {
    fn from(search: Search) -> Self {
        match search {
            Search::Auto => Self::Auto,
            Search::Sequential => Self::Sequential,
            Search::Parallel => Self::Parallel,
        }
    }
}

/// Build a [`HullConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual parameter flags are ignored. Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<HullConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        HullConfig {
            gamma: ShapeParameter::clamped(cli.gamma),
            search: cli.search.into(),
            parallel_threshold: cli.parallel_threshold,
        }
    };
    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {e}"))?;
    Ok(config)
}

const fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        eprintln!("Error configuring {threads} worker threads: {e}");
        return ExitCode::FAILURE;
    }

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let text = match std::fs::read_to_string(&cli.points_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.points_path.display());
            return ExitCode::FAILURE;
        }
    };

    let parsed = match gammahull_export::parse_points(&text) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error in {}: {e}", cli.points_path.display());
            return ExitCode::FAILURE;
        }
    };
    for line in &parsed.skipped_lines {
        tracing::warn!(line, "skipped malformed point record");
    }

    eprintln!(
        "Points: {} ({} points, {} lines skipped)",
        cli.points_path.display(),
        parsed.points.len(),
        parsed.skipped_lines.len(),
    );
    eprintln!("Config: {config:#?}");
    eprintln!("Workers: {}", rayon::current_num_threads());
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        let (result, diagnostics) = gammahull_core::process_with_diagnostics(
            parsed.points.clone(),
            &config,
            &StdClock,
        );
        tracing::info!(
            run,
            convex = result.convex.len(),
            concave = result.concave.len(),
            "pipeline finished"
        );

        if cli.json {
            match serde_json::to_string_pretty(&diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", diagnostics.report());
        }

        // Write outputs on the first run only.
        if run == 0 {
            write_outputs(&cli, &config, &result);
        }

        all_diagnostics.push(diagnostics);

        if cli.runs > 1 {
            eprintln!();
        }
    }

    // Print summary when multiple runs.
    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

/// Write the requested text and SVG outputs, reporting failures on stderr.
fn write_outputs(cli: &Cli, config: &HullConfig, result: &HullResult) {
    if let Some(ref path) = cli.output {
        write_file(path, &gammahull_export::to_points_text(result.concave.points()), "Concave hull");
    }

    if let Some(ref path) = cli.convex_output {
        write_file(path, &gammahull_export::to_points_text(result.convex.points()), "Convex hull");
    }

    if let Some(ref path) = cli.svg {
        let title = cli
            .points_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("points");
        let desc = format!(
            "gamma={:.2} search={:?} parallel_threshold={}",
            config.gamma.get(),
            config.search,
            config.parallel_threshold,
        );
        let metadata = SvgMetadata {
            title: Some(title),
            description: Some(&desc),
        };
        let svg = gammahull_export::to_svg(result, config.gamma, Canvas::default(), &metadata);
        write_file(path, &svg, "SVG");
    }
}

fn write_file(path: &Path, contents: &str, what: &str) {
    match std::fs::write(path, contents) {
        Ok(()) => {
            eprintln!(
                "{what} written to {} ({} bytes)",
                path.display(),
                contents.len(),
            );
        }
        Err(e) => {
            eprintln!("Error writing {what} to {}: {e}", path.display());
        }
    }
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Function pointer type for extracting a stage duration from diagnostics.
type StageExtractor = fn(&HullDiagnostics) -> Duration;

/// Print aggregated statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[HullDiagnostics]) {
    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    println!();
    println!("{:<24} {:>12}", "Stage", "Mean (ms)");
    println!("{}", "-".repeat(40));

    let stage_extractors: &[(&str, StageExtractor)] = &[
        ("Convex Hull", |d| d.convex.duration),
        ("Concave Hull", |d| d.concave.duration),
    ];

    for (name, extractor) in stage_extractors {
        let stage_mean = all_diagnostics
            .iter()
            .map(|d| extractor(d).as_secs_f64() * 1000.0)
            .sum::<f64>()
            / all_diagnostics.len() as f64;
        println!("{name:<24} {stage_mean:>10.3}ms");
    }
}
