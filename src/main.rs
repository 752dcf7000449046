//! Collar Episode Visualizer - stacked sensor plots for labeled recordings.
//!
//! Loads gyroscope and accelerometer channels recorded by the smart dog
//! collar, rebuilds a regular time axis and shows six stacked line plots
//! per episode, either in the terminal or as exported SVG files.

mod display;
mod episode;
mod error;
mod figure;
mod present;
mod render;
mod table;
mod visualizer;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use episode::EpisodeDescriptor;
use num_format::{Locale, ToFormattedString};
use present::{SvgExporter, TerminalPresenter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use visualizer::{EpisodeSummary, EpisodeVisualizer, VisualizerOptions};

/// Plot play, sleep and seizure recordings from the smart dog collar
#[derive(Parser, Debug)]
#[command(name = "collarviz")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base directory for relative recording paths
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// JSON manifest of episodes ([{"path": ..., "title": ...}]) replacing the defaults
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Assumed sampling rate in Hz for the rebuilt time axis
    #[arg(short = 'r', long, default_value = "16", value_parser = parse_sample_rate)]
    sample_rate: f64,

    /// Export SVG figures into this directory instead of showing them
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Exported figure width (pixels)
    #[arg(long, default_value_t = render::DEFAULT_SIZE.0)]
    width: u32,

    /// Exported figure height (pixels)
    #[arg(long, default_value_t = render::DEFAULT_SIZE.1)]
    height: u32,

    /// Print a cleaning summary for every episode at the end
    #[arg(long)]
    summary: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_sample_rate(s: &str) -> std::result::Result<f64, String> {
    let rate: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("sample rate must be a positive number, got {}", s))
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_summary(summaries: &[EpisodeSummary]) {
    println!("\n{}", "=".repeat(60));
    println!("                    EPISODE SUMMARY");
    println!("{}", "=".repeat(60));
    for summary in summaries {
        println!();
        println!("{} ({})", summary.title, summary.source.display());
        if let Some(rec) = &summary.recording {
            println!(
                "  Subject: {}  Device: {}  Started: {}",
                rec.subject,
                rec.device_id,
                rec.started_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
        let report = &summary.report;
        println!(
            "  Rows: {} kept of {} ({} dropped)",
            report.kept_rows.to_formatted_string(&Locale::en),
            report.raw_rows.to_formatted_string(&Locale::en),
            report.dropped_rows.to_formatted_string(&Locale::en),
        );
        println!(
            "  Duration: {:.2}s at {} Hz",
            report.duration_secs, report.sample_rate_hz
        );
        for (attr, range) in &summary.channel_ranges {
            match range {
                Some((lo, hi)) => println!("  {:<4} {:>10.3} .. {:<10.3}", attr.column(), lo, hi),
                None => println!("  {:<4} {:>10}", attr.column(), "N/A"),
            }
        }
    }
    println!("{}", "=".repeat(60));
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let episodes: Vec<EpisodeDescriptor> = match &args.manifest {
        Some(path) => episode::load_manifest(path)
            .with_context(|| format!("Failed to read episode manifest: {}", path.display()))?,
        None => episode::default_episodes(),
    };

    let options = VisualizerOptions {
        data_dir: args.data_dir.clone(),
        sample_rate_hz: args.sample_rate,
    };

    // Export mode: write one SVG per episode without waiting
    let summaries = if let Some(ref dir) = args.export {
        let exporter = SvgExporter::new(dir, (args.width, args.height))
            .with_context(|| format!("Failed to prepare export directory: {}", dir.display()))?;
        let mut viz = EpisodeVisualizer::new(episodes, options, exporter);
        let summaries = viz.run().context("Episode export failed")?;

        eprintln!("\nGenerated {} figures:", viz.presenter().exported().len());
        for path in viz.presenter().exported() {
            eprintln!("  • {}", path.display());
        }
        summaries
    } else {
        let mut viz = EpisodeVisualizer::new(episodes, options, TerminalPresenter::new());
        viz.run().context("Episode display failed")?
    };

    if args.summary {
        print_summary(&summaries);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_default_run() {
        let args = Args::try_parse_from(["collarviz"]).unwrap();
        assert_eq!(args.data_dir, PathBuf::from("."));
        assert_eq!(args.sample_rate, 16.0);
        assert!(args.manifest.is_none());
        assert!(args.export.is_none());
        assert_eq!((args.width, args.height), render::DEFAULT_SIZE);
    }

    #[test]
    fn sample_rate_must_be_positive() {
        assert!(Args::try_parse_from(["collarviz", "-r", "0"]).is_err());
        assert!(Args::try_parse_from(["collarviz", "-r", "-16"]).is_err());
        assert!(Args::try_parse_from(["collarviz", "-r", "fast"]).is_err());
        let args = Args::try_parse_from(["collarviz", "-r", "17"]).unwrap();
        assert_eq!(args.sample_rate, 17.0);
    }

    #[test]
    fn verbosity_counts() {
        let args = Args::try_parse_from(["collarviz", "-vv", "--summary", "-e", "out"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(args.summary);
        assert_eq!(args.export, Some(PathBuf::from("out")));
    }
}
