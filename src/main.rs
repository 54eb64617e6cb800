use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use humansize::{format_size, BINARY};
use std::path::PathBuf;

use tino_build::clean::{clean_output, CleanOptions, CleanReport};
use tino_build::components::build_components;
use tino_build::config::BuildConfig;
use tino_build::pipeline::run_pipeline;
use tino_build::rewrite::rewrite_bundles;
use tino_build::styles::build_styles;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Packaging pipeline for the Tino Design UI component library",
    long_about = None
)]
struct Cli {
    /// Pipeline configuration file (defaults to the built-in layout)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show detailed information about each processed path
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: clean, then styles and components in parallel, then rewrite
    Build,
    /// Empty the build-output directory, keeping retained files and dependency caches
    Clean {
        /// Show what would be removed without deleting anything
        #[arg(long)]
        dry_run: bool,

        /// Calculate how many bytes cleaning reclaims
        #[arg(long)]
        sizes: bool,
    },
    /// Compile style sources into the build-output directory
    Styles,
    /// Run the component package build command
    Components,
    /// Replace style-source extension references inside emitted bundles
    Rewrite,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BuildConfig::from_path(path)?,
        None => BuildConfig::embedded()?,
    };

    match cli.command {
        Commands::Build => run_pipeline(&config, cli.verbose),
        Commands::Clean { dry_run, sizes } => {
            let options = CleanOptions {
                dry_run,
                verbose: cli.verbose,
                calculate_sizes: sizes,
            };
            let report = clean_output(&config.output.dir, &config.output, options)?;
            print_clean_summary(&report, options);
            Ok(())
        }
        Commands::Styles => {
            let compiled = build_styles(&config, cli.verbose)?;
            println!("Compiled {} style files", compiled);
            Ok(())
        }
        Commands::Components => {
            build_components(&config.components.dir, &config.components.command)
        }
        Commands::Rewrite => {
            let report = rewrite_bundles(&config.output.dir, &config, cli.verbose)?;
            println!(
                "Rewrote {} of {} bundle assets",
                report.rewritten, report.scanned
            );
            Ok(())
        }
    }
}

fn print_clean_summary(report: &CleanReport, options: CleanOptions) {
    let verb = if options.dry_run {
        "Would remove"
    } else {
        "Removed"
    };
    println!(
        "{} {} files and {} directories",
        verb, report.files_removed, report.dirs_removed
    );
    if report.files_retained > 0 || report.dirs_skipped > 0 {
        println!(
            "Retained {} files, skipped {} dependency directories",
            report.files_retained, report.dirs_skipped
        );
    }
    if options.calculate_sizes {
        let label = if options.dry_run {
            "Would reclaim"
        } else {
            "Reclaimed"
        };
        println!(
            "{}",
            format!("{}: {}", label, format_size(report.bytes_reclaimed, BINARY)).green()
        );
    }
}
