//! Pipeline orchestration: clean the output, then compile styles and
//! build the component package in parallel, then rewrite the emitted
//! bundles.

use crate::clean::{clean_output, CleanOptions};
use crate::components::build_components;
use crate::config::BuildConfig;
use crate::rewrite::rewrite_bundles;
use crate::styles::build_styles;

use anyhow::{Context, Result};
use colored::Colorize;
use std::time::Instant;

/// Run a named pipeline step with timing
fn run_step<T>(name: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    println!("{}", format!("==> {}", name).bold());
    let start = Instant::now();
    let value = f().with_context(|| format!("step '{}' failed", name))?;
    println!(
        "  {} {} ({:.2}s)",
        "ok".green(),
        name,
        start.elapsed().as_secs_f64()
    );
    Ok(value)
}

/// Run the full pipeline. Steps after a failed barrier never run, and a
/// failing step surfaces its name alongside the underlying error.
pub fn run_pipeline(config: &BuildConfig, verbose: bool) -> Result<()> {
    run_step("clean output", || {
        clean_output(
            &config.output.dir,
            &config.output,
            CleanOptions {
                verbose,
                ..Default::default()
            },
        )
    })?;

    // Style compilation and the package build touch disjoint paths, so
    // both run at once. The join is the barrier before the rewrite pass.
    let (styles, components) = rayon::join(
        || run_step("compile styles", || build_styles(config, verbose)),
        || {
            run_step("build components", || {
                build_components(&config.components.dir, &config.components.command)
            })
        },
    );
    if styles.is_err() {
        if let Err(err) = &components {
            eprintln!("{:#}", err);
        }
    }
    styles?;
    components?;

    let report = run_step("rewrite bundles", || {
        rewrite_bundles(&config.output.dir, config, verbose)
    })?;
    println!(
        "Rewrote {} of {} bundle assets",
        report.rewritten, report.scanned
    );

    Ok(())
}
