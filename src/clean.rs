//! Recursive cleaning of the build-output directory.
//!
//! Empties the output root of everything except the retained file names,
//! leaves skip-listed subtrees (the dependency cache) untouched, and
//! removes directories that end up empty, bottom-up. The root itself is
//! only ever emptied, never deleted, so later pipeline steps can write
//! into it.

use crate::config::OutputConfig;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::Path;

/// Options controlling clean behavior (runtime flags)
#[derive(Clone, Copy, Default)]
pub struct CleanOptions {
    pub dry_run: bool,
    pub verbose: bool,
    pub calculate_sizes: bool,
}

/// Tally of what a clean pass removed (or would remove, under dry run).
#[derive(Debug, Default)]
pub struct CleanReport {
    pub files_removed: u64,
    pub dirs_removed: u64,
    pub bytes_reclaimed: u64,
    pub files_retained: u64,
    pub dirs_skipped: u64,
}

impl CleanReport {
    fn absorb(&mut self, other: CleanReport) {
        self.files_removed += other.files_removed;
        self.dirs_removed += other.dirs_removed;
        self.bytes_reclaimed += other.bytes_reclaimed;
        self.files_retained += other.files_retained;
        self.dirs_skipped += other.dirs_skipped;
    }
}

/// Outcome of cleaning one directory level.
struct LevelOutcome {
    /// Nothing beneath this directory survived.
    cleared: bool,
    report: CleanReport,
}

/// Empty the build-output root of non-retained content.
///
/// A missing root is already clean and returns an empty report. Any I/O
/// error aborts the run, except that a delete target which vanished
/// mid-traversal counts as already removed.
pub fn clean_output(
    root: &Path,
    output: &OutputConfig,
    options: CleanOptions,
) -> Result<CleanReport> {
    if !root.exists() {
        return Ok(CleanReport::default());
    }

    // The root is emptied but never removed, whatever clean_dir reports.
    let outcome = clean_dir(root, output, options)?;
    Ok(outcome.report)
}

fn clean_dir(dir: &Path, output: &OutputConfig, options: CleanOptions) -> Result<LevelOutcome> {
    let entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .collect::<io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read an entry in {}", dir.display()))?
        .into_iter()
        .map(|entry| entry.path())
        .collect();

    // Siblings are independent; the collect is the barrier that keeps the
    // parent from being removed before every child has settled.
    let outcomes = entries
        .par_iter()
        .map(|path| clean_entry(path, output, options))
        .collect::<Result<Vec<_>>>()?;

    let mut report = CleanReport::default();
    let mut cleared = true;
    for outcome in outcomes {
        cleared &= outcome.cleared;
        report.absorb(outcome.report);
    }

    Ok(LevelOutcome { cleared, report })
}

fn clean_entry(path: &Path, output: &OutputConfig, options: CleanOptions) -> Result<LevelOutcome> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    // symlink_metadata so a symlinked directory is treated as a plain
    // entry and its target is never traversed or deleted through.
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?;

    if metadata.is_dir() {
        if output.skip.iter().any(|skip| skip == name.as_ref()) {
            if options.verbose {
                println!("Skipping {}", path.display());
            }
            return Ok(LevelOutcome {
                cleared: false,
                report: CleanReport {
                    dirs_skipped: 1,
                    ..Default::default()
                },
            });
        }

        let mut outcome = clean_dir(path, output, options)?;
        if outcome.cleared {
            remove_dir(path, options)?;
            outcome.report.dirs_removed += 1;
        }
        return Ok(outcome);
    }

    if output.retain.iter().any(|keep| keep == name.as_ref()) {
        if options.verbose {
            println!("Retaining {}", path.display());
        }
        return Ok(LevelOutcome {
            cleared: false,
            report: CleanReport {
                files_retained: 1,
                ..Default::default()
            },
        });
    }

    let size = if options.calculate_sizes {
        metadata.len()
    } else {
        0
    };
    remove_file(path, options)?;

    Ok(LevelOutcome {
        cleared: true,
        report: CleanReport {
            files_removed: 1,
            bytes_reclaimed: size,
            ..Default::default()
        },
    })
}

fn remove_file(path: &Path, options: CleanOptions) -> Result<()> {
    if options.dry_run {
        println!("Would remove: {}", path.display());
        return Ok(());
    }

    match fs::remove_file(path) {
        Ok(()) => {
            if options.verbose {
                println!("Removed: {}", path.display());
            }
            Ok(())
        }
        // A file that disappeared between listing and deletion is gone
        // either way. Anything else, permission errors included, aborts.
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to remove {}", path.display()))
        }
    }
}

fn remove_dir(path: &Path, options: CleanOptions) -> Result<()> {
    if options.dry_run {
        println!("Would remove directory: {}", path.display());
        return Ok(());
    }

    match fs::remove_dir(path) {
        Ok(()) => {
            if options.verbose {
                println!("Removed directory: {}", path.display());
            }
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to remove directory {}", path.display()))
        }
    }
}
