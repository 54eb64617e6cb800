//! Style source discovery and compilation into the build output.

use crate::config::BuildConfig;
use anyhow::{bail, Context, Result};
use crossbeam_channel::{bounded, Sender};
use ignore::WalkBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::thread;

/// Compile every style source under the configured source directory into
/// the build-output root, mirroring each source's relative path with the
/// compiled extension. Returns the number of files compiled.
pub fn build_styles(config: &BuildConfig, verbose: bool) -> Result<usize> {
    let source_dir = &config.styles.source_dir;
    if !source_dir.is_dir() {
        bail!(
            "Style source directory {} does not exist",
            source_dir.display()
        );
    }

    let progress = Arc::new(ProgressBar::new_spinner());
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    progress.enable_steady_tick(std::time::Duration::from_millis(100));

    // Stream sources from a discovery thread into a worker pool so
    // compilation starts before the walk finishes.
    let (sender, receiver) = bounded::<PathBuf>(100);

    let walk_root = source_dir.clone();
    let skip = config.output.skip.clone();
    let extension = config.styles.extension.clone();
    let progress_clone = Arc::clone(&progress);
    let producer_handle = thread::spawn(move || {
        discover_sources(&walk_root, &skip, &extension, sender, progress_clone)
    });

    let compiled: Vec<PathBuf> = receiver
        .into_iter()
        .par_bridge()
        .map(|source| {
            let dest = destination_for(&source, config)?;
            compile_source(&source, &dest, &config.styles.command)?;
            if verbose {
                println!("Compiled {} -> {}", source.display(), dest.display());
            }
            progress.inc(1);
            progress.set_message(format!("Compiled {}", source.display()));
            Ok(source)
        })
        .collect::<Result<Vec<_>>>()?;

    producer_handle
        .join()
        .map_err(|_| anyhow::anyhow!("Style discovery thread panicked"))??;

    progress.finish_with_message(format!("Compiled {} style files", compiled.len()));
    Ok(compiled.len())
}

/// Walk the source tree and send every compilable style source to the
/// channel. Partials (leading underscore) only exist to be imported, so
/// they are not compiled on their own.
fn discover_sources(
    root: &Path,
    skip: &[String],
    extension: &str,
    sender: Sender<PathBuf>,
    progress: Arc<ProgressBar>,
) -> Result<()> {
    let skip = skip.to_vec();
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(false)
        .ignore(false)
        .git_global(false)
        .git_exclude(false)
        .filter_entry(move |entry| {
            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                if let Some(name) = entry.path().file_name().and_then(|n| n.to_str()) {
                    if skip.iter().any(|s| s == name) {
                        return false;
                    }
                }
            }
            true
        })
        .build();

    let mut found = 0u64;
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!("Warning: Failed to access entry during discovery: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('_'))
        {
            continue;
        }

        found += 1;
        progress.set_message(format!("Discovered {} style sources", found));
        if sender.send(path.to_path_buf()).is_err() {
            // Receiver dropped, stop discovering
            break;
        }
    }

    Ok(())
}

/// Map a source file to its compiled path under the build root.
fn destination_for(source: &Path, config: &BuildConfig) -> Result<PathBuf> {
    let relative = source
        .strip_prefix(&config.styles.source_dir)
        .with_context(|| {
            format!(
                "Style source {} is outside {}",
                source.display(),
                config.styles.source_dir.display()
            )
        })?;
    Ok(config
        .output
        .dir
        .join(relative)
        .with_extension(&config.styles.out_extension))
}

fn compile_source(source: &Path, dest: &Path, command: &[String]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let output = Command::new(&command[0])
        .args(&command[1..])
        .arg(source)
        .arg(dest)
        .output()
        .with_context(|| format!("Failed to run style compiler `{}`", command[0]))?;

    if !output.status.success() {
        bail!(
            "Style compiler failed on {}: {}",
            source.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(())
}
