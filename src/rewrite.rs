//! Post-processing of emitted bundle assets.
//!
//! The bundler externalizes style imports, so the emitted module text
//! still references style sources by their source extension. This pass
//! rewrites those references to the compiled extension, re-emitting each
//! asset under its unchanged name.

use crate::config::BuildConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Counts from a rewrite pass over the build output.
#[derive(Debug, Default)]
pub struct RewriteReport {
    pub scanned: u64,
    pub rewritten: u64,
}

/// Rewrite style-source extension references inside every bundle text
/// asset under `root`. A missing root means nothing was emitted yet and
/// is a no-op.
pub fn rewrite_bundles(root: &Path, config: &BuildConfig, verbose: bool) -> Result<RewriteReport> {
    let mut report = RewriteReport::default();
    if !root.exists() {
        return Ok(report);
    }

    let skip = &config.output.skip;
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        if !entry.file_type().is_dir() {
            return true;
        }
        entry
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(true, |name| !skip.iter().any(|s| s == name))
    });

    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to walk bundle output {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_asset = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| config.bundle.assets.iter().any(|a| a == ext));
        if !is_asset {
            continue;
        }

        report.scanned += 1;
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read bundle asset {}", path.display()))?;

        // Matches the bundler hook: a global substring replacement.
        let replaced = text.replace(&config.bundle.from, &config.bundle.to);
        if replaced != text {
            fs::write(path, replaced)
                .with_context(|| format!("Failed to rewrite {}", path.display()))?;
            report.rewritten += 1;
            if verbose {
                println!("Rewrote {}", path.display());
            }
        }
    }

    Ok(report)
}
