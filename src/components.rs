//! Component package build step.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Run the component package build command in the components directory.
///
/// Stdio is inherited so the underlying tool's own progress output
/// reaches the user directly.
pub fn build_components(dir: &Path, command: &[String]) -> Result<()> {
    if !dir.is_dir() {
        bail!("Components directory {} does not exist", dir.display());
    }

    let display = command.join(" ");
    let status = Command::new(&command[0])
        .args(&command[1..])
        .current_dir(dir)
        .status()
        .with_context(|| format!("Failed to run `{}` in {}", display, dir.display()))?;

    if !status.success() {
        bail!("`{}` exited with {}", display, status);
    }

    Ok(())
}
