//! Pipeline configuration loading from TOML.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Complete pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    pub output: OutputConfig,
    pub styles: StylesConfig,
    pub components: ComponentsConfig,
    pub bundle: BundleConfig,
}

/// Where the packaged library lands and what cleaning must preserve.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Build-output root. Cleaned but never deleted.
    pub dir: PathBuf,
    /// File names preserved during cleaning regardless of depth.
    pub retain: Vec<String>,
    /// Directory names whose subtrees cleaning never enters.
    pub skip: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StylesConfig {
    /// Directory scanned for style sources.
    pub source_dir: PathBuf,
    /// Style source extension, without the leading dot.
    pub extension: String,
    /// Extension the compiler writes, without the leading dot.
    pub out_extension: String,
    /// Compiler invocation; source and destination paths are appended.
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentsConfig {
    /// Directory the package build command runs in.
    pub dir: PathBuf,
    pub command: Vec<String>,
}

/// Post-processing applied to emitted bundle text.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleConfig {
    /// Extensions of emitted assets to post-process.
    pub assets: Vec<String>,
    /// Token replaced globally inside each asset.
    pub from: String,
    pub to: String,
}

// Embed the default configuration in the binary at compile time
const DEFAULT_CONFIG: &str = include_str!("../tino-build.toml");

impl BuildConfig {
    /// Built-in defaults matching the component library checkout layout.
    pub fn embedded() -> Result<Self> {
        let config: BuildConfig =
            toml::from_str(DEFAULT_CONFIG).context("Failed to parse embedded configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk instead of the embedded defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: BuildConfig = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        // Retain and skip entries match single path components by name,
        // so a separator can never match anything.
        for name in self.output.retain.iter().chain(self.output.skip.iter()) {
            if name.is_empty() || name.contains('/') || name.contains('\\') {
                anyhow::bail!("retain/skip entries must be bare file names, got: {:?}", name);
            }
        }
        if self.styles.command.is_empty() {
            anyhow::bail!("styles.command must name a compiler executable");
        }
        if self.components.command.is_empty() {
            anyhow::bail!("components.command must name a build command");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = BuildConfig::embedded().unwrap();
        assert_eq!(config.output.dir, PathBuf::from("package"));
        assert!(config.output.retain.iter().any(|f| f == "package.json"));
        assert!(config.output.retain.iter().any(|f| f == "README.md"));
        assert!(config.output.skip.iter().any(|d| d == "node_modules"));
    }

    #[test]
    fn test_embedded_style_commands() {
        let config = BuildConfig::embedded().unwrap();
        assert_eq!(config.styles.extension, "scss");
        assert_eq!(config.styles.out_extension, "css");
        assert!(!config.styles.command.is_empty());
        assert!(!config.components.command.is_empty());
    }

    #[test]
    fn test_retain_entry_with_separator_rejected() {
        let mut config = BuildConfig::embedded().unwrap();
        config.output.retain.push("docs/README.md".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_command_rejected() {
        let mut config = BuildConfig::embedded().unwrap();
        config.styles.command.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file_errors() {
        let result = BuildConfig::from_path(Path::new("/does/not/exist/tino-build.toml"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file"));
    }
}
