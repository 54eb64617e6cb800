//! Tino Build - Component Library Packaging Pipeline
//!
//! tino-build drives the packaging pipeline for the Tino Design UI
//! component library. It empties the build-output directory while keeping
//! the package manifest and readme in place (and leaving dependency
//! caches alone), then compiles style sources and runs the component
//! package build in parallel, and finally rewrites style-source extension
//! references inside the emitted bundles.
//!
//! ## Architecture
//!
//! - Cleaning recurses per directory level with a join barrier, so a
//!   directory is only removed once every child beneath it has settled.
//! - The retain set and the skipped dependency-cache names are explicit
//!   configuration, not constants; see `tino-build.toml`.

pub mod clean;
pub mod components;
pub mod config;
pub mod pipeline;
pub mod rewrite;
pub mod styles;

// Re-export commonly used items
pub use clean::{clean_output, CleanOptions, CleanReport};
pub use components::build_components;
pub use config::{BuildConfig, OutputConfig};
pub use pipeline::run_pipeline;
pub use rewrite::{rewrite_bundles, RewriteReport};
pub use styles::build_styles;
