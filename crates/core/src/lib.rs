//! AIA Scope Core Library
//!
//! This library inventories App Inventor project archives (`.aia` files):
//! declared components, bundled extensions, media assets, category usage and
//! a few lexical complexity counters.
//!
//! # Features
//!
//! - Unpack each archive into a scratch directory that is always cleaned up
//! - Extract component types, variables and operators from screen descriptors (`.scm`)
//! - Count event-handler blocks in code-block documents (`.bky`)
//! - Read app name, version and timestamp from `project.properties`
//! - Classify components into AI, drawing, maps, sensors, social, storage and
//!   connectivity categories using configurable pattern catalogs
//! - Analyze batches of archives with per-archive failure isolation
//! - Output results in JSON, YAML or a plain-text summary
//!
//! # Example
//!
//! ```no_run
//! use aia_scope_core::{analyze_batch, format_output, AnalyzerConfig, ArchiveAnalyzer, OutputFormat};
//! use std::path::PathBuf;
//!
//! let analyzer = ArchiveAnalyzer::new(AnalyzerConfig::default()).unwrap();
//! let report = analyze_batch(&analyzer, &[PathBuf::from("HelloPurr.aia")]);
//!
//! let json = format_output(&report, OutputFormat::Json).unwrap();
//! println!("{}", json);
//! ```

pub mod analyzer;
pub mod archive;
pub mod batch;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod descriptor;
pub mod events;
pub mod extensions;
pub mod media;
pub mod metadata;
pub mod models;
pub mod output;

// Re-exports for convenience
pub use analyzer::{AnalysisError, ArchiveAnalyzer};
pub use batch::{analyze_batch, analyze_source, ArchiveSource};
pub use catalog::{Catalog, CatalogSet, Pattern};
pub use classifier::Classifier;
pub use config::{AnalyzerConfig, ConfigError};
pub use descriptor::InferenceHint;
pub use models::*;
pub use output::{format_output, format_summary, FormatError, OutputFormat};
