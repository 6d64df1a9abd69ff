use crate::catalog::CatalogSet;
use crate::descriptor::InferenceHint;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Host recorded as the origin of every analyzed project
pub const DEFAULT_SOURCE_HOST: &str = "ai2.appinventor.mit.edu";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to build glob pattern: {0}")]
    GlobError(#[from] globset::Error),
    #[error("Failed to parse catalog file: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Invalid pattern {pattern:?} in category {category}")]
    InvalidPattern { category: String, pattern: String },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Configuration for archive analysis
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Component catalogs used for classification
    pub catalogs: CatalogSet,
    /// Constant reported as the project source host
    pub source_host: String,
    /// Keyword heuristic for the external inference service
    pub inference: InferenceHint,
    /// Parent directory for scratch extraction (system temp dir when unset)
    pub scratch_dir: Option<PathBuf>,
    /// Number of threads for batch analysis (1 = sequential, 0 = auto)
    pub threads: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            catalogs: CatalogSet::default(),
            source_host: DEFAULT_SOURCE_HOST.to_string(),
            inference: InferenceHint::default(),
            scratch_dir: None,
            threads: 1,
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalogs(mut self, catalogs: CatalogSet) -> Self {
        self.catalogs = catalogs;
        self
    }

    /// Replace the built-in catalogs with the ones from a TOML file
    pub fn with_catalog_file(self, path: &Path) -> Result<Self, ConfigError> {
        let catalogs = CatalogSet::load(path)?;
        Ok(self.with_catalogs(catalogs))
    }

    pub fn with_source_host(mut self, host: impl Into<String>) -> Self {
        self.source_host = host.into();
        self
    }

    pub fn with_inference_hint(mut self, hint: InferenceHint) -> Self {
        self.inference = hint;
        self
    }

    pub fn with_scratch_dir(mut self, dir: PathBuf) -> Self {
        self.scratch_dir = Some(dir);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}
