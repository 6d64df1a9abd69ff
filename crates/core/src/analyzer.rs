use crate::archive::{read_lossy, ProjectArchive, ProjectLayout};
use crate::classifier::Classifier;
use crate::config::{AnalyzerConfig, ConfigError};
use crate::descriptor::parse_descriptor;
use crate::events::count_events;
use crate::extensions::{collapse_duplicates, extract_extensions};
use crate::media::list_media_files;
use crate::metadata::extract_project_metadata;
use crate::models::{AnalysisRecord, ComponentCount, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};
use zip::result::ZipError;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Não foi possível localizar o arquivo {}.", .0.display())]
    Missing(PathBuf),
    #[error("Falha ao abrir o arquivo .aia como um arquivo zip.")]
    NotAnArchive {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Zip error in {entry}: {source}")]
    Zip {
        entry: String,
        #[source]
        source: ZipError,
    },
    #[error("Failed to walk unpacked project: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{entry} is not valid UTF-8")]
    Encoding { entry: String },
    #[error("Invalid extension manifest {entry}: {source}")]
    ExtensionManifest {
        entry: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Missing(_) => ErrorKind::Missing,
            AnalysisError::NotAnArchive { .. } => ErrorKind::NotAnArchive,
            _ => ErrorKind::Processing,
        }
    }

    /// Text reported in place of a record for the archive at `path`
    pub fn placeholder(&self, path: &Path) -> String {
        match self.kind() {
            ErrorKind::Missing | ErrorKind::NotAnArchive => self.to_string(),
            ErrorKind::Processing => {
                format!("Erro ao processar o arquivo {}: {}", path.display(), self)
            }
        }
    }
}

/// Analyzes one `.aia` archive into an [`AnalysisRecord`]
pub struct ArchiveAnalyzer {
    config: AnalyzerConfig,
    layout: ProjectLayout,
}

impl ArchiveAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        let layout = ProjectLayout::new()?;
        Ok(Self { config, layout })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze the archive at `path`.
    ///
    /// The archive is unpacked into a scratch directory that is removed before
    /// this returns, whether analysis succeeded or not.
    pub fn analyze(&self, path: &Path) -> Result<AnalysisRecord, AnalysisError> {
        let start = Instant::now();

        // 1-2. Missing file and non-zip content are reported distinctly
        let mut archive = ProjectArchive::open(path)?;

        // 3. Unpack, dropped at the end of this scope
        let unpacked = archive.unpack(self.config.scratch_dir.as_deref())?;

        // 4. Media, metadata and per-screen files
        let media = list_media_files(archive.entry_names());
        let descriptors = unpacked.descriptor_files(&self.layout)?;
        let code_blocks = unpacked.code_block_files(&self.layout)?;
        let project_info =
            extract_project_metadata(&mut archive, &descriptors, &self.config.source_host)?;

        // 5. Descriptor scan
        let mut components = Vec::new();
        let mut operators = 0;
        let mut variables = 0;
        for descriptor in &descriptors {
            let content = read_lossy(descriptor)?;
            let stats = parse_descriptor(&content, &self.config.inference);
            debug!(
                descriptor = %descriptor.display(),
                components = stats.components.len(),
                "parsed descriptor"
            );
            components.extend(stats.components);
            operators += stats.operators;
            variables += stats.variables;
        }

        // 6. Category summaries
        let classifier = Classifier::new(&self.config.catalogs, &self.config.inference);
        let categories = classifier.summarize(&components);

        // 7. Extensions straight from the zip index
        let extensions = collapse_duplicates(extract_extensions(&mut archive)?);

        // 8. Event handlers
        let mut events = 0;
        for code_block in &code_blocks {
            events += count_events(&read_lossy(code_block)?);
        }

        // 9. Component multiset and AI subset
        let ai_components = classifier.classify_ai(&components);
        let component_counts = ComponentCount::tally(&components);

        let aia_file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        info!(
            archive = %aia_file,
            screens = descriptors.len(),
            components = components.len(),
            events,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "analyzed archive"
        );

        // 10. Assemble
        Ok(AnalysisRecord {
            aia_file,
            project_info,
            components: component_counts,
            ai_components,
            screens: descriptors.len(),
            operators,
            variables,
            events,
            extensions,
            media,
            categories,
        })
    }
}
