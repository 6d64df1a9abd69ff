//! Access to `.aia` project archives
//!
//! An archive is opened once, its entry index is read in enumeration order,
//! and it can be unpacked into a scratch directory that is removed when the
//! returned [`UnpackedProject`] is dropped.

use crate::analyzer::AnalysisError;
use crate::config::ConfigError;
use globset::{GlobBuilder, GlobMatcher};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::ZipArchive;

/// Structural descriptor files, one per screen
pub const DESCRIPTOR_GLOB: &str = "src/appinventor/*/*/*.scm";
/// Code-block files, one per screen
pub const CODE_BLOCK_GLOB: &str = "src/appinventor/*/*/*.bky";

/// Upper bound on the buffer reserved up front for an entry read. The size
/// recorded in the archive is untrusted.
const MAX_PREALLOCATED_ENTRY: u64 = 1 << 20;

/// Matchers for the per-screen files of an unpacked project
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    descriptors: GlobMatcher,
    code_blocks: GlobMatcher,
}

impl ProjectLayout {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            descriptors: Self::matcher(DESCRIPTOR_GLOB)?,
            code_blocks: Self::matcher(CODE_BLOCK_GLOB)?,
        })
    }

    fn matcher(pattern: &str) -> Result<GlobMatcher, globset::Error> {
        // `*` must stay within one path segment
        Ok(GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()?
            .compile_matcher())
    }

    pub fn is_descriptor(&self, relative: &Path) -> bool {
        !is_hidden(relative) && self.descriptors.is_match(relative)
    }

    pub fn is_code_block(&self, relative: &Path) -> bool {
        !is_hidden(relative) && self.code_blocks.is_match(relative)
    }
}

/// Wildcards never match a segment starting with `.`
fn is_hidden(relative: &Path) -> bool {
    relative
        .components()
        .any(|component| component.as_os_str().to_string_lossy().starts_with('.'))
}

/// An opened project archive
pub struct ProjectArchive {
    path: PathBuf,
    zip: ZipArchive<File>,
    names: Vec<String>,
}

impl ProjectArchive {
    /// Open an archive, distinguishing missing files from non-zip content
    pub fn open(path: &Path) -> Result<Self, AnalysisError> {
        if !path.exists() {
            return Err(AnalysisError::Missing(path.to_path_buf()));
        }
        if path.is_dir() {
            return Err(AnalysisError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "is a directory"),
            });
        }

        let file = File::open(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut zip = ZipArchive::new(file).map_err(|source| AnalysisError::NotAnArchive {
            path: path.to_path_buf(),
            source,
        })?;

        let mut names = Vec::with_capacity(zip.len());
        for index in 0..zip.len() {
            let entry = zip
                .by_index_raw(index)
                .map_err(|source| AnalysisError::Zip {
                    entry: format!("#{}", index),
                    source,
                })?;
            names.push(entry.name().to_string());
        }

        debug!(archive = %path.display(), entries = names.len(), "opened archive");

        Ok(Self {
            path: path.to_path_buf(),
            zip,
            names,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry names in archive enumeration order
    pub fn entry_names(&self) -> &[String] {
        &self.names
    }

    /// Read an entry's raw bytes, `None` when the archive has no such entry
    pub fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, AnalysisError> {
        let mut entry = match self.zip.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(source) => {
                return Err(AnalysisError::Zip {
                    entry: name.to_string(),
                    source,
                })
            }
        };

        let mut buf = Vec::with_capacity(entry.size().min(MAX_PREALLOCATED_ENTRY) as usize);
        entry
            .read_to_end(&mut buf)
            .map_err(|source| AnalysisError::Io {
                path: self.path.join(name),
                source,
            })?;
        Ok(Some(buf))
    }

    /// Extract every entry into a fresh scratch directory under `parent`
    /// (the system temp dir when `None`)
    pub fn unpack(&mut self, parent: Option<&Path>) -> Result<UnpackedProject, AnalysisError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("aia-scope-");
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|source| AnalysisError::Io {
            path: parent.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir),
            source,
        })?;

        self.zip
            .extract(dir.path())
            .map_err(|source| AnalysisError::Zip {
                entry: self.path.display().to_string(),
                source,
            })?;

        debug!(archive = %self.path.display(), scratch = %dir.path().display(), "unpacked archive");

        Ok(UnpackedProject { dir })
    }
}

/// An archive unpacked into a scratch directory, deleted on drop
pub struct UnpackedProject {
    dir: TempDir,
}

impl UnpackedProject {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Descriptor files, sorted by path
    pub fn descriptor_files(&self, layout: &ProjectLayout) -> Result<Vec<PathBuf>, AnalysisError> {
        self.find(|relative| layout.is_descriptor(relative))
    }

    /// Code-block files, sorted by path
    pub fn code_block_files(&self, layout: &ProjectLayout) -> Result<Vec<PathBuf>, AnalysisError> {
        self.find(|relative| layout.is_code_block(relative))
    }

    fn find<F>(&self, matches: F) -> Result<Vec<PathBuf>, AnalysisError>
    where
        F: Fn(&Path) -> bool,
    {
        let root = self.root();
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if matches(relative) {
                files.push(entry.path().to_path_buf());
            }
        }

        Ok(files)
    }
}

/// Read a file, replacing invalid UTF-8 sequences
pub fn read_lossy(path: &Path) -> Result<String, AnalysisError> {
    let bytes = fs::read(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
