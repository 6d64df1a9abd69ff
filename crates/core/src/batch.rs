use crate::analyzer::ArchiveAnalyzer;
use crate::models::{BatchReport, BatchStats, FailedArchive, ReportMetadata, Row};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

/// Anything that can hand over a local path to an archive, such as an
/// uploaded file persisted by a presentation layer
pub trait ArchiveSource {
    fn resolve_to_local_path(&self) -> PathBuf;
}

impl ArchiveSource for Path {
    fn resolve_to_local_path(&self) -> PathBuf {
        self.to_path_buf()
    }
}

impl ArchiveSource for PathBuf {
    fn resolve_to_local_path(&self) -> PathBuf {
        self.clone()
    }
}

impl ArchiveSource for str {
    fn resolve_to_local_path(&self) -> PathBuf {
        PathBuf::from(self)
    }
}

impl ArchiveSource for String {
    fn resolve_to_local_path(&self) -> PathBuf {
        PathBuf::from(self)
    }
}

impl<T: ArchiveSource + ?Sized> ArchiveSource for &T {
    fn resolve_to_local_path(&self) -> PathBuf {
        (**self).resolve_to_local_path()
    }
}

/// Analyze a single source, turning any failure into a placeholder row
pub fn analyze_source<S: ArchiveSource + ?Sized>(analyzer: &ArchiveAnalyzer, source: &S) -> Row {
    let path = source.resolve_to_local_path();

    match analyzer.analyze(&path) {
        Ok(record) => Row::Analyzed(record),
        Err(err) => {
            warn!(archive = %path.display(), kind = ?err.kind(), "{}", err);
            Row::Failed(FailedArchive {
                archive: path.display().to_string(),
                kind: err.kind(),
                message: err.placeholder(&path),
            })
        }
    }
}

/// Analyze every source and return one row per source, in input order.
///
/// A failing archive never aborts the batch. With `threads == 1` archives are
/// processed sequentially; otherwise they are fanned out on a rayon pool
/// (0 = rayon's default size) and collected back in order.
pub fn analyze_batch<S>(analyzer: &ArchiveAnalyzer, sources: &[S]) -> BatchReport
where
    S: ArchiveSource + Sync,
{
    let start = Instant::now();
    let threads = analyzer.config().threads;

    let rows: Vec<Row> = if threads == 1 {
        sources
            .iter()
            .map(|source| analyze_source(analyzer, source))
            .collect()
    } else {
        let pool = if threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .ok()
        } else {
            None
        };

        let analyze_all = || -> Vec<Row> {
            sources
                .par_iter()
                .map(|source| analyze_source(analyzer, source))
                .collect()
        };

        match pool {
            Some(pool) => pool.install(analyze_all),
            None => analyze_all(),
        }
    };

    let duration = start.elapsed();
    let stats = BatchStats::from_rows(&rows);
    let metadata = ReportMetadata {
        duration_ms: duration.as_millis() as u64,
        archives_per_second: if duration.as_secs_f64() > 0.0 {
            rows.len() as f64 / duration.as_secs_f64()
        } else {
            0.0
        },
        ..Default::default()
    };

    BatchReport {
        rows,
        stats,
        metadata,
    }
}
