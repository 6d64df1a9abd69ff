mod json;
mod yaml;

pub use json::{to_json, to_json_compact};
pub use yaml::to_yaml;

use crate::models::{BatchReport, Row};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    JsonCompact,
    Yaml,
    Summary,
}

/// Format a BatchReport according to the specified format
pub fn format_output(report: &BatchReport, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::JsonCompact => to_json_compact(report),
        OutputFormat::Yaml => to_yaml(report),
        OutputFormat::Summary => Ok(format_summary(report)),
    }
}

/// Generate a human-readable summary, one block per archive.
///
/// Failed archives are printed as their placeholder message.
pub fn format_summary(report: &BatchReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "AIA Analysis Summary\n\
         ====================\n\
         Archives: {} (analyzed: {}, failed: {})\n\n",
        report.stats.total_archives, report.stats.analyzed, report.stats.failed
    ));

    for (index, row) in report.rows.iter().enumerate() {
        match row {
            Row::Analyzed(record) => {
                output.push_str(&format!("[{}] {}\n", index, record.aia_file));
                for (label, value) in record.columns().into_iter().skip(1) {
                    output.push_str(&format!("  {}: {}\n", label, value));
                }
            }
            Row::Failed(failed) => {
                output.push_str(&format!("[{}] {}\n", index, failed.message));
            }
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Screens: {}, Events: {}\n\
         Duration: {}ms ({:.2} archives/sec)\n\
         Timestamp: {}\n\
         Tool Version: {}\n",
        report.stats.total_screens,
        report.stats.total_events,
        report.metadata.duration_ms,
        report.metadata.archives_per_second,
        report.metadata.timestamp,
        report.metadata.tool_version
    ));

    output
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AnalysisRecord, BatchStats, CategorySummaries, ComponentCount, ErrorKind, FailedArchive,
        ProjectMetadata, ReportMetadata,
    };

    fn report() -> BatchReport {
        let record = AnalysisRecord {
            aia_file: "quiz.aia".to_string(),
            project_info: ProjectMetadata::unresolved("ai2.appinventor.mit.edu"),
            components: ComponentCount::tally(&["Map".to_string(), "Map".to_string()]),
            ai_components: vec![],
            screens: 1,
            operators: 3,
            variables: 2,
            events: 4,
            extensions: vec![],
            media: vec![],
            categories: CategorySummaries {
                maps: vec!["Map".to_string(), "Map".to_string()],
                ..Default::default()
            },
        };
        let rows = vec![
            Row::Analyzed(record),
            Row::Failed(FailedArchive {
                archive: "bad.aia".to_string(),
                kind: ErrorKind::NotAnArchive,
                message: "Falha ao abrir o arquivo .aia como um arquivo zip.".to_string(),
            }),
        ];

        BatchReport {
            stats: BatchStats::from_rows(&rows),
            rows,
            metadata: ReportMetadata::default(),
        }
    }

    #[test]
    fn test_format_summary() {
        let summary = format_summary(&report());

        assert!(summary.contains("Archives: 2 (analyzed: 1, failed: 1)"));
        assert!(summary.contains("[0] quiz.aia"));
        assert!(summary.contains("  components: Map (2 x)"));
        assert!(summary.contains("  Maps: Map, Map"));
        assert!(summary.contains("  events: 4"));
        assert!(summary.contains("[1] Falha ao abrir o arquivo .aia como um arquivo zip."));
    }

    #[test]
    fn test_json_and_yaml_carry_display_strings() {
        let report = report();

        let json = format_output(&report, OutputFormat::Json).unwrap();
        assert!(json.contains("\"components\": \"Map (2 x)\""));
        assert!(json.contains(
            "\"project_info\": \"Timestamp: N/A, App Name: N/A, Version: N/A, AuthURL: ai2.appinventor.mit.edu\""
        ));
        assert!(json.contains("\"Maps\": \"Map, Map\""));

        let yaml = format_output(&report, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("Map (2 x)"));
    }

    #[test]
    fn test_format_output_dispatch() {
        let report = report();
        assert!(format_output(&report, OutputFormat::Json)
            .unwrap()
            .starts_with('{'));
        assert!(format_output(&report, OutputFormat::Yaml)
            .unwrap()
            .contains("rows:"));
        assert!(format_output(&report, OutputFormat::Summary)
            .unwrap()
            .starts_with("AIA Analysis Summary"));
    }
}
