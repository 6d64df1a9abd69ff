use crate::models::BatchReport;
use super::FormatError;

/// Serialize a BatchReport to YAML
pub fn to_yaml(report: &BatchReport) -> Result<String, FormatError> {
    serde_yaml::to_string(report).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchStats, ReportMetadata};

    #[test]
    fn test_to_yaml() {
        let report = BatchReport {
            rows: vec![],
            stats: BatchStats::default(),
            metadata: ReportMetadata::default(),
        };

        let yaml = to_yaml(&report).unwrap();
        assert!(yaml.contains("rows:"));
        assert!(yaml.contains("stats:"));
    }
}
