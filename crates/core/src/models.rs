use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Placeholder used for any metadata field that could not be resolved
pub const NOT_AVAILABLE: &str = "N/A";

/// Semantic group a component pattern belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// AI-related components (classifiers, chat bots, pose detection)
    Ai,
    DrawingAndAnimation,
    Maps,
    Sensors,
    Social,
    Storage,
    Connectivity,
}

impl Category {
    /// Every category, AI first
    pub const ALL: [Category; 7] = [
        Category::Ai,
        Category::DrawingAndAnimation,
        Category::Maps,
        Category::Sensors,
        Category::Social,
        Category::Storage,
        Category::Connectivity,
    ];

    /// The six categories summarized in every record
    pub const SUMMARIZED: [Category; 6] = [
        Category::DrawingAndAnimation,
        Category::Maps,
        Category::Sensors,
        Category::Social,
        Category::Storage,
        Category::Connectivity,
    ];

    /// Column label used in tabular output
    pub fn label(&self) -> &'static str {
        match self {
            Category::Ai => "IA components",
            Category::DrawingAndAnimation => "Drawing and Animation",
            Category::Maps => "Maps",
            Category::Sensors => "Sensors",
            Category::Social => "Social",
            Category::Storage => "Storage",
            Category::Connectivity => "Connectivity",
        }
    }

    /// Key used in catalog files
    pub fn key(&self) -> &'static str {
        match self {
            Category::Ai => "ai",
            Category::DrawingAndAnimation => "drawing_and_animation",
            Category::Maps => "maps",
            Category::Sensors => "sensors",
            Category::Social => "social",
            Category::Storage => "storage",
            Category::Connectivity => "connectivity",
        }
    }
}

/// Project-level metadata read from the archive manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Second line of the manifest, verbatim
    pub timestamp: String,
    pub app_name: String,
    pub app_version: String,
    /// Fixed host the projects are expected to come from
    pub source_host: String,
}

impl ProjectMetadata {
    /// Metadata with every derived field unresolved
    pub fn unresolved(source_host: &str) -> Self {
        Self {
            timestamp: NOT_AVAILABLE.to_string(),
            app_name: NOT_AVAILABLE.to_string(),
            app_version: NOT_AVAILABLE.to_string(),
            source_host: source_host.to_string(),
        }
    }
}

impl fmt::Display for ProjectMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timestamp: {}, App Name: {}, Version: {}, AuthURL: {}",
            self.timestamp, self.app_name, self.app_version, self.source_host
        )
    }
}

/// A declared component type and how many times it was declared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentCount {
    pub name: String,
    pub count: usize,
}

impl ComponentCount {
    /// Tally component names, keeping the order of first appearance
    pub fn tally(components: &[String]) -> Vec<ComponentCount> {
        let mut counts: Vec<ComponentCount> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for name in components {
            match index.get(name.as_str()) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(name.as_str(), counts.len());
                    counts.push(ComponentCount {
                        name: name.clone(),
                        count: 1,
                    });
                }
            }
        }

        counts
    }
}

impl fmt::Display for ComponentCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count > 1 {
            write!(f, "{} ({} x)", self.name, self.count)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Per-category classification results, multiplicity preserved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummaries {
    pub drawing_and_animation: Vec<String>,
    pub maps: Vec<String>,
    pub sensors: Vec<String>,
    pub social: Vec<String>,
    pub storage: Vec<String>,
    pub connectivity: Vec<String>,
}

impl CategorySummaries {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::DrawingAndAnimation => &self.drawing_and_animation,
            Category::Maps => &self.maps,
            Category::Sensors => &self.sensors,
            Category::Social => &self.social,
            Category::Storage => &self.storage,
            Category::Connectivity => &self.connectivity,
            Category::Ai => &[],
        }
    }

    /// Store the matches for a category. AI matches live on the record itself.
    pub fn set(&mut self, category: Category, matches: Vec<String>) {
        match category {
            Category::DrawingAndAnimation => self.drawing_and_animation = matches,
            Category::Maps => self.maps = matches,
            Category::Sensors => self.sensors = matches,
            Category::Social => self.social = matches,
            Category::Storage => self.storage = matches,
            Category::Connectivity => self.connectivity = matches,
            Category::Ai => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::SUMMARIZED.iter().all(|c| self.get(*c).is_empty())
    }
}

/// Inventory of a single analyzed archive.
///
/// Serializes the structured fields followed by a `display` map holding the
/// rendered [`AnalysisRecord::columns`].
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRecord {
    /// File name of the archive
    pub aia_file: String,
    pub project_info: ProjectMetadata,
    /// Component multiset in order of first declaration
    pub components: Vec<ComponentCount>,
    pub ai_components: Vec<String>,
    /// Number of structural descriptor files
    pub screens: usize,
    pub operators: usize,
    pub variables: usize,
    pub events: usize,
    /// Extension types, duplicates collapsed
    pub extensions: Vec<String>,
    pub media: Vec<String>,
    pub categories: CategorySummaries,
}

impl AnalysisRecord {
    /// Render the record as labelled display columns
    pub fn columns(&self) -> Vec<(&'static str, String)> {
        let mut columns = vec![
            ("aia_file", self.aia_file.clone()),
            ("project_info", self.project_info.to_string()),
            ("components", join_display(&self.components)),
            (Category::Ai.label(), self.ai_components.join(", ")),
            ("screens", self.screens.to_string()),
            ("operators", self.operators.to_string()),
            ("variables", self.variables.to_string()),
            ("events", self.events.to_string()),
            ("extensions", self.extensions.join(", ")),
            ("Media", self.media.join(", ")),
        ];

        for category in Category::SUMMARIZED {
            columns.push((category.label(), self.categories.get(category).join(", ")));
        }

        columns
    }
}

impl Serialize for AnalysisRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AnalysisRecord", 12)?;
        state.serialize_field("aia_file", &self.aia_file)?;
        state.serialize_field("project_info", &self.project_info)?;
        state.serialize_field("components", &self.components)?;
        state.serialize_field("ai_components", &self.ai_components)?;
        state.serialize_field("screens", &self.screens)?;
        state.serialize_field("operators", &self.operators)?;
        state.serialize_field("variables", &self.variables)?;
        state.serialize_field("events", &self.events)?;
        state.serialize_field("extensions", &self.extensions)?;
        state.serialize_field("media", &self.media)?;
        state.serialize_field("categories", &self.categories)?;
        state.serialize_field("display", &DisplayColumns(self))?;
        state.end()
    }
}

/// Labelled display columns of a record, serialized as an ordered map
struct DisplayColumns<'a>(&'a AnalysisRecord);

impl Serialize for DisplayColumns<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let columns = self.0.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for (label, value) in &columns {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why an archive could not be analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The path does not resolve to an existing file
    Missing,
    /// The file is not a readable zip container
    NotAnArchive,
    /// Any fault while inspecting an opened archive
    Processing,
}

/// Placeholder row for an archive that failed analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedArchive {
    pub archive: String,
    pub kind: ErrorKind,
    /// Human readable placeholder text
    pub message: String,
}

/// One row of a batch result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Row {
    Analyzed(AnalysisRecord),
    Failed(FailedArchive),
}

impl Row {
    pub fn is_analyzed(&self) -> bool {
        matches!(self, Row::Analyzed(_))
    }

    pub fn record(&self) -> Option<&AnalysisRecord> {
        match self {
            Row::Analyzed(record) => Some(record),
            Row::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailedArchive> {
        match self {
            Row::Analyzed(_) => None,
            Row::Failed(failed) => Some(failed),
        }
    }
}

/// Batch counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_archives: usize,
    pub analyzed: usize,
    pub failed: usize,
    pub total_screens: usize,
    pub total_events: usize,
}

impl BatchStats {
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut stats = BatchStats {
            total_archives: rows.len(),
            ..Default::default()
        };

        for row in rows {
            match row {
                Row::Analyzed(record) => {
                    stats.analyzed += 1;
                    stats.total_screens += record.screens;
                    stats.total_events += record.events;
                }
                Row::Failed(_) => stats.failed += 1,
            }
        }

        stats
    }
}

/// Batch metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub duration_ms: u64,
    pub archives_per_second: f64,
    pub timestamp: String,
    pub tool_version: String,
}

impl Default for ReportMetadata {
    fn default() -> Self {
        Self {
            duration_ms: 0,
            archives_per_second: 0.0,
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Ordered batch result, one row per input archive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub rows: Vec<Row>,
    pub stats: BatchStats,
    pub metadata: ReportMetadata,
}

impl BatchReport {
    /// Successfully analyzed records, in input order
    pub fn records(&self) -> impl Iterator<Item = &AnalysisRecord> {
        self.rows.iter().filter_map(Row::record)
    }

    /// Failed archives, in input order
    pub fn failures(&self) -> impl Iterator<Item = &FailedArchive> {
        self.rows.iter().filter_map(Row::failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tally_keeps_first_appearance_order() {
        let counts = ComponentCount::tally(&names(&["Button", "Label", "Button", "Canvas"]));

        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0].name, "Button");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].name, "Label");
        assert_eq!(counts[2].name, "Canvas");
    }

    #[test]
    fn test_component_count_display() {
        let counts = ComponentCount::tally(&names(&["Button", "Button", "Label"]));
        assert_eq!(counts[0].to_string(), "Button (2 x)");
        assert_eq!(counts[1].to_string(), "Label");
    }

    #[test]
    fn test_project_metadata_display() {
        let meta = ProjectMetadata {
            timestamp: "#Mon Jan 01".to_string(),
            app_name: "Quiz".to_string(),
            app_version: "1.0".to_string(),
            source_host: "ai2.appinventor.mit.edu".to_string(),
        };

        assert_eq!(
            meta.to_string(),
            "Timestamp: #Mon Jan 01, App Name: Quiz, Version: 1.0, AuthURL: ai2.appinventor.mit.edu"
        );
    }

    #[test]
    fn test_unresolved_metadata() {
        let meta = ProjectMetadata::unresolved("host");
        assert_eq!(meta.timestamp, NOT_AVAILABLE);
        assert_eq!(meta.app_name, NOT_AVAILABLE);
        assert_eq!(meta.app_version, NOT_AVAILABLE);
        assert_eq!(meta.source_host, "host");
    }

    #[test]
    fn test_record_columns_follow_table_layout() {
        let record = AnalysisRecord {
            aia_file: "quiz.aia".to_string(),
            project_info: ProjectMetadata::unresolved("host"),
            components: ComponentCount::tally(&names(&["Ball", "Ball"])),
            ai_components: vec![],
            screens: 1,
            operators: 0,
            variables: 2,
            events: 0,
            extensions: vec![],
            media: names(&["kitty.png", "meow.mp3"]),
            categories: CategorySummaries {
                drawing_and_animation: names(&["Ball", "Ball"]),
                ..Default::default()
            },
        };

        let columns = record.columns();
        assert_eq!(columns.len(), 16);
        assert_eq!(columns[0], ("aia_file", "quiz.aia".to_string()));
        assert_eq!(columns[2], ("components", "Ball (2 x)".to_string()));
        assert_eq!(columns[9], ("Media", "kitty.png, meow.mp3".to_string()));
        assert_eq!(
            columns[10],
            ("Drawing and Animation", "Ball, Ball".to_string())
        );
        assert_eq!(columns[15], ("Connectivity", String::new()));
    }

    #[test]
    fn test_record_serializes_display_strings() {
        let record = AnalysisRecord {
            aia_file: "quiz.aia".to_string(),
            project_info: ProjectMetadata::unresolved("host"),
            components: ComponentCount::tally(&names(&["Form", "Ball", "Ball"])),
            ai_components: vec![],
            screens: 1,
            operators: 0,
            variables: 3,
            events: 0,
            extensions: names(&["com.example.Ext"]),
            media: vec![],
            categories: CategorySummaries::default(),
        };

        let value = serde_json::to_value(Row::Analyzed(record)).unwrap();
        assert_eq!(value["status"], "analyzed");
        assert_eq!(value["components"][1]["count"], 2);
        assert_eq!(value["display"]["components"], "Form, Ball (2 x)");
        assert_eq!(
            value["display"]["project_info"],
            "Timestamp: N/A, App Name: N/A, Version: N/A, AuthURL: host"
        );
        assert_eq!(value["display"]["extensions"], "com.example.Ext");
        assert_eq!(value["display"]["Drawing and Animation"], "");

        let back: Row = serde_json::from_value(value).unwrap();
        assert_eq!(back.record().unwrap().components[1].name, "Ball");
    }

    #[test]
    fn test_batch_stats_from_rows() {
        let rows = vec![Row::Failed(FailedArchive {
            archive: "missing.aia".to_string(),
            kind: ErrorKind::Missing,
            message: "gone".to_string(),
        })];

        let stats = BatchStats::from_rows(&rows);
        assert_eq!(stats.total_archives, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.analyzed, 0);
    }

    #[test]
    fn test_row_serializes_with_status_tag() {
        let row = Row::Failed(FailedArchive {
            archive: "bad.aia".to_string(),
            kind: ErrorKind::NotAnArchive,
            message: "Falha ao abrir o arquivo .aia como um arquivo zip.".to_string(),
        });

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"status\":\"failed\""));
        assert!(json.contains("\"kind\":\"not_an_archive\""));
    }
}
