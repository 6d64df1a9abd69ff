//! Component pattern catalogs
//!
//! Each catalog groups component type names under a [`Category`]. A pattern
//! ending with `*` matches by prefix, any other pattern must match exactly.
//! The built-in catalogs can be replaced per category from a TOML file:
//!
//! ```toml
//! ai = ["PIC*", "ChatBot"]
//! maps = ["Map", "Marker"]
//! ```

use crate::config::ConfigError;
use crate::models::Category;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const AI_PATTERNS: &[&str] = &[
    "PIC*",
    "PersonalImageClassifier*",
    "Look*",
    "LookExtension*",
    "ChatBot",
    "ImageBot",
    "TMIC",
    "Gemini*",
    "Llama*",
    "TeachableMachine*",
    "TeachableMachineImageClassifier*",
    "SpeechRecognizer*",
    "FaceExtension*",
    "Pose*",
    "Posenet",
    "PosenetExtension",
    "Eliza*",
    "Alexa*",
];

const DRAWING_AND_ANIMATION_PATTERNS: &[&str] = &["Ball", "Canvas", "ImageSprite"];

const MAPS_PATTERNS: &[&str] = &[
    "Map",
    "Marker",
    "Circle",
    "FeatureCollection",
    "LineString",
    "Navigation",
    "Polygon",
    "Rectangle",
];

const SENSORS_PATTERNS: &[&str] = &[
    "AccelerometerSensor",
    "BarcodeScanner",
    "Barometer",
    "Clock",
    "GyroscopeSensor",
    "Hygrometer",
    "LightSensor",
    "LocationSensor",
    "MagneticFieldSensor",
    "NearField",
    "OrientationSensor",
    "ProximitySensor",
    "Thermometer",
    "Pedometer",
];

const SOCIAL_PATTERNS: &[&str] = &[
    "ContactPicker",
    "EmailPicker",
    "PhoneCall",
    "PhoneNumberPicker",
    "Texting",
    "Twitter",
];

const STORAGE_PATTERNS: &[&str] = &[
    "File",
    "CloudDB",
    "DataFile",
    "Spreadsheet",
    "FusiontablesControl",
    "TinyDB",
    "TinyWebDB",
];

const CONNECTIVITY_PATTERNS: &[&str] = &[
    "BluetoothClient",
    "ActivityStarter",
    "Serial",
    "BluetoothServer",
    "Web",
];

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Exact(String),
    /// Stored without the trailing wildcard
    Prefix(String),
}

impl Pattern {
    /// Parse a raw pattern, `Foo*` becomes a prefix pattern
    pub fn parse(raw: &str) -> Self {
        match raw.strip_suffix('*') {
            Some(prefix) => Pattern::Prefix(prefix.to_string()),
            None => Pattern::Exact(raw.to_string()),
        }
    }

    pub fn matches(&self, component: &str) -> bool {
        match self {
            Pattern::Exact(name) => component == name,
            Pattern::Prefix(prefix) => component.starts_with(prefix.as_str()),
        }
    }
}

/// Patterns for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    category: Category,
    patterns: Vec<Pattern>,
}

impl Catalog {
    pub fn new(category: Category, patterns: Vec<Pattern>) -> Self {
        Self { category, patterns }
    }

    /// Build a catalog from raw pattern strings, rejecting empty patterns
    pub fn from_raw<S: AsRef<str>>(category: Category, raw: &[S]) -> Result<Self, ConfigError> {
        let mut patterns = Vec::with_capacity(raw.len());
        for pattern in raw {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() || pattern == "*" {
                return Err(ConfigError::InvalidPattern {
                    category: category.key().to_string(),
                    pattern: pattern.to_string(),
                });
            }
            patterns.push(Pattern::parse(pattern));
        }
        Ok(Self::new(category, patterns))
    }

    fn builtin(category: Category) -> Self {
        let raw = match category {
            Category::Ai => AI_PATTERNS,
            Category::DrawingAndAnimation => DRAWING_AND_ANIMATION_PATTERNS,
            Category::Maps => MAPS_PATTERNS,
            Category::Sensors => SENSORS_PATTERNS,
            Category::Social => SOCIAL_PATTERNS,
            Category::Storage => STORAGE_PATTERNS,
            Category::Connectivity => CONNECTIVITY_PATTERNS,
        };
        Self::new(category, raw.iter().map(|p| Pattern::parse(p)).collect())
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

/// Catalog file layout, one optional pattern list per category
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    ai: Option<Vec<String>>,
    drawing_and_animation: Option<Vec<String>>,
    maps: Option<Vec<String>>,
    sensors: Option<Vec<String>>,
    social: Option<Vec<String>>,
    storage: Option<Vec<String>>,
    connectivity: Option<Vec<String>>,
}

impl CatalogFile {
    fn take(&mut self, category: Category) -> Option<Vec<String>> {
        match category {
            Category::Ai => self.ai.take(),
            Category::DrawingAndAnimation => self.drawing_and_animation.take(),
            Category::Maps => self.maps.take(),
            Category::Sensors => self.sensors.take(),
            Category::Social => self.social.take(),
            Category::Storage => self.storage.take(),
            Category::Connectivity => self.connectivity.take(),
        }
    }
}

/// The full set of catalogs, one per category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSet {
    catalogs: Vec<Catalog>,
}

impl Default for CatalogSet {
    fn default() -> Self {
        Self {
            catalogs: Category::ALL.iter().map(|c| Catalog::builtin(*c)).collect(),
        }
    }
}

impl CatalogSet {
    /// Parse a TOML catalog document; categories it omits keep the built-in patterns
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut file: CatalogFile = toml::from_str(content)?;
        let mut catalogs = Vec::with_capacity(Category::ALL.len());

        for category in Category::ALL {
            let catalog = match file.take(category) {
                Some(raw) => Catalog::from_raw(category, raw.as_slice())?,
                None => Catalog::builtin(category),
            };
            catalogs.push(catalog);
        }

        Ok(Self { catalogs })
    }

    /// Load a TOML catalog file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Replace the catalog of one category
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        if let Some(slot) = self
            .catalogs
            .iter_mut()
            .find(|c| c.category == catalog.category)
        {
            *slot = catalog;
        }
        self
    }

    pub fn get(&self, category: Category) -> &Catalog {
        // Construction fills every category in declaration order
        &self.catalogs[category as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Catalog> {
        self.catalogs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_parse() {
        assert_eq!(Pattern::parse("PIC*"), Pattern::Prefix("PIC".to_string()));
        assert_eq!(Pattern::parse("ChatBot"), Pattern::Exact("ChatBot".to_string()));
    }

    #[test]
    fn test_pattern_matches() {
        let prefix = Pattern::parse("Gemini*");
        assert!(prefix.matches("Gemini"));
        assert!(prefix.matches("GeminiPro"));
        assert!(!prefix.matches("MyGemini"));

        let exact = Pattern::parse("File");
        assert!(exact.matches("File"));
        assert!(!exact.matches("FilePicker"));
    }

    #[test]
    fn test_default_set_covers_every_category() {
        let set = CatalogSet::default();
        for category in Category::ALL {
            assert_eq!(set.get(category).category(), category);
            assert!(!set.get(category).patterns().is_empty());
        }
        assert!(set
            .get(Category::Ai)
            .patterns()
            .contains(&Pattern::Prefix("TeachableMachine".to_string())));
    }

    #[test]
    fn test_toml_overrides_only_listed_categories() {
        let set = CatalogSet::from_toml_str(
            r#"
            maps = ["Map", "Route*"]
            "#,
        )
        .unwrap();

        assert_eq!(
            set.get(Category::Maps).patterns(),
            &[
                Pattern::Exact("Map".to_string()),
                Pattern::Prefix("Route".to_string())
            ]
        );
        assert_eq!(set.get(Category::Sensors), CatalogSet::default().get(Category::Sensors));
    }

    #[test]
    fn test_toml_rejects_empty_pattern() {
        let result = CatalogSet::from_toml_str(r#"social = ["Texting", ""]"#);
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_toml_rejects_unknown_category() {
        assert!(CatalogSet::from_toml_str(r#"games = ["Ball"]"#).is_err());
    }

    #[test]
    fn test_with_catalog_replaces_category() {
        let catalog = Catalog::from_raw(Category::Social, &["Sharing"]).unwrap();
        let set = CatalogSet::default().with_catalog(catalog.clone());
        assert_eq!(set.get(Category::Social), &catalog);
        assert_eq!(set.iter().count(), Category::ALL.len());
    }
}
