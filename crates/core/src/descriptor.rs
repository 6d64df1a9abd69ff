//! Structural descriptor (`.scm`) parsing
//!
//! Descriptors are JSON fragments wrapped in a form header. They are scanned
//! lexically: component types come from `"$Type":"..."` fields, variables from
//! `"$Name":"..."` fields and operators from a fixed character class applied to
//! the whole text.

use regex::Regex;
use std::sync::OnceLock;

/// Characters counted as operators
pub const OPERATOR_CHARS: &[char] = &['+', '-', '*', '/', '<', '>', '!', '=', '&', '|'];

fn type_field() -> &'static Regex {
    static TYPE_FIELD: OnceLock<Regex> = OnceLock::new();
    TYPE_FIELD.get_or_init(|| Regex::new(r#""\$Type":"(.*?)""#).expect("valid $Type pattern"))
}

fn name_field() -> &'static Regex {
    static NAME_FIELD: OnceLock<Regex> = OnceLock::new();
    NAME_FIELD.get_or_init(|| Regex::new(r#""\$Name":"(.*?)""#).expect("valid $Name pattern"))
}

fn app_name_fields() -> &'static [Regex; 2] {
    static APP_NAME_FIELDS: OnceLock<[Regex; 2]> = OnceLock::new();
    APP_NAME_FIELDS.get_or_init(|| {
        [
            Regex::new(r#""AppName"\s*:\s*"([^"]+)""#).expect("valid AppName pattern"),
            Regex::new(r#""AppName"\s*:\s*'([^']+)'"#).expect("valid AppName pattern"),
        ]
    })
}

/// Case-insensitive keyword check for an external inference service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceHint {
    keyword: String,
    marker: String,
}

impl Default for InferenceHint {
    fn default() -> Self {
        Self::new("roboflow", "Using Roboflow")
    }
}

impl InferenceHint {
    /// `keyword` is matched case-insensitively, `marker` is the synthetic
    /// component name appended when it is found
    pub fn new(keyword: &str, marker: &str) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            marker: marker.to_string(),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn detect(&self, text: &str) -> bool {
        !self.keyword.is_empty() && text.to_lowercase().contains(&self.keyword)
    }
}

/// Counters extracted from one descriptor file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorStats {
    /// Declared component types in order, duplicates retained
    pub components: Vec<String>,
    pub operators: usize,
    pub variables: usize,
}

/// Run every descriptor extraction over one file's content
pub fn parse_descriptor(content: &str, hint: &InferenceHint) -> DescriptorStats {
    DescriptorStats {
        components: extract_components(content, hint),
        operators: count_operators(content),
        variables: count_variables(content),
    }
}

/// Extract every declared component type, appending the inference marker
/// when the keyword appears anywhere in the text
pub fn extract_components(content: &str, hint: &InferenceHint) -> Vec<String> {
    let mut components: Vec<String> = type_field()
        .captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    if hint.detect(content) {
        components.push(hint.marker().to_string());
    }

    components
}

pub fn count_operators(content: &str) -> usize {
    content.chars().filter(|c| OPERATOR_CHARS.contains(c)).count()
}

pub fn count_variables(content: &str) -> usize {
    name_field().find_iter(content).count()
}

/// Find the `AppName` property, double-quoted form first
pub fn find_app_name(content: &str) -> Option<String> {
    app_name_fields()
        .iter()
        .find_map(|re| re.captures(content))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
