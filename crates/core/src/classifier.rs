use crate::catalog::{Catalog, CatalogSet};
use crate::descriptor::InferenceHint;
use crate::models::{Category, CategorySummaries};

/// Return every component matching the catalog.
///
/// A component is emitted once per matching pattern, so a name matched by two
/// patterns appears twice. Duplicated components keep their multiplicity.
pub fn classify(components: &[String], catalog: &Catalog) -> Vec<String> {
    let mut matches = Vec::new();
    for component in components {
        for pattern in catalog.patterns() {
            if pattern.matches(component) {
                matches.push(component.clone());
            }
        }
    }
    matches
}

/// Classifies declared components against injected catalogs
pub struct Classifier<'a> {
    catalogs: &'a CatalogSet,
    hint: &'a InferenceHint,
}

impl<'a> Classifier<'a> {
    pub fn new(catalogs: &'a CatalogSet, hint: &'a InferenceHint) -> Self {
        Self { catalogs, hint }
    }

    pub fn classify(&self, components: &[String], category: Category) -> Vec<String> {
        classify(components, self.catalogs.get(category))
    }

    /// AI components, plus the inference marker when the keyword shows up in
    /// the joined component names. A marker already produced while parsing the
    /// descriptors matches too, so it can appear twice.
    pub fn classify_ai(&self, components: &[String]) -> Vec<String> {
        let mut matches = self.classify(components, Category::Ai);
        if self.hint.detect(&components.join(" ")) {
            matches.push(self.hint.marker().to_string());
        }
        matches
    }

    /// Classify against each of the six summarized categories
    pub fn summarize(&self, components: &[String]) -> CategorySummaries {
        let mut summaries = CategorySummaries::default();
        for category in Category::SUMMARIZED {
            summaries.set(category, self.classify(components, category));
        }
        summaries
    }
}
