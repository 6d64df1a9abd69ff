use crate::analyzer::AnalysisError;
use crate::archive::ProjectArchive;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Directory holding bundled extensions inside the archive
pub const EXTENSIONS_DIR: &str = "assets/external_comps/";
/// Manifest file name of a bundled extension
pub const EXTENSION_MANIFEST: &str = "components.json";

pub fn is_extension_manifest(entry: &str) -> bool {
    entry.ends_with(EXTENSION_MANIFEST) && entry.contains(EXTENSIONS_DIR)
}

/// Parse an extension manifest (a JSON array of component descriptions) and
/// return each non-empty `type` field. Entries without one are skipped.
pub fn parse_extension_manifest(content: &[u8]) -> Result<Vec<String>, serde_json::Error> {
    let text = String::from_utf8_lossy(content);
    let components: Vec<Value> = serde_json::from_str(&text)?;

    Ok(components
        .iter()
        .filter_map(|component| component.get("type").and_then(Value::as_str))
        .filter(|extension_type| !extension_type.is_empty())
        .map(str::to_string)
        .collect())
}

/// Collect declared extension types from every manifest in the archive index
pub fn extract_extensions(archive: &mut ProjectArchive) -> Result<Vec<String>, AnalysisError> {
    let manifests: Vec<String> = archive
        .entry_names()
        .iter()
        .filter(|name| is_extension_manifest(name))
        .cloned()
        .collect();

    let mut extensions = Vec::new();
    for entry in manifests {
        let Some(content) = archive.read_entry(&entry)? else {
            continue;
        };
        let types = parse_extension_manifest(&content).map_err(|source| {
            AnalysisError::ExtensionManifest {
                entry: entry.clone(),
                source,
            }
        })?;
        debug!(manifest = %entry, count = types.len(), "read extension manifest");
        extensions.extend(types);
    }

    Ok(extensions)
}

/// Drop repeated extension types, keeping first-seen order
pub fn collapse_duplicates(extensions: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    extensions
        .into_iter()
        .filter(|extension| seen.insert(extension.clone()))
        .collect()
}
