/// Path fragment marking media entries
pub const ASSETS_MARKER: &str = "assets/";

/// File names of every asset entry, in the order given
///
/// Directory entries are skipped; duplicate names are kept.
pub fn list_media_files<'a, I>(entry_names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    entry_names
        .into_iter()
        .filter(|name| name.contains(ASSETS_MARKER) && !name.ends_with('/'))
        .map(|name| name.rsplit('/').next().unwrap_or(name).to_string())
        .collect()
}
