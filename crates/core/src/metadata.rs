//! Project metadata extraction
//!
//! The `project.properties` manifest is line oriented. Its second line is the
//! save timestamp, `aname=` holds the app name and `versionname=` the version.
//! Older projects may lack `aname`, in which case the `AppName` property of the
//! screen descriptors is used instead.

use crate::analyzer::AnalysisError;
use crate::archive::{read_lossy, ProjectArchive};
use crate::descriptor::find_app_name;
use crate::models::{ProjectMetadata, NOT_AVAILABLE};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Manifest location inside the archive
pub const PROJECT_PROPERTIES: &str = "youngandroidproject/project.properties";

const APP_NAME_KEY: &str = "aname=";
const APP_VERSION_KEY: &str = "versionname=";

/// Parse the manifest text. Later lines override earlier ones for the same key.
pub fn parse_properties(content: &str, source_host: &str) -> ProjectMetadata {
    let mut metadata = ProjectMetadata::unresolved(source_host);
    let lines: Vec<&str> = content.lines().collect();

    if let Some(timestamp) = lines.get(1) {
        metadata.timestamp = timestamp.to_string();
    }

    for line in &lines {
        if let Some(name) = line.strip_prefix(APP_NAME_KEY) {
            metadata.app_name = name.to_string();
        }
        if let Some(version) = line.strip_prefix(APP_VERSION_KEY) {
            metadata.app_version = version.to_string();
        }
    }

    metadata
}

/// First `AppName` found across the descriptor files, in the order given
pub fn find_app_name_in_descriptors(
    descriptors: &[PathBuf],
) -> Result<Option<String>, AnalysisError> {
    for descriptor in descriptors {
        let content = read_lossy(descriptor)?;
        if let Some(name) = find_app_name(&content) {
            return Ok(Some(name));
        }
    }
    Ok(None)
}

/// Read project metadata from the archive manifest, falling back to the
/// descriptor files for the app name
pub fn extract_project_metadata(
    archive: &mut ProjectArchive,
    descriptors: &[PathBuf],
    source_host: &str,
) -> Result<ProjectMetadata, AnalysisError> {
    let mut metadata = match archive.read_entry(PROJECT_PROPERTIES)? {
        Some(bytes) => {
            let content = String::from_utf8(bytes).map_err(|_| AnalysisError::Encoding {
                entry: PROJECT_PROPERTIES.to_string(),
            })?;
            parse_properties(&content, source_host)
        }
        None => {
            debug!(archive = %archive.path().display(), "archive has no project.properties");
            ProjectMetadata::unresolved(source_host)
        }
    };

    if metadata.app_name == NOT_AVAILABLE {
        match find_app_name_in_descriptors(descriptors)? {
            Some(name) => {
                debug!(app_name = %name, "app name taken from screen descriptors");
                metadata.app_name = name;
            }
            None => warn!(
                archive = %archive.path().display(),
                "app name not found in project.properties or screen descriptors"
            ),
        }
    }

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::tests::write_archive;
    use std::fs;

    const HOST: &str = "ai2.appinventor.mit.edu";

    const PROPERTIES: &str = "#\n#Tue Mar 05 12:00:00 UTC 2024\nsizing=Responsive\nmain=appinventor.ai_user.Hello.Screen1\nname=Hello\nversionname=1.2\naname=Foo\nversioncode=3\n";

    #[test]
    fn test_parse_properties() {
        let metadata = parse_properties(PROPERTIES, HOST);
        assert_eq!(metadata.timestamp, "#Tue Mar 05 12:00:00 UTC 2024");
        assert_eq!(metadata.app_name, "Foo");
        assert_eq!(metadata.app_version, "1.2");
        assert_eq!(metadata.source_host, HOST);
    }

    #[test]
    fn test_parse_short_properties() {
        let metadata = parse_properties("main=x", HOST);
        assert_eq!(metadata.timestamp, NOT_AVAILABLE);
        assert_eq!(metadata.app_name, NOT_AVAILABLE);
        assert_eq!(metadata.app_version, NOT_AVAILABLE);
    }

    #[test]
    fn test_keys_must_start_the_line() {
        let metadata = parse_properties("#\n#ts\nxaname=Nope\n", HOST);
        assert_eq!(metadata.app_name, NOT_AVAILABLE);
    }

    #[test]
    fn test_last_matching_line_wins() {
        let metadata = parse_properties("#\n#ts\naname=First\naname=Second\n", HOST);
        assert_eq!(metadata.app_name, "Second");
    }

    #[test]
    fn test_fallback_to_descriptor_app_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.aia");
        write_archive(
            &path,
            &[(PROJECT_PROPERTIES, "#\n#ts\nversionname=2.0\n")],
        );

        let first = dir.path().join("Screen1.scm");
        let second = dir.path().join("Screen2.scm");
        fs::write(&first, r#"{"Properties":{"$Name":"Screen1"}}"#).unwrap();
        fs::write(&second, r#"{"Properties":{"AppName":"Bar"}}"#).unwrap();

        let mut archive = ProjectArchive::open(&path).unwrap();
        let metadata = extract_project_metadata(&mut archive, &[first, second], HOST).unwrap();
        assert_eq!(metadata.app_name, "Bar");
        assert_eq!(metadata.app_version, "2.0");
        assert_eq!(metadata.timestamp, "#ts");
    }

    #[test]
    fn test_manifest_name_wins_over_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.aia");
        write_archive(&path, &[(PROJECT_PROPERTIES, PROPERTIES)]);

        let screen = dir.path().join("Screen1.scm");
        fs::write(&screen, r#"{"AppName":"Other"}"#).unwrap();

        let mut archive = ProjectArchive::open(&path).unwrap();
        let metadata = extract_project_metadata(&mut archive, &[screen], HOST).unwrap();
        assert_eq!(metadata.app_name, "Foo");
    }

    #[test]
    fn test_missing_manifest_and_descriptor_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.aia");
        write_archive(&path, &[("assets/kitty.png", "png")]);

        let mut archive = ProjectArchive::open(&path).unwrap();
        let metadata = extract_project_metadata(&mut archive, &[], HOST).unwrap();
        assert_eq!(metadata, ProjectMetadata::unresolved(HOST));
    }

    #[test]
    fn test_invalid_utf8_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.aia");
        let file = fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(PROJECT_PROPERTIES, zip::write::FileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut writer, b"#\n\xff\xfe\n").unwrap();
        writer.finish().unwrap();

        let mut archive = ProjectArchive::open(&path).unwrap();
        let result = extract_project_metadata(&mut archive, &[], HOST);
        assert!(matches!(result, Err(AnalysisError::Encoding { .. })));
    }
}
