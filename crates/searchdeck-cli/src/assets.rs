use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use searchdeck_core::notice::{CatalogError, MessageCatalog};

pub const MESSAGES_FILE: &str = "messages.json";
pub const APP_VERSION_FILE: &str = "app-version.json";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid message catalog in {}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
    #[error("invalid version descriptor in {}", path.display())]
    Version {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads the notification catalog bundled next to the binary. Called once
/// per invocation; a failed load leaves the console on an empty catalog.
pub fn load_message_catalog(assets_dir: &Path) -> Result<MessageCatalog, AssetError> {
    let path = assets_dir.join(MESSAGES_FILE);
    let raw = std::fs::read_to_string(&path).map_err(|source| AssetError::Read {
        path: path.clone(),
        source,
    })?;
    MessageCatalog::from_json(&raw).map_err(|source| AssetError::Catalog { path, source })
}

#[derive(Debug, Deserialize)]
struct VersionDescriptor {
    version: String,
}

/// Reads the deployed app version shown in the view footer.
pub fn load_app_version(assets_dir: &Path) -> Result<String, AssetError> {
    let path = assets_dir.join(APP_VERSION_FILE);
    let raw = std::fs::read_to_string(&path).map_err(|source| AssetError::Read {
        path: path.clone(),
        source,
    })?;
    let descriptor: VersionDescriptor =
        serde_json::from_str(&raw).map_err(|source| AssetError::Version { path, source })?;
    Ok(descriptor.version)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn assets_load_the_bundled_catalog() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(
            dir.path().join(MESSAGES_FILE),
            r#"{"101": "Query completed.", "104": "Unable to fetch the document."}"#,
        )
        .expect("write catalog");

        let catalog = load_message_catalog(dir.path()).expect("load catalog");
        assert_eq!(catalog.text_for(101), "Query completed.");
        assert_eq!(catalog.text_for(104), "Unable to fetch the document.");
    }

    #[test]
    fn assets_missing_catalog_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("create temp dir");

        let err = load_message_catalog(dir.path()).expect_err("missing file should fail");
        assert!(matches!(err, AssetError::Read { .. }));
    }

    #[test]
    fn assets_malformed_catalog_is_a_catalog_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join(MESSAGES_FILE), "[]").expect("write catalog");

        let err = load_message_catalog(dir.path()).expect_err("malformed catalog should fail");
        assert!(matches!(err, AssetError::Catalog { .. }));
    }

    #[test]
    fn assets_load_the_version_descriptor() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(
            dir.path().join(APP_VERSION_FILE),
            r#"{"version": "0.3.1"}"#,
        )
        .expect("write descriptor");

        let version = load_app_version(dir.path()).expect("load version");
        assert_eq!(version, "0.3.1");
    }

    #[test]
    fn assets_malformed_version_descriptor_fails() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join(APP_VERSION_FILE), r#"{"ver": 1}"#)
            .expect("write descriptor");

        let err = load_app_version(dir.path()).expect_err("bad descriptor should fail");
        assert!(matches!(err, AssetError::Version { .. }));
    }
}
