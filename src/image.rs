//! Docker image metadata.
//!
//! Reads the JSON files at the root of an image saved with `docker save`:
//! `manifest.json` (a list of manifest entries) and the image config
//! (`<digest>.json`). Image metadata is reported alongside the inventory and
//! plays no part in package identity.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ScanError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DockerManifest {
    pub config: String,
    pub repo_tags: Vec<String>,
    pub layers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ContainerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub env: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootFs {
    #[serde(rename = "type")]
    pub fs_type: String,
    pub diff_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub empty_layer: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    pub architecture: String,
    pub os: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    pub config: ContainerConfig,
    pub rootfs: RootFs,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub manifest: Vec<DockerManifest>,
    pub config: DockerConfig,
}

/// Top-level keys of an image config. A root `.json` object with none of them
/// (an OCI `index.json`, for instance) is not an image config.
const CONFIG_KEYS: &[&str] = &["architecture", "os", "config", "rootfs", "history"];

/// Reads image metadata from the JSON files directly under `root`.
///
/// Files whose name contains `manifest` decode as the manifest list; any other
/// `.json` object carrying image config keys decodes as the image config.
/// Every unreadable or malformed file adds one error and reading continues.
pub fn read_image_info(root: &Path) -> (ImageInfo, Vec<ScanError>) {
    let mut info = ImageInfo::default();
    let mut errors = Vec::new();

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            errors.push(ScanError::file_access(root, e));
            return (info, errors);
        }
    };

    let mut files: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    for path in files {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                errors.push(ScanError::file_access(&path, e));
                continue;
            }
        };

        let is_manifest = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().contains("manifest"));

        let decoded = serde_json::from_str::<Value>(&content).and_then(|value| {
            if is_manifest {
                info.manifest = serde_json::from_value(value)?;
            } else if is_image_config(&value) {
                info.config = serde_json::from_value(value)?;
            } else {
                tracing::debug!(path = %path.display(), "Skipping non-config metadata file");
            }
            Ok(())
        });

        if let Err(e) = decoded {
            tracing::warn!(path = %path.display(), error = %e, "Cannot decode image metadata");
            errors.push(ScanError::decode(&path, e));
        }
    }

    (info, errors)
}

fn is_image_config(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| CONFIG_KEYS.iter().any(|key| object.contains_key(*key)))
}
