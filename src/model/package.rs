use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{Ecosystem, PackageIdentity, RawPackageFact};

/// Where a package was found inside the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Path relative to the layer root (or image root when not in a layer).
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_hash: Option<String>,
    /// Absolute path on the scanning host.
    #[serde(skip)]
    pub real_path: PathBuf,
}

impl Location {
    pub fn new(path: impl Into<String>, real_path: PathBuf) -> Self {
        Self {
            path: path.into(),
            layer_hash: None,
            real_path,
        }
    }

    pub fn with_layer(mut self, layer_hash: impl Into<String>) -> Self {
        self.layer_hash = Some(layer_hash.into());
        self
    }

    /// File name of the location, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.real_path.file_name().and_then(|n| n.to_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpmMetadata {
    pub name: String,
    pub version: String,
    pub release: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epoch: Option<u32>,
    pub architecture: String,
    pub source_rpm: String,
    pub license: String,
    pub size: u64,
    pub pgp: String,
    pub summary: String,
    pub vendor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HexMetadata {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pkg_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pkg_hash_ext: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConanMetadata {
    pub name: String,
    pub version: String,
}

/// A node of a `conan.lock` graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConanLockNode {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub build_requires: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Reader-specific fields kept alongside the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PackageMetadata {
    Conan(ConanMetadata),
    ConanLock(ConanLockNode),
    Hex(HexMetadata),
    Rpm(RpmMetadata),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub ecosystem: Ecosystem,
    pub path: String,
    pub locations: Vec<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub licenses: Vec<String>,
    pub cpes: Vec<String>,
    pub purl: String,
    pub metadata: PackageMetadata,
}

impl Package {
    /// Builds a package record from a fact and the identity synthesized for it.
    ///
    /// The record takes the display version from the identity, not the raw
    /// fact version, so epoch and release are reflected.
    pub fn new(fact: &RawPackageFact, identity: PackageIdentity, metadata: PackageMetadata) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: fact.name.clone(),
            version: identity.version,
            ecosystem: fact.ecosystem(),
            path: fact.name.clone(),
            locations: Vec::new(),
            description: None,
            licenses: identity.licenses,
            cpes: identity.cpes,
            purl: identity.purl,
            metadata,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.is_empty() {
            self.description = Some(description);
        }
        self
    }

    /// The identity fields of this record.
    pub fn identity(&self) -> PackageIdentity {
        PackageIdentity {
            cpes: self.cpes.clone(),
            purl: self.purl.clone(),
            version: self.version.clone(),
            licenses: self.licenses.clone(),
        }
    }
}
