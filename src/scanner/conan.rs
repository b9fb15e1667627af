use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;

use super::{ScanContext, ScanOutcome};
use crate::error::ScanError;
use crate::model::{
    ConanLockNode, ConanMetadata, Ecosystem, FactKind, Location, Package, PackageMetadata,
    RawPackageFact,
};

const CONAN_FILE: &str = "conanfile.txt";
const CONAN_LOCK: &str = "conan.lock";
const REQUIRES_TAG: &str = "[requires]";

pub struct ConanScanner;

#[derive(Deserialize)]
struct ConanLock {
    graph_lock: GraphLock,
}

#[derive(Deserialize)]
struct GraphLock {
    #[serde(default)]
    nodes: IndexMap<String, ConanLockNode>,
}

#[async_trait]
impl super::Scanner for ConanScanner {
    fn name(&self) -> &'static str {
        "conan-parser"
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Conan
    }

    async fn scan(&self, ctx: &ScanContext) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        for location in ctx.contents.files() {
            if location.path.contains(CONAN_FILE) {
                outcome.record(read_conan_file(ctx, location));
            }
            if location.path.contains(CONAN_LOCK) {
                outcome.record(read_conan_lock(ctx, location));
            }
        }

        outcome
    }
}

/// Reads the `[requires]` section of a `conanfile.txt`.
///
/// The section ends at the first line that is neither the section tag nor a
/// `name/version` reference.
fn read_conan_file(ctx: &ScanContext, location: &Location) -> Result<Vec<Package>, ScanError> {
    let content = fs::read_to_string(&location.real_path)
        .map_err(|e| ScanError::file_access(&location.real_path, e))?;

    let mut packages = Vec::new();
    let mut requires = false;

    for line in content.lines() {
        let line = line.trim();

        if line.contains(REQUIRES_TAG) {
            requires = true;
        }

        if requires && line.contains('/') {
            match conan_name_version(line) {
                Some((name, version)) => {
                    let metadata = PackageMetadata::Conan(ConanMetadata {
                        name: name.clone(),
                        version: version.clone(),
                    });
                    packages.push(init_conan_package(ctx, location, name, version, metadata));
                }
                None => {
                    let err = ScanError::partial_fact(Ecosystem::Conan, line);
                    tracing::debug!(error = %err, "Skipping entry");
                }
            }
        }

        if !line.contains(REQUIRES_TAG) && !line.contains('/') {
            requires = false;
        }
    }

    Ok(packages)
}

fn read_conan_lock(ctx: &ScanContext, location: &Location) -> Result<Vec<Package>, ScanError> {
    let content = fs::read_to_string(&location.real_path)
        .map_err(|e| ScanError::file_access(&location.real_path, e))?;

    let lock: ConanLock = serde_json::from_str(&content)
        .map_err(|e| ScanError::decode(&location.real_path, e))?;

    let mut packages = Vec::new();

    for node in lock.graph_lock.nodes.into_values() {
        if node.reference.is_empty() {
            continue;
        }
        match conan_name_version(&node.reference) {
            Some((name, version)) => {
                packages.push(init_conan_package(
                    ctx,
                    location,
                    name,
                    version,
                    PackageMetadata::ConanLock(node),
                ));
            }
            None => {
                let err = ScanError::partial_fact(Ecosystem::Conan, node.reference);
                tracing::debug!(error = %err, "Skipping entry");
            }
        }
    }

    Ok(packages)
}

fn init_conan_package(
    ctx: &ScanContext,
    location: &Location,
    name: String,
    version: String,
    metadata: PackageMetadata,
) -> Package {
    let fact = RawPackageFact::new(FactKind::Conan, name, version);
    let identity = ctx.assembler.assemble(&fact);
    Package::new(&fact, identity, metadata).with_location(location.clone())
}

/// Splits a `name/version[@user/channel][#revision]` reference.
///
/// Range brackets around the version are dropped. Returns `None` when either
/// part is missing.
pub fn conan_name_version(reference: &str) -> Option<(String, String)> {
    let reference = reference.trim();
    let name_version = reference
        .split_once('@')
        .or_else(|| reference.split_once('#'))
        .map(|(nv, _)| nv)
        .unwrap_or(reference);

    let mut parts = name_version.split('/');
    let (name, version) = (parts.next()?.trim(), parts.next()?.trim());
    if name.is_empty() || version.is_empty() {
        return None;
    }

    Some((name.to_string(), crate::identity::strip_version_range(version)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contents::ImageContents;
    use crate::scanner::Scanner;

    #[test]
    fn test_conan_name_version() {
        let cases = [
            ("zlib/1.2.13", Some(("zlib", "1.2.13"))),
            ("poco/1.12.4@user/stable", Some(("poco", "1.12.4"))),
            ("fmt/9.1.0#0a1b2c3d", Some(("fmt", "9.1.0"))),
            ("zlib/1.2.13/extra", Some(("zlib", "1.2.13"))),
            ("openssl/[>=1.1 <4]", Some(("openssl", ">=1.1 <4"))),
            ("boost/1.81.0@", Some(("boost", "1.81.0"))),
            ("nover", None),
            ("/1.0", None),
        ];

        for (input, expected) in cases {
            let expected = expected.map(|(n, v)| (n.to_string(), v.to_string()));
            assert_eq!(conan_name_version(input), expected, "input: {}", input);
        }
    }

    #[tokio::test]
    async fn test_scan_conanfile() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONAN_FILE),
            "[requires]\nzlib/1.2.13\npoco/1.12.4@user/stable\n\n[generators]\ncmake\n",
        )
        .unwrap();

        let ctx = ScanContext::from_contents(ImageContents::collect(dir.path()));
        let outcome = ConanScanner.scan(&ctx).await;

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.packages.len(), 2);

        let zlib = &outcome.packages[0];
        assert_eq!(zlib.name, "zlib");
        assert_eq!(zlib.version, "1.2.13");
        assert_eq!(zlib.purl, "pkg:conan/zlib@1.2.13");
        assert_eq!(zlib.cpes, vec!["cpe:2.3:a:zlib:zlib:1.2.13:*:*:*:*:*:*:*"]);
        assert!(zlib.licenses.is_empty());
        assert_eq!(zlib.locations[0].path, CONAN_FILE);

        assert_eq!(outcome.packages[1].purl, "pkg:conan/poco@1.12.4");
    }

    #[tokio::test]
    async fn test_requires_section_ends() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONAN_FILE),
            "[requires]\nzlib/1.2.13\n[options]\nzlib/shared=True\n",
        )
        .unwrap();

        let ctx = ScanContext::from_contents(ImageContents::collect(dir.path()));
        let outcome = ConanScanner.scan(&ctx).await;

        assert_eq!(outcome.packages.len(), 1);
    }

    #[tokio::test]
    async fn test_scan_conan_lock() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONAN_LOCK),
            r#"{
                "graph_lock": {
                    "nodes": {
                        "0": {"ref": "", "path": "conanfile.txt"},
                        "1": {"ref": "zlib/1.2.13#97d5730b529b4224045fe7090592d4c1", "package_id": "abc", "context": "host"},
                        "2": {"ref": "openssl/[>=1.1 <4]@", "requires": ["1"]}
                    }
                },
                "version": "0.4"
            }"#,
        )
        .unwrap();

        let ctx = ScanContext::from_contents(ImageContents::collect(dir.path()));
        let outcome = ConanScanner.scan(&ctx).await;

        assert!(outcome.errors.is_empty());
        let purls: Vec<_> = outcome.packages.iter().map(|p| p.purl.as_str()).collect();
        assert_eq!(purls, vec!["pkg:conan/zlib@1.2.13", "pkg:conan/openssl@>=1.1 <4"]);

        match &outcome.packages[0].metadata {
            PackageMetadata::ConanLock(node) => {
                assert_eq!(node.package_id.as_deref(), Some("abc"));
            }
            other => panic!("unexpected metadata: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_broken_lock_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONAN_LOCK), "{ not json").unwrap();
        fs::write(dir.path().join(CONAN_FILE), "[requires]\nfmt/9.1.0\n").unwrap();

        let ctx = ScanContext::from_contents(ImageContents::collect(dir.path()));
        let outcome = ConanScanner.scan(&ctx).await;

        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(outcome.errors[0], ScanError::Decode { .. }));
        assert_eq!(outcome.packages.len(), 1);
    }
}
