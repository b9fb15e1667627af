use async_trait::async_trait;
use regex::Regex;
use std::fs;
use std::sync::LazyLock;

use super::{ScanContext, ScanOutcome};
use crate::error::ScanError;
use crate::model::{Ecosystem, FactKind, HexMetadata, Location, Package, PackageMetadata, RawPackageFact};

const REBAR_LOCK: &str = "rebar.lock";
const MIX_LOCK: &str = "mix.lock";

/// Token separators of a `rebar.lock` entry such as
/// `{<<"certifi">>,{pkg,<<"certifi">>,<<"2.9.0">>},0},`.
static REBAR_LOCK_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\[{<">},: \]\n]+"#).expect("valid rebar.lock pattern"));

/// Token separators of a `mix.lock` entry such as
/// `"castore": {:hex, :castore, "0.1.17", "ba67...", [:mix], [], "hexpm", "3c3b..."},`.
static MIX_LOCK_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[%{}\n" ,:]+"#).expect("valid mix.lock pattern"));

pub struct HexScanner;

#[async_trait]
impl super::Scanner for HexScanner {
    fn name(&self) -> &'static str {
        "hex-parser"
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Hex
    }

    async fn scan(&self, ctx: &ScanContext) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        for location in ctx.contents.named(REBAR_LOCK) {
            outcome.record(read_lock(ctx, location, parse_rebar_line));
        }
        for location in ctx.contents.named(MIX_LOCK) {
            outcome.record(read_lock(ctx, location, parse_mix_line));
        }

        outcome
    }
}

fn read_lock(
    ctx: &ScanContext,
    location: &Location,
    parse_line: fn(&str) -> Option<HexMetadata>,
) -> Result<Vec<Package>, ScanError> {
    let content = fs::read_to_string(&location.real_path)
        .map_err(|e| ScanError::file_access(&location.real_path, e))?;

    let mut packages = Vec::new();

    for (line, metadata) in content.lines().filter_map(|l| Some((l, parse_line(l)?))) {
        let fact = RawPackageFact::new(FactKind::Hex, &metadata.name, &metadata.version);
        if !fact.is_complete() {
            let err = ScanError::partial_fact(Ecosystem::Hex, line.trim());
            tracing::debug!(error = %err, "Skipping entry");
            continue;
        }
        let identity = ctx.assembler.assemble(&fact);
        packages.push(
            Package::new(&fact, identity, PackageMetadata::Hex(metadata))
                .with_location(location.clone()),
        );
    }

    Ok(packages)
}

/// Reads one `rebar.lock` line. Only lines splitting into exactly seven
/// tokens are package entries.
fn parse_rebar_line(line: &str) -> Option<HexMetadata> {
    let tokens: Vec<&str> = REBAR_LOCK_SPLIT.split(line).collect();
    if tokens.len() != 7 {
        return None;
    }

    Some(HexMetadata {
        name: tokens[1].to_string(),
        version: tokens[4].to_string(),
        pkg_hash: None,
        pkg_hash_ext: None,
    })
}

/// Reads one `mix.lock` line: name, version, package hash, and the outer
/// checksum as hash extension.
fn parse_mix_line(line: &str) -> Option<HexMetadata> {
    let tokens: Vec<&str> = MIX_LOCK_SPLIT.split(line).collect();
    if tokens.len() < 6 {
        return None;
    }

    Some(HexMetadata {
        name: tokens[1].to_string(),
        version: tokens[4].to_string(),
        pkg_hash: Some(tokens[5].to_string()),
        pkg_hash_ext: Some(tokens[tokens.len() - 2].to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contents::ImageContents;
    use crate::scanner::Scanner;

    const MIX_CASTORE: &str = r#"  "castore": {:hex, :castore, "0.1.17", "ba672681de4e51ed8ec1f74ed624d104c0db72742ea1a5e74edbc770c815182f", [:mix], [], "hexpm", "d9844227ed52d26e7519224525cb6868650c272d4a3d327ce3ca5570c12163f9"},"#;

    #[test]
    fn test_parse_rebar_line() {
        let metadata = parse_rebar_line(r#"{<<"certifi">>,{pkg,<<"certifi">>,<<"2.9.0">>},0},"#).unwrap();
        assert_eq!(metadata.name, "certifi");
        assert_eq!(metadata.version, "2.9.0");

        assert!(parse_rebar_line(r#"{"1.2.0","#).is_none());
        assert!(parse_rebar_line("[").is_none());
    }

    #[test]
    fn test_parse_mix_line() {
        let metadata = parse_mix_line(MIX_CASTORE).unwrap();
        assert_eq!(metadata.name, "castore");
        assert_eq!(metadata.version, "0.1.17");
        assert_eq!(
            metadata.pkg_hash.as_deref(),
            Some("ba672681de4e51ed8ec1f74ed624d104c0db72742ea1a5e74edbc770c815182f")
        );
        assert_eq!(
            metadata.pkg_hash_ext.as_deref(),
            Some("d9844227ed52d26e7519224525cb6868650c272d4a3d327ce3ca5570c12163f9")
        );

        assert!(parse_mix_line("%{").is_none());
        assert!(parse_mix_line("}").is_none());
    }

    #[tokio::test]
    async fn test_scan_locks() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(REBAR_LOCK),
            "{\"1.2.0\",\n[{<<\"certifi\">>,{pkg,<<\"certifi\">>,<<\"2.9.0\">>},0},\n {<<\"idna\">>,{pkg,<<\"idna\">>,<<\"6.1.1\">>},0}]}.\n",
        )
        .unwrap();
        fs::write(dir.path().join(MIX_LOCK), format!("%{{\n{}\n}}\n", MIX_CASTORE)).unwrap();

        let ctx = ScanContext::from_contents(ImageContents::collect(dir.path()));
        let outcome = HexScanner.scan(&ctx).await;

        assert!(outcome.errors.is_empty());
        let purls: Vec<_> = outcome.packages.iter().map(|p| p.purl.as_str()).collect();
        assert_eq!(
            purls,
            vec!["pkg:hex/certifi@2.9.0", "pkg:hex/idna@6.1.1", "pkg:hex/castore@0.1.17"]
        );
        assert_eq!(
            outcome.packages[0].cpes,
            vec!["cpe:2.3:a:certifi:certifi:2.9.0:*:*:*:*:*:*:*"]
        );
    }
}
