//! End-to-end tests: scan an extracted image tree on disk and check the
//! synthesized identities and reported errors.

use std::fs;
use std::path::Path;

use pkgident::model::{Ecosystem, FactKind, RawPackageFact, RpmFields};
use pkgident::output::{format_result_to_string, OutputFormat};
use pkgident::scanner::scan_image;
use pkgident::{assemble, Config};

const LAYER: &str = "3f1b4e5c2a6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a8b9c0d1e2f";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn image_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        &format!("{}/app/conanfile.txt", LAYER),
        "[requires]\nzlib/1.2.13\nopenssl/[>=1.1 <4]@conan/stable#rev1\n\n[generators]\ncmake\n",
    );
    write(
        root,
        &format!("{}/srv/rebar.lock", LAYER),
        "{\"1.2.0\",\n[{<<\"cowboy\">>,{pkg,<<\"cowboy\">>,<<\"2.9.0\">>},0}]}.\n",
    );
    write(
        root,
        "manifest.json",
        r#"[{"Config":"abc.json","RepoTags":["demo:latest"],"Layers":["3f1b/layer.tar"]}]"#,
    );
    write(root, "abc.json", r#"{"architecture":"amd64","os":"linux"}"#);

    dir
}

fn conan_and_hex() -> Config {
    Config {
        enabled_parsers: vec![Ecosystem::Conan, Ecosystem::Hex],
        ..Config::default()
    }
}

#[tokio::test]
async fn test_scan_image_end_to_end() {
    let dir = image_fixture();
    let result = scan_image(dir.path(), &conan_and_hex()).await;

    assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);

    let names: Vec<_> = result.packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["zlib", "openssl", "cowboy"]);

    let zlib = &result.packages[0];
    assert_eq!(zlib.purl, "pkg:conan/zlib@1.2.13");
    assert_eq!(zlib.cpes, vec!["cpe:2.3:a:zlib:zlib:1.2.13:*:*:*:*:*:*:*"]);
    assert_eq!(zlib.locations[0].path, "app/conanfile.txt");
    assert_eq!(zlib.locations[0].layer_hash.as_deref(), Some(LAYER));

    let cowboy = &result.packages[2];
    assert_eq!(cowboy.ecosystem, Ecosystem::Hex);
    assert_eq!(cowboy.purl, "pkg:hex/cowboy@2.9.0");

    let image = result.image.expect("image metadata");
    assert_eq!(image.manifest[0].repo_tags, vec!["demo:latest"]);
    assert_eq!(image.config.os, "linux");
}

#[tokio::test]
async fn test_broken_files_do_not_stop_the_scan() {
    let dir = image_fixture();
    write(dir.path(), &format!("{}/other/conan.lock", LAYER), "{ not json");
    write(dir.path(), "broken-manifest.json", "[");

    let result = scan_image(dir.path(), &conan_and_hex()).await;

    assert_eq!(result.packages.len(), 3);
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors.iter().any(|e| e.starts_with("conan-parser: ")));
    assert!(result.errors.iter().any(|e| e.starts_with("docker-parser: ")));
}

#[tokio::test]
async fn test_parallel_and_sequential_agree() {
    let dir = image_fixture();
    let mut config = conan_and_hex();

    let parallel = scan_image(dir.path(), &config).await;
    config.parallel = false;
    let sequential = scan_image(dir.path(), &config).await;

    let identities = |r: &pkgident::ScanResult| -> Vec<_> {
        r.packages.iter().map(|p| p.identity()).collect()
    };
    assert_eq!(identities(&parallel), identities(&sequential));
}

#[tokio::test]
async fn test_json_output_contains_identities() {
    let dir = image_fixture();
    let result = scan_image(dir.path(), &conan_and_hex()).await;

    let text = format_result_to_string(&result, OutputFormat::Json).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["packages"][0]["type"], "conan");
    assert_eq!(json["packages"][0]["purl"], "pkg:conan/zlib@1.2.13");
    assert_eq!(json["packages"][2]["metadata"]["type"], "hex");
}

#[test]
fn test_p11_kit_trust_fixture() {
    let fact = RawPackageFact::new(
        FactKind::Rpm(RpmFields {
            release: Some("2.fc29".to_string()),
            epoch: None,
            architecture: Some("x86_64".to_string()),
        }),
        "p11-kit-trust",
        "0.23.15",
    )
    .with_vendor("Fedora Project")
    .with_license("BSD");

    let version = "0.23.15-2.fc29";
    let expected: Vec<String> = [
        ("fedoraproject", "p11-kit-trust"),
        ("fedoraproject", "p11_kit-trust"),
        ("fedoraproject", "p11_kit_trust"),
        ("p11-kit-trust", "p11-kit-trust"),
        ("p11-kit-trust", "p11_kit-trust"),
        ("p11-kit-trust", "p11_kit_trust"),
        ("p11_kit-trust", "p11_kit_trust"),
        ("p11_kit-trust", "p11-kit_trust"),
        ("p11_kit-trust", "p11-kit-trust"),
        ("p11_kit_trust", "p11-kit-trust"),
        ("p11_kit_trust", "p11_kit-trust"),
        ("p11_kit_trust", "p11_kit_trust"),
        ("p11", "p11_kit_trust"),
        ("p11", "p11-kit_trust"),
        ("p11", "p11-kit-trust"),
    ]
    .iter()
    .map(|(vendor, product)| format!("cpe:2.3:a:{}:{}:{}:*:*:*:*:*:*:*", vendor, product, version))
    .collect();

    let identity = assemble(&fact);
    assert_eq!(identity.cpes, expected);
    assert_eq!(identity.purl, "pkg:rpm/p11-kit-trust@0.23.15-2.fc29?arch=x86_64");
    assert_eq!(identity.licenses, vec!["BSD"]);
}

#[test]
fn test_license_splitting_cases() {
    let licensed = |raw: &str| {
        assemble(&RawPackageFact::new(FactKind::Conan, "x", "1").with_license(raw)).licenses
    };

    assert_eq!(licensed("GPLv2+ and LGPLv2+"), vec!["GPLv2+", "LGPLv2+"]);
    assert_eq!(licensed("MIT or Apache-2.0"), vec!["MIT", "Apache-2.0"]);
    assert!(licensed("").is_empty());
}
