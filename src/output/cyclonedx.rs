//! CycloneDX SBOM (Software Bill of Materials) output format.
//!
//! Generates a CycloneDX 1.5 document. The first CPE candidate of a package
//! goes into the component's `cpe` field; every candidate is also listed as a
//! `pkgident:cpe23` property so consumers can try the alternates.
//! See: https://cyclonedx.org/

use crate::model::{Package, ScanResult};
use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

/// CycloneDX SBOM root document
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxBom {
    bom_format: &'static str,
    spec_version: &'static str,
    version: u32,
    serial_number: String,
    metadata: CycloneDxMetadata,
    components: Vec<CycloneDxComponent>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxMetadata {
    timestamp: String,
    tools: Vec<CycloneDxTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    component: Option<CycloneDxImage>,
}

#[derive(Serialize)]
struct CycloneDxTool {
    vendor: &'static str,
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct CycloneDxImage {
    #[serde(rename = "type")]
    component_type: &'static str,
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CycloneDxComponent {
    #[serde(rename = "type")]
    component_type: &'static str,
    #[serde(rename = "bom-ref")]
    bom_ref: String,
    name: String,
    version: String,
    purl: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<CycloneDxLicense>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<CycloneDxProperty>,
}

#[derive(Serialize)]
struct CycloneDxLicense {
    license: CycloneDxLicenseName,
}

/// Package headers carry free-text license names, not SPDX ids.
#[derive(Serialize)]
struct CycloneDxLicenseName {
    name: String,
}

#[derive(Serialize)]
struct CycloneDxProperty {
    name: String,
    value: String,
}

fn to_component(package: &Package) -> CycloneDxComponent {
    let mut properties: Vec<CycloneDxProperty> = package
        .cpes
        .iter()
        .map(|cpe| CycloneDxProperty {
            name: "pkgident:cpe23".to_string(),
            value: cpe.clone(),
        })
        .collect();

    for location in &package.locations {
        properties.push(CycloneDxProperty {
            name: "pkgident:location".to_string(),
            value: location.path.clone(),
        });
        if let Some(layer) = &location.layer_hash {
            properties.push(CycloneDxProperty {
                name: "pkgident:layer".to_string(),
                value: layer.clone(),
            });
        }
    }

    CycloneDxComponent {
        component_type: "library",
        bom_ref: package.id.clone(),
        name: package.name.clone(),
        version: package.version.clone(),
        purl: package.purl.clone(),
        cpe: package.cpes.first().cloned(),
        description: package.description.clone(),
        licenses: package
            .licenses
            .iter()
            .map(|l| CycloneDxLicense {
                license: CycloneDxLicenseName { name: l.clone() },
            })
            .collect(),
        properties,
    }
}

fn build_bom(result: &ScanResult) -> CycloneDxBom {
    let image = result.image.as_ref().and_then(|image| {
        let tag = image.manifest.iter().flat_map(|m| m.repo_tags.first()).next()?;
        Some(CycloneDxImage {
            component_type: "container",
            name: tag.clone(),
        })
    });

    CycloneDxBom {
        bom_format: "CycloneDX",
        spec_version: "1.5",
        version: 1,
        serial_number: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
        metadata: CycloneDxMetadata {
            timestamp: Utc::now().to_rfc3339(),
            tools: vec![CycloneDxTool {
                vendor: "pkgident",
                name: "pkgident",
                version: env!("CARGO_PKG_VERSION"),
            }],
            component: image,
        },
        components: result.packages.iter().map(to_component).collect(),
    }
}

/// Generate and print CycloneDX SBOM output
pub fn print_cyclonedx(result: &ScanResult) -> Result<()> {
    println!("{}", generate_cyclonedx_string(result)?);
    Ok(())
}

/// Generate CycloneDX as a string (for file output)
pub fn generate_cyclonedx_string(result: &ScanResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&build_bom(result))?)
}
