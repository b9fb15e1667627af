//! Epoch-aware version composition.

/// The three renderings of a package version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedVersion {
    /// `[epoch:]version[-release]`
    pub display: String,
    /// `version[-release]`. The epoch is never part of the PURL version.
    pub purl: String,
    /// `[epoch\:]version[-release]`, colon escaped for CPE 2.3.
    pub cpe: String,
}

/// Composes display, PURL and CPE versions.
///
/// An epoch of `0` is the same as no epoch.
pub fn compose_version(version: &str, release: Option<&str>, epoch: Option<u32>) -> ComposedVersion {
    let release_version = match release.map(str::trim).filter(|r| !r.is_empty()) {
        Some(release) => format!("{}-{}", version, release),
        None => version.to_string(),
    };

    match epoch.filter(|&e| e != 0) {
        Some(epoch) => ComposedVersion {
            display: format!("{}:{}", epoch, release_version),
            cpe: format!("{}\\:{}", epoch, release_version),
            purl: release_version,
        },
        None => ComposedVersion {
            display: release_version.clone(),
            cpe: release_version.clone(),
            purl: release_version,
        },
    }
}
