//! Package URL synthesis.
//!
//! Names and versions are expected to be free of reserved PURL separators
//! already, so no percent-encoding is applied.

use crate::model::Ecosystem;

/// Qualifiers appended to a PURL, in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurlQualifiers<'a> {
    pub arch: Option<&'a str>,
}

/// Builds `pkg:<type>/<name>@<version>[?qualifiers]`.
///
/// Only RPM PURLs carry qualifiers (`arch`).
pub fn build_purl(ecosystem: Ecosystem, name: &str, version: &str, qualifiers: &PurlQualifiers<'_>) -> String {
    let mut purl = format!("pkg:{}/{}@{}", ecosystem.as_str(), name, version);

    if ecosystem == Ecosystem::Rpm {
        if let Some(arch) = qualifiers.arch.map(str::trim).filter(|a| !a.is_empty()) {
            purl.push_str("?arch=");
            purl.push_str(arch);
        }
    }

    purl
}

/// Drops range brackets from a version token: `[>1.0 <2.0]` becomes
/// `>1.0 <2.0`. The range is kept as literal text, not interpreted.
pub fn strip_version_range(version: &str) -> String {
    if version.contains('[') && version.contains(']') {
        version.replace(['[', ']'], "")
    } else {
        version.to_string()
    }
}
