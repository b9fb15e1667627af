//! Package identity synthesis.
//!
//! Turns a [`RawPackageFact`] into a [`PackageIdentity`]: candidate CPE 2.3
//! strings, a PURL, an epoch-aware display version, and a license list.
//!
//! Synthesis is pure. The same fact always produces the same identity, and an
//! [`IdentityAssembler`] can be shared across scanner tasks without locking.
//!
//! # Example
//!
//! ```
//! use pkgident::identity::IdentityAssembler;
//! use pkgident::model::{FactKind, RawPackageFact, RpmFields};
//!
//! let fact = RawPackageFact::new(
//!     FactKind::Rpm(RpmFields {
//!         release: Some("14.el8".to_string()),
//!         epoch: None,
//!         architecture: Some("x86_64".to_string()),
//!     }),
//!     "lzo",
//!     "2.08",
//! )
//! .with_vendor("CentOS")
//! .with_license("GPLv2+");
//!
//! let identity = IdentityAssembler::default().assemble(&fact);
//!
//! assert_eq!(identity.version, "2.08-14.el8");
//! assert_eq!(identity.purl, "pkg:rpm/lzo@2.08-14.el8?arch=x86_64");
//! assert_eq!(identity.cpes[0], "cpe:2.3:a:centos:lzo:2.08-14.el8:*:*:*:*:*:*:*");
//! assert_eq!(identity.licenses, vec!["GPLv2+"]);
//! ```

pub mod cpe;
pub mod license;
pub mod purl;
pub mod variants;
pub mod vendor;
pub mod version;

pub use cpe::{format_cpe, generate_cpes};
pub use license::split_licenses;
pub use purl::{build_purl, strip_version_range, PurlQualifiers};
pub use variants::NameVariants;
pub use vendor::{normalize_vendor, VendorNormalizer, DEFAULT_VENDOR_SUFFIXES};
pub use version::{compose_version, ComposedVersion};

use crate::model::{PackageIdentity, RawPackageFact};

/// Runs the synthesis steps for one fact at a time.
#[derive(Debug, Clone, Default)]
pub struct IdentityAssembler {
    vendors: VendorNormalizer,
}

impl IdentityAssembler {
    pub fn new(vendors: VendorNormalizer) -> Self {
        Self { vendors }
    }

    /// Synthesizes the identity of `fact`.
    ///
    /// Never fails: a missing vendor, license or release is treated as empty.
    /// Callers are expected to drop facts without a name or version first
    /// (see [`RawPackageFact::is_complete`]).
    pub fn assemble(&self, fact: &RawPackageFact) -> PackageIdentity {
        let vendor = self.vendors.normalize(fact.vendor.as_deref().unwrap_or_default());
        let licenses = split_licenses(fact.license.as_deref().unwrap_or_default());

        let version = strip_version_range(fact.version.trim());
        let composed = compose_version(&version, fact.release(), fact.epoch());

        let cpes = generate_cpes(&vendor, &fact.name, &composed.cpe);
        let qualifiers = PurlQualifiers {
            arch: fact.architecture(),
        };
        let purl = build_purl(fact.ecosystem(), &fact.name, &composed.purl, &qualifiers);

        tracing::trace!(
            name = %fact.name,
            ecosystem = %fact.ecosystem(),
            cpes = cpes.len(),
            "Synthesized package identity"
        );

        PackageIdentity {
            cpes,
            purl,
            version: composed.display,
            licenses,
        }
    }
}

/// Synthesizes an identity with the default vendor suffix set.
pub fn assemble(fact: &RawPackageFact) -> PackageIdentity {
    IdentityAssembler::default().assemble(fact)
}
