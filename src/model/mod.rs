//! Core data types for package facts, identities, and scan results.
//!
//! This module contains the fundamental types used throughout pkgident:
//!
//! - [`Ecosystem`] - The package ecosystem a fact was read from
//! - [`RawPackageFact`] - Minimal per-package data extracted by a reader
//! - [`PackageIdentity`] - CPE candidates, PURL, version and licenses for a fact
//! - [`Package`] - An inventoried package with its identity merged in
//! - [`ScanResult`] - Complete scan results
//!
//! # Example
//!
//! ```
//! use pkgident::model::{FactKind, RawPackageFact};
//! use pkgident::identity::assemble;
//!
//! let fact = RawPackageFact::new(FactKind::Hex, "cowboy", "2.9.0");
//! let identity = assemble(&fact);
//!
//! assert_eq!(identity.purl, "pkg:hex/cowboy@2.9.0");
//! ```

mod fact;
mod package;
mod result;

pub use fact::*;
pub use package::*;
pub use result::*;
