//! Package scanners.
//!
//! This module provides the [`Scanner`] trait and implementations that read
//! package facts from the contents of an extracted image.
//!
//! # Available Scanners
//!
//! | Scanner | Ecosystem | Files |
//! |---------|-----------|-------|
//! | [`ConanScanner`] | Conan | `conanfile.txt`, `conan.lock` |
//! | [`HexScanner`] | Hex | `rebar.lock`, `mix.lock` |
//! | [`RpmScanner`] | RPM | `var/lib/rpm/Packages`, `Packages.db`, `rpmdb.sqlite` |
//!
//! Each scanner returns its own [`ScanOutcome`]. [`scan_all`] runs scanners
//! side by side and merges their outcomes once all of them have finished, so
//! no collection is shared between tasks. A failing file or scanner never
//! stops the others.
//!
//! # Example
//!
//! ```no_run
//! use pkgident::scanner::{all_scanners, scan_all, ScanContext};
//! use pkgident::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::default();
//!     let ctx = ScanContext::new("/tmp/image", &config);
//!     let result = scan_all(&ctx, &all_scanners(&config), true).await;
//!     println!("Found {} packages", result.packages.len());
//! }
//! ```

mod conan;
mod hex;
mod rpm;

pub use conan::{conan_name_version, ConanScanner};
pub use hex::HexScanner;
pub use rpm::{RpmRecord, RpmScanner};

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::join_all;

use crate::config::Config;
use crate::contents::ImageContents;
use crate::error::ScanError;
use crate::identity::{IdentityAssembler, VendorNormalizer};
use crate::image::{read_image_info, ImageInfo};
use crate::model::{Ecosystem, Package, ScanResult};

/// Everything a scanner needs: the image file inventory and the identity
/// assembler shared by all scanners.
pub struct ScanContext {
    pub contents: ImageContents,
    pub assembler: IdentityAssembler,
}

impl ScanContext {
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            contents: ImageContents::collect(root),
            assembler: IdentityAssembler::new(VendorNormalizer::new(config.vendor_suffixes.clone())),
        }
    }

    pub fn from_contents(contents: ImageContents) -> Self {
        Self {
            contents,
            assembler: IdentityAssembler::default(),
        }
    }
}

/// Packages and errors produced by one scanner.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub packages: Vec<Package>,
    pub errors: Vec<ScanError>,
}

impl ScanOutcome {
    pub fn record(&mut self, result: Result<Vec<Package>, ScanError>) {
        match result {
            Ok(packages) => self.packages.extend(packages),
            Err(err) => self.errors.push(err),
        }
    }
}

/// Trait for reading packages of one ecosystem from image contents.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Short name used to prefix error messages, e.g. `conan-parser`.
    fn name(&self) -> &'static str;

    /// Returns the ecosystem this scanner handles.
    fn ecosystem(&self) -> Ecosystem;

    /// Scans the image contents.
    ///
    /// Errors are collected in the outcome rather than returned, so a broken
    /// file does not hide packages found in other files.
    async fn scan(&self, ctx: &ScanContext) -> ScanOutcome;
}

/// Returns the scanners enabled in `config`, in ecosystem order.
pub fn all_scanners(config: &Config) -> Vec<Box<dyn Scanner>> {
    Ecosystem::ALL
        .into_iter()
        .filter(|e| config.is_enabled(*e))
        .map(|e| get_scanner(e, config))
        .collect()
}

/// Returns the scanner for a specific ecosystem.
pub fn get_scanner(ecosystem: Ecosystem, config: &Config) -> Box<dyn Scanner> {
    match ecosystem {
        Ecosystem::Conan => Box::new(ConanScanner),
        Ecosystem::Hex => Box::new(HexScanner),
        Ecosystem::Rpm => Box::new(RpmScanner::new(config.rpm_command.clone())),
    }
}

/// Runs every scanner and merges the outcomes.
///
/// Packages keep scanner order, and within a scanner the order in which they
/// were read. Errors are rendered as `<scanner>: <error>`.
pub async fn scan_all(ctx: &ScanContext, scanners: &[Box<dyn Scanner>], parallel: bool) -> ScanResult {
    let outcomes = if parallel && scanners.len() > 1 {
        join_all(scanners.iter().map(|scanner| scanner.scan(ctx))).await
    } else {
        let mut outcomes = Vec::with_capacity(scanners.len());
        for scanner in scanners {
            outcomes.push(scanner.scan(ctx).await);
        }
        outcomes
    };

    let mut result = ScanResult::default();
    for (scanner, outcome) in scanners.iter().zip(outcomes) {
        tracing::info!(
            scanner = scanner.name(),
            packages = outcome.packages.len(),
            errors = outcome.errors.len(),
            "Scanner finished"
        );
        result.packages.extend(outcome.packages);
        result
            .errors
            .extend(outcome.errors.iter().map(|e| format!("{}: {}", scanner.name(), e)));
    }

    result
}

/// Scans an extracted image: packages from every enabled scanner, plus the
/// image metadata found at `root`.
pub async fn scan_image(root: &Path, config: &Config) -> ScanResult {
    let ctx = ScanContext::new(root, config);
    let mut result = scan_all(&ctx, &all_scanners(config), config.parallel).await;

    let (image, errors) = read_image_info(root);
    result
        .errors
        .extend(errors.iter().map(|e| format!("docker-parser: {}", e)));
    if image != ImageInfo::default() {
        result.image = Some(image);
    }

    result
}
