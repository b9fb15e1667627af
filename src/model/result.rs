use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Ecosystem, Package};
use crate::image::ImageInfo;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub packages: Vec<Package>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<ImageInfo>,
}

impl ScanResult {
    pub fn new(packages: Vec<Package>) -> Self {
        Self {
            packages,
            errors: Vec::new(),
            image: None,
        }
    }

    /// Package count per ecosystem, in ecosystem order.
    pub fn counts(&self) -> BTreeMap<Ecosystem, usize> {
        let mut counts = BTreeMap::new();
        for package in &self.packages {
            *counts.entry(package.ecosystem).or_insert(0) += 1;
        }
        counts
    }
}
