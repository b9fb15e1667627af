//! CPE 2.3 candidate generation.
//!
//! Dictionary entries spell the same project in several ways: the vendor may
//! be the real distributor, the project name itself, or a truncated root of
//! the name, and hyphens may appear as underscores. Candidates are generated
//! for the likely combinations, not for the full cross product.
//!
//! Pairing, with `forward`/`reverse` being the spelling chains of
//! [`NameVariants`]:
//!
//! 1. the real vendor pairs with every spelling of the forward chain;
//! 2. the forward-chain spellings, then the root, act as pseudo-vendors in
//!    that order; the pseudo-vendor at an even position pairs with the forward
//!    chain, at an odd position with the reverse chain.
//!
//! For a name without hyphens this yields `vendor:name` then `name:name`.

use indexmap::IndexSet;

use super::variants::NameVariants;

const CPE_PREFIX: &str = "cpe:2.3:a";
const CPE_ANY_SUFFIX: &str = "*:*:*:*:*:*:*";

/// Formats one CPE 2.3 application string.
pub fn format_cpe(vendor: &str, product: &str, version: &str) -> String {
    format!("{}:{}:{}:{}:{}", CPE_PREFIX, vendor, product, version, CPE_ANY_SUFFIX)
}

/// Generates the ordered, deduplicated candidate list.
///
/// `vendor` must already be normalized; an empty vendor contributes no
/// candidates of its own.
pub fn generate_cpes(vendor: &str, product: &str, version: &str) -> Vec<String> {
    let product = product.trim().to_lowercase();
    if product.is_empty() {
        return Vec::new();
    }

    let variants = NameVariants::new(&product);
    let forward = variants.forward();
    let reverse = variants.reverse();

    let mut candidates = IndexSet::new();

    if !vendor.is_empty() {
        for name in &forward {
            candidates.insert(format_cpe(vendor, name, version));
        }
    }

    let pseudo_vendors = forward
        .iter()
        .map(String::as_str)
        .chain(variants.root());

    for (position, pseudo_vendor) in pseudo_vendors.enumerate() {
        let products = if position % 2 == 0 { &forward } else { &reverse };
        for name in products {
            candidates.insert(format_cpe(pseudo_vendor, name, version));
        }
    }

    candidates.into_iter().collect()
}
