//! Vendor string canonicalization.

/// Corporate suffixes stripped from vendor strings by default.
pub const DEFAULT_VENDOR_SUFFIXES: &[&str] = &[", Inc.", ", Inc", ", LLC", ", Ltd."];

/// Turns free-text vendor strings such as `"Red Hat, Inc."` into CPE-safe
/// tokens such as `"redhat"`.
#[derive(Debug, Clone)]
pub struct VendorNormalizer {
    suffixes: Vec<String>,
}

impl VendorNormalizer {
    /// Creates a normalizer with a custom suffix set.
    ///
    /// Suffixes made only of alphanumerics are ignored: the normalized output is
    /// alphanumeric, so stripping such a suffix again would make `normalize` lose
    /// idempotence.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let suffixes = suffixes
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| s.chars().any(|c| !c.is_alphanumeric()))
            .collect();
        Self { suffixes }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn normalize(&self, raw: &str) -> String {
        let mut vendor = raw.trim();

        if let Some(suffix) = self.suffixes.iter().find(|s| vendor.ends_with(s.as_str())) {
            vendor = &vendor[..vendor.len() - suffix.len()];
        }

        vendor
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect()
    }
}

impl Default for VendorNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_VENDOR_SUFFIXES.iter().copied())
    }
}

/// Normalizes a vendor string with the default suffix set.
pub fn normalize_vendor(raw: &str) -> String {
    VendorNormalizer::default().normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_vendor() {
        let cases = [
            ("CentOS", "centos"),
            ("Red Hat, Inc.", "redhat"),
            ("fedoraproject", "fedoraproject"),
            ("Fedora Project", "fedoraproject"),
            ("test", "test"),
            ("   testWithSpace   ", "testwithspace"),
            ("", ""),
            ("   ", ""),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize_vendor(input), expected, "input: {:?}", input);
        }
    }

    #[test]
    fn test_suffix_is_removed_as_a_unit() {
        // Without suffix stripping the "inc" would survive punctuation removal.
        assert_eq!(normalize_vendor("Acme, Inc"), "acme");
        assert_eq!(normalize_vendor("Acme Inc"), "acmeinc");
    }

    #[test]
    fn test_custom_suffixes() {
        let normalizer = VendorNormalizer::new([" GmbH", "Corp"]);
        assert_eq!(normalizer.suffixes(), &[" GmbH".to_string()]);
        assert_eq!(normalizer.normalize("SUSE GmbH"), "suse");
        assert_eq!(normalizer.normalize("MegaCorp"), "megacorp");
    }

    #[test]
    fn test_idempotent_on_known_inputs() {
        for input in ["Red Hat, Inc.", "  The  Apache Software Foundation ", "Ünïcödé Lab, LLC"] {
            let once = normalize_vendor(input);
            assert_eq!(normalize_vendor(&once), once);
        }
    }
}
