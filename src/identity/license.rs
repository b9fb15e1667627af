//! License expression splitting.
//!
//! Only the literal lowercase conjunctions found in package headers are
//! recognized; this is not an SPDX expression parser.

const SEPARATORS: &[&str] = &[" and ", " or "];

/// Splits a free-text license expression into its license identifiers.
///
/// Order follows the source text; duplicates are kept; blank input yields an
/// empty list.
pub fn split_licenses(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let mut tokens = vec![raw];
    for separator in SEPARATORS {
        tokens = tokens
            .into_iter()
            .flat_map(|token| token.split(separator))
            .collect();
    }

    tokens
        .into_iter()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_licenses() {
        assert_eq!(split_licenses("license01 and license02"), vec!["license01", "license02"]);
        assert_eq!(split_licenses("license01 or license02"), vec!["license01", "license02"]);
        assert!(split_licenses(" ").is_empty());
        assert!(split_licenses("").is_empty());
    }

    #[test]
    fn test_single_license() {
        assert_eq!(split_licenses("BSD"), vec!["BSD"]);
        assert_eq!(split_licenses("  GPLv2+ "), vec!["GPLv2+"]);
    }

    #[test]
    fn test_mixed_separators_keep_order() {
        assert_eq!(
            split_licenses("GPLv2+ and LGPLv2+ or MIT and GPLv2+"),
            vec!["GPLv2+", "LGPLv2+", "MIT", "GPLv2+"]
        );
    }

    #[test]
    fn test_uppercase_conjunctions_are_not_separators() {
        assert_eq!(split_licenses("MIT OR Apache-2.0"), vec!["MIT OR Apache-2.0"]);
    }

    #[test]
    fn test_dangling_separator_drops_blank_tokens() {
        assert_eq!(split_licenses("MIT and  and BSD"), vec!["MIT", "BSD"]);
    }
}
