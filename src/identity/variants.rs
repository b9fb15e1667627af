//! Hyphen/underscore spelling variants of product names.
//!
//! Vulnerability dictionaries are inconsistent about whether a project is
//! spelled `p11-kit` or `p11_kit`, so candidates are generated for both.
//! Only `-` toggles; underscores already present in a name are left alone.

/// Number of leading hyphens that take part in toggling.
pub const MAX_TOGGLED_HYPHENS: usize = 4;

/// Spelling variants of one product name.
///
/// A spelling is identified by a bit mask over the toggled hyphens, leftmost
/// hyphen as the lowest bit; a set bit means `_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameVariants {
    name: String,
    hyphens: Vec<usize>,
}

impl NameVariants {
    pub fn new(name: &str) -> Self {
        let hyphens = name
            .match_indices('-')
            .map(|(i, _)| i)
            .take(MAX_TOGGLED_HYPHENS)
            .collect();
        Self {
            name: name.to_string(),
            hyphens,
        }
    }

    /// Number of toggled hyphens.
    pub fn toggles(&self) -> usize {
        self.hyphens.len()
    }

    /// Substring before the first hyphen, if the name has one.
    pub fn root(&self) -> Option<&str> {
        self.hyphens
            .first()
            .map(|&i| &self.name[..i])
            .filter(|root| !root.is_empty())
    }

    fn spelling(&self, mask: usize) -> String {
        let mut bytes = self.name.clone().into_bytes();
        for (bit, &i) in self.hyphens.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                bytes[i] = b'_';
            }
        }
        // Only ASCII '-' bytes were swapped for ASCII '_'.
        String::from_utf8(bytes).unwrap_or_else(|_| self.name.clone())
    }

    /// Hyphens replaced by `_` one at a time from the left:
    /// `a-b-c`, `a_b-c`, `a_b_c`.
    pub fn forward(&self) -> Vec<String> {
        (0..=self.toggles())
            .map(|i| self.spelling((1 << i) - 1))
            .collect()
    }

    /// The all-underscore spelling with hyphens restored one at a time from
    /// the left: `a_b_c`, `a-b_c`, `a-b-c`.
    pub fn reverse(&self) -> Vec<String> {
        let all = (1 << self.toggles()) - 1;
        (0..=self.toggles())
            .map(|i| self.spelling(all & !((1 << i) - 1)))
            .collect()
    }
}
