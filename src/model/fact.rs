use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Conan,
    Hex,
    Rpm,
}

impl Ecosystem {
    pub const ALL: [Ecosystem; 3] = [Ecosystem::Conan, Ecosystem::Hex, Ecosystem::Rpm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Conan => "conan",
            Ecosystem::Hex => "hex",
            Ecosystem::Rpm => "rpm",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Conan => "Conan",
            Ecosystem::Hex => "Hex",
            Ecosystem::Rpm => "RPM",
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Ecosystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conan" => Ok(Ecosystem::Conan),
            "hex" | "erlang" | "elixir" => Ok(Ecosystem::Hex),
            "rpm" => Ok(Ecosystem::Rpm),
            _ => Err(format!("Unknown parser: {}. Use: conan, hex, rpm", s)),
        }
    }
}

/// RPM header fields that take part in identity synthesis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RpmFields {
    pub release: Option<String>,
    pub epoch: Option<u32>,
    pub architecture: Option<String>,
}

/// Ecosystem tag of a fact, carrying the fields only that ecosystem has.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "ecosystem", rename_all = "lowercase")]
pub enum FactKind {
    Conan,
    Hex,
    Rpm(RpmFields),
}

impl FactKind {
    pub fn ecosystem(&self) -> Ecosystem {
        match self {
            FactKind::Conan => Ecosystem::Conan,
            FactKind::Hex => Ecosystem::Hex,
            FactKind::Rpm(_) => Ecosystem::Rpm,
        }
    }
}

/// The minimal per-package data a reader extracts before identity synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawPackageFact {
    pub kind: FactKind,
    pub name: String,
    pub version: String,
    pub vendor: Option<String>,
    pub license: Option<String>,
}

impl RawPackageFact {
    pub fn new(kind: FactKind, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            version: version.into(),
            vendor: None,
            license: None,
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.kind.ecosystem()
    }

    pub fn release(&self) -> Option<&str> {
        match &self.kind {
            FactKind::Rpm(rpm) => rpm.release.as_deref(),
            _ => None,
        }
    }

    pub fn epoch(&self) -> Option<u32> {
        match &self.kind {
            FactKind::Rpm(rpm) => rpm.epoch,
            _ => None,
        }
    }

    pub fn architecture(&self) -> Option<&str> {
        match &self.kind {
            FactKind::Rpm(rpm) => rpm.architecture.as_deref(),
            _ => None,
        }
    }

    /// A fact can only become a package when both name and version are known.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.version.trim().is_empty()
    }
}

/// Identity fields synthesized for one fact, merged into its [`Package`](super::Package).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub cpes: Vec<String>,
    pub purl: String,
    pub version: String,
    pub licenses: Vec<String>,
}
