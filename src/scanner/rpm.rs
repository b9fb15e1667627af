use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use tokio::process::Command;

use super::{ScanContext, ScanOutcome};
use crate::error::ScanError;
use crate::model::{
    Ecosystem, FactKind, Location, Package, PackageMetadata, RawPackageFact, RpmFields,
    RpmMetadata,
};

/// Package database locations, relative to a layer root.
const RPMDB_PATHS: &[&str] = &[
    "var/lib/rpm/Packages",
    "var/lib/rpm/Packages.db",
    "var/lib/rpm/rpmdb.sqlite",
    "usr/lib/sysimage/rpm/Packages.db",
    "usr/lib/sysimage/rpm/rpmdb.sqlite",
];

/// Header tags queried per package, tab separated. SUMMARY comes last since
/// it is free text.
const QUERY_FORMAT: &str = "%{NAME}\\t%{EPOCH}\\t%{VERSION}\\t%{RELEASE}\\t%{ARCH}\\t%{LICENSE}\\t%{VENDOR}\\t%{SIZE}\\t%{SOURCERPM}\\t%{RSAHEADER:pgpsig}\\t%{SUMMARY}\\n";

const QUERY_FIELDS: usize = 11;

/// What `rpm` prints for an absent tag.
const RPM_NONE: &str = "(none)";

/// Reads native RPM databases through the system `rpm` binary.
pub struct RpmScanner {
    program: String,
}

impl RpmScanner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn query(&self, dbpath: &Path) -> Result<String, ScanError> {
        let output = Command::new(&self.program)
            .arg("--dbpath")
            .arg(dbpath)
            .args(["-qa", "--queryformat", QUERY_FORMAT])
            .output()
            .await
            .map_err(|e| ScanError::Command {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ScanError::Command {
                program: self.program.clone(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for RpmScanner {
    fn default() -> Self {
        Self::new("rpm")
    }
}

#[async_trait]
impl super::Scanner for RpmScanner {
    fn name(&self) -> &'static str {
        "rpm-parser"
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Rpm
    }

    async fn scan(&self, ctx: &ScanContext) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        let databases = RPMDB_PATHS
            .iter()
            .flat_map(|p| ctx.contents.ending_with(p));

        // A directory may hold several database files; query it once.
        let mut queried = HashSet::new();

        for location in databases {
            let Some(dbpath) = location.real_path.parent() else {
                continue;
            };
            if !queried.insert(dbpath.to_path_buf()) {
                continue;
            }

            let output = match self.query(dbpath).await {
                Ok(output) => output,
                Err(err) => {
                    tracing::warn!(path = %location.path, error = %err, "Cannot query rpm database");
                    outcome.errors.push(err);
                    continue;
                }
            };

            for line in output.lines().filter(|l| !l.trim().is_empty()) {
                match RpmRecord::parse_line(line) {
                    Ok(record) => {
                        let fact = record.to_fact();
                        if fact.is_complete() {
                            outcome.packages.push(init_rpm_package(ctx, location, &fact, record));
                        } else {
                            let err = ScanError::partial_fact(Ecosystem::Rpm, line.trim());
                            tracing::debug!(error = %err, "Skipping entry");
                        }
                    }
                    Err(reason) => outcome.errors.push(ScanError::decode(&location.real_path, reason)),
                }
            }
        }

        outcome
    }
}

/// One package header as printed by the rpm query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpmRecord {
    pub name: String,
    pub epoch: Option<u32>,
    pub version: String,
    pub release: String,
    pub arch: String,
    pub license: String,
    pub vendor: String,
    pub size: u64,
    pub source_rpm: String,
    pub pgp: String,
    pub summary: String,
}

impl RpmRecord {
    /// Decodes one line of query output.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.splitn(QUERY_FIELDS, '\t').map(tag_value).collect();
        if fields.len() != QUERY_FIELDS {
            return Err(format!(
                "expected {} fields, found {} in {:?}",
                QUERY_FIELDS,
                fields.len(),
                line
            ));
        }

        let epoch = match fields[1] {
            "" => None,
            e => Some(e.parse().map_err(|_| format!("invalid epoch {:?}", e))?),
        };
        let size = match fields[7] {
            "" => 0,
            s => s.parse().map_err(|_| format!("invalid size {:?}", s))?,
        };

        Ok(Self {
            name: fields[0].to_string(),
            epoch,
            version: fields[2].to_string(),
            release: fields[3].to_string(),
            arch: fields[4].to_string(),
            license: fields[5].to_string(),
            vendor: fields[6].to_string(),
            size,
            source_rpm: fields[8].to_string(),
            pgp: fields[9].to_string(),
            summary: fields[10].to_string(),
        })
    }

    pub fn to_fact(&self) -> RawPackageFact {
        let mut fact = RawPackageFact::new(
            FactKind::Rpm(RpmFields {
                release: non_empty(&self.release),
                epoch: self.epoch,
                architecture: non_empty(&self.arch),
            }),
            &self.name,
            &self.version,
        );
        fact.vendor = non_empty(&self.vendor);
        fact.license = non_empty(&self.license);
        fact
    }

    fn metadata(self) -> RpmMetadata {
        RpmMetadata {
            name: self.name,
            version: self.version,
            release: self.release,
            epoch: self.epoch,
            architecture: self.arch,
            source_rpm: self.source_rpm,
            license: self.license,
            size: self.size,
            pgp: self.pgp,
            summary: self.summary,
            vendor: self.vendor,
        }
    }
}

fn tag_value(field: &str) -> &str {
    let field = field.trim_end_matches(['\r', '\n']);
    if field == RPM_NONE {
        ""
    } else {
        field
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn init_rpm_package(
    ctx: &ScanContext,
    location: &Location,
    fact: &RawPackageFact,
    record: RpmRecord,
) -> Package {
    let identity = ctx.assembler.assemble(fact);
    let summary = record.summary.clone();

    Package::new(fact, identity, PackageMetadata::Rpm(record.metadata()))
        .with_path(location.path.clone())
        .with_description(summary)
        .with_location(location.clone())
}
