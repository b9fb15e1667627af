//! Errors raised while reading image contents.
//!
//! Identity synthesis itself never fails; every variant here comes from a
//! reader. Readers report one error per failed file and carry on with the
//! next one.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::Ecosystem;

#[derive(Error, Debug)]
pub enum ScanError {
    /// A manifest, lockfile or package database could not be read.
    #[error("cannot read {path:?}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file was read but its contents are malformed.
    #[error("cannot decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// An entry lacks a name or version and was skipped.
    #[error("incomplete {ecosystem} entry {reference:?}: missing name or version")]
    PartialFact {
        ecosystem: Ecosystem,
        reference: String,
    },

    /// An external tool used to decode a database failed.
    #[error("{program} failed: {reason}")]
    Command { program: String, reason: String },
}

impl ScanError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ScanError::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn partial_fact(ecosystem: Ecosystem, reference: impl Into<String>) -> Self {
        ScanError::PartialFact {
            ecosystem,
            reference: reference.into(),
        }
    }
}
