use std::fmt;

use serde::{Deserialize, Serialize};

/// Filename prefix of a persisted matrix version.
pub const FILE_PREFIX: &str = "Matrix_v";

/// Filename extension of a persisted matrix version.
pub const FILE_SUFFIX: &str = ".csv";

/// Two-part matrix version, encoded in the filename
/// (`Matrix_v2.7.csv` -> version 2.7).
///
/// Versions are strictly monotonic: the only transition is `next()`,
/// which advances minor by 1. Nothing ever decreases or skips a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatrixVersion {
    pub major: u32,
    pub minor: u32,
}

impl MatrixVersion {
    /// Version of the first matrix ever written.
    pub const FIRST: Self = Self { major: 1, minor: 0 };

    /// The version a reconciliation run starting from this one produces.
    pub fn next(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor + 1,
        }
    }

    /// Filename this version is persisted under.
    pub fn filename(self) -> String {
        format!("{FILE_PREFIX}{}.{}{FILE_SUFFIX}", self.major, self.minor)
    }

    /// Parse a version out of a matrix filename. Anything that is not
    /// exactly `Matrix_v<major>.<minor>.csv` yields `None`.
    pub fn parse_filename(name: &str) -> Option<Self> {
        let stem = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
        let (major, minor) = stem.split_once('.')?;
        Some(Self {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }
}

impl fmt::Display for MatrixVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}
