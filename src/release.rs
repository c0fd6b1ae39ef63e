use crate::error::{BumpError, Result};
use std::fmt;
use std::str::FromStr;

/// Release type for a bump run
///
/// Controls how the change is described in commit messages and tags. The
/// default release type is [ReleaseType::Beta].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseType {
    #[default]
    Beta,
    Release,
}

impl ReleaseType {
    /// All valid release type names, in declaration order
    pub const NAMES: [&'static str; 2] = ["beta", "release"];
}

impl FromStr for ReleaseType {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "beta" => Ok(ReleaseType::Beta),
            "release" => Ok(ReleaseType::Release),
            other => Err(BumpError::config(format!(
                "release_type is invalid: '{}', valid values are: {:?}",
                other,
                Self::NAMES
            ))),
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::Beta => write!(f, "beta"),
            ReleaseType::Release => write!(f, "release"),
        }
    }
}
