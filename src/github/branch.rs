//! Feature branch naming.

use std::fmt;

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;

const SUFFIX_LEN: usize = 6;

/// Name of the branch the pipeline commits to.
///
/// Generated names take the form `feature/<prefix>-<unixMillis>-<suffix>`.
/// The random suffix makes collisions between concurrent runs unlikely but
/// not impossible; creation still fails loudly when the ref already exists.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct BranchName(String);

impl BranchName {
    /// Generates a fresh branch name from the current time and a random
    /// suffix.
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LEN)
            .map(|byte| char::from(byte).to_ascii_lowercase())
            .collect();
        Self::from_parts(prefix, Utc::now().timestamp_millis(), &suffix)
    }

    /// Builds a generated-style name from explicit parts.
    #[must_use]
    pub fn from_parts(prefix: &str, unix_millis: i64, suffix: &str) -> Self {
        Self(format!("feature/{prefix}-{unix_millis}-{suffix}"))
    }

    /// Uses a caller-chosen branch name verbatim.
    #[must_use]
    pub fn explicit(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the branch name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
