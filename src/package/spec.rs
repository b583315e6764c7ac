//! Package specifications
//!
//! A [`PackageSpec`] is the unit every cache operation works on. Construction
//! validates the identifier shape that slot encoding relies on: at most one
//! scope `@` (leading) and at most one `/`.

use crate::error::{LazydepError, LazydepResult};
use std::fmt;
use std::str::FromStr;

/// Version requested when none is given
pub const DEFAULT_VERSION: &str = "latest";

/// Identifier plus optional version, immutable once constructed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageSpec {
    identifier: String,
    version: Option<String>,
}

impl PackageSpec {
    /// Create a validated spec
    pub fn new(identifier: impl Into<String>, version: Option<&str>) -> LazydepResult<Self> {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;

        let version = match version {
            Some(v) => {
                validate_version(v)?;
                Some(v.to_string())
            }
            None => None,
        };

        Ok(Self {
            identifier,
            version,
        })
    }

    /// Registry identifier, e.g. `@scope/name`
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Requested version, if any
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Version passed to the package manager
    pub fn version_or_latest(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    /// `identifier@version` argument for the package manager
    pub fn install_target(&self) -> String {
        format!("{}@{}", self.identifier, self.version_or_latest())
    }
}

impl FromStr for PackageSpec {
    type Err = LazydepError;

    /// Parse `name`, `name@1.2.3`, `@scope/name` or `@scope/name@^2`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // A leading '@' belongs to the scope, so only look for a version
        // separator after it.
        let offset = usize::from(s.starts_with('@'));
        match s[offset..].rfind('@') {
            Some(pos) => {
                let split = pos + offset;
                Self::new(&s[..split], Some(&s[split + 1..]))
            }
            None => Self::new(s, None),
        }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{}", self.identifier, v),
            None => write!(f, "{}", self.identifier),
        }
    }
}

/// Validate an identifier against the slot-encoding precondition
pub fn validate_identifier(identifier: &str) -> LazydepResult<()> {
    let invalid = |reason: &str| {
        Err(LazydepError::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        })
    };

    if identifier.is_empty() {
        return invalid("must not be empty");
    }
    if identifier
        .chars()
        .any(|c| c == '\\' || c == '\0' || c.is_whitespace())
    {
        return invalid("must not contain backslashes, NUL or whitespace");
    }
    if identifier.contains('%') {
        return invalid("must not contain '%'");
    }

    let ats = identifier.matches('@').count();
    if ats > 1 {
        return invalid("must contain at most one '@'");
    }
    if ats == 1 && !identifier.starts_with('@') {
        return invalid("'@' is only allowed as the scope prefix");
    }

    let slashes = identifier.matches('/').count();
    if slashes > 1 {
        return invalid("must contain at most one '/'");
    }

    let body = identifier.trim_start_matches('@');
    if body.starts_with('/') || body.ends_with('/') {
        return invalid("scope and name must both be non-empty");
    }
    if body.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
        return invalid("must not contain empty, '.' or '..' components");
    }

    Ok(())
}

fn validate_version(version: &str) -> LazydepResult<()> {
    if version.is_empty() {
        return Err(LazydepError::InvalidVersion {
            version: version.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if version.chars().any(char::is_whitespace) {
        return Err(LazydepError::InvalidVersion {
            version: version.to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }
    Ok(())
}
