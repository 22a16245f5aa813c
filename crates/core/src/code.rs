//! Namespaced asset codes.
//!
//! Item, recipe and mold identities are written as `domain:path`
//! (e.g. `game:ingot-copper`). Paths are dash-separated variant chains, so
//! `metalbit-copper` carries the `copper` metal variant in its last part.
//! Ordering is lexical by `(domain, path)` and is stable across runs, which
//! recipe ordering depends on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Domain used when a code omits an explicit one.
pub const DEFAULT_DOMAIN: &str = "game";

/// Error returned when parsing an invalid [`AssetCode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CodeError {
    message: String,
}

impl CodeError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A namespaced code of the form `domain:path`.
///
/// Paths may contain `*` wildcards (ingredient matchers) and `{name}`
/// placeholders (mold drop templates); plain item codes contain neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetCode {
    domain: String,
    path: String,
}

impl AssetCode {
    /// Parse a code.
    ///
    /// Accepts either:
    /// - `domain:path`
    /// - `path` (uses [`DEFAULT_DOMAIN`])
    pub fn parse(input: &str) -> Result<Self, CodeError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CodeError::new("AssetCode cannot be empty"));
        }

        let (domain, path) = match input.split_once(':') {
            Some((d, p)) => (d, p),
            None => (DEFAULT_DOMAIN, input),
        };

        let domain = domain.trim();
        let path = path.trim();

        validate_domain(domain)?;
        validate_path(path)?;

        Ok(Self {
            domain: domain.to_string(),
            path: path.to_string(),
        })
    }

    /// Build a code from parts that are already known to be valid, such as
    /// compile-time constants. Parts are not validated.
    pub fn from_parts(domain: &str, path: &str) -> Self {
        Self {
            domain: domain.to_string(),
            path: path.to_string(),
        }
    }

    /// Code domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Code path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last dash-separated part of the path (`iron` for `pickaxehead-iron`).
    pub fn last_part(&self) -> &str {
        self.path.rsplit('-').next().unwrap_or(&self.path)
    }

    /// Same domain, different path.
    pub fn with_path(&self, path: &str) -> Result<Self, CodeError> {
        validate_path(path)?;
        Ok(Self {
            domain: self.domain.clone(),
            path: path.to_string(),
        })
    }

    /// Replace every `{placeholder}` in the path with `value`.
    pub fn fill_placeholder(&self, placeholder: &str, value: &str) -> Result<Self, CodeError> {
        let token = format!("{{{placeholder}}}");
        self.with_path(&self.path.replace(&token, value))
    }

    /// Match `other` against this code, treating `*` in the path as "any run
    /// of characters". Domains must be equal.
    pub fn matches(&self, other: &AssetCode) -> bool {
        self.domain == other.domain && wildcard_match(&self.path, &other.path)
    }
}

impl fmt::Display for AssetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.path)
    }
}

impl FromStr for AssetCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AssetCode {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AssetCode> for String {
    fn from(code: AssetCode) -> Self {
        code.to_string()
    }
}

fn wildcard_match(pattern: &str, text: &str) -> bool {
    let p = pattern.as_bytes();
    let t = text.as_bytes();
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut resume = 0usize;

    while ti < t.len() {
        if pi < p.len() && p[pi] == b'*' {
            star = Some(pi);
            pi += 1;
            resume = ti;
        } else if pi < p.len() && p[pi] == t[ti] {
            pi += 1;
            ti += 1;
        } else if let Some(s) = star {
            pi = s + 1;
            resume += 1;
            ti = resume;
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == b'*')
}

fn validate_domain(domain: &str) -> Result<(), CodeError> {
    if domain.is_empty() {
        return Err(CodeError::new("AssetCode domain cannot be empty"));
    }
    if domain.len() > 64 {
        return Err(CodeError::new("AssetCode domain too long (max 64)"));
    }
    if !domain
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'))
    {
        return Err(CodeError::new(
            "AssetCode domain has invalid characters (allowed: a-z0-9_.-)",
        ));
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), CodeError> {
    if path.is_empty() {
        return Err(CodeError::new("AssetCode path cannot be empty"));
    }
    if path.len() > 128 {
        return Err(CodeError::new("AssetCode path too long (max 128)"));
    }
    if !path.chars().all(|c| {
        matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/' | '*' | '{' | '}')
    }) {
        return Err(CodeError::new(
            "AssetCode path has invalid characters (allowed: a-z0-9_./-*{})",
        ));
    }
    Ok(())
}
