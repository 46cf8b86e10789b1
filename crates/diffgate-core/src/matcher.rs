//! Path predicates used by domain and artifact policies.

use globset::{Glob, GlobMatcher};
use serde::{Serialize, Serializer};

use crate::error::{GateError, Result};

/// A compiled glob that serializes back to its source pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    matcher: GlobMatcher,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = Glob::new(pattern).map_err(|e| GateError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            matcher: glob.compile_matcher(),
        })
    }

    pub fn as_str(&self) -> &str {
        self.matcher.glob().glob()
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for GlobPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Exact path, directory prefix, or glob.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PathMatcher {
    Exact(String),
    Prefix(String),
    Glob(GlobPattern),
}

impl PathMatcher {
    pub fn exact(path: &str) -> Self {
        PathMatcher::Exact(path.to_string())
    }

    pub fn prefix(prefix: &str) -> Self {
        PathMatcher::Prefix(prefix.to_string())
    }

    pub fn glob(pattern: &str) -> Result<Self> {
        Ok(PathMatcher::Glob(GlobPattern::new(pattern)?))
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Exact(p) => path == p,
            PathMatcher::Prefix(p) => path.starts_with(p.as_str()),
            PathMatcher::Glob(g) => g.is_match(path),
        }
    }
}

/// A union of matchers: a path belongs to the set if any matcher accepts it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PathSet(pub Vec<PathMatcher>);

impl PathSet {
    pub fn new(matchers: Vec<PathMatcher>) -> Self {
        Self(matchers)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|m| m.matches(path))
    }
}
