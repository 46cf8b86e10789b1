//! Version-control query port.
//!
//! The gates need exactly four read-only answers from the repository. They
//! are isolated behind [`Vcs`] so classification and gate logic can be driven
//! from synthetic diffs (see [`fakes::MemoryVcs`]) as well as from `git`.

pub mod fakes;
pub mod git;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use fakes::MemoryVcs;
pub use git::GitCli;

/// A resolved point in history, as understood by the backing VCS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Revision(pub String);

impl Revision {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only repository queries used by the gates.
pub trait Vcs: Send + Sync {
    /// Whether `reference` resolves to an existing commit.
    fn ref_exists(&self, reference: &str) -> Result<bool>;

    /// Paths changed between `base` and the current head.
    fn changed_paths(&self, base: &Revision) -> Result<Vec<String>>;

    /// Zero-context unified diff of `path` between `base` and the current head.
    fn file_diff(&self, base: &Revision, path: &str) -> Result<String>;

    /// All paths currently tracked by the repository.
    fn tracked_files(&self) -> Result<Vec<String>>;
}
