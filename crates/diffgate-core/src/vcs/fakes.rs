//! In-memory fake for the [`Vcs`] port (testing only)
//!
//! `MemoryVcs` answers every query from data supplied up front, so gates can
//! be exercised against synthetic diffs without a repository on disk.

use std::collections::HashSet;

use super::{Revision, Vcs};
use crate::error::{GateError, Result};

/// Synthetic repository state.
#[derive(Debug, Clone)]
pub struct MemoryVcs {
    commits: usize,
    refs: HashSet<String>,
    changes: Vec<(String, String)>,
    tracked: Vec<String>,
}

impl Default for MemoryVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVcs {
    /// A repository with two commits and no named references.
    pub fn new() -> Self {
        Self {
            commits: 2,
            refs: HashSet::new(),
            changes: Vec::new(),
            tracked: Vec::new(),
        }
    }

    /// Set how many commits the history holds (`0` means no HEAD at all).
    pub fn with_commits(mut self, commits: usize) -> Self {
        self.commits = commits;
        self
    }

    /// Register a named reference such as `origin/main`.
    pub fn with_ref(mut self, reference: &str) -> Self {
        self.refs.insert(reference.to_string());
        self
    }

    /// Register a changed path with its raw unified diff text.
    pub fn with_diff(mut self, path: &str, diff: &str) -> Self {
        self.changes.push((path.to_string(), diff.to_string()));
        self
    }

    /// Register a changed path whose diff consists of the given `+`/`-` lines.
    ///
    /// Each entry must already carry its sign, e.g. `"+  return x;"`.
    pub fn with_change(self, path: &str, signed_lines: &[&str]) -> Self {
        let mut diff = format!(
            "diff --git a/{path} b/{path}\nindex 0000000..1111111 100644\n--- a/{path}\n+++ b/{path}\n@@ -1 +1 @@\n"
        );
        for line in signed_lines {
            diff.push_str(line);
            diff.push('\n');
        }
        self.with_diff(path, &diff)
    }

    /// Register a path as tracked by the repository.
    pub fn with_tracked(mut self, path: &str) -> Self {
        self.tracked.push(path.to_string());
        self
    }
}

impl Vcs for MemoryVcs {
    fn ref_exists(&self, reference: &str) -> Result<bool> {
        Ok(match reference {
            "HEAD" => self.commits >= 1,
            "HEAD~1" => self.commits >= 2,
            other => self.commits >= 1 && self.refs.contains(other),
        })
    }

    fn changed_paths(&self, base: &Revision) -> Result<Vec<String>> {
        if base.as_str() == "HEAD" {
            return Ok(Vec::new());
        }
        Ok(self.changes.iter().map(|(p, _)| p.clone()).collect())
    }

    fn file_diff(&self, base: &Revision, path: &str) -> Result<String> {
        if base.as_str() == "HEAD" {
            return Ok(String::new());
        }
        self.changes
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, d)| d.clone())
            .ok_or_else(|| GateError::GitError(format!("no diff recorded for {path}")))
    }

    fn tracked_files(&self) -> Result<Vec<String>> {
        Ok(self.tracked.clone())
    }
}
