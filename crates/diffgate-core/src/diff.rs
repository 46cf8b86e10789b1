//! Diff extraction: changed paths and their context-free added/removed lines.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::vcs::{Revision, Vcs};

/// Whether a diff line was added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Added,
    Removed,
}

/// One content line of a zero-context diff hunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub sign: Sign,
    pub text: String,
}

impl DiffLine {
    pub fn added(text: impl Into<String>) -> Self {
        Self {
            sign: Sign::Added,
            text: text.into(),
        }
    }

    pub fn removed(text: impl Into<String>) -> Self {
        Self {
            sign: Sign::Removed,
            text: text.into(),
        }
    }
}

/// A changed path and its diff lines (header lines excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub path: String,
    pub lines: Vec<DiffLine>,
}

/// Produces the [`ChangedFile`] snapshot for a revision range.
pub struct DiffExtractor<'a> {
    vcs: &'a dyn Vcs,
}

impl<'a> DiffExtractor<'a> {
    pub fn new(vcs: &'a dyn Vcs) -> Self {
        Self { vcs }
    }

    /// List changed paths, then load each path's zero-context diff.
    ///
    /// Any VCS failure aborts extraction; an unreadable diff is never treated
    /// as "no changes".
    pub fn extract(&self, base: &Revision) -> Result<Vec<ChangedFile>> {
        let paths = self.vcs.changed_paths(base)?;
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let raw = self.vcs.file_diff(base, &path)?;
            let lines = parse_unified_diff(&path, &raw);
            files.push(ChangedFile { path, lines });
        }
        info!(base = %base, files = files.len(), "extracted diff");
        Ok(files)
    }
}

/// Decompose unified diff text into added/removed content lines.
///
/// Everything before the first `@@` hunk header is file header. Inside a
/// hunk, `+`/`-` lines are content even when their text starts with `++` or
/// `--`. Anything else inside a hunk is logged and ignored.
pub fn parse_unified_diff(path: &str, raw: &str) -> Vec<DiffLine> {
    let mut lines = Vec::new();
    let mut in_hunk = false;

    for line in raw.lines() {
        if line.starts_with("@@") {
            in_hunk = true;
            continue;
        }
        if line.starts_with("diff --git ") {
            in_hunk = false;
            continue;
        }
        if !in_hunk {
            continue;
        }
        if let Some(text) = line.strip_prefix('+') {
            lines.push(DiffLine::added(text));
        } else if let Some(text) = line.strip_prefix('-') {
            lines.push(DiffLine::removed(text));
        } else if line.starts_with('\\') {
            // "\ No newline at end of file"
        } else {
            debug!(path = %path, line = %line, "ignoring undecodable hunk line");
        }
    }

    lines
}
