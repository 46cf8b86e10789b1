//! Markdown hygiene for top-level and `docs/` documentation.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::diagnostic::Diagnostic;
use crate::error::Result;

/// Which documents to lint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocLintPolicy {
    pub name: String,
    /// Individual files, relative to the repository root.
    pub files: Vec<PathBuf>,
    /// Directories whose `*.md` children (non-recursive) are linted too.
    pub dirs: Vec<PathBuf>,
}

impl DocLintPolicy {
    /// Existing documents in a stable order: listed files, then directory children.
    fn documents(&self, repo_root: &Path) -> Result<Vec<PathBuf>> {
        let mut docs: Vec<PathBuf> = self
            .files
            .iter()
            .filter(|f| repo_root.join(f).is_file())
            .cloned()
            .collect();

        for dir in &self.dirs {
            let abs = repo_root.join(dir);
            if !abs.is_dir() {
                continue;
            }
            let mut children = Vec::new();
            for entry in std::fs::read_dir(&abs)? {
                let path = entry?.path();
                if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("md") {
                    if let Some(name) = path.file_name() {
                        children.push(dir.join(name));
                    }
                }
            }
            children.sort();
            docs.extend(children);
        }
        Ok(docs)
    }
}

/// Report trailing whitespace and documents that do not open with a heading.
pub fn lint_docs(repo_root: &Path, policy: &DocLintPolicy) -> Result<Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();
    for doc in policy.documents(repo_root)? {
        let contents = std::fs::read_to_string(repo_root.join(&doc))?;
        let display = doc.display();

        for (idx, line) in contents.lines().enumerate() {
            if line.trim_end() != line {
                diagnostics.push(Diagnostic::new(
                    &policy.name,
                    format!("{display}:{} has trailing whitespace.", idx + 1),
                ));
            }
        }

        if let Some(first) = contents.lines().find(|l| !l.trim().is_empty()) {
            if !first.starts_with('#') {
                diagnostics.push(Diagnostic::new(
                    &policy.name,
                    format!("{display} must start with a markdown heading."),
                ));
            }
        }
    }
    Ok(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> DocLintPolicy {
        DocLintPolicy {
            name: "doc_lint".to_string(),
            files: vec![PathBuf::from("ARCHITECTURE.md")],
            dirs: vec![PathBuf::from("docs")],
        }
    }

    #[test]
    fn test_clean_docs_pass() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ARCHITECTURE.md"), "\n# Layers\n\ntext\n").unwrap();
        assert!(lint_docs(dir.path(), &policy()).unwrap().is_empty());
    }

    #[test]
    fn test_trailing_whitespace_and_missing_heading() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("docs/nested")).unwrap();
        std::fs::write(dir.path().join("docs/ml.md"), "intro \n# Title\n").unwrap();
        std::fs::write(dir.path().join("docs/nested/skip.md"), "no heading").unwrap();
        std::fs::write(dir.path().join("docs/notes.txt"), "no heading").unwrap();

        let diags = lint_docs(dir.path(), &policy()).unwrap();
        let messages: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "docs/ml.md:1 has trailing whitespace.",
                "docs/ml.md must start with a markdown heading.",
            ]
        );
    }
}
