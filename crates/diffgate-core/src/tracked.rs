//! Tracked-file policy: extensions that must never be committed.

use serde::Serialize;

use crate::diagnostic::Diagnostic;

/// Forbids tracked paths ending in any of the listed extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedFilePolicy {
    pub name: String,
    /// Dotted suffixes, e.g. `.onnx`.
    pub forbidden_extensions: Vec<String>,
    /// Diagnostic prefix, followed by the offending path.
    pub message: String,
}

impl TrackedFilePolicy {
    pub fn evaluate(&self, tracked: &[String]) -> Vec<Diagnostic> {
        tracked
            .iter()
            .filter(|p| {
                self.forbidden_extensions
                    .iter()
                    .any(|ext| p.ends_with(ext.as_str()))
            })
            .map(|p| Diagnostic::new(&self.name, format!("{}: {p}", self.message)))
            .collect()
    }
}
