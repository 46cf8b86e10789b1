//! Static zone scanning over the working tree.
//!
//! Zone policies describe absolute invariants of the current tree: forbidden
//! imports between layers, raw-media handling in privacy-sensitive modules,
//! and guard usages that must be present. The scan reads whole files, not
//! diffs, so a violation present since a file's creation is still reported.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::debug;
use walkdir::WalkDir;

use crate::diagnostic::Diagnostic;
use crate::error::{GateError, Result};
use crate::metrics::METRICS;
use crate::obs::emit_zone_scanned;

/// A literal substring that must not appear in zone files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForbiddenToken {
    pub token: String,
    /// Verb phrase used in the diagnostic, e.g. `imports forbidden dependency`.
    pub reason: String,
}

impl ForbiddenToken {
    pub fn new(token: &str, reason: &str) -> Self {
        Self {
            token: token.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn serialize_regex<S: Serializer>(re: &Regex, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(re.as_str())
}

/// A regular expression that must not match zone files.
#[derive(Debug, Clone, Serialize)]
pub struct ForbiddenPattern {
    #[serde(serialize_with = "serialize_regex")]
    pub regex: Regex,
    pub reason: String,
}

impl ForbiddenPattern {
    pub fn new(pattern: &str, reason: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| GateError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            regex,
            reason: reason.to_string(),
        })
    }
}

/// A file that, when present, must contain a marker string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredMarker {
    pub path: PathBuf,
    pub marker: String,
    pub message: String,
}

/// Forbidden token/pattern policy over one or more directory zones.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ZonePolicy {
    pub name: String,
    /// Zone roots, relative to the repository root.
    pub roots: Vec<PathBuf>,
    /// Subtrees skipped entirely, even when under a zone root.
    pub exempt: Vec<PathBuf>,
    /// File extensions to scan; empty means every file.
    pub extensions: Vec<String>,
    pub forbidden_tokens: Vec<ForbiddenToken>,
    pub forbidden_patterns: Vec<ForbiddenPattern>,
    pub required_markers: Vec<RequiredMarker>,
}

impl ZonePolicy {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_root(mut self, root: &str) -> Self {
        self.roots.push(PathBuf::from(root));
        self
    }

    pub fn with_exempt(mut self, subtree: &str) -> Self {
        self.exempt.push(PathBuf::from(subtree));
        self
    }

    pub fn with_extension(mut self, ext: &str) -> Self {
        self.extensions.push(ext.to_string());
        self
    }

    pub fn with_token(mut self, token: ForbiddenToken) -> Self {
        self.forbidden_tokens.push(token);
        self
    }

    pub fn with_pattern(mut self, pattern: ForbiddenPattern) -> Self {
        self.forbidden_patterns.push(pattern);
        self
    }

    pub fn with_marker(mut self, path: &str, marker: &str, message: &str) -> Self {
        self.required_markers.push(RequiredMarker {
            path: PathBuf::from(path),
            marker: marker.to_string(),
            message: message.to_string(),
        });
        self
    }

    fn is_exempt(&self, rel: &Path) -> bool {
        self.exempt.iter().any(|e| rel.starts_with(e))
    }

    fn wants(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|want| want == e))
            .unwrap_or(false)
    }

    /// Diagnostics for one file's full contents; one per matching rule.
    fn check_contents(&self, display: &str, contents: &str) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for t in &self.forbidden_tokens {
            if contents.contains(t.token.as_str()) {
                diagnostics.push(Diagnostic::new(
                    &self.name,
                    format!("{display} {} '{}'.", t.reason, t.token),
                ));
            }
        }
        for p in &self.forbidden_patterns {
            if let Some(m) = p.regex.find(contents) {
                diagnostics.push(Diagnostic::new(
                    &self.name,
                    format!("{display} {} '{}'.", p.reason, m.as_str()),
                ));
            }
        }
        diagnostics
    }
}

/// Scan every zone root of `policy` under `repo_root`.
///
/// Missing zone roots are skipped. Unreadable files abort the scan.
pub fn scan_zone(repo_root: &Path, policy: &ZonePolicy) -> Result<Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();
    let mut files = 0u64;

    for marker in &policy.required_markers {
        let path = repo_root.join(&marker.path);
        if !path.is_file() {
            debug!(path = %marker.path.display(), "guarded file absent, marker not required");
            continue;
        }
        let contents = std::fs::read_to_string(&path)?;
        if !contents.contains(marker.marker.as_str()) {
            diagnostics.push(Diagnostic::new(&policy.name, marker.message.clone()));
        }
    }

    for root in &policy.roots {
        let abs_root = repo_root.join(root);
        if !abs_root.exists() {
            debug!(zone = %policy.name, root = %root.display(), "zone root absent, skipping");
            continue;
        }

        let walker = WalkDir::new(&abs_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let rel = e.path().strip_prefix(repo_root).unwrap_or(e.path());
                !policy.is_exempt(rel)
            });

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !policy.wants(entry.path()) {
                continue;
            }
            let rel = entry.path().strip_prefix(repo_root).unwrap_or(entry.path());
            let contents = std::fs::read_to_string(entry.path())?;
            files += 1;
            METRICS.inc_files_scanned();
            diagnostics.extend(policy.check_contents(&rel.display().to_string(), &contents));
        }
    }

    emit_zone_scanned(&policy.name, files, diagnostics.len());
    Ok(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn boundary_policy() -> ZonePolicy {
        ZonePolicy::new("architecture_boundaries")
            .with_root("lib/services")
            .with_exempt("lib/services/ui")
            .with_extension("dart")
            .with_token(ForbiddenToken::new(
                "package:flutter",
                "imports forbidden dependency",
            ))
    }

    #[test]
    fn test_exempt_subtree_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/services/ui/view.dart", "import 'package:flutter/widgets.dart';");
        let diags = scan_zone(dir.path(), &boundary_policy()).unwrap();
        assert!(diags.is_empty());
    }

    #[test]
    fn test_file_outside_exempt_subtree_flagged() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/services/view.dart", "import 'package:flutter/widgets.dart';");
        let diags = scan_zone(dir.path(), &boundary_policy()).unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].message,
            "lib/services/view.dart imports forbidden dependency 'package:flutter'."
        );
    }

    #[test]
    fn test_sibling_with_exempt_prefix_is_not_exempt() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/services/uikit/a.dart", "package:flutter");
        assert_eq!(scan_zone(dir.path(), &boundary_policy()).unwrap().len(), 1);
    }

    #[test]
    fn test_other_extensions_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/services/notes.md", "package:flutter");
        assert!(scan_zone(dir.path(), &boundary_policy()).unwrap().is_empty());
    }

    #[test]
    fn test_every_rule_match_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "lib/screens/capture.dart",
            "controller.startVideoRecording();\nfinal out = 'clip.MP4';\ncontroller.stopVideoRecording();",
        );
        let policy = ZonePolicy::new("privacy_guards")
            .with_root("lib/screens")
            .with_token(ForbiddenToken::new("startVideoRecording", "uses raw video recording API"))
            .with_token(ForbiddenToken::new("stopVideoRecording", "uses raw video recording API"))
            .with_pattern(
                ForbiddenPattern::new(
                    r"(?i)\.(mp4|mov)\b",
                    "references a raw video file extension",
                )
                .unwrap(),
            );
        let diags = scan_zone(dir.path(), &policy).unwrap();
        assert_eq!(diags.len(), 3);
        assert!(diags[2].message.ends_with("references a raw video file extension '.MP4'."));
    }

    #[test]
    fn test_required_marker() {
        let dir = tempfile::tempdir().unwrap();
        let policy = ZonePolicy::new("privacy_guards").with_marker(
            "lib/services/bio.dart",
            "LandmarkPrivacyFilter",
            "bio tracking must apply LandmarkPrivacyFilter.",
        );

        assert!(scan_zone(dir.path(), &policy).unwrap().is_empty());

        write(dir.path(), "lib/services/bio.dart", "class Bio {}");
        let diags = scan_zone(dir.path(), &policy).unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "bio tracking must apply LandmarkPrivacyFilter.");

        write(dir.path(), "lib/services/bio.dart", "LandmarkPrivacyFilter.apply(x);");
        assert!(scan_zone(dir.path(), &policy).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(ForbiddenPattern::new("(", "broken").is_err());
    }
}
