//! Companion-artifact gates.
//!
//! A [`DomainPolicy`] binds a set of source paths to the companion artifacts
//! that must change alongside them. [`evaluate_domain`] decides whether the
//! domain was touched in a meaningful way and, if so, whether the required
//! artifacts were updated.

use serde::Serialize;
use tracing::debug;

use crate::classify::ClassifierKind;
use crate::diagnostic::Diagnostic;
use crate::diff::ChangedFile;
use crate::doc_update::is_substantive;
use crate::matcher::{PathMatcher, PathSet};
use crate::metrics::METRICS;
use crate::obs::emit_gate_evaluated;

const DOC_HINT: &str = "with header, bullet, and invariant impact";

// ---------------------------------------------------------------------------
// Policy data
// ---------------------------------------------------------------------------

/// What makes a domain change count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "classifier", rename_all = "snake_case")]
pub enum Trigger {
    /// At least one added/removed line is semantic for the classifier.
    Semantic(ClassifierKind),
    /// Any change to a matching path.
    AnyChange,
}

/// Kind of companion artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Documentation; the update must also pass the doc-update check.
    Doc,
    Tests,
    Benchmark,
    ModelCard,
}

/// How a domain's requirements combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementMode {
    /// One satisfied requirement is enough; one diagnostic otherwise.
    AnyOf,
    /// Every requirement must be satisfied; one diagnostic per miss.
    AllOf,
}

/// A companion artifact that must change with the domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactRequirement {
    pub label: String,
    pub matcher: PathMatcher,
    pub kind: ArtifactKind,
}

impl ArtifactRequirement {
    pub fn new(label: &str, matcher: PathMatcher, kind: ArtifactKind) -> Self {
        Self {
            label: label.to_string(),
            matcher,
            kind,
        }
    }

    /// Shorthand for an exact-path documentation requirement.
    pub fn doc(path: &str) -> Self {
        Self::new(path, PathMatcher::exact(path), ArtifactKind::Doc)
    }

    /// Whether any changed file satisfies this requirement.
    pub fn is_satisfied(&self, changed: &[ChangedFile]) -> bool {
        changed.iter().any(|f| {
            self.matcher.matches(&f.path)
                && (self.kind != ArtifactKind::Doc || is_substantive(&f.lines))
        })
    }
}

/// A named policy scope over source paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainPolicy {
    pub name: String,
    /// Leading phrase of every diagnostic, e.g. `METRICS_CHANGE detected`.
    pub summary: String,
    pub paths: PathSet,
    /// Non-production zones that never trigger the domain.
    pub exclude_prefixes: Vec<String>,
    /// Paths claimed by a more specific domain; never triggers this one.
    pub deferred: PathSet,
    pub trigger: Trigger,
    pub requirements: Vec<ArtifactRequirement>,
    pub mode: RequirementMode,
}

impl DomainPolicy {
    pub fn new(name: &str, summary: &str, paths: PathSet, trigger: Trigger) -> Self {
        Self {
            name: name.to_string(),
            summary: summary.to_string(),
            paths,
            exclude_prefixes: vec!["test/".to_string()],
            deferred: PathSet::default(),
            trigger,
            requirements: Vec::new(),
            mode: RequirementMode::AnyOf,
        }
    }

    pub fn with_requirement(mut self, requirement: ArtifactRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn with_mode(mut self, mode: RequirementMode) -> Self {
        self.mode = mode;
        self
    }

    /// Give `other` precedence over every path it covers.
    pub fn defer_to(mut self, other: &DomainPolicy) -> Self {
        self.deferred.0.extend(other.paths.0.iter().cloned());
        self
    }

    /// Whether `path` is in scope: matched, not excluded, not deferred.
    pub fn covers(&self, path: &str) -> bool {
        !self
            .exclude_prefixes
            .iter()
            .any(|p| path.starts_with(p.as_str()))
            && !self.deferred.contains(path)
            && self.paths.contains(path)
    }

    fn is_triggered_by(&self, file: &ChangedFile) -> bool {
        match self.trigger {
            Trigger::AnyChange => true,
            Trigger::Semantic(kind) => {
                let classifier = kind.classifier();
                file.lines.iter().any(|line| {
                    METRICS.inc_lines_classified();
                    let semantic = classifier.is_semantic(&line.text);
                    if semantic {
                        debug!(
                            domain = %self.name,
                            classifier = classifier.name(),
                            path = %file.path,
                            line = %line.text,
                            "semantic line"
                        );
                    }
                    semantic
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Evaluate one domain against the changed files.
///
/// Returns no diagnostics when the domain was not meaningfully touched or its
/// requirements are met. In [`RequirementMode::AnyOf`] at most one diagnostic
/// is returned.
pub fn evaluate_domain(domain: &DomainPolicy, changed: &[ChangedFile]) -> Vec<Diagnostic> {
    let triggering: Vec<&str> = changed
        .iter()
        .filter(|f| domain.covers(&f.path))
        .filter(|f| domain.is_triggered_by(f))
        .map(|f| f.path.as_str())
        .collect();

    if triggering.is_empty() {
        emit_gate_evaluated(&domain.name, false, true);
        return Vec::new();
    }

    let diagnostics = match domain.mode {
        RequirementMode::AnyOf => {
            if domain.requirements.iter().any(|r| r.is_satisfied(changed)) {
                Vec::new()
            } else {
                vec![any_of_diagnostic(domain, &triggering)]
            }
        }
        RequirementMode::AllOf => domain
            .requirements
            .iter()
            .filter(|r| !r.is_satisfied(changed))
            .map(|r| {
                Diagnostic::new(
                    &domain.name,
                    format!("{} without {}.", domain.summary, r.label),
                )
            })
            .collect(),
    };

    emit_gate_evaluated(&domain.name, true, diagnostics.is_empty());
    diagnostics
}

fn any_of_diagnostic(domain: &DomainPolicy, triggering: &[&str]) -> Diagnostic {
    let labels: Vec<&str> = domain.requirements.iter().map(|r| r.label.as_str()).collect();
    let hint = if domain
        .requirements
        .iter()
        .any(|r| r.kind == ArtifactKind::Doc)
    {
        format!(" {DOC_HINT}")
    } else {
        String::new()
    };
    Diagnostic::new(
        &domain.name,
        format!(
            "{} in {}; update {}{}.",
            domain.summary,
            triggering.join(", "),
            labels.join(" or "),
            hint
        ),
    )
}
