//! Drives one policy run: resolve, extract, evaluate, aggregate.

use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::config::PolicyConfig;
use crate::coverage::{check_coverage, CoverageSummary};
use crate::diagnostic::PolicyOutcome;
use crate::diff::DiffExtractor;
use crate::doc_lint::lint_docs;
use crate::error::Result;
use crate::gate::evaluate_domain;
use crate::metrics::METRICS;
use crate::obs::{emit_run_finished, emit_run_started};
use crate::revision::RevisionResolver;
use crate::vcs::{Revision, Vcs};
use crate::zone::scan_zone;

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Base revision, when the run needed a diff.
    pub base: Option<Revision>,
    pub outcome: PolicyOutcome,
    /// Coverage totals, when a coverage policy ran and found a report.
    pub coverage: Option<CoverageSummary>,
}

/// Evaluates a [`PolicyConfig`] against a repository.
///
/// Every policy runs to completion; diagnostics are accumulated rather than
/// returned at the first failure. Only VCS or filesystem failures abort.
pub struct PolicyRunner<'a> {
    vcs: &'a dyn Vcs,
    repo_root: &'a Path,
}

impl<'a> PolicyRunner<'a> {
    pub fn new(vcs: &'a dyn Vcs, repo_root: &'a Path) -> Self {
        Self { vcs, repo_root }
    }

    pub fn run(&self, config: &PolicyConfig, base_ref: &str) -> Result<RunReport> {
        let start = Instant::now();
        let mut diagnostics = Vec::new();

        let base = if config.needs_diff() {
            Some(RevisionResolver::new(self.vcs).resolve(base_ref)?)
        } else {
            None
        };
        emit_run_started(
            base.as_ref().map(Revision::as_str).unwrap_or("-"),
            config.domains.len(),
            config.zones.len(),
        );

        if let Some(base) = &base {
            let changed = DiffExtractor::new(self.vcs).extract(base)?;
            for domain in &config.domains {
                diagnostics.extend(evaluate_domain(domain, &changed));
            }
        }

        if config.needs_tracked_files() {
            let tracked = self.vcs.tracked_files()?;
            for policy in &config.tracked {
                diagnostics.extend(policy.evaluate(&tracked));
            }
        }

        for zone in &config.zones {
            diagnostics.extend(scan_zone(self.repo_root, zone)?);
        }

        if let Some(policy) = &config.doc_lint {
            diagnostics.extend(lint_docs(self.repo_root, policy)?);
        }

        let mut coverage = None;
        if let Some(policy) = &config.coverage {
            let (summary, found) = check_coverage(self.repo_root, policy)?;
            if let Some(ratio) = summary.as_ref().and_then(CoverageSummary::ratio) {
                info!(ratio = ratio, min = policy.min_ratio, "coverage measured");
            }
            coverage = summary;
            diagnostics.extend(found);
        }

        let outcome = PolicyOutcome::from_diagnostics(diagnostics);
        METRICS.add_diagnostics(outcome.diagnostics.len() as u64);
        emit_run_finished(
            start.elapsed().as_millis() as u64,
            outcome.diagnostics.len(),
            outcome.passed,
        );
        METRICS.flush();

        Ok(RunReport {
            base,
            outcome,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateKind;
    use crate::vcs::MemoryVcs;

    #[test]
    fn test_tree_only_gate_skips_resolution() {
        let dir = tempfile::tempdir().unwrap();
        // A repository with no commits would fail resolution.
        let vcs = MemoryVcs::new().with_commits(0);
        let config = PolicyConfig::for_gate(GateKind::ArchitectureBoundaries).unwrap();

        let report = PolicyRunner::new(&vcs, dir.path())
            .run(&config, "origin/main")
            .unwrap();
        assert!(report.base.is_none());
        assert!(report.outcome.passed);
    }

    #[test]
    fn test_diff_gate_without_head_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let vcs = MemoryVcs::new().with_commits(0);
        let config = PolicyConfig::for_gate(GateKind::SemanticChange).unwrap();

        assert!(PolicyRunner::new(&vcs, dir.path())
            .run(&config, "origin/main")
            .is_err());
    }

    #[test]
    fn test_tracked_model_binary_fails_run() {
        let dir = tempfile::tempdir().unwrap();
        let vcs = MemoryVcs::new()
            .with_ref("origin/main")
            .with_tracked("ml-ops/models/face.tflite");
        let config = PolicyConfig::for_gate(GateKind::ModelArtifacts).unwrap();

        let report = PolicyRunner::new(&vcs, dir.path())
            .run(&config, "origin/main")
            .unwrap();
        assert_eq!(report.base, Some(Revision::new("origin/main")));
        assert_eq!(
            report.outcome.error_lines(),
            vec!["ERROR: Model binary tracked in git: ml-ops/models/face.tflite"]
        );
    }
}
