//! Structured observability hooks for gate runs.
//!
//! This module provides:
//! - A run-scoped tracing span via the `RunSpan` RAII guard
//! - Emission functions for lifecycle events: run start/finish, gate
//!   evaluation, zone scan

use tracing::info;

/// RAII guard that enters a run-scoped tracing span for the duration of a run.
///
/// # Example
///
/// ```ignore
/// let _span = RunSpan::enter("6f1c…", "semantic-change");
/// // every event below is tagged with run_id and gate
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    pub fn enter(run_id: &str, gate: &str) -> Self {
        let span = tracing::info_span!("diffgate.run", run_id = %run_id, gate = %gate);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: run started against a resolved base revision.
pub fn emit_run_started(base: &str, domains: usize, zones: usize) {
    info!(
        event = "run.started",
        base = %base,
        domains = domains,
        zones = zones,
    );
}

/// Emit event: one domain gate evaluated.
pub fn emit_gate_evaluated(domain: &str, triggered: bool, passed: bool) {
    info!(
        event = "gate.evaluated",
        domain = %domain,
        triggered = triggered,
        passed = passed,
    );
}

/// Emit event: one zone policy scanned.
pub fn emit_zone_scanned(zone: &str, files: u64, violations: usize) {
    info!(
        event = "zone.scanned",
        zone = %zone,
        files = files,
        violations = violations,
    );
}

/// Emit event: run finished with its binary outcome.
pub fn emit_run_finished(duration_ms: u64, diagnostics: usize, passed: bool) {
    info!(
        event = "run.finished",
        duration_ms = duration_ms,
        diagnostics = diagnostics,
        passed = passed,
    );
}
