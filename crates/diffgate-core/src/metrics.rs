//! Global atomic counters for diffgate observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] at the end of a run to emit current values as a single
//! `tracing::info!` event.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters.
pub struct Metrics {
    lines_classified: AtomicU64,
    files_scanned: AtomicU64,
    diagnostics_emitted: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            lines_classified: AtomicU64::new(0),
            files_scanned: AtomicU64::new(0),
            diagnostics_emitted: AtomicU64::new(0),
        }
    }

    pub fn inc_lines_classified(&self) {
        self.lines_classified.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_files_scanned(&self) {
        self.files_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_diagnostics(&self, n: u64) {
        self.diagnostics_emitted.fetch_add(n, Ordering::Relaxed);
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            lines_classified = self.lines_classified(),
            files_scanned = self.files_scanned(),
            diagnostics_emitted = self.diagnostics_emitted(),
        );
    }

    pub fn lines_classified(&self) -> u64 {
        self.lines_classified.load(Ordering::Relaxed)
    }

    pub fn files_scanned(&self) -> u64 {
        self.files_scanned.load(Ordering::Relaxed)
    }

    pub fn diagnostics_emitted(&self) -> u64 {
        self.diagnostics_emitted.load(Ordering::Relaxed)
    }
}
