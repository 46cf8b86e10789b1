//! diffgate Core Library
//!
//! Semantic change gates for CI: classify the lines of a revision diff,
//! require companion artifacts for meaningful changes, and scan the source
//! tree for forbidden dependencies and privacy violations.

pub mod classify;
pub mod config;
pub mod coverage;
pub mod diagnostic;
pub mod diff;
pub mod doc_lint;
pub mod doc_update;
pub mod error;
pub mod gate;
pub mod matcher;
pub mod metrics;
pub mod obs;
pub mod report;
pub mod revision;
pub mod runner;
pub mod telemetry;
pub mod tracked;
pub mod vcs;
pub mod zone;

pub use classify::{ClassifierKind, LineClassifier};
pub use config::{GateKind, PolicyConfig, DEFAULT_BASE_REF};
pub use coverage::{CoveragePolicy, CoverageSummary};
pub use diagnostic::{Diagnostic, PolicyOutcome};
pub use diff::{parse_unified_diff, ChangedFile, DiffExtractor, DiffLine, Sign};
pub use doc_lint::DocLintPolicy;
pub use doc_update::{doc_signals, is_substantive, DocSignals};
pub use error::{GateError, Result};
pub use gate::{
    evaluate_domain, ArtifactKind, ArtifactRequirement, DomainPolicy, RequirementMode, Trigger,
};
pub use matcher::{GlobPattern, PathMatcher, PathSet};
pub use obs::RunSpan;
pub use report::{new_run_id, read_report, write_report, PolicyReport};
pub use revision::RevisionResolver;
pub use runner::{PolicyRunner, RunReport};
pub use telemetry::init_tracing;
pub use tracked::TrackedFilePolicy;
pub use vcs::{GitCli, MemoryVcs, Revision, Vcs};
pub use zone::{scan_zone, ForbiddenPattern, ForbiddenToken, RequiredMarker, ZonePolicy};

/// Crate version, as reported by `diffgate --version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
