//! Compiled-in policy tables.
//!
//! Every domain, zone and tree check is plain data assembled here; adding a
//! domain means adding a table entry, not a branch in the engine. Tables are
//! narrowed per entry point with [`PolicyConfig::for_gate`].

use std::path::PathBuf;

use serde::Serialize;

use crate::classify::ClassifierKind;
use crate::coverage::CoveragePolicy;
use crate::doc_lint::DocLintPolicy;
use crate::error::Result;
use crate::gate::{ArtifactKind, ArtifactRequirement, DomainPolicy, RequirementMode, Trigger};
use crate::matcher::{PathMatcher, PathSet};
use crate::tracked::TrackedFilePolicy;
use crate::zone::{ForbiddenPattern, ForbiddenToken, ZonePolicy};

/// Default base reference when `BASE_REF` is unset.
pub const DEFAULT_BASE_REF: &str = "origin/main";

/// Package prefix of the monitored application.
const APP_PACKAGE: &str = "package:international_cunnibal";

const HANDBOOK: &str = "ENGINEERING_HANDBOOK.md";
const BENCHMARK_DIR: &str = "ml-ops/benchmarks/";

const METRIC_PREFIXES: &[&str] = &["lib/core/"];
const METRIC_FILES: &[&str] = &[
    "lib/models/metrics.dart",
    "lib/services/neural_engine.dart",
    "lib/services/endurance_engine.dart",
    "lib/services/endurance_game_logic_service.dart",
];
const ML_FILES: &[&str] = &[
    "lib/services/ui/cv_engine.dart",
    "lib/services/ui/bio_tracking_service.dart",
    "lib/models/tongue_data.dart",
];
const ARCH_PREFIXES: &[&str] = &["lib/services/", "lib/core/"];

const MODEL_EXTENSIONS: &[&str] = &[
    ".onnx",
    ".pt",
    ".tflite",
    ".h5",
    ".ckpt",
    ".bin",
    ".mlmodel",
    ".mlpackage",
    ".model",
    ".weights",
    ".pb",
];
const RECORDING_APIS: &[&str] = &["startVideoRecording", "stopVideoRecording", "recordVideo"];
const VIDEO_EXTENSION_PATTERN: &str = r"(?i)\.(mp4|mov|avi|mkv|webm|h264|hevc|mpeg|mpg)\b";

/// Entry points, one per gate kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateKind {
    SemanticChange,
    MetricCompanion,
    ModelArtifacts,
    ArchitectureBoundaries,
    PrivacyGuards,
    DocLint,
    Coverage,
    /// Every diff and tree gate except coverage, which needs a test run first.
    All,
}

impl GateKind {
    pub fn name(self) -> &'static str {
        match self {
            GateKind::SemanticChange => "semantic-change",
            GateKind::MetricCompanion => "metric-companion",
            GateKind::ModelArtifacts => "model-artifacts",
            GateKind::ArchitectureBoundaries => "architecture-boundaries",
            GateKind::PrivacyGuards => "privacy-guards",
            GateKind::DocLint => "doc-lint",
            GateKind::Coverage => "coverage",
            GateKind::All => "all",
        }
    }
}

/// The full set of policies a run evaluates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PolicyConfig {
    pub domains: Vec<DomainPolicy>,
    pub tracked: Vec<TrackedFilePolicy>,
    pub zones: Vec<ZonePolicy>,
    pub doc_lint: Option<DocLintPolicy>,
    pub coverage: Option<CoveragePolicy>,
}

impl PolicyConfig {
    /// Every compiled-in policy.
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            domains: semantic_domains()
                .into_iter()
                .chain([metric_companion_domain()?, model_artifact_domain()?])
                .collect(),
            tracked: vec![model_binary_policy()],
            zones: vec![architecture_zone(), privacy_zone()?],
            doc_lint: Some(doc_lint_policy()),
            coverage: Some(coverage_policy()),
        })
    }

    /// The policies behind one entry point.
    pub fn for_gate(kind: GateKind) -> Result<Self> {
        Ok(match kind {
            GateKind::SemanticChange => Self {
                domains: semantic_domains(),
                ..Self::default()
            },
            GateKind::MetricCompanion => Self {
                domains: vec![metric_companion_domain()?],
                ..Self::default()
            },
            GateKind::ModelArtifacts => Self {
                domains: vec![model_artifact_domain()?],
                tracked: vec![model_binary_policy()],
                ..Self::default()
            },
            GateKind::ArchitectureBoundaries => Self {
                zones: vec![architecture_zone()],
                ..Self::default()
            },
            GateKind::PrivacyGuards => Self {
                zones: vec![privacy_zone()?],
                ..Self::default()
            },
            GateKind::DocLint => Self {
                doc_lint: Some(doc_lint_policy()),
                ..Self::default()
            },
            GateKind::Coverage => Self {
                coverage: Some(coverage_policy()),
                ..Self::default()
            },
            GateKind::All => Self {
                coverage: None,
                ..Self::builtin()?
            },
        })
    }

    /// Whether any policy needs the revision diff.
    pub fn needs_diff(&self) -> bool {
        !self.domains.is_empty()
    }

    /// Whether any policy needs the tracked-file listing.
    pub fn needs_tracked_files(&self) -> bool {
        !self.tracked.is_empty()
    }
}

fn path_set(prefixes: &[&str], files: &[&str]) -> PathSet {
    PathSet::new(
        prefixes
            .iter()
            .map(|p| PathMatcher::prefix(p))
            .chain(files.iter().map(|f| PathMatcher::exact(f)))
            .collect(),
    )
}

fn metrics_domain() -> DomainPolicy {
    DomainPolicy::new(
        "metrics",
        "METRICS_CHANGE detected",
        path_set(METRIC_PREFIXES, METRIC_FILES),
        Trigger::Semantic(ClassifierKind::Metrics),
    )
    .with_requirement(ArtifactRequirement::doc("docs/metrics.md"))
    .with_requirement(ArtifactRequirement::doc(HANDBOOK))
}

fn ml_vision_domain() -> DomainPolicy {
    DomainPolicy::new(
        "ml_vision",
        "ML_CV_CHANGE detected",
        path_set(&[], ML_FILES),
        Trigger::Semantic(ClassifierKind::MlVision),
    )
    .with_requirement(ArtifactRequirement::doc("docs/ml.md"))
    .with_requirement(ArtifactRequirement::doc(HANDBOOK))
}

/// Metrics, ML/vision and architecture doc gates. Architecture is the broad
/// layer domain and yields every path the other two claim.
fn semantic_domains() -> Vec<DomainPolicy> {
    let metrics = metrics_domain();
    let ml_vision = ml_vision_domain();
    let architecture = architecture_domain().defer_to(&metrics).defer_to(&ml_vision);
    vec![metrics, ml_vision, architecture]
}

fn architecture_domain() -> DomainPolicy {
    DomainPolicy::new(
        "architecture",
        "ARCHITECTURE_CHANGE detected",
        path_set(ARCH_PREFIXES, &[]),
        Trigger::Semantic(ClassifierKind::Architecture),
    )
    .with_requirement(ArtifactRequirement::doc("docs/architecture.md"))
    .with_requirement(ArtifactRequirement::doc("ARCHITECTURE.md"))
    .with_requirement(ArtifactRequirement::doc(HANDBOOK))
}

fn metric_companion_domain() -> Result<DomainPolicy> {
    Ok(DomainPolicy::new(
        "metric_companions",
        "Metrics changed",
        path_set(METRIC_PREFIXES, METRIC_FILES),
        Trigger::AnyChange,
    )
    .with_mode(RequirementMode::AllOf)
    .with_requirement(ArtifactRequirement::new(
        "updated tests",
        PathMatcher::prefix("test/"),
        ArtifactKind::Tests,
    ))
    .with_requirement(ArtifactRequirement::new(
        "benchmark log in ml-ops/benchmarks/",
        PathMatcher::glob(&format!("{BENCHMARK_DIR}metrics_benchmark_*.md"))?,
        ArtifactKind::Benchmark,
    )))
}

fn model_artifact_domain() -> Result<DomainPolicy> {
    Ok(DomainPolicy::new(
        "model_artifacts",
        "Model changed",
        path_set(&["ml-ops/models/"], &[]),
        Trigger::AnyChange,
    )
    .with_mode(RequirementMode::AllOf)
    .with_requirement(ArtifactRequirement::new(
        "model card update in ml-ops/model_cards/",
        PathMatcher::prefix("ml-ops/model_cards/"),
        ArtifactKind::ModelCard,
    ))
    .with_requirement(ArtifactRequirement::new(
        "benchmark log in ml-ops/benchmarks/",
        PathMatcher::glob(&format!("{BENCHMARK_DIR}model_benchmark_*.md"))?,
        ArtifactKind::Benchmark,
    )))
}

fn model_binary_policy() -> TrackedFilePolicy {
    TrackedFilePolicy {
        name: "model_binaries".to_string(),
        forbidden_extensions: MODEL_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        message: "Model binary tracked in git".to_string(),
    }
}

fn architecture_zone() -> ZonePolicy {
    let forbidden = [
        "package:flutter".to_string(),
        "dart:ui".to_string(),
        "package:camera".to_string(),
        format!("{APP_PACKAGE}/screens"),
        format!("{APP_PACKAGE}/widgets"),
    ];
    forbidden.iter().fold(
        ZonePolicy::new("architecture_boundaries")
            .with_root("lib/core")
            .with_root("lib/services")
            .with_exempt("lib/services/ui")
            .with_extension("dart"),
        |zone, token| zone.with_token(ForbiddenToken::new(token, "imports forbidden dependency")),
    )
}

fn privacy_zone() -> Result<ZonePolicy> {
    let zone = RECORDING_APIS.iter().fold(
        ZonePolicy::new("privacy_guards")
            .with_root("lib/services")
            .with_root("lib/screens")
            .with_extension("dart"),
        |zone, api| zone.with_token(ForbiddenToken::new(api, "uses raw video recording API")),
    );
    Ok(zone
        .with_pattern(ForbiddenPattern::new(
            VIDEO_EXTENSION_PATTERN,
            "references a raw video file extension",
        )?)
        .with_marker(
            "lib/services/bio_tracking_service.dart",
            "LandmarkPrivacyFilter",
            "BioTrackingService must apply LandmarkPrivacyFilter.",
        ))
}

fn doc_lint_policy() -> DocLintPolicy {
    DocLintPolicy {
        name: "doc_lint".to_string(),
        files: vec![
            PathBuf::from(HANDBOOK),
            PathBuf::from("CONTRIBUTING.md"),
            PathBuf::from("ARCHITECTURE.md"),
        ],
        dirs: vec![PathBuf::from("docs")],
    }
}

fn coverage_policy() -> CoveragePolicy {
    CoveragePolicy {
        name: "coverage".to_string(),
        lcov_path: PathBuf::from("coverage/lcov.info"),
        min_ratio: 0.8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_compile() {
        let config = PolicyConfig::builtin().unwrap();
        let names: Vec<&str> = config.domains.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "metrics",
                "ml_vision",
                "architecture",
                "metric_companions",
                "model_artifacts"
            ]
        );
        assert_eq!(config.zones.len(), 2);
        assert!(config.needs_diff());
        assert!(config.needs_tracked_files());
    }

    #[test]
    fn test_zone_gates_need_no_diff() {
        let config = PolicyConfig::for_gate(GateKind::PrivacyGuards).unwrap();
        assert!(!config.needs_diff());
        assert!(!config.needs_tracked_files());
        assert_eq!(config.zones[0].name, "privacy_guards");
        assert_eq!(config.zones[0].required_markers.len(), 1);
    }

    #[test]
    fn test_all_excludes_coverage() {
        let config = PolicyConfig::for_gate(GateKind::All).unwrap();
        assert!(config.coverage.is_none());
        assert!(config.doc_lint.is_some());
        assert_eq!(config.domains.len(), 5);
    }

    #[test]
    fn test_architecture_yields_to_specific_domains() {
        let config = PolicyConfig::for_gate(GateKind::SemanticChange).unwrap();
        let architecture = &config.domains[2];
        assert_eq!(architecture.name, "architecture");
        assert!(!architecture.covers("lib/core/metrics.x"));
        assert!(!architecture.covers("lib/services/neural_engine.dart"));
        assert!(!architecture.covers("lib/services/ui/cv_engine.dart"));
        assert!(architecture.covers("lib/services/sync_service.dart"));
        assert!(architecture.covers("lib/services/ui/overlay_service.dart"));
    }

    #[test]
    fn test_config_serializes() {
        let config = PolicyConfig::builtin().unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["domains"][0]["trigger"]["type"], "semantic");
        assert_eq!(json["domains"][0]["trigger"]["classifier"], "metrics");
        assert_eq!(json["zones"][0]["exempt"][0], "lib/services/ui");
    }

    #[test]
    fn test_gate_names_are_kebab_case() {
        assert_eq!(GateKind::SemanticChange.name(), "semantic-change");
        assert_eq!(
            serde_json::to_value(GateKind::ArchitectureBoundaries).unwrap(),
            "architecture-boundaries"
        );
    }
}
