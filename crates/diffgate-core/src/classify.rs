//! Domain line classifiers.
//!
//! Each domain supplies positive signals through [`LineClassifier::signals`];
//! the universal cosmetic exclusions (blank, comment-only, punctuation-only)
//! are applied first by [`LineClassifier::is_semantic`]. Heuristics lean
//! toward flagging: an unnecessary doc reminder is cheap, an undocumented
//! metrics change is not.

use serde::{Deserialize, Serialize};

const COMMENT_MARKERS: &[&str] = &["//", "/*", "*"];
const STRUCTURAL_PUNCTUATION: &[char] = &['{', '}', '(', ')', ';', ',', '[', ']'];

const METRIC_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", ">=", "<=", "==", "!=", ">", "<", "=",
];
const METRIC_KEYWORDS: &[&str] = &[
    "clamp",
    "threshold",
    "normalize",
    "score",
    "stability",
    "variance",
];
const ML_KEYWORDS: &[&str] = &["model", "inference", "preprocess", "postprocess"];
const CAPTURE_SYMBOLS: &[&str] = &["CameraController"];
const LAYER_NAMES: &[&str] = &["services", "core", "ui"];

/// Blank after trimming.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Starts with a recognised comment marker.
pub fn is_comment_only(line: &str) -> bool {
    let trimmed = line.trim();
    COMMENT_MARKERS.iter().any(|m| trimmed.starts_with(m))
}

/// Consists solely of braces, parens, brackets, commas and semicolons
/// (interior whitespace allowed).
pub fn is_punctuation_only(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_whitespace() || STRUCTURAL_PUNCTUATION.contains(&c))
}

/// Any of the universal cosmetic exclusions.
pub fn is_cosmetic(line: &str) -> bool {
    is_blank(line) || is_comment_only(line) || is_punctuation_only(line)
}

fn is_import(trimmed: &str) -> bool {
    trimmed.starts_with("import ")
}

fn is_conditional(trimmed: &str) -> bool {
    trimmed.starts_with("if ") || trimmed.starts_with("if(")
}

/// Coarse callable-signature proxy: both parentheses present, not an import,
/// not a conditional. Multi-argument calls are flagged too.
pub fn is_signature_change(line: &str) -> bool {
    let trimmed = line.trim();
    !is_import(trimmed)
        && !is_conditional(trimmed)
        && trimmed.contains('(')
        && trimmed.contains(')')
}

/// Decides whether one line of diff text carries meaning for a domain.
pub trait LineClassifier: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Domain-specific positive signals, evaluated on a non-cosmetic line.
    fn signals(&self, line: &str) -> bool;

    /// True when the line survives cosmetic exclusion and shows a signal.
    fn is_semantic(&self, line: &str) -> bool {
        !is_cosmetic(line) && self.signals(line)
    }
}

/// Numeric, operator, scoring-vocabulary, `return` or signature changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsClassifier;

impl LineClassifier for MetricsClassifier {
    fn name(&self) -> &'static str {
        "metrics"
    }

    fn signals(&self, line: &str) -> bool {
        line.chars().any(|c| c.is_ascii_digit())
            || METRIC_OPERATORS.iter().any(|op| line.contains(op))
            || METRIC_KEYWORDS.iter().any(|kw| line.contains(kw))
            || line.contains("return")
            || is_signature_change(line)
    }
}

/// Model, inference pipeline and capture-controller changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MlVisionClassifier;

impl LineClassifier for MlVisionClassifier {
    fn name(&self) -> &'static str {
        "ml_vision"
    }

    fn signals(&self, line: &str) -> bool {
        ML_KEYWORDS.iter().any(|kw| line.contains(kw))
            || CAPTURE_SYMBOLS.iter().any(|s| line.contains(s))
            || is_signature_change(line)
    }
}

/// Cross-layer imports and signature changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchitectureClassifier;

impl LineClassifier for ArchitectureClassifier {
    fn name(&self) -> &'static str {
        "architecture"
    }

    fn signals(&self, line: &str) -> bool {
        let trimmed = line.trim();
        if is_import(trimmed) && LAYER_NAMES.iter().any(|l| trimmed.contains(l)) {
            return true;
        }
        is_signature_change(trimmed)
    }
}

static METRICS: MetricsClassifier = MetricsClassifier;
static ML_VISION: MlVisionClassifier = MlVisionClassifier;
static ARCHITECTURE: ArchitectureClassifier = ArchitectureClassifier;

/// Declarative selector for a classifier strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    Metrics,
    MlVision,
    Architecture,
}

impl ClassifierKind {
    pub fn classifier(self) -> &'static dyn LineClassifier {
        match self {
            ClassifierKind::Metrics => &METRICS,
            ClassifierKind::MlVision => &ML_VISION,
            ClassifierKind::Architecture => &ARCHITECTURE,
        }
    }

    pub fn all() -> [ClassifierKind; 3] {
        [
            ClassifierKind::Metrics,
            ClassifierKind::MlVision,
            ClassifierKind::Architecture,
        ]
    }
}
