//! Line-coverage threshold over an lcov report.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostic::Diagnostic;
use crate::error::{GateError, Result};

/// Where the lcov report lives and the minimum accepted ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoveragePolicy {
    pub name: String,
    pub lcov_path: PathBuf,
    pub min_ratio: f64,
}

/// Line totals from `DA:` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub total_lines: u64,
    pub covered_lines: u64,
}

impl CoverageSummary {
    pub fn ratio(&self) -> Option<f64> {
        if self.total_lines == 0 {
            None
        } else {
            Some(self.covered_lines as f64 / self.total_lines as f64)
        }
    }
}

/// Parse `DA:<line>,<hits>[,<checksum>]` records.
pub fn parse_lcov(source: &str, text: &str) -> Result<CoverageSummary> {
    let mut summary = CoverageSummary::default();
    for (idx, line) in text.lines().enumerate() {
        let Some(data) = line.strip_prefix("DA:") else {
            continue;
        };
        let hits = data
            .split(',')
            .nth(1)
            .and_then(|h| h.trim().parse::<u64>().ok())
            .ok_or_else(|| GateError::Parse {
                file: source.to_string(),
                reason: format!("malformed DA record on line {}: {line}", idx + 1),
            })?;
        summary.total_lines += 1;
        if hits > 0 {
            summary.covered_lines += 1;
        }
    }
    Ok(summary)
}

/// Evaluate the coverage threshold. The summary is `None` when no report exists.
pub fn check_coverage(
    repo_root: &Path,
    policy: &CoveragePolicy,
) -> Result<(Option<CoverageSummary>, Vec<Diagnostic>)> {
    let path = repo_root.join(&policy.lcov_path);
    let display = policy.lcov_path.display().to_string();
    if !path.is_file() {
        return Ok((
            None,
            vec![Diagnostic::new(&policy.name, format!("{display} not found."))],
        ));
    }

    let summary = parse_lcov(&display, &std::fs::read_to_string(&path)?)?;
    let diagnostics = match summary.ratio() {
        None => vec![Diagnostic::new(&policy.name, "No coverage data found.")],
        Some(ratio) if ratio < policy.min_ratio => vec![Diagnostic::new(
            &policy.name,
            format!(
                "Coverage below threshold: {:.2}% < {:.0}%.",
                ratio * 100.0,
                policy.min_ratio * 100.0
            ),
        )],
        Some(_) => Vec::new(),
    };
    Ok((Some(summary), diagnostics))
}
