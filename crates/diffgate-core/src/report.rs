//! Persisted run reports with digest verification.
//!
//! A report is written as `<dir>/<gate>.json` next to `<dir>/<gate>.digest`,
//! the lowercase hex SHA-256 of the JSON bytes. Reading verifies the digest
//! before deserializing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::coverage::CoverageSummary;
use crate::diagnostic::PolicyOutcome;
use crate::error::{GateError, Result};
use crate::runner::RunReport;

/// One gate run, as persisted for later inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyReport {
    pub run_id: String,
    pub gate: String,
    pub base: Option<String>,
    pub evaluated_at: DateTime<Utc>,
    pub outcome: PolicyOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageSummary>,
}

impl PolicyReport {
    pub fn new(run_id: &str, gate: &str, run: &RunReport) -> Self {
        Self {
            run_id: run_id.to_string(),
            gate: gate.to_string(),
            base: run.base.as_ref().map(|b| b.to_string()),
            evaluated_at: Utc::now(),
            outcome: run.outcome.clone(),
            coverage: run.coverage,
        }
    }
}

/// Fresh run identifier.
pub fn new_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Persist `<dir>/<gate>.json` and `<dir>/<gate>.digest`.
pub fn write_report(report: &PolicyReport, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(format!("{}.json", report.gate));
    let digest_path = dir.join(format!("{}.digest", report.gate));
    let json = serde_json::to_vec_pretty(report)?;

    std::fs::write(&path, &json)?;
    std::fs::write(&digest_path, sha256_hex(&json).as_bytes())?;

    Ok(path)
}

/// Read and verify `<dir>/<gate>.json`.
pub fn read_report(gate: &str, dir: &Path) -> Result<PolicyReport> {
    let json = std::fs::read(dir.join(format!("{gate}.json")))?;
    let digest = std::fs::read_to_string(dir.join(format!("{gate}.digest")))?;
    let actual = sha256_hex(&json);
    if digest.trim() != actual {
        return Err(GateError::DigestMismatch {
            expected: digest.trim().to_string(),
            actual,
        });
    }
    Ok(serde_json::from_slice(&json)?)
}
