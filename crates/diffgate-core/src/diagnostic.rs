//! Diagnostics and the binary policy outcome.

use serde::{Deserialize, Serialize};

/// A single policy violation, attributed to the gate that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Gate (domain or zone) name.
    pub gate: String,

    /// Human-readable, actionable message.
    pub message: String,
}

impl Diagnostic {
    pub fn new(gate: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            gate: gate.into(),
            message: message.into(),
        }
    }
}

/// Outcome of a complete policy run.
///
/// `passed` is derived from the diagnostic list and never set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOutcome {
    pub passed: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl PolicyOutcome {
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            passed: diagnostics.is_empty(),
            diagnostics,
        }
    }

    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }

    /// One `ERROR: <message>` line per diagnostic, in collection order.
    pub fn error_lines(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|d| format!("ERROR: {}", d.message))
            .collect()
    }
}
