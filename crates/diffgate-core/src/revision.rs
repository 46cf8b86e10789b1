//! Base revision resolution with graceful fallback.
//!
//! CI systems differ in whether the upstream branch is fetched locally, so
//! the resolver prefers producing *some* diff over failing: the preferred
//! reference (local or remote-tracking form), then `HEAD~1`, then `HEAD`
//! itself. A same-revision diff is empty and every gate no-ops on it.

use tracing::{debug, warn};

use crate::error::{GateError, Result};
use crate::vcs::{Revision, Vcs};

const REMOTE_PREFIX: &str = "origin/";

/// Resolves the base revision for a gate run.
pub struct RevisionResolver<'a> {
    vcs: &'a dyn Vcs,
}

impl<'a> RevisionResolver<'a> {
    pub fn new(vcs: &'a dyn Vcs) -> Self {
        Self { vcs }
    }

    /// Resolve `preferred` to a usable base revision.
    ///
    /// Fails only when the repository has no resolvable `HEAD`.
    pub fn resolve(&self, preferred: &str) -> Result<Revision> {
        for candidate in symbolic_forms(preferred) {
            if self.vcs.ref_exists(&candidate)? {
                debug!(reference = %candidate, "resolved base reference");
                return Ok(Revision::new(candidate));
            }
        }

        warn!(
            preferred = %preferred,
            "base reference not found, falling back to HEAD~1"
        );
        if self.vcs.ref_exists("HEAD~1")? {
            return Ok(Revision::new("HEAD~1"));
        }

        warn!("HEAD~1 not found, falling back to HEAD (empty diff)");
        if self.vcs.ref_exists("HEAD")? {
            return Ok(Revision::new("HEAD"));
        }

        Err(GateError::NoHead)
    }
}

/// The preferred reference followed by its local/remote-tracking counterpart.
fn symbolic_forms(preferred: &str) -> Vec<String> {
    let preferred = preferred.trim();
    if preferred.is_empty() {
        return Vec::new();
    }
    let alternate = match preferred.strip_prefix(REMOTE_PREFIX) {
        Some(local) if !local.is_empty() => local.to_string(),
        Some(_) => return vec![preferred.to_string()],
        None => format!("{REMOTE_PREFIX}{preferred}"),
    };
    vec![preferred.to_string(), alternate]
}
