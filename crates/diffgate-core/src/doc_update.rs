//! Substantive documentation update check.
//!
//! A companion doc update counts only when its added lines carry a section
//! header, a list bullet and an explicit statement of invariant impact. The
//! three signals may sit on different lines.

use crate::diff::{DiffLine, Sign};

const INVARIANT_KEYWORDS: &[&str] = &[
    "invariant",
    "unchanged",
    "tightened",
    "expanded",
    "broadened",
    "narrowed",
];

/// Signals seen across the added lines of a doc diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocSignals {
    pub header: bool,
    pub bullet: bool,
    pub invariant: bool,
}

impl DocSignals {
    pub fn is_complete(&self) -> bool {
        self.header && self.bullet && self.invariant
    }
}

/// Collect header/bullet/invariant signals from added lines only.
pub fn doc_signals(lines: &[DiffLine]) -> DocSignals {
    let mut signals = DocSignals::default();
    for line in lines.iter().filter(|l| l.sign == Sign::Added) {
        let text = line.text.trim();
        if text.starts_with('#') {
            signals.header = true;
        }
        if text.starts_with('-') || text.starts_with('*') {
            signals.bullet = true;
        }
        let lower = text.to_lowercase();
        if INVARIANT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            signals.invariant = true;
        }
    }
    signals
}

/// Whether a doc diff is a structured, invariant-labelled entry.
pub fn is_substantive(lines: &[DiffLine]) -> bool {
    doc_signals(lines).is_complete()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn added(lines: &[&str]) -> Vec<DiffLine> {
        lines.iter().map(|l| DiffLine::added(*l)).collect()
    }

    #[test]
    fn test_all_orderings_accepted() {
        let signals = ["# Update", "- widened tolerance", "invariant narrowed"];
        let orders = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        for order in orders {
            let lines: Vec<&str> = order.iter().map(|i| signals[*i]).collect();
            assert!(is_substantive(&added(&lines)), "order {order:?}");
        }
    }

    #[test]
    fn test_missing_any_signal_rejected() {
        assert!(!is_substantive(&added(&["- widened tolerance", "invariant narrowed"])));
        assert!(!is_substantive(&added(&["# Update", "invariant narrowed"])));
        assert!(!is_substantive(&added(&["# Update", "- widened tolerance"])));
    }

    #[test]
    fn test_removed_lines_ignored() {
        let lines = vec![
            DiffLine::added("# Update"),
            DiffLine::removed("- old bullet"),
            DiffLine::added("Invariant unchanged."),
        ];
        let signals = doc_signals(&lines);
        assert!(signals.header);
        assert!(!signals.bullet);
        assert!(signals.invariant);
        assert!(!is_substantive(&lines));
    }

    #[test]
    fn test_single_line_can_carry_two_signals() {
        let lines = added(&["## Jitter", "* Invariant TIGHTENED to 0.2"]);
        assert!(is_substantive(&lines));
    }
}
