//! Verdict aggregation
//!
//! Merges rule-engine output into a single pass/fail result. This is the
//! sole authority for pass/fail; it performs no classification of its own.

use serde::{Deserialize, Serialize};

use crate::compatibility::Evaluation;

/// The aggregated result of a compatibility check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// True iff no errors were raised. Warnings and notes never block.
    pub ok: bool,
    /// Blocking compatibility violations.
    pub errors: Vec<String>,
    /// Advisory conditions; reported but never blocking.
    pub warnings: Vec<String>,
    /// Informational entries (type/default modifications).
    pub notes: Vec<String>,
    /// Remedies for the errors (mode switches, default values, aliases).
    pub suggestions: Vec<String>,
}

impl Verdict {
    /// Aggregate a rule-engine evaluation into a verdict.
    pub fn from_evaluation(eval: Evaluation) -> Self {
        Self {
            ok: eval.errors.is_empty(),
            errors: eval.errors,
            warnings: eval.warnings,
            notes: eval.notes,
            suggestions: eval.suggestions,
        }
    }

    /// Process exit code: 0 on success, 1 on any violation.
    pub fn exit_code(&self) -> i32 {
        if self.ok {
            0
        } else {
            1
        }
    }
}
