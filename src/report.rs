//! Report rendering
//!
//! Turns a [`CheckReport`] into human-readable console text or a JSON
//! document. All input lists arrive stable-ordered from the differ and the
//! rule engine, so repeated runs on identical schemas render byte-identical
//! text (the JSON report carries a generation timestamp).

use crate::compatibility::CheckReport;
use crate::diff::ChangeSet;
use crate::error::Result;

/// Render the verdict as console text.
pub fn render_text(report: &CheckReport, show_diff: bool) -> String {
    let mut out = Vec::new();

    out.push(format!("🔍 Compatibility mode: {}", report.mode));
    out.push(String::new());

    if show_diff && !report.changes.is_empty() {
        out.push(render_changes(&report.changes));
    }

    if !report.verdict.errors.is_empty() {
        out.push("❌ Compatibility errors:".to_string());
        for error in &report.verdict.errors {
            out.push(format!("  - {}", error));
        }
        out.push(String::new());
    }

    if !report.verdict.warnings.is_empty() {
        out.push("⚠️  Warnings:".to_string());
        for warning in &report.verdict.warnings {
            out.push(format!("  - {}", warning));
        }
        out.push(String::new());
    }

    if !report.verdict.notes.is_empty() {
        out.push("🟡 Field modifications (not gated by compatibility mode):".to_string());
        for note in &report.verdict.notes {
            out.push(format!("  * {}", note));
        }
        out.push(String::new());
    }

    if !report.verdict.suggestions.is_empty() {
        out.push("💡 Suggestions:".to_string());
        for suggestion in &report.verdict.suggestions {
            out.push(format!("  - {}", suggestion));
        }
        out.push(String::new());
    }

    if report.verdict.ok {
        out.push("✅ Validation completed successfully".to_string());
    } else {
        out.push("❌ Compatibility check failed".to_string());
    }

    out.join("\n")
}

/// Render the classified field diff as console text.
pub fn render_changes(changes: &ChangeSet) -> String {
    let mut out = Vec::new();

    if changes.is_empty() {
        out.push("✅ No differences found between schemas".to_string());
        return out.join("\n");
    }

    out.push("📋 Schema differences detected:".to_string());
    out.push(String::new());

    let added = changes.added();
    if !added.is_empty() {
        out.push(format!("🟢 Added fields ({}):", added.len()));
        for path in added {
            let marker = if changes.added_mandatory.iter().any(|p| p.as_str() == path) {
                " (no default)"
            } else {
                ""
            };
            out.push(format!("  + {}{}", path, marker));
        }
        out.push(String::new());
    }

    let removed = changes.removed();
    if !removed.is_empty() {
        out.push(format!("🔴 Removed fields ({}):", removed.len()));
        for path in removed {
            let marker = if changes.removed_mandatory.iter().any(|p| p.as_str() == path) {
                " (no default)"
            } else {
                ""
            };
            out.push(format!("  - {}{}", path, marker));
        }
        out.push(String::new());
    }

    if !changes.modified.is_empty() {
        out.push(format!("🟡 Modified fields ({}):", changes.modified.len()));
        for modification in &changes.modified {
            out.push(format!("  * {}", modification));
        }
        out.push(String::new());
    }

    out.join("\n")
}

/// Render the full report as pretty-printed JSON with a generation timestamp.
pub fn render_json(report: &CheckReport) -> Result<String> {
    let document = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "report": report,
    });
    Ok(serde_json::to_string_pretty(&document)?)
}
