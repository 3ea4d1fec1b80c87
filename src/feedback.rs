//! HTML fragment for inline validation feedback next to the builder form.

use crate::validator::{Severity, ValidationResult};

pub fn render_feedback_html(result: &ValidationResult) -> String {
    if !result.has_issues() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str("<section class=\"validation-feedback\">\n");

    for error in &result.errors {
        out.push_str("<div class=\"feedback feedback-error\">");
        out.push_str("<p class=\"feedback-title\">Error - cannot save</p>");
        out.push_str("<p class=\"feedback-message\">");
        out.push_str(&escape_html(&error.message));
        out.push_str("</p>");
        if !error.affected_conditions.is_empty() {
            out.push_str("<p class=\"feedback-refs\">Affects conditions: ");
            out.push_str(&condition_refs(&error.affected_conditions));
            out.push_str("</p>");
        }
        out.push_str("</div>\n");
    }

    for warning in &result.warnings {
        let (class, title) = match warning.severity {
            Severity::High => ("feedback-warning-high", "Warning (high priority)"),
            Severity::Medium => ("feedback-warning-medium", "Warning"),
            Severity::Low => ("feedback-warning-low", "Note"),
        };
        out.push_str(&format!(
            "<div class=\"feedback {class}\"><p class=\"feedback-title\">{title}</p>"
        ));
        out.push_str("<p class=\"feedback-message\">");
        out.push_str(&escape_html(&warning.message));
        out.push_str("</p></div>\n");
    }

    if !result.suggestions.is_empty() {
        out.push_str("<div class=\"feedback feedback-suggestions\"><ul>");
        for suggestion in &result.suggestions {
            out.push_str("<li>");
            out.push_str(&escape_html(&suggestion.message));
            out.push_str("</li>");
        }
        out.push_str("</ul></div>\n");
    }

    out.push_str("</section>\n");
    out
}

/// One-based `#n` references, as shown next to each condition row.
fn condition_refs(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|idx| format!("#{}", idx + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
