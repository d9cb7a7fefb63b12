//! Output formatting utilities.

use serde_json::Value;
use yangkit_model::TypeSummary;

/// Formats a value as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a type summary as a simple table row.
pub fn format_summary_row(summary: &TypeSummary) -> String {
    let base = summary
        .base
        .as_deref()
        .map(local_name)
        .unwrap_or("-");
    format!(
        "{:<24} {:<20} {:<20} {}",
        truncate(local_name(&summary.name), 24),
        summary.kind.name(),
        truncate(base, 20),
        constraints(summary)
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!(
        "{:<24} {:<20} {:<20} {}",
        "NAME", "KIND", "BASE", "CONSTRAINTS"
    );
    println!("{}", "-".repeat(90));
}

fn constraints(summary: &TypeSummary) -> String {
    let mut parts = Vec::new();
    if let Some(digits) = summary.fraction_digits {
        parts.push(format!("fraction-digits {}", digits));
    }
    if !summary.ranges.is_empty() {
        let intervals: Vec<String> = summary.ranges.iter().map(|r| r.interval.to_string()).collect();
        parts.push(format!("range {}", intervals.join(" | ")));
    }
    if !summary.lengths.is_empty() {
        let intervals: Vec<String> = summary.lengths.iter().map(|l| l.interval.to_string()).collect();
        parts.push(format!("length {}", intervals.join(" | ")));
    }
    for pattern in &summary.patterns {
        parts.push(format!("pattern {}", pattern.regex));
    }
    if !summary.enums.is_empty() {
        let names: Vec<&str> = summary.enums.iter().map(|e| e.name.as_str()).collect();
        parts.push(format!("enum {}", names.join(",")));
    }
    if !summary.bits.is_empty() {
        let names: Vec<&str> = summary.bits.iter().map(|b| b.name.as_str()).collect();
        parts.push(format!("bit {}", names.join(",")));
    }
    if !summary.members.is_empty() {
        let names: Vec<&str> = summary.members.iter().map(|m| local_name(m)).collect();
        parts.push(format!("type {}", names.join(",")));
    }
    if let Some(path) = &summary.path_expression {
        parts.push(format!("path {}", path));
    }
    if let Some(required) = summary.require_instance {
        parts.push(format!("require-instance {}", required));
    }
    if let Some(default) = &summary.default {
        parts.push(format!("default {}", default));
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join("; ")
    }
}

/// Strips the `(namespace?revision=...)` prefix of a rendered qualified name.
fn local_name(rendered: &str) -> &str {
    rendered.rsplit(')').next().unwrap_or(rendered)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_strips_namespace() {
        assert_eq!(local_name("(urn:x?revision=2024-01-01)percent"), "percent");
        assert_eq!(local_name("plain"), "plain");
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdefgh", 6), "abc...");
    }
}
