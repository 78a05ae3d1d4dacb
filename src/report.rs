//! Plain-text rendering of audit and optimization results for the CLI.

use crate::ai::content::text::{char_len, clip_chars};
use crate::types::{BatchStatistics, Priority, ProcessingResult, UpdatePayload};
use std::fmt::Write;

const WIDTH: usize = 80;
const PREVIEW_CHARS: usize = 200;

pub fn separator(ch: char) -> String {
    std::iter::repeat(ch).take(WIDTH).collect()
}

pub fn section_header(title: &str) -> String {
    format!("{}\n  {}\n{}\n", separator('='), title, separator('='))
}

/// Audit summary with one line per issue
pub fn render_audit(result: &ProcessingResult) -> String {
    let audit = &result.audit;
    let mut out = String::new();

    let _ = writeln!(out, "Product: {} (ID: {})", result.product_title, result.product_id);
    if let Some(error) = &result.error {
        let _ = writeln!(out, "❌ Processing failed: {}", error);
        return out;
    }
    let _ = writeln!(out, "Priority: {}", result.priority.as_str().to_uppercase());
    let _ = writeln!(
        out,
        "Issues Found: {} (Severity: {})",
        audit.issues_found, audit.severity
    );

    if audit.has_issues() {
        out.push_str("\nDetected Issues:\n");
        for (i, issue) in audit.issues.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} [{}] {}",
                i + 1,
                issue.severity.symbol(),
                issue.severity.as_str().to_uppercase(),
                issue.issue_type
            );
            let _ = writeln!(out, "     {}", issue.message);
        }
    }

    out
}

pub fn render_optimization(result: &ProcessingResult) -> String {
    let Some(optimization) = &result.optimization else {
        return "✓ No optimization needed - content already meets every rule\n".to_string();
    };

    let mut out = String::from("Optimization Applied:\n");
    let _ = writeln!(out, "Improvements: {}", optimization.improvements_made.len());
    for improvement in &optimization.improvements_made {
        let _ = writeln!(out, "  ✓ {}", improvement);
    }
    out
}

/// Original and rewritten fields side by side, descriptions truncated
pub fn render_before_after(result: &ProcessingResult) -> String {
    let Some(optimization) = &result.optimization else {
        return String::new();
    };

    let mut out = format!(
        "{}\nBEFORE / AFTER COMPARISON\n{}\n",
        separator('-'),
        separator('-')
    );

    if let Some(description) = &optimization.optimized_description {
        out.push_str("\n📝 DESCRIPTION:\n\nOriginal:\n");
        let _ = writeln!(out, "  {}", preview(&optimization.original_description));
        let _ = writeln!(
            out,
            "\n  Length: {} characters",
            char_len(&optimization.original_description)
        );
        out.push_str("\nOptimized:\n");
        let _ = writeln!(out, "  {}", preview(description));
        let _ = writeln!(out, "\n  Length: {} characters", char_len(description));
    }

    if let Some(seo_title) = &optimization.optimized_seo_title {
        out.push_str("\n🔍 SEO TITLE:\n");
        let _ = writeln!(out, "  New: {}", seo_title);
        let _ = writeln!(out, "  Length: {} characters", char_len(seo_title));
    }

    if let Some(seo_description) = &optimization.optimized_seo_description {
        out.push_str("\n🔍 SEO META DESCRIPTION:\n");
        let _ = writeln!(out, "  New: {}", seo_description);
        let _ = writeln!(out, "  Length: {} characters", char_len(seo_description));
    }

    out
}

pub fn render_statistics(stats: &BatchStatistics) -> String {
    let mut out = section_header("PROCESSING STATISTICS");
    let _ = writeln!(out, "Total Products Processed: {}", stats.total_products);
    let _ = writeln!(out, "Products with Issues: {}", stats.products_with_issues);
    let _ = writeln!(out, "Products Optimized: {}", stats.products_optimized);
    let _ = writeln!(out, "Total Issues Found: {}", stats.total_issues);
    if stats.failed_products > 0 {
        let _ = writeln!(out, "Failed Products: {}", stats.failed_products);
    }
    let _ = writeln!(out, "Completion Rate: {}", stats.completion_percent());

    out.push_str("\nPriority Breakdown:\n");
    for priority in Priority::ALL {
        let count = stats.count_for(priority);
        if count > 0 {
            let _ = writeln!(out, "  {}: {}", capitalize(priority.as_str()), count);
        }
    }
    out
}

pub fn render_payloads(payloads: &[UpdatePayload]) -> String {
    let mut out = section_header("UPDATE PAYLOADS");
    if payloads.is_empty() {
        out.push_str("No updates to publish.\n");
        return out;
    }

    for payload in payloads {
        let _ = writeln!(out, "Product ID: {}", payload.product_id);
        let _ = writeln!(
            out,
            "Fields to update: {}\n",
            payload.updates.field_names().join(", ")
        );
    }
    out
}

fn preview(text: &str) -> String {
    if char_len(text) <= PREVIEW_CHARS {
        text.to_string()
    } else {
        format!("{}...", clip_chars(text, PREVIEW_CHARS))
    }
}

fn capitalize(word: &str) -> String {
    crate::ai::content::text::capitalize_first(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::content::ContentCoordinator;
    use crate::catalog::MockCatalog;
    use crate::config::AppConfig;

    fn results() -> (ContentCoordinator, Vec<ProcessingResult>) {
        let coordinator = ContentCoordinator::new(&AppConfig::default()).unwrap();
        let results = coordinator.process_batch(&MockCatalog::products());
        (coordinator, results)
    }

    #[test]
    fn test_render_audit_lists_issues() {
        let (_, results) = results();
        let text = render_audit(&results[0]);
        assert!(text.contains("Product: Organic Face Cream (ID: prod_001)"));
        assert!(text.contains("Priority: HIGH"));
        assert!(text.contains("1. 🟠 [HIGH] description_length"));
    }

    #[test]
    fn test_render_clean_product() {
        let (_, results) = results();
        assert!(render_optimization(&results[2]).contains("No optimization needed"));
        assert!(render_before_after(&results[2]).is_empty());
    }

    #[test]
    fn test_render_statistics_and_payloads() {
        let (coordinator, results) = results();
        let stats = render_statistics(&coordinator.statistics(&results));
        assert!(stats.contains("Total Products Processed: 3"));
        assert!(stats.contains("Completion Rate: 66.7%"));
        assert!(stats.contains("  High: 2"));

        let payloads = render_payloads(&coordinator.export(&results));
        assert!(payloads.contains("Fields to update: description, seo_title, seo_description"));
    }

    #[test]
    fn test_preview_truncates() {
        let long = "word ".repeat(100);
        let text = preview(&long);
        assert!(text.ends_with("..."));
        assert!(char_len(&text) <= PREVIEW_CHARS + 3);
    }
}
