//! Content Checker
//!
//! Rule engine that audits a product listing and reports typed issues.
//! It never rewrites content; see [`super::generator`] for that.

use super::text::{char_len, collapse_whitespace};
use crate::config::RuleConfig;
use crate::error::Result;
use crate::types::{AuditResult, Issue, IssueType, Product, Severity};
use regex::{Regex, RegexSet};
use tracing::debug;

/// Case-insensitive whole-word matcher over a fixed term list.
///
/// Multi-word terms ("shop now") match across any run of whitespace.
#[derive(Debug, Clone)]
pub struct TermMatcher {
    terms: Vec<String>,
    set: RegexSet,
    combined: Option<Regex>,
}

impl TermMatcher {
    pub fn new(terms: &[String]) -> Result<Self> {
        let terms: Vec<String> = terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let patterns: Vec<String> = terms.iter().map(|t| term_pattern(t)).collect();
        let set = RegexSet::new(&patterns)?;

        let combined = if patterns.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = terms.iter().map(|t| term_body(t)).collect();
            Some(Regex::new(&format!(
                r"(?i)\b(?:{})\b",
                alternatives.join("|")
            ))?)
        };

        Ok(Self {
            terms,
            set,
            combined,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.set.is_match(text)
    }

    /// Terms found in `text`, in term-list order
    pub fn matches(&self, text: &str) -> Vec<&str> {
        self.set
            .matches(text)
            .into_iter()
            .map(|index| self.terms[index].as_str())
            .collect()
    }

    /// `text` with every matching term removed. Whitespace is collapsed
    /// within each line; line breaks are kept.
    pub fn strip(&self, text: &str) -> String {
        let stripped = match &self.combined {
            Some(regex) => regex.replace_all(text, " ").into_owned(),
            None => text.to_string(),
        };
        stripped
            .split('\n')
            .map(collapse_whitespace)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

fn term_body(term: &str) -> String {
    term.split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

fn term_pattern(term: &str) -> String {
    format!(r"(?i)\b{}\b", term_body(term))
}

/// Audits products against a [`RuleConfig`].
#[derive(Debug, Clone)]
pub struct ContentChecker {
    rules: RuleConfig,
    vague: TermMatcher,
    premium: TermMatcher,
    cta: TermMatcher,
    benefit: TermMatcher,
}

impl ContentChecker {
    pub fn new(rules: RuleConfig) -> Result<Self> {
        rules.validate()?;

        Ok(Self {
            vague: TermMatcher::new(&rules.vague_words)?,
            premium: TermMatcher::new(&rules.premium_words)?,
            cta: TermMatcher::new(&rules.cta_phrases)?,
            benefit: TermMatcher::new(&rules.benefit_words)?,
            rules,
        })
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn vague_terms(&self) -> &TermMatcher {
        &self.vague
    }

    pub fn premium_terms(&self) -> &TermMatcher {
        &self.premium
    }

    pub fn cta_terms(&self) -> &TermMatcher {
        &self.cta
    }

    /// Run every rule against the product. Issue order follows rule order.
    pub fn audit(&self, product: &Product) -> AuditResult {
        let description = product.description.as_str();

        let mut issues = Vec::new();
        issues.extend(self.check_description(description));
        issues.extend(self.check_seo_title(product.seo_title_text()));
        issues.extend(self.check_seo_description(product.seo_description_text()));
        issues.extend(self.check_tone(description));
        issues.extend(self.check_conversion_elements(description));

        for issue in &issues {
            debug!(
                product_id = %product.id,
                issue_type = %issue.issue_type,
                severity = %issue.severity,
                "rule fired"
            );
        }

        AuditResult::from_issues(product, issues)
    }

    fn check_description(&self, description: &str) -> Vec<Issue> {
        let mut issues = Vec::new();
        let length = char_len(description);

        if length < self.rules.min_description_length {
            issues.push(Issue::new(
                IssueType::DescriptionLength,
                Severity::High,
                format!(
                    "Description too short ({} chars). Minimum: {}",
                    length, self.rules.min_description_length
                ),
            ));
        }

        if description.trim().is_empty() {
            issues.push(Issue::new(
                IssueType::MissingDescription,
                Severity::Critical,
                "Product description is missing",
            ));
        }

        let vague = self.vague.matches(description);
        if !vague.is_empty() {
            issues.push(Issue::new(
                IssueType::VagueLanguage,
                Severity::Medium,
                format!("Contains vague terms: {}", vague.join(", ")),
            ));
        }

        issues
    }

    fn check_seo_title(&self, seo_title: &str) -> Vec<Issue> {
        if seo_title.trim().is_empty() {
            return vec![Issue::new(
                IssueType::MissingSeoTitle,
                Severity::High,
                "SEO title is missing",
            )];
        }

        let length = char_len(seo_title);
        if length < self.rules.min_seo_title_length {
            return vec![Issue::new(
                IssueType::SeoTitleLength,
                Severity::High,
                format!(
                    "SEO title too short ({} chars). Minimum: {}",
                    length, self.rules.min_seo_title_length
                ),
            )];
        }

        Vec::new()
    }

    fn check_seo_description(&self, seo_description: &str) -> Vec<Issue> {
        if seo_description.trim().is_empty() {
            return vec![Issue::new(
                IssueType::MissingSeoDescription,
                Severity::High,
                "SEO description is missing",
            )];
        }

        let length = char_len(seo_description);
        let (min, max) = (
            self.rules.seo_description_min(),
            self.rules.seo_description_max(),
        );

        if length < min {
            vec![Issue::new(
                IssueType::SeoDescriptionLength,
                Severity::Medium,
                format!(
                    "SEO description too short ({} chars). Recommended: {}-{}",
                    length, min, max
                ),
            )]
        } else if length > max {
            vec![Issue::new(
                IssueType::SeoDescriptionLength,
                Severity::Medium,
                format!(
                    "SEO description too long ({} chars). Recommended: {}-{}",
                    length, min, max
                ),
            )]
        } else {
            Vec::new()
        }
    }

    fn check_tone(&self, description: &str) -> Vec<Issue> {
        if self.premium.is_match(description) {
            return Vec::new();
        }

        vec![Issue::new(
            IssueType::BrandTone,
            Severity::Medium,
            "Missing premium/luxury brand tone",
        )]
    }

    fn check_conversion_elements(&self, description: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        if !self.cta.is_match(description) {
            issues.push(Issue::new(
                IssueType::MissingCta,
                Severity::Medium,
                "Missing clear call-to-action",
            ));
        }

        // opt-in: empty list disables the rule
        if !self.benefit.is_empty() && !self.benefit.is_match(description) {
            issues.push(Issue::new(
                IssueType::MissingBenefits,
                Severity::Low,
                "Could emphasize customer benefits more clearly",
            ));
        }

        issues
    }
}
