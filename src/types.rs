//! Shared records for the audit/optimize pipeline.
//!
//! Everything here is created once per run and serialized as-is by the
//! export, report and MCP layers.

use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Product listing as supplied by a catalog source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_seo_title(mut self, seo_title: impl Into<String>) -> Self {
        self.seo_title = Some(seo_title.into());
        self
    }

    pub fn with_seo_description(mut self, seo_description: impl Into<String>) -> Self {
        self.seo_description = Some(seo_description.into());
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// SEO title, absent treated as empty
    pub fn seo_title_text(&self) -> &str {
        self.seo_title.as_deref().unwrap_or("")
    }

    /// SEO description, absent treated as empty
    pub fn seo_description_text(&self) -> &str {
        self.seo_description.as_deref().unwrap_or("")
    }
}

/// Ordinal rank of an issue or of a whole audit.
///
/// `None` is only ever the aggregate of an audit without issues.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Critical => "🔴",
            Severity::High => "🟠",
            Severity::Medium => "🟡",
            Severity::Low => "🟢",
            Severity::None => "⚪",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of content defect detected by the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    DescriptionLength,
    MissingDescription,
    VagueLanguage,
    MissingSeoTitle,
    SeoTitleLength,
    MissingSeoDescription,
    SeoDescriptionLength,
    BrandTone,
    MissingCta,
    MissingBenefits,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::DescriptionLength => "description_length",
            IssueType::MissingDescription => "missing_description",
            IssueType::VagueLanguage => "vague_language",
            IssueType::MissingSeoTitle => "missing_seo_title",
            IssueType::SeoTitleLength => "seo_title_length",
            IssueType::MissingSeoDescription => "missing_seo_description",
            IssueType::SeoDescriptionLength => "seo_description_length",
            IssueType::BrandTone => "brand_tone",
            IssueType::MissingCta => "missing_cta",
            IssueType::MissingBenefits => "missing_benefits",
        }
    }

    pub fn is_seo_title(&self) -> bool {
        matches!(self, IssueType::MissingSeoTitle | IssueType::SeoTitleLength)
    }

    pub fn is_seo_description(&self) -> bool {
        matches!(
            self,
            IssueType::MissingSeoDescription | IssueType::SeoDescriptionLength
        )
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected content defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn new(issue_type: IssueType, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            issue_type,
            severity,
            message: message.into(),
        }
    }
}

/// Outcome of auditing one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub product_id: String,
    pub product_title: String,
    pub issues: Vec<Issue>,
    pub issues_found: usize,
    pub severity: Severity,
}

impl AuditResult {
    /// Build a result from issues in rule-evaluation order.
    pub fn from_issues(product: &Product, issues: Vec<Issue>) -> Self {
        let severity = issues
            .iter()
            .map(|issue| issue.severity)
            .max()
            .unwrap_or(Severity::None);

        Self {
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            issues_found: issues.len(),
            issues,
            severity,
        }
    }

    pub fn has_issues(&self) -> bool {
        self.issues_found > 0
    }

    pub fn has_issue(&self, issue_type: IssueType) -> bool {
        self.issues.iter().any(|issue| issue.issue_type == issue_type)
    }

    pub fn issue_types(&self) -> Vec<IssueType> {
        self.issues.iter().map(|issue| issue.issue_type).collect()
    }
}

/// Replacement content generated for a product with issues.
///
/// Optimized fields left as `None` were not changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub product_id: String,
    pub original_description: String,
    pub optimized_description: Option<String>,
    pub optimized_seo_title: Option<String>,
    pub optimized_seo_description: Option<String>,
    pub improvements_made: Vec<String>,
}

impl OptimizationResult {
    /// Product with the optimized fields written over the original ones.
    pub fn apply_to(&self, product: &Product) -> Product {
        let mut updated = product.clone();
        if let Some(description) = &self.optimized_description {
            updated.description = description.clone();
        }
        if let Some(seo_title) = &self.optimized_seo_title {
            updated.seo_title = Some(seo_title.clone());
        }
        if let Some(seo_description) = &self.optimized_seo_description {
            updated.seo_description = Some(seo_description.clone());
        }
        updated
    }
}

/// Action-queue tier assigned after an audit. Distinct from severity.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Every label, most urgent first
    pub const ALL: [Priority; 5] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
        Priority::None,
    ];

    /// Map an audit to its priority tier. The first matching row wins:
    ///
    /// | condition                               | priority |
    /// |-----------------------------------------|----------|
    /// | severity critical                       | critical |
    /// | severity high or 5+ issues              | high     |
    /// | severity medium or 3+ issues            | medium   |
    /// | any issue                               | low      |
    /// | otherwise                               | none     |
    pub fn classify(audit: &AuditResult) -> Self {
        let severity = audit.severity;
        let issue_count = audit.issues_found;

        if severity == Severity::Critical {
            Priority::Critical
        } else if severity == Severity::High || issue_count >= 5 {
            Priority::High
        } else if severity == Severity::Medium || issue_count >= 3 {
            Priority::Medium
        } else if issue_count > 0 {
            Priority::Low
        } else {
            Priority::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::None => "none",
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Priority::None),
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            other => Err(Error::InvalidParams(format!("unknown priority '{}'", other))),
        }
    }
}

/// Consolidated outcome for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub product_id: String,
    pub product_title: String,
    pub audit: AuditResult,
    pub optimization: Option<OptimizationResult>,
    pub priority: Priority,
    pub action_required: bool,
    /// Set only when the product could not be processed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingResult {
    /// Result for an audited product, classified from its audit.
    pub fn new(
        product: &Product,
        audit: AuditResult,
        optimization: Option<OptimizationResult>,
    ) -> Self {
        let priority = Priority::classify(&audit);
        Self {
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            audit,
            optimization,
            priority,
            action_required: priority != Priority::None,
            error: None,
        }
    }

    /// Placeholder result for a product whose processing failed.
    pub fn failed(product: &Product, error: &Error) -> Self {
        Self {
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            audit: AuditResult::from_issues(product, Vec::new()),
            optimization: None,
            priority: Priority::None,
            action_required: false,
            error: Some(error.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Aggregate counts over a batch of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStatistics {
    pub total_products: usize,
    pub products_with_issues: usize,
    pub products_optimized: usize,
    pub total_issues: usize,
    pub failed_products: usize,
    /// products_optimized / total_products, 0.0 for an empty batch
    pub completion_rate: f64,
    pub priority_breakdown: BTreeMap<Priority, usize>,
}

impl BatchStatistics {
    pub fn completion_percent(&self) -> String {
        format!("{:.1}%", self.completion_rate * 100.0)
    }

    pub fn count_for(&self, priority: Priority) -> usize {
        self.priority_breakdown.get(&priority).copied().unwrap_or(0)
    }
}

/// Fields to write back to the commerce platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
}

impl ProductUpdates {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.seo_title.is_none() && self.seo_description.is_none()
    }

    /// Names of the fields carried by this update
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.description.is_some() {
            names.push("description");
        }
        if self.seo_title.is_some() {
            names.push("seo_title");
        }
        if self.seo_description.is_some() {
            names.push("seo_description");
        }
        names
    }
}

/// Platform-ready update for one optimized product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePayload {
    pub product_id: String,
    pub updates: ProductUpdates,
}

impl UpdatePayload {
    /// Payload for a result, `None` when nothing was optimized.
    pub fn from_result(result: &ProcessingResult) -> Option<Self> {
        let optimization = result.optimization.as_ref()?;

        let updates = ProductUpdates {
            description: optimization.optimized_description.clone(),
            seo_title: optimization.optimized_seo_title.clone(),
            seo_description: optimization.optimized_seo_description.clone(),
        };

        if updates.is_empty() {
            return None;
        }

        Some(Self {
            product_id: result.product_id.clone(),
            updates,
        })
    }
}
