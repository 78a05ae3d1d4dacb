//! Content Generator
//!
//! Builds replacement copy for products that failed the audit. Text comes
//! from the template engine unless a remote [`TextGenerator`] is attached
//! and returns something that satisfies the field's limits.

use super::checker::ContentChecker;
use super::template::{DefaultTemplateEngine, TemplateEngine, TemplateType};
use super::text::{capitalize_first, char_len, clip_chars};
use crate::ai::llm::TextGenerator;
use crate::config::{LlmConfig, RuleConfig};
use crate::error::Result;
use crate::types::{AuditResult, OptimizationResult, Product, Severity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Inclusive character window for generated SEO titles
pub const SEO_TITLE_WINDOW: (usize, usize) = (50, 60);

/// Inclusive character window for generated SEO descriptions
pub const SEO_DESCRIPTION_WINDOW: (usize, usize) = (120, 160);

const PLACEHOLDER_SUBJECT: &str = "this product";
const DEFAULT_BRAND: &str = "Premium Quality";
const TITLE_FILLERS: [&str; 4] = ["Official Store", "Shop Online", "Gift Ready", "Shop Now"];
const DESCRIPTION_FILLERS: [&str; 3] = [
    "Trusted by customers worldwide.",
    "Premium quality guaranteed.",
    "Free shipping on qualifying orders.",
];

pub const IMPROVED_DESCRIPTION: &str = "Rewrote description with premium tone and CTA";
pub const IMPROVED_SEO_TITLE: &str = "Generated SEO-optimized title";
pub const IMPROVED_SEO_DESCRIPTION: &str = "Generated SEO meta description";

/// Copy family chosen from the title and product type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Skincare,
    Serum,
    General,
}

impl ProductCategory {
    pub fn detect(product: &Product) -> Self {
        let title = product.title.to_lowercase();
        let product_type = product
            .product_type
            .as_deref()
            .unwrap_or("")
            .to_lowercase();

        if title.contains("serum") {
            ProductCategory::Serum
        } else if ["cream", "balm", "moisturizer", "lotion"]
            .iter()
            .any(|k| title.contains(k))
            || product_type.contains("skincare")
        {
            ProductCategory::Skincare
        } else {
            ProductCategory::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Skincare => "skincare",
            ProductCategory::Serum => "serum",
            ProductCategory::General => "general",
        }
    }

    fn benefit_label(&self) -> &'static str {
        match self {
            ProductCategory::Skincare => "Nourishing & Anti-Aging",
            ProductCategory::Serum => "Professional Anti-Aging Treatment",
            ProductCategory::General => DEFAULT_BRAND,
        }
    }

    fn paragraph(&self) -> &'static str {
        match self {
            ProductCategory::Skincare => {
                "Experience transformative results with our carefully formulated blend of natural ingredients. \
                 This luxurious formula deeply nourishes your skin, promoting a radiant, healthy complexion \
                 while reducing the visible signs of aging."
            }
            ProductCategory::Serum => {
                "This professional-grade serum delivers powerful anti-aging benefits through a concentrated \
                 blend of proven ingredients. It enhances skin elasticity, reduces the look of fine lines \
                 and restores your skin's natural luminosity."
            }
            ProductCategory::General => {
                "Meticulously designed to deliver exceptional results, this piece combines premium materials \
                 with expert craftsmanship to exceed your expectations from the very first use."
            }
        }
    }

    fn bullets(&self) -> [&'static str; 4] {
        match self {
            ProductCategory::Skincare => [
                "Deeply nourishes and protects your skin",
                "Visible results you can see and feel",
                "Suitable for all skin types",
                "Cruelty-free and ethically sourced",
            ],
            ProductCategory::Serum => [
                "Concentrated, professional-grade formula",
                "Reduces the look of fine lines",
                "Restores natural radiance and luminosity",
                "Cruelty-free and ethically sourced",
            ],
            ProductCategory::General => [
                "Premium materials and expert craftsmanship",
                "Visible quality you can see and feel",
                "Made to last through everyday use",
                "Ethically sourced and responsibly made",
            ],
        }
    }

    fn seo_lead(&self, premium: &str) -> String {
        match self {
            ProductCategory::Skincare => format!("Experience our {}", premium),
            ProductCategory::Serum => "Professional-grade".to_string(),
            ProductCategory::General => format!("Discover our {}", premium),
        }
    }

    fn seo_detail(&self) -> &'static str {
        match self {
            ProductCategory::Skincare => {
                ", made with natural ingredients that nourish, protect and rejuvenate your skin."
            }
            ProductCategory::Serum => {
                " that delivers visible anti-aging results, reducing fine lines and restoring radiance."
            }
            ProductCategory::General => ", crafted for exceptional quality and lasting results.",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product field the generator can rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentField {
    Description,
    SeoTitle,
    SeoDescription,
}

impl ContentField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentField::Description => "description",
            ContentField::SeoTitle => "seo_title",
            ContentField::SeoDescription => "seo_description",
        }
    }
}

/// Request sent to a remote text generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPrompt {
    pub field: ContentField,
    pub product_title: String,
    pub category: ProductCategory,
    pub vendor: Option<String>,
    pub keywords: Vec<String>,
    pub min_chars: usize,
    pub max_chars: Option<usize>,
    pub requirements: Vec<String>,
}

impl ContentPrompt {
    pub fn new(field: ContentField, product_title: impl Into<String>) -> Self {
        Self {
            field,
            product_title: product_title.into(),
            category: ProductCategory::General,
            vendor: None,
            keywords: vec![],
            min_chars: 0,
            max_chars: None,
            requirements: vec![],
        }
    }

    pub fn with_category(mut self, category: ProductCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_vendor(mut self, vendor: Option<String>) -> Self {
        self.vendor = vendor.filter(|v| !v.trim().is_empty());
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_length(mut self, min_chars: usize, max_chars: Option<usize>) -> Self {
        self.min_chars = min_chars;
        self.max_chars = max_chars;
        self
    }

    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirements.push(requirement.into());
        self
    }

    /// Whether `text` fits the requested character window
    pub fn accepts_length(&self, text: &str) -> bool {
        let length = char_len(text);
        length >= self.min_chars && self.max_chars.map_or(true, |max| length <= max)
    }

    pub fn to_llm_prompt(&self) -> String {
        let mut prompt = "# Product Copy Request\n\n".to_string();
        prompt.push_str(&format!("**Field**: {}\n\n", self.field.as_str()));
        prompt.push_str(&format!("**Product**: {}\n\n", self.product_title));
        prompt.push_str(&format!("**Category**: {}\n\n", self.category));

        if let Some(vendor) = &self.vendor {
            prompt.push_str(&format!("**Brand**: {}\n\n", vendor));
        }

        prompt.push_str("**Tone**: premium, warm, trustworthy\n\n");

        let length = match self.max_chars {
            Some(max) => format!("{}-{} characters", self.min_chars, max),
            None => format!("at least {} characters", self.min_chars),
        };
        prompt.push_str(&format!("**Length**: {}\n\n", length));

        if !self.keywords.is_empty() {
            prompt.push_str(&format!("**Keywords**: {}\n\n", self.keywords.join(", ")));
        }

        if !self.requirements.is_empty() {
            prompt.push_str("**Requirements**:\n");
            for requirement in &self.requirements {
                prompt.push_str(&format!("- {}\n", requirement));
            }
            prompt.push('\n');
        }

        prompt.push_str("Respond with the text only.\n");
        prompt
    }
}

/// Rewrites product copy
pub struct ContentGenerator {
    checker: ContentChecker,
    engine: DefaultTemplateEngine,
    text_service: Option<Arc<dyn TextGenerator>>,
    llm: LlmConfig,
}

impl ContentGenerator {
    pub fn new(rules: RuleConfig) -> Result<Self> {
        Ok(Self {
            checker: ContentChecker::new(rules)?,
            engine: DefaultTemplateEngine::new()?,
            text_service: None,
            llm: LlmConfig::default(),
        })
    }

    /// Ask `service` first for every field, falling back to templates.
    pub fn with_text_service(mut self, service: Arc<dyn TextGenerator>, llm: LlmConfig) -> Self {
        self.text_service = Some(service);
        self.llm = llm;
        self
    }

    pub fn has_text_service(&self) -> bool {
        self.text_service.is_some()
    }

    /// Build replacement fields for an audited product.
    ///
    /// The description is always rewritten. SEO fields are rewritten when
    /// their own rule fired or the audit reached high severity.
    pub fn generate(&self, product: &Product, audit: &AuditResult) -> Result<OptimizationResult> {
        let category = ProductCategory::detect(product);
        let severe = audit.severity >= Severity::High;
        let mut improvements = Vec::new();

        let description = self.generate_description(product, category)?;
        improvements.push(IMPROVED_DESCRIPTION.to_string());

        let seo_title = if severe || audit.issues.iter().any(|i| i.issue_type.is_seo_title()) {
            improvements.push(IMPROVED_SEO_TITLE.to_string());
            Some(self.generate_seo_title(product, category)?)
        } else {
            None
        };

        let seo_description =
            if severe || audit.issues.iter().any(|i| i.issue_type.is_seo_description()) {
                improvements.push(IMPROVED_SEO_DESCRIPTION.to_string());
                Some(self.generate_seo_description(product, category)?)
            } else {
                None
            };

        debug!(
            product_id = %product.id,
            category = %category,
            improvements = improvements.len(),
            "content generated"
        );

        Ok(OptimizationResult {
            product_id: product.id.clone(),
            original_description: product.description.clone(),
            optimized_description: Some(description),
            optimized_seo_title: seo_title,
            optimized_seo_description: seo_description,
            improvements_made: improvements,
        })
    }

    pub fn generate_description(&self, product: &Product, category: ProductCategory) -> Result<String> {
        let rules = self.checker.rules();
        let prompt = self
            .base_prompt(ContentField::Description, product, category)
            .with_length(rules.min_description_length, None)
            .with_requirement("Open with a hook and close with a clear call to action")
            .with_requirement(format!(
                "Avoid vague words: {}",
                rules.vague_words.join(", ")
            ));

        let accepted = self.delegate(&prompt, |text| {
            prompt.accepts_length(text)
                && !self.checker.vague_terms().is_match(text)
                && self.checker.premium_terms().is_match(text)
                && self.checker.cta_terms().is_match(text)
        });
        if let Some(text) = accepted {
            return Ok(text);
        }

        let premium = self.premium_word();
        let bullets = category
            .bullets()
            .iter()
            .map(|b| format!("• {}", b))
            .collect::<Vec<_>>()
            .join("\n");

        let mut data = HashMap::new();
        data.insert("subject".to_string(), self.subject(product));
        data.insert("article".to_string(), indefinite_article(&premium).to_string());
        data.insert("premium".to_string(), premium);
        data.insert("category_paragraph".to_string(), category.paragraph().to_string());
        data.insert("benefit_bullets".to_string(), bullets);
        data.insert("cta".to_string(), self.cta_sentence_start());
        data.insert("vendor".to_string(), self.vendor(product).unwrap_or_default());

        let rendered = self.engine.render(&TemplateType::ProductDescription, &data)?;

        // configured vague words may collide with fixed template wording
        if self.checker.vague_terms().is_match(&rendered) {
            return Ok(self.checker.vague_terms().strip(&rendered));
        }
        Ok(rendered)
    }

    pub fn generate_seo_title(&self, product: &Product, category: ProductCategory) -> Result<String> {
        let (min, max) = SEO_TITLE_WINDOW;
        let prompt = self
            .base_prompt(ContentField::SeoTitle, product, category)
            .with_length(min, Some(max))
            .with_requirement("Format: Product | Key Benefit | Brand");

        if let Some(text) = self.delegate(&prompt, |text| prompt.accepts_length(text)) {
            return Ok(text);
        }

        let subject = capitalize_first(&self.subject(product));
        let benefit = category.benefit_label();

        let mut layouts: Vec<(&str, String)> = Vec::new();
        if let Some(vendor) = self.vendor(product) {
            layouts.push((benefit, vendor));
        }
        if benefit != DEFAULT_BRAND {
            layouts.push((benefit, DEFAULT_BRAND.to_string()));
        }
        layouts.push((benefit, String::new()));
        if benefit != DEFAULT_BRAND {
            layouts.push((DEFAULT_BRAND, String::new()));
        }

        let mut candidates = Vec::with_capacity(layouts.len());
        for (benefit, brand) in layouts {
            candidates.push(self.render_seo_title(&subject, benefit, &brand)?);
        }

        if let Some(exact) = candidates
            .iter()
            .find(|c| (min..=max).contains(&char_len(c)))
        {
            return Ok(exact.clone());
        }

        let mut title = match candidates
            .into_iter()
            .filter(|c| char_len(c) <= max)
            .max_by_key(|c| char_len(c))
        {
            Some(title) => title,
            None => {
                let room = max.saturating_sub(char_len(DEFAULT_BRAND) + 3);
                self.render_seo_title(&clip_chars(&subject, room), DEFAULT_BRAND, "")?
            }
        };

        for filler in TITLE_FILLERS {
            if char_len(&title) >= min {
                break;
            }
            let extended = format!("{} | {}", title, filler);
            if char_len(&extended) <= max {
                title = extended;
            }
        }

        Ok(title)
    }

    pub fn generate_seo_description(
        &self,
        product: &Product,
        category: ProductCategory,
    ) -> Result<String> {
        let (min, max) = SEO_DESCRIPTION_WINDOW;
        let prompt = self
            .base_prompt(ContentField::SeoDescription, product, category)
            .with_length(min, Some(max))
            .with_requirement("Mention the product and end with a call to action");

        if let Some(text) = self.delegate(&prompt, |text| prompt.accepts_length(text)) {
            return Ok(text);
        }

        let mut subject = self.subject(product).to_lowercase();
        let lead = category.seo_lead(&self.premium_word());
        let cta = self.cta_sentence_start();

        let mut description = self.render_seo_description(&lead, &subject, category, &cta, "")?;
        let overflow = char_len(&description).saturating_sub(max);
        if overflow > 0 {
            subject = clip_chars(&subject, char_len(&subject).saturating_sub(overflow));
            description = self.render_seo_description(&lead, &subject, category, &cta, "")?;
        }

        let mut extras: Vec<&str> = Vec::new();
        for filler in DESCRIPTION_FILLERS {
            if char_len(&description) >= min {
                break;
            }
            extras.push(filler);
            let extended =
                self.render_seo_description(&lead, &subject, category, &cta, &extras.join(" "))?;
            if char_len(&extended) <= max {
                description = extended;
            } else {
                extras.pop();
            }
        }

        Ok(description)
    }

    fn render_seo_title(&self, subject: &str, benefit: &str, brand: &str) -> Result<String> {
        let mut data = HashMap::new();
        data.insert("subject".to_string(), subject.to_string());
        data.insert("benefit".to_string(), benefit.to_string());
        data.insert("brand".to_string(), brand.to_string());
        self.engine.render(&TemplateType::SeoTitle, &data)
    }

    fn render_seo_description(
        &self,
        lead: &str,
        subject: &str,
        category: ProductCategory,
        cta: &str,
        extra: &str,
    ) -> Result<String> {
        let mut data = HashMap::new();
        data.insert("lead".to_string(), lead.to_string());
        data.insert("subject".to_string(), subject.to_string());
        data.insert("detail".to_string(), category.seo_detail().to_string());
        data.insert("cta".to_string(), cta.to_string());
        data.insert("extra".to_string(), extra.to_string());
        self.engine.render(&TemplateType::SeoDescription, &data)
    }

    fn base_prompt(
        &self,
        field: ContentField,
        product: &Product,
        category: ProductCategory,
    ) -> ContentPrompt {
        let rules = self.checker.rules();
        let mut keywords = rules.premium_words.clone();
        keywords.extend(rules.cta_phrases.iter().cloned());

        ContentPrompt::new(field, self.subject(product))
            .with_category(category)
            .with_vendor(self.vendor(product))
            .with_keywords(keywords)
    }

    fn delegate(&self, prompt: &ContentPrompt, accept: impl Fn(&str) -> bool) -> Option<String> {
        let service = self.text_service.as_ref()?;

        match service.generate_text(
            &prompt.to_llm_prompt(),
            self.llm.max_tokens,
            self.llm.temperature,
        ) {
            Ok(text) => {
                let text = text.trim().to_string();
                if accept(&text) {
                    Some(text)
                } else {
                    warn!(
                        field = prompt.field.as_str(),
                        length = char_len(&text),
                        "Generated text rejected, using template"
                    );
                    None
                }
            }
            Err(e) => {
                warn!(
                    field = prompt.field.as_str(),
                    error = %e,
                    "Text generation failed, using template"
                );
                None
            }
        }
    }

    /// Title with vague words removed, or a placeholder when nothing is left
    fn subject(&self, product: &Product) -> String {
        let subject = self.checker.vague_terms().strip(&product.title);
        if subject.is_empty() {
            PLACEHOLDER_SUBJECT.to_string()
        } else {
            subject
        }
    }

    fn vendor(&self, product: &Product) -> Option<String> {
        product
            .vendor
            .as_deref()
            .map(|v| self.checker.vague_terms().strip(v))
            .filter(|v| !v.is_empty())
    }

    fn premium_word(&self) -> String {
        first_term(&self.checker.rules().premium_words).unwrap_or_else(|| "premium".to_string())
    }

    fn cta_sentence_start(&self) -> String {
        capitalize_first(
            &first_term(&self.checker.rules().cta_phrases).unwrap_or_else(|| "shop now".to_string()),
        )
    }
}

fn first_term(terms: &[String]) -> Option<String> {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .find(|t| !t.is_empty())
}

fn indefinite_article(word: &str) -> &'static str {
    match word.chars().next() {
        Some(c) if "aeiouAEIOU".contains(c) => "an",
        _ => "a",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::IssueType;
    use std::sync::Mutex;

    fn generator() -> ContentGenerator {
        ContentGenerator::new(RuleConfig::default()).unwrap()
    }

    fn face_cream() -> Product {
        Product::new(
            "prod_001",
            "Organic Face Cream",
            "Good cream for your face. Made with natural stuff.",
        )
        .with_vendor("LuxeBeauty")
        .with_product_type("Skincare")
    }

    fn serum() -> Product {
        Product::new("prod_002", "Anti-Aging Serum Premium Formula", "Really good serum.")
            .with_vendor("LuxeBeauty")
            .with_product_type("Skincare")
            .with_seo_title("Anti-Aging Serum")
            .with_seo_description("Good serum")
    }

    struct ScriptedService {
        reply: std::result::Result<String, String>,
        calls: Mutex<usize>,
    }

    impl TextGenerator for ScriptedService {
        fn generate_text(&self, _prompt: &str, _max_tokens: usize, _temperature: f32) -> Result<String> {
            *self.calls.lock().unwrap() += 1;
            self.reply.clone().map_err(Error::Internal)
        }

        fn model_info(&self) -> crate::ai::llm::ModelInfo {
            crate::ai::llm::ModelInfo {
                name: "scripted".to_string(),
                provider: "test".to_string(),
                max_output_tokens: 100,
            }
        }
    }

    #[test]
    fn test_category_detection() {
        assert_eq!(ProductCategory::detect(&face_cream()), ProductCategory::Skincare);
        assert_eq!(ProductCategory::detect(&serum()), ProductCategory::Serum);
        assert_eq!(
            ProductCategory::detect(&Product::new("p", "Leather Tote", "")),
            ProductCategory::General
        );
    }

    #[test]
    fn test_description_template() {
        let product = face_cream();
        let text = generator()
            .generate_description(&product, ProductCategory::Skincare)
            .unwrap();

        assert!(text.starts_with("Discover the exceptional quality of our Organic Face Cream"));
        assert!(text.contains("Key Benefits:\n• Deeply nourishes"));
        assert!(text.contains("Proudly presented by LuxeBeauty."));
        assert!(text.contains("Shop now and experience"));
        let length = char_len(&text);
        assert!((600..=900).contains(&length), "length {}", length);
    }

    #[test]
    fn test_vague_words_stripped_from_subject() {
        let product = Product::new("p", "Really Nice Candle", "");
        let text = generator()
            .generate_description(&product, ProductCategory::General)
            .unwrap();
        assert!(text.contains("our Candle,"));
        assert!(!text.to_lowercase().contains("really"));
    }

    #[test]
    fn test_empty_title_uses_placeholder() {
        let product = Product::new("p", "", "");
        let generator = generator();
        let text = generator
            .generate_description(&product, ProductCategory::General)
            .unwrap();
        assert!(text.contains("our this product,"));

        let title = generator
            .generate_seo_title(&product, ProductCategory::General)
            .unwrap();
        assert!(title.starts_with("This product | Premium Quality"));
    }

    #[test]
    fn test_seo_title_composition() {
        let generator = generator();
        let title = generator
            .generate_seo_title(&face_cream(), ProductCategory::Skincare)
            .unwrap();
        assert_eq!(title, "Organic Face Cream | Nourishing & Anti-Aging | LuxeBeauty");

        let title = generator
            .generate_seo_title(&serum(), ProductCategory::Serum)
            .unwrap();
        assert_eq!(title, "Anti-Aging Serum Premium Formula | Premium Quality");
    }

    #[test]
    fn test_seo_fields_fit_windows() {
        let generator = generator();
        let long_title = "x".repeat(300);
        let titles = [
            "A",
            "Mug",
            "Botanical Balm",
            "Handcrafted Leather Weekend Travel Duffel Bag With Brass Hardware and Extra Straps",
            long_title.as_str(),
        ];
        for title in titles {
            let product = Product::new("p", title, "").with_vendor("Acme");
            let category = ProductCategory::detect(&product);

            let seo_title = generator.generate_seo_title(&product, category).unwrap();
            let length = char_len(&seo_title);
            assert!((50..=60).contains(&length), "{:?} -> {}", seo_title, length);

            let seo_description = generator.generate_seo_description(&product, category).unwrap();
            let length = char_len(&seo_description);
            assert!((120..=160).contains(&length), "{:?} -> {}", seo_description, length);
        }
    }

    #[test]
    fn test_field_policy() {
        let generator = generator();
        let product = face_cream();
        let checker = ContentChecker::new(RuleConfig::default()).unwrap();
        let audit = checker.audit(&product);

        let result = generator.generate(&product, &audit).unwrap();
        assert!(result.optimized_description.is_some());
        assert!(result.optimized_seo_title.is_some());
        assert!(result.optimized_seo_description.is_some());
        assert_eq!(
            result.improvements_made,
            vec![IMPROVED_DESCRIPTION, IMPROVED_SEO_TITLE, IMPROVED_SEO_DESCRIPTION]
        );
        assert_eq!(result.original_description, product.description);
    }

    #[test]
    fn test_medium_audit_keeps_valid_seo_fields() {
        let product = Product::new("p", "Linen Throw", "x".repeat(120))
            .with_seo_title("Linen Throw | Handwoven Natural Linen Blanket")
            .with_seo_description("y".repeat(100));
        let checker = ContentChecker::new(RuleConfig::default()).unwrap();
        let audit = checker.audit(&product);
        assert_eq!(audit.severity, Severity::Medium);
        assert!(!audit.has_issue(IssueType::SeoTitleLength));

        let result = generator().generate(&product, &audit).unwrap();
        assert!(result.optimized_seo_title.is_none());
        assert!(result.optimized_seo_description.is_none());
        assert_eq!(result.improvements_made, vec![IMPROVED_DESCRIPTION]);
    }

    #[test]
    fn test_regenerated_product_passes_audit() {
        let checker = ContentChecker::new(RuleConfig::default()).unwrap();
        let generator = generator();

        for product in [face_cream(), serum(), Product::new("p", "", "")] {
            let audit = checker.audit(&product);
            let result = generator.generate(&product, &audit).unwrap();
            let reaudit = checker.audit(&result.apply_to(&product));
            assert_eq!(reaudit.issues_found, 0, "{:?}", reaudit.issues);
        }
    }

    #[test]
    fn test_remote_text_used_when_valid() {
        let reply = "Luxury hand-poured candle with a warm amber glow. ".repeat(3) + "Shop now.";
        let service = Arc::new(ScriptedService {
            reply: Ok(reply.clone()),
            calls: Mutex::new(0),
        });
        let generator = generator().with_text_service(service.clone(), LlmConfig::default());

        let product = Product::new("p", "Candle", "");
        let text = generator
            .generate_description(&product, ProductCategory::General)
            .unwrap();
        assert_eq!(text, reply.trim());
        assert_eq!(*service.calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_remote_failure_falls_back_to_template() {
        let service = Arc::new(ScriptedService {
            reply: Err("timeout".to_string()),
            calls: Mutex::new(0),
        });
        let generator = generator().with_text_service(service.clone(), LlmConfig::default());

        let product = face_cream();
        let checker = ContentChecker::new(RuleConfig::default()).unwrap();
        let result = generator.generate(&product, &checker.audit(&product)).unwrap();

        assert_eq!(*service.calls.lock().unwrap(), 3);
        let description = result.optimized_description.unwrap();
        assert!(description.starts_with("Discover the exceptional quality"));
    }

    #[test]
    fn test_remote_text_outside_window_rejected() {
        let service = Arc::new(ScriptedService {
            reply: Ok("Too short".to_string()),
            calls: Mutex::new(0),
        });
        let generator = generator().with_text_service(service, LlmConfig::default());

        let title = generator
            .generate_seo_title(&face_cream(), ProductCategory::Skincare)
            .unwrap();
        assert_eq!(title, "Organic Face Cream | Nourishing & Anti-Aging | LuxeBeauty");
    }

    #[test]
    fn test_prompt_rendering() {
        let prompt = ContentPrompt::new(ContentField::SeoTitle, "Face Cream")
            .with_category(ProductCategory::Skincare)
            .with_vendor(Some("Luxe".to_string()))
            .with_keywords(vec!["premium".to_string()])
            .with_length(50, Some(60));

        let text = prompt.to_llm_prompt();
        assert!(text.contains("**Field**: seo_title"));
        assert!(text.contains("**Brand**: Luxe"));
        assert!(text.contains("**Length**: 50-60 characters"));
        assert!(prompt.accepts_length(&"x".repeat(55)));
        assert!(!prompt.accepts_length(&"x".repeat(61)));
    }

    #[test]
    fn test_indefinite_article() {
        assert_eq!(indefinite_article("exceptional"), "an");
        assert_eq!(indefinite_article("premium"), "a");
    }
}
