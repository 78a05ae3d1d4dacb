//! Template Engine
//!
//! Named content templates with `{{field}}` placeholders and
//! `{{#if field}}...{{/if}}` sections.

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Template kinds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TemplateType {
    /// Long-form product description
    ProductDescription,
    /// `<title>` text for the product page
    SeoTitle,
    /// Meta description
    SeoDescription,
    /// Registered by the caller
    Custom(String),
}

impl TemplateType {
    pub fn name(&self) -> &str {
        match self {
            TemplateType::ProductDescription => "product_description",
            TemplateType::SeoTitle => "seo_title",
            TemplateType::SeoDescription => "seo_description",
            TemplateType::Custom(name) => name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentTemplate {
    pub template_type: TemplateType,
    pub name: String,
    pub description: String,
    pub template: String,
    pub required_fields: Vec<String>,
    pub optional_fields: Vec<String>,
    pub defaults: HashMap<String, String>,
}

impl ContentTemplate {
    pub fn new(
        template_type: TemplateType,
        name: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            template_type,
            name: name.into(),
            description: String::new(),
            template: template.into(),
            required_fields: vec![],
            optional_fields: vec![],
            defaults: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_required_fields(mut self, fields: &[&str]) -> Self {
        self.required_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_optional_fields(mut self, fields: &[&str]) -> Self {
        self.optional_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_default(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(field.into(), value.into());
        self
    }

    /// Check that every required field is present
    pub fn validate_fields(&self, data: &HashMap<String, String>) -> Result<()> {
        for field in &self.required_fields {
            if !data.contains_key(field) {
                return Err(Error::Validation(format!(
                    "Required field '{}' is missing for template '{}'",
                    field, self.name
                )));
            }
        }
        Ok(())
    }

    pub fn apply_defaults(&self, data: &mut HashMap<String, String>) {
        for (key, value) in &self.defaults {
            data.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}

pub trait TemplateEngine: Send + Sync {
    /// Look up a registered template
    fn template(&self, template_type: &TemplateType) -> Result<&ContentTemplate>;

    /// Render a template with the given field values
    fn apply_template(
        &self,
        template: &ContentTemplate,
        data: &HashMap<String, String>,
    ) -> Result<String>;

    fn list_templates(&self) -> Vec<TemplateType>;

    /// Look up and render in one step
    fn render(&self, template_type: &TemplateType, data: &HashMap<String, String>) -> Result<String> {
        let template = self.template(template_type)?;
        self.apply_template(template, data)
    }
}

pub struct DefaultTemplateEngine {
    templates: HashMap<TemplateType, ContentTemplate>,
    if_pattern: Regex,
    placeholder_pattern: Regex,
}

impl DefaultTemplateEngine {
    pub fn new() -> Result<Self> {
        let mut engine = Self {
            templates: HashMap::new(),
            if_pattern: Regex::new(r"(?s)\{\{#if (\w+)\}\}(.*?)\{\{/if\}\}")?,
            placeholder_pattern: Regex::new(r"\{\{(\w+)\}\}")?,
        };

        engine.register_template(
            ContentTemplate::new(
                TemplateType::ProductDescription,
                "Product Description",
                "Discover the exceptional quality of our {{subject}}, {{article}} {{premium}} creation crafted for those who appreciate excellence.

{{category_paragraph}}

Key Benefits:
{{benefit_bullets}}

Trusted by discerning customers worldwide, our {{subject}} represents the perfect balance of luxury and effectiveness.{{#if vendor}} Proudly presented by {{vendor}}.{{/if}}

Ready to treat yourself? {{cta}} and experience the difference that {{premium}} quality makes.",
            )
            .with_description("Hook, category paragraph, key benefits, trust sentence and closing call to action")
            .with_required_fields(&[
                "subject",
                "premium",
                "category_paragraph",
                "benefit_bullets",
                "cta",
            ])
            .with_optional_fields(&["vendor"])
            .with_default("article", "a"),
        );

        engine.register_template(
            ContentTemplate::new(
                TemplateType::SeoTitle,
                "SEO Title",
                "{{subject}}{{#if benefit}} | {{benefit}}{{/if}}{{#if brand}} | {{brand}}{{/if}}",
            )
            .with_description("Title | Benefit | Brand")
            .with_required_fields(&["subject"])
            .with_optional_fields(&["benefit", "brand"]),
        );

        engine.register_template(
            ContentTemplate::new(
                TemplateType::SeoDescription,
                "SEO Description",
                "{{lead}} {{subject}}{{detail}} {{cta}} for exclusive offers.{{#if extra}} {{extra}}{{/if}}",
            )
            .with_description("Meta description with subject and call to action")
            .with_required_fields(&["lead", "subject", "detail", "cta"])
            .with_optional_fields(&["extra"]),
        );

        Ok(engine)
    }

    pub fn register_template(&mut self, template: ContentTemplate) {
        self.templates
            .insert(template.template_type.clone(), template);
    }

    fn replace(&self, template: &str, data: &HashMap<String, String>) -> Result<String> {
        // sections first so field values are never re-scanned
        let sections = self.if_pattern.replace_all(template, |caps: &Captures| {
            let present = data.get(&caps[1]).is_some_and(|v| !v.trim().is_empty());
            if present {
                caps[2].to_string()
            } else {
                String::new()
            }
        });

        let mut missing = Vec::new();
        let rendered = self
            .placeholder_pattern
            .replace_all(&sections, |caps: &Captures| match data.get(&caps[1]) {
                Some(value) => value.clone(),
                None => {
                    missing.push(caps[1].to_string());
                    String::new()
                }
            })
            .into_owned();

        if !missing.is_empty() {
            return Err(Error::Template(format!(
                "Unresolved placeholders: {}",
                missing.join(", ")
            )));
        }

        // drop whitespace-only lines left behind by removed sections
        Ok(rendered
            .lines()
            .filter(|line| !line.trim().is_empty() || line.is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

impl TemplateEngine for DefaultTemplateEngine {
    fn template(&self, template_type: &TemplateType) -> Result<&ContentTemplate> {
        self.templates
            .get(template_type)
            .ok_or_else(|| Error::NotFound(format!("Template '{}' not found", template_type.name())))
    }

    fn apply_template(
        &self,
        template: &ContentTemplate,
        data: &HashMap<String, String>,
    ) -> Result<String> {
        template.validate_fields(data)?;

        let mut full_data = data.clone();
        template.apply_defaults(&mut full_data);
        for field in &template.optional_fields {
            full_data.entry(field.clone()).or_default();
        }

        self.replace(&template.template, &full_data)
    }

    fn list_templates(&self) -> Vec<TemplateType> {
        let mut types: Vec<TemplateType> = self.templates.keys().cloned().collect();
        types.sort_by(|a, b| a.name().cmp(b.name()));
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_template_type_name() {
        assert_eq!(
            TemplateType::ProductDescription.name(),
            "product_description"
        );
        assert_eq!(TemplateType::SeoTitle.name(), "seo_title");
        assert_eq!(
            TemplateType::Custom("gift_card".to_string()).name(),
            "gift_card"
        );
    }

    #[test]
    fn test_content_template_validation() {
        let template = ContentTemplate::new(TemplateType::SeoTitle, "Test", "{{subject}}")
            .with_required_fields(&["subject"]);

        let mut fields = HashMap::new();
        assert!(matches!(
            template.validate_fields(&fields),
            Err(Error::Validation(_))
        ));

        fields.insert("subject".to_string(), "Face Cream".to_string());
        assert!(template.validate_fields(&fields).is_ok());
    }

    #[test]
    fn test_seo_title_sections() {
        let engine = DefaultTemplateEngine::new().unwrap();

        let full = engine
            .render(
                &TemplateType::SeoTitle,
                &data(&[("subject", "Face Cream"), ("benefit", "Nourishing"), ("brand", "Luxe")]),
            )
            .unwrap();
        assert_eq!(full, "Face Cream | Nourishing | Luxe");

        let bare = engine
            .render(&TemplateType::SeoTitle, &data(&[("subject", "Face Cream"), ("brand", "")]))
            .unwrap();
        assert_eq!(bare, "Face Cream");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let engine = DefaultTemplateEngine::new().unwrap();
        let rendered = engine
            .render(&TemplateType::SeoTitle, &data(&[("subject", "{{brand}}")]))
            .unwrap();
        assert_eq!(rendered, "{{brand}}");
    }

    #[test]
    fn test_unresolved_placeholder_is_error() {
        let mut engine = DefaultTemplateEngine::new().unwrap();
        engine.register_template(ContentTemplate::new(
            TemplateType::Custom("broken".to_string()),
            "Broken",
            "{{subject}} {{unknown}}",
        ));

        let result = engine.render(
            &TemplateType::Custom("broken".to_string()),
            &data(&[("subject", "x")]),
        );
        assert!(matches!(result, Err(Error::Template(_))));
    }

    #[test]
    fn test_description_template_defaults_article() {
        let engine = DefaultTemplateEngine::new().unwrap();
        let rendered = engine
            .render(
                &TemplateType::ProductDescription,
                &data(&[
                    ("subject", "Face Cream"),
                    ("premium", "premium"),
                    ("category_paragraph", "Paragraph."),
                    ("benefit_bullets", "• One"),
                    ("cta", "Shop now"),
                ]),
            )
            .unwrap();

        assert!(rendered.starts_with("Discover the exceptional quality of our Face Cream, a premium creation"));
        assert!(!rendered.contains("Proudly presented"));
        assert!(rendered.ends_with("Shop now and experience the difference that premium quality makes."));
    }

    #[test]
    fn test_list_templates() {
        let engine = DefaultTemplateEngine::new().unwrap();
        assert_eq!(engine.list_templates().len(), 3);
        assert!(engine.template(&TemplateType::Custom("x".to_string())).is_err());
    }
}
