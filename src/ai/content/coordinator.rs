//! Content Coordinator
//!
//! Routes each product through audit, conditional generation and
//! priority classification, then aggregates and exports the results.

use super::checker::ContentChecker;
use super::generator::ContentGenerator;
use crate::ai::llm::{PlaceholderLlmClient, TextGenerator};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::types::{
    BatchStatistics, Priority, ProcessingResult, Product, UpdatePayload,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ContentCoordinator {
    checker: ContentChecker,
    generator: ContentGenerator,
}

impl ContentCoordinator {
    /// Build from configuration. The placeholder text service is attached
    /// only when `generator.llm.enabled` is set.
    pub fn new(config: &AppConfig) -> Result<Self> {
        if config.generator.llm.enabled {
            let client = PlaceholderLlmClient::from_config(&config.generator.llm);
            return Self::with_text_service(config, Arc::new(client));
        }

        config.validate()?;
        Ok(Self {
            checker: ContentChecker::new(config.rules.clone())?,
            generator: ContentGenerator::new(config.rules.clone())?,
        })
    }

    /// Build with an explicit remote text service
    pub fn with_text_service(config: &AppConfig, service: Arc<dyn TextGenerator>) -> Result<Self> {
        config.validate()?;
        info!(
            model = %service.model_info().name,
            "Remote text generation enabled"
        );

        Ok(Self {
            checker: ContentChecker::new(config.rules.clone())?,
            generator: ContentGenerator::new(config.rules.clone())?
                .with_text_service(service, config.generator.llm.clone()),
        })
    }

    pub fn checker(&self) -> &ContentChecker {
        &self.checker
    }

    pub fn generator(&self) -> &ContentGenerator {
        &self.generator
    }

    /// Audit one product and generate replacement content when it has issues.
    pub fn process(&self, product: &Product) -> Result<ProcessingResult> {
        if product.id.trim().is_empty() {
            return Err(Error::InvalidInput(
                "product identifier is missing".to_string(),
            ));
        }

        let audit = self.checker.audit(product);
        let optimization = if audit.has_issues() {
            Some(self.generator.generate(product, &audit)?)
        } else {
            None
        };
        let result = ProcessingResult::new(product, audit, optimization);

        debug!(
            product_id = %product.id,
            issues = result.audit.issues_found,
            severity = %result.audit.severity,
            priority = %result.priority,
            "Product processed"
        );

        Ok(result)
    }

    /// Process every product in order. Failures become failed results.
    pub fn process_batch(&self, products: &[Product]) -> Vec<ProcessingResult> {
        let results: Vec<ProcessingResult> = products
            .iter()
            .map(|product| {
                self.process(product).unwrap_or_else(|e| {
                    warn!(product_id = %product.id, error = %e, "Product processing failed");
                    ProcessingResult::failed(product, &e)
                })
            })
            .collect();

        info!(
            total = results.len(),
            action_required = results.iter().filter(|r| r.action_required).count(),
            "Batch processed"
        );
        results
    }

    /// Like [`Self::process_batch`], keeping only results at or above `min_priority`.
    pub fn process_batch_with_filter(
        &self,
        products: &[Product],
        min_priority: Priority,
    ) -> Vec<ProcessingResult> {
        self.process_batch(products)
            .into_iter()
            .filter(|result| result.priority >= min_priority)
            .collect()
    }

    pub fn statistics(&self, results: &[ProcessingResult]) -> BatchStatistics {
        let mut priority_breakdown: BTreeMap<Priority, usize> =
            Priority::ALL.iter().map(|p| (*p, 0)).collect();
        for result in results {
            *priority_breakdown.entry(result.priority).or_insert(0) += 1;
        }

        let total_products = results.len();
        let products_optimized = results.iter().filter(|r| r.optimization.is_some()).count();
        let completion_rate = if total_products == 0 {
            0.0
        } else {
            products_optimized as f64 / total_products as f64
        };

        BatchStatistics {
            total_products,
            products_with_issues: results.iter().filter(|r| r.audit.has_issues()).count(),
            products_optimized,
            total_issues: results.iter().map(|r| r.audit.issues_found).sum(),
            failed_products: results.iter().filter(|r| r.is_failed()).count(),
            completion_rate,
            priority_breakdown,
        }
    }

    /// Update payloads for every optimized result, in input order.
    pub fn export(&self, results: &[ProcessingResult]) -> Vec<UpdatePayload> {
        results.iter().filter_map(UpdatePayload::from_result).collect()
    }
}
