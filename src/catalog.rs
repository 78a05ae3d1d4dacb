//! Product sources and update sinks.
//!
//! Sources hand the coordinator a list of products; sinks receive the
//! update payloads it exports. Nothing here talks to a live storefront.

use crate::error::{Error, Result};
use crate::types::{BatchStatistics, ProcessingResult, Product, UpdatePayload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

pub trait ProductSource: Send + Sync {
    fn name(&self) -> &str;

    fn load(&self) -> Result<Vec<Product>>;

    /// Look up a single product by identifier
    fn find(&self, product_id: &str) -> Result<Option<Product>> {
        Ok(self.load()?.into_iter().find(|p| p.id == product_id))
    }
}

pub trait UpdateSink: Send + Sync {
    fn publish(&self, updates: &[UpdatePayload]) -> Result<()>;
}

/// Fixed demo catalog: two flawed listings and one clean reference listing.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog;

impl MockCatalog {
    pub fn new() -> Self {
        Self
    }

    pub fn products() -> Vec<Product> {
        vec![
            Product::new(
                "prod_001",
                "Organic Face Cream",
                "Good cream for your face. Made with natural stuff.",
            )
            .with_vendor("LuxeBeauty")
            .with_product_type("Skincare")
            .with_tags(vec!["organic".to_string(), "skincare".to_string()])
            .with_seo_title("")
            .with_seo_description("")
            .with_price(49.99),
            Product::new(
                "prod_002",
                "Anti-Aging Serum Premium Formula",
                "Our serum is really good and will make you look younger. \
                 It has vitamins and other ingredients that are beneficial. \
                 Many customers like it. Buy now.",
            )
            .with_vendor("LuxeBeauty")
            .with_product_type("Skincare")
            .with_tags(vec![
                "anti-aging".to_string(),
                "serum".to_string(),
                "premium".to_string(),
            ])
            .with_seo_title("Anti-Aging Serum")
            .with_seo_description("Good serum")
            .with_price(89.99),
            Product::new(
                "prod_003",
                "Botanical Balm",
                "Crafted from organic botanicals, this luxury balm restores radiance — \
                 shop now and discover visibly softer skin.",
            )
            .with_vendor("LuxeBeauty")
            .with_product_type("Skincare")
            .with_tags(vec!["organic".to_string(), "balm".to_string()])
            .with_seo_title("Botanical Balm | Luxury Organic Skincare for Radiant Skin")
            .with_seo_description(
                "Restore radiance with our luxury botanical balm, crafted from organic \
                 ingredients for visibly softer skin. Shop now for exclusive offers.",
            )
            .with_price(39.99),
        ]
    }
}

impl ProductSource for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    fn load(&self) -> Result<Vec<Product>> {
        Ok(Self::products())
    }
}

/// Products read from a JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProductSource for JsonFileSource {
    fn name(&self) -> &str {
        "json-file"
    }

    fn load(&self) -> Result<Vec<Product>> {
        if !self.path.exists() {
            return Err(Error::NotFound(format!(
                "product file {}",
                self.path.display()
            )));
        }

        let content = fs::read_to_string(&self.path)?;
        let products: Vec<Product> = serde_json::from_str(&content)?;
        debug!(
            path = %self.path.display(),
            count = products.len(),
            "Loaded products"
        );
        Ok(products)
    }
}

/// Document written by [`JsonFileSink`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateExport {
    pub exported_at: DateTime<Utc>,
    pub count: usize,
    pub updates: Vec<UpdatePayload>,
}

/// Full run report: every result plus the batch summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsExport {
    pub exported_at: DateTime<Utc>,
    pub results: Vec<ProcessingResult>,
    pub summary: BatchStatistics,
}

#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full results report instead of the update payloads.
    pub fn write_results(
        &self,
        results: &[ProcessingResult],
        summary: &BatchStatistics,
    ) -> Result<()> {
        let document = ResultsExport {
            exported_at: Utc::now(),
            results: results.to_vec(),
            summary: summary.clone(),
        };
        self.write_json(&serde_json::to_string_pretty(&document)?)?;
        info!(path = %self.path.display(), results = results.len(), "Results written");
        Ok(())
    }

    fn write_json(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl UpdateSink for JsonFileSink {
    fn publish(&self, updates: &[UpdatePayload]) -> Result<()> {
        let document = UpdateExport {
            exported_at: Utc::now(),
            count: updates.len(),
            updates: updates.to_vec(),
        };
        self.write_json(&serde_json::to_string_pretty(&document)?)?;
        info!(path = %self.path.display(), count = updates.len(), "Updates exported");
        Ok(())
    }
}

/// Collects published payloads in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    published: Mutex<Vec<UpdatePayload>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<UpdatePayload> {
        self.published
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl UpdateSink for MemorySink {
    fn publish(&self, updates: &[UpdatePayload]) -> Result<()> {
        let mut published = self
            .published
            .lock()
            .map_err(|e| Error::Internal(format!("update sink poisoned: {}", e)))?;
        published.extend_from_slice(updates);
        Ok(())
    }
}
