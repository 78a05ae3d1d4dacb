use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::ai::content::ContentCoordinator;
use crate::catalog::{JsonFileSink, ProductSource, UpdateSink};
use crate::mcp::{
    InitializeParams, McpError, McpHandler, Resource, ResourceReadParams, Tool, ToolCallParams,
    PROTOCOL_VERSION,
};
use crate::types::{Priority, Product};

pub const CATALOG_URI: &str = "catalog://mock-products";
pub const RULES_URI: &str = "config://rules";

/// Exposes the audit/optimize pipeline as MCP tools.
pub struct ContentHandler {
    coordinator: Arc<ContentCoordinator>,
    source: Arc<dyn ProductSource>,
}

impl ContentHandler {
    pub fn new(coordinator: Arc<ContentCoordinator>, source: Arc<dyn ProductSource>) -> Self {
        Self {
            coordinator,
            source,
        }
    }

    /// Products from the `products` argument, else the configured source
    fn resolve_products(&self, params: &ToolCallParams) -> Result<Vec<Product>, McpError> {
        match params.argument("products") {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| McpError::InvalidParams(format!("products: {}", e))),
            None => Ok(self.source.load()?),
        }
    }

    fn resolve_product(&self, params: &ToolCallParams) -> Result<Product, McpError> {
        if let Some(value) = params.argument("product") {
            return serde_json::from_value(value.clone())
                .map_err(|e| McpError::InvalidParams(format!("product: {}", e)));
        }

        let product_id = params
            .argument("product_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                McpError::InvalidParams("product_id or product is required".to_string())
            })?;

        self.source
            .find(product_id)?
            .ok_or_else(|| McpError::InvalidParams(format!("unknown product '{}'", product_id)))
    }

    fn min_priority(params: &ToolCallParams) -> Result<Priority, McpError> {
        match params.argument("min_priority") {
            None => Ok(Priority::None),
            Some(value) => value
                .as_str()
                .ok_or_else(|| McpError::InvalidParams("min_priority must be a string".to_string()))?
                .parse::<Priority>()
                .map_err(|e| McpError::InvalidParams(e.to_string())),
        }
    }
}

fn text_content<T: Serialize>(value: &T) -> Result<serde_json::Value, McpError> {
    Ok(serde_json::json!({
        "content": [{
            "type": "text",
            "text": serde_json::to_string_pretty(value)?
        }],
        "isError": false
    }))
}

fn products_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "description": "Products to process. Defaults to the configured catalog.",
        "items": { "type": "object" }
    })
}

#[async_trait]
impl McpHandler for ContentHandler {
    async fn initialize(&self, params: InitializeParams) -> Result<serde_json::Value, McpError> {
        info!(
            client = params
                .client_info
                .as_ref()
                .map(|c| c.name.as_str())
                .unwrap_or("unknown"),
            "Content handler initialized"
        );
        Ok(serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {
                    "listChanged": false
                },
                "resources": {
                    "subscribe": false,
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION")
            }
        }))
    }

    async fn list_tools(&self) -> Result<Vec<Tool>, McpError> {
        let product_schema = serde_json::json!({
            "type": "object",
            "properties": {
                "product_id": {
                    "type": "string",
                    "description": "Identifier of a catalog product"
                },
                "product": {
                    "type": "object",
                    "description": "Inline product instead of a catalog lookup"
                }
            },
            "required": []
        });

        Ok(vec![
            Tool {
                name: "audit_product".to_string(),
                description: "Audit a product's content and report issues".to_string(),
                input_schema: product_schema.clone(),
            },
            Tool {
                name: "optimize_product".to_string(),
                description: "Audit a product and generate optimized content".to_string(),
                input_schema: product_schema,
            },
            Tool {
                name: "process_products".to_string(),
                description: "Process products and return results at or above a priority"
                    .to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "products": products_schema(),
                        "min_priority": {
                            "type": "string",
                            "enum": ["none", "low", "medium", "high", "critical"],
                            "description": "Lowest priority to include"
                        }
                    },
                    "required": []
                }),
            },
            Tool {
                name: "get_statistics".to_string(),
                description: "Summary statistics for a processed batch".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "products": products_schema()
                    },
                    "required": []
                }),
            },
            Tool {
                name: "export_updates".to_string(),
                description: "Platform update payloads for optimized products".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "products": products_schema(),
                        "output": {
                            "type": "string",
                            "description": "Optional file path to write the export to"
                        }
                    },
                    "required": []
                }),
            },
        ])
    }

    async fn call_tool(&self, params: ToolCallParams) -> Result<serde_json::Value, McpError> {
        match params.name.as_str() {
            "audit_product" => {
                let product = self.resolve_product(&params)?;
                let audit = self.coordinator.checker().audit(&product);
                text_content(&audit)
            }
            "optimize_product" => {
                let product = self.resolve_product(&params)?;
                let result = self.coordinator.process(&product)?;
                text_content(&result)
            }
            "process_products" => {
                let products = self.resolve_products(&params)?;
                let min_priority = Self::min_priority(&params)?;
                let results = self
                    .coordinator
                    .process_batch_with_filter(&products, min_priority);
                text_content(&results)
            }
            "get_statistics" => {
                let products = self.resolve_products(&params)?;
                let results = self.coordinator.process_batch(&products);
                text_content(&self.coordinator.statistics(&results))
            }
            "export_updates" => {
                let products = self.resolve_products(&params)?;
                let results = self.coordinator.process_batch(&products);
                let payloads = self.coordinator.export(&results);

                if let Some(output) = params.argument("output").and_then(|v| v.as_str()) {
                    JsonFileSink::new(output).publish(&payloads)?;
                }
                text_content(&payloads)
            }
            _ => Err(McpError::ToolNotFound(params.name)),
        }
    }

    async fn list_resources(&self) -> Result<Vec<Resource>, McpError> {
        Ok(vec![
            Resource {
                uri: CATALOG_URI.to_string(),
                name: "Product Catalog".to_string(),
                description: Some(format!("Products from the {} source", self.source.name())),
                mime_type: Some("application/json".to_string()),
            },
            Resource {
                uri: RULES_URI.to_string(),
                name: "Audit Rules".to_string(),
                description: Some("Active thresholds and word lists".to_string()),
                mime_type: Some("application/json".to_string()),
            },
        ])
    }

    async fn read_resource(
        &self,
        params: ResourceReadParams,
    ) -> Result<serde_json::Value, McpError> {
        let text = match params.uri.as_str() {
            CATALOG_URI => serde_json::to_string_pretty(&self.source.load()?)?,
            RULES_URI => serde_json::to_string_pretty(self.coordinator.checker().rules())?,
            _ => return Err(McpError::ResourceNotFound(params.uri)),
        };

        Ok(serde_json::json!({
            "contents": [{
                "uri": params.uri,
                "mimeType": "application/json",
                "text": text
            }]
        }))
    }
}
