use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use shop_content_mcp::catalog::{
    JsonFileSink, JsonFileSource, MockCatalog, ProductSource, UpdateSink,
};
use shop_content_mcp::handlers::ContentHandler;
use shop_content_mcp::logging::{init_logging, LogConfig};
use shop_content_mcp::types::{Priority, ProcessingResult};
use shop_content_mcp::{report, AppConfig, ContentCoordinator, McpServer};

#[derive(Parser)]
#[command(name = "shop-content-mcp", version, about = "Product content auditor and optimizer")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, short, global = true, env = "SHOP_CONTENT_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides server.log_level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Audit, optimize and report on a catalog
    Run {
        /// Products JSON file; the built-in demo catalog when omitted
        #[arg(long, short)]
        input: Option<PathBuf>,
        /// Lowest priority to include in the report
        #[arg(long, default_value = "none")]
        min_priority: Priority,
        /// Write every result and the summary as JSON
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Audit only, no content is generated
    Audit {
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
    /// Write update payloads for every optimized product
    Export {
        #[arg(long, short)]
        input: Option<PathBuf>,
        #[arg(long, short, default_value = "updates.json")]
        output: PathBuf,
    },
    /// Serve the pipeline as MCP tools over stdio
    Serve {
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
    /// Write a sample configuration file
    InitConfig {
        #[arg(long, short, default_value = "shop-content.toml")]
        output: PathBuf,
    },
}

fn product_source(input: Option<PathBuf>) -> Arc<dyn ProductSource> {
    match input {
        Some(path) => Arc::new(JsonFileSource::new(path)),
        None => Arc::new(MockCatalog::new()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::InitConfig { output } = &cli.command {
        AppConfig::generate_sample_config(output)
            .with_context(|| format!("writing {}", output.display()))?;
        println!("Sample configuration written to {}", output.display());
        return Ok(());
    }

    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;

    let mut log_config = LogConfig::from_server_config(&config.server);
    if let Some(level) = &cli.log_level {
        log_config = log_config.with_level(level.clone());
    }
    // Held until exit so the file writer flushes
    let _guard = init_logging(&log_config)?;

    info!(
        name = %config.server.name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting"
    );

    let coordinator = Arc::new(ContentCoordinator::new(&config)?);

    match cli.command {
        Command::Run {
            input,
            min_priority,
            output,
        } => {
            let products = product_source(input).load()?;
            let results = coordinator.process_batch(&products);
            let stats = coordinator.statistics(&results);

            print!("{}", report::section_header("PRODUCT CONTENT AUDIT"));
            for result in results.iter().filter(|r| r.priority >= min_priority) {
                println!();
                print!("{}", report::render_audit(result));
                println!();
                print!("{}", report::render_optimization(result));
                print!("{}", report::render_before_after(result));
                println!("{}", report::separator('='));
            }
            println!();
            print!("{}", report::render_statistics(&stats));
            println!();
            print!("{}", report::render_payloads(&coordinator.export(&results)));

            if let Some(path) = output {
                JsonFileSink::new(&path).write_results(&results, &stats)?;
                println!("Results written to {}", path.display());
            }
        }
        Command::Audit { input } => {
            let products = product_source(input).load()?;
            print!("{}", report::section_header("PRODUCT CONTENT AUDIT"));
            for product in &products {
                let audit = coordinator.checker().audit(product);
                let result = ProcessingResult::new(product, audit, None);
                println!();
                print!("{}", report::render_audit(&result));
            }
        }
        Command::Export { input, output } => {
            let products = product_source(input).load()?;
            let results = coordinator.process_batch(&products);
            let payloads = coordinator.export(&results);
            JsonFileSink::new(&output).publish(&payloads)?;
            println!(
                "{} update payload(s) written to {}",
                payloads.len(),
                output.display()
            );
        }
        Command::Serve { input } => {
            let mut server = McpServer::new();
            server.add_handler(
                "content",
                Arc::new(ContentHandler::new(coordinator, product_source(input))),
            );
            server.run_stdio().await?;
        }
        Command::InitConfig { .. } => {}
    }

    Ok(())
}
