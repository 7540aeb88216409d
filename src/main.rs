//! FMP MCP Server - Rust Implementation
//!
//! A Model Context Protocol (MCP) server for Financial Modeling Prep data.
//! Provides tools, resources, and prompts for fetching company profiles,
//! quotes, financial statements, and market data.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use fmp_mcp_server::config::Config;
use fmp_mcp_server::error::Result;
use fmp_mcp_server::fmp::client::FmpClient;
use fmp_mcp_server::mcp::server::McpServer;

/// FMP MCP Server
#[derive(Parser)]
#[command(name = "fmp-mcp-server")]
#[command(author, version, about = "FMP MCP Server - A Model Context Protocol server for Financial Modeling Prep")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check configuration and connectivity to the FMP API
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging on stderr; stdout carries the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Pick up FMP_API_KEY and friends from a local .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::new()?;

    if !config.has_api_key() {
        tracing::warn!(
            "No FMP API key configured (set FMP_API_KEY); requests will be rejected by the API"
        );
    }

    match cli.command {
        Some(Commands::Check) => {
            check_connectivity(&config).await?;
        }
        None => {
            run_server(config).await?;
        }
    }

    Ok(())
}

/// Issue one profile request and report the outcome
async fn check_connectivity(config: &Config) -> Result<()> {
    eprintln!(
        "API key configured: {}",
        if config.has_api_key() { "Yes" } else { "No" }
    );
    eprintln!("Base URL: {}", config.base_url);

    let client = FmpClient::new(config)?;
    match client.get("profile", &[("symbol", "AAPL".into())]).await {
        Ok(_) => {
            eprintln!("Connectivity check passed.");
            Ok(())
        }
        Err(e) => {
            eprintln!("Connectivity check failed: {}: {}", e, e.message());
            std::process::exit(1);
        }
    }
}

async fn run_server(config: Config) -> Result<()> {
    let fmp_client = Arc::new(FmpClient::new(&config)?);

    let mut server = McpServer::new(fmp_client);
    server.run_stdio().await?;

    Ok(())
}
