//! MCP Resource definitions and handlers
//!
//! Maps URI-addressable resources onto the same fetch/format pipeline the
//! tools use.

use std::sync::Arc;

use crate::error::McpError;
use crate::fmp;
use crate::fmp::client::FmpClient;
use crate::mcp::types::{Resource, ResourceTemplate};

/// MIME type for all rendered resources
const MARKDOWN: &str = "text/markdown";

/// Resource handler
pub struct ResourceHandler {
    fmp_client: Arc<FmpClient>,
}

impl ResourceHandler {
    /// Create a new resource handler
    pub fn new(fmp_client: Arc<FmpClient>) -> Self {
        Self { fmp_client }
    }

    /// List concrete resources
    pub fn list_resources(&self) -> Vec<Resource> {
        vec![Resource {
            uri: "market-snapshot://current".to_string(),
            name: "Market Snapshot".to_string(),
            description: Some("Current snapshot of the major market indexes".to_string()),
            mime_type: Some(MARKDOWN.to_string()),
        }]
    }

    /// List parameterized resource templates
    pub fn list_templates(&self) -> Vec<ResourceTemplate> {
        vec![
            template(
                "stock-info://{symbol}",
                "Stock Information",
                "Company profile for a ticker symbol",
            ),
            template(
                "financial-statement://{symbol}/{statement_type}/{period}",
                "Financial Statement",
                "Income, balance, or cash-flow statement for a ticker symbol",
            ),
            template(
                "ratios://{symbol}",
                "Financial Ratios",
                "Financial ratios for a ticker symbol",
            ),
            template(
                "stock-peers://{symbol}",
                "Stock Peers",
                "Peer companies for a ticker symbol",
            ),
            template(
                "price-targets://{symbol}",
                "Price Targets",
                "Analyst price target consensus for a ticker symbol",
            ),
        ]
    }

    /// Read a resource by URI, rendering it as Markdown text
    pub async fn read(&self, uri: &str) -> Result<String, McpError> {
        let (scheme, rest) = split_uri(uri).ok_or_else(|| McpError::UnknownResource {
            uri: uri.to_string(),
        })?;

        let client = &self.fmp_client;
        match scheme {
            "stock-info" => Ok(fmp::company::get_company_profile(client, rest).await),
            "market-snapshot" => Ok(fmp::market::get_market_indexes(client).await),
            "ratios" => Ok(fmp::analysis::get_financial_ratios(client, rest).await),
            "stock-peers" => Ok(fmp::company::get_stock_peers(client, rest).await),
            "price-targets" => Ok(fmp::analysis::get_price_targets(client, rest).await),
            "financial-statement" => {
                let (symbol, statement_type, period) = parse_statement_path(rest)?;
                let text = match statement_type {
                    "income" => {
                        fmp::company::get_income_statement(client, symbol, period, 4).await
                    }
                    "balance" => fmp::company::get_balance_sheet(client, symbol, period, 4).await,
                    "cash-flow" => fmp::company::get_cash_flow(client, symbol, period, 4).await,
                    other => {
                        return Err(McpError::InvalidArguments {
                            message: format!(
                                "Unknown statement type '{}': expected income, balance, or cash-flow",
                                other
                            ),
                        })
                    }
                };
                Ok(text)
            }
            _ => Err(McpError::UnknownResource {
                uri: uri.to_string(),
            }),
        }
    }
}

fn template(uri_template: &str, name: &str, description: &str) -> ResourceTemplate {
    ResourceTemplate {
        uri_template: uri_template.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        mime_type: Some(MARKDOWN.to_string()),
    }
}

/// Split a URI into scheme and remainder
fn split_uri(uri: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = uri.split_once("://")?;
    if scheme.is_empty() || rest.is_empty() {
        return None;
    }
    Some((scheme, rest))
}

/// Parse `{symbol}/{statement_type}/{period}` from a financial-statement URI
fn parse_statement_path(path: &str) -> Result<(&str, &str, &str), McpError> {
    let mut parts = path.split('/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(symbol), Some(statement_type), Some(period), None)
            if !symbol.is_empty() && !statement_type.is_empty() && !period.is_empty() =>
        {
            Ok((symbol, statement_type, period))
        }
        _ => Err(McpError::InvalidArguments {
            message: format!(
                "Invalid financial-statement path '{}': expected symbol/statement_type/period",
                path
            ),
        }),
    }
}
