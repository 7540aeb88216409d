//! MCP Tool definitions and handlers
//!
//! Defines all available tools and their implementations.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::fmp;
use crate::fmp::client::FmpClient;
use crate::mcp::types::{CallToolResult, Tool};

/// Default statement period
const DEFAULT_PERIOD: &str = "annual";

/// Default number of statement periods returned
const DEFAULT_LIMIT: u32 = 5;

/// Tool handler
pub struct ToolHandler {
    fmp_client: Arc<FmpClient>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(fmp_client: Arc<FmpClient>) -> Self {
        Self { fmp_client }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        vec![
            tool_def("get_company_profile", "Get a company's profile, sector, and description", symbol_schema()),
            tool_def("get_company_notes", "Get exchange-listed notes issued by a company", symbol_schema()),
            tool_def("get_income_statement", "Get a company's income statements", statement_schema()),
            tool_def("get_balance_sheet", "Get a company's balance sheet statements", statement_schema()),
            tool_def("get_cash_flow", "Get a company's cash flow statements", statement_schema()),
            tool_def("get_stock_quote", "Get the current stock quote for a company", symbol_schema()),
            tool_def("get_quote_short", "Get a simplified stock quote with just the essentials", symbol_schema()),
            tool_def("get_price_change", "Get price changes for a stock over standard timeframes", symbol_schema()),
            tool_def("get_financial_ratios", "Get financial ratios for a company", symbol_schema()),
            tool_def("get_key_metrics", "Get key financial metrics for a company", statement_schema()),
            tool_def("get_stock_news", "Get the latest news articles for one or more stocks", news_schema()),
            tool_def("get_market_indexes", "Get a snapshot of the major market indexes", json!({"type": "object", "properties": {}})),
            tool_def("search_stocks", "Search for stocks by ticker symbol or company name", search_schema()),
            tool_def("get_historical_price", "Get historical end-of-day prices for a symbol", historical_price_schema()),
            tool_def("get_market_hours", "Get the current trading hours status for a stock exchange", market_hours_schema()),
            tool_def("get_market_holidays", "Get the holiday calendar for a stock exchange", market_holidays_schema()),
        ]
    }

    /// Call a tool by name
    pub async fn call_tool(&self, name: &str, args: Value) -> CallToolResult {
        match name {
            "get_company_profile" => self.handle_symbol_tool(args, name).await,
            "get_company_notes" => self.handle_symbol_tool(args, name).await,
            "get_income_statement" => self.handle_statement_tool(args, name).await,
            "get_balance_sheet" => self.handle_statement_tool(args, name).await,
            "get_cash_flow" => self.handle_statement_tool(args, name).await,
            "get_stock_quote" => self.handle_symbol_tool(args, name).await,
            "get_quote_short" => self.handle_symbol_tool(args, name).await,
            "get_price_change" => self.handle_symbol_tool(args, name).await,
            "get_financial_ratios" => self.handle_symbol_tool(args, name).await,
            "get_key_metrics" => self.handle_statement_tool(args, name).await,
            "get_stock_news" => self.handle_stock_news(args).await,
            "get_market_indexes" => {
                CallToolResult::text(fmp::market::get_market_indexes(&self.fmp_client).await)
            }
            "search_stocks" => self.handle_search_stocks(args).await,
            "get_historical_price" => self.handle_historical_price(args).await,
            "get_market_hours" => self.handle_market_hours(args).await,
            "get_market_holidays" => self.handle_market_holidays(args).await,
            _ => CallToolResult::error(format!("Unknown tool: {}", name)),
        }
    }

    // ==================== Tool Handlers ====================

    /// Tools whose only argument is a symbol
    async fn handle_symbol_tool(&self, args: Value, name: &str) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            symbol: String,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        let client = &self.fmp_client;
        let text = match name {
            "get_company_profile" => fmp::company::get_company_profile(client, &args.symbol).await,
            "get_company_notes" => fmp::company::get_company_notes(client, &args.symbol).await,
            "get_stock_quote" => fmp::quote::get_stock_quote(client, &args.symbol).await,
            "get_quote_short" => fmp::quote::get_quote_short(client, &args.symbol).await,
            "get_price_change" => fmp::quote::get_price_change(client, &args.symbol).await,
            "get_financial_ratios" => {
                fmp::analysis::get_financial_ratios(client, &args.symbol).await
            }
            _ => return CallToolResult::error(format!("Unknown tool: {}", name)),
        };

        CallToolResult::text(text)
    }

    /// Tools taking a symbol plus statement period and limit
    async fn handle_statement_tool(&self, args: Value, name: &str) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            symbol: String,
            period: Option<String>,
            limit: Option<u32>,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        let period = args.period.as_deref().unwrap_or(DEFAULT_PERIOD);
        let limit = args.limit.unwrap_or(DEFAULT_LIMIT);

        let client = &self.fmp_client;
        let text = match name {
            "get_income_statement" => {
                fmp::company::get_income_statement(client, &args.symbol, period, limit).await
            }
            "get_balance_sheet" => {
                fmp::company::get_balance_sheet(client, &args.symbol, period, limit).await
            }
            "get_cash_flow" => fmp::company::get_cash_flow(client, &args.symbol, period, limit).await,
            "get_key_metrics" => {
                fmp::analysis::get_key_metrics(client, &args.symbol, period, limit).await
            }
            _ => return CallToolResult::error(format!("Unknown tool: {}", name)),
        };

        CallToolResult::text(text)
    }

    async fn handle_stock_news(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            symbols: String,
            limit: Option<u32>,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        let limit = args.limit.unwrap_or(DEFAULT_LIMIT);
        CallToolResult::text(
            fmp::market::get_stock_news(&self.fmp_client, &args.symbols, limit).await,
        )
    }

    async fn handle_search_stocks(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            query: String,
            limit: Option<u32>,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        let limit = args.limit.unwrap_or(10);
        CallToolResult::text(fmp::market::search_stocks(&self.fmp_client, &args.query, limit).await)
    }

    async fn handle_historical_price(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            symbol: String,
            from: Option<String>,
            to: Option<String>,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        CallToolResult::text(
            fmp::market::get_historical_price(
                &self.fmp_client,
                &args.symbol,
                args.from.as_deref(),
                args.to.as_deref(),
            )
            .await,
        )
    }

    async fn handle_market_hours(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            exchange: Option<String>,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        let exchange = args.exchange.as_deref().unwrap_or("NASDAQ");
        CallToolResult::text(fmp::market_hours::get_market_hours(&self.fmp_client, exchange).await)
    }

    async fn handle_market_holidays(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        struct Args {
            exchange: Option<String>,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        let exchange = args.exchange.as_deref().unwrap_or("US");
        CallToolResult::text(
            fmp::market_hours::get_market_holidays(&self.fmp_client, exchange).await,
        )
    }
}

// ==================== Tool Definitions ====================

fn tool_def(name: &str, description: &str, schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema: schema,
    }
}

fn symbol_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "symbol": {
                "type": "string",
                "description": "Stock ticker symbol (e.g., AAPL, MSFT, TSLA)"
            }
        },
        "required": ["symbol"]
    })
}

fn statement_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "symbol": {
                "type": "string",
                "description": "Stock ticker symbol (e.g., AAPL, MSFT, TSLA)"
            },
            "period": {
                "type": "string",
                "enum": ["annual", "quarter"],
                "description": "Reporting period (default: annual)"
            },
            "limit": {
                "type": "number",
                "description": "Number of periods to return (default: 5)"
            }
        },
        "required": ["symbol"]
    })
}

fn news_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "symbols": {
                "type": "string",
                "description": "Comma-separated ticker symbols (e.g., AAPL or AAPL,MSFT)"
            },
            "limit": {
                "type": "number",
                "description": "Maximum number of articles to return (default: 5)"
            }
        },
        "required": ["symbols"]
    })
}

fn search_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Ticker symbol or company name to search for"
            },
            "limit": {
                "type": "number",
                "description": "Maximum number of matches to return (default: 10)"
            }
        },
        "required": ["query"]
    })
}

fn historical_price_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "symbol": {
                "type": "string",
                "description": "Stock ticker symbol (e.g., AAPL, MSFT, TSLA)"
            },
            "from": {
                "type": "string",
                "description": "Start date (YYYY-MM-DD)"
            },
            "to": {
                "type": "string",
                "description": "End date (YYYY-MM-DD)"
            }
        },
        "required": ["symbol"]
    })
}

fn market_hours_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "exchange": {
                "type": "string",
                "description": "Exchange code (e.g., NASDAQ, NYSE, LSE; default: NASDAQ)"
            }
        }
    })
}

fn market_holidays_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "exchange": {
                "type": "string",
                "description": "Exchange code (default: US)"
            }
        }
    })
}
