//! MCP Prompt definitions and handlers
//!
//! Parameterized analysis prompts rendered on request.

use serde_json::{Map, Value};

use crate::error::McpError;
use crate::mcp::types::{GetPromptResult, Prompt, PromptArgument, PromptMessage};

/// Prompt handler
pub struct PromptHandler;

impl PromptHandler {
    /// Create a new prompt handler
    pub fn new() -> Self {
        Self
    }

    /// List all available prompts
    pub fn list_prompts(&self) -> Vec<Prompt> {
        vec![
            prompt_def(
                "company_analysis",
                "Analyze a company as a potential investment",
                vec![required_arg("symbol", "Stock ticker symbol to analyze")],
            ),
            prompt_def(
                "financial_statement_analysis",
                "Walk through a company's financial statements",
                vec![
                    required_arg("symbol", "Stock ticker symbol to analyze"),
                    optional_arg("statement_type", "income, balance, or cash-flow (default: income)"),
                    optional_arg("period", "annual or quarter (default: annual)"),
                ],
            ),
            prompt_def(
                "stock_comparison",
                "Compare several stocks against each other",
                vec![required_arg("symbols", "Comma-separated ticker symbols to compare")],
            ),
            prompt_def(
                "market_outlook",
                "Assess the current state of the markets",
                vec![],
            ),
            prompt_def(
                "investment_idea_generation",
                "Generate investment ideas matching given criteria",
                vec![optional_arg("criteria", "Constraints such as sector, size, or risk tolerance")],
            ),
            prompt_def(
                "technical_analysis",
                "Perform technical analysis on a stock's price history",
                vec![required_arg("symbol", "Stock ticker symbol to analyze")],
            ),
            prompt_def(
                "economic_indicator_analysis",
                "Interpret recent economic indicators and their market impact",
                vec![optional_arg("indicator", "Specific indicator to focus on")],
            ),
        ]
    }

    /// Render a prompt with the supplied arguments
    pub fn get_prompt(
        &self,
        name: &str,
        args: &Map<String, Value>,
    ) -> Result<GetPromptResult, McpError> {
        let text = match name {
            "company_analysis" => {
                let symbol = required(args, "symbol")?;
                format!(
                    "Analyze {symbol} as a potential investment. Start from the company \
                     profile (get_company_profile) and current quote (get_stock_quote), then \
                     review profitability and leverage with get_financial_ratios. Summarize \
                     the business, its competitive position, key risks, and whether the \
                     current valuation looks demanding."
                )
            }
            "financial_statement_analysis" => {
                let symbol = required(args, "symbol")?;
                let statement_type = optional(args, "statement_type", "income");
                let period = optional(args, "period", "annual");
                format!(
                    "Review the {period} {statement_type} statements for {symbol} over the \
                     last few periods. Identify the main trends in revenue, margins, and \
                     cash generation, call out any one-off items, and assess whether the \
                     trajectory is improving or deteriorating."
                )
            }
            "stock_comparison" => {
                let symbols = required(args, "symbols")?;
                format!(
                    "Compare the following stocks: {symbols}. For each, pull the current \
                     quote and financial ratios, then contrast valuation, growth, and \
                     profitability. Conclude with which looks most attractive today and why."
                )
            }
            "market_outlook" => "Assess the current state of the markets. Pull the major index \
                 snapshot (get_market_indexes) and recent market-moving news, then summarize \
                 overall direction, notable sector moves, and the key risks investors are \
                 watching."
                .to_string(),
            "investment_idea_generation" => {
                let criteria = optional(args, "criteria", "no specific constraints");
                format!(
                    "Generate three investment ideas given these constraints: {criteria}. \
                     For each idea, name the company, fetch its profile and quote, and \
                     explain the thesis in two or three sentences along with the main risk."
                )
            }
            "technical_analysis" => {
                let symbol = required(args, "symbol")?;
                format!(
                    "Perform a technical analysis of {symbol}. Fetch historical prices with \
                     get_historical_price, describe the trend, notable support and \
                     resistance levels, and recent volume behavior, and state what the price \
                     action suggests in the near term."
                )
            }
            "economic_indicator_analysis" => {
                let indicator = optional(args, "indicator", "the most market-relevant recent indicators");
                format!(
                    "Analyze {indicator} and explain the likely impact on equities and \
                     rates. Relate the reading to market expectations and recent index \
                     behavior."
                )
            }
            _ => {
                return Err(McpError::UnknownPrompt {
                    name: name.to_string(),
                })
            }
        };

        let description = self
            .list_prompts()
            .into_iter()
            .find(|p| p.name == name)
            .and_then(|p| p.description);

        Ok(GetPromptResult {
            description,
            messages: vec![PromptMessage::user(text)],
        })
    }
}

impl Default for PromptHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn prompt_def(name: &str, description: &str, arguments: Vec<PromptArgument>) -> Prompt {
    Prompt {
        name: name.to_string(),
        description: Some(description.to_string()),
        arguments,
    }
}

fn required_arg(name: &str, description: &str) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        description: Some(description.to_string()),
        required: true,
    }
}

fn optional_arg(name: &str, description: &str) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        description: Some(description.to_string()),
        required: false,
    }
}

fn required<'a>(args: &'a Map<String, Value>, name: &str) -> Result<&'a str, McpError> {
    args.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| McpError::InvalidArguments {
            message: format!("Missing required prompt argument: {}", name),
        })
}

fn optional<'a>(args: &'a Map<String, Value>, name: &str, default: &'a str) -> &'a str {
    args.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
}
