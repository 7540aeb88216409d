//! FMP MCP Server Library
//!
//! A Model Context Protocol (MCP) server for Financial Modeling Prep data.
//! Provides tools, resources, and prompts for fetching company profiles,
//! quotes, financial statements, and market data.

pub mod config;
pub mod error;
pub mod fmp;
pub mod mcp;

pub use config::Config;
pub use error::{ApiError, FmpMcpError, Result};
