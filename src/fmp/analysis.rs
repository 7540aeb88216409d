//! Analysis tools
//!
//! Financial ratios and key metrics.

use serde_json::Value;

use crate::fmp::client::FmpClient;
use crate::fmp::format::{now_stamp, num_or_na, str_or};
use crate::fmp::quote::first_item;

/// Get financial ratios for a company
pub async fn get_financial_ratios(client: &FmpClient, symbol: &str) -> String {
    let data = match client.get("ratios", &[("symbol", symbol.into())]).await {
        Ok(data) => data,
        Err(e) => return format!("Error fetching ratios for {}: {}", symbol, e.message()),
    };

    match first_item(&data) {
        Some(ratios) => format_ratios(ratios, symbol, &now_stamp()),
        None => format!("No ratio data found for symbol {}", symbol),
    }
}

/// Get key financial metrics for a company
pub async fn get_key_metrics(client: &FmpClient, symbol: &str, period: &str, limit: u32) -> String {
    let data = match client
        .get(
            "key-metrics",
            &[
                ("symbol", symbol.into()),
                ("period", period.into()),
                ("limit", limit.into()),
            ],
        )
        .await
    {
        Ok(data) => data,
        Err(e) => return format!("Error fetching key metrics for {}: {}", symbol, e.message()),
    };

    match data.as_array() {
        Some(metrics) if !metrics.is_empty() => format_key_metrics(metrics, symbol, period),
        _ => format!("No key metrics data found for symbol {}", symbol),
    }
}

/// Get the analyst price target consensus for a company
pub async fn get_price_targets(client: &FmpClient, symbol: &str) -> String {
    let data = match client
        .get("price-target-consensus", &[("symbol", symbol.into())])
        .await
    {
        Ok(data) => data,
        Err(e) => return format!("Error fetching price targets for {}: {}", symbol, e.message()),
    };

    match first_item(&data) {
        Some(targets) => format_price_targets(targets, symbol, &now_stamp()),
        None => format!("No price target data found for symbol {}", symbol),
    }
}

/// Render financial ratios as Markdown, grouped by category
pub fn format_ratios(ratios: &Value, symbol: &str, as_of: &str) -> String {
    let lines = [
        format!("# Financial Ratios for {}", symbol),
        format!("*Data as of {}*", as_of),
        String::new(),
        "## Liquidity".to_string(),
        format!("**Current Ratio**: {}", num_or_na(ratios, "currentRatio")),
        format!("**Quick Ratio**: {}", num_or_na(ratios, "quickRatio")),
        format!("**Cash Ratio**: {}", num_or_na(ratios, "cashRatio")),
        String::new(),
        "## Profitability".to_string(),
        format!(
            "**Gross Profit Margin**: {}",
            num_or_na(ratios, "grossProfitMargin")
        ),
        format!(
            "**Operating Profit Margin**: {}",
            num_or_na(ratios, "operatingProfitMargin")
        ),
        format!(
            "**Net Profit Margin**: {}",
            num_or_na(ratios, "netProfitMargin")
        ),
        format!(
            "**Return on Equity**: {}",
            num_or_na(ratios, "returnOnEquity")
        ),
        format!(
            "**Return on Assets**: {}",
            num_or_na(ratios, "returnOnAssets")
        ),
        String::new(),
        "## Leverage".to_string(),
        format!(
            "**Debt to Equity**: {}",
            num_or_na(ratios, "debtToEquityRatio")
        ),
        format!(
            "**Interest Coverage**: {}",
            num_or_na(ratios, "interestCoverageRatio")
        ),
        String::new(),
        "## Valuation".to_string(),
        format!(
            "**Price to Earnings**: {}",
            num_or_na(ratios, "priceToEarningsRatio")
        ),
        format!(
            "**Price to Book**: {}",
            num_or_na(ratios, "priceToBookRatio")
        ),
        format!(
            "**Price to Sales**: {}",
            num_or_na(ratios, "priceToSalesRatio")
        ),
        format!("**Dividend Yield**: {}", num_or_na(ratios, "dividendYield")),
    ];

    lines.join("\n")
}

/// Render the price target consensus as Markdown
pub fn format_price_targets(targets: &Value, symbol: &str, as_of: &str) -> String {
    let lines = [
        format!("# Price Target Consensus for {}", symbol),
        format!("*Data as of {}*", as_of),
        String::new(),
        format!("**High**: ${}", num_or_na(targets, "targetHigh")),
        format!("**Low**: ${}", num_or_na(targets, "targetLow")),
        format!("**Consensus**: ${}", num_or_na(targets, "targetConsensus")),
        format!("**Median**: ${}", num_or_na(targets, "targetMedian")),
    ];

    lines.join("\n")
}

/// Render key metrics as Markdown, one section per period
pub fn format_key_metrics(metrics: &[Value], symbol: &str, period: &str) -> String {
    let mut lines = vec![
        format!("# Key Metrics for {} ({})", symbol, period),
        String::new(),
    ];

    for entry in metrics {
        lines.push(format!("## Period ending {}", str_or(entry, "date", "Unknown")));
        lines.push(format!("**Market Cap**: ${}", num_or_na(entry, "marketCap")));
        lines.push(format!(
            "**Enterprise Value**: ${}",
            num_or_na(entry, "enterpriseValue")
        ));
        lines.push(format!("**EV to Sales**: {}", num_or_na(entry, "evToSales")));
        lines.push(format!(
            "**EV to EBITDA**: {}",
            num_or_na(entry, "evToEBITDA")
        ));
        lines.push(format!(
            "**Free Cash Flow Yield**: {}",
            num_or_na(entry, "freeCashFlowYield")
        ));
        lines.push(format!(
            "**Current Ratio**: {}",
            num_or_na(entry, "currentRatio")
        ));
        lines.push(format!(
            "**Return on Equity**: {}",
            num_or_na(entry, "returnOnEquity")
        ));
        lines.push(String::new());
    }

    lines.join("\n")
}
