//! Market tools
//!
//! Index snapshots, stock news, symbol search, and historical end-of-day
//! prices.

use serde_json::Value;

use crate::fmp::client::{FmpClient, ParamValue};
use crate::fmp::format::{change_emoji, f64_field, now_stamp, num_or_na, str_or};

/// Indexes shown in the market snapshot, in display order
const MAJOR_INDEXES: [&str; 6] = ["^GSPC", "^DJI", "^IXIC", "^RUT", "^FTSE", "^N225"];

/// Get a snapshot of the major market indexes
pub async fn get_market_indexes(client: &FmpClient) -> String {
    let data = match client.get("batch-index-quotes", &[]).await {
        Ok(data) => data,
        Err(e) => return format!("Error fetching market indexes: {}", e.message()),
    };

    match data.as_array() {
        Some(quotes) if !quotes.is_empty() => format_market_indexes(quotes, &now_stamp()),
        _ => "No market index data found".to_string(),
    }
}

/// Get the latest news for one or more stocks
pub async fn get_stock_news(client: &FmpClient, symbols: &str, limit: u32) -> String {
    let data = match client
        .get(
            "news/stock",
            &[("symbols", symbols.into()), ("limit", limit.into())],
        )
        .await
    {
        Ok(data) => data,
        Err(e) => return format!("Error fetching stock news for {}: {}", symbols, e.message()),
    };

    match data.as_array() {
        Some(articles) if !articles.is_empty() => format_stock_news(articles, symbols),
        _ => format!("No stock news found for {}", symbols),
    }
}

/// Search for stocks by ticker or company name
pub async fn search_stocks(client: &FmpClient, query: &str, limit: u32) -> String {
    let data = match client
        .get(
            "search-symbol",
            &[("query", query.into()), ("limit", limit.into())],
        )
        .await
    {
        Ok(data) => data,
        Err(e) => return format!("Error searching stocks for '{}': {}", query, e.message()),
    };

    match data.as_array() {
        Some(matches) if !matches.is_empty() => format_search_results(matches, query),
        _ => format!("No stocks found matching '{}'", query),
    }
}

/// Get historical end-of-day prices for a symbol
pub async fn get_historical_price(
    client: &FmpClient,
    symbol: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> String {
    let mut params: Vec<(&str, ParamValue)> = vec![("symbol", symbol.into())];
    if let Some(from) = from {
        params.push(("from", from.into()));
    }
    if let Some(to) = to {
        params.push(("to", to.into()));
    }

    let data = match client.get("historical-price-eod/light", &params).await {
        Ok(data) => data,
        Err(e) => {
            return format!(
                "Error fetching historical prices for {}: {}",
                symbol,
                e.message()
            )
        }
    };

    match data.as_array() {
        Some(prices) if !prices.is_empty() => format_historical_prices(prices, symbol),
        _ => format!("No historical price data found for symbol {}", symbol),
    }
}

/// Render the major-index snapshot as a Markdown table
pub fn format_market_indexes(quotes: &[Value], as_of: &str) -> String {
    let mut lines = vec![
        "# Market Index Snapshot".to_string(),
        format!("*Data as of {}*", as_of),
        String::new(),
        "| Index | Price | Change | % Change |".to_string(),
        "|-------|-------|--------|----------|".to_string(),
    ];

    // Major indexes first, in fixed order, then nothing else: the batch
    // endpoint returns hundreds of entries.
    for symbol in MAJOR_INDEXES {
        if let Some(quote) = quotes
            .iter()
            .find(|q| q.get("symbol").and_then(Value::as_str) == Some(symbol))
        {
            let change = f64_field(quote, "change").unwrap_or(0.0);
            lines.push(format!(
                "| {} ({}) | {} | {} {} | {}% |",
                str_or(quote, "name", symbol),
                symbol,
                num_or_na(quote, "price"),
                change_emoji(change),
                num_or_na(quote, "change"),
                num_or_na(quote, "changesPercentage"),
            ));
        }
    }

    lines.join("\n")
}

/// Render news articles as Markdown
pub fn format_stock_news(articles: &[Value], symbols: &str) -> String {
    let mut lines = vec![format!("# Latest News for {}", symbols), String::new()];

    for article in articles {
        lines.push(format!("## {}", str_or(article, "title", "Untitled")));
        lines.push(format!(
            "**{}** | {} | {}",
            str_or(article, "symbol", "?"),
            str_or(article, "publisher", "Unknown source"),
            str_or(article, "publishedDate", "Unknown date"),
        ));
        if let Some(text) = article.get("text").and_then(Value::as_str) {
            lines.push(String::new());
            lines.push(text.to_string());
        }
        if let Some(url) = article.get("url").and_then(Value::as_str) {
            lines.push(format!("[Read more]({})", url));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Render symbol search results as a Markdown table
pub fn format_search_results(matches: &[Value], query: &str) -> String {
    let mut lines = vec![
        format!("# Search Results for '{}'", query),
        String::new(),
        "| Symbol | Name | Exchange | Currency |".to_string(),
        "|--------|------|----------|----------|".to_string(),
    ];

    for entry in matches {
        lines.push(format!(
            "| {} | {} | {} | {} |",
            str_or(entry, "symbol", "?"),
            str_or(entry, "name", "Unknown"),
            str_or(entry, "exchangeFullName", "Unknown"),
            str_or(entry, "currency", "?"),
        ));
    }

    lines.join("\n")
}

/// Rows shown before historical output is truncated
const MAX_HISTORY_ROWS: usize = 30;

/// Render historical EOD prices as a Markdown table
pub fn format_historical_prices(prices: &[Value], symbol: &str) -> String {
    let mut lines = vec![
        format!("# Historical Prices for {}", symbol),
        String::new(),
        "| Date | Price | Volume |".to_string(),
        "|------|-------|--------|".to_string(),
    ];

    for entry in prices.iter().take(MAX_HISTORY_ROWS) {
        lines.push(format!(
            "| {} | {} | {} |",
            str_or(entry, "date", "Unknown"),
            num_or_na(entry, "price"),
            num_or_na(entry, "volume"),
        ));
    }

    if prices.len() > MAX_HISTORY_ROWS {
        lines.push(String::new());
        lines.push(format!(
            "*Showing {} of {} data points*",
            MAX_HISTORY_ROWS,
            prices.len()
        ));
    }

    lines.join("\n")
}
