//! Quote tools
//!
//! Covers the Quote section of the FMP stable API: full quotes, short quotes,
//! and price changes over standard timeframes.

use serde_json::Value;

use crate::fmp::client::FmpClient;
use crate::fmp::format::{change_emoji, f64_field, now_stamp, num_or_na, str_or};

/// Get the current stock quote for a company
pub async fn get_stock_quote(client: &FmpClient, symbol: &str) -> String {
    let data = match client.get("quote", &[("symbol", symbol.into())]).await {
        Ok(data) => data,
        Err(e) => return format!("Error fetching quote for {}: {}", symbol, e.message()),
    };

    match first_item(&data) {
        Some(quote) => format_quote(quote, &now_stamp()),
        None => format!("No quote data found for symbol {}", symbol),
    }
}

/// Get a simplified quote with just the essentials
pub async fn get_quote_short(client: &FmpClient, symbol: &str) -> String {
    let data = match client.get("quote-short", &[("symbol", symbol.into())]).await {
        Ok(data) => data,
        Err(e) => {
            return format!(
                "Error fetching simplified quote for {}: {}",
                symbol,
                e.message()
            )
        }
    };

    match first_item(&data) {
        Some(quote) => format_quote_short(quote, &now_stamp()),
        None => format!("No simplified quote data found for symbol {}", symbol),
    }
}

/// Get price changes for a stock over multiple timeframes
pub async fn get_price_change(client: &FmpClient, symbol: &str) -> String {
    let data = match client
        .get("stock-price-change", &[("symbol", symbol.into())])
        .await
    {
        Ok(data) => data,
        Err(e) => return format!("Error fetching price change for {}: {}", symbol, e.message()),
    };

    match first_item(&data) {
        Some(changes) => format_price_change(changes, symbol, &now_stamp()),
        None => format!("No price change data found for symbol {}", symbol),
    }
}

/// First element of an array response, if any
pub(crate) fn first_item(data: &Value) -> Option<&Value> {
    data.as_array().and_then(|items| items.first())
}

/// Render a full quote as Markdown
pub fn format_quote(quote: &Value, as_of: &str) -> String {
    let change_percent = f64_field(quote, "changesPercentage").unwrap_or(0.0);

    let lines = [
        format!(
            "# {} ({})",
            str_or(quote, "name", "Unknown Company"),
            str_or(quote, "symbol", "Unknown")
        ),
        format!("**Price**: ${}", num_or_na(quote, "price")),
        format!(
            "**Change**: {} ${} ({}%)",
            change_emoji(change_percent),
            num_or_na(quote, "change"),
            num_or_na(quote, "changesPercentage")
        ),
        String::new(),
        "## Trading Information".to_string(),
        format!("**Previous Close**: ${}", num_or_na(quote, "previousClose")),
        format!(
            "**Day Range**: ${} - ${}",
            num_or_na(quote, "dayLow"),
            num_or_na(quote, "dayHigh")
        ),
        format!(
            "**Year Range**: ${} - ${}",
            num_or_na(quote, "yearLow"),
            num_or_na(quote, "yearHigh")
        ),
        format!("**Market Cap**: ${}", num_or_na(quote, "marketCap")),
        format!("**Volume**: {}", num_or_na(quote, "volume")),
        format!("**Average Volume**: {}", num_or_na(quote, "avgVolume")),
        format!("**Open**: ${}", num_or_na(quote, "open")),
        String::new(),
        format!("*Data as of {}*", as_of),
    ];

    lines.join("\n")
}

/// Render a short quote as Markdown
pub fn format_quote_short(quote: &Value, as_of: &str) -> String {
    let change = f64_field(quote, "change").unwrap_or(0.0);

    let lines = [
        format!("# Stock Quote: {}", str_or(quote, "symbol", "Unknown")),
        format!("**Price**: ${}", num_or_na(quote, "price")),
        format!(
            "**Change**: {} ${} ({}%)",
            change_emoji(change),
            num_or_na(quote, "change"),
            num_or_na(quote, "changesPercentage")
        ),
        format!("**Volume**: {}", num_or_na(quote, "volume")),
        String::new(),
        format!("*Data as of {}*", as_of),
    ];

    lines.join("\n")
}

/// Timeframe keys in display order, with readable labels
const TIMEFRAME_LABELS: [(&str, &str); 11] = [
    ("1D", "1 Day"),
    ("5D", "5 Days"),
    ("1M", "1 Month"),
    ("3M", "3 Months"),
    ("6M", "6 Months"),
    ("ytd", "Year to Date"),
    ("1Y", "1 Year"),
    ("3Y", "3 Years"),
    ("5Y", "5 Years"),
    ("10Y", "10 Years"),
    ("max", "Maximum"),
];

/// Render price changes across timeframes as Markdown
pub fn format_price_change(changes: &Value, symbol: &str, as_of: &str) -> String {
    let mut lines = vec![
        format!("# Price Changes for {}", str_or(changes, "symbol", symbol)),
        format!("*Data as of {}*", as_of),
        String::new(),
    ];

    for (key, label) in TIMEFRAME_LABELS {
        if let Some(value) = f64_field(changes, key) {
            lines.push(format!("**{}**: {} {}%", label, change_emoji(value), value));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_quote() -> Value {
        json!({
            "symbol": "AAPL",
            "name": "Apple Inc.",
            "price": 202.52,
            "change": 2.52,
            "changesPercentage": 1.26,
            "previousClose": 200.0,
            "dayLow": 199.1,
            "dayHigh": 203.4,
            "yearLow": 164.08,
            "yearHigh": 237.23,
            "marketCap": 3100000000000i64,
            "volume": 48000000,
            "avgVolume": 58000000,
            "open": 200.5
        })
    }

    #[test]
    fn test_format_quote() {
        let result = format_quote(&sample_quote(), "2025-05-01 12:00:00");

        assert!(result.contains("# Apple Inc. (AAPL)"));
        assert!(result.contains("**Price**: $202.52"));
        assert!(result.contains("🔺"));
        assert!(result.contains("**Market Cap**: $3,100,000,000,000"));
        assert!(result.contains("**Day Range**: $199.1 - $203.4"));
        assert!(result.contains("*Data as of 2025-05-01 12:00:00*"));
    }

    #[test]
    fn test_format_quote_negative_change() {
        let quote = json!({
            "symbol": "TSLA",
            "name": "Tesla, Inc.",
            "price": 180.0,
            "change": -4.2,
            "changesPercentage": -2.28
        });

        let result = format_quote(&quote, "2025-05-01 12:00:00");
        assert!(result.contains("🔻"));
        assert!(result.contains("**Volume**: N/A"));
    }

    #[test]
    fn test_format_quote_short() {
        let result = format_quote_short(&sample_quote(), "2025-05-01 12:00:00");

        assert!(result.contains("# Stock Quote: AAPL"));
        assert!(result.contains("**Price**: $202.52"));
        assert!(result.contains("**Volume**: 48,000,000"));
    }

    #[test]
    fn test_format_price_change_ordering() {
        let changes = json!({
            "symbol": "AAPL",
            "1D": 1.2,
            "5D": -0.8,
            "1Y": 24.5
        });

        let result = format_price_change(&changes, "AAPL", "2025-05-01 12:00:00");
        assert!(result.contains("# Price Changes for AAPL"));
        assert!(result.contains("**1 Day**: 🔺 1.2%"));
        assert!(result.contains("**5 Days**: 🔻 -0.8%"));
        assert!(result.contains("**1 Year**: 🔺 24.5%"));
        // Timeframes absent from the response are skipped
        assert!(!result.contains("10 Years"));
    }

    #[tokio::test]
    async fn test_get_stock_quote_full_path() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/quote"))
            .and(query_param("symbol", "AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([sample_quote()])))
            .mount(&mock_server)
            .await;

        let client =
            FmpClient::new(&Config::with_credentials("test-key", mock_server.uri())).unwrap();
        let result = get_stock_quote(&client, "AAPL").await;

        assert!(result.contains("# Apple Inc. (AAPL)"));
    }

    #[tokio::test]
    async fn test_get_stock_quote_error_path() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})),
            )
            .mount(&mock_server)
            .await;

        let client =
            FmpClient::new(&Config::with_credentials("bad-key", mock_server.uri())).unwrap();
        let result = get_stock_quote(&client, "AAPL").await;

        assert_eq!(result, "Error fetching quote for AAPL: Unauthorized");
    }

    #[tokio::test]
    async fn test_get_stock_quote_empty_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&mock_server)
            .await;

        let client =
            FmpClient::new(&Config::with_credentials("test-key", mock_server.uri())).unwrap();
        let result = get_stock_quote(&client, "AAPL").await;

        assert_eq!(result, "No quote data found for symbol AAPL");
    }
}
