//! Company tools
//!
//! Covers company profiles, exchange-listed notes, and the three financial
//! statements (income, balance sheet, cash flow).

use serde_json::Value;

use crate::fmp::client::FmpClient;
use crate::fmp::format::{now_stamp, num_or_na, str_or};
use crate::fmp::quote::first_item;

/// Get the company profile for a symbol
pub async fn get_company_profile(client: &FmpClient, symbol: &str) -> String {
    let data = match client.get("profile", &[("symbol", symbol.into())]).await {
        Ok(data) => data,
        Err(e) => return format!("Error fetching profile for {}: {}", symbol, e.message()),
    };

    match first_item(&data) {
        Some(profile) => format_profile(profile, &now_stamp()),
        None => format!("No profile data found for symbol {}", symbol),
    }
}

/// Get exchange-listed notes issued by a company
pub async fn get_company_notes(client: &FmpClient, symbol: &str) -> String {
    let data = match client
        .get("company-notes", &[("symbol", symbol.into())])
        .await
    {
        Ok(data) => data,
        Err(e) => return format!("Error fetching company notes for {}: {}", symbol, e.message()),
    };

    match data.as_array() {
        Some(notes) if !notes.is_empty() => format_company_notes(notes, symbol),
        _ => format!("No company notes data found for symbol {}", symbol),
    }
}

/// Get income statements for a company
pub async fn get_income_statement(
    client: &FmpClient,
    symbol: &str,
    period: &str,
    limit: u32,
) -> String {
    let data = match client
        .get(
            "income-statement",
            &[
                ("symbol", symbol.into()),
                ("period", period.into()),
                ("limit", limit.into()),
            ],
        )
        .await
    {
        Ok(data) => data,
        Err(e) => {
            return format!(
                "Error fetching income statement for {}: {}",
                symbol,
                e.message()
            )
        }
    };

    match data.as_array() {
        Some(statements) if !statements.is_empty() => {
            format_income_statement(statements, symbol, period)
        }
        _ => format!("No income statement data found for symbol {}", symbol),
    }
}

/// Get balance sheet statements for a company
pub async fn get_balance_sheet(
    client: &FmpClient,
    symbol: &str,
    period: &str,
    limit: u32,
) -> String {
    let data = match client
        .get(
            "balance-sheet-statement",
            &[
                ("symbol", symbol.into()),
                ("period", period.into()),
                ("limit", limit.into()),
            ],
        )
        .await
    {
        Ok(data) => data,
        Err(e) => {
            return format!(
                "Error fetching balance sheet for {}: {}",
                symbol,
                e.message()
            )
        }
    };

    match data.as_array() {
        Some(statements) if !statements.is_empty() => {
            format_balance_sheet(statements, symbol, period)
        }
        _ => format!("No balance sheet data found for symbol {}", symbol),
    }
}

/// Get cash flow statements for a company
pub async fn get_cash_flow(client: &FmpClient, symbol: &str, period: &str, limit: u32) -> String {
    let data = match client
        .get(
            "cash-flow-statement",
            &[
                ("symbol", symbol.into()),
                ("period", period.into()),
                ("limit", limit.into()),
            ],
        )
        .await
    {
        Ok(data) => data,
        Err(e) => {
            return format!(
                "Error fetching cash flow statement for {}: {}",
                symbol,
                e.message()
            )
        }
    };

    match data.as_array() {
        Some(statements) if !statements.is_empty() => format_cash_flow(statements, symbol, period),
        _ => format!("No cash flow data found for symbol {}", symbol),
    }
}

/// Get peer companies trading in the same sector
pub async fn get_stock_peers(client: &FmpClient, symbol: &str) -> String {
    let data = match client.get("stock-peers", &[("symbol", symbol.into())]).await {
        Ok(data) => data,
        Err(e) => return format!("Error fetching stock peers for {}: {}", symbol, e.message()),
    };

    match data.as_array() {
        Some(peers) if !peers.is_empty() => format_stock_peers(peers, symbol),
        _ => format!("No peer data found for symbol {}", symbol),
    }
}

/// Render a company profile as Markdown
pub fn format_profile(profile: &Value, as_of: &str) -> String {
    let lines = [
        format!(
            "# {} ({})",
            str_or(profile, "companyName", "Unknown Company"),
            str_or(profile, "symbol", "Unknown")
        ),
        format!("**Sector**: {}", str_or(profile, "sector", "N/A")),
        format!("**Industry**: {}", str_or(profile, "industry", "N/A")),
        format!("**CEO**: {}", str_or(profile, "ceo", "N/A")),
        format!("**Market Cap**: ${}", num_or_na(profile, "marketCap")),
        format!("**Price**: ${}", num_or_na(profile, "price")),
        format!("**Exchange**: {}", str_or(profile, "exchange", "N/A")),
        format!("**Country**: {}", str_or(profile, "country", "N/A")),
        format!("**Website**: {}", str_or(profile, "website", "N/A")),
        String::new(),
        "## Description".to_string(),
        str_or(profile, "description", "No description available.").to_string(),
        String::new(),
        format!("*Data as of {}*", as_of),
    ];

    lines.join("\n")
}

/// Render company notes as Markdown
pub fn format_company_notes(notes: &[Value], symbol: &str) -> String {
    let mut lines = vec![format!("# Company Notes for {}", symbol), String::new()];

    for note in notes {
        lines.push(format!("## {}", str_or(note, "title", "Untitled Note")));
        lines.push(format!("**Exchange**: {}", str_or(note, "exchange", "N/A")));
        lines.push(format!("**CIK**: {}", str_or(note, "cik", "N/A")));
        if let Some(maturity) = note.get("maturityDate").and_then(Value::as_str) {
            lines.push(format!("**Maturity Date**: {}", maturity));
        }
        if note.get("interestRate").is_some() {
            lines.push(format!(
                "**Interest Rate**: {}%",
                num_or_na(note, "interestRate")
            ));
        }
        if let Some(description) = note.get("description").and_then(Value::as_str) {
            lines.push(String::new());
            lines.push(description.to_string());
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Render peer companies as a Markdown table
pub fn format_stock_peers(peers: &[Value], symbol: &str) -> String {
    let mut lines = vec![
        format!("# Peer Companies for {}", symbol),
        String::new(),
        "| Symbol | Company | Price | Market Cap |".to_string(),
        "|--------|---------|-------|------------|".to_string(),
    ];

    for peer in peers {
        lines.push(format!(
            "| {} | {} | ${} | ${} |",
            str_or(peer, "symbol", "?"),
            str_or(peer, "companyName", "Unknown"),
            num_or_na(peer, "price"),
            num_or_na(peer, "mktCap"),
        ));
    }

    lines.join("\n")
}

/// Render income statements as Markdown, one section per period
pub fn format_income_statement(statements: &[Value], symbol: &str, period: &str) -> String {
    let mut lines = vec![
        format!("# Income Statement for {} ({})", symbol, period),
        String::new(),
    ];

    for statement in statements {
        lines.push(format!("## Period ending {}", str_or(statement, "date", "Unknown")));
        lines.push(format!("**Revenue**: ${}", num_or_na(statement, "revenue")));
        lines.push(format!(
            "**Cost of Revenue**: ${}",
            num_or_na(statement, "costOfRevenue")
        ));
        lines.push(format!(
            "**Gross Profit**: ${}",
            num_or_na(statement, "grossProfit")
        ));
        lines.push(format!(
            "**Operating Income**: ${}",
            num_or_na(statement, "operatingIncome")
        ));
        lines.push(format!(
            "**Income Before Tax**: ${}",
            num_or_na(statement, "incomeBeforeTax")
        ));
        lines.push(format!("**Net Income**: ${}", num_or_na(statement, "netIncome")));
        lines.push(format!("**EPS**: ${}", num_or_na(statement, "eps")));
        lines.push(format!(
            "**EPS Diluted**: ${}",
            num_or_na(statement, "epsDiluted")
        ));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Render balance sheet statements as Markdown, one section per period
pub fn format_balance_sheet(statements: &[Value], symbol: &str, period: &str) -> String {
    let mut lines = vec![
        format!("# Balance Sheet for {} ({})", symbol, period),
        String::new(),
    ];

    for statement in statements {
        lines.push(format!("## Period ending {}", str_or(statement, "date", "Unknown")));
        lines.push("### Assets".to_string());
        lines.push(format!(
            "**Cash and Equivalents**: ${}",
            num_or_na(statement, "cashAndCashEquivalents")
        ));
        lines.push(format!(
            "**Total Current Assets**: ${}",
            num_or_na(statement, "totalCurrentAssets")
        ));
        lines.push(format!(
            "**Total Assets**: ${}",
            num_or_na(statement, "totalAssets")
        ));
        lines.push("### Liabilities".to_string());
        lines.push(format!(
            "**Total Current Liabilities**: ${}",
            num_or_na(statement, "totalCurrentLiabilities")
        ));
        lines.push(format!(
            "**Total Debt**: ${}",
            num_or_na(statement, "totalDebt")
        ));
        lines.push(format!(
            "**Total Liabilities**: ${}",
            num_or_na(statement, "totalLiabilities")
        ));
        lines.push("### Equity".to_string());
        lines.push(format!(
            "**Total Stockholders Equity**: ${}",
            num_or_na(statement, "totalStockholdersEquity")
        ));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Render cash flow statements as Markdown, one section per period
pub fn format_cash_flow(statements: &[Value], symbol: &str, period: &str) -> String {
    let mut lines = vec![
        format!("# Cash Flow Statement for {} ({})", symbol, period),
        String::new(),
    ];

    for statement in statements {
        lines.push(format!("## Period ending {}", str_or(statement, "date", "Unknown")));
        lines.push(format!(
            "**Operating Cash Flow**: ${}",
            num_or_na(statement, "operatingCashFlow")
        ));
        lines.push(format!(
            "**Capital Expenditure**: ${}",
            num_or_na(statement, "capitalExpenditure")
        ));
        lines.push(format!(
            "**Free Cash Flow**: ${}",
            num_or_na(statement, "freeCashFlow")
        ));
        lines.push(format!(
            "**Net Cash from Investing**: ${}",
            num_or_na(statement, "netCashProvidedByInvestingActivities")
        ));
        lines.push(format!(
            "**Net Cash from Financing**: ${}",
            num_or_na(statement, "netCashProvidedByFinancingActivities")
        ));
        lines.push(format!(
            "**Net Change in Cash**: ${}",
            num_or_na(statement, "netChangeInCash")
        ));
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_profile() {
        let profile = json!({
            "symbol": "AAPL",
            "companyName": "Apple Inc.",
            "sector": "Technology",
            "industry": "Consumer Electronics",
            "ceo": "Tim Cook",
            "marketCap": 2840000000000i64,
            "price": 190.5,
            "exchange": "NASDAQ",
            "country": "US",
            "website": "https://www.apple.com",
            "description": "Apple designs consumer electronics."
        });

        let result = format_profile(&profile, "2025-05-01 12:00:00");

        assert!(result.contains("# Apple Inc. (AAPL)"));
        assert!(result.contains("**Sector**: Technology"));
        assert!(result.contains("**Market Cap**: $2,840,000,000,000"));
        assert!(result.contains("**CEO**: Tim Cook"));
        assert!(result.contains("Apple designs consumer electronics."));
    }

    #[test]
    fn test_format_profile_missing_fields() {
        let profile = json!({"symbol": "XYZ"});
        let result = format_profile(&profile, "2025-05-01 12:00:00");

        assert!(result.contains("# Unknown Company (XYZ)"));
        assert!(result.contains("**Sector**: N/A"));
        assert!(result.contains("No description available."));
    }

    #[test]
    fn test_format_company_notes() {
        let notes = vec![
            json!({
                "title": "Apple Inc. 3.85% Notes due 2043",
                "exchange": "NASDAQ",
                "cik": "0000320193",
                "maturityDate": "2043-08-05",
                "interestRate": 3.85,
                "description": "3.85% unsecured senior notes"
            }),
            json!({
                "title": "Apple Inc. 2.40% Notes due 2030",
                "exchange": "NASDAQ",
                "cik": "0000320193"
            }),
        ];

        let result = format_company_notes(&notes, "AAPL");

        assert!(result.contains("# Company Notes for AAPL"));
        assert!(result.contains("Apple Inc. 3.85% Notes due 2043"));
        assert!(result.contains("Apple Inc. 2.40% Notes due 2030"));
        assert!(result.contains("**Maturity Date**: 2043-08-05"));
        assert!(result.contains("**Interest Rate**: 3.85%"));
        assert!(result.contains("3.85% unsecured senior notes"));
    }

    #[test]
    fn test_format_stock_peers() {
        let peers = vec![
            json!({"symbol": "MSFT", "companyName": "Microsoft Corporation", "price": 415.1, "mktCap": 3090000000000i64}),
            json!({"symbol": "GOOGL", "companyName": "Alphabet Inc.", "price": 178.2, "mktCap": 2200000000000i64}),
        ];

        let result = format_stock_peers(&peers, "AAPL");

        assert!(result.contains("# Peer Companies for AAPL"));
        assert!(result.contains("| MSFT | Microsoft Corporation | $415.1 | $3,090,000,000,000 |"));
        assert!(result.contains("| GOOGL | Alphabet Inc."));
    }

    #[test]
    fn test_format_income_statement() {
        let statements = vec![json!({
            "date": "2024-09-28",
            "revenue": 391035000000i64,
            "costOfRevenue": 210352000000i64,
            "grossProfit": 180683000000i64,
            "operatingIncome": 123216000000i64,
            "netIncome": 93736000000i64,
            "eps": 6.11,
            "epsDiluted": 6.08
        })];

        let result = format_income_statement(&statements, "AAPL", "annual");

        assert!(result.contains("# Income Statement for AAPL (annual)"));
        assert!(result.contains("## Period ending 2024-09-28"));
        assert!(result.contains("**Revenue**: $391,035,000,000"));
        assert!(result.contains("**EPS**: $6.11"));
    }

    #[test]
    fn test_format_balance_sheet() {
        let statements = vec![json!({
            "date": "2024-09-28",
            "cashAndCashEquivalents": 29943000000i64,
            "totalCurrentAssets": 152987000000i64,
            "totalAssets": 364980000000i64,
            "totalCurrentLiabilities": 176392000000i64,
            "totalDebt": 106629000000i64,
            "totalLiabilities": 308030000000i64,
            "totalStockholdersEquity": 56950000000i64
        })];

        let result = format_balance_sheet(&statements, "AAPL", "annual");

        assert!(result.contains("# Balance Sheet for AAPL (annual)"));
        assert!(result.contains("**Total Assets**: $364,980,000,000"));
        assert!(result.contains("**Total Stockholders Equity**: $56,950,000,000"));
    }

    #[test]
    fn test_format_cash_flow() {
        let statements = vec![json!({
            "date": "2024-09-28",
            "operatingCashFlow": 118254000000i64,
            "capitalExpenditure": -9447000000i64,
            "freeCashFlow": 108807000000i64
        })];

        let result = format_cash_flow(&statements, "AAPL", "annual");

        assert!(result.contains("# Cash Flow Statement for AAPL (annual)"));
        assert!(result.contains("**Operating Cash Flow**: $118,254,000,000"));
        assert!(result.contains("**Capital Expenditure**: $-9,447,000,000"));
        assert!(result.contains("**Net Change in Cash**: $N/A"));
    }
}
