//! Market hours tools
//!
//! Exchange trading hours and holiday calendars.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

use crate::fmp::client::FmpClient;
use crate::fmp::format::{now_stamp, str_or};

/// Get the current market hours status for a stock exchange
pub async fn get_market_hours(client: &FmpClient, exchange: &str) -> String {
    let data = match client
        .get("exchange-market-hours", &[("exchange", exchange.into())])
        .await
    {
        Ok(data) => data,
        Err(e) => {
            return format!("Error fetching market hours information: {}", e.message())
        }
    };

    // The endpoint answers with a single object for some exchanges and a
    // one-element array for others.
    let hours = match &data {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(&data),
        _ => None,
    };

    match hours {
        Some(hours) => format_market_hours(hours, exchange, &now_stamp()),
        None => format!("No market hours data found for exchange: {}", exchange),
    }
}

/// Get the holiday calendar for a stock exchange
pub async fn get_market_holidays(client: &FmpClient, exchange: &str) -> String {
    let data = match client
        .get("market-holidays", &[("exchange", exchange.into())])
        .await
    {
        Ok(data) => data,
        Err(e) => return format!("Error fetching market holidays: {}", e.message()),
    };

    match data.as_array() {
        Some(holidays) if !holidays.is_empty() => format_market_holidays(holidays, exchange),
        _ => format!("No market holiday data found for exchange: {}", exchange),
    }
}

/// Render exchange hours as Markdown
pub fn format_market_hours(hours: &Value, exchange: &str, as_of: &str) -> String {
    let mut lines = vec![
        format!("# Market Hours for {}", exchange),
        format!("*Data as of {}*", as_of),
        String::new(),
    ];

    let is_open = hours.get("isOpen").and_then(Value::as_bool).unwrap_or(false);
    let (status_emoji, status_text) = if is_open { ("🟢", "Open") } else { ("🔴", "Closed") };

    lines.push(format!("## {} Current Status: {}", status_emoji, status_text));
    lines.push(String::new());
    lines.push(format!("- **Timezone**: {}", str_or(hours, "timezone", "Unknown")));
    lines.push(format!("- **Local Time**: {}", str_or(hours, "localTime", "Unknown")));
    lines.push(String::new());
    lines.push("## Trading Hours".to_string());
    lines.push(String::new());
    lines.push("| Day | Open | Close |".to_string());
    lines.push("|-----|------|-------|".to_string());

    if let Some(days) = hours.get("marketHours").and_then(Value::as_array) {
        for day_data in days {
            let day = str_or(day_data, "day", "Unknown");
            if day_data.get("isClosed").and_then(Value::as_bool).unwrap_or(false) {
                lines.push(format!("| {} | Closed | Closed |", day));
            } else {
                lines.push(format!(
                    "| {} | {} | {} |",
                    day,
                    str_or(day_data, "open", "Closed"),
                    str_or(day_data, "close", "Closed"),
                ));
            }
        }
    }

    if let Some(holidays) = hours.get("closingDays").and_then(Value::as_array) {
        if !holidays.is_empty() {
            lines.push(String::new());
            lines.push("## Upcoming Holidays".to_string());
            lines.push(String::new());
            lines.push("| Date | Holiday |".to_string());
            lines.push("|------|---------|".to_string());

            for holiday in holidays {
                lines.push(format!(
                    "| {} | {} |",
                    str_or(holiday, "date", "Unknown"),
                    str_or(holiday, "name", "Unknown"),
                ));
            }
        }
    }

    lines.join("\n")
}

/// Render the holiday calendar as Markdown, grouped by year
pub fn format_market_holidays(holidays: &[Value], exchange: &str) -> String {
    let mut lines = vec![format!("# Market Holidays for {} Exchange", exchange), String::new()];

    // Group chronologically by year; unparseable dates sort first under year 0.
    let mut by_year: BTreeMap<i32, Vec<&Value>> = BTreeMap::new();
    for holiday in holidays {
        let year = holiday
            .get("date")
            .and_then(Value::as_str)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| chrono::Datelike::year(&d))
            .unwrap_or(0);
        by_year.entry(year).or_default().push(holiday);
    }

    for (year, entries) in by_year {
        if year > 0 {
            lines.push(format!("### {} Holidays", year));
        }
        lines.push("| Date | Holiday | Status | Exchange |".to_string());
        lines.push("|------|---------|--------|----------|".to_string());

        for holiday in entries {
            let status = str_or(holiday, "status", "Unknown");
            let status_label = match status.to_lowercase().as_str() {
                "closed" => "🔴 Closed".to_string(),
                "early close" | "early closing" => "🟠 Early Close".to_string(),
                _ => status.to_string(),
            };

            lines.push(format!(
                "| {} | {} | {} | {} |",
                str_or(holiday, "date", "Unknown"),
                str_or(holiday, "name", "Unknown"),
                status_label,
                str_or(holiday, "exchange", "Unknown"),
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
