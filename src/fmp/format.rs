//! Shared Markdown formatting helpers
//!
//! Small rendering utilities used by every endpoint formatter: number
//! grouping, change-direction markers, and timestamps.

use chrono::Local;
use serde_json::Value;

/// Format a JSON value as a display number with thousands separators.
///
/// Strings pass through untouched, null and missing values render as "N/A".
pub fn format_number(value: &Value) -> String {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                group_thousands(&i.to_string())
            } else if let Some(f) = n.as_f64() {
                group_thousands(&f.to_string())
            } else {
                n.to_string()
            }
        }
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

/// Insert `,` separators into the integer part of a numeric string
fn group_thousands(number: &str) -> String {
    let (sign, rest) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::new();
    for (idx, digit) in int_part.chars().enumerate() {
        let remaining = int_part.len() - idx;
        if idx > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Direction marker for a signed change value
pub fn change_emoji(change: f64) -> &'static str {
    if change > 0.0 {
        "🔺"
    } else if change < 0.0 {
        "🔻"
    } else {
        "➖"
    }
}

/// Timestamp for "Data as of" footers
pub fn now_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// String field lookup with a fallback for missing/non-string values
pub fn str_or<'a>(data: &'a Value, key: &str, default: &'a str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or(default)
}

/// Numeric field lookup
pub fn f64_field(data: &Value, key: &str) -> Option<f64> {
    data.get(key).and_then(Value::as_f64)
}

/// Field lookup rendered through [`format_number`]
pub fn num_or_na(data: &Value, key: &str) -> String {
    format_number(data.get(key).unwrap_or(&Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_number_integers() {
        assert_eq!(format_number(&json!(500)), "500");
        assert_eq!(format_number(&json!(1234)), "1,234");
        assert_eq!(format_number(&json!(2840000000000i64)), "2,840,000,000,000");
        assert_eq!(format_number(&json!(-45000)), "-45,000");
    }

    #[test]
    fn test_format_number_floats() {
        assert_eq!(format_number(&json!(202.52)), "202.52");
        assert_eq!(format_number(&json!(1234.5)), "1,234.5");
    }

    #[test]
    fn test_format_number_non_numeric() {
        assert_eq!(format_number(&json!("N/A")), "N/A");
        assert_eq!(format_number(&Value::Null), "N/A");
    }

    #[test]
    fn test_change_emoji() {
        assert_eq!(change_emoji(1.5), "🔺");
        assert_eq!(change_emoji(-0.3), "🔻");
        assert_eq!(change_emoji(0.0), "➖");
    }

    #[test]
    fn test_field_helpers() {
        let data = json!({"symbol": "AAPL", "price": 202.52});
        assert_eq!(str_or(&data, "symbol", "Unknown"), "AAPL");
        assert_eq!(str_or(&data, "name", "Unknown"), "Unknown");
        assert_eq!(f64_field(&data, "price"), Some(202.52));
        assert_eq!(num_or_na(&data, "price"), "202.52");
        assert_eq!(num_or_na(&data, "volume"), "N/A");
    }
}
