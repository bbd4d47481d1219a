//! Money parsing and display helpers.
//!
//! All monetary values are `rust_decimal::Decimal`. The backend is not
//! consistent about encoding amounts (some operations return JSON strings,
//! others bare numbers), so parsing goes through [`decimal_from_value`].

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

/// Parse a backend amount that may arrive as a JSON string or number.
///
/// String amounts may carry thousands separators ("12,500.00").
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => parse_amount(s),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

/// Parse a user- or backend-supplied amount string.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Format a monetary value with thousands separators and two decimals.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative();
    let abs = rounded.abs();
    let units = abs.trunc();
    let cents = ((abs - units) * Decimal::from(100))
        .trunc()
        .to_i64()
        .unwrap_or(0);

    let units_str = units.normalize().to_string();
    let mut grouped = String::new();
    for (i, c) in units_str.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let units_grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-${}.{:02}", units_grouped, cents)
    } else {
        format!("${}.{:02}", units_grouped, cents)
    }
}

/// Format a rate as a percentage with two decimals ("5.00%").
pub fn format_percentage(rate: Decimal) -> String {
    format!("{:.2}%", rate.round_dp(2))
}
