//! Display formatting for money

use bigdecimal::BigDecimal;

/// Format an amount as dollars with thousands separators, e.g. `-$1,234.50`
pub fn format_currency(amount: &BigDecimal) -> String {
    let rounded = amount.round(2).with_scale(2);
    let text = rounded.abs().to_string();
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded < BigDecimal::from(0) { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}
