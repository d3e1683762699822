use rust_decimal::Decimal;
use std::str::FromStr;

const SYMBOL: &str = "R$";

/// Parse an amount typed either as a plain decimal ("1234.56") or in
/// Brazilian notation ("R$ 1.234,56", "1234,56").
pub fn parse_amount(text: &str) -> Result<Decimal, String> {
    let trimmed = text.trim().trim_start_matches(SYMBOL).trim();
    if trimmed.is_empty() {
        return Err(format!("'{text}' is not an amount"));
    }

    let normalised = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    Decimal::from_str(&normalised).map_err(|e| format!("'{text}' is not an amount: {e}"))
}

/// Format an amount as "R$ 1.234,56" (two decimals, dot thousands separator).
pub fn format_brl(value: Decimal) -> String {
    let cents = value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", cents.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let sign = if cents.is_sign_negative() && !cents.is_zero() { "-" } else { "" };
    format!("{sign}{SYMBOL} {grouped},{fraction}")
}
