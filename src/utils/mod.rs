use crate::core::{ExchangeError, ExchangeResult};
use rust_decimal::{Decimal, RoundingStrategy};

/// Normalize a user-typed token symbol ("eth " -> "ETH")
pub fn parse_symbol(input: &str) -> ExchangeResult<String> {
    let symbol = input.trim().to_uppercase();
    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ExchangeError::UnknownToken(input.to_string()));
    }
    Ok(symbol)
}

/// Insert thousands separators into the integer part of a plain decimal string
pub fn group_thousands(s: &str) -> String {
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut grouped = String::new();
    let mut count = 0;
    for ch in int_part.chars().rev() {
        if count == 3 {
            grouped.push(',');
            count = 0;
        }
        grouped.push(ch);
        count += 1;
    }
    let int_part: String = grouped.chars().rev().collect();

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, int_part, frac),
        None => format!("{}{}", sign, int_part),
    }
}

/// Token amount rounded to `max_dp` places with trailing zeros dropped
pub fn format_amount(amount: Decimal, max_dp: u32) -> String {
    let rounded = amount
        .round_dp_with_strategy(max_dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    group_thousands(&rounded.to_string())
}

/// Dollar value with two decimals, e.g. `$1,234.50`
pub fn format_usd(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let formatted = group_thousands(&format!("{:.2}", rounded.abs()));
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${}", formatted)
    } else {
        format!("${}", formatted)
    }
}

/// Compact dollar figure for large totals: `$1.25B`, `$45.00M`, `$980.00K`
pub fn format_compact_usd(value: Decimal) -> String {
    let thousand = Decimal::from(1_000);
    let million = Decimal::from(1_000_000);
    let billion = Decimal::from(1_000_000_000);

    if value >= billion {
        format!("${:.2}B", value / billion)
    } else if value >= million {
        format!("${:.2}M", value / million)
    } else if value >= thousand {
        format!("${:.2}K", value / thousand)
    } else {
        format_usd(value)
    }
}
