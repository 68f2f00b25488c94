//! Number and argument formatting for the rendered page.

use serde_json::{Map, Value};

const MAX_FRACTION_DIGITS: usize = 3;

/// Formats a number with `,` thousands grouping and at most three fraction
/// digits, trailing zeros dropped (`10000` -> `10,000`, `1234.5` -> `1,234.5`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // -0.0001 rounds to zero and must not print as "-0".
    if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

pub fn format_currency(value: f64) -> String {
    format!("${}", format_number(value))
}

pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

/// Signed percentage with two decimals, e.g. `+4.25%`.
pub fn format_percent_delta(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

/// Compact JSON for a function call's arguments, `None` when there are none.
pub fn format_arguments(arguments: &Map<String, Value>) -> Option<String> {
    if arguments.is_empty() {
        return None;
    }
    serde_json::to_string(arguments).ok()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
