use super::*;
use serde_json::json;

#[test]
fn groups_thousands_and_drops_trailing_zeros() {
    assert_eq!(format_number(10_000.0), "10,000");
    assert_eq!(format_number(500.0), "500");
    assert_eq!(format_number(1_234.5), "1,234.5");
    assert_eq!(format_number(1_234_567.891), "1,234,567.891");
    assert_eq!(format_number(0.0), "0");
}

#[test]
fn rounds_to_three_fraction_digits() {
    assert_eq!(format_number(0.1 + 0.2), "0.3");
    assert_eq!(format_number(1.23456), "1.235");
    assert_eq!(format_number(999.9999), "1,000");
}

#[test]
fn negative_values_keep_sign_unless_rounded_to_zero() {
    assert_eq!(format_number(-1_500.0), "-1,500");
    assert_eq!(format_number(-0.0001), "0");
    assert_eq!(format_currency(-746.0), "$-746");
}

#[test]
fn non_finite_values_have_fixed_text() {
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::INFINITY), "∞");
    assert_eq!(format_number(f64::NEG_INFINITY), "-∞");
}

#[test]
fn currency_and_count() {
    assert_eq!(format_currency(10_000.0), "$10,000");
    assert_eq!(format_currency(500.0), "$500");
    assert_eq!(format_count(2), "2");
    assert_eq!(format_count(12_345), "12,345");
}

#[test]
fn percent_delta_is_signed() {
    assert_eq!(format_percent_delta(1.4), "+1.40%");
    assert_eq!(format_percent_delta(-7.46), "-7.46%");
    assert_eq!(format_percent_delta(0.0), "0.00%");
}

#[test]
fn arguments_serialize_compactly_or_not_at_all() {
    assert_eq!(format_arguments(&Map::new()), None);

    let arguments = json!({ "symbol": "AAPL" });
    let arguments = arguments.as_object().expect("object");
    assert_eq!(
        format_arguments(arguments).as_deref(),
        Some(r#"{"symbol":"AAPL"}"#)
    );
}
