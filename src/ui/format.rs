use num_format::{Locale, ToFormattedString};

/// Renders a value with thousands separators and at most three fraction
/// digits, trailing zeros trimmed: `50000.0` -> `50,000`, `1234.5` -> `1,234.5`.
pub fn format_grouped(value: f64) -> String {
    let rounded = (value.abs() * 1000.0).round() / 1000.0;
    let whole = rounded.trunc();
    let fraction = format!("{:.3}", rounded - whole);
    let fraction = fraction
        .trim_start_matches('0')
        .trim_end_matches('0')
        .trim_end_matches('.');

    let sign = if value < 0.0 && rounded > 0.0 { "-" } else { "" };
    format!(
        "{}{}{}",
        sign,
        (whole as u64).to_formatted_string(&Locale::en),
        fraction
    )
}

pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

pub fn format_change(change: f64) -> String {
    format!("{:.2}%", change)
}
