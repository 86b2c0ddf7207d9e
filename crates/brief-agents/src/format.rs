//! Fixed-precision rendering of market metrics
//!
//! Missing values render `N/A` rather than failing; the upstream feed may
//! omit any numeric field.

/// "$123.45" with two decimals
pub fn price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${v:.2}"),
        None => "N/A".to_string(),
    }
}

/// "$1,234,567" thousands-separated dollar integer
pub fn large_amount(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${}", group_thousands(v)),
        None => "N/A".to_string(),
    }
}

/// "1,234,567" thousands-separated integer
pub fn count(value: Option<f64>) -> String {
    match value {
        Some(v) => group_thousands(v),
        None => "N/A".to_string(),
    }
}

/// "23.51" with two decimals
pub fn ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

/// Fraction rendered as a percentage: 0.0123 → "1.23%"
pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "N/A".to_string(),
    }
}

fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i128;
    let negative = rounded < 0;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative { format!("-{grouped}") } else { grouped }
}
