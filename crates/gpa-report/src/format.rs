//! Number formatting for reports and axis labels.

/// Formats a number with comma thousands separators.
///
/// Whole numbers print without decimals; anything else keeps two places.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = (value * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let whole = abs.trunc();
    let digits = format!("{whole:.0}");

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let fraction = abs - whole;
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if fraction > f64::EPSILON {
        let cents = format!("{fraction:.2}");
        out.push_str(cents.trim_start_matches('0'));
    }
    out
}

/// Formats a ratio as a percentage with two decimals (`0.3` -> `30.00%`).
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1_234_567.0), "1,234,567");
        assert_eq!(format_thousands(-4500.0), "-4,500");
        assert_eq!(format_thousands(1234.5), "1,234.50");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.3), "30.00%");
        assert_eq!(format_percent(0.05), "5.00%");
    }
}
