//! German-style number formatting for the console report.

/// `1234.5` -> `€ 1.234,50`
pub fn fmt_eur(value: f64) -> String {
    format!("€ {}", fmt_number(value, 2))
}

/// Fraction as percent: `0.025` -> `2,50 %`
pub fn fmt_percent(fraction: f64) -> String {
    format!("{} %", fmt_number(fraction * 100.0, 2))
}

/// Fixed decimals with `.` thousands separators and `,` as decimal mark.
pub fn fmt_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let plain = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match plain.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    // "-0,00" reads oddly; only flag values that survive rounding.
    let negative = value < 0.0 && plain.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{sign}{grouped},{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_euro_amounts() {
        assert_eq!(fmt_eur(11924.7036), "€ 11.924,70");
        assert_eq!(fmt_eur(9200.0), "€ 9.200,00");
        assert_eq!(fmt_eur(177.5), "€ 177,50");
        assert_eq!(fmt_eur(1234567.891), "€ 1.234.567,89");
        assert_eq!(fmt_eur(0.0), "€ 0,00");
    }

    #[test]
    fn formats_negative_and_rounded_zero() {
        assert_eq!(fmt_eur(-1234.5), "€ -1.234,50");
        assert_eq!(fmt_eur(-0.001), "€ 0,00");
    }

    #[test]
    fn formats_percentages() {
        assert_eq!(fmt_percent(0.025), "2,50 %");
        assert_eq!(fmt_percent(0.2), "20,00 %");
    }

    #[test]
    fn formats_without_decimals() {
        assert_eq!(fmt_number(1500.0, 0), "1.500");
    }
}
