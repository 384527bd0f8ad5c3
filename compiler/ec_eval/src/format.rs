//! Number to text conversion.
//!
//! Integral values within ±2^53 print as integers. Everything else follows
//! the C `%g` conversion with six significant digits.

/// Largest magnitude at which every integer is exactly representable.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

const SIGNIFICANT_DIGITS: i32 = 6;

pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < EXACT_INT_LIMIT {
        return format!("{}", value as i64);
    }
    format_general(value)
}

/// `%g`: pick fixed or exponent form from the decimal exponent after
/// rounding to the target precision.
fn format_general(value: f64) -> String {
    let precision = (SIGNIFICANT_DIGITS - 1) as usize;
    let scientific = format!("{value:.precision$e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .map_or((scientific.as_str(), 0), |(m, e)| {
            (m, e.parse::<i32>().unwrap_or(0))
        });

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn integers() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-7.0), "-7");
        assert_eq!(format_number(1_000_000.0), "1000000");
    }

    #[test]
    fn fractions() {
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(1.0 / 3.0), "0.333333");
        assert_eq!(format_number(-2.25), "-2.25");
        assert_eq!(format_number(123_456.7), "123457");
    }

    #[test]
    fn exponent_form() {
        assert_eq!(format_number(1e20), "1e+20");
        assert_eq!(format_number(0.00001), "1e-05");
        assert_eq!(format_number(1.5e-7), "1.5e-07");
        assert_eq!(format_number(1_234_567.5), "1.23457e+06");
    }

    #[test]
    fn non_finite() {
        assert_eq!(format_number(f64::NAN), "nan");
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
    }
}
