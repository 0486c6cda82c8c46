use once_cell::sync::Lazy;
use regex::Regex;

static VALUE_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$|usd|trade|off|discount|value|credit|comp|save").expect("valid hint pattern")
});

static SIGNED_DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-?\d[\d,]*(?:\.\d+)?").expect("valid decimal pattern")
});

/// Keep an amount only if it is finite and strictly positive
pub fn positive_amount(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Pull a dollar amount out of free text such as "Value: $1,250 Free Play".
///
/// Unless `allow_plain` is set the text must carry a value hint
/// (`$`, `usd`, `trade`, `off`, `discount`, `value`, `credit`, `comp`, `save`).
/// The first signed decimal is taken with thousands separators stripped;
/// anything non-finite or not strictly positive yields `None`.
pub fn extract_currency_value(text: &str, allow_plain: bool) -> Option<f64> {
    let trimmed = text.trim();
    if !allow_plain && !VALUE_HINT.is_match(trimmed) {
        return None;
    }

    let matched = SIGNED_DECIMAL.find(trimmed)?;
    let cleaned = matched.as_str().replace(',', "");
    positive_amount(cleaned.parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hinted_values() {
        assert_eq!(extract_currency_value("Value: $250 Free Play", false), Some(250.0));
        assert_eq!(extract_currency_value("$1,250.50", false), Some(1250.5));
        assert_eq!(extract_currency_value("Trade-in 300 USD", false), Some(300.0));
        assert_eq!(extract_currency_value("Save 15%", false), Some(15.0));
    }

    #[test]
    fn test_requires_hint_unless_plain() {
        assert_eq!(extract_currency_value("250", false), None);
        assert_eq!(extract_currency_value("250", true), Some(250.0));
        assert_eq!(extract_currency_value("  2,499 ", true), Some(2499.0));
    }

    #[test]
    fn test_rejects_non_positive() {
        // Only the first number counts, even when a later one is positive
        assert_eq!(extract_currency_value("credit -50 then $20", false), None);
        assert_eq!(extract_currency_value("$0", false), None);
        assert_eq!(extract_currency_value("comp value pending", false), None);
        assert_eq!(extract_currency_value("", true), None);
    }

    #[test]
    fn test_positive_amount() {
        assert_eq!(positive_amount(Some(12.5)), Some(12.5));
        assert_eq!(positive_amount(Some(0.0)), None);
        assert_eq!(positive_amount(Some(-3.0)), None);
        assert_eq!(positive_amount(Some(f64::NAN)), None);
        assert_eq!(positive_amount(Some(f64::INFINITY)), None);
        assert_eq!(positive_amount(None), None);
    }
}
