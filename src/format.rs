//! Display formatting: locale-aware thousands separators and magnitude scaling.

use num_format::{Locale, ToFormattedString};

/// Text shown for values that are not applicable or missing.
pub const NOT_APPLICABLE: &str = "n/a";

/// Map a user-provided locale tag to a num-format Locale and decimal separator.
/// Supported tags (case-insensitive): "en", "de", "fr", "es", "it", "pt", "nl" (+ region variants).
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Pick a display scale and its label based on magnitude.
/// Returns (scale, label), e.g. (1e9, "billions").
pub fn choose_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "trillions")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "billions")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "millions")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "thousands")
    } else {
        (1.0, "")
    }
}

/// Format `v` with `decimals` fraction digits and locale grouping.
pub fn format_number(v: f64, decimals: usize, locale_tag: &str) -> String {
    if !v.is_finite() {
        return NOT_APPLICABLE.to_string();
    }
    let (locale, dec_sep) = map_locale(locale_tag);
    let s = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), ""));
    let mut out = String::new();
    if v.is_sign_negative() && s.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    match int_part.parse::<u128>() {
        Ok(n) => out.push_str(&n.to_formatted_string(locale)),
        Err(_) => out.push_str(&group_digits(int_part, locale.separator())),
    }
    if !frac_part.is_empty() {
        out.push(dec_sep);
        out.push_str(frac_part);
    }
    out
}

/// Insert `sep` every three digits from the right.
fn group_digits(digits: &str, sep: &str) -> String {
    let n = digits.len();
    let mut out = String::with_capacity(n + n / 3 * sep.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}

/// Growth multiple as `"2.00x"`.
pub fn fmt_growth(v: Option<f64>, locale_tag: &str) -> String {
    match v {
        Some(x) => format!("{}x", format_number(x, 2, locale_tag)),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// Percentage as `"7.18%"`.
pub fn fmt_pct(v: Option<f64>, locale_tag: &str) -> String {
    match v {
        Some(x) => format!("{}%", format_number(x, 2, locale_tag)),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// Value divided by `scale`, whole numbers, e.g. `"3,846"`.
pub fn fmt_scaled(v: Option<f64>, scale: f64, locale_tag: &str) -> String {
    match v {
        Some(x) => format_number(x / scale, 0, locale_tag),
        None => NOT_APPLICABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_follows_locale() {
        assert_eq!(format_number(1234567.891, 2, "en"), "1,234,567.89");
        assert_eq!(format_number(1234567.891, 2, "de"), "1.234.567,89");
        assert_eq!(format_number(-0.001, 2, "en"), "0.00");
        assert_eq!(format_number(-12.5, 1, "en"), "-12.5");
    }

    #[test]
    fn huge_values_keep_their_digits() {
        let s = format_number(1.0e25, 0, "en");
        assert_eq!(s, "10,000,000,000,000,000,905,969,664");
        let big = format_number(-1.0e40, 0, "de");
        assert!(big.starts_with("-10.000.000"), "{big}");
        assert!(!big.contains(",0"));
        assert_eq!(group_digits("1234567", ","), "1,234,567");
        assert_eq!(group_digits("123", "."), "123");
    }

    #[test]
    fn indicator_strings() {
        assert_eq!(fmt_growth(Some(2.0), "en"), "2.00x");
        assert_eq!(fmt_pct(Some(7.18), "en"), "7.18%");
        assert_eq!(fmt_pct(None, "en"), "n/a");
        assert_eq!(fmt_scaled(Some(3.846e12), 1e9, "en"), "3,846");
    }

    #[test]
    fn scale_picks_magnitude() {
        assert_eq!(choose_scale(2.0e13), (1.0e12, "trillions"));
        assert_eq!(choose_scale(5.0e9).1, "billions");
        assert_eq!(choose_scale(12.0).0, 1.0);
    }
}
