use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// Maximum fraction digits kept when formatting user-facing numbers.
const MAX_FRACTION_DIGITS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Tr,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Tr];

    /// BCP-47 tag, used for `lang` attributes.
    pub fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Tr => "tr",
        }
    }

    fn group_separator(self) -> char {
        match self {
            Self::En => ',',
            Self::Tr => '.',
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            Self::En => '.',
            Self::Tr => ',',
        }
    }
}

/// A display string rendered in both report locales.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub tr: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, tr: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            tr: tr.into(),
        }
    }

    /// Same text in every locale (proper names, placeholders).
    pub fn same(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            en: text.clone(),
            tr: text,
        }
    }

    /// A number formatted with each locale's grouping and decimal separators.
    pub fn number(value: f64) -> Self {
        Self {
            en: format_number(value, Locale::En),
            tr: format_number(value, Locale::Tr),
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Tr => &self.tr,
        }
    }
}

/// Format a number with locale grouping, at most three fraction digits and no
/// trailing zeros (`1234567.5` -> `1,234,567.5` / `1.234.567,5`).
pub fn format_number(value: f64, locale: Locale) -> String {
    let mut out = String::with_capacity(16);
    write_number(&mut out, value, locale);
    out
}

pub fn write_number(buf: &mut String, value: f64, locale: Locale) {
    buf.clear();
    if !value.is_finite() {
        buf.push_str(if value.is_nan() { "NaN" } else { "∞" });
        return;
    }

    let scale = 10f64.powi(MAX_FRACTION_DIGITS);
    let scaled = (value.abs() * scale).round();
    let int_part = (scaled / scale).trunc();
    let frac_part = (scaled - int_part * scale).round() as u64;

    if value < 0.0 && scaled > 0.0 {
        buf.push('-');
    }

    let digits = format!("{}", int_part as u64);
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            buf.push(locale.group_separator());
        }
        buf.push(ch);
    }

    if frac_part > 0 {
        let mut frac = format!("{frac_part:0width$}", width = MAX_FRACTION_DIGITS as usize);
        while frac.ends_with('0') {
            frac.pop();
        }
        buf.push(locale.decimal_separator());
        let _ = write!(buf, "{frac}");
    }
}

/// Plain, ungrouped rendering used for axis ticks and literal value labels.
pub fn plain_number(value: f64) -> String {
    if value == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    let rounded = (value * 1e9).round() / 1e9;
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_per_locale() {
        assert_eq!(format_number(1_234_567.0, Locale::En), "1,234,567");
        assert_eq!(format_number(1_234_567.0, Locale::Tr), "1.234.567");
    }

    #[test]
    fn small_numbers_have_no_separator() {
        assert_eq!(format_number(0.0, Locale::En), "0");
        assert_eq!(format_number(999.0, Locale::Tr), "999");
        assert_eq!(format_number(1000.0, Locale::Tr), "1.000");
    }

    #[test]
    fn fraction_digits_are_trimmed_and_localized() {
        assert_eq!(format_number(1234.5, Locale::En), "1,234.5");
        assert_eq!(format_number(1234.5, Locale::Tr), "1.234,5");
        assert_eq!(format_number(2.0 / 3.0, Locale::En), "0.667");
        assert_eq!(format_number(1.0004, Locale::En), "1");
    }

    #[test]
    fn negative_values_keep_sign() {
        assert_eq!(format_number(-12_345.0, Locale::En), "-12,345");
        assert_eq!(format_number(-0.0001, Locale::En), "0");
    }

    #[test]
    fn localized_number_fills_both_locales() {
        let text = LocalizedText::number(84_680_273.0);
        assert_eq!(text.get(Locale::En), "84,680,273");
        assert_eq!(text.get(Locale::Tr), "84.680.273");
    }

    #[test]
    fn plain_number_matches_js_string_conversion() {
        assert_eq!(plain_number(100.0), "100");
        assert_eq!(plain_number(0.5), "0.5");
        assert_eq!(plain_number(-0.0), "0");
        assert_eq!(plain_number(0.1 + 0.2), "0.3");
    }
}
