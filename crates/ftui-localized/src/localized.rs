//! Locale-tagged strings.
//!
//! [`LocalizedString`] pairs text with a locale so the text can be used as
//! a template ([`format`](LocalizedString::format)) or read as a number with
//! the locale's separators ([`to_f`](LocalizedString::to_f)).

use std::fmt;

use crate::config::FormatConfig;
use crate::engine::Formatter;
use crate::error::FormatError;
use crate::value::Argument;

/// Grouping and decimal separators of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberSymbols {
    pub group: char,
    pub decimal: char,
}

impl NumberSymbols {
    /// Separators for a locale tag, by primary language.
    ///
    /// Unknown languages use `,` for grouping and `.` for decimals.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let primary = locale.split(['-', '_']).next().unwrap_or(locale);
        match primary.to_ascii_lowercase().as_str() {
            "es" | "de" | "it" | "pt" | "nl" | "da" | "id" | "tr" | "el" | "hr" | "sr" | "ro"
            | "sl" | "vi" => Self {
                group: '.',
                decimal: ',',
            },
            "fr" | "ru" | "pl" | "uk" | "cs" | "sk" | "sv" | "fi" | "nb" | "no" | "hu" | "bg"
            | "et" | "lt" | "lv" => Self {
                group: '\u{a0}',
                decimal: ',',
            },
            _ => Self {
                group: ',',
                decimal: '.',
            },
        }
    }
}

/// A string tagged with the locale it is written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalizedString {
    text: String,
    locale: String,
}

impl LocalizedString {
    #[must_use]
    pub fn new(text: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale: locale.into(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    /// Use the text as a template and substitute `argument` into it.
    ///
    /// ```
    /// use ftui_localized::{Argument, Localize};
    ///
    /// let s = "%d is an integer".localize_in("en");
    /// assert_eq!(s.format(&Argument::from(3.75)).unwrap().as_str(), "3 is an integer");
    /// ```
    pub fn format(&self, argument: &Argument) -> Result<Self, FormatError> {
        self.format_with(Formatter::shared(), argument)
    }

    /// Like [`format`](Self::format) with an explicit formatter.
    pub fn format_with(
        &self,
        formatter: &Formatter,
        argument: &Argument,
    ) -> Result<Self, FormatError> {
        let text = formatter.format(&self.text, argument, &self.locale)?;
        Ok(Self::new(text, self.locale.clone()))
    }

    /// Leading number in the text, read with the locale's separators.
    ///
    /// Grouping separators are skipped; reading stops at the first
    /// character that cannot continue the number. No number gives `0.0`.
    #[must_use]
    pub fn to_f(&self) -> f64 {
        let symbols = NumberSymbols::for_locale(&self.locale);
        let mut digits = String::new();
        let mut seen_decimal = false;

        for (i, ch) in self.text.trim_start().chars().enumerate() {
            match ch {
                '-' | '+' if i == 0 => digits.push(ch),
                '0'..='9' => digits.push(ch),
                c if c == symbols.decimal && !seen_decimal => {
                    seen_decimal = true;
                    digits.push('.');
                }
                c if c == symbols.group && !seen_decimal => {}
                // Narrow no-break and plain spaces also group in some locales.
                '\u{202f}' | ' ' if symbols.group == '\u{a0}' && !seen_decimal => {}
                _ => break,
            }
        }

        digits.trim_end_matches('.').parse().unwrap_or(0.0)
    }

    /// [`to_f`](Self::to_f) truncated toward zero.
    #[must_use]
    pub fn to_i(&self) -> i64 {
        self.to_f().trunc() as i64
    }

    /// Unicode scalar values of the text.
    #[must_use]
    pub fn code_points(&self) -> Vec<u32> {
        self.text.chars().map(u32::from).collect()
    }

    pub fn chars(&self) -> std::str::Chars<'_> {
        self.text.chars()
    }
}

impl fmt::Display for LocalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for LocalizedString {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Tag plain strings with a locale.
pub trait Localize {
    /// Tag with the configured default locale.
    fn localize(&self) -> LocalizedString;

    /// Tag with an explicit locale.
    fn localize_in(&self, locale: &str) -> LocalizedString;
}

impl Localize for str {
    fn localize(&self) -> LocalizedString {
        LocalizedString::new(self, FormatConfig::global().default_locale.as_str())
    }

    fn localize_in(&self, locale: &str) -> LocalizedString {
        LocalizedString::new(self, locale)
    }
}
