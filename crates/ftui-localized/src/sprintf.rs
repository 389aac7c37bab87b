//! Sprintf conversion specs and their evaluation.
//!
//! A [`FormatSpec`] is parsed from the text after `%` (or after `%<key>`)
//! and applied to one [`Value`]. Supported conversions:
//!
//! | Char | Meaning |
//! |------|---------|
//! | `d` `i` `u` | decimal integer; floats are truncated toward zero |
//! | `f` `F` | fixed-point, default precision 6 |
//! | `e` `E` | scientific, two-digit minimum exponent |
//! | `g` `G` | shortest of fixed/scientific, trailing zeros removed |
//! | `x` `X` `o` `b` `B` | hex, octal, binary magnitude with sign |
//! | `s` | string; precision truncates |
//! | `c` | single character from a code point or a string |
//!
//! Flags: `-` left-justify, `0` zero-pad, ` ` space for sign, `+` force
//! sign, `#` alternate form.

use crate::error::FormatError;
use crate::value::Value;

/// Parsed sprintf flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub left: bool,
    pub plus: bool,
    pub space: bool,
    pub zero: bool,
    pub alternate: bool,
}

/// The conversion a spec performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Integer,
    Fixed { upper: bool },
    Exponent { upper: bool },
    General { upper: bool },
    Hex { upper: bool },
    Octal,
    Binary { upper: bool },
    Str,
    Char,
}

/// A sprintf conversion spec, e.g. `- 04d` or `.2f`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    raw: String,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: Conversion,
    conversion_char: char,
}

enum Number {
    Int(i64),
    Float(f64),
}

/// Largest accepted width or precision.
pub const MAX_FIELD: usize = 1024;

fn field(digits: &str) -> Option<usize> {
    digits.parse().ok().filter(|n| *n <= MAX_FIELD)
}

impl FormatSpec {
    /// Parse a spec (without the leading `%`).
    ///
    /// Returns `None` unless the whole text is flags, width, precision and
    /// exactly one trailing conversion character. Widths and precisions
    /// above [`MAX_FIELD`] are rejected.
    #[must_use]
    pub fn parse(spec: &str) -> Option<Self> {
        let bytes = spec.as_bytes();
        let mut flags = Flags::default();
        let mut i = 0;

        while let Some(&b) = bytes.get(i) {
            match b {
                b'-' => flags.left = true,
                b'+' => flags.plus = true,
                b' ' => flags.space = true,
                b'0' => flags.zero = true,
                b'#' => flags.alternate = true,
                _ => break,
            }
            i += 1;
        }

        let width_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        let width = if i > width_start {
            Some(field(&spec[width_start..i])?)
        } else {
            None
        };

        let precision = if bytes.get(i) == Some(&b'.') {
            i += 1;
            let start = i;
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            Some(if i > start { field(&spec[start..i])? } else { 0 })
        } else {
            None
        };

        if i + 1 != bytes.len() {
            return None;
        }
        let conversion_char = char::from(bytes[i]);
        let conversion = match conversion_char {
            'd' | 'i' | 'u' => Conversion::Integer,
            'f' | 'F' => Conversion::Fixed {
                upper: conversion_char == 'F',
            },
            'e' | 'E' => Conversion::Exponent {
                upper: conversion_char == 'E',
            },
            'g' | 'G' => Conversion::General {
                upper: conversion_char == 'G',
            },
            'x' | 'X' => Conversion::Hex {
                upper: conversion_char == 'X',
            },
            'o' => Conversion::Octal,
            'b' | 'B' => Conversion::Binary {
                upper: conversion_char == 'B',
            },
            's' => Conversion::Str,
            'c' => Conversion::Char,
            _ => return None,
        };

        Some(Self {
            raw: spec.to_string(),
            flags,
            width,
            precision,
            conversion,
            conversion_char,
        })
    }

    /// The conversion text exactly as written in the template.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    #[must_use]
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    #[must_use]
    pub fn precision(&self) -> Option<usize> {
        self.precision
    }

    #[must_use]
    pub fn conversion(&self) -> Conversion {
        self.conversion
    }

    /// Format `value` according to this spec.
    pub fn apply(&self, value: &Value) -> Result<String, FormatError> {
        match self.conversion {
            Conversion::Integer => {
                let (negative, digits) = self.decimal(value)?;
                Ok(self.radix(negative, digits, ""))
            }
            Conversion::Hex { upper } => {
                let (negative, magnitude) = self.integer(value)?;
                let digits = if upper {
                    format!("{magnitude:X}")
                } else {
                    format!("{magnitude:x}")
                };
                let prefix = match (self.flags.alternate && magnitude != 0, upper) {
                    (false, _) => "",
                    (true, false) => "0x",
                    (true, true) => "0X",
                };
                Ok(self.radix(negative, digits, prefix))
            }
            Conversion::Octal => {
                let (negative, magnitude) = self.integer(value)?;
                let digits = format!("{magnitude:o}");
                let prefix = if self.flags.alternate && magnitude != 0 {
                    "0"
                } else {
                    ""
                };
                Ok(self.radix(negative, digits, prefix))
            }
            Conversion::Binary { upper } => {
                let (negative, magnitude) = self.integer(value)?;
                let digits = format!("{magnitude:b}");
                let prefix = match (self.flags.alternate && magnitude != 0, upper) {
                    (false, _) => "",
                    (true, false) => "0b",
                    (true, true) => "0B",
                };
                Ok(self.radix(negative, digits, prefix))
            }
            Conversion::Fixed { upper }
            | Conversion::Exponent { upper }
            | Conversion::General { upper } => {
                let x = match self.number(value, false)? {
                    Number::Int(i) => i as f64,
                    Number::Float(f) => f,
                };
                Ok(self.float(x, upper))
            }
            Conversion::Str => {
                let text = value.to_string();
                let text: String = match self.precision {
                    Some(p) => text.chars().take(p).collect(),
                    None => text,
                };
                Ok(self.pad("", &text, false))
            }
            Conversion::Char => {
                let ch = self.character(value)?;
                Ok(self.pad("", ch.encode_utf8(&mut [0; 4]), false))
            }
        }
    }

    fn conversion_error(&self, value: &Value) -> FormatError {
        FormatError::FormatConversion {
            conversion: self.conversion_char,
            value: value.describe(),
        }
    }

    /// Numeric view of `value`. Strings must read as an integer when
    /// `integral` is set, and as any number otherwise.
    fn number(&self, value: &Value, integral: bool) -> Result<Number, FormatError> {
        match value {
            Value::Int(i) => Ok(Number::Int(*i)),
            Value::Float(f) => Ok(Number::Float(*f)),
            Value::Str(s) => {
                let t = s.trim();
                match t.parse::<i64>() {
                    Ok(i) => Ok(Number::Int(i)),
                    Err(_) if integral => Err(self.conversion_error(value)),
                    Err(_) => t
                        .parse::<f64>()
                        .map(Number::Float)
                        .map_err(|_| self.conversion_error(value)),
                }
            }
            Value::Rules(_) => Err(self.conversion_error(value)),
        }
    }

    /// Sign and decimal digits of the truncated value. Exact for any
    /// finite float.
    fn decimal(&self, value: &Value) -> Result<(bool, String), FormatError> {
        match self.number(value, true)? {
            Number::Int(i) => Ok((i < 0, i.unsigned_abs().to_string())),
            Number::Float(f) if f.is_finite() => {
                let t = f.trunc();
                Ok((t < 0.0, format!("{:.0}", t.abs())))
            }
            Number::Float(_) => Err(self.conversion_error(value)),
        }
    }

    /// Sign and magnitude of the truncated value, for radix conversions.
    ///
    /// Magnitudes of 2^128 and above do not fit and are rejected.
    fn integer(&self, value: &Value) -> Result<(bool, u128), FormatError> {
        match self.number(value, true)? {
            Number::Int(i) => Ok((i < 0, u128::from(i.unsigned_abs()))),
            // `u128::MAX as f64` rounds up to exactly 2^128.
            Number::Float(f) if f.is_finite() && f.trunc().abs() < u128::MAX as f64 => {
                let t = f.trunc();
                Ok((t < 0.0, t.abs() as u128))
            }
            Number::Float(_) => Err(self.conversion_error(value)),
        }
    }

    fn character(&self, value: &Value) -> Result<char, FormatError> {
        let from_code = |code: i64| u32::try_from(code).ok().and_then(char::from_u32);
        let ch = match value {
            Value::Int(i) => from_code(*i),
            Value::Float(f) if f.is_finite() => from_code(f.trunc() as i64),
            Value::Str(s) => s.chars().next(),
            _ => None,
        };
        ch.ok_or_else(|| self.conversion_error(value))
    }

    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.flags.plus {
            "+"
        } else if self.flags.space {
            " "
        } else {
            ""
        }
    }

    /// Integer body with precision as minimum digit count.
    fn radix(&self, negative: bool, digits: String, prefix: &str) -> String {
        let digits = match self.precision {
            Some(0) if digits == "0" => String::new(),
            Some(p) if digits.len() < p => format!("{}{digits}", "0".repeat(p - digits.len())),
            _ => digits,
        };
        let lead = format!("{}{prefix}", self.sign(negative));
        self.pad(&lead, &digits, self.precision.is_none())
    }

    fn float(&self, x: f64, upper: bool) -> String {
        let negative = x.is_sign_negative() && !x.is_nan();
        let sign = self.sign(negative);

        if !x.is_finite() {
            let body = match (x.is_nan(), upper) {
                (true, false) => "nan",
                (true, true) => "NAN",
                (false, false) => "inf",
                (false, true) => "INF",
            };
            return self.pad(sign, body, false);
        }

        let abs = x.abs();
        let precision = self.precision.unwrap_or(6);
        let body = match self.conversion {
            Conversion::Exponent { .. } => exponent(abs, precision, upper, self.flags.alternate),
            Conversion::General { .. } => general(abs, precision, upper, self.flags.alternate),
            _ => {
                let mut body = format!("{abs:.precision$}");
                if self.flags.alternate && precision == 0 {
                    body.push('.');
                }
                body
            }
        };
        self.pad(sign, &body, true)
    }

    /// Apply width: `lead` (sign/prefix) stays in front of zero padding.
    fn pad(&self, lead: &str, body: &str, zero_ok: bool) -> String {
        let len = lead.chars().count() + body.chars().count();
        let width = self.width.unwrap_or(0);
        if len >= width {
            return format!("{lead}{body}");
        }
        let fill = width - len;
        if self.flags.left {
            format!("{lead}{body}{}", " ".repeat(fill))
        } else if self.flags.zero && zero_ok {
            format!("{lead}{}{body}", "0".repeat(fill))
        } else {
            format!("{}{lead}{body}", " ".repeat(fill))
        }
    }
}

/// `d.ddde±XX` rendering of a non-negative finite value.
fn exponent(abs: f64, precision: usize, upper: bool, alternate: bool) -> String {
    let raw = format!("{abs:.precision$e}");
    let Some((mantissa, exp)) = raw.split_once('e') else {
        return raw;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    let dot = if alternate && precision == 0 { "." } else { "" };
    format!(
        "{mantissa}{dot}{}{}{:02}",
        if upper { 'E' } else { 'e' },
        if exp < 0 { '-' } else { '+' },
        exp.unsigned_abs()
    )
}

/// `%g`: fixed when the decimal exponent is in `[-4, precision)`, else
/// scientific; trailing zeros dropped unless `alternate`.
fn general(abs: f64, precision: usize, upper: bool, alternate: bool) -> String {
    let p = precision.max(1);
    let exp = if abs == 0.0 {
        0
    } else {
        let digits = p - 1;
        let probe = format!("{abs:.digits$e}");
        probe
            .split_once('e')
            .and_then(|(_, e)| e.parse::<i32>().ok())
            .unwrap_or(0)
    };

    let p_signed = i32::try_from(p).unwrap_or(i32::MAX);
    if exp >= -4 && exp < p_signed {
        let decimals = usize::try_from(p_signed - 1 - exp).unwrap_or(0);
        let body = format!("{abs:.decimals$}");
        if alternate {
            body
        } else {
            strip_trailing_zeros(&body).to_string()
        }
    } else {
        let body = exponent(abs, p - 1, upper, alternate);
        if alternate {
            return body;
        }
        let marker = if upper { 'E' } else { 'e' };
        match body.split_once(marker) {
            Some((mantissa, rest)) => {
                format!("{}{marker}{rest}", strip_trailing_zeros(mantissa))
            }
            None => body,
        }
    }
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
#[allow(clippy::approx_constant)]
mod tests {
    use super::*;

    fn fmt(spec: &str, value: impl Into<Value>) -> String {
        FormatSpec::parse(spec)
            .unwrap_or_else(|| panic!("spec {spec:?} should parse"))
            .apply(&value.into())
            .unwrap_or_else(|e| panic!("{spec:?} failed: {e}"))
    }

    #[test]
    fn parse_keeps_raw_text_and_fields() {
        let spec = FormatSpec::parse("- 04d").expect("valid spec");
        assert_eq!(spec.as_str(), "- 04d");
        assert!(spec.flags().left && spec.flags().space && spec.flags().zero);
        assert_eq!(spec.width(), Some(4));
        assert_eq!(spec.precision(), None);
        assert_eq!(spec.conversion(), Conversion::Integer);

        let spec = FormatSpec::parse(".f").expect("valid spec");
        assert_eq!(spec.precision(), Some(0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(FormatSpec::parse("").is_none());
        assert!(FormatSpec::parse("5").is_none());
        assert!(FormatSpec::parse("dd").is_none());
        assert!(FormatSpec::parse("q").is_none());
        assert!(FormatSpec::parse("99999999999999999999999d").is_none());
        assert!(FormatSpec::parse(".5000f").is_none());
        assert!(FormatSpec::parse("1024.1024f").is_some());
    }

    #[test]
    fn integers() {
        assert_eq!(fmt("d", 3.14), "3");
        assert_eq!(fmt("d", -3.99), "-3");
        assert_eq!(fmt(" 04d", 12), " 012");
        assert_eq!(fmt("+d", 5), "+5");
        assert_eq!(fmt("-5d", 12), "12   ");
        assert_eq!(fmt("5d", -12), "  -12");
        assert_eq!(fmt("05d", -12), "-0012");
        assert_eq!(fmt(".3d", 7), "007");
        assert_eq!(fmt("05.3d", 7), "  007");
        assert_eq!(fmt(".0d", 0), "");
        assert_eq!(fmt("d", "42"), "42");
        assert_eq!(fmt("d", i64::MIN), "-9223372036854775808");
    }

    #[test]
    fn integers_beyond_u128() {
        assert_eq!(fmt("d", 1e40), "10000000000000000303786028427003666890752");
        assert_eq!(fmt("d", -1e40), "-10000000000000000303786028427003666890752");
        assert_eq!(fmt("d", 2f64.powi(70)), "1180591620717411303424");
        assert_eq!(fmt("x", 2f64.powi(100)), format!("{:x}", 1u128 << 100));

        for spec in ["x", "X", "o", "b"] {
            let spec = FormatSpec::parse(spec).expect("valid spec");
            assert!(matches!(
                spec.apply(&Value::from(1e40)),
                Err(FormatError::FormatConversion { .. })
            ));
            assert!(spec.apply(&Value::from(2f64.powi(128))).is_err());
        }
    }

    #[test]
    fn integer_conversions_want_integer_strings() {
        assert_eq!(fmt("d", " -17 "), "-17");
        assert_eq!(fmt("x", "255"), "ff");
        let spec = FormatSpec::parse("d").expect("valid spec");
        assert_eq!(
            spec.apply(&Value::from("3.7")),
            Err(FormatError::FormatConversion {
                conversion: 'd',
                value: "\"3.7\"".into()
            })
        );
        let hex = FormatSpec::parse("x").expect("valid spec");
        assert!(hex.apply(&Value::from("1e3")).is_err());
        assert_eq!(fmt(".1f", "3.75"), "3.8");
        assert_eq!(fmt("g", "42"), "42");
    }

    #[test]
    fn radixes() {
        assert_eq!(fmt("x", 255), "ff");
        assert_eq!(fmt("#X", 255), "0XFF");
        assert_eq!(fmt("#06x", 255), "0x00ff");
        assert_eq!(fmt("o", 8), "10");
        assert_eq!(fmt("#o", 8), "010");
        assert_eq!(fmt("b", 5), "101");
        assert_eq!(fmt("#B", 5), "0B101");
        assert_eq!(fmt("x", -255), "-ff");
    }

    #[test]
    fn fixed_point() {
        assert_eq!(fmt(".2f", 3.1415), "3.14");
        assert_eq!(fmt("f", 1.5), "1.500000");
        assert_eq!(fmt("08.3f", -3.14159), "-003.142");
        assert_eq!(fmt("+.1f", 2), "+2.0");
        assert_eq!(fmt(".0f", 2.4), "2");
        assert_eq!(fmt("#.0f", 2.4), "2.");
        assert_eq!(fmt("f", f64::INFINITY), "inf");
        assert_eq!(fmt("5F", f64::NEG_INFINITY), " -INF");
    }

    #[test]
    fn scientific_and_general() {
        assert_eq!(fmt("e", 12345.678), "1.234568e+04");
        assert_eq!(fmt(".2E", 0.000123), "1.23E-04");
        assert_eq!(fmt("e", 0.0), "0.000000e+00");
        assert_eq!(fmt("g", 0.0001), "0.0001");
        assert_eq!(fmt("g", 100000), "100000");
        assert_eq!(fmt("g", 123456789.0), "1.23457e+08");
        assert_eq!(fmt("G", 1e-10), "1E-10");
        assert_eq!(fmt("g", 2.5), "2.5");
        assert_eq!(fmt("#g", 2.5), "2.50000");
    }

    #[test]
    fn strings_and_chars() {
        assert_eq!(fmt("s", "number"), "number");
        assert_eq!(fmt("s", 3.14), "3.14");
        assert_eq!(fmt(".3s", "abcdef"), "abc");
        assert_eq!(fmt("6s", "ab"), "    ab");
        assert_eq!(fmt("-6s", "ab"), "ab    ");
        assert_eq!(fmt("06s", "ab"), "    ab");
        assert_eq!(fmt("c", 65), "A");
        assert_eq!(fmt("c", "ñandu"), "ñ");
    }

    #[test]
    fn conversion_errors() {
        let spec = FormatSpec::parse("d").expect("valid spec");
        let err = spec.apply(&Value::from("abc")).unwrap_err();
        assert_eq!(
            err,
            FormatError::FormatConversion {
                conversion: 'd',
                value: "\"abc\"".into()
            }
        );
        assert!(spec.apply(&Value::Float(f64::NAN)).is_err());
        assert!(spec.apply(&Value::Rules(Default::default())).is_err());

        let spec = FormatSpec::parse("c").expect("valid spec");
        assert!(spec.apply(&Value::from(-1)).is_err());
        assert!(spec.apply(&Value::from("")).is_err());
    }
}
