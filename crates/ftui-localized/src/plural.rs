//! Plural categories, built-in CLDR rule families, and the classifier seam.
//!
//! The engine never evaluates a rule itself. It asks a [`PluralClassifier`]
//! for a category; [`CldrClassifier`] is the default and covers the common
//! CLDR rule families below. Callers with full CLDR data plug in their own.
//!
//! Rules are written over CLDR operands: `i` is the integer part of the
//! absolute count and `v` says whether a fractional part is present.
//!
//! | Family | Languages | Categories |
//! |--------|-----------|------------|
//! | [`OneOther`](PluralRule::OneOther) | en, de, es, it, nl, sv, ... | one (i=1, v=0), other |
//! | [`ZeroOne`](PluralRule::ZeroOne) | fr, pt | one (i=0,1), other |
//! | [`EastSlavic`](PluralRule::EastSlavic) | ru, uk, be, hr, sr, bs | one, few, many, other (v≠0) |
//! | [`Polish`](PluralRule::Polish) | pl | one, few, many, other (v≠0) |
//! | [`CzechSlovak`](PluralRule::CzechSlovak) | cs, sk | one, few, many (v≠0), other |
//! | [`Arabic`](PluralRule::Arabic) | ar | zero, one, two, few, many, other |
//! | [`Invariant`](PluralRule::Invariant) | zh, ja, ko, th, vi, id, ms | other |
//!
//! # Invariants
//!
//! 1. Every count maps to exactly one category.
//! 2. `other` is reachable in every family and catches non-finite counts.
//! 3. Classification is pure.

use std::fmt;
use std::str::FromStr;

/// CLDR plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub const ALL: [Self; 6] = [
        Self::Zero,
        Self::One,
        Self::Two,
        Self::Few,
        Self::Many,
        Self::Other,
    ];

    /// The CLDR tag, as used for keys in a category map.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is not one of the six CLDR tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown plural category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for PluralCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Operands
// ---------------------------------------------------------------------------

/// The CLDR operands the built-in rules read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operands {
    /// Integer digits of the absolute value.
    pub i: u64,
    /// Whether visible fraction digits are present (`v != 0`).
    pub fractional: bool,
}

impl Operands {
    /// Operands of a numeric count, or `None` when it is not finite.
    #[must_use]
    pub fn from_f64(count: f64) -> Option<Self> {
        if !count.is_finite() {
            return None;
        }
        let abs = count.abs();
        Some(Self {
            // Saturates for magnitudes beyond u64.
            i: abs.trunc() as u64,
            fractional: abs.fract() != 0.0,
        })
    }

    const fn whole(&self) -> Option<u64> {
        if self.fractional { None } else { Some(self.i) }
    }
}

impl From<i64> for Operands {
    fn from(count: i64) -> Self {
        Self {
            i: count.unsigned_abs(),
            fractional: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Rule families
// ---------------------------------------------------------------------------

/// A CLDR plural rule family.
#[derive(Clone, Copy)]
pub enum PluralRule {
    OneOther,
    ZeroOne,
    EastSlavic,
    Polish,
    CzechSlovak,
    Arabic,
    /// No plural distinction.
    Invariant,
    Custom(fn(Operands) -> PluralCategory),
}

impl PluralRule {
    /// Rule family for a locale tag such as `"pt-BR"` or `"ru_RU"`.
    ///
    /// Unknown languages use [`OneOther`](Self::OneOther).
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let primary = locale.split(['-', '_']).next().unwrap_or(locale);
        match primary.to_ascii_lowercase().as_str() {
            "fr" | "pt" => Self::ZeroOne,
            "ru" | "uk" | "be" | "hr" | "sr" | "bs" => Self::EastSlavic,
            "pl" => Self::Polish,
            "cs" | "sk" => Self::CzechSlovak,
            "ar" => Self::Arabic,
            "zh" | "ja" | "ko" | "th" | "vi" | "id" | "ms" => Self::Invariant,
            _ => Self::OneOther,
        }
    }

    /// Category for a numeric count. Non-finite counts are `other`.
    #[must_use]
    pub fn select(&self, count: f64) -> PluralCategory {
        Operands::from_f64(count).map_or(PluralCategory::Other, |ops| self.select_operands(ops))
    }

    #[must_use]
    pub fn select_operands(&self, ops: Operands) -> PluralCategory {
        use PluralCategory::{Few, Many, One, Other, Two, Zero};

        match *self {
            Self::OneOther => match ops.whole() {
                Some(1) => One,
                _ => Other,
            },
            Self::ZeroOne => {
                if ops.i <= 1 {
                    One
                } else {
                    Other
                }
            }
            Self::EastSlavic => match ops.whole() {
                None => Other,
                Some(n) => match (n % 10, n % 100) {
                    (1, r) if r != 11 => One,
                    (2..=4, r) if !(12..=14).contains(&r) => Few,
                    _ => Many,
                },
            },
            Self::Polish => match ops.whole() {
                None => Other,
                Some(1) => One,
                Some(n) => match (n % 10, n % 100) {
                    (2..=4, r) if !(12..=14).contains(&r) => Few,
                    _ => Many,
                },
            },
            Self::CzechSlovak => match ops.whole() {
                None => Many,
                Some(1) => One,
                Some(2..=4) => Few,
                Some(_) => Other,
            },
            Self::Arabic => match ops.whole() {
                None => Other,
                Some(0) => Zero,
                Some(1) => One,
                Some(2) => Two,
                Some(n) => match n % 100 {
                    3..=10 => Few,
                    11..=99 => Many,
                    _ => Other,
                },
            },
            Self::Invariant => Other,
            Self::Custom(rule) => rule(ops),
        }
    }
}

impl fmt::Debug for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OneOther => "OneOther",
            Self::ZeroOne => "ZeroOne",
            Self::EastSlavic => "EastSlavic",
            Self::Polish => "Polish",
            Self::CzechSlovak => "CzechSlovak",
            Self::Arabic => "Arabic",
            Self::Invariant => "Invariant",
            Self::Custom(_) => "Custom(..)",
        };
        write!(f, "PluralRule::{name}")
    }
}

// ---------------------------------------------------------------------------
// Classifier seam
// ---------------------------------------------------------------------------

/// Maps a numeric count and a locale to a plural category.
///
/// Implementations must be pure; the engine may call them from several
/// threads at once.
pub trait PluralClassifier: Send + Sync {
    fn category(&self, count: f64, locale: &str) -> PluralCategory;
}

impl<F> PluralClassifier for F
where
    F: Fn(f64, &str) -> PluralCategory + Send + Sync,
{
    fn category(&self, count: f64, locale: &str) -> PluralCategory {
        self(count, locale)
    }
}

/// Default classifier over the built-in rule families.
#[derive(Debug, Clone, Copy, Default)]
pub struct CldrClassifier;

impl PluralClassifier for CldrClassifier {
    fn category(&self, count: f64, locale: &str) -> PluralCategory {
        PluralRule::for_locale(locale).select(count)
    }
}
