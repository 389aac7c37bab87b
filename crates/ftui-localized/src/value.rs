//! Substitution values and the argument binder.
//!
//! An [`Argument`] is classified exactly once per call: a mapping is
//! [`Keyed`](Argument::Keyed), anything else is
//! [`Positional`](Argument::Positional). [`Bindings`] is the per-call view
//! the engine walks; it never fails on its own and only reports presence
//! or exhaustion.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::ArgumentShape;

/// Category tag → sub-template mapping used for pluralization.
pub type CategoryMap = BTreeMap<String, String>;

/// A single substitution value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    /// Pluralization rules: category tag → template.
    Rules(CategoryMap),
}

impl Value {
    /// Numeric view of the value, if it has one.
    ///
    /// Strings count when their trimmed text parses as a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Str(s) => s.trim().parse::<f64>().ok(),
            Self::Rules(_) => None,
        }
    }

    /// The category map, when this value is one.
    #[must_use]
    pub fn as_rules(&self) -> Option<&CategoryMap> {
        match self {
            Self::Rules(map) => Some(map),
            _ => None,
        }
    }

    /// Short rendering for error messages (strings are quoted).
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Str(s) => format!("{s:?}"),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            // Debug keeps the fraction marker: `2.0`, not `2`.
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => f.write_str(s),
            Self::Rules(map) => {
                f.write_str("{")?;
                for (i, (tag, template)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{tag:?}:{template:?}")?;
                }
                f.write_str("}")
            }
        }
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Self::Int(i64::from(v))
            }
        })*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! value_from_wide_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                i64::try_from(v).map_or(Self::Float(v as f64), Self::Int)
            }
        })*
    };
}

value_from_wide_int!(u64, usize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<CategoryMap> for Value {
    fn from(v: CategoryMap) -> Self {
        Self::Rules(v)
    }
}

// ---------------------------------------------------------------------------
// Argument
// ---------------------------------------------------------------------------

/// The single argument of a substitution call.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Values consumed by directive order.
    Positional(Vec<Value>),
    /// Values looked up by key.
    Keyed(BTreeMap<String, Value>),
}

impl Argument {
    /// Build a positional argument from an ordered sequence.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Build a keyed argument from key/value pairs.
    pub fn keyed<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Keyed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Which shape this argument was classified as.
    #[must_use]
    pub fn shape(&self) -> ArgumentShape {
        match self {
            Self::Positional(_) => ArgumentShape::Positional,
            Self::Keyed(_) => ArgumentShape::Keyed,
        }
    }
}

impl From<Value> for Argument {
    /// A category map handed over on its own is a mapping; everything else
    /// is a single positional value.
    fn from(v: Value) -> Self {
        match v {
            Value::Rules(map) => Self::Keyed(
                map.into_iter()
                    .map(|(k, template)| (k, Value::Str(template)))
                    .collect(),
            ),
            scalar => Self::Positional(vec![scalar]),
        }
    }
}

macro_rules! argument_from_scalar {
    ($($t:ty),*) => {
        $(impl From<$t> for Argument {
            fn from(v: $t) -> Self {
                Self::Positional(vec![Value::from(v)])
            }
        })*
    };
}

argument_from_scalar!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, &str, String);

impl From<Vec<Value>> for Argument {
    fn from(v: Vec<Value>) -> Self {
        Self::Positional(v)
    }
}

impl From<BTreeMap<String, Value>> for Argument {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Self::Keyed(v)
    }
}

impl From<HashMap<String, Value>> for Argument {
    fn from(v: HashMap<String, Value>) -> Self {
        Self::Keyed(v.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Binder
// ---------------------------------------------------------------------------

/// Left-to-right cursor over positional values.
#[derive(Debug, Clone)]
pub struct PositionalCursor<'a> {
    values: &'a [Value],
    next: usize,
}

impl<'a> PositionalCursor<'a> {
    #[must_use]
    pub fn new(values: &'a [Value]) -> Self {
        Self { values, next: 0 }
    }

    /// Next unconsumed value, or `None` once exhausted.
    pub fn next_value(&mut self) -> Option<&'a Value> {
        let value = self.values.get(self.next)?;
        self.next += 1;
        Some(value)
    }

    /// Number of values the caller supplied.
    #[must_use]
    pub fn supplied(&self) -> usize {
        self.values.len()
    }
}

/// Per-call view of an [`Argument`].
#[derive(Debug, Clone)]
pub enum Bindings<'a> {
    Positional(PositionalCursor<'a>),
    Keyed(&'a BTreeMap<String, Value>),
}

impl<'a> Bindings<'a> {
    /// Classify and bind an argument for one substitution pass.
    #[must_use]
    pub fn bind(argument: &'a Argument) -> Self {
        match argument {
            Argument::Positional(values) => Self::Positional(PositionalCursor::new(values)),
            Argument::Keyed(map) => Self::Keyed(map),
        }
    }

    #[must_use]
    pub fn shape(&self) -> ArgumentShape {
        match self {
            Self::Positional(_) => ArgumentShape::Positional,
            Self::Keyed(_) => ArgumentShape::Keyed,
        }
    }
}
