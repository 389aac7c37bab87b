//! Error taxonomy for template parsing and substitution.
//!
//! Every variant is fatal for the `format` call that produced it: the
//! caller gets the error and no partial output. Missing pluralization
//! data is not an error: plural placeholders fall back to their own
//! source text.

use std::fmt;

/// Shape of a substitution argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentShape {
    /// A scalar or an ordered sequence, consumed left to right.
    Positional,
    /// A key/value mapping.
    Keyed,
}

impl fmt::Display for ArgumentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional => f.write_str("positional"),
            Self::Keyed => f.write_str("keyed"),
        }
    }
}

/// Errors from template parsing and substitution.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// A `%<{...}>` body is not a valid single-key category mapping.
    MalformedInlinePlural { placeholder: String, reason: String },
    /// A placeholder needs an argument of the other shape.
    ArgumentShapeMismatch {
        placeholder: String,
        expected: ArgumentShape,
    },
    /// A plain named placeholder's key is absent from the mapping.
    MissingRequiredKey { key: String },
    /// More positional placeholders than supplied values.
    PositionalExhausted { placeholder: String, supplied: usize },
    /// A sprintf conversion was applied to an incompatible value.
    FormatConversion { conversion: char, value: String },
    /// Nested plural sub-templates went deeper than the configured ceiling.
    RecursionLimitExceeded { limit: usize },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInlinePlural {
                placeholder,
                reason,
            } => write!(f, "malformed inline plural '{placeholder}': {reason}"),
            Self::ArgumentShapeMismatch {
                placeholder,
                expected,
            } => write!(
                f,
                "argument shape mismatch: '{placeholder}' needs a {expected} argument"
            ),
            Self::MissingRequiredKey { key } => write!(f, "key not found: {key}"),
            Self::PositionalExhausted {
                placeholder,
                supplied,
            } => write!(
                f,
                "too few arguments for '{placeholder}' ({supplied} supplied)"
            ),
            Self::FormatConversion { conversion, value } => {
                write!(f, "cannot format {value} with %{conversion}")
            }
            Self::RecursionLimitExceeded { limit } => {
                write!(f, "plural sub-templates nested deeper than {limit}")
            }
        }
    }
}

impl std::error::Error for FormatError {}
