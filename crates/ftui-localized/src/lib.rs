#![forbid(unsafe_code)]

//! Locale-aware string formatting for FrankenTUI.
//!
//! One call substitutes a single [`Argument`] into a template that may mix:
//!
//! - sprintf conversions (`%05.1f`, `%-8s`, `%#x`) consuming positional values,
//! - named formats (`%<key>.2f`) and named values (`%{key}`) from a keyed argument,
//! - plural references (`%{count:rules}`) whose rules map sits in the argument,
//! - inline plurals (`%<{"count": {"one": "...", "other": "..."}}>`),
//! - `%%` for a literal percent.
//!
//! Plural categories follow CLDR rules for the call's locale. The selected
//! sub-template is rendered recursively against the same argument.
//!
//! # Example
//!
//! ```
//! use ftui_localized::{Argument, Value, format};
//!
//! let arg = Argument::keyed([("n", Value::from(3)), ("who", Value::from("Ana"))]);
//! let out = format(
//!     r#"%{who} has %<{"n": {"one": "1 message", "other": "%{n} messages"}}>"#,
//!     &arg,
//!     "en",
//! )
//! .unwrap();
//! assert_eq!(out, "Ana has 3 messages");
//! ```
//!
//! # Modules
//!
//! - [`scanner`]: splits a template into literal runs and placeholder tokens
//! - [`directive`]: turns tokens into typed directives
//! - [`template`]: immutable parsed templates
//! - [`sprintf`]: conversion specs and their rendering
//! - [`plural`]: CLDR categories and per-locale rules
//! - [`resolver`]: category lookup in a plural rules map
//! - [`engine`]: the substitution pass
//! - [`localized`]: locale-tagged strings

pub mod config;
pub mod directive;
pub mod engine;
pub mod error;
pub mod inline;
pub mod localized;
pub mod plural;
pub mod resolver;
pub mod scanner;
pub mod sprintf;
pub mod template;
pub mod value;

pub use config::FormatConfig;
pub use directive::{Directive, DirectiveKind};
pub use engine::{Formatter, format};
pub use error::{ArgumentShape, FormatError};
pub use localized::{Localize, LocalizedString, NumberSymbols};
pub use plural::{CldrClassifier, PluralCategory, PluralClassifier, PluralRule};
pub use resolver::{PluralResolver, Resolution};
pub use scanner::{Scanner, Token};
pub use sprintf::FormatSpec;
pub use template::{Segment, Template};
pub use value::{Argument, Bindings, CategoryMap, PositionalCursor, Value};
