//! Parsed templates.
//!
//! A [`Template`] is built once from its source text and never mutated, so
//! it can be rendered any number of times, from any number of threads.

use crate::directive::{Directive, Parsed, parse_token};
use crate::error::FormatError;
use crate::scanner::Scanner;

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text appended verbatim (escapes already resolved).
    Literal(String),
    Directive(Directive),
}

/// An immutable, parsed template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Scan and parse `source`.
    ///
    /// Adjacent literal runs (including resolved `%%` escapes) are merged.
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let mut segments = Vec::new();
        let mut text = String::new();

        for token in Scanner::new(source) {
            match parse_token(token)? {
                Parsed::Text(t) => text.push_str(t),
                Parsed::Directive(d) => {
                    if !text.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Directive(d));
                }
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Literal(text));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The text this template was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Directives in template order.
    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Directive(d) => Some(d),
            Segment::Literal(_) => None,
        })
    }

    /// Whether rendering can ever differ from the source text.
    #[must_use]
    pub fn has_placeholders(&self) -> bool {
        self.directives().next().is_some()
    }
}

impl std::str::FromStr for Template {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
