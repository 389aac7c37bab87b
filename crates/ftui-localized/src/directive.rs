//! Placeholder parser: scanned tokens → typed directives.

use crate::error::FormatError;
use crate::inline::parse_inline_plural;
use crate::scanner::Token;
use crate::sprintf::FormatSpec;
use crate::value::CategoryMap;

/// What a placeholder asks the engine to do.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveKind {
    /// `%spec`: format the next positional value.
    PositionalFormat(FormatSpec),
    /// `%<key>spec`: format the value bound to `key`. Without a spec the
    /// value is stringified.
    NamedFormat {
        key: String,
        spec: Option<FormatSpec>,
    },
    /// `%{key}`: stringify the value bound to `key`.
    NamedValue { key: String },
    /// `%{count_key:rules_key}`: pluralize with rules from the argument.
    PluralReference {
        count_key: String,
        rules_key: String,
    },
    /// `%<{"count_key": {...}}>`: pluralize with inline rules.
    InlinePlural {
        count_key: String,
        forms: CategoryMap,
    },
}

/// A parsed placeholder plus the exact text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    kind: DirectiveKind,
    source: String,
}

impl Directive {
    #[must_use]
    pub fn kind(&self) -> &DirectiveKind {
        &self.kind
    }

    /// Original placeholder text, used verbatim on graceful fallback.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Result of parsing one token.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<'a> {
    Text(&'a str),
    Directive(Directive),
}

/// Convert a scanned token into literal text or a directive.
///
/// Only inline plural bodies can fail. Sprintf specs whose width or
/// precision is out of range come back as literal text.
pub fn parse_token(token: Token<'_>) -> Result<Parsed<'_>, FormatError> {
    let source = token.source();
    let kind = match token {
        Token::Literal(text) => return Ok(Parsed::Text(text)),
        Token::Escape => return Ok(Parsed::Text("%")),
        Token::Conversion { spec, .. } => match FormatSpec::parse(spec) {
            Some(spec) => DirectiveKind::PositionalFormat(spec),
            None => return Ok(Parsed::Text(source)),
        },
        Token::NamedFormat { key, spec, .. } => {
            let spec = match spec.map(FormatSpec::parse) {
                None => None,
                Some(Some(spec)) => Some(spec),
                // Field widths out of range; keep the text.
                Some(None) => return Ok(Parsed::Text(source)),
            };
            DirectiveKind::NamedFormat {
                key: key.to_string(),
                spec,
            }
        }
        Token::NamedValue { key, .. } => DirectiveKind::NamedValue {
            key: key.to_string(),
        },
        Token::PluralReference {
            count_key,
            rules_key,
            ..
        } => DirectiveKind::PluralReference {
            count_key: count_key.to_string(),
            rules_key: rules_key.to_string(),
        },
        Token::InlinePlural { body, .. } => {
            let (count_key, forms) = parse_inline_plural(body).map_err(|reason| {
                FormatError::MalformedInlinePlural {
                    placeholder: source.to_string(),
                    reason,
                }
            })?;
            DirectiveKind::InlinePlural { count_key, forms }
        }
    };
    Ok(Parsed::Directive(Directive {
        kind,
        source: source.to_string(),
    }))
}
