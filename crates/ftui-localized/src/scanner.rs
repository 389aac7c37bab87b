//! Directive scanner: splits a template into literal runs and placeholders.
//!
//! The scanner is a small deterministic state machine over the template's
//! bytes. It never fails: a `%` that does not start a recognized form is
//! emitted as literal text. All delimiters are ASCII, so every slice
//! boundary falls on a UTF-8 character boundary.
//!
//! Recognized forms, tried in this order at each `%`:
//!
//! | Form | Token |
//! |------|-------|
//! | `%%` | [`Token::Escape`] |
//! | `%{key}` | [`Token::NamedValue`] |
//! | `%{count:rules}` | [`Token::PluralReference`] |
//! | `%<{ json }>` | [`Token::InlinePlural`] |
//! | `%<key>` + optional sprintf tail | [`Token::NamedFormat`] |
//! | `%` + sprintf spec | [`Token::Conversion`] |
//!
//! # Invariants
//!
//! 1. Concatenating [`Token::source`] over all tokens reproduces the input.
//! 2. The scanner is `Clone`; a clone restarts from the clone point.

/// Sprintf flag characters.
const FLAGS: &[u8] = b"-+ 0#";

/// Sprintf conversion characters accepted by the scanner.
pub const CONVERSIONS: &[u8] = b"bBdiuoxXeEfFgGsc";

/// One scanned piece of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text copied verbatim.
    Literal(&'a str),
    /// `%%`, rendered as one `%`.
    Escape,
    /// `%` + sprintf spec; `spec` excludes the leading `%`.
    Conversion { spec: &'a str, source: &'a str },
    /// `%<key>` with an optional sprintf tail.
    NamedFormat {
        key: &'a str,
        spec: Option<&'a str>,
        source: &'a str,
    },
    /// `%{key}`.
    NamedValue { key: &'a str, source: &'a str },
    /// `%{count_key:rules_key}`.
    PluralReference {
        count_key: &'a str,
        rules_key: &'a str,
        source: &'a str,
    },
    /// `%<{...}>`; `body` is the balanced JSON object including its braces.
    InlinePlural { body: &'a str, source: &'a str },
}

impl<'a> Token<'a> {
    /// The exact template text this token was scanned from.
    #[must_use]
    pub fn source(&self) -> &'a str {
        match *self {
            Self::Literal(text) => text,
            Self::Escape => "%%",
            Self::Conversion { source, .. }
            | Self::NamedFormat { source, .. }
            | Self::NamedValue { source, .. }
            | Self::PluralReference { source, .. }
            | Self::InlinePlural { source, .. } => source,
        }
    }
}

/// Lazy token iterator over a template.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = &self.src[self.pos..];
        if rest.is_empty() {
            return None;
        }

        if !rest.starts_with('%') {
            let end = rest.find('%').unwrap_or(rest.len());
            self.pos += end;
            return Some(Token::Literal(&rest[..end]));
        }

        match scan_placeholder(rest) {
            Some((token, len)) => {
                self.pos += len;
                Some(token)
            }
            None => {
                self.pos += 1;
                Some(Token::Literal(&rest[..1]))
            }
        }
    }
}

/// Scan one placeholder at the start of `rest` (which begins with `%`).
///
/// Returns the token and the number of bytes it spans.
fn scan_placeholder(rest: &str) -> Option<(Token<'_>, usize)> {
    let bytes = rest.as_bytes();
    match bytes.get(1)? {
        b'%' => Some((Token::Escape, 2)),
        b'{' => {
            let key_end = ident_end(bytes, 2)?;
            let key = &rest[2..key_end];
            match bytes.get(key_end)? {
                b'}' => {
                    let len = key_end + 1;
                    Some((
                        Token::NamedValue {
                            key,
                            source: &rest[..len],
                        },
                        len,
                    ))
                }
                b':' => {
                    let rules_end = ident_end(bytes, key_end + 1)?;
                    if bytes.get(rules_end) != Some(&b'}') {
                        return None;
                    }
                    let len = rules_end + 1;
                    Some((
                        Token::PluralReference {
                            count_key: key,
                            rules_key: &rest[key_end + 1..rules_end],
                            source: &rest[..len],
                        },
                        len,
                    ))
                }
                _ => None,
            }
        }
        b'<' if bytes.get(2) == Some(&b'{') => {
            let close = balanced_object_end(bytes, 2)?;
            if bytes.get(close + 1) != Some(&b'>') {
                return None;
            }
            let len = close + 2;
            Some((
                Token::InlinePlural {
                    body: &rest[2..=close],
                    source: &rest[..len],
                },
                len,
            ))
        }
        b'<' => {
            let key_end = ident_end(bytes, 2)?;
            if bytes.get(key_end) != Some(&b'>') {
                return None;
            }
            let tail_start = key_end + 1;
            let tail = spec_len(&bytes[tail_start..]);
            let len = tail_start + tail.unwrap_or(0);
            Some((
                Token::NamedFormat {
                    key: &rest[2..key_end],
                    spec: tail.map(|n| &rest[tail_start..tail_start + n]),
                    source: &rest[..len],
                },
                len,
            ))
        }
        _ => {
            let n = spec_len(&bytes[1..])?;
            let len = 1 + n;
            Some((
                Token::Conversion {
                    spec: &rest[1..len],
                    source: &rest[..len],
                },
                len,
            ))
        }
    }
}

/// End of an identifier (`[A-Za-z0-9_]+`) starting at `start`.
fn ident_end(bytes: &[u8], start: usize) -> Option<usize> {
    let len = bytes[start.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    (len > 0).then_some(start + len)
}

/// Length of a sprintf spec (flags, width, precision, conversion) at the
/// start of `bytes`, or `None` if no conversion character terminates it.
fn spec_len(bytes: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() && FLAGS.contains(&bytes[i]) {
        i += 1;
    }
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    let conv = bytes.get(i)?;
    CONVERSIONS.contains(conv).then_some(i + 1)
}

/// Index of the `}` closing the JSON object that opens at `start`.
///
/// Braces inside string literals do not count toward nesting.
fn balanced_object_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
