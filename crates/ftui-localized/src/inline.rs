//! Recursive-descent parser for inline plural bodies.
//!
//! The body of `%<{...}>` is a JSON object with exactly one key, the count
//! key, whose value is an object of category tag → template string:
//!
//! ```text
//! { "horses_count": { "one": "1 horse", "other": "%{horses_count} horses" } }
//! ```
//!
//! Only the subset of JSON this shape needs is accepted: objects, strings
//! (with the standard escapes, including surrogate pairs) and whitespace.
//! Numbers, arrays, booleans and null are rejected.

use crate::value::CategoryMap;

/// Parse an inline plural body into its count key and category map.
///
/// The error string describes the first syntax problem and its byte offset.
pub fn parse_inline_plural(body: &str) -> Result<(String, CategoryMap), String> {
    let mut cursor = Cursor::new(body);
    cursor.skip_ws();

    let mut count_key = None;
    cursor.object(|cursor, key| {
        if count_key.is_some() {
            return Err(cursor.error("expected a single count key"));
        }
        let mut forms = CategoryMap::new();
        cursor.object(|cursor, tag| {
            let template = cursor.string()?;
            forms.insert(tag, template);
            Ok(())
        })?;
        count_key = Some((key, forms));
        Ok(())
    })?;

    cursor.skip_ws();
    if !cursor.at_end() {
        return Err(cursor.error("trailing characters after object"));
    }
    count_key.ok_or_else(|| cursor.error("expected a count key"))
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self, msg: &str) -> String {
        format!("{msg} at byte {}", self.pos)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, want: char) -> Result<(), String> {
        if self.peek() == Some(want) {
            self.pos += want.len_utf8();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{want}'")))
        }
    }

    /// Parse `{ "key": <member>, ... }`, handing each key to `member`,
    /// which must consume the member's value.
    fn object<F>(&mut self, mut member: F) -> Result<(), String>
    where
        F: FnMut(&mut Self, String) -> Result<(), String>,
    {
        self.skip_ws();
        self.expect('{')?;
        self.skip_ws();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            self.skip_ws();
            let key = self.string()?;
            self.skip_ws();
            self.expect(':')?;
            self.skip_ws();
            member(self, key)?;
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(()),
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn string(&mut self) -> Result<String, String> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some('"') => return Ok(out),
                Some('\\') => out.push(self.escape()?),
                Some(c) if c < ' ' => return Err(self.error("control character in string")),
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, String> {
        match self.bump() {
            Some('"') => Ok('"'),
            Some('\\') => Ok('\\'),
            Some('/') => Ok('/'),
            Some('b') => Ok('\u{8}'),
            Some('f') => Ok('\u{c}'),
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('u') => {
                let high = self.hex4()?;
                if (0xD800..0xDC00).contains(&high) {
                    self.expect('\\')?;
                    self.expect('u')?;
                    let low = self.hex4()?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(self.error("invalid low surrogate"));
                    }
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    char::from_u32(code).ok_or_else(|| self.error("invalid code point"))
                } else {
                    char::from_u32(high).ok_or_else(|| self.error("lone surrogate"))
                }
            }
            _ => Err(self.error("invalid escape")),
        }
    }

    fn hex4(&mut self) -> Result<u32, String> {
        let digits = self
            .src
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.error("truncated \\u escape"))?;
        let code =
            u32::from_str_radix(digits, 16).map_err(|_| self.error("invalid \\u escape"))?;
        self.pos += 4;
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_count_key_and_forms() {
        let (key, forms) = parse_inline_plural(
            r#"{ "horses_count": { "one": "1 horse", "other": "%{horses_count} horses" } }"#,
        )
        .expect("valid body");
        assert_eq!(key, "horses_count");
        assert_eq!(forms.len(), 2);
        assert_eq!(forms["one"], "1 horse");
        assert_eq!(forms["other"], "%{horses_count} horses");
    }

    #[test]
    fn compact_and_empty_forms() {
        let (key, forms) = parse_inline_plural(r#"{"n":{}}"#).expect("valid body");
        assert_eq!(key, "n");
        assert!(forms.is_empty());
    }

    #[test]
    fn escapes() {
        let (_, forms) = parse_inline_plural(r#"{"n": {"other": "a\"b\\c\né😀"}}"#)
            .expect("valid body");
        assert_eq!(forms["other"], "a\"b\\c\né😀");
    }

    #[test]
    fn rejects_malformed_bodies() {
        for body in [
            r#"{}"#,
            r#"{"a": {}, "b": {}}"#,
            r#"{"n": "other"}"#,
            r#"{"n": {"other": 1}}"#,
            r#"{"n": {"other": "x",}}"#,
            r#"{"n": {"other": "x"}} extra"#,
            r#"{n: {"other": "x"}}"#,
            r#"{"n": {"other": "\q"}}"#,
            r#"{"n": {"other": "\ud800"}}"#,
            r#"{"n" {"other": "x"}}"#,
        ] {
            assert!(
                parse_inline_plural(body).is_err(),
                "should reject {body:?}"
            );
        }
    }

    #[test]
    fn error_mentions_offset() {
        let err = parse_inline_plural(r#"{"n": 5}"#).unwrap_err();
        assert!(err.contains("at byte 6"), "{err}");
    }
}
