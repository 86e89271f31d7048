// src/parser.rs

/// A `{identifier}` placeholder found inside a parameter string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Byte range of the whole token, braces included.
    pub start: usize,
    pub end: usize,
    pub identifier: &'a str,
}

/// Cursor over a parameter string.
pub struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Returns the first well-formed token, scanning left to right.
    ///
    /// Only one token per string is ever honored; anything after the first
    /// match is left as literal text.
    pub fn first_token(&mut self) -> Option<Token<'a>> {
        while !self.eof() {
            if self.peek_char() != Some('{') {
                self.bump();
                continue;
            }
            let start = self.i;
            self.i += 1;
            match self.parse_identifier() {
                Some(identifier) if self.consume_char('}') => {
                    return Some(Token { start, end: self.i, identifier });
                }
                // Not a token; resume right after the brace we tried.
                _ => self.i = start + 1,
            }
        }
        None
    }

    fn parse_identifier(&mut self) -> Option<&'a str> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if is_identifier_char(c) {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
        if self.i == start {
            return None;
        }
        Some(&self.s[start..self.i])
    }

    fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek_char() {
            self.i += c.len_utf8();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
}

/// Convenience over [`Parser::first_token`].
pub fn find_token(s: &str) -> Option<Token<'_>> {
    Parser::new(s).first_token()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn whole_string_token() {
        assert_eq!(
            find_token("{name}"),
            Some(Token { start: 0, end: 6, identifier: "name" })
        );
    }

    #[test]
    fn embedded_token_with_dotted_identifier() {
        let token = find_token("hello {user.first-name_1}!").unwrap();
        assert_eq!(token.identifier, "user.first-name_1");
        assert_eq!(&"hello {user.first-name_1}!"[token.start..token.end], "{user.first-name_1}");
    }

    #[test]
    fn malformed_braces_are_skipped() {
        assert_eq!(find_token("{} { x} {ok}").map(|t| t.identifier), Some("ok"));
        assert_eq!(find_token("{{k}}").map(|t| t.identifier), Some("k"));
        assert_eq!(find_token("{unterminated"), None);
    }

    #[test]
    fn only_first_token_is_reported() {
        assert_eq!(find_token("{a} {b}").map(|t| t.identifier), Some("a"));
    }

    #[test]
    fn plain_text_has_no_token() {
        assert_eq!(find_token("just text, ünïcode"), None);
    }
}
