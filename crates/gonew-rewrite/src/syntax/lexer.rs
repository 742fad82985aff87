//! Go lexer - tokenizes the leading part of a Go source file
//!
//! Follows the Go scanner closely enough for the package clause and import
//! declarations: identifiers, literals, comments, punctuation and automatic
//! semicolon insertion at line ends. The lexer is pull-based so callers stop
//! it as soon as they have what they need.

use super::ident::{is_ident_continue, is_ident_start, is_keyword};
use super::{Span, SyntaxError};

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// An identifier or keyword
    Ident,
    /// An interpreted "..." or raw `...` string literal
    String,
    /// A rune literal '...'
    Rune,
    /// A numeric literal
    Number,
    /// Operator or delimiter (`++` and `--` are a single token)
    Punct(char),
    /// `;`, or a semicolon inserted at a line end (empty span)
    Semicolon,
    /// End of input
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.text(source)
    }

    /// Whether this is a semicolon inserted by the lexer
    pub fn is_automatic_semicolon(&self) -> bool {
        self.kind == TokenKind::Semicolon && self.span.is_empty()
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    /// Whether a newline at this point terminates a statement
    insert_semi: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let position = if input.starts_with(BOM) {
            BOM.len_utf8()
        } else {
            0
        };
        Self {
            input,
            position,
            insert_semi: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.position..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn automatic_semicolon(&mut self, at: usize) -> Token {
        self.insert_semi = false;
        Token::new(TokenKind::Semicolon, at, at)
    }

    /// Skip whitespace and comments, returning an automatic semicolon if a
    /// line end was crossed where one is required
    fn skip_trivia(&mut self) -> Result<Option<Token>, SyntaxError> {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    if self.insert_semi {
                        let at = self.position;
                        self.advance();
                        return Ok(Some(self.automatic_semicolon(at)));
                    }
                    self.advance();
                }
                '/' if self.peek_second() == Some('/') => {
                    if self.insert_semi {
                        // The comment runs to the line end, which ends the statement
                        return Ok(Some(self.automatic_semicolon(self.position)));
                    }
                    let rest = &self.input[self.position..];
                    self.position += rest.find('\n').unwrap_or(rest.len());
                }
                '/' if self.peek_second() == Some('*') => {
                    let start = self.position;
                    let body = &self.input[start + 2..];
                    let Some(close) = body.find("*/") else {
                        return Err(SyntaxError::new(start, "comment not terminated"));
                    };
                    self.position = start + 2 + close + 2;
                    if self.insert_semi && body[..close].contains('\n') {
                        return Ok(Some(self.automatic_semicolon(start)));
                    }
                }
                _ => break,
            }
        }
        Ok(None)
    }

    /// Read the next token
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        if let Some(semi) = self.skip_trivia()? {
            return Ok(semi);
        }

        let start = self.position;
        let Some(ch) = self.advance() else {
            if self.insert_semi {
                return Ok(self.automatic_semicolon(start));
            }
            return Ok(Token::new(TokenKind::Eof, start, start));
        };

        self.insert_semi = false;
        let kind = match ch {
            c if is_ident_start(c) => {
                while self.peek().is_some_and(is_ident_continue) {
                    self.advance();
                }
                let word = &self.input[start..self.position];
                self.insert_semi = !is_keyword(word)
                    || matches!(word, "break" | "continue" | "fallthrough" | "return");
                TokenKind::Ident
            }
            c if c.is_ascii_digit() => {
                self.read_number(c);
                TokenKind::Number
            }
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number(ch);
                TokenKind::Number
            }
            '"' => {
                self.read_quoted(start, '"', "string literal not terminated")?;
                self.insert_semi = true;
                TokenKind::String
            }
            '\'' => {
                self.read_quoted(start, '\'', "rune literal not terminated")?;
                self.insert_semi = true;
                TokenKind::Rune
            }
            '`' => {
                let rest = &self.input[self.position..];
                let Some(close) = rest.find('`') else {
                    return Err(SyntaxError::new(start, "raw string literal not terminated"));
                };
                self.position += close + 1;
                self.insert_semi = true;
                TokenKind::String
            }
            ';' => TokenKind::Semicolon,
            ')' | ']' | '}' => {
                self.insert_semi = true;
                TokenKind::Punct(ch)
            }
            '+' | '-' if self.peek() == Some(ch) => {
                self.advance();
                self.insert_semi = true;
                TokenKind::Punct(ch)
            }
            '#' | '$' | '?' | '@' | '\\' => return Err(invalid_character(start, ch)),
            c if c.is_ascii_punctuation() => TokenKind::Punct(c),
            c => return Err(invalid_character(start, c)),
        };

        Ok(Token::new(kind, start, self.position))
    }

    fn read_number(&mut self, first: char) {
        let mut prev = first;
        while let Some(c) = self.peek() {
            let exponent_sign = matches!(c, '+' | '-') && matches!(prev, 'e' | 'E' | 'p' | 'P');
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                self.advance();
                prev = c;
            } else {
                break;
            }
        }
        self.insert_semi = true;
    }

    /// Read the rest of an interpreted literal whose opening quote was consumed
    fn read_quoted(&mut self, start: usize, quote: char, message: &str) -> Result<(), SyntaxError> {
        loop {
            match self.advance() {
                None | Some('\n') => return Err(SyntaxError::new(start, message)),
                Some('\\') => {
                    if matches!(self.advance(), None | Some('\n')) {
                        return Err(SyntaxError::new(start, message));
                    }
                }
                Some(c) if c == quote => return Ok(()),
                Some(_) => {}
            }
        }
    }
}

fn invalid_character(offset: usize, ch: char) -> SyntaxError {
    SyntaxError::new(
        offset,
        format!("invalid character U+{:04X} {:?}", ch as u32, ch),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            out.push(token.kind);
            if token.kind == TokenKind::Eof {
                return out;
            }
        }
    }

    #[test]
    fn test_package_clause_tokens() {
        assert_eq!(
            kinds("package main\n"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Semicolon, TokenKind::Eof]
        );
    }

    #[test]
    fn test_semicolon_inserted_at_eof() {
        assert_eq!(
            kinds("package main"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Semicolon, TokenKind::Eof]
        );
    }

    #[test]
    fn test_no_semicolon_after_import_keyword() {
        assert_eq!(
            kinds("import\n(\n\"fmt\"\n)\n"),
            vec![
                TokenKind::Ident,
                TokenKind::Punct('('),
                TokenKind::String,
                TokenKind::Semicolon,
                TokenKind::Punct(')'),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        let input = "// Package x does things.\npackage x // trailing\n/* block */ import \"fmt\"";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Ident,
                TokenKind::String,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_multiline_block_comment_ends_statement() {
        assert_eq!(
            kinds("package x /*\n*/ import"),
            vec![
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_spans_include_quotes() {
        let input = "import `raw/path` \"a\\\"b\"";
        let mut lexer = Lexer::new(input);
        lexer.next_token().unwrap();
        let raw = lexer.next_token().unwrap();
        assert_eq!(raw.text(input), "`raw/path`");
        let interpreted = lexer.next_token().unwrap();
        assert_eq!(interpreted.text(input), "\"a\\\"b\"");
    }

    #[test]
    fn test_bom_skipped() {
        let input = "\u{feff}package p";
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token.span.start, 3);
        assert_eq!(token.text(input), "package");
    }

    #[test]
    fn test_numbers_and_runes() {
        assert_eq!(
            kinds("1.5e+3 'x'"),
            vec![TokenKind::Number, TokenKind::Rune, TokenKind::Semicolon, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_literals() {
        let mut lexer = Lexer::new("import \"fmt\nfunc");
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.offset, 7);
        assert_eq!(err.message, "string literal not terminated");

        let err = Lexer::new("`abc").next_token().unwrap_err();
        assert_eq!(err.message, "raw string literal not terminated");

        let err = Lexer::new("/* abc").next_token().unwrap_err();
        assert_eq!(err.message, "comment not terminated");
    }

    #[test]
    fn test_invalid_character() {
        let err = Lexer::new("  #include").next_token().unwrap_err();
        assert_eq!(err.offset, 2);
        assert!(err.message.contains("U+0023"));
    }
}
