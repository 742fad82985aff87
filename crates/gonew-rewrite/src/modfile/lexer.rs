//! go.mod lexer - tokenizes manifest input

use super::{ModfileError, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A bare word or a quoted string, kept exactly as written
    Word,
    /// A `//` comment, without its line ending
    Comment,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// Line end; the one ending an own-line comment is part of the comment
    Newline,
    /// End of file
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub position: Position,
    /// For comments: nothing but whitespace precedes it on its line
    pub own_line: bool,
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    /// Whether the current line has produced a token yet
    line_has_token: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            column: 1,
            line_has_token: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
            self.line_has_token = false;
        } else {
            self.column += ch.len_utf8();
        }
        Some(ch)
    }

    fn here(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn error(position: Position, message: impl Into<String>) -> ModfileError {
        ModfileError::new(position.line, position.column, message)
    }

    /// Tokenize the whole input
    pub fn tokenize(&mut self) -> Result<Vec<Token<'a>>, ModfileError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token<'a>, ModfileError> {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    let position = self.here();
                    self.advance();
                    return Ok(Token {
                        kind: TokenKind::Newline,
                        text: "\n",
                        position,
                        own_line: false,
                    });
                }
                _ => break,
            }
        }

        let start = self.position;
        let position = self.here();
        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                text: "",
                position,
                own_line: false,
            });
        };

        if self.rest().starts_with("//") {
            let own_line = !self.line_has_token;
            let len = self.rest().find('\n').unwrap_or(self.rest().len());
            for _ in self.input[start..start + len].chars() {
                self.advance();
            }
            let text = &self.input[start..start + len];
            if own_line && self.peek() == Some('\n') {
                self.advance();
            } else {
                self.line_has_token = true;
            }
            return Ok(Token {
                kind: TokenKind::Comment,
                text,
                position,
                own_line,
            });
        }
        if self.rest().starts_with("/*") {
            return Err(Self::error(position, "block comments are not allowed in go.mod; use //"));
        }

        self.line_has_token = true;
        let kind = match ch {
            '(' => {
                self.advance();
                TokenKind::LeftParen
            }
            ')' => {
                self.advance();
                TokenKind::RightParen
            }
            '"' => {
                self.advance();
                self.read_interpreted(position)?;
                TokenKind::Word
            }
            '`' => {
                self.advance();
                loop {
                    match self.advance() {
                        None => return Err(Self::error(position, "unterminated raw string")),
                        Some('`') => break,
                        Some(_) => {}
                    }
                }
                TokenKind::Word
            }
            _ => {
                while let Some(c) = self.peek() {
                    let rest = self.rest();
                    if c.is_whitespace()
                        || matches!(c, '(' | ')' | '"' | '`')
                        || rest.starts_with("//")
                        || rest.starts_with("/*")
                    {
                        break;
                    }
                    self.advance();
                }
                TokenKind::Word
            }
        };

        Ok(Token {
            kind,
            text: &self.input[start..self.position],
            position,
            own_line: false,
        })
    }

    fn read_interpreted(&mut self, position: Position) -> Result<(), ModfileError> {
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(Self::error(position, "unterminated quoted string"));
                }
                Some('\\') => {
                    if matches!(self.advance(), None | Some('\n')) {
                        return Err(Self::error(position, "unterminated quoted string"));
                    }
                }
                Some('"') => return Ok(()),
                Some(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text.to_string()))
            .collect()
    }

    #[test]
    fn test_module_line() {
        assert_eq!(
            lex("module example.com/hello\n"),
            vec![
                (TokenKind::Word, "module".to_string()),
                (TokenKind::Word, "example.com/hello".to_string()),
                (TokenKind::Newline, "\n".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_block_and_replace_arrow() {
        let kinds: Vec<_> = lex("replace (\n\ta => ../a\n)\n")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word,
                TokenKind::LeftParen,
                TokenKind::Newline,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Newline,
                TokenKind::RightParen,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_own_line_comment_swallows_newline() {
        let tokens = Lexer::new("// header\nmodule m // tail\n").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert!(tokens[0].own_line);
        assert_eq!(tokens[1].text, "module");
        assert_eq!(tokens[3].kind, TokenKind::Comment);
        assert!(!tokens[3].own_line);
        assert_eq!(tokens[3].text, "// tail");
        assert_eq!(tokens[4].kind, TokenKind::Newline);
    }

    #[test]
    fn test_blank_line_is_bare_newline() {
        let kinds: Vec<_> = lex("a\n\nb").into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word,
                TokenKind::Newline,
                TokenKind::Newline,
                TokenKind::Word,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_words() {
        let tokens = lex("module \"example.com/with space\" `raw`\n");
        assert_eq!(tokens[1].1, "\"example.com/with space\"");
        assert_eq!(tokens[2].1, "`raw`");
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("module m\n\ngo 1.21\n").tokenize().unwrap();
        let go = tokens.iter().find(|t| t.text == "go").unwrap();
        assert_eq!(go.position, Position { line: 3, column: 1 });
    }

    #[test]
    fn test_errors() {
        let err = Lexer::new("module \"unterminated\n").tokenize().unwrap_err();
        assert_eq!(err.to_string(), "go.mod:1:8: unterminated quoted string");

        let err = Lexer::new("/* nope */").tokenize().unwrap_err();
        assert_eq!((err.line, err.column), (1, 1));
    }
}
