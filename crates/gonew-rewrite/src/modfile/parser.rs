//! go.mod parser - builds a syntax tree from tokens
//!
//! Lax: any verb is accepted and kept. Only the shape of lines, blocks and
//! comments is checked here.

use super::ast::{Comments, FileSyntax, Line, LineBlock, Stmt};
use super::lexer::{Lexer, Token, TokenKind};
use super::{ModfileError, Position};

pub struct ModParser<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
}

impl<'a> ModParser<'a> {
    pub fn new(input: &'a str) -> Result<Self, ModfileError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    fn current(&self) -> &Token<'a> {
        // The token list always ends with Eof
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> ModfileError {
        let position = self.current().position;
        ModfileError::new(position.line, position.column, message)
    }

    /// Whether the current token ends a line (a suffix comment counts)
    fn at_line_end(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Newline | TokenKind::Eof | TokenKind::Comment
        )
    }

    /// Consume an optional suffix comment and the line ending after it
    fn finish_line(&mut self) -> Result<Option<String>, ModfileError> {
        let mut suffix = None;
        if self.kind() == TokenKind::Comment {
            suffix = Some(self.current().text.to_string());
            self.advance();
        }
        match self.kind() {
            TokenKind::Newline => {
                self.advance();
                Ok(suffix)
            }
            TokenKind::Eof => Ok(suffix),
            _ => Err(self.error("syntax error: expected end of line")),
        }
    }

    pub fn parse(&mut self) -> Result<FileSyntax, ModfileError> {
        let mut stmts = Vec::new();
        let mut pending: Vec<String> = Vec::new();

        loop {
            match self.kind() {
                TokenKind::Newline => {
                    // A blank line detaches the comments above it
                    self.advance();
                    if !pending.is_empty() {
                        stmts.push(Stmt::Comments(std::mem::take(&mut pending)));
                    }
                }
                TokenKind::Comment => {
                    pending.push(self.current().text.to_string());
                    self.advance();
                }
                TokenKind::Eof => {
                    if !pending.is_empty() {
                        stmts.push(Stmt::Comments(std::mem::take(&mut pending)));
                    }
                    return Ok(FileSyntax { stmts });
                }
                TokenKind::RightParen => return Err(self.error("syntax error: unexpected ')'")),
                TokenKind::LeftParen => return Err(self.error("syntax error: unexpected '('")),
                TokenKind::Word => {
                    let mut stmt = self.parse_stmt()?;
                    let before = std::mem::take(&mut pending);
                    match &mut stmt {
                        Stmt::Line(line) => line.comments.before = before,
                        Stmt::Block(block) => block.comments.before = before,
                        Stmt::Comments(_) => {}
                    }
                    stmts.push(stmt);
                }
            }
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ModfileError> {
        let position = self.current().position;
        let mut tokens = Vec::new();

        loop {
            match self.kind() {
                TokenKind::Word => {
                    tokens.push(self.current().text.to_string());
                    self.advance();
                }
                TokenKind::LeftParen => {
                    self.advance();
                    if self.at_line_end() {
                        let suffix = self.finish_line()?;
                        return self.parse_block(tokens, suffix, position).map(Stmt::Block);
                    }
                    if self.kind() == TokenKind::RightParen {
                        self.advance();
                        if self.at_line_end() {
                            let suffix = self.finish_line()?;
                            return Ok(Stmt::Block(LineBlock {
                                comments: Comments::default(),
                                verb: tokens,
                                lines: Vec::new(),
                                close: Comments {
                                    before: Vec::new(),
                                    suffix,
                                },
                                position,
                            }));
                        }
                        tokens.push("()".to_string());
                    } else {
                        // '(' in the middle of a line is an ordinary token
                        tokens.push("(".to_string());
                    }
                }
                TokenKind::RightParen => {
                    tokens.push(")".to_string());
                    self.advance();
                }
                TokenKind::Comment | TokenKind::Newline | TokenKind::Eof => {
                    let suffix = self.finish_line()?;
                    return Ok(Stmt::Line(Line {
                        comments: Comments {
                            before: Vec::new(),
                            suffix,
                        },
                        tokens,
                        position,
                    }));
                }
            }
        }
    }

    fn parse_block(
        &mut self,
        verb: Vec<String>,
        open_suffix: Option<String>,
        position: Position,
    ) -> Result<LineBlock, ModfileError> {
        let mut lines: Vec<Line> = Vec::new();
        let mut pending: Vec<String> = Vec::new();

        loop {
            match self.kind() {
                TokenKind::Newline => {
                    self.advance();
                    // Keep at most one blank line, never at the top of the block
                    let keep = match pending.last() {
                        Some(last) => !last.is_empty(),
                        None => !lines.is_empty(),
                    };
                    if keep {
                        pending.push(String::new());
                    }
                }
                TokenKind::Comment => {
                    pending.push(self.current().text.to_string());
                    self.advance();
                }
                TokenKind::Eof => {
                    return Err(ModfileError::new(
                        position.line,
                        position.column,
                        "syntax error: unterminated block",
                    ));
                }
                TokenKind::LeftParen => {
                    return Err(self.error("syntax error: unexpected '(' in block"));
                }
                TokenKind::RightParen => {
                    self.advance();
                    while pending.last().is_some_and(|c| c.is_empty()) {
                        pending.pop();
                    }
                    if !self.at_line_end() {
                        return Err(self.error("syntax error: expected newline after ')'"));
                    }
                    let suffix = self.finish_line()?;
                    return Ok(LineBlock {
                        comments: Comments {
                            before: Vec::new(),
                            suffix: open_suffix,
                        },
                        verb,
                        lines,
                        close: Comments {
                            before: pending,
                            suffix,
                        },
                        position,
                    });
                }
                TokenKind::Word => {
                    let mut line = self.parse_block_line()?;
                    line.comments.before = std::mem::take(&mut pending);
                    lines.push(line);
                }
            }
        }
    }

    fn parse_block_line(&mut self) -> Result<Line, ModfileError> {
        let position = self.current().position;
        let mut tokens = Vec::new();
        while self.kind() == TokenKind::Word {
            tokens.push(self.current().text.to_string());
            self.advance();
        }
        if matches!(self.kind(), TokenKind::LeftParen | TokenKind::RightParen) {
            return Err(self.error("syntax error: unexpected parenthesis in block line"));
        }
        let suffix = self.finish_line()?;
        Ok(Line {
            comments: Comments {
                before: Vec::new(),
                suffix,
            },
            tokens,
            position,
        })
    }
}
