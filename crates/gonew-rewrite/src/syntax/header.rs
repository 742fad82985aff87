//! Header parser - package clause and import declarations
//!
//! Equivalent to an imports-only parse: the package clause is required,
//! any number of import declarations may follow, and parsing stops at the
//! first other top-level declaration.

use super::ident::is_keyword;
use super::lexer::{Lexer, Token, TokenKind};
use super::quote::unquote;
use super::{Span, SyntaxError};

/// The `package` clause of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageClause {
    pub name: String,
    /// Span of the name token
    pub span: Span,
}

/// One import spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit local name: an identifier, `.` or `_`
    pub alias: Option<String>,
    /// The path literal as written, quotes included
    pub literal: String,
    /// Span of the path literal, quotes included
    pub span: Span,
}

impl ImportSpec {
    /// The decoded import path, if the literal is well formed
    pub fn path(&self) -> Option<String> {
        unquote(&self.literal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub package: PackageClause,
    pub imports: Vec<ImportSpec>,
}

/// Parse the package clause and imports of a Go source file
pub fn parse_header(source: &str) -> Result<FileHeader, SyntaxError> {
    HeaderParser::new(source)?.parse()
}

struct HeaderParser<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> HeaderParser<'a> {
    fn new(source: &'a str) -> Result<Self, SyntaxError> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            source,
            lexer,
            current,
        })
    }

    fn advance(&mut self) -> Result<(), SyntaxError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn text(&self) -> &'a str {
        self.current.text(self.source)
    }

    fn is_word(&self, word: &str) -> bool {
        self.current.kind == TokenKind::Ident && self.text() == word
    }

    fn describe(&self) -> String {
        match self.current.kind {
            TokenKind::Eof => "EOF".to_string(),
            TokenKind::Semicolon if self.current.is_automatic_semicolon() => "newline".to_string(),
            _ => format!("'{}'", self.text()),
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        SyntaxError::new(
            self.current.span.start,
            format!("expected {}, found {}", expected, self.describe()),
        )
    }

    /// Consume a statement terminator
    fn expect_semicolon(&mut self) -> Result<(), SyntaxError> {
        match self.current.kind {
            TokenKind::Semicolon => self.advance(),
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("';' or newline")),
        }
    }

    fn parse(mut self) -> Result<FileHeader, SyntaxError> {
        let package = self.parse_package_clause()?;
        let mut imports = Vec::new();

        while self.is_word("import") {
            self.advance()?;
            if self.current.kind == TokenKind::Punct('(') {
                self.advance()?;
                while self.current.kind != TokenKind::Punct(')') {
                    if self.current.kind == TokenKind::Eof {
                        return Err(self.unexpected("')'"));
                    }
                    imports.push(self.parse_import_spec()?);
                    // The last spec of a group may omit its terminator
                    if self.current.kind != TokenKind::Punct(')') {
                        if self.current.kind != TokenKind::Semicolon {
                            return Err(self.unexpected("';', newline or ')'"));
                        }
                        self.advance()?;
                    }
                }
                self.advance()?;
            } else {
                imports.push(self.parse_import_spec()?);
            }
            self.expect_semicolon()?;
        }

        Ok(FileHeader { package, imports })
    }

    fn parse_package_clause(&mut self) -> Result<PackageClause, SyntaxError> {
        if !self.is_word("package") {
            return Err(self.unexpected("'package'"));
        }
        self.advance()?;

        if self.current.kind != TokenKind::Ident || is_keyword(self.text()) {
            return Err(self.unexpected("package name"));
        }
        let clause = PackageClause {
            name: self.text().to_string(),
            span: self.current.span,
        };
        if clause.name == "_" {
            return Err(SyntaxError::new(clause.span.start, "invalid package name _"));
        }
        self.advance()?;
        self.expect_semicolon()?;

        Ok(clause)
    }

    fn parse_import_spec(&mut self) -> Result<ImportSpec, SyntaxError> {
        let alias = match self.current.kind {
            TokenKind::Punct('.') => Some(".".to_string()),
            TokenKind::Ident if !is_keyword(self.text()) => Some(self.text().to_string()),
            _ => None,
        };
        if alias.is_some() {
            self.advance()?;
        }

        match self.current.kind {
            TokenKind::String => {}
            TokenKind::Rune | TokenKind::Number => {
                return Err(SyntaxError::new(
                    self.current.span.start,
                    "import path must be a string",
                ));
            }
            _ => {
                return Err(SyntaxError::new(
                    self.current.span.start,
                    "missing import path",
                ));
            }
        }

        let spec = ImportSpec {
            alias,
            literal: self.text().to_string(),
            span: self.current.span,
        };
        self.advance()?;
        Ok(spec)
    }
}
