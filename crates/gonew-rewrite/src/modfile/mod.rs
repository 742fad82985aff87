//! go.mod manifest parsing and printing
//!
//! The manifest is a line-oriented format:
//! - `verb args...` lines, e.g. `module example.com/m` or `go 1.21`
//! - factored blocks: `require (` ... `)` with one entry per line
//! - `//` comments, kept and re-attached when printing
//! - bare words or Go-quoted strings as tokens
//!
//! Parsing is lax: verbs other than `module` are carried through without
//! interpretation, so manifests written for newer toolchains still round-trip.

pub mod ast;
pub mod lexer;
pub mod parser;
mod print;

pub use ast::{Comments, FileSyntax, Line, LineBlock, Stmt};

use thiserror::Error;

use crate::syntax::offset_to_line_column;
use crate::syntax::quote::{quote, unquote};
use parser::ModParser;

/// A line/column position in a manifest (1-based)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A manifest that could not be parsed or rewritten
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("go.mod:{line}:{column}: {message}")]
pub struct ModfileError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ModfileError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }

    fn at(position: Position, message: impl Into<String>) -> Self {
        Self::new(position.line, position.column, message)
    }
}

/// Where the module statement lives in the syntax tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleLocation {
    /// A top-level `module path` line
    Line(usize),
    /// An entry of a `module ( ... )` block
    InBlock(usize, usize),
}

/// A parsed go.mod file
#[derive(Debug, Clone)]
pub struct ModFile {
    syntax: FileSyntax,
    module: Option<ModuleLocation>,
}

impl ModFile {
    /// Parse manifest bytes, accepting any directive verbs
    pub fn parse_lax(data: &[u8]) -> Result<Self, ModfileError> {
        let input = std::str::from_utf8(data).map_err(|e| {
            let (line, column) = offset_to_line_column(data, e.valid_up_to());
            ModfileError::new(line, column, "invalid UTF-8 encoding")
        })?;
        let syntax = ModParser::new(input)?.parse()?;
        let module = find_module(&syntax)?;
        Ok(Self { syntax, module })
    }

    pub fn syntax(&self) -> &FileSyntax {
        &self.syntax
    }

    /// The declared module path, decoded
    pub fn module_path(&self) -> Option<String> {
        let token = match self.module? {
            ModuleLocation::Line(i) => match &self.syntax.stmts[i] {
                Stmt::Line(line) => line.tokens.get(1)?,
                _ => return None,
            },
            ModuleLocation::InBlock(i, j) => match &self.syntax.stmts[i] {
                Stmt::Block(block) => block.lines.get(j)?.tokens.first()?,
                _ => return None,
            },
        };
        decode_token(token)
    }

    /// Set the module path, adding a module statement if there is none
    pub fn set_module_path(&mut self, path: &str) {
        let token = auto_quote(path);

        match self.module {
            Some(ModuleLocation::Line(i)) => {
                if let Stmt::Line(line) = &mut self.syntax.stmts[i] {
                    line.tokens = vec!["module".to_string(), token];
                }
            }
            Some(ModuleLocation::InBlock(i, j)) => {
                if let Stmt::Block(block) = &mut self.syntax.stmts[i] {
                    block.lines[j].tokens = vec![token];
                }
            }
            None => {
                // After any detached leading comments, before everything else
                let at = self
                    .syntax
                    .stmts
                    .iter()
                    .position(|stmt| !matches!(stmt, Stmt::Comments(_)))
                    .unwrap_or(self.syntax.stmts.len());
                self.syntax
                    .stmts
                    .insert(at, Stmt::Line(Line::new(vec!["module".to_string(), token])));
                self.module = Some(ModuleLocation::Line(at));
            }
        }
    }

    /// Print the manifest in canonical layout
    pub fn format(&self) -> String {
        print::format(&self.syntax)
    }
}

fn find_module(syntax: &FileSyntax) -> Result<Option<ModuleLocation>, ModfileError> {
    let mut found: Option<ModuleLocation> = None;
    let mut record = |location: ModuleLocation, position: Position, token: &str| {
        if found.is_some() {
            return Err(ModfileError::at(position, "repeated module statement"));
        }
        if decode_token(token).is_none() {
            return Err(ModfileError::at(position, format!("invalid quoted string {}", token)));
        }
        found = Some(location);
        Ok(())
    };

    for (i, stmt) in syntax.stmts.iter().enumerate() {
        if stmt.verb() != Some("module") {
            continue;
        }
        match stmt {
            Stmt::Line(line) => {
                if line.tokens.len() != 2 {
                    return Err(ModfileError::at(line.position, "usage: module module/path"));
                }
                record(ModuleLocation::Line(i), line.position, &line.tokens[1])?;
            }
            Stmt::Block(block) => {
                if block.verb.len() != 1 {
                    return Err(ModfileError::at(block.position, "usage: module module/path"));
                }
                for (j, line) in block.lines.iter().enumerate() {
                    if line.tokens.len() != 1 {
                        return Err(ModfileError::at(line.position, "usage: module module/path"));
                    }
                    record(ModuleLocation::InBlock(i, j), line.position, &line.tokens[0])?;
                }
            }
            Stmt::Comments(_) => {}
        }
    }

    Ok(found)
}

/// Decode a token that may be a quoted string
fn decode_token(token: &str) -> Option<String> {
    if token.starts_with('"') || token.starts_with('`') {
        unquote(token)
    } else {
        Some(token.to_string())
    }
}

/// Whether `s` has to be quoted to survive as a single manifest token
pub fn must_quote(s: &str) -> bool {
    if s.is_empty() || s.contains("//") || s.contains("/*") {
        return true;
    }
    s.chars().any(|c| match c {
        ' ' | '"' | '\'' | '`' => true,
        '(' | ')' | '[' | ']' | '{' | '}' | ',' => s.len() > 1,
        c => c.is_control() || c.is_whitespace(),
    })
}

/// Quote `s` only when it cannot be written bare
pub fn auto_quote(s: &str) -> String {
    if must_quote(s) {
        quote(s)
    } else {
        s.to_string()
    }
}
