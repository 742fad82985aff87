//! go.mod syntax tree
//!
//! Tokens are stored exactly as written (quoted strings keep their quotes)
//! so printing never re-encodes anything it did not change.

use super::Position;

/// Comments attached to a syntax node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    /// Whole-line comments directly above the node. Inside blocks an empty
    /// entry stands for a preserved blank line.
    pub before: Vec<String>,
    /// Comment at the end of the node's line
    pub suffix: Option<String>,
}

/// A single statement line, e.g. `go 1.21` or, inside a block, `a v1.0.0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub comments: Comments,
    pub tokens: Vec<String>,
    pub position: Position,
}

impl Line {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            comments: Comments::default(),
            tokens,
            position: Position::default(),
        }
    }
}

/// A factored block such as `require ( ... )`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBlock {
    /// Comments above the block; the suffix follows the opening paren
    pub comments: Comments,
    /// Tokens before the opening paren
    pub verb: Vec<String>,
    pub lines: Vec<Line>,
    /// Comments above and after the closing paren
    pub close: Comments,
    pub position: Position,
}

/// A top-level statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// Comments separated from any statement by a blank line
    Comments(Vec<String>),
    Line(Line),
    Block(LineBlock),
}

impl Stmt {
    /// Leading verb of a line or block
    pub fn verb(&self) -> Option<&str> {
        match self {
            Stmt::Comments(_) => None,
            Stmt::Line(line) => line.tokens.first().map(String::as_str),
            Stmt::Block(block) => block.verb.first().map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSyntax {
    pub stmts: Vec<Stmt>,
}
