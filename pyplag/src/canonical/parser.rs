//! Parser integration with `ruff_python_parser`.

use ruff_python_ast as ast;
use ruff_python_parser::parse_module;

use crate::utils::LineIndex;

/// A syntax error that prevented a source file from being canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at line {line}, column {column}: {message}")]
pub struct ParseError {
    /// Parser message describing the error
    pub message: String,
    /// 1-indexed line of the error start
    pub line: usize,
    /// 1-indexed column (in characters) of the error start
    pub column: usize,
}

/// AST parser for canonicalization
pub struct AstParser;

impl AstParser {
    /// Parse source code and return the module
    ///
    /// # Errors
    /// Returns error if parsing fails
    pub fn parse(source: &str) -> Result<ast::ModModule, ParseError> {
        parse_module(source)
            .map(ruff_python_parser::Parsed::into_syntax)
            .map_err(|e| {
                let (line, column) =
                    LineIndex::new(source).line_column(source, e.location.start());
                ParseError {
                    message: e.error.to_string(),
                    line,
                    column,
                }
            })
    }
}
