//! Canonicalization of Python source into a structural string.
//!
//! The canonical form keeps node kinds, operators, identifier names and
//! literal values, and drops whitespace, comments and redundant parentheses.
//! Identifiers are compared as written: the form catches reformatted copies,
//! not systematically renamed ones.

mod dump;
mod parser;

pub use parser::{AstParser, ParseError};

use std::fmt;

/// Deterministic structural dump of one parsed source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalForm {
    text: String,
    chars: usize,
}

impl CanonicalForm {
    /// The canonical string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters, the unit the similarity score is normalized by
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.chars
    }

    /// Consume into the underlying string
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for CanonicalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for CanonicalForm {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Parse `source` and serialize its syntax tree into a canonical string.
///
/// # Errors
/// Returns [`ParseError`] if the source is not valid Python. No partial
/// output is produced.
pub fn canonicalize(source: &str) -> Result<CanonicalForm, ParseError> {
    let module = AstParser::parse(source)?;
    let text = dump::dump_module(&module, source);
    let chars = text.chars().count();
    Ok(CanonicalForm { text, chars })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_is_deterministic() {
        let source = "def f(x):\n    return x * 2\n";
        assert_eq!(canonicalize(source).unwrap(), canonicalize(source).unwrap());
    }

    #[test]
    fn test_char_len_counts_characters() {
        let form = canonicalize("s = 'héllo'").unwrap();
        assert_eq!(form.char_len(), form.as_str().chars().count());
        assert!(form.char_len() < form.as_str().len());
    }

    #[test]
    fn test_invalid_source_fails() {
        let err = canonicalize("def broken(:\n    pass").unwrap_err();
        assert_eq!(err.line, 1);
    }
}
