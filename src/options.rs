//! Configuration options for ZML reading and writing.
//!
//! [`ZmlOptions`] controls the writer's indentation and string delimiter and the
//! reader's nesting limit. The defaults produce canonical ZML: four-space indents and
//! `"`-delimited strings.
//!
//! ## Examples
//!
//! ```rust
//! use serde_zml::{dumps_with_options, zml, ZmlOptions};
//!
//! let doc = zml!({ "name": "Alice" });
//! let options = ZmlOptions::new().with_delimiter('\'').with_indent(2);
//! let text = dumps_with_options(doc.as_object().unwrap(), &options).unwrap();
//! assert!(text.contains("<name> 'Alice' </name>"));
//! ```

use crate::{Error, Result};

/// Default number of spaces per nesting level.
pub const DEFAULT_INDENT: usize = 4;

/// Default string delimiter.
pub const DEFAULT_DELIMITER: char = '"';

/// Default limit on nested objects and arrays accepted by the reader.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for ZML reading and writing.
///
/// # Examples
///
/// ```rust
/// use serde_zml::ZmlOptions;
///
/// let options = ZmlOptions::new()
///     .with_indent(2)
///     .with_delimiter('|')
///     .with_max_depth(32);
/// assert_eq!(options.indent, 2);
/// assert_eq!(options.delimiter, '|');
/// assert_eq!(options.max_depth, 32);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ZmlOptions {
    pub indent: usize,
    pub delimiter: char,
    pub max_depth: usize,
}

impl Default for ZmlOptions {
    fn default() -> Self {
        ZmlOptions {
            indent: DEFAULT_INDENT,
            delimiter: DEFAULT_DELIMITER,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ZmlOptions {
    /// Creates default options (4-space indent, `"` delimiter, depth limit 128).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_zml::ZmlOptions;
    ///
    /// let options = ZmlOptions::new();
    /// assert_eq!(options.indent, 4);
    /// assert_eq!(options.delimiter, '"');
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of spaces written per nesting level.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the character the writer wraps strings in.
    ///
    /// The reader accepts any delimiter on a per-string basis, so this only affects
    /// output. The character is validated when writing; see [`check_delimiter`].
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets how deeply objects and arrays may nest before reading fails.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Checks that `delimiter` can open a string literal.
///
/// A string literal starts with whatever character does not begin another token, so
/// whitespace, `#`, `<`, `-`, digits and the keyword initials `t`, `f`, `n`, `e` are
/// unusable. Backtick and control characters are rejected because the writer could
/// not escape them unambiguously.
///
/// # Examples
///
/// ```rust
/// use serde_zml::options::check_delimiter;
///
/// assert!(check_delimiter('"').is_ok());
/// assert!(check_delimiter('\'').is_ok());
/// assert!(check_delimiter('t').is_err());
/// assert!(check_delimiter('<').is_err());
/// ```
pub fn check_delimiter(delimiter: char) -> Result<()> {
    let reserved = delimiter.is_whitespace()
        || delimiter.is_control()
        || delimiter.is_ascii_digit()
        || matches!(delimiter, '#' | '<' | '-' | '`' | 't' | 'f' | 'n' | 'e');
    if reserved {
        Err(Error::InvalidDelimiter(delimiter))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ZmlOptions::default();
        assert_eq!(options.indent, DEFAULT_INDENT);
        assert_eq!(options.delimiter, DEFAULT_DELIMITER);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_reserved_delimiters() {
        for ch in [' ', '\t', '\n', '#', '<', '-', '`', '0', '7', 't', 'f', 'n', 'e'] {
            assert_eq!(check_delimiter(ch), Err(Error::InvalidDelimiter(ch)));
        }
        for ch in ['"', '\'', '|', '$', 'x', '\u{00ab}'] {
            assert!(check_delimiter(ch).is_ok(), "{:?} should be usable", ch);
        }
    }
}
