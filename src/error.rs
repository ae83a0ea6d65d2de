//! Error types for ZML reading and writing.
//!
//! Every error is fatal: the first one aborts the `load`/`dump` call and no
//! partial result is returned.
//!
//! ## Error Categories
//!
//! - **Header errors**: a malformed `<!zml MAJOR.MINOR>` line or an unsupported version
//! - **Lexical errors**: characters the tokenizer has no transition for, unterminated
//!   strings and bad escape sequences
//! - **Structural errors**: tags that close the wrong scope and tokens in places the
//!   grammar does not allow
//! - **Writer errors**: keys that are not identifiers and values ZML cannot express
//!
//! Lexical and structural errors carry the 1-based line and column where they were
//! detected.
//!
//! ## Examples
//!
//! ```rust
//! use serde_zml::{loads, Error};
//!
//! let err = loads("<!zml 0.2>\n<a>1</a>").unwrap_err();
//! assert!(matches!(err, Error::UnsupportedVersion { major: 0, minor: 2 }));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while reading or writing ZML.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The document does not start with a well-formed `<!zml MAJOR.MINOR>` header.
    #[error("Invalid version header at line {line}, column {col}: {msg}")]
    InvalidVersionHeader { line: usize, col: usize, msg: String },

    /// The header is well-formed but declares a version other than 0.1.
    #[error("Unsupported ZML version {major}.{minor} (only 0.1 is supported)")]
    UnsupportedVersion { major: u32, minor: u32 },

    /// The tokenizer reached a state with no transition for the current character.
    #[error("Unexpected {} at line {line}, column {col} while reading {state}", describe_char(.found))]
    UnexpectedCharacter {
        line: usize,
        col: usize,
        found: Option<char>,
        state: &'static str,
    },

    /// End of input inside a string literal.
    #[error("Unterminated string starting at line {line}, column {col}")]
    UnterminatedString { line: usize, col: usize },

    /// The escape introducer was followed by a character outside the permitted set.
    #[error("Invalid escape sequence '`{found}' at line {line}, column {col}")]
    InvalidEscapeSequence { line: usize, col: usize, found: char },

    /// A closing tag does not match the scope it closes, or an array holds a named tag.
    #[error("Mismatched tag at line {line}, column {col}: expected {expected}, found {found}")]
    MismatchedTag {
        line: usize,
        col: usize,
        expected: String,
        found: String,
    },

    /// A token appeared where the grammar does not allow it.
    #[error("Unexpected token at line {line}, column {col}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        col: usize,
        expected: String,
        found: String,
    },

    /// Tags are nested deeper than the configured limit.
    #[error("Nesting deeper than {limit} levels at line {line}, column {col}")]
    NestingTooDeep { line: usize, col: usize, limit: usize },

    /// A number lexeme could not be converted.
    #[error("Invalid number '{lexeme}' at line {line}, column {col}")]
    InvalidNumber {
        line: usize,
        col: usize,
        lexeme: String,
    },

    /// An object key is not an identifier and cannot be written as a tag.
    #[error("Invalid key {0:?}: keys must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidKey(String),

    /// A value that has no ZML representation.
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// The configured string delimiter collides with the grammar.
    #[error("Invalid string delimiter {0:?}")]
    InvalidDelimiter(char),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

fn describe_char(ch: &Option<char>) -> String {
    match *ch {
        Some(ch) => format!("character {:?}", ch),
        None => "end of input".to_string(),
    }
}

impl Error {
    /// Creates a mismatched-tag error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_zml::Error;
    ///
    /// let err = Error::mismatched_tag(3, 7, "</b>", "</c>");
    /// assert!(err.to_string().contains("expected </b>"));
    /// ```
    pub fn mismatched_tag(line: usize, col: usize, expected: &str, found: &str) -> Self {
        Error::MismatchedTag {
            line,
            col,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unexpected-token error.
    pub fn unexpected_token(line: usize, col: usize, expected: &str, found: &str) -> Self {
        Error::UnexpectedToken {
            line,
            col,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an invalid-version-header error.
    pub fn invalid_header(line: usize, col: usize, msg: &str) -> Self {
        Error::InvalidVersionHeader {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates an unsupported value type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedValueType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_zml::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
