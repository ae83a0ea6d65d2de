//! Recursive-descent document reader.
//!
//! A ZML document is a version header followed by the entries of the root object.
//! The root object has no enclosing tag: its entries run until end of input, which is
//! the only place where end of input closes a scope. Every nested scope must be closed
//! by an end tag carrying the name it was opened with, and array elements use the
//! anonymous `<>`…`</>` pair.
//!
//! ```rust
//! use serde_zml::{Lexer, Reader, Value, ZmlOptions};
//!
//! let text = "<!zml 0.1>\n<point>\n    <x> 1 </x>\n    <y> 2 </y>\n</point>\n";
//! let mut reader = Reader::new(Lexer::from_str(text), &ZmlOptions::default());
//! let doc = reader.read().unwrap();
//!
//! let point = doc.get("point").and_then(Value::as_object).unwrap();
//! assert_eq!(point.get("y").and_then(Value::as_i64), Some(2));
//! ```

use crate::lexer::{Lexer, Token, Version};
use crate::source::{CharSource, StrSource};
use crate::{Error, Result, Value, ZmlMap, ZmlOptions};
use tracing::{debug, trace};

/// Builds a [`ZmlMap`] from the tokens of a [`Lexer`].
pub struct Reader<S> {
    lexer: Lexer<S>,
    max_depth: usize,
    depth: usize,
}

impl<'a> Reader<StrSource<'a>> {
    /// Creates a reader over an in-memory string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str, options: &ZmlOptions) -> Self {
        Reader::new(Lexer::from_str(input), options)
    }
}

impl<S: CharSource> Reader<S> {
    pub fn new(lexer: Lexer<S>, options: &ZmlOptions) -> Self {
        Reader {
            lexer,
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    /// Reads a complete document: header, then the root object up to end of input.
    pub fn read(&mut self) -> Result<ZmlMap> {
        let version = self.lexer.get_version()?;
        if version != Version::CURRENT {
            return Err(Error::UnsupportedVersion {
                major: version.major,
                minor: version.minor,
            });
        }
        debug!(%version, "reading document");

        let map = match self.lexer.next_token()? {
            Token::StartTag(name) if !name.is_empty() => {
                let (map, closing) = self.read_object(name)?;
                if let Some(name) = closing {
                    return Err(self.unexpected("end of input", &Token::EndTag(name)));
                }
                map
            }
            Token::StartTag(_) => {
                return Err(self.mismatched("a named tag", "<>"));
            }
            Token::EmptyObject => match self.lexer.next_token()? {
                Token::EndOfInput => ZmlMap::new(),
                other => return Err(self.unexpected("end of input", &other)),
            },
            other => return Err(self.unexpected("a start tag", &other)),
        };

        debug!(entries = map.len(), "read document");
        Ok(map)
    }

    /// Reads the value of the scope opened by `<closing_key>` together with its end tag.
    ///
    /// An empty `closing_key` stands for an anonymous array element.
    pub fn read_value(&mut self, closing_key: &str) -> Result<Value> {
        let token = self.lexer.next_token()?;
        match token {
            Token::StartTag(name) => {
                self.enter()?;
                let (value, closing) = if name.is_empty() {
                    let (items, closing) = self.read_array()?;
                    (Value::Array(items), closing)
                } else {
                    let (map, closing) = self.read_object(name)?;
                    (Value::Object(map), closing)
                };
                self.depth -= 1;

                match closing {
                    Some(name) if name == closing_key => Ok(value),
                    Some(name) => Err(self.mismatched(&end_tag(closing_key), &end_tag(&name))),
                    None => Err(self.unexpected(&end_tag(closing_key), &Token::EndOfInput)),
                }
            }
            token => match token.into_value() {
                Ok(value) => match self.lexer.next_token()? {
                    Token::EndTag(name) if name == closing_key => Ok(value),
                    other => Err(self.mismatched(&end_tag(closing_key), &other.to_string())),
                },
                Err(token) => Err(self.unexpected("a value", &token)),
            },
        }
    }

    /// Reads object entries after the start tag `<first_key>` has been consumed.
    ///
    /// Returns the object and the name of the end tag that closed it, or `None` if the
    /// input ended first.
    pub fn read_object(&mut self, first_key: String) -> Result<(ZmlMap, Option<String>)> {
        trace!(key = %first_key, depth = self.depth, "object");
        let mut map = ZmlMap::new();
        let value = self.read_value(&first_key)?;
        map.insert(first_key, value);

        loop {
            match self.lexer.next_token()? {
                Token::StartTag(name) if name.is_empty() => {
                    return Err(self.mismatched("a named tag", "<>"));
                }
                Token::StartTag(name) => {
                    let value = self.read_value(&name)?;
                    map.insert(name, value);
                }
                Token::EndTag(name) => return Ok((map, Some(name))),
                Token::EndOfInput => return Ok((map, None)),
                other => return Err(self.unexpected("a tag", &other)),
            }
        }
    }

    /// Reads array elements after the first `<>` has been consumed.
    ///
    /// Returns the elements and the name of the end tag that closed the array, or
    /// `None` if the input ended first.
    pub fn read_array(&mut self) -> Result<(Vec<Value>, Option<String>)> {
        trace!(depth = self.depth, "array");
        let mut items = vec![self.read_value("")?];

        loop {
            match self.lexer.next_token()? {
                Token::StartTag(name) if name.is_empty() => items.push(self.read_value("")?),
                Token::StartTag(name) => {
                    return Err(self.mismatched("<>", &format!("<{}>", name)));
                }
                Token::EndTag(name) => return Ok((items, Some(name))),
                Token::EndOfInput => return Ok((items, None)),
                other => return Err(self.unexpected("a tag", &other)),
            }
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            let at = self.lexer.token_position();
            return Err(Error::NestingTooDeep {
                line: at.line,
                col: at.col,
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn mismatched(&self, expected: &str, found: &str) -> Error {
        let at = self.lexer.token_position();
        Error::mismatched_tag(at.line, at.col, expected, found)
    }

    fn unexpected(&self, expected: &str, found: &Token) -> Error {
        let at = self.lexer.token_position();
        Error::unexpected_token(at.line, at.col, expected, &found.to_string())
    }
}

fn end_tag(name: &str) -> String {
    format!("</{}>", name)
}
