//! Character sources feeding the lexer.
//!
//! A [`CharSource`] hands out one character at a time, can un-read the character it
//! just returned, and accumulates everything read since the last [`CharSource::cut`].
//! The lexer extracts lexeme text through `cut` instead of keeping a buffer of its own.
//!
//! Two sources are provided:
//!
//! - [`StrSource`] reads from a `&str` and cuts zero-copy slices of it.
//! - [`ReaderSource`] reads from any [`io::Read`] in 4096-byte chunks, decoding UTF-8
//!   incrementally so multi-byte characters may straddle chunk boundaries.

use crate::{Error, Result};
use std::borrow::Cow;
use std::io;

/// Size of the chunks [`ReaderSource`] pulls from its reader.
pub const CHUNK_SIZE: usize = 4096;

/// A 1-based line/column location in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new() -> Self {
        Position { line: 1, col: 1 }
    }

    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// Character-level input for the lexer.
pub trait CharSource {
    /// Returns the next character, or `None` at end of input.
    fn next_char(&mut self) -> Result<Option<char>>;

    /// Un-reads the character most recently returned by [`next_char`](Self::next_char).
    ///
    /// Only one character can be pushed back between two `next_char` calls.
    fn pushback(&mut self);

    /// Returns the characters consumed since the previous cut and starts a new window.
    fn cut(&mut self) -> Cow<'_, str>;

    /// Location of the next character to be read.
    fn position(&self) -> Position;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn next_char(&mut self) -> Result<Option<char>> {
        (**self).next_char()
    }

    fn pushback(&mut self) {
        (**self).pushback()
    }

    fn cut(&mut self) -> Cow<'_, str> {
        (**self).cut()
    }

    fn position(&self) -> Position {
        (**self).position()
    }
}

/// A [`CharSource`] over an in-memory string.
///
/// # Examples
///
/// ```rust
/// use serde_zml::{CharSource, StrSource};
///
/// let mut source = StrSource::new("ab");
/// assert_eq!(source.next_char().unwrap(), Some('a'));
/// assert_eq!(source.next_char().unwrap(), Some('b'));
/// source.pushback();
/// assert_eq!(source.cut(), "a");
/// assert_eq!(source.next_char().unwrap(), Some('b'));
/// assert_eq!(source.next_char().unwrap(), None);
/// ```
pub struct StrSource<'a> {
    input: &'a str,
    offset: usize,
    window_start: usize,
    last_len: usize,
    position: Position,
    prev_position: Position,
}

impl<'a> StrSource<'a> {
    pub fn new(input: &'a str) -> Self {
        StrSource {
            input,
            offset: 0,
            window_start: 0,
            last_len: 0,
            position: Position::new(),
            prev_position: Position::new(),
        }
    }
}

impl<'a> CharSource for StrSource<'a> {
    fn next_char(&mut self) -> Result<Option<char>> {
        match self.input[self.offset..].chars().next() {
            Some(ch) => {
                self.last_len = ch.len_utf8();
                self.offset += self.last_len;
                self.prev_position = self.position;
                self.position.advance(ch);
                Ok(Some(ch))
            }
            None => {
                self.last_len = 0;
                Ok(None)
            }
        }
    }

    fn pushback(&mut self) {
        debug_assert!(self.last_len > 0, "pushback without a character to un-read");
        self.offset -= self.last_len;
        self.last_len = 0;
        self.position = self.prev_position;
    }

    fn cut(&mut self) -> Cow<'_, str> {
        let start = self.window_start;
        self.window_start = self.offset;
        Cow::Borrowed(&self.input[start..self.offset])
    }

    fn position(&self) -> Position {
        self.position
    }
}

/// A [`CharSource`] that pulls from an [`io::Read`] in fixed-size chunks.
///
/// Bytes are decoded as UTF-8; an invalid sequence, or a sequence cut off by the end
/// of the stream, is reported as [`Error::Io`].
///
/// # Examples
///
/// ```rust
/// use serde_zml::{CharSource, ReaderSource};
/// use std::io::Cursor;
///
/// let mut source = ReaderSource::new(Cursor::new("héllo".as_bytes()));
/// let mut text = String::new();
/// while let Some(ch) = source.next_char().unwrap() {
///     text.push(ch);
/// }
/// assert_eq!(text, "héllo");
/// ```
pub struct ReaderSource<R> {
    reader: R,
    chunk: String,
    offset: usize,
    pending: Vec<u8>,
    window: String,
    last_len: usize,
    eof: bool,
    position: Position,
    prev_position: Position,
}

impl<R: io::Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource {
            reader,
            chunk: String::new(),
            offset: 0,
            pending: Vec::new(),
            window: String::new(),
            last_len: 0,
            eof: false,
            position: Position::new(),
            prev_position: Position::new(),
        }
    }

    /// Replaces the exhausted chunk with freshly decoded text.
    ///
    /// Returns `false` once the reader is exhausted.
    fn refill(&mut self) -> Result<bool> {
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            if self.eof {
                return Ok(false);
            }
            let n = match self.reader.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if n == 0 {
                self.eof = true;
                if !self.pending.is_empty() {
                    return Err(Error::io("stream ended inside a UTF-8 sequence"));
                }
                return Ok(false);
            }
            self.pending.extend_from_slice(&buf[..n]);

            let valid = match std::str::from_utf8(&self.pending) {
                Ok(_) => self.pending.len(),
                Err(e) if e.error_len().is_none() => e.valid_up_to(),
                Err(e) => return Err(Error::io(&format!("invalid UTF-8: {}", e))),
            };
            if valid == 0 {
                continue;
            }
            let decoded = std::str::from_utf8(&self.pending[..valid])
                .map_err(|e| Error::io(&format!("invalid UTF-8: {}", e)))?;
            self.chunk.clear();
            self.chunk.push_str(decoded);
            self.pending.drain(..valid);
            self.offset = 0;
            return Ok(true);
        }
    }
}

impl<R: io::Read> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> Result<Option<char>> {
        if self.offset == self.chunk.len() && !self.refill()? {
            self.last_len = 0;
            return Ok(None);
        }
        match self.chunk[self.offset..].chars().next() {
            Some(ch) => {
                self.last_len = ch.len_utf8();
                self.offset += self.last_len;
                self.window.push(ch);
                self.prev_position = self.position;
                self.position.advance(ch);
                Ok(Some(ch))
            }
            None => {
                self.last_len = 0;
                Ok(None)
            }
        }
    }

    fn pushback(&mut self) {
        debug_assert!(self.last_len > 0, "pushback without a character to un-read");
        self.offset -= self.last_len;
        self.last_len = 0;
        self.window.pop();
        self.position = self.prev_position;
    }

    fn cut(&mut self) -> Cow<'_, str> {
        Cow::Owned(std::mem::take(&mut self.window))
    }

    fn position(&self) -> Position {
        self.position
    }
}
