//! ZML tokenizer.
//!
//! The [`Lexer`] is a character-level finite-state machine over a [`CharSource`]. Each
//! call to [`Lexer::next_token`] skips whitespace and `#` comments, classifies the
//! token by its first character and then steps the machine one character at a time
//! until the token is complete. Numbers and tag bodies only know they have ended after
//! reading one character too many; that character is pushed back to the source so the
//! next call sees it again.
//!
//! First characters:
//!
//! | char          | token                                   |
//! |---------------|-----------------------------------------|
//! | `<`           | start tag `<name>` or end tag `</name>` |
//! | `0`–`9`       | integer or float                        |
//! | `-`           | negative number, or a `-`-delimited string |
//! | `t` `f` `n`   | `true`, `false`, `null`                 |
//! | `e`           | `empty_arr`, `empty_obj`                |
//! | anything else | string delimited by that character      |
//!
//! ```rust
//! use serde_zml::{Lexer, Token};
//!
//! let mut lexer = Lexer::from_str("<n>1_000</n>");
//! assert_eq!(lexer.next_token().unwrap(), Token::StartTag("n".to_string()));
//! assert_eq!(lexer.next_token().unwrap(), Token::Int(1000));
//! assert_eq!(lexer.next_token().unwrap(), Token::EndTag("n".to_string()));
//! assert_eq!(lexer.next_token().unwrap(), Token::EndOfInput);
//! ```

use crate::source::{CharSource, Position, StrSource};
use crate::{Error, Result, Value, ZmlMap};
use num_bigint::BigInt;
use std::fmt;
use tracing::trace;

/// Escape introducer inside string literals.
pub const ESCAPE: char = '`';

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `<name>`; the name is empty for the anonymous array-element tag `<>`.
    StartTag(String),
    /// `</name>`; the name is empty for `</>`.
    EndTag(String),
    Bool(bool),
    Int(i64),
    /// An integer literal outside the `i64` range.
    BigInt(BigInt),
    Float(f64),
    String(String),
    Null,
    EmptyArray,
    EmptyObject,
    EndOfInput,
}

impl Token {
    /// Converts a scalar token into its value.
    ///
    /// Tags and end of input are not values; they are handed back unchanged.
    pub fn into_value(self) -> std::result::Result<Value, Token> {
        match self {
            Token::Bool(b) => Ok(Value::Bool(b)),
            Token::Int(i) => Ok(Value::Int(i)),
            Token::BigInt(bi) => Ok(Value::BigInt(bi)),
            Token::Float(f) => Ok(Value::Float(f)),
            Token::String(s) => Ok(Value::String(s)),
            Token::Null => Ok(Value::Null),
            Token::EmptyArray => Ok(Value::Array(Vec::new())),
            Token::EmptyObject => Ok(Value::Object(ZmlMap::new())),
            other @ (Token::StartTag(_) | Token::EndTag(_) | Token::EndOfInput) => Err(other),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StartTag(name) => write!(f, "<{}>", name),
            Token::EndTag(name) => write!(f, "</{}>", name),
            Token::Bool(b) => write!(f, "{}", b),
            Token::Int(i) => write!(f, "integer {}", i),
            Token::BigInt(bi) => write!(f, "integer {}", bi),
            Token::Float(fl) => write!(f, "float {}", fl),
            Token::String(s) => write!(f, "string {:?}", s),
            Token::Null => f.write_str("null"),
            Token::EmptyArray => f.write_str("empty_arr"),
            Token::EmptyObject => f.write_str("empty_obj"),
            Token::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// The format version declared by a document header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    /// The only version this crate reads and the version it writes.
    pub const CURRENT: Version = Version { major: 0, minor: 1 };
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    WaitNextToken,
    TagStart,
    EndTagStart,
    TagContent,
    NumberSign,
    Number0,
    Number1To9,
    NumberDot0,
    NumberDot1,
    Keyword,
    EmptyPrefix,
    EmptyKind,
    StringNormal,
    StringEscaping,
}

impl State {
    fn describe(self) -> &'static str {
        match self {
            State::TagStart | State::EndTagStart | State::TagContent => "tag",
            State::NumberSign
            | State::Number0
            | State::Number1To9
            | State::NumberDot0
            | State::NumberDot1 => "number",
            State::Keyword | State::EmptyPrefix | State::EmptyKind => "keyword",
            State::StringNormal | State::StringEscaping => "string",
            State::WaitNextToken => "token",
        }
    }
}

/// What the token being scanned will become.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    StartTag,
    EndTag,
    Int,
    Float,
    Bool,
    Null,
    EmptyArray,
    EmptyObject,
    String,
}

/// Per-token scratch state.
struct Scan {
    kind: Kind,
    delimiter: char,
    rest: &'static str,
    start: Position,
}

/// Returns `true` for characters separating tokens.
#[inline]
pub fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

#[inline]
pub fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

#[inline]
pub fn is_ident_continue(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

/// Returns `true` if `s` can be used as an object key (`[A-Za-z_][A-Za-z0-9_]*`).
///
/// # Examples
///
/// ```rust
/// use serde_zml::is_identifier;
///
/// assert!(is_identifier("user_name2"));
/// assert!(is_identifier("_private"));
/// assert!(!is_identifier("2nd"));
/// assert!(!is_identifier("user-name"));
/// assert!(!is_identifier(""));
/// ```
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if is_ident_start(c)) && chars.all(is_ident_continue)
}

/// The ZML tokenizer.
///
/// A lexer owns its per-parse state and should not outlive a single parse. Pass
/// `&mut source` to keep ownership of the source with the caller.
pub struct Lexer<S> {
    source: S,
    state: State,
    token_start: Position,
}

impl<'a> Lexer<StrSource<'a>> {
    /// Creates a lexer over an in-memory string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Lexer::new(StrSource::new(input))
    }
}

impl<S: CharSource> Lexer<S> {
    pub fn new(source: S) -> Self {
        Lexer {
            source,
            state: State::WaitNextToken,
            token_start: Position::new(),
        }
    }

    /// Location of the next unread character.
    pub fn position(&self) -> Position {
        self.source.position()
    }

    /// Location of the first character of the token most recently returned.
    pub fn token_position(&self) -> Position {
        self.token_start
    }

    /// Reads the `<!zml MAJOR.MINOR>` header.
    ///
    /// Only whitespace may precede the header. Comments are not recognized here.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_zml::{Lexer, Version};
    ///
    /// let mut lexer = Lexer::from_str("\n  <!zml 0.1>\n<a>1</a>");
    /// assert_eq!(lexer.get_version().unwrap(), Version { major: 0, minor: 1 });
    ///
    /// assert!(Lexer::from_str("<!zml 0.1.2>").get_version().is_err());
    /// assert!(Lexer::from_str("<!ZML 0.1>").get_version().is_err());
    /// ```
    pub fn get_version(&mut self) -> Result<Version> {
        let start = self.source.position();
        let invalid = |msg: &str| Error::invalid_header(start.line, start.col, msg);

        loop {
            match self.source.next_char()? {
                Some('>') => break,
                Some(_) => {}
                None => return Err(invalid("end of input before '>'")),
            }
        }

        let header = self.source.cut();
        let open = header
            .find('<')
            .ok_or_else(|| invalid("expected '<!zml MAJOR.MINOR>'"))?;
        if !header[..open].chars().all(is_blank) {
            return Err(invalid("unexpected text before the header"));
        }

        let body = &header[open + 1..header.len() - 1];
        let numbers = body
            .strip_prefix("!zml ")
            .ok_or_else(|| invalid("expected '!zml MAJOR.MINOR'"))?;
        let (major, minor) = numbers
            .split_once('.')
            .ok_or_else(|| invalid("version must be MAJOR.MINOR"))?;

        let parse = |part: &str| -> Result<u32> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("version components must be decimal digits"));
            }
            part.parse::<u32>()
                .map_err(|_| invalid("version component out of range"))
        };
        let version = Version {
            major: parse(major)?,
            minor: parse(minor)?,
        };
        trace!(%version, "read header");
        Ok(version)
    }

    /// Returns `false` when the input ends before another token starts.
    fn skip_blanks(&mut self) -> Result<bool> {
        loop {
            match self.source.next_char()? {
                None => return Ok(false),
                Some('#') => loop {
                    match self.source.next_char()? {
                        None => return Ok(false),
                        Some('\n') => break,
                        Some(_) => {}
                    }
                },
                Some(ch) if is_blank(ch) => {}
                Some(_) => {
                    self.source.pushback();
                    return Ok(true);
                }
            }
        }
    }

    /// Reads the next token.
    ///
    /// Malformed input yields an error; the lexer must not be used after that.
    pub fn next_token(&mut self) -> Result<Token> {
        if !self.skip_blanks()? {
            self.token_start = self.source.position();
            trace!("end of input");
            return Ok(Token::EndOfInput);
        }

        self.source.cut();
        let start = self.source.position();
        self.token_start = start;
        let first = match self.source.next_char()? {
            Some(ch) => ch,
            None => return Ok(Token::EndOfInput),
        };

        let mut scan = Scan {
            kind: Kind::String,
            delimiter: first,
            rest: "",
            start,
        };
        self.state = match first {
            '<' => {
                scan.kind = Kind::StartTag;
                State::TagStart
            }
            '-' => {
                scan.kind = Kind::Int;
                State::NumberSign
            }
            '0' => {
                scan.kind = Kind::Int;
                State::Number0
            }
            '1'..='9' => {
                scan.kind = Kind::Int;
                State::Number1To9
            }
            't' => {
                scan.kind = Kind::Bool;
                scan.rest = "rue";
                State::Keyword
            }
            'f' => {
                scan.kind = Kind::Bool;
                scan.rest = "alse";
                State::Keyword
            }
            'n' => {
                scan.kind = Kind::Null;
                scan.rest = "ull";
                State::Keyword
            }
            'e' => {
                // EmptyKind settles array or object.
                scan.kind = Kind::EmptyObject;
                scan.rest = "mpty_";
                State::EmptyPrefix
            }
            _ => State::StringNormal,
        };

        while self.state != State::WaitNextToken {
            let at = self.source.position();
            let ch = self.source.next_char()?;
            self.state = self.step(&mut scan, ch, at)?;
        }

        let lexeme = self.source.cut();
        let token = convert(&scan, &lexeme)?;
        trace!(%token, line = start.line, col = start.col, "lexed token");
        Ok(token)
    }

    /// Advances the machine by one character.
    fn step(&mut self, scan: &mut Scan, ch: Option<char>, at: Position) -> Result<State> {
        let unexpected = |state: State| Error::UnexpectedCharacter {
            line: at.line,
            col: at.col,
            found: ch,
            state: state.describe(),
        };

        let next = match (self.state, ch) {
            (State::TagStart, Some('/')) => {
                scan.kind = Kind::EndTag;
                State::EndTagStart
            }
            (State::TagStart | State::EndTagStart, Some(c)) if is_ident_start(c) => {
                State::TagContent
            }
            (State::TagContent, Some(c)) if is_ident_continue(c) => State::TagContent,
            (State::TagStart | State::EndTagStart | State::TagContent, Some('>')) => {
                State::WaitNextToken
            }

            (State::NumberSign, Some('0')) => State::Number0,
            (State::NumberSign, Some('1'..='9')) => State::Number1To9,
            (State::NumberSign, _) => {
                scan.kind = Kind::String;
                self.state = State::StringNormal;
                return self.step(scan, ch, at);
            }
            (State::Number0 | State::Number1To9, Some('.')) => {
                scan.kind = Kind::Float;
                State::NumberDot0
            }
            (State::Number0, Some('_')) => State::Number0,
            (State::Number1To9, Some('_' | '0'..='9')) => State::Number1To9,
            (State::NumberDot0, Some('0'..='9')) => State::NumberDot1,
            (State::NumberDot0, Some('_')) => State::NumberDot0,
            (State::NumberDot1, Some('_' | '0'..='9')) => State::NumberDot1,
            (State::Number0 | State::Number1To9 | State::NumberDot1, Some(_)) => {
                self.source.pushback();
                State::WaitNextToken
            }
            (State::Number0 | State::Number1To9 | State::NumberDot1, None) => {
                State::WaitNextToken
            }

            (State::Keyword, Some(c)) if scan.rest.starts_with(c) => {
                scan.rest = &scan.rest[c.len_utf8()..];
                if scan.rest.is_empty() {
                    State::WaitNextToken
                } else {
                    State::Keyword
                }
            }
            (State::EmptyPrefix, Some(c)) if scan.rest.starts_with(c) => {
                scan.rest = &scan.rest[c.len_utf8()..];
                if scan.rest.is_empty() {
                    State::EmptyKind
                } else {
                    State::EmptyPrefix
                }
            }
            (State::EmptyKind, Some('a')) => {
                scan.kind = Kind::EmptyArray;
                scan.rest = "rr";
                State::Keyword
            }
            (State::EmptyKind, Some('o')) => {
                scan.kind = Kind::EmptyObject;
                scan.rest = "bj";
                State::Keyword
            }

            (State::StringNormal, Some(c)) if c == scan.delimiter => State::WaitNextToken,
            (State::StringNormal, Some(ESCAPE)) => State::StringEscaping,
            (State::StringNormal, Some(_)) => State::StringNormal,
            (State::StringEscaping, Some(c))
                if matches!(c, 'n' | 'r' | 'b' | 't' | ESCAPE) || c == scan.delimiter =>
            {
                State::StringNormal
            }
            (State::StringEscaping, Some(c)) => {
                return Err(Error::InvalidEscapeSequence {
                    line: at.line,
                    col: at.col,
                    found: c,
                })
            }
            (State::StringNormal | State::StringEscaping, None) => {
                return Err(Error::UnterminatedString {
                    line: scan.start.line,
                    col: scan.start.col,
                })
            }

            (state, _) => return Err(unexpected(state)),
        };
        Ok(next)
    }
}

/// Turns a complete lexeme into a token.
fn convert(scan: &Scan, lexeme: &str) -> Result<Token> {
    let token = match scan.kind {
        Kind::StartTag => Token::StartTag(lexeme[1..lexeme.len() - 1].to_string()),
        Kind::EndTag => Token::EndTag(lexeme[2..lexeme.len() - 1].to_string()),
        Kind::Int => {
            let digits: String = lexeme.chars().filter(|&c| c != '_').collect();
            match digits.parse::<i64>() {
                Ok(i) => Token::Int(i),
                Err(_) => digits
                    .parse::<BigInt>()
                    .map(Token::BigInt)
                    .map_err(|_| invalid_number(scan, lexeme))?,
            }
        }
        Kind::Float => {
            let digits: String = lexeme.chars().filter(|&c| c != '_').collect();
            match digits.parse::<f64>() {
                Ok(f) if f.is_finite() => Token::Float(f),
                _ => return Err(invalid_number(scan, lexeme)),
            }
        }
        Kind::Bool => Token::Bool(lexeme.starts_with('t')),
        Kind::Null => Token::Null,
        Kind::EmptyArray => Token::EmptyArray,
        Kind::EmptyObject => Token::EmptyObject,
        Kind::String => {
            let width = scan.delimiter.len_utf8();
            Token::String(unescape(
                &lexeme[width..lexeme.len() - width],
                scan.delimiter,
            ))
        }
    };
    Ok(token)
}

fn invalid_number(scan: &Scan, lexeme: &str) -> Error {
    Error::InvalidNumber {
        line: scan.start.line,
        col: scan.start.col,
        lexeme: lexeme.to_string(),
    }
}

/// Resolves escape sequences in the body of a string literal.
///
/// The body has already been validated by the lexer, so every escape introducer is
/// followed by `n`, `r`, `b`, `t`, a backtick or the delimiter.
fn unescape(raw: &str, delimiter: char) -> String {
    if !raw.contains(ESCAPE) {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != ESCAPE {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('t') => out.push('\t'),
            Some(c) => {
                debug_assert!(c == ESCAPE || c == delimiter);
                out.push(c)
            }
            None => {}
        }
    }
    out
}
