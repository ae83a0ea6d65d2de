//! # serde_zml
//!
//! Reader, writer and Serde bridge for ZML, a tag-based markup format for nested data.
//!
//! ## What is ZML?
//!
//! A ZML document is a version header followed by tagged entries. Objects are tag
//! pairs named after their keys, arrays are runs of anonymous `<>`…`</>` pairs and
//! scalars sit between the tags of their entry:
//!
//! ```text
//! <!zml 0.1>
//! # comments run to the end of the line
//! <server>
//!     <host> "localhost" </host>
//!     <port> 8_080 </port>
//!     <tags>
//!         <> "primary" </>
//!         <> 'eu-west' </>
//!     </tags>
//!     <backup> null </backup>
//! </server>
//! ```
//!
//! - Scalars are `true`, `false`, `null`, integers, floats and strings.
//! - Numbers may contain `_` separators and a leading `-`.
//! - A string is delimited by whatever character opens it and uses a backtick to
//!   escape (`` `n `` `` `t `` `` `r `` `` `b ``, a doubled backtick, or a backtick
//!   before the delimiter).
//! - `empty_obj` and `empty_arr` spell the empty containers.
//! - Keys must match `[A-Za-z_][A-Za-z0-9_]*`.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_zml = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Documents
//!
//! ```rust
//! use serde_zml::{dumps, loads, Value};
//!
//! let doc = loads("<!zml 0.1>\n<a> 1 </a>\n<b><> true </><> 'x' </></b>").unwrap();
//! assert_eq!(doc.get("a"), Some(&Value::Int(1)));
//!
//! let text = dumps(&doc).unwrap();
//! assert_eq!(loads(&text).unwrap(), doc);
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_zml::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     roles: Vec<String>,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     roles: vec!["admin".to_string()],
//! };
//!
//! let text = to_string(&user).unwrap();
//! assert!(text.starts_with("<!zml 0.1>\n<id> 123 </id>\n"));
//!
//! let user_back: User = from_str(&text).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Dynamic Values with the zml! Macro
//!
//! ```rust
//! use serde_zml::{zml, Value};
//!
//! let data = zml!({
//!     "name": "Alice",
//!     "tags": ["rust", "serde"]
//! });
//!
//! if let Value::Object(obj) = data {
//!     assert_eq!(obj.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! }
//! ```
//!
//! ## Layers
//!
//! - [`source`]: character sources over strings and `io::Read` streams
//! - [`lexer`]: the tokenizer state machine
//! - [`reader`]: recursive descent from tokens to a [`ZmlMap`]
//! - [`writer`]: rendering a [`ZmlMap`] as canonical text
//! - [`ser`] / [`de`]: conversion between Serde types and [`Value`]
//!
//! Every call builds its own source, lexer and reader or writer; nothing is shared
//! between calls.
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events: `debug` for each
//! document read or written, `trace` for every token and nested scope. Install a
//! subscriber in the application to see them.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - serializing a struct and reading it back
//! - **`dynamic_values.rs`** - building and inspecting `Value` trees
//!
//! Run one with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod map;
pub mod options;
pub mod reader;
pub mod ser;
pub mod source;
pub mod value;
pub mod writer;

pub use de::{from_value, ValueDeserializer};
pub use error::{Error, Result};
pub use lexer::{is_identifier, Lexer, Token, Version};
pub use map::ZmlMap;
pub use options::ZmlOptions;
pub use reader::Reader;
pub use ser::{to_value, ValueSerializer};
pub use source::{CharSource, Position, ReaderSource, StrSource};
pub use value::Value;
pub use writer::Writer;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Reads a document from an I/O stream.
///
/// The stream is consumed in 4096-byte chunks and decoded as UTF-8 on the fly.
///
/// # Examples
///
/// ```rust
/// use serde_zml::{load, Value};
/// use std::io::Cursor;
///
/// let doc = load(Cursor::new("<!zml 0.1>\n<n> 42 </n>")).unwrap();
/// assert_eq!(doc.get("n"), Some(&Value::Int(42)));
/// ```
///
/// # Errors
///
/// Returns an error if the stream cannot be read, is not UTF-8, or is not a valid
/// ZML 0.1 document.
pub fn load<R>(reader: R) -> Result<ZmlMap>
where
    R: io::Read,
{
    load_with_options(reader, &ZmlOptions::default())
}

/// Reads a document from an I/O stream with custom options.
pub fn load_with_options<R>(reader: R, options: &ZmlOptions) -> Result<ZmlMap>
where
    R: io::Read,
{
    Reader::new(Lexer::new(ReaderSource::new(reader)), options).read()
}

/// Reads a document from a string.
///
/// # Examples
///
/// ```rust
/// use serde_zml::{loads, Error};
///
/// let doc = loads("<!zml 0.1>\n<a><b> 1 </b></a>").unwrap();
/// assert!(doc.get("a").unwrap().is_object());
///
/// let err = loads("<!zml 0.1>\n<a><b> 1 </b></c>").unwrap_err();
/// assert!(matches!(err, Error::MismatchedTag { .. }));
/// ```
///
/// # Errors
///
/// Returns an error if the text is not a valid ZML 0.1 document.
pub fn loads(text: &str) -> Result<ZmlMap> {
    loads_with_options(text, &ZmlOptions::default())
}

/// Reads a document from a string with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_zml::{loads_with_options, Error, ZmlOptions};
///
/// let options = ZmlOptions::new().with_max_depth(1);
/// let err = loads_with_options("<!zml 0.1>\n<a><b><c> 1 </c></b></a>", &options).unwrap_err();
/// assert!(matches!(err, Error::NestingTooDeep { limit: 1, .. }));
/// ```
pub fn loads_with_options(text: &str, options: &ZmlOptions) -> Result<ZmlMap> {
    Reader::from_str(text, options).read()
}

/// Writes a document to an I/O sink.
///
/// # Errors
///
/// Returns an error if a key is not an identifier, a float is not finite, or the
/// sink fails.
pub fn dump<W>(doc: &ZmlMap, writer: W) -> Result<()>
where
    W: io::Write,
{
    dump_with_options(doc, writer, &ZmlOptions::default())
}

/// Writes a document to an I/O sink with custom options.
pub fn dump_with_options<W>(doc: &ZmlMap, mut writer: W, options: &ZmlOptions) -> Result<()>
where
    W: io::Write,
{
    let text = dumps_with_options(doc, options)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Writes a document to a string.
///
/// # Examples
///
/// ```rust
/// use serde_zml::{dumps, zml};
///
/// let doc = zml!({ "a": { "b": 1 } });
/// let text = dumps(doc.as_object().unwrap()).unwrap();
/// assert_eq!(text, "<!zml 0.1>\n<a>\n    <b> 1 </b>\n</a>\n");
/// ```
///
/// # Errors
///
/// Returns an error if a key is not an identifier or a float is not finite.
pub fn dumps(doc: &ZmlMap) -> Result<String> {
    dumps_with_options(doc, &ZmlOptions::default())
}

/// Writes a document to a string with custom options.
pub fn dumps_with_options(doc: &ZmlMap, options: &ZmlOptions) -> Result<String> {
    let mut writer = Writer::new(options);
    writer.write_document(doc)?;
    Ok(writer.into_inner())
}

fn into_document(value: Value) -> Result<ZmlMap> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::unsupported_type(&format!(
            "document root must be an object, found {}",
            other.type_name()
        ))),
    }
}

/// Serializes any `T: Serialize` to a ZML document.
///
/// `T` must serialize as a struct or map; its fields become the root entries.
///
/// # Examples
///
/// ```rust
/// use serde_zml::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let text = to_string(&Point { x: 1, y: -2 }).unwrap();
/// assert_eq!(text, "<!zml 0.1>\n<x> 1 </x>\n<y> -2 </y>\n");
///
/// assert!(to_string(&vec![1, 2, 3]).is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the value does not serialize to an object or contains
/// something ZML cannot express.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &ZmlOptions::default())
}

/// Serializes any `T: Serialize` to a ZML document with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_zml::{to_string_with_options, ZmlOptions};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Greeting { text: String }
///
/// let options = ZmlOptions::new().with_delimiter('|');
/// let text = to_string_with_options(&Greeting { text: "hi".into() }, &options).unwrap();
/// assert_eq!(text, "<!zml 0.1>\n<text> |hi| </text>\n");
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &ZmlOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let doc = into_document(to_value(value)?)?;
    dumps_with_options(&doc, options)
}

/// Serializes any `T: Serialize` to an I/O sink as a ZML document.
///
/// # Examples
///
/// ```rust
/// use serde_zml::to_writer;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
/// assert!(buffer.starts_with(b"<!zml 0.1>\n"));
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &ZmlOptions::default())
}

/// Serializes any `T: Serialize` to an I/O sink with custom options.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(writer: W, value: &T, options: &ZmlOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let doc = into_document(to_value(value)?)?;
    dump_with_options(&doc, writer, options)
}

/// Deserializes an instance of type `T` from ZML text.
///
/// # Examples
///
/// ```rust
/// use serde_zml::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("<!zml 0.1>\n<x> 1 </x>\n<y> 2 </y>").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the text is not a valid document or does not match `T`.
/// Syntax errors carry line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(Value::Object(loads(text)?))
}

/// Deserializes an instance of type `T` from an I/O stream of ZML.
///
/// # Examples
///
/// ```rust
/// use serde_zml::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let cursor = Cursor::new(b"<!zml 0.1>\n<x> 1 </x>\n<y> 2 </y>");
/// let point: Point = from_reader(cursor).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    from_value(Value::Object(load(reader)?))
}

/// Deserializes an instance of type `T` from bytes of ZML text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not a valid document, or do not
/// match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let text = std::str::from_utf8(bytes).map_err(|e| Error::io(&e.to_string()))?;
    from_str(text)
}
