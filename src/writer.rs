//! Document writer.
//!
//! Renders a [`ZmlMap`] as canonical ZML: the version header, then one tag pair per
//! entry. Scalars sit inline between their tags with a single space on either side.
//! Objects and arrays open on a new line, nest one indent deeper and close on a line
//! of their own. Empty containers are written as `empty_obj` / `empty_arr`.
//!
//! ```rust
//! use serde_zml::{zml, Writer, ZmlOptions};
//!
//! let doc = zml!({ "point": { "x": 1, "y": 2.5 }, "tags": [] });
//! let mut writer = Writer::new(&ZmlOptions::default());
//! writer.write_document(doc.as_object().unwrap()).unwrap();
//!
//! assert_eq!(
//!     writer.into_inner(),
//!     "<!zml 0.1>\n\
//!      <point>\n    <x> 1 </x>\n    <y> 2.5 </y>\n</point>\n\
//!      <tags>\n    empty_arr\n</tags>\n"
//! );
//! ```

use crate::lexer::{is_identifier, Version, ESCAPE};
use crate::options::check_delimiter;
use crate::{Error, Result, Value, ZmlMap, ZmlOptions};
use num_bigint::BigInt;
use tracing::debug;

/// Accumulates ZML text in an in-memory buffer.
pub struct Writer {
    output: String,
    options: ZmlOptions,
}

impl Writer {
    pub fn new(options: &ZmlOptions) -> Self {
        Writer {
            output: String::new(),
            options: options.clone(),
        }
    }

    /// Writes the header and the root object.
    ///
    /// Fails with [`Error::InvalidKey`] for keys that are not identifiers,
    /// [`Error::UnsupportedValueType`] for non-finite floats and
    /// [`Error::InvalidDelimiter`] if the configured delimiter is unusable.
    pub fn write_document(&mut self, doc: &ZmlMap) -> Result<()> {
        check_delimiter(self.options.delimiter)?;
        self.output.push_str("<!zml ");
        self.output.push_str(&Version::CURRENT.to_string());
        self.output.push_str(">\n");
        self.write_object(doc, 0)?;
        debug!(
            entries = doc.len(),
            bytes = self.output.len(),
            "wrote document"
        );
        Ok(())
    }

    /// Returns the text written so far.
    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    fn write_indent(&mut self, level: usize) {
        let width = self.options.indent * level;
        self.output.extend(std::iter::repeat(' ').take(width));
    }

    fn write_object(&mut self, map: &ZmlMap, level: usize) -> Result<()> {
        if map.is_empty() {
            self.write_indent(level);
            self.output.push_str("empty_obj\n");
            return Ok(());
        }
        for (key, value) in map {
            if !is_identifier(key) {
                return Err(Error::InvalidKey(key.clone()));
            }
            self.write_indent(level);
            self.output.push('<');
            self.output.push_str(key);
            self.output.push('>');
            self.write_entry(value, level)?;
            self.output.push_str("</");
            self.output.push_str(key);
            self.output.push_str(">\n");
        }
        Ok(())
    }

    fn write_array(&mut self, items: &[Value], level: usize) -> Result<()> {
        if items.is_empty() {
            self.write_indent(level);
            self.output.push_str("empty_arr\n");
            return Ok(());
        }
        for item in items {
            self.write_indent(level);
            self.output.push_str("<>");
            self.write_entry(item, level)?;
            self.output.push_str("</>\n");
        }
        Ok(())
    }

    /// Writes what goes between a start tag at `level` and its end tag.
    fn write_entry(&mut self, value: &Value, level: usize) -> Result<()> {
        match value {
            Value::Object(map) => {
                self.output.push('\n');
                self.write_object(map, level + 1)?;
                self.write_indent(level);
            }
            Value::Array(items) => {
                self.output.push('\n');
                self.write_array(items, level + 1)?;
                self.write_indent(level);
            }
            scalar => {
                self.output.push(' ');
                self.write_scalar(scalar)?;
                self.output.push(' ');
            }
        }
        Ok(())
    }

    fn write_scalar(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.output.push_str("null"),
            Value::Bool(true) => self.output.push_str("true"),
            Value::Bool(false) => self.output.push_str("false"),
            Value::Int(i) => self.output.push_str(&i.to_string()),
            Value::BigInt(bi) => self.output.push_str(&format_bigint(bi)),
            Value::Float(f) => self.output.push_str(&format_float(*f)?),
            Value::String(s) => escape_into(&mut self.output, s, self.options.delimiter),
            Value::Object(_) | Value::Array(_) => {
                return Err(Error::unsupported_type("container in scalar position"))
            }
        }
        Ok(())
    }
}

fn format_bigint(value: &BigInt) -> String {
    value.to_str_radix(10)
}

/// Formats a float so the lexer reads it back as a float.
///
/// `f64`'s `Display` never uses exponent notation, so only a missing fractional part
/// needs fixing up.
fn format_float(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(Error::unsupported_type(&format!(
            "non-finite float {}",
            value
        )));
    }
    let mut text = value.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    Ok(text)
}

/// Appends `s` as a string literal wrapped in `delimiter`.
fn escape_into(out: &mut String, s: &str, delimiter: char) {
    out.reserve(s.len() + 2);
    out.push(delimiter);
    for ch in s.chars() {
        match ch {
            '\n' => {
                out.push(ESCAPE);
                out.push('n');
            }
            '\r' => {
                out.push(ESCAPE);
                out.push('r');
            }
            '\u{0008}' => {
                out.push(ESCAPE);
                out.push('b');
            }
            '\t' => {
                out.push(ESCAPE);
                out.push('t');
            }
            c if c == ESCAPE || c == delimiter => {
                out.push(ESCAPE);
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(map: &ZmlMap) -> Result<String> {
        let mut writer = Writer::new(&ZmlOptions::default());
        writer.write_document(map)?;
        Ok(writer.into_inner())
    }

    fn single(key: &str, value: Value) -> ZmlMap {
        let mut map = ZmlMap::new();
        map.insert(key.to_string(), value);
        map
    }

    #[test]
    fn test_scalars_inline() {
        let mut map = ZmlMap::new();
        map.insert("a".into(), Value::Int(114514));
        map.insert("b".into(), Value::Float(1919.81));
        map.insert("c".into(), Value::Bool(true));
        map.insert("d".into(), Value::Null);
        map.insert("e".into(), Value::from("hi"));
        assert_eq!(
            write(&map).unwrap(),
            "<!zml 0.1>\n<a> 114514 </a>\n<b> 1919.81 </b>\n<c> true </c>\n<d> null </d>\n<e> \"hi\" </e>\n"
        );
    }

    #[test]
    fn test_nested_layout() {
        let inner = single("x", Value::Int(1));
        let map = single(
            "root",
            Value::Array(vec![Value::Object(inner), Value::Int(2)]),
        );
        assert_eq!(
            write(&map).unwrap(),
            "<!zml 0.1>\n\
             <root>\n\
             \x20   <>\n\
             \x20       <x> 1 </x>\n\
             \x20   </>\n\
             \x20   <> 2 </>\n\
             </root>\n"
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(write(&ZmlMap::new()).unwrap(), "<!zml 0.1>\nempty_obj\n");
        assert_eq!(
            write(&single("h", Value::Object(ZmlMap::new()))).unwrap(),
            "<!zml 0.1>\n<h>\n    empty_obj\n</h>\n"
        );
        assert_eq!(
            write(&single("i", Value::Array(vec![]))).unwrap(),
            "<!zml 0.1>\n<i>\n    empty_arr\n</i>\n"
        );
    }

    #[test]
    fn test_custom_indent() {
        let map = single("a", Value::Object(single("b", Value::Null)));
        let mut writer = Writer::new(&ZmlOptions::new().with_indent(1));
        writer.write_document(&map).unwrap();
        assert_eq!(writer.as_str(), "<!zml 0.1>\n<a>\n <b> null </b>\n</a>\n");
    }

    #[test]
    fn test_string_escaping() {
        let mut out = String::new();
        escape_into(&mut out, "a\tb\nc\rd\u{0008}e`f\"g", '"');
        assert_eq!(out, "\"a`tb`nc`rd`be``f`\"g\"");

        let mut out = String::new();
        escape_into(&mut out, "it's \"fine\"", '\'');
        assert_eq!(out, "'it`'s \"fine\"'");
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(format_float(1.0).unwrap(), "1.0");
        assert_eq!(format_float(-3.0).unwrap(), "-3.0");
        assert_eq!(format_float(0.0001).unwrap(), "0.0001");
        assert_eq!(format_float(1e21).unwrap(), "1000000000000000000000.0");
        assert!(matches!(
            format_float(f64::NAN),
            Err(Error::UnsupportedValueType(_))
        ));
        assert!(format_float(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_big_integers() {
        let big: BigInt = "-123456789012345678901234567890".parse().unwrap();
        assert_eq!(
            write(&single("n", Value::BigInt(big))).unwrap(),
            "<!zml 0.1>\n<n> -123456789012345678901234567890 </n>\n"
        );
    }

    #[test]
    fn test_invalid_key() {
        assert_eq!(
            write(&single("not-a-key", Value::Null)),
            Err(Error::InvalidKey("not-a-key".to_string()))
        );
        let nested = single("ok", Value::Object(single("2bad", Value::Null)));
        assert_eq!(write(&nested), Err(Error::InvalidKey("2bad".to_string())));
    }

    #[test]
    fn test_invalid_delimiter() {
        let mut writer = Writer::new(&ZmlOptions::new().with_delimiter('t'));
        assert_eq!(
            writer.write_document(&ZmlMap::new()),
            Err(Error::InvalidDelimiter('t'))
        );
    }
}
