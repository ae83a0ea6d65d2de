//! Document-level behavior of `loads` / `dumps`: the format as read and written,
//! independent of serde.

use serde_zml::{dumps, load, loads, loads_with_options, zml, Error, Value, ZmlMap, ZmlOptions};
use std::io::Cursor;

fn object(value: Value) -> ZmlMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {:?}", other),
    }
}

#[test]
fn test_concrete_scenario() {
    let text = "<!zml 0.1>\n\
                <root>\n\
                \x20   <a>114514</a>\n\
                \x20   <b>1919.81</b>\n\
                \x20   <c>true</c>\n\
                \x20   <d>false</d>\n\
                \x20   <e>null</e>\n\
                \x20   <f><>\"hello\tworld\"</><>\"!\"</></f>\n\
                </root>\n";

    let expected = zml!({
        "root": {
            "a": 114514,
            "b": 1919.81,
            "c": true,
            "d": false,
            "e": null,
            "f": ["hello\tworld", "!"]
        }
    });
    assert_eq!(loads(text).unwrap(), object(expected));
}

#[test]
fn test_sample_document_round_trip() {
    let mut t = object(zml!({
        "a": 114514,
        "b": 1919.81,
        "c": true,
        "d": false,
        "e": null,
        "f": ["hello\t", "world!"],
        "h": {},
        "i": []
    }));
    t.insert("g".to_string(), Value::Object(t.clone()));

    let text = dumps(&t).unwrap();
    assert_eq!(loads(&text).unwrap(), t);
    assert_eq!(dumps(&loads(&text).unwrap()).unwrap(), text);
}

#[test]
fn test_exact_output() {
    let doc = object(zml!({
        "name": "probe",
        "size": [1, 2.5],
        "meta": { "tags": [], "extra": {} }
    }));
    assert_eq!(
        dumps(&doc).unwrap(),
        "<!zml 0.1>\n\
         <name> \"probe\" </name>\n\
         <size>\n\
         \x20   <> 1 </>\n\
         \x20   <> 2.5 </>\n\
         </size>\n\
         <meta>\n\
         \x20   <tags>\n\
         \x20       empty_arr\n\
         \x20   </tags>\n\
         \x20   <extra>\n\
         \x20       empty_obj\n\
         \x20   </extra>\n\
         </meta>\n"
    );
}

#[test]
fn test_version_gate() {
    for header in ["<!zml 0.2>", "<!zml 1.1>", "<!zml 0.10>"] {
        let text = format!("{}\n<a>1</a>", header);
        assert!(
            matches!(loads(&text), Err(Error::UnsupportedVersion { .. })),
            "{} should be rejected",
            header
        );
    }
    assert!(matches!(
        loads("<zml 0.1>\n<a>1</a>"),
        Err(Error::InvalidVersionHeader { .. })
    ));
    assert!(matches!(loads(""), Err(Error::InvalidVersionHeader { .. })));
}

#[test]
fn test_tag_balance() {
    let doc = loads("<!zml 0.1>\n<a><b>1</b></a>").unwrap();
    assert_eq!(doc, object(zml!({ "a": { "b": 1 } })));

    assert!(matches!(
        loads("<!zml 0.1>\n<a><b>1</b></c>"),
        Err(Error::MismatchedTag { .. })
    ));
}

#[test]
fn test_array_anonymity() {
    let doc = loads("<!zml 0.1>\n<a><>1</><>2</></a>").unwrap();
    assert_eq!(doc, object(zml!({ "a": [1, 2] })));

    let err = loads("<!zml 0.1>\n<a><>1</><x>1</x></a>").unwrap_err();
    assert!(matches!(
        err,
        Error::MismatchedTag { .. } | Error::UnexpectedToken { .. }
    ));
}

#[test]
fn test_empty_containers() {
    assert_eq!(
        loads("<!zml 0.1>\n<a>empty_obj</a>").unwrap(),
        object(zml!({ "a": {} }))
    );
    assert_eq!(
        loads("<!zml 0.1>\n<a>empty_arr</a>").unwrap(),
        object(zml!({ "a": [] }))
    );

    let text = dumps(&object(zml!({ "a": {}, "b": [] }))).unwrap();
    assert!(text.contains("<a>\n    empty_obj\n</a>\n"));
    assert!(text.contains("<b>\n    empty_arr\n</b>\n"));

    assert_eq!(dumps(&ZmlMap::new()).unwrap(), "<!zml 0.1>\nempty_obj\n");
    assert_eq!(loads("<!zml 0.1>\nempty_obj\n").unwrap(), ZmlMap::new());
}

#[test]
fn test_escaping_round_trip() {
    let original = "tab\there, backtick ` and quote \" and both `\"";
    let doc = object(zml!({ "s": original }));
    let text = dumps(&doc).unwrap();
    let back = loads(&text).unwrap();
    assert_eq!(back.get("s").and_then(Value::as_str), Some(original));
}

#[test]
fn test_numeric_underscores() {
    let doc = loads("<!zml 0.1>\n<i>1_000_000</i><f>0.000_1</f>").unwrap();
    assert_eq!(doc.get("i"), Some(&Value::Int(1_000_000)));
    assert_eq!(doc.get("f"), Some(&Value::Float(0.0001)));
}

#[test]
fn test_negative_numbers() {
    let doc = loads("<!zml 0.1>\n<i>-17</i><f>-0.5</f>").unwrap();
    assert_eq!(doc.get("i"), Some(&Value::Int(-17)));
    assert_eq!(doc.get("f"), Some(&Value::Float(-0.5)));
}

#[test]
fn test_big_integers() {
    let doc = loads("<!zml 0.1>\n<n>-99_999_999_999_999_999_999</n>").unwrap();
    let expected: num_bigint::BigInt = "-99999999999999999999".parse().unwrap();
    assert_eq!(doc.get("n"), Some(&Value::BigInt(expected)));
    assert_eq!(loads(&dumps(&doc).unwrap()).unwrap(), doc);
}

#[test]
fn test_small_big_integer_round_trip() {
    let mut doc = ZmlMap::new();
    doc.insert("n".to_string(), Value::BigInt(num_bigint::BigInt::from(5)));
    doc.insert("m".to_string(), Value::Array(vec![Value::BigInt((-7).into())]));

    let text = dumps(&doc).unwrap();
    assert_eq!(text, "<!zml 0.1>\n<n> 5 </n>\n<m>\n    <> -7 </>\n</m>\n");
    let back = loads(&text).unwrap();
    assert_eq!(back.get("n"), Some(&Value::Int(5)));
    assert_eq!(back, doc);
}

#[test]
fn test_float_out_of_range_is_rejected() {
    let text = format!("<!zml 0.1>\n<f>1{}.0</f>", "0".repeat(400));
    assert!(matches!(
        loads(&text),
        Err(Error::InvalidNumber { line: 2, col: 4, .. })
    ));
}

#[test]
fn test_comments_and_crlf() {
    let text = "<!zml 0.1>\r\n# settings\r\n<a> 1 </a> # inline\r\n<b>\r\n    <> 'x' </>\r\n</b>\r\n";
    let doc = loads(text).unwrap();
    assert_eq!(doc, object(zml!({ "a": 1, "b": ["x"] })));
}

#[test]
fn test_any_string_delimiter() {
    let doc = loads("<!zml 0.1>\n<a>'single'</a><b>|pipe|</b><c>%per`%cent%</c>").unwrap();
    assert_eq!(doc.get("a").and_then(Value::as_str), Some("single"));
    assert_eq!(doc.get("b").and_then(Value::as_str), Some("pipe"));
    assert_eq!(doc.get("c").and_then(Value::as_str), Some("per%cent"));

    let doc = loads("<!zml 0.1>\n<a>-hello-</a><b>-2</b><c>-x`-y-</c>").unwrap();
    assert_eq!(doc.get("a").and_then(Value::as_str), Some("hello"));
    assert_eq!(doc.get("b"), Some(&Value::Int(-2)));
    assert_eq!(doc.get("c").and_then(Value::as_str), Some("x-y"));
}

#[test]
fn test_lexical_errors() {
    assert!(matches!(
        loads("<!zml 0.1>\n<a>\"open</a>"),
        Err(Error::UnterminatedString { .. })
    ));
    assert!(matches!(
        loads("<!zml 0.1>\n<a>\"bad`q\"</a>"),
        Err(Error::InvalidEscapeSequence { found: 'q', .. })
    ));
    assert!(matches!(
        loads("<!zml 0.1>\n<a>tru</a>"),
        Err(Error::UnexpectedCharacter { .. })
    ));
    assert!(matches!(
        loads("<!zml 0.1>\n<a-b>1</a-b>"),
        Err(Error::UnexpectedCharacter { .. })
    ));
}

#[test]
fn test_end_of_input_closes_only_the_top_level() {
    let doc = loads("<!zml 0.1>\n<a>1</a>\n<b>2</b>").unwrap();
    assert_eq!(doc.len(), 2);

    assert!(matches!(
        loads("<!zml 0.1>\n<a><b>1</b>"),
        Err(Error::UnexpectedToken { .. })
    ));
    assert!(matches!(
        loads("<!zml 0.1>\n<a>1</a></a>"),
        Err(Error::UnexpectedToken { .. })
    ));
}

#[test]
fn test_depth_limit() {
    let mut text = String::from("<!zml 0.1>\n");
    for i in 0..10 {
        text.push_str(&format!("<k{}>", i));
    }
    text.push_str("null");
    for i in (0..10).rev() {
        text.push_str(&format!("</k{}>", i));
    }

    assert!(loads(&text).is_ok());
    assert!(loads_with_options(&text, &ZmlOptions::new().with_max_depth(9)).is_ok());
    assert!(matches!(
        loads_with_options(&text, &ZmlOptions::new().with_max_depth(8)),
        Err(Error::NestingTooDeep { limit: 8, .. })
    ));
}

#[test]
fn test_invalid_key() {
    let mut doc = ZmlMap::new();
    doc.insert("white space".to_string(), Value::Null);
    assert_eq!(
        dumps(&doc),
        Err(Error::InvalidKey("white space".to_string()))
    );
}

#[test]
fn test_load_from_stream() {
    let mut text = String::from("<!zml 0.1>\n<items>\n");
    for i in 0..2000 {
        text.push_str(&format!("    <> \"entry {} ✓\" </>\n", i));
    }
    text.push_str("</items>\n");

    let doc = load(Cursor::new(text.as_bytes())).unwrap();
    let items = doc.get("items").and_then(Value::as_array).unwrap();
    assert_eq!(items.len(), 2000);
    assert_eq!(items[1999].as_str(), Some("entry 1999 ✓"));
    assert_eq!(doc, loads(&text).unwrap());
}
