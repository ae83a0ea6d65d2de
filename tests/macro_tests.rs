use serde::Serialize;
use serde_zml::{dumps, loads, zml, Value, ZmlMap};

#[test]
fn test_zml_macro_scalars() {
    assert_eq!(zml!(null), Value::Null);
    assert_eq!(zml!(true), Value::Bool(true));
    assert_eq!(zml!(false), Value::Bool(false));
    assert_eq!(zml!(42), Value::Int(42));
    assert_eq!(zml!(-123), Value::Int(-123));
    assert_eq!(zml!(3.5), Value::Float(3.5));
    assert_eq!(zml!("hello world"), Value::String("hello world".to_string()));
    assert_eq!(zml!(""), Value::String(String::new()));
}

#[test]
fn test_zml_macro_arrays() {
    assert_eq!(zml!([]), Value::Array(vec![]));

    assert_eq!(
        zml!([1, "hello", true, null]),
        Value::Array(vec![
            Value::Int(1),
            Value::String("hello".to_string()),
            Value::Bool(true),
            Value::Null,
        ])
    );

    assert_eq!(
        zml!([[1], [], {}]),
        Value::Array(vec![
            Value::Array(vec![Value::Int(1)]),
            Value::Array(vec![]),
            Value::Object(ZmlMap::new()),
        ])
    );
}

#[test]
fn test_zml_macro_objects_keep_order() {
    let value = zml!({
        "zeta": 1,
        "alpha": 2,
        "mid": 3
    });
    let keys: Vec<_> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_zml_macro_nested() {
    let nested = zml!({
        "user": {
            "id": 123,
            "name": "Bob",
            "active": true
        },
        "tags": ["admin", "developer"],
        "count": 42
    });

    let obj = nested.as_object().expect("object");
    assert_eq!(obj.len(), 3);

    let user = obj.get("user").and_then(Value::as_object).expect("user object");
    assert_eq!(user.get("id"), Some(&Value::Int(123)));
    assert_eq!(user.get("name").and_then(Value::as_str), Some("Bob"));
    assert_eq!(user.get("active").and_then(Value::as_bool), Some(true));

    let tags = obj.get("tags").and_then(Value::as_array).expect("tags array");
    assert_eq!(tags, &vec![Value::from("admin"), Value::from("developer")]);
}

#[test]
fn test_zml_macro_expressions() {
    #[derive(Serialize)]
    struct Limits {
        low: i32,
        high: i32,
    }

    let name = String::from("probe");
    let limits = Limits { low: -5, high: 5 };
    let value = zml!({
        "name": name,
        "limits": limits,
        "offset": (-1.5)
    });

    let obj = value.as_object().unwrap();
    assert_eq!(obj.get("name").and_then(Value::as_str), Some("probe"));
    assert_eq!(obj.get("offset"), Some(&Value::Float(-1.5)));
    let limits = obj.get("limits").and_then(Value::as_object).unwrap();
    assert_eq!(limits.get("low"), Some(&Value::Int(-5)));
}

#[test]
fn test_zml_macro_document_round_trip() {
    let value = zml!({
        "server": {
            "host": "localhost",
            "port": 8080,
            "replicas": [],
            "labels": {}
        }
    });
    let doc = value.as_object().unwrap();
    assert_eq!(&loads(&dumps(doc).unwrap()).unwrap(), doc);
}

#[test]
fn test_value_methods() {
    let null_val = zml!(null);
    assert!(null_val.is_null());
    assert!(!null_val.is_bool());
    assert!(!null_val.is_number());
    assert!(!null_val.is_string());
    assert!(!null_val.is_array());
    assert!(!null_val.is_object());

    let str_val = zml!("hello");
    assert!(str_val.is_string());
    assert_eq!(str_val.as_str(), Some("hello"));

    let array_val = zml!([1, 2, 3]);
    assert!(array_val.is_array());
    assert_eq!(array_val.as_array().unwrap().len(), 3);

    let obj_val = zml!({"key": "value"});
    assert!(obj_val.is_object());
    assert_eq!(obj_val.as_object().unwrap().len(), 1);
}
