use serde::{Deserialize, Serialize};
use serde_zml::{from_str, to_string, to_string_with_options, to_value, Error, Value, ZmlOptions};
use std::collections::{BTreeMap, HashMap};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
    note: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Wrapper<T> {
    value: T,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
enum Status {
    Pending,
    Shipped { carrier: String, days: u8 },
    Split(u32, u32),
    Refunded(f64),
}

fn alice() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    }
}

fn assert_roundtrip<T>(original: &T)
where
    T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug,
{
    let text = to_string(original).unwrap();
    let deserialized: T = from_str(&text).unwrap();
    assert_eq!(*original, deserialized);
}

fn assert_value_roundtrip<T>(value: T)
where
    T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug,
{
    assert_roundtrip(&Wrapper { value });
}

#[test]
fn test_simple_struct() {
    let user = alice();
    let text = to_string(&user).unwrap();
    println!("User ZML:\n{}", text);

    assert_eq!(
        text,
        "<!zml 0.1>\n\
         <id> 123 </id>\n\
         <name> \"Alice\" </name>\n\
         <active> true </active>\n\
         <tags>\n    <> \"admin\" </>\n    <> \"developer\" </>\n</tags>\n"
    );

    let user_back: User = from_str(&text).unwrap();
    assert_eq!(user, user_back);
}

#[test]
fn test_nested_struct() {
    let order = Order {
        order_id: 12345,
        customer: User {
            tags: vec!["vip".to_string()],
            ..alice()
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.99,
                quantity: 1,
            },
        ],
        total: 109.97,
        note: None,
    };

    let text = to_string(&order).unwrap();
    println!("Order ZML:\n{}", text);

    let order_back: Order = from_str(&text).unwrap();
    assert_eq!(order, order_back);
}

#[test]
fn test_enums() {
    for status in [
        Status::Pending,
        Status::Shipped {
            carrier: "ACME".to_string(),
            days: 3,
        },
        Status::Split(2, 5),
        Status::Refunded(12.5),
    ] {
        assert_value_roundtrip(status);
    }
}

#[test]
fn test_primitives() {
    assert_value_roundtrip(42i32);
    assert_value_roundtrip(3.5f64);
    assert_value_roundtrip(true);
    assert_value_roundtrip(false);
    assert_value_roundtrip("hello world".to_string());
    assert_value_roundtrip('x');
    assert_value_roundtrip(vec![1, 2, 3, 4, 5]);
    assert_value_roundtrip((1u8, "two".to_string(), 3.0f64));
    assert_value_roundtrip(());
}

#[test]
fn test_numbers() {
    assert_value_roundtrip(-128i8);
    assert_value_roundtrip(32767i16);
    assert_value_roundtrip(-2147483648i32);
    assert_value_roundtrip(i64::MAX);
    assert_value_roundtrip(i64::MIN);
    assert_value_roundtrip(255u8);
    assert_value_roundtrip(65535u16);
    assert_value_roundtrip(u32::MAX);
    assert_value_roundtrip(u64::MAX);
    assert_value_roundtrip(i128::MIN);
    assert_value_roundtrip(u128::MAX);

    assert_value_roundtrip(0.0f32);
    assert_value_roundtrip(-2.5f32);
    assert_value_roundtrip(0.1f64);
    assert_value_roundtrip(-5.75f64);
    assert_value_roundtrip(1e300f64);
    assert_value_roundtrip(5e-324f64);
}

#[test]
fn test_integral_floats_stay_floats() {
    let text = to_string(&Wrapper { value: 2.0f64 }).unwrap();
    assert_eq!(text, "<!zml 0.1>\n<value> 2.0 </value>\n");
    let doc = serde_zml::loads(&text).unwrap();
    assert_eq!(doc.get("value"), Some(&Value::Float(2.0)));
}

#[test]
fn test_non_finite_floats_are_rejected() {
    for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(
            to_string(&Wrapper { value: f }),
            Err(Error::UnsupportedValueType(_))
        ));
    }
}

#[test]
fn test_special_strings() {
    let special_strings = [
        "",
        "hello, world",
        "line1\nline2",
        "tab\there",
        "carriage\rreturn",
        "back\u{0008}space",
        "`backtick` and ``double``",
        "\"quoted\"",
        " leading space",
        "trailing space ",
        "true",
        "null",
        "empty_obj",
        "123",
        "<tag></tag>",
        "# not a comment",
        "日本語 ✓",
    ];

    for s in special_strings {
        println!("Testing string: {:?}", s);
        assert_value_roundtrip(s.to_string());
    }
}

#[test]
fn test_options() {
    let user = alice();
    for delimiter in ['\'', '|', '$', '«'] {
        let options = ZmlOptions::new().with_delimiter(delimiter).with_indent(2);
        let text = to_string_with_options(&user, &options).unwrap();
        println!("Delimiter {:?}:\n{}", delimiter, text);

        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user, user_back);
    }
}

#[test]
fn test_reserved_delimiter() {
    let options = ZmlOptions::new().with_delimiter('<');
    assert_eq!(
        to_string_with_options(&alice(), &options),
        Err(Error::InvalidDelimiter('<'))
    );
}

#[test]
fn test_to_value() {
    let value = to_value(&alice()).unwrap();

    match value {
        Value::Object(obj) => {
            assert_eq!(obj.get("id"), Some(&Value::Int(123)));
            assert_eq!(obj.get("name"), Some(&Value::String("Alice".to_string())));
            assert_eq!(obj.get("active"), Some(&Value::Bool(true)));

            if let Some(Value::Array(tags)) = obj.get("tags") {
                assert_eq!(tags.len(), 2);
                assert_eq!(tags[0], Value::String("admin".to_string()));
            } else {
                panic!("Expected tags to be an array");
            }
        }
        _ => panic!("Expected object"),
    }
}

#[test]
fn test_empty_collections() {
    assert_value_roundtrip(Vec::<i32>::new());
    assert_value_roundtrip(HashMap::<String, i32>::new());

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Empty {}

    assert_roundtrip(&Empty {});
    assert_eq!(to_string(&Empty {}).unwrap(), "<!zml 0.1>\nempty_obj\n");
    assert_value_roundtrip(Empty {});
}

#[test]
fn test_maps() {
    let mut scores = BTreeMap::new();
    scores.insert("alice".to_string(), 10);
    scores.insert("bob".to_string(), -3);
    assert_roundtrip(&scores);

    let mut bad = BTreeMap::new();
    bad.insert("not a key".to_string(), 1);
    assert_eq!(
        to_string(&bad),
        Err(Error::InvalidKey("not a key".to_string()))
    );
}

#[test]
fn test_type_mismatch() {
    let result: Result<User, _> = from_str("<!zml 0.1>\n<id> \"one\" </id>");
    assert!(matches!(result, Err(Error::Custom(_))));
}
