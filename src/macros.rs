/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Object keys must be string literals. Any other expression, such as a variable or a
/// parenthesized negative number, is converted through [`to_value`](crate::to_value)
/// and becomes `Value::Null` if it cannot be serialized.
///
/// # Examples
///
/// ```rust
/// use serde_zml::{zml, Value};
///
/// let limit = -3;
/// let doc = zml!({
///     "name": "probe",
///     "enabled": true,
///     "limits": [1, 2, (limit)],
///     "extra": null
/// });
/// let limits = doc.as_object().and_then(|m| m.get("limits")).unwrap();
/// assert_eq!(limits.as_array().map(Vec::len), Some(3));
/// ```
#[macro_export]
macro_rules! zml {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::zml!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ZmlMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ZmlMap::new();
        $(
            object.insert($key.to_string(), $crate::zml!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($s:expr) => {
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    };
}
