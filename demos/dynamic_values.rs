//! Working with Value for runtime flexibility.
//!
//! Run with: cargo run --example dynamic_values

use serde::{Deserialize, Serialize};
use serde_zml::{loads, to_string, to_value, zml, Value};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build config dynamically with zml! macro
    let config = zml!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Config as ZML:\n{}", to_string(&config)?);

    // Access values dynamically
    if let Value::Object(obj) = &config {
        if let Some(Value::String(host)) = obj.get("host") {
            println!("Accessing field 'host': {}", host);
        }

        if let Some(port) = obj.get("port").and_then(|v| v.as_i64()) {
            println!("Accessing field 'port': {}", port);
        }

        if let Some(Value::Array(features)) = obj.get("features") {
            println!("Accessing field 'features': {} items\n", features.len());
        }
    }

    // Read a hand-written document with comments and mixed delimiters
    let doc = loads(
        "<!zml 0.1>\n\
         # limits for the ingest worker\n\
         <limits>\n\
         \x20   <burst> 1_000 </burst>\n\
         \x20   <ratio> 0.75 </ratio>\n\
         \x20   <label> 'ingest `'primary`'' </label>\n\
         </limits>\n",
    )?;
    if let Some(limits) = doc.get("limits").and_then(Value::as_object) {
        for (key, value) in limits {
            println!("limits.{} = {:?} ({})", key, value, value.type_name());
        }
    }

    // Convert existing struct to Value
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        roles: vec!["admin".to_string(), "developer".to_string()],
    };

    let user_value = to_value(&user)?;
    println!("\nUser as ZML:\n{}", to_string(&user_value)?);

    // Runtime type checking
    println!("Type checks:");
    println!("  is_object: {}", user_value.is_object());
    println!("  is_array:  {}", user_value.is_array());
    println!("  is_string: {}", user_value.is_string());

    Ok(())
}
