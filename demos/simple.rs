//! Basic ZML serialization and deserialization.
//!
//! Run with: cargo run --example simple

use serde::{Deserialize, Serialize};
use serde_zml::{from_str, to_string};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    email: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Team {
    name: String,
    members: Vec<User>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let team = Team {
        name: "Core".to_string(),
        members: vec![
            User {
                id: 42,
                name: "Alice Johnson".to_string(),
                email: "alice@example.com".to_string(),
            },
            User {
                id: 43,
                name: "Bob Smith".to_string(),
                email: "bob@example.com".to_string(),
            },
        ],
    };

    // Serialize to ZML
    let text = to_string(&team)?;
    println!("ZML output:\n{}", text);

    // Deserialize back to struct
    let team_back: Team = from_str(&text)?;
    assert_eq!(team, team_back);
    println!("✓ Round-trip successful");

    Ok(())
}
