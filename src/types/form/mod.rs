//! Request bodies accepted by the API. Every form is validated
//! before it reaches the database.
use serde::{Deserialize, Deserializer};

pub mod auth;
pub mod posts;
pub mod profile;
pub mod users;

/// Treats blank strings the same as a missing field.
fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
  let value = Option::<String>::deserialize(deserializer)?;
  Ok(value.and_then(|v| {
    let trimmed = v.trim();
    if trimmed.is_empty() {
      None
    } else if trimmed.len() == v.len() {
      Some(v)
    } else {
      Some(trimmed.to_string())
    }
  }))
}

fn is_blank(value: &str) -> bool {
  value.trim().is_empty()
}
