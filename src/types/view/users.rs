use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::schema::User;
use crate::types::id::UserId;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
  pub token: String,
}

/// The authenticated user. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserView {
  #[serde(with = "crate::types::id::hex")]
  pub id: UserId,
  pub name: String,
  pub email: String,
  pub avatar: String,
  pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
  fn from(value: User) -> Self {
    Self {
      id: value.id,
      name: value.name,
      email: value.email,
      avatar: value.avatar,
      created_at: value.created_at,
    }
  }
}

/// Public part of a user embedded into other resources.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
  #[serde(with = "crate::types::id::hex")]
  pub id: UserId,
  pub name: String,
  pub avatar: String,
}

impl From<&User> for UserSummary {
  fn from(value: &User) -> Self {
    Self {
      id: value.id,
      name: value.name.clone(),
      avatar: value.avatar.clone(),
    }
  }
}
