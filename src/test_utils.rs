use std::fmt::Debug;

use crate::{http, services, util::Sensitive, App};

pub trait TestResultExt {
  /// Serializes the error into [`serde_json::Value`] so it can be
  /// compared against the body clients would receive.
  ///
  /// ## Panics
  /// It will panic if the result is [`Ok`].
  fn expect_error_json(self) -> serde_json::Value;
}

impl<T: Debug> TestResultExt for std::result::Result<T, http::Error> {
  fn expect_error_json(self) -> serde_json::Value {
    match self {
      Ok(okay) => panic!("unexpected value Ok({okay:?}), expected error"),
      Err(error) => serde_json::to_value(error).unwrap(),
    }
  }
}

/// Registers a user with the password `secret1` and returns the
/// session for it along with its token.
pub async fn register(app: &App, name: &str, email: &str) -> (http::SessionUser, String) {
  let response = services::users::Register {
    name,
    email,
    password: Sensitive::new("secret1"),
  }
  .perform(app)
  .await
  .unwrap();

  let id = app.tokens.verify(&response.token).unwrap();
  (http::SessionUser { id }, response.token)
}
