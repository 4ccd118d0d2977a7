use crate::auth::{avatar_url, hash_password};
use crate::database::forms::CreateUser;
use crate::http::Error;
use crate::types::{self, view::TokenResponse};
use crate::util::Sensitive;
use crate::App;

#[derive(Debug)]
pub struct Register<'a> {
  pub name: &'a str,
  pub email: &'a str,
  pub password: Sensitive<&'a str>,
}

impl Register<'_> {
  #[tracing::instrument(skip(app), name = "services.users.register")]
  pub async fn perform(self, app: &App) -> Result<TokenResponse, Error> {
    // Emails are compared case insensitively
    let email = self.email.trim().to_lowercase();

    if app.data.find_user_by_email(&email).await?.is_some() {
      return Err(user_exists());
    }

    let password = Sensitive::new(self.password.into_inner().to_string());
    let password_hash = hash_password(password).await?;
    let avatar = avatar_url(&email);

    let form = CreateUser {
      name: self.name.trim(),
      email: &email,
      password_hash: Sensitive::new(&password_hash),
      avatar: &avatar,
    };

    // Someone else may have registered the same email
    // while the password was being hashed.
    let Some(user) = app.data.create_user(&form).await? else {
      return Err(user_exists());
    };

    tracing::info!(id = %user.id, "registered a new user");

    let token = app.tokens.issue(user.id)?;
    Ok(TokenResponse { token })
  }
}

fn user_exists() -> Error {
  types::Error::conflict("User Already Exists").into()
}

#[cfg(test)]
mod tests {
  use assert_json_diff::assert_json_include;
  use serde_json::json;

  use super::*;
  use crate::auth::verify_password;
  use crate::test_utils::TestResultExt;

  #[tokio::test]
  async fn should_register() {
    let (app, data) = App::for_tests();

    let response = Register {
      name: " Alice ",
      email: "Alice@Example.com",
      password: Sensitive::new("secret1"),
    }
    .perform(&app)
    .await
    .unwrap();

    let id = app.tokens.verify(&response.token).unwrap();
    let user = app.data.find_user_by_id(id).await.unwrap().unwrap();
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.avatar, avatar_url("alice@example.com"));
    assert_ne!(user.password_hash, "secret1");
    assert!(verify_password(Sensitive::new("secret1".into()), user.password_hash)
      .await
      .unwrap());

    assert_eq!(data.users_count().await, 1);
  }

  #[tokio::test]
  async fn should_reject_if_email_is_taken() {
    let (app, data) = App::for_tests();
    let _ = crate::test_utils::register(&app, "Alice", "alice@example.com").await;

    let error = Register {
      name: "Bob",
      email: "ALICE@example.com",
      password: Sensitive::new("secret2"),
    }
    .perform(&app)
    .await
    .expect_error_json();

    assert_json_include!(
      actual: error,
      expected: json!({ "errors": [{ "message": "User Already Exists" }] }),
    );
    assert_eq!(data.users_count().await, 1);
  }
}
