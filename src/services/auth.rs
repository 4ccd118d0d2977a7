use crate::auth::verify_password;
use crate::http::{Error, SessionUser};
use crate::types::{self, view::TokenResponse, view::UserView};
use crate::util::Sensitive;
use crate::App;

#[derive(Debug)]
pub struct Login<'a> {
  pub email: &'a str,
  pub password: Sensitive<&'a str>,
}

impl Login<'_> {
  #[tracing::instrument(skip(app), name = "services.auth.login")]
  pub async fn perform(self, app: &App) -> Result<TokenResponse, Error> {
    let email = self.email.trim().to_lowercase();

    // Unknown emails and wrong passwords must be indistinguishable
    let Some(user) = app.data.find_user_by_email(&email).await? else {
      return Err(invalid_credentials());
    };

    let password = Sensitive::new(self.password.into_inner().to_string());
    if !verify_password(password, user.password_hash).await? {
      return Err(invalid_credentials());
    }

    let token = app.tokens.issue(user.id)?;
    Ok(TokenResponse { token })
  }
}

fn invalid_credentials() -> Error {
  types::Error::invalid_request("Invalid credentials").into()
}

/// Returns the user behind the session, without the password hash.
#[derive(Debug)]
pub struct CurrentUser;

impl CurrentUser {
  #[tracing::instrument(skip(app), name = "services.auth.current_user")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<UserView, Error> {
    session.fetch(app).await.map(UserView::from)
  }
}

#[cfg(test)]
mod tests {
  use assert_json_diff::assert_json_include;
  use serde_json::json;

  use super::*;
  use crate::test_utils::{self, TestResultExt};
  use crate::types::id::UserId;

  #[tokio::test]
  async fn should_login() {
    let (app, _) = App::for_tests();
    let (session, _) = test_utils::register(&app, "Alice", "alice@example.com").await;

    let response = Login {
      email: " ALICE@example.com",
      password: Sensitive::new("secret1"),
    }
    .perform(&app)
    .await
    .unwrap();

    assert_eq!(app.tokens.verify(&response.token).unwrap(), session.id);
  }

  #[tokio::test]
  async fn should_not_tell_which_credential_is_wrong() {
    let (app, _) = App::for_tests();
    let _ = test_utils::register(&app, "Alice", "alice@example.com").await;

    let wrong_password = Login {
      email: "alice@example.com",
      password: Sensitive::new("secret2"),
    }
    .perform(&app)
    .await
    .expect_error_json();

    let unknown_email = Login {
      email: "bob@example.com",
      password: Sensitive::new("secret1"),
    }
    .perform(&app)
    .await
    .expect_error_json();

    assert_eq!(wrong_password, unknown_email);
    assert_json_include!(
      actual: wrong_password,
      expected: json!({ "errors": [{ "message": "Invalid credentials" }] }),
    );
  }

  #[tokio::test]
  async fn should_get_current_user() {
    let (app, _) = App::for_tests();
    let (session, _) = test_utils::register(&app, "Alice", "alice@example.com").await;

    let user = CurrentUser.perform(&app, &session).await.unwrap();
    let value = serde_json::to_value(user).unwrap();
    assert_json_include!(
      actual: value.clone(),
      expected: json!({ "id": session.id.to_hex(), "name": "Alice" }),
    );
    assert!(value.get("password_hash").is_none());
  }

  #[tokio::test]
  async fn should_reject_deleted_user() {
    let (app, _) = App::for_tests();
    let session = SessionUser { id: UserId::new() };

    let error = CurrentUser.perform(&app, &session).await.expect_error_json();
    assert_json_include!(
      actual: error,
      expected: json!({ "errors": [{ "message": "Token is not valid" }] }),
    );
  }
}
