use actix_web::{http::header, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use thiserror::Error as ThisError;

use super::Error;
use crate::{schema::User, types, types::id::UserId, App};

/// Header carrying the login token.
pub const TOKEN_HEADER: &str = "x-auth-token";

/// The user who signed the request. Extracting it fails
/// with 401 if the token is missing or invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
  pub id: UserId,
}

impl SessionUser {
  /// Loads the user record behind the token. Tokens of
  /// deleted accounts are treated as invalid.
  #[tracing::instrument(skip(app))]
  pub async fn fetch(&self, app: &App) -> Result<User, Error> {
    app
      .data
      .find_user_by_id(self.id)
      .await?
      .ok_or_else(|| types::Error::unauthorized("Token is not valid").into())
  }
}

fn read_token(req: &HttpRequest) -> Option<&str> {
  let headers = req.headers();
  let token = headers
    .get(TOKEN_HEADER)
    .and_then(|v| v.to_str().ok())
    .or_else(|| {
      headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    })
    .map(str::trim);

  token.filter(|v| !v.is_empty())
}

impl FromRequest for SessionUser {
  type Error = Error;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let Some(token) = read_token(req) else {
      return ready(Err(
        types::Error::unauthorized("No token, authorization denied").into(),
      ));
    };

    let Some(app) = req.app_data::<web::Data<App>>() else {
      #[derive(Debug, ThisError)]
      #[error("The web app has no available configuration")]
      struct NoConfig;
      return ready(Err(Error::from_context(types::Error::Internal, NoConfig)));
    };

    let result = app
      .tokens
      .verify(token)
      .map(|id| SessionUser { id })
      .map_err(|e| Error::from_report(types::Error::unauthorized("Token is not valid"), e));

    ready(result)
  }
}
