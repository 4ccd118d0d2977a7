use chrono::Utc;
use error_stack::{Result, ResultExt};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::id::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoginClaims {
  pub user: ClaimsUser,
  pub iat: i64,
  pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClaimsUser {
  #[serde(with = "crate::types::id::hex")]
  pub id: UserId,
}

#[derive(Debug, Error)]
#[error("Failed to issue login token")]
pub struct TokenError;

/// The token is malformed, expired, signed with another key or
/// its subject is not a valid user id.
#[derive(Debug, Error)]
#[error("Token is not valid")]
pub struct Rejected;

/// Issues and verifies HS256 signed login tokens with the
/// server's secret.
pub struct Tokens {
  encoding: EncodingKey,
  decoding: DecodingKey,
  validation: Validation,
}

impl Tokens {
  /// Tokens expire 10 hours after they are issued.
  pub const LIFETIME_SECS: i64 = 36_000;

  #[must_use]
  pub fn new(secret: &str) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp"]);

    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      validation,
    }
  }

  pub fn issue(&self, user: UserId) -> Result<String, TokenError> {
    self.issue_at(user, Utc::now().timestamp())
  }

  fn issue_at(&self, user: UserId, iat: i64) -> Result<String, TokenError> {
    let claims = LoginClaims {
      user: ClaimsUser { id: user },
      iat,
      exp: iat + Self::LIFETIME_SECS,
    };
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .change_context(TokenError)
  }

  pub fn verify(&self, token: &str) -> Result<UserId, Rejected> {
    jsonwebtoken::decode::<LoginClaims>(token, &self.decoding, &self.validation)
      .map(|data| data.claims.user.id)
      .change_context(Rejected)
  }
}

impl std::fmt::Debug for Tokens {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Tokens")
      .field("algorithm", &Algorithm::HS256)
      .finish_non_exhaustive()
  }
}
