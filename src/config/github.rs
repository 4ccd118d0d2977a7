use serde::Deserialize;

use crate::util::Sensitive;

/// Where GitHub repositories of a profile are fetched from.
#[derive(Debug, Deserialize)]
pub struct Github {
  /// **Environment variables**:
  /// - `DEVCONNECT_GITHUB_BASE_URL`
  #[serde(default = "Github::default_base_url")]
  pub base_url: String,
  /// Optional personal access token, raises GitHub's rate limit.
  ///
  /// **Environment variables**:
  /// - `DEVCONNECT_GITHUB_TOKEN`
  #[serde(default)]
  pub token: Option<Sensitive<String>>,
  /// GitHub rejects requests without a `User-Agent` header.
  ///
  /// **Environment variables**:
  /// - `DEVCONNECT_GITHUB_USER_AGENT`
  #[serde(default = "Github::default_user_agent")]
  pub user_agent: String,
}

impl Github {
  fn default_base_url() -> String {
    "https://api.github.com".to_string()
  }

  fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
  }
}

impl Default for Github {
  fn default() -> Self {
    Self {
      base_url: Self::default_base_url(),
      token: None,
      user_agent: Self::default_user_agent(),
    }
  }
}
