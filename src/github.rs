use error_stack::{Report, Result, ResultExt};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use thiserror::Error;

use crate::{config, util::Sensitive};

/// Alphanumeric characters or single hyphens, cannot begin or
/// end with a hyphen and at most 39 characters long.
#[allow(clippy::expect_used)]
pub static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9]){0,38}$")
    .expect("compile GitHub username regex")
});

#[must_use]
pub fn is_valid_username(username: &str) -> bool {
  username.len() <= 39 && USERNAME_REGEX.is_match(username)
}

#[derive(Debug, Error)]
#[error("Failed to request GitHub API")]
pub struct GithubError;

/// Thin client over the public GitHub REST API, only used to
/// list the latest repositories of a profile's GitHub account.
#[derive(Debug, Clone)]
pub struct GithubClient {
  http: reqwest::Client,
  base_url: Url,
  token: Option<Sensitive<String>>,
}

impl GithubClient {
  pub fn new(config: &config::Github) -> Result<Self, GithubError> {
    let base_url = Url::parse(&config.base_url)
      .change_context(GithubError)
      .attach_printable_lazy(|| format!("invalid base url {:?}", config.base_url))?;

    let http = reqwest::Client::builder()
      .user_agent(config.user_agent.clone())
      .build()
      .change_context(GithubError)?;

    Ok(Self {
      http,
      base_url,
      token: config.token.clone(),
    })
  }

  /// Returns `None` if GitHub does not respond with a success
  /// status, usually because the user does not exist.
  #[tracing::instrument(skip(self))]
  pub async fn repos(&self, username: &str) -> Result<Option<serde_json::Value>, GithubError> {
    let url = self.repos_url(username)?;

    let mut request = self.http.get(url);
    if let Some(token) = self.token.as_ref() {
      request = request.bearer_auth(token.as_str());
    }

    let response = request.send().await.change_context(GithubError)?;
    if !response.status().is_success() {
      tracing::debug!(status = %response.status(), "GitHub responded with an error");
      return Ok(None);
    }

    response.json().await.change_context(GithubError).map(Some)
  }

  fn repos_url(&self, username: &str) -> Result<Url, GithubError> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|()| Report::new(GithubError).attach_printable("base url cannot have paths"))?
      .pop_if_empty()
      .extend(["users", username, "repos"]);

    url.set_query(Some("per_page=5&sort=created:asc"));
    Ok(url)
  }
}
