use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{
  auth::Tokens,
  config,
  database::{Data, MongoData},
  github::GithubClient,
};

/// Everything a request handler needs. Cheap to clone.
#[derive(Debug, Clone)]
pub struct App {
  pub data: Arc<dyn Data>,
  pub github: GithubClient,
  pub tokens: Arc<Tokens>,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
  /// Connects to the database and prepares its collections.
  /// Fails if the database cannot be reached.
  #[tracing::instrument(skip_all)]
  pub async fn new(cfg: &config::Server) -> Result<Self, AppError> {
    let data = MongoData::connect(&cfg.db).await.change_context(AppError)?;
    Self::with_data(cfg, Arc::new(data))
  }

  pub fn with_data(cfg: &config::Server, data: Arc<dyn Data>) -> Result<Self, AppError> {
    let github = GithubClient::new(&cfg.github).change_context(AppError)?;
    let tokens = Tokens::new(cfg.jwt_secret.as_str());

    Ok(Self {
      data,
      github,
      tokens: Arc::new(tokens),
    })
  }
}

#[cfg(test)]
impl App {
  /// App backed by an in-memory store. The store is returned too
  /// so tests can inspect it.
  pub fn for_tests() -> (Self, crate::database::mock::MockData) {
    use crate::util::Sensitive;
    use std::net::{IpAddr, Ipv4Addr};
    use std::num::NonZeroU64;

    let cfg = config::Server {
      ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
      port: 5000,
      workers: 1,
      jwt_secret: Sensitive::new("my-super-secret-test-key".to_string()),
      db: config::Database {
        url: Sensitive::new("mongodb://localhost:27017".to_string()),
        name: "devconnect_test".to_string(),
        timeout_secs: NonZeroU64::MIN,
      },
      github: config::Github::default(),
      logging: config::Logging::default(),
    };

    let data = crate::database::mock::MockData::new();
    let app = Self::with_data(&cfg, Arc::new(data.clone())).unwrap();
    (app, data)
  }
}
