use serde::Deserialize;
use std::num::NonZeroU64;

use crate::util::Sensitive;

/// Configuration for connecting to the MongoDB database.
#[derive(Debug, Deserialize)]
pub struct Database {
  /// Connection URL of the MongoDB deployment.
  ///
  /// **Environment variables**:
  /// - `DEVCONNECT_DB_URL`, `MONGO_URI` or `DATABASE_URL`
  pub url: Sensitive<String>,
  /// Name of the database where all collections live.
  ///
  /// **Environment variables**:
  /// - `DEVCONNECT_DB_NAME`
  #[serde(default = "Database::default_name")]
  pub name: String,
  /// How long this server can wait for the database to
  /// acknowledge before giving up on startup.
  ///
  /// **Environment variables**:
  /// - `DEVCONNECT_DB_TIMEOUT_SECS`
  #[serde(default = "Database::default_timeout_secs")]
  pub timeout_secs: NonZeroU64,
}

impl Database {
  const DEFAULT_NAME: &'static str = "devconnect";
  const DEFAULT_TIMEOUT_SECS: u64 = 5;

  // Required by serde
  fn default_name() -> String {
    Self::DEFAULT_NAME.to_string()
  }

  const fn default_timeout_secs() -> NonZeroU64 {
    match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
      Some(n) => n,
      None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
    }
  }
}
