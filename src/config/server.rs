use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use validator::{Validate, ValidationErrors};

use super::ParseError;
use crate::util::figment::FigmentErrorAttachable;
use crate::util::validator::{field_error, finish, IntoValidatorReport};
use crate::util::Sensitive;

#[derive(Debug, Deserialize)]
pub struct Server {
  /// **Environment variables**:
  /// - `DEVCONNECT_IP`
  #[serde(default = "Server::default_ip")]
  pub ip: IpAddr,
  /// **Environment variables**:
  /// - `DEVCONNECT_PORT` or `PORT`
  #[serde(default = "Server::default_port")]
  pub port: u16,
  /// Amount of HTTP worker threads.
  ///
  /// **Environment variables**:
  /// - `DEVCONNECT_WORKERS`
  #[serde(default = "Server::default_workers")]
  pub workers: usize,
  /// Secret used to sign and verify authentication tokens.
  ///
  /// **Environment variables**:
  /// - `DEVCONNECT_JWT_SECRET` or `JWT_SECRET`
  pub jwt_secret: Sensitive<String>,
  pub db: super::Database,
  #[serde(default)]
  pub github: super::Github,
  #[serde(default)]
  pub logging: super::Logging,
}

impl Server {
  const DEFAULT_CONFIG_FILE: &'static str = "devconnect.toml";
  const DEFAULT_PORT: u16 = 5000;

  const JWT_SECRET_MIN: usize = 12;
  const JWT_SECRET_MAX: usize = 1024;

  fn default_ip() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
  }

  const fn default_port() -> u16 {
    Self::DEFAULT_PORT
  }

  fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
  }
}

impl Server {
  pub fn load() -> Result<Self, ParseError> {
    dotenvy::dotenv().ok();

    let config = Self::figment()
      .extract::<Self>()
      .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

    config
      .validate()
      .into_validator_report()
      .change_context(ParseError)?;

    Ok(config)
  }

  /// Creates a default [`Figment`] object to load server
  /// configuration. This function is there for implementing
  /// [`Server::load`] and testing.
  ///
  /// [`Figment`]: figment::Figment
  pub(crate) fn figment() -> figment::Figment {
    use figment::{
      providers::{Env, Format, Toml},
      Figment,
    };

    let file = std::env::var("DEVCONNECT_CONFIG")
      .unwrap_or_else(|_| Self::DEFAULT_CONFIG_FILE.to_string());

    Figment::new()
      .merge(Toml::file(file))
      // Environment variable aliases
      .merge(
        Env::raw()
          .only(&["PORT", "MONGO_URI", "DATABASE_URL", "JWT_SECRET"])
          .map(|v| match v.as_str().to_ascii_lowercase().as_str() {
            "mongo_uri" | "database_url" => "db.url".into(),
            other => other.to_string().into(),
          }),
      )
      // One big con about figment (env provider to be specific) especially
      // these fields with underscore in it.
      .merge(
        Env::prefixed("DEVCONNECT_")
          .ignore(&["CONFIG"])
          .map(|v| match v.as_str().to_ascii_lowercase().as_str() {
            "jwt_secret" => "jwt_secret".into(),
            "db_timeout_secs" => "db.timeout_secs".into(),
            "github_base_url" => "github.base_url".into(),
            "github_user_agent" => "github.user_agent".into(),
            other => other.replacen('_', ".", 1).into(),
          }),
      )
  }
}

impl Validate for Server {
  fn validate(&self) -> std::result::Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let secret_len = self.jwt_secret.chars().count();
    if !(Self::JWT_SECRET_MIN..=Self::JWT_SECRET_MAX).contains(&secret_len) {
      errors.add("jwt_secret", field_error("length", "Invalid JWT secret key"));
    }

    if self.workers == 0 {
      errors.add("workers", field_error("range", "Workers must be at least 1"));
    }

    if self.db.url.trim().is_empty() {
      errors.add("db.url", field_error("required", "MongoDB connection URL is required"));
    }

    if self.db.name.trim().is_empty() {
      errors.add("db.name", field_error("required", "Database name is required"));
    }

    if url::Url::parse(&self.github.base_url).is_err() {
      errors.add("github.base_url", field_error("url", "Invalid GitHub API URL"));
    }

    finish(errors)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::LoggingStyle;
  use figment::Jail;
  use std::num::NonZeroU64;

  #[test]
  fn defaults() {
    Jail::expect_with(|jail| {
      jail.set_env("DEVCONNECT_DB_URL", "mongodb://localhost:27017");
      jail.set_env("DEVCONNECT_JWT_SECRET", "my-super-secret-key");

      let config: Server = Server::figment().extract()?;
      assert_eq!(config.ip, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
      assert_eq!(config.port, 5000);
      assert_eq!(config.db.name, "devconnect");
      assert_eq!(config.db.timeout_secs, NonZeroU64::new(5).unwrap());
      assert_eq!(config.github.base_url, "https://api.github.com");
      assert!(config.github.token.is_none());
      assert_eq!(config.logging.style, LoggingStyle::Full);
      assert!(config.validate().is_ok());

      Ok(())
    });
  }

  #[test]
  fn env_aliases() {
    Jail::expect_with(|jail| {
      jail.set_env("MONGO_URI", "mongodb://db:27017");
      jail.set_env("JWT_SECRET", "my-super-secret-key");
      jail.set_env("PORT", "8080");

      let config: Server = Server::figment().extract()?;
      assert_eq!(config.db.url.as_str(), "mongodb://db:27017");
      assert_eq!(config.jwt_secret.as_str(), "my-super-secret-key");
      assert_eq!(config.port, 8080);

      Ok(())
    });
  }

  #[test]
  fn prefixed_env_wins_over_file_and_aliases() {
    Jail::expect_with(|jail| {
      jail.create_file(
        "devconnect.toml",
        r#"
          port = 3000
          jwt_secret = "secret-from-the-file"

          [db]
          url = "mongodb://file:27017"
          name = "from_file"

          [logging]
          style = "json"
        "#,
      )?;

      jail.set_env("PORT", "4000");
      jail.set_env("DEVCONNECT_PORT", "4500");
      jail.set_env("DEVCONNECT_DB_NAME", "from_env");
      jail.set_env("DEVCONNECT_DB_TIMEOUT_SECS", "30");
      jail.set_env("DEVCONNECT_GITHUB_TOKEN", "ghp_token");
      jail.set_env("DEVCONNECT_GITHUB_USER_AGENT", "tests");

      let config: Server = Server::figment().extract()?;
      assert_eq!(config.port, 4500);
      assert_eq!(config.jwt_secret.as_str(), "secret-from-the-file");
      assert_eq!(config.db.url.as_str(), "mongodb://file:27017");
      assert_eq!(config.db.name, "from_env");
      assert_eq!(config.db.timeout_secs, NonZeroU64::new(30).unwrap());
      assert_eq!(config.github.token.as_ref().unwrap().as_str(), "ghp_token");
      assert_eq!(config.github.user_agent, "tests");
      assert_eq!(config.logging.style, LoggingStyle::Json);

      Ok(())
    });
  }

  #[test]
  fn rejects_short_jwt_secret() {
    Jail::expect_with(|jail| {
      jail.set_env("DEVCONNECT_DB_URL", "mongodb://localhost:27017");
      jail.set_env("DEVCONNECT_JWT_SECRET", "short");

      let config: Server = Server::figment().extract()?;
      let errors = config.validate().unwrap_err();
      assert!(errors.errors().contains_key("jwt_secret"));

      Ok(())
    });
  }
}
