use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::{level_filters::LevelFilter, warn, Subscriber};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
  layer::SubscriberExt, registry::LookupSpan, EnvFilter, Layer, Registry,
};

use crate::config::{self, LoggingStyle};

#[derive(Debug, Error)]
#[error("Failed to initialize logging")]
pub struct LoggingInitError;

pub fn init(config: &config::Logging) -> Result<(), LoggingInitError> {
  let rust_log = std::env::var("RUST_LOG").ok();
  let targets = rust_log.as_deref().unwrap_or(&config.targets);

  let registry = Registry::default()
    .with(fmt_layer(config.style).with_filter(make_env_filter(targets)))
    .with(ErrorLayer::default());

  tracing::subscriber::set_global_default(registry)
    .change_context(LoggingInitError)
    .attach_printable("already initialized logging")?;

  if rust_log.is_some() && std::env::var("DEVCONNECT_LOGGING_TARGETS").is_ok() {
    warn!("Both `RUST_LOG` and `DEVCONNECT_LOGGING_TARGETS` are set, using `RUST_LOG`");
  }

  Ok(())
}

fn fmt_layer<S>(style: LoggingStyle) -> Box<dyn Layer<S> + Send + Sync>
where
  S: Subscriber + for<'a> LookupSpan<'a>,
{
  let layer = tracing_subscriber::fmt::layer();
  match style {
    LoggingStyle::Compact => layer.compact().boxed(),
    LoggingStyle::Full => layer.boxed(),
    LoggingStyle::Pretty => layer.pretty().boxed(),
    LoggingStyle::Json => layer.json().with_current_span(true).boxed(),
  }
}

fn make_env_filter(targets: &str) -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .parse_lossy(targets)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_make_env_filter() {
    let filter = make_env_filter("devconnect=debug,mongodb=warn");
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

    let filter = make_env_filter("");
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
  }
}
