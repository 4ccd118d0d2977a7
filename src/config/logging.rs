use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Logging {
  /// **Environment variables**:
  /// - `DEVCONNECT_LOGGING_STYLE`
  #[serde(default)]
  pub style: LoggingStyle,
  /// Filter directives in the same syntax as `RUST_LOG`.
  /// `RUST_LOG` takes precedence when both are set.
  ///
  /// **Environment variables**:
  /// - `DEVCONNECT_LOGGING_TARGETS`
  #[serde(default = "Logging::default_targets")]
  pub targets: String,
}

impl Logging {
  fn default_targets() -> String {
    "info".to_string()
  }
}

impl Default for Logging {
  fn default() -> Self {
    Self {
      style: LoggingStyle::default(),
      targets: Self::default_targets(),
    }
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingStyle {
  Compact,
  #[default]
  Full,
  Pretty,
  Json,
}
