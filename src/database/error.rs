use error_stack::{Report, ResultExt};
use thiserror::Error;

/// Database related errors
#[derive(Debug, Error)]
pub enum Error {
  /// The configured connection url could not be parsed
  /// by the MongoDB driver.
  #[error("invalid connection url")]
  InvalidUrl,
  /// The database server could not be reached while
  /// establishing the connection at startup.
  #[error("database server is unreachable")]
  Unreachable,
  /// Collection indexes could not be created.
  #[error("could not setup collection indexes")]
  Migration,
  /// A document could not be converted into BSON.
  #[error("could not encode document")]
  Encode,
  /// Any other error returned by the driver.
  #[error("received a database error")]
  Internal,
}

/// Lazily typed [`std::result::Result`] but the error generic
/// is filled up with [a database error](Error).
pub type Result<T> = error_stack::Result<T, Error>;

/// Converts from a generic [`mongodb`] result into a
/// [database compatible error](Error).
pub trait ErrorExt<T> {
  fn into_db_error(self) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, mongodb::error::Error> {
  fn into_db_error(self) -> Result<T> {
    self.change_context(Error::Internal)
  }
}

impl<T> ErrorExt<T> for std::result::Result<T, bson::ser::Error> {
  fn into_db_error(self) -> Result<T> {
    self.map_err(|e| Report::new(e).change_context(Error::Encode))
  }
}

/// Whether the driver rejected a write because it violates
/// a unique index.
pub(crate) fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
  use mongodb::error::{ErrorKind, WriteFailure};

  const DUPLICATE_KEY: i32 = 11000;
  matches!(
    error.kind.as_ref(),
    ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
  )
}
