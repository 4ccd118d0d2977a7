use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::{Context, Report};
use validator::ValidationErrors;

use super::Error;
use crate::types::Error as ErrorType;

impl actix_web::ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self.error_type {
      ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
      ErrorType::InvalidFormBody(..) | ErrorType::InvalidRequest(..) => StatusCode::BAD_REQUEST,
      ErrorType::Unauthorized(..) => StatusCode::UNAUTHORIZED,
      ErrorType::Forbidden(..) => StatusCode::FORBIDDEN,
      ErrorType::NotFound(..) => StatusCode::NOT_FOUND,
      ErrorType::Conflict(..) => StatusCode::CONFLICT,
    }
  }

  fn error_response(&self) -> HttpResponse<BoxBody> {
    if let ErrorType::Internal = self.error_type {
      tracing::error!(report = ?self.report, trace = %self.trace, "Internal error occurred");
    }
    HttpResponse::build(self.status_code()).json(&self.error_type)
  }
}

impl serde::Serialize for Error {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.error_type.serialize(serializer)
  }
}

impl From<ErrorType> for Error {
  fn from(value: ErrorType) -> Self {
    Error::new(value)
  }
}

// Anything reported from the database, hashing or GitHub
// layers is unexpected from the client's point of view.
impl<C: Context> From<Report<C>> for Error {
  fn from(value: Report<C>) -> Self {
    Error::from_report(ErrorType::Internal, value)
  }
}

impl From<ValidationErrors> for Error {
  fn from(value: ValidationErrors) -> Self {
    #[derive(Debug, thiserror::Error)]
    #[error("Validation error occurred")]
    struct ValidateError;
    Error::from_context(ErrorType::InvalidFormBody(value.into()), ValidateError)
  }
}
