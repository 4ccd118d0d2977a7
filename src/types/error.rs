use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt::Display;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Errors that clients are allowed to see.
///
/// Every variant serializes into the same shape:
///
/// ```json
/// { "errors": [{ "field": "email", "message": "Please include a valid email" }] }
/// ```
///
/// where `field` is only present for form body errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
  Internal,
  InvalidFormBody(FieldErrors),
  InvalidRequest(Cow<'static, str>),
  Unauthorized(Cow<'static, str>),
  Forbidden(Cow<'static, str>),
  NotFound(Cow<'static, str>),
  Conflict(Cow<'static, str>),
}

impl Error {
  pub fn invalid_request(message: impl Into<Cow<'static, str>>) -> Self {
    Self::InvalidRequest(message.into())
  }

  pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
    Self::Unauthorized(message.into())
  }

  pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
    Self::Forbidden(message.into())
  }

  pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
    Self::NotFound(message.into())
  }

  pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
    Self::Conflict(message.into())
  }
}

impl Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Error::Internal => f.write_str("Failed to perform request"),
      Error::InvalidFormBody(..) => f.write_str("User performed request with invalid body"),
      Error::InvalidRequest(msg)
      | Error::Unauthorized(msg)
      | Error::Forbidden(msg)
      | Error::NotFound(msg)
      | Error::Conflict(msg) => f.write_str(msg),
    }
  }
}

impl Serialize for Error {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("Error", 1)?;
    match self {
      Error::InvalidFormBody(fields) => state.serialize_field("errors", &fields.0)?,
      Error::Internal => {
        state.serialize_field("errors", &[FieldError::message("Internal server error")])?;
      }
      Error::InvalidRequest(msg)
      | Error::Unauthorized(msg)
      | Error::Forbidden(msg)
      | Error::NotFound(msg)
      | Error::Conflict(msg) => {
        state.serialize_field("errors", &[FieldError::message(msg.clone())])?;
      }
    }
    state.end()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<Cow<'static, str>>,
  pub message: Cow<'static, str>,
}

impl FieldError {
  pub fn message(message: impl Into<Cow<'static, str>>) -> Self {
    Self {
      field: None,
      message: message.into(),
    }
  }
}

/// Flattened list of validation errors, sorted by field name so
/// responses are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl From<ValidationErrors> for FieldErrors {
  fn from(value: ValidationErrors) -> Self {
    fn flatten(prefix: Option<&str>, errors: &ValidationErrors, output: &mut Vec<FieldError>) {
      for (field, kind) in errors.errors() {
        let path = match prefix {
          Some(prefix) => format!("{prefix}.{field}"),
          None => (*field).to_string(),
        };

        match kind {
          ValidationErrorsKind::Field(errors) => {
            output.extend(errors.iter().map(|error| FieldError {
              field: Some(Cow::Owned(path.clone())),
              message: error.message.clone().unwrap_or_else(|| error.code.clone()),
            }));
          }
          ValidationErrorsKind::Struct(inner) => flatten(Some(&path), inner, output),
          ValidationErrorsKind::List(list) => {
            for (index, inner) in list {
              flatten(Some(&format!("{path}.{index}")), inner, output);
            }
          }
        }
      }
    }

    let mut output = Vec::new();
    flatten(None, &value, &mut output);
    output.sort_by(|a, b| a.field.cmp(&b.field));
    Self(output)
  }
}
