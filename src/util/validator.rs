use error_stack::Report;
use std::borrow::Cow;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Builds a [`ValidationError`] with a human readable message,
/// for types that implement [`validator::Validate`] by hand.
#[must_use]
pub fn field_error(code: &'static str, message: &'static str) -> ValidationError {
  let mut error = ValidationError::new(code);
  error.message = Some(Cow::Borrowed(message));
  error
}

/// Turns collected errors into the result [`validator::Validate`]
/// expects.
pub fn finish(errors: ValidationErrors) -> Result<(), ValidationErrors> {
  if errors.errors().is_empty() {
    Ok(())
  } else {
    Err(errors)
  }
}

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

pub trait IntoValidatorReport<T> {
  fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidationErrors> {
  fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
    self.map_err(|v| {
      fn read_errors<'a>(
        err: &'a ValidationErrors,
        fields_queue: &mut Vec<Cow<'a, str>>,
        mut report: Report<Wrapper>,
      ) -> Report<Wrapper> {
        let mut fields = err.errors().iter().collect::<Vec<_>>();
        fields.sort_by_key(|(field, _)| **field);

        for (field, kind) in fields {
          fields_queue.push(Cow::Borrowed(field));
          report = match kind {
            ValidationErrorsKind::Struct(inner) => read_errors(inner, fields_queue, report),
            ValidationErrorsKind::List(list) => {
              for (index, inner) in list {
                fields_queue.push(Cow::Owned(index.to_string()));
                report = read_errors(inner, fields_queue, report);
                fields_queue.pop();
              }
              report
            }
            ValidationErrorsKind::Field(errors) => {
              let field_str = fields_queue.join(".");
              for error in errors {
                let message = error.message.as_ref().unwrap_or(&error.code);
                report = report.attach_printable(format!("{field_str}: {message}"));
              }
              report
            }
          };
          fields_queue.pop();
        }
        report
      }

      let mut queue = Vec::new();
      let report = Report::new(Wrapper);
      read_errors(&v, &mut queue, report)
    })
  }
}
