use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::util::validator::{field_error, finish};
use crate::util::Sensitive;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Login {
  pub email: String,
  pub password: Sensitive<String>,
}

impl Validate for Login {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if !validator::validate_email(self.email.trim()) {
      errors.add("email", field_error("email", "Please include a valid email"));
    }

    if self.password.is_empty() {
      errors.add("password", field_error("required", "Password is required"));
    }

    finish(errors)
  }
}
