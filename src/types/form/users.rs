use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::util::validator::{field_error, finish};
use crate::util::Sensitive;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Register {
  pub name: String,
  pub email: String,
  pub password: Sensitive<String>,
}

impl Register {
  pub const PASSWORD_MIN_LEN: usize = 6;
}

impl Validate for Register {
  fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if super::is_blank(&self.name) {
      errors.add("name", field_error("required", "Name is required"));
    }

    if !validator::validate_email(self.email.trim()) {
      errors.add("email", field_error("email", "Please include a valid email"));
    }

    if self.password.chars().count() < Self::PASSWORD_MIN_LEN {
      errors.add(
        "password",
        field_error("length", "Please enter a password with 6 or more characters"),
      );
    }

    finish(errors)
  }
}
