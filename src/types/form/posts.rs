use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreatePost {
  #[validate(length(min = 1, message = "Text is required"))]
  pub text: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AddComment {
  #[validate(length(min = 1, message = "Text is required"))]
  pub text: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_text_is_required() {
    let form: CreatePost = serde_json::from_value(json!({})).unwrap();
    assert!(form.validate().unwrap_err().errors().contains_key("text"));

    let form: AddComment = serde_json::from_value(json!({ "text": "" })).unwrap();
    assert!(form.validate().unwrap_err().errors().contains_key("text"));

    let form: CreatePost = serde_json::from_value(json!({ "text": "hello" })).unwrap();
    assert!(form.validate().is_ok());
  }
}
