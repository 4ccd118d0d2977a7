use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationErrors};

use super::{is_blank, non_empty};
use crate::database::forms::ProfileChanges;
use crate::schema::{Education, Experience, Social};
use crate::types::id::{EducationId, ExperienceId};
use crate::util::validator::{field_error, finish};

/// Every field is optional. Blank fields are ignored so a second
/// upsert only overwrites what it actually carries.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpsertProfile {
  #[serde(deserialize_with = "non_empty")]
  pub company: Option<String>,
  #[serde(deserialize_with = "non_empty")]
  #[validate(url(message = "Website must be a valid URL"))]
  pub website: Option<String>,
  #[serde(deserialize_with = "non_empty")]
  pub location: Option<String>,
  #[serde(deserialize_with = "non_empty")]
  pub bio: Option<String>,
  #[serde(deserialize_with = "non_empty")]
  pub status: Option<String>,
  #[serde(alias = "githubUsername", alias = "githubusername")]
  #[serde(deserialize_with = "non_empty")]
  #[validate(
    length(max = 39, message = "Invalid GitHub username"),
    regex(path = "crate::github::USERNAME_REGEX", message = "Invalid GitHub username")
  )]
  pub github_username: Option<String>,
  /// Comma separated, e.g. `"rust, mongodb,actix"`.
  #[serde(deserialize_with = "non_empty")]
  pub skills: Option<String>,
  #[serde(deserialize_with = "non_empty")]
  pub youtube: Option<String>,
  #[serde(deserialize_with = "non_empty")]
  pub twitter: Option<String>,
  #[serde(deserialize_with = "non_empty")]
  pub facebook: Option<String>,
  #[serde(alias = "linkedIn")]
  #[serde(deserialize_with = "non_empty")]
  pub linkedin: Option<String>,
  #[serde(deserialize_with = "non_empty")]
  pub instagram: Option<String>,
}

impl UpsertProfile {
  #[must_use]
  pub fn into_changes(self) -> ProfileChanges {
    let skills = self
      .skills
      .map(|skills| {
        skills
          .split(',')
          .map(str::trim)
          .filter(|skill| !skill.is_empty())
          .map(String::from)
          .collect::<Vec<_>>()
      })
      .filter(|skills| !skills.is_empty());

    ProfileChanges {
      company: self.company,
      website: self.website,
      location: self.location,
      bio: self.bio,
      status: self.status,
      github_username: self.github_username,
      skills,
      social: Social {
        youtube: self.youtube,
        twitter: self.twitter,
        facebook: self.facebook,
        linkedin: self.linkedin,
        instagram: self.instagram,
      },
    }
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddExperience {
  pub title: String,
  pub company: String,
  #[serde(deserialize_with = "non_empty")]
  pub location: Option<String>,
  #[serde(deserialize_with = "optional_date")]
  pub from: Option<NaiveDate>,
  #[serde(deserialize_with = "optional_date")]
  pub to: Option<NaiveDate>,
  pub current: bool,
  #[serde(deserialize_with = "non_empty")]
  pub description: Option<String>,
}

impl AddExperience {
  fn check(&self) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if is_blank(&self.title) {
      errors.add("title", field_error("required", "Title is required"));
    }
    if is_blank(&self.company) {
      errors.add("company", field_error("required", "Company is required"));
    }
    check_dates(&mut errors, self.from, self.to);
    errors
  }

  /// Validates the form and turns it into a new entry with
  /// a freshly generated id.
  pub fn into_experience(self) -> Result<Experience, ValidationErrors> {
    let errors = self.check();
    match self.from {
      Some(from) if errors.errors().is_empty() => Ok(Experience {
        id: ExperienceId::new(),
        title: self.title.trim().to_string(),
        company: self.company.trim().to_string(),
        location: self.location,
        from,
        to: self.to,
        current: self.current,
        description: self.description,
      }),
      _ => Err(errors),
    }
  }
}

impl Validate for AddExperience {
  fn validate(&self) -> Result<(), ValidationErrors> {
    finish(self.check())
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddEducation {
  pub school: String,
  pub degree: String,
  #[serde(alias = "fieldofstudy", alias = "fieldOfStudy")]
  pub field_of_study: String,
  #[serde(deserialize_with = "optional_date")]
  pub from: Option<NaiveDate>,
  #[serde(deserialize_with = "optional_date")]
  pub to: Option<NaiveDate>,
  pub current: bool,
  #[serde(deserialize_with = "non_empty")]
  pub description: Option<String>,
}

impl AddEducation {
  fn check(&self) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if is_blank(&self.school) {
      errors.add("school", field_error("required", "School is required"));
    }
    if is_blank(&self.degree) {
      errors.add("degree", field_error("required", "Degree is required"));
    }
    if is_blank(&self.field_of_study) {
      errors.add(
        "field_of_study",
        field_error("required", "Field of study is required"),
      );
    }
    check_dates(&mut errors, self.from, self.to);
    errors
  }

  /// Validates the form and turns it into a new entry with
  /// a freshly generated id.
  pub fn into_education(self) -> Result<Education, ValidationErrors> {
    let errors = self.check();
    match self.from {
      Some(from) if errors.errors().is_empty() => Ok(Education {
        id: EducationId::new(),
        school: self.school.trim().to_string(),
        degree: self.degree.trim().to_string(),
        field_of_study: self.field_of_study.trim().to_string(),
        from,
        to: self.to,
        current: self.current,
        description: self.description,
      }),
      _ => Err(errors),
    }
  }
}

impl Validate for AddEducation {
  fn validate(&self) -> Result<(), ValidationErrors> {
    finish(self.check())
  }
}

fn check_dates(errors: &mut ValidationErrors, from: Option<NaiveDate>, to: Option<NaiveDate>) {
  match (from, to) {
    (None, _) => errors.add("from", field_error("required", "From date is required")),
    (Some(from), Some(to)) if to < from => errors.add(
      "to",
      field_error("range", "To date must not be before the from date"),
    ),
    _ => {}
  }
}

/// Accepts `2020-01-31` as well as full RFC 3339 timestamps,
/// blank strings are treated as missing.
fn optional_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
  let Some(value) = non_empty(deserializer)? else {
    return Ok(None);
  };

  value
    .parse::<NaiveDate>()
    .or_else(|_| DateTime::parse_from_rfc3339(&value).map(|v| v.date_naive()))
    .map(Some)
    .map_err(|_| serde::de::Error::custom(format!("invalid date {value:?}")))
}
