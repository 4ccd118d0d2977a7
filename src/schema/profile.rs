use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{EducationId, ExperienceId, ProfileId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
  #[serde(rename = "_id")]
  pub id: ProfileId,
  pub user: UserId,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub company: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub website: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bio: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub github_username: Option<String>,
  #[serde(default)]
  pub skills: Vec<String>,
  #[serde(default)]
  pub social: Social,
  #[serde(default)]
  pub experience: Vec<Experience>,
  #[serde(default)]
  pub education: Vec<Education>,
  #[serde(with = "chrono_datetime_as_bson_datetime")]
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Social {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub youtube: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub twitter: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub facebook: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub linkedin: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Experience {
  #[serde(rename = "_id")]
  pub id: ExperienceId,
  pub title: String,
  pub company: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  pub from: NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub to: Option<NaiveDate>,
  #[serde(default)]
  pub current: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Education {
  #[serde(rename = "_id")]
  pub id: EducationId,
  pub school: String,
  pub degree: String,
  pub field_of_study: String,
  pub from: NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub to: Option<NaiveDate>,
  #[serde(default)]
  pub current: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}
