use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::UserSummary;
use crate::schema::{Education, Experience, Profile, Social};
use crate::types::id::{EducationId, ExperienceId, ProfileId};

#[derive(Debug, Serialize)]
pub struct ProfileView {
  #[serde(with = "crate::types::id::hex")]
  pub id: ProfileId,
  /// `None` only if the owner disappeared between both reads.
  pub user: Option<UserSummary>,
  pub company: Option<String>,
  pub website: Option<String>,
  pub location: Option<String>,
  pub bio: Option<String>,
  pub status: Option<String>,
  pub github_username: Option<String>,
  pub skills: Vec<String>,
  pub social: Social,
  pub experience: Vec<ExperienceView>,
  pub education: Vec<EducationView>,
  pub created_at: DateTime<Utc>,
}

impl ProfileView {
  #[must_use]
  pub fn new(profile: Profile, user: Option<UserSummary>) -> Self {
    Self {
      id: profile.id,
      user,
      company: profile.company,
      website: profile.website,
      location: profile.location,
      bio: profile.bio,
      status: profile.status,
      github_username: profile.github_username,
      skills: profile.skills,
      social: profile.social,
      experience: profile.experience.into_iter().map(Into::into).collect(),
      education: profile.education.into_iter().map(Into::into).collect(),
      created_at: profile.created_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ExperienceView {
  #[serde(with = "crate::types::id::hex")]
  pub id: ExperienceId,
  pub title: String,
  pub company: String,
  pub location: Option<String>,
  pub from: NaiveDate,
  pub to: Option<NaiveDate>,
  pub current: bool,
  pub description: Option<String>,
}

impl From<Experience> for ExperienceView {
  fn from(value: Experience) -> Self {
    Self {
      id: value.id,
      title: value.title,
      company: value.company,
      location: value.location,
      from: value.from,
      to: value.to,
      current: value.current,
      description: value.description,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct EducationView {
  #[serde(with = "crate::types::id::hex")]
  pub id: EducationId,
  pub school: String,
  pub degree: String,
  pub field_of_study: String,
  pub from: NaiveDate,
  pub to: Option<NaiveDate>,
  pub current: bool,
  pub description: Option<String>,
}

impl From<Education> for EducationView {
  fn from(value: Education) -> Self {
    Self {
      id: value.id,
      school: value.school,
      degree: value.degree,
      field_of_study: value.field_of_study,
      from: value.from,
      to: value.to,
      current: value.current,
      description: value.description,
    }
  }
}
