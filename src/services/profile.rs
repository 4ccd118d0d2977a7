use std::collections::HashMap;

use crate::database::{forms::ProfileChanges, Mutation};
use crate::http::{Error, SessionUser};
use crate::schema::{Education, Experience, Profile};
use crate::types::{
  self,
  id::{EducationId, ExperienceId, UserId},
  view::{ProfileView, UserSummary},
};
use crate::App;

fn no_profile() -> Error {
  types::Error::not_found("There is no profile for this user").into()
}

/// Attaches the public part of the owner to every profile.
async fn populate(app: &App, profiles: Vec<Profile>) -> Result<Vec<ProfileView>, Error> {
  let ids = profiles.iter().map(|v| v.user).collect::<Vec<_>>();
  let users = app
    .data
    .find_users_by_ids(&ids)
    .await?
    .iter()
    .map(|user| (user.id, UserSummary::from(user)))
    .collect::<HashMap<_, _>>();

  Ok(
    profiles
      .into_iter()
      .map(|profile| {
        let user = users.get(&profile.user).cloned();
        ProfileView::new(profile, user)
      })
      .collect(),
  )
}

async fn populate_one(app: &App, profile: Profile) -> Result<ProfileView, Error> {
  let user = app
    .data
    .find_user_by_id(profile.user)
    .await?
    .as_ref()
    .map(UserSummary::from);

  Ok(ProfileView::new(profile, user))
}

#[derive(Debug)]
pub struct OwnProfile;

impl OwnProfile {
  #[tracing::instrument(skip(app), name = "services.profile.me")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<ProfileView, Error> {
    let Some(profile) = app.data.find_profile_by_user(session.id).await? else {
      return Err(no_profile());
    };
    populate_one(app, profile).await
  }
}

#[derive(Debug)]
pub struct UpsertProfile {
  pub changes: ProfileChanges,
}

impl UpsertProfile {
  #[tracing::instrument(skip(app), name = "services.profile.upsert")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<ProfileView, Error> {
    let owner = session.fetch(app).await?;
    let profile = app.data.upsert_profile(owner.id, &self.changes).await?;
    populate_one(app, profile).await
  }
}

#[derive(Debug)]
pub struct ListProfiles;

impl ListProfiles {
  #[tracing::instrument(skip(app), name = "services.profile.list")]
  pub async fn perform(self, app: &App) -> Result<Vec<ProfileView>, Error> {
    let profiles = app.data.list_profiles().await?;
    populate(app, profiles).await
  }
}

#[derive(Debug)]
pub struct ProfileByUser<'a> {
  pub user_id: &'a str,
}

impl ProfileByUser<'_> {
  #[tracing::instrument(skip(app), name = "services.profile.by_user")]
  pub async fn perform(self, app: &App) -> Result<ProfileView, Error> {
    let not_found = || Error::from(types::Error::not_found("Profile not found"));

    let user = self.user_id.parse::<UserId>().map_err(|_| not_found())?;
    let Some(profile) = app.data.find_profile_by_user(user).await? else {
      return Err(not_found());
    };
    populate_one(app, profile).await
  }
}

/// Deletes the user's posts, profile and account.
#[derive(Debug)]
pub struct DeleteAccount;

impl DeleteAccount {
  #[tracing::instrument(skip(app), name = "services.profile.delete_account")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<(), Error> {
    app.data.delete_user(session.id).await?;
    tracing::info!(id = %session.id, "deleted user account");
    Ok(())
  }
}

#[derive(Debug)]
pub struct AddExperience {
  pub entry: Experience,
}

impl AddExperience {
  #[tracing::instrument(skip(app), name = "services.profile.add_experience")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<ProfileView, Error> {
    let Some(profile) = app.data.add_experience(session.id, &self.entry).await? else {
      return Err(no_profile());
    };
    populate_one(app, profile).await
  }
}

#[derive(Debug)]
pub struct RemoveExperience<'a> {
  pub id: &'a str,
}

impl RemoveExperience<'_> {
  #[tracing::instrument(skip(app), name = "services.profile.remove_experience")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<ProfileView, Error> {
    let not_found = || Error::from(types::Error::not_found("Experience not found"));

    let id = self.id.parse::<ExperienceId>().map_err(|_| not_found())?;
    match app.data.remove_experience(session.id, id).await? {
      Mutation::Applied(profile) => populate_one(app, profile).await,
      Mutation::ParentNotFound => Err(no_profile()),
      _ => Err(not_found()),
    }
  }
}

#[derive(Debug)]
pub struct AddEducation {
  pub entry: Education,
}

impl AddEducation {
  #[tracing::instrument(skip(app), name = "services.profile.add_education")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<ProfileView, Error> {
    let Some(profile) = app.data.add_education(session.id, &self.entry).await? else {
      return Err(no_profile());
    };
    populate_one(app, profile).await
  }
}

#[derive(Debug)]
pub struct RemoveEducation<'a> {
  pub id: &'a str,
}

impl RemoveEducation<'_> {
  #[tracing::instrument(skip(app), name = "services.profile.remove_education")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<ProfileView, Error> {
    let not_found = || Error::from(types::Error::not_found("Education not found"));

    let id = self.id.parse::<EducationId>().map_err(|_| not_found())?;
    match app.data.remove_education(session.id, id).await? {
      Mutation::Applied(profile) => populate_one(app, profile).await,
      Mutation::ParentNotFound => Err(no_profile()),
      _ => Err(not_found()),
    }
  }
}

/// Latest five repositories of a GitHub account.
#[derive(Debug)]
pub struct GithubRepos<'a> {
  pub username: &'a str,
}

impl GithubRepos<'_> {
  #[tracing::instrument(skip(app), name = "services.profile.github_repos")]
  pub async fn perform(self, app: &App) -> Result<serde_json::Value, Error> {
    let not_found = || Error::from(types::Error::not_found("No Github profile found"));

    // Skip the round trip for names GitHub would never accept
    let username = self.username.trim();
    if !crate::github::is_valid_username(username) {
      return Err(not_found());
    }

    app.github.repos(username).await?.ok_or_else(not_found)
  }
}
