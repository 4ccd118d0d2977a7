use actix_web::{
  web::{self, Json},
  HttpResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
  http::{Error, SessionUser},
  services::profile as service,
  types::form::profile::{AddEducation, AddExperience, UpsertProfile},
  App,
};

#[tracing::instrument(skip(app))]
pub async fn me(app: web::Data<App>, session: SessionUser) -> Result<HttpResponse, Error> {
  let profile = service::OwnProfile.perform(app.get_ref(), &session).await?;
  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app))]
pub async fn upsert(
  app: web::Data<App>,
  session: SessionUser,
  form: Json<UpsertProfile>,
) -> Result<HttpResponse, Error> {
  form.validate()?;

  let profile = service::UpsertProfile {
    changes: form.into_inner().into_changes(),
  }
  .perform(app.get_ref(), &session)
  .await?;

  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app))]
pub async fn list(app: web::Data<App>) -> Result<HttpResponse, Error> {
  let profiles = service::ListProfiles.perform(app.get_ref()).await?;
  Ok(HttpResponse::Ok().json(profiles))
}

#[tracing::instrument(skip(app))]
pub async fn by_user(app: web::Data<App>, path: web::Path<String>) -> Result<HttpResponse, Error> {
  let profile = service::ProfileByUser { user_id: &path }
    .perform(app.get_ref())
    .await?;

  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app))]
pub async fn delete_account(app: web::Data<App>, session: SessionUser) -> Result<HttpResponse, Error> {
  service::DeleteAccount
    .perform(app.get_ref(), &session)
    .await?;

  Ok(HttpResponse::Ok().json(json!({ "message": "User deleted" })))
}

#[tracing::instrument(skip(app))]
pub async fn add_experience(
  app: web::Data<App>,
  session: SessionUser,
  form: Json<AddExperience>,
) -> Result<HttpResponse, Error> {
  let entry = form.into_inner().into_experience()?;
  let profile = service::AddExperience { entry }
    .perform(app.get_ref(), &session)
    .await?;

  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app))]
pub async fn remove_experience(
  app: web::Data<App>,
  session: SessionUser,
  path: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let profile = service::RemoveExperience { id: &path }
    .perform(app.get_ref(), &session)
    .await?;

  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app))]
pub async fn add_education(
  app: web::Data<App>,
  session: SessionUser,
  form: Json<AddEducation>,
) -> Result<HttpResponse, Error> {
  let entry = form.into_inner().into_education()?;
  let profile = service::AddEducation { entry }
    .perform(app.get_ref(), &session)
    .await?;

  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app))]
pub async fn remove_education(
  app: web::Data<App>,
  session: SessionUser,
  path: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let profile = service::RemoveEducation { id: &path }
    .perform(app.get_ref(), &session)
    .await?;

  Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(skip(app))]
pub async fn github(app: web::Data<App>, path: web::Path<String>) -> Result<HttpResponse, Error> {
  let repos = service::GithubRepos { username: &path }
    .perform(app.get_ref())
    .await?;

  Ok(HttpResponse::Ok().json(repos))
}
