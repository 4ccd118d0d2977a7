use actix_web::{
  web::{self, Json},
  HttpResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
  http::{Error, SessionUser},
  services::posts as service,
  types::form::posts::{AddComment, CreatePost},
  App,
};

#[tracing::instrument(skip(app))]
pub async fn create(
  app: web::Data<App>,
  session: SessionUser,
  form: Json<CreatePost>,
) -> Result<HttpResponse, Error> {
  form.validate()?;

  let post = service::CreatePost { text: &form.text }
    .perform(app.get_ref(), &session)
    .await?;

  Ok(HttpResponse::Ok().json(post))
}

// Listing requires a session even though the
// service itself does not need it.
#[tracing::instrument(skip(app))]
pub async fn list(app: web::Data<App>, _session: SessionUser) -> Result<HttpResponse, Error> {
  let posts = service::ListPosts.perform(app.get_ref()).await?;
  Ok(HttpResponse::Ok().json(posts))
}

#[tracing::instrument(skip(app))]
pub async fn by_user(
  app: web::Data<App>,
  _session: SessionUser,
  path: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let posts = service::UserPosts { user_id: &path }
    .perform(app.get_ref())
    .await?;

  Ok(HttpResponse::Ok().json(posts))
}

#[tracing::instrument(skip(app))]
pub async fn get(
  app: web::Data<App>,
  _session: SessionUser,
  path: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let post = service::GetPost { id: &path }.perform(app.get_ref()).await?;
  Ok(HttpResponse::Ok().json(post))
}

#[tracing::instrument(skip(app))]
pub async fn delete(
  app: web::Data<App>,
  session: SessionUser,
  path: web::Path<String>,
) -> Result<HttpResponse, Error> {
  service::DeletePost { id: &path }
    .perform(app.get_ref(), &session)
    .await?;

  Ok(HttpResponse::Ok().json(json!({ "message": "Post removed" })))
}

#[tracing::instrument(skip(app))]
pub async fn like(
  app: web::Data<App>,
  session: SessionUser,
  path: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let likes = service::LikePost { id: &path }
    .perform(app.get_ref(), &session)
    .await?;

  Ok(HttpResponse::Ok().json(likes))
}

#[tracing::instrument(skip(app))]
pub async fn unlike(
  app: web::Data<App>,
  session: SessionUser,
  path: web::Path<String>,
) -> Result<HttpResponse, Error> {
  let likes = service::UnlikePost { id: &path }
    .perform(app.get_ref(), &session)
    .await?;

  Ok(HttpResponse::Ok().json(likes))
}

#[tracing::instrument(skip(app))]
pub async fn add_comment(
  app: web::Data<App>,
  session: SessionUser,
  path: web::Path<String>,
  form: Json<AddComment>,
) -> Result<HttpResponse, Error> {
  form.validate()?;

  let comments = service::AddComment {
    post_id: &path,
    text: &form.text,
  }
  .perform(app.get_ref(), &session)
  .await?;

  Ok(HttpResponse::Ok().json(comments))
}

#[tracing::instrument(skip(app))]
pub async fn remove_comment(
  app: web::Data<App>,
  session: SessionUser,
  path: web::Path<(String, String)>,
) -> Result<HttpResponse, Error> {
  let (post_id, comment_id) = path.into_inner();
  let comments = service::RemoveComment {
    post_id: &post_id,
    comment_id: &comment_id,
  }
  .perform(app.get_ref(), &session)
  .await?;

  Ok(HttpResponse::Ok().json(comments))
}
