use actix_web::{
  web::{self, Json},
  HttpResponse,
};
use validator::Validate;

use crate::{
  http::{Error, SessionUser},
  services,
  types::form::auth::Login,
  util::Sensitive,
  App,
};

#[tracing::instrument(skip(app))]
pub async fn login(app: web::Data<App>, form: Json<Login>) -> Result<HttpResponse, Error> {
  form.validate()?;

  let response = services::auth::Login {
    email: &form.email,
    password: Sensitive::new(form.password.as_str()),
  }
  .perform(app.get_ref())
  .await?;

  Ok(HttpResponse::Ok().json(response))
}

#[tracing::instrument(skip(app))]
pub async fn current_user(app: web::Data<App>, session: SessionUser) -> Result<HttpResponse, Error> {
  let user = services::auth::CurrentUser
    .perform(app.get_ref(), &session)
    .await?;

  Ok(HttpResponse::Ok().json(user))
}
