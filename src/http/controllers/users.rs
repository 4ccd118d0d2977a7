use actix_web::{
  web::{self, Json},
  HttpResponse,
};
use validator::Validate;

use crate::{http::Error, services, types::form::users::Register, util::Sensitive, App};

#[tracing::instrument(skip(app))]
pub async fn register(app: web::Data<App>, form: Json<Register>) -> Result<HttpResponse, Error> {
  form.validate()?;

  let response = services::users::Register {
    name: &form.name,
    email: &form.email,
    password: Sensitive::new(form.password.as_str()),
  }
  .perform(app.get_ref())
  .await?;

  Ok(HttpResponse::Ok().json(response))
}
