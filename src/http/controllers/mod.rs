use actix_web::{error::JsonPayloadError, web, HttpRequest};

use super::Error;
use crate::types;

pub mod auth;
pub mod posts;
pub mod profile;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .route("/", web::get().to(index))
    .service(
      web::scope("/api")
        .route("/users", web::post().to(users::register))
        .service(
          web::resource("/auth")
            .route(web::get().to(auth::current_user))
            .route(web::post().to(auth::login)),
        )
        .service(
          web::scope("/profile")
            .service(
              web::resource("")
                .route(web::get().to(profile::list))
                .route(web::post().to(profile::upsert))
                .route(web::delete().to(profile::delete_account)),
            )
            .route("/me", web::get().to(profile::me))
            .route("/user/{user_id}", web::get().to(profile::by_user))
            .route("/experience", web::put().to(profile::add_experience))
            .route("/experience/{id}", web::delete().to(profile::remove_experience))
            .route("/education", web::put().to(profile::add_education))
            .route("/education/{id}", web::delete().to(profile::remove_education))
            .route("/github/{username}", web::get().to(profile::github)),
        )
        .service(
          web::scope("/post")
            .service(
              web::resource("")
                .route(web::get().to(posts::list))
                .route(web::post().to(posts::create)),
            )
            .route("/user/{user_id}", web::get().to(posts::by_user))
            .route("/like/{id}", web::put().to(posts::like))
            .route("/unlike/{id}", web::put().to(posts::unlike))
            .route("/comments/{id}", web::put().to(posts::add_comment))
            .route(
              "/comments/{id}/{comment_id}",
              web::delete().to(posts::remove_comment),
            )
            .service(
              web::resource("/{id}")
                .route(web::get().to(posts::get))
                .route(web::delete().to(posts::delete)),
            ),
        ),
    );
}

async fn index() -> &'static str {
  "Server is running"
}

fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  tracing::debug!(%error, "rejected request body");
  let message = format!("Invalid request body: {error}");
  Error::new(types::Error::invalid_request(message)).into()
}
