use actix_web::{web, HttpServer};
use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use crate::{config, http, App};

#[derive(Debug, Error)]
#[error("Failed to start server")]
pub struct StartServerError;

/// Connects to the database and serves the API until the
/// process is told to stop.
pub async fn run(config: config::Server) -> Result<(), StartServerError> {
  let (ip, port, workers) = (config.ip, config.port, config.workers);
  let app = App::new(&config).await.change_context(StartServerError)?;
  let data = web::Data::new(app);

  tracing::info!("Starting HTTP server at {ip}:{port}");
  HttpServer::new(move || {
    actix_web::App::new()
      .app_data(data.clone())
      .wrap(TracingLogger::default())
      .configure(http::controllers::configure)
  })
  .workers(workers)
  .bind((ip, port))
  .change_context(StartServerError)
  .attach_printable_lazy(|| format!("could not bind to {ip}:{port}"))?
  .run()
  .await
  .change_context(StartServerError)
}
