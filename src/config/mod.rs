use thiserror::Error;

mod database;
mod github;
mod logging;
mod server;

pub use database::Database;
pub use github::Github;
pub use logging::{Logging, LoggingStyle};
pub use server::Server;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;
