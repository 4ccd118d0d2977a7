//! Operations behind every route. Request bodies are validated
//! by the controllers, services enforce everything else.
pub mod auth;
pub mod posts;
pub mod profile;
pub mod users;
