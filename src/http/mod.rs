pub mod controllers;
pub mod error;
pub mod session;

pub use error::Error;
pub use session::SessionUser;
