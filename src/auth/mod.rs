//! Credentials handling: login tokens, password hashes and
//! the avatar derived from a user's email address.
mod avatar;
mod password;
mod token;

pub use avatar::avatar_url;
pub use password::{hash_password, verify_password, HashError};
pub use token::{ClaimsUser, LoginClaims, Rejected, TokenError, Tokens};
