use sha2::{Digest, Sha256};

/// Gravatar image of the given email. The email is trimmed and
/// lowercased first so the same address always maps to the same
/// avatar.
#[must_use]
pub fn avatar_url(email: &str) -> String {
  let normalized = email.trim().to_lowercase();
  let digest = Sha256::digest(normalized.as_bytes());
  format!(
    "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
    hex::encode(digest)
  )
}
