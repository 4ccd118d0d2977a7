use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{CommentId, PostId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Post {
  #[serde(rename = "_id")]
  pub id: PostId,
  pub user: UserId,
  pub text: String,
  // Snapshot of the author at the time the post was made,
  // it is not updated afterwards.
  pub name: String,
  pub avatar: String,
  #[serde(default)]
  pub likes: Vec<Like>,
  #[serde(default)]
  pub comments: Vec<Comment>,
  #[serde(with = "chrono_datetime_as_bson_datetime")]
  pub created_at: DateTime<Utc>,
}

impl Post {
  #[must_use]
  pub fn is_liked_by(&self, user: UserId) -> bool {
    self.likes.iter().any(|like| like.user == user)
  }

  #[must_use]
  pub fn find_comment(&self, id: CommentId) -> Option<&Comment> {
    self.comments.iter().find(|comment| comment.id == id)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Like {
  pub user: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Comment {
  #[serde(rename = "_id")]
  pub id: CommentId,
  pub user: UserId,
  pub text: String,
  pub name: String,
  pub avatar: String,
  #[serde(with = "chrono_datetime_as_bson_datetime")]
  pub created_at: DateTime<Utc>,
}
