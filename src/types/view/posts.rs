use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::schema::{Comment, Like, Post};
use crate::types::id::{CommentId, PostId, UserId};

#[derive(Debug, Serialize)]
pub struct PostView {
  #[serde(with = "crate::types::id::hex")]
  pub id: PostId,
  #[serde(with = "crate::types::id::hex")]
  pub user: UserId,
  pub text: String,
  pub name: String,
  pub avatar: String,
  pub likes: Vec<LikeView>,
  pub comments: Vec<CommentView>,
  pub created_at: DateTime<Utc>,
}

impl From<Post> for PostView {
  fn from(value: Post) -> Self {
    Self {
      id: value.id,
      user: value.user,
      text: value.text,
      name: value.name,
      avatar: value.avatar,
      likes: LikeView::list(value.likes),
      comments: CommentView::list(value.comments),
      created_at: value.created_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct LikeView {
  #[serde(with = "crate::types::id::hex")]
  pub user: UserId,
}

impl LikeView {
  #[must_use]
  pub fn list(likes: Vec<Like>) -> Vec<Self> {
    likes.into_iter().map(|v| Self { user: v.user }).collect()
  }
}

#[derive(Debug, Serialize)]
pub struct CommentView {
  #[serde(with = "crate::types::id::hex")]
  pub id: CommentId,
  #[serde(with = "crate::types::id::hex")]
  pub user: UserId,
  pub text: String,
  pub name: String,
  pub avatar: String,
  pub created_at: DateTime<Utc>,
}

impl CommentView {
  #[must_use]
  pub fn list(comments: Vec<Comment>) -> Vec<Self> {
    comments.into_iter().map(Into::into).collect()
  }
}

impl From<Comment> for CommentView {
  fn from(value: Comment) -> Self {
    Self {
      id: value.id,
      user: value.user,
      text: value.text,
      name: value.name,
      avatar: value.avatar,
      created_at: value.created_at,
    }
  }
}
