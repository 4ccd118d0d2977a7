use async_trait::async_trait;
use std::fmt::Debug;

use crate::schema::{Comment, Education, Experience, Like, Post, Profile, User};
use crate::types::id::{CommentId, EducationId, ExperienceId, PostId, UserId};

mod error;
pub mod mongo;

#[cfg(test)]
pub mod mock;

pub use error::*;
pub use mongo::MongoData;

use self::forms::{CreateUser, ProfileChanges};

/// Outcome of a conditional write against a document or one
/// of its nested collections.
///
/// The write itself is a single atomic operation, these variants
/// explain why it did not apply when its precondition failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T> {
  Applied(T),
  /// The parent document (profile or post) does not exist.
  ParentNotFound,
  /// The nested entry to remove does not exist.
  EntryNotFound,
  /// The write would not change anything (liking a post twice
  /// or unliking a post that was never liked).
  Unchanged,
  /// The entry exists but belongs to someone else.
  NotOwner,
}

/// Everything the HTTP layer needs from the document store.
#[async_trait]
pub trait Data: Debug + Send + Sync {
  /// Returns `None` if a user with the same email already exists.
  async fn create_user(&self, form: &CreateUser<'_>) -> Result<Option<User>>;

  async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>>;

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

  async fn find_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>>;

  /// Deletes the user together with their profile and posts.
  async fn delete_user(&self, id: UserId) -> Result<()>;

  async fn find_profile_by_user(&self, user: UserId) -> Result<Option<Profile>>;

  async fn list_profiles(&self) -> Result<Vec<Profile>>;

  /// Creates the profile if the user has none yet, otherwise
  /// only overwrites the fields present in `changes`.
  async fn upsert_profile(&self, user: UserId, changes: &ProfileChanges) -> Result<Profile>;

  /// Returns `None` if the user has no profile yet.
  async fn add_experience(&self, user: UserId, entry: &Experience) -> Result<Option<Profile>>;

  async fn remove_experience(&self, user: UserId, id: ExperienceId)
    -> Result<Mutation<Profile>>;

  /// Returns `None` if the user has no profile yet.
  async fn add_education(&self, user: UserId, entry: &Education) -> Result<Option<Profile>>;

  async fn remove_education(&self, user: UserId, id: EducationId) -> Result<Mutation<Profile>>;

  async fn create_post(&self, post: &Post) -> Result<()>;

  async fn find_post(&self, id: PostId) -> Result<Option<Post>>;

  /// Lists posts newest first, optionally only from one author.
  async fn list_posts(&self, author: Option<UserId>) -> Result<Vec<Post>>;

  async fn delete_post(&self, id: PostId, author: UserId) -> Result<Mutation<()>>;

  async fn like_post(&self, id: PostId, user: UserId) -> Result<Mutation<Vec<Like>>>;

  async fn unlike_post(&self, id: PostId, user: UserId) -> Result<Mutation<Vec<Like>>>;

  /// Returns `None` if the post does not exist.
  async fn add_comment(&self, id: PostId, comment: &Comment) -> Result<Option<Vec<Comment>>>;

  async fn remove_comment(
    &self,
    id: PostId,
    comment: CommentId,
    user: UserId,
  ) -> Result<Mutation<Vec<Comment>>>;
}

pub mod forms {
  use crate::schema::Social;
  use crate::util::Sensitive;

  #[derive(Debug)]
  pub struct CreateUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: Sensitive<&'a str>,
    pub avatar: &'a str,
  }

  /// Sparse set of profile fields. `None` means "leave as is".
  #[derive(Debug, Clone, Default, PartialEq, Eq)]
  pub struct ProfileChanges {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub github_username: Option<String>,
    pub skills: Option<Vec<String>>,
    pub social: Social,
  }
}
