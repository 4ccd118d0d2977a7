use async_trait::async_trait;
use bson::{doc, Bson, Document};
use chrono::Utc;
use error_stack::{Report, ResultExt};
use futures::TryStreamExt;
use mongodb::options::{
  ClientOptions, FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument,
};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use super::forms::{CreateUser, ProfileChanges};
use super::{is_duplicate_key, Data, Error, ErrorExt, Mutation, Result};
use crate::config;
use crate::schema::{Comment, Education, Experience, Like, Post, Profile, User};
use crate::types::id::{CommentId, EducationId, ExperienceId, PostId, UserId};

const USERS: &str = "users";
const PROFILES: &str = "profiles";
const POSTS: &str = "posts";

/// MongoDB implementation of [`Data`].
///
/// Nested collections (likes, comments, experience, education) are
/// always modified with a single conditional update so concurrent
/// requests cannot overwrite each other's changes.
#[derive(Clone)]
pub struct MongoData {
  db: Database,
  users: Collection<User>,
  profiles: Collection<Profile>,
  posts: Collection<Post>,
}

impl std::fmt::Debug for MongoData {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MongoData")
      .field("db", &self.db.name())
      .finish_non_exhaustive()
  }
}

impl MongoData {
  /// Connects to the database and makes sure it is reachable
  /// before handing out the client.
  #[tracing::instrument(skip_all, name = "db.connect")]
  pub async fn connect(cfg: &config::Database) -> Result<Self> {
    let mut options = ClientOptions::parse(cfg.url.as_str())
      .await
      .change_context(Error::InvalidUrl)?;

    options.app_name = Some(env!("CARGO_PKG_NAME").into());
    options.server_selection_timeout = Some(Duration::from_secs(cfg.timeout_secs.get()));

    let client = Client::with_options(options).change_context(Error::InvalidUrl)?;
    let db = client.database(&cfg.name);
    let data = Self {
      users: db.collection(USERS),
      profiles: db.collection(PROFILES),
      posts: db.collection(POSTS),
      db,
    };

    data.wait_until_healthy().await?;
    data.setup_indexes().await?;

    tracing::info!(db = %cfg.name, "connected to MongoDB");
    Ok(data)
  }

  #[tracing::instrument(skip(self))]
  pub async fn wait_until_healthy(&self) -> Result<()> {
    self
      .db
      .run_command(doc! { "ping": 1 }, None)
      .await
      .change_context(Error::Unreachable)?;

    Ok(())
  }

  #[tracing::instrument(skip(self))]
  async fn setup_indexes(&self) -> Result<()> {
    fn unique(keys: Document) -> IndexModel {
      IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
    }

    self
      .users
      .create_index(unique(doc! { "email": 1 }), None)
      .await
      .change_context(Error::Migration)?;

    self
      .profiles
      .create_index(unique(doc! { "user": 1 }), None)
      .await
      .change_context(Error::Migration)?;

    self
      .posts
      .create_index(IndexModel::builder().keys(doc! { "user": 1 }).build(), None)
      .await
      .change_context(Error::Migration)?;

    Ok(())
  }

  fn after_update() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
      .return_document(ReturnDocument::After)
      .build()
  }

  fn newest_first() -> FindOptions {
    FindOptions::builder()
      .sort(doc! { "created_at": -1, "_id": -1 })
      .build()
  }

  /// Prepends `entry` to the array field `field` of the profile
  /// owned by `user`.
  async fn push_profile_entry(
    &self,
    user: UserId,
    field: &str,
    entry: Bson,
  ) -> Result<Option<Profile>> {
    let update = doc! { "$push": { field: { "$each": [entry], "$position": 0 } } };
    self
      .profiles
      .find_one_and_update(doc! { "user": user }, update, Self::after_update())
      .await
      .into_db_error()
  }

  async fn pull_profile_entry(
    &self,
    user: UserId,
    field: &str,
    id: Bson,
  ) -> Result<Mutation<Profile>> {
    let key = format!("{field}._id");
    let filter = doc! { "user": user, key: id.clone() };
    let update = doc! { "$pull": { field: { "_id": id } } };

    let profile = self
      .profiles
      .find_one_and_update(filter, update, Self::after_update())
      .await
      .into_db_error()?;

    if let Some(profile) = profile {
      return Ok(Mutation::Applied(profile));
    }

    if self.find_profile_by_user(user).await?.is_some() {
      Ok(Mutation::EntryNotFound)
    } else {
      Ok(Mutation::ParentNotFound)
    }
  }

  /// Tells apart a missing post from a failed precondition.
  async fn classify_post_miss(&self, id: PostId) -> Result<Mutation<Vec<Like>>> {
    if self.find_post(id).await?.is_some() {
      Ok(Mutation::Unchanged)
    } else {
      Ok(Mutation::ParentNotFound)
    }
  }
}

/// Builds the `$set` document of a profile upsert out of the
/// fields that are present. The owner is copied from the filter
/// when the profile is inserted.
fn profile_set_document(changes: &ProfileChanges) -> Document {
  let mut set = Document::new();
  let fields = [
    ("company", &changes.company),
    ("website", &changes.website),
    ("location", &changes.location),
    ("bio", &changes.bio),
    ("status", &changes.status),
    ("github_username", &changes.github_username),
    ("social.youtube", &changes.social.youtube),
    ("social.twitter", &changes.social.twitter),
    ("social.facebook", &changes.social.facebook),
    ("social.linkedin", &changes.social.linkedin),
    ("social.instagram", &changes.social.instagram),
  ];

  for (key, value) in fields {
    if let Some(value) = value {
      set.insert(key, value.as_str());
    }
  }

  if let Some(skills) = &changes.skills {
    set.insert("skills", skills.clone());
  }

  set
}

#[async_trait]
impl Data for MongoData {
  #[tracing::instrument(skip_all, name = "db.users.create")]
  async fn create_user(&self, form: &CreateUser<'_>) -> Result<Option<User>> {
    let user = User {
      id: UserId::new(),
      name: form.name.to_string(),
      email: form.email.to_string(),
      password_hash: form.password_hash.into_inner().to_string(),
      avatar: form.avatar.to_string(),
      created_at: Utc::now(),
    };

    match self.users.insert_one(&user, None).await {
      Ok(..) => Ok(Some(user)),
      Err(error) if is_duplicate_key(&error) => Ok(None),
      Err(error) => Err(Report::new(error).change_context(Error::Internal)),
    }
  }

  #[tracing::instrument(skip(self), name = "db.users.find_by_id")]
  async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>> {
    self
      .users
      .find_one(doc! { "_id": id }, None)
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip_all, name = "db.users.find_by_email")]
  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    self
      .users
      .find_one(doc! { "email": email }, None)
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip_all, name = "db.users.find_by_ids")]
  async fn find_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>> {
    self
      .users
      .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
      .await
      .into_db_error()?
      .try_collect()
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip(self), name = "db.users.delete")]
  async fn delete_user(&self, id: UserId) -> Result<()> {
    self
      .posts
      .delete_many(doc! { "user": id }, None)
      .await
      .into_db_error()?;

    self
      .profiles
      .delete_one(doc! { "user": id }, None)
      .await
      .into_db_error()?;

    self
      .users
      .delete_one(doc! { "_id": id }, None)
      .await
      .into_db_error()?;

    Ok(())
  }

  #[tracing::instrument(skip(self), name = "db.profiles.find_by_user")]
  async fn find_profile_by_user(&self, user: UserId) -> Result<Option<Profile>> {
    self
      .profiles
      .find_one(doc! { "user": user }, None)
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip(self), name = "db.profiles.list")]
  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    self
      .profiles
      .find(doc! {}, None)
      .await
      .into_db_error()?
      .try_collect()
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip(self, changes), name = "db.profiles.upsert")]
  async fn upsert_profile(&self, user: UserId, changes: &ProfileChanges) -> Result<Profile> {
    let mut update = doc! {
      "$setOnInsert": { "created_at": bson::DateTime::from_chrono(Utc::now()) },
    };

    let set = profile_set_document(changes);
    if !set.is_empty() {
      update.insert("$set", set);
    }

    let options = FindOneAndUpdateOptions::builder()
      .upsert(true)
      .return_document(ReturnDocument::After)
      .build();

    let profile = self
      .profiles
      .find_one_and_update(doc! { "user": user }, update, options)
      .await
      .into_db_error()?;

    // Upserts with `ReturnDocument::After` always return a document
    profile.ok_or_else(|| {
      Report::new(Error::Internal).attach_printable("upsert did not return the profile")
    })
  }

  #[tracing::instrument(skip(self, entry), name = "db.profiles.add_experience")]
  async fn add_experience(&self, user: UserId, entry: &Experience) -> Result<Option<Profile>> {
    let entry = bson::to_bson(entry).into_db_error()?;
    self.push_profile_entry(user, "experience", entry).await
  }

  #[tracing::instrument(skip(self), name = "db.profiles.remove_experience")]
  async fn remove_experience(
    &self,
    user: UserId,
    id: ExperienceId,
  ) -> Result<Mutation<Profile>> {
    self.pull_profile_entry(user, "experience", id.into()).await
  }

  #[tracing::instrument(skip(self, entry), name = "db.profiles.add_education")]
  async fn add_education(&self, user: UserId, entry: &Education) -> Result<Option<Profile>> {
    let entry = bson::to_bson(entry).into_db_error()?;
    self.push_profile_entry(user, "education", entry).await
  }

  #[tracing::instrument(skip(self), name = "db.profiles.remove_education")]
  async fn remove_education(&self, user: UserId, id: EducationId) -> Result<Mutation<Profile>> {
    self.pull_profile_entry(user, "education", id.into()).await
  }

  #[tracing::instrument(skip_all, name = "db.posts.create")]
  async fn create_post(&self, post: &Post) -> Result<()> {
    self.posts.insert_one(post, None).await.into_db_error()?;
    Ok(())
  }

  #[tracing::instrument(skip(self), name = "db.posts.find")]
  async fn find_post(&self, id: PostId) -> Result<Option<Post>> {
    self
      .posts
      .find_one(doc! { "_id": id }, None)
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip(self), name = "db.posts.list")]
  async fn list_posts(&self, author: Option<UserId>) -> Result<Vec<Post>> {
    let filter = match author {
      Some(author) => doc! { "user": author },
      None => doc! {},
    };

    self
      .posts
      .find(filter, Self::newest_first())
      .await
      .into_db_error()?
      .try_collect()
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip(self), name = "db.posts.delete")]
  async fn delete_post(&self, id: PostId, author: UserId) -> Result<Mutation<()>> {
    let result = self
      .posts
      .delete_one(doc! { "_id": id, "user": author }, None)
      .await
      .into_db_error()?;

    if result.deleted_count > 0 {
      Ok(Mutation::Applied(()))
    } else if self.find_post(id).await?.is_some() {
      Ok(Mutation::NotOwner)
    } else {
      Ok(Mutation::ParentNotFound)
    }
  }

  #[tracing::instrument(skip(self), name = "db.posts.like")]
  async fn like_post(&self, id: PostId, user: UserId) -> Result<Mutation<Vec<Like>>> {
    let like = bson::to_bson(&Like { user }).into_db_error()?;
    let filter = doc! { "_id": id, "likes.user": { "$ne": user } };
    let update = doc! { "$push": { "likes": { "$each": [like], "$position": 0 } } };

    let post = self
      .posts
      .find_one_and_update(filter, update, Self::after_update())
      .await
      .into_db_error()?;

    match post {
      Some(post) => Ok(Mutation::Applied(post.likes)),
      None => self.classify_post_miss(id).await,
    }
  }

  #[tracing::instrument(skip(self), name = "db.posts.unlike")]
  async fn unlike_post(&self, id: PostId, user: UserId) -> Result<Mutation<Vec<Like>>> {
    let filter = doc! { "_id": id, "likes.user": user };
    let update = doc! { "$pull": { "likes": { "user": user } } };

    let post = self
      .posts
      .find_one_and_update(filter, update, Self::after_update())
      .await
      .into_db_error()?;

    match post {
      Some(post) => Ok(Mutation::Applied(post.likes)),
      None => self.classify_post_miss(id).await,
    }
  }

  #[tracing::instrument(skip(self, comment), name = "db.posts.add_comment")]
  async fn add_comment(&self, id: PostId, comment: &Comment) -> Result<Option<Vec<Comment>>> {
    let comment = bson::to_bson(comment).into_db_error()?;
    let update = doc! { "$push": { "comments": { "$each": [comment], "$position": 0 } } };

    let post = self
      .posts
      .find_one_and_update(doc! { "_id": id }, update, Self::after_update())
      .await
      .into_db_error()?;

    Ok(post.map(|post| post.comments))
  }

  #[tracing::instrument(skip(self), name = "db.posts.remove_comment")]
  async fn remove_comment(
    &self,
    id: PostId,
    comment: CommentId,
    user: UserId,
  ) -> Result<Mutation<Vec<Comment>>> {
    let filter = doc! {
      "_id": id,
      "comments": { "$elemMatch": { "_id": comment, "user": user } },
    };
    let update = doc! { "$pull": { "comments": { "_id": comment } } };

    let post = self
      .posts
      .find_one_and_update(filter, update, Self::after_update())
      .await
      .into_db_error()?;

    if let Some(post) = post {
      return Ok(Mutation::Applied(post.comments));
    }

    Ok(match self.find_post(id).await? {
      None => Mutation::ParentNotFound,
      Some(post) if post.find_comment(comment).is_none() => Mutation::EntryNotFound,
      Some(..) => Mutation::NotOwner,
    })
  }
}
