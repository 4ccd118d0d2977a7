use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::forms::{CreateUser, ProfileChanges};
use super::{Data, Mutation, Result};
use crate::schema::{Comment, Education, Experience, Like, Post, Profile, User};
use crate::types::id::{CommentId, EducationId, ExperienceId, PostId, ProfileId, UserId};

/// In-memory [`Data`] implementation for tests. Each collection is
/// guarded by a single lock so every operation is as atomic as the
/// conditional updates of the real driver. Clones share the
/// same collections.
#[derive(Debug, Clone, Default)]
pub struct MockData {
  users: Arc<RwLock<Vec<User>>>,
  profiles: Arc<RwLock<Vec<Profile>>>,
  posts: Arc<RwLock<Vec<Post>>>,
}

impl MockData {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn users_count(&self) -> usize {
    self.users.read().await.len()
  }

  pub async fn profiles_count(&self) -> usize {
    self.profiles.read().await.len()
  }
}

fn apply_changes(profile: &mut Profile, changes: &ProfileChanges) {
  fn set(target: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = value {
      *target = Some(value.clone());
    }
  }

  set(&mut profile.company, &changes.company);
  set(&mut profile.website, &changes.website);
  set(&mut profile.location, &changes.location);
  set(&mut profile.bio, &changes.bio);
  set(&mut profile.status, &changes.status);
  set(&mut profile.github_username, &changes.github_username);
  set(&mut profile.social.youtube, &changes.social.youtube);
  set(&mut profile.social.twitter, &changes.social.twitter);
  set(&mut profile.social.facebook, &changes.social.facebook);
  set(&mut profile.social.linkedin, &changes.social.linkedin);
  set(&mut profile.social.instagram, &changes.social.instagram);

  if let Some(skills) = &changes.skills {
    profile.skills = skills.clone();
  }
}

#[async_trait]
impl Data for MockData {
  async fn create_user(&self, form: &CreateUser<'_>) -> Result<Option<User>> {
    let mut users = self.users.write().await;
    if users.iter().any(|user| user.email == form.email) {
      return Ok(None);
    }

    let user = User {
      id: UserId::new(),
      name: form.name.to_string(),
      email: form.email.to_string(),
      password_hash: form.password_hash.into_inner().to_string(),
      avatar: form.avatar.to_string(),
      created_at: Utc::now(),
    };
    users.push(user.clone());
    Ok(Some(user))
  }

  async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>> {
    Ok(self.users.read().await.iter().find(|v| v.id == id).cloned())
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let users = self.users.read().await;
    Ok(users.iter().find(|v| v.email == email).cloned())
  }

  async fn find_users_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>> {
    let users = self.users.read().await;
    Ok(users.iter().filter(|v| ids.contains(&v.id)).cloned().collect())
  }

  async fn delete_user(&self, id: UserId) -> Result<()> {
    self.posts.write().await.retain(|post| post.user != id);
    self.profiles.write().await.retain(|profile| profile.user != id);
    self.users.write().await.retain(|user| user.id != id);
    Ok(())
  }

  async fn find_profile_by_user(&self, user: UserId) -> Result<Option<Profile>> {
    let profiles = self.profiles.read().await;
    Ok(profiles.iter().find(|v| v.user == user).cloned())
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    Ok(self.profiles.read().await.clone())
  }

  async fn upsert_profile(&self, user: UserId, changes: &ProfileChanges) -> Result<Profile> {
    let mut profiles = self.profiles.write().await;
    if let Some(profile) = profiles.iter_mut().find(|v| v.user == user) {
      apply_changes(profile, changes);
      return Ok(profile.clone());
    }

    let mut profile = Profile {
      id: ProfileId::new(),
      user,
      company: None,
      website: None,
      location: None,
      bio: None,
      status: None,
      github_username: None,
      skills: Vec::new(),
      social: Default::default(),
      experience: Vec::new(),
      education: Vec::new(),
      created_at: Utc::now(),
    };
    apply_changes(&mut profile, changes);
    profiles.push(profile.clone());
    Ok(profile)
  }

  async fn add_experience(&self, user: UserId, entry: &Experience) -> Result<Option<Profile>> {
    let mut profiles = self.profiles.write().await;
    Ok(profiles.iter_mut().find(|v| v.user == user).map(|profile| {
      profile.experience.insert(0, entry.clone());
      profile.clone()
    }))
  }

  async fn remove_experience(
    &self,
    user: UserId,
    id: ExperienceId,
  ) -> Result<Mutation<Profile>> {
    let mut profiles = self.profiles.write().await;
    let Some(profile) = profiles.iter_mut().find(|v| v.user == user) else {
      return Ok(Mutation::ParentNotFound);
    };

    let Some(index) = profile.experience.iter().position(|v| v.id == id) else {
      return Ok(Mutation::EntryNotFound);
    };

    profile.experience.remove(index);
    Ok(Mutation::Applied(profile.clone()))
  }

  async fn add_education(&self, user: UserId, entry: &Education) -> Result<Option<Profile>> {
    let mut profiles = self.profiles.write().await;
    Ok(profiles.iter_mut().find(|v| v.user == user).map(|profile| {
      profile.education.insert(0, entry.clone());
      profile.clone()
    }))
  }

  async fn remove_education(&self, user: UserId, id: EducationId) -> Result<Mutation<Profile>> {
    let mut profiles = self.profiles.write().await;
    let Some(profile) = profiles.iter_mut().find(|v| v.user == user) else {
      return Ok(Mutation::ParentNotFound);
    };

    let Some(index) = profile.education.iter().position(|v| v.id == id) else {
      return Ok(Mutation::EntryNotFound);
    };

    profile.education.remove(index);
    Ok(Mutation::Applied(profile.clone()))
  }

  async fn create_post(&self, post: &Post) -> Result<()> {
    self.posts.write().await.push(post.clone());
    Ok(())
  }

  async fn find_post(&self, id: PostId) -> Result<Option<Post>> {
    Ok(self.posts.read().await.iter().find(|v| v.id == id).cloned())
  }

  async fn list_posts(&self, author: Option<UserId>) -> Result<Vec<Post>> {
    let posts = self.posts.read().await;
    let mut posts = posts
      .iter()
      .filter(|post| author.map_or(true, |author| post.user == author))
      .cloned()
      .collect::<Vec<_>>();

    // Posts are pushed in creation order
    posts.reverse();
    Ok(posts)
  }

  async fn delete_post(&self, id: PostId, author: UserId) -> Result<Mutation<()>> {
    let mut posts = self.posts.write().await;
    let Some(index) = posts.iter().position(|v| v.id == id) else {
      return Ok(Mutation::ParentNotFound);
    };

    if posts[index].user != author {
      return Ok(Mutation::NotOwner);
    }

    posts.remove(index);
    Ok(Mutation::Applied(()))
  }

  async fn like_post(&self, id: PostId, user: UserId) -> Result<Mutation<Vec<Like>>> {
    let mut posts = self.posts.write().await;
    let Some(post) = posts.iter_mut().find(|v| v.id == id) else {
      return Ok(Mutation::ParentNotFound);
    };

    if post.is_liked_by(user) {
      return Ok(Mutation::Unchanged);
    }

    post.likes.insert(0, Like { user });
    Ok(Mutation::Applied(post.likes.clone()))
  }

  async fn unlike_post(&self, id: PostId, user: UserId) -> Result<Mutation<Vec<Like>>> {
    let mut posts = self.posts.write().await;
    let Some(post) = posts.iter_mut().find(|v| v.id == id) else {
      return Ok(Mutation::ParentNotFound);
    };

    let Some(index) = post.likes.iter().position(|like| like.user == user) else {
      return Ok(Mutation::Unchanged);
    };

    post.likes.remove(index);
    Ok(Mutation::Applied(post.likes.clone()))
  }

  async fn add_comment(&self, id: PostId, comment: &Comment) -> Result<Option<Vec<Comment>>> {
    let mut posts = self.posts.write().await;
    Ok(posts.iter_mut().find(|v| v.id == id).map(|post| {
      post.comments.insert(0, comment.clone());
      post.comments.clone()
    }))
  }

  async fn remove_comment(
    &self,
    id: PostId,
    comment: CommentId,
    user: UserId,
  ) -> Result<Mutation<Vec<Comment>>> {
    let mut posts = self.posts.write().await;
    let Some(post) = posts.iter_mut().find(|v| v.id == id) else {
      return Ok(Mutation::ParentNotFound);
    };

    let Some(index) = post.comments.iter().position(|v| v.id == comment) else {
      return Ok(Mutation::EntryNotFound);
    };

    if post.comments[index].user != user {
      return Ok(Mutation::NotOwner);
    }

    post.comments.remove(index);
    Ok(Mutation::Applied(post.comments.clone()))
  }
}
