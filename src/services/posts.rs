use chrono::Utc;

use crate::database::Mutation;
use crate::http::{Error, SessionUser};
use crate::schema::{Comment, Post};
use crate::types::{
  self,
  id::{CommentId, PostId, UserId},
  view::{CommentView, LikeView, PostView},
};
use crate::App;

fn post_not_found() -> Error {
  types::Error::not_found("Post not found").into()
}

fn not_authorized() -> Error {
  types::Error::forbidden("User not authorized").into()
}

fn parse_post_id(id: &str) -> Result<PostId, Error> {
  id.parse().map_err(|_| post_not_found())
}

#[derive(Debug)]
pub struct CreatePost<'a> {
  pub text: &'a str,
}

impl CreatePost<'_> {
  #[tracing::instrument(skip(app), name = "services.posts.create")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<PostView, Error> {
    let author = session.fetch(app).await?;
    let post = Post {
      id: PostId::new(),
      user: author.id,
      text: self.text.to_string(),
      name: author.name,
      avatar: author.avatar,
      likes: Vec::new(),
      comments: Vec::new(),
      created_at: Utc::now(),
    };

    app.data.create_post(&post).await?;
    Ok(post.into())
  }
}

/// Every post, newest first.
#[derive(Debug)]
pub struct ListPosts;

impl ListPosts {
  #[tracing::instrument(skip(app), name = "services.posts.list")]
  pub async fn perform(self, app: &App) -> Result<Vec<PostView>, Error> {
    let posts = app.data.list_posts(None).await?;
    Ok(posts.into_iter().map(Into::into).collect())
  }
}

/// Posts of one author, newest first.
#[derive(Debug)]
pub struct UserPosts<'a> {
  pub user_id: &'a str,
}

impl UserPosts<'_> {
  #[tracing::instrument(skip(app), name = "services.posts.by_user")]
  pub async fn perform(self, app: &App) -> Result<Vec<PostView>, Error> {
    let Ok(user) = self.user_id.parse::<UserId>() else {
      return Err(types::Error::not_found("User not found").into());
    };

    let posts = app.data.list_posts(Some(user)).await?;
    Ok(posts.into_iter().map(Into::into).collect())
  }
}

#[derive(Debug)]
pub struct GetPost<'a> {
  pub id: &'a str,
}

impl GetPost<'_> {
  #[tracing::instrument(skip(app), name = "services.posts.get")]
  pub async fn perform(self, app: &App) -> Result<PostView, Error> {
    let id = parse_post_id(self.id)?;
    match app.data.find_post(id).await? {
      Some(post) => Ok(post.into()),
      None => Err(post_not_found()),
    }
  }
}

#[derive(Debug)]
pub struct DeletePost<'a> {
  pub id: &'a str,
}

impl DeletePost<'_> {
  #[tracing::instrument(skip(app), name = "services.posts.delete")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<(), Error> {
    let id = parse_post_id(self.id)?;
    match app.data.delete_post(id, session.id).await? {
      Mutation::Applied(()) => Ok(()),
      Mutation::NotOwner => Err(not_authorized()),
      _ => Err(post_not_found()),
    }
  }
}

#[derive(Debug)]
pub struct LikePost<'a> {
  pub id: &'a str,
}

impl LikePost<'_> {
  #[tracing::instrument(skip(app), name = "services.posts.like")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<Vec<LikeView>, Error> {
    let id = parse_post_id(self.id)?;
    let user = session.fetch(app).await?;
    match app.data.like_post(id, user.id).await? {
      Mutation::Applied(likes) => Ok(LikeView::list(likes)),
      Mutation::Unchanged => Err(types::Error::invalid_request("Post already liked").into()),
      _ => Err(post_not_found()),
    }
  }
}

#[derive(Debug)]
pub struct UnlikePost<'a> {
  pub id: &'a str,
}

impl UnlikePost<'_> {
  #[tracing::instrument(skip(app), name = "services.posts.unlike")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<Vec<LikeView>, Error> {
    let id = parse_post_id(self.id)?;
    let user = session.fetch(app).await?;
    match app.data.unlike_post(id, user.id).await? {
      Mutation::Applied(likes) => Ok(LikeView::list(likes)),
      Mutation::Unchanged => {
        Err(types::Error::invalid_request("Post has not yet been liked").into())
      }
      _ => Err(post_not_found()),
    }
  }
}

#[derive(Debug)]
pub struct AddComment<'a> {
  pub post_id: &'a str,
  pub text: &'a str,
}

impl AddComment<'_> {
  #[tracing::instrument(skip(app), name = "services.posts.add_comment")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<Vec<CommentView>, Error> {
    let id = parse_post_id(self.post_id)?;
    let author = session.fetch(app).await?;
    let comment = Comment {
      id: CommentId::new(),
      user: author.id,
      text: self.text.to_string(),
      name: author.name,
      avatar: author.avatar,
      created_at: Utc::now(),
    };

    match app.data.add_comment(id, &comment).await? {
      Some(comments) => Ok(CommentView::list(comments)),
      None => Err(post_not_found()),
    }
  }
}

#[derive(Debug)]
pub struct RemoveComment<'a> {
  pub post_id: &'a str,
  pub comment_id: &'a str,
}

impl RemoveComment<'_> {
  #[tracing::instrument(skip(app), name = "services.posts.remove_comment")]
  pub async fn perform(self, app: &App, session: &SessionUser) -> Result<Vec<CommentView>, Error> {
    let comment_not_found = || Error::from(types::Error::not_found("Comment does not exist"));

    let id = parse_post_id(self.post_id)?;
    let comment = self
      .comment_id
      .parse::<CommentId>()
      .map_err(|_| comment_not_found())?;

    match app.data.remove_comment(id, comment, session.id).await? {
      Mutation::Applied(comments) => Ok(CommentView::list(comments)),
      Mutation::ParentNotFound => Err(post_not_found()),
      Mutation::NotOwner => Err(not_authorized()),
      Mutation::EntryNotFound | Mutation::Unchanged => Err(comment_not_found()),
    }
  }
}

#[cfg(test)]
mod tests {
  use assert_json_diff::assert_json_include;
  use serde_json::json;

  use super::*;
  use crate::test_utils::{self, TestResultExt};

  async fn create_post(app: &App, session: &SessionUser, text: &str) -> PostView {
    CreatePost { text }.perform(app, session).await.unwrap()
  }

  #[tokio::test]
  async fn should_snapshot_author_and_list_newest_first() {
    let (app, _) = App::for_tests();
    let (alice, _) = test_utils::register(&app, "Alice", "alice@example.com").await;
    let (bob, _) = test_utils::register(&app, "Bob", "bob@example.com").await;

    let first = create_post(&app, &alice, "first").await;
    let second = create_post(&app, &bob, "second").await;
    assert_eq!(first.name, "Alice");
    assert_eq!(first.user, alice.id);

    let posts = ListPosts.perform(&app).await.unwrap();
    let ids = posts.iter().map(|v| v.id).collect::<Vec<_>>();
    assert_eq!(ids, [second.id, first.id]);

    let user_id = alice.id.to_hex();
    let posts = UserPosts { user_id: &user_id }.perform(&app).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, first.id);

    let nobody = UserId::new().to_hex();
    let posts = UserPosts { user_id: &nobody }.perform(&app).await.unwrap();
    assert!(posts.is_empty());
  }

  #[tokio::test]
  async fn should_get_post_or_not_found() {
    let (app, _) = App::for_tests();
    let (alice, _) = test_utils::register(&app, "Alice", "alice@example.com").await;
    let post = create_post(&app, &alice, "hello").await;

    let id = post.id.to_hex();
    let found = GetPost { id: &id }.perform(&app).await.unwrap();
    assert_eq!(found.text, "hello");

    let unknown = PostId::new().to_hex();
    for id in ["not-an-id", unknown.as_str()] {
      let error = GetPost { id }.perform(&app).await.expect_error_json();
      assert_json_include!(
        actual: error,
        expected: json!({ "errors": [{ "message": "Post not found" }] }),
      );
    }
  }

  #[tokio::test]
  async fn should_only_let_author_delete() {
    let (app, _) = App::for_tests();
    let (alice, _) = test_utils::register(&app, "Alice", "alice@example.com").await;
    let (bob, _) = test_utils::register(&app, "Bob", "bob@example.com").await;
    let post = create_post(&app, &alice, "hello").await;
    let id = post.id.to_hex();

    LikePost { id: &id }.perform(&app, &bob).await.unwrap();
    AddComment {
      post_id: &id,
      text: "nice",
    }
    .perform(&app, &bob)
    .await
    .unwrap();
    let before = app.data.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(before.likes.len(), 1);
    assert_eq!(before.comments.len(), 1);

    let error = DeletePost { id: &id }
      .perform(&app, &bob)
      .await
      .expect_error_json();
    assert_json_include!(
      actual: error,
      expected: json!({ "errors": [{ "message": "User not authorized" }] }),
    );
    let after = app.data.find_post(post.id).await.unwrap();
    assert_eq!(after, Some(before));

    DeletePost { id: &id }.perform(&app, &alice).await.unwrap();
    assert!(app.data.find_post(post.id).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn should_like_at_most_once() {
    let (app, _) = App::for_tests();
    let (alice, _) = test_utils::register(&app, "Alice", "alice@example.com").await;
    let (bob, _) = test_utils::register(&app, "Bob", "bob@example.com").await;
    let post = create_post(&app, &alice, "hello").await;
    let id = post.id.to_hex();

    let likes = LikePost { id: &id }.perform(&app, &bob).await.unwrap();
    assert_eq!(likes.len(), 1);

    let error = LikePost { id: &id }
      .perform(&app, &bob)
      .await
      .expect_error_json();
    assert_json_include!(
      actual: error,
      expected: json!({ "errors": [{ "message": "Post already liked" }] }),
    );

    let likes = LikePost { id: &id }.perform(&app, &alice).await.unwrap();
    let users = likes.iter().map(|v| v.user).collect::<Vec<_>>();
    assert_eq!(users, [alice.id, bob.id]);

    let likes = UnlikePost { id: &id }.perform(&app, &bob).await.unwrap();
    let users = likes.iter().map(|v| v.user).collect::<Vec<_>>();
    assert_eq!(users, [alice.id]);

    let error = UnlikePost { id: &id }
      .perform(&app, &bob)
      .await
      .expect_error_json();
    assert_json_include!(
      actual: error,
      expected: json!({ "errors": [{ "message": "Post has not yet been liked" }] }),
    );
  }

  #[tokio::test]
  async fn should_reject_likes_from_deleted_accounts() {
    let (app, _) = App::for_tests();
    let (alice, _) = test_utils::register(&app, "Alice", "alice@example.com").await;
    let (bob, _) = test_utils::register(&app, "Bob", "bob@example.com").await;
    let post = create_post(&app, &alice, "hello").await;
    let id = post.id.to_hex();

    LikePost { id: &id }.perform(&app, &bob).await.unwrap();
    app.data.delete_user(bob.id).await.unwrap();

    for result in [
      LikePost { id: &id }.perform(&app, &bob).await,
      UnlikePost { id: &id }.perform(&app, &bob).await,
    ] {
      assert_json_include!(
        actual: result.expect_error_json(),
        expected: json!({ "errors": [{ "message": "Token is not valid" }] }),
      );
    }

    let post = app.data.find_post(post.id).await.unwrap().unwrap();
    assert_eq!(post.likes.len(), 1);
  }

  #[tokio::test]
  async fn should_add_and_remove_comments() {
    let (app, _) = App::for_tests();
    let (alice, _) = test_utils::register(&app, "Alice", "alice@example.com").await;
    let (bob, _) = test_utils::register(&app, "Bob", "bob@example.com").await;
    let post = create_post(&app, &alice, "hello").await;
    let post_id = post.id.to_hex();

    AddComment {
      post_id: &post_id,
      text: "first",
    }
    .perform(&app, &bob)
    .await
    .unwrap();

    let comments = AddComment {
      post_id: &post_id,
      text: "second",
    }
    .perform(&app, &alice)
    .await
    .unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text, "second");
    assert_eq!(comments[0].name, "Alice");
    assert_eq!(comments[1].name, "Bob");

    let bobs_comment = comments[1].id.to_hex();
    let error = RemoveComment {
      post_id: &post_id,
      comment_id: &bobs_comment,
    }
    .perform(&app, &alice)
    .await
    .expect_error_json();
    assert_json_include!(
      actual: error,
      expected: json!({ "errors": [{ "message": "User not authorized" }] }),
    );

    let comments = RemoveComment {
      post_id: &post_id,
      comment_id: &bobs_comment,
    }
    .perform(&app, &bob)
    .await
    .unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "second");

    let error = RemoveComment {
      post_id: &post_id,
      comment_id: &bobs_comment,
    }
    .perform(&app, &bob)
    .await
    .expect_error_json();
    assert_json_include!(
      actual: error,
      expected: json!({ "errors": [{ "message": "Comment does not exist" }] }),
    );
  }

  #[tokio::test]
  async fn should_not_comment_on_missing_post() {
    let (app, _) = App::for_tests();
    let (alice, _) = test_utils::register(&app, "Alice", "alice@example.com").await;
    let post_id = PostId::new().to_hex();

    let error = AddComment {
      post_id: &post_id,
      text: "hello",
    }
    .perform(&app, &alice)
    .await
    .expect_error_json();
    assert_json_include!(
      actual: error,
      expected: json!({ "errors": [{ "message": "Post not found" }] }),
    );
  }
}
