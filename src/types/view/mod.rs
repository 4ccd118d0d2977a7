//! Response bodies. Stored documents keep native ObjectIds,
//! views expose every id as its hex string.
mod posts;
mod profile;
mod users;

pub use posts::{CommentView, LikeView, PostView};
pub use profile::{EducationView, ExperienceView, ProfileView};
pub use users::{TokenResponse, UserSummary, UserView};
