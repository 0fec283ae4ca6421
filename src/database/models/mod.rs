pub mod post;
pub mod recovery;

pub use post::{CreatePostRequest, NewPost, Post, PostChanges, UpdatePostRequest};
pub use recovery::{NewRecovery, RecoverItemRequest, RecoveryRecord};
