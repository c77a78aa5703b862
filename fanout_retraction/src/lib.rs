pub mod activitypub;
pub mod broadcast;
pub mod cascade;
pub mod collaborators;
pub mod dispatch;
pub mod errors;
pub mod federation;
pub mod home_timeline;
pub mod index;
pub mod pipeline;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use pipeline::{remove_posts, Collaborators};
