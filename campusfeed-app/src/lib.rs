pub mod feed;
pub mod session;
pub mod view;

pub use feed::{Confirm, DeleteOutcome, PostFeed, error::FeedError};
pub use session::SessionContext;
