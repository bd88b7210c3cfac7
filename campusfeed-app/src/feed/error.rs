use campusfeed_client::ClientError;
use campusfeed_common::model::{
    Id,
    post::{InvalidCaptionError, PostMarker},
};
use std::fmt::{Display, Formatter};
use thiserror::Error;

pub type Result<T, E = FeedError> = std::result::Result<T, E>;

pub const NO_FILE_MESSAGE: &str = "Please choose a photo or video to upload.";

/// The user action a request was made for.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum FeedAction {
    Load,
    Publish,
    Like,
    View,
    Update,
    Delete,
}

impl FeedAction {
    /// Shown when a request fails without a server-provided message.
    #[must_use]
    pub fn fallback_message(self) -> &'static str {
        match self {
            FeedAction::Load => "Failed to fetch posts",
            FeedAction::Publish => "Failed to publish post",
            FeedAction::Like => "Failed to like post",
            FeedAction::View => "Failed to register view",
            FeedAction::Update => "Failed to update post",
            FeedAction::Delete => "Failed to delete post",
        }
    }
}

impl Display for FeedAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FeedAction::Load => "load",
            FeedAction::Publish => "publish",
            FeedAction::Like => "like",
            FeedAction::View => "view",
            FeedAction::Update => "update",
            FeedAction::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Please choose a photo or video to upload.")]
    NoFileChosen,
    #[error(transparent)]
    Caption(#[from] InvalidCaptionError),
    #[error("Post {0} is not in the feed")]
    UnknownPost(Id<PostMarker>),
    #[error("A {0} is already in progress")]
    InProgress(FeedAction),
    #[error("No post is being edited")]
    NotEditing,
    #[error("{} ({source})", .action.fallback_message())]
    Request {
        action: FeedAction,
        #[source]
        source: ClientError,
    },
}

impl FeedError {
    #[must_use]
    pub fn request(action: FeedAction, source: ClientError) -> Self {
        FeedError::Request { action, source }
    }

    /// The inline message for this error.
    ///
    /// Server replies show their `details` or `error` field verbatim; transport
    /// failures get the generic message of the action that failed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FeedError::Request { action, source } => source
                .server_message()
                .unwrap_or(action.fallback_message())
                .to_owned(),
            other => other.to_string(),
        }
    }

    /// Whether the error belongs in the inline message slot. A rejected
    /// duplicate submission is silent, like a disabled button.
    #[must_use]
    pub fn is_surfaced(&self) -> bool {
        !matches!(self, FeedError::InProgress(_))
    }
}
