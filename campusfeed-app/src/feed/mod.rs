//! The post feed controller.
//!
//! [`PostFeed`] keeps an ordered list of posts in step with the posts API.
//! Every mutation is a single request whose reply is applied verbatim: the
//! controller never computes likes, views or captions on its own, it only
//! swaps in what the server returned. Nothing is retried and nothing is
//! applied optimistically.
//!
//! The handle is cheap to clone. State sits behind a mutex that is only held
//! between awaits, so actions started from different tasks run as independent
//! round trips and whichever reply arrives last is what the list shows.

pub mod error;
pub mod state;

use crate::feed::{
    error::{FeedAction, FeedError, Result},
    state::{EditSession, FeedSnapshot, FeedState},
};
use campusfeed_client::{ApiClient, ClientError, MediaFile};
use campusfeed_common::model::{
    Id,
    post::{Caption, CreatePost, MediaReference, Post, PostMarker, UpdatePost},
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DELETE_PROMPT: &str = "Delete this post? This cannot be undone.";

/// Asks the person in front of the feed to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct PostFeed {
    client: Arc<ApiClient>,
    state: Arc<Mutex<FeedState>>,
}

impl PostFeed {
    /// A feed in its loading state; call [`PostFeed::load`] to fill it.
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: Arc::default(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> FeedSnapshot {
        self.state.lock().snapshot()
    }

    #[must_use]
    pub fn post(&self, post_id: Id<PostMarker>) -> Option<Post> {
        self.state
            .lock()
            .posts
            .iter()
            .find(|post| post.id == post_id)
            .cloned()
    }

    pub fn dismiss_error(&self) {
        self.state.lock().error = None;
    }

    /// Fetches the whole collection. On failure the list is left empty.
    pub async fn load(&self) -> Result<()> {
        self.state.lock().error = None;

        let result = self.client.fetch_posts().await;

        let mut state = self.state.lock();
        state.loading = false;
        match result {
            Ok(posts) => {
                debug!(count = posts.len(), "Loaded posts");
                state.set_posts(posts);
                Ok(())
            }
            Err(source) => {
                warn!(error = %source, "Loading posts failed");
                state.posts.clear();
                Err(state.fail(FeedError::request(FeedAction::Load, source)))
            }
        }
    }

    /// Uploads `file`, creates a post for it and puts the server's copy at
    /// the top of the feed.
    pub async fn create(&self, caption: Caption, file: Option<MediaFile>) -> Result<Post> {
        let Some(file) = file.filter(|file| !file.is_empty()) else {
            return Err(self.state.lock().fail(FeedError::NoFileChosen));
        };

        {
            let mut state = self.state.lock();
            if state.submitting {
                return Err(FeedError::InProgress(FeedAction::Publish));
            }
            state.submitting = true;
            state.error = None;
        }

        let result = self.upload_and_create(caption, &file).await;

        let mut state = self.state.lock();
        state.submitting = false;
        match result {
            Ok(post) => {
                info!(post_id = %post.id, "Published post");
                state.prepend(post.clone());
                Ok(post)
            }
            Err(source) => {
                warn!(error = %source, "Publishing post failed");
                Err(state.fail(FeedError::request(FeedAction::Publish, source)))
            }
        }
    }

    async fn upload_and_create(
        &self,
        caption: Caption,
        file: &MediaFile,
    ) -> Result<Post, ClientError> {
        let media: MediaReference = self.client.upload_media(file).await?;
        self.client
            .create_post(&CreatePost::new(caption, media))
            .await
    }

    pub fn set_draft_caption(&self, caption: String) -> Result<()> {
        let caption = Caption::new(caption)?;
        self.state.lock().draft.caption = caption;
        Ok(())
    }

    pub fn select_file(&self, file: Option<MediaFile>) {
        self.state.lock().draft.file = file;
    }

    /// Publishes the draft. The draft is cleared only when publishing works.
    pub async fn publish(&self) -> Result<Post> {
        let draft = self.state.lock().draft.clone();

        let post = self.create(draft.caption, draft.file).await?;

        self.state.lock().draft = state::Draft::default();
        Ok(post)
    }

    pub async fn toggle_like(&self, post_id: Id<PostMarker>) -> Result<Post> {
        self.replace_from(FeedAction::Like, post_id, self.client.toggle_like(post_id))
            .await
    }

    pub async fn register_view(&self, post_id: Id<PostMarker>) -> Result<Post> {
        self.replace_from(FeedAction::View, post_id, self.client.register_view(post_id))
            .await
    }

    /// Called when a post's image is clicked or its video starts playing.
    ///
    /// Only the first engagement with a post registers a view; later ones
    /// return `Ok(None)` without a request. A failed registration may be
    /// retried by engaging again.
    pub async fn engage_media(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        {
            let mut state = self.state.lock();
            if !state.contains(post_id) {
                return Err(state.fail(FeedError::UnknownPost(post_id)));
            }
            if !state.engaged.insert(post_id) {
                return Ok(None);
            }
        }

        match self.register_view(post_id).await {
            Ok(post) => Ok(Some(post)),
            Err(err) => {
                self.state.lock().engaged.remove(&post_id);
                Err(err)
            }
        }
    }

    pub async fn update(&self, post_id: Id<PostMarker>, caption: Caption) -> Result<Post> {
        let update = UpdatePost { caption };
        self.replace_from(
            FeedAction::Update,
            post_id,
            self.client.update_post(post_id, &update),
        )
        .await
    }

    /// Opens the caption editor for `post_id`, closing any other one.
    pub fn start_edit(&self, post_id: Id<PostMarker>) -> Result<()> {
        let mut state = self.state.lock();
        let current = state
            .posts
            .iter()
            .find(|post| post.id == post_id)
            .map(|post| post.caption.clone());
        let Some(caption) = current else {
            return Err(state.fail(FeedError::UnknownPost(post_id)));
        };

        state.editing = Some(EditSession { post_id, caption });
        state.error = None;
        Ok(())
    }

    pub fn set_edit_caption(&self, caption: String) -> Result<()> {
        let caption = Caption::new(caption)?;
        let mut state = self.state.lock();
        let edit = state.editing.as_mut().ok_or(FeedError::NotEditing)?;
        edit.caption = caption;
        Ok(())
    }

    pub fn cancel_edit(&self) {
        self.state.lock().editing = None;
    }

    /// Sends the edited caption. Pressing save is the confirmation.
    pub async fn save_edit(&self) -> Result<Post> {
        let (post_id, caption) = {
            let mut state = self.state.lock();
            if state.edit_submitting {
                return Err(FeedError::InProgress(FeedAction::Update));
            }
            let Some(edit) = state.editing.clone() else {
                return Err(FeedError::NotEditing);
            };
            state.edit_submitting = true;
            (edit.post_id, edit.caption)
        };

        let result = self.update(post_id, caption).await;

        let mut state = self.state.lock();
        state.edit_submitting = false;
        if result.is_ok()
            && state
                .editing
                .as_ref()
                .is_some_and(|edit| edit.post_id == post_id)
        {
            state.editing = None;
        }
        result
    }

    /// Deletes `post_id` once `confirm` approves [`DELETE_PROMPT`].
    pub async fn delete(
        &self,
        post_id: Id<PostMarker>,
        confirm: &impl Confirm,
    ) -> Result<DeleteOutcome> {
        self.ensure_known(post_id)?;
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(%post_id, "Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let result = self.client.delete_post(post_id).await;

        let mut state = self.state.lock();
        match result {
            Ok(deleted) => {
                info!(%post_id, %deleted, "Deleted post");
                state.remove(post_id);
                Ok(DeleteOutcome::Deleted)
            }
            Err(source) => {
                warn!(%post_id, error = %source, "Deleting post failed");
                Err(state.fail(FeedError::request(FeedAction::Delete, source)))
            }
        }
    }

    fn ensure_known(&self, post_id: Id<PostMarker>) -> Result<()> {
        let mut state = self.state.lock();
        if state.contains(post_id) {
            Ok(())
        } else {
            Err(state.fail(FeedError::UnknownPost(post_id)))
        }
    }

    async fn replace_from(
        &self,
        action: FeedAction,
        post_id: Id<PostMarker>,
        request: impl Future<Output = Result<Post, ClientError>>,
    ) -> Result<Post> {
        self.ensure_known(post_id)?;

        let result = request.await;

        let mut state = self.state.lock();
        match result {
            Ok(post) => {
                debug!(%post_id, %action, "Applying server copy");
                state.replace(post_id, post.clone());
                Ok(post)
            }
            Err(source) => {
                warn!(%post_id, %action, error = %source, "Request failed");
                Err(state.fail(FeedError::request(action, source)))
            }
        }
    }
}
