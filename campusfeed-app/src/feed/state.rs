use crate::feed::error::FeedError;
use campusfeed_client::MediaFile;
use campusfeed_common::model::{
    Id,
    post::{Caption, Post, PostMarker},
};
use std::collections::HashSet;

pub const NO_FILE_LABEL: &str = "No file selected";

/// Caption and file waiting to be published.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Draft {
    pub caption: Caption,
    pub file: Option<MediaFile>,
}

impl Draft {
    #[must_use]
    pub fn file_label(&self) -> String {
        self.file
            .as_ref()
            .map_or_else(|| NO_FILE_LABEL.to_owned(), MediaFile::label)
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct EditSession {
    pub post_id: Id<PostMarker>,
    pub caption: Caption,
}

/// Point-in-time copy of everything a view needs to draw the feed.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FeedSnapshot {
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: Option<String>,
    pub draft: Draft,
    pub submitting: bool,
    pub editing: Option<EditSession>,
    pub edit_submitting: bool,
}

#[derive(Debug)]
pub(crate) struct FeedState {
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: Option<String>,
    pub draft: Draft,
    pub submitting: bool,
    pub editing: Option<EditSession>,
    pub edit_submitting: bool,
    pub engaged: HashSet<Id<PostMarker>>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            loading: true,
            error: None,
            draft: Draft::default(),
            submitting: false,
            editing: None,
            edit_submitting: false,
            engaged: HashSet::new(),
        }
    }
}

impl FeedState {
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            posts: self.posts.clone(),
            loading: self.loading,
            error: self.error.clone(),
            draft: self.draft.clone(),
            submitting: self.submitting,
            editing: self.editing.clone(),
            edit_submitting: self.edit_submitting,
        }
    }

    pub fn contains(&self, post_id: Id<PostMarker>) -> bool {
        self.posts.iter().any(|post| post.id == post_id)
    }

    /// Records `err` as the inline message when it is one the user should see.
    pub fn fail(&mut self, err: FeedError) -> FeedError {
        if err.is_surfaced() {
            self.error = Some(err.user_message());
        }
        err
    }

    /// Replaces the whole list, keeping the first of any repeated id.
    pub fn set_posts(&mut self, posts: Vec<Post>) {
        let mut seen = HashSet::with_capacity(posts.len());
        self.posts = posts.into_iter().filter(|post| seen.insert(post.id)).collect();
    }

    pub fn prepend(&mut self, post: Post) {
        self.posts.retain(|existing| existing.id != post.id);
        self.posts.insert(0, post);
    }

    /// Swaps the record for `post_id` with the server's copy. A record that
    /// has left the list in the meantime stays gone.
    pub fn replace(&mut self, post_id: Id<PostMarker>, post: Post) {
        let Some(index) = self.posts.iter().position(|existing| existing.id == post_id) else {
            return;
        };

        let new_id = post.id;
        self.posts[index] = post;
        if new_id != post_id {
            let mut index_seen = false;
            self.posts.retain(|existing| {
                if existing.id != new_id {
                    return true;
                }
                let keep = !index_seen;
                index_seen = true;
                keep
            });
        }
    }

    pub fn remove(&mut self, post_id: Id<PostMarker>) {
        self.posts.retain(|post| post.id != post_id);
        self.engaged.remove(&post_id);
        if self
            .editing
            .as_ref()
            .is_some_and(|edit| edit.post_id == post_id)
        {
            self.editing = None;
        }
    }
}
