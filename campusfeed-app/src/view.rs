use crate::{feed::state::FeedSnapshot, session::SessionContext};
use campusfeed_common::model::post::Post;
use time::{format_description::BorrowedFormatItem, macros::format_description};

pub const LOADING_TEXT: &str = "Loading posts...";

const CREATED_AT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute] UTC");

#[must_use]
pub fn like_label(post: &Post) -> String {
    let verb = if post.liked_by_me { "Unlike" } else { "Like" };
    format!("{verb} ({})", post.likes)
}

#[must_use]
pub fn views_label(post: &Post) -> String {
    format!("{} views", post.views)
}

#[must_use]
pub fn publish_label(submitting: bool) -> &'static str {
    if submitting {
        "Publishing..."
    } else {
        "Publish Post"
    }
}

#[must_use]
pub fn save_label(edit_submitting: bool) -> &'static str {
    if edit_submitting { "Saving..." } else { "Save" }
}

fn created_at(post: &Post) -> String {
    post.created_at
        .to_offset(time::UtcOffset::UTC)
        .format(CREATED_AT_FORMAT)
        .unwrap_or_else(|_| post.created_at.to_string())
}

/// Draws the feed as plain text, one block per post.
#[must_use]
pub fn render_feed(feed: &FeedSnapshot, session: &SessionContext) -> String {
    let mut lines = vec![
        "Campus Posts".to_owned(),
        format!(
            "[{}] {}",
            publish_label(feed.submitting),
            feed.draft.file_label()
        ),
    ];
    if let Some(error) = &feed.error {
        lines.push(format!("! {error}"));
    }

    if feed.loading {
        lines.push(LOADING_TEXT.to_owned());
    } else {
        for post in &feed.posts {
            lines.push(String::new());
            lines.extend(post_lines(feed, post, session));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

fn post_lines(feed: &FeedSnapshot, post: &Post, session: &SessionContext) -> Vec<String> {
    let mut lines = vec![
        format!(
            "#{} {} · {}",
            post.id,
            post.author.display_name(),
            created_at(post)
        ),
        format!("{} {}", post.media.media_type, post.media.url),
    ];
    if !post.caption.is_empty() {
        lines.push(post.caption.to_string());
    }

    if let Some(edit) = feed.editing.as_ref().filter(|edit| edit.post_id == post.id) {
        lines.push(format!(
            "> {} [{}] [Cancel]",
            edit.caption,
            save_label(feed.edit_submitting)
        ));
    }

    let mut actions = format!("[{}] {}", like_label(post), views_label(post));
    if session.can_modify(post) {
        actions.push_str(" [Edit] [Delete]");
    }
    lines.push(actions);
    lines
}
