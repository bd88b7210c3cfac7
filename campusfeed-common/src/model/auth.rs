use crate::model::{post::Post, user::SessionUser};

/// Whether `current_user` may edit or delete `post`.
///
/// Admins may modify any post, everyone else only their own. Without a
/// signed-in user nothing may be modified, and a user the backend has no id
/// for owns nothing.
#[must_use]
pub fn authorize(post: &Post, current_user: Option<&SessionUser>) -> bool {
    match current_user {
        None => false,
        Some(user) if user.is_admin() => true,
        Some(user) => user.id == Some(post.author_id()),
    }
}
