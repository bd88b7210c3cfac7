use campusfeed_client::ApiClient;
use campusfeed_common::model::{auth::authorize, post::Post, user::SessionUser};
use tracing::debug;

/// Who is looking at the feed.
///
/// Fetched once and handed to whatever renders posts, instead of every view
/// asking the backend on its own. Call [`SessionContext::refresh`] after a
/// sign-in or sign-out.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct SessionContext {
    user: Option<SessionUser>,
}

impl SessionContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn signed_in(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    /// Any failure, including an unauthenticated reply, means anonymous.
    pub async fn fetch(client: &ApiClient) -> Self {
        match client.fetch_current_user().await {
            Ok(user) => {
                debug!(user_id = ?user.id, "Signed in");
                Self::signed_in(user)
            }
            Err(err) => {
                debug!(error = %err, "No session user");
                Self::anonymous()
            }
        }
    }

    pub async fn refresh(&mut self, client: &ApiClient) {
        *self = Self::fetch(client).await;
    }

    #[must_use]
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Whether edit and delete should be offered for `post`.
    #[must_use]
    pub fn can_modify(&self, post: &Post) -> bool {
        authorize(post, self.user())
    }
}
