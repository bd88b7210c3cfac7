use campusfeed_common::model::{
    Id, ModelValidationError,
    post::{MediaReference, MediaType},
    user::{Role, SessionUser, UserMarker},
};
use serde::{Deserialize, Serialize};

/// Error body the backend attaches to non-2xx replies.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ErrorBody {
    /// The message to show for this body; `details` wins over `error`.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        [&self.details, &self.error]
            .into_iter()
            .filter_map(Option::as_deref)
            .find(|message| !message.is_empty())
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
pub(crate) struct UploadRecord {
    pub public_id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

/// `GET /users/me` may answer 200 with a body that is not a signed-in user.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub(crate) struct SessionRecord {
    #[serde(default)]
    pub id: Option<Id<UserMarker>>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl From<UploadRecord> for MediaReference {
    fn from(value: UploadRecord) -> Self {
        Self {
            public_id: value.public_id,
            url: value.url,
            media_type: value.media_type,
        }
    }
}

impl TryFrom<SessionRecord> for SessionUser {
    type Error = ModelValidationError;

    fn try_from(value: SessionRecord) -> Result<Self, Self::Error> {
        let email = value
            .email
            .filter(|email| !email.is_empty())
            .ok_or(ModelValidationError::MissingEmail)?;

        Ok(Self {
            id: value.id,
            email,
            name: value.name,
            role: value.role,
        })
    }
}
