use crate::model::{
    Id,
    user::{Author, UserMarker},
};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use time::OffsetDateTime;

pub const CAPTION_MAX_LEN: usize = 250;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

/// A feed entry exactly as the posts API reports it for the current viewer.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    #[serde(default)]
    pub caption: Caption,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub author: Author,
    pub media: MediaReference,
    pub likes: u64,
    pub views: u64,
    #[serde(default)]
    pub liked_by_me: bool,
    #[serde(default)]
    pub viewed_by_me: bool,
}

impl Post {
    #[must_use]
    pub fn author_id(&self) -> Id<UserMarker> {
        self.author.id
    }
}

/// Older rows may carry a null public id or media type.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct MediaReference {
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_id: String,
    pub url: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub media_type: MediaType,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    // Anything the upload service does not call a video is shown as an image.
    #[default]
    #[serde(other)]
    Image,
}

impl MediaType {
    /// Guesses the media type from a MIME type such as `video/mp4`.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("video/") {
            MediaType::Video
        } else {
            MediaType::Image
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/posts`.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct CreatePost {
    pub caption: Caption,
    pub media_public_id: String,
    pub media_url: String,
    pub media_type: MediaType,
}

impl CreatePost {
    #[must_use]
    pub fn new(caption: Caption, media: MediaReference) -> Self {
        Self {
            caption,
            media_public_id: media.public_id,
            media_url: media.url,
            media_type: media.media_type,
        }
    }
}

/// Body of `PUT /api/posts/{id}`. Media is never replaced after creation.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct UpdatePost {
    pub caption: Caption,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct PostList {
    #[serde(default)]
    pub posts: Vec<Post>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct DeletedPost {
    pub deleted: Id<PostMarker>,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct Caption(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Captions are limited to {CAPTION_MAX_LEN} characters, got {0}")]
pub struct InvalidCaptionError(usize);

impl Caption {
    pub fn new(caption: String) -> Result<Self, InvalidCaptionError> {
        let len = caption.chars().count();
        if len <= CAPTION_MAX_LEN {
            Ok(Caption(caption))
        } else {
            Err(InvalidCaptionError(len))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

impl Display for Caption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Caption {
    type Error = InvalidCaptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Caption::new(value)
    }
}

impl<'de> Deserialize<'de> for Caption {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Older rows store a null caption.
        let inner = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Caption::new(inner).map_err(|err| {
            Error::invalid_value(
                Unexpected::Other(&format!("caption of {} characters", err.0)),
                &"Caption",
            )
        })
    }
}
